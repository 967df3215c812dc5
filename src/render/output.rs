use std::path::{Path, PathBuf};

use super::RenderError;

const MAX_NAME_CHARS: usize = 100;
const FALLBACK_NAME: &str = "labels";

/// Turn an operator-typed document name into a safe file name ending in
/// `.pdf`. Path separators, control characters and `..` are removed.
pub fn sanitize_output_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|&c| c != '/' && c != '\\' && !c.is_control())
        .map(|c| if matches!(c, ':' | '*' | '?' | '"' | '<' | '>' | '|') { '_' } else { c })
        .collect();

    // Remove consecutive dots (path traversal prevention)
    let cleaned = cleaned.replace("..", "");

    let stem = cleaned.trim();
    let stem = strip_pdf_suffix(stem).trim();
    let stem: String = stem.chars().take(MAX_NAME_CHARS).collect();
    let stem = stem.trim_end_matches('.').trim();

    if stem.is_empty() {
        format!("{FALLBACK_NAME}.pdf")
    } else {
        format!("{stem}.pdf")
    }
}

fn strip_pdf_suffix(name: &str) -> &str {
    let split = name.len().saturating_sub(4);
    match (name.get(..split), name.get(split..)) {
        (Some(stem), Some(ext)) if ext.eq_ignore_ascii_case(".pdf") => stem,
        _ => name,
    }
}

/// Writes PDF bytes into `dir`, creating it if absent.
pub fn export_pdf_to_file(pdf_bytes: &[u8], name: &str, dir: &Path) -> Result<PathBuf, RenderError> {
    std::fs::create_dir_all(dir).map_err(|source| RenderError::OutputDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let path = dir.join(sanitize_output_name(name));
    std::fs::write(&path, pdf_bytes)?;

    tracing::info!(path = %path.display(), bytes = pdf_bytes.len(), "Label PDF written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_pdf_extension_once() {
        assert_eq!(sanitize_output_name("Acme March"), "Acme March.pdf");
        assert_eq!(sanitize_output_name("Acme March.pdf"), "Acme March.pdf");
        assert_eq!(sanitize_output_name("Acme March.PDF"), "Acme March.pdf");
    }

    #[test]
    fn strips_path_traversal() {
        let name = sanitize_output_name("../../etc/passwd");
        assert!(!name.contains('/'));
        assert!(!name.contains(".."));
        assert_eq!(name, "etcpasswd.pdf");
    }

    #[test]
    fn replaces_reserved_characters() {
        assert_eq!(sanitize_output_name("a:b*c?"), "a_b_c_.pdf");
    }

    #[test]
    fn empty_name_falls_back() {
        assert_eq!(sanitize_output_name("   "), "labels.pdf");
        assert_eq!(sanitize_output_name(".pdf"), "labels.pdf");
    }

    #[test]
    fn long_names_are_truncated() {
        let name = sanitize_output_name(&"é".repeat(300));
        assert_eq!(name.chars().count(), MAX_NAME_CHARS + 4);
    }

    #[test]
    fn writes_into_created_directory() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("exports").join("march");
        let path = export_pdf_to_file(b"%PDF-1.3 test", "Acme", &target).unwrap();
        assert_eq!(path, target.join("Acme.pdf"));
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.3 test");
    }

    #[test]
    fn unusable_directory_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"x").unwrap();
        let err = export_pdf_to_file(b"%PDF", "Acme", &blocker.join("sub")).unwrap_err();
        assert!(matches!(err, RenderError::OutputDir { .. }));
    }
}
