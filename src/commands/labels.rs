//! Label list commands.
//!
//! - `select_files`: parse and append one type's chip files
//! - `list_labels`: current records with resolved colors
//! - `attach_qr`: per-order QR payload
//! - `create_pdf`: render, write, optionally open
//! - `reset_labels`: start a new list

use std::path::PathBuf;

use crate::collaborators::{ColorPicker, FileOpener, FilePicker, FixedDir, TypePrompt};
use crate::core_state::CoreState;
use crate::models::{ColoredRecord, LabelType};
use crate::session::{ExportOutcome, OrderChoice, SelectionReport};

const MAX_DOCUMENT_NAME_LEN: usize = 200;

pub fn select_files(
    state: &CoreState,
    label_type: LabelType,
    picker: &mut dyn FilePicker,
    prompt: &mut dyn TypePrompt,
    colors: &mut dyn ColorPicker,
) -> Result<SelectionReport, String> {
    let mut session = state.lock_session().map_err(|e| e.to_string())?;
    Ok(session.select_files(label_type, picker, prompt, colors))
}

pub fn list_labels(state: &CoreState) -> Result<Vec<ColoredRecord>, String> {
    let session = state.lock_session().map_err(|e| e.to_string())?;
    Ok(session.colored_records())
}

pub fn order_choices(state: &CoreState) -> Result<Vec<OrderChoice>, String> {
    let session = state.lock_session().map_err(|e| e.to_string())?;
    Ok(session.order_choices())
}

/// Returns the replaced payload, if any, so the caller can tell the operator.
pub fn attach_qr(state: &CoreState, order_name: &str, payload: &str) -> Result<Option<String>, String> {
    let mut session = state.lock_session().map_err(|e| e.to_string())?;
    session
        .attach_qr(order_name, payload)
        .map_err(|e| e.to_string())
}

/// Renders the current list to `<name>.pdf`.
///
/// `out_dir` overrides the configured exports directory. With `open` the
/// finished file is handed to the opener; failing to open is logged, the
/// export still counts.
pub fn create_pdf(
    state: &CoreState,
    name: &str,
    out_dir: Option<PathBuf>,
    open: bool,
    opener: &dyn FileOpener,
) -> Result<ExportOutcome, String> {
    let name = name.trim();
    if name.is_empty() {
        return Err("Document name is required".into());
    }
    if name.len() > MAX_DOCUMENT_NAME_LEN {
        return Err("Document name too long".into());
    }

    let resolver = FixedDir(out_dir.unwrap_or_else(|| state.settings.exports_dir()));
    let options = state.settings.export_options();

    let outcome = {
        let mut session = state.lock_session().map_err(|e| e.to_string())?;
        session
            .export(name, &options, &resolver)
            .map_err(|e| e.to_string())?
    };

    if open {
        if let Err(e) = opener.open(&outcome.path) {
            tracing::warn!(path = %outcome.path.display(), error = %e, "Could not open PDF");
        }
    }
    Ok(outcome)
}

pub fn reset_labels(state: &CoreState) -> Result<(), String> {
    let mut session = state.lock_session().map_err(|e| e.to_string())?;
    session.reset();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::PresetFiles;
    use crate::config::Settings;
    use crate::models::HexColor;
    use std::cell::RefCell;
    use std::path::Path;

    struct NoPrompt;

    impl TypePrompt for NoPrompt {
        fn classify(&mut self, _file_name: &str) -> Option<LabelType> {
            None
        }
    }

    struct Always(HexColor);

    impl ColorPicker for Always {
        fn pick_color(&mut self, _order_name: &str, _current: Option<HexColor>) -> Option<HexColor> {
            Some(self.0)
        }
    }

    #[derive(Default)]
    struct RecordingOpener {
        opened: RefCell<Vec<PathBuf>>,
    }

    impl FileOpener for RecordingOpener {
        fn open(&self, path: &Path) -> std::io::Result<()> {
            self.opened.borrow_mut().push(path.to_path_buf());
            Ok(())
        }
    }

    fn state_in(dir: &Path) -> CoreState {
        CoreState::new(Settings {
            history_file: Some(dir.join("order_history.json")),
            export_dir: Some(dir.join("exports")),
            ..Default::default()
        })
    }

    fn chip(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, b"chip").unwrap();
        path
    }

    #[test]
    fn select_then_create_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_in(dir.path());
        let mut picker = PresetFiles {
            envelopes: vec![chip(dir.path(), "Acme Envelopes 1-100.csv")],
            letters: vec![chip(dir.path(), "Acme Letters 1-100.csv")],
        };
        let mut colors = Always(HexColor([0x20, 0x40, 0x80]));

        for label_type in LabelType::ALL {
            select_files(&state, label_type, &mut picker, &mut NoPrompt, &mut colors).unwrap();
        }
        assert_eq!(list_labels(&state).unwrap().len(), 2);
        assert_eq!(attach_qr(&state, "Acme", "https://example.com").unwrap(), None);

        let opener = RecordingOpener::default();
        let outcome = create_pdf(&state, "Acme run", None, true, &opener).unwrap();
        assert_eq!(outcome.path, dir.path().join("exports").join("Acme run.pdf"));
        assert_eq!(opener.opened.borrow().as_slice(), &[outcome.path.clone()]);
    }

    #[test]
    fn create_pdf_validates_name_and_records() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_in(dir.path());
        let opener = RecordingOpener::default();

        assert_eq!(
            create_pdf(&state, "  ", None, false, &opener).unwrap_err(),
            "Document name is required"
        );
        let err = create_pdf(&state, "empty", None, false, &opener).unwrap_err();
        assert!(err.contains("No labels"));
        assert!(opener.opened.borrow().is_empty());
    }

    #[test]
    fn attach_qr_error_is_displayable() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_in(dir.path());
        let err = attach_qr(&state, "Nobody", "x").unwrap_err();
        assert!(err.contains("Nobody"));
    }

    #[test]
    fn reset_empties_list() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_in(dir.path());
        let mut picker = PresetFiles {
            envelopes: vec![chip(dir.path(), "Acme Envelopes 1-100.csv")],
            letters: vec![],
        };
        select_files(&state, LabelType::Envelope, &mut picker, &mut NoPrompt, &mut Always(HexColor::BLACK))
            .unwrap();
        assert_eq!(order_choices(&state).unwrap().len(), 1);

        reset_labels(&state).unwrap();
        assert!(list_labels(&state).unwrap().is_empty());
    }
}
