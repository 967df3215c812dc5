//! Chip file name parsing.
//!
//! Naming convention:
//! `<order_name> <Envelopes|Letters> [Copy/List <n>] [-]<start>-<end>[.ext]`
//!
//! Hyphens are never rewritten before matching: the record range is found in
//! the raw text. Only the ends of the order name are trimmed of whitespace,
//! `-` and `_`, so `Acme-Envelopes-1-5` and `Acme Envelopes 1-5` agree.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::IntakeError;
use crate::models::LabelType;

static RANGE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)-(\d+)").unwrap());

/// A chip file whose order and type are known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedEntry {
    pub file_name: String,
    pub order_name: String,
    pub label_type: LabelType,
    pub record_count: Option<u32>,
}

/// A chip file name without a type marker. The operator has to say what it is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unclassified {
    pub file_name: String,
    base_name: String,
}

impl Unclassified {
    /// Resolve with the operator's answer. The whole base name is the order.
    pub fn classify(self, label_type: LabelType) -> Result<ParsedEntry, IntakeError> {
        build_entry(&self.file_name, &self.base_name, &self.base_name, "", label_type)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    Parsed(ParsedEntry),
    NeedsClassification(Unclassified),
}

/// Parse a chip file on disk. Missing or non-file paths are rejected.
pub fn parse_path(path: &Path) -> Result<ParseOutcome, IntakeError> {
    if !path.is_file() {
        return Err(IntakeError::Inaccessible(path.display().to_string()));
    }
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| IntakeError::InvalidName(path.display().to_string()))?;
    parse_file_name(file_name)
}

/// Parse a bare file name (no filesystem access).
pub fn parse_file_name(file_name: &str) -> Result<ParseOutcome, IntakeError> {
    let base = strip_extension(file_name);

    let Some((label_type, at)) = find_marker(base) else {
        return Ok(ParseOutcome::NeedsClassification(Unclassified {
            file_name: file_name.to_string(),
            base_name: base.to_string(),
        }));
    };

    let before = &base[..at];
    let after = base[at + label_type.marker().len()..].trim();
    build_entry(file_name, base, before, after, label_type).map(ParseOutcome::Parsed)
}

/// Earliest marker in the name. When both appear, the first one wins.
fn find_marker(base: &str) -> Option<(LabelType, usize)> {
    LabelType::ALL
        .iter()
        .filter_map(|t| base.find(t.marker()).map(|at| (*t, at)))
        .min_by_key(|(_, at)| *at)
}

fn strip_extension(file_name: &str) -> &str {
    Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name)
}

fn trim_order(raw: &str) -> &str {
    raw.trim_matches(|c: char| c.is_whitespace() || c == '-' || c == '_')
}

fn build_entry(
    file_name: &str,
    base: &str,
    before_marker: &str,
    after_marker: &str,
    label_type: LabelType,
) -> Result<ParsedEntry, IntakeError> {
    let mut order_name = trim_order(before_marker);

    // With nothing after the marker the range may sit anywhere in the name.
    let haystack = if after_marker.is_empty() { base } else { after_marker };
    let mut record_count = None;

    if let Some(caps) = RANGE_PATTERN.captures(haystack) {
        record_count = count_from_range(&caps[1], &caps[2]);
        if after_marker.is_empty() {
            let range_start = caps.get(0).map_or(usize::MAX, |m| m.start());
            if range_start < before_marker.len() {
                order_name = trim_order(&base[..range_start]);
            }
        }
    }

    if order_name.is_empty() {
        return Err(IntakeError::EmptyOrderName(file_name.to_string()));
    }

    Ok(ParsedEntry {
        file_name: file_name.to_string(),
        order_name: order_name.to_string(),
        label_type,
        record_count,
    })
}

/// Inclusive range size. Reversed or overflowing ranges count as absent.
fn count_from_range(start: &str, end: &str) -> Option<u32> {
    let start: u32 = start.parse().ok()?;
    let end: u32 = end.parse().ok()?;
    end.checked_sub(start)?.checked_add(1)
}
