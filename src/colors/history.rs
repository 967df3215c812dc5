//! Recently touched orders and their colors.
//!
//! Stored as a JSON array ordered oldest → newest:
//! `[{"order_name": "Acme", "color": "FF0000"}, ...]`.
//! The whole list is rewritten on every change.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::HistoryError;
use crate::models::HexColor;

/// Orders kept in the history file unless settings say otherwise.
pub const DEFAULT_HISTORY_CAPACITY: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub order_name: String,
    pub color: HexColor,
}

/// Move `order_name` to the newest end with `color`, then trim the oldest
/// entries until at most `capacity` remain.
pub fn upsert_history(
    entries: &mut Vec<HistoryEntry>,
    order_name: &str,
    color: HexColor,
    capacity: usize,
) {
    entries.retain(|e| e.order_name != order_name);
    entries.push(HistoryEntry {
        order_name: order_name.to_string(),
        color,
    });
    trim_history(entries, capacity);
}

pub fn trim_history(entries: &mut Vec<HistoryEntry>, capacity: usize) {
    if entries.len() > capacity {
        let excess = entries.len() - capacity;
        entries.drain(..excess);
    }
}

/// Rebuild a clean list from raw stored entries: later duplicates win,
/// capacity enforced.
pub fn normalize_history(raw: Vec<HistoryEntry>, capacity: usize) -> Vec<HistoryEntry> {
    let mut entries = Vec::with_capacity(raw.len().min(capacity));
    for entry in raw {
        upsert_history(&mut entries, &entry.order_name, entry.color, capacity);
    }
    entries
}

/// Persistence seam for the order history.
pub trait HistoryStore: Send + Sync {
    /// Stored entries, oldest first. A store that does not exist yet is empty.
    fn load(&self) -> Result<Vec<HistoryEntry>, HistoryError>;

    /// Replace the stored list.
    fn save(&self, entries: &[HistoryEntry]) -> Result<(), HistoryError>;
}

/// History kept in a JSON file.
#[derive(Debug, Clone)]
pub struct JsonHistoryStore {
    path: PathBuf,
}

impl JsonHistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HistoryStore for JsonHistoryStore {
    fn load(&self) -> Result<Vec<HistoryEntry>, HistoryError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let data = std::fs::read_to_string(&self.path)?;
        if data.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&data)?)
    }

    fn save(&self, entries: &[HistoryEntry]) -> Result<(), HistoryError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn color(hex: &str) -> HexColor {
        hex.parse().unwrap()
    }

    fn names(entries: &[HistoryEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.order_name.as_str()).collect()
    }

    #[test]
    fn recolor_keeps_one_entry_at_newest_end() {
        let mut entries = Vec::new();
        upsert_history(&mut entries, "Acme", color("FF0000"), 20);
        upsert_history(&mut entries, "Globex", color("0000FF"), 20);
        upsert_history(&mut entries, "Acme", color("00FF00"), 20);

        assert_eq!(names(&entries), vec!["Globex", "Acme"]);
        let acme: Vec<_> = entries.iter().filter(|e| e.order_name == "Acme").collect();
        assert_eq!(acme.len(), 1);
        assert_eq!(acme[0].color, color("00FF00"));
    }

    #[test]
    fn capacity_evicts_exactly_the_oldest() {
        let capacity = 3;
        let mut entries = Vec::new();
        for name in ["a", "b", "c"] {
            upsert_history(&mut entries, name, color("111111"), capacity);
        }
        // Touch "a" so "b" becomes the least recently touched.
        upsert_history(&mut entries, "a", color("222222"), capacity);
        upsert_history(&mut entries, "d", color("333333"), capacity);

        assert_eq!(entries.len(), capacity);
        assert_eq!(names(&entries), vec!["c", "a", "d"]);
    }

    #[test]
    fn size_never_exceeds_capacity() {
        let mut entries = Vec::new();
        for i in 0..50 {
            upsert_history(&mut entries, &format!("order-{i}"), color("ABCDEF"), 10);
            assert!(entries.len() <= 10);
        }
        assert_eq!(entries.first().unwrap().order_name, "order-40");
        assert_eq!(entries.last().unwrap().order_name, "order-49");
    }

    #[test]
    fn normalize_collapses_duplicates_and_trims() {
        let raw = vec![
            HistoryEntry { order_name: "a".into(), color: color("000001") },
            HistoryEntry { order_name: "b".into(), color: color("000002") },
            HistoryEntry { order_name: "a".into(), color: color("000003") },
            HistoryEntry { order_name: "c".into(), color: color("000004") },
        ];
        let entries = normalize_history(raw, 2);
        assert_eq!(names(&entries), vec!["a", "c"]);
        assert_eq!(entries[0].color, color("000003"));
    }

    #[test]
    fn json_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonHistoryStore::new(dir.path().join("nested").join("order_history.json"));

        assert!(store.load().unwrap().is_empty());

        let entries = vec![HistoryEntry {
            order_name: "Acme".into(),
            color: color("ff8800"),
        }];
        store.save(&entries).unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("\"order_name\": \"Acme\""));
        assert!(raw.contains("\"color\": \"FF8800\""));
        assert_eq!(store.load().unwrap(), entries);
    }

    #[test]
    fn json_store_reads_plain_array_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("order_history.json");
        std::fs::write(&path, r#"[{"order_name": "Acme", "color": "ff0000"}]"#).unwrap();
        let loaded = JsonHistoryStore::new(&path).load().unwrap();
        assert_eq!(loaded[0].color, HexColor([255, 0, 0]));
    }

    #[test]
    fn json_store_reports_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("order_history.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = JsonHistoryStore::new(&path).load().unwrap_err();
        assert!(matches!(err, HistoryError::Malformed(_)));
    }
}
