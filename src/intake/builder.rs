//! Label record construction: dedup, batch numbering, shown-file tracking.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::ParsedEntry;
use crate::models::{LabelRecord, LabelType};

/// File names already listed to the operator, per label type.
///
/// Independent of record dedup: it only decides what shows up as "newly
/// selected", never whether a record is created.
#[derive(Debug, Clone, Default)]
pub struct ShownFiles {
    by_type: HashMap<LabelType, HashSet<String>>,
}

impl ShownFiles {
    /// Returns true if the name was not shown before for this type.
    pub fn mark(&mut self, label_type: LabelType, file_name: &str) -> bool {
        self.by_type
            .entry(label_type)
            .or_default()
            .insert(file_name.to_string())
    }

    pub fn contains(&self, label_type: LabelType, file_name: &str) -> bool {
        self.by_type
            .get(&label_type)
            .is_some_and(|names| names.contains(file_name))
    }

    pub fn clear(&mut self) {
        self.by_type.clear();
    }
}

/// What one call to [`append_entries`] did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildOutcome {
    pub added: usize,
    /// (type, file name) pairs shown to the operator for the first time.
    pub newly_shown: Vec<(LabelType, String)>,
    /// File names dropped because their (order, type) was already present.
    pub duplicates: Vec<String>,
    /// Distinct orders this batch added records for, in order.
    pub batch_orders: Vec<String>,
}

/// Append one selection batch to the session record list.
///
/// Entries whose (order, type) pair existed before this batch are dropped.
/// The same file name twice in one batch counts once. Batch numbers are
/// recomputed over the whole list afterwards.
pub fn append_entries(
    records: &mut Vec<LabelRecord>,
    shown: &mut ShownFiles,
    entries: Vec<ParsedEntry>,
) -> BuildOutcome {
    let known: HashSet<(String, LabelType)> = records
        .iter()
        .map(|r| (r.order_name.clone(), r.label_type))
        .collect();

    let mut outcome = BuildOutcome::default();
    let mut batch_files: HashSet<(LabelType, String)> = HashSet::new();

    for entry in entries {
        if known.contains(&(entry.order_name.clone(), entry.label_type)) {
            tracing::debug!(
                file = %entry.file_name,
                order = %entry.order_name,
                label_type = entry.label_type.as_str(),
                "Label already present, skipping"
            );
            outcome.duplicates.push(entry.file_name);
            continue;
        }
        if !batch_files.insert((entry.label_type, entry.file_name.clone())) {
            outcome.duplicates.push(entry.file_name);
            continue;
        }

        if shown.mark(entry.label_type, &entry.file_name) {
            outcome.newly_shown.push((entry.label_type, entry.file_name.clone()));
        }
        if !outcome.batch_orders.contains(&entry.order_name) {
            outcome.batch_orders.push(entry.order_name.clone());
        }

        records.push(LabelRecord {
            order_name: entry.order_name,
            label_type: entry.label_type,
            batch_index: 1,
            batch_total: 1,
            record_count: entry.record_count,
            source_file: entry.file_name,
        });
        outcome.added += 1;
    }

    renumber_batches(records);
    outcome
}

/// Number records 1..N within each (order, type) group, in list order.
pub fn renumber_batches(records: &mut [LabelRecord]) {
    let mut totals: HashMap<(String, LabelType), u32> = HashMap::new();
    for record in records.iter() {
        *totals
            .entry((record.order_name.clone(), record.label_type))
            .or_default() += 1;
    }

    let mut positions: HashMap<(String, LabelType), u32> = HashMap::new();
    for record in records.iter_mut() {
        let key = (record.order_name.clone(), record.label_type);
        let position = positions.entry(key.clone()).or_default();
        *position += 1;
        record.batch_index = *position;
        record.batch_total = totals.get(&key).copied().unwrap_or(*position);
    }
}
