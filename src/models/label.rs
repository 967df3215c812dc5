use serde::{Deserialize, Serialize};

use super::{HexColor, LabelType};

/// One printable label: a chip file within its (order, type) group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelRecord {
    pub order_name: String,
    pub label_type: LabelType,
    /// 1-based position within the (order, type) group.
    pub batch_index: u32,
    pub batch_total: u32,
    pub record_count: Option<u32>,
    /// File name the record was built from (display only).
    pub source_file: String,
}

impl LabelRecord {
    /// Group key used for dedup and batch numbering.
    pub fn key(&self) -> (&str, LabelType) {
        (self.order_name.as_str(), self.label_type)
    }

    /// "i of N" as printed on the label.
    pub fn batch_label(&self) -> String {
        format!("{} of {}", self.batch_index, self.batch_total)
    }
}

/// A record paired with the color it is printed in. `None` prints black.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColoredRecord {
    pub record: LabelRecord,
    pub color: Option<HexColor>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_label_format() {
        let record = LabelRecord {
            order_name: "Acme Corp".into(),
            label_type: LabelType::Envelope,
            batch_index: 2,
            batch_total: 3,
            record_count: Some(167),
            source_file: "Acme Corp Envelopes-1-167.bin".into(),
        };
        assert_eq!(record.batch_label(), "2 of 3");
        assert_eq!(record.key(), ("Acme Corp", LabelType::Envelope));
    }
}
