//! The label session: everything one operator builds between resets.
//!
//! Holds the record list, the shown-files filter, the order color registry
//! and the per-order QR payloads. Collaborators are passed in per call.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::collaborators::{ColorPicker, FilePicker, OutputDirResolver, TypePrompt};
use crate::colors::{HistoryError, HistorySwatch, OrderColorRegistry};
use crate::intake::{append_entries, parse_path, IntakeError, ParseOutcome, ParsedEntry, ShownFiles};
use crate::models::{ColoredRecord, HexColor, LabelRecord, LabelType};
use crate::render::{
    export_pdf_to_file, generate_labels_pdf, layout_pages, FontSource, RenderError, SheetGeometry,
};

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Order name is empty")]
    EmptyOrderName,

    #[error("Order '{0}' is not in the current label list")]
    UnknownOrder(String),

    #[error("QR payload is empty")]
    EmptyQrPayload,

    #[error("Order history could not be saved: {0}")]
    History(#[from] HistoryError),
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("No labels to print; select some files first")]
    NoRecords,

    #[error("Cannot resolve output directory: {0}")]
    OutputDir(#[source] std::io::Error),

    #[error(transparent)]
    Render(#[from] RenderError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Missing, unreadable, or not a regular file.
    Missing,
    /// Operator answered "none" to the classification prompt.
    Unclassified,
    /// Nothing left of the order name after trimming.
    EmptyName,
    /// File name is not valid UTF-8.
    InvalidName,
}

impl From<&IntakeError> for SkipReason {
    fn from(e: &IntakeError) -> Self {
        match e {
            IntakeError::Inaccessible(_) => Self::Missing,
            IntakeError::InvalidName(_) => Self::InvalidName,
            IntakeError::EmptyOrderName(_) => Self::EmptyName,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFile {
    pub file: String,
    pub reason: SkipReason,
}

/// What one selection did, for display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SelectionReport {
    pub added: usize,
    pub newly_shown: Vec<(LabelType, String)>,
    pub skipped: Vec<SkippedFile>,
    /// Files dropped because their (order, type) was already listed.
    pub duplicates: Vec<String>,
    /// Orders in this selection the color picker left without a color.
    pub uncolored_orders: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderChoice {
    pub order_name: String,
    pub has_qr: bool,
}

/// Rendering parameters for one export.
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    pub geometry: SheetGeometry,
    pub font: FontSource,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportOutcome {
    pub path: PathBuf,
    pub pages: usize,
    pub labels: usize,
    /// False when the PDF was written but the order history was not.
    pub history_saved: bool,
}

pub struct LabelSession {
    records: Vec<LabelRecord>,
    shown: ShownFiles,
    colors: OrderColorRegistry,
    qr_payloads: HashMap<String, String>,
}

impl LabelSession {
    pub fn new(colors: OrderColorRegistry) -> Self {
        Self {
            records: Vec::new(),
            shown: ShownFiles::default(),
            colors,
            qr_payloads: HashMap::new(),
        }
    }

    pub fn records(&self) -> &[LabelRecord] {
        &self.records
    }

    pub fn colors(&self) -> &OrderColorRegistry {
        &self.colors
    }

    /// Ask the picker for files of one type, then add them.
    pub fn select_files(
        &mut self,
        label_type: LabelType,
        picker: &mut dyn FilePicker,
        prompt: &mut dyn TypePrompt,
        colors: &mut dyn ColorPicker,
    ) -> SelectionReport {
        let paths = picker.pick_files(label_type);
        tracing::debug!(label_type = label_type.as_str(), files = paths.len(), "Files picked");
        self.add_files(&paths, prompt, colors)
    }

    /// Parse, classify and append a batch of chip files.
    ///
    /// Bad files are skipped and reported; the rest of the batch still goes
    /// through. Any order the batch added labels for that has no color yet is
    /// put to the color picker.
    pub fn add_files(
        &mut self,
        paths: &[PathBuf],
        prompt: &mut dyn TypePrompt,
        colors: &mut dyn ColorPicker,
    ) -> SelectionReport {
        let mut report = SelectionReport::default();
        let mut entries: Vec<ParsedEntry> = Vec::with_capacity(paths.len());

        for path in paths {
            match self.parse_one(path, prompt) {
                Ok(Some(entry)) => entries.push(entry),
                Ok(None) => {
                    tracing::info!(file = %path.display(), "File left unclassified, skipping");
                    report.skipped.push(SkippedFile {
                        file: display_name(path),
                        reason: SkipReason::Unclassified,
                    });
                }
                Err(e) => {
                    tracing::warn!(file = %path.display(), error = %e, "Skipping chip file");
                    report.skipped.push(SkippedFile {
                        file: display_name(path),
                        reason: SkipReason::from(&e),
                    });
                }
            }
        }

        let outcome = append_entries(&mut self.records, &mut self.shown, entries);
        report.added = outcome.added;
        report.newly_shown = outcome.newly_shown;
        report.duplicates = outcome.duplicates;

        for order in outcome.batch_orders {
            if self.colors.get(&order).is_some() {
                continue;
            }
            match colors.pick_color(&order, None) {
                Some(color) => self.colors.set_session_color(&order, color),
                None => report.uncolored_orders.push(order),
            }
        }

        tracing::info!(
            added = report.added,
            skipped = report.skipped.len(),
            duplicates = report.duplicates.len(),
            total = self.records.len(),
            "Selection processed"
        );
        report
    }

    fn parse_one(
        &self,
        path: &Path,
        prompt: &mut dyn TypePrompt,
    ) -> Result<Option<ParsedEntry>, IntakeError> {
        match parse_path(path)? {
            ParseOutcome::Parsed(entry) => Ok(Some(entry)),
            ParseOutcome::NeedsClassification(pending) => match prompt.classify(&pending.file_name) {
                Some(label_type) => pending.classify(label_type).map(Some),
                None => Ok(None),
            },
        }
    }

    /// Operator recolor. Persists history; the new color is in effect even
    /// if saving fails.
    pub fn recolor(&mut self, order_name: &str, color: HexColor) -> Result<(), SessionError> {
        let order_name = order_name.trim();
        if order_name.is_empty() {
            return Err(SessionError::EmptyOrderName);
        }
        self.colors.assign(order_name, color)?;
        Ok(())
    }

    /// Re-seed colors from history (the "refresh" action).
    pub fn refresh_colors(&mut self) {
        self.colors.reload();
    }

    /// Attach a QR payload to an order in the list. Returns the payload it
    /// replaced, if any.
    pub fn attach_qr(&mut self, order_name: &str, payload: &str) -> Result<Option<String>, SessionError> {
        let payload = payload.trim();
        if payload.is_empty() {
            return Err(SessionError::EmptyQrPayload);
        }
        if !self.records.iter().any(|r| r.order_name == order_name) {
            return Err(SessionError::UnknownOrder(order_name.to_string()));
        }
        let previous = self
            .qr_payloads
            .insert(order_name.to_string(), payload.to_string());
        tracing::info!(order = %order_name, replaced = previous.is_some(), "QR payload attached");
        Ok(previous)
    }

    pub fn qr_payload(&self, order_name: &str) -> Option<&str> {
        self.qr_payloads.get(order_name).map(String::as_str)
    }

    /// Unique orders in list order.
    pub fn order_choices(&self) -> Vec<OrderChoice> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .filter(|r| seen.insert(r.order_name.as_str()))
            .map(|r| OrderChoice {
                order_name: r.order_name.clone(),
                has_qr: self.qr_payloads.contains_key(&r.order_name),
            })
            .collect()
    }

    pub fn colored_records(&self) -> Vec<ColoredRecord> {
        self.records
            .iter()
            .map(|r| ColoredRecord {
                record: r.clone(),
                color: self.colors.get(&r.order_name),
            })
            .collect()
    }

    /// Start over: records, shown files, QR payloads and session-only colors
    /// go; colors from history come back.
    pub fn reset(&mut self) {
        self.records.clear();
        self.shown.clear();
        self.qr_payloads.clear();
        self.colors.clear_session();
        self.colors.reload();
        tracing::info!("Label session reset");
    }

    pub fn history_view(&self) -> Vec<HistorySwatch> {
        self.colors.history_view()
    }

    /// Render the list to a PDF named `name` in the resolver's directory and
    /// record the exported orders in the history.
    ///
    /// Session state is untouched on failure, so the export can be retried.
    pub fn export(
        &mut self,
        name: &str,
        options: &ExportOptions,
        resolver: &dyn OutputDirResolver,
    ) -> Result<ExportOutcome, ExportError> {
        if self.records.is_empty() {
            return Err(ExportError::NoRecords);
        }

        let colored = self.colored_records();
        let pages = layout_pages(&colored, &self.qr_payloads, &options.geometry)?;
        let bytes = generate_labels_pdf(&pages, &options.geometry, &options.font, name)?;
        let dir = resolver.output_dir().map_err(ExportError::OutputDir)?;
        let path = export_pdf_to_file(&bytes, name, &dir)?;

        let orders: Vec<String> = self.order_choices().into_iter().map(|c| c.order_name).collect();
        let history_saved = match self.colors.record_export(orders.iter().map(String::as_str)) {
            Ok(touched) => {
                tracing::debug!(orders = touched, "Order history updated");
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "Order history not saved after export");
                false
            }
        };

        Ok(ExportOutcome {
            path,
            pages: pages.len(),
            labels: colored.len(),
            history_saved,
        })
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
