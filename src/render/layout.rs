//! Page layout: records → per-page display lists.
//!
//! All coordinates are printer dots from the page's top-left corner. The PDF
//! backend does the unit and axis conversion.

use std::collections::HashMap;

use image::GrayImage;

use super::{render_qr, RenderError, SheetGeometry};
use crate::models::{ColoredRecord, HexColor};

/// Caption color. Values use the order color.
pub const CAPTION_COLOR: HexColor = HexColor::BLACK;

const BORDER_STROKE: u32 = 3;
const DIVIDER_STROKE: u32 = 5;

const CAPTION_SIZE: u32 = 50;
const VALUE_SIZE: u32 = 60;
const COUNT_SIZE: u32 = 50;

/// Which label field a text run belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelField {
    OrderName,
    Batch,
    RecordCount,
    Type,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextRole {
    Caption,
    Value,
}

/// One drawing instruction, in dots.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Rect {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        stroke: u32,
    },
    Line {
        x1: u32,
        y1: u32,
        x2: u32,
        y2: u32,
        stroke: u32,
    },
    /// `y` is the top of the text box.
    Text {
        x: u32,
        y: u32,
        size: u32,
        color: HexColor,
        field: LabelField,
        role: TextRole,
        text: String,
    },
    Qr {
        x: u32,
        y: u32,
        image: GrayImage,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CellLayout {
    /// Index into the full record list.
    pub record_index: usize,
    pub row: u32,
    pub col: u32,
    pub ops: Vec<DrawOp>,
}

impl CellLayout {
    pub fn texts(&self) -> impl Iterator<Item = (&LabelField, &TextRole, &str)> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { field, role, text, .. } => Some((field, role, text.as_str())),
            _ => None,
        })
    }

    pub fn value_of(&self, wanted: LabelField) -> Option<&str> {
        self.texts()
            .find(|(field, role, _)| **field == wanted && **role == TextRole::Value)
            .map(|(_, _, text)| text)
    }

    pub fn qr(&self) -> Option<&GrayImage> {
        self.ops.iter().find_map(|op| match op {
            DrawOp::Qr { image, .. } => Some(image),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    pub index: usize,
    pub cells: Vec<CellLayout>,
}

/// Split records into pages of `rows * cols` and lay out every cell.
///
/// Records keep their order; slot `i` on a page goes to
/// [`SheetGeometry::slot_position`]. QR payloads are looked up by order name
/// and encoded once per order.
pub fn layout_pages(
    records: &[ColoredRecord],
    qr_payloads: &HashMap<String, String>,
    geometry: &SheetGeometry,
) -> Result<Vec<PageLayout>, RenderError> {
    geometry.validate()?;

    let mut qr_cache: HashMap<&str, GrayImage> = HashMap::new();
    let mut pages = Vec::with_capacity(geometry.page_count(records.len()));

    for (page_index, chunk) in records.chunks(geometry.per_page()).enumerate() {
        let mut cells = Vec::with_capacity(chunk.len());
        for (slot, colored) in chunk.iter().enumerate() {
            let (row, col) = geometry.slot_position(slot);
            let order = colored.record.order_name.as_str();

            let qr = match qr_payloads.get(order) {
                Some(payload) => {
                    if !qr_cache.contains_key(order) {
                        qr_cache.insert(order, render_qr(payload, geometry.qr_size)?);
                    }
                    qr_cache.get(order).cloned()
                }
                None => None,
            };

            cells.push(CellLayout {
                record_index: page_index * geometry.per_page() + slot,
                row,
                col,
                ops: cell_ops(colored, qr, geometry, row, col),
            });
        }
        pages.push(PageLayout { index: page_index, cells });
    }

    tracing::debug!(records = records.len(), pages = pages.len(), "Label pages laid out");
    Ok(pages)
}

fn cell_ops(
    colored: &ColoredRecord,
    qr: Option<GrayImage>,
    geometry: &SheetGeometry,
    row: u32,
    col: u32,
) -> Vec<DrawOp> {
    let (x, y) = geometry.cell_origin(row, col);
    let (w, h) = (geometry.cell_width, geometry.cell_height);
    let record = &colored.record;
    let value_color = colored.color.unwrap_or(HexColor::BLACK);

    let caption = |dx: u32, dy: u32, field: LabelField, text: &str| DrawOp::Text {
        x: x + dx,
        y: y + dy,
        size: CAPTION_SIZE,
        color: CAPTION_COLOR,
        field,
        role: TextRole::Caption,
        text: text.to_string(),
    };
    let value = |dx: u32, dy: u32, size: u32, field: LabelField, text: String| DrawOp::Text {
        x: x + dx,
        y: y + dy,
        size,
        color: value_color,
        field,
        role: TextRole::Value,
        text,
    };

    let divider_x = x + w.saturating_sub(450) / 2;
    let mut ops = vec![
        DrawOp::Rect { x, y, width: w, height: h, stroke: BORDER_STROKE },
        DrawOp::Line {
            x1: divider_x,
            y1: y + 200,
            x2: divider_x,
            y2: (y + h).saturating_sub(100),
            stroke: DIVIDER_STROKE,
        },
        caption(20, 20, LabelField::OrderName, "Order Name & Number:"),
        value(30, 90, VALUE_SIZE, LabelField::OrderName, record.order_name.clone()),
        caption(20, 200, LabelField::Batch, "Chip #:"),
        value(30, 265, VALUE_SIZE, LabelField::Batch, record.batch_label()),
    ];

    if let Some(count) = record.record_count {
        ops.push(caption(400, 200, LabelField::RecordCount, "# of Records:"));
        ops.push(value(480, 265, COUNT_SIZE, LabelField::RecordCount, count.to_string()));
    }

    ops.push(caption(20, 360, LabelField::Type, "Type:"));
    ops.push(value(170, 360, VALUE_SIZE, LabelField::Type, record.label_type.as_str().to_string()));

    if let Some(image) = qr {
        ops.push(DrawOp::Qr {
            x: x + w - geometry.qr_size - geometry.qr_right_inset,
            y: y + geometry.qr_top_offset,
            image,
        });
    }

    ops
}
