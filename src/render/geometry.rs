//! Physical label sheet geometry, in printer dots.
//!
//! Defaults describe a US Letter sheet (8.5 x 11 in) at 300 dpi carrying a
//! 6 x 2 grid of 1100 x 450 dot labels.

use serde::{Deserialize, Serialize};

use super::RenderError;

/// Width the fixed label text needs left of the QR column, in dots.
/// Widest runs: "# of Records:" at 400 and a ten-digit count at 480.
pub const TEXT_BLOCK_WIDTH: u32 = 790;

/// Height from the cell top to the bottom of the "Type:" row.
pub const TEXT_BLOCK_HEIGHT: u32 = 420;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetGeometry {
    pub page_width: u32,
    pub page_height: u32,
    pub margin: u32,
    pub cell_width: u32,
    pub cell_height: u32,
    pub gap_x: u32,
    pub gap_y: u32,
    pub rows: u32,
    pub cols: u32,
    pub dpi: f32,
    /// Side of the square QR footprint.
    pub qr_size: u32,
    /// Distance from the cell's right border to the QR code.
    pub qr_right_inset: u32,
    /// Distance from the cell's top border to the QR code.
    pub qr_top_offset: u32,
}

impl Default for SheetGeometry {
    fn default() -> Self {
        Self {
            page_width: 2550,
            page_height: 3300,
            margin: 80,
            cell_width: 1100,
            cell_height: 450,
            gap_x: 150,
            gap_y: 80,
            rows: 6,
            cols: 2,
            dpi: 300.0,
            qr_size: 250,
            qr_right_inset: 20,
            qr_top_offset: 190,
        }
    }
}

impl SheetGeometry {
    pub fn per_page(&self) -> usize {
        (self.rows as usize).saturating_mul(self.cols as usize)
    }

    pub fn page_count(&self, records: usize) -> usize {
        records.div_ceil(self.per_page().max(1))
    }

    /// (row, col) of a slot on the page. Slots fill column-major: down
    /// column 0 first, then column 1. Label stock alignment depends on it.
    pub fn slot_position(&self, slot: usize) -> (u32, u32) {
        let slot = slot as u32;
        (slot % self.rows, slot / self.rows)
    }

    /// Top-left corner of the cell at (row, col).
    pub fn cell_origin(&self, row: u32, col: u32) -> (u32, u32) {
        (
            self.margin + col * (self.cell_width + self.gap_x),
            self.margin + row * (self.cell_height + self.gap_y),
        )
    }

    pub fn dots_to_mm(&self, dots: f32) -> f32 {
        dots * 25.4 / self.dpi
    }

    pub fn dots_to_pt(&self, dots: f32) -> f32 {
        dots * 72.0 / self.dpi
    }

    pub fn validate(&self) -> Result<(), RenderError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(RenderError::Geometry("grid needs at least one row and column".into()));
        }
        if self.dpi.is_nan() || self.dpi <= 0.0 {
            return Err(RenderError::Geometry(format!("dpi must be positive, got {}", self.dpi)));
        }

        let overflow = || RenderError::Geometry("sheet dimensions are out of range".into());
        self.rows.checked_mul(self.cols).ok_or_else(overflow)?;
        let right = grid_extent(self.margin, self.cols, self.cell_width, self.gap_x).ok_or_else(overflow)?;
        let bottom = grid_extent(self.margin, self.rows, self.cell_height, self.gap_y).ok_or_else(overflow)?;
        if right > self.page_width || bottom > self.page_height {
            return Err(RenderError::Geometry(format!(
                "{}x{} grid does not fit a {}x{} page",
                self.rows, self.cols, self.page_width, self.page_height
            )));
        }

        let qr_column = self.qr_size.checked_add(self.qr_right_inset).ok_or_else(overflow)?;
        let qr_bottom = self.qr_top_offset.checked_add(self.qr_size).ok_or_else(overflow)?;
        if qr_column > self.cell_width || qr_bottom > self.cell_height {
            return Err(RenderError::Geometry("QR footprint exceeds the cell".into()));
        }
        let needed_width = TEXT_BLOCK_WIDTH.checked_add(qr_column).ok_or_else(overflow)?;
        if needed_width > self.cell_width {
            return Err(RenderError::Geometry(format!(
                "cell width {} leaves no room for label text left of the QR code (needs {needed_width})",
                self.cell_width
            )));
        }
        if self.cell_height < TEXT_BLOCK_HEIGHT {
            return Err(RenderError::Geometry(format!(
                "cell height {} is below the label text height {}",
                self.cell_height, TEXT_BLOCK_HEIGHT
            )));
        }
        Ok(())
    }
}

/// Right (or bottom) edge of the last cell: margin + n cells + (n - 1) gaps.
fn grid_extent(margin: u32, count: u32, cell: u32, gap: u32) -> Option<u32> {
    let cells = count.checked_mul(cell)?;
    let gaps = count.saturating_sub(1).checked_mul(gap)?;
    margin.checked_add(cells)?.checked_add(gaps)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_sheet_is_letter_at_300_dpi() {
        let g = SheetGeometry::default();
        assert_eq!(g.per_page(), 12);
        assert!((g.dots_to_mm(g.page_width as f32) - 215.9).abs() < 0.01);
        assert!((g.dots_to_mm(g.page_height as f32) - 279.4).abs() < 0.01);
        g.validate().unwrap();
    }

    #[test]
    fn fill_is_column_major() {
        let g = SheetGeometry::default();
        assert_eq!(g.slot_position(0), (0, 0));
        assert_eq!(g.slot_position(1), (1, 0));
        assert_eq!(g.slot_position(5), (5, 0));
        assert_eq!(g.slot_position(6), (0, 1));
        assert_eq!(g.slot_position(11), (5, 1));
    }

    #[test]
    fn cell_origins_follow_margins_and_gaps() {
        let g = SheetGeometry::default();
        assert_eq!(g.cell_origin(0, 0), (80, 80));
        assert_eq!(g.cell_origin(1, 0), (80, 610));
        assert_eq!(g.cell_origin(0, 1), (1330, 80));
        assert_eq!(g.cell_origin(5, 1), (1330, 2730));
    }

    #[test]
    fn page_count_rounds_up() {
        let g = SheetGeometry::default();
        assert_eq!(g.page_count(0), 0);
        assert_eq!(g.page_count(12), 1);
        assert_eq!(g.page_count(13), 2);
    }

    #[test]
    fn rejects_empty_grid_and_overflow() {
        let g = SheetGeometry { rows: 0, ..Default::default() };
        assert!(matches!(g.validate(), Err(RenderError::Geometry(_))));

        let g = SheetGeometry { rows: 7, ..Default::default() };
        assert!(matches!(g.validate(), Err(RenderError::Geometry(_))));

        let g = SheetGeometry { qr_size: 400, ..Default::default() };
        assert!(matches!(g.validate(), Err(RenderError::Geometry(_))));
    }

    #[test]
    fn rejects_cells_too_small_for_text() {
        // Record count would sit under the QR code.
        let g = SheetGeometry { cell_width: 700, ..Default::default() };
        assert!(matches!(g.validate(), Err(RenderError::Geometry(_))));

        // Lower text rows would fall below the cell.
        let g = SheetGeometry { cell_height: 300, qr_size: 100, ..Default::default() };
        assert!(matches!(g.validate(), Err(RenderError::Geometry(_))));
    }

    #[test]
    fn huge_values_are_rejected_not_overflowed() {
        for g in [
            SheetGeometry { rows: 100_000_000, ..Default::default() },
            SheetGeometry { cols: u32::MAX, ..Default::default() },
            SheetGeometry { margin: u32::MAX, ..Default::default() },
            SheetGeometry { qr_size: u32::MAX, ..Default::default() },
            SheetGeometry { gap_y: u32::MAX, ..Default::default() },
        ] {
            assert!(matches!(g.validate(), Err(RenderError::Geometry(_))));
        }
    }

    #[test]
    fn partial_settings_fall_back_to_defaults() {
        let g: SheetGeometry = serde_json::from_str(r#"{"rows": 5}"#).unwrap();
        assert_eq!(g.rows, 5);
        assert_eq!(g.cols, 2);
        assert_eq!(g.cell_width, 1100);
    }
}
