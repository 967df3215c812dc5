//! PDF backend: paints [`PageLayout`]s with `printpdf`.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use printpdf::*;
use serde::{Deserialize, Serialize};

use super::{DrawOp, PageLayout, RenderError, SheetGeometry};
use crate::models::HexColor;

/// Share of the font size above the baseline. Layout positions are text-box
/// tops, PDF text is placed by baseline.
const ASCENT_RATIO: f32 = 0.8;

/// Where label text glyphs come from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "path")]
pub enum FontSource {
    /// Helvetica-Bold, always available.
    #[default]
    Builtin,
    /// A TrueType file. Missing at render time is an error.
    File(PathBuf),
}

impl FontSource {
    /// Fail early when a configured font file is gone.
    pub fn check(&self) -> Result<(), RenderError> {
        match self {
            Self::Builtin => Ok(()),
            Self::File(path) if path.is_file() => Ok(()),
            Self::File(path) => Err(RenderError::FontMissing(path.clone())),
        }
    }
}

/// Render pages into one multi-page PDF. Returns PDF bytes.
pub fn generate_labels_pdf(
    pages: &[PageLayout],
    geometry: &SheetGeometry,
    font: &FontSource,
    title: &str,
) -> Result<Vec<u8>, RenderError> {
    if pages.is_empty() {
        return Err(RenderError::NoPages);
    }
    font.check()?;

    let width = Mm(geometry.dots_to_mm(geometry.page_width as f32));
    let height = Mm(geometry.dots_to_mm(geometry.page_height as f32));

    let (doc, first_page, first_layer) = PdfDocument::new(title, width, height, "Labels");
    let font_ref = match font {
        FontSource::Builtin => doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| RenderError::Pdf(format!("font error: {e}")))?,
        FontSource::File(path) => {
            let file = File::open(path).map_err(|_| RenderError::FontMissing(path.clone()))?;
            doc.add_external_font(file)
                .map_err(|e| RenderError::Pdf(format!("font error: {e}")))?
        }
    };

    for (i, page) in pages.iter().enumerate() {
        let (page_index, layer_index) = if i == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(width, height, "Labels")
        };
        let layer = doc.get_page(page_index).get_layer(layer_index);
        let painter = Painter { layer, geometry, font: &font_ref };
        for cell in &page.cells {
            for op in &cell.ops {
                painter.draw(op);
            }
        }
    }

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|e| RenderError::Pdf(format!("save error: {e}")))?;
    let bytes = buf
        .into_inner()
        .map_err(|e| RenderError::Pdf(format!("buffer error: {e}")))?;

    tracing::info!(pages = pages.len(), bytes = bytes.len(), "Label PDF generated");
    Ok(bytes)
}

struct Painter<'a> {
    layer: PdfLayerReference,
    geometry: &'a SheetGeometry,
    font: &'a IndirectFontRef,
}

impl Painter<'_> {
    fn mm(&self, dots: u32) -> Mm {
        Mm(self.geometry.dots_to_mm(dots as f32))
    }

    /// PDF y axis points up from the bottom edge.
    fn mm_from_top(&self, dots: f32) -> Mm {
        Mm(self.geometry.dots_to_mm(self.geometry.page_height as f32 - dots))
    }

    fn point(&self, x: u32, y: u32) -> (Point, bool) {
        (Point::new(self.mm(x), self.mm_from_top(y as f32)), false)
    }

    fn set_stroke(&self, stroke: u32) {
        self.layer.set_outline_color(pdf_color(HexColor::BLACK));
        self.layer
            .set_outline_thickness(self.geometry.dots_to_pt(stroke as f32));
    }

    fn draw(&self, op: &DrawOp) {
        match op {
            DrawOp::Rect { x, y, width, height, stroke } => {
                self.set_stroke(*stroke);
                self.layer.add_line(Line {
                    points: vec![
                        self.point(*x, *y),
                        self.point(x + width, *y),
                        self.point(x + width, y + height),
                        self.point(*x, y + height),
                    ],
                    is_closed: true,
                });
            }
            DrawOp::Line { x1, y1, x2, y2, stroke } => {
                self.set_stroke(*stroke);
                self.layer.add_line(Line {
                    points: vec![self.point(*x1, *y1), self.point(*x2, *y2)],
                    is_closed: false,
                });
            }
            DrawOp::Text { x, y, size, color, text, .. } => {
                self.layer.set_fill_color(pdf_color(*color));
                let baseline = *y as f32 + *size as f32 * ASCENT_RATIO;
                self.layer.use_text(
                    text.as_str(),
                    self.geometry.dots_to_pt(*size as f32),
                    self.mm(*x),
                    self.mm_from_top(baseline),
                    self.font,
                );
            }
            DrawOp::Qr { x, y, image } => {
                let (w, h) = image.dimensions();
                let xobject = ImageXObject {
                    width: Px(w as usize),
                    height: Px(h as usize),
                    color_space: ColorSpace::Greyscale,
                    bits_per_component: ColorBits::Bit8,
                    interpolate: false,
                    image_data: image.as_raw().clone(),
                    image_filter: None,
                    smask: None,
                    clipping_bbox: None,
                };
                // Placed by its lower-left corner; at the sheet dpi one image
                // pixel is one dot.
                Image::from(xobject).add_to_layer(
                    self.layer.clone(),
                    ImageTransform {
                        translate_x: Some(self.mm(*x)),
                        translate_y: Some(self.mm_from_top((y + h) as f32)),
                        dpi: Some(self.geometry.dpi),
                        ..Default::default()
                    },
                );
            }
        }
    }
}

fn pdf_color(color: HexColor) -> Color {
    let (r, g, b) = color.unit_rgb();
    Color::Rgb(Rgb::new(r, g, b, None))
}
