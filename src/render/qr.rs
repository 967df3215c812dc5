//! QR payload → square black-on-white raster.

use image::imageops::{self, FilterType};
use image::{GrayImage, Luma};
use qrcode::{Color, QrCode};

use super::RenderError;

/// Light modules around the symbol (ISO/IEC 18004 minimum).
pub const QUIET_ZONE_MODULES: u32 = 4;

const DARK: Luma<u8> = Luma([0]);
const LIGHT: Luma<u8> = Luma([255]);

/// Encode `payload` (default error correction, smallest fitting version)
/// and resize the symbol to `size` x `size` dots.
///
/// Same payload and size always give the same pixels.
pub fn render_qr(payload: &str, size: u32) -> Result<GrayImage, RenderError> {
    if payload.trim().is_empty() {
        return Err(RenderError::EmptyQrPayload);
    }
    if size == 0 {
        return Err(RenderError::Geometry("QR size must be positive".into()));
    }

    let code = QrCode::new(payload.as_bytes())
        .map_err(|e| RenderError::Qr(format!("{e}")))?;
    let symbol = module_image(code.width() as u32, &code.to_colors());

    Ok(imageops::resize(&symbol, size, size, FilterType::Nearest))
}

/// One pixel per module, quiet zone included.
fn module_image(modules: u32, colors: &[Color]) -> GrayImage {
    let total = modules + 2 * QUIET_ZONE_MODULES;
    let mut canvas = GrayImage::from_pixel(total, total, LIGHT);
    for (i, color) in colors.iter().enumerate() {
        if *color == Color::Dark {
            let i = i as u32;
            canvas.put_pixel(
                i % modules + QUIET_ZONE_MODULES,
                i / modules + QUIET_ZONE_MODULES,
                DARK,
            );
        }
    }
    canvas
}

/// Count of dark pixels. Used to assert a QR region is not blank.
pub fn dark_pixels(image: &GrayImage) -> usize {
    image.pixels().filter(|p| p.0[0] < 128).count()
}
