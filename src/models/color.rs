//! Order colors and the text-contrast rule used wherever a color is shown
//! as a background.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ModelError;

/// Brightness above which a background counts as light.
pub const LIGHT_THRESHOLD: f64 = 186.0;

/// 24-bit RGB color stored as `RRGGBB` (no leading `#`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(pub [u8; 3]);

impl HexColor {
    pub const BLACK: HexColor = HexColor([0, 0, 0]);
    pub const WHITE: HexColor = HexColor([0xFF, 0xFF, 0xFF]);

    pub fn rgb(&self) -> (u8, u8, u8) {
        (self.0[0], self.0[1], self.0[2])
    }

    /// Components scaled to 0.0..=1.0 for PDF color operators.
    pub fn unit_rgb(&self) -> (f32, f32, f32) {
        let [r, g, b] = self.0;
        (r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    pub fn is_light(&self) -> bool {
        let (r, g, b) = self.rgb();
        is_light_rgb(r, g, b)
    }

    /// Text color that stays readable on top of this color.
    pub fn contrast_text(&self) -> HexColor {
        if self.is_light() {
            HexColor::BLACK
        } else {
            HexColor::WHITE
        }
    }
}

/// Perceived brightness: (r*299 + g*587 + b*114) / 1000.
pub fn brightness(r: u8, g: u8, b: u8) -> f64 {
    (r as f64 * 299.0 + g as f64 * 587.0 + b as f64 * 114.0) / 1000.0
}

pub fn is_light_rgb(r: u8, g: u8, b: u8) -> bool {
    brightness(r, g, b) > LIGHT_THRESHOLD
}

impl FromStr for HexColor {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ModelError::InvalidColor(s.to_string()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| ModelError::InvalidColor(s.to_string()))
        };
        Ok(HexColor([channel(0)?, channel(2)?, channel(4)?]))
    }
}

impl TryFrom<String> for HexColor {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.to_string()
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "{r:02X}{g:02X}{b:02X}")
    }
}
