/// 24-bit RGB colors as used by the scene and the configuration files
use serde::{Deserialize, Serialize};
use std::fmt;

/// Packed `0xRRGGBB` color. Serialized as a plain integer, so TOML files can
/// write it as a hex literal (`0x00aa00`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rgb(pub u32);

impl Rgb {
    pub const WHITE: Rgb = Rgb(0xffffff);

    pub fn r(self) -> u8 {
        ((self.0 >> 16) & 0xff) as u8
    }

    pub fn g(self) -> u8 {
        ((self.0 >> 8) & 0xff) as u8
    }

    pub fn b(self) -> u8 {
        (self.0 & 0xff) as u8
    }

    /// Multiply every channel by `factor`, clamped to `[0, 1]`
    pub fn scaled(self, factor: f32) -> Rgb {
        let factor = factor.clamp(0.0, 1.0);
        let channel = |c: u8| (c as f32 * factor).round() as u32;
        Rgb((channel(self.r()) << 16) | (channel(self.g()) << 8) | channel(self.b()))
    }

    /// CSS hex notation, `#rrggbb`
    pub fn to_css(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.0 & 0xffffff)
    }
}
