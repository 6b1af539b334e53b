//! Page background color.

use serde::{Deserialize, Serialize};

/// A packed `0xAARRGGBB` color.
///
/// Only carried through the page descriptor so a recreated container can
/// paint the same background before the engine draws its first frame.
///
/// # Example
///
/// ```
/// use bifrost_types::Color;
///
/// assert_eq!(Color::default(), Color::WHITE);
/// assert_eq!(Color::from_argb(0xFF, 0x12, 0x34, 0x56).argb(), 0xFF12_3456);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(u32);

impl Color {
    /// Opaque white, the platform default background.
    pub const WHITE: Color = Color(0xFFFF_FFFF);
    /// Opaque black.
    pub const BLACK: Color = Color(0xFF00_0000);
    /// Fully transparent.
    pub const TRANSPARENT: Color = Color(0);

    /// Wraps a packed ARGB value.
    #[must_use]
    pub const fn new(argb: u32) -> Self {
        Self(argb)
    }

    /// Packs individual channels.
    #[must_use]
    pub const fn from_argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self((a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32)
    }

    /// Returns the packed ARGB value.
    #[must_use]
    pub const fn argb(self) -> u32 {
        self.0
    }

    /// Returns the alpha channel.
    #[must_use]
    pub const fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:08X}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packs_channels() {
        let c = Color::from_argb(0x80, 0xFF, 0x00, 0x10);
        assert_eq!(c.argb(), 0x80FF_0010);
        assert_eq!(c.alpha(), 0x80);
        assert_eq!(c.to_string(), "#80FF0010");
    }
}
