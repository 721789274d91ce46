use std::fmt;
use std::str::FromStr;

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};

/// Linear RGB triple with components in [0, 1]
///
/// Serialized as a `#rrggbb` hex string so configs read like CSS colors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    /// Parse `#rrggbb`, `#rgb` or the same without the leading `#`
    pub fn from_hex(hex: &str) -> anyhow::Result<Self> {
        let digits = hex.trim().trim_start_matches('#');
        if !digits.is_ascii() {
            bail!("invalid color {hex:?}: non-hex digit");
        }
        let expanded: String = match digits.len() {
            6 => digits.to_string(),
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            _ => bail!("invalid color {hex:?}: expected #rrggbb or #rgb"),
        };

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&expanded[range], 16)
                .with_context(|| format!("invalid color {hex:?}: non-hex digit"))
        };

        Ok(Self::from_rgb8(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    pub fn to_hex(&self) -> String {
        let [r, g, b] = self.to_rgb8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    pub fn to_rgb8(&self) -> [u8; 3] {
        let quantize = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [quantize(self.r), quantize(self.g), quantize(self.b)]
    }

    /// Linear interpolation towards `other`; `t = 0` is `self`, `t = 1` is `other`
    pub fn lerp(self, other: Color, t: f32) -> Color {
        Color::new(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
        )
    }

    pub const fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    pub const fn to_rgba(self, alpha: f32) -> [f32; 4] {
        [self.r, self.g, self.b, alpha]
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::from_hex(s)
    }
}

impl TryFrom<String> for Color {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}
