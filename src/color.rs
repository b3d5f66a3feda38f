//! Colors and the default series palette.
//!
//! Plot options name colors as strings (`"steelblue"`, `"#1f77b4"`,
//! `"#1f77b480"`), so [`Rgba`] parses and serializes through that form.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// RGBA color with 8-bit components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
#[repr(C)]
pub struct Rgba {
    /// Red component (0-255).
    pub r: u8,
    /// Green component (0-255).
    pub g: u8,
    /// Blue component (0-255).
    pub b: u8,
    /// Alpha component (0-255, 255 = fully opaque).
    pub a: u8,
}

/// Named colors accepted by [`Rgba::parse`].
const NAMED: &[(&str, Rgba)] = &[
    ("black", Rgba::BLACK),
    ("white", Rgba::WHITE),
    ("red", Rgba::RED),
    ("green", Rgba::rgb(0, 128, 0)),
    ("blue", Rgba::BLUE),
    ("gray", Rgba::rgb(128, 128, 128)),
    ("grey", Rgba::rgb(128, 128, 128)),
    ("lightgray", Rgba::rgb(211, 211, 211)),
    ("orange", Rgba::rgb(255, 165, 0)),
    ("purple", Rgba::rgb(128, 0, 128)),
    ("yellow", Rgba::rgb(255, 255, 0)),
    ("cyan", Rgba::rgb(0, 255, 255)),
    ("magenta", Rgba::rgb(255, 0, 255)),
    ("steelblue", Rgba::rgb(70, 130, 180)),
    ("transparent", Rgba::TRANSPARENT),
];

impl Rgba {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    /// Opaque black.
    pub const BLACK: Self = Self::new(0, 0, 0, 255);
    /// Opaque white.
    pub const WHITE: Self = Self::new(255, 255, 255, 255);
    /// Opaque red.
    pub const RED: Self = Self::new(255, 0, 0, 255);
    /// Opaque blue.
    pub const BLUE: Self = Self::new(0, 0, 255, 255);

    /// Qualitative cycle used when a series has no explicit color
    /// (matplotlib "tab10").
    pub const CYCLE: [Self; 10] = [
        Self::rgb(31, 119, 180),
        Self::rgb(255, 127, 14),
        Self::rgb(44, 160, 44),
        Self::rgb(214, 39, 40),
        Self::rgb(148, 103, 189),
        Self::rgb(140, 86, 75),
        Self::rgb(227, 119, 194),
        Self::rgb(127, 127, 127),
        Self::rgb(188, 189, 34),
        Self::rgb(23, 190, 207),
    ];

    /// Create a new RGBA color.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque RGB color (alpha = 255).
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Create a color with modified alpha.
    #[must_use]
    pub const fn with_alpha(self, a: u8) -> Self {
        Self::new(self.r, self.g, self.b, a)
    }

    /// The `index`-th color of [`Rgba::CYCLE`], wrapping around.
    #[must_use]
    pub const fn cycle(index: usize) -> Self {
        Self::CYCLE[index % Self::CYCLE.len()]
    }

    /// Parse a color name or `#rrggbb` / `#rrggbbaa` hex string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidColor`] for unknown names or malformed hex.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            return Self::parse_hex(hex).ok_or_else(|| Error::InvalidColor(s.to_string()));
        }
        let lower = s.to_ascii_lowercase();
        NAMED
            .iter()
            .find(|(name, _)| *name == lower)
            .map(|(_, color)| *color)
            .ok_or_else(|| Error::InvalidColor(s.to_string()))
    }

    fn parse_hex(hex: &str) -> Option<Self> {
        if !hex.is_ascii() || !(hex.len() == 6 || hex.len() == 8) {
            return None;
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        let a = if hex.len() == 8 { byte(6)? } else { 255 };
        Some(Self::new(byte(0)?, byte(2)?, byte(4)?, a))
    }

    /// `#rrggbb`, or `#rrggbbaa` when not opaque.
    #[must_use]
    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    /// CSS `rgb(...)` form used by the SVG encoder.
    #[must_use]
    pub fn to_css_rgb(self) -> String {
        format!("rgb({},{},{})", self.r, self.g, self.b)
    }

    /// Alpha as an opacity in `0.0..=1.0`.
    #[must_use]
    pub fn opacity(self) -> f32 {
        f32::from(self.a) / 255.0
    }

    /// Convert to array representation.
    #[must_use]
    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Linear interpolation between two colors.
    #[must_use]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let inv_t = 1.0 - t;

        Self::new(
            (f32::from(self.r) * inv_t + f32::from(other.r) * t) as u8,
            (f32::from(self.g) * inv_t + f32::from(other.g) * t) as u8,
            (f32::from(self.b) * inv_t + f32::from(other.b) * t) as u8,
            (f32::from(self.a) * inv_t + f32::from(other.a) * t) as u8,
        )
    }

    /// Composite `self` over `dst` using straight alpha.
    #[must_use]
    pub fn blend_over(self, dst: Self) -> Self {
        match self.a {
            255 => self,
            0 => dst,
            a => {
                let alpha = u16::from(a);
                let inv = 255 - alpha;
                let mix = |s: u8, d: u8| ((u16::from(s) * alpha + u16::from(d) * inv) / 255) as u8;
                Self::new(
                    mix(self.r, dst.r),
                    mix(self.g, dst.g),
                    mix(self.b, dst.b),
                    (alpha + u16::from(dst.a) * inv / 255) as u8,
                )
            }
        }
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgba {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Rgba {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl From<Rgba> for String {
    fn from(color: Rgba) -> Self {
        color.to_hex()
    }
}
