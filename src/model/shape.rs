//! Recovered format shapes and the style tags they produce.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::BBox;

/// Packed 24-bit RGB color, `0xRRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rgb(pub u32);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0x000000);
    pub const WHITE: Rgb = Rgb(0xFFFFFF);
    pub const YELLOW: Rgb = Rgb(0xFFFF00);

    /// Pack float components in `[0, 1]`; out-of-range values are clamped.
    pub fn from_rgb(r: f32, g: f32, b: f32) -> Self {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0) as u32;
        Rgb((channel(r) << 16) | (channel(g) << 8) | channel(b))
    }

    pub fn from_gray(g: f32) -> Self {
        Self::from_rgb(g, g, g)
    }

    /// Naive CMYK conversion, good enough for annotation colors.
    pub fn from_cmyk(c: f32, m: f32, y: f32, k: f32) -> Self {
        let k = k.clamp(0.0, 1.0);
        Self::from_rgb(
            (1.0 - c.clamp(0.0, 1.0)) * (1.0 - k),
            (1.0 - m.clamp(0.0, 1.0)) * (1.0 - k),
            (1.0 - y.clamp(0.0, 1.0)) * (1.0 - k),
        )
    }

    /// Interpret a PDF color component list by its length.
    ///
    /// Empty or unrecognized lists yield black.
    pub fn from_components(components: &[f32]) -> Self {
        match *components {
            [g] => Self::from_gray(g),
            [r, g, b] => Self::from_rgb(r, g, b),
            [c, m, y, k] => Self::from_cmyk(c, m, y, k),
            _ => Self::BLACK,
        }
    }

    pub fn red(&self) -> u8 {
        ((self.0 >> 16) & 0xFF) as u8
    }

    pub fn green(&self) -> u8 {
        ((self.0 >> 8) & 0xFF) as u8
    }

    pub fn blue(&self) -> u8 {
        (self.0 & 0xFF) as u8
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06X}", self.0)
    }
}

/// Text formatting a shape can express.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleType {
    Highlight,
    Underline,
    StrikeThrough,
}

/// A rectangle shape recovered from the content stream or an annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Extent in page space
    pub bbox: BBox,

    /// Fill or stroke color
    pub color: Rgb,

    /// Explicit style, set only for annotation-derived shapes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<StyleType>,
}

impl Rect {
    /// Create an untagged shape.
    pub fn new(bbox: BBox, color: Rgb) -> Self {
        Self {
            bbox,
            color,
            style: None,
        }
    }

    /// Attach an explicit style tag.
    pub fn with_style(mut self, style: StyleType) -> Self {
        self.style = Some(style);
        self
    }
}

/// A style marker attached to a text span by the format splitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextStyle {
    #[serde(rename = "type")]
    pub kind: StyleType,
    pub color: Rgb,
}
