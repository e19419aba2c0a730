//! Decoder boundary: what a page looks like before normalization.

use serde::{Deserialize, Serialize};

use super::{BBox, Block};

/// One decoded page as handed over by the document decoder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawPage {
    /// Page number (1-indexed), if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,

    pub width: f32,

    pub height: f32,

    /// Blocks in decoder order
    #[serde(default)]
    pub blocks: Vec<Block>,

    /// Content stream text, whitespace separated
    #[serde(default)]
    pub stream: String,

    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

impl RawPage {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            number: None,
            width,
            height,
            blocks: Vec::new(),
            stream: String::new(),
            annotations: Vec::new(),
        }
    }

    pub fn with_number(mut self, number: u32) -> Self {
        self.number = Some(number);
        self
    }

    pub fn with_blocks(mut self, blocks: Vec<Block>) -> Self {
        self.blocks = blocks;
        self
    }

    pub fn with_stream(mut self, stream: impl Into<String>) -> Self {
        self.stream = stream.into();
        self
    }

    pub fn with_annotations(mut self, annotations: Vec<Annotation>) -> Self {
        self.annotations = annotations;
        self
    }
}

/// A comment-style annotation record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    #[serde(rename = "type")]
    pub kind: AnnotationType,

    /// Declared rectangle, already in page space
    pub rect: BBox,

    /// Stroke color components (gray, RGB or CMYK)
    #[serde(default)]
    pub color: Vec<f32>,
}

impl Annotation {
    pub fn new(kind: AnnotationType, rect: BBox, color: Vec<f32>) -> Self {
        Self { kind, rect, color }
    }
}

/// Annotation subtypes relevant to text formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnnotationType {
    Highlight,
    Underline,
    StrikeOut,
    Squiggly,
    #[serde(other)]
    Other,
}

impl AnnotationType {
    /// Map a PDF `/Subtype` name.
    pub fn from_subtype(name: &str) -> Self {
        match name {
            "Highlight" => AnnotationType::Highlight,
            "Underline" => AnnotationType::Underline,
            "StrikeOut" => AnnotationType::StrikeOut,
            "Squiggly" => AnnotationType::Squiggly,
            _ => AnnotationType::Other,
        }
    }
}
