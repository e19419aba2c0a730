//! Page-level layout types: blocks, lines, spans and characters.

use serde::{Deserialize, Serialize};

use super::{BBox, Rect, Rgb, TextStyle};

/// Normalized layout of a single page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layout {
    /// Page width in points (1 point = 1/72 inch)
    pub width: f32,

    /// Page height in points
    pub height: f32,

    /// Page margin, computed during preprocessing
    #[serde(default)]
    pub margin: Margin,

    /// Content blocks in reading order
    pub blocks: Vec<Block>,

    /// Page-level shapes in discovery order
    #[serde(default)]
    pub rects: Vec<Rect>,
}

impl Layout {
    /// Create a layout from decoded blocks and recovered shapes.
    pub fn new(width: f32, height: f32, blocks: Vec<Block>, rects: Vec<Rect>) -> Self {
        Self {
            width,
            height,
            margin: Margin::default(),
            blocks,
            rects,
        }
    }

    /// Get the number of blocks on the page.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Iterate over text blocks only.
    pub fn text_blocks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter().filter(|b| b.is_text())
    }

    /// Plain text of the page, one line per text line and a blank line
    /// between blocks.
    pub fn text(&self) -> String {
        self.blocks
            .iter()
            .filter_map(|b| b.lines())
            .map(|lines| {
                lines
                    .iter()
                    .map(Line::text)
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Page margins in points.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Margin {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Margin {
    /// The same margin on all four sides.
    pub fn uniform(value: f32) -> Self {
        Self {
            left: value,
            right: value,
            top: value,
            bottom: value,
        }
    }
}

/// A content unit on the page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub bbox: BBox,

    #[serde(flatten)]
    pub content: BlockContent,

    /// Shapes intersecting this block, in page discovery order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rects: Vec<Rect>,

    /// Vertical space above the block
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before_space: Option<f32>,

    /// Vertical space below the block
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after_space: Option<f32>,

    /// Average line pitch inside the block
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_space: Option<f32>,
}

/// Block payload, tagged by block type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BlockContent {
    /// Lines of text
    Text { lines: Vec<Line> },

    /// A standalone image
    Image { image: ImageData },

    /// List items, one line per item
    List { lines: Vec<Line> },

    /// Tabular content as rows of cell text
    Table { rows: Vec<Vec<String>> },
}

impl Block {
    fn with_content(bbox: BBox, content: BlockContent) -> Self {
        Self {
            bbox,
            content,
            rects: Vec::new(),
            before_space: None,
            after_space: None,
            line_space: None,
        }
    }

    /// Text block whose bbox is the union of its lines.
    pub fn text(lines: Vec<Line>) -> Self {
        let bbox = BBox::union_all(lines.iter().map(|l| &l.bbox)).unwrap_or_default();
        Self::with_content(bbox, BlockContent::Text { lines })
    }

    /// Text block with an explicit bbox.
    pub fn text_with_bbox(bbox: BBox, lines: Vec<Line>) -> Self {
        Self::with_content(bbox, BlockContent::Text { lines })
    }

    pub fn image(bbox: BBox, image: ImageData) -> Self {
        Self::with_content(bbox, BlockContent::Image { image })
    }

    pub fn list(bbox: BBox, lines: Vec<Line>) -> Self {
        Self::with_content(bbox, BlockContent::List { lines })
    }

    pub fn table(bbox: BBox, rows: Vec<Vec<String>>) -> Self {
        Self::with_content(bbox, BlockContent::Table { rows })
    }

    pub fn is_text(&self) -> bool {
        matches!(self.content, BlockContent::Text { .. })
    }

    pub fn is_image(&self) -> bool {
        matches!(self.content, BlockContent::Image { .. })
    }

    /// Lines of a text or list block.
    pub fn lines(&self) -> Option<&[Line]> {
        match &self.content {
            BlockContent::Text { lines } | BlockContent::List { lines } => Some(lines),
            _ => None,
        }
    }

    pub fn lines_mut(&mut self) -> Option<&mut Vec<Line>> {
        self.content.lines_mut()
    }
}

impl BlockContent {
    pub fn lines_mut(&mut self) -> Option<&mut Vec<Line>> {
        match self {
            BlockContent::Text { lines } | BlockContent::List { lines } => Some(lines),
            _ => None,
        }
    }
}

/// A line of spans sharing a baseline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Line {
    pub bbox: BBox,

    /// Writing mode, 0 for horizontal
    #[serde(default)]
    pub wmode: u8,

    /// Writing direction as a unit vector
    #[serde(default = "default_dir")]
    pub dir: (f32, f32),

    pub spans: Vec<Span>,
}

fn default_dir() -> (f32, f32) {
    (1.0, 0.0)
}

impl Line {
    /// Horizontal line whose bbox is the union of its spans.
    pub fn new(spans: Vec<Span>) -> Self {
        let bbox = BBox::union_all(spans.iter().map(Span::bbox)).unwrap_or_default();
        Self {
            bbox,
            wmode: 0,
            dir: default_dir(),
            spans,
        }
    }

    /// Concatenated text of the text spans.
    pub fn text(&self) -> String {
        self.spans
            .iter()
            .filter_map(|s| match s {
                Span::Text(t) => Some(t.text.as_str()),
                Span::Image(_) => None,
            })
            .collect()
    }
}

/// A text run or an inline image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Span {
    Text(TextSpan),
    Image(ImageSpan),
}

impl Span {
    pub fn bbox(&self) -> &BBox {
        match self {
            Span::Text(t) => &t.bbox,
            Span::Image(i) => &i.bbox,
        }
    }

    pub fn as_text(&self) -> Option<&TextSpan> {
        match self {
            Span::Text(t) => Some(t),
            Span::Image(_) => None,
        }
    }
}

/// A run of characters sharing font, size and color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextSpan {
    pub bbox: BBox,

    /// Span text, rebuilt from `chars` during preprocessing
    #[serde(default)]
    pub text: String,

    #[serde(default)]
    pub chars: Vec<Char>,

    #[serde(default)]
    pub font: String,

    #[serde(default)]
    pub size: f32,

    #[serde(default)]
    pub color: Rgb,

    /// Decoder font flags (bold, italic, ...)
    #[serde(default)]
    pub flags: u32,

    /// Styles recovered from intersecting shapes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub styles: Vec<TextStyle>,
}

impl TextSpan {
    /// Span built from characters; bbox and text follow the characters.
    pub fn from_chars(chars: Vec<Char>, font: impl Into<String>, size: f32) -> Self {
        let bbox = BBox::union_all(chars.iter().map(|c| &c.bbox)).unwrap_or_default();
        Self {
            bbox,
            text: chars.iter().map(|c| c.c).collect(),
            chars,
            font: font.into(),
            size,
            color: Rgb::BLACK,
            flags: 0,
            styles: Vec::new(),
        }
    }
}

/// An image placed inline within a line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSpan {
    pub bbox: BBox,
    pub image: ImageData,
}

/// Image payload as handed over by the decoder.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ImageData {
    /// File extension of the encoded data (e.g. "png")
    #[serde(default)]
    pub ext: String,

    /// Pixel width
    #[serde(default)]
    pub width: u32,

    /// Pixel height
    #[serde(default)]
    pub height: u32,

    /// Encoded image bytes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub data: Vec<u8>,
}

/// A single decoded character.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Char {
    pub bbox: BBox,
    pub c: char,
}

impl Char {
    pub fn new(c: char, bbox: BBox) -> Self {
        Self { bbox, c }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(text: &str, x0: f32, y0: f32) -> TextSpan {
        let chars = text
            .chars()
            .enumerate()
            .map(|(i, c)| {
                let x = x0 + i as f32 * 5.0;
                Char::new(c, BBox::new(x, y0, x + 5.0, y0 + 10.0))
            })
            .collect();
        TextSpan::from_chars(chars, "Helvetica", 10.0)
    }

    #[test]
    fn test_span_from_chars() {
        let span = word("Hello", 10.0, 20.0);
        assert_eq!(span.text, "Hello");
        assert_eq!(span.bbox, BBox::new(10.0, 20.0, 35.0, 30.0));
    }

    #[test]
    fn test_block_bbox_is_union_of_lines() {
        let l1 = Line::new(vec![Span::Text(word("ab", 10.0, 10.0))]);
        let l2 = Line::new(vec![Span::Text(word("cdef", 12.0, 25.0))]);
        let block = Block::text(vec![l1, l2]);
        assert_eq!(block.bbox, BBox::new(10.0, 10.0, 32.0, 35.0));
        assert!(block.is_text());
        assert_eq!(block.lines().map(|l| l.len()), Some(2));
    }

    #[test]
    fn test_layout_text() {
        let b1 = Block::text(vec![Line::new(vec![Span::Text(word("Title", 10.0, 10.0))])]);
        let b2 = Block::text(vec![
            Line::new(vec![Span::Text(word("one", 10.0, 40.0))]),
            Line::new(vec![Span::Text(word("two", 10.0, 55.0))]),
        ]);
        let img = Block::image(BBox::new(10.0, 80.0, 50.0, 120.0), ImageData::default());
        let layout = Layout::new(612.0, 792.0, vec![b1, b2, img], Vec::new());
        assert_eq!(layout.text(), "Title\n\none\ntwo");
        assert_eq!(layout.text_blocks().count(), 2);
        assert_eq!(layout.block_count(), 3);
    }

    #[test]
    fn test_block_serialization_tagged() {
        let block = Block::table(
            BBox::new(1.0, 1.0, 2.0, 2.0),
            vec![vec!["a".to_string(), "b".to_string()]],
        );
        let json = serde_json::to_string(&block).unwrap();
        assert!(json.contains("\"type\":\"table\""));
        assert!(!json.contains("before_space"));

        let back: Block = serde_json::from_str(&json).unwrap();
        assert!(matches!(back.content, BlockContent::Table { .. }));
    }

    #[test]
    fn test_line_defaults_on_deserialize() {
        let json = r#"{"bbox":[1,2,3,4],"spans":[]}"#;
        let line: Line = serde_json::from_str(json).unwrap();
        assert_eq!(line.wmode, 0);
        assert_eq!(line.dir, (1.0, 0.0));
    }
}
