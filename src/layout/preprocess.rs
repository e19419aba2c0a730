//! Block cleaning, reading order, margins and shape assignment.

use crate::model::{BBox, Layout, Margin, Span};
use crate::parser::LayoutOptions;

use super::margin::page_margin;

/// What preprocessing had to work around.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreprocessReport {
    /// Blocks removed for non-positive geometry
    pub dropped: usize,
    /// Whether the default margin was used
    pub margin_fallback: bool,
}

/// Prepare a decoded layout for the later stages.
///
/// Drops blocks with non-positive coordinates, sorts the rest top-to-bottom
/// then left-to-right, computes the page margin, attaches intersecting
/// shapes to every non-image block and rebuilds span text from characters.
pub fn preprocess(layout: &mut Layout, options: &LayoutOptions) -> PreprocessReport {
    let before = layout.blocks.len();
    layout.blocks.retain(|b| b.bbox.is_positive());
    let dropped = before - layout.blocks.len();
    if dropped > 0 {
        log::warn!("Dropped {} block(s) with degenerate geometry", dropped);
    }

    layout
        .blocks
        .sort_by(|a, b| a.bbox.y0.total_cmp(&b.bbox.y0).then(a.bbox.x0.total_cmp(&b.bbox.x0)));

    let bboxes: Vec<BBox> = layout.blocks.iter().map(|b| b.bbox).collect();
    let (margin, margin_fallback) =
        match page_margin(&bboxes, layout.width, layout.height, options) {
            Some(m) => (m, false),
            None => {
                log::warn!(
                    "No left margin candidate, using default margin {}",
                    options.default_margin
                );
                (Margin::uniform(options.default_margin), true)
            }
        };
    layout.margin = margin;

    let rects = &layout.rects;
    for block in layout.blocks.iter_mut().filter(|b| !b.is_image()) {
        block.rects = rects
            .iter()
            .filter(|r| r.bbox.intersects(&block.bbox))
            .cloned()
            .collect();

        if let Some(lines) = block.content.lines_mut() {
            for span in lines.iter_mut().flat_map(|l| l.spans.iter_mut()) {
                if let Span::Text(t) = span {
                    if !t.chars.is_empty() {
                        t.text = t.chars.iter().map(|c| c.c).collect();
                    }
                }
            }
        }
    }

    PreprocessReport {
        dropped,
        margin_fallback,
    }
}
