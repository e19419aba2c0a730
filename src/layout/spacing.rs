//! Paragraph and line spacing from final block geometry.

use crate::model::{Block, Layout};
use crate::parser::LayoutOptions;

/// Attach before/after/line spacing to the page's blocks.
///
/// Text blocks get a before-space measured from the previous block's bottom
/// (the top margin for the first block) and a line-space averaged over their
/// distinct rows. A non-text block following a text block gives that text
/// block an after-space instead.
pub fn compute_spacing(layout: &mut Layout, options: &LayoutOptions) {
    let bottom = layout.margin.bottom;
    let mut reference = layout.margin.top;

    for i in 0..layout.blocks.len() {
        let para_space = layout.blocks[i].bbox.y0 - reference;

        if layout.blocks[i].is_text() {
            let block = &mut layout.blocks[i];
            let (before, line_space) =
                text_spacing(block, para_space, reference, bottom, layout.height, options);
            block.before_space = Some(before);
            block.line_space = Some(line_space);
        } else if i > 0 && layout.blocks[i - 1].is_text() {
            layout.blocks[i - 1].after_space = Some(para_space);
        }

        reference = layout.blocks[i].bbox.y1;
    }
}

/// Count rows: a line starts a new row unless it shares one with the line
/// before it.
fn distinct_rows(block: &Block, factor: f32) -> usize {
    let Some(lines) = block.lines() else {
        return 0;
    };
    lines
        .iter()
        .enumerate()
        .filter(|(i, line)| {
            *i == 0
                || !line
                    .bbox
                    .is_horizontally_aligned(&lines[i - 1].bbox, factor)
        })
        .count()
}

fn text_spacing(
    block: &Block,
    para_space: f32,
    reference: f32,
    bottom: f32,
    page_height: f32,
    options: &LayoutOptions,
) -> (f32, f32) {
    let rows = distinct_rows(block, options.line_overlap_factor);
    let first_height = block
        .lines()
        .and_then(|l| l.first())
        .map(|l| l.bbox.height())
        .unwrap_or(0.0);
    let block_height = block.bbox.height();

    let mut before = para_space;
    let line_space = if rows > 1 {
        let pitch = (block_height - first_height) / (rows - 1) as f32;
        // a uniform line pitch moves the first baseline
        before = para_space + first_height - pitch;
        pitch
    } else {
        if rows == 0 {
            log::debug!("Text block without lines, line space falls back to block height");
        }
        block_height
    };

    let free = page_height - (reference + before + block_height + bottom);
    if free <= 0.0 {
        before += free - options.alignment_tolerance;
    }

    (before, line_space)
}
