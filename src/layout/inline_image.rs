//! Folding image blocks into the text blocks they sit inline with.

use crate::model::{BBox, Block, BlockContent, ImageData, ImageSpan, Layout, Line, Span};
use crate::parser::LayoutOptions;

/// Merge image blocks that share a row with a text block into that block.
///
/// Each image joins the first text block in reading order whose vertical
/// range overlaps it. Merged image blocks are removed from the page.
/// Returns the number of images merged.
pub fn merge_inline_images(layout: &mut Layout, options: &LayoutOptions) -> usize {
    let images: Vec<(usize, BBox, ImageData)> = layout
        .blocks
        .iter()
        .enumerate()
        .filter_map(|(i, b)| match &b.content {
            BlockContent::Image { image } => Some((i, b.bbox, image.clone())),
            _ => None,
        })
        .collect();
    if images.is_empty() {
        return 0;
    }

    let mut merged: Vec<usize> = Vec::new();
    for block in layout.blocks.iter_mut().filter(|b| b.is_text()) {
        if merged.len() == images.len() {
            break;
        }

        let mut touched = false;
        for (index, bbox, image) in &images {
            if merged.contains(index) || !block.bbox.is_horizontally_aligned(bbox, 0.0) {
                continue;
            }
            insert_image(block, *bbox, image.clone());
            merged.push(*index);
            touched = true;
        }

        if touched {
            if let Some(lines) = block.content.lines_mut() {
                let taken = std::mem::take(lines);
                *lines = merge_lines(taken, options.alignment_tolerance);
            }
        }
    }

    merged.sort_unstable();
    for index in merged.iter().rev() {
        layout.blocks.remove(*index);
    }
    log::debug!("Merged {} inline image(s)", merged.len());
    merged.len()
}

/// Insert an image as its own line, before the first line starting right
/// of it, or first if there is none.
fn insert_image(block: &mut Block, bbox: BBox, image: ImageData) {
    let Some(lines) = block.content.lines_mut() else {
        return;
    };
    let position = lines
        .iter()
        .position(|l| bbox.x0 < l.bbox.x0)
        .unwrap_or(0);
    lines.insert(
        position,
        Line::new(vec![Span::Image(ImageSpan { bbox, image })]),
    );
    block.bbox = block.bbox.union(&bbox);
}

/// Absorb each line into its predecessor when both share a row and the gap
/// between them is within `tolerance`.
pub fn merge_lines(lines: Vec<Line>, tolerance: f32) -> Vec<Line> {
    let mut result: Vec<Line> = Vec::with_capacity(lines.len());
    for line in lines {
        if let Some(prev) = result.last_mut() {
            if line.bbox.is_horizontally_aligned(&prev.bbox, 0.0)
                && (line.bbox.x0 - prev.bbox.x1).abs() <= tolerance
            {
                prev.bbox = prev.bbox.union(&line.bbox);
                prev.spans.extend(line.spans);
                continue;
            }
        }
        result.push(line);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Char, TextSpan};

    fn text_line(text: &str, x0: f32, y0: f32) -> Line {
        let chars = text
            .chars()
            .enumerate()
            .map(|(i, c)| {
                let x = x0 + i as f32 * 6.0;
                Char::new(c, BBox::new(x, y0, x + 6.0, y0 + 12.0))
            })
            .collect();
        Line::new(vec![Span::Text(TextSpan::from_chars(chars, "Times", 12.0))])
    }

    #[test]
    fn test_inline_image_becomes_span() {
        // "See" [image] "here" on one row
        let see = text_line("See", 100.0, 100.0);
        let here = text_line("here", 138.0, 100.0);
        let text = Block::text(vec![see, here]);
        let image = Block::image(BBox::new(118.0, 98.0, 138.0, 114.0), ImageData::default());
        let mut layout = Layout::new(612.0, 792.0, vec![text, image], Vec::new());

        let count = merge_inline_images(&mut layout, &LayoutOptions::default());
        assert_eq!(count, 1);
        assert_eq!(layout.blocks.len(), 1);

        let block = &layout.blocks[0];
        assert_eq!(block.bbox, BBox::new(100.0, 98.0, 162.0, 114.0));
        let lines = block.lines().unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].spans.len(), 3);
        assert!(matches!(lines[0].spans[1], Span::Image(_)));
        assert_eq!(lines[0].text(), "Seehere");
    }

    #[test]
    fn test_image_on_other_row_kept() {
        let text = Block::text(vec![text_line("Caption", 100.0, 100.0)]);
        let image = Block::image(BBox::new(100.0, 200.0, 300.0, 400.0), ImageData::default());
        let mut layout = Layout::new(612.0, 792.0, vec![text, image], Vec::new());

        assert_eq!(merge_inline_images(&mut layout, &LayoutOptions::default()), 0);
        assert_eq!(layout.blocks.len(), 2);
    }

    #[test]
    fn test_image_joins_first_block_only() {
        let a = Block::text(vec![text_line("left", 50.0, 100.0)]);
        let b = Block::text(vec![text_line("right", 400.0, 100.0)]);
        let image = Block::image(BBox::new(300.0, 100.0, 320.0, 112.0), ImageData::default());
        let mut layout = Layout::new(612.0, 792.0, vec![a, b, image], Vec::new());

        merge_inline_images(&mut layout, &LayoutOptions::default());
        assert_eq!(layout.blocks.len(), 2);
        let first = layout.blocks[0].lines().unwrap();
        let second = layout.blocks[1].lines().unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(second.len(), 1);
    }

    #[test]
    fn test_removal_keeps_other_blocks() {
        let i1 = Block::image(BBox::new(10.0, 100.0, 20.0, 112.0), ImageData::default());
        let text = Block::text(vec![text_line("row", 50.0, 100.0)]);
        let i2 = Block::image(BBox::new(200.0, 100.0, 220.0, 112.0), ImageData::default());
        let table = Block::table(BBox::new(50.0, 300.0, 300.0, 400.0), Vec::new());
        let mut layout = Layout::new(612.0, 792.0, vec![i1, text, i2, table], Vec::new());

        assert_eq!(merge_inline_images(&mut layout, &LayoutOptions::default()), 2);
        assert_eq!(layout.blocks.len(), 2);
        assert!(layout.blocks[0].is_text());
        assert!(matches!(layout.blocks[1].content, BlockContent::Table { .. }));
    }

    #[test]
    fn test_merge_lines_respects_gap() {
        let lines = vec![text_line("ab", 0.0, 0.0), text_line("cd", 12.5, 0.0)];
        assert_eq!(merge_lines(lines, 1.0).len(), 1);

        let lines = vec![text_line("ab", 0.0, 0.0), text_line("cd", 20.0, 0.0)];
        assert_eq!(merge_lines(lines, 1.0).len(), 2);

        let lines = vec![text_line("ab", 0.0, 0.0), text_line("cd", 12.0, 20.0)];
        assert_eq!(merge_lines(lines, 1.0).len(), 2);
    }
}
