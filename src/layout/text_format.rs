//! Splitting text spans against format shapes.
//!
//! A shape crossing part of a span cuts it into up to three pieces: the text
//! left of the shape, the text under it (which gains a style marker) and the
//! text right of it. The pieces keep the original text in order and tile the
//! original bbox horizontally.

use std::ops::Range;

use crate::model::{BBox, Char, Layout, Rect, Span, StyleType, TextSpan, TextStyle};
use crate::parser::LayoutOptions;

/// Split every line touched by one of its block's shapes.
///
/// Returns the number of spans that were actually cut.
pub fn apply_text_format(layout: &mut Layout, options: &LayoutOptions) -> usize {
    let mut cuts = 0;
    for block in layout.blocks.iter_mut() {
        if block.rects.is_empty() {
            continue;
        }
        let rects = &block.rects;
        let Some(lines) = block.content.lines_mut() else {
            continue;
        };

        for rect in rects {
            for line in lines.iter_mut() {
                if !rect
                    .bbox
                    .intersects(&line.bbox.expand_vertical(options.line_tolerance))
                {
                    continue;
                }
                let before = line.spans.len();
                line.spans = line
                    .spans
                    .iter()
                    .flat_map(|span| split_span(span, rect))
                    .collect();
                cuts += line.spans.len() - before;
            }
        }
    }
    if cuts > 0 {
        log::debug!("Format shapes produced {} extra span(s)", cuts);
    }
    cuts
}

/// Split one span against a shape.
///
/// Returns the span unchanged when the shape misses it, when it is an image
/// span, or when no character falls under the shape.
pub fn split_span(span: &Span, rect: &Rect) -> Vec<Span> {
    let Span::Text(text) = span else {
        return vec![span.clone()];
    };
    let Some(hit) = text.bbox.intersect(&rect.bbox) else {
        return vec![span.clone()];
    };

    // thin strokes still style the full span height
    let area = BBox::new(hit.x0, text.bbox.y0, hit.x1, text.bbox.y1);
    let Some(range) = chars_in_rect(&text.chars, &area) else {
        return vec![span.clone()];
    };

    let (y0, y1) = (text.bbox.y0, text.bbox.y1);
    let len = text.chars.len();
    let has_left = range.start > 0;
    let has_right = range.end < len;
    let mid_x0 = if has_left { area.x0 } else { text.bbox.x0 };
    let mid_x1 = if has_right { area.x1 } else { text.bbox.x1 };

    let mut pieces = Vec::with_capacity(3);
    if has_left {
        pieces.push(Span::Text(piece(
            text,
            0..range.start,
            BBox::new(text.bbox.x0, y0, mid_x0, y1),
        )));
    }

    let mut middle = piece(text, range.clone(), BBox::new(mid_x0, y0, mid_x1, y1));
    if let Some(kind) = rect.style.or_else(|| classify_style(&rect.bbox, &text.bbox)) {
        let style = TextStyle {
            kind,
            color: rect.color,
        };
        if !middle.styles.contains(&style) {
            middle.styles.push(style);
        }
    }
    pieces.push(Span::Text(middle));

    if has_right {
        pieces.push(Span::Text(piece(
            text,
            range.end..len,
            BBox::new(mid_x1, y0, text.bbox.x1, y1),
        )));
    }
    pieces
}

fn piece(span: &TextSpan, range: Range<usize>, bbox: BBox) -> TextSpan {
    let chars = span.chars[range].to_vec();
    TextSpan {
        bbox,
        text: chars.iter().map(|c| c.c).collect(),
        chars,
        ..span.clone()
    }
}

/// Index range of the characters whose horizontal center lies inside
/// `area` and which overlap it vertically.
pub fn chars_in_rect(chars: &[Char], area: &BBox) -> Option<Range<usize>> {
    let inside = |c: &Char| {
        let cx = c.bbox.center_x();
        cx >= area.x0 && cx <= area.x1 && c.bbox.vertical_overlap(area) > 0.0
    };
    let start = chars.iter().position(inside)?;
    let end = chars.iter().rposition(inside)? + 1;
    Some(start..end)
}

/// Infer the style of an untagged shape from where it sits on the span.
///
/// A shape covering most of the span height is a highlight. Otherwise a
/// shape centered in the bottom quarter (or below) is an underline and one
/// centered in the middle half is a strike-through.
pub fn classify_style(shape: &BBox, span: &BBox) -> Option<StyleType> {
    let h = span.height();
    if h <= 0.0 {
        return None;
    }
    if shape.height() >= 0.5 * h && shape.vertical_overlap(span) > 0.75 * h {
        return Some(StyleType::Highlight);
    }

    let relative = (shape.center_y() - span.y0) / h;
    if relative >= 0.75 {
        Some(StyleType::Underline)
    } else if relative >= 0.25 {
        Some(StyleType::StrikeThrough)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Block, ImageData, ImageSpan, Line, Rgb};

    /// Ten-point wide characters on the row y = 100..112.
    fn span(text: &str, x0: f32) -> Span {
        let chars = text
            .chars()
            .enumerate()
            .map(|(i, c)| {
                let x = x0 + i as f32 * 10.0;
                Char::new(c, BBox::new(x, 100.0, x + 10.0, 112.0))
            })
            .collect();
        Span::Text(TextSpan::from_chars(chars, "Helvetica", 12.0))
    }

    fn texts(spans: &[Span]) -> Vec<String> {
        spans
            .iter()
            .map(|s| s.as_text().unwrap().text.clone())
            .collect()
    }

    fn assert_tiles(original: &Span, pieces: &[Span]) {
        let joined: String = texts(pieces).concat();
        assert_eq!(joined, original.as_text().unwrap().text);
        assert_eq!(pieces[0].bbox().x0, original.bbox().x0);
        assert_eq!(pieces[pieces.len() - 1].bbox().x1, original.bbox().x1);
        for pair in pieces.windows(2) {
            assert_eq!(pair[0].bbox().x1, pair[1].bbox().x0);
        }
    }

    #[test]
    fn test_split_middle() {
        let original = span("abcdef", 0.0);
        let rect = Rect::new(BBox::new(20.0, 110.0, 40.0, 111.0), Rgb::BLACK);
        let pieces = split_span(&original, &rect);

        assert_eq!(texts(&pieces), vec!["ab", "cd", "ef"]);
        assert_tiles(&original, &pieces);
        assert_eq!(*pieces[1].bbox(), BBox::new(20.0, 100.0, 40.0, 112.0));

        let styles = &pieces[1].as_text().unwrap().styles;
        assert_eq!(styles.len(), 1);
        assert_eq!(styles[0].kind, StyleType::Underline);
        assert!(pieces[0].as_text().unwrap().styles.is_empty());
    }

    #[test]
    fn test_split_leading_part() {
        let original = span("abcdef", 0.0);
        let rect = Rect::new(BBox::new(-5.0, 90.0, 28.0, 120.0), Rgb::YELLOW);
        let pieces = split_span(&original, &rect);

        assert_eq!(texts(&pieces), vec!["abc", "def"]);
        assert_tiles(&original, &pieces);
        assert_eq!(
            pieces[0].as_text().unwrap().styles[0].kind,
            StyleType::Highlight
        );
    }

    #[test]
    fn test_split_whole_span() {
        let original = span("abc", 0.0);
        let rect = Rect::new(BBox::new(0.0, 105.0, 30.0, 107.0), Rgb(0xFF0000))
            .with_style(StyleType::StrikeThrough);
        let pieces = split_span(&original, &rect);
        assert_eq!(pieces.len(), 1);
        assert_eq!(*pieces[0].bbox(), *original.bbox());
        let style = pieces[0].as_text().unwrap().styles[0];
        assert_eq!(style.kind, StyleType::StrikeThrough);
        assert_eq!(style.color, Rgb(0xFF0000));
    }

    #[test]
    fn test_disjoint_rect_returns_original() {
        let original = span("abc", 0.0);
        let rect = Rect::new(BBox::new(100.0, 100.0, 120.0, 112.0), Rgb::BLACK);
        assert_eq!(split_span(&original, &rect), vec![original]);
    }

    #[test]
    fn test_rect_between_char_centers() {
        // overlaps the span but covers no character center
        let original = span("abc", 0.0);
        let rect = Rect::new(BBox::new(11.0, 100.0, 14.0, 112.0), Rgb::BLACK);
        assert_eq!(split_span(&original, &rect), vec![original]);
    }

    #[test]
    fn test_image_span_untouched() {
        let image = Span::Image(ImageSpan {
            bbox: BBox::new(0.0, 0.0, 10.0, 10.0),
            image: ImageData::default(),
        });
        let rect = Rect::new(BBox::new(0.0, 0.0, 10.0, 10.0), Rgb::BLACK);
        assert_eq!(split_span(&image, &rect), vec![image]);
    }

    #[test]
    fn test_split_completeness_sweep() {
        let original = span("normalize", 10.0);
        for start in (0..100).step_by(7) {
            for width in [1.0, 4.0, 15.0, 33.0, 120.0] {
                let x0 = start as f32;
                let rect = Rect::new(BBox::new(x0, 110.0, x0 + width, 111.0), Rgb::BLACK);
                let pieces = split_span(&original, &rect);
                assert!(!pieces.is_empty() && pieces.len() <= 3);
                assert_tiles(&original, &pieces);
            }
        }
    }

    #[test]
    fn test_classify_style() {
        let span = BBox::new(0.0, 100.0, 50.0, 112.0);
        let shape = |y0: f32, y1: f32| BBox::new(0.0, y0, 50.0, y1);
        assert_eq!(classify_style(&shape(99.0, 113.0), &span), Some(StyleType::Highlight));
        assert_eq!(classify_style(&shape(110.0, 111.0), &span), Some(StyleType::Underline));
        assert_eq!(classify_style(&shape(112.5, 113.0), &span), Some(StyleType::Underline));
        assert_eq!(classify_style(&shape(105.5, 106.5), &span), Some(StyleType::StrikeThrough));
        assert_eq!(classify_style(&shape(100.5, 101.0), &span), None);
    }

    #[test]
    fn test_apply_text_format_on_block() {
        let line = Line::new(vec![span("Hello", 0.0), span("World", 60.0)]);
        let mut block = Block::text(vec![line]);
        block.rects = vec![Rect::new(BBox::new(60.0, 110.5, 90.0, 111.0), Rgb::BLACK)];
        let mut layout = Layout::new(612.0, 792.0, vec![block], Vec::new());

        let cuts = apply_text_format(&mut layout, &LayoutOptions::default());
        assert_eq!(cuts, 1);
        let spans = &layout.blocks[0].lines().unwrap()[0].spans;
        assert_eq!(texts(spans), vec!["Hello", "Wor", "ld"]);
    }

    #[test]
    fn test_rect_near_line_uses_tolerance() {
        let line = Line::new(vec![span("abc", 0.0)]);
        let mut block = Block::text(vec![line]);
        // just below the line bbox, within the expansion
        block.rects = vec![Rect::new(BBox::new(0.0, 112.2, 30.0, 112.4), Rgb::BLACK)];
        let mut layout = Layout::new(612.0, 792.0, vec![block], Vec::new());

        // line matches, but the span itself is not crossed
        assert_eq!(apply_text_format(&mut layout, &LayoutOptions::default()), 0);
        assert_eq!(layout.blocks[0].lines().unwrap()[0].spans.len(), 1);
    }
}
