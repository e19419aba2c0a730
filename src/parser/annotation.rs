//! Shapes from comment-style annotations.

use crate::model::{Annotation, AnnotationType, BBox, Rect, Rgb, StyleType};

impl AnnotationType {
    /// Text style expressed by this annotation type, if any.
    pub fn style(&self) -> Option<StyleType> {
        match self {
            AnnotationType::Highlight => Some(StyleType::Highlight),
            AnnotationType::Underline => Some(StyleType::Underline),
            AnnotationType::StrikeOut => Some(StyleType::StrikeThrough),
            AnnotationType::Squiggly | AnnotationType::Other => None,
        }
    }
}

/// Map highlight, underline and strike-out annotations to tagged shapes.
pub fn rects_from_annotations(annotations: &[Annotation]) -> Vec<Rect> {
    annotations
        .iter()
        .filter_map(|annot| {
            let style = annot.kind.style()?;
            let r = annot.rect;
            let bbox = BBox::from_corners((r.x0, r.y0), (r.x1, r.y1));
            Some(Rect::new(bbox, Rgb::from_components(&annot.color)).with_style(style))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rects_from_annotations() {
        let annots = vec![
            Annotation::new(
                AnnotationType::Highlight,
                BBox::new(10.0, 10.0, 50.0, 20.0),
                vec![1.0, 1.0, 0.0],
            ),
            Annotation::new(
                AnnotationType::Squiggly,
                BBox::new(10.0, 30.0, 50.0, 40.0),
                vec![],
            ),
            Annotation::new(
                AnnotationType::StrikeOut,
                BBox::new(10.0, 50.0, 50.0, 60.0),
                vec![],
            ),
        ];

        let rects = rects_from_annotations(&annots);
        assert_eq!(rects.len(), 2);
        assert_eq!(rects[0].style, Some(StyleType::Highlight));
        assert_eq!(rects[0].color, Rgb::YELLOW);
        assert_eq!(rects[1].style, Some(StyleType::StrikeThrough));
        assert_eq!(rects[1].color, Rgb::BLACK);
        assert_eq!(rects[1].bbox, BBox::new(10.0, 50.0, 50.0, 60.0));
    }

    #[test]
    fn test_inverted_rect_normalized() {
        let annots = vec![Annotation::new(
            AnnotationType::Underline,
            BBox::new(50.0, 20.0, 10.0, 10.0),
            vec![0.0],
        )];
        let rects = rects_from_annotations(&annots);
        assert_eq!(rects[0].bbox, BBox::new(10.0, 10.0, 50.0, 20.0));
    }
}
