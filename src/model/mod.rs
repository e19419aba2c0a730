//! Layout model types.
//!
//! The model describes a page on both sides of the normalization pipeline:
//! [`RawPage`] is what the decoder hands over, [`Layout`] is what the
//! document writer consumes.

mod geometry;
mod page;
mod raw;
mod shape;

pub use geometry::BBox;
pub use page::{
    Block, BlockContent, Char, ImageData, ImageSpan, Layout, Line, Margin, Span, TextSpan,
};
pub use raw::{Annotation, AnnotationType, RawPage};
pub use shape::{Rect, Rgb, StyleType, TextStyle};
