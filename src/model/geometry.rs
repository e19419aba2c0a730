//! Axis-aligned bounding boxes in page space (origin top-left, y down).

use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box `(x0, y0, x1, y1)`.
///
/// Serialized as a four-element array. Boxes produced by this crate keep
/// `x0 <= x1` and `y0 <= y1`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f32; 4]", into = "[f32; 4]")]
pub struct BBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl BBox {
    /// Create a box from its four edges, as given.
    pub const fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Create a box from two opposite corners in any order.
    pub fn from_corners(a: (f32, f32), b: (f32, f32)) -> Self {
        Self {
            x0: a.0.min(b.0),
            y0: a.1.min(b.1),
            x1: a.0.max(b.0),
            y1: a.1.max(b.1),
        }
    }

    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    pub fn center_x(&self) -> f32 {
        (self.x0 + self.x1) / 2.0
    }

    pub fn center_y(&self) -> f32 {
        (self.y0 + self.y1) / 2.0
    }

    /// True when the box encloses no area.
    pub fn is_empty(&self) -> bool {
        self.x0 >= self.x1 || self.y0 >= self.y1
    }

    /// True when every edge coordinate is strictly positive.
    ///
    /// Decoders emit boxes with zero or negative coordinates for content
    /// lying outside the page.
    pub fn is_positive(&self) -> bool {
        self.x0 > 0.0 && self.y0 > 0.0 && self.x1 > 0.0 && self.y1 > 0.0
    }

    /// Smallest box containing both boxes.
    pub fn union(&self, other: &BBox) -> BBox {
        BBox {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    /// Union of a sequence of boxes, `None` for an empty sequence.
    pub fn union_all<'a, I>(boxes: I) -> Option<BBox>
    where
        I: IntoIterator<Item = &'a BBox>,
    {
        boxes
            .into_iter()
            .fold(None, |acc: Option<BBox>, b| match acc {
                Some(u) => Some(u.union(b)),
                None => Some(*b),
            })
    }

    /// Intersection of two boxes, `None` when it has no area.
    pub fn intersect(&self, other: &BBox) -> Option<BBox> {
        let result = BBox {
            x0: self.x0.max(other.x0),
            y0: self.y0.max(other.y0),
            x1: self.x1.min(other.x1),
            y1: self.y1.min(other.y1),
        };
        if result.is_empty() {
            None
        } else {
            Some(result)
        }
    }

    pub fn intersects(&self, other: &BBox) -> bool {
        self.intersect(other).is_some()
    }

    /// Grow the box vertically by `delta` on both the top and bottom edge.
    pub fn expand_vertical(&self, delta: f32) -> BBox {
        BBox {
            y0: self.y0 - delta,
            y1: self.y1 + delta,
            ..*self
        }
    }

    /// Length of the shared vertical range, zero when disjoint.
    pub fn vertical_overlap(&self, other: &BBox) -> f32 {
        (self.y1.min(other.y1) - self.y0.max(other.y0)).max(0.0)
    }

    /// Whether two boxes sit on the same text row.
    ///
    /// The boxes are aligned when their shared vertical range is longer than
    /// `factor` times the taller of the two heights. With `factor == 0` any
    /// positive overlap qualifies.
    pub fn is_horizontally_aligned(&self, other: &BBox, factor: f32) -> bool {
        let h1 = self.height();
        let h2 = other.height();
        let span = self.y1.max(other.y1) - self.y0.min(other.y0);
        h1 + h2 - span > factor * h1.max(h2)
    }
}

impl From<[f32; 4]> for BBox {
    fn from(v: [f32; 4]) -> Self {
        BBox::new(v[0], v[1], v[2], v[3])
    }
}

impl From<BBox> for [f32; 4] {
    fn from(b: BBox) -> Self {
        [b.x0, b.y0, b.x1, b.y1]
    }
}
