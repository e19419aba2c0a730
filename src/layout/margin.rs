//! Page margin estimation from block geometry.

use crate::model::{BBox, Margin};
use crate::parser::LayoutOptions;

/// Estimate the page margin from block boxes.
///
/// Left edges are sorted and clustered: consecutive edges closer than the
/// alignment tolerance share a cluster. A cluster whose first edge starts
/// left of the previous block's right edge overlaps that block and starts
/// with a negative count. The leftmost edge of the cluster with the highest
/// count sets the left margin. Returns `None` when no cluster has a
/// positive count.
pub fn page_margin(
    bboxes: &[BBox],
    width: f32,
    height: f32,
    options: &LayoutOptions,
) -> Option<Margin> {
    let mut sorted = bboxes.to_vec();
    sorted.sort_by(|a, b| a.x0.total_cmp(&b.x0).then(a.x1.total_cmp(&b.x1)));

    let mut start = *sorted.first()?;
    let mut prev = start;
    let mut count: i32 = 0;
    let mut candidates: Vec<(BBox, i32)> = Vec::new();
    for bbox in &sorted {
        if (bbox.x0 - prev.x0).abs() < options.alignment_tolerance {
            count += 1;
        } else {
            candidates.push((start, count));
            count = if bbox.x0 > prev.x1 { 1 } else { -1 };
            start = *bbox;
        }
        prev = *bbox;
    }
    candidates.push((start, count));

    // first cluster wins ties
    let (anchor, support) = candidates
        .iter()
        .filter(|(_, n)| *n > 0)
        .fold(None, |best: Option<&(BBox, i32)>, c| match best {
            Some(b) if b.1 >= c.1 => Some(b),
            _ => Some(c),
        })?;
    log::debug!(
        "Left margin {} supported by {} block(s) of {}",
        anchor.x0,
        support,
        sorted.len()
    );

    let left = anchor.x0.max(0.0);
    let x_max = sorted.iter().map(|b| b.x1).fold(f32::MIN, f32::max);
    let y_min = sorted.iter().map(|b| b.y0).fold(f32::MAX, f32::min);
    let y_max = sorted.iter().map(|b| b.y1).fold(f32::MIN, f32::max);

    Some(Margin {
        left,
        right: (width - x_max).min(left).max(0.0),
        top: y_min.min(options.default_margin).max(0.0),
        bottom: (height - y_max).min(options.default_margin).max(0.0),
    })
}
