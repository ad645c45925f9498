use serde::{Deserialize, Serialize};

use crate::Mask;

/// Position in pixel space (x to the right, y down).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PixelPosition {
    pub x: f64,
    pub y: f64,
}

impl PixelPosition {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Summary of a mask, for diagnostics only.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MaskStats {
    pub count: usize,
    /// Inclusive bounding box `[x0, y0, x1, y1]` of the matches.
    pub bbox: [usize; 4],
}

/// Arithmetic mean of all matching cells, or `None` for an empty mask.
///
/// This is a plain centroid: disjoint blobs pull the result towards the space
/// between them, and elongated blobs bias it along their long axis.
pub fn centroid(mask: &Mask) -> Option<PixelPosition> {
    let mut n = 0usize;
    let mut sum_x = 0.0f64;
    let mut sum_y = 0.0f64;
    for (x, y) in mask.matches() {
        n += 1;
        sum_x += x as f64;
        sum_y += y as f64;
    }
    if n == 0 {
        return None;
    }
    let n = n as f64;
    Some(PixelPosition::new(sum_x / n, sum_y / n))
}

pub fn mask_stats(mask: &Mask) -> Option<MaskStats> {
    let mut it = mask.matches();
    let (x, y) = it.next()?;
    let mut stats = MaskStats {
        count: 1,
        bbox: [x, y, x, y],
    };
    for (x, y) in it {
        stats.count += 1;
        stats.bbox[0] = stats.bbox[0].min(x);
        stats.bbox[1] = stats.bbox[1].min(y);
        stats.bbox[2] = stats.bbox[2].max(x);
        stats.bbox[3] = stats.bbox[3].max(y);
    }
    Some(stats)
}
