//! Color segmentation: RGB(A) buffer -> boolean mask.

use serde::{Deserialize, Serialize};

use crate::{ComputeDevice, Mask, PixelView};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Target color with a per-channel tolerance.
///
/// A pixel matches iff `|pixel[c] - target[c]| <= tolerance[c]` for R, G and B.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ColorSpec {
    pub target: [u8; 3],
    pub tolerance: [u8; 3],
}

impl ColorSpec {
    /// Default "pill red": R in 200..=255, G and B in 0..=60.
    ///
    /// Wide enough to keep anti-aliased marker edges. Calibrate against real
    /// charts if the renderer changes its palette.
    pub const PILL_RED: Self = Self {
        target: [228, 30, 30],
        tolerance: [28, 30, 30],
    };

    pub const fn new(target: [u8; 3], tolerance: [u8; 3]) -> Self {
        Self { target, tolerance }
    }

    /// Same tolerance on every channel.
    pub const fn uniform(target: [u8; 3], tolerance: u8) -> Self {
        Self {
            target,
            tolerance: [tolerance; 3],
        }
    }

    /// Test one interleaved pixel; anything past the third channel is ignored.
    #[inline]
    pub fn matches(&self, px: &[u8]) -> bool {
        let &[r, g, b, ..] = px else {
            return false;
        };
        r.abs_diff(self.target[0]) <= self.tolerance[0]
            && g.abs_diff(self.target[1]) <= self.tolerance[1]
            && b.abs_diff(self.target[2]) <= self.tolerance[2]
    }
}

impl Default for ColorSpec {
    fn default() -> Self {
        Self::PILL_RED
    }
}

/// Evaluate `spec` over every pixel of `img` in one batched pass.
///
/// An empty image yields an empty mask of the same shape.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(img, spec), fields(width = img.width(), height = img.height()))
)]
pub fn match_color(img: &PixelView<'_>, spec: &ColorSpec, device: ComputeDevice) -> Mask {
    if img.is_empty() {
        return Mask::empty(img.width(), img.height());
    }

    let cells = match device {
        ComputeDevice::Cpu => match_cells_seq(img, spec),
        ComputeDevice::Accelerated => match_cells_accelerated(img, spec),
    };

    let mask = Mask::from_cells(img.width(), img.height(), cells)
        .unwrap_or_else(|| Mask::empty(img.width(), img.height()));
    log::debug!(
        "color mask: {} of {} pixels match target {:?} (device={device})",
        mask.count(),
        img.width() * img.height(),
        spec.target
    );
    mask
}

fn match_cells_seq(img: &PixelView<'_>, spec: &ColorSpec) -> Vec<bool> {
    img.data()
        .chunks_exact(img.channels())
        .map(|px| spec.matches(px))
        .collect()
}

#[cfg(feature = "parallel")]
fn match_cells_accelerated(img: &PixelView<'_>, spec: &ColorSpec) -> Vec<bool> {
    use rayon::prelude::*;

    img.data()
        .par_chunks_exact(img.channels())
        .map(|px| spec.matches(px))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn match_cells_accelerated(img: &PixelView<'_>, spec: &ColorSpec) -> Vec<bool> {
    log::debug!("accelerated device requested without the `parallel` feature; using cpu");
    match_cells_seq(img, spec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PixelBuffer;

    const WHITE: [u8; 3] = [255, 255, 255];

    #[test]
    fn pill_red_bounds() {
        let spec = ColorSpec::PILL_RED;
        assert!(spec.matches(&[200, 0, 0]));
        assert!(spec.matches(&[255, 60, 60]));
        assert!(!spec.matches(&[199, 0, 0]));
        assert!(!spec.matches(&[230, 61, 0]));
        assert!(!spec.matches(&WHITE));
    }

    #[test]
    fn short_pixel_never_matches() {
        assert!(!ColorSpec::PILL_RED.matches(&[228, 30]));
    }

    #[test]
    fn mask_marks_only_matching_pixels() {
        let mut buf = PixelBuffer::filled_rgb(4, 3, WHITE).expect("buffer");
        buf.put_rgb(1, 2, [220, 20, 20]);
        buf.put_rgb(3, 0, [240, 50, 10]);
        let mask = match_color(&buf.view(), &ColorSpec::PILL_RED, ComputeDevice::Cpu);
        assert_eq!(mask.width(), 4);
        assert_eq!(mask.height(), 3);
        assert_eq!(mask.matches().collect::<Vec<_>>(), vec![(3, 0), (1, 2)]);
    }

    #[test]
    fn alpha_channel_is_ignored() {
        let data = [228, 30, 30, 0, 228, 30, 30, 255, 0, 0, 0, 255];
        let view = PixelView::new(3, 1, 4, &data).expect("view");
        let mask = match_color(&view, &ColorSpec::PILL_RED, ComputeDevice::Cpu);
        assert_eq!(mask.cells(), &[true, true, false]);
    }

    #[test]
    fn empty_image_gives_empty_mask() {
        let view = PixelView::new(0, 0, 3, &[]).expect("view");
        let mask = match_color(&view, &ColorSpec::PILL_RED, ComputeDevice::Cpu);
        assert_eq!(mask.cells().len(), 0);
        assert!(mask.is_empty());
    }

    #[test]
    fn devices_agree() {
        let mut buf = PixelBuffer::filled_rgb(64, 32, WHITE).expect("buffer");
        for i in 0..20 {
            buf.put_rgb(i * 3, i % 32, [210, 5, 40]);
        }
        let view = buf.view();
        let spec = ColorSpec::uniform([210, 5, 40], 2);
        let cpu = match_color(&view, &spec, ComputeDevice::Cpu);
        let acc = match_color(&view, &spec, ComputeDevice::Accelerated);
        assert_eq!(cpu, acc);
        assert_eq!(cpu.count(), 20);
    }
}
