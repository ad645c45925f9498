//! Debug overlay: the chart with the detected and expected positions drawn on it.

use ::image::{Rgb, RgbImage};

use crate::calibration::AxisCalibration;
use crate::result::ValidationReport;

/// Colors and sizes used by [`render_overlay`].
#[derive(Clone, Copy, Debug)]
pub struct OverlayStyle {
    pub detected: Rgb<u8>,
    pub expected: Rgb<u8>,
    pub band: Rgb<u8>,
    /// Half-length of the detection cross, in pixels.
    pub marker_radius: i64,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            detected: Rgb([0, 170, 0]),
            expected: Rgb([255, 0, 255]),
            band: Rgb([30, 90, 255]),
            marker_radius: 8,
        }
    }
}

/// Copy `img` and mark the validation result on it.
///
/// - dashed horizontal line: lower edge of the valid top band,
/// - vertical line: expected time (skipped when outside the window),
/// - cross: detected centroid (skipped when nothing was detected).
pub fn render_overlay(
    img: &RgbImage,
    report: &ValidationReport,
    calib: &AxisCalibration,
    style: &OverlayStyle,
) -> RgbImage {
    let mut out = img.clone();
    let (w, h) = (out.width() as i64, out.height() as i64);
    let size = (w as usize, h as usize);

    let band_y = calib.band_limit_y(size).round() as i64;
    for x in (0..w).filter(|x| (x / 6) % 2 == 0) {
        put(&mut out, x, band_y, style.band);
    }

    if let Some(ex) = report.expected_x {
        let ex = ex.round() as i64;
        for y in 0..h {
            put(&mut out, ex, y, style.expected);
            put(&mut out, ex + 1, y, style.expected);
        }
    }

    if let Some(pos) = report.detected {
        let (cx, cy) = (pos.x.round() as i64, pos.y.round() as i64);
        for d in -style.marker_radius..=style.marker_radius {
            put(&mut out, cx + d, cy, style.detected);
            put(&mut out, cx, cy + d, style.detected);
        }
    }

    out
}

fn put(img: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>) {
    if x < 0 || y < 0 || x >= img.width() as i64 || y >= img.height() as i64 {
        return;
    }
    img.put_pixel(x as u32, y as u32, color);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::TimeOfDay;
    use pill_check_core::PixelPosition;

    fn report(detected: Option<PixelPosition>) -> ValidationReport {
        ValidationReport {
            image_size: (200, 100),
            expected: TimeOfDay::NOON,
            expected_x: Some(100.0),
            detected,
            domain: None,
            mask_stats: None,
            tolerance_minutes: 5,
            band_fraction: 0.15,
            failures: Vec::new(),
        }
    }

    #[test]
    fn draws_expected_line_band_and_cross() {
        let img = RgbImage::from_pixel(200, 100, Rgb([255, 255, 255]));
        let style = OverlayStyle::default();
        let out = render_overlay(
            &img,
            &report(Some(PixelPosition::new(40.0, 10.0))),
            &AxisCalibration::default(),
            &style,
        );
        assert_eq!(out.dimensions(), img.dimensions());
        assert_eq!(*out.get_pixel(100, 70), style.expected);
        assert_eq!(*out.get_pixel(0, 15), style.band);
        assert_eq!(*out.get_pixel(40, 10), style.detected);
        assert_eq!(*out.get_pixel(48, 10), style.detected);
        assert_eq!(*out.get_pixel(150, 70), Rgb([255, 255, 255]));
    }

    #[test]
    fn cross_near_edge_is_clipped() {
        let img = RgbImage::from_pixel(20, 20, Rgb([0, 0, 0]));
        let out = render_overlay(
            &img,
            &report(Some(PixelPosition::new(0.0, 19.0))),
            &AxisCalibration::default(),
            &OverlayStyle::default(),
        );
        assert_eq!(*out.get_pixel(0, 19), OverlayStyle::default().detected);
    }
}
