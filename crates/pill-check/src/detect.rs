//! End-to-end helpers on top of the `image` crate.

use std::path::Path;

use pill_check_core::{BufferError, PixelBuffer, PixelView};

use crate::result::{ValidationReport, ValidationResult};
use crate::source::FileImageSource;
use crate::time::TimeOfDay;
use crate::validator::PositionValidator;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Borrow an `image::RgbImage` as a pipeline view.
pub fn rgb_view(img: &::image::RgbImage) -> Result<PixelView<'_>, BufferError> {
    PixelView::new(img.width() as usize, img.height() as usize, 3, img.as_raw())
}

/// Borrow an `image::RgbaImage` as a pipeline view; alpha is ignored by matching.
pub fn rgba_view(img: &::image::RgbaImage) -> Result<PixelView<'_>, BufferError> {
    PixelView::new(img.width() as usize, img.height() as usize, 4, img.as_raw())
}

/// Take ownership of an `image::RgbImage` without copying its pixels.
pub fn pixel_buffer_from_rgb(img: ::image::RgbImage) -> Result<PixelBuffer, BufferError> {
    let (w, h) = (img.width() as usize, img.height() as usize);
    PixelBuffer::new(w, h, 3, img.into_raw())
}

/// Run `validator` on an in-memory RGB image.
pub fn validate_rgb_image(
    img: &::image::RgbImage,
    expected: TimeOfDay,
    validator: &PositionValidator,
) -> Result<ValidationReport, BufferError> {
    Ok(validator.validate_view(&rgb_view(img)?, expected))
}

/// Validate the pill on the chart at `path` against a clock string like `"8:00 PM"`.
///
/// Uses the default color, tolerance and calibration. A missing or undecodable
/// image yields `(false, "No pill detected")`; an unparsable `expected_time`
/// yields an `Invalid expected time` verdict.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))
)]
pub fn validate_graph_image(path: impl AsRef<Path>, expected_time: &str) -> ValidationResult {
    let expected = match expected_time.parse::<TimeOfDay>() {
        Ok(t) => t,
        Err(err) => {
            return ValidationResult {
                is_valid: false,
                message: format!("Invalid expected time: {err}"),
            }
        }
    };
    PositionValidator::default().validate_image(&FileImageSource, path.as_ref(), expected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::image::{Rgb, RgbImage, Rgba, RgbaImage};

    #[test]
    fn rgba_marker_is_found() {
        let mut img = RgbaImage::from_pixel(100, 50, Rgba([255, 255, 255, 255]));
        img.put_pixel(25, 5, Rgba([220, 10, 10, 0]));
        let view = rgba_view(&img).expect("view");
        let pos = PositionValidator::default().detect(&view).expect("pill");
        assert_eq!((pos.x, pos.y), (25.0, 5.0));
    }

    #[test]
    fn rgb_image_validates_in_memory() {
        let mut img = RgbImage::from_pixel(1440, 200, Rgb([240, 240, 240]));
        img.put_pixel(1200, 10, Rgb([210, 40, 20]));
        let report =
            validate_rgb_image(&img, "8:00 PM".parse().expect("time"), &PositionValidator::default())
                .expect("report");
        assert!(report.is_valid(), "{}", report.message());
    }

    #[test]
    fn bad_expected_time_is_reported() {
        let res = validate_graph_image("whatever.png", "25:00");
        assert!(!res.is_valid);
        assert!(res.message.starts_with("Invalid expected time"), "{}", res.message);
    }

    #[test]
    fn missing_image_is_no_pill() {
        let res = validate_graph_image("/no/such/chart.png", "8:00 PM");
        assert_eq!(res, ValidationResult::no_pill());
    }
}
