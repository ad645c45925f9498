//! Marker position validation pipeline.
//!
//! This module wires together color segmentation, centroid extraction,
//! pixel-to-time mapping and the time/band checks.

use std::path::Path;

use pill_check_core::{centroid, mask_stats, match_color, MaskStats, PixelPosition, PixelView};

use crate::error::{ConfigError, ImageLoadError};
use crate::params::ValidatorParams;
use crate::result::{CheckFailure, ValidationReport, ValidationResult};
use crate::source::ImageSource;
use crate::time::TimeOfDay;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Stateless marker validator. Configuration is fixed at construction.
#[derive(Clone, Debug)]
pub struct PositionValidator {
    params: ValidatorParams,
}

impl Default for PositionValidator {
    fn default() -> Self {
        Self {
            params: ValidatorParams::default(),
        }
    }
}

impl PositionValidator {
    /// Create a validator, rejecting malformed configuration up front.
    pub fn new(params: ValidatorParams) -> Result<Self, ConfigError> {
        params.validate()?;
        Ok(Self { params })
    }

    #[inline]
    pub fn params(&self) -> &ValidatorParams {
        &self.params
    }

    /// Segment the marker color and reduce the mask to its centroid.
    pub fn detect(&self, img: &PixelView<'_>) -> Option<PixelPosition> {
        self.detect_with_stats(img).map(|(pos, _)| pos)
    }

    fn detect_with_stats(&self, img: &PixelView<'_>) -> Option<(PixelPosition, MaskStats)> {
        let mask = match_color(img, &self.params.color, self.params.device);
        let stats = mask_stats(&mask)?;
        let pos = centroid(&mask)?;
        log::debug!(
            "marker centroid ({:.2}, {:.2}) from {} pixels, bbox {:?}",
            pos.x,
            pos.y,
            stats.count,
            stats.bbox
        );
        Some((pos, stats))
    }

    /// Apply the time and band checks to an already detected position.
    ///
    /// A position with a non-finite coordinate counts as no detection.
    pub fn check(
        &self,
        detected: Option<PixelPosition>,
        expected: TimeOfDay,
        image_size: (usize, usize),
    ) -> ValidationReport {
        let calib = &self.params.calibration;
        let detected = detected.filter(|pos| {
            let finite = pos.x.is_finite() && pos.y.is_finite();
            if !finite {
                log::warn!("ignoring non-finite marker position ({}, {})", pos.x, pos.y);
            }
            finite
        });
        let mut report = ValidationReport {
            image_size,
            expected,
            expected_x: calib.time_to_x(expected, image_size),
            detected,
            domain: None,
            mask_stats: None,
            tolerance_minutes: self.params.tolerance_minutes,
            band_fraction: calib.top_band_fraction,
            failures: Vec::new(),
        };
        let Some(pos) = detected else {
            log::debug!("no marker pixels matched");
            return report;
        };

        let domain = calib.to_domain(pos, image_size);
        report.domain = Some(domain);

        let difference = domain.time.circular_distance(expected);
        if difference > self.params.tolerance_minutes {
            report.failures.push(CheckFailure::Time {
                detected: domain.time,
                expected,
                difference_minutes: difference,
                tolerance_minutes: self.params.tolerance_minutes,
            });
        }
        if domain.vertical_fraction > calib.top_band_fraction {
            report.failures.push(CheckFailure::Vertical {
                vertical_fraction: domain.vertical_fraction,
                band_fraction: calib.top_band_fraction,
            });
        }

        log::debug!(
            "detected {} (expected {}, off by {} min), vertical {:.3} (band {:.3}): {} failure(s)",
            domain.time,
            expected,
            difference,
            domain.vertical_fraction,
            calib.top_band_fraction,
            report.failures.len()
        );
        report
    }

    /// Verdict for an already detected position.
    pub fn validate_position(
        &self,
        detected: Option<PixelPosition>,
        expected: TimeOfDay,
        image_size: (usize, usize),
    ) -> ValidationResult {
        self.check(detected, expected, image_size).to_result()
    }

    /// Full pipeline on an in-memory image.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, img, expected), fields(width = img.width(), height = img.height(), expected = %expected))
    )]
    pub fn validate_view(&self, img: &PixelView<'_>, expected: TimeOfDay) -> ValidationReport {
        let size = (img.width(), img.height());
        match self.detect_with_stats(img) {
            Some((pos, stats)) => {
                let mut report = self.check(Some(pos), expected, size);
                report.mask_stats = Some(stats);
                report
            }
            None => self.check(None, expected, size),
        }
    }

    /// Load `path` through `source` and run the full pipeline.
    ///
    /// Load failures are returned as errors here; [`Self::validate_image`]
    /// folds them into the "No pill detected" verdict.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, source, path), fields(path = %path.display()))
    )]
    pub fn validate_path<S>(
        &self,
        source: &S,
        path: &Path,
        expected: TimeOfDay,
    ) -> Result<ValidationReport, ImageLoadError>
    where
        S: ImageSource + ?Sized,
    {
        let buffer = source.load(path)?;
        Ok(self.validate_view(&buffer.view(), expected))
    }

    /// Top-level verdict for one image file.
    pub fn validate_image<S>(&self, source: &S, path: &Path, expected: TimeOfDay) -> ValidationResult
    where
        S: ImageSource + ?Sized,
    {
        match self.validate_path(source, path, expected) {
            Ok(report) => report.to_result(),
            Err(err) => {
                log::warn!("{}: {err}", path.display());
                ValidationResult::no_pill()
            }
        }
    }
}

/// Check a detected position with default color and calibration settings.
pub fn validate_position(
    detected: Option<PixelPosition>,
    expected: TimeOfDay,
    image_size: (usize, usize),
    tolerance_minutes: u32,
) -> ValidationResult {
    let validator = PositionValidator {
        params: ValidatorParams::default().with_tolerance_minutes(tolerance_minutes),
    };
    validator.validate_position(detected, expected, image_size)
}
