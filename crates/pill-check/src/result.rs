use std::fmt;

use pill_check_core::{MaskStats, PixelPosition};
use serde::{Deserialize, Serialize};

use crate::calibration::DomainPosition;
use crate::time::TimeOfDay;

/// Message reported when no marker pixel was found (or the image could not be loaded).
pub const NO_PILL_DETECTED: &str = "No pill detected";

/// Final verdict of one validation call.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub message: String,
}

impl ValidationResult {
    pub fn no_pill() -> Self {
        Self {
            is_valid: false,
            message: NO_PILL_DETECTED.to_string(),
        }
    }

    pub fn into_tuple(self) -> (bool, String) {
        (self.is_valid, self.message)
    }
}

/// One failed position check with its measured and expected values.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "check", rename_all = "snake_case")]
pub enum CheckFailure {
    Time {
        detected: TimeOfDay,
        expected: TimeOfDay,
        difference_minutes: u32,
        tolerance_minutes: u32,
    },
    Vertical {
        vertical_fraction: f64,
        band_fraction: f64,
    },
}

impl fmt::Display for CheckFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckFailure::Time {
                detected,
                expected,
                difference_minutes,
                tolerance_minutes,
            } => write!(
                f,
                "Invalid time position: detected ~{detected}, expected {expected} \
                 (off by {difference_minutes} min, tolerance {tolerance_minutes} min)"
            ),
            CheckFailure::Vertical {
                vertical_fraction,
                band_fraction,
            } => write!(
                f,
                "Invalid Y position: marker at {:.1}% of chart height, expected within top {:.1}%",
                vertical_fraction * 100.0,
                band_fraction * 100.0
            ),
        }
    }
}

/// Everything one validation run measured.
///
/// Besides the verdict this carries the values an overlay renderer needs:
/// image size, detected pixel position and the expected x position.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub image_size: (usize, usize),
    pub expected: TimeOfDay,
    /// Pixel column of `expected`, if it lies inside the calibrated window.
    pub expected_x: Option<f64>,
    pub detected: Option<PixelPosition>,
    pub domain: Option<DomainPosition>,
    pub mask_stats: Option<MaskStats>,
    pub tolerance_minutes: u32,
    pub band_fraction: f64,
    pub failures: Vec<CheckFailure>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.domain.is_some() && self.failures.is_empty()
    }

    pub fn message(&self) -> String {
        let (Some(pos), Some(domain)) = (self.detected, self.domain) else {
            return NO_PILL_DETECTED.to_string();
        };
        if !self.failures.is_empty() {
            return self
                .failures
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
        }
        format!(
            "Pill position valid: detected ~{} at ({:.1}, {:.1}), within {} min of {} \
             and inside the top {:.1}% band",
            domain.time,
            pos.x,
            pos.y,
            self.tolerance_minutes,
            self.expected,
            self.band_fraction * 100.0
        )
    }

    pub fn to_result(&self) -> ValidationResult {
        ValidationResult {
            is_valid: self.is_valid(),
            message: self.message(),
        }
    }
}
