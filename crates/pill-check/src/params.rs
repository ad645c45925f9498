use pill_check_core::{ColorSpec, ComputeDevice};
use serde::{Deserialize, Serialize};

use crate::calibration::AxisCalibration;
use crate::error::ConfigError;

/// Configuration for [`crate::PositionValidator`].
///
/// Every field has a default, so a JSON config only needs the overrides:
///
/// ```
/// use pill_check::ValidatorParams;
///
/// let params: ValidatorParams =
///     serde_json::from_str(r#"{ "tolerance_minutes": 10 }"#).unwrap();
/// assert_eq!(params.tolerance_minutes, 10);
/// assert_eq!(params.calibration.top_band_fraction, 0.15);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorParams {
    /// Where the bulk color comparison runs; never changes the verdict.
    pub device: ComputeDevice,
    /// Maximum circular distance between detected and expected time.
    pub tolerance_minutes: u32,
    /// Marker color to segment.
    pub color: ColorSpec,
    /// Pixel <-> time/band mapping.
    pub calibration: AxisCalibration,
}

impl Default for ValidatorParams {
    fn default() -> Self {
        Self {
            device: ComputeDevice::Cpu,
            tolerance_minutes: 5,
            color: ColorSpec::PILL_RED,
            calibration: AxisCalibration::default(),
        }
    }
}

impl ValidatorParams {
    pub fn with_tolerance_minutes(mut self, minutes: u32) -> Self {
        self.tolerance_minutes = minutes;
        self
    }

    pub fn with_device(mut self, device: ComputeDevice) -> Self {
        self.device = device;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.calibration.validate()
    }
}
