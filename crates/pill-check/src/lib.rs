//! Validate where a colored "pill" marker sits on a symptom-tracking chart.
//!
//! This crate provides:
//! - the validation pipeline: color mask -> centroid -> time/band mapping ->
//!   tolerance checks -> verdict and message,
//! - typed configuration (`ValidatorParams`) that (de)serializes with `serde`,
//! - (feature `image`) a file-backed image source, end-to-end helpers and a
//!   debug overlay renderer,
//! - (feature `cli`) the `pill-check` batch validation binary.
//!
//! ## Quickstart
//!
//! ```no_run
//! # #[cfg(feature = "image")]
//! # fn main() {
//! let (ok, message) = pill_check::detect::validate_graph_image("slowness.png", "8:00 PM").into_tuple();
//! println!("{}: {message}", if ok { "Valid" } else { "Invalid" });
//! # }
//! # #[cfg(not(feature = "image"))]
//! # fn main() {}
//! ```
//!
//! ## API map
//! - `pill_check::core`: pixel buffers, color matching, centroid extraction.
//! - [`TimeOfDay`]: clock times with 12/24-hour parsing and circular distance.
//! - [`AxisCalibration`]: pixel <-> time/band mapping.
//! - [`PositionValidator`]: the decision engine.
//! - `pill_check::detect` (feature `image`): helpers from `image::RgbImage` and files.
//! - `pill_check::overlay` (feature `image`): debug rendering.

pub use pill_check_core as core;

mod calibration;
mod error;
mod params;
mod result;
mod source;
mod time;
mod validator;

pub use calibration::{AxisCalibration, DomainPosition, PlotArea};
pub use error::{ConfigError, ImageLoadError};
pub use params::ValidatorParams;
pub use result::{CheckFailure, ValidationReport, ValidationResult, NO_PILL_DETECTED};
pub use source::ImageSource;
pub use time::{TimeOfDay, TimeParseError, MINUTES_PER_DAY};
pub use validator::{validate_position, PositionValidator};

pub use pill_check_core::{ColorSpec, ComputeDevice, PixelBuffer, PixelPosition, PixelView};

#[cfg(feature = "image")]
pub use source::FileImageSource;

#[cfg(feature = "image")]
pub mod detect;

#[cfg(feature = "image")]
pub mod overlay;
