//! Pixel <-> chart-domain mapping.
//!
//! The horizontal extent of the chart (or of its plot area) covers a window of
//! `window_minutes` starting at `start`. Vertical positions are expressed as a
//! fraction of the chart height, 0.0 at the top.

use pill_check_core::PixelPosition;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::time::{TimeOfDay, MINUTES_PER_DAY};

/// Pixel rectangle of the plot area inside the image.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Axis calibration shared by every image of a run.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisCalibration {
    /// Time at the left edge.
    pub start: TimeOfDay,
    /// Minutes covered by the full horizontal extent (1440 = whole day).
    pub window_minutes: u32,
    /// Markers must sit in the top `top_band_fraction` of the height (inclusive).
    pub top_band_fraction: f64,
    /// Measure relative to this rectangle instead of the whole image.
    pub plot_area: Option<PlotArea>,
}

impl Default for AxisCalibration {
    fn default() -> Self {
        Self {
            start: TimeOfDay::MIDNIGHT,
            window_minutes: MINUTES_PER_DAY,
            top_band_fraction: 0.15,
            plot_area: None,
        }
    }
}

/// Marker position in chart terms.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DomainPosition {
    /// Time under the marker, rounded to the nearest minute.
    pub time: TimeOfDay,
    /// 0.0 = top, 1.0 = bottom.
    pub vertical_fraction: f64,
}

impl AxisCalibration {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let band = self.top_band_fraction;
        if !band.is_finite() || band <= 0.0 || band > 1.0 {
            return Err(ConfigError::InvalidBandFraction(band));
        }
        if self.window_minutes == 0 || self.window_minutes > MINUTES_PER_DAY {
            return Err(ConfigError::InvalidTimeWindow(self.window_minutes));
        }
        if let Some(area) = self.plot_area {
            let ok = [area.left, area.top, area.width, area.height]
                .iter()
                .all(|v| v.is_finite())
                && area.width > 0.0
                && area.height > 0.0;
            if !ok {
                return Err(ConfigError::InvalidPlotArea {
                    width: area.width,
                    height: area.height,
                });
            }
        }
        Ok(())
    }

    /// `(left, top, width, height)` of the mapped region for an image of `size`.
    fn extent(&self, (width, height): (usize, usize)) -> (f64, f64, f64, f64) {
        match self.plot_area {
            Some(a) => (a.left, a.top, a.width, a.height),
            None => (0.0, 0.0, width as f64, height as f64),
        }
    }

    /// Map a pixel position to time-of-day and vertical fraction.
    ///
    /// A zero-sized extent or a non-finite coordinate maps to the window start
    /// and the top edge.
    pub fn to_domain(&self, pos: PixelPosition, size: (usize, usize)) -> DomainPosition {
        let (left, top, w, h) = self.extent(size);
        let fx = ratio(pos.x - left, w);
        let fy = ratio(pos.y - top, h);

        // reduced before the cast so far-off x values cannot overflow i64
        let offset = (fx * self.window_minutes as f64)
            .round()
            .rem_euclid(MINUTES_PER_DAY as f64);
        let offset = if offset.is_finite() { offset as i64 } else { 0 };
        DomainPosition {
            time: TimeOfDay::from_minutes(self.start.minutes() as i64 + offset),
            vertical_fraction: fy.clamp(0.0, 1.0),
        }
    }

    /// Inverse of the time mapping: x pixel where `time` is drawn.
    ///
    /// Returns `None` when `time` falls outside the calibrated window.
    pub fn time_to_x(&self, time: TimeOfDay, size: (usize, usize)) -> Option<f64> {
        let offset = self.start.minutes_until(time);
        if offset >= self.window_minutes {
            return None;
        }
        let (left, _, w, _) = self.extent(size);
        Some(left + offset as f64 / self.window_minutes as f64 * w)
    }

    /// y pixel of the lower edge of the valid top band.
    pub fn band_limit_y(&self, size: (usize, usize)) -> f64 {
        let (_, top, _, h) = self.extent(size);
        top + self.top_band_fraction * h
    }

    /// Horizontal pixels per minute for an image of `size`.
    pub fn px_per_minute(&self, size: (usize, usize)) -> f64 {
        let (_, _, w, _) = self.extent(size);
        w / self.window_minutes as f64
    }
}

#[inline]
fn ratio(v: f64, extent: f64) -> f64 {
    if extent > 0.0 && v.is_finite() {
        v / extent
    } else {
        0.0
    }
}
