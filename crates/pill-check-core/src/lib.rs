//! Core types and utilities for chart marker validation.
//!
//! This crate is intentionally small and purely pixel-level. It does *not*
//! depend on any image decoder, and it knows nothing about clocks or charts:
//! it turns an interleaved RGB(A) buffer into a color mask and reduces that
//! mask to a single centroid.

mod centroid;
mod color;
mod device;
mod image;
mod logger;
mod mask;

pub use centroid::{centroid, mask_stats, MaskStats, PixelPosition};
pub use color::{match_color, ColorSpec};
pub use device::ComputeDevice;
pub use image::{BufferError, PixelBuffer, PixelView};
pub use mask::Mask;

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::{init, init_with_level, LogOptions};
