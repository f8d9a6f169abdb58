//! Conversion between pixel space and ratio space.
//!
//! Pixel coordinates are only meaningful while an image is loaded; ratio
//! coordinates are what gets stored. Every conversion needs the image's native
//! dimensions and fails with [`CoordinateUnavailable`] when they are unknown or
//! degenerate, so callers never store a garbage value.

use thiserror::Error;

use crate::constants::RATIO_DECIMALS;
use crate::model::{PixelPoint, RatioPoint};

/// Conversion was requested without usable image dimensions.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
#[error("Coordinate conversion unavailable: image size is {width}x{height}")]
pub struct CoordinateUnavailable {
    pub width: f64,
    pub height: f64,
}

fn check_dimensions(width: f64, height: f64) -> Result<(), CoordinateUnavailable> {
    if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
        Ok(())
    } else {
        Err(CoordinateUnavailable { width, height })
    }
}

/// Convert a pixel position to ratio space.
pub fn to_ratio(
    pixel: PixelPoint,
    width: f64,
    height: f64,
) -> Result<RatioPoint, CoordinateUnavailable> {
    check_dimensions(width, height)?;
    Ok(RatioPoint::new(pixel.x / width, pixel.y / height))
}

/// Convert a ratio position to pixel space.
pub fn to_pixel(
    ratio: RatioPoint,
    width: f64,
    height: f64,
) -> Result<PixelPoint, CoordinateUnavailable> {
    check_dimensions(width, height)?;
    Ok(PixelPoint::new(ratio.x * width, ratio.y * height))
}

/// Round a ratio component to the persisted precision.
pub fn round_ratio(value: f64) -> f64 {
    let scale = 10f64.powi(RATIO_DECIMALS as i32);
    (value * scale).round() / scale
}

/// Native pixel dimensions of a loaded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn to_ratio(&self, pixel: PixelPoint) -> Result<RatioPoint, CoordinateUnavailable> {
        to_ratio(pixel, f64::from(self.width), f64::from(self.height))
    }

    pub fn to_pixel(&self, ratio: RatioPoint) -> Result<PixelPoint, CoordinateUnavailable> {
        to_pixel(ratio, f64::from(self.width), f64::from(self.height))
    }
}

/// Convert with possibly-unknown dimensions (no image loaded).
pub fn ratio_for(
    size: Option<ImageSize>,
    pixel: PixelPoint,
) -> Result<RatioPoint, CoordinateUnavailable> {
    match size {
        Some(size) => size.to_ratio(pixel),
        None => Err(CoordinateUnavailable {
            width: 0.0,
            height: 0.0,
        }),
    }
}

/// Inverse of [`ratio_for`].
pub fn pixel_for(
    size: Option<ImageSize>,
    ratio: RatioPoint,
) -> Result<PixelPoint, CoordinateUnavailable> {
    match size {
        Some(size) => size.to_pixel(ratio),
        None => Err(CoordinateUnavailable {
            width: 0.0,
            height: 0.0,
        }),
    }
}
