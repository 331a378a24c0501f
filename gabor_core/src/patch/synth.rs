//! Gabor patch synthesis.
//!
//! A patch is a cosine grating along the rotated x-axis multiplied by an
//! isotropic Gaussian envelope, sampled on a square grid spanning `[-1, 1]`
//! in both directions:
//!
//! ```text
//! x' =  x·cos θ + y·sin θ
//! y' = -x·sin θ + y·cos θ
//! v  = cos(2π·f·x') · exp(-(x'² + y'²) / 2σ²) · contrast
//! ```
//!
//! The value `v` is mapped from `[-1, 1]` onto `[0, 255]`, rounded and
//! clamped. Synthesis is pure; identical parameters yield bit-identical
//! buffers.

use std::f64::consts::PI;

use ndarray::{ArrayViewMut2, Zip};
use serde::{Deserialize, Serialize};

use super::PatchImage;
use crate::angle::{canonical_orientation, Orientation};
use crate::error::{GaborError, GaborResult};

/// Parameters describing a single stimulus.
///
/// # Examples
///
/// ```
/// use gabor_eye_core::PatchParams;
///
/// let params = PatchParams::new(64, 0.0, 4.0, 0.35, 0.9);
/// let image = params.render().unwrap();
/// assert_eq!(image.size(), 64);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatchParams {
    /// Edge length in pixels (patches are square)
    pub size: usize,
    /// Grating orientation in radians
    pub theta: Orientation,
    /// Carrier cycles across the patch
    pub frequency: f64,
    /// Envelope width in normalized units
    pub sigma: f64,
    /// Peak modulation, nominally in `[-1, 1]`
    pub contrast: f64,
}

impl PatchParams {
    pub fn new(size: usize, theta: Orientation, frequency: f64, sigma: f64, contrast: f64) -> Self {
        Self {
            size,
            theta,
            frequency,
            sigma,
            contrast,
        }
    }

    /// Same parameters at a different orientation.
    pub fn with_theta(self, theta: Orientation) -> Self {
        Self { theta, ..self }
    }

    pub fn validate(&self) -> GaborResult<()> {
        if self.size == 0 {
            return Err(GaborError::invalid_parameter("size", self.size, "size > 0"));
        }
        if !(self.sigma > 0.0) || !self.sigma.is_finite() {
            return Err(GaborError::invalid_parameter(
                "sigma",
                self.sigma,
                "finite sigma > 0",
            ));
        }
        if !(self.frequency >= 0.0) || !self.frequency.is_finite() {
            return Err(GaborError::invalid_parameter(
                "frequency",
                self.frequency,
                "finite frequency >= 0",
            ));
        }
        if !(2.0 * PI * self.frequency).is_finite() {
            return Err(GaborError::invalid_parameter(
                "frequency",
                self.frequency,
                "angular frequency 2π·f must be finite",
            ));
        }
        if !(2.0 * self.sigma * self.sigma).is_normal() {
            return Err(GaborError::invalid_parameter(
                "sigma",
                self.sigma,
                "2σ² must be a normal finite number",
            ));
        }
        if !self.theta.is_finite() {
            return Err(GaborError::invalid_parameter(
                "theta",
                self.theta,
                "finite orientation",
            ));
        }
        if !self.contrast.is_finite() {
            return Err(GaborError::invalid_parameter(
                "contrast",
                self.contrast,
                "finite contrast",
            ));
        }
        Ok(())
    }

    pub fn render(&self) -> GaborResult<PatchImage> {
        generate(self)
    }
}

/// Synthesizes the patch described by `params`.
///
/// # Errors
///
/// Returns [`GaborError::InvalidParameter`] when `size == 0`, `sigma <= 0`,
/// `frequency < 0`, or any real parameter is not finite. Extreme `frequency`
/// or `sigma` values whose derived terms overflow or underflow are rejected
/// too.
pub fn generate(params: &PatchParams) -> GaborResult<PatchImage> {
    params.validate()?;

    let size = params.size;
    let coords = linspace_unit(size);
    let (sin, cos) = canonical_orientation(params.theta).sin_cos();
    let omega = 2.0 * PI * params.frequency;
    let two_sigma_sq = 2.0 * params.sigma * params.sigma;
    let contrast = params.contrast;

    let mut buffer = vec![0u8; size * size];
    let pixels =
        ArrayViewMut2::from_shape((size, size), &mut buffer[..]).map_err(GaborError::render)?;
    Zip::indexed(pixels).par_for_each(|(row, col), pixel| {
        let x = coords[col];
        let y = coords[row];
        let xr = x * cos + y * sin;
        let yr = -x * sin + y * cos;
        let carrier = (omega * xr).cos();
        let envelope = (-(xr * xr + yr * yr) / two_sigma_sq).exp();
        *pixel = to_intensity(carrier * envelope * contrast);
    });

    Ok(PatchImage::from_raw(size, buffer))
}

/// Five-argument form of [`generate`].
pub fn gabor_patch(
    size: usize,
    theta: Orientation,
    frequency: f64,
    sigma: f64,
    contrast: f64,
) -> GaborResult<PatchImage> {
    generate(&PatchParams::new(size, theta, frequency, sigma, contrast))
}

/// Maps a modulation value in `[-1, 1]` onto an 8-bit intensity.
pub fn to_intensity(value: f64) -> u8 {
    (((value + 1.0) / 2.0) * 255.0).round().clamp(0.0, 255.0) as u8
}

/// `size` samples evenly spaced over `[-1, 1]` inclusive.
///
/// Odd sizes place an exact `0.0` on the middle sample. A single sample sits
/// at `-1.0`.
fn linspace_unit(size: usize) -> Vec<f64> {
    if size == 1 {
        return vec![-1.0];
    }
    let span = (size - 1) as f64;
    (0..size)
        .map(|k| -1.0 + 2.0 * k as f64 / span)
        .collect()
}
