//! Image sampling: pixel buffer → square grayscale grid → relief heights.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::{LithoError, Result};

/// Bytes per RGBA8 sample.
pub const CHANNELS: usize = 4;

/// Borrowed RGBA8 image, row-major, no padding between rows.
#[derive(Debug, Clone, Copy)]
pub struct PixelBuffer<'a> {
    width: usize,
    height: usize,
    data: &'a [u8],
}

impl<'a> PixelBuffer<'a> {
    /// Wrap raw RGBA bytes. Fails if either side is zero or the byte count
    /// does not equal `width * height * 4`.
    pub fn new(width: usize, height: usize, data: &'a [u8]) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(LithoError::invalid_image(format!(
                "image has zero dimension ({width}x{height})"
            )));
        }
        let expected = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(CHANNELS))
            .ok_or_else(|| LithoError::invalid_image("image dimensions overflow"))?;
        if data.len() != expected {
            return Err(LithoError::invalid_image(format!(
                "expected {expected} bytes for {width}x{height} RGBA, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// RGBA sample at column `x`, row `y`.
    pub fn rgba(&self, x: usize, y: usize) -> [u8; 4] {
        let at = (y * self.width + x) * CHANNELS;
        [
            self.data[at],
            self.data[at + 1],
            self.data[at + 2],
            self.data[at + 3],
        ]
    }
}

/// Rec. 601 luma of an RGB sample, in `[0, 255]`. Alpha is ignored.
pub fn luminance(rgba: [u8; 4]) -> f64 {
    0.299 * rgba[0] as f64 + 0.587 * rgba[1] as f64 + 0.114 * rgba[2] as f64
}

/// Map a grayscale sample to a relief height.
///
/// Darker samples give thicker relief: black maps to `max_height`, white to
/// `min_height`. Input is clamped to `[0, 255]` first, so the result always
/// lies in `[min_height, max_height]`.
pub fn height_for_gray(gray: f64, min_height: f64, max_height: f64) -> f64 {
    let gray = if gray.is_nan() { 255.0 } else { gray.clamp(0.0, 255.0) };
    min_height + ((255.0 - gray) / 255.0) * (max_height - min_height)
}

/// Square grid of grayscale samples. Index `(i, j)` is (radial, angular).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeightGrid {
    resolution: usize,
    samples: Vec<f64>,
}

impl HeightGrid {
    /// Build a grid directly from row-major samples (`resolution²` values).
    pub fn from_samples(resolution: usize, samples: Vec<f64>) -> Result<Self> {
        if resolution == 0 {
            return Err(LithoError::invalid_image("grid resolution must be positive"));
        }
        if samples.len() != resolution * resolution {
            return Err(LithoError::invalid_image(format!(
                "expected {} samples for resolution {resolution}, got {}",
                resolution * resolution,
                samples.len()
            )));
        }
        Ok(Self {
            resolution,
            samples,
        })
    }

    /// Grid filled with one grayscale value.
    pub fn uniform(resolution: usize, gray: f64) -> Result<Self> {
        Self::from_samples(resolution, vec![gray; resolution * resolution])
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    pub fn gray(&self, i: usize, j: usize) -> f64 {
        self.samples[i * self.resolution + j]
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }
}

/// Downsample an image to a `min(width, height)` square grid.
///
/// Cell `(i, j)` takes the pixel at
/// `(floor(i * width / res), floor(j * height / res))`: nearest neighbour, no
/// filtering. The floors are computed in integer arithmetic.
#[instrument(skip(image), fields(width = image.width(), height = image.height()))]
pub fn extract_height_grid(image: &PixelBuffer<'_>) -> Result<HeightGrid> {
    let resolution = image.width().min(image.height());
    let mut samples = Vec::with_capacity(resolution * resolution);
    for i in 0..resolution {
        let x = i * image.width() / resolution;
        for j in 0..resolution {
            let y = j * image.height() / resolution;
            samples.push(luminance(image.rgba(x, y)));
        }
    }
    debug!(resolution, "height grid extracted");
    HeightGrid::from_samples(resolution, samples)
}
