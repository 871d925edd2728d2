//! Color quantization.
//!
//! [`Quantizer`] reduces the opaque pixels of an RGBA image to at most `k`
//! representative colors using seeded k-means clustering, and returns a
//! [`PixelGrid`] in which every opaque pixel carries its cluster color.
//! Pixels with alpha 0 become [`Cell::Transparent`] and never take part in
//! clustering.

mod kmeans;
mod options;

pub use options::QuantizeOptions;

use std::collections::HashMap;
use std::fmt;

use crate::color::Rgb;
use crate::grid::{Cell, PixelGrid};

use kmeans::Samples;

/// Error returned when an image cannot be quantized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuantizeError {
    /// The requested palette size is 0
    ZeroClusters,
    /// RGBA buffer length does not match `width * height * 4`
    BufferLength { expected: usize, actual: usize },
}

impl fmt::Display for QuantizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuantizeError::ZeroClusters => write!(f, "total colors must be at least 1"),
            QuantizeError::BufferLength { expected, actual } => write!(
                f,
                "image buffer has {} bytes, expected {}",
                actual, expected
            ),
        }
    }
}

impl std::error::Error for QuantizeError {}

/// Seeded k-means color reducer.
///
/// # Example
///
/// ```
/// use stitch_chart::{QuantizeOptions, Quantizer};
///
/// // red, red, green, black
/// let rgba = [
///     255, 0, 0, 255,   255, 0, 0, 255,
///     0, 255, 0, 255,   0, 0, 0, 255,
/// ];
/// let grid = Quantizer::new(QuantizeOptions::new(2)).reduce(&rgba, 2, 2).unwrap();
///
/// assert_eq!(grid.width(), 2);
/// assert_eq!(grid.get(0, 0), grid.get(1, 0));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Quantizer {
    options: QuantizeOptions,
}

impl Quantizer {
    pub fn new(options: QuantizeOptions) -> Self {
        Self { options }
    }

    #[inline]
    pub fn options(&self) -> &QuantizeOptions {
        &self.options
    }

    /// Reduce an RGBA image to at most `options.clusters` opaque colors.
    ///
    /// The result has the same dimensions as the input. Identical input,
    /// options and seed always give an identical grid.
    ///
    /// # Errors
    ///
    /// - [`QuantizeError::ZeroClusters`] if the cluster count is 0
    /// - [`QuantizeError::BufferLength`] if `rgba` does not hold
    ///   `width * height` pixels
    pub fn reduce(
        &self,
        rgba: &[u8],
        width: usize,
        height: usize,
    ) -> Result<PixelGrid, QuantizeError> {
        if self.options.clusters == 0 {
            return Err(QuantizeError::ZeroClusters);
        }
        let expected = width * height * 4;
        if rgba.len() != expected {
            return Err(QuantizeError::BufferLength {
                expected,
                actual: rgba.len(),
            });
        }

        // Sample index per pixel, None for transparent pixels
        let (samples, pixel_samples) = collect_samples(rgba);
        if samples.is_empty() {
            return Ok(PixelGrid::filled(Cell::Transparent, width, height));
        }

        let clustering = kmeans::run(
            &samples,
            self.options.clusters,
            self.options.seed,
            self.options.max_iterations,
        );
        tracing::debug!(
            pixels = width * height,
            samples = samples.len(),
            clusters = clustering.colors.len(),
            iterations = clustering.iterations,
            "Quantized image"
        );

        let cells = pixel_samples
            .into_iter()
            .map(|sample| match sample {
                Some(i) => Cell::Opaque(clustering.colors[clustering.assignments[i]]),
                None => Cell::Transparent,
            })
            .collect();

        Ok(PixelGrid::new(cells, width, height))
    }
}

/// Deduplicate opaque pixels into weighted samples in first-appearance
/// order, and record which sample each pixel maps to.
fn collect_samples(rgba: &[u8]) -> (Samples, Vec<Option<usize>>) {
    let mut samples = Samples::default();
    let mut index: HashMap<Rgb, usize> = HashMap::new();

    let pixel_samples = rgba
        .chunks_exact(4)
        .map(|px| {
            if px[3] == 0 {
                return None;
            }
            let color = Rgb::new(px[0], px[1], px[2]);
            let i = *index.entry(color).or_insert_with(|| {
                samples.colors.push(color);
                samples.weights.push(0);
                samples.colors.len() - 1
            });
            samples.weights[i] += 1;
            Some(i)
        })
        .collect();

    (samples, pixel_samples)
}
