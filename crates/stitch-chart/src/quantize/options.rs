//! Quantization options and configuration.
//!
//! This module provides the [`QuantizeOptions`] struct for configuring the
//! clustering performed by the [`Quantizer`](super::Quantizer).

/// Configuration options for color quantization.
///
/// # Defaults
///
/// - Clusters: 16
/// - Seed: 42
/// - Maximum iterations: 64
///
/// # Example
///
/// ```
/// use stitch_chart::QuantizeOptions;
///
/// let options = QuantizeOptions::new(8)
///     .seed(7)
///     .max_iterations(20);
///
/// assert_eq!(options.clusters, 8);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantizeOptions {
    /// Target palette size `k`.
    ///
    /// Images with fewer distinct opaque colors than `k` keep the colors
    /// they have.
    pub clusters: usize,

    /// Seed for center initialization.
    ///
    /// The same image, `k` and seed always produce the same grid.
    pub seed: u64,

    /// Upper bound on Lloyd iterations.
    ///
    /// Clustering stops earlier as soon as no sample changes cluster.
    pub max_iterations: usize,
}

impl Default for QuantizeOptions {
    fn default() -> Self {
        Self {
            clusters: 16,
            seed: 42,
            max_iterations: 64,
        }
    }
}

impl QuantizeOptions {
    /// Create options targeting `clusters` colors, other fields default.
    #[inline]
    pub fn new(clusters: usize) -> Self {
        Self {
            clusters,
            ..Self::default()
        }
    }

    /// Set the initialization seed.
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the iteration cap.
    #[inline]
    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}
