use super::colors::Palette;
use crate::grid::PixelGrid;

/// Stitch count per palette color.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: Vec<u64>,
}

impl FrequencyTable {
    /// Count the cells of `grid` per color of `palette`.
    ///
    /// Colors missing from the palette are not counted; a palette built from
    /// the same grid covers every opaque cell.
    pub fn count(grid: &PixelGrid, palette: &Palette) -> Self {
        let mut counts = vec![0u64; palette.len()];
        for color in grid.opaque_colors() {
            if let Some(i) = palette.index_of(color) {
                counts[i] += 1;
            }
        }
        Self { counts }
    }

    /// Counts aligned with palette order.
    #[inline]
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<u64> {
        self.counts.get(index).copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Total number of stitches.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// The largest single count, 0 for an empty table.
    pub fn max(&self) -> u64 {
        self.counts.iter().copied().max().unwrap_or(0)
    }
}
