use crate::color::Rgb;
use crate::grid::PixelGrid;

/// The distinct opaque colors of a grid in ascending [`Rgb`] order.
///
/// Sorting makes the palette, and with it symbol assignment and legend
/// order, independent of where colors happen to appear in the image.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Rgb>,
}

impl Palette {
    /// Collect, sort and deduplicate the opaque colors of `grid`.
    pub fn from_grid(grid: &PixelGrid) -> Self {
        Self::from_colors(grid.opaque_colors())
    }

    /// Build a palette from arbitrary colors; duplicates are dropped.
    pub fn from_colors(colors: impl IntoIterator<Item = Rgb>) -> Self {
        let mut colors: Vec<Rgb> = colors.into_iter().collect();
        colors.sort_unstable();
        colors.dedup();
        Self { colors }
    }

    #[inline]
    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<Rgb> {
        self.colors.get(index).copied()
    }

    /// Index of `color`, found by binary search.
    #[inline]
    pub fn index_of(&self, color: Rgb) -> Option<usize> {
        self.colors.binary_search(&color).ok()
    }

    pub fn iter(&self) -> impl Iterator<Item = Rgb> + '_ {
        self.colors.iter().copied()
    }
}
