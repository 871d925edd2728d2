//! Exact-match color substitution.
//!
//! A [`ColorMapping`] names source colors and the colors that replace them.
//! Applying it rewrites every grid cell whose RGBA value equals a source
//! verbatim; there is no nearest-color matching. Opaque cells compare as
//! `(r, g, b, 255)` and transparent cells as `(0, 0, 0, 0)`.
//!
//! After a merge the palette, symbol table and frequency table of the grid
//! are stale and must be rebuilt from the returned grid.

use crate::color::Rgba;
use crate::grid::{Cell, PixelGrid};

/// Source to target color pairs, kept sorted by source.
///
/// # Example
///
/// ```
/// use stitch_chart::{merge, Cell, ColorMapping, PixelGrid, Rgb, Rgba};
///
/// let red = Rgb::new(255, 0, 0);
/// let green = Rgb::new(0, 255, 0);
///
/// let mut mapping = ColorMapping::new();
/// mapping.insert(Rgba::from(red), Rgba::from(green));
///
/// let mut grid = PixelGrid::new(vec![Cell::Opaque(red), Cell::Transparent], 2, 1);
/// assert_eq!(merge::apply(&mut grid, &mapping), 1);
/// assert_eq!(grid.get(0, 0), Some(Cell::Opaque(green)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorMapping {
    pairs: Vec<(Rgba, Rgba)>,
}

impl ColorMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `source` to `target`, replacing any earlier target for `source`.
    pub fn insert(&mut self, source: Rgba, target: Rgba) {
        match self.pairs.binary_search_by_key(&source, |&(s, _)| s) {
            Ok(i) => self.pairs[i].1 = target,
            Err(i) => self.pairs.insert(i, (source, target)),
        }
    }

    /// Target for `source`, if it is mapped.
    #[inline]
    pub fn get(&self, source: Rgba) -> Option<Rgba> {
        self.pairs
            .binary_search_by_key(&source, |&(s, _)| s)
            .ok()
            .map(|i| self.pairs[i].1)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Pairs in ascending source order.
    pub fn iter(&self) -> impl Iterator<Item = (Rgba, Rgba)> + '_ {
        self.pairs.iter().copied()
    }
}

impl FromIterator<(Rgba, Rgba)> for ColorMapping {
    fn from_iter<I: IntoIterator<Item = (Rgba, Rgba)>>(iter: I) -> Self {
        let mut mapping = ColorMapping::new();
        for (source, target) in iter {
            mapping.insert(source, target);
        }
        mapping
    }
}

/// Substitute mapped colors in place. Returns the number of cells replaced.
///
/// A target with alpha 0 turns the cell transparent. Each cell is looked up
/// once, so chains such as `A -> B, B -> C` move `A` cells to `B` only.
pub fn apply(grid: &mut PixelGrid, mapping: &ColorMapping) -> usize {
    if mapping.is_empty() {
        return 0;
    }
    let mut replaced = 0;
    for cell in grid.cells_mut() {
        if let Some(target) = mapping.get(cell.to_rgba()) {
            *cell = Cell::from_rgba(target);
            replaced += 1;
        }
    }
    replaced
}

/// By-value form of [`apply`].
pub fn merged(mut grid: PixelGrid, mapping: &ColorMapping) -> PixelGrid {
    apply(&mut grid, mapping);
    grid
}
