//! The quantized cell grid.
//!
//! [`PixelGrid`] owns one [`Cell`] per input pixel in a dense row-major
//! buffer. It is produced by the [`Quantizer`](crate::Quantizer), optionally
//! rewritten in place by [`merge::apply`](crate::merge::apply), and read by
//! everything downstream.

use crate::color::{Rgb, Rgba};

/// One chart cell: either no stitch, or a stitch of one color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Transparent,
    Opaque(Rgb),
}

impl Cell {
    /// The stitch color, if any.
    #[inline]
    pub fn color(self) -> Option<Rgb> {
        match self {
            Cell::Transparent => None,
            Cell::Opaque(rgb) => Some(rgb),
        }
    }

    /// The cell as RGBA: opaque cells get alpha 255, transparent cells are
    /// [`Rgba::TRANSPARENT`].
    #[inline]
    pub fn to_rgba(self) -> Rgba {
        match self {
            Cell::Transparent => Rgba::TRANSPARENT,
            Cell::Opaque(rgb) => Rgba::from(rgb),
        }
    }

    /// Classify an RGBA value: alpha 0 is transparent, anything else opaque.
    #[inline]
    pub fn from_rgba(rgba: Rgba) -> Self {
        if rgba.is_opaque() {
            Cell::Opaque(rgba.rgb())
        } else {
            Cell::Transparent
        }
    }
}

/// A rectangular grid of cells in row-major order.
///
/// # Example
///
/// ```
/// use stitch_chart::{Cell, PixelGrid, Rgb};
///
/// let red = Cell::Opaque(Rgb::new(255, 0, 0));
/// let grid = PixelGrid::new(vec![red, Cell::Transparent], 2, 1);
///
/// assert_eq!(grid.get(0, 0), Some(red));
/// assert_eq!(grid.get(1, 0), Some(Cell::Transparent));
/// assert_eq!(grid.get(2, 0), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    cells: Vec<Cell>,
    width: usize,
    height: usize,
}

impl PixelGrid {
    /// Create a grid from cells in row-major order.
    ///
    /// # Panics (debug only)
    ///
    /// Debug-asserts that `cells.len() == width * height`.
    pub fn new(cells: Vec<Cell>, width: usize, height: usize) -> Self {
        debug_assert_eq!(
            cells.len(),
            width * height,
            "cells length ({}) must match width * height ({}x{}={})",
            cells.len(),
            width,
            height,
            width * height,
        );
        Self {
            cells,
            width,
            height,
        }
    }

    /// A grid with every cell set to `cell`.
    pub fn filled(cell: Cell, width: usize, height: usize) -> Self {
        Self::new(vec![cell; width * height], width, height)
    }

    /// Build a grid from a flat RGBA buffer without any color reduction.
    ///
    /// Returns `None` when the buffer length does not match the dimensions.
    pub fn from_rgba(rgba: &[u8], width: usize, height: usize) -> Option<Self> {
        if rgba.len() != width * height * 4 {
            return None;
        }
        let cells = rgba
            .chunks_exact(4)
            .map(|px| Cell::from_rgba(Rgba::new(px[0], px[1], px[2], px[3])))
            .collect();
        Some(Self::new(cells, width, height))
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// All cells, row-major.
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[inline]
    pub(crate) fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    /// The cell at column `x`, row `y`.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<Cell> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.cells[y * self.width + x])
    }

    /// Iterate over rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        // chunks_exact panics on 0; an empty grid has no rows anyway
        self.cells.chunks_exact(self.width.max(1))
    }

    /// Iterate over the colors of all opaque cells, row-major.
    pub fn opaque_colors(&self) -> impl Iterator<Item = Rgb> + '_ {
        self.cells.iter().filter_map(|cell| cell.color())
    }

    /// Flat `[R, G, B, A, ...]` buffer, one pixel per cell.
    ///
    /// The returned buffer has length `width * height * 4`.
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        let mut rgba = Vec::with_capacity(self.cells.len() * 4);
        for cell in &self.cells {
            rgba.extend_from_slice(&cell.to_rgba().to_bytes());
        }
        rgba
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgb = Rgb::new(255, 0, 0);
    const BLUE: Rgb = Rgb::new(0, 0, 255);

    fn sample_grid() -> PixelGrid {
        PixelGrid::new(
            vec![
                Cell::Opaque(RED),
                Cell::Transparent,
                Cell::Opaque(BLUE),
                Cell::Opaque(RED),
                Cell::Opaque(RED),
                Cell::Transparent,
            ],
            3,
            2,
        )
    }

    #[test]
    fn test_get_is_row_major() {
        let grid = sample_grid();
        assert_eq!(grid.get(2, 0), Some(Cell::Opaque(BLUE)));
        assert_eq!(grid.get(0, 1), Some(Cell::Opaque(RED)));
        assert_eq!(grid.get(2, 1), Some(Cell::Transparent));
        assert_eq!(grid.get(0, 2), None);
    }

    #[test]
    fn test_rows() {
        let grid = sample_grid();
        let rows: Vec<&[Cell]> = grid.rows().collect();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|row| row.len() == 3));
    }

    #[test]
    fn test_opaque_colors_skip_transparent() {
        let grid = sample_grid();
        let colors: Vec<Rgb> = grid.opaque_colors().collect();
        assert_eq!(colors, vec![RED, BLUE, RED, RED]);
    }

    #[test]
    fn test_to_rgba_bytes_layout() {
        let grid = PixelGrid::new(vec![Cell::Opaque(RED), Cell::Transparent], 2, 1);
        assert_eq!(grid.to_rgba_bytes(), vec![255, 0, 0, 255, 0, 0, 0, 0]);
    }

    #[test]
    fn test_from_rgba_binary_alpha() {
        let rgba = [10, 20, 30, 1, 10, 20, 30, 0];
        let grid = PixelGrid::from_rgba(&rgba, 2, 1).unwrap();
        assert_eq!(grid.get(0, 0), Some(Cell::Opaque(Rgb::new(10, 20, 30))));
        assert_eq!(grid.get(1, 0), Some(Cell::Transparent));

        assert!(PixelGrid::from_rgba(&rgba, 3, 1).is_none());
    }

    #[test]
    fn test_empty_grid() {
        let grid = PixelGrid::new(Vec::new(), 0, 0);
        assert_eq!(grid.rows().count(), 0);
        assert!(grid.to_rgba_bytes().is_empty());
    }
}
