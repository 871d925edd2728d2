//! Palette, symbol assignment and stitch counts.
//!
//! Everything here is derived from a [`PixelGrid`] and rebuilt whenever the
//! grid changes; none of it is ever patched in place.
//!
//! - [`Palette`]: the distinct opaque colors of a grid, sorted.
//! - [`SymbolTable`]: palette index to atlas tile index.
//! - [`FrequencyTable`]: stitch count per palette index.

mod colors;
mod error;
mod frequency;
mod symbols;

pub use colors::Palette;
pub use error::{CapacityError, ParseColorError};
pub use frequency::FrequencyTable;
pub use symbols::SymbolTable;

use crate::grid::PixelGrid;

/// Derive the palette of `grid` and assign every color a symbol.
///
/// # Errors
///
/// Returns [`CapacityError`] when the grid has more distinct colors than
/// `atlas_len`.
///
/// # Example
///
/// ```
/// use stitch_chart::{palette, Cell, PixelGrid, Rgb};
///
/// let grid = PixelGrid::new(
///     vec![Cell::Opaque(Rgb::WHITE), Cell::Opaque(Rgb::BLACK)],
///     2,
///     1,
/// );
/// let (palette, symbols) = palette::build(&grid, 4).unwrap();
///
/// assert_eq!(palette.colors(), &[Rgb::BLACK, Rgb::WHITE]);
/// assert_eq!(symbols.symbol_for(1), Some(1));
///
/// assert!(palette::build(&grid, 1).is_err());
/// ```
pub fn build(grid: &PixelGrid, atlas_len: usize) -> Result<(Palette, SymbolTable), CapacityError> {
    let palette = Palette::from_grid(grid);
    let symbols = SymbolTable::assign(&palette, atlas_len)?;
    Ok((palette, symbols))
}
