//! stitch-chart: color reduction and symbol assignment for cross-stitch charts
//!
//! This library turns an RGBA image into the data a cross-stitch chart is
//! drawn from: a grid of a bounded number of colors, a stable color to symbol
//! table, and per-color stitch counts. It performs no I/O; decoding,
//! rasterization and encoding live with the caller.
//!
//! # Quick Start
//!
//! ```
//! use stitch_chart::{palette, FrequencyTable, QuantizeOptions, Quantizer, SymbolAtlas, TileOrder};
//!
//! // A 2x2 image: red, red, green, black
//! let image = [
//!     255, 0, 0, 255,   255, 0, 0, 255,
//!     0, 255, 0, 255,   0, 0, 0, 255,
//! ];
//! // A 20x20 sheet of 10px symbols holds four tiles
//! let sheet = vec![0u8; 20 * 20 * 4];
//! let atlas = SymbolAtlas::slice(&sheet, 20, 20, 10, TileOrder::ColumnMajor).unwrap();
//!
//! let grid = Quantizer::new(QuantizeOptions::new(2)).reduce(&image, 2, 2).unwrap();
//! let (palette, symbols) = palette::build(&grid, atlas.len()).unwrap();
//! let counts = FrequencyTable::count(&grid, &palette);
//!
//! assert_eq!(palette.len(), 2);
//! assert_eq!(symbols.len(), 2);
//! assert_eq!(counts.total(), 4);
//! ```
//!
//! # Pipeline
//!
//! ```text
//! RGBA image ──> Quantizer ──> PixelGrid ──> [merge::apply] ──> PixelGrid
//!                                                                  │
//!                     ┌────────────────────────────────────────────┤
//!                     v                                            v
//!            palette::build(grid, atlas.len())           FrequencyTable::count
//!                     │
//!                     v
//!          (Palette, SymbolTable) ──> layout::{PatternLayout, LegendLayout}
//! ```
//!
//! Palette, symbol table and counts are always rebuilt from the current
//! grid. After a merge the old ones describe colors that may no longer exist.
//!
//! # Determinism
//!
//! Quantization is seeded (see [`QuantizeOptions`]) and its parallel
//! assignment step reduces integer sums, so the same image, color count and
//! seed produce the same grid on every run and every machine. The palette is
//! sorted by color value, which makes symbol assignment independent of
//! where colors appear in the image.

pub mod atlas;
pub mod color;
pub mod grid;
pub mod layout;
pub mod merge;
pub mod palette;
pub mod quantize;


pub use atlas::{AtlasError, SymbolAtlas, Tile, TileOrder};
pub use color::{Rgb, Rgba};
pub use grid::{Cell, PixelGrid};
pub use layout::{LegendLayout, PatternLayout};
pub use merge::ColorMapping;
pub use palette::{CapacityError, FrequencyTable, Palette, ParseColorError, SymbolTable};
pub use quantize::{QuantizeError, QuantizeOptions, Quantizer};
