//! Symbol atlas: glyph tiles sliced from a sprite sheet.
//!
//! Tiles are addressed by position, never by appearance. Palette index `i`
//! is drawn with tile `i`, so the enumeration order below is part of the
//! contract with every sprite sheet authored for it.

use std::fmt;

/// Enumeration order of tiles within a sprite sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TileOrder {
    /// All tiles of the first column top to bottom, then the second column.
    #[default]
    ColumnMajor,
    /// All tiles of the first row left to right, then the second row.
    RowMajor,
}

/// Error returned when a sprite sheet cannot be sliced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AtlasError {
    /// Tile dimension is zero
    ZeroDimension,
    /// Sheet dimensions are not exact multiples of the tile dimension
    Misaligned {
        width: usize,
        height: usize,
        dimension: usize,
    },
    /// RGBA buffer length does not match `width * height * 4`
    BufferLength { expected: usize, actual: usize },
}

impl fmt::Display for AtlasError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AtlasError::ZeroDimension => write!(f, "symbol dimension must be at least 1"),
            AtlasError::Misaligned {
                width,
                height,
                dimension,
            } => write!(
                f,
                "symbol sheet {}x{} is not a multiple of the {}px symbol size",
                width, height, dimension
            ),
            AtlasError::BufferLength { expected, actual } => write!(
                f,
                "symbol sheet buffer has {} bytes, expected {}",
                actual, expected
            ),
        }
    }
}

impl std::error::Error for AtlasError {}

/// One square glyph bitmap, RGBA, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    dimension: usize,
    rgba: Vec<u8>,
}

impl Tile {
    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Raw `[R, G, B, A, ...]` bytes, `dimension * dimension * 4` long.
    #[inline]
    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }

    /// The pixel at (`x`, `y`) within the tile.
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.dimension || y >= self.dimension {
            return None;
        }
        let i = (y * self.dimension + x) * 4;
        Some([
            self.rgba[i],
            self.rgba[i + 1],
            self.rgba[i + 2],
            self.rgba[i + 3],
        ])
    }
}

/// An ordered list of `D×D` glyph tiles.
///
/// # Example
///
/// ```
/// use stitch_chart::{SymbolAtlas, TileOrder};
///
/// // A 4x2 sheet with 2px tiles holds two columns of one tile each.
/// let sheet = vec![255u8; 4 * 2 * 4];
/// let atlas = SymbolAtlas::slice(&sheet, 4, 2, 2, TileOrder::ColumnMajor).unwrap();
///
/// assert_eq!(atlas.len(), 2);
/// assert_eq!(atlas.dimension(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct SymbolAtlas {
    dimension: usize,
    tiles: Vec<Tile>,
}

impl SymbolAtlas {
    /// Slice an RGBA sprite sheet into non-overlapping `dimension`-sized
    /// tiles.
    ///
    /// # Errors
    ///
    /// - [`AtlasError::ZeroDimension`] if `dimension` is 0
    /// - [`AtlasError::BufferLength`] if `rgba` does not hold
    ///   `width * height` pixels
    /// - [`AtlasError::Misaligned`] if either sheet side is not a multiple of
    ///   `dimension`
    pub fn slice(
        rgba: &[u8],
        width: usize,
        height: usize,
        dimension: usize,
        order: TileOrder,
    ) -> Result<Self, AtlasError> {
        if dimension == 0 {
            return Err(AtlasError::ZeroDimension);
        }
        let expected = width * height * 4;
        if rgba.len() != expected {
            return Err(AtlasError::BufferLength {
                expected,
                actual: rgba.len(),
            });
        }
        if width % dimension != 0 || height % dimension != 0 {
            return Err(AtlasError::Misaligned {
                width,
                height,
                dimension,
            });
        }

        let columns = width / dimension;
        let rows = height / dimension;
        let positions: Vec<(usize, usize)> = match order {
            TileOrder::ColumnMajor => (0..columns)
                .flat_map(|col| (0..rows).map(move |row| (col, row)))
                .collect(),
            TileOrder::RowMajor => (0..rows)
                .flat_map(|row| (0..columns).map(move |col| (col, row)))
                .collect(),
        };

        let row_bytes = dimension * 4;
        let tiles = positions
            .into_iter()
            .map(|(col, row)| {
                let mut tile = Vec::with_capacity(dimension * row_bytes);
                for ty in 0..dimension {
                    let start = ((row * dimension + ty) * width + col * dimension) * 4;
                    tile.extend_from_slice(&rgba[start..start + row_bytes]);
                }
                Tile {
                    dimension,
                    rgba: tile,
                }
            })
            .collect();

        Ok(Self { dimension, tiles })
    }

    /// Side length of every tile in pixels.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    #[inline]
    pub fn tile(&self, index: usize) -> Option<&Tile> {
        self.tiles.get(index)
    }

    #[inline]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }
}
