use super::colors::Palette;
use super::error::CapacityError;

/// Assignment of atlas tiles to palette colors.
///
/// Color `i` of the palette is drawn with tile `i` of the atlas. The table
/// is only constructible when the atlas has a tile for every color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolTable {
    symbols: Vec<usize>,
}

impl SymbolTable {
    /// Assign a symbol to every color of `palette`.
    ///
    /// # Errors
    ///
    /// [`CapacityError`] if `palette` has more colors than `atlas_len`.
    pub fn assign(palette: &Palette, atlas_len: usize) -> Result<Self, CapacityError> {
        if palette.len() > atlas_len {
            return Err(CapacityError {
                symbols: atlas_len,
                colors: palette.len(),
            });
        }
        Ok(Self {
            symbols: (0..palette.len()).collect(),
        })
    }

    /// Atlas tile index for palette index `color`.
    #[inline]
    pub fn symbol_for(&self, color: usize) -> Option<usize> {
        self.symbols.get(color).copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}
