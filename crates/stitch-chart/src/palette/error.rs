//! Error types for palette operations
//!
//! This module provides error types for color parsing and symbol capacity
//! validation.

use std::fmt;

/// Error type for parsing hex color strings.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseColorError {
    /// Hex string has the wrong number of digits (carries the digit count
    /// after stripping `#`)
    InvalidLength(usize),
    /// Invalid hexadecimal character encountered
    InvalidHex(hex::FromHexError),
}

impl From<hex::FromHexError> for ParseColorError {
    fn from(err: hex::FromHexError) -> Self {
        ParseColorError::InvalidHex(err)
    }
}

impl fmt::Display for ParseColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseColorError::InvalidLength(len) => {
                write!(
                    f,
                    "invalid hex color length {} (expected 6 or 8 digits)",
                    len
                )
            }
            ParseColorError::InvalidHex(err) => {
                write!(f, "invalid hex character: {}", err)
            }
        }
    }
}

impl std::error::Error for ParseColorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseColorError::InvalidHex(err) => Some(err),
            _ => None,
        }
    }
}

/// The quantized grid uses more distinct colors than the atlas has symbols.
///
/// This is an expected, user-actionable condition (lower the color count,
/// merge colors, or supply a bigger sprite sheet), not a crash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityError {
    /// Number of tiles available in the atlas
    pub symbols: usize,
    /// Number of distinct colors that need a symbol
    pub colors: usize,
}

impl fmt::Display for CapacityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Not enough symbols: {} for {} colors.",
            self.symbols, self.colors
        )
    }
}

impl std::error::Error for CapacityError {}
