//! 8-bit sRGB color values and their hex notation.

use std::fmt;
use std::str::FromStr;

use crate::palette::ParseColorError;

/// An opaque chart color.
///
/// Field order matters: the derived `Ord` compares `r`, then `g`, then `b`,
/// which is the total order palettes are sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rgb {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Convert to a byte array [R, G, B].
    #[inline]
    pub const fn to_bytes(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Squared Euclidean distance in RGB space.
    #[inline]
    pub fn distance_squared(self, other: Rgb) -> u32 {
        let dr = self.r as i32 - other.r as i32;
        let dg = self.g as i32 - other.g as i32;
        let db = self.b as i32 - other.b as i32;
        (dr * dr + dg * dg + db * db) as u32
    }

    /// Format as `#RRGGBB` with uppercase digits.
    ///
    /// # Example
    /// ```
    /// use stitch_chart::Rgb;
    /// assert_eq!(Rgb::new(255, 160, 10).to_hex(), "#FFA00A");
    /// ```
    pub fn to_hex(self) -> String {
        format!("#{}", hex::encode_upper(self.to_bytes()))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgb {
    type Err = ParseColorError;

    /// Parse `#RRGGBB` or `RRGGBB`, case-insensitive, surrounding
    /// whitespace ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = decode_hex(s)?;
        match bytes.as_slice() {
            &[r, g, b] => Ok(Self::new(r, g, b)),
            _ => Err(ParseColorError::InvalidLength(bytes.len() * 2)),
        }
    }
}

/// A color with an alpha channel.
///
/// Cells are either fully transparent or fully opaque, so the only alpha
/// values a grid ever produces are `0` and `255`. Merge directives may name
/// other values; any non-zero alpha is treated as opaque.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// The value transparent cells carry.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub const fn is_opaque(self) -> bool {
        self.a != 0
    }

    /// The color channels without alpha.
    #[inline]
    pub const fn rgb(self) -> Rgb {
        Rgb::new(self.r, self.g, self.b)
    }

    #[inline]
    pub const fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Format as `#RRGGBBAA` with uppercase digits.
    pub fn to_hex(self) -> String {
        format!("#{}", hex::encode_upper(self.to_bytes()))
    }
}

impl From<Rgb> for Rgba {
    fn from(rgb: Rgb) -> Self {
        Self::new(rgb.r, rgb.g, rgb.b, 255)
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgba {
    type Err = ParseColorError;

    /// Parse `#RRGGBBAA`, or `#RRGGBB` with an implied alpha of `FF`.
    ///
    /// # Examples
    ///
    /// ```
    /// use stitch_chart::Rgba;
    ///
    /// let half: Rgba = "#10203080".parse().unwrap();
    /// assert_eq!(half.a, 0x80);
    ///
    /// let solid: Rgba = "102030".parse().unwrap();
    /// assert_eq!(solid.a, 0xFF);
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = decode_hex(s)?;
        match bytes.as_slice() {
            &[r, g, b] => Ok(Self::new(r, g, b, 255)),
            &[r, g, b, a] => Ok(Self::new(r, g, b, a)),
            _ => Err(ParseColorError::InvalidLength(bytes.len() * 2)),
        }
    }
}

fn decode_hex(s: &str) -> Result<Vec<u8>, ParseColorError> {
    let s = s.trim();
    let s = s.strip_prefix('#').unwrap_or(s);
    if s.len() != 6 && s.len() != 8 {
        return Err(ParseColorError::InvalidLength(s.len()));
    }
    Ok(hex::decode(s)?)
}
