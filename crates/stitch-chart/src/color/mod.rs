//! Color types
//!
//! Charts only ever deal in whole 8-bit sRGB channel values, so there is no
//! floating point or linear-light representation here.
//!
//! - [`Rgb`]: an opaque chart color. Its derived ordering is lexicographic
//!   over `(r, g, b)` and is what sorts a [`Palette`](crate::Palette).
//! - [`Rgba`]: a color with alpha, used by merge directives that address
//!   transparent cells as well as opaque ones.
//!
//! # Example
//!
//! ```
//! use stitch_chart::{Rgb, Rgba};
//!
//! let red: Rgb = "#FF0000".parse().unwrap();
//! assert_eq!(red.to_hex(), "#FF0000");
//!
//! let key: Rgba = "#FF0000FF".parse().unwrap();
//! assert_eq!(key, Rgba::from(red));
//! ```

mod rgb;

pub use rgb::{Rgb, Rgba};
