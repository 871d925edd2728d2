//! xstitch - cross-stitch chart generator
//!
//! Turns a raster image and a sprite sheet of stitch symbols into a
//! printable pattern, a color reference and a reduced reference image.
//! This library exposes modules for the CLI, the HTTP service and
//! integration testing.

pub mod api;
pub mod error;
pub mod models;
pub mod rendering;
pub mod server;
pub mod services;
