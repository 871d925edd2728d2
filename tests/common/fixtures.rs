//! Test fixtures: small images synthesized in memory.

use image::{ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;

use super::app::MultipartForm;

pub const RED: [u8; 4] = [255, 0, 0, 255];
pub const GREEN: [u8; 4] = [0, 255, 0, 255];
pub const BLUE: [u8; 4] = [0, 0, 255, 255];
pub const CLEAR: [u8; 4] = [0, 0, 0, 0];

/// Side length of the quadrant image
pub const IMAGE_SIDE: u32 = 12;

/// Symbol tile size used by the fixture sheets
pub const TILE: u32 = 4;

/// Encode an image as PNG bytes
pub fn png(image: &RgbaImage) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    image
        .write_to(&mut buf, ImageFormat::Png)
        .expect("Failed to encode fixture");
    buf.into_inner()
}

/// 12x12 image with red, green and blue quadrants and a transparent one
/// (36 pixels each).
pub fn quadrant_image() -> Vec<u8> {
    let half = IMAGE_SIDE / 2;
    let image = RgbaImage::from_fn(IMAGE_SIDE, IMAGE_SIDE, |x, y| {
        Rgba(match (x < half, y < half) {
            (true, true) => RED,
            (false, true) => GREEN,
            (true, false) => BLUE,
            (false, false) => CLEAR,
        })
    });
    png(&image)
}

/// Sprite sheet with `columns` x `rows` distinct 4px symbols.
///
/// Symbol `n` (column-major) is black with a white pixel at offset `n` so
/// every tile differs.
pub fn symbol_sheet(columns: u32, rows: u32) -> Vec<u8> {
    let image = RgbaImage::from_fn(columns * TILE, rows * TILE, |x, y| {
        let n = (x / TILE) * rows + y / TILE;
        let offset = (y % TILE) * TILE + x % TILE;
        if offset == n % (TILE * TILE) {
            Rgba([255, 255, 255, 255])
        } else {
            Rgba([0, 0, 0, 255])
        }
    });
    png(&image)
}

/// Chart form with the quadrant image, a sheet of `symbols` symbols in one
/// row and the fixture tile size.
pub fn chart_form(symbols: u32) -> MultipartForm {
    MultipartForm::new()
        .file("symbols", "symbols.png", symbol_sheet(symbols, 1))
        .file("image", "image.png", quadrant_image())
        .text("symbols_dimension", &TILE.to_string())
        .text("total_colors", "4")
        .text("font_size", "10")
}
