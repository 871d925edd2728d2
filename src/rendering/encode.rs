//! PNG output.
//!
//! Images are encoded quickly with the `png` crate, then recompressed with
//! oxipng. If recompression fails the plain encoding is kept.

use std::io::Cursor;
use tiny_skia::Pixmap;

use crate::error::RenderError;

/// Encode straight (non-premultiplied) RGBA pixels as an optimized PNG.
pub fn encode_rgba(width: u32, height: u32, rgba: &[u8]) -> Result<Vec<u8>, RenderError> {
    let png_bytes = encode_png(width, height, rgba)?;
    Ok(optimize(png_bytes))
}

/// Encode a rendered chart pixmap as an optimized PNG.
pub fn encode_pixmap(pixmap: &Pixmap) -> Result<Vec<u8>, RenderError> {
    let rgba: Vec<u8> = pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect();
    encode_rgba(pixmap.width(), pixmap.height(), &rgba)
}

fn encode_png(width: u32, height: u32, rgba: &[u8]) -> Result<Vec<u8>, RenderError> {
    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        // Fast settings, oxipng re-compresses
        encoder.set_compression(png::Compression::Fast);
        encoder.set_filter(png::FilterType::NoFilter);
        let mut writer = encoder
            .write_header()
            .map_err(|e| RenderError::PngEncode(e.to_string()))?;
        writer
            .write_image_data(rgba)
            .map_err(|e| RenderError::PngEncode(e.to_string()))?;
    }
    Ok(buf.into_inner())
}

fn optimize(png_bytes: Vec<u8>) -> Vec<u8> {
    let before = png_bytes.len();
    match oxipng::optimize_from_memory(
        &png_bytes,
        &oxipng::Options {
            strip: oxipng::StripChunks::Safe,
            optimize_alpha: false,
            ..Default::default()
        },
    ) {
        Ok(optimized) => {
            tracing::debug!(before, after = optimized.len(), "Optimized PNG");
            optimized
        }
        Err(e) => {
            tracing::warn!(%e, "PNG optimization failed, keeping plain encoding");
            png_bytes
        }
    }
}
