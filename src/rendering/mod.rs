pub mod encode;
pub mod legend;
pub mod pattern;
pub mod text;

pub use encode::{encode_pixmap, encode_rgba};
pub use legend::render_legend;
pub use pattern::render_pattern;
pub use text::TextRenderer;

use stitch_chart::{Palette, SymbolAtlas, SymbolTable, Tile};
use tiny_skia::{Color, ColorU8, Paint, Pixmap, Rect, Transform};

use crate::error::RenderError;

/// Allocate a white canvas.
pub(crate) fn blank_canvas(width: usize, height: usize) -> Result<Pixmap, RenderError> {
    let mut pixmap =
        Pixmap::new(width as u32, height as u32).ok_or(RenderError::PixmapAllocation)?;
    pixmap.fill(Color::WHITE);
    Ok(pixmap)
}

/// Fill an axis-aligned rectangle without anti-aliasing. Empty rectangles
/// are skipped.
pub(crate) fn fill_rect(
    pixmap: &mut Pixmap,
    x: usize,
    y: usize,
    width: usize,
    height: usize,
    color: Color,
) {
    if width == 0 || height == 0 {
        return;
    }
    let Some(rect) = Rect::from_xywh(x as f32, y as f32, width as f32, height as f32) else {
        return;
    };
    let mut paint = Paint::default();
    paint.set_color(color);
    paint.anti_alias = false;
    pixmap.fill_rect(rect, &paint, Transform::identity(), None);
}

/// Convert a straight-alpha tile into a premultiplied pixmap.
pub(crate) fn tile_pixmap(tile: &Tile) -> Result<Pixmap, RenderError> {
    let size = tile.dimension() as u32;
    let mut pixmap = Pixmap::new(size, size).ok_or(RenderError::PixmapAllocation)?;
    debug_assert_eq!(pixmap.pixels().len() * 4, tile.rgba().len());

    for (dst, src) in pixmap
        .pixels_mut()
        .iter_mut()
        .zip(tile.rgba().chunks_exact(4))
    {
        *dst = ColorU8::from_rgba(src[0], src[1], src[2], src[3]).premultiply();
    }
    Ok(pixmap)
}

/// Glyph pixmaps indexed by palette position.
pub(crate) fn glyph_pixmaps(
    palette: &Palette,
    symbols: &SymbolTable,
    atlas: &SymbolAtlas,
) -> Result<Vec<Pixmap>, RenderError> {
    (0..palette.len())
        .map(|color| {
            let tile = symbols
                .symbol_for(color)
                .and_then(|symbol| atlas.tile(symbol))
                .ok_or(RenderError::MissingSymbol(color))?;
            tile_pixmap(tile)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use stitch_chart::TileOrder;

    #[test]
    fn test_tile_pixmap_premultiplies() {
        let rgba = [200, 100, 50, 128].repeat(4);
        let atlas = SymbolAtlas::slice(&rgba, 2, 2, 2, TileOrder::ColumnMajor).unwrap();

        let pixmap = tile_pixmap(atlas.tile(0).unwrap()).unwrap();
        let pixel = pixmap.pixel(1, 1).unwrap();
        assert_eq!(pixel.alpha(), 128);
        assert!(pixel.red() < 200);

        let straight = pixel.demultiply();
        assert!(straight.red().abs_diff(200) <= 1);
    }

    #[test]
    fn test_fill_rect_is_crisp() {
        let mut pixmap = blank_canvas(6, 6).unwrap();
        fill_rect(&mut pixmap, 2, 0, 2, 6, Color::BLACK);

        let black = |x, y| pixmap.pixel(x, y).unwrap().red() == 0;
        assert!(!black(1, 3));
        assert!(black(2, 3));
        assert!(black(3, 3));
        assert!(!black(4, 3));
    }

    #[test]
    fn test_fill_rect_empty_is_noop() {
        let mut pixmap = blank_canvas(4, 4).unwrap();
        fill_rect(&mut pixmap, 1, 1, 0, 3, Color::BLACK);
        fill_rect(&mut pixmap, 1, 1, 3, 0, Color::BLACK);
        assert!(pixmap.pixels().iter().all(|p| p.red() == 255));
    }

    #[test]
    fn test_glyph_pixmaps_per_palette_color() {
        use stitch_chart::{Palette, Rgb, SymbolTable};

        let rgba = [0, 0, 0, 255].repeat(4 * 2);
        let atlas = SymbolAtlas::slice(&rgba, 4, 2, 2, TileOrder::ColumnMajor).unwrap();
        let palette = Palette::from_colors([Rgb::BLACK, Rgb::WHITE]);
        let symbols = SymbolTable::assign(&palette, atlas.len()).unwrap();

        let glyphs = glyph_pixmaps(&palette, &symbols, &atlas).unwrap();
        assert_eq!(glyphs.len(), 2);
        assert_eq!(glyphs[0].width(), 2);
    }
}
