//! Color reference chart: one row per palette color plus a grand total.

use stitch_chart::layout::{count_label, Anchor, Baseline, Label, LegendLayout};
use stitch_chart::{FrequencyTable, Palette, SymbolAtlas, SymbolTable};
use tiny_skia::{Color, Pixmap, PixmapPaint, Transform};

use super::{blank_canvas, fill_rect, glyph_pixmaps, TextRenderer};
use crate::error::RenderError;

const OUTLINE_GRAY: u8 = 0x33;

/// Composite the legend: for every palette color its stitch count, glyph,
/// swatch and hex code, followed by a `Total:` row.
pub fn render_legend(
    palette: &Palette,
    symbols: &SymbolTable,
    atlas: &SymbolAtlas,
    frequencies: &FrequencyTable,
    layout: &LegendLayout,
    text: &TextRenderer,
) -> Result<Pixmap, RenderError> {
    debug_assert_eq!(palette.len(), frequencies.len());

    let mut pixmap = blank_canvas(layout.width(), layout.height())?;
    let glyphs = glyph_pixmaps(palette, symbols, atlas)?;
    let tile = layout.tile();
    let outline = Color::from_rgba8(OUTLINE_GRAY, OUTLINE_GRAY, OUTLINE_GRAY, 255);

    let mut labels = Vec::with_capacity(2 * palette.len() + 1);
    for (i, color) in palette.iter().enumerate() {
        let top = layout.row_y(i);

        pixmap.draw_pixmap(
            layout.glyph_x() as i32,
            top as i32,
            glyphs[i].as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );

        fill_rect(&mut pixmap, layout.swatch_x(), top, tile, tile, outline);
        if tile > 2 {
            let [r, g, b] = color.to_bytes();
            fill_rect(
                &mut pixmap,
                layout.swatch_x() + 1,
                top + 1,
                tile - 2,
                tile - 2,
                Color::from_rgba8(r, g, b, 255),
            );
        }

        labels.push(Label {
            text: count_label(frequencies.get(i).unwrap_or(0)),
            x: layout.count_right(),
            y: layout.text_y(i),
            anchor: Anchor::End,
            baseline: Baseline::Central,
        });
        labels.push(Label {
            text: color.to_hex(),
            x: layout.hex_x(),
            y: layout.text_y(i),
            anchor: Anchor::Start,
            baseline: Baseline::Central,
        });
    }

    labels.push(Label {
        text: layout.total_label(),
        x: layout.total_x(),
        y: layout.text_y(layout.entries()),
        anchor: Anchor::Start,
        baseline: Baseline::Central,
    });
    text.draw(&mut pixmap, &labels, layout.font_size())?;

    tracing::debug!(
        width = pixmap.width(),
        height = pixmap.height(),
        entries = layout.entries(),
        "Rendered legend"
    );
    Ok(pixmap)
}
