//! Pattern chart: one glyph per stitch on a ruled, numbered grid.

use stitch_chart::layout::PatternLayout;
use stitch_chart::{Palette, PixelGrid, SymbolAtlas, SymbolTable};
use tiny_skia::{Color, Pixmap, PixmapPaint, Transform};

use super::{blank_canvas, fill_rect, glyph_pixmaps, TextRenderer};
use crate::error::RenderError;

const THIN_RULE_GRAY: u8 = 160;

/// Composite the pattern chart for `grid`.
///
/// Glyphs are pasted first, then thin rules, then thick rules so that the
/// major lines stay unbroken, and finally the axis labels in the margin.
pub fn render_pattern(
    grid: &PixelGrid,
    palette: &Palette,
    symbols: &SymbolTable,
    atlas: &SymbolAtlas,
    layout: &PatternLayout,
    text: &TextRenderer,
) -> Result<Pixmap, RenderError> {
    debug_assert_eq!(layout.columns(), grid.width());
    debug_assert_eq!(layout.rows(), grid.height());

    let mut pixmap = blank_canvas(layout.width(), layout.height())?;
    let glyphs = glyph_pixmaps(palette, symbols, atlas)?;

    for (y, row) in grid.rows().enumerate() {
        for (x, cell) in row.iter().enumerate() {
            let Some(color) = cell.color() else {
                continue;
            };
            let index = palette
                .index_of(color)
                .ok_or_else(|| RenderError::UnknownColor(color.to_hex()))?;
            let (left, top) = layout.cell_origin(x, y);
            pixmap.draw_pixmap(
                left as i32,
                top as i32,
                glyphs[index].as_ref(),
                &PixmapPaint::default(),
                Transform::identity(),
                None,
            );
        }
    }

    let thin = Color::from_rgba8(THIN_RULE_GRAY, THIN_RULE_GRAY, THIN_RULE_GRAY, 255);
    draw_rules(&mut pixmap, layout, false, thin);
    draw_rules(&mut pixmap, layout, true, Color::BLACK);

    let mut labels = layout.column_labels();
    labels.extend(layout.row_labels());
    text.draw(&mut pixmap, &labels, layout.font_size())?;

    tracing::debug!(
        width = pixmap.width(),
        height = pixmap.height(),
        labels = labels.len(),
        "Rendered pattern"
    );
    Ok(pixmap)
}

fn draw_rules(pixmap: &mut Pixmap, layout: &PatternLayout, major: bool, color: Color) {
    let across = layout.horizontal_extent();
    let down = layout.vertical_extent();

    for rule in layout.column_rules().filter(|r| r.major == major) {
        fill_rect(
            pixmap,
            rule.span.start,
            down.start,
            rule.span.len(),
            down.len(),
            color,
        );
    }
    for rule in layout.row_rules().filter(|r| r.major == major) {
        fill_rect(
            pixmap,
            across.start,
            rule.span.start,
            across.len(),
            rule.span.len(),
            color,
        );
    }
}
