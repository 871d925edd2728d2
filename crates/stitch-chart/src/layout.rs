//! Chart geometry.
//!
//! Pure arithmetic shared by the pattern and legend renderers: raster sizes,
//! cell origins, rule positions and label anchors. All values are whole
//! pixels. Text extents are estimated from the font size (0.6 em per
//! character), which is generous for digits in common sans-serif faces.

use std::ops::Range;

use crate::palette::FrequencyTable;

/// Width of a cell-boundary rule.
pub const THIN_RULE: usize = 1;
/// Width of the rule drawn every [`MAJOR_INTERVAL`] cells.
pub const THICK_RULE: usize = 2;
/// Cells between thick rules and axis labels.
pub const MAJOR_INTERVAL: usize = 10;
/// Gap between a label and the rule or edge it belongs to.
pub const LABEL_PAD: usize = 4;
/// Vertical gap between legend rows.
pub const ROW_GAP: usize = 6;
/// Outer margin of the legend on every side.
pub const LEGEND_MARGIN: usize = 10;
/// Horizontal gap between legend columns.
pub const COLUMN_GAP: usize = 8;

/// Number of decimal digits in `n`; 0 has one digit.
pub fn digit_count(mut n: u64) -> usize {
    let mut digits = 1;
    while n >= 10 {
        n /= 10;
        digits += 1;
    }
    digits
}

/// Estimated width of `chars` characters at `font_size`, rounded up.
#[inline]
pub fn text_width(chars: usize, font_size: usize) -> usize {
    (chars * font_size * 3).div_ceil(5)
}

/// Horizontal alignment of a label relative to its anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Start,
    Middle,
    End,
}

/// Vertical alignment of a label relative to its anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Baseline {
    /// The anchor is the bottom of the digits
    Alphabetic,
    /// The anchor is the vertical center of the digits
    Central,
}

/// A positioned text label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub text: String,
    pub x: usize,
    pub y: usize,
    pub anchor: Anchor,
    pub baseline: Baseline,
}

/// One cell-boundary rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// Boundary index, 0 at the top/left edge of the grid
    pub index: usize,
    /// Pixels covered across the rule direction
    pub span: Range<usize>,
    pub major: bool,
}

/// Geometry of the pattern raster.
///
/// The grid of `columns × rows` cells of `tile` pixels sits inside a margin
/// of `margin` pixels on all four sides:
///
/// ```text
/// width  = columns · tile + 2 · margin
/// height = rows    · tile + 2 · margin
/// ```
///
/// # Example
///
/// ```
/// use stitch_chart::layout::PatternLayout;
///
/// let layout = PatternLayout::new(30, 20, 10, 16).with_margin(40);
/// assert_eq!((layout.width(), layout.height()), (380, 280));
/// assert_eq!(layout.cell_origin(2, 1), (60, 50));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternLayout {
    columns: usize,
    rows: usize,
    tile: usize,
    margin: usize,
    font_size: usize,
}

impl PatternLayout {
    /// Layout with the margin derived from the widest axis label.
    pub fn new(columns: usize, rows: usize, tile: usize, font_size: usize) -> Self {
        Self {
            columns,
            rows,
            tile,
            margin: Self::default_margin(columns, rows, font_size),
            font_size,
        }
    }

    /// Override the margin. It never shrinks below the thick rule, which
    /// straddles the outer grid edge.
    pub fn with_margin(mut self, margin: usize) -> Self {
        self.margin = margin.max(THICK_RULE);
        self
    }

    /// Margin wide enough for the longest row label and tall enough for a
    /// column label, each with padding on both sides.
    pub fn default_margin(columns: usize, rows: usize, font_size: usize) -> usize {
        let longest = digit_count(columns.max(rows) as u64);
        let horizontal = text_width(longest, font_size) + 2 * LABEL_PAD + THICK_RULE;
        let vertical = font_size + 2 * LABEL_PAD + THICK_RULE;
        horizontal.max(vertical)
    }

    #[inline]
    pub fn columns(&self) -> usize {
        self.columns
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn tile(&self) -> usize {
        self.tile
    }

    #[inline]
    pub fn margin(&self) -> usize {
        self.margin
    }

    #[inline]
    pub fn font_size(&self) -> usize {
        self.font_size
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.columns * self.tile + 2 * self.margin
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.rows * self.tile + 2 * self.margin
    }

    /// Top-left pixel of cell (`x`, `y`).
    #[inline]
    pub fn cell_origin(&self, x: usize, y: usize) -> (usize, usize) {
        (x * self.tile + self.margin, y * self.tile + self.margin)
    }

    /// Pixel offset of boundary `i`, on either axis.
    #[inline]
    pub fn boundary(&self, i: usize) -> usize {
        self.margin + i * self.tile
    }

    /// Pixels the rules cover horizontally: the grid plus the half of a
    /// thick rule that overhangs each edge.
    pub fn horizontal_extent(&self) -> Range<usize> {
        self.margin - 1..self.boundary(self.columns) + 1
    }

    /// Vertical counterpart of [`horizontal_extent`](Self::horizontal_extent).
    pub fn vertical_extent(&self) -> Range<usize> {
        self.margin - 1..self.boundary(self.rows) + 1
    }

    /// Vertical rules, left to right, one per column boundary `0..=columns`.
    pub fn column_rules(&self) -> impl Iterator<Item = Rule> + '_ {
        (0..=self.columns).map(move |i| self.rule(i))
    }

    /// Horizontal rules, top to bottom, one per row boundary `0..=rows`.
    pub fn row_rules(&self) -> impl Iterator<Item = Rule> + '_ {
        (0..=self.rows).map(move |i| self.rule(i))
    }

    fn rule(&self, index: usize) -> Rule {
        let offset = self.boundary(index);
        let major = index % MAJOR_INTERVAL == 0;
        let span = if major {
            offset - 1..offset - 1 + THICK_RULE
        } else {
            offset..offset + THIN_RULE
        };
        Rule { index, span, major }
    }

    /// Column numbers above the grid, centered on every thick rule after
    /// the first.
    pub fn column_labels(&self) -> Vec<Label> {
        let y = self.margin.saturating_sub(LABEL_PAD + THICK_RULE);
        major_indices(self.columns)
            .map(|i| Label {
                text: i.to_string(),
                x: self.boundary(i),
                y,
                anchor: Anchor::Middle,
                baseline: Baseline::Alphabetic,
            })
            .collect()
    }

    /// Row numbers left of the grid, right-aligned and vertically centered
    /// on every thick rule after the first.
    pub fn row_labels(&self) -> Vec<Label> {
        let x = self.margin.saturating_sub(LABEL_PAD + THICK_RULE);
        major_indices(self.rows)
            .map(|i| Label {
                text: i.to_string(),
                x,
                y: self.boundary(i),
                anchor: Anchor::End,
                baseline: Baseline::Central,
            })
            .collect()
    }
}

fn major_indices(count: usize) -> impl Iterator<Item = usize> {
    (MAJOR_INTERVAL..=count).step_by(MAJOR_INTERVAL)
}

/// Geometry of the legend raster.
///
/// Each palette entry is one row; a final row carries the grand total.
/// Columns, left to right: count (right-aligned), glyph, swatch, hex code.
///
/// ```text
/// | 1234× [glyph] [swatch] #A1B2C3 |
/// |   17× [glyph] [swatch] #FFFFFF |
/// | Total: 1251                    |
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegendLayout {
    tile: usize,
    font_size: usize,
    entries: usize,
    total: u64,
    count_right: usize,
    glyph_x: usize,
    swatch_x: usize,
    hex_x: usize,
    width: usize,
}

impl LegendLayout {
    pub fn new(tile: usize, font_size: usize, frequencies: &FrequencyTable) -> Self {
        // Widest count plus the "×" suffix
        let count_chars = digit_count(frequencies.max()) + 1;
        let count_right = LEGEND_MARGIN + text_width(count_chars, font_size);
        let glyph_x = count_right + COLUMN_GAP;
        let swatch_x = glyph_x + tile + COLUMN_GAP;
        let hex_x = swatch_x + tile + COLUMN_GAP;
        let hex_right = hex_x + text_width("#RRGGBB".len(), font_size);

        let total = frequencies.total();
        let total_right = LEGEND_MARGIN + text_width(total_label(total).chars().count(), font_size);

        Self {
            tile,
            font_size,
            entries: frequencies.len(),
            total,
            count_right,
            glyph_x,
            swatch_x,
            hex_x,
            width: hex_right.max(total_right) + LEGEND_MARGIN,
        }
    }

    #[inline]
    pub fn tile(&self) -> usize {
        self.tile
    }

    #[inline]
    pub fn font_size(&self) -> usize {
        self.font_size
    }

    /// Number of palette rows, excluding the total row.
    #[inline]
    pub fn entries(&self) -> usize {
        self.entries
    }

    #[inline]
    pub fn row_height(&self) -> usize {
        self.tile + ROW_GAP
    }

    /// Top of row `i`. Row [`entries`](Self::entries) is the total row.
    #[inline]
    pub fn row_y(&self, i: usize) -> usize {
        LEGEND_MARGIN + i * self.row_height()
    }

    /// Vertical center of the glyph in row `i`, where text is anchored.
    #[inline]
    pub fn text_y(&self, i: usize) -> usize {
        self.row_y(i) + self.tile / 2
    }

    /// Right edge of the count column.
    #[inline]
    pub fn count_right(&self) -> usize {
        self.count_right
    }

    #[inline]
    pub fn glyph_x(&self) -> usize {
        self.glyph_x
    }

    #[inline]
    pub fn swatch_x(&self) -> usize {
        self.swatch_x
    }

    #[inline]
    pub fn hex_x(&self) -> usize {
        self.hex_x
    }

    /// Left edge of the total label.
    #[inline]
    pub fn total_x(&self) -> usize {
        LEGEND_MARGIN
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Palette rows, the total row and the outer margins.
    #[inline]
    pub fn height(&self) -> usize {
        self.row_y(self.entries + 1) + LEGEND_MARGIN
    }

    pub fn total_label(&self) -> String {
        total_label(self.total)
    }
}

/// Text of a legend count cell.
pub fn count_label(count: u64) -> String {
    format!("{}×", count)
}

fn total_label(total: u64) -> String {
    format!("Total: {}", total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use crate::grid::{Cell, PixelGrid};
    use crate::palette::Palette;

    fn frequencies(counts: &[(Rgb, usize)]) -> FrequencyTable {
        let cells: Vec<Cell> = counts
            .iter()
            .flat_map(|&(c, n)| std::iter::repeat(Cell::Opaque(c)).take(n))
            .collect();
        let len = cells.len();
        let grid = PixelGrid::new(cells, len, 1);
        FrequencyTable::count(&grid, &Palette::from_grid(&grid))
    }

    #[test]
    fn test_digit_count() {
        assert_eq!(digit_count(0), 1);
        assert_eq!(digit_count(9), 1);
        assert_eq!(digit_count(10), 2);
        assert_eq!(digit_count(12345), 5);
    }

    #[test]
    fn test_text_width_rounds_up() {
        assert_eq!(text_width(1, 10), 6);
        assert_eq!(text_width(1, 16), 10);
        assert_eq!(text_width(3, 16), 29);
        assert_eq!(text_width(0, 16), 0);
    }

    #[test]
    fn test_pattern_dimensions() {
        let layout = PatternLayout::new(37, 12, 10, 16);
        let m = layout.margin();
        assert_eq!(layout.width(), 37 * 10 + 2 * m);
        assert_eq!(layout.height(), 12 * 10 + 2 * m);
        assert_eq!(layout.cell_origin(0, 0), (m, m));
        assert_eq!(layout.cell_origin(36, 11), (360 + m, 110 + m));
    }

    #[test]
    fn test_default_margin_fits_labels() {
        // One digit at 16px is 10px wide, so the 16px line height wins
        assert_eq!(PatternLayout::default_margin(9, 5, 16), 16 + 8 + 2);
        assert_eq!(PatternLayout::default_margin(30, 20, 16), 20 + 8 + 2);
        // Four-digit labels are wider than a line is tall
        assert_eq!(PatternLayout::default_margin(1200, 5, 16), 39 + 8 + 2);
    }

    #[test]
    fn test_margin_never_below_thick_rule() {
        let layout = PatternLayout::new(5, 5, 10, 16).with_margin(0);
        assert_eq!(layout.margin(), THICK_RULE);
    }

    #[test]
    fn test_rules_every_boundary() {
        let layout = PatternLayout::new(25, 3, 10, 16).with_margin(30);
        let rules: Vec<Rule> = layout.column_rules().collect();
        assert_eq!(rules.len(), 26);

        let majors: Vec<usize> = rules.iter().filter(|r| r.major).map(|r| r.index).collect();
        assert_eq!(majors, vec![0, 10, 20]);

        assert_eq!(rules[0].span, 29..31);
        assert_eq!(rules[1].span, 40..41);
        assert_eq!(rules[10].span, 129..131);
        assert_eq!(rules[25].span, 280..281);
        assert_eq!(layout.row_rules().count(), 4);
    }

    #[test]
    fn test_extent_covers_thick_edges() {
        let layout = PatternLayout::new(10, 4, 8, 16).with_margin(20);
        assert_eq!(layout.horizontal_extent(), 19..101);
        assert_eq!(layout.vertical_extent(), 19..53);
    }

    #[test]
    fn test_labels_only_after_origin() {
        let layout = PatternLayout::new(25, 10, 10, 16).with_margin(30);

        let columns = layout.column_labels();
        assert_eq!(
            columns,
            vec![
                Label {
                    text: "10".into(),
                    x: 130,
                    y: 24,
                    anchor: Anchor::Middle,
                    baseline: Baseline::Alphabetic,
                },
                Label {
                    text: "20".into(),
                    x: 230,
                    y: 24,
                    anchor: Anchor::Middle,
                    baseline: Baseline::Alphabetic,
                },
            ]
        );

        let rows = layout.row_labels();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].text, "10");
        assert_eq!((rows[0].x, rows[0].y), (24, 130));
        assert_eq!(rows[0].anchor, Anchor::End);
    }

    #[test]
    fn test_small_grid_has_no_labels() {
        let layout = PatternLayout::new(9, 9, 10, 16);
        assert!(layout.column_labels().is_empty());
        assert!(layout.row_labels().is_empty());
    }

    #[test]
    fn test_legend_rows_do_not_overlap() {
        let freq = frequencies(&[
            (Rgb::new(1, 1, 1), 3),
            (Rgb::new(2, 2, 2), 150),
            (Rgb::new(3, 3, 3), 7),
        ]);
        let layout = LegendLayout::new(10, 16, &freq);

        assert_eq!(layout.entries(), 3);
        for i in 0..layout.entries() {
            assert!(layout.row_y(i) + layout.tile() < layout.row_y(i + 1));
        }
        assert_eq!(layout.row_y(1) - layout.row_y(0), 10 + ROW_GAP);
        assert!(layout.row_y(3) + layout.row_height() <= layout.height());
    }

    #[test]
    fn test_legend_columns_follow_widest_count() {
        let narrow = LegendLayout::new(10, 16, &frequencies(&[(Rgb::BLACK, 5)]));
        let wide = LegendLayout::new(10, 16, &frequencies(&[(Rgb::BLACK, 5000)]));

        // "5×" vs "5000×"
        assert_eq!(narrow.count_right(), LEGEND_MARGIN + text_width(2, 16));
        assert_eq!(wide.count_right(), LEGEND_MARGIN + text_width(5, 16));
        assert!(wide.glyph_x() > narrow.glyph_x());

        assert_eq!(wide.swatch_x(), wide.glyph_x() + 10 + COLUMN_GAP);
        assert_eq!(wide.hex_x(), wide.swatch_x() + 10 + COLUMN_GAP);
        assert!(wide.width() >= wide.hex_x() + text_width(7, 16));
    }

    #[test]
    fn test_total_label() {
        let layout = LegendLayout::new(10, 16, &frequencies(&[(Rgb::BLACK, 2), (Rgb::WHITE, 3)]));
        assert_eq!(layout.total_label(), "Total: 5");
        assert_eq!(count_label(42), "42×");
    }
}
