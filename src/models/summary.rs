use serde::{Deserialize, Serialize};
use stitch_chart::{FrequencyTable, Palette, Rgba};
use utoipa::ToSchema;

/// Palette and stitch counts of a prepared chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ChartSummary {
    /// Palette colors as `#RRGGBBAA`, in symbol order
    #[schema(example = json!(["#000000FF", "#FF0000FF"]))]
    pub palette: Vec<String>,
    /// Stitch count per palette color
    #[schema(example = json!([120, 38]))]
    pub counts: Vec<u64>,
    pub meta: SummaryMeta,
}

/// Capacity and size information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SummaryMeta {
    /// Number of symbols in the sprite sheet
    pub symbols: usize,
    /// Number of palette colors
    pub colors: usize,
    /// Grid width in cells
    pub width: usize,
    /// Grid height in cells
    pub height: usize,
}

impl ChartSummary {
    pub fn new(
        palette: &Palette,
        frequencies: &FrequencyTable,
        symbols: usize,
        width: usize,
        height: usize,
    ) -> Self {
        Self {
            palette: palette.iter().map(|c| Rgba::from(c).to_hex()).collect(),
            counts: frequencies.counts().to_vec(),
            meta: SummaryMeta {
                symbols,
                colors: palette.len(),
                width,
                height,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stitch_chart::{Cell, PixelGrid, Rgb};

    #[test]
    fn test_summary_shape() {
        let grid = PixelGrid::new(
            vec![
                Cell::Opaque(Rgb::new(255, 0, 0)),
                Cell::Opaque(Rgb::new(255, 0, 0)),
                Cell::Transparent,
                Cell::Opaque(Rgb::BLACK),
            ],
            2,
            2,
        );
        let palette = Palette::from_grid(&grid);
        let frequencies = FrequencyTable::count(&grid, &palette);

        let summary = ChartSummary::new(&palette, &frequencies, 4, 2, 2);
        let json = serde_json::to_value(&summary).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "palette": ["#000000FF", "#FF0000FF"],
                "counts": [1, 2],
                "meta": {"symbols": 4, "colors": 2, "width": 2, "height": 2}
            })
        );
    }
}
