use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::RgbaImage;
use stitch_chart::layout::{LegendLayout, PatternLayout};
use stitch_chart::{
    merge, palette, ColorMapping, FrequencyTable, Palette, PixelGrid, Quantizer, SymbolAtlas,
    SymbolTable,
};
use zip::write::SimpleFileOptions;

use crate::error::{InputKind, PipelineError, RenderError};
use crate::models::{ChartConfig, ChartSummary};
use crate::rendering::{encode_pixmap, encode_rgba, render_legend, render_pattern, TextRenderer};

pub const REFERENCE_FILE: &str = "reference.png";
pub const PATTERN_FILE: &str = "pattern.png";
pub const LEGEND_FILE: &str = "color_reference.png";
pub const BUNDLE_FILE: &str = "pattern_bundle.zip";

/// Everything derived from the inputs before rasterization.
///
/// Palette, symbols and frequencies always describe `grid` as it is after
/// merging.
#[derive(Debug, Clone)]
pub struct PreparedChart {
    pub config: ChartConfig,
    pub grid: PixelGrid,
    pub atlas: SymbolAtlas,
    pub palette: Palette,
    pub symbols: SymbolTable,
    pub frequencies: FrequencyTable,
    /// Cells rewritten by the merge mapping
    pub merged_cells: usize,
}

/// Encoded output rasters.
#[derive(Debug, Clone)]
pub struct ChartImages {
    pub reference: Vec<u8>,
    pub pattern: Vec<u8>,
    pub legend: Vec<u8>,
}

impl ChartImages {
    /// Output file names paired with their PNG bytes.
    pub fn entries(&self) -> [(&'static str, &[u8]); 3] {
        [
            (REFERENCE_FILE, self.reference.as_slice()),
            (LEGEND_FILE, self.legend.as_slice()),
            (PATTERN_FILE, self.pattern.as_slice()),
        ]
    }

    /// Pack all three images into a deflate-compressed ZIP archive.
    pub fn bundle(&self) -> Result<Vec<u8>, RenderError> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        for (name, bytes) in self.entries() {
            writer.start_file(name, options)?;
            writer.write_all(bytes)?;
        }

        let bundle = writer.finish()?.into_inner();
        tracing::debug!(bytes = bundle.len(), "Bundled chart images");
        Ok(bundle)
    }

    /// Write the three images into `dir`, creating it if needed.
    ///
    /// Either all three files end up in `dir` or none do: every image is
    /// staged in a temporary file first and only renamed into place once
    /// all of them have been written.
    pub fn write_to(&self, dir: &Path) -> Result<Vec<PathBuf>, RenderError> {
        std::fs::create_dir_all(dir)?;

        let mut staged = Vec::with_capacity(3);
        for (name, bytes) in self.entries() {
            staged.push((dir.join(name), stage(dir, bytes)?, bytes.len()));
        }

        let mut written: Vec<PathBuf> = Vec::with_capacity(3);
        for (path, file, bytes) in staged {
            if let Err(e) = file.persist(&path) {
                for done in &written {
                    if let Err(cleanup) = std::fs::remove_file(done) {
                        tracing::warn!(path = %done.display(), %cleanup, "Failed to remove partial output");
                    }
                }
                return Err(e.error.into());
            }
            tracing::info!(path = %path.display(), bytes, "Wrote image");
            written.push(path);
        }
        Ok(written)
    }

    /// Write the ZIP bundle into `dir`, creating it if needed.
    pub fn write_bundle_to(&self, dir: &Path) -> Result<PathBuf, RenderError> {
        let bundle = self.bundle()?;
        std::fs::create_dir_all(dir)?;
        let path = dir.join(BUNDLE_FILE);
        stage(dir, &bundle)?
            .persist(&path)
            .map_err(|e| RenderError::Io(e.error))?;
        tracing::info!(path = %path.display(), bytes = bundle.len(), "Wrote bundle");
        Ok(path)
    }
}

/// Write `bytes` to a temporary file in `dir`. The file is removed when
/// dropped without being persisted.
fn stage(dir: &Path, bytes: &[u8]) -> Result<tempfile::NamedTempFile, RenderError> {
    let mut file = tempfile::Builder::new()
        .prefix(".xstitch-")
        .suffix(".partial")
        .tempfile_in(dir)?;
    file.write_all(bytes)?;
    file.as_file().sync_all()?;
    Ok(file)
}

/// Runs the chart stages from raw uploads to encoded images.
///
/// Shared by the CLI and the HTTP handlers. Holds only the font database,
/// so one instance serves any number of concurrent runs.
pub struct ChartPipeline {
    text: Arc<TextRenderer>,
}

impl ChartPipeline {
    pub fn new(text: Arc<TextRenderer>) -> Self {
        Self { text }
    }

    /// Pipeline with fonts loaded for `config.font_path`.
    pub fn from_config(config: &ChartConfig) -> Self {
        Self::new(Arc::new(TextRenderer::new(config.font_path.as_deref())))
    }

    pub fn text(&self) -> &TextRenderer {
        &self.text
    }

    /// Decode, slice, quantize and merge, then derive the palette.
    ///
    /// Fails with [`PipelineError::Capacity`] when the grid has more colors
    /// than the sheet has symbols, or [`PipelineError::MergedCapacity`] if a
    /// merge mapping was given. Nothing is rendered before that check.
    pub fn prepare(
        &self,
        image_bytes: &[u8],
        sheet_bytes: &[u8],
        config: &ChartConfig,
        mapping: &ColorMapping,
    ) -> Result<PreparedChart, PipelineError> {
        config.validate()?;

        let sheet = decode(sheet_bytes, InputKind::Symbols)?;
        let atlas = SymbolAtlas::slice(
            sheet.as_raw(),
            sheet.width() as usize,
            sheet.height() as usize,
            config.symbols_dimension,
            config.atlas_order.into(),
        )?;
        tracing::debug!(
            symbols = atlas.len(),
            dimension = atlas.dimension(),
            "Sliced symbol sheet"
        );

        let image = decode(image_bytes, InputKind::Image)?;
        let quantizer = Quantizer::new(config.quantize_options());
        let mut grid = quantizer.reduce(
            image.as_raw(),
            image.width() as usize,
            image.height() as usize,
        )?;

        let merged_cells = merge::apply(&mut grid, mapping);
        if !mapping.is_empty() {
            tracing::debug!(
                entries = mapping.len(),
                merged_cells,
                "Applied merge mapping"
            );
        }

        let (palette, symbols) = palette::build(&grid, atlas.len()).map_err(|e| {
            if mapping.is_empty() {
                PipelineError::Capacity(e)
            } else {
                PipelineError::MergedCapacity(e)
            }
        })?;
        let frequencies = FrequencyTable::count(&grid, &palette);

        tracing::info!(
            width = grid.width(),
            height = grid.height(),
            colors = palette.len(),
            symbols = atlas.len(),
            stitches = frequencies.total(),
            "Prepared chart"
        );

        Ok(PreparedChart {
            config: config.clone(),
            grid,
            atlas,
            palette,
            symbols,
            frequencies,
            merged_cells,
        })
    }

    /// JSON-facing summary of a prepared chart.
    pub fn summarize(&self, chart: &PreparedChart) -> ChartSummary {
        ChartSummary::new(
            &chart.palette,
            &chart.frequencies,
            chart.atlas.len(),
            chart.grid.width(),
            chart.grid.height(),
        )
    }

    /// Rasterize and encode the reference image, pattern and legend.
    pub fn render(&self, chart: &PreparedChart) -> Result<ChartImages, PipelineError> {
        let grid = &chart.grid;
        let reference = encode_rgba(
            grid.width() as u32,
            grid.height() as u32,
            &grid.to_rgba_bytes(),
        )?;

        let mut layout = PatternLayout::new(
            grid.width(),
            grid.height(),
            chart.atlas.dimension(),
            chart.config.font_size,
        );
        if let Some(margin) = chart.config.margin {
            layout = layout.with_margin(margin);
        }
        let pattern = render_pattern(
            grid,
            &chart.palette,
            &chart.symbols,
            &chart.atlas,
            &layout,
            &self.text,
        )?;
        let pattern = encode_pixmap(&pattern)?;

        let legend_layout = LegendLayout::new(
            chart.atlas.dimension(),
            chart.config.font_size,
            &chart.frequencies,
        );
        let legend = render_legend(
            &chart.palette,
            &chart.symbols,
            &chart.atlas,
            &chart.frequencies,
            &legend_layout,
            &self.text,
        )?;
        let legend = encode_pixmap(&legend)?;

        tracing::info!(
            reference = reference.len(),
            pattern = pattern.len(),
            legend = legend.len(),
            "Rendered chart images"
        );

        Ok(ChartImages {
            reference,
            pattern,
            legend,
        })
    }
}

fn decode(bytes: &[u8], which: InputKind) -> Result<RgbaImage, PipelineError> {
    let image = image::load_from_memory(bytes)
        .map_err(|source| PipelineError::Decode { which, source })?
        .to_rgba8();
    tracing::debug!(
        input = %which,
        width = image.width(),
        height = image.height(),
        "Decoded input"
    );
    Ok(image)
}
