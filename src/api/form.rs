use axum::body::Bytes;
use axum::extract::Multipart;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use stitch_chart::ColorMapping;
use utoipa::ToSchema;

use crate::error::{ApiError, PipelineError};
use crate::models::{parse_mapping, ChartConfig};
use crate::services::{ChartPipeline, PreparedChart};

/// Multipart upload accepted by the chart endpoints (documentation only).
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct ChartUpload {
    /// Sprite sheet of square stitch symbols
    #[schema(value_type = String, format = Binary)]
    symbols: Vec<u8>,
    /// Source image
    #[schema(value_type = String, format = Binary)]
    image: Vec<u8>,
    /// Symbol tile side length in pixels
    symbols_dimension: Option<usize>,
    /// Target palette size
    total_colors: Option<usize>,
    /// Label font size in pixels
    font_size: Option<usize>,
    /// File name of a label font in the server's fonts directory
    font_path: Option<String>,
    /// JSON object of `"#RRGGBBAA": "#RRGGBBAA"` color merges
    mapping: Option<String>,
}

/// A parsed chart request.
#[derive(Debug)]
pub struct ChartForm {
    pub image: Bytes,
    pub symbols: Bytes,
    pub symbols_dimension: Option<usize>,
    pub total_colors: Option<usize>,
    pub font_size: Option<usize>,
    /// Font file name, resolved against the configured fonts directory
    pub font_path: Option<String>,
    pub mapping: ColorMapping,
}

impl ChartForm {
    /// Read all fields of a multipart body. Unknown fields are ignored.
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut image = None;
        let mut symbols = None;
        let mut symbols_dimension = None;
        let mut total_colors = None;
        let mut font_size = None;
        let mut font_path = None;
        let mut mapping = ColorMapping::new();

        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            match name.as_str() {
                "image" => image = Some(field.bytes().await?),
                "symbols" => symbols = Some(field.bytes().await?),
                "symbols_dimension" => {
                    symbols_dimension = parse_number("symbols_dimension", &field.text().await?)?
                }
                "total_colors" => total_colors = parse_number("total_colors", &field.text().await?)?,
                "font_size" => font_size = parse_number("font_size", &field.text().await?)?,
                "font_path" => {
                    let text = field.text().await?;
                    let text = text.trim();
                    font_path = (!text.is_empty()).then(|| text.to_string());
                }
                "mapping" => mapping = parse_mapping(&field.text().await?),
                other => tracing::debug!(field = other, "Ignoring unknown form field"),
            }
        }

        let form = Self {
            image: image.ok_or(ApiError::MissingField("image"))?,
            symbols: symbols.ok_or(ApiError::MissingField("symbols"))?,
            symbols_dimension,
            total_colors,
            font_size,
            font_path,
            mapping,
        };

        tracing::debug!(
            image_bytes = form.image.len(),
            symbols_bytes = form.symbols.len(),
            merges = form.mapping.len(),
            "Parsed chart form"
        );
        Ok(form)
    }

    /// `base` with the fields this request sets.
    ///
    /// A request font must be a plain file name and is looked up in
    /// `base.fonts_dir`. Without a fonts directory it is ignored.
    pub fn apply_to(&self, base: &ChartConfig) -> Result<ChartConfig, ApiError> {
        let mut config = base.clone();
        if let Some(d) = self.symbols_dimension {
            config.symbols_dimension = d;
        }
        if let Some(k) = self.total_colors {
            config.total_colors = k;
        }
        if let Some(size) = self.font_size {
            config.font_size = size;
        }
        if let Some(name) = &self.font_path {
            match &base.fonts_dir {
                Some(dir) => config.font_path = Some(font_in_dir(dir, name)?),
                None => tracing::warn!(font = %name, "No fonts directory configured, ignoring request font"),
            }
        }
        Ok(config)
    }

    /// Prepare the chart on the blocking pool and hand it to `finish`.
    ///
    /// A request naming a different font than the server configuration gets
    /// its own font database for this run.
    pub async fn run<T, F>(
        self,
        base: &ChartConfig,
        pipeline: Arc<ChartPipeline>,
        finish: F,
    ) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: FnOnce(&ChartPipeline, PreparedChart) -> Result<T, PipelineError> + Send + 'static,
    {
        let config = self.apply_to(base)?;
        let own_font = config.font_path != base.font_path;

        let result = tokio::task::spawn_blocking(move || {
            let pipeline = if own_font {
                Arc::new(ChartPipeline::from_config(&config))
            } else {
                pipeline
            };
            let chart = pipeline.prepare(&self.image, &self.symbols, &config, &self.mapping)?;
            finish(&pipeline, chart)
        })
        .await
        .map_err(|e| ApiError::Internal(format!("Chart task failed: {e}")))?;

        Ok(result?)
    }
}

/// Path of the font `name` inside `dir`. Anything but a single plain file
/// name is rejected.
fn font_in_dir(dir: &Path, name: &str) -> Result<PathBuf, ApiError> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(file)), None) => Ok(dir.join(file)),
        _ => Err(ApiError::InvalidField {
            field: "font_path",
            value: name.to_string(),
        }),
    }
}

/// Parse a numeric form field. Blank values count as absent.
fn parse_number(field: &'static str, value: &str) -> Result<Option<usize>, ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse()
        .map(Some)
        .map_err(|_| ApiError::InvalidField {
            field,
            value: value.to_string(),
        })
}
