use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use stitch_chart::{QuantizeOptions, TileOrder};
use thiserror::Error;

/// Chart configuration loaded from a YAML file.
///
/// Every field has a default, so an empty file (or no file) is a valid
/// configuration. CLI flags and HTTP form fields override single fields
/// on a copy; the loaded value itself is never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Side length of one symbol tile in the sprite sheet, in pixels
    pub symbols_dimension: usize,

    /// Target palette size for quantization
    pub total_colors: usize,

    /// Label font size in pixels
    pub font_size: usize,

    /// Font file used for labels (system sans-serif if unset)
    pub font_path: Option<PathBuf>,

    /// Directory HTTP requests may pick a label font from by file name.
    /// Request fonts are ignored when unset.
    pub fonts_dir: Option<PathBuf>,

    /// Where the CLI writes its output files
    pub output_dir: PathBuf,

    /// Seed for cluster initialization
    pub seed: u64,

    /// Iteration cap for clustering
    pub max_iterations: usize,

    /// Pattern margin in pixels (derived from the label size if unset)
    pub margin: Option<usize>,

    /// Tile enumeration order of the sprite sheet
    pub atlas_order: AtlasOrder,

    /// Write a single ZIP archive instead of three PNG files
    pub bundle: bool,

    /// Browser origins allowed to call the HTTP API
    pub cors_origins: Vec<String>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            symbols_dimension: 10,
            total_colors: 16,
            font_size: 16,
            font_path: None,
            fonts_dir: None,
            output_dir: PathBuf::from("."),
            seed: 42,
            max_iterations: 64,
            margin: None,
            atlas_order: AtlasOrder::default(),
            bundle: false,
            cors_origins: vec![
                "http://127.0.0.1:8080".to_string(),
                "http://localhost:8080".to_string(),
            ],
        }
    }
}

/// Tile enumeration order, as written in configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum AtlasOrder {
    #[default]
    ColumnMajor,
    RowMajor,
}

impl From<AtlasOrder> for TileOrder {
    fn from(order: AtlasOrder) -> Self {
        match order {
            AtlasOrder::ColumnMajor => TileOrder::ColumnMajor,
            AtlasOrder::RowMajor => TileOrder::RowMajor,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be at least 1")]
    Zero(&'static str),
}

impl ChartConfig {
    /// Load configuration from `path`, falling back to defaults.
    ///
    /// A missing or unparseable file is logged and replaced by the defaults
    /// rather than aborting.
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            tracing::debug!("No config file given, using defaults");
            return Self::default();
        };

        match std::fs::read_to_string(path) {
            Ok(content) => match Self::from_yaml(&content) {
                Ok(config) => {
                    tracing::info!(
                        path = %path.display(),
                        symbols_dimension = config.symbols_dimension,
                        total_colors = config.total_colors,
                        "Loaded configuration"
                    );
                    config
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), %e, "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(path = %path.display(), %e, "Failed to read config, using defaults");
                Self::default()
            }
        }
    }

    /// Parse configuration from YAML. Empty input yields the defaults.
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    /// Reject values no chart can be built with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.symbols_dimension == 0 {
            return Err(ConfigError::Zero("symbols_dimension"));
        }
        if self.total_colors == 0 {
            return Err(ConfigError::Zero("total_colors"));
        }
        if self.font_size == 0 {
            return Err(ConfigError::Zero("font_size"));
        }
        Ok(())
    }

    /// Quantizer settings derived from this configuration.
    pub fn quantize_options(&self) -> QuantizeOptions {
        QuantizeOptions::new(self.total_colors)
            .seed(self.seed)
            .max_iterations(self.max_iterations)
    }
}
