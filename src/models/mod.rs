pub mod config;
pub mod merge;
pub mod summary;

pub use config::{AtlasOrder, ChartConfig, ConfigError};
pub use merge::parse_mapping;
pub use summary::{ChartSummary, SummaryMeta};
