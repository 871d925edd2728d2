pub mod chart_pipeline;

pub use chart_pipeline::{
    ChartImages, ChartPipeline, PreparedChart, BUNDLE_FILE, LEGEND_FILE, PATTERN_FILE,
    REFERENCE_FILE,
};
