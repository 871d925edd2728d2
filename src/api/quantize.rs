use axum::extract::{Multipart, State};
use axum::Json;
use std::sync::Arc;

use super::form::ChartForm;
use crate::error::ApiError;
use crate::models::{ChartConfig, ChartSummary};
use crate::services::ChartPipeline;

/// Quantize an image and report its palette
///
/// Runs the chart pipeline up to the palette and returns the colors with
/// their stitch counts. Nothing is rendered.
#[utoipa::path(
    post,
    path = "/api/quantize",
    request_body(content = super::ChartUpload, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Palette and stitch counts", body = ChartSummary),
        (status = 400, description = "Missing field, undecodable image, misaligned sheet or not enough symbols"),
        (status = 500, description = "Internal error"),
    ),
    tag = "Chart"
)]
pub async fn handle_quantize(
    State(config): State<Arc<ChartConfig>>,
    State(pipeline): State<Arc<ChartPipeline>>,
    multipart: Multipart,
) -> Result<Json<ChartSummary>, ApiError> {
    let form = ChartForm::from_multipart(multipart).await?;
    let summary = form
        .run(&config, pipeline, |pipeline, chart| {
            Ok(pipeline.summarize(&chart))
        })
        .await?;

    tracing::info!(
        colors = summary.meta.colors,
        width = summary.meta.width,
        height = summary.meta.height,
        "Quantize request completed"
    );
    Ok(Json(summary))
}
