use axum::extract::{Multipart, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

use super::form::ChartForm;
use crate::error::ApiError;
use crate::models::ChartConfig;
use crate::services::{ChartPipeline, BUNDLE_FILE};

/// Render a cross-stitch chart
///
/// Returns a ZIP archive holding `reference.png`, `color_reference.png`
/// and `pattern.png`.
#[utoipa::path(
    post,
    path = "/api/render",
    request_body(content = super::ChartUpload, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Chart bundle", content_type = "application/zip", body = Vec<u8>),
        (status = 400, description = "Missing field, undecodable image, misaligned sheet or not enough symbols"),
        (status = 500, description = "Rendering failed"),
    ),
    tag = "Chart"
)]
pub async fn handle_render(
    State(config): State<Arc<ChartConfig>>,
    State(pipeline): State<Arc<ChartPipeline>>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let form = ChartForm::from_multipart(multipart).await?;
    let bundle = form
        .run(&config, pipeline, |pipeline, chart| {
            let images = pipeline.render(&chart)?;
            Ok(images.bundle()?)
        })
        .await?;

    tracing::info!(bytes = bundle.len(), "Render request completed");

    Ok((
        [
            (header::CONTENT_TYPE, "application/zip".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={BUNDLE_FILE}"),
            ),
        ],
        bundle,
    )
        .into_response())
}
