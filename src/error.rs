use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use stitch_chart::{AtlasError, CapacityError, QuantizeError};
use thiserror::Error;

use crate::models::ConfigError;

/// Which of the two uploaded rasters an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Image,
    Symbols,
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputKind::Image => f.write_str("image"),
            InputKind::Symbols => f.write_str("symbol sheet"),
        }
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to allocate pixmap")]
    PixmapAllocation,

    #[error("PNG encode error: {0}")]
    PngEncode(String),

    #[error("SVG parse error: {0}")]
    SvgParse(String),

    #[error("No symbol assigned to palette color {0}")]
    MissingSymbol(usize),

    #[error("Color {0} is not in the palette")]
    UnknownColor(String),

    #[error("Archive error: {0}")]
    Archive(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<zip::result::ZipError> for RenderError {
    fn from(e: zip::result::ZipError) -> Self {
        RenderError::Archive(e.to_string())
    }
}

/// Failure of a chart run, from decoding to encoding.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to decode {which}: {source}")]
    Decode {
        which: InputKind,
        #[source]
        source: image::ImageError,
    },

    #[error(transparent)]
    Atlas(#[from] AtlasError),

    #[error(transparent)]
    Quantize(#[from] QuantizeError),

    /// More colors than symbols; expected and fixable by the user.
    #[error(transparent)]
    Capacity(#[from] CapacityError),

    /// Capacity shortfall that remains after applying a merge mapping.
    #[error(
        "Not enough symbols: {} for {} colors after merging.",
        .0.symbols,
        .0.colors
    )]
    MergedCapacity(CapacityError),

    #[error("Rendering error: {0}")]
    Render(#[from] RenderError),
}

impl PipelineError {
    /// Whether the input, rather than the service, is at fault.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, PipelineError::Render(_))
    }

    /// The symbol shortfall, with or without a merge applied.
    pub fn capacity(&self) -> Option<&CapacityError> {
        match self {
            PipelineError::Capacity(e) | PipelineError::MergedCapacity(e) => Some(e),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid value for {field}: {value:?}")]
    InvalidField { field: &'static str, value: String },

    #[error("Malformed multipart request: {0}")]
    Multipart(String),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<axum::extract::multipart::MultipartError> for ApiError {
    fn from(e: axum::extract::multipart::MultipartError) -> Self {
        ApiError::Multipart(e.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::MissingField(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidField { .. } => StatusCode::BAD_REQUEST,
            ApiError::Multipart(_) => StatusCode::BAD_REQUEST,
            ApiError::Pipeline(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            ApiError::Pipeline(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }

        let body = Json(json!({
            "status": status.as_u16(),
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_missing_field() {
        let error = ApiError::MissingField("symbols");
        assert_eq!(error.to_string(), "Missing required field: symbols");
    }

    #[test]
    fn test_api_error_invalid_field() {
        let error = ApiError::InvalidField {
            field: "total_colors",
            value: "many".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid value for total_colors: \"many\""
        );
    }

    #[test]
    fn test_capacity_message_passes_through() {
        let error = ApiError::from(PipelineError::from(CapacityError {
            symbols: 4,
            colors: 5,
        }));
        assert_eq!(error.to_string(), "Not enough symbols: 4 for 5 colors.");
    }

    #[test]
    fn test_atlas_message_passes_through() {
        let error = PipelineError::from(AtlasError::Misaligned {
            width: 25,
            height: 20,
            dimension: 10,
        });
        assert_eq!(
            error.to_string(),
            "symbol sheet 25x20 is not a multiple of the 10px symbol size"
        );
    }

    #[test]
    fn test_render_error_pixmap_allocation() {
        let error = RenderError::PixmapAllocation;
        assert_eq!(error.to_string(), "Failed to allocate pixmap");
    }

    #[test]
    fn test_render_error_missing_symbol() {
        let error = RenderError::MissingSymbol(3);
        assert_eq!(error.to_string(), "No symbol assigned to palette color 3");
    }

    #[test]
    fn test_config_error_message() {
        let error = PipelineError::from(ConfigError::Zero("total_colors"));
        assert_eq!(
            error.to_string(),
            "Invalid configuration: total_colors must be at least 1"
        );
        assert!(error.is_client_error());
    }

    #[test]
    fn test_merged_capacity_message() {
        let shortfall = CapacityError {
            symbols: 2,
            colors: 3,
        };
        let error = PipelineError::MergedCapacity(shortfall);

        assert_eq!(
            error.to_string(),
            "Not enough symbols: 2 for 3 colors after merging."
        );
        assert_eq!(error.capacity(), Some(&shortfall));
        assert!(error.is_client_error());
        assert_eq!(PipelineError::Capacity(shortfall).capacity(), Some(&shortfall));
    }

    #[test]
    fn test_input_kind_display() {
        assert_eq!(InputKind::Image.to_string(), "image");
        assert_eq!(InputKind::Symbols.to_string(), "symbol sheet");
    }

    #[test]
    fn test_api_error_into_response_status_codes() {
        use axum::response::IntoResponse;

        // MissingField -> BAD_REQUEST
        let response = ApiError::MissingField("image").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        // Capacity -> BAD_REQUEST
        let capacity = PipelineError::Capacity(CapacityError {
            symbols: 1,
            colors: 2,
        });
        let response = ApiError::Pipeline(capacity).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        // Atlas -> BAD_REQUEST
        let atlas = PipelineError::Atlas(AtlasError::ZeroDimension);
        let response = ApiError::Pipeline(atlas).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        // Render -> INTERNAL_SERVER_ERROR
        let render = PipelineError::Render(RenderError::PixmapAllocation);
        let response = ApiError::Pipeline(render).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        // Internal -> INTERNAL_SERVER_ERROR
        let response = ApiError::Internal("join".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
