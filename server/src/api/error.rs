//! API error type and its HTTP mapping

use axum::{
    Json,
    extract::multipart::MultipartError,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::render::RenderError;
use crate::segmentation::SegmentationError;
use crate::store::StoreError;

/// Errors returned by API handlers
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("File too large")]
    PayloadTooLarge,

    #[error("{0}")]
    NotFound(String),

    /// `message` goes to the client, `detail` only to the log
    #[error("{message}: {detail}")]
    Internal { message: String, detail: String },
}

impl ApiError {
    pub fn internal(message: &str, detail: impl ToString) -> Self {
        Self::Internal {
            message: message.to_string(),
            detail: detail.to_string(),
        }
    }

    pub fn not_found(message: &str) -> Self {
        Self::NotFound(message.to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::PayloadTooLarge => "payload_too_large",
            Self::NotFound(_) => "not_found",
            Self::Internal { .. } => "internal_error",
        }
    }
}

/// Error body for the API
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub message: String,
    pub code: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Self::Internal { message, detail } => {
                tracing::error!("{}: {}", message, detail);
                message.clone()
            }
            other => other.to_string(),
        };
        let body = ApiErrorResponse {
            message,
            code: self.code().to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::ImageNotFound(_) => Self::not_found("Image not found"),
        }
    }
}

impl From<SegmentationError> for ApiError {
    fn from(e: SegmentationError) -> Self {
        match e {
            SegmentationError::ImageMissing(_) => Self::not_found("Image file not found"),
            other => Self::internal("Failed to generate masks", other),
        }
    }
}

impl From<RenderError> for ApiError {
    fn from(e: RenderError) -> Self {
        Self::internal("Failed to generate final image", e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        Self::Validation(e.body_text())
    }
}

impl From<MultipartError> for ApiError {
    fn from(e: MultipartError) -> Self {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Self::PayloadTooLarge
        } else {
            Self::Validation(e.body_text())
        }
    }
}
