//! HTTP API for uploading images, generating masks and applying colors
//!
//! This module provides:
//! - `AppState`, the shared handler state (store, segmenter, limits)
//! - `ApiError`, the error type every handler returns
//! - `api_routes`, the router mounted under `/api`

mod error;
pub mod routes;
mod state;
pub mod types;

pub use error::{ApiError, ApiErrorResponse};
pub use routes::api_routes;
pub use state::AppState;
