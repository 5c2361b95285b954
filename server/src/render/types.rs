//! Render error definitions

use thiserror::Error;

/// Errors that can occur when decoding, compositing or encoding images
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to decode image: {0}")]
    DecodeError(String),

    #[error("Failed to encode image: {0}")]
    EncodeError(String),
}
