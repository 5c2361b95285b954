//! Segmentation error definitions

use thiserror::Error;

/// Errors that can occur when running segmentation
#[derive(Debug, Error)]
pub enum SegmentationError {
    #[error("Image file not found: {0}")]
    ImageMissing(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
