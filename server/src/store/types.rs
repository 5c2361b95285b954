//! Store error definitions

use thiserror::Error;

/// Errors that can occur when working with the record store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Image not found: {0}")]
    ImageNotFound(String),
}
