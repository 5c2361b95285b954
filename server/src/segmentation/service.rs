//! Segmenter trait definition

use async_trait::async_trait;
use std::path::Path;

use super::types::SegmentationError;
use crate::model::MaskProposal;

/// Trait for segmentation backends (stub or real inference service)
#[async_trait]
pub trait Segmenter: Send + Sync {
    /// Produce mask proposals for the image stored at `image_path`
    async fn segment(&self, image_path: &Path) -> Result<Vec<MaskProposal>, SegmentationError>;
}
