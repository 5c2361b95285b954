//! Stand-in for a real segmentation model
//!
//! Output is independent of image content. The delay keeps client-side
//! progress indication meaningful.

use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use super::service::Segmenter;
use super::types::SegmentationError;
use crate::model::{BoundingBox, MaskProposal};

/// Simulated inference latency
pub const DEFAULT_DELAY: Duration = Duration::from_secs(2);

pub struct StubSegmenter {
    delay: Duration,
}

impl StubSegmenter {
    pub fn new() -> Self {
        Self::with_delay(DEFAULT_DELAY)
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self { delay }
    }

    /// The three regions every call returns
    pub fn fixed_proposals() -> Vec<MaskProposal> {
        vec![
            MaskProposal {
                mask_data: "base64_encoded_mask_data_1".to_string(),
                bounding_box: BoundingBox::new(100.0, 100.0, 200.0, 150.0),
                confidence: 0.95,
            },
            MaskProposal {
                mask_data: "base64_encoded_mask_data_2".to_string(),
                bounding_box: BoundingBox::new(300.0, 200.0, 180.0, 120.0),
                confidence: 0.87,
            },
            MaskProposal {
                mask_data: "base64_encoded_mask_data_3".to_string(),
                bounding_box: BoundingBox::new(150.0, 300.0, 250.0, 100.0),
                confidence: 0.92,
            },
        ]
    }
}

impl Default for StubSegmenter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Segmenter for StubSegmenter {
    async fn segment(&self, image_path: &Path) -> Result<Vec<MaskProposal>, SegmentationError> {
        debug!(
            "Stub segmentation for {:?} (delay {:?})",
            image_path, self.delay
        );
        if !tokio::fs::try_exists(image_path).await? {
            return Err(SegmentationError::ImageMissing(
                image_path.display().to_string(),
            ));
        }
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(Self::fixed_proposals())
    }
}
