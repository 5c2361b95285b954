//! RecordStore trait definition

use async_trait::async_trait;

use super::types::StoreError;
use crate::model::{
    ColorApplication, HexColor, Mask, MaskId, MaskProposal, NewImage, ProcessedImage,
};

/// Keyed storage for images, masks and color applications
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Store a new image with an empty mask list
    async fn save_image(&self, image: NewImage) -> Result<ProcessedImage, StoreError>;

    /// Get an image together with its current masks
    async fn get_image(&self, id: &str) -> Result<Option<ProcessedImage>, StoreError>;

    /// List all images in upload order
    async fn list_images(&self) -> Result<Vec<ProcessedImage>, StoreError>;

    /// Delete an image, its masks and its color history.
    /// Returns false if the image did not exist.
    async fn delete_image(&self, id: &str) -> Result<bool, StoreError>;

    /// Replace the image's masks with a new batch, assigning identities
    async fn save_masks(
        &self,
        image_id: &str,
        proposals: Vec<MaskProposal>,
    ) -> Result<Vec<Mask>, StoreError>;

    /// Masks currently associated with an image, in storage order
    async fn get_masks(&self, image_id: &str) -> Result<Vec<Mask>, StoreError>;

    /// Look up a single mask
    async fn get_mask(&self, mask_id: &str) -> Result<Option<Mask>, StoreError>;

    /// Set the color of every listed mask that belongs to the image.
    /// Returns the ids that were updated; unknown ids are skipped.
    async fn set_mask_colors(
        &self,
        image_id: &str,
        mask_ids: &[MaskId],
        color: &HexColor,
    ) -> Result<Vec<MaskId>, StoreError>;

    /// Append a color application to the image's history
    async fn save_color_application(&self, application: ColorApplication)
    -> Result<(), StoreError>;

    /// Color history for an image, oldest first
    async fn get_color_applications(
        &self,
        image_id: &str,
    ) -> Result<Vec<ColorApplication>, StoreError>;

    /// Number of stored images
    async fn image_count(&self) -> usize;
}
