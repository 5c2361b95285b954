//! In-memory record store
//!
//! All tables live behind a single lock, so every trait method is atomic with
//! respect to the others. Replacing an image's mask batch removes the previous
//! batch in the same critical section, which keeps the image record and the
//! mask table consistent even when two generations race.

use async_trait::async_trait;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::service::RecordStore;
use super::types::StoreError;
use crate::model::{
    ColorApplication, HexColor, ImageId, Mask, MaskId, MaskProposal, NewImage, ProcessedImage,
    now_millis,
};

/// Stored image row; masks are referenced by id
#[derive(Debug, Clone)]
struct ImageRecord {
    id: ImageId,
    original_filename: String,
    file_path: PathBuf,
    width: u32,
    height: u32,
    mask_ids: Vec<MaskId>,
    processed_at: u64,
}

#[derive(Default)]
struct Tables {
    images: IndexMap<ImageId, ImageRecord>,
    masks: IndexMap<MaskId, Mask>,
    color_applications: HashMap<ImageId, Vec<ColorApplication>>,
}

impl Tables {
    fn materialize(&self, record: &ImageRecord) -> ProcessedImage {
        ProcessedImage {
            id: record.id.clone(),
            original_filename: record.original_filename.clone(),
            file_path: record.file_path.clone(),
            width: record.width,
            height: record.height,
            masks: self.masks_for(record),
            processed_at: record.processed_at,
        }
    }

    fn masks_for(&self, record: &ImageRecord) -> Vec<Mask> {
        record
            .mask_ids
            .iter()
            .filter_map(|id| self.masks.get(id).cloned())
            .collect()
    }
}

/// Process-local store; contents are lost on restart
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn save_image(&self, image: NewImage) -> Result<ProcessedImage, StoreError> {
        let record = ImageRecord {
            id: Uuid::new_v4().to_string(),
            original_filename: image.original_filename,
            file_path: image.file_path,
            width: image.width,
            height: image.height,
            mask_ids: Vec::new(),
            processed_at: now_millis(),
        };

        let mut tables = self.tables.write().await;
        let processed = tables.materialize(&record);
        tables.images.insert(record.id.clone(), record);
        debug!("Stored image {}", processed.id);
        Ok(processed)
    }

    async fn get_image(&self, id: &str) -> Result<Option<ProcessedImage>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.images.get(id).map(|r| tables.materialize(r)))
    }

    async fn list_images(&self) -> Result<Vec<ProcessedImage>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .images
            .values()
            .map(|r| tables.materialize(r))
            .collect())
    }

    async fn delete_image(&self, id: &str) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        tables.color_applications.remove(id);
        tables.masks.retain(|_, mask| mask.image_id != id);
        let existed = tables.images.shift_remove(id).is_some();
        if existed {
            debug!("Deleted image {} and its dependent records", id);
        }
        Ok(existed)
    }

    async fn save_masks(
        &self,
        image_id: &str,
        proposals: Vec<MaskProposal>,
    ) -> Result<Vec<Mask>, StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.images.contains_key(image_id) {
            return Err(StoreError::ImageNotFound(image_id.to_string()));
        }

        let saved: Vec<Mask> = proposals
            .into_iter()
            .map(|proposal| Mask {
                id: Uuid::new_v4().to_string(),
                image_id: image_id.to_string(),
                mask_data: proposal.mask_data,
                bounding_box: proposal.bounding_box,
                confidence: proposal.confidence,
                color: None,
            })
            .collect();

        tables.masks.retain(|_, mask| mask.image_id != image_id);
        for mask in &saved {
            tables.masks.insert(mask.id.clone(), mask.clone());
        }
        if let Some(record) = tables.images.get_mut(image_id) {
            record.mask_ids = saved.iter().map(|m| m.id.clone()).collect();
        }

        debug!("Saved {} masks for image {}", saved.len(), image_id);
        Ok(saved)
    }

    async fn get_masks(&self, image_id: &str) -> Result<Vec<Mask>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .images
            .get(image_id)
            .map(|r| tables.masks_for(r))
            .unwrap_or_default())
    }

    async fn get_mask(&self, mask_id: &str) -> Result<Option<Mask>, StoreError> {
        Ok(self.tables.read().await.masks.get(mask_id).cloned())
    }

    async fn set_mask_colors(
        &self,
        image_id: &str,
        mask_ids: &[MaskId],
        color: &HexColor,
    ) -> Result<Vec<MaskId>, StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.images.contains_key(image_id) {
            return Err(StoreError::ImageNotFound(image_id.to_string()));
        }

        let mut updated = Vec::new();
        for id in mask_ids {
            if let Some(mask) = tables.masks.get_mut(id)
                && mask.image_id == image_id
            {
                mask.color = Some(color.clone());
                if !updated.contains(id) {
                    updated.push(id.clone());
                }
            }
        }
        Ok(updated)
    }

    async fn save_color_application(
        &self,
        application: ColorApplication,
    ) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.images.contains_key(&application.image_id) {
            return Err(StoreError::ImageNotFound(application.image_id));
        }
        tables
            .color_applications
            .entry(application.image_id.clone())
            .or_default()
            .push(application);
        Ok(())
    }

    async fn get_color_applications(
        &self,
        image_id: &str,
    ) -> Result<Vec<ColorApplication>, StoreError> {
        Ok(self
            .tables
            .read()
            .await
            .color_applications
            .get(image_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn image_count(&self) -> usize {
        self.tables.read().await.images.len()
    }
}
