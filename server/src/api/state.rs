//! Shared handler state

use dashmap::DashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::config::Config;
use crate::model::ImageId;
use crate::segmentation::Segmenter;
use crate::store::RecordStore;

/// Per-image locks serializing mask generation
type GenerationLocks = Arc<DashMap<ImageId, Arc<Mutex<()>>>>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub segmenter: Arc<dyn Segmenter>,
    pub upload_dir: PathBuf,
    pub max_upload_size: usize,
    pub jpeg_quality: u8,
    generation_locks: GenerationLocks,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>, segmenter: Arc<dyn Segmenter>) -> Self {
        let defaults = Config::default();
        Self {
            store,
            segmenter,
            upload_dir: defaults.upload.dir,
            max_upload_size: defaults.upload.max_size,
            jpeg_quality: defaults.render.jpeg_quality,
            generation_locks: Arc::new(DashMap::new()),
        }
    }

    pub fn with_upload_dir(mut self, dir: PathBuf) -> Self {
        self.upload_dir = dir;
        self
    }

    pub fn with_max_upload_size(mut self, bytes: usize) -> Self {
        self.max_upload_size = bytes;
        self
    }

    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality;
        self
    }

    /// Lock guarding mask generation for one image
    pub fn generation_lock(&self, image_id: &str) -> Arc<Mutex<()>> {
        self.generation_locks
            .entry(image_id.to_string())
            .or_default()
            .clone()
    }

    /// Drop the generation lock of a deleted image
    pub fn forget_image(&self, image_id: &str) {
        self.generation_locks.remove(image_id);
    }
}
