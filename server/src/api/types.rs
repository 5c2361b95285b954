//! Request and response bodies for the HTTP API

use serde::{Deserialize, Serialize};

use crate::model::{ColorApplication, HexColor, ImageId, Mask, MaskId, ProcessedImage};

/// Response for POST /api/upload
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub image_id: ImageId,
    pub filename: String,
    pub width: u32,
    pub height: u32,
}

/// Summary row for GET /api/images
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageSummary {
    pub image_id: ImageId,
    pub filename: String,
    pub width: u32,
    pub height: u32,
    pub mask_count: usize,
    pub processed_at: u64,
}

impl From<ProcessedImage> for ImageSummary {
    fn from(image: ProcessedImage) -> Self {
        Self {
            image_id: image.id,
            filename: image.original_filename,
            width: image.width,
            height: image.height,
            mask_count: image.masks.len(),
            processed_at: image.processed_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ImagesResponse {
    pub images: Vec<ImageSummary>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateMasksRequest {
    pub image_id: ImageId,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateMasksResponse {
    pub image_id: ImageId,
    pub masks: Vec<Mask>,
    /// Segmentation wall-clock time in milliseconds
    pub processing_time: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MasksResponse {
    pub masks: Vec<Mask>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyColorRequest {
    pub image_id: ImageId,
    pub mask_ids: Vec<MaskId>,
    pub color: HexColor,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyColorResponse {
    pub success: bool,
    /// Masks whose color was updated; ids not belonging to the image are ignored
    pub updated_mask_ids: Vec<MaskId>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ColorApplicationsResponse {
    pub applications: Vec<ColorApplication>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}
