//! HTTP route handlers for the image API

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, Path, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use bytes::BytesMut;
use image::{ImageFormat, ImageReader};
use metrics::{counter, histogram};
use std::io::Cursor;
use std::path::Path as FsPath;
use std::time::Instant;
use uuid::Uuid;

use super::error::ApiError;
use super::state::AppState;
use super::types::{
    ApplyColorRequest, ApplyColorResponse, ColorApplicationsResponse, GenerateMasksRequest,
    GenerateMasksResponse, ImageSummary, ImagesResponse, MasksResponse, SuccessResponse,
    UploadResponse,
};
use crate::model::{ColorApplication, NewImage, ProcessedImage};
use crate::render;

/// Multipart field carrying the uploaded file
const UPLOAD_FIELD: &str = "image";

/// Room for multipart boundaries and headers on top of the file limit
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Decoded header information of an uploaded file
struct ProbedImage {
    format: ImageFormat,
    width: u32,
    height: u32,
}

fn probe_image(data: &[u8]) -> Result<ProbedImage, ApiError> {
    let reader = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| ApiError::internal("Failed to upload image", e))?;
    let format = reader
        .format()
        .ok_or_else(|| ApiError::Validation("Unrecognized image format".to_string()))?;
    let (width, height) = reader
        .into_dimensions()
        .map_err(|e| ApiError::Validation(format!("Unreadable image: {}", e)))?;
    Ok(ProbedImage {
        format,
        width,
        height,
    })
}

async fn find_image(state: &AppState, image_id: &str) -> Result<ProcessedImage, ApiError> {
    state
        .store
        .get_image(image_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Image not found"))
}

async fn read_image_file(image: &ProcessedImage) -> Result<Vec<u8>, ApiError> {
    match tokio::fs::read(&image.file_path).await {
        Ok(bytes) => Ok(bytes),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!("File for image {} missing: {:?}", image.id, image.file_path);
            Err(ApiError::not_found("Image file not found"))
        }
        Err(e) => Err(ApiError::internal("Failed to read image file", e)),
    }
}

fn mime_for(path: &FsPath) -> &'static str {
    ImageFormat::from_path(path)
        .map(|format| format.to_mime_type())
        .unwrap_or("application/octet-stream")
}

/// POST /api/upload - Store an uploaded image (multipart field "image")
pub async fn upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut upload = None;

    while let Some(mut field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or("upload").to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        if !content_type.starts_with("image/") {
            counter!("wallpaint_upload_rejections_total", "reason" => "mime").increment(1);
            tracing::debug!("Rejected upload {} with type {:?}", filename, content_type);
            return Err(ApiError::Validation(
                "Only image files are allowed".to_string(),
            ));
        }

        let mut data = BytesMut::new();
        while let Some(chunk) = field.chunk().await? {
            if data.len() + chunk.len() > state.max_upload_size {
                counter!("wallpaint_upload_rejections_total", "reason" => "size").increment(1);
                tracing::debug!(
                    "Rejected upload {} exceeding {} bytes",
                    filename,
                    state.max_upload_size
                );
                return Err(ApiError::PayloadTooLarge);
            }
            data.extend_from_slice(&chunk);
        }

        upload = Some((filename, data.freeze()));
        break;
    }

    let (filename, data) =
        upload.ok_or_else(|| ApiError::Validation("No image file provided".to_string()))?;

    let probed = probe_image(&data)?;
    let extension = probed.format.extensions_str().first().copied().unwrap_or("img");
    let file_path = state
        .upload_dir
        .join(format!("{}.{}", Uuid::new_v4(), extension));

    tokio::fs::create_dir_all(&state.upload_dir)
        .await
        .map_err(|e| ApiError::internal("Failed to upload image", e))?;
    tokio::fs::write(&file_path, &data)
        .await
        .map_err(|e| ApiError::internal("Failed to upload image", e))?;

    let saved = state
        .store
        .save_image(NewImage {
            original_filename: filename,
            file_path: file_path.clone(),
            width: probed.width,
            height: probed.height,
        })
        .await;
    let image = match saved {
        Ok(image) => image,
        Err(e) => {
            let _ = tokio::fs::remove_file(&file_path).await;
            return Err(e.into());
        }
    };

    counter!("wallpaint_uploads_total").increment(1);
    histogram!("wallpaint_upload_bytes").record(data.len() as f64);
    tracing::info!(
        "Uploaded image {} ({}, {}x{})",
        image.id,
        image.original_filename,
        image.width,
        image.height
    );

    Ok(Json(UploadResponse {
        image_id: image.id,
        filename: image.original_filename,
        width: image.width,
        height: image.height,
    }))
}

/// GET /api/images - List uploaded images
pub async fn list_images(State(state): State<AppState>) -> Result<Json<ImagesResponse>, ApiError> {
    let images = state.store.list_images().await?;
    Ok(Json(ImagesResponse {
        images: images.into_iter().map(ImageSummary::from).collect(),
    }))
}

/// GET /api/images/:image_id - Raw bytes of the uploaded file
pub async fn get_image_file(
    State(state): State<AppState>,
    Path(image_id): Path<String>,
) -> Result<Response, ApiError> {
    let image = find_image(&state, &image_id).await?;
    let bytes = read_image_file(&image).await?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, mime_for(&image.file_path))],
        bytes,
    )
        .into_response())
}

/// DELETE /api/images/:image_id - Remove an image with its masks and color history
pub async fn delete_image(
    State(state): State<AppState>,
    Path(image_id): Path<String>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let image = find_image(&state, &image_id).await?;
    if !state.store.delete_image(&image_id).await? {
        return Err(ApiError::not_found("Image not found"));
    }
    state.forget_image(&image_id);

    if let Err(e) = tokio::fs::remove_file(&image.file_path).await {
        tracing::warn!("Failed to remove file {:?}: {}", image.file_path, e);
    }
    tracing::info!("Deleted image {}", image_id);

    Ok(Json(SuccessResponse { success: true }))
}

/// POST /api/generate-masks - Run segmentation and replace the image's masks
pub async fn generate_masks(
    State(state): State<AppState>,
    payload: Result<Json<GenerateMasksRequest>, JsonRejection>,
) -> Result<Json<GenerateMasksResponse>, ApiError> {
    let Json(request) = payload?;
    let image = find_image(&state, &request.image_id).await?;

    // Serialize generations for the same image so batches never interleave
    let lock = state.generation_lock(&image.id);
    let _guard = lock.lock().await;

    let start = Instant::now();
    let proposals = state.segmenter.segment(&image.file_path).await?;
    let elapsed = start.elapsed();

    let masks = state.store.save_masks(&image.id, proposals).await?;

    counter!("wallpaint_mask_generations_total").increment(1);
    histogram!("wallpaint_segmentation_duration_seconds").record(elapsed);
    tracing::info!(
        "Generated {} masks for image {} in {:?}",
        masks.len(),
        image.id,
        elapsed
    );

    Ok(Json(GenerateMasksResponse {
        image_id: image.id,
        masks,
        processing_time: elapsed.as_millis() as u64,
    }))
}

/// GET /api/images/:image_id/masks - Masks currently associated with an image
pub async fn list_masks(
    State(state): State<AppState>,
    Path(image_id): Path<String>,
) -> Result<Json<MasksResponse>, ApiError> {
    let masks = state.store.get_masks(&image_id).await?;
    Ok(Json(MasksResponse { masks }))
}

/// GET /api/images/:image_id/color-applications - Color history, oldest first
pub async fn list_color_applications(
    State(state): State<AppState>,
    Path(image_id): Path<String>,
) -> Result<Json<ColorApplicationsResponse>, ApiError> {
    find_image(&state, &image_id).await?;
    let applications = state.store.get_color_applications(&image_id).await?;
    Ok(Json(ColorApplicationsResponse { applications }))
}

/// POST /api/apply-color - Record a color application and color the masks
pub async fn apply_color(
    State(state): State<AppState>,
    payload: Result<Json<ApplyColorRequest>, JsonRejection>,
) -> Result<Json<ApplyColorResponse>, ApiError> {
    let Json(request) = payload?;
    if request.mask_ids.is_empty() {
        return Err(ApiError::Validation(
            "maskIds must not be empty".to_string(),
        ));
    }
    find_image(&state, &request.image_id).await?;

    let updated = state
        .store
        .set_mask_colors(&request.image_id, &request.mask_ids, &request.color)
        .await?;
    if updated.len() < request.mask_ids.len() {
        tracing::debug!(
            "Color {} for image {}: {} of {} mask ids matched",
            request.color,
            request.image_id,
            updated.len(),
            request.mask_ids.len()
        );
    }

    state
        .store
        .save_color_application(ColorApplication {
            image_id: request.image_id,
            mask_ids: request.mask_ids,
            color: request.color,
        })
        .await?;

    counter!("wallpaint_color_applications_total").increment(1);

    Ok(Json(ApplyColorResponse {
        success: true,
        updated_mask_ids: updated,
    }))
}

/// POST /api/generate-final-image/:image_id - Original with the color history painted on
pub async fn generate_final_image(
    State(state): State<AppState>,
    Path(image_id): Path<String>,
) -> Result<Response, ApiError> {
    let image = find_image(&state, &image_id).await?;
    let bytes = read_image_file(&image).await?;
    let applications = state.store.get_color_applications(&image_id).await?;
    let quality = state.jpeg_quality;
    let masks = image.masks;

    let start = Instant::now();
    let jpeg = tokio::task::spawn_blocking(move || {
        let base = image::load_from_memory(&bytes)
            .map_err(|e| render::RenderError::DecodeError(e.to_string()))?;
        let composed = render::composite_color_history(&base, &masks, &applications);
        render::encode_jpeg(&composed, quality)
    })
    .await
    .map_err(|e| ApiError::internal("Failed to generate final image", e))??;

    counter!("wallpaint_final_images_total").increment(1);
    histogram!("wallpaint_final_image_duration_seconds").record(start.elapsed());

    let stem = FsPath::new(&image.original_filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("image");
    let disposition = format!("attachment; filename=\"painted-{}.jpg\"", stem.replace('"', ""));

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "image/jpeg".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        jpeg,
    )
        .into_response())
}

/// Build the image API routes
pub fn api_routes(state: AppState) -> Router {
    let body_limit = state.max_upload_size + MULTIPART_OVERHEAD;

    Router::new()
        .route("/upload", post(upload_image))
        .route("/images", get(list_images))
        .route("/images/:image_id", get(get_image_file).delete(delete_image))
        .route("/images/:image_id/masks", get(list_masks))
        .route(
            "/images/:image_id/color-applications",
            get(list_color_applications),
        )
        .route("/generate-masks", post(generate_masks))
        .route("/v1/generate-masks", post(generate_masks))
        .route("/apply-color", post(apply_color))
        .route("/generate-final-image/:image_id", post(generate_final_image))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
