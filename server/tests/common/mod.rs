//! Common Test Utilities for Integration Tests
//!
//! Shared helpers used across integration test modules.

#![allow(dead_code)]

use axum::{
    Json, Router,
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::Response,
    routing::get,
};
use image::{ImageFormat, Rgba, RgbaImage};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tower::util::ServiceExt;
use tower_http::cors::{Any, CorsLayer};
use wallpaint_server::{AppState, MemoryStore, StubSegmenter, api_routes};

pub const BOUNDARY: &str = "wallpaint-integration-boundary";

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub images: usize,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        images: state.store.image_count().await,
    })
}

/// A router wired like the binary, plus the state behind it
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub upload_dir: PathBuf,
}

impl TestApp {
    /// Send a request and return the raw response
    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Send a request and return the status with the raw body
    pub async fn send_bytes(&self, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = self.send(request).await;
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body.to_vec())
    }

    pub async fn get_json<T: DeserializeOwned>(&self, uri: &str) -> (StatusCode, T) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let (status, body) = self.send_bytes(request).await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    pub async fn post_json<T: DeserializeOwned>(
        &self,
        uri: &str,
        body: serde_json::Value,
    ) -> (StatusCode, T) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let (status, body) = self.send_bytes(request).await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    /// Upload an image through the multipart endpoint, returning the parsed JSON
    pub async fn upload(
        &self,
        filename: &str,
        content_type: &str,
        data: &[u8],
    ) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/api/upload")
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(multipart_body(filename, content_type, data)))
            .unwrap();
        let (status, body) = self.send_bytes(request).await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    /// Upload a PNG and return its image id
    pub async fn upload_png(&self, width: u32, height: u32) -> String {
        let (status, json) = self
            .upload("living-room.png", "image/png", &create_test_png(width, height))
            .await;
        assert_eq!(status, StatusCode::OK, "upload failed: {}", json);
        json["imageId"].as_str().unwrap().to_string()
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.upload_dir);
    }
}

/// Create a test application with the given segmentation delay
pub fn create_test_app_with_delay(delay: Duration) -> TestApp {
    let upload_dir =
        std::env::temp_dir().join(format!("wallpaint-it-{}", uuid::Uuid::new_v4()));
    let state = AppState::new(
        Arc::new(MemoryStore::new()),
        Arc::new(StubSegmenter::with_delay(delay)),
    )
    .with_upload_dir(upload_dir.clone());

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let router = Router::new()
        .route("/health", get(health))
        .with_state(state.clone())
        .nest("/api", api_routes(state.clone()))
        .layer(cors);

    TestApp {
        router,
        state,
        upload_dir,
    }
}

/// Create a test application whose segmenter answers immediately
pub fn create_test_app() -> TestApp {
    create_test_app_with_delay(Duration::ZERO)
}

/// Build a multipart/form-data body with a single "image" field
pub fn multipart_body(filename: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
    let mut body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// Encode a white PNG of the given size
pub fn create_test_png(width: u32, height: u32) -> Vec<u8> {
    let image = RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]));
    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, ImageFormat::Png).unwrap();
    buffer.into_inner()
}
