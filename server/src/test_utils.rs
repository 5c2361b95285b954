//! Test Utilities Module
//!
//! Provides helper functions, fixtures, and utilities for testing the server.
//! This module is only compiled when running tests.

#![cfg(test)]

use crate::api::{AppState, api_routes};
use crate::segmentation::StubSegmenter;
use crate::store::MemoryStore;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use image::{ImageFormat, Rgba, RgbaImage};
use serde::de::DeserializeOwned;
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tower::util::ServiceExt;
use uuid::Uuid;

pub const BOUNDARY: &str = "wallpaint-test-boundary";

// ============================================================================
// Test Context
// ============================================================================

/// Test context that holds all test fixtures and state
pub struct TestContext {
    pub app_state: AppState,
    pub router: Router,
    pub upload_dir: PathBuf,
}

impl TestContext {
    /// Create a new test context with an instant segmenter and a fresh upload dir
    pub fn new() -> Self {
        Self::with_segmenter_delay(Duration::ZERO)
    }

    pub fn with_segmenter_delay(delay: Duration) -> Self {
        let upload_dir = std::env::temp_dir().join(format!("wallpaint-test-{}", Uuid::new_v4()));
        let app_state = AppState::new(
            Arc::new(MemoryStore::new()),
            Arc::new(StubSegmenter::with_delay(delay)),
        )
        .with_upload_dir(upload_dir.clone());
        let router = Router::new().nest("/api", api_routes(app_state.clone()));
        Self {
            app_state,
            router,
            upload_dir,
        }
    }

    /// Rebuild the router with a different upload limit
    pub fn with_max_upload_size(mut self, bytes: usize) -> Self {
        self.app_state = self.app_state.clone().with_max_upload_size(bytes);
        self.router = Router::new().nest("/api", api_routes(self.app_state.clone()));
        self
    }

    /// Make an HTTP request to the test router
    pub async fn request(&self, request: Request<Body>) -> axum::response::Response {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request")
    }

    /// Send a request and return the status with the raw body
    pub async fn request_bytes(&self, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = self.request(request).await;
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body");
        (status, body.to_vec())
    }

    /// Make a GET request and parse JSON response
    pub async fn get_json<T: DeserializeOwned>(&self, uri: &str) -> (StatusCode, Option<T>) {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .expect("Failed to build request");

        let (status, body) = self.request_bytes(request).await;
        (status, serde_json::from_slice(&body).ok())
    }

    /// Make a POST request with JSON body and parse JSON response
    pub async fn post_json<T: DeserializeOwned>(
        &self,
        uri: &str,
        body: impl serde::Serialize,
    ) -> (StatusCode, Option<T>) {
        let body_bytes = serde_json::to_vec(&body).expect("Failed to serialize body");

        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body_bytes))
            .expect("Failed to build request");

        let (status, body) = self.request_bytes(request).await;
        (status, serde_json::from_slice(&body).ok())
    }

    /// Upload a file through the multipart endpoint
    pub async fn upload<T: DeserializeOwned>(
        &self,
        filename: &str,
        content_type: &str,
        data: &[u8],
    ) -> (StatusCode, Option<T>) {
        let request = Request::builder()
            .method("POST")
            .uri("/api/upload")
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(multipart_body("image", filename, content_type, data)))
            .expect("Failed to build request");

        let (status, body) = self.request_bytes(request).await;
        (status, serde_json::from_slice(&body).ok())
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.upload_dir);
    }
}

// ============================================================================
// Fixtures
// ============================================================================

/// Build a single-file multipart/form-data body
pub fn multipart_body(field: &str, filename: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// Encode a solid-color PNG of the given size
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let image = RgbaImage::from_pixel(width, height, Rgba([200, 200, 200, 255]));
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, ImageFormat::Png)
        .expect("Failed to encode PNG");
    buffer.into_inner()
}
