//! Wall Painter Server Library
//!
//! This module exports the server components for use in integration tests
//! and external tooling.

pub mod api;
pub mod config;
pub mod model;
pub mod render;
pub mod segmentation;
pub mod selection;
pub mod store;

#[cfg(test)]
mod test_utils;

// Re-export commonly used types
pub use api::{AppState, api_routes};
pub use model::{BoundingBox, ColorApplication, HexColor, Mask, ProcessedImage};
pub use segmentation::{Segmenter, StubSegmenter};
pub use store::{MemoryStore, RecordStore};
