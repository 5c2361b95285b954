//! Segmentation module producing candidate masks for an image
//!
//! This module provides:
//! - `Segmenter` trait, the single seam for an inference backend
//! - `StubSegmenter`, which returns fixed proposals after a simulated delay

mod service;
mod stub;
mod types;

pub use service::Segmenter;
pub use stub::StubSegmenter;
pub use types::SegmentationError;
