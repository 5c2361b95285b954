//! Record store for uploaded images, masks and color history
//!
//! This module provides:
//! - `RecordStore` trait for abstracting the backing store
//! - `MemoryStore`, an in-process store with no persistence across restarts

mod memory;
mod service;
mod types;

pub use memory::MemoryStore;
pub use service::RecordStore;
pub use types::StoreError;
