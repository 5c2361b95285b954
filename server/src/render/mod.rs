//! Mask canvas renderer
//!
//! This module provides:
//! - `plan` for deciding which masks to draw and how to style them
//! - `rasterize` for painting a plan onto a transparent RGBA layer
//! - composition of the base image with a mask layer, both for the client-side
//!   download and for the server-side final image

mod composite;
mod raster;
mod style;
mod types;

pub use composite::{
    compose, composite_color_history, download_png, encode_jpeg, encode_png, resolve_colors,
};
pub use raster::rasterize;
pub use style::{DrawOp, Label, MaskStyle, RenderOptions, plan, style_for};
pub use types::RenderError;
