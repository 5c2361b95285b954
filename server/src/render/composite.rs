//! Composition of the base image with a mask layer
//!
//! Two outputs exist and they intentionally differ:
//! - `download_png` flattens exactly what the canvas currently shows (toggles
//!   and selection included), like the in-browser download.
//! - `composite_color_history` paints every recorded color application onto
//!   the original, independent of what any client is showing.

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageEncoder, ImageFormat, RgbaImage};
use std::collections::HashMap;
use std::io::Cursor;

use super::raster::rasterize;
use super::style::{RenderOptions, plan};
use super::types::RenderError;
use crate::model::{ColorApplication, HexColor, Mask};
use crate::selection::Selection;

/// Draw the base at natural resolution with the layer on top
pub fn compose(base: &DynamicImage, layer: &RgbaImage) -> RgbaImage {
    let mut canvas = base.to_rgba8();
    image::imageops::overlay(&mut canvas, layer, 0, 0);
    canvas
}

/// Flatten the currently rendered masks over the base and encode as PNG
pub fn download_png(
    base: &DynamicImage,
    masks: &[Mask],
    selection: &Selection,
    options: RenderOptions,
) -> Result<Vec<u8>, RenderError> {
    let ops = plan(masks, selection, options);
    let layer = rasterize(&ops, base.width(), base.height());
    encode_png(&compose(base, &layer))
}

/// Apply the color history to the masks: later events override earlier ones.
/// Masks no event mentions keep their current color.
pub fn resolve_colors(masks: &[Mask], applications: &[ColorApplication]) -> Vec<Mask> {
    let mut latest: HashMap<&str, &HexColor> = HashMap::new();
    for application in applications {
        for id in &application.mask_ids {
            latest.insert(id.as_str(), &application.color);
        }
    }

    masks
        .iter()
        .map(|mask| {
            let mut mask = mask.clone();
            if let Some(color) = latest.get(mask.id.as_str()) {
                mask.color = Some((*color).clone());
            }
            mask
        })
        .collect()
}

/// Paint every colored mask onto the original image
pub fn composite_color_history(
    base: &DynamicImage,
    masks: &[Mask],
    applications: &[ColorApplication],
) -> RgbaImage {
    let colored: Vec<Mask> = resolve_colors(masks, applications)
        .into_iter()
        .filter(|mask| mask.color.is_some())
        .collect();
    let options = RenderOptions {
        show_masks: true,
        show_all_masks: true,
    };
    let ops = plan(&colored, &Selection::new(), options);
    compose(base, &rasterize(&ops, base.width(), base.height()))
}

pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, RenderError> {
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, ImageFormat::Png)
        .map_err(|e| RenderError::EncodeError(e.to_string()))?;
    Ok(buffer.into_inner())
}

/// Encode RGBA image to JPEG
pub fn encode_jpeg(image: &RgbaImage, quality: u8) -> Result<Vec<u8>, RenderError> {
    // JPEG has no alpha channel
    let rgb = DynamicImage::ImageRgba8(image.clone()).into_rgb8();

    let mut buffer = Vec::new();
    JpegEncoder::new_with_quality(&mut buffer, quality)
        .write_image(
            rgb.as_raw(),
            rgb.width(),
            rgb.height(),
            image::ExtendedColorType::Rgb8,
        )
        .map_err(|e| RenderError::EncodeError(e.to_string()))?;
    Ok(buffer)
}
