//! Rasterization of a draw plan onto an RGBA layer
//!
//! Pixels are covered when their centers fall inside a shape, matching how a
//! 2D canvas fills axis-aligned rectangles without antialiasing. Strokes are
//! centered on the rectangle edge.

use image::{Pixel, Rgba, RgbaImage};

use super::style::DrawOp;
use crate::model::BoundingBox;

/// Pixel index range [start, end) whose centers lie in [from, to)
fn covered(from: f64, to: f64, limit: u32) -> (u32, u32) {
    let clamp = |v: f64| v.clamp(0.0, limit as f64) as u32;
    (clamp((from - 0.5).ceil()), clamp((to - 0.5).ceil()))
}

fn fill_rect(layer: &mut RgbaImage, bounds: &BoundingBox, color: Rgba<u8>) {
    let (x0, x1) = covered(bounds.x, bounds.x + bounds.width, layer.width());
    let (y0, y1) = covered(bounds.y, bounds.y + bounds.height, layer.height());
    for y in y0..y1 {
        for x in x0..x1 {
            layer.get_pixel_mut(x, y).blend(&color);
        }
    }
}

fn stroke_rect(layer: &mut RgbaImage, bounds: &BoundingBox, color: Rgba<u8>, line_width: u32) {
    let half = line_width as f64 / 2.0;
    let outer = BoundingBox::new(
        bounds.x - half,
        bounds.y - half,
        bounds.width + 2.0 * half,
        bounds.height + 2.0 * half,
    );
    let inner = BoundingBox::new(
        bounds.x + half,
        bounds.y + half,
        bounds.width - 2.0 * half,
        bounds.height - 2.0 * half,
    );

    let (x0, x1) = covered(outer.x, outer.x + outer.width, layer.width());
    let (y0, y1) = covered(outer.y, outer.y + outer.height, layer.height());
    for y in y0..y1 {
        for x in x0..x1 {
            let (cx, cy) = (x as f64 + 0.5, y as f64 + 0.5);
            let in_inner = inner.width > 0.0
                && inner.height > 0.0
                && cx >= inner.x
                && cx < inner.x + inner.width
                && cy >= inner.y
                && cy < inner.y + inner.height;
            if !in_inner {
                layer.get_pixel_mut(x, y).blend(&color);
            }
        }
    }
}

/// Paint the plan onto a transparent layer of the given size
pub fn rasterize(ops: &[DrawOp], width: u32, height: u32) -> RgbaImage {
    let mut layer = RgbaImage::new(width, height);
    for op in ops {
        fill_rect(&mut layer, &op.bounds, op.style.fill);
        stroke_rect(&mut layer, &op.bounds, op.style.stroke, op.style.line_width);
    }
    layer
}
