//! Draw planning: which masks are visible and how each is styled

use image::Rgba;
use serde::{Deserialize, Serialize};

use crate::model::{BoundingBox, Mask, MaskId};
use crate::selection::Selection;

const SELECTED_FILL: Rgba<u8> = rgba(59, 130, 246, 0.3);
const SELECTED_STROKE: Rgba<u8> = rgba(59, 130, 246, 0.8);
const UNSELECTED_FILL: Rgba<u8> = rgba(156, 163, 175, 0.2);
const UNSELECTED_STROKE: Rgba<u8> = rgba(156, 163, 175, 0.5);
const LABEL_COLOR: Rgba<u8> = rgba(59, 130, 246, 0.9);

/// `#RRGGBB80`
const APPLIED_FILL_ALPHA: u8 = 0x80;

/// Label offset from the box's top-left corner
const LABEL_OFFSET: (f64, f64) = (5.0, 15.0);

const fn rgba(r: u8, g: u8, b: u8, alpha: f32) -> Rgba<u8> {
    Rgba([r, g, b, (alpha * 255.0 + 0.5) as u8])
}

/// Mask visibility toggles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderOptions {
    pub show_masks: bool,
    pub show_all_masks: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            show_masks: true,
            show_all_masks: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaskStyle {
    pub fill: Rgba<u8>,
    pub stroke: Rgba<u8>,
    pub line_width: u32,
}

/// Confidence text drawn next to a selected mask
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub color: Rgba<u8>,
}

/// One mask to draw, in draw order
#[derive(Debug, Clone, PartialEq)]
pub struct DrawOp {
    pub mask_id: MaskId,
    pub bounds: BoundingBox,
    pub style: MaskStyle,
    pub label: Option<Label>,
}

/// Style precedence: applied color, then selection, then the neutral default
pub fn style_for(mask: &Mask, selected: bool) -> MaskStyle {
    match (&mask.color, selected) {
        (Some(color), _) => {
            let [r, g, b] = color.rgb();
            MaskStyle {
                fill: Rgba([r, g, b, APPLIED_FILL_ALPHA]),
                stroke: Rgba([r, g, b, 255]),
                line_width: if selected { 2 } else { 1 },
            }
        }
        (None, true) => MaskStyle {
            fill: SELECTED_FILL,
            stroke: SELECTED_STROKE,
            line_width: 2,
        },
        (None, false) => MaskStyle {
            fill: UNSELECTED_FILL,
            stroke: UNSELECTED_STROKE,
            line_width: 1,
        },
    }
}

fn confidence_label(mask: &Mask) -> Label {
    let bounds = &mask.bounding_box;
    Label {
        text: format!("{}%", (mask.confidence * 100.0).round() as i64),
        x: bounds.x + LABEL_OFFSET.0,
        y: bounds.y + LABEL_OFFSET.1,
        color: LABEL_COLOR,
    }
}

/// Build the draw list for the current masks, selection and toggles.
///
/// Order follows the mask list, so later masks paint over earlier ones.
pub fn plan(masks: &[Mask], selection: &Selection, options: RenderOptions) -> Vec<DrawOp> {
    if !options.show_masks {
        return Vec::new();
    }

    masks
        .iter()
        .filter_map(|mask| {
            let selected = selection.contains(&mask.id);
            if !options.show_all_masks && !selected {
                return None;
            }
            Some(DrawOp {
                mask_id: mask.id.clone(),
                bounds: mask.bounding_box,
                style: style_for(mask, selected),
                label: selected.then(|| confidence_label(mask)),
            })
        })
        .collect()
}
