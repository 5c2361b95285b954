//! Pointer gesture handling over the mask canvas

use serde::{Deserialize, Serialize};

use super::index::MaskIndex;
use crate::model::{Mask, MaskId};

/// On-screen placement of the canvas and its intrinsic pixel size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasGeometry {
    /// Left edge of the canvas in client coordinates
    pub left: f64,
    /// Top edge of the canvas in client coordinates
    pub top: f64,
    /// Rendered width on screen
    pub rendered_width: f64,
    /// Rendered height on screen
    pub rendered_height: f64,
    /// Intrinsic canvas width (image pixels)
    pub canvas_width: f64,
    /// Intrinsic canvas height (image pixels)
    pub canvas_height: f64,
}

impl CanvasGeometry {
    /// Map a client-space point to image pixel coordinates.
    /// Returns None while the canvas has no rendered size.
    pub fn to_image(&self, client_x: f64, client_y: f64) -> Option<(f64, f64)> {
        if self.rendered_width <= 0.0 || self.rendered_height <= 0.0 {
            return None;
        }
        let x = (client_x - self.left) * self.canvas_width / self.rendered_width;
        let y = (client_y - self.top) * self.canvas_height / self.rendered_height;
        Some((x, y))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerButton {
    Primary,
    Middle,
    Secondary,
}

/// A single click on the canvas
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointerEvent {
    pub client_x: f64,
    pub client_y: f64,
    pub shift: bool,
    pub button: PointerButton,
}

/// What a click does to the selection, decided by modifier and button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionGesture {
    Replace,
    Add,
    Remove,
    Ignore,
}

impl SelectionGesture {
    pub fn classify(shift: bool, button: PointerButton) -> Self {
        match (shift, button) {
            (true, PointerButton::Secondary) => Self::Remove,
            (true, _) => Self::Add,
            (false, PointerButton::Secondary) => Self::Ignore,
            (false, _) => Self::Replace,
        }
    }
}

/// Outcome of handling one pointer event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionChange {
    /// The pointer did not land on any mask
    NoHit,
    /// A mask was hit but the gesture left the selection as it was
    Unchanged(MaskId),
    Replaced(MaskId),
    Added(MaskId),
    Removed(MaskId),
}

/// Ordered set of selected mask ids
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selection {
    ids: Vec<MaskId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `id` the only selected mask
    pub fn replace(&mut self, id: &str) {
        self.ids.clear();
        self.ids.push(id.to_string());
    }

    /// Append `id` unless already present; returns whether it was added
    pub fn add(&mut self, id: &str) -> bool {
        if self.contains(id) {
            return false;
        }
        self.ids.push(id.to_string());
        true
    }

    /// Returns whether `id` was present
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.ids.len();
        self.ids.retain(|selected| selected != id);
        self.ids.len() != before
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|selected| selected == id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Selected ids in insertion order
    pub fn ids(&self) -> &[MaskId] {
        &self.ids
    }

    pub fn apply(&mut self, gesture: SelectionGesture, id: &str) -> SelectionChange {
        let id_owned = id.to_string();
        match gesture {
            SelectionGesture::Replace => {
                self.replace(id);
                SelectionChange::Replaced(id_owned)
            }
            SelectionGesture::Add if self.add(id) => SelectionChange::Added(id_owned),
            SelectionGesture::Remove if self.remove(id) => SelectionChange::Removed(id_owned),
            _ => SelectionChange::Unchanged(id_owned),
        }
    }
}

impl FromIterator<MaskId> for Selection {
    fn from_iter<I: IntoIterator<Item = MaskId>>(iter: I) -> Self {
        let mut selection = Selection::new();
        for id in iter {
            selection.add(&id);
        }
        selection
    }
}

/// Resolve a click against the masks and update the selection
pub fn handle_pointer(
    selection: &mut Selection,
    masks: &[Mask],
    canvas: &CanvasGeometry,
    event: &PointerEvent,
) -> SelectionChange {
    let Some((x, y)) = canvas.to_image(event.client_x, event.client_y) else {
        return SelectionChange::NoHit;
    };

    let index = MaskIndex::new(masks);
    match index.hit(x, y) {
        Some(mask) => {
            let gesture = SelectionGesture::classify(event.shift, event.button);
            selection.apply(gesture, &mask.id)
        }
        None => SelectionChange::NoHit,
    }
}
