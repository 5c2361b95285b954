//! Mask selection engine
//!
//! Turns pointer interactions over the canvas into changes of the selection
//! set. Overlapping boxes are resolved to the smallest one under the pointer.

mod engine;
mod index;

pub use engine::{
    CanvasGeometry, PointerButton, PointerEvent, Selection, SelectionChange, SelectionGesture,
    handle_pointer,
};
pub use index::MaskIndex;
