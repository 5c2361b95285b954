//! Domain records shared by the store, the API and the client-side engines
//!
//! Field names serialize in camelCase to match the JSON wire format.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Image identifier (UUID v4 string)
pub type ImageId = String;

/// Mask identifier (UUID v4 string)
pub type MaskId = String;

/// Axis-aligned rectangle in image pixel space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Edge-inclusive containment test
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }

    pub fn min_corner(&self) -> [f64; 2] {
        [self.x, self.y]
    }

    pub fn max_corner(&self) -> [f64; 2] {
        [self.x + self.width, self.y + self.height]
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid color '{0}': expected #RRGGBB")]
pub struct InvalidColor(pub String);

/// A `#RRGGBB` color string.
///
/// The original spelling is kept so clients get back exactly what they sent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(String);

impl HexColor {
    pub fn parse(value: &str) -> Result<Self, InvalidColor> {
        let bytes = value.as_bytes();
        let valid = bytes.len() == 7
            && bytes[0] == b'#'
            && bytes[1..].iter().all(|b| b.is_ascii_hexdigit());
        if valid {
            Ok(Self(value.to_string()))
        } else {
            Err(InvalidColor(value.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Red, green and blue channels
    pub fn rgb(&self) -> [u8; 3] {
        let channel = |i: usize| u8::from_str_radix(&self.0[i..i + 2], 16).unwrap_or(0);
        [channel(1), channel(3), channel(5)]
    }
}

impl TryFrom<String> for HexColor {
    type Error = InvalidColor;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.0
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A candidate region of an image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mask {
    pub id: MaskId,
    pub image_id: ImageId,
    /// Opaque encoded mask payload
    pub mask_data: String,
    pub bounding_box: BoundingBox,
    /// Confidence score (0.0-1.0)
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<HexColor>,
}

/// Mask as produced by the segmenter, before the store assigns identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaskProposal {
    pub mask_data: String,
    pub bounding_box: BoundingBox,
    pub confidence: f64,
}

/// An uploaded image together with its current masks
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedImage {
    pub id: ImageId,
    pub original_filename: String,
    pub file_path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub masks: Vec<Mask>,
    /// Creation time in milliseconds since the Unix epoch
    pub processed_at: u64,
}

/// Fields supplied by the caller when saving a new image
#[derive(Debug, Clone)]
pub struct NewImage {
    pub original_filename: String,
    pub file_path: PathBuf,
    pub width: u32,
    pub height: u32,
}

/// One "apply color" event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorApplication {
    pub image_id: ImageId,
    pub mask_ids: Vec<MaskId>,
    pub color: HexColor,
}

/// Get current timestamp in milliseconds
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
