//! Core data types for layout boxes and ground-truth documents.

use serde::{Deserialize, Deserializer, Serialize};

/// An axis-aligned bounding box in image pixel space.
///
/// Coordinates are in XYXY (corner) format:
/// - x1, y1: top-left corner
/// - x2, y2: bottom-right corner
///
/// Well-formed boxes satisfy `x1 <= x2` and `y1 <= y2`. Zero-area boxes are
/// legal. Serialized as a `[x1, y1, x2, y2]` array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct BoundingBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl BoundingBox {
    /// Create a new bounding box from corner coordinates.
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Create a bounding box from COCO-style `(x, y, width, height)`.
    ///
    /// Negative sizes are not corrected and yield an inverted box.
    pub fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    /// Box width (`x2 - x1`). Negative for inverted boxes.
    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    /// Box height (`y2 - y1`). Negative for inverted boxes.
    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    /// Get the area of the bounding box.
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Check if the box is ordered (`x1 <= x2`, `y1 <= y2`).
    pub fn is_well_formed(&self) -> bool {
        self.x1 <= self.x2 && self.y1 <= self.y2
    }

    /// Check if the box encloses no area.
    pub fn is_degenerate(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    /// Corners as `[x1, y1, x2, y2]`.
    pub fn to_array(&self) -> [f64; 4] {
        [self.x1, self.y1, self.x2, self.y2]
    }
}

impl From<[f64; 4]> for BoundingBox {
    fn from(c: [f64; 4]) -> Self {
        Self::new(c[0], c[1], c[2], c[3])
    }
}

impl From<BoundingBox> for [f64; 4] {
    fn from(bbox: BoundingBox) -> Self {
        bbox.to_array()
    }
}

/// A bounding box with a lowercase layout category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledBox {
    pub bbox: BoundingBox,
    #[serde(alias = "type", deserialize_with = "deserialize_label")]
    pub label: String,
}

impl LabeledBox {
    /// Create a labeled box. The label is lowercased.
    pub fn new(bbox: BoundingBox, label: impl AsRef<str>) -> Self {
        Self {
            bbox,
            label: normalize_label(label.as_ref()),
        }
    }

    /// Case-insensitive label comparison.
    pub fn same_label(&self, other: &LabeledBox) -> bool {
        self.label == other.label || normalize_label(&self.label) == normalize_label(&other.label)
    }
}

/// Lowercase a category name.
pub fn normalize_label(label: &str) -> String {
    label.to_lowercase()
}

fn deserialize_label<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let label = String::deserialize(deserializer)?;
    Ok(normalize_label(&label))
}

/// Represents a category in the ground-truth category table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supercategory: Option<String>,
}

/// A single ground-truth annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_id: Option<u64>,
    pub category_id: i64,
    /// Bounding box in [x, y, width, height] format
    pub bbox: Vec<f64>,
}

impl Annotation {
    /// Convert the `[x, y, width, height]` array to a corner-format box.
    pub fn to_bbox(&self) -> crate::error::Result<BoundingBox> {
        match self.bbox.as_slice() {
            &[x, y, w, h] => Ok(BoundingBox::from_xywh(x, y, w, h)),
            other => Err(crate::error::LayoutEvalError::InvalidData(format!(
                "Expected 4 bbox values, got {}",
                other.len()
            ))),
        }
    }
}

/// Ground-truth annotation document for a single page image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundTruthDocument {
    pub categories: Vec<Category>,
    pub annotations: Vec<Annotation>,
}
