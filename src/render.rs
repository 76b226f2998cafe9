//! Overlay rendering of layout boxes onto page images.

use crate::matching::MatchResult;
use crate::types::{normalize_label, BoundingBox, LabeledBox};
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use std::collections::HashMap;

/// Colour for keys missing from a [`ColorMap`].
pub const DEFAULT_COLOR: Rgb<u8> = Rgb([128, 128, 128]);

/// Colours by match status code.
const OUTCOME_COLORS: [(&str, [u8; 3]); 3] = [
    ("tp", [0, 255, 0]), // Green
    ("fp", [255, 0, 0]), // Red
    ("fn", [0, 0, 255]), // Blue
];

/// Colours by layout category.
const CATEGORY_COLORS: [(&str, [u8; 3]); 8] = [
    ("title", [255, 0, 0]),
    ("text", [0, 255, 0]),
    ("list", [255, 165, 0]),
    ("table", [0, 255, 255]),
    ("figure", [0, 0, 255]),
    ("header", [255, 0, 255]),
    ("footer", [128, 0, 128]),
    ("reference", [165, 42, 42]),
];

/// Fixed key to colour table with a default for unknown keys.
///
/// Keys are matched case-insensitively.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorMap {
    colors: HashMap<String, Rgb<u8>>,
    default: Rgb<u8>,
}

impl ColorMap {
    pub fn new<K: AsRef<str>>(entries: &[(K, [u8; 3])], default: Rgb<u8>) -> Self {
        let colors = entries
            .iter()
            .map(|(key, rgb)| (normalize_label(key.as_ref()), Rgb(*rgb)))
            .collect();
        Self { colors, default }
    }

    /// TP green, FP red, FN blue.
    pub fn outcomes() -> Self {
        Self::new(&OUTCOME_COLORS, DEFAULT_COLOR)
    }

    /// Per-category palette used when visualizing raw detections.
    pub fn categories() -> Self {
        Self::new(&CATEGORY_COLORS, DEFAULT_COLOR)
    }

    pub fn get(&self, key: &str) -> Rgb<u8> {
        self.colors
            .get(key)
            .or_else(|| self.colors.get(&normalize_label(key)))
            .copied()
            .unwrap_or(self.default)
    }

    pub fn default_color(&self) -> Rgb<u8> {
        self.default
    }
}

/// Draw outlined boxes onto a copy of `image`.
///
/// Each box gets `line_width` one-pixel outlines, stepping inward from its
/// edge; corner coordinates are truncated to pixels and the far edge is
/// inclusive. Boxes are drawn in input order, so later boxes paint over
/// earlier ones where edges coincide. Inverted boxes are skipped.
pub fn draw_boxes<K: AsRef<str>>(
    image: &RgbImage,
    boxes: &[(BoundingBox, K)],
    colors: &ColorMap,
    line_width: u32,
) -> RgbImage {
    let mut canvas = image.clone();

    for (bbox, key) in boxes {
        if !bbox.is_well_formed() {
            log::warn!("skipping inverted box {:?}", bbox.to_array());
            continue;
        }
        draw_outline(&mut canvas, bbox, colors.get(key.as_ref()), line_width);
    }

    canvas
}

fn draw_outline(canvas: &mut RgbImage, bbox: &BoundingBox, color: Rgb<u8>, line_width: u32) {
    // Nothing past one outline beyond the canvas edge is visible.
    let (canvas_width, canvas_height) = canvas.dimensions();
    let margin = f64::from(line_width) + 1.0;
    let clamp_x = |v: f64| v.clamp(-margin, f64::from(canvas_width) + margin) as i64;
    let clamp_y = |v: f64| v.clamp(-margin, f64::from(canvas_height) + margin) as i64;

    let x1 = clamp_x(bbox.x1);
    let y1 = clamp_y(bbox.y1);
    let width = clamp_x(bbox.x2) - x1 + 1;
    let height = clamp_y(bbox.y2) - y1 + 1;

    for inset in 0..i64::from(line_width) {
        let w = width - 2 * inset;
        let h = height - 2 * inset;
        if w <= 0 || h <= 0 {
            break;
        }
        let (Ok(x), Ok(y), Ok(w), Ok(h)) = (
            i32::try_from(x1 + inset),
            i32::try_from(y1 + inset),
            u32::try_from(w),
            u32::try_from(h),
        ) else {
            log::warn!("box {:?} is outside the drawable range", bbox.to_array());
            return;
        };
        draw_hollow_rect_mut(canvas, Rect::at(x, y).of_size(w, h), color);
    }
}

/// Colour every matched box by its outcome (TP, FP, FN).
pub fn render_outcomes(image: &RgbImage, matches: &MatchResult, line_width: u32) -> RgbImage {
    let boxes: Vec<(BoundingBox, &str)> = matches
        .status_boxes()
        .into_iter()
        .map(|(bbox, status)| (bbox, status.as_str()))
        .collect();
    draw_boxes(image, &boxes, &ColorMap::outcomes(), line_width)
}

/// Colour detected boxes by their layout category.
pub fn render_layout(image: &RgbImage, boxes: &[LabeledBox], line_width: u32) -> RgbImage {
    let keyed: Vec<(BoundingBox, &str)> = boxes
        .iter()
        .map(|b| (b.bbox, b.label.as_str()))
        .collect();
    draw_boxes(image, &keyed, &ColorMap::categories(), line_width)
}
