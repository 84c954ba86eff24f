/// Result layout classification
///
/// Maps each result's score and aspect ratio to visual size/shape
/// classes, giving high-confidence and extreme-aspect results more
/// weight in the gallery grid. Classification is a pure function of the
/// item's own fields, so tiles render independently and in any order.

use crate::api::types::SearchResult;

/// Base edge of a gallery tile in logical pixels
pub const BASE_TILE: f32 = 220.0;

/// Gap between tiles in the wrap grid
pub const TILE_GAP: f32 = 12.0;

/// Shape axis, derived from aspect ratio (height / width)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeClass {
    /// aspect ratio > 1.3 — very tall
    Portrait,
    /// aspect ratio < 0.5 — very wide
    Panorama,
    /// 0.5 <= aspect ratio < 0.7 — moderately wide
    Landscape,
}

/// Size axis, derived from score (and aspect ratio for Large)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeClass {
    /// score > 0.9
    Full,
    /// score > 0.8 and aspect ratio > 1.2
    Large,
}

/// The two independent class axes for one tile; either may be absent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayoutClass {
    pub shape: Option<ShapeClass>,
    pub size: Option<SizeClass>,
}

/// Classify one result. First match wins per axis; the axes are
/// independent and both may apply.
pub fn classify(score: f32, aspect_ratio: f32) -> LayoutClass {
    let shape = if aspect_ratio > 1.3 {
        Some(ShapeClass::Portrait)
    } else if aspect_ratio < 0.5 {
        Some(ShapeClass::Panorama)
    } else if aspect_ratio < 0.7 {
        Some(ShapeClass::Landscape)
    } else {
        None
    };

    let size = if score > 0.9 {
        Some(SizeClass::Full)
    } else if score > 0.8 && aspect_ratio > 1.2 {
        Some(SizeClass::Large)
    } else {
        None
    };

    LayoutClass { shape, size }
}

/// Classify a ranked sequence 1:1, preserving input (rank) order
pub fn lay_out(results: &[SearchResult]) -> Vec<(&SearchResult, LayoutClass)> {
    results
        .iter()
        .map(|result| (result, classify(result.score, result.aspect_ratio())))
        .collect()
}

impl LayoutClass {
    /// Translate the classes into tile dimensions for the wrap grid.
    /// The shape axis picks the base proportions, the size axis scales
    /// them up. Presentation values only.
    pub fn tile_size(&self) -> (f32, f32) {
        let (mut width, mut height) = match self.shape {
            Some(ShapeClass::Portrait) => (BASE_TILE, BASE_TILE * 1.5),
            Some(ShapeClass::Panorama) => (BASE_TILE * 2.0 + TILE_GAP, BASE_TILE * 0.6),
            Some(ShapeClass::Landscape) => (BASE_TILE * 1.5, BASE_TILE * 0.8),
            None => (BASE_TILE, BASE_TILE),
        };

        let scale = match self.size {
            Some(SizeClass::Full) => 1.6,
            Some(SizeClass::Large) => 1.3,
            None => 1.0,
        };
        width *= scale;
        height *= scale;

        (width, height)
    }
}
