//! Mapping between the logical editing surface and a pixel target.
//!
//! The logical surface is a fixed square (see [`LOGICAL_EXTENT`]). Both the pointer mapping used
//! while dragging and the export renderer derive their ratio from [`to_export_space`], so preview
//! and export can never disagree about where a layer sits.

use crate::foundation::core::Point;

/// Side length of the interactive surface in logical units.
pub const LOGICAL_EXTENT: f64 = 500.0;

/// Map a logical length or coordinate onto a `output_px`-sized target.
#[inline]
pub fn to_export_space(logical_value: f64, output_px: f64, logical_extent: f64) -> f64 {
    logical_value * (output_px / logical_extent)
}

/// A fixed logical-extent ↔ pixel-extent pairing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpaceMapping {
    pub logical_extent: f64,
    pub target_px: f64,
}

impl SpaceMapping {
    pub fn new(target_px: f64, logical_extent: f64) -> Self {
        Self {
            logical_extent,
            target_px,
        }
    }

    /// Identity mapping for a surface drawn at its logical size.
    pub fn logical() -> Self {
        Self::new(LOGICAL_EXTENT, LOGICAL_EXTENT)
    }

    pub fn ratio(&self) -> f64 {
        to_export_space(1.0, self.target_px, self.logical_extent)
    }

    pub fn to_target(&self, logical_value: f64) -> f64 {
        to_export_space(logical_value, self.target_px, self.logical_extent)
    }

    pub fn to_target_point(&self, p: Point) -> Point {
        Point::new(self.to_target(p.x), self.to_target(p.y))
    }

    /// Inverse mapping: pixel value on the target back into logical units.
    pub fn to_logical(&self, target_value: f64) -> f64 {
        target_value / self.ratio()
    }

    pub fn to_logical_point(&self, p: Point) -> Point {
        Point::new(self.to_logical(p.x), self.to_logical(p.y))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transform/scaling.rs"]
mod tests;
