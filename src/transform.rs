//! Layer transforms and the logical ↔ pixel mapping.

/// Rotation, flip-scale and opacity of one layer.
pub mod layer;
/// Coordinate scaling between the logical surface and pixel targets.
pub mod scaling;
