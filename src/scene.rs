/// Font presets and export-safe family stacks.
pub mod fonts;
/// Layer data types and serde boundary.
pub mod model;
/// The editing session that owns every layer.
pub mod session;
