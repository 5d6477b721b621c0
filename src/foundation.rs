/// Color, geometry and canvas value types.
pub mod core;
/// Error taxonomy and result alias.
pub mod error;
pub(crate) mod math;
