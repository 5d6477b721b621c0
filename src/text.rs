//! Text layout, written once over a [`layout::TextMeasure`], plus the raster shaping adapter.

pub mod layout;
pub mod shaper;
