//! Export rendering: compile a scene snapshot to draw ops, then rasterize them on the CPU.

/// `vello_cpu` executor for [`plan::RenderPlan`].
pub mod cpu;
/// Settings, output raster and the single-flight exporter.
pub mod export;
/// Scene → draw-op compiler.
pub mod plan;
