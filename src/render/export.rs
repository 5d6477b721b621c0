//! Export entry points: settings, the output raster, and the one-at-a-time exporter.

use std::{
    io::Cursor,
    sync::atomic::{AtomicBool, Ordering},
};

use anyhow::Context;

use crate::{
    assets::loader::{ImageLoader, load_scene_images},
    foundation::core::Canvas,
    foundation::error::{LayercompError, LayercompResult},
    foundation::math::{Fnv1a64, unpremul_u8},
    render::cpu::execute_plan,
    render::plan::compile_scene,
    scene::model::SceneSnapshot,
    scene::session::Session,
    text::shaper::RasterTextEngine,
    transform::layer::finite,
    transform::scaling::{LOGICAL_EXTENT, SpaceMapping},
};

/// Environment variable overriding the square export size in pixels.
pub const EXPORT_PX_ENV: &str = "LAYERCOMP_EXPORT_PX";
/// Default square export size in pixels.
pub const DEFAULT_EXPORT_PX: u32 = 1200;

/// Output size and surface mapping of an export.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ExportSettings {
    pub width: u32,
    pub height: u32,
    /// Logical surface extent the scene coordinates are expressed in.
    pub logical_extent: f64,
    /// Straight RGBA the target starts from, beneath the background.
    pub clear_rgba: [u8; 4],
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self::square(DEFAULT_EXPORT_PX)
    }
}

impl ExportSettings {
    pub fn square(px: u32) -> Self {
        Self {
            width: px,
            height: px,
            logical_extent: LOGICAL_EXTENT,
            clear_rgba: [0, 0, 0, 0],
        }
    }

    /// Defaults, with the square size taken from [`EXPORT_PX_ENV`] when it holds a positive integer.
    pub fn from_env() -> Self {
        std::env::var(EXPORT_PX_ENV)
            .ok()
            .and_then(|v| v.trim().parse::<u32>().ok())
            .filter(|&n| n > 0)
            .map_or_else(Self::default, Self::square)
    }

    pub fn validate(&self) -> LayercompResult<()> {
        let max = u32::from(u16::MAX);
        if self.width == 0 || self.height == 0 || self.width > max || self.height > max {
            return Err(LayercompError::validation(format!(
                "export size must be within 1..={max} (got {}x{})",
                self.width, self.height
            )));
        }
        if finite("logical_extent", self.logical_extent)? <= 0.0 {
            return Err(LayercompError::validation("logical_extent must be > 0"));
        }
        Ok(())
    }

    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    /// Logical → output pixel mapping, driven by the output width.
    pub fn mapping(&self) -> SpaceMapping {
        SpaceMapping::new(f64::from(self.width), self.logical_extent)
    }
}

/// Fingerprint of rendered pixels, stable across runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RasterFingerprint {
    pub hi: u64,
    pub lo: u64,
}

/// Finished export: premultiplied RGBA8, row-major, tightly packed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl RasterImage {
    /// Premultiplied pixel at `(x, y)`, or `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    pub fn fingerprint(&self) -> RasterFingerprint {
        let mut a = Fnv1a64::new_default();
        let mut b = Fnv1a64::new(0x9ae1_6a3b_2f90_404f);
        for h in [&mut a, &mut b] {
            h.write_u32(self.width);
            h.write_u32(self.height);
            h.write_bytes(&self.data);
        }
        RasterFingerprint {
            hi: a.finish(),
            lo: b.finish(),
        }
    }

    /// Straight-alpha copy of the pixels.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        for px in out.chunks_exact_mut(4) {
            let a = px[3];
            for c in &mut px[..3] {
                *c = unpremul_u8(*c, a);
            }
        }
        out
    }

    /// Encode as a straight-alpha PNG.
    pub fn encode_png(&self) -> LayercompResult<Vec<u8>> {
        let img = image::RgbaImage::from_raw(self.width, self.height, self.to_straight_rgba8())
            .ok_or_else(|| LayercompError::render("raster byte length does not match its size"))?;
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .context("encode png")?;
        Ok(buf)
    }
}

/// Render a frozen scene: load images, lay out text, rasterize.
///
/// Any image that fails to load fails the whole export; nothing partial is returned.
#[tracing::instrument(skip_all, fields(width = settings.width, height = settings.height))]
pub fn render_scene(
    snapshot: &SceneSnapshot,
    loader: &dyn ImageLoader,
    text: &mut RasterTextEngine,
    settings: &ExportSettings,
) -> LayercompResult<RasterImage> {
    settings.validate()?;
    let images = load_scene_images(snapshot, loader)?;
    let plan = compile_scene(snapshot, &images, text, settings)?;
    let out = execute_plan(&plan, &images, text)?;
    tracing::debug!(ops = plan.ops.len(), "scene rendered");
    Ok(out)
}

/// Marks an export as running until dropped.
#[derive(Debug)]
pub struct ExportGuard<'a> {
    busy: &'a AtomicBool,
}

impl Drop for ExportGuard<'_> {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

/// Runs at most one export at a time; concurrent requests are rejected, not queued.
#[derive(Debug, Default)]
pub struct Exporter {
    busy: AtomicBool,
    settings: ExportSettings,
}

impl Exporter {
    pub fn new(settings: ExportSettings) -> Self {
        Self {
            busy: AtomicBool::new(false),
            settings,
        }
    }

    pub fn settings(&self) -> &ExportSettings {
        &self.settings
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Claim the busy flag, or fail with [`LayercompError::ExportBusy`].
    pub fn try_begin(&self) -> LayercompResult<ExportGuard<'_>> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::warn!("export requested while another export is running");
            return Err(LayercompError::ExportBusy);
        }
        Ok(ExportGuard { busy: &self.busy })
    }

    /// Snapshot `session` and render it. The session is only read, never modified.
    pub fn export(
        &self,
        session: &Session,
        loader: &dyn ImageLoader,
        text: &mut RasterTextEngine,
    ) -> LayercompResult<RasterImage> {
        let _guard = self.try_begin()?;
        let snapshot = session.snapshot();
        render_scene(&snapshot, loader, text, &self.settings)
    }

    /// Like [`Exporter::export`], returning PNG bytes.
    pub fn export_png(
        &self,
        session: &Session,
        loader: &dyn ImageLoader,
        text: &mut RasterTextEngine,
    ) -> LayercompResult<Vec<u8>> {
        self.export(session, loader, text)?.encode_png()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/export.rs"]
mod tests;
