//! Image resolution for exports: resolve an [`ImageRef`] to decoded pixels.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use anyhow::Context;

use crate::{
    assets::decode::{PreparedImage, decode_image},
    foundation::error::{LayercompError, LayercompResult},
    scene::model::{ImageRef, SceneSnapshot},
};

/// Source of decoded images. Implementations must tolerate concurrent `load` calls.
pub trait ImageLoader: Sync {
    fn load(&self, image: &ImageRef) -> LayercompResult<PreparedImage>;
}

/// Loads images from files under a root directory.
#[derive(Clone, Debug)]
pub struct FsImageLoader {
    root: PathBuf,
}

impl FsImageLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn read(&self, image: &ImageRef) -> LayercompResult<PreparedImage> {
        let rel = normalize_rel_path(image.as_str())?;
        let path = self.root.join(&rel);
        let bytes = std::fs::read(&path)
            .with_context(|| format!("read image bytes from '{}'", path.display()))?;
        decode_image(&bytes)
    }
}

impl ImageLoader for FsImageLoader {
    fn load(&self, image: &ImageRef) -> LayercompResult<PreparedImage> {
        self.read(image).map_err(|e| load_failure(image, e))
    }
}

/// In-memory encoded images keyed by reference.
#[derive(Clone, Debug, Default)]
pub struct MemoryImageLoader {
    encoded: HashMap<ImageRef, Vec<u8>>,
}

impl MemoryImageLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, image: ImageRef, encoded: Vec<u8>) {
        self.encoded.insert(image, encoded);
    }

    pub fn with(mut self, image: impl Into<String>, encoded: Vec<u8>) -> Self {
        self.insert(ImageRef::new(image), encoded);
        self
    }
}

impl ImageLoader for MemoryImageLoader {
    fn load(&self, image: &ImageRef) -> LayercompResult<PreparedImage> {
        let bytes = self
            .encoded
            .get(image)
            .ok_or_else(|| LayercompError::resource(format!("image '{image}' is not registered")))?;
        decode_image(bytes).map_err(|e| load_failure(image, e))
    }
}

fn load_failure(image: &ImageRef, err: LayercompError) -> LayercompError {
    match err {
        LayercompError::ResourceLoad(_) => err,
        LayercompError::Other(e) => LayercompError::resource(format!("image '{image}': {e:#}")),
        other => LayercompError::resource(format!("image '{image}': {other}")),
    }
}

/// Every image an export needs, decoded.
#[derive(Clone, Debug)]
pub struct SceneImages {
    pub background: Option<PreparedImage>,
    pub sprite: PreparedImage,
}

/// Load the background image (if the scene paints one) and the sprite concurrently.
///
/// Both loads complete before this returns; either failure fails the whole call.
#[tracing::instrument(skip_all, fields(sprite = %snapshot.sprite.variant))]
pub fn load_scene_images(
    snapshot: &SceneSnapshot,
    loader: &dyn ImageLoader,
) -> LayercompResult<SceneImages> {
    let background_ref = snapshot.background.active_image();
    let (background, sprite) = rayon::join(
        || background_ref.map(|r| loader.load(r)).transpose(),
        || loader.load(&snapshot.sprite.variant),
    );
    Ok(SceneImages {
        background: background?,
        sprite: sprite?,
    })
}

/// Normalize a root-relative image path; absolute paths and `..` are rejected.
pub fn normalize_rel_path(source: &str) -> LayercompResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(LayercompError::validation("image paths must be relative"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(LayercompError::validation(
                "image paths must not contain '..'",
            ));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(LayercompError::validation(
            "image path must contain a file name",
        ));
    }
    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/loader.rs"]
mod tests;
