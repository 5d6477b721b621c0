//! Per-layer affine transform model shared by the sprite and text layers.

use crate::foundation::core::{Affine, Point, Vec2};
use crate::foundation::error::{LayercompError, LayercompResult};

/// Rotation, flip-scale and opacity of a layer around its anchor.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LayerTransform {
    /// Signed rotation in degrees (clockwise in y-down surface space).
    pub rotation_deg: f64,
    /// Uniform scale magnitude; `0` is legal and renders nothing.
    pub scale: f64,
    pub flip_x: bool,
    pub flip_y: bool,
    /// Layer opacity in `[0, 1]`.
    pub opacity: f64,
}

impl Default for LayerTransform {
    fn default() -> Self {
        Self {
            rotation_deg: 0.0,
            scale: 1.0,
            flip_x: false,
            flip_y: false,
            opacity: 1.0,
        }
    }
}

impl LayerTransform {
    /// Per-axis scale with the flip signs folded in.
    ///
    /// Every draw-time scaling goes through this value, never through `scale` alone.
    pub fn effective_scale(&self) -> Vec2 {
        let sx = if self.flip_x { -self.scale } else { self.scale };
        let sy = if self.flip_y { -self.scale } else { self.scale };
        Vec2::new(sx, sy)
    }

    /// Local-to-surface transform: translate to `anchor`, rotate, then flip-scale.
    pub fn to_affine(&self, anchor: Point) -> Affine {
        let s = self.effective_scale();
        Affine::translate(anchor.to_vec2())
            * Affine::rotate(self.rotation_deg.to_radians())
            * Affine::scale_non_uniform(s.x, s.y)
    }

    /// True when the layer collapses to nothing visible (zero scale on an axis, or no opacity).
    pub fn is_invisible(&self) -> bool {
        let s = self.effective_scale();
        s.x == 0.0 || s.y == 0.0 || self.opacity <= 0.0
    }

    pub fn opacity_f32(&self) -> f32 {
        self.opacity.clamp(0.0, 1.0) as f32
    }

    pub fn validate(&self) -> LayercompResult<()> {
        finite("rotation_deg", self.rotation_deg)?;
        finite("scale", self.scale)?;
        finite("opacity", self.opacity)?;
        if self.scale < 0.0 {
            return Err(LayercompError::validation("scale must be >= 0"));
        }
        Ok(())
    }
}

/// Partial update of a [`LayerTransform`]; `None` fields are left untouched.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TransformPatch {
    pub rotation_deg: Option<f64>,
    pub scale: Option<f64>,
    pub flip_x: Option<bool>,
    pub flip_y: Option<bool>,
    pub opacity: Option<f64>,
}

impl TransformPatch {
    /// Produce the patched transform, or reject the whole patch if any value is invalid.
    ///
    /// Opacity is clamped into `[0, 1]`; non-finite numbers and negative scale are rejected.
    pub fn apply_to(&self, base: &LayerTransform) -> LayercompResult<LayerTransform> {
        let mut out = *base;
        if let Some(v) = self.rotation_deg {
            out.rotation_deg = finite("rotation_deg", v)?;
        }
        if let Some(v) = self.scale {
            out.scale = finite("scale", v)?;
        }
        if let Some(v) = self.flip_x {
            out.flip_x = v;
        }
        if let Some(v) = self.flip_y {
            out.flip_y = v;
        }
        if let Some(v) = self.opacity {
            out.opacity = finite("opacity", v)?.clamp(0.0, 1.0);
        }
        out.validate()?;
        Ok(out)
    }
}

pub(crate) fn finite(name: &str, v: f64) -> LayercompResult<f64> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(LayercompError::validation(format!(
            "{name} must be finite (got {v})"
        )))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transform/layer.rs"]
mod tests;
