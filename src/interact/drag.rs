//! Pointer/touch driven dragging of the sprite or one text layer.
//!
//! The controller owns only transient drag state; every position it computes is written straight
//! back into the [`Session`]. Pointer coordinates arrive in surface pixels and are mapped into
//! logical units first, so clamping always happens in logical space.

use crate::{
    foundation::core::{Point, Vec2},
    scene::model::{SPRITE_HEIGHT_FRACTION, Sprite, TextId, TextLayer},
    scene::session::Session,
    text::layout::approx_text_extent,
    transform::scaling::SpaceMapping,
};

/// One pointer reading, before normalization.
#[derive(Clone, Debug, PartialEq)]
pub enum PointerInput {
    Mouse(Point),
    /// Active touch points; only the first one is honored.
    Touch(Vec<Point>),
}

impl PointerInput {
    pub fn mouse(x: f64, y: f64) -> Self {
        Self::Mouse(Point::new(x, y))
    }

    pub fn touch(x: f64, y: f64) -> Self {
        Self::Touch(vec![Point::new(x, y)])
    }

    /// The single surface-local reading, or `None` for an empty touch list.
    pub fn reading(&self) -> Option<Point> {
        match self {
            Self::Mouse(p) => Some(*p),
            Self::Touch(points) => points.first().copied(),
        }
    }
}

/// Why a drag ended. All kinds end it the same way.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReleaseKind {
    Up,
    Leave,
    Cancel,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum DragState {
    #[default]
    Idle,
    DraggingSprite {
        pointer_offset: Vec2,
    },
    DraggingText {
        id: TextId,
        pointer_offset: Vec2,
    },
}

/// Three-state drag machine: idle, dragging the sprite, or dragging one text layer.
#[derive(Clone, Debug)]
pub struct DragController {
    state: DragState,
    mapping: SpaceMapping,
}

impl Default for DragController {
    fn default() -> Self {
        Self::new(SpaceMapping::logical())
    }
}

impl DragController {
    /// `mapping` converts surface pixels (its target) into logical units.
    pub fn new(mapping: SpaceMapping) -> Self {
        Self {
            state: DragState::Idle,
            mapping,
        }
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        !matches!(self.state, DragState::Idle)
    }

    pub fn mapping(&self) -> SpaceMapping {
        self.mapping
    }

    /// The preview was resized; later readings use the new mapping.
    pub fn set_mapping(&mut self, mapping: SpaceMapping) {
        self.mapping = mapping;
    }

    fn logical_reading(&self, input: &PointerInput) -> Option<Point> {
        input
            .reading()
            .map(|p| self.mapping.to_logical_point(p))
            .filter(|p| p.is_finite())
    }

    /// Start dragging the sprite. Returns `false` when the input carries no reading.
    pub fn grab_sprite(&mut self, session: &Session, input: &PointerInput) -> bool {
        let Some(pointer) = self.logical_reading(input) else {
            return false;
        };
        let pointer_offset = pointer - session.sprite().position;
        tracing::debug!(dx = pointer_offset.x, dy = pointer_offset.y, "drag sprite");
        self.state = DragState::DraggingSprite { pointer_offset };
        true
    }

    /// Start dragging text layer `id` and make it the active layer.
    ///
    /// Unknown ids leave both the controller and the session unchanged.
    pub fn grab_text(&mut self, session: &mut Session, id: &TextId, input: &PointerInput) -> bool {
        let Some(pointer) = self.logical_reading(input) else {
            return false;
        };
        let Some(layer) = session.text(id) else {
            return false;
        };
        let pointer_offset = pointer - layer.position;
        session.set_active_text(Some(id));
        tracing::debug!(%id, dx = pointer_offset.x, dy = pointer_offset.y, "drag text");
        self.state = DragState::DraggingText {
            id: id.clone(),
            pointer_offset,
        };
        true
    }

    /// Move the grabbed layer to `pointer - pointer_offset`, clamped, and write it back.
    ///
    /// Returns whether a layer moved. Idle controllers and layers deleted mid-drag ignore moves.
    pub fn pointer_move(&mut self, session: &mut Session, input: &PointerInput) -> bool {
        let Some(pointer) = self.logical_reading(input) else {
            return false;
        };
        let extent = self.mapping.logical_extent;
        match &self.state {
            DragState::Idle => false,
            DragState::DraggingSprite { pointer_offset } => {
                let raw = pointer - *pointer_offset;
                let clamped = clamp_sprite_position(session.sprite(), raw, extent);
                session.set_sprite_position(clamped).is_ok()
            }
            DragState::DraggingText { id, pointer_offset } => {
                let Some(layer) = session.text(id) else {
                    return false;
                };
                let raw = pointer - *pointer_offset;
                let clamped = clamp_text_position(layer, raw, extent);
                session.set_text_position(id, clamped)
            }
        }
    }

    /// End any drag. Always lands in [`DragState::Idle`].
    pub fn release(&mut self, kind: ReleaseKind) {
        if self.is_dragging() {
            tracing::debug!(?kind, "drag released");
        }
        self.state = DragState::Idle;
    }
}

fn clamp_axis(v: f64, lo: f64, hi: f64) -> f64 {
    v.clamp(lo, hi.max(lo))
}

/// Keep the sprite's center within `[-half, extent - half]` on each axis.
///
/// The half extents follow the drawn size: half the surface height times the layer scale, with
/// the width derived from the variant's aspect ratio.
pub fn clamp_sprite_position(sprite: &Sprite, raw: Point, logical_extent: f64) -> Point {
    let height = logical_extent * SPRITE_HEIGHT_FRACTION * sprite.transform.scale.abs();
    let half_h = height / 2.0;
    let half_w = half_h * sprite.aspect_ratio;
    Point::new(
        clamp_axis(raw.x, -half_w, logical_extent - half_w),
        clamp_axis(raw.y, -half_h, logical_extent - half_h),
    )
}

/// Keep a text anchor within `[0, extent - approx_extent]` on each axis.
///
/// Uses the character-count estimate from [`approx_text_extent`] rather than glyph metrics.
pub fn clamp_text_position(layer: &TextLayer, raw: Point, logical_extent: f64) -> Point {
    let (w, h) = approx_text_extent(
        &layer.message,
        layer.style.font_size,
        layer.style.transform.scale,
    );
    Point::new(
        clamp_axis(raw.x, 0.0, logical_extent - w),
        clamp_axis(raw.y, 0.0, logical_extent - h),
    )
}

#[cfg(test)]
#[path = "../../tests/unit/interact/drag.rs"]
mod tests;
