//! Editing session: the single owner of every layer, the active selection and the font choice.

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    assets::loader::ImageLoader,
    foundation::core::{Point, Position},
    foundation::error::{LayercompError, LayercompResult},
    scene::fonts::{DEFAULT_FONT_PRESET, font_preset},
    scene::model::{
        Background, ImageRef, SceneSnapshot, Sprite, TextId, TextLayer, TextPatch, TextStyle,
        finite_point,
    },
    transform::layer::{TransformPatch, finite},
    transform::scaling::LOGICAL_EXTENT,
};

/// Margin kept between a freshly added text anchor and the surface edges.
const NEW_TEXT_MARGIN: f64 = 60.0;
const NEW_TEXT_MESSAGE: &str = "New Text";

/// All mutable editor state. Mutated by explicit commands and by the drag controller only.
#[derive(Clone, Debug)]
pub struct Session {
    background: Background,
    sprite: Sprite,
    texts: Vec<TextLayer>,
    active_text: Option<TextId>,
    selected_font: &'static str,
    next_text_id: u64,
    rng: StdRng,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Fresh session with default layers; new text placement is randomized.
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_os_rng())
    }

    /// Fresh session whose text placement sequence is reproducible.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            background: Background::default(),
            sprite: Sprite::default(),
            texts: Vec::new(),
            active_text: None,
            selected_font: DEFAULT_FONT_PRESET,
            next_text_id: 1,
            rng,
        }
    }

    pub fn background(&self) -> &Background {
        &self.background
    }

    pub fn set_background(&mut self, background: Background) -> LayercompResult<()> {
        self.background = background.normalized()?;
        Ok(())
    }

    pub fn sprite(&self) -> &Sprite {
        &self.sprite
    }

    /// Switch the character image; position and transform are preserved.
    pub fn set_selected_variant(&mut self, variant: ImageRef) {
        self.sprite.variant = variant;
    }

    /// Switch to `variant` and take the sprite's aspect ratio from its decoded image.
    ///
    /// Nothing changes if the image cannot be loaded.
    pub fn load_selected_variant(
        &mut self,
        variant: ImageRef,
        loader: &dyn ImageLoader,
    ) -> LayercompResult<()> {
        let image = loader.load(&variant)?;
        self.set_sprite_aspect(image.aspect_ratio())?;
        self.set_selected_variant(variant);
        Ok(())
    }

    /// Record the native aspect ratio of the current variant once its image is known.
    pub fn set_sprite_aspect(&mut self, aspect_ratio: f64) -> LayercompResult<()> {
        let aspect_ratio = finite("aspect_ratio", aspect_ratio)?;
        if aspect_ratio <= 0.0 {
            return Err(LayercompError::validation("aspect_ratio must be > 0"));
        }
        self.sprite.aspect_ratio = aspect_ratio;
        Ok(())
    }

    pub fn update_sprite_transform(&mut self, patch: &TransformPatch) -> LayercompResult<()> {
        self.sprite.transform = patch.apply_to(&self.sprite.transform)?;
        Ok(())
    }

    pub fn set_sprite_position(&mut self, position: Position) -> LayercompResult<()> {
        self.sprite.position = finite_point("sprite position", position)?;
        Ok(())
    }

    /// Text layers in insertion order.
    pub fn texts(&self) -> &[TextLayer] {
        &self.texts
    }

    pub fn text(&self, id: &TextId) -> Option<&TextLayer> {
        self.texts.iter().find(|t| &t.id == id)
    }

    pub fn active_text(&self) -> Option<&TextId> {
        self.active_text.as_ref()
    }

    /// Select a text layer, or clear the selection with `None`.
    ///
    /// Returns `false` (and changes nothing) when `id` names no layer.
    pub fn set_active_text(&mut self, id: Option<&TextId>) -> bool {
        match id {
            None => {
                self.active_text = None;
                true
            }
            Some(id) if self.text(id).is_some() => {
                self.active_text = Some(id.clone());
                true
            }
            Some(_) => false,
        }
    }

    pub fn selected_font(&self) -> &'static str {
        self.selected_font
    }

    pub fn set_selected_font(&mut self, preset_key: &str) -> LayercompResult<()> {
        let preset = font_preset(preset_key).ok_or_else(|| {
            LayercompError::validation(format!("unknown font preset '{preset_key}'"))
        })?;
        self.selected_font = preset.key;
        Ok(())
    }

    /// Append a text layer with default style in the selected font and make it active.
    pub fn add_text(&mut self) -> TextId {
        let id = TextId(format!("text-{}", self.next_text_id));
        self.next_text_id += 1;

        let family = font_preset(self.selected_font)
            .map_or("sans-serif", |p| p.display_family);
        let position = self.new_text_position();

        self.texts.push(TextLayer {
            id: id.clone(),
            message: NEW_TEXT_MESSAGE.to_string(),
            position,
            style: TextStyle::with_family(family),
        });
        self.active_text = Some(id.clone());
        tracing::debug!(%id, x = position.x, y = position.y, "added text layer");
        id
    }

    fn new_text_position(&mut self) -> Point {
        let (min_x, max_x) = (NEW_TEXT_MARGIN, LOGICAL_EXTENT - NEW_TEXT_MARGIN);
        let (min_y, max_y) = (NEW_TEXT_MARGIN, LOGICAL_EXTENT / 3.0 - NEW_TEXT_MARGIN);
        let x = min_x + self.rng.random::<f64>() * (max_x - min_x);
        let y = min_y + self.rng.random::<f64>() * (max_y - min_y);
        Point::new(x, y)
    }

    /// Remove a text layer; clears the active selection if it pointed at `id`.
    pub fn delete_text(&mut self, id: &TextId) -> bool {
        let before = self.texts.len();
        self.texts.retain(|t| &t.id != id);
        let removed = self.texts.len() != before;
        if self.active_text.as_ref() == Some(id) {
            self.active_text = None;
        }
        if removed {
            tracing::debug!(%id, "deleted text layer");
        }
        removed
    }

    /// Apply a content/position/style patch to one layer.
    ///
    /// Unknown ids are a no-op (`Ok(false)`); an invalid value rejects the whole patch.
    pub fn update_text(&mut self, id: &TextId, patch: &TextPatch) -> LayercompResult<bool> {
        let Some(layer) = self.texts.iter_mut().find(|t| &t.id == id) else {
            return Ok(false);
        };

        let style = patch.style.apply_to(&layer.style)?;
        let position = match patch.position {
            Some(p) => finite_point("text position", p)?,
            None => layer.position,
        };

        layer.style = style;
        layer.position = position;
        if let Some(message) = &patch.message {
            layer.message = message.clone();
        }
        Ok(true)
    }

    pub(crate) fn set_text_position(&mut self, id: &TextId, position: Position) -> bool {
        match self.texts.iter_mut().find(|t| &t.id == id) {
            Some(layer) => {
                layer.position = position;
                true
            }
            None => false,
        }
    }

    /// Export paint order: insertion order, independent of the selection.
    pub fn export_order(&self) -> impl Iterator<Item = &TextLayer> {
        self.texts.iter()
    }

    /// Interactive paint order: insertion order with the active layer lifted to the top.
    pub fn display_order(&self) -> impl Iterator<Item = &TextLayer> {
        let active = self.active_text.as_ref();
        self.texts
            .iter()
            .filter(move |t| Some(&t.id) != active)
            .chain(self.texts.iter().filter(move |t| Some(&t.id) == active))
    }

    /// Consistent copy of all layer state for an export.
    pub fn snapshot(&self) -> SceneSnapshot {
        SceneSnapshot {
            background: self.background.clone(),
            sprite: self.sprite.clone(),
            texts: self.export_order().cloned().collect(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/session.rs"]
mod tests;
