//! Emoji sticker placement.

use super::{DrawableId, DrawableTrait, Rgba};
use crate::render::Surface;
use kurbo::{Point, Rect};
use uuid::Uuid;

/// A glyph stamped onto the surface at an anchor point.
#[derive(Debug, Clone, PartialEq)]
pub struct StickerPlacement {
    pub(crate) id: DrawableId,
    /// Center of the glyph.
    pub anchor: Point,
    /// Glyph text, usually a single emoji.
    pub glyph: String,
    /// Rotation in whole degrees, always within 0..360.
    rotation: u16,
    /// Glyph em size in surface pixels.
    pub size: f64,
}

impl StickerPlacement {
    /// Default glyph size in surface pixels.
    pub const DEFAULT_SIZE: f64 = 32.0;

    pub fn new(anchor: Point, glyph: impl Into<String>, rotation_degrees: u16) -> Self {
        Self::with_size(anchor, glyph, rotation_degrees, Self::DEFAULT_SIZE)
    }

    pub fn with_size(
        anchor: Point,
        glyph: impl Into<String>,
        rotation_degrees: u16,
        size: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            anchor,
            glyph: glyph.into(),
            rotation: normalize_degrees(rotation_degrees),
            size: if size.is_finite() && size > 0.0 {
                size
            } else {
                Self::DEFAULT_SIZE
            },
        }
    }

    pub fn rotation_degrees(&self) -> u16 {
        self.rotation
    }

    pub fn set_rotation_degrees(&mut self, degrees: u16) {
        self.rotation = normalize_degrees(degrees);
    }

    pub fn rotation_radians(&self) -> f64 {
        (self.rotation as f64).to_radians()
    }
}

pub(crate) fn normalize_degrees(degrees: u16) -> u16 {
    degrees % 360
}

impl DrawableTrait for StickerPlacement {
    fn id(&self) -> DrawableId {
        self.id
    }

    /// Rotation-independent box: the glyph square's circumscribed extent.
    fn bounds(&self) -> Rect {
        let half = self.size * std::f64::consts::FRAC_1_SQRT_2;
        Rect::new(
            self.anchor.x - half,
            self.anchor.y - half,
            self.anchor.x + half,
            self.anchor.y + half,
        )
    }

    fn extend(&mut self, point: Point) {
        self.anchor = point;
    }

    fn render(&self, surface: &mut dyn Surface) {
        surface.draw_glyph(
            &self.glyph,
            self.anchor,
            self.size,
            self.rotation_radians(),
            Rgba::black(),
            1.0,
        );
    }
}
