//! Tool selection and style settings.

use crate::drawable::{Rgba, StickerPlacement};

/// Mix a counter into a well-distributed 32-bit value (splitmix32-like).
fn mix32(counter: u32) -> u32 {
    let mut x = counter.wrapping_mul(0x9E3779B9);
    x ^= x >> 16;
    x = x.wrapping_mul(0x85EBCA6B);
    x ^= x >> 13;
    x = x.wrapping_mul(0xC2B2AE35);
    x ^= x >> 16;
    x
}

/// Pseudo-random sticker rotations in whole degrees.
#[derive(Debug, Clone)]
pub struct RotationSource {
    counter: u32,
}

impl RotationSource {
    /// Deterministic sequence starting from `seed`.
    pub fn seeded(seed: u32) -> Self {
        Self { counter: seed }
    }

    /// Sequence seeded from the wall clock.
    pub fn from_clock() -> Self {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.subsec_nanos())
            .unwrap_or(1);
        Self::seeded(nanos)
    }

    /// Next rotation in `0..360`.
    pub fn next_degrees(&mut self) -> u16 {
        self.counter = self.counter.wrapping_add(1);
        (mix32(self.counter) % 360) as u16
    }
}

impl Default for RotationSource {
    fn default() -> Self {
        Self::from_clock()
    }
}

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ToolKind {
    /// No tool selected; pointer presses are ignored.
    #[default]
    None,
    Brush,
    Sticker,
}

/// Style values read when a gesture starts.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolSettings {
    pub brush_width: f64,
    pub brush_color: Rgba,
    pub sticker_glyph: String,
    pub sticker_size: f64,
}

impl ToolSettings {
    pub const DEFAULT_BRUSH_WIDTH: f64 = 2.0;
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            brush_width: Self::DEFAULT_BRUSH_WIDTH,
            brush_color: Rgba::black(),
            sticker_glyph: "⭐".to_string(),
            sticker_size: StickerPlacement::DEFAULT_SIZE,
        }
    }
}
