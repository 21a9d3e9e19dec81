//! Renderer trait abstraction.

use std::path::PathBuf;
use stickerpad_core::{Frame, Rgba};
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Invalid surface size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
    #[error("Invalid export scale {0}")]
    InvalidScale(f64),
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] png::EncodingError),
    #[error("Failed to load font {path:?}: {source}")]
    FontLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Largest accepted surface edge in pixels.
pub const MAX_SURFACE_EDGE: u32 = 16_384;

pub(crate) fn check_size(width: u32, height: u32) -> RenderResult<()> {
    if width == 0 || height == 0 || width > MAX_SURFACE_EDGE || height > MAX_SURFACE_EDGE {
        return Err(RendererError::InvalidSize { width, height });
    }
    Ok(())
}

/// Renderer configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub background: Rgba,
    /// Font families tried first when resolving sticker glyphs.
    pub preferred_families: Vec<String>,
    /// Additional font files registered before the system fonts.
    pub extra_font_files: Vec<PathBuf>,
    pub load_system_fonts: bool,
    /// Register the fonts shipped with egui (Noto Emoji, Hack) after every
    /// other face, ahead of the placeholder ring.
    pub bundled_fonts: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        let families: &[&str] = if cfg!(target_os = "macos") {
            &["Apple Color Emoji", "Apple Symbols"]
        } else if cfg!(target_os = "windows") {
            &["Segoe UI Emoji", "Segoe UI Symbol"]
        } else {
            &["Noto Color Emoji", "Noto Emoji", "Twitter Color Emoji", "DejaVu Sans"]
        };
        Self {
            background: Rgba::white(),
            preferred_families: families.iter().map(|s| s.to_string()).collect(),
            extra_font_files: Vec::new(),
            load_system_fonts: true,
            bundled_fonts: true,
        }
    }
}

impl RenderConfig {
    /// Configuration without system font discovery, for reproducible output.
    pub fn isolated() -> Self {
        Self {
            preferred_families: Vec::new(),
            load_system_fonts: false,
            bundled_fonts: false,
            ..Self::default()
        }
    }
}

/// Context for a single render frame.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub frame: Frame<'a>,
    /// Multiplier from surface coordinates to output pixels.
    pub scale_factor: f64,
    pub background_color: Rgba,
}

impl<'a> RenderContext<'a> {
    pub fn new(frame: Frame<'a>) -> Self {
        Self {
            frame,
            scale_factor: 1.0,
            background_color: Rgba::white(),
        }
    }

    /// Set the output scale factor.
    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    /// Set the background color.
    pub fn with_background(mut self, color: Rgba) -> Self {
        self.background_color = color;
        self
    }
}

/// Trait for rendering backends.
pub trait Renderer {
    /// Draw one frame. Holds no state between calls beyond caches.
    fn render(&mut self, ctx: &RenderContext<'_>);

    /// Output size in pixels.
    fn size(&self) -> (u32, u32);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_size() {
        assert!(check_size(800, 800).is_ok());
        assert!(matches!(
            check_size(0, 10),
            Err(RendererError::InvalidSize { width: 0, height: 10 })
        ));
        assert!(check_size(MAX_SURFACE_EDGE + 1, 1).is_err());
    }

    #[test]
    fn test_isolated_config() {
        let config = RenderConfig::isolated();
        assert!(!config.load_system_fonts);
        assert!(!config.bundled_fonts);
        assert!(config.preferred_families.is_empty());
        assert_eq!(config.background, Rgba::white());
    }
}
