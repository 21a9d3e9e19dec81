//! Stickerpad Render Library
//!
//! CPU rasterization of sketch frames with tiny-skia, sticker glyph lookup
//! over installed fonts, and PNG export.

mod export;
mod glyphs;
mod renderer;
mod skia_impl;

pub use export::{encode_png, exceeds_export_area, export_png};
pub use glyphs::GlyphCache;
pub use renderer::{
    MAX_SURFACE_EDGE, RenderConfig, RenderContext, RenderResult, Renderer, RendererError,
};
pub use skia_impl::{PixmapSurface, SkiaRenderer};
