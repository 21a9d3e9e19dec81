//! Sticker glyph resolution and drawing.
//!
//! Glyphs are looked up across fontdb faces, preferred families first.
//! Color bitmap strikes (PNG, as used by most color emoji fonts) are drawn as
//! images; everything else is filled from its outline. The fonts bundled
//! with egui are searched last, and characters no face provides fall back
//! to a placeholder ring.

use crate::renderer::{RenderConfig, RenderResult, RendererError};
use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use kurbo::Point;
use std::collections::HashMap;
use std::path::Path;
use stickerpad_core::Rgba;
use tiny_skia::{
    FillRule, FilterQuality, Paint, PathBuilder, Pixmap, PixmapPaint, Stroke, Transform,
};

/// Code points that select a presentation or join sequences; never drawn.
fn is_invisible(c: char) -> bool {
    matches!(c, '\u{FE0E}' | '\u{FE0F}' | '\u{200D}')
}

/// Newtype to let ttf-parser emit outlines into a tiny-skia path.
struct PathSink(PathBuilder);

impl ttf_parser::OutlineBuilder for PathSink {
    fn move_to(&mut self, x: f32, y: f32) {
        self.0.move_to(x, y);
    }
    fn line_to(&mut self, x: f32, y: f32) {
        self.0.line_to(x, y);
    }
    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.0.quad_to(x1, y1, x, y);
    }
    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.0.cubic_to(x1, y1, x2, y2, x, y);
    }
    fn close(&mut self) {
        self.0.close();
    }
}

/// Decoded color bitmap for one glyph.
#[derive(Debug, Clone)]
struct RasterGlyph {
    pixmap: Pixmap,
    /// Left offset in bitmap pixels.
    x: f32,
    /// Bottom offset in bitmap pixels (y-up).
    y: f32,
    pixels_per_em: f32,
}

/// Everything needed to draw one character, in font units.
#[derive(Debug, Clone)]
struct PreparedGlyph {
    units_per_em: f32,
    advance: f32,
    /// Vertical center of the em box (ascender + descender) / 2.
    center_y: f32,
    outline: Option<tiny_skia::Path>,
    raster: Option<RasterGlyph>,
}

impl PreparedGlyph {
    fn is_drawable(&self) -> bool {
        self.outline.is_some() || self.raster.is_some()
    }
}

fn prepare_glyph(data: &[u8], index: u32, c: char) -> Option<PreparedGlyph> {
    let face = ttf_parser::Face::parse(data, index).ok()?;
    let glyph_id = face.glyph_index(c)?;
    let units_per_em = face.units_per_em() as f32;

    let raster = face
        .glyph_raster_image(glyph_id, u16::MAX)
        .filter(|image| image.format == ttf_parser::RasterImageFormat::PNG)
        .and_then(|image| match Pixmap::decode_png(image.data) {
            Ok(pixmap) => Some(RasterGlyph {
                pixmap,
                x: image.x as f32,
                y: image.y as f32,
                pixels_per_em: image.pixels_per_em.max(1) as f32,
            }),
            Err(err) => {
                log::warn!("failed to decode bitmap glyph for {c:?}: {err}");
                None
            }
        });

    let mut sink = PathSink(PathBuilder::new());
    let outline = face
        .outline_glyph(glyph_id, &mut sink)
        .and_then(|_| sink.0.finish());

    let prepared = PreparedGlyph {
        units_per_em,
        advance: face
            .glyph_hor_advance(glyph_id)
            .map(f32::from)
            .unwrap_or(units_per_em),
        center_y: (face.ascender() as f32 + face.descender() as f32) / 2.0,
        outline,
        raster,
    };
    prepared.is_drawable().then_some(prepared)
}

/// Font database plus per-character glyph cache.
pub struct GlyphCache {
    db: Database,
    preferred: Vec<fontdb::ID>,
    glyphs: HashMap<char, Option<PreparedGlyph>>,
}

impl std::fmt::Debug for GlyphCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlyphCache")
            .field("faces", &self.db.len())
            .field("preferred", &self.preferred.len())
            .field("cached", &self.glyphs.len())
            .finish()
    }
}

impl GlyphCache {
    /// Build a cache from configuration. Font files that fail to load are
    /// logged and skipped.
    pub fn new(config: &RenderConfig) -> Self {
        let mut cache = Self {
            db: Database::new(),
            preferred: Vec::new(),
            glyphs: HashMap::new(),
        };

        for path in &config.extra_font_files {
            if let Err(err) = cache.load_font_file(path) {
                log::warn!("{err}");
            }
        }
        if config.load_system_fonts {
            cache.db.load_system_fonts();
        }
        if config.bundled_fonts {
            cache.load_font_data(epaint_default_fonts::NOTO_EMOJI_REGULAR.to_vec());
            cache.load_font_data(epaint_default_fonts::HACK_REGULAR.to_vec());
        }
        log::info!("glyph cache ready with {} font faces", cache.db.len());

        cache.set_preferred_families(&config.preferred_families);
        cache
    }

    pub fn load_font_file(&mut self, path: &Path) -> RenderResult<()> {
        self.db
            .load_font_file(path)
            .map_err(|source| RendererError::FontLoad {
                path: path.to_path_buf(),
                source,
            })?;
        self.glyphs.clear();
        Ok(())
    }

    /// Register an in-memory font file (TTF, OTF or collection).
    pub fn load_font_data(&mut self, data: Vec<u8>) {
        self.db.load_font_data(data);
        self.glyphs.clear();
    }

    /// Families searched before any other face, in order.
    pub fn set_preferred_families(&mut self, families: &[String]) {
        self.preferred.clear();
        for name in families {
            let family = [Family::Name(name)];
            let query = Query {
                families: &family,
                weight: Weight::NORMAL,
                stretch: Stretch::Normal,
                style: Style::Normal,
            };
            match self.db.query(&query) {
                Some(id) if !self.preferred.contains(&id) => self.preferred.push(id),
                Some(_) => {}
                None => log::debug!("preferred font family {name:?} not installed"),
            }
        }
        self.glyphs.clear();
    }

    pub fn face_count(&self) -> usize {
        self.db.len()
    }

    /// Whether some face can draw `c`.
    pub fn has_glyph(&mut self, c: char) -> bool {
        self.prepare(c);
        matches!(self.glyphs.get(&c), Some(Some(_)))
    }

    fn prepare(&mut self, c: char) {
        if self.glyphs.contains_key(&c) {
            return;
        }

        let others = self
            .db
            .faces()
            .map(|info| info.id)
            .filter(|id| !self.preferred.contains(id));
        let candidates: Vec<fontdb::ID> = self.preferred.iter().copied().chain(others).collect();

        let prepared = candidates.into_iter().find_map(|id| {
            self.db
                .with_face_data(id, |data, index| prepare_glyph(data, index, c))
                .flatten()
        });
        if prepared.is_none() {
            log::debug!("no font provides {c:?}");
        }
        self.glyphs.insert(c, prepared);
    }

    /// Draw `text` centered on `anchor`, rotated by `rotation` radians, then
    /// mapped through `base`.
    #[allow(clippy::too_many_arguments)]
    pub fn draw(
        &mut self,
        pixmap: &mut Pixmap,
        base: Transform,
        text: &str,
        anchor: Point,
        size: f64,
        rotation: f64,
        color: Rgba,
        opacity: f64,
    ) {
        let chars: Vec<char> = text.chars().filter(|c| !is_invisible(*c)).collect();
        if chars.is_empty() {
            return;
        }
        for c in &chars {
            self.prepare(*c);
        }

        let size = size as f32;
        let opacity = opacity.clamp(0.0, 1.0) as f32;
        let placed = base
            .pre_concat(Transform::from_translate(anchor.x as f32, anchor.y as f32))
            .pre_concat(Transform::from_rotate(rotation.to_degrees() as f32));

        let glyphs: Vec<Option<&PreparedGlyph>> = chars
            .iter()
            .map(|c| self.glyphs.get(c).and_then(Option::as_ref))
            .collect();

        let total_width: f32 = glyphs
            .iter()
            .map(|glyph| match glyph {
                Some(g) => g.advance * size / g.units_per_em,
                None => size,
            })
            .sum();

        let mut pen_x = -total_width / 2.0;
        for glyph in glyphs {
            match glyph {
                Some(glyph) => {
                    draw_prepared(pixmap, placed, glyph, pen_x, size, color, opacity);
                    pen_x += glyph.advance * size / glyph.units_per_em;
                }
                None => {
                    draw_placeholder(pixmap, placed, pen_x + size / 2.0, size, color, opacity);
                    pen_x += size;
                }
            }
        }
    }
}

fn paint_for(color: Rgba, opacity: f32) -> Paint<'static> {
    let mut paint = Paint::default();
    let alpha = (color.a as f32 * opacity).round().clamp(0.0, 255.0) as u8;
    paint.set_color_rgba8(color.r, color.g, color.b, alpha);
    paint.anti_alias = true;
    paint
}

fn draw_prepared(
    pixmap: &mut Pixmap,
    placed: Transform,
    glyph: &PreparedGlyph,
    pen_x: f32,
    size: f32,
    color: Rgba,
    opacity: f32,
) {
    let scale = size / glyph.units_per_em;

    if let Some(raster) = &glyph.raster {
        let px = size / raster.pixels_per_em;
        let font_px = glyph.units_per_em / raster.pixels_per_em;
        let top_units = (raster.y + raster.pixmap.height() as f32) * font_px;
        let left = pen_x + raster.x * px;
        let top = -(top_units - glyph.center_y) * scale;

        let transform = placed.pre_concat(Transform::from_row(px, 0.0, 0.0, px, left, top));
        let paint = PixmapPaint {
            opacity,
            quality: FilterQuality::Bilinear,
            ..PixmapPaint::default()
        };
        pixmap.draw_pixmap(0, 0, raster.pixmap.as_ref(), &paint, transform, None);
        return;
    }

    if let Some(outline) = &glyph.outline {
        // Font units are y-up; flip around the em box center.
        let transform = placed.pre_concat(Transform::from_row(
            scale,
            0.0,
            0.0,
            -scale,
            pen_x,
            glyph.center_y * scale,
        ));
        pixmap.fill_path(
            outline,
            &paint_for(color, opacity),
            FillRule::Winding,
            transform,
            None,
        );
    }
}

fn draw_placeholder(
    pixmap: &mut Pixmap,
    placed: Transform,
    center_x: f32,
    size: f32,
    color: Rgba,
    opacity: f32,
) {
    let Some(ring) = PathBuilder::from_circle(center_x, 0.0, size * 0.4) else {
        return;
    };
    let stroke = Stroke {
        width: (size / 16.0).max(1.0),
        ..Stroke::default()
    };
    pixmap.stroke_path(&ring, &paint_for(color, opacity), &stroke, placed, None);
}
