//! tiny-skia based renderer implementation.

use crate::glyphs::GlyphCache;
use crate::renderer::{RenderConfig, RenderContext, RenderResult, Renderer, check_size};
use kurbo::Point;
use stickerpad_core::{Rgba, Surface, render_scene};
use tiny_skia::{Color, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform};

fn paint(color: Rgba) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    paint.anti_alias = true;
    paint
}

/// [`Surface`] over a pixmap, with every coordinate mapped through `transform`.
pub struct PixmapSurface<'a> {
    pixmap: &'a mut Pixmap,
    glyphs: &'a mut GlyphCache,
    transform: Transform,
    background: Rgba,
}

impl<'a> PixmapSurface<'a> {
    pub fn new(pixmap: &'a mut Pixmap, glyphs: &'a mut GlyphCache, background: Rgba) -> Self {
        Self {
            pixmap,
            glyphs,
            transform: Transform::identity(),
            background,
        }
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.transform = Transform::from_scale(scale as f32, scale as f32);
        self
    }
}

impl Surface for PixmapSurface<'_> {
    fn clear(&mut self) {
        let bg = self.background;
        self.pixmap.fill(Color::from_rgba8(bg.r, bg.g, bg.b, bg.a));
    }

    fn stroke_polyline(&mut self, points: &[Point], width: f64, color: Rgba) {
        let [first, rest @ ..] = points else {
            return;
        };
        if rest.is_empty() {
            return;
        }

        let mut builder = PathBuilder::new();
        builder.move_to(first.x as f32, first.y as f32);
        for point in rest {
            builder.line_to(point.x as f32, point.y as f32);
        }
        let Some(path) = builder.finish() else {
            return;
        };

        let stroke = Stroke {
            width: width as f32,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };
        self.pixmap
            .stroke_path(&path, &paint(color), &stroke, self.transform, None);
    }

    fn draw_glyph(
        &mut self,
        glyph: &str,
        anchor: Point,
        size: f64,
        rotation: f64,
        color: Rgba,
        opacity: f64,
    ) {
        self.glyphs.draw(
            self.pixmap,
            self.transform,
            glyph,
            anchor,
            size,
            rotation,
            color,
            opacity,
        );
    }

    fn outline_circle(&mut self, center: Point, radius: f64, width: f64, color: Rgba) {
        let Some(circle) = PathBuilder::from_circle(center.x as f32, center.y as f32, radius as f32)
        else {
            return;
        };
        let stroke = Stroke {
            width: width as f32,
            ..Stroke::default()
        };
        self.pixmap
            .stroke_path(&circle, &paint(color), &stroke, self.transform, None);
    }
}

/// Renders session frames into an owned pixmap.
pub struct SkiaRenderer {
    pixmap: Pixmap,
    glyphs: GlyphCache,
    config: RenderConfig,
}

impl std::fmt::Debug for SkiaRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SkiaRenderer")
            .field("size", &(self.pixmap.width(), self.pixmap.height()))
            .field("glyphs", &self.glyphs)
            .finish()
    }
}

impl SkiaRenderer {
    pub fn new(config: RenderConfig, width: u32, height: u32) -> RenderResult<Self> {
        let glyphs = GlyphCache::new(&config);
        Self::with_glyphs(config, glyphs, width, height)
    }

    pub fn with_glyphs(
        config: RenderConfig,
        glyphs: GlyphCache,
        width: u32,
        height: u32,
    ) -> RenderResult<Self> {
        Ok(Self {
            pixmap: new_pixmap(width, height)?,
            glyphs,
            config,
        })
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn resize(&mut self, width: u32, height: u32) -> RenderResult<()> {
        if (width, height) != (self.pixmap.width(), self.pixmap.height()) {
            self.pixmap = new_pixmap(width, height)?;
        }
        Ok(())
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Premultiplied RGBA8 bytes of the last rendered frame.
    pub fn data(&self) -> &[u8] {
        self.pixmap.data()
    }

    /// Render into a fresh pixmap of the given size instead of the owned one.
    pub(crate) fn render_offscreen(
        &mut self,
        ctx: &RenderContext<'_>,
        width: u32,
        height: u32,
    ) -> RenderResult<Pixmap> {
        let mut pixmap = new_pixmap(width, height)?;
        draw_frame(&mut pixmap, &mut self.glyphs, ctx);
        Ok(pixmap)
    }
}

impl Renderer for SkiaRenderer {
    fn render(&mut self, ctx: &RenderContext<'_>) {
        draw_frame(&mut self.pixmap, &mut self.glyphs, ctx);
    }

    fn size(&self) -> (u32, u32) {
        (self.pixmap.width(), self.pixmap.height())
    }
}

pub(crate) fn new_pixmap(width: u32, height: u32) -> RenderResult<Pixmap> {
    check_size(width, height)?;
    Pixmap::new(width, height).ok_or(crate::RendererError::InvalidSize { width, height })
}

fn draw_frame(pixmap: &mut Pixmap, glyphs: &mut GlyphCache, ctx: &RenderContext<'_>) {
    let mut surface =
        PixmapSurface::new(pixmap, glyphs, ctx.background_color).with_scale(ctx.scale_factor);
    render_scene(ctx.frame, &mut surface);
}
