//! Render contract between the core model and a drawing backend.
//!
//! The core never touches pixels. It replays the display list onto anything
//! implementing [`Surface`]; `stickerpad-render` provides the raster backend.

use crate::display_list::DisplayList;
use crate::drawable::{Drawable, Rgba};
use crate::preview::Preview;
use kurbo::Point;

/// A drawing target for drawables and previews.
pub trait Surface {
    /// Reset every pixel to the surface background.
    fn clear(&mut self);

    /// Stroke a connected polyline with round caps and joins.
    fn stroke_polyline(&mut self, points: &[Point], width: f64, color: Rgba);

    /// Draw `glyph` centered on `anchor`, rotated by `rotation` radians.
    fn draw_glyph(
        &mut self,
        glyph: &str,
        anchor: Point,
        size: f64,
        rotation: f64,
        color: Rgba,
        opacity: f64,
    );

    /// Stroke a circle outline.
    fn outline_circle(&mut self, center: Point, radius: f64, width: f64, color: Rgba);
}

/// Everything needed to draw one frame. Borrowed from the session.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub display_list: &'a DisplayList,
    pub active: Option<&'a Drawable>,
    pub preview: Option<&'a Preview>,
}

impl<'a> Frame<'a> {
    /// A frame of committed content only, as used for export.
    pub fn committed(display_list: &'a DisplayList) -> Self {
        Self {
            display_list,
            active: None,
            preview: None,
        }
    }
}

/// Replay a frame onto `surface`.
///
/// Clears, draws committed content in z-order, then the preview (only when no
/// gesture is active), then the active drawable on top.
pub fn render_scene(frame: Frame<'_>, surface: &mut dyn Surface) {
    surface.clear();

    for drawable in frame.display_list.iter() {
        drawable.render(surface);
    }

    if frame.active.is_none() {
        if let Some(preview) = frame.preview {
            preview.render(surface);
        }
    }

    if let Some(active) = frame.active {
        active.render(surface);
    }
}
