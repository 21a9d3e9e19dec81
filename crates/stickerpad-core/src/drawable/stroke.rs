//! Freehand marker stroke.

use super::{DrawableId, DrawableTrait, Rgba};
use crate::render::Surface;
use kurbo::{Point, Rect};
use uuid::Uuid;

/// A freehand stroke (series of points drawn with one width and color).
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    pub(crate) id: DrawableId,
    /// Points in drawing order. Never empty.
    points: Vec<Point>,
    /// Line width in surface pixels.
    pub width: f64,
    pub color: Rgba,
}

impl Stroke {
    /// Width used when a non-positive or non-finite width is requested.
    pub const MIN_WIDTH: f64 = 0.5;

    /// Start a stroke at `start`.
    pub fn new(start: Point, width: f64, color: Rgba) -> Self {
        Self {
            id: Uuid::new_v4(),
            points: vec![start],
            width: sanitize_width(width),
            color,
        }
    }

    /// Create from existing points. Returns `None` for an empty point list.
    pub fn from_points(points: Vec<Point>, width: f64, color: Rgba) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        Some(Self {
            id: Uuid::new_v4(),
            points,
            width: sanitize_width(width),
            color,
        })
    }

    /// Add a point to the path.
    pub fn add_point(&mut self, point: Point) {
        self.points.push(point);
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Get the number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Strokes always hold their seed point.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether this stroke produces any pixels.
    pub fn is_visible(&self) -> bool {
        self.points.len() >= 2
    }
}

fn sanitize_width(width: f64) -> f64 {
    if width.is_finite() && width > 0.0 {
        width
    } else {
        Stroke::MIN_WIDTH
    }
}

impl DrawableTrait for Stroke {
    fn id(&self) -> DrawableId {
        self.id
    }

    fn bounds(&self) -> Rect {
        let mut min_x = f64::MAX;
        let mut min_y = f64::MAX;
        let mut max_x = f64::MIN;
        let mut max_y = f64::MIN;

        for point in &self.points {
            min_x = min_x.min(point.x);
            min_y = min_y.min(point.y);
            max_x = max_x.max(point.x);
            max_y = max_y.max(point.y);
        }

        let half = self.width / 2.0;
        Rect::new(min_x, min_y, max_x, max_y).inflate(half, half)
    }

    fn extend(&mut self, point: Point) {
        self.add_point(point);
    }

    fn render(&self, surface: &mut dyn Surface) {
        if !self.is_visible() {
            return;
        }
        surface.stroke_polyline(&self.points, self.width, self.color);
    }
}
