//! Ordered storage of committed drawables.

use crate::drawable::Drawable;
use kurbo::Rect;

/// Committed drawables in z-order (index 0 paints first).
///
/// Only appended to or popped from the tail; entries are never reordered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayList {
    items: Vec<Drawable>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, drawable: Drawable) {
        self.items.push(drawable);
    }

    pub fn pop(&mut self) -> Option<Drawable> {
        self.items.pop()
    }

    pub fn last(&self) -> Option<&Drawable> {
        self.items.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Drawable> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Drawable] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Union of all drawable bounds, or `None` when empty.
    pub fn bounds(&self) -> Option<Rect> {
        self.items
            .iter()
            .map(Drawable::bounds)
            .reduce(|acc, bounds| acc.union(bounds))
    }
}

impl<'a> IntoIterator for &'a DisplayList {
    type Item = &'a Drawable;
    type IntoIter = std::slice::Iter<'a, Drawable>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
