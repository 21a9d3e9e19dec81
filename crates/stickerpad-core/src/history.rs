//! Undo/redo over the display list.

use crate::display_list::DisplayList;
use crate::drawable::Drawable;
use thiserror::Error;

/// Non-fatal statuses reported by history operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HistoryError {
    #[error("nothing to undo")]
    EmptyHistory,
    #[error("nothing to redo")]
    EmptyRedo,
}

/// Owns the display list and the redo buffer.
///
/// A drawable is in exactly one of the two at any time. The redo buffer only
/// ever holds drawables removed by [`History::undo`], most recent last.
#[derive(Debug, Clone, Default)]
pub struct History {
    display_list: DisplayList,
    redo_stack: Vec<Drawable>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn display_list(&self) -> &DisplayList {
        &self.display_list
    }

    /// Append a new drawable. Any redo history is dropped.
    pub fn commit(&mut self, drawable: Drawable) {
        log::debug!("commit {} {}", drawable.kind(), drawable.id());
        self.display_list.push(drawable);
        self.redo_stack.clear();
    }

    /// Move the top drawable into the redo buffer.
    pub fn undo(&mut self) -> Result<(), HistoryError> {
        let drawable = self.display_list.pop().ok_or(HistoryError::EmptyHistory)?;
        log::debug!("undo {} {}", drawable.kind(), drawable.id());
        self.redo_stack.push(drawable);
        Ok(())
    }

    /// Restore the most recently undone drawable.
    pub fn redo(&mut self) -> Result<(), HistoryError> {
        let drawable = self.redo_stack.pop().ok_or(HistoryError::EmptyRedo)?;
        log::debug!("redo {} {}", drawable.kind(), drawable.id());
        self.display_list.push(drawable);
        Ok(())
    }

    /// Drop all committed and undone drawables.
    pub fn clear(&mut self) {
        self.display_list.clear();
        self.redo_stack.clear();
    }

    /// Drop redo history without committing anything.
    pub fn invalidate_redo(&mut self) {
        if !self.redo_stack.is_empty() {
            log::debug!("dropping {} redo entries", self.redo_stack.len());
            self.redo_stack.clear();
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.display_list.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }
}
