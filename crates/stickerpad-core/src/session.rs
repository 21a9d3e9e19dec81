//! Input session: turns pointer events into drawables and history commits.

use crate::display_list::DisplayList;
use crate::drawable::{Drawable, Rgba, StickerPlacement, Stroke};
use crate::events::{EventBus, SessionEvent, SubscriptionId};
use crate::history::{History, HistoryError};
use crate::preview::Preview;
use crate::render::Frame;
use crate::tools::{RotationSource, ToolKind, ToolSettings};
use kurbo::Point;
use std::sync::mpsc;

/// Gesture state of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureState {
    Idle,
    /// A brush stroke is in progress.
    Drawing,
    /// A sticker is being positioned.
    Placing,
}

/// All mutable sketch state: history, tool selection, the in-progress
/// drawable and the preview.
#[derive(Debug)]
pub struct Session {
    history: History,
    tool: ToolKind,
    settings: ToolSettings,
    /// Drawable owned by the current gesture, never in the display list.
    active: Option<Drawable>,
    /// Only present while no gesture is active.
    preview: Option<Preview>,
    /// Rotation applied to the next sticker placement.
    pending_rotation: u16,
    rotations: RotationSource,
    events: EventBus,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self::with_rotation_source(RotationSource::from_clock())
    }

    /// Session with a caller-provided rotation sequence.
    pub fn with_rotation_source(rotations: RotationSource) -> Self {
        Self {
            history: History::new(),
            tool: ToolKind::None,
            settings: ToolSettings::default(),
            active: None,
            preview: None,
            pending_rotation: 0,
            rotations,
            events: EventBus::new(),
        }
    }

    // --- Queries ---

    pub fn state(&self) -> GestureState {
        match &self.active {
            None => GestureState::Idle,
            Some(Drawable::Stroke(_)) => GestureState::Drawing,
            Some(Drawable::Sticker(_)) => GestureState::Placing,
        }
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    pub fn settings(&self) -> &ToolSettings {
        &self.settings
    }

    pub fn pending_rotation(&self) -> u16 {
        self.pending_rotation
    }

    pub fn display_list(&self) -> &DisplayList {
        self.history.display_list()
    }

    pub fn active(&self) -> Option<&Drawable> {
        self.active.as_ref()
    }

    pub fn preview(&self) -> Option<&Preview> {
        self.preview.as_ref()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Everything the renderer needs for the current state.
    pub fn frame(&self) -> Frame<'_> {
        Frame {
            display_list: self.history.display_list(),
            active: self.active.as_ref(),
            preview: if self.active.is_none() {
                self.preview.as_ref()
            } else {
                None
            },
        }
    }

    /// Copy of the committed content, independent of later mutations.
    pub fn export_snapshot(&self) -> DisplayList {
        self.history.display_list().clone()
    }

    // --- Observers ---

    pub fn subscribe(&mut self, handler: impl FnMut(&SessionEvent) + 'static) -> SubscriptionId {
        self.events.subscribe(handler)
    }

    pub fn subscribe_channel(&mut self) -> (SubscriptionId, mpsc::Receiver<SessionEvent>) {
        self.events.subscribe_channel()
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    fn content_changed(&mut self) {
        self.events.emit(SessionEvent::ContentChanged);
    }

    // --- Tool selection ---

    pub fn select_brush(&mut self, width: f64, color: Rgba) {
        self.settings.brush_width = if width.is_finite() && width > 0.0 {
            width
        } else {
            log::warn!("ignoring invalid brush width {width}");
            self.settings.brush_width
        };
        self.settings.brush_color = color;
        self.set_tool(ToolKind::Brush);
    }

    pub fn select_sticker(&mut self, glyph: &str) {
        let glyph = glyph.trim();
        if glyph.is_empty() {
            log::warn!("ignoring empty sticker glyph");
        } else {
            self.settings.sticker_glyph = glyph.to_string();
        }
        self.set_tool(ToolKind::Sticker);
    }

    pub fn set_sticker_size(&mut self, size: f64) {
        if size.is_finite() && size > 0.0 {
            self.settings.sticker_size = size;
        }
    }

    pub fn clear_tool_selection(&mut self) {
        self.set_tool(ToolKind::None);
    }

    fn set_tool(&mut self, tool: ToolKind) {
        log::debug!("tool {:?} -> {:?}", self.tool, tool);
        self.tool = tool;
        self.events.emit(SessionEvent::ToolChanged(tool));
        if self.preview.take().is_some() {
            self.content_changed();
        }
    }

    // --- Pointer input ---

    pub fn pointer_down(&mut self, point: Point) {
        if self.active.is_some() {
            log::debug!("pointer down during gesture; ending current gesture");
            self.finish_gesture(None);
        }

        let drawable: Drawable = match self.tool {
            ToolKind::None => return,
            ToolKind::Brush => Stroke::new(
                point,
                self.settings.brush_width,
                self.settings.brush_color,
            )
            .into(),
            ToolKind::Sticker => StickerPlacement::with_size(
                point,
                self.settings.sticker_glyph.clone(),
                self.pending_rotation,
                self.settings.sticker_size,
            )
            .into(),
        };

        log::debug!("begin {} at ({:.1}, {:.1})", drawable.kind(), point.x, point.y);
        self.preview = None;
        self.history.invalidate_redo();
        self.active = Some(drawable);
        self.content_changed();
    }

    pub fn pointer_move(&mut self, point: Point) {
        if let Some(active) = &mut self.active {
            active.extend(point);
            self.content_changed();
            return;
        }

        match self.tool {
            ToolKind::None => {}
            ToolKind::Brush => {
                let preview = Preview::brush(
                    point,
                    self.settings.brush_width,
                    self.settings.brush_color,
                );
                self.preview = Some(preview);
                self.content_changed();
            }
            ToolKind::Sticker => {
                match self.preview.as_mut() {
                    Some(preview) if matches!(preview, Preview::StickerGhost { .. }) => {
                        preview.move_to(point);
                    }
                    _ => {
                        self.pending_rotation = self.rotations.next_degrees();
                        self.preview = Some(Preview::sticker(
                            point,
                            self.settings.sticker_glyph.clone(),
                            self.pending_rotation,
                            self.settings.sticker_size,
                        ));
                    }
                }
                self.content_changed();
            }
        }
    }

    /// No-op when no gesture is active.
    pub fn pointer_up(&mut self, point: Point) {
        if self.active.is_some() {
            self.finish_gesture(Some(point));
        }
    }

    /// Pointer left the surface: commits any gesture and drops the preview.
    pub fn pointer_leave(&mut self) {
        if self.active.is_some() {
            self.finish_gesture(None);
        } else if self.preview.take().is_some() {
            self.content_changed();
        }
    }

    /// Commit the active drawable. A sticker's anchor is finalized at
    /// `release` when given; strokes keep the points already recorded.
    fn finish_gesture(&mut self, release: Option<Point>) {
        let Some(mut drawable) = self.active.take() else {
            return;
        };

        if let Drawable::Sticker(sticker) = &mut drawable {
            if let Some(point) = release {
                sticker.anchor = point;
            }
            sticker.set_rotation_degrees(self.pending_rotation);
        }

        self.history.commit(drawable);
        self.content_changed();
    }

    // --- Commands ---

    pub fn undo(&mut self) -> Result<(), HistoryError> {
        self.history.undo()?;
        self.content_changed();
        Ok(())
    }

    pub fn redo(&mut self) -> Result<(), HistoryError> {
        self.history.redo()?;
        self.content_changed();
        Ok(())
    }

    /// Drop all content, redo history, the active drawable and the preview.
    /// Tool selection is kept.
    pub fn clear(&mut self) {
        if self.active.take().is_some() {
            log::debug!("clear abandoned active gesture");
        }
        self.preview = None;
        self.history.clear();
        self.content_changed();
    }

    /// Commit a drawable built outside the pointer flow.
    pub fn commit(&mut self, drawable: Drawable) {
        self.history.commit(drawable);
        self.content_changed();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::recording::{DrawOp, RecordingSurface};
    use crate::render::render_scene;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn session() -> Session {
        Session::with_rotation_source(RotationSource::seeded(1))
    }

    fn draw_stroke(session: &mut Session, points: &[(f64, f64)]) {
        let (first, rest) = points.split_first().unwrap();
        session.pointer_down(Point::new(first.0, first.1));
        for (x, y) in rest {
            session.pointer_move(Point::new(*x, *y));
        }
        let last = points.last().unwrap();
        session.pointer_up(Point::new(last.0, last.1));
    }

    #[test]
    fn test_brush_gesture_commits_stroke() {
        let mut session = session();
        session.select_brush(4.0, Rgba::opaque(255, 0, 0));
        session.pointer_down(Point::new(0.0, 0.0));
        assert_eq!(session.state(), GestureState::Drawing);
        assert!(session.display_list().is_empty());

        session.pointer_move(Point::new(5.0, 5.0));
        session.pointer_move(Point::new(10.0, 10.0));
        session.pointer_up(Point::new(10.0, 10.0));

        assert_eq!(session.state(), GestureState::Idle);
        let stroke = session.display_list().last().and_then(Drawable::as_stroke).unwrap();
        assert_eq!(stroke.len(), 3);
        assert_eq!(stroke.width, 4.0);
        assert_eq!(stroke.color, Rgba::opaque(255, 0, 0));
    }

    #[test]
    fn test_pointer_down_without_tool_is_ignored() {
        let mut session = session();
        session.pointer_down(Point::new(1.0, 1.0));
        assert_eq!(session.state(), GestureState::Idle);
        session.pointer_up(Point::new(1.0, 1.0));
        assert!(session.display_list().is_empty());
    }

    #[test]
    fn test_pointer_up_without_gesture_is_noop() {
        let mut session = session();
        session.select_brush(2.0, Rgba::black());
        let (_, rx) = session.subscribe_channel();
        session.pointer_up(Point::new(3.0, 3.0));
        assert!(session.display_list().is_empty());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_single_click_stroke_is_stored() {
        let mut session = session();
        session.select_brush(2.0, Rgba::black());
        session.pointer_down(Point::new(1.0, 1.0));
        session.pointer_up(Point::new(1.0, 1.0));
        assert_eq!(session.display_list().len(), 1);
    }

    #[test]
    fn test_pointer_leave_commits_stroke() {
        let mut session = session();
        session.select_brush(2.0, Rgba::black());
        session.pointer_down(Point::new(0.0, 0.0));
        session.pointer_move(Point::new(4.0, 4.0));
        session.pointer_leave();
        assert_eq!(session.state(), GestureState::Idle);
        assert_eq!(session.display_list().len(), 1);
    }

    #[test]
    fn test_sticker_placement_uses_pending_rotation() {
        let mut session = session();
        session.select_sticker("🌮");
        session.pointer_move(Point::new(3.0, 3.0));
        let pending = session.pending_rotation();
        assert!(matches!(
            session.preview(),
            Some(Preview::StickerGhost { rotation, .. }) if *rotation == pending
        ));

        session.pointer_down(Point::new(3.0, 3.0));
        assert_eq!(session.state(), GestureState::Placing);
        assert!(session.preview().is_none());

        session.pointer_move(Point::new(8.0, 9.0));
        session.pointer_up(Point::new(10.0, 12.0));

        let sticker = session.display_list().last().and_then(Drawable::as_sticker).unwrap();
        assert_eq!(sticker.anchor, Point::new(10.0, 12.0));
        assert_eq!(sticker.glyph, "🌮");
        assert_eq!(sticker.rotation_degrees(), pending);
    }

    #[test]
    fn test_repeated_clicks_keep_previewed_rotation() {
        let mut session = session();
        session.select_sticker("⭐");
        session.pointer_move(Point::new(3.0, 3.0));
        let pending = session.pending_rotation();

        for _ in 0..2 {
            session.pointer_down(Point::new(3.0, 3.0));
            session.pointer_up(Point::new(3.0, 3.0));
        }

        let rotations: Vec<u16> = session
            .display_list()
            .iter()
            .filter_map(Drawable::as_sticker)
            .map(StickerPlacement::rotation_degrees)
            .collect();
        assert_eq!(rotations, vec![pending, pending]);
        assert_eq!(session.pending_rotation(), pending);

        // A fresh ghost picks the next rotation.
        session.pointer_move(Point::new(4.0, 4.0));
        let ghost = match session.preview() {
            Some(Preview::StickerGhost { rotation, .. }) => *rotation,
            other => panic!("expected sticker ghost, got {other:?}"),
        };
        assert_eq!(ghost, session.pending_rotation());
    }

    #[test]
    fn test_sticker_without_preview_uses_default_rotation() {
        let mut session = session();
        session.select_sticker("⭐");
        session.pointer_down(Point::new(1.0, 1.0));
        session.pointer_up(Point::new(1.0, 1.0));
        let sticker = session.display_list().last().and_then(Drawable::as_sticker).unwrap();
        assert_eq!(sticker.rotation_degrees(), 0);
    }

    #[test]
    fn test_pointer_leave_commits_placement_at_last_anchor() {
        let mut session = session();
        session.select_sticker("⭐");
        session.pointer_down(Point::new(1.0, 1.0));
        session.pointer_move(Point::new(6.0, 7.0));
        session.pointer_leave();
        let sticker = session.display_list().last().and_then(Drawable::as_sticker).unwrap();
        assert_eq!(sticker.anchor, Point::new(6.0, 7.0));
    }

    #[test]
    fn test_preview_follows_pointer_and_leave_removes_it() {
        let mut session = session();
        session.select_sticker("⭐");
        session.pointer_move(Point::new(1.0, 1.0));
        let rotation = session.pending_rotation();
        session.pointer_move(Point::new(2.0, 2.0));

        assert_eq!(session.preview().map(Preview::position), Some(Point::new(2.0, 2.0)));
        assert_eq!(session.pending_rotation(), rotation);

        session.pointer_leave();
        assert!(session.preview().is_none());
        assert!(session.display_list().is_empty());
    }

    #[test]
    fn test_brush_preview_outline() {
        let mut session = session();
        session.select_brush(8.0, Rgba::black());
        session.pointer_move(Point::new(5.0, 5.0));
        assert_eq!(
            session.preview(),
            Some(&Preview::brush(Point::new(5.0, 5.0), 8.0, Rgba::black()))
        );
    }

    #[test]
    fn test_preview_suppressed_while_drawing() {
        let mut session = session();
        session.select_brush(2.0, Rgba::black());
        session.pointer_move(Point::new(1.0, 1.0));
        session.pointer_down(Point::new(1.0, 1.0));
        session.pointer_move(Point::new(2.0, 2.0));
        assert!(session.preview().is_none());
        assert!(session.frame().preview.is_none());
    }

    #[test]
    fn test_tool_change_removes_preview() {
        let mut session = session();
        session.select_sticker("⭐");
        session.pointer_move(Point::new(1.0, 1.0));
        assert!(session.preview().is_some());
        session.select_brush(2.0, Rgba::black());
        assert!(session.preview().is_none());
    }

    #[test]
    fn test_gesture_start_clears_redo() {
        let mut session = session();
        session.select_brush(2.0, Rgba::black());
        draw_stroke(&mut session, &[(0.0, 0.0), (1.0, 1.0)]);
        session.undo().unwrap();
        assert!(session.can_redo());

        session.pointer_down(Point::new(5.0, 5.0));
        assert!(!session.can_redo());
        assert!(session.display_list().is_empty());
    }

    #[test]
    fn test_pointer_down_mid_gesture_commits_previous() {
        let mut session = session();
        session.select_brush(2.0, Rgba::black());
        session.pointer_down(Point::new(0.0, 0.0));
        session.pointer_move(Point::new(1.0, 1.0));
        session.pointer_down(Point::new(10.0, 10.0));

        assert_eq!(session.display_list().len(), 1);
        assert_eq!(session.state(), GestureState::Drawing);
    }

    #[test]
    fn test_clear_discards_active_and_history() {
        let mut session = session();
        session.select_brush(2.0, Rgba::black());
        draw_stroke(&mut session, &[(0.0, 0.0), (1.0, 1.0)]);
        draw_stroke(&mut session, &[(2.0, 2.0), (3.0, 3.0)]);
        session.undo().unwrap();
        session.pointer_down(Point::new(4.0, 4.0));

        session.clear();

        assert!(session.display_list().is_empty());
        assert!(session.active().is_none());
        assert!(session.preview().is_none());
        assert_eq!(session.undo(), Err(HistoryError::EmptyHistory));
        assert_eq!(session.redo(), Err(HistoryError::EmptyRedo));
        assert_eq!(session.tool(), ToolKind::Brush);
    }

    #[test]
    fn test_z_order_preserved_across_undo_redo() {
        let mut session = session();
        session.select_brush(2.0, Rgba::black());
        draw_stroke(&mut session, &[(0.0, 0.0), (1.0, 1.0)]);
        session.select_sticker("⭐");
        session.pointer_down(Point::new(5.0, 5.0));
        session.pointer_up(Point::new(5.0, 5.0));
        session.select_brush(2.0, Rgba::black());
        draw_stroke(&mut session, &[(9.0, 9.0), (8.0, 8.0)]);

        let before: Vec<_> = session.display_list().iter().map(Drawable::id).collect();
        session.undo().unwrap();
        session.redo().unwrap();
        let after: Vec<_> = session.display_list().iter().map(Drawable::id).collect();
        assert_eq!(before, after);
        assert_eq!(session.display_list().as_slice()[1].kind(), "sticker");
    }

    #[test]
    fn test_events_emitted() {
        let mut session = session();
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        let id = session.subscribe(move |event| sink.borrow_mut().push(*event));

        session.select_brush(2.0, Rgba::black());
        draw_stroke(&mut session, &[(0.0, 0.0), (1.0, 1.0)]);
        session.undo().unwrap();
        let _ = session.undo();

        let recorded = events.borrow().clone();
        assert_eq!(recorded[0], SessionEvent::ToolChanged(ToolKind::Brush));
        // down, move, up, undo; the failed undo emits nothing
        assert_eq!(recorded[1..], [SessionEvent::ContentChanged; 4]);

        assert!(session.unsubscribe(id));
        session.clear();
        assert_eq!(events.borrow().len(), 5);
    }

    #[test]
    fn test_invalid_selection_inputs_degrade() {
        let mut session = session();
        session.select_brush(f64::NAN, Rgba::black());
        assert_eq!(session.settings().brush_width, ToolSettings::DEFAULT_BRUSH_WIDTH);
        session.select_sticker("   ");
        assert_eq!(session.settings().sticker_glyph, "⭐");
        assert_eq!(session.tool(), ToolKind::Sticker);
    }

    #[test]
    fn test_frame_renders_preview_last() {
        let mut session = session();
        session.select_brush(2.0, Rgba::black());
        draw_stroke(&mut session, &[(0.0, 0.0), (1.0, 1.0)]);
        session.select_sticker("⭐");
        session.pointer_move(Point::new(4.0, 4.0));

        let mut surface = RecordingSurface::default();
        render_scene(session.frame(), &mut surface);
        assert!(matches!(
            surface.ops.last(),
            Some(DrawOp::Glyph { opacity, .. }) if *opacity < 1.0
        ));
    }

    #[test]
    fn test_export_snapshot_excludes_transient_state() {
        let mut session = session();
        session.select_brush(2.0, Rgba::black());
        draw_stroke(&mut session, &[(0.0, 0.0), (1.0, 1.0)]);
        session.pointer_down(Point::new(5.0, 5.0));
        session.pointer_move(Point::new(6.0, 6.0));

        let snapshot = session.export_snapshot();
        assert_eq!(snapshot.len(), 1);

        session.pointer_up(Point::new(6.0, 6.0));
        assert_eq!(snapshot.len(), 1);
        assert_eq!(session.display_list().len(), 2);
    }

    #[test]
    fn test_scenario_commit_undo_redo_commit() {
        let mut session = session();
        session.commit(
            Stroke::from_points(
                vec![Point::new(0.0, 0.0), Point::new(10.0, 10.0)],
                2.0,
                Rgba::black(),
            )
            .unwrap()
            .into(),
        );
        session.undo().unwrap();
        session.redo().unwrap();
        session.commit(StickerPlacement::new(Point::new(5.0, 5.0), "⭐", 90).into());

        let kinds: Vec<_> = session.display_list().iter().map(Drawable::kind).collect();
        assert_eq!(kinds, vec!["stroke", "sticker"]);
        assert!(!session.can_redo());
    }
}
