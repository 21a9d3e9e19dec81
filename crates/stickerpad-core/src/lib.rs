//! Stickerpad Core Library
//!
//! Platform-agnostic model for the sticker sketch surface: drawables, the
//! display list with undo/redo, the pointer input session and the render
//! contract backends implement.

pub mod display_list;
pub mod drawable;
pub mod events;
pub mod history;
pub mod preview;
pub mod render;
pub mod session;
pub mod tools;

pub use display_list::DisplayList;
pub use drawable::{Drawable, DrawableId, DrawableTrait, Rgba, StickerPlacement, Stroke};
pub use events::{EventBus, SessionEvent, SubscriptionId};
pub use history::{History, HistoryError};
pub use preview::Preview;
pub use render::{Frame, Surface, render_scene};
pub use session::{GestureState, Session};
pub use tools::{RotationSource, ToolKind, ToolSettings};
