//! Stickerpad Application
//!
//! Desktop shell: toolbar, pointer forwarding, shortcuts and PNG export
//! around a single sketch session.

mod app;
mod config;
mod shortcuts;
mod ui;

pub use app::StickerpadApp;
pub use config::{AppConfig, CONFIG_ENV, ConfigError};
pub use shortcuts::{Shortcut, ShortcutRegistry};
pub use ui::{UiAction, UiState, render_ui};
