//! Keyboard shortcut registry.

use crate::ui::UiAction;
use egui::{Context, Key, KeyboardShortcut, Modifiers};

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: Key,
    pub ctrl: bool,
    pub shift: bool,
    pub action: UiAction,
    pub description: &'static str,
}

impl Shortcut {
    pub fn new(
        key: Key,
        ctrl: bool,
        shift: bool,
        action: UiAction,
        description: &'static str,
    ) -> Self {
        Self {
            key,
            ctrl,
            shift,
            action,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+Z").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.key.name());
        parts.join("+")
    }

    fn keyboard_shortcut(&self) -> KeyboardShortcut {
        let mut modifiers = Modifiers::NONE;
        if self.ctrl {
            modifiers = modifiers | Modifiers::COMMAND;
        }
        if self.shift {
            modifiers = modifiers | Modifiers::SHIFT;
        }
        KeyboardShortcut::new(modifiers, self.key)
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// All shortcuts, most specific first.
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new(Key::Z, true, true, UiAction::Redo, "Redo"),
            Shortcut::new(Key::Z, true, false, UiAction::Undo, "Undo"),
            Shortcut::new(Key::Y, true, false, UiAction::Redo, "Redo"),
            Shortcut::new(Key::Escape, false, false, UiAction::ClearTool, "Deselect tool"),
        ]
    }

    /// Consume the first matching shortcut pressed this frame. Nothing is
    /// consumed while a text field has keyboard focus.
    pub fn poll(ctx: &Context) -> Option<UiAction> {
        if ctx.wants_keyboard_input() {
            return None;
        }
        let shortcuts = Self::all();
        ctx.input_mut(|input| {
            shortcuts
                .into_iter()
                .find(|shortcut| input.consume_shortcut(&shortcut.keyboard_shortcut()))
                .map(|shortcut| shortcut.action)
        })
    }

    /// Display text for the first shortcut bound to `action`.
    pub fn hint(action: &UiAction) -> Option<String> {
        Self::all()
            .into_iter()
            .find(|shortcut| &shortcut.action == action)
            .map(|shortcut| shortcut.format())
    }

    /// One line per shortcut, e.g. "Ctrl+Z  Undo".
    pub fn help_text() -> String {
        Self::all()
            .iter()
            .map(|shortcut| format!("{}  {}", shortcut.format(), shortcut.description))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
