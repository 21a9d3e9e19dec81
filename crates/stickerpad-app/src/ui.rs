//! Toolbar UI built with egui.

use crate::shortcuts::ShortcutRegistry;
use egui::{Context, RichText};
use stickerpad_core::{Rgba, ToolKind};

/// Actions triggered by UI interactions.
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    Undo,
    Redo,
    /// Remove all content.
    Clear,
    ExportPng,
    SelectBrush { width: f64, color: Rgba },
    SelectSticker(String),
    /// Append a custom glyph to the palette and select it.
    AddSticker(String),
    ClearTool,
}

/// UI state mirrored from the session each frame, plus widget-local values.
#[derive(Debug, Clone)]
pub struct UiState {
    pub tool: ToolKind,
    pub brush_width: f64,
    pub brush_color: [u8; 3],
    pub thin_width: f64,
    pub thick_width: f64,
    pub stickers: Vec<String>,
    pub selected_sticker: String,
    pub custom_sticker: String,
    pub can_undo: bool,
    pub can_redo: bool,
    pub canvas_empty: bool,
}

impl UiState {
    pub fn new(config: &crate::AppConfig) -> Self {
        Self {
            tool: ToolKind::None,
            brush_width: config.thin_width,
            brush_color: [0, 0, 0],
            thin_width: config.thin_width,
            thick_width: config.thick_width,
            stickers: config.stickers.clone(),
            selected_sticker: config.stickers.first().cloned().unwrap_or_default(),
            custom_sticker: String::new(),
            can_undo: false,
            can_redo: false,
            canvas_empty: true,
        }
    }

    fn brush_action(&self, width: f64) -> UiAction {
        let [r, g, b] = self.brush_color;
        UiAction::SelectBrush {
            width,
            color: Rgba::opaque(r, g, b),
        }
    }
}

fn with_hint(label: &str, action: &UiAction) -> String {
    match ShortcutRegistry::hint(action) {
        Some(hint) => format!("{label} ({hint})"),
        None => label.to_string(),
    }
}

/// Render the toolbar and return the first triggered action.
pub fn render_ui(ctx: &Context, ui_state: &mut UiState) -> Option<UiAction> {
    let mut action = None;

    egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
        ui.horizontal_wrapped(|ui| {
            if ui
                .add_enabled(ui_state.can_undo, egui::Button::new("Undo"))
                .on_hover_text(with_hint("Undo", &UiAction::Undo))
                .clicked()
            {
                action = Some(UiAction::Undo);
            }
            if ui
                .add_enabled(ui_state.can_redo, egui::Button::new("Redo"))
                .on_hover_text(with_hint("Redo", &UiAction::Redo))
                .clicked()
            {
                action = Some(UiAction::Redo);
            }
            if ui.button("Clear").clicked() {
                action = Some(UiAction::Clear);
            }
            if ui
                .add_enabled(!ui_state.canvas_empty, egui::Button::new("Export PNG"))
                .clicked()
            {
                action = Some(UiAction::ExportPng);
            }
            ui.weak("Shortcuts")
                .on_hover_text(ShortcutRegistry::help_text());
        });

        ui.separator();

        ui.horizontal_wrapped(|ui| {
            let brush = ui_state.tool == ToolKind::Brush;
            if ui
                .selectable_label(brush && ui_state.brush_width == ui_state.thin_width, "Thin")
                .clicked()
            {
                ui_state.brush_width = ui_state.thin_width;
                action = Some(ui_state.brush_action(ui_state.thin_width));
            }
            if ui
                .selectable_label(brush && ui_state.brush_width == ui_state.thick_width, "Thick")
                .clicked()
            {
                ui_state.brush_width = ui_state.thick_width;
                action = Some(ui_state.brush_action(ui_state.thick_width));
            }

            let slider =
                ui.add(egui::Slider::new(&mut ui_state.brush_width, 1.0..=32.0).text("width"));
            let color = ui.color_edit_button_srgb(&mut ui_state.brush_color);
            if slider.changed() || color.changed() {
                action = Some(ui_state.brush_action(ui_state.brush_width));
            }
        });

        ui.horizontal_wrapped(|ui| {
            for glyph in &ui_state.stickers {
                let selected =
                    ui_state.tool == ToolKind::Sticker && &ui_state.selected_sticker == glyph;
                if ui
                    .selectable_label(selected, RichText::new(glyph).size(20.0))
                    .clicked()
                {
                    action = Some(UiAction::SelectSticker(glyph.clone()));
                }
            }

            ui.separator();
            let entry = ui.add(
                egui::TextEdit::singleline(&mut ui_state.custom_sticker)
                    .hint_text("custom sticker")
                    .desired_width(80.0),
            );
            let submitted = entry.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            let add = ui.button("Add").clicked() || submitted;
            if add && !ui_state.custom_sticker.trim().is_empty() {
                action = Some(UiAction::AddSticker(std::mem::take(&mut ui_state.custom_sticker)));
            }
        });
    });

    action
}
