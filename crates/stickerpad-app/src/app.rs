//! Core application state and lifecycle.

use crate::config::AppConfig;
use crate::shortcuts::ShortcutRegistry;
use crate::ui::{UiAction, UiState, render_ui};
use egui::{Color32, ColorImage, Pos2, Rect, Sense, TextureHandle, TextureOptions, Vec2};
use kurbo::Point;
use std::cell::Cell;
use std::rc::Rc;
use stickerpad_core::{Session, SessionEvent, ToolKind};
use stickerpad_render::{RenderContext, Renderer, SkiaRenderer, export_png};

mod file_ops {
    /// Save PNG bytes using a native save dialog.
    pub fn export_png(png_data: &[u8], name: &str) {
        let dialog = rfd::FileDialog::new()
            .set_title("Export PNG")
            .set_file_name(format!("{}.png", name))
            .add_filter("PNG Image", &["png"]);

        if let Some(path) = dialog.save_file() {
            if let Err(e) = std::fs::write(&path, png_data) {
                log::error!("Failed to write PNG: {}", e);
            } else {
                log::info!("Exported PNG to: {:?}", path);
            }
        }
    }
}

/// The eframe application: one session, one renderer, one texture.
pub struct StickerpadApp {
    config: AppConfig,
    session: Session,
    renderer: SkiaRenderer,
    ui_state: UiState,
    texture: Option<TextureHandle>,
    /// Set by the session's change subscription; cleared after re-rendering.
    dirty: Rc<Cell<bool>>,
    /// Surface pixels per screen point used for the last render.
    render_scale: f32,
    pointer_inside: bool,
}

impl StickerpadApp {
    pub fn new(config: AppConfig) -> Result<Self, stickerpad_render::RendererError> {
        let renderer = SkiaRenderer::new(
            config.render_config(),
            config.canvas_size,
            config.canvas_size,
        )?;

        let mut session = Session::new();
        session.set_sticker_size(config.sticker_size);
        let dirty = Rc::new(Cell::new(true));
        let flag = dirty.clone();
        session.subscribe(move |event| match event {
            SessionEvent::ContentChanged => flag.set(true),
            SessionEvent::ToolChanged(tool) => log::debug!("tool changed to {tool:?}"),
        });

        Ok(Self {
            ui_state: UiState::new(&config),
            config,
            session,
            renderer,
            texture: None,
            dirty,
            render_scale: 1.0,
            pointer_inside: false,
        })
    }

    fn handle_action(&mut self, action: UiAction) {
        match action {
            UiAction::Undo => {
                if let Err(e) = self.session.undo() {
                    log::debug!("{e}");
                }
            }
            UiAction::Redo => {
                if let Err(e) = self.session.redo() {
                    log::debug!("{e}");
                }
            }
            UiAction::Clear => self.session.clear(),
            UiAction::ExportPng => self.export(),
            UiAction::SelectBrush { width, color } => self.session.select_brush(width, color),
            UiAction::SelectSticker(glyph) => {
                self.session.select_sticker(&glyph);
            }
            UiAction::AddSticker(glyph) => {
                let glyph = glyph.trim().to_string();
                if !self.ui_state.stickers.contains(&glyph) {
                    self.ui_state.stickers.push(glyph.clone());
                }
                self.session.select_sticker(&glyph);
            }
            UiAction::ClearTool => self.session.clear_tool_selection(),
        }
    }

    fn export(&mut self) {
        let snapshot = self.session.export_snapshot();
        match export_png(
            &mut self.renderer,
            &snapshot,
            self.config.export_scale,
            self.config.export_size,
        ) {
            Ok(png) => file_ops::export_png(&png, "sketch"),
            Err(e) => log::error!("Export failed: {}", e),
        }
    }

    fn sync_ui_state(&mut self) {
        self.ui_state.tool = self.session.tool();
        self.ui_state.selected_sticker = self.session.settings().sticker_glyph.clone();
        self.ui_state.can_undo = self.session.can_undo();
        self.ui_state.can_redo = self.session.can_redo();
        self.ui_state.canvas_empty = self.session.display_list().is_empty();
    }

    /// Re-render into the texture when the session changed or the display scale did.
    fn refresh_texture(&mut self, ctx: &egui::Context) {
        let scale = ctx.pixels_per_point();
        if scale != self.render_scale {
            let edge = (self.config.canvas_size as f32 * scale).round() as u32;
            match self.renderer.resize(edge, edge) {
                Ok(()) => self.render_scale = scale,
                Err(e) => log::warn!("Keeping previous surface size: {}", e),
            }
            self.dirty.set(true);
        }

        if !self.dirty.replace(false) && self.texture.is_some() {
            return;
        }

        let render_ctx = RenderContext::new(self.session.frame())
            .with_scale_factor(self.render_scale as f64)
            .with_background(self.renderer.config().background);
        self.renderer.render(&render_ctx);

        let (width, height) = self.renderer.size();
        let image = ColorImage::from_rgba_premultiplied(
            [width as usize, height as usize],
            self.renderer.data(),
        );
        match &mut self.texture {
            Some(texture) => texture.set(image, TextureOptions::LINEAR),
            None => {
                self.texture = Some(ctx.load_texture("sketch", image, TextureOptions::LINEAR));
            }
        }
    }

    /// Forward egui pointer state to the session in surface coordinates.
    fn forward_pointer(&mut self, ctx: &egui::Context, response: &egui::Response) {
        let rect = response.rect;
        let to_surface = |pos: Pos2| -> Point {
            let local = pos - rect.min;
            Point::new(local.x as f64, local.y as f64)
        };

        let (pressed, released, latest) = ctx.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
                i.pointer.latest_pos(),
            )
        });
        let inside = latest.is_some_and(|pos| rect.contains(pos));

        if let Some(pos) = latest {
            if inside {
                if pressed {
                    self.session.pointer_down(to_surface(pos));
                } else if ctx.input(|i| i.pointer.is_moving()) {
                    self.session.pointer_move(to_surface(pos));
                }
                if released {
                    self.session.pointer_up(to_surface(pos));
                }
            }
        }

        if self.pointer_inside && !inside {
            self.session.pointer_leave();
        }
        self.pointer_inside = inside;
    }
}

impl eframe::App for StickerpadApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Some(action) = ShortcutRegistry::poll(ctx) {
            self.handle_action(action);
        }

        self.sync_ui_state();
        if let Some(action) = render_ui(ctx, &mut self.ui_state) {
            self.handle_action(action);
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            let edge = self.config.canvas_size as f32;
            let (response, painter) =
                ui.allocate_painter(Vec2::splat(edge), Sense::click_and_drag());

            if self.session.tool() == ToolKind::None {
                response.clone().on_hover_text("Pick a marker or a sticker");
            }

            self.forward_pointer(ctx, &response);
            self.refresh_texture(ctx);

            if let Some(texture) = &self.texture {
                painter.image(
                    texture.id(),
                    response.rect,
                    Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
                    Color32::WHITE,
                );
            }
            painter.rect_stroke(
                response.rect,
                0.0,
                egui::Stroke::new(1.0, Color32::GRAY),
                egui::StrokeKind::Outside,
            );
        });
    }
}
