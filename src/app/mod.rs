pub mod canvas;
pub mod loader;
pub mod processor;
pub mod saver;

use std::{path::PathBuf, sync::Arc};

use eframe::{
    egui::{self, Color32},
    App, Frame,
};

use crate::{
    buffer::DEFAULT_EXPORT_NAME,
    config::EditorConfig,
    fs_utils::{default_export_path, is_supported_image, SUPPORTED_EXTENSIONS},
    image_utils::to_color_image,
    session::EditorSession,
    ui::KeyboardState,
};

use self::{
    canvas::Canvas,
    loader::{LoadSource, Loader},
    processor::Processor,
    saver::{SaveRequest, Saver},
};

pub struct WatermarkRemoverApp {
    pub session: EditorSession,
    pub canvas: Canvas,
    pub loader: Loader,
    pub processor: Processor,
    pub saver: Saver,
    pub texture: Option<egui::TextureHandle>,
    pub texture_epoch: Option<u64>,
    pub export_dir: PathBuf,
    pub status: String,
}

impl WatermarkRemoverApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        config: EditorConfig,
        initial: Option<PathBuf>,
        export_dir: PathBuf,
    ) -> Self {
        let loader = Loader::with_max_size(config.max_buffer_size);
        let mut app = Self {
            session: EditorSession::new(config),
            canvas: Canvas::new(),
            loader,
            processor: Processor::new(),
            saver: Saver::new(1),
            texture: None,
            texture_epoch: None,
            export_dir,
            status: String::from("Drop an image here or press Ctrl+O"),
        };
        if let Some(path) = initial {
            app.open(LoadSource::Path(path));
        }
        app
    }

    fn open(&mut self, source: LoadSource) {
        self.status = format!("Loading {}...", source.label());
        self.loader.load(source);
    }

    fn open_dialog(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", SUPPORTED_EXTENSIONS)
            .pick_file()
        {
            self.open(LoadSource::Path(path));
        }
    }

    fn save_dialog(&mut self) {
        let Some(image) = self.session.current().map(Arc::clone) else {
            self.status = "No image to save".into();
            return;
        };
        let suggested = default_export_path(&self.export_dir);
        let file_name = suggested
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| DEFAULT_EXPORT_NAME.to_string());
        let Some(path) = rfd::FileDialog::new()
            .set_directory(&self.export_dir)
            .set_file_name(file_name)
            .add_filter("PNG", &["png"])
            .save_file()
        else {
            return;
        };
        if let Some(dir) = path.parent() {
            self.export_dir = dir.to_path_buf();
        }
        match self.saver.queue_save(SaveRequest {
            image,
            path: path.clone(),
        }) {
            Ok(()) => self.status = format!("Saving {}...", path.display()),
            Err(err) => self.status = format!("{err:#}"),
        }
    }

    fn start_removal(&mut self) {
        if self.processor.busy {
            return;
        }
        let Some(job) = self.session.removal_job() else {
            return;
        };
        match self.processor.submit(job) {
            Ok(()) => self.status = "Removing watermark...".into(),
            Err(err) => self.status = format!("{err:#}"),
        }
    }

    fn reset(&mut self) {
        self.session.reset_to_original();
        self.status = "Restored the original image".into();
    }

    fn handle_keyboard(ctx: &egui::Context) -> KeyboardState {
        ctx.input(|input| KeyboardState {
            remove: input.key_pressed(egui::Key::Enter),
            reset: !input.modifiers.command && input.key_pressed(egui::Key::R),
            save: input.modifiers.command && input.key_pressed(egui::Key::S),
            open: input.modifiers.command && input.key_pressed(egui::Key::O),
            escape: input.key_pressed(egui::Key::Escape),
            zoom_in: !input.modifiers.command
                && (input.key_pressed(egui::Key::Plus) || input.key_pressed(egui::Key::Equals)),
            zoom_out: !input.modifiers.command && input.key_pressed(egui::Key::Minus),
            zoom_reset: !input.modifiers.command && input.key_pressed(egui::Key::Num0),
        })
    }

    fn poll_background(&mut self) {
        if let Some(loaded) = self.loader.poll() {
            match loaded.result {
                Ok(image) => {
                    let (w, h) = image.dimensions();
                    self.session.install_image(image);
                    self.status = format!(
                        "Loaded {} ({w}x{h}) in {} ms",
                        loaded.label,
                        loaded.load_duration.as_millis()
                    );
                }
                Err(err) => {
                    self.status = format!("Failed to load {}: {err}", loaded.label);
                }
            }
        }

        if let Some(outcome) = self.processor.poll() {
            self.status = if self.session.apply_removal(outcome) {
                "Watermark removed".into()
            } else {
                "Nothing was removed".into()
            };
        }

        for status in self.saver.check_completions() {
            self.status = match (status.result, status.size) {
                (Ok(()), Some(size)) => format!("Saved {} ({size} bytes)", status.path.display()),
                (Ok(()), None) => format!("Saved {}", status.path.display()),
                (Err(err), _) => format!("Error saving {}: {err:#}", status.path.display()),
            };
        }
    }

    fn take_dropped_file(ctx: &egui::Context) -> Option<LoadSource> {
        let dropped = ctx.input(|input| input.raw.dropped_files.clone());
        dropped.into_iter().find_map(|file| {
            if let Some(path) = file.path {
                return is_supported_image(&path).then_some(LoadSource::Path(path));
            }
            file.bytes.map(|bytes| LoadSource::Bytes {
                name: file.name,
                bytes,
            })
        })
    }

    fn refresh_texture(&mut self, ctx: &egui::Context) {
        let epoch = self.session.epoch();
        if self.texture_epoch == Some(epoch) {
            return;
        }
        self.texture_epoch = Some(epoch);
        let Some(current) = self.session.current() else {
            self.texture = None;
            return;
        };
        let color_image = to_color_image(current);
        if let Some(texture) = self.texture.as_mut() {
            texture.set(color_image, egui::TextureOptions::LINEAR);
        } else {
            self.texture = Some(ctx.load_texture(
                "wmremover-current",
                color_image,
                egui::TextureOptions::LINEAR,
            ));
        }
    }

    fn toolbar(&mut self, ui: &mut egui::Ui) {
        let has_image = self.session.has_image();
        let busy = self.processor.busy;
        ui.horizontal(|ui| {
            if ui.button("Open...").clicked() {
                self.open_dialog();
            }
            if ui
                .add_enabled(has_image && !busy, egui::Button::new("Reset"))
                .clicked()
            {
                self.reset();
            }
            ui.separator();
            if ui.add_enabled(has_image, egui::Button::new("-")).clicked() {
                self.session.zoom_out();
            }
            ui.label(format!("{:.0}%", self.session.zoom() * 100.0));
            if ui.add_enabled(has_image, egui::Button::new("+")).clicked() {
                self.session.zoom_in();
            }
            if ui.add_enabled(has_image, egui::Button::new("100%")).clicked() {
                self.session.reset_zoom();
            }
            ui.separator();
            let can_remove = self.session.can_remove() && !busy;
            if ui
                .add_enabled(can_remove, egui::Button::new("Remove watermark"))
                .clicked()
            {
                self.start_removal();
            }
            if ui
                .add_enabled(has_image, egui::Button::new("Save PNG..."))
                .clicked()
            {
                self.save_dialog();
            }
        });
    }

    fn editor(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let Some(texture) = self.texture.clone() else {
            let text = if self.loader.loading_active {
                "Loading..."
            } else {
                "Drop an image here or press Ctrl+O"
            };
            ui.centered_and_justified(|ui| {
                ui.heading(text);
            });
            return;
        };

        self.session.fit_to_container(ui.available_width());
        let viewport = ui.max_rect();
        egui::ScrollArea::both()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                let (image_rect, response) = ui.allocate_exact_size(
                    self.session.display_size(),
                    egui::Sense::drag(),
                );
                ui.painter().image(
                    texture.id(),
                    image_rect,
                    egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                    Color32::WHITE,
                );

                if response.hovered() {
                    let zoom_delta = ctx.input(|input| input.zoom_delta());
                    self.session.zoom_gesture(zoom_delta);
                }
                self.canvas.handle_pointer(&response, image_rect, &mut self.session);
                self.canvas.draw(ui.painter(), image_rect, &self.session);
                if self.session.is_dragging() {
                    response.on_hover_cursor(egui::CursorIcon::Crosshair);
                }
            });

        if self.session.is_dragging() {
            self.canvas.draw_loupe(ctx, &texture, &self.session);
        }

        if self.processor.busy {
            let painter = ui.painter_at(viewport);
            painter.rect_filled(viewport, 0.0, Color32::from_black_alpha(120));
            ui.put(
                egui::Rect::from_center_size(viewport.center(), egui::vec2(48.0, 48.0)),
                egui::Spinner::new().size(40.0),
            );
        }
    }
}

impl App for WatermarkRemoverApp {
    fn update(&mut self, ctx: &egui::Context, frame: &mut Frame) {
        let _ = frame;

        self.poll_background();

        if let Some(source) = Self::take_dropped_file(ctx) {
            self.open(source);
        }

        let keys = Self::handle_keyboard(ctx);
        if keys.open {
            self.open_dialog();
        }
        if self.session.has_image() {
            if keys.escape && self.session.selection().is_some() {
                self.session.clear_selection();
                self.status = "Selection cleared".into();
            }
            if keys.remove {
                self.start_removal();
            }
            if keys.reset && !self.processor.busy {
                self.reset();
            }
            if keys.save {
                self.save_dialog();
            }
            if keys.zoom_in {
                self.session.zoom_in();
            }
            if keys.zoom_out {
                self.session.zoom_out();
            }
            if keys.zoom_reset {
                self.session.reset_zoom();
            }
        }

        self.canvas.interactive = !self.processor.busy;
        self.refresh_texture(ctx);

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| self.toolbar(ui));
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.monospace(&self.status);
                if !self.saver.pending_saves.is_empty() {
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(format!("Saving {} file(s)...", self.saver.pending_saves.len()));
                    });
                }
            });
        });
        egui::CentralPanel::default().show(ctx, |ui| self.editor(ui, ctx));

        if self.loader.loading_active || self.processor.busy || !self.saver.pending_saves.is_empty() {
            ctx.request_repaint();
        }
    }
}
