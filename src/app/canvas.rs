use eframe::egui::{self, Color32, Rect, Shape, Stroke, StrokeKind};

use crate::{
    session::EditorSession,
    ui::{drag_anchor, Loupe, ViewMetrics},
};

pub const SELECTION_COLOR: Color32 = Color32::from_rgb(239, 68, 68);
const HANDLE_SIZE: f32 = 6.0;

pub struct Canvas {
    /// Off while a removal is running.
    pub interactive: bool,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas {
    pub fn new() -> Self {
        Self { interactive: true }
    }

    /// Feeds drag events on the image into the session. Leaving the image
    /// ends the drag but keeps the rectangle.
    pub fn handle_pointer(
        &mut self,
        response: &egui::Response,
        image_rect: Rect,
        session: &mut EditorSession,
    ) {
        if !self.interactive {
            if session.is_dragging() {
                session.end_selection();
            }
            return;
        }

        if response.drag_started() {
            let press_origin = response.ctx.input(|input| input.pointer.press_origin());
            if let Some(anchor) = drag_anchor(press_origin, response.interact_pointer_pos()) {
                session.begin_selection(anchor, image_rect);
            }
        } else if response.dragged() && session.is_dragging() {
            if let Some(pointer) = response.interact_pointer_pos() {
                if response.contains_pointer() {
                    session.update_selection(pointer, image_rect);
                } else {
                    session.end_selection();
                }
            }
        }

        if response.drag_stopped() {
            session.end_selection();
        }
    }

    pub fn draw(&self, painter: &egui::Painter, image_rect: Rect, session: &EditorSession) {
        let (Some(selection), Some(buffer_size)) = (session.selection(), session.buffer_size())
        else {
            return;
        };
        let metrics = ViewMetrics::new(image_rect, buffer_size);
        let rect = metrics.selection_rect(selection);
        if rect.width() <= 0.0 || rect.height() <= 0.0 {
            return;
        }

        painter.rect_filled(rect, 0.0, Color32::from_rgba_unmultiplied(239, 68, 68, 38));
        painter.rect_stroke(rect, 0.0, Stroke::new(2.0, SELECTION_COLOR), StrokeKind::Middle);

        // White dashes keep the outline visible on dark images.
        let outline = [
            rect.left_top(),
            rect.right_top(),
            rect.right_bottom(),
            rect.left_bottom(),
            rect.left_top(),
        ];
        painter.extend(Shape::dashed_line(
            &outline,
            Stroke::new(1.0, Color32::from_rgba_unmultiplied(255, 255, 255, 204)),
            4.0,
            4.0,
        ));

        let handle = egui::vec2(HANDLE_SIZE, HANDLE_SIZE);
        painter.rect_filled(Rect::from_center_size(rect.min, handle), 0.0, SELECTION_COLOR);
        painter.rect_filled(Rect::from_center_size(rect.max, handle), 0.0, SELECTION_COLOR);
    }

    /// Magnified view around the pointer, drawn only while dragging.
    pub fn draw_loupe(
        &self,
        ctx: &egui::Context,
        texture: &egui::TextureHandle,
        session: &EditorSession,
    ) {
        let (Some(pointer), Some(buffer_size)) = (session.pointer(), session.buffer_size()) else {
            return;
        };
        let loupe = Loupe::new(pointer.screen, pointer.buffer, buffer_size, ctx.content_rect());
        let size = loupe.rect.size();

        egui::Area::new(egui::Id::new("wmremover-loupe"))
            .order(egui::Order::Tooltip)
            .fixed_pos(loupe.rect.min)
            .interactable(false)
            .show(ctx, |ui| {
                let image = egui::Image::from_texture((texture.id(), size))
                    .uv(loupe.uv)
                    .fit_to_exact_size(size)
                    .corner_radius(loupe.radius());
                ui.add(image);
                let center = loupe.center();
                let painter = ui.painter();
                painter.circle_stroke(center, loupe.radius(), Stroke::new(2.0, SELECTION_COLOR));
                let arm = 8.0;
                let cross = Stroke::new(1.0, Color32::WHITE);
                painter.line_segment([center - egui::vec2(arm, 0.0), center + egui::vec2(arm, 0.0)], cross);
                painter.line_segment([center - egui::vec2(0.0, arm), center + egui::vec2(0.0, arm)], cross);
            });
    }
}
