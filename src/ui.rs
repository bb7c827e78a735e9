use eframe::egui::{self, Pos2, Rect, Vec2};

use crate::{
    config::{MAX_ZOOM, MIN_ZOOM, ZOOM_STEP},
    selection::Selection,
};

/// Loupe diameter on screen, in logical pixels.
pub const LOUPE_DIAMETER: f32 = 120.0;
/// Buffer pixels shown across the loupe.
pub const LOUPE_SPAN: f32 = 30.0;
/// Gap between the pointer and the loupe.
pub const LOUPE_OFFSET: f32 = 24.0;

/// Maps between the on-screen image rectangle and buffer pixels.
///
/// `image_rect` is where the image is painted right now, so it already carries
/// the zoom factor. The buffer resolution never changes with zoom, which makes
/// every mapping here zoom-invariant.
pub struct ViewMetrics {
    pub image_rect: Rect,
    pub buffer_size: Vec2,
    /// Screen pixels per buffer pixel, per axis.
    pub scale: Vec2,
}

impl ViewMetrics {
    pub fn new(image_rect: Rect, buffer_size: Vec2) -> Self {
        let safe_buffer = egui::vec2(buffer_size.x.max(1.0), buffer_size.y.max(1.0));
        let scale = egui::vec2(
            (image_rect.width() / safe_buffer.x).max(f32::EPSILON),
            (image_rect.height() / safe_buffer.y).max(f32::EPSILON),
        );
        Self {
            image_rect,
            buffer_size,
            scale,
        }
    }

    pub fn screen_to_buffer(&self, pos: Pos2) -> Pos2 {
        let rel = pos - self.image_rect.min;
        egui::pos2(
            (rel.x / self.scale.x).clamp(0.0, self.buffer_size.x),
            (rel.y / self.scale.y).clamp(0.0, self.buffer_size.y),
        )
    }

    pub fn buffer_to_screen(&self, pos: Pos2) -> Pos2 {
        egui::pos2(
            self.image_rect.min.x + pos.x * self.scale.x,
            self.image_rect.min.y + pos.y * self.scale.y,
        )
    }

    pub fn selection_rect(&self, selection: &Selection) -> Rect {
        Rect::from_min_max(
            self.buffer_to_screen(selection.rect.min),
            self.buffer_to_screen(selection.rect.max),
        )
    }
}

/// Free-function form of [`ViewMetrics::screen_to_buffer`].
pub fn to_buffer_space(screen: Pos2, image_rect: Rect, buffer_size: Vec2) -> Pos2 {
    ViewMetrics::new(image_rect, buffer_size).screen_to_buffer(screen)
}

/// Where a drag selection starts: the pointer-down position, since egui only
/// reports the drag once the pointer has travelled past its threshold.
pub fn drag_anchor(press_origin: Option<Pos2>, pointer: Option<Pos2>) -> Option<Pos2> {
    press_origin.or(pointer)
}

/// Display size at zoom 1.0: as wide as the container unless that would
/// exceed `max_height`, aspect ratio preserved.
pub fn fit_to_container(image_size: Vec2, container_width: f32, max_height: f32) -> Vec2 {
    let safe_size = egui::vec2(image_size.x.max(1.0), image_size.y.max(1.0));
    let ratio = safe_size.x / safe_size.y;
    let width = container_width.max(1.0);
    let height = width / ratio;
    if height > max_height {
        egui::vec2(max_height * ratio, max_height)
    } else {
        egui::vec2(width, height)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Zoom {
    factor: f32,
    step: f32,
    min: f32,
    max: f32,
}

impl Default for Zoom {
    fn default() -> Self {
        Self::new(ZOOM_STEP, MIN_ZOOM, MAX_ZOOM)
    }
}

impl Zoom {
    pub fn new(step: f32, min: f32, max: f32) -> Self {
        let min = min.max(f32::EPSILON);
        let max = max.max(min);
        Self {
            factor: min,
            step,
            min,
            max,
        }
    }

    pub fn factor(&self) -> f32 {
        self.factor
    }

    /// Adds `delta` and clamps to the configured range.
    pub fn adjust(&mut self, delta: f32) -> f32 {
        self.factor = (self.factor + delta).clamp(self.min, self.max);
        self.factor
    }

    pub fn zoom_in(&mut self) -> f32 {
        self.adjust(self.step)
    }

    pub fn zoom_out(&mut self) -> f32 {
        self.adjust(-self.step)
    }

    /// Maps a pinch/ctrl+wheel zoom factor (1.0 = none) onto one step.
    pub fn apply_gesture(&mut self, zoom_delta: f32) -> Option<f32> {
        if zoom_delta > 1.0 {
            Some(self.zoom_in())
        } else if zoom_delta < 1.0 {
            Some(self.zoom_out())
        } else {
            None
        }
    }

    pub fn reset(&mut self) {
        self.factor = self.min;
    }
}

/// Magnifier next to the pointer. Lives in raw screen space, not in the
/// zoomed image space, so the overlay itself is never scaled.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Loupe {
    pub rect: Rect,
    /// Normalized texture coordinates of the magnified buffer area.
    pub uv: Rect,
}

impl Loupe {
    pub fn new(pointer_screen: Pos2, pointer_buffer: Pos2, buffer_size: Vec2, screen: Rect) -> Self {
        let size = LOUPE_DIAMETER;
        let mut min = egui::pos2(
            pointer_screen.x + LOUPE_OFFSET,
            pointer_screen.y - LOUPE_OFFSET - size,
        );
        if min.x + size > screen.max.x {
            min.x = pointer_screen.x - LOUPE_OFFSET - size;
        }
        if min.y < screen.min.y {
            min.y = pointer_screen.y + LOUPE_OFFSET;
        }
        min.x = min.x.min(screen.max.x - size).max(screen.min.x);
        min.y = min.y.min(screen.max.y - size).max(screen.min.y);

        let safe_buffer = egui::vec2(buffer_size.x.max(1.0), buffer_size.y.max(1.0));
        let center = egui::pos2(
            pointer_buffer.x / safe_buffer.x,
            pointer_buffer.y / safe_buffer.y,
        );
        let span = egui::vec2(LOUPE_SPAN / safe_buffer.x, LOUPE_SPAN / safe_buffer.y);

        Self {
            rect: Rect::from_min_size(min, egui::vec2(size, size)),
            uv: Rect::from_center_size(center, span),
        }
    }

    pub fn center(&self) -> Pos2 {
        self.rect.center()
    }

    pub fn radius(&self) -> f32 {
        self.rect.width() * 0.5
    }
}

pub struct KeyboardState {
    pub remove: bool,
    pub reset: bool,
    pub save: bool,
    pub open: bool,
    pub escape: bool,
    pub zoom_in: bool,
    pub zoom_out: bool,
    pub zoom_reset: bool,
}
