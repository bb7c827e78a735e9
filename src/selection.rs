use eframe::egui::{self, Pos2, Rect, Vec2};

/// Selections smaller than this (in buffer pixels, either axis) are never filled.
pub const MIN_SELECTION_SIZE: u32 = 5;

/// Integer rectangle in buffer pixels, half-open: `[x, x + width) x [y, y + height)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    pub fn is_removable(&self) -> bool {
        self.width >= MIN_SELECTION_SIZE && self.height >= MIN_SELECTION_SIZE
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Intersects with a `width` x `height` buffer. `None` when nothing is left.
    pub fn clamp_to(&self, width: u32, height: u32) -> Option<Self> {
        let x0 = self.x.min(width);
        let y0 = self.y.min(height);
        let x1 = self.x.saturating_add(self.width).min(width);
        let y1 = self.y.saturating_add(self.height).min(height);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(Self::new(x0, y0, x1 - x0, y1 - y0))
    }

    /// Grows every side by `pad`, staying inside a `width` x `height` buffer.
    pub fn expand(&self, pad: u32, width: u32, height: u32) -> Self {
        let x0 = self.x.saturating_sub(pad);
        let y0 = self.y.saturating_sub(pad);
        let x1 = self.right().saturating_add(pad).min(width);
        let y1 = self.bottom().saturating_add(pad).min(height);
        Self::new(x0, y0, x1.saturating_sub(x0), y1.saturating_sub(y0))
    }
}

/// Selection in buffer space. `rect.min` is the origin, the extent is never negative.
#[derive(Clone, Debug, PartialEq)]
pub struct Selection {
    pub rect: Rect,
}

impl Selection {
    pub fn from_points(a: Pos2, b: Pos2, bounds: Vec2) -> Self {
        let min = egui::pos2(
            a.x.min(b.x).clamp(0.0, bounds.x),
            a.y.min(b.y).clamp(0.0, bounds.y),
        );
        let max = egui::pos2(
            a.x.max(b.x).clamp(0.0, bounds.x),
            a.y.max(b.y).clamp(0.0, bounds.y),
        );
        Self {
            rect: Rect::from_min_max(min, max),
        }
    }

    pub fn from_rect(rect: Rect, bounds: Vec2) -> Self {
        Self::from_points(rect.min, rect.max, bounds)
    }

    /// Snaps outward to whole pixels and clips to `bounds`.
    pub fn to_pixel_rect(&self, bounds: Vec2) -> Option<PixelRect> {
        let x0 = self.rect.min.x.floor().max(0.0);
        let y0 = self.rect.min.y.floor().max(0.0);
        let x1 = self.rect.max.x.ceil().min(bounds.x.floor());
        let y1 = self.rect.max.y.ceil().min(bounds.y.floor());
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(PixelRect::new(
            x0 as u32,
            y0 as u32,
            (x1 - x0) as u32,
            (y1 - y0) as u32,
        ))
    }

    pub fn is_removable(&self) -> bool {
        let min = MIN_SELECTION_SIZE as f32;
        self.rect.width() >= min && self.rect.height() >= min
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging { anchor: Pos2 },
}

/// Drag-to-select state machine. Positions are buffer coordinates.
#[derive(Clone, Debug, Default)]
pub struct SelectionTracker {
    state: DragState,
    selection: Option<Selection>,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, pos: Pos2, bounds: Vec2) {
        self.state = DragState::Dragging { anchor: pos };
        self.selection = Some(Selection::from_points(pos, pos, bounds));
    }

    pub fn update(&mut self, pos: Pos2, bounds: Vec2) {
        if let DragState::Dragging { anchor } = self.state {
            self.selection = Some(Selection::from_points(anchor, pos, bounds));
        }
    }

    /// Also used for pointer-leave; the last rectangle is kept.
    pub fn end(&mut self) {
        self.state = DragState::Idle;
    }

    pub fn set(&mut self, selection: Selection) {
        self.state = DragState::Idle;
        self.selection = Some(selection);
    }

    pub fn clear(&mut self) {
        self.state = DragState::Idle;
        self.selection = None;
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }
}
