use std::sync::Arc;

use eframe::egui::{self, Pos2, Rect, Vec2};
use image::RgbaImage;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    buffer::{decode_image, ImageStore},
    config::EditorConfig,
    error::{EditorError, Result},
    inpaint::{remove_region, InpaintParams},
    selection::{PixelRect, Selection, SelectionTracker},
    ui::{fit_to_container, ViewMetrics, Zoom},
};

/// Last pointer position of an active drag.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerState {
    pub buffer: Pos2,
    /// Raw screen position, for overlays that must ignore the zoom.
    pub screen: Pos2,
}

/// A removal ready to run off the UI thread.
///
/// Holds an immutable snapshot of the current image and the epoch it was
/// taken at, so a result can be dropped if the session moved on meanwhile.
#[derive(Clone, Debug)]
pub struct RemovalJob {
    pub snapshot: Arc<RgbaImage>,
    pub rect: PixelRect,
    pub params: InpaintParams,
    pub seed: u64,
    pub epoch: u64,
}

impl RemovalJob {
    pub fn run(self) -> RemovalOutcome {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let image = remove_region(&self.snapshot, self.rect, &self.params, &mut rng);
        RemovalOutcome {
            epoch: self.epoch,
            rect: self.rect,
            image,
        }
    }
}

#[derive(Debug)]
pub struct RemovalOutcome {
    pub epoch: u64,
    pub rect: PixelRect,
    pub image: Option<RgbaImage>,
}

/// All editor state for one window: image, display geometry, selection and
/// pointer. Everything goes through `&mut self`; only the image snapshots
/// are shared.
pub struct EditorSession {
    config: EditorConfig,
    store: Option<ImageStore>,
    base_size: Vec2,
    container_width: f32,
    zoom: Zoom,
    tracker: SelectionTracker,
    pointer: Option<PointerState>,
    epoch: u64,
    rng: StdRng,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl EditorSession {
    pub fn new(config: EditorConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let zoom = Zoom::new(config.zoom_step, config.min_zoom, config.max_zoom);
        Self {
            config,
            store: None,
            base_size: Vec2::ZERO,
            container_width: 0.0,
            zoom,
            tracker: SelectionTracker::new(),
            pointer: None,
            epoch: 0,
            rng,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Decodes and installs `bytes`. On failure the previous image, if any,
    /// stays exactly as it was.
    pub fn load_image(&mut self, bytes: &[u8]) -> Result<()> {
        let image = decode_image(bytes, self.config.max_buffer_size)?;
        self.install_image(image);
        Ok(())
    }

    /// Installs an already decoded buffer as both original and current.
    pub fn install_image(&mut self, image: RgbaImage) {
        log::info!("loaded {}x{} image", image.width(), image.height());
        self.store = Some(ImageStore::new(image));
        self.zoom.reset();
        self.tracker.clear();
        self.pointer = None;
        self.epoch += 1;
        self.refit();
    }

    pub fn has_image(&self) -> bool {
        self.store.is_some()
    }

    /// Bumped whenever the current image is replaced.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn original(&self) -> Option<&Arc<RgbaImage>> {
        self.store.as_ref().map(ImageStore::original)
    }

    pub fn current(&self) -> Option<&Arc<RgbaImage>> {
        self.store.as_ref().map(ImageStore::current)
    }

    pub fn is_edited(&self) -> bool {
        self.store.as_ref().is_some_and(ImageStore::is_edited)
    }

    pub fn buffer_size(&self) -> Option<Vec2> {
        self.store.as_ref().map(|store| {
            let (w, h) = store.dimensions();
            egui::vec2(w as f32, h as f32)
        })
    }

    /// Recomputes the zoom 1.0 display size for a container of this width.
    pub fn fit_to_container(&mut self, container_width: f32) -> Vec2 {
        self.container_width = container_width;
        self.refit();
        self.base_size
    }

    fn refit(&mut self) {
        if let Some(size) = self.buffer_size() {
            let width = if self.container_width > 0.0 {
                self.container_width
            } else {
                size.x
            };
            self.base_size = fit_to_container(size, width, self.config.max_display_height);
        }
    }

    pub fn base_size(&self) -> Vec2 {
        self.base_size
    }

    /// On-screen size: base size times zoom.
    pub fn display_size(&self) -> Vec2 {
        self.base_size * self.zoom.factor()
    }

    pub fn zoom(&self) -> f32 {
        self.zoom.factor()
    }

    pub fn set_zoom(&mut self, delta: f32) -> f32 {
        self.zoom.adjust(delta)
    }

    pub fn zoom_in(&mut self) -> f32 {
        self.zoom.zoom_in()
    }

    pub fn zoom_out(&mut self) -> f32 {
        self.zoom.zoom_out()
    }

    pub fn zoom_gesture(&mut self, zoom_delta: f32) -> Option<f32> {
        self.zoom.apply_gesture(zoom_delta)
    }

    pub fn reset_zoom(&mut self) {
        self.zoom.reset();
    }

    fn metrics(&self, image_rect: Rect) -> Option<ViewMetrics> {
        self.buffer_size()
            .map(|size| ViewMetrics::new(image_rect, size))
    }

    /// Pointer down at `screen`, with the image painted at `image_rect`.
    pub fn begin_selection(&mut self, screen: Pos2, image_rect: Rect) {
        let Some(metrics) = self.metrics(image_rect) else {
            return;
        };
        let buffer = metrics.screen_to_buffer(screen);
        self.tracker.begin(buffer, metrics.buffer_size);
        self.pointer = Some(PointerState { buffer, screen });
    }

    pub fn update_selection(&mut self, screen: Pos2, image_rect: Rect) {
        if !self.tracker.is_dragging() {
            return;
        }
        let Some(metrics) = self.metrics(image_rect) else {
            return;
        };
        let buffer = metrics.screen_to_buffer(screen);
        self.tracker.update(buffer, metrics.buffer_size);
        self.pointer = Some(PointerState { buffer, screen });
    }

    /// Pointer up or pointer leave.
    pub fn end_selection(&mut self) {
        self.tracker.end();
        self.pointer = None;
    }

    /// Selects a rectangle given directly in buffer pixels.
    pub fn select(&mut self, rect: Rect) {
        if let Some(bounds) = self.buffer_size() {
            self.tracker.set(Selection::from_rect(rect, bounds));
        }
    }

    pub fn clear_selection(&mut self) {
        self.tracker.clear();
        self.pointer = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.tracker.is_dragging()
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.tracker.selection()
    }

    pub fn selection_rect(&self) -> Option<PixelRect> {
        let bounds = self.buffer_size()?;
        self.tracker.selection()?.to_pixel_rect(bounds)
    }

    pub fn pointer(&self) -> Option<PointerState> {
        self.pointer
    }

    pub fn can_remove(&self) -> bool {
        self.tracker.selection().is_some_and(Selection::is_removable)
            && self.selection_rect().is_some_and(|rect| rect.is_removable())
    }

    /// Packages the current selection for [`RemovalJob::run`]. `None` when
    /// there is nothing valid to remove.
    pub fn removal_job(&mut self) -> Option<RemovalJob> {
        if !self.can_remove() {
            return None;
        }
        let rect = self.selection_rect()?;
        let snapshot = Arc::clone(self.current()?);
        Some(RemovalJob {
            snapshot,
            rect,
            params: self.config.inpaint,
            seed: self.rng.gen(),
            epoch: self.epoch,
        })
    }

    /// Commits a finished removal. Results from an older epoch, or no-op
    /// results, are dropped and `false` is returned.
    pub fn apply_removal(&mut self, outcome: RemovalOutcome) -> bool {
        if outcome.epoch != self.epoch {
            log::debug!(
                "dropping removal result from epoch {} (now {})",
                outcome.epoch,
                self.epoch
            );
            return false;
        }
        let (Some(store), Some(image)) = (self.store.as_mut(), outcome.image) else {
            return false;
        };
        store.commit_edit(image);
        self.tracker.clear();
        self.pointer = None;
        self.epoch += 1;
        log::info!(
            "removed {}x{} region at ({}, {})",
            outcome.rect.width,
            outcome.rect.height,
            outcome.rect.x,
            outcome.rect.y
        );
        true
    }

    /// Synchronous removal of the current selection. `false` means nothing
    /// happened, which is not an error.
    pub fn remove_watermark(&mut self) -> bool {
        match self.removal_job() {
            Some(job) => self.apply_removal(job.run()),
            None => false,
        }
    }

    pub fn reset_to_original(&mut self) {
        if let Some(store) = self.store.as_mut() {
            store.reset_to_original();
            self.epoch += 1;
        }
        self.zoom.reset();
        self.tracker.clear();
        self.pointer = None;
    }

    pub fn export_current(&self) -> Result<Vec<u8>> {
        self.store
            .as_ref()
            .ok_or(EditorError::NoImage)?
            .export_current()
    }
}
