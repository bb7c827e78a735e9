use anyhow::{anyhow, Result};
use eframe::egui::{self, Rect};

use crate::inpaint::InpaintParams;

pub const MAX_DISPLAY_HEIGHT: f32 = 600.0;
pub const ZOOM_STEP: f32 = 0.5;
pub const MIN_ZOOM: f32 = 1.0;
pub const MAX_ZOOM: f32 = 4.0;

#[derive(Clone, Debug, PartialEq)]
pub struct EditorConfig {
    /// Height cap for the fitted (zoom 1.0) display size, in logical pixels.
    pub max_display_height: f32,
    pub zoom_step: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
    pub inpaint: InpaintParams,
    /// Downscale decoded images to fit inside this size. `None` keeps the
    /// natural resolution.
    pub max_buffer_size: Option<(u32, u32)>,
    /// Seed for the fill jitter. `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_display_height: MAX_DISPLAY_HEIGHT,
            zoom_step: ZOOM_STEP,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            inpaint: InpaintParams::default(),
            max_buffer_size: None,
            seed: None,
        }
    }
}

/// Parses `X,Y,W,H` (buffer pixels) into a rectangle.
pub fn parse_rect(value: &str) -> Result<Rect> {
    let parts: Vec<&str> = value.split(',').map(str::trim).collect();
    if parts.len() != 4 {
        return Err(anyhow!("expected X,Y,W,H but got '{value}'"));
    }
    let mut numbers = [0.0f32; 4];
    for (slot, part) in numbers.iter_mut().zip(&parts) {
        *slot = part
            .parse::<f32>()
            .map_err(|err| anyhow!("invalid number '{part}' in '{value}': {err}"))?;
    }
    let [x, y, w, h] = numbers;
    if w < 0.0 || h < 0.0 {
        return Err(anyhow!("width and height must not be negative in '{value}'"));
    }
    Ok(Rect::from_min_size(egui::pos2(x, y), egui::vec2(w, h)))
}
