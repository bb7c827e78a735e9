use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use eframe::egui::Rect;

use crate::{config::EditorConfig, fs_utils::prepare_dir, session::EditorSession};

pub struct HeadlessReport {
    pub output: PathBuf,
    /// Rectangles that were filled; the rest were too small or off-image.
    pub applied: usize,
    pub skipped: usize,
}

/// Loads `input`, removes every rectangle in order and writes a PNG to `output`.
pub fn run(
    input: &Path,
    rects: &[Rect],
    output: &Path,
    config: EditorConfig,
) -> Result<HeadlessReport> {
    let bytes = fs::read(input).with_context(|| format!("Unable to read {}", input.display()))?;
    let mut session = EditorSession::new(config);
    session
        .load_image(&bytes)
        .with_context(|| format!("Unable to load {}", input.display()))?;

    let mut applied = 0;
    let mut skipped = 0;
    for rect in rects {
        session.select(*rect);
        if session.remove_watermark() {
            applied += 1;
        } else {
            log::warn!(
                "skipping {}x{} at ({}, {}): smaller than 5x5 or outside the image",
                rect.width(),
                rect.height(),
                rect.min.x,
                rect.min.y
            );
            skipped += 1;
        }
    }

    let png = session.export_current()?;
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        prepare_dir(parent)?;
    }
    fs::write(output, png).with_context(|| format!("Unable to write {}", output.display()))?;
    log::info!(
        "wrote {} ({applied} region(s) removed, {skipped} skipped)",
        output.display()
    );

    Ok(HeadlessReport {
        output: output.to_path_buf(),
        applied,
        skipped,
    })
}
