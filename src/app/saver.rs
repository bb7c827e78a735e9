use std::{
    path::PathBuf,
    sync::{
        mpsc::{self, Receiver, Sender},
        Arc, Mutex,
    },
    thread,
};

use anyhow::{anyhow, Context, Result};
use image::RgbaImage;

use crate::{buffer::export_png, fs_utils::temp_path_for};

pub struct SaveRequest {
    pub image: Arc<RgbaImage>,
    pub path: PathBuf,
}

pub struct SaveStatus {
    pub path: PathBuf,
    pub result: Result<()>,
    /// Size of the written file in bytes, when the write succeeded.
    pub size: Option<u64>,
}

pub struct Saver {
    save_tx: Sender<SaveRequest>,
    save_status_rx: Receiver<SaveStatus>,
    pub pending_saves: Vec<PathBuf>,
}

impl Saver {
    pub fn new(concurrency: usize) -> Self {
        let (save_tx, save_rx) = mpsc::channel();
        let (save_status_tx, save_status_rx) = mpsc::channel();

        let rx = Arc::new(Mutex::new(save_rx));

        for _ in 0..concurrency.max(1) {
            Self::spawn_saver_thread(rx.clone(), save_status_tx.clone());
        }

        Self {
            save_tx,
            save_status_rx,
            pending_saves: Vec::new(),
        }
    }

    fn spawn_saver_thread(rx: Arc<Mutex<Receiver<SaveRequest>>>, tx: Sender<SaveStatus>) {
        thread::spawn(move || loop {
            let req = {
                let Ok(lock) = rx.lock() else { break };
                match lock.recv() {
                    Ok(req) => req,
                    Err(_) => break,
                }
            };

            let result = (|| -> Result<u64> {
                let bytes = export_png(&req.image)?;
                // Write next to the target first so a failed write never
                // leaves a truncated file behind.
                let temp_path = temp_path_for(&req.path)?;
                std::fs::write(&temp_path, &bytes)
                    .with_context(|| format!("Unable to write {}", temp_path.display()))?;
                std::fs::rename(&temp_path, &req.path).with_context(|| {
                    format!(
                        "Unable to move {} to {}",
                        temp_path.display(),
                        req.path.display()
                    )
                })?;
                Ok(bytes.len() as u64)
            })();

            match &result {
                Ok(size) => log::info!("saved {} ({size} bytes)", req.path.display()),
                Err(err) => log::error!("failed to save {}: {err:#}", req.path.display()),
            }
            let (result, size) = match result {
                Ok(size) => (Ok(()), Some(size)),
                Err(err) => (Err(err), None),
            };
            let _ = tx.send(SaveStatus {
                path: req.path,
                result,
                size,
            });
        });
    }

    pub fn queue_save(&mut self, request: SaveRequest) -> Result<()> {
        self.pending_saves.push(request.path.clone());
        self.save_tx
            .send(request)
            .map_err(|e| anyhow!("Failed to send save request: {}", e))
    }

    pub fn check_completions(&mut self) -> Vec<SaveStatus> {
        let mut completed = Vec::new();
        while let Ok(status) = self.save_status_rx.try_recv() {
            if let Some(idx) = self.pending_saves.iter().position(|p| *p == status.path) {
                self.pending_saves.remove(idx);
            }
            completed.push(status);
        }
        completed
    }
}
