use std::{
    path::PathBuf,
    sync::{
        mpsc::{self, Receiver, Sender},
        Arc,
    },
    thread,
    time::{Duration, Instant},
};

use image::RgbaImage;

use crate::{
    buffer::decode_image,
    error::{EditorError, Result},
};

#[derive(Clone, Debug)]
pub enum LoadSource {
    Path(PathBuf),
    Bytes { name: String, bytes: Arc<[u8]> },
}

impl LoadSource {
    pub fn label(&self) -> String {
        match self {
            LoadSource::Path(path) => path.display().to_string(),
            LoadSource::Bytes { name, .. } => name.clone(),
        }
    }

    fn read(&self) -> Result<Arc<[u8]>> {
        match self {
            LoadSource::Path(path) => std::fs::read(path)
                .map(Arc::from)
                .map_err(|source| EditorError::Io {
                    path: path.clone(),
                    source,
                }),
            LoadSource::Bytes { bytes, .. } => Ok(Arc::clone(bytes)),
        }
    }
}

struct LoadRequest {
    generation: u64,
    source: LoadSource,
}

pub struct LoadedImage {
    pub generation: u64,
    pub label: String,
    pub result: Result<RgbaImage>,
    pub load_duration: Duration,
}

/// Decodes images on a background thread.
///
/// Every request gets a new generation; only the newest one is handed back
/// from [`Loader::poll`], so a later request supersedes any decode still in
/// flight.
pub struct Loader {
    request_tx: Sender<LoadRequest>,
    loaded_rx: Receiver<LoadedImage>,
    generation: u64,
    pub loading_active: bool,
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

impl Loader {
    pub fn new() -> Self {
        Self::with_max_size(None)
    }

    /// Loader whose decodes are downscaled to fit `max_size`, when given.
    pub fn with_max_size(max_size: Option<(u32, u32)>) -> Self {
        let (request_tx, loaded_rx) = Self::spawn_decoder(max_size);
        Self {
            request_tx,
            loaded_rx,
            generation: 0,
            loading_active: false,
        }
    }

    fn spawn_decoder(
        max_size: Option<(u32, u32)>,
    ) -> (Sender<LoadRequest>, Receiver<LoadedImage>) {
        let (request_tx, request_rx) = mpsc::channel::<LoadRequest>();
        let (loaded_tx, loaded_rx) = mpsc::channel();

        thread::spawn(move || {
            while let Ok(request) = request_rx.recv() {
                let start = Instant::now();
                let label = request.source.label();
                let result = request
                    .source
                    .read()
                    .and_then(|bytes| decode_image(&bytes, max_size));
                if let Err(err) = &result {
                    log::warn!("failed to load {label}: {err}");
                }
                let loaded = LoadedImage {
                    generation: request.generation,
                    label,
                    result,
                    load_duration: start.elapsed(),
                };
                if loaded_tx.send(loaded).is_err() {
                    break;
                }
            }
        });
        (request_tx, loaded_rx)
    }

    /// Queues a decode and returns its generation.
    pub fn load(&mut self, source: LoadSource) -> u64 {
        self.generation += 1;
        self.loading_active = true;
        log::debug!("loading {} as generation {}", source.label(), self.generation);
        let request = LoadRequest {
            generation: self.generation,
            source,
        };
        if self.request_tx.send(request).is_err() {
            log::error!("decoder thread is gone");
            self.loading_active = false;
        }
        self.generation
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Drains finished decodes, returning the newest one if it belongs to
    /// the latest request. Superseded results are dropped.
    pub fn poll(&mut self) -> Option<LoadedImage> {
        let mut latest = None;
        while let Ok(loaded) = self.loaded_rx.try_recv() {
            if loaded.generation == self.generation {
                latest = Some(loaded);
            } else {
                log::debug!(
                    "discarding superseded load of {} (generation {})",
                    loaded.label,
                    loaded.generation
                );
            }
        }
        if latest.is_some() {
            self.loading_active = false;
        }
        latest
    }
}
