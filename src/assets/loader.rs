//! Asynchronous texture loading.
//!
//! The loader owns a dedicated worker thread fed through channels: the
//! control thread enqueues fetch/decode jobs and keeps running, the worker
//! reads bytes and decodes them, and completed results are applied back to
//! the [`TextureStore`] only when the control thread calls
//! [`ResourceLoader::pump`]. Resolution is always observed at a tick
//! boundary, never synchronously with the request.

use std::path::PathBuf;
use std::thread;

use serde::{Deserialize, Serialize};

use crate::assets::image::Image;
use crate::assets::store::{TextureHandle, TextureStore};
use crate::errors::{Result, ViewerError};

/// Reference to the byte source of a card face.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssetRef {
    /// An image file on disk.
    File(PathBuf),
    /// A placeholder surface synthesized in-process from its label.
    Generated { label: String },
}

impl AssetRef {
    /// Placeholder reference used when a caller supplies no asset.
    #[must_use]
    pub fn placeholder(label: impl Into<String>) -> Self {
        AssetRef::Generated {
            label: label.into(),
        }
    }

    #[must_use]
    pub fn label(&self) -> String {
        match self {
            AssetRef::File(path) => path.display().to_string(),
            AssetRef::Generated { label } => label.clone(),
        }
    }
}

enum Job {
    /// Read (or synthesize) the bytes behind an asset reference and decode.
    Fetch { handle: TextureHandle, asset: AssetRef },
    /// Decode caller-supplied bytes (file-input re-texture path).
    Decode {
        handle: TextureHandle,
        label: String,
        bytes: Vec<u8>,
    },
}

/// Outcome of one load, delivered on the control thread by `pump`.
pub struct LoadEvent {
    pub handle: TextureHandle,
    pub label: String,
    pub outcome: Result<Image>,
}

/// Texture loading front end: slot registry plus the decode worker.
pub struct ResourceLoader {
    store: TextureStore,
    jobs: flume::Sender<Job>,
    results: flume::Receiver<LoadEvent>,
    in_flight: usize,
}

impl Default for ResourceLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceLoader {
    /// Creates the loader and spawns its worker thread. The worker exits when
    /// the loader (and with it the job sender) is dropped.
    #[must_use]
    pub fn new() -> Self {
        let (job_tx, job_rx) = flume::unbounded::<Job>();
        let (result_tx, result_rx) = flume::unbounded::<LoadEvent>();

        thread::Builder::new()
            .name("deckview-asset-loader".into())
            .spawn(move || run_worker(&job_rx, &result_tx))
            .expect("failed to spawn asset loader thread");

        Self {
            store: TextureStore::new(),
            jobs: job_tx,
            results: result_rx,
            in_flight: 0,
        }
    }

    /// Registers a `Loading` slot for the asset and enqueues its fetch.
    /// Never blocks; readiness arrives through [`ResourceLoader::pump`].
    pub fn request(&mut self, asset: &AssetRef) -> TextureHandle {
        let label = asset.label();
        let handle = self.store.insert_loading(&label);
        self.enqueue(Job::Fetch {
            handle,
            asset: asset.clone(),
        });
        handle
    }

    /// Enqueues a decode of caller-supplied bytes into an existing slot.
    /// Empty input is rejected up front, before any state changes.
    pub fn decode_into(
        &mut self,
        handle: TextureHandle,
        label: &str,
        bytes: Vec<u8>,
    ) -> Result<()> {
        if bytes.is_empty() {
            return Err(ViewerError::InvalidInput("No file selected".into()));
        }
        if !self.store.contains(handle) {
            return Err(ViewerError::InvalidInput(format!(
                "Unknown texture slot for {label}"
            )));
        }
        self.enqueue(Job::Decode {
            handle,
            label: label.to_string(),
            bytes,
        });
        Ok(())
    }

    /// Drains completed loads, applies them to the store, and returns the
    /// events so the session can route face updates and error reports.
    pub fn pump(&mut self) -> Vec<LoadEvent> {
        let events: Vec<LoadEvent> = self.results.try_iter().collect();
        self.in_flight = self.in_flight.saturating_sub(events.len());
        for event in &events {
            match &event.outcome {
                Ok(image) => self.store.resolve(event.handle, image),
                Err(_) => self.store.fail(event.handle),
            }
        }
        events
    }

    /// Releases a texture slot. Idempotent; a result still in flight for the
    /// handle is discarded when it arrives.
    pub fn release(&mut self, handle: TextureHandle) {
        self.store.release(handle);
    }

    #[must_use]
    pub fn store(&self) -> &TextureStore {
        &self.store
    }

    /// True while any load has been enqueued but not yet pumped.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.in_flight > 0
    }

    fn enqueue(&mut self, job: Job) {
        // Send only fails when the worker is gone, which means the process
        // is shutting down; the slot then just stays `Loading`.
        if self.jobs.send(job).is_ok() {
            self.in_flight += 1;
        } else {
            log::warn!("asset loader worker is gone; load request dropped");
        }
    }
}

fn run_worker(jobs: &flume::Receiver<Job>, results: &flume::Sender<LoadEvent>) {
    for job in jobs.iter() {
        let event = match job {
            Job::Fetch { handle, asset } => {
                let label = asset.label();
                LoadEvent {
                    handle,
                    outcome: fetch(&asset),
                    label,
                }
            }
            Job::Decode {
                handle,
                label,
                bytes,
            } => LoadEvent {
                handle,
                outcome: decode(&label, &bytes),
                label,
            },
        };
        if results.send(event).is_err() {
            break;
        }
    }
}

fn fetch(asset: &AssetRef) -> Result<Image> {
    match asset {
        AssetRef::Generated { label } => Ok(Image::placeholder(label)),
        AssetRef::File(path) => {
            let bytes = std::fs::read(path).map_err(|source| ViewerError::AssetIo {
                path: path.display().to_string(),
                source,
            })?;
            decode(&path.display().to_string(), &bytes)
        }
    }
}

fn decode(label: &str, bytes: &[u8]) -> Result<Image> {
    let decoded = image::load_from_memory(bytes)
        .map_err(|e| ViewerError::ImageDecode(format!("{label}: {e}")))?;
    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(Image::new(label, width, height, rgba.into_raw()))
}
