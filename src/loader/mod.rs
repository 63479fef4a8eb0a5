//! Background asset loading.
//!
//! Each asset is fetched and decoded on its own named thread. Results come
//! back as [`AssetEvent`]s over a channel that the render loop drains with
//! [`AssetLoader::poll`] once per frame, so loading never blocks drawing.
//!
//! Workers share a liveness flag with the loader. Dropping the loader clears
//! it, and a worker that finishes afterwards discards its result instead of
//! delivering it.

pub mod environment;
pub mod model;
pub mod source;

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};

pub use environment::decode_environment;
pub use model::decode_gltf;
pub use source::AssetSource;

use crate::error::VitrineError;
use crate::scene::{EnvironmentMap, ModelMesh};

/// Which asset an event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    /// The HDR lighting environment.
    Environment,
    /// The glTF model.
    Model,
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Environment => f.write_str("environment"),
            Self::Model => f.write_str("model"),
        }
    }
}

/// Failure to fetch or decode an asset.
#[derive(Debug)]
pub enum AssetLoadError {
    /// Network request failed or returned an error status.
    Fetch(String),
    /// Local file could not be read.
    Io(std::io::Error),
    /// Bytes were fetched but are not a valid asset.
    Decode(String),
    /// The model decoded but contains no triangles.
    EmptyModel,
    /// The asset exceeded the size limit.
    TooLarge {
        /// The limit in bytes.
        limit: u64,
    },
}

impl fmt::Display for AssetLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetch(msg) => write!(f, "fetch failed: {msg}"),
            Self::Io(e) => write!(f, "read failed: {e}"),
            Self::Decode(msg) => write!(f, "decode failed: {msg}"),
            Self::EmptyModel => f.write_str("model has no triangles"),
            Self::TooLarge { limit } => {
                write!(f, "asset larger than {limit} bytes")
            }
        }
    }
}

impl std::error::Error for AssetLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for AssetLoadError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

/// Notification from a loader thread.
#[derive(Debug)]
pub enum AssetEvent {
    /// Bytes received so far, as a fraction in `[0, 1]`.
    Progress {
        /// Asset being fetched.
        kind: AssetKind,
        /// Fraction loaded.
        fraction: f32,
    },
    /// The environment map finished decoding.
    EnvironmentLoaded(EnvironmentMap),
    /// The model finished decoding.
    ModelLoaded(ModelMesh),
    /// Loading stopped with an error. Not retried.
    Failed {
        /// Asset that failed.
        kind: AssetKind,
        /// Why it failed.
        error: AssetLoadError,
    },
}

impl AssetEvent {
    /// `true` for the last event a load will produce.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Progress { .. })
    }
}

/// Sending half handed to a worker thread.
struct Delivery {
    kind: AssetKind,
    tx: mpsc::Sender<AssetEvent>,
    alive: Arc<AtomicBool>,
    last_percent: Option<u32>,
}

impl Delivery {
    /// Forward `event` if the loader is still alive. Returns whether it was
    /// delivered.
    fn send(&self, event: AssetEvent) -> bool {
        if !self.alive.load(Ordering::Acquire) {
            return false;
        }
        self.tx.send(event).is_ok()
    }

    /// Report progress, at most once per whole percent.
    fn progress(&mut self, fraction: f32) {
        let fraction = if fraction.is_finite() {
            fraction.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let percent = (fraction * 100.0).floor() as u32;
        if self.last_percent == Some(percent) {
            return;
        }
        self.last_percent = Some(percent);
        let _ = self.send(AssetEvent::Progress {
            kind: self.kind,
            fraction,
        });
    }
}

/// Spawns asset loads and collects their events.
pub struct AssetLoader {
    tx: mpsc::Sender<AssetEvent>,
    rx: mpsc::Receiver<AssetEvent>,
    alive: Arc<AtomicBool>,
    pending: usize,
}

impl AssetLoader {
    /// Create a loader with no loads in flight.
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            tx,
            rx,
            alive: Arc::new(AtomicBool::new(true)),
            pending: 0,
        }
    }

    /// Fetch and decode an equirectangular environment image in the
    /// background.
    ///
    /// # Errors
    ///
    /// Returns [`VitrineError::ThreadSpawn`] if the worker thread cannot be
    /// started.
    pub fn spawn_environment(
        &mut self,
        source: AssetSource,
    ) -> Result<(), VitrineError> {
        self.spawn(AssetKind::Environment, move |on_progress| {
            let bytes = source.fetch(on_progress)?;
            decode_environment(&bytes).map(AssetEvent::EnvironmentLoaded)
        })
    }

    /// Fetch and decode a glTF model in the background.
    ///
    /// # Errors
    ///
    /// Returns [`VitrineError::ThreadSpawn`] if the worker thread cannot be
    /// started.
    pub fn spawn_model(
        &mut self,
        source: AssetSource,
    ) -> Result<(), VitrineError> {
        self.spawn(AssetKind::Model, move |on_progress| {
            let bytes = source.fetch(on_progress)?;
            decode_gltf(&bytes, source.base_dir()).map(AssetEvent::ModelLoaded)
        })
    }

    fn spawn<F>(&mut self, kind: AssetKind, job: F) -> Result<(), VitrineError>
    where
        F: FnOnce(&mut dyn FnMut(f32)) -> Result<AssetEvent, AssetLoadError>
            + Send
            + 'static,
    {
        let mut delivery = Delivery {
            kind,
            tx: self.tx.clone(),
            alive: Arc::clone(&self.alive),
            last_percent: None,
        };
        let _handle = std::thread::Builder::new()
            .name(format!("{kind}-loader"))
            .spawn(move || {
                let result = job(&mut |fraction| delivery.progress(fraction));
                let event = result
                    .unwrap_or_else(|error| AssetEvent::Failed { kind, error });
                if !delivery.send(event) {
                    log::debug!("{kind} load finished after shutdown");
                }
            })
            .map_err(VitrineError::ThreadSpawn)?;
        self.pending += 1;
        Ok(())
    }

    /// Drain every event delivered so far without blocking.
    pub fn poll(&mut self) -> Vec<AssetEvent> {
        let events: Vec<AssetEvent> = self.rx.try_iter().collect();
        let finished = events.iter().filter(|e| e.is_terminal()).count();
        self.pending = self.pending.saturating_sub(finished);
        events
    }

    /// Number of loads that have not delivered a final event yet.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending
    }
}

impl Default for AssetLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for AssetLoader {
    fn drop(&mut self) {
        self.alive.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;

    fn wait_for_terminal(loader: &mut AssetLoader) -> Vec<AssetEvent> {
        let deadline = Instant::now() + Duration::from_secs(10);
        let mut events = Vec::new();
        while Instant::now() < deadline {
            events.extend(loader.poll());
            if events.iter().any(AssetEvent::is_terminal) {
                return events;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        events
    }

    fn delivery(alive: bool) -> (Delivery, mpsc::Receiver<AssetEvent>) {
        let (tx, rx) = mpsc::channel();
        let delivery = Delivery {
            kind: AssetKind::Model,
            tx,
            alive: Arc::new(AtomicBool::new(alive)),
            last_percent: None,
        };
        (delivery, rx)
    }

    #[test]
    fn missing_model_file_fails_without_panicking() {
        let mut loader = AssetLoader::new();
        loader
            .spawn_model(AssetSource::parse("/no/such/dir/helmet.gltf"))
            .unwrap();
        assert_eq!(loader.pending(), 1);
        let events = wait_for_terminal(&mut loader);
        assert!(matches!(
            events.last(),
            Some(AssetEvent::Failed {
                kind: AssetKind::Model,
                error: AssetLoadError::Io(_),
            })
        ));
        assert_eq!(loader.pending(), 0);
    }

    #[test]
    fn local_environment_loads_with_progress() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sky.hdr");
        let mut bytes =
            b"#?RADIANCE\nFORMAT=32-bit_rle_rgbe\n\n-Y 1 +X 1\n".to_vec();
        bytes.extend_from_slice(&[128, 128, 128, 129]);
        std::fs::write(&path, bytes).unwrap();

        let mut loader = AssetLoader::new();
        loader
            .spawn_environment(AssetSource::Path(path))
            .unwrap();
        let events = wait_for_terminal(&mut loader);

        let fractions: Vec<f32> = events
            .iter()
            .filter_map(|e| match e {
                AssetEvent::Progress { fraction, .. } => Some(*fraction),
                _ => None,
            })
            .collect();
        assert_eq!(fractions.last().copied(), Some(1.0));
        assert!(
            matches!(
                events.last(),
                Some(AssetEvent::EnvironmentLoaded(map))
                    if (map.width(), map.height()) == (1, 1)
            ),
            "{events:?}"
        );
    }

    #[test]
    fn nothing_delivered_after_shutdown() {
        let (delivery, rx) = delivery(false);
        assert!(!delivery.send(AssetEvent::Failed {
            kind: AssetKind::Model,
            error: AssetLoadError::EmptyModel,
        }));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn dropping_loader_clears_liveness() {
        let loader = AssetLoader::new();
        let alive = Arc::clone(&loader.alive);
        drop(loader);
        assert!(!alive.load(Ordering::Acquire));
    }

    #[test]
    fn progress_clamped_and_throttled() {
        let (mut delivery, rx) = delivery(true);
        delivery.progress(0.101);
        delivery.progress(0.104);
        delivery.progress(1.7);
        delivery.progress(f32::NAN);
        let events: Vec<AssetEvent> = rx.try_iter().collect();
        let fractions: Vec<f32> = events
            .iter()
            .filter_map(|e| match e {
                AssetEvent::Progress { fraction, .. } => Some(*fraction),
                _ => None,
            })
            .collect();
        assert_eq!(fractions.len(), events.len());
        assert_eq!(fractions, vec![0.101, 1.0, 0.0]);
    }
}
