use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, mpsc};
use tracing::debug;

use crate::models::{SourceUrl, SurfaceKind};
use crate::utils::errors::PlayerError;

use super::traits::{FullscreenHost, PlaybackSurface, SurfaceEvent};

const DEFAULT_METADATA_DELAY: Duration = Duration::from_millis(25);
const DEFAULT_TICK: Duration = Duration::from_millis(250);

/// In-process stand-in for a host media element. Position advances on a
/// monotonic clock while playing; metadata resolves on a spawned task
/// after a short delay, like a real element's asynchronous load. Known
/// durations come from a fixed table, anything else reports an error.
pub struct SimulatedSurface {
    kind: SurfaceKind,
    inner: Arc<Mutex<Inner>>,
    events: mpsc::UnboundedSender<SurfaceEvent>,
    metadata: Arc<HashMap<SourceUrl, f64>>,
    reject_autoplay: Arc<AtomicBool>,
    metadata_delay: Duration,
    tick: Duration,
}

struct Inner {
    source: Option<SourceUrl>,
    duration: Option<f64>,
    /// Position accumulated up to `started_at`; the live position adds the
    /// elapsed wall time scaled by rate.
    base_position: f64,
    started_at: Option<Instant>,
    volume: f64,
    rate: f64,
    /// Bumped on every load and clear. Metadata and ticker tasks from an
    /// earlier source compare against it and stand down.
    generation: u64,
}

impl Inner {
    fn live_position(&self) -> f64 {
        let mut position = self.base_position;
        if let Some(started_at) = self.started_at {
            position += started_at.elapsed().as_secs_f64() * self.rate;
        }
        match self.duration {
            Some(duration) => position.clamp(0.0, duration),
            None => position.max(0.0),
        }
    }

    /// Fold elapsed play time into the base so rate changes and pauses
    /// take effect from the current instant.
    fn settle(&mut self) {
        self.base_position = self.live_position();
        if self.started_at.is_some() {
            self.started_at = Some(Instant::now());
        }
    }
}

impl SimulatedSurface {
    pub fn new(
        kind: SurfaceKind,
        events: mpsc::UnboundedSender<SurfaceEvent>,
        metadata: Arc<HashMap<SourceUrl, f64>>,
    ) -> Self {
        Self::with_timing(kind, events, metadata, DEFAULT_METADATA_DELAY, DEFAULT_TICK)
    }

    /// Variant with explicit timings so tests can run tight.
    pub fn with_timing(
        kind: SurfaceKind,
        events: mpsc::UnboundedSender<SurfaceEvent>,
        metadata: Arc<HashMap<SourceUrl, f64>>,
        metadata_delay: Duration,
        tick: Duration,
    ) -> Self {
        Self {
            kind,
            inner: Arc::new(Mutex::new(Inner {
                source: None,
                duration: None,
                base_position: 0.0,
                started_at: None,
                volume: 1.0,
                rate: 1.0,
                generation: 0,
            })),
            events,
            metadata,
            reject_autoplay: Arc::new(AtomicBool::new(false)),
            metadata_delay,
            tick,
        }
    }

    /// Make the next play() calls fail the way a host rejects unsolicited
    /// autoplay.
    pub fn set_reject_autoplay(&self, reject: bool) {
        self.reject_autoplay.store(reject, Ordering::SeqCst);
    }

    fn send(&self, event: SurfaceEvent) {
        // Receiver going away just means nobody is listening anymore.
        let _ = self.events.send(event);
    }

    fn spawn_metadata_task(&self, generation: u64, source: SourceUrl) {
        let inner = self.inner.clone();
        let events = self.events.clone();
        let metadata = self.metadata.clone();
        let delay = self.metadata_delay;
        let kind = self.kind;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut guard = inner.lock().await;
            if guard.generation != generation {
                debug!("Dropping metadata for superseded load of {}", source);
                return;
            }
            match metadata.get(&source) {
                Some(&duration) => {
                    guard.duration = Some(duration);
                    drop(guard);
                    let _ = events.send(SurfaceEvent::LoadedMetadata {
                        surface: kind,
                        source,
                        duration_secs: duration,
                    });
                }
                None => {
                    drop(guard);
                    let _ = events.send(SurfaceEvent::Error {
                        surface: kind,
                        message: format!("no metadata for {source}"),
                    });
                }
            }
        });
    }

    fn spawn_ticker(&self, generation: u64) {
        let inner = self.inner.clone();
        let events = self.events.clone();
        let tick = self.tick;
        let kind = self.kind;
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(tick).await;
                let mut guard = inner.lock().await;
                if guard.generation != generation || guard.started_at.is_none() {
                    return;
                }
                let position = guard.live_position();
                if let Some(duration) = guard.duration
                    && position >= duration
                {
                    guard.base_position = duration;
                    guard.started_at = None;
                    drop(guard);
                    let _ = events.send(SurfaceEvent::Ended { surface: kind });
                    return;
                }
                drop(guard);
                let _ = events.send(SurfaceEvent::TimeUpdate {
                    surface: kind,
                    position_secs: position,
                });
            }
        });
    }
}

#[async_trait]
impl PlaybackSurface for SimulatedSurface {
    async fn load(&self, source: &SourceUrl) -> Result<(), PlayerError> {
        let generation = {
            let mut inner = self.inner.lock().await;
            inner.generation += 1;
            inner.source = Some(source.clone());
            inner.duration = None;
            inner.base_position = 0.0;
            inner.started_at = None;
            // Loading new media resets the element's playback rate.
            inner.rate = 1.0;
            inner.generation
        };
        debug!("{:?} surface loading {}", self.kind, source);
        self.spawn_metadata_task(generation, source.clone());
        Ok(())
    }

    async fn play(&self) -> Result<(), PlayerError> {
        if self.reject_autoplay.load(Ordering::SeqCst) {
            return Err(PlayerError::AutoplayRejected(
                "host rejected unsolicited playback".to_string(),
            ));
        }
        let generation = {
            let mut inner = self.inner.lock().await;
            if inner.source.is_none() {
                return Err(PlayerError::SourceNotLoaded(format!(
                    "{:?} surface has no source",
                    self.kind
                )));
            }
            if inner.started_at.is_none() {
                inner.started_at = Some(Instant::now());
            }
            inner.generation
        };
        self.spawn_ticker(generation);
        self.send(SurfaceEvent::Playing { surface: self.kind });
        Ok(())
    }

    async fn pause(&self) {
        {
            let mut inner = self.inner.lock().await;
            inner.settle();
            inner.started_at = None;
        }
        self.send(SurfaceEvent::Paused { surface: self.kind });
    }

    async fn seek(&self, position_secs: f64) {
        let mut inner = self.inner.lock().await;
        let target = match inner.duration {
            Some(duration) => position_secs.clamp(0.0, duration),
            None => position_secs.max(0.0),
        };
        inner.base_position = target;
        if inner.started_at.is_some() {
            inner.started_at = Some(Instant::now());
        }
    }

    async fn position(&self) -> f64 {
        self.inner.lock().await.live_position()
    }

    async fn duration(&self) -> Option<f64> {
        self.inner.lock().await.duration
    }

    async fn set_volume(&self, volume: f64) {
        self.inner.lock().await.volume = volume.clamp(0.0, 1.0);
    }

    async fn set_rate(&self, rate: f64) {
        let mut inner = self.inner.lock().await;
        inner.settle();
        inner.rate = rate;
    }

    async fn is_paused(&self) -> bool {
        self.inner.lock().await.started_at.is_none()
    }

    async fn current_source(&self) -> Option<SourceUrl> {
        self.inner.lock().await.source.clone()
    }

    async fn clear(&self) {
        let mut inner = self.inner.lock().await;
        inner.generation += 1;
        inner.source = None;
        inner.duration = None;
        inner.base_position = 0.0;
        inner.started_at = None;
        inner.rate = 1.0;
    }
}

/// Fullscreen host whose requests always succeed unless told to fail,
/// standing in for browser fullscreen policy.
#[derive(Default)]
pub struct SimulatedFullscreenHost {
    fail_requests: AtomicBool,
}

impl SimulatedFullscreenHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_requests(&self, fail: bool) {
        self.fail_requests.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl FullscreenHost for SimulatedFullscreenHost {
    async fn request_fullscreen(&self) -> Result<(), PlayerError> {
        if self.fail_requests.load(Ordering::SeqCst) {
            return Err(PlayerError::FullscreenRequestFailed(
                "host denied the request".to_string(),
            ));
        }
        Ok(())
    }

    async fn exit_fullscreen(&self) -> Result<(), PlayerError> {
        Ok(())
    }
}
