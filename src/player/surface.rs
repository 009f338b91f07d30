use std::sync::Arc;
use tracing::{debug, warn};

use crate::models::{PlaybackRate, SourceUrl, SurfaceKind};
use crate::utils::errors::PlayerError;

use super::traits::PlaybackSurface;

/// Uniform access to the two host surfaces plus the playback bookkeeping
/// they share. The controller addresses surfaces only by kind; nothing
/// above this layer knows which concrete implementation is behind either.
pub struct SurfaceAdapter {
    fullscreen: Arc<dyn PlaybackSurface>,
    mini: Arc<dyn PlaybackSurface>,
}

impl SurfaceAdapter {
    pub fn new(fullscreen: Arc<dyn PlaybackSurface>, mini: Arc<dyn PlaybackSurface>) -> Self {
        Self { fullscreen, mini }
    }

    pub fn surface(&self, kind: SurfaceKind) -> &Arc<dyn PlaybackSurface> {
        match kind {
            SurfaceKind::Fullscreen => &self.fullscreen,
            SurfaceKind::Mini => &self.mini,
        }
    }

    pub async fn load(&self, kind: SurfaceKind, source: &SourceUrl) -> Result<(), PlayerError> {
        debug!("Loading {} onto {:?} surface", source, kind);
        self.surface(kind).load(source).await
    }

    /// Start playback. Autoplay rejection comes back as an error; the
    /// caller decides how to reflect it, nothing is retried here.
    pub async fn play(&self, kind: SurfaceKind) -> Result<(), PlayerError> {
        self.surface(kind).play().await
    }

    pub async fn pause(&self, kind: SurfaceKind) {
        self.surface(kind).pause().await;
    }

    pub async fn clear(&self, kind: SurfaceKind) {
        self.surface(kind).clear().await;
    }

    pub async fn is_paused(&self, kind: SurfaceKind) -> bool {
        self.surface(kind).is_paused().await
    }

    pub async fn position(&self, kind: SurfaceKind) -> f64 {
        self.surface(kind).position().await
    }

    pub async fn duration(&self, kind: SurfaceKind) -> Option<f64> {
        self.surface(kind).duration().await
    }

    pub async fn set_volume(&self, kind: SurfaceKind, volume: f64) {
        self.surface(kind).set_volume(volume).await;
    }

    pub async fn set_rate(&self, kind: SurfaceKind, rate: PlaybackRate) {
        self.surface(kind).set_rate(rate.as_f64()).await;
    }

    /// Attach whatever `from` is hosting onto `to`. Nothing to copy is
    /// not an error; the destination is simply left alone.
    pub async fn copy_source(&self, from: SurfaceKind, to: SurfaceKind) -> Result<(), PlayerError> {
        match self.surface(from).current_source().await {
            Some(source) => self.surface(to).load(&source).await,
            None => {
                warn!("No source on {:?} surface to copy", from);
                Ok(())
            }
        }
    }

    /// Carry the playback position from one surface to the other. Must
    /// run before the origin surface is cleared.
    pub async fn copy_position(&self, from: SurfaceKind, to: SurfaceKind) {
        let position = self.surface(from).position().await;
        self.surface(to).seek(position).await;
    }

    /// Seek by progress-bar fraction. Quietly does nothing until the
    /// surface knows its duration, so a click during metadata load cannot
    /// jump anywhere. Returns the position actually seeked to.
    pub async fn seek_to_fraction(&self, kind: SurfaceKind, fraction: f64) -> Option<f64> {
        let surface = self.surface(kind);
        let Some(duration) = surface.duration().await else {
            debug!("Ignoring fractional seek on {:?}: duration unknown", kind);
            return None;
        };
        let target = fraction.clamp(0.0, 1.0) * duration;
        surface.seek(target).await;
        Some(target)
    }

    /// Seek relative to the current position, clamped into [0, duration].
    /// Does nothing until the duration is known. Returns the position
    /// actually seeked to.
    pub async fn seek_relative(&self, kind: SurfaceKind, delta_secs: f64) -> Option<f64> {
        let surface = self.surface(kind);
        let Some(duration) = surface.duration().await else {
            debug!("Ignoring relative seek on {:?}: duration unknown", kind);
            return None;
        };
        let target = (surface.position().await + delta_secs).clamp(0.0, duration);
        surface.seek(target).await;
        Some(target)
    }

    /// Whether a metadata completion for `source` still applies to what
    /// the surface hosts. Completions for replaced sources are stale and
    /// must be dropped.
    pub async fn accepts_metadata(&self, kind: SurfaceKind, source: &SourceUrl) -> bool {
        self.surface(kind).current_source().await.as_ref() == Some(source)
    }
}
