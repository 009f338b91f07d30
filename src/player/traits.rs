use async_trait::async_trait;

use crate::models::{SourceUrl, SurfaceKind};
use crate::utils::errors::PlayerError;

/// Contract over one host media surface. The gallery owns exactly two
/// implementations at runtime, one for the fullscreen player and one for
/// the floating mini player, and only ever drives them through this trait.
#[async_trait]
pub trait PlaybackSurface: Send + Sync {
    /// Attach a source. Resets position to zero; duration is unknown until
    /// the surface reports metadata.
    async fn load(&self, source: &SourceUrl) -> Result<(), PlayerError>;

    /// Start playback. Hosts may reject unsolicited playback, in which
    /// case the surface stays paused and the error is non-fatal.
    async fn play(&self) -> Result<(), PlayerError>;

    async fn pause(&self);

    /// Jump to an absolute position in seconds. Out-of-range values are
    /// clamped by the surface.
    async fn seek(&self, position_secs: f64);

    async fn position(&self) -> f64;

    /// None until the surface has loaded metadata for the current source.
    async fn duration(&self) -> Option<f64>;

    async fn set_volume(&self, volume: f64);

    async fn set_rate(&self, rate: f64);

    async fn is_paused(&self) -> bool;

    /// The source currently attached, if any. Used to discard completions
    /// that arrive for a source the surface no longer hosts.
    async fn current_source(&self) -> Option<SourceUrl>;

    /// Detach the source and release the underlying media resource.
    async fn clear(&self);
}

/// Notifications surfaces push back at the controller, mirroring the host
/// media element's event set.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    Playing {
        surface: SurfaceKind,
    },
    Paused {
        surface: SurfaceKind,
    },
    TimeUpdate {
        surface: SurfaceKind,
        position_secs: f64,
    },
    Ended {
        surface: SurfaceKind,
    },
    /// Metadata finished loading for `source`. Carries the source so late
    /// completions can be matched against what the surface hosts now.
    LoadedMetadata {
        surface: SurfaceKind,
        source: SourceUrl,
        duration_secs: f64,
    },
    Error {
        surface: SurfaceKind,
        message: String,
    },
}

/// Host fullscreen capability. Requests can fail (browser policy, user
/// settings); failures are reported and playback continues unaffected.
#[async_trait]
pub trait FullscreenHost: Send + Sync {
    async fn request_fullscreen(&self) -> Result<(), PlayerError>;
    async fn exit_fullscreen(&self) -> Result<(), PlayerError>;
}
