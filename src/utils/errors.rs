use thiserror::Error;

/// Failure taxonomy for the player core. Every variant is recoverable:
/// the page stays interactive and degrades to a safe visible state.
#[derive(Error, Debug)]
pub enum PlayerError {
    #[error("Metadata unavailable: {0}")]
    MetadataUnavailable(String),

    #[error("Autoplay rejected: {0}")]
    AutoplayRejected(String),

    #[error("Fullscreen request failed: {0}")]
    FullscreenRequestFailed(String),

    #[error("Playback error: {0}")]
    Playback(String),

    #[error("Source not loaded: {0}")]
    SourceNotLoaded(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
