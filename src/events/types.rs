use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::{PlaybackRate, PlayerMode, QualityLevel, SourceUrl, SurfaceKind};

/// Main gallery event type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryEvent {
    pub id: String,
    pub event_type: EventType,
    pub payload: EventPayload,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub source: EventSource,
    pub priority: EventPriority,
    pub metadata: HashMap<String, serde_json::Value>,
}

impl GalleryEvent {
    pub fn new(event_type: EventType, payload: EventPayload) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            event_type,
            payload,
            timestamp: chrono::Utc::now(),
            source: EventSource::System,
            priority: EventPriority::Normal,
            metadata: HashMap::new(),
        }
    }

    pub fn with_source(mut self, source: EventSource) -> Self {
        self.source = source;
        self
    }

    pub fn with_priority(mut self, priority: EventPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_metadata(mut self, key: String, value: serde_json::Value) -> Self {
        self.metadata.insert(key, value);
        self
    }
}

/// Event types
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum EventType {
    // Player mode events
    PlayerOpened,
    PlayerMinimized,
    PlayerRestored,
    PlayerClosed,
    TrackChanged,

    // Playback events
    PlaybackStarted,
    PlaybackPaused,
    PlaybackEnded,
    PositionUpdated,
    SeekPerformed,
    MetadataLoaded,
    AutoplayBlocked,
    PlaybackError,

    // Control events
    VolumeChanged,
    RateChanged,
    QualityChanged,

    // Settings menu events
    MenuOpened,
    MenuClosed,
    SubmenuOpened,

    // Mini player events
    MiniPlayerMoved,

    // Fullscreen host events
    FullscreenEntered,
    FullscreenExited,
    FullscreenFailed,

    // Catalog events
    CatalogEntryAdded,
    DurationResolved,
    DurationProbeFailed,
}

/// Event payload containing specific data for each event type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EventPayload {
    Player {
        index: Option<usize>,
        mode: PlayerMode,
    },
    Track {
        index: usize,
        source: SourceUrl,
        title: String,
    },
    Playback {
        index: Option<usize>,
        position_secs: Option<f64>,
        duration_secs: Option<f64>,
    },
    Seek {
        surface: SurfaceKind,
        position_secs: f64,
    },
    Volume {
        volume: f64,
    },
    Rate {
        rate: PlaybackRate,
    },
    Quality {
        quality: QualityLevel,
    },
    Menu {
        pane: String,
    },
    Mini {
        x: f64,
        y: f64,
    },
    Catalog {
        index: usize,
        source: SourceUrl,
    },
    Duration {
        source: SourceUrl,
        text: String,
    },
    System {
        message: String,
        details: Option<serde_json::Value>,
    },
}

/// Event source indicating where the event originated
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EventSource {
    System,
    Machine,
    Surface(String),
    Prober,
    Menu,
    Drag,
    User(String),
}

/// Event priority for processing order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, PartialOrd)]
pub enum EventPriority {
    Low = 0,
    Normal = 1,
    High = 2,
    Critical = 3,
}

impl EventType {
    /// Get a string representation for filtering/routing
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::PlayerOpened => "player.opened",
            EventType::PlayerMinimized => "player.minimized",
            EventType::PlayerRestored => "player.restored",
            EventType::PlayerClosed => "player.closed",
            EventType::TrackChanged => "player.track_changed",
            EventType::PlaybackStarted => "playback.started",
            EventType::PlaybackPaused => "playback.paused",
            EventType::PlaybackEnded => "playback.ended",
            EventType::PositionUpdated => "playback.position_updated",
            EventType::SeekPerformed => "playback.seek_performed",
            EventType::MetadataLoaded => "playback.metadata_loaded",
            EventType::AutoplayBlocked => "playback.autoplay_blocked",
            EventType::PlaybackError => "playback.error",
            EventType::VolumeChanged => "controls.volume_changed",
            EventType::RateChanged => "controls.rate_changed",
            EventType::QualityChanged => "controls.quality_changed",
            EventType::MenuOpened => "menu.opened",
            EventType::MenuClosed => "menu.closed",
            EventType::SubmenuOpened => "menu.submenu_opened",
            EventType::MiniPlayerMoved => "mini.moved",
            EventType::FullscreenEntered => "fullscreen.entered",
            EventType::FullscreenExited => "fullscreen.exited",
            EventType::FullscreenFailed => "fullscreen.failed",
            EventType::CatalogEntryAdded => "catalog.entry_added",
            EventType::DurationResolved => "catalog.duration_resolved",
            EventType::DurationProbeFailed => "catalog.duration_probe_failed",
        }
    }
}
