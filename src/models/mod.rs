pub mod identifiers;

pub use identifiers::SourceUrl;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One selectable video as the gallery knows it: where it lives, what the
/// card says about it, and what probing has found out so far.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub index: usize,
    pub source: SourceUrl,
    pub title: String,
    /// Duration text declared on the card markup, if any. Used as the
    /// fallback badge when probing fails.
    pub declared_duration: Option<String>,
    /// Duration text resolved by the prober. Absent until a probe for this
    /// source completes.
    pub probed_duration: Option<String>,
}

impl CatalogEntry {
    pub fn new(
        index: usize,
        source: SourceUrl,
        title: impl Into<String>,
        declared_duration: Option<String>,
    ) -> Self {
        Self {
            index,
            source,
            title: title.into(),
            declared_duration,
            probed_duration: None,
        }
    }

    /// Text currently shown on the card's duration badge.
    pub fn duration_badge(&self) -> &str {
        self.probed_duration
            .as_deref()
            .or(self.declared_duration.as_deref())
            .unwrap_or(crate::constants::FALLBACK_DURATION)
    }
}

/// Where playback currently lives on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlayerMode {
    #[default]
    Closed,
    Fullscreen,
    Minimized,
}

/// The two host media surfaces the page owns. Exactly one is active
/// whenever the player is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SurfaceKind {
    Fullscreen,
    Mini,
}

/// Playback speed steps offered by the settings menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PlaybackRate {
    X0_25,
    X0_5,
    X0_75,
    #[default]
    Normal,
    X1_25,
    X1_5,
    X1_75,
    X2,
}

impl PlaybackRate {
    pub fn as_f64(&self) -> f64 {
        match self {
            PlaybackRate::X0_25 => 0.25,
            PlaybackRate::X0_5 => 0.5,
            PlaybackRate::X0_75 => 0.75,
            PlaybackRate::Normal => 1.0,
            PlaybackRate::X1_25 => 1.25,
            PlaybackRate::X1_5 => 1.5,
            PlaybackRate::X1_75 => 1.75,
            PlaybackRate::X2 => 2.0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PlaybackRate::X0_25 => "0.25x",
            PlaybackRate::X0_5 => "0.5x",
            PlaybackRate::X0_75 => "0.75x",
            PlaybackRate::Normal => "Normal",
            PlaybackRate::X1_25 => "1.25x",
            PlaybackRate::X1_5 => "1.5x",
            PlaybackRate::X1_75 => "1.75x",
            PlaybackRate::X2 => "2x",
        }
    }

    pub fn all() -> [PlaybackRate; 8] {
        [
            PlaybackRate::X0_25,
            PlaybackRate::X0_5,
            PlaybackRate::X0_75,
            PlaybackRate::Normal,
            PlaybackRate::X1_25,
            PlaybackRate::X1_5,
            PlaybackRate::X1_75,
            PlaybackRate::X2,
        ]
    }

    /// Parse the menu label form, as stored in the config file.
    pub fn from_label(label: &str) -> Option<Self> {
        RATE_BY_LABEL.get(label).copied()
    }
}

static RATE_BY_LABEL: Lazy<HashMap<&'static str, PlaybackRate>> = Lazy::new(|| {
    PlaybackRate::all()
        .iter()
        .map(|rate| (rate.label(), *rate))
        .collect()
});

/// Quality choices in the settings menu. Selection is remembered and shown
/// on the menu but never changes the loaded source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum QualityLevel {
    #[default]
    Auto,
    P1080,
    P720,
    P480,
    P360,
}

impl QualityLevel {
    pub fn label(&self) -> &'static str {
        match self {
            QualityLevel::Auto => "Auto",
            QualityLevel::P1080 => "1080p",
            QualityLevel::P720 => "720p",
            QualityLevel::P480 => "480p",
            QualityLevel::P360 => "360p",
        }
    }

    pub fn all() -> [QualityLevel; 5] {
        [
            QualityLevel::Auto,
            QualityLevel::P1080,
            QualityLevel::P720,
            QualityLevel::P480,
            QualityLevel::P360,
        ]
    }
}

/// Render seconds as badge text: `m:ss` under an hour, `h:mm:ss` above.
/// Seconds are truncated, never rounded up. Non-finite and negative
/// inputs render as the zero badge.
pub fn format_duration(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return crate::constants::FALLBACK_DURATION.to_string();
    }
    let total = seconds.floor() as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes}:{secs:02}")
    }
}
