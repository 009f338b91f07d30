use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::Catalog;
use crate::models::{PlaybackRate, PlayerMode, QualityLevel, SourceUrl, SurfaceKind};

/// Shared playback state for the whole page. One instance, owned by the
/// controller; everything the controls render is derived from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub mode: PlayerMode,
    /// Index of the video being played. None exactly when mode is Closed.
    pub current_index: Option<usize>,
    pub is_playing: bool,
    pub volume: f64,
    pub rate: PlaybackRate,
    pub quality: QualityLevel,
    /// Whether the host viewport is in native fullscreen. Independent of
    /// mode; drives the fullscreen button glyph.
    pub host_fullscreen: bool,
}

impl PlayerState {
    pub fn new(volume: f64, rate: PlaybackRate) -> Self {
        Self {
            mode: PlayerMode::Closed,
            current_index: None,
            is_playing: false,
            volume: volume.clamp(0.0, 1.0),
            rate,
            quality: QualityLevel::default(),
            host_fullscreen: false,
        }
    }

    /// The surface playback lives on. Minimized means the mini player;
    /// Closed and Fullscreen both answer the fullscreen surface, and
    /// callers skip surface work entirely while Closed.
    pub fn active_surface(&self) -> SurfaceKind {
        match self.mode {
            PlayerMode::Minimized => SurfaceKind::Mini,
            _ => SurfaceKind::Fullscreen,
        }
    }
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::new(1.0, PlaybackRate::Normal)
    }
}

/// Work a transition asks the page layer to perform. The machine never
/// touches a surface itself; the controller applies these in order.
#[derive(Debug, Clone, PartialEq)]
pub enum SideEffect {
    ShowSurface { surface: SurfaceKind },
    HideSurface { surface: SurfaceKind },
    Load { surface: SurfaceKind, source: SourceUrl },
    /// Attach the source currently hosted by `from` onto `to`.
    CopySource { from: SurfaceKind, to: SurfaceKind },
    /// Carry the playback position from one surface to the other. Applied
    /// before the origin surface is cleared.
    CopyPosition { from: SurfaceKind, to: SurfaceKind },
    ApplyVolume { surface: SurfaceKind, volume: f64 },
    ApplyRate { surface: SurfaceKind, rate: PlaybackRate },
    Play { surface: SurfaceKind },
    Pause { surface: SurfaceKind },
    ClearSource { surface: SurfaceKind },
    LockScroll,
    UnlockScroll,
    CloseSettingsMenu,
    HighlightCard { index: Option<usize> },
}

/// Mode and selection transitions, kept free of I/O so every flow is
/// reproducible headlessly. Each operation mutates the state and returns
/// the effects to apply; an empty list means the call was a no-op.
#[derive(Debug, Default)]
pub struct StateMachine {
    state: PlayerState,
}

impl StateMachine {
    pub fn new(state: PlayerState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    /// Start playing the entry at `index`. While minimized the selection
    /// goes to the mini surface and the page stays browsable; otherwise
    /// the fullscreen player opens over the page.
    pub fn open(&mut self, catalog: &Catalog, index: usize) -> Vec<SideEffect> {
        let Some(entry) = catalog.get(index) else {
            debug!("Ignoring open for missing catalog index {}", index);
            return Vec::new();
        };

        let source = entry.source.clone();
        self.state.current_index = Some(index);

        if self.state.mode == PlayerMode::Minimized {
            return vec![
                SideEffect::Load {
                    surface: SurfaceKind::Mini,
                    source,
                },
                SideEffect::ApplyVolume {
                    surface: SurfaceKind::Mini,
                    volume: self.state.volume,
                },
                SideEffect::ApplyRate {
                    surface: SurfaceKind::Mini,
                    rate: self.state.rate,
                },
                SideEffect::Play {
                    surface: SurfaceKind::Mini,
                },
                SideEffect::HighlightCard {
                    index: Some(index),
                },
            ];
        }

        self.state.mode = PlayerMode::Fullscreen;
        vec![
            SideEffect::ShowSurface {
                surface: SurfaceKind::Fullscreen,
            },
            SideEffect::LockScroll,
            SideEffect::Load {
                surface: SurfaceKind::Fullscreen,
                source,
            },
            SideEffect::ApplyVolume {
                surface: SurfaceKind::Fullscreen,
                volume: self.state.volume,
            },
            SideEffect::ApplyRate {
                surface: SurfaceKind::Fullscreen,
                rate: self.state.rate,
            },
            SideEffect::Play {
                surface: SurfaceKind::Fullscreen,
            },
            SideEffect::HighlightCard {
                index: Some(index),
            },
        ]
    }

    /// Hand playback from the fullscreen player to the mini player without
    /// losing the position. No-op unless currently fullscreen.
    pub fn minimize(&mut self) -> Vec<SideEffect> {
        if self.state.mode != PlayerMode::Fullscreen {
            return Vec::new();
        }
        self.state.mode = PlayerMode::Minimized;
        vec![
            SideEffect::CopySource {
                from: SurfaceKind::Fullscreen,
                to: SurfaceKind::Mini,
            },
            SideEffect::CopyPosition {
                from: SurfaceKind::Fullscreen,
                to: SurfaceKind::Mini,
            },
            SideEffect::ApplyVolume {
                surface: SurfaceKind::Mini,
                volume: self.state.volume,
            },
            SideEffect::ApplyRate {
                surface: SurfaceKind::Mini,
                rate: self.state.rate,
            },
            SideEffect::Play {
                surface: SurfaceKind::Mini,
            },
            SideEffect::ShowSurface {
                surface: SurfaceKind::Mini,
            },
            SideEffect::HideSurface {
                surface: SurfaceKind::Fullscreen,
            },
            SideEffect::Pause {
                surface: SurfaceKind::Fullscreen,
            },
            SideEffect::ClearSource {
                surface: SurfaceKind::Fullscreen,
            },
            SideEffect::UnlockScroll,
            SideEffect::CloseSettingsMenu,
        ]
    }

    /// Bring mini playback back to the fullscreen player, carrying the
    /// position. No-op unless currently minimized.
    pub fn restore(&mut self) -> Vec<SideEffect> {
        if self.state.mode != PlayerMode::Minimized {
            return Vec::new();
        }
        self.state.mode = PlayerMode::Fullscreen;
        vec![
            SideEffect::CopySource {
                from: SurfaceKind::Mini,
                to: SurfaceKind::Fullscreen,
            },
            SideEffect::CopyPosition {
                from: SurfaceKind::Mini,
                to: SurfaceKind::Fullscreen,
            },
            SideEffect::ApplyVolume {
                surface: SurfaceKind::Fullscreen,
                volume: self.state.volume,
            },
            SideEffect::ApplyRate {
                surface: SurfaceKind::Fullscreen,
                rate: self.state.rate,
            },
            SideEffect::Play {
                surface: SurfaceKind::Fullscreen,
            },
            SideEffect::ShowSurface {
                surface: SurfaceKind::Fullscreen,
            },
            SideEffect::LockScroll,
            SideEffect::HideSurface {
                surface: SurfaceKind::Mini,
            },
            SideEffect::Pause {
                surface: SurfaceKind::Mini,
            },
            SideEffect::ClearSource {
                surface: SurfaceKind::Mini,
            },
        ]
    }

    /// Stop playback and drop the selection, from either open mode.
    /// Already-closed is a no-op.
    pub fn close(&mut self) -> Vec<SideEffect> {
        let surface = match self.state.mode {
            PlayerMode::Closed => return Vec::new(),
            PlayerMode::Fullscreen => SurfaceKind::Fullscreen,
            PlayerMode::Minimized => SurfaceKind::Mini,
        };
        self.state.mode = PlayerMode::Closed;
        self.state.current_index = None;
        self.state.is_playing = false;
        vec![
            SideEffect::Pause { surface },
            SideEffect::ClearSource { surface },
            SideEffect::HideSurface { surface },
            SideEffect::UnlockScroll,
            SideEffect::CloseSettingsMenu,
            SideEffect::HighlightCard { index: None },
        ]
    }

    /// Advance to the next catalog entry, wrapping past the end. The
    /// current mode routes the new selection like any open.
    pub fn next(&mut self, catalog: &Catalog) -> Vec<SideEffect> {
        let Some(current) = self.state.current_index else {
            return Vec::new();
        };
        match catalog.next_index(current) {
            Some(index) => self.open(catalog, index),
            None => Vec::new(),
        }
    }

    /// Step back to the previous catalog entry, wrapping before the first.
    pub fn previous(&mut self, catalog: &Catalog) -> Vec<SideEffect> {
        let Some(current) = self.state.current_index else {
            return Vec::new();
        };
        match catalog.previous_index(current) {
            Some(index) => self.open(catalog, index),
            None => Vec::new(),
        }
    }

    /// Flip playback based on what the active surface reports, not on the
    /// remembered flag, so a host-initiated pause cannot invert the button.
    pub fn toggle_play_pause(&mut self, active_surface_paused: bool) -> Vec<SideEffect> {
        if self.state.mode == PlayerMode::Closed {
            return Vec::new();
        }
        let surface = self.state.active_surface();
        if active_surface_paused {
            self.state.is_playing = true;
            vec![SideEffect::Play { surface }]
        } else {
            self.state.is_playing = false;
            vec![SideEffect::Pause { surface }]
        }
    }

    /// Set the shared volume, clamped to [0, 1]. Both surfaces take the
    /// new value so it survives minimize and restore.
    pub fn set_volume(&mut self, volume: f64) -> Vec<SideEffect> {
        let volume = volume.clamp(0.0, 1.0);
        self.state.volume = volume;
        vec![
            SideEffect::ApplyVolume {
                surface: SurfaceKind::Fullscreen,
                volume,
            },
            SideEffect::ApplyVolume {
                surface: SurfaceKind::Mini,
                volume,
            },
        ]
    }

    /// Mute drops volume to zero; unmute restores full volume regardless
    /// of the level before muting.
    pub fn toggle_mute(&mut self) -> Vec<SideEffect> {
        if self.state.volume > 0.0 {
            self.set_volume(0.0)
        } else {
            self.set_volume(1.0)
        }
    }

    pub fn select_rate(&mut self, rate: PlaybackRate) -> Vec<SideEffect> {
        self.state.rate = rate;
        vec![
            SideEffect::ApplyRate {
                surface: SurfaceKind::Fullscreen,
                rate,
            },
            SideEffect::ApplyRate {
                surface: SurfaceKind::Mini,
                rate,
            },
        ]
    }

    /// Remember the chosen quality for the menu display. Playback keeps
    /// the loaded source.
    pub fn select_quality(&mut self, quality: QualityLevel) -> Vec<SideEffect> {
        self.state.quality = quality;
        Vec::new()
    }

    /// The active surface finished its video: advance, wrapping at the
    /// end, in whatever mode playback currently lives.
    pub fn handle_ended(&mut self, catalog: &Catalog) -> Vec<SideEffect> {
        self.state.is_playing = false;
        self.next(catalog)
    }

    /// The active surface confirmed playback started.
    pub fn note_playing(&mut self) {
        self.state.is_playing = true;
    }

    /// The active surface confirmed playback stopped, including rejected
    /// autoplay.
    pub fn note_paused(&mut self) {
        self.state.is_playing = false;
    }

    pub fn set_host_fullscreen(&mut self, fullscreen: bool) {
        self.state.host_fullscreen = fullscreen;
    }
}
