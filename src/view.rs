use serde::{Deserialize, Serialize};

use crate::constants::REFERENCE_ASPECT;
use crate::drag::{MiniPlacement, Viewport};
use crate::menu::MenuState;
use crate::models::{PlayerMode, format_duration};
use crate::player::machine::PlayerState;

/// Glyph on the play/pause buttons. One value drives the main control,
/// the small overlay control and the mini player control together, so the
/// three can never disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayGlyph {
    Play,
    Pause,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VolumeIcon {
    Muted,
    Low,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FullscreenGlyph {
    Enter,
    Exit,
}

/// How fullscreen video letterboxes against the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FitMode {
    Contain,
    Cover,
}

/// Everything the page renders, derived from core state in one pass.
/// Nothing in here is stored; recomputing after every transition is what
/// keeps the widgets consistent with each other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub play_glyph: PlayGlyph,
    pub volume_icon: VolumeIcon,
    pub fullscreen_glyph: FullscreenGlyph,
    pub active_card: Option<usize>,
    pub fullscreen_visible: bool,
    pub mini_visible: bool,
    pub scroll_locked: bool,
    pub menu_root_visible: bool,
    pub quality_submenu_visible: bool,
    pub speed_submenu_visible: bool,
    pub quality_label: &'static str,
    pub speed_label: &'static str,
    pub mini_placement: MiniPlacement,
}

impl ViewState {
    pub fn derive(state: &PlayerState, menu: MenuState, mini_placement: MiniPlacement) -> Self {
        Self {
            play_glyph: if state.is_playing {
                PlayGlyph::Pause
            } else {
                PlayGlyph::Play
            },
            volume_icon: volume_icon(state.volume),
            fullscreen_glyph: if state.host_fullscreen {
                FullscreenGlyph::Exit
            } else {
                FullscreenGlyph::Enter
            },
            active_card: state.current_index,
            fullscreen_visible: state.mode == PlayerMode::Fullscreen,
            mini_visible: state.mode == PlayerMode::Minimized,
            scroll_locked: state.mode == PlayerMode::Fullscreen,
            menu_root_visible: menu == MenuState::Root,
            quality_submenu_visible: menu == MenuState::Quality,
            speed_submenu_visible: menu == MenuState::Speed,
            quality_label: state.quality.label(),
            speed_label: state.rate.label(),
            mini_placement,
        }
    }
}

/// Icon tiers: exactly zero is muted, under half is the quiet speaker,
/// the rest is the loud one.
pub fn volume_icon(volume: f64) -> VolumeIcon {
    if volume == 0.0 {
        VolumeIcon::Muted
    } else if volume < 0.5 {
        VolumeIcon::Low
    } else {
        VolumeIcon::High
    }
}

/// Progress bar fill in [0, 1]. Zero while the duration is unknown.
pub fn progress_fraction(position_secs: f64, duration_secs: Option<f64>) -> f64 {
    match duration_secs {
        Some(duration) if duration > 0.0 => (position_secs / duration).clamp(0.0, 1.0),
        _ => 0.0,
    }
}

/// Readout under the progress bar. An unknown total renders as the zero
/// badge rather than hiding the row.
pub fn time_display(position_secs: f64, duration_secs: Option<f64>) -> String {
    format!(
        "{} / {}",
        format_duration(position_secs),
        format_duration(duration_secs.unwrap_or(0.0))
    )
}

/// Viewports wider than the reference aspect letterbox the video; narrower
/// ones crop it to fill.
pub fn fit_mode(viewport: Viewport) -> FitMode {
    if viewport.height <= 0.0 {
        return FitMode::Contain;
    }
    if viewport.width / viewport.height > REFERENCE_ASPECT {
        FitMode::Contain
    } else {
        FitMode::Cover
    }
}
