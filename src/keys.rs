use serde::{Deserialize, Serialize};

/// Keys the page-level shortcut handler recognizes while the player is
/// open. Presses inside text inputs never reach this layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    Space,
    K,
    ArrowLeft,
    ArrowRight,
    F,
    M,
    Escape,
}

/// What a recognized key asks the player core to do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyAction {
    TogglePlayPause,
    SeekRelative(f64),
    ToggleFullscreen,
    ToggleMute,
    /// Escape: close the fullscreen player if open, else the mini player
    /// if open; the settings menu closes either way.
    Dismiss,
}

/// Map a key to its action. `seek_step_secs` comes from config so pages
/// can tune the arrow-key step.
pub fn action_for(key: Key, seek_step_secs: f64) -> KeyAction {
    match key {
        Key::Space | Key::K => KeyAction::TogglePlayPause,
        Key::ArrowLeft => KeyAction::SeekRelative(-seek_step_secs),
        Key::ArrowRight => KeyAction::SeekRelative(seek_step_secs),
        Key::F => KeyAction::ToggleFullscreen,
        Key::M => KeyAction::ToggleMute,
        Key::Escape => KeyAction::Dismiss,
    }
}
