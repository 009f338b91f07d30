// Behavior constants shared across the player core - all in one place
// so page embedders can find the tunable values quickly

// === Duration badges ===
/// Badge text when neither a probe result nor a declared fallback exists.
pub const FALLBACK_DURATION: &str = "0:00";
/// Sentinel badge for sources hosted on platforms the page cannot probe.
pub const UNKNOWN_DURATION: &str = "Unknown";

// === Probing ===
/// Hosts whose locators resolve to the `Unknown` sentinel without probing.
pub const EXTERNAL_PLATFORM_HOSTS: &[&str] = &["youtube.com", "youtu.be"];

// === Playback ===
/// Relative seek step for the arrow keys, in seconds.
pub const SEEK_STEP_SECS: f64 = 5.0;
/// Reference aspect ratio deciding the fullscreen fit mode.
pub const REFERENCE_ASPECT: f64 = 16.0 / 9.0;

// === Mini player ===
/// Distance from the bottom-right viewport corner when the mini surface
/// first appears, in logical pixels.
pub const MINI_CORNER_MARGIN: f64 = 30.0;
