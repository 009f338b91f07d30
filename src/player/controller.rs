use anyhow::Result;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, trace, warn};

use crate::catalog::Catalog;
use crate::config::Config;
use crate::drag::{DragSession, GesturePoint, MiniPlacement, Size, Viewport};
use crate::events::{EventBus, EventPayload, EventSource, EventType, GalleryEvent};
use crate::keys::{self, Key, KeyAction};
use crate::menu::{MenuState, SubmenuKind};
use crate::models::{CatalogEntry, PlaybackRate, PlayerMode, QualityLevel, SourceUrl, SurfaceKind};
use crate::probe::{DurationProber, ProbeOutcome};
use crate::view::ViewState;

use super::machine::{PlayerState, SideEffect, StateMachine};
use super::surface::SurfaceAdapter;
use super::traits::{FullscreenHost, SurfaceEvent};

/// Commands that can be sent to the gallery controller. User gestures are
/// fire-and-forget; queries carry a response channel. The command channel
/// is ordered, so a query sent after a gesture observes its outcome.
#[derive(Debug)]
pub enum GalleryCommand {
    /// Start playing the catalog entry at `index`
    Open { index: usize },
    /// Hand fullscreen playback to the mini player
    Minimize,
    /// Bring mini playback back to the fullscreen player
    Restore,
    /// Stop playback and close whichever surface is open
    Close,
    /// Advance to the next catalog entry
    Next,
    /// Step back to the previous catalog entry
    Previous,
    /// Flip play/pause on the active surface
    TogglePlayPause,
    /// Seek the active surface by progress-bar fraction
    SeekToFraction { fraction: f64 },
    /// Seek the active surface relative to its position
    SeekRelative { delta_secs: f64 },
    /// Set the shared volume
    SetVolume { volume: f64 },
    /// Mute, or unmute back to full volume
    ToggleMute,
    /// Pick a playback speed from the settings menu
    SelectRate { rate: PlaybackRate },
    /// Pick a quality from the settings menu
    SelectQuality { quality: QualityLevel },
    /// Settings button press
    ToggleSettingsMenu,
    /// Open a settings submenu
    OpenSubmenu { kind: SubmenuKind },
    /// Back button inside a submenu
    MenuBack,
    /// Click landed outside the settings menu
    ClickOutsideMenu,
    /// Toggle native fullscreen on the host
    ToggleFullscreen,
    /// Keyboard shortcut press
    PressKey { key: Key },
    /// Pointer went down on the mini player header
    BeginDrag { point: GesturePoint, viewport: Viewport },
    /// Pointer moved during a drag
    DragTo { point: GesturePoint, viewport: Viewport },
    /// Pointer released, ending the drag
    EndDrag,
    /// Append a newly discovered card to the catalog
    AddEntry {
        source: SourceUrl,
        title: String,
        declared_duration: Option<String>,
        respond_to: oneshot::Sender<usize>,
    },
    /// Get the player state
    GetState {
        respond_to: oneshot::Sender<PlayerState>,
    },
    /// Get the derived view state
    GetView {
        respond_to: oneshot::Sender<ViewState>,
    },
    /// Get a snapshot of the catalog
    GetEntries {
        respond_to: oneshot::Sender<Vec<CatalogEntry>>,
    },
    /// Stop the controller event loop
    Shutdown,
}

struct ProbeResult {
    index: usize,
    source: SourceUrl,
    outcome: ProbeOutcome,
}

/// Controller that owns the catalog, the state machine and the menu, and
/// processes commands, surface notifications and probe completions on one
/// task. Single writer: nothing else mutates player state.
pub struct GalleryController {
    catalog: Catalog,
    machine: StateMachine,
    menu: MenuState,
    drag: Option<DragSession>,
    mini_placement: MiniPlacement,
    mini_size: Size,
    corner_margin: f64,
    seek_step_secs: f64,
    adapter: SurfaceAdapter,
    prober: Arc<DurationProber>,
    fullscreen_host: Arc<dyn FullscreenHost>,
    bus: Arc<EventBus>,
    receiver: mpsc::UnboundedReceiver<GalleryCommand>,
    surface_events: mpsc::UnboundedReceiver<SurfaceEvent>,
    probe_results: mpsc::UnboundedReceiver<ProbeResult>,
    probe_tx: mpsc::UnboundedSender<ProbeResult>,
}

impl GalleryController {
    /// Create a controller over the given surfaces. `surface_events` is
    /// the receiving end of the channel both surfaces notify on.
    pub fn new(
        config: &Config,
        catalog: Catalog,
        adapter: SurfaceAdapter,
        surface_events: mpsc::UnboundedReceiver<SurfaceEvent>,
        prober: Arc<DurationProber>,
        fullscreen_host: Arc<dyn FullscreenHost>,
        bus: Arc<EventBus>,
    ) -> (GalleryHandle, GalleryController) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let (probe_tx, probe_results) = mpsc::unbounded_channel();

        let corner_margin = config.mini_player.corner_margin;
        let controller = GalleryController {
            catalog,
            machine: StateMachine::new(PlayerState::new(
                config.playback.default_volume,
                config.playback.rate(),
            )),
            menu: MenuState::Closed,
            drag: None,
            mini_placement: MiniPlacement::Corner {
                margin: corner_margin,
            },
            mini_size: Size::new(config.mini_player.width, config.mini_player.height),
            corner_margin,
            seek_step_secs: config.playback.seek_step_secs,
            adapter,
            prober,
            fullscreen_host,
            bus,
            receiver,
            surface_events,
            probe_results,
            probe_tx,
        };
        let handle = GalleryHandle { sender };

        (handle, controller)
    }

    /// Run the controller event loop
    pub async fn run(mut self) {
        debug!("GalleryController event loop started");

        // Surfaces start with the configured volume and rate.
        let volume = self.machine.state().volume;
        let rate = self.machine.state().rate;
        for kind in [SurfaceKind::Fullscreen, SurfaceKind::Mini] {
            self.adapter.set_volume(kind, volume).await;
            self.adapter.set_rate(kind, rate).await;
        }

        // Kick off duration probes for everything declared at startup.
        let pending: Vec<(usize, SourceUrl, Option<String>)> = self
            .catalog
            .iter()
            .filter(|entry| entry.probed_duration.is_none())
            .map(|entry| {
                (
                    entry.index,
                    entry.source.clone(),
                    entry.declared_duration.clone(),
                )
            })
            .collect();
        for (index, source, declared) in pending {
            self.spawn_probe(index, source, declared);
        }

        loop {
            tokio::select! {
                command = self.receiver.recv() => match command {
                    Some(command) => {
                        if !self.handle_command(command).await {
                            break;
                        }
                    }
                    None => break,
                },
                Some(event) = self.surface_events.recv() => {
                    self.handle_surface_event(event).await;
                }
                Some(result) = self.probe_results.recv() => {
                    self.apply_probe_result(result).await;
                }
            }
        }

        debug!("GalleryController event loop terminated");
    }

    /// Process one command. Returns false when the loop should stop.
    async fn handle_command(&mut self, command: GalleryCommand) -> bool {
        match command {
            GalleryCommand::Open { index } => {
                trace!("Opening catalog entry {}", index);
                let effects = self.machine.open(&self.catalog, index);
                if !effects.is_empty() {
                    self.apply_effects(effects).await;
                    let state = self.machine.state();
                    let _ = self
                        .bus
                        .emit_player_mode(EventType::PlayerOpened, state.current_index, state.mode)
                        .await;
                    self.announce_track().await;
                }
            }
            GalleryCommand::Minimize => {
                trace!("Minimizing to mini player");
                let effects = self.machine.minimize();
                if !effects.is_empty() {
                    // The mini surface reappears in its corner, forgetting
                    // any earlier drag.
                    self.mini_placement = MiniPlacement::Corner {
                        margin: self.corner_margin,
                    };
                    self.apply_effects(effects).await;
                    let state = self.machine.state();
                    let _ = self
                        .bus
                        .emit_player_mode(
                            EventType::PlayerMinimized,
                            state.current_index,
                            state.mode,
                        )
                        .await;
                }
            }
            GalleryCommand::Restore => {
                trace!("Restoring from mini player");
                let effects = self.machine.restore();
                if !effects.is_empty() {
                    self.apply_effects(effects).await;
                    let state = self.machine.state();
                    let _ = self
                        .bus
                        .emit_player_mode(EventType::PlayerRestored, state.current_index, state.mode)
                        .await;
                }
            }
            GalleryCommand::Close => {
                self.close_player().await;
            }
            GalleryCommand::Next => {
                trace!("Advancing to next entry");
                let effects = self.machine.next(&self.catalog);
                if !effects.is_empty() {
                    self.apply_effects(effects).await;
                    self.announce_track().await;
                }
            }
            GalleryCommand::Previous => {
                trace!("Stepping to previous entry");
                let effects = self.machine.previous(&self.catalog);
                if !effects.is_empty() {
                    self.apply_effects(effects).await;
                    self.announce_track().await;
                }
            }
            GalleryCommand::TogglePlayPause => {
                self.toggle_play_pause().await;
            }
            GalleryCommand::SeekToFraction { fraction } => {
                if self.machine.state().mode != PlayerMode::Closed {
                    let surface = self.machine.state().active_surface();
                    if let Some(position) = self.adapter.seek_to_fraction(surface, fraction).await {
                        self.announce_seek(surface, position).await;
                    }
                }
            }
            GalleryCommand::SeekRelative { delta_secs } => {
                self.seek_relative(delta_secs).await;
            }
            GalleryCommand::SetVolume { volume } => {
                trace!("Setting volume to {}", volume);
                let effects = self.machine.set_volume(volume);
                self.apply_effects(effects).await;
                self.announce_volume().await;
            }
            GalleryCommand::ToggleMute => {
                self.toggle_mute().await;
            }
            GalleryCommand::SelectRate { rate } => {
                trace!("Selecting playback rate {}", rate.label());
                let effects = self.machine.select_rate(rate);
                self.apply_effects(effects).await;
                let _ = self
                    .bus
                    .publish(
                        GalleryEvent::new(EventType::RateChanged, EventPayload::Rate { rate })
                            .with_source(EventSource::Menu),
                    )
                    .await;
                // Selecting closes the whole menu, not just the submenu.
                self.set_menu(MenuState::Closed).await;
            }
            GalleryCommand::SelectQuality { quality } => {
                trace!("Selecting quality {}", quality.label());
                let effects = self.machine.select_quality(quality);
                self.apply_effects(effects).await;
                let _ = self
                    .bus
                    .publish(
                        GalleryEvent::new(
                            EventType::QualityChanged,
                            EventPayload::Quality { quality },
                        )
                        .with_source(EventSource::Menu),
                    )
                    .await;
                self.set_menu(MenuState::Closed).await;
            }
            GalleryCommand::ToggleSettingsMenu => {
                let next = self.menu.toggle();
                self.set_menu(next).await;
            }
            GalleryCommand::OpenSubmenu { kind } => {
                if self.menu.is_open() {
                    let next = self.menu.open_submenu(kind);
                    self.set_menu(next).await;
                }
            }
            GalleryCommand::MenuBack => {
                let next = self.menu.back();
                self.set_menu(next).await;
            }
            GalleryCommand::ClickOutsideMenu => {
                self.set_menu(MenuState::Closed).await;
            }
            GalleryCommand::ToggleFullscreen => {
                self.toggle_host_fullscreen().await;
            }
            GalleryCommand::PressKey { key } => {
                self.press_key(key).await;
            }
            GalleryCommand::BeginDrag { point, viewport } => {
                if self.machine.state().mode == PlayerMode::Minimized && self.drag.is_none() {
                    let origin = self.mini_placement.resolve(viewport, self.mini_size);
                    self.drag = Some(DragSession::begin(point, origin, self.mini_size));
                    trace!("Drag session started at {:?}", point);
                }
            }
            GalleryCommand::DragTo { point, viewport } => {
                if let Some(session) = &self.drag {
                    let position = session.position(point, viewport);
                    self.mini_placement = MiniPlacement::Absolute {
                        x: position.x,
                        y: position.y,
                    };
                    let _ = self
                        .bus
                        .publish(
                            GalleryEvent::new(
                                EventType::MiniPlayerMoved,
                                EventPayload::Mini {
                                    x: position.x,
                                    y: position.y,
                                },
                            )
                            .with_source(EventSource::Drag),
                        )
                        .await;
                }
            }
            GalleryCommand::EndDrag => {
                if self.drag.take().is_some() {
                    trace!("Drag session ended at {:?}", self.mini_placement);
                }
            }
            GalleryCommand::AddEntry {
                source,
                title,
                declared_duration,
                respond_to,
            } => {
                let index = self
                    .catalog
                    .push(source.clone(), title, declared_duration.clone());
                let _ = self
                    .bus
                    .publish(GalleryEvent::new(
                        EventType::CatalogEntryAdded,
                        EventPayload::Catalog {
                            index,
                            source: source.clone(),
                        },
                    ))
                    .await;
                self.spawn_probe(index, source, declared_duration);
                let _ = respond_to.send(index);
            }
            GalleryCommand::GetState { respond_to } => {
                let _ = respond_to.send(self.machine.state().clone());
            }
            GalleryCommand::GetView { respond_to } => {
                let view = ViewState::derive(self.machine.state(), self.menu, self.mini_placement);
                let _ = respond_to.send(view);
            }
            GalleryCommand::GetEntries { respond_to } => {
                let _ = respond_to.send(self.catalog.entries().to_vec());
            }
            GalleryCommand::Shutdown => {
                debug!("Shutdown requested");
                return false;
            }
        }
        true
    }

    /// Apply transition effects in order. Media effects go to the adapter;
    /// presentation effects only need the derived view, so they just trace.
    async fn apply_effects(&mut self, effects: Vec<SideEffect>) {
        for effect in effects {
            match effect {
                SideEffect::Load { surface, source } => {
                    if let Err(e) = self.adapter.load(surface, &source).await {
                        warn!("Load failed on {:?}: {}", surface, e);
                        self.announce_playback_error(surface, e.to_string()).await;
                    }
                }
                SideEffect::CopySource { from, to } => {
                    if let Err(e) = self.adapter.copy_source(from, to).await {
                        warn!("Source handoff {:?} -> {:?} failed: {}", from, to, e);
                    }
                }
                SideEffect::CopyPosition { from, to } => {
                    self.adapter.copy_position(from, to).await;
                }
                SideEffect::ApplyVolume { surface, volume } => {
                    self.adapter.set_volume(surface, volume).await;
                }
                SideEffect::ApplyRate { surface, rate } => {
                    self.adapter.set_rate(surface, rate).await;
                }
                SideEffect::Play { surface } => match self.adapter.play(surface).await {
                    Ok(()) => self.machine.note_playing(),
                    Err(e) => {
                        // Rejected autoplay leaves the surface paused; the
                        // user can press play.
                        warn!("Play failed on {:?}: {}", surface, e);
                        self.machine.note_paused();
                        let _ = self.bus.emit_autoplay_blocked(e.to_string()).await;
                    }
                },
                SideEffect::Pause { surface } => {
                    self.adapter.pause(surface).await;
                }
                SideEffect::ClearSource { surface } => {
                    self.adapter.clear(surface).await;
                }
                SideEffect::ShowSurface { surface } => {
                    trace!("Showing {:?} surface", surface);
                }
                SideEffect::HideSurface { surface } => {
                    trace!("Hiding {:?} surface", surface);
                    // A hidden mini player cannot stay mid-drag.
                    if surface == SurfaceKind::Mini {
                        self.drag = None;
                    }
                }
                SideEffect::LockScroll => trace!("Locking page scroll"),
                SideEffect::UnlockScroll => trace!("Unlocking page scroll"),
                SideEffect::CloseSettingsMenu => {
                    self.set_menu(MenuState::Closed).await;
                }
                SideEffect::HighlightCard { index } => {
                    trace!("Highlighting card {:?}", index);
                }
            }
        }
    }

    /// React to a surface notification. Events from the inactive surface
    /// are late echoes of a handoff and are ignored.
    async fn handle_surface_event(&mut self, event: SurfaceEvent) {
        let state = self.machine.state();
        let active = state.active_surface();
        let open = state.mode != PlayerMode::Closed;
        let index = state.current_index;

        match event {
            SurfaceEvent::Playing { surface } => {
                if open && surface == active {
                    self.machine.note_playing();
                    let _ = self
                        .bus
                        .publish(
                            GalleryEvent::new(
                                EventType::PlaybackStarted,
                                EventPayload::Playback {
                                    index,
                                    position_secs: None,
                                    duration_secs: None,
                                },
                            )
                            .with_source(EventSource::Surface(format!("{surface:?}"))),
                        )
                        .await;
                }
            }
            SurfaceEvent::Paused { surface } => {
                if open && surface == active {
                    self.machine.note_paused();
                    let _ = self
                        .bus
                        .publish(
                            GalleryEvent::new(
                                EventType::PlaybackPaused,
                                EventPayload::Playback {
                                    index,
                                    position_secs: None,
                                    duration_secs: None,
                                },
                            )
                            .with_source(EventSource::Surface(format!("{surface:?}"))),
                        )
                        .await;
                }
            }
            SurfaceEvent::TimeUpdate {
                surface,
                position_secs,
            } => {
                if open && surface == active {
                    let duration = self.adapter.duration(surface).await;
                    let _ = self
                        .bus
                        .emit_playback_position(index, position_secs, duration)
                        .await;
                }
            }
            SurfaceEvent::Ended { surface } => {
                if open && surface == active {
                    debug!("Active surface ended, auto-advancing");
                    let _ = self
                        .bus
                        .publish(
                            GalleryEvent::new(
                                EventType::PlaybackEnded,
                                EventPayload::Playback {
                                    index,
                                    position_secs: None,
                                    duration_secs: None,
                                },
                            )
                            .with_source(EventSource::Surface(format!("{surface:?}"))),
                        )
                        .await;
                    let effects = self.machine.handle_ended(&self.catalog);
                    if !effects.is_empty() {
                        self.apply_effects(effects).await;
                        self.announce_track().await;
                    }
                }
            }
            SurfaceEvent::LoadedMetadata {
                surface,
                source,
                duration_secs,
            } => {
                // Guard against completions for a source the surface no
                // longer hosts; applying one would poison seeks.
                if !self.adapter.accepts_metadata(surface, &source).await {
                    debug!("Ignoring stale metadata for {} on {:?}", source, surface);
                    return;
                }
                let _ = self
                    .bus
                    .publish(
                        GalleryEvent::new(
                            EventType::MetadataLoaded,
                            EventPayload::Playback {
                                index,
                                position_secs: None,
                                duration_secs: Some(duration_secs),
                            },
                        )
                        .with_source(EventSource::Surface(format!("{surface:?}"))),
                    )
                    .await;
            }
            SurfaceEvent::Error { surface, message } => {
                warn!("{:?} surface error: {}", surface, message);
                self.announce_playback_error(surface, message).await;
            }
        }
    }

    fn spawn_probe(&self, index: usize, source: SourceUrl, declared: Option<String>) {
        let prober = self.prober.clone();
        let results = self.probe_tx.clone();
        tokio::spawn(async move {
            let outcome = prober.probe_outcome(&source, declared.as_deref()).await;
            let _ = results.send(ProbeResult {
                index,
                source,
                outcome,
            });
        });
    }

    async fn apply_probe_result(&mut self, result: ProbeResult) {
        self.catalog
            .set_probed_duration(result.index, result.outcome.text());
        match result.outcome {
            ProbeOutcome::Resolved(text) => {
                let _ = self.bus.emit_duration_resolved(result.source, text).await;
            }
            ProbeOutcome::Fallback(text) => {
                let _ = self
                    .bus
                    .publish(
                        GalleryEvent::new(
                            EventType::DurationProbeFailed,
                            EventPayload::Duration {
                                source: result.source,
                                text,
                            },
                        )
                        .with_source(EventSource::Prober),
                    )
                    .await;
            }
        }
    }

    async fn toggle_play_pause(&mut self) {
        if self.machine.state().mode == PlayerMode::Closed {
            return;
        }
        let surface = self.machine.state().active_surface();
        let paused = self.adapter.is_paused(surface).await;
        trace!("Toggling play/pause, surface paused: {}", paused);
        let effects = self.machine.toggle_play_pause(paused);
        self.apply_effects(effects).await;
    }

    async fn toggle_mute(&mut self) {
        let effects = self.machine.toggle_mute();
        self.apply_effects(effects).await;
        self.announce_volume().await;
    }

    async fn seek_relative(&mut self, delta_secs: f64) {
        if self.machine.state().mode == PlayerMode::Closed {
            return;
        }
        let surface = self.machine.state().active_surface();
        if let Some(position) = self.adapter.seek_relative(surface, delta_secs).await {
            self.announce_seek(surface, position).await;
        }
    }

    async fn toggle_host_fullscreen(&mut self) {
        if self.machine.state().host_fullscreen {
            match self.fullscreen_host.exit_fullscreen().await {
                Ok(()) => {
                    self.machine.set_host_fullscreen(false);
                    self.announce_fullscreen(EventType::FullscreenExited, "exited").await;
                }
                Err(e) => {
                    warn!("Fullscreen exit failed: {}", e);
                    self.announce_fullscreen(EventType::FullscreenFailed, &e.to_string())
                        .await;
                }
            }
        } else {
            match self.fullscreen_host.request_fullscreen().await {
                Ok(()) => {
                    self.machine.set_host_fullscreen(true);
                    self.announce_fullscreen(EventType::FullscreenEntered, "entered").await;
                }
                Err(e) => {
                    // The glyph keeps offering fullscreen; nothing else
                    // changes.
                    warn!("Fullscreen request failed: {}", e);
                    self.announce_fullscreen(EventType::FullscreenFailed, &e.to_string())
                        .await;
                }
            }
        }
    }

    async fn press_key(&mut self, key: Key) {
        let action = keys::action_for(key, self.seek_step_secs);
        // Shortcuts other than Escape only apply while the player is open.
        if self.machine.state().mode == PlayerMode::Closed && action != KeyAction::Dismiss {
            return;
        }
        match action {
            KeyAction::TogglePlayPause => self.toggle_play_pause().await,
            KeyAction::SeekRelative(delta_secs) => self.seek_relative(delta_secs).await,
            KeyAction::ToggleFullscreen => self.toggle_host_fullscreen().await,
            KeyAction::ToggleMute => self.toggle_mute().await,
            KeyAction::Dismiss => self.dismiss().await,
        }
    }

    /// Escape: the fullscreen player closes first, else the mini player;
    /// the settings menu closes in every case.
    async fn dismiss(&mut self) {
        if self.machine.state().mode != PlayerMode::Closed {
            self.close_player().await;
        } else {
            self.set_menu(MenuState::Closed).await;
        }
    }

    async fn close_player(&mut self) {
        trace!("Closing player");
        let effects = self.machine.close();
        if !effects.is_empty() {
            self.apply_effects(effects).await;
            let _ = self
                .bus
                .emit_player_mode(EventType::PlayerClosed, None, PlayerMode::Closed)
                .await;
        }
    }

    async fn set_menu(&mut self, next: MenuState) {
        if next == self.menu {
            return;
        }
        self.menu = next;
        let event_type = match next {
            MenuState::Closed => EventType::MenuClosed,
            MenuState::Root => EventType::MenuOpened,
            MenuState::Quality | MenuState::Speed => EventType::SubmenuOpened,
        };
        let _ = self
            .bus
            .publish(
                GalleryEvent::new(
                    event_type,
                    EventPayload::Menu {
                        pane: next.pane_name().to_string(),
                    },
                )
                .with_source(EventSource::Menu),
            )
            .await;
    }

    async fn announce_track(&self) {
        if let Some(index) = self.machine.state().current_index
            && let Some(entry) = self.catalog.get(index)
        {
            let _ = self
                .bus
                .emit_track_changed(index, entry.source.clone(), entry.title.clone())
                .await;
        }
    }

    async fn announce_seek(&self, surface: SurfaceKind, position_secs: f64) {
        let _ = self
            .bus
            .publish(GalleryEvent::new(
                EventType::SeekPerformed,
                EventPayload::Seek {
                    surface,
                    position_secs,
                },
            ))
            .await;
    }

    async fn announce_volume(&self) {
        let _ = self
            .bus
            .publish(GalleryEvent::new(
                EventType::VolumeChanged,
                EventPayload::Volume {
                    volume: self.machine.state().volume,
                },
            ))
            .await;
    }

    async fn announce_fullscreen(&self, event_type: EventType, message: &str) {
        let _ = self
            .bus
            .publish(GalleryEvent::new(
                event_type,
                EventPayload::System {
                    message: message.to_string(),
                    details: None,
                },
            ))
            .await;
    }

    async fn announce_playback_error(&self, surface: SurfaceKind, message: String) {
        let _ = self
            .bus
            .publish(
                GalleryEvent::new(
                    EventType::PlaybackError,
                    EventPayload::System {
                        message,
                        details: None,
                    },
                )
                .with_source(EventSource::Surface(format!("{surface:?}"))),
            )
            .await;
    }
}

/// Cloneable handle for sending commands to the controller.
#[derive(Debug, Clone)]
pub struct GalleryHandle {
    sender: mpsc::UnboundedSender<GalleryCommand>,
}

impl GalleryHandle {
    fn send(&self, command: GalleryCommand) -> Result<()> {
        self.sender
            .send(command)
            .map_err(|_| anyhow::anyhow!("Gallery controller disconnected"))
    }

    /// Start playing the catalog entry at `index`
    pub fn open(&self, index: usize) -> Result<()> {
        self.send(GalleryCommand::Open { index })
    }

    /// Hand fullscreen playback to the mini player
    pub fn minimize(&self) -> Result<()> {
        self.send(GalleryCommand::Minimize)
    }

    /// Bring mini playback back to the fullscreen player
    pub fn restore(&self) -> Result<()> {
        self.send(GalleryCommand::Restore)
    }

    /// Stop playback and close whichever surface is open
    pub fn close(&self) -> Result<()> {
        self.send(GalleryCommand::Close)
    }

    /// Advance to the next catalog entry
    pub fn next(&self) -> Result<()> {
        self.send(GalleryCommand::Next)
    }

    /// Step back to the previous catalog entry
    pub fn previous(&self) -> Result<()> {
        self.send(GalleryCommand::Previous)
    }

    /// Flip play/pause on the active surface
    pub fn toggle_play_pause(&self) -> Result<()> {
        self.send(GalleryCommand::TogglePlayPause)
    }

    /// Seek the active surface by progress-bar fraction
    pub fn seek_to_fraction(&self, fraction: f64) -> Result<()> {
        self.send(GalleryCommand::SeekToFraction { fraction })
    }

    /// Seek the active surface relative to its position
    pub fn seek_relative(&self, delta_secs: f64) -> Result<()> {
        self.send(GalleryCommand::SeekRelative { delta_secs })
    }

    /// Set the shared volume (0.0 to 1.0)
    pub fn set_volume(&self, volume: f64) -> Result<()> {
        self.send(GalleryCommand::SetVolume { volume })
    }

    /// Mute, or unmute back to full volume
    pub fn toggle_mute(&self) -> Result<()> {
        self.send(GalleryCommand::ToggleMute)
    }

    /// Pick a playback speed from the settings menu
    pub fn select_rate(&self, rate: PlaybackRate) -> Result<()> {
        self.send(GalleryCommand::SelectRate { rate })
    }

    /// Pick a quality from the settings menu
    pub fn select_quality(&self, quality: QualityLevel) -> Result<()> {
        self.send(GalleryCommand::SelectQuality { quality })
    }

    /// Settings button press
    pub fn toggle_settings_menu(&self) -> Result<()> {
        self.send(GalleryCommand::ToggleSettingsMenu)
    }

    /// Open a settings submenu
    pub fn open_submenu(&self, kind: SubmenuKind) -> Result<()> {
        self.send(GalleryCommand::OpenSubmenu { kind })
    }

    /// Back button inside a submenu
    pub fn menu_back(&self) -> Result<()> {
        self.send(GalleryCommand::MenuBack)
    }

    /// Click landed outside the settings menu
    pub fn click_outside_menu(&self) -> Result<()> {
        self.send(GalleryCommand::ClickOutsideMenu)
    }

    /// Toggle native fullscreen on the host
    pub fn toggle_fullscreen(&self) -> Result<()> {
        self.send(GalleryCommand::ToggleFullscreen)
    }

    /// Keyboard shortcut press
    pub fn press_key(&self, key: Key) -> Result<()> {
        self.send(GalleryCommand::PressKey { key })
    }

    /// Pointer went down on the mini player header
    pub fn begin_drag(&self, point: GesturePoint, viewport: Viewport) -> Result<()> {
        self.send(GalleryCommand::BeginDrag { point, viewport })
    }

    /// Pointer moved during a drag
    pub fn drag_to(&self, point: GesturePoint, viewport: Viewport) -> Result<()> {
        self.send(GalleryCommand::DragTo { point, viewport })
    }

    /// Pointer released, ending the drag
    pub fn end_drag(&self) -> Result<()> {
        self.send(GalleryCommand::EndDrag)
    }

    /// Append a newly discovered card to the catalog, returning its index
    pub async fn add_entry(
        &self,
        source: SourceUrl,
        title: impl Into<String>,
        declared_duration: Option<String>,
    ) -> Result<usize> {
        let (respond_to, response) = oneshot::channel();
        self.send(GalleryCommand::AddEntry {
            source,
            title: title.into(),
            declared_duration,
            respond_to,
        })?;
        response
            .await
            .map_err(|_| anyhow::anyhow!("Failed to receive response from gallery controller"))
    }

    /// Get the player state
    pub async fn state(&self) -> Result<PlayerState> {
        let (respond_to, response) = oneshot::channel();
        self.send(GalleryCommand::GetState { respond_to })?;
        response
            .await
            .map_err(|_| anyhow::anyhow!("Failed to receive response from gallery controller"))
    }

    /// Get the derived view state
    pub async fn view(&self) -> Result<ViewState> {
        let (respond_to, response) = oneshot::channel();
        self.send(GalleryCommand::GetView { respond_to })?;
        response
            .await
            .map_err(|_| anyhow::anyhow!("Failed to receive response from gallery controller"))
    }

    /// Get a snapshot of the catalog
    pub async fn entries(&self) -> Result<Vec<CatalogEntry>> {
        let (respond_to, response) = oneshot::channel();
        self.send(GalleryCommand::GetEntries { respond_to })?;
        response
            .await
            .map_err(|_| anyhow::anyhow!("Failed to receive response from gallery controller"))
    }

    /// Stop the controller event loop
    pub fn shutdown(&self) -> Result<()> {
        self.send(GalleryCommand::Shutdown)
    }
}
