use anyhow::Result;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::sleep;
use tracing::{info, warn};

use vitrine::catalog::Catalog;
use vitrine::config::Config;
use vitrine::drag::{GesturePoint, Viewport};
use vitrine::events::EventBus;
use vitrine::keys::Key;
use vitrine::menu::SubmenuKind;
use vitrine::models::{PlaybackRate, SourceUrl, SurfaceKind};
use vitrine::player::{
    GalleryController, GalleryHandle, SimulatedFullscreenHost, SimulatedSurface, SurfaceAdapter,
};
use vitrine::probe::{DurationProber, StaticMetadataReader};

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter("vitrine=debug")
        .init();

    info!("Starting vitrine gallery demo");

    let config = Config::load().unwrap_or_else(|e| {
        warn!("Failed to load config, using defaults: {}", e);
        Config::default()
    });

    // Initialize Tokio runtime for async operations
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run(config))
}

async fn run(config: Config) -> Result<()> {
    // The cards a gallery page would declare, in page order.
    let mut catalog = Catalog::new();
    catalog.push(
        SourceUrl::new("videos/sunrise.mp4"),
        "Sunrise over the bay",
        Some("2:12".to_string()),
    );
    catalog.push(SourceUrl::new("videos/harbor.mp4"), "Harbor time lapse", None);
    catalog.push(
        SourceUrl::new("https://youtu.be/aqz-KE-bpKQ"),
        "Hosted elsewhere",
        None,
    );

    // Metadata the simulated surfaces and the prober can answer with.
    let metadata: Arc<HashMap<SourceUrl, f64>> = Arc::new(HashMap::from([
        (SourceUrl::new("videos/sunrise.mp4"), 132.0),
        (SourceUrl::new("videos/harbor.mp4"), 754.0),
        (SourceUrl::new("videos/clouds.mp4"), 61.0),
    ]));

    let bus = Arc::new(EventBus::new(config.events.bus_capacity));

    // Both surfaces notify the controller over one channel.
    let (surface_tx, surface_rx) = mpsc::unbounded_channel();
    let fullscreen =
        SimulatedSurface::new(SurfaceKind::Fullscreen, surface_tx.clone(), metadata.clone());
    let mini = SimulatedSurface::new(SurfaceKind::Mini, surface_tx, metadata.clone());
    let adapter = SurfaceAdapter::new(Arc::new(fullscreen), Arc::new(mini));

    let reader = StaticMetadataReader::new(metadata.as_ref().clone());
    let prober = Arc::new(DurationProber::new(
        Arc::new(reader),
        config.probe.cache_capacity,
        Duration::from_secs(config.probe.timeout_secs),
    ));

    let host = Arc::new(SimulatedFullscreenHost::new());

    let (handle, controller) =
        GalleryController::new(&config, catalog, adapter, surface_rx, prober, host, bus.clone());
    let controller_task = tokio::spawn(controller.run());

    // Log everything the bus sees.
    let mut subscriber = bus.subscribe();
    let logger = tokio::spawn(async move {
        while let Ok(event) = subscriber.recv().await {
            info!("event {} from {:?}", event.event_type.as_str(), event.source);
        }
    });

    tour(&handle).await?;

    handle.shutdown()?;
    controller_task.await?;
    logger.abort();

    info!("Demo finished");
    Ok(())
}

/// Scripted walk through the gallery, paced so the simulated surfaces get
/// to report positions between steps.
async fn tour(handle: &GalleryHandle) -> Result<()> {
    let step = Duration::from_millis(300);
    let viewport = Viewport::new(1280.0, 720.0);

    info!("Opening the first card fullscreen");
    handle.open(0)?;
    sleep(step).await;

    info!("Picking 1.5x from the settings menu");
    handle.toggle_settings_menu()?;
    handle.open_submenu(SubmenuKind::Speed)?;
    handle.select_rate(PlaybackRate::X1_5)?;
    sleep(step).await;

    info!("Minimizing and dragging the mini player");
    handle.minimize()?;
    handle.begin_drag(GesturePoint::new(950.0, 530.0), viewport)?;
    handle.drag_to(GesturePoint::new(200.0, 140.0), viewport)?;
    handle.end_drag()?;
    sleep(step).await;

    info!("Opening another card while minimized");
    handle.open(1)?;
    sleep(step).await;

    info!("Restoring to fullscreen");
    handle.restore()?;
    sleep(step).await;

    info!("Seeking and adjusting volume");
    handle.seek_to_fraction(0.5)?;
    handle.set_volume(0.4)?;
    handle.press_key(Key::ArrowRight)?;
    handle.press_key(Key::M)?;
    sleep(step).await;

    info!("Advancing through the catalog");
    handle.next()?;
    sleep(step).await;
    handle.previous()?;
    sleep(step).await;

    info!("A late card arrives");
    let index = handle
        .add_entry(SourceUrl::new("videos/clouds.mp4"), "Clouds rolling in", None)
        .await?;
    sleep(step).await;

    let entries = handle.entries().await?;
    for entry in &entries {
        info!("card {}: {} [{}]", entry.index, entry.title, entry.duration_badge());
    }
    info!("Late card landed at index {}", index);

    info!("Closing with Escape");
    handle.press_key(Key::Escape)?;
    sleep(step).await;

    let state = handle.state().await?;
    info!("Final mode: {:?}", state.mode);
    Ok(())
}
