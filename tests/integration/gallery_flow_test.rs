#[cfg(test)]
mod gallery_flow_tests {
    use std::sync::Arc;
    use std::time::Duration;

    use vitrine::drag::{GesturePoint, MiniPlacement, Viewport};
    use vitrine::events::{EventPayload, EventType};
    use vitrine::keys::Key;
    use vitrine::menu::SubmenuKind;
    use vitrine::models::{PlaybackRate, PlayerMode, QualityLevel, SourceUrl, SurfaceKind};
    use vitrine::player::{PlaybackSurface, SimulatedSurface, SurfaceEvent};
    use vitrine::view::{FullscreenGlyph, PlayGlyph, VolumeIcon};

    use crate::common::builders::{CatalogBuilder, CatalogEntryBuilder};
    use crate::common::mocks::{CountingReader, HangingReader};
    use crate::common::{TestGallery, fixtures, next_event_of};

    async fn wait_for_duration(surface: &Arc<SimulatedSurface>) -> f64 {
        tokio::time::timeout(Duration::from_secs(2), async {
            loop {
                if let Some(duration) = surface.duration().await {
                    return duration;
                }
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("metadata should resolve")
    }

    #[tokio::test]
    async fn test_open_plays_first_card_fullscreen() {
        let gallery = TestGallery::new(fixtures::demo_catalog()).await;

        gallery.handle.open(0).unwrap();

        let state = gallery.handle.state().await.unwrap();
        assert_eq!(state.mode, PlayerMode::Fullscreen);
        assert_eq!(state.current_index, Some(0));
        assert!(state.is_playing);
        assert_eq!(
            gallery.fullscreen.current_source().await,
            Some(SourceUrl::new("videos/sunrise.mp4"))
        );
        assert!(gallery.mini.current_source().await.is_none());

        let view = gallery.handle.view().await.unwrap();
        assert!(view.fullscreen_visible);
        assert!(view.scroll_locked);
        assert_eq!(view.play_glyph, PlayGlyph::Pause);
        assert_eq!(view.active_card, Some(0));
    }

    #[tokio::test]
    async fn test_open_out_of_range_is_ignored() {
        let gallery = TestGallery::new(fixtures::demo_catalog()).await;
        let mut opened = gallery.bus.subscribe_to_types(vec![EventType::PlayerOpened]);

        gallery.handle.open(99).unwrap();

        let state = gallery.handle.state().await.unwrap();
        assert_eq!(state.mode, PlayerMode::Closed);
        assert_eq!(state.current_index, None);
        assert!(matches!(opened.try_recv(), Ok(None)));
    }

    #[tokio::test]
    async fn test_minimize_hands_off_source_and_position() {
        let gallery = TestGallery::new(fixtures::demo_catalog()).await;
        gallery.handle.open(0).unwrap();
        wait_for_duration(&gallery.fullscreen).await;
        // Let the position move off zero before the handoff.
        tokio::time::sleep(Duration::from_millis(40)).await;

        gallery.handle.minimize().unwrap();

        let state = gallery.handle.state().await.unwrap();
        assert_eq!(state.mode, PlayerMode::Minimized);
        assert_eq!(
            gallery.mini.current_source().await,
            Some(SourceUrl::new("videos/sunrise.mp4"))
        );
        assert!(gallery.fullscreen.current_source().await.is_none());
        assert!(gallery.fullscreen.is_paused().await);
        assert!(!gallery.mini.is_paused().await);
        assert!(gallery.mini.position().await > 0.0);

        let view = gallery.handle.view().await.unwrap();
        assert!(view.mini_visible);
        assert!(!view.fullscreen_visible);
        assert!(!view.scroll_locked);
    }

    #[tokio::test]
    async fn test_restore_returns_playback_to_fullscreen() {
        let gallery = TestGallery::new(fixtures::demo_catalog()).await;
        gallery.handle.open(0).unwrap();
        gallery.handle.minimize().unwrap();

        gallery.handle.restore().unwrap();

        let state = gallery.handle.state().await.unwrap();
        assert_eq!(state.mode, PlayerMode::Fullscreen);
        assert!(state.is_playing);
        assert_eq!(
            gallery.fullscreen.current_source().await,
            Some(SourceUrl::new("videos/sunrise.mp4"))
        );
        assert!(gallery.mini.current_source().await.is_none());
        assert!(gallery.mini.is_paused().await);
    }

    #[tokio::test]
    async fn test_open_while_minimized_routes_to_mini() {
        let gallery = TestGallery::new(fixtures::demo_catalog()).await;
        gallery.handle.open(0).unwrap();
        gallery.handle.minimize().unwrap();

        gallery.handle.open(1).unwrap();

        let state = gallery.handle.state().await.unwrap();
        assert_eq!(state.mode, PlayerMode::Minimized);
        assert_eq!(state.current_index, Some(1));
        assert_eq!(
            gallery.mini.current_source().await,
            Some(SourceUrl::new("videos/harbor.mp4"))
        );
        assert!(gallery.fullscreen.current_source().await.is_none());
    }

    #[tokio::test]
    async fn test_close_releases_everything() {
        let gallery = TestGallery::new(fixtures::demo_catalog()).await;
        gallery.handle.open(0).unwrap();

        gallery.handle.close().unwrap();

        let state = gallery.handle.state().await.unwrap();
        assert_eq!(state.mode, PlayerMode::Closed);
        assert_eq!(state.current_index, None);
        assert!(!state.is_playing);
        assert!(gallery.fullscreen.current_source().await.is_none());

        let view = gallery.handle.view().await.unwrap();
        assert!(!view.fullscreen_visible);
        assert!(!view.mini_visible);
        assert!(!view.scroll_locked);
        assert_eq!(view.active_card, None);
        assert_eq!(view.play_glyph, PlayGlyph::Play);
    }

    #[tokio::test]
    async fn test_navigation_wraps_both_directions() {
        let gallery = TestGallery::new(fixtures::demo_catalog()).await;
        let mut tracks = gallery.bus.subscribe_to_types(vec![EventType::TrackChanged]);

        gallery.handle.open(2).unwrap();
        gallery.handle.next().unwrap();
        let state = gallery.handle.state().await.unwrap();
        assert_eq!(state.current_index, Some(0));

        gallery.handle.previous().unwrap();
        let state = gallery.handle.state().await.unwrap();
        assert_eq!(state.current_index, Some(2));

        for expected in [2usize, 0, 2] {
            let event = next_event_of(&mut tracks, EventType::TrackChanged).await;
            match event.payload {
                EventPayload::Track { index, .. } => assert_eq!(index, expected),
                other => panic!("unexpected payload {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_ended_video_auto_advances() {
        let catalog = CatalogBuilder::new()
            .entry(CatalogEntryBuilder::video("videos/blink.mp4").with_title("Blink"))
            .entry(CatalogEntryBuilder::video("videos/sunrise.mp4").with_title("Sunrise"))
            .build();
        let gallery = TestGallery::new(catalog).await;

        gallery.handle.open(0).unwrap();

        // The 0.05s video runs out on its own and the next one starts.
        let state = gallery.wait_for_state(|s| s.current_index == Some(1)).await;
        assert_eq!(state.mode, PlayerMode::Fullscreen);
        assert_eq!(
            gallery.fullscreen.current_source().await,
            Some(SourceUrl::new("videos/sunrise.mp4"))
        );
    }

    #[tokio::test]
    async fn test_toggle_play_pause_follows_surface() {
        let gallery = TestGallery::new(fixtures::demo_catalog()).await;
        gallery.handle.open(0).unwrap();

        gallery.handle.toggle_play_pause().unwrap();
        let state = gallery.wait_for_state(|s| !s.is_playing).await;
        assert_eq!(state.mode, PlayerMode::Fullscreen);
        assert!(gallery.fullscreen.is_paused().await);

        gallery.handle.toggle_play_pause().unwrap();
        gallery.wait_for_state(|s| s.is_playing).await;
        assert!(!gallery.fullscreen.is_paused().await);
    }

    #[tokio::test]
    async fn test_seek_to_fraction_lands_mid_video() {
        let gallery = TestGallery::new(fixtures::demo_catalog()).await;
        gallery.handle.open(0).unwrap();
        let duration = wait_for_duration(&gallery.fullscreen).await;

        let mut seeks = gallery.bus.subscribe_to_types(vec![EventType::SeekPerformed]);
        gallery.handle.seek_to_fraction(0.5).unwrap();

        let event = next_event_of(&mut seeks, EventType::SeekPerformed).await;
        match event.payload {
            EventPayload::Seek {
                surface,
                position_secs,
            } => {
                assert_eq!(surface, SurfaceKind::Fullscreen);
                assert_eq!(position_secs, duration / 2.0);
            }
            other => panic!("unexpected payload {other:?}"),
        }

        let position = gallery.fullscreen.position().await;
        assert!(position >= duration / 2.0);
        assert!(position < duration / 2.0 + 2.0);
    }

    #[tokio::test]
    async fn test_seek_without_metadata_is_ignored() {
        let catalog = CatalogBuilder::new()
            .entry(CatalogEntryBuilder::video("videos/ghost.mp4"))
            .build();
        let gallery = TestGallery::new(catalog).await;
        let mut seeks = gallery.bus.subscribe_to_types(vec![EventType::SeekPerformed]);

        gallery.handle.open(0).unwrap();
        gallery.handle.seek_to_fraction(0.9).unwrap();
        gallery.handle.seek_relative(30.0).unwrap();

        // Round trip so both seeks have been processed.
        let _ = gallery.handle.state().await.unwrap();
        assert!(matches!(seeks.try_recv(), Ok(None)));
    }

    #[tokio::test]
    async fn test_arrow_keys_step_by_configured_amount() {
        let gallery = TestGallery::new(fixtures::demo_catalog()).await;
        gallery.handle.open(0).unwrap();
        wait_for_duration(&gallery.fullscreen).await;
        // Freeze the position so the step is observable.
        gallery.handle.toggle_play_pause().unwrap();
        gallery.wait_for_state(|s| !s.is_playing).await;
        let start = gallery.fullscreen.position().await;

        gallery.handle.press_key(Key::ArrowRight).unwrap();
        let _ = gallery.handle.state().await.unwrap();
        let stepped = gallery.fullscreen.position().await;
        assert_eq!(stepped, start + 5.0);

        gallery.handle.press_key(Key::ArrowLeft).unwrap();
        let _ = gallery.handle.state().await.unwrap();
        assert!((gallery.fullscreen.position().await - start).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_volume_and_mute_key() {
        let gallery = TestGallery::new(fixtures::demo_catalog()).await;
        gallery.handle.open(0).unwrap();

        gallery.handle.set_volume(0.4).unwrap();
        let view = gallery.handle.view().await.unwrap();
        assert_eq!(view.volume_icon, VolumeIcon::Low);

        let mut volumes = gallery.bus.subscribe_to_types(vec![EventType::VolumeChanged]);
        gallery.handle.press_key(Key::M).unwrap();
        let event = next_event_of(&mut volumes, EventType::VolumeChanged).await;
        assert!(matches!(event.payload, EventPayload::Volume { volume } if volume == 0.0));

        let view = gallery.handle.view().await.unwrap();
        assert_eq!(view.volume_icon, VolumeIcon::Muted);

        // Unmuting goes to full volume, not back to 0.4.
        gallery.handle.press_key(Key::M).unwrap();
        let state = gallery.wait_for_state(|s| s.volume == 1.0).await;
        assert_eq!(state.volume, 1.0);
        let view = gallery.handle.view().await.unwrap();
        assert_eq!(view.volume_icon, VolumeIcon::High);
    }

    #[tokio::test]
    async fn test_settings_menu_navigation() {
        let gallery = TestGallery::new(fixtures::demo_catalog()).await;
        gallery.handle.open(0).unwrap();

        gallery.handle.toggle_settings_menu().unwrap();
        let view = gallery.handle.view().await.unwrap();
        assert!(view.menu_root_visible);

        gallery.handle.open_submenu(SubmenuKind::Quality).unwrap();
        let view = gallery.handle.view().await.unwrap();
        assert!(!view.menu_root_visible);
        assert!(view.quality_submenu_visible);
        assert!(!view.speed_submenu_visible);

        gallery.handle.menu_back().unwrap();
        let view = gallery.handle.view().await.unwrap();
        assert!(view.menu_root_visible);

        gallery.handle.click_outside_menu().unwrap();
        let view = gallery.handle.view().await.unwrap();
        assert!(!view.menu_root_visible);
        assert!(!view.quality_submenu_visible);
        assert!(!view.speed_submenu_visible);
    }

    #[tokio::test]
    async fn test_rate_selection_closes_whole_menu() {
        let gallery = TestGallery::new(fixtures::demo_catalog()).await;
        gallery.handle.open(0).unwrap();

        gallery.handle.toggle_settings_menu().unwrap();
        gallery.handle.open_submenu(SubmenuKind::Speed).unwrap();
        gallery.handle.select_rate(PlaybackRate::X1_5).unwrap();

        let state = gallery.handle.state().await.unwrap();
        assert_eq!(state.rate, PlaybackRate::X1_5);

        // Not just back to the root: the whole menu is gone.
        let view = gallery.handle.view().await.unwrap();
        assert!(!view.menu_root_visible);
        assert!(!view.speed_submenu_visible);
        assert_eq!(view.speed_label, "1.5x");
    }

    #[tokio::test]
    async fn test_quality_selection_keeps_playback() {
        let gallery = TestGallery::new(fixtures::demo_catalog()).await;
        gallery.handle.open(0).unwrap();
        wait_for_duration(&gallery.fullscreen).await;

        gallery.handle.toggle_settings_menu().unwrap();
        gallery.handle.open_submenu(SubmenuKind::Quality).unwrap();
        gallery.handle.select_quality(QualityLevel::P720).unwrap();

        let state = gallery.handle.state().await.unwrap();
        assert_eq!(state.quality, QualityLevel::P720);
        assert!(state.is_playing);
        // The loaded source never changes on a quality pick.
        assert_eq!(
            gallery.fullscreen.current_source().await,
            Some(SourceUrl::new("videos/sunrise.mp4"))
        );

        let view = gallery.handle.view().await.unwrap();
        assert_eq!(view.quality_label, "720p");
        assert!(!view.quality_submenu_visible);
    }

    #[tokio::test]
    async fn test_drag_moves_mini_player_and_minimize_resets_it() {
        let gallery = TestGallery::new(fixtures::demo_catalog()).await;
        let viewport = Viewport::new(1280.0, 720.0);

        gallery.handle.open(0).unwrap();
        gallery.handle.minimize().unwrap();
        let view = gallery.handle.view().await.unwrap();
        assert_eq!(view.mini_placement, MiniPlacement::Corner { margin: 30.0 });

        // Corner resolves to (930, 510) for the default 320x180 surface;
        // grab 10 pixels inside it.
        gallery
            .handle
            .begin_drag(GesturePoint::new(940.0, 520.0), viewport)
            .unwrap();
        gallery
            .handle
            .drag_to(GesturePoint::new(40.0, 30.0), viewport)
            .unwrap();
        gallery.handle.end_drag().unwrap();

        let view = gallery.handle.view().await.unwrap();
        assert_eq!(view.mini_placement, MiniPlacement::Absolute { x: 30.0, y: 20.0 });

        // The next minimize puts the surface back in its corner.
        gallery.handle.restore().unwrap();
        gallery.handle.minimize().unwrap();
        let view = gallery.handle.view().await.unwrap();
        assert_eq!(view.mini_placement, MiniPlacement::Corner { margin: 30.0 });
    }

    #[tokio::test]
    async fn test_drag_ignored_outside_mini_mode() {
        let gallery = TestGallery::new(fixtures::demo_catalog()).await;
        let viewport = Viewport::new(1280.0, 720.0);

        gallery.handle.open(0).unwrap();
        gallery
            .handle
            .begin_drag(GesturePoint::new(100.0, 100.0), viewport)
            .unwrap();
        gallery
            .handle
            .drag_to(GesturePoint::new(400.0, 400.0), viewport)
            .unwrap();
        gallery.handle.end_drag().unwrap();

        let view = gallery.handle.view().await.unwrap();
        assert_eq!(view.mini_placement, MiniPlacement::Corner { margin: 30.0 });
    }

    #[tokio::test]
    async fn test_escape_closes_player_and_menu() {
        let gallery = TestGallery::new(fixtures::demo_catalog()).await;
        gallery.handle.open(0).unwrap();
        gallery.handle.toggle_settings_menu().unwrap();

        gallery.handle.press_key(Key::Escape).unwrap();

        let state = gallery.handle.state().await.unwrap();
        assert_eq!(state.mode, PlayerMode::Closed);
        let view = gallery.handle.view().await.unwrap();
        assert!(!view.fullscreen_visible);
        assert!(!view.menu_root_visible);

        // Escape with nothing open changes nothing.
        gallery.handle.press_key(Key::Escape).unwrap();
        let state = gallery.handle.state().await.unwrap();
        assert_eq!(state.mode, PlayerMode::Closed);
    }

    #[tokio::test]
    async fn test_fullscreen_key_toggles_host() {
        let gallery = TestGallery::new(fixtures::demo_catalog()).await;
        gallery.handle.open(0).unwrap();

        gallery.handle.press_key(Key::F).unwrap();
        gallery.wait_for_state(|s| s.host_fullscreen).await;
        let view = gallery.handle.view().await.unwrap();
        assert_eq!(view.fullscreen_glyph, FullscreenGlyph::Exit);

        gallery.handle.press_key(Key::F).unwrap();
        gallery.wait_for_state(|s| !s.host_fullscreen).await;

        // A denied request leaves the glyph offering fullscreen.
        gallery.host.set_fail_requests(true);
        let mut failures = gallery
            .bus
            .subscribe_to_types(vec![EventType::FullscreenFailed]);
        gallery.handle.press_key(Key::F).unwrap();
        next_event_of(&mut failures, EventType::FullscreenFailed).await;

        let state = gallery.handle.state().await.unwrap();
        assert!(!state.host_fullscreen);
        let view = gallery.handle.view().await.unwrap();
        assert_eq!(view.fullscreen_glyph, FullscreenGlyph::Enter);
    }

    #[tokio::test]
    async fn test_autoplay_rejection_leaves_player_paused() {
        let gallery = TestGallery::new(fixtures::demo_catalog()).await;
        gallery.fullscreen.set_reject_autoplay(true);
        let mut blocked = gallery
            .bus
            .subscribe_to_types(vec![EventType::AutoplayBlocked]);

        gallery.handle.open(0).unwrap();
        next_event_of(&mut blocked, EventType::AutoplayBlocked).await;

        let state = gallery.handle.state().await.unwrap();
        assert_eq!(state.mode, PlayerMode::Fullscreen);
        assert!(!state.is_playing);
        let view = gallery.handle.view().await.unwrap();
        assert_eq!(view.play_glyph, PlayGlyph::Play);

        // Once the host allows it, an explicit play works.
        gallery.fullscreen.set_reject_autoplay(false);
        gallery.handle.toggle_play_pause().unwrap();
        gallery.wait_for_state(|s| s.is_playing).await;
    }

    #[tokio::test]
    async fn test_probe_resolves_external_and_fallback_badges() {
        let reader = Arc::new(CountingReader::new(&[
            ("videos/sunrise.mp4", 132.0),
            ("videos/clouds.mp4", 61.0),
        ]));
        let catalog = CatalogBuilder::new()
            .entry(
                CatalogEntryBuilder::video("videos/sunrise.mp4").with_declared_duration("2:12"),
            )
            .entry(
                CatalogEntryBuilder::video("https://www.youtube.com/watch?v=aqz-KE-bpKQ")
                    .with_title("Hosted elsewhere"),
            )
            .entry(CatalogEntryBuilder::video("videos/ghost.mp4").with_declared_duration("9:59"))
            .build();
        let gallery = TestGallery::with_reader(catalog, reader.clone()).await;

        let entries = gallery
            .wait_for_entries(|entries| entries.iter().all(|e| e.probed_duration.is_some()))
            .await;
        assert_eq!(entries[0].duration_badge(), "2:12");
        assert_eq!(entries[1].duration_badge(), "Unknown");
        // Probing failed, so the declared text stays on the badge.
        assert_eq!(entries[2].duration_badge(), "9:59");

        // The external platform entry never reached the reader.
        assert_eq!(reader.call_count(), 2);
    }

    #[tokio::test]
    async fn test_added_entry_is_probed_and_joins_navigation() {
        let gallery = TestGallery::new(fixtures::demo_catalog()).await;

        let index = gallery
            .handle
            .add_entry(SourceUrl::new("videos/night.mp4"), "Night sky", None)
            .await
            .unwrap();
        assert_eq!(index, 3);

        let entries = gallery
            .wait_for_entries(|entries| {
                entries.len() == 4 && entries[3].probed_duration.is_some()
            })
            .await;
        assert_eq!(entries[3].duration_badge(), "1:01:01");

        // The new card is reachable by wrapping navigation.
        gallery.handle.open(2).unwrap();
        gallery.handle.next().unwrap();
        let state = gallery.handle.state().await.unwrap();
        assert_eq!(state.current_index, Some(3));
        gallery.handle.next().unwrap();
        let state = gallery.handle.state().await.unwrap();
        assert_eq!(state.current_index, Some(0));
    }

    #[tokio::test]
    async fn test_probe_timeout_falls_back_to_declared() {
        let catalog = CatalogBuilder::new()
            .entry(CatalogEntryBuilder::video("videos/slow.mp4").with_declared_duration("3:33"))
            .build();
        let gallery = TestGallery::with_reader(catalog, Arc::new(HangingReader)).await;
        let mut failures = gallery
            .bus
            .subscribe_to_types(vec![EventType::DurationProbeFailed]);

        next_event_of(&mut failures, EventType::DurationProbeFailed).await;
        let entries = gallery
            .wait_for_entries(|entries| entries[0].probed_duration.is_some())
            .await;
        assert_eq!(entries[0].duration_badge(), "3:33");
    }

    #[tokio::test]
    async fn test_stale_metadata_is_ignored() {
        let catalog = CatalogBuilder::new()
            .entry(CatalogEntryBuilder::video("videos/ghost.mp4"))
            .build();
        let gallery = TestGallery::with_reader(catalog, Arc::new(HangingReader)).await;
        gallery.handle.open(0).unwrap();
        let _ = gallery.handle.state().await.unwrap();

        let mut loaded = gallery.bus.subscribe_to_types(vec![EventType::MetadataLoaded]);

        // A completion for media the surface no longer hosts must be
        // dropped, or its duration would poison later seeks.
        gallery
            .surface_tx
            .send(SurfaceEvent::LoadedMetadata {
                surface: SurfaceKind::Fullscreen,
                source: SourceUrl::new("videos/other.mp4"),
                duration_secs: 500.0,
            })
            .unwrap();
        gallery
            .surface_tx
            .send(SurfaceEvent::LoadedMetadata {
                surface: SurfaceKind::Fullscreen,
                source: SourceUrl::new("videos/ghost.mp4"),
                duration_secs: 99.0,
            })
            .unwrap();

        let event = next_event_of(&mut loaded, EventType::MetadataLoaded).await;
        match event.payload {
            EventPayload::Playback { duration_secs, .. } => {
                assert_eq!(duration_secs, Some(99.0));
            }
            other => panic!("unexpected payload {other:?}"),
        }
        // The stale one produced nothing.
        assert!(matches!(loaded.try_recv(), Ok(None)));
    }
}
