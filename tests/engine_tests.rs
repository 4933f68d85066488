mod common;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use common::*;
use nurquran::audio::error::AudioError;
use nurquran::audio::state::PlaybackStatus;
use nurquran::event::events::Event;

#[test]
fn load_starts_loading_at_requested_index() {
    let (mut engine, log, event_rx) = engine();

    engine.load_playlist(playlist(3), 1);

    let state = engine.state();
    assert_eq!(state.index, 1);
    assert_eq!(state.status, PlaybackStatus::Loading);
    assert_eq!(log.loads(), vec!["2.mp3"]);
    // Notification precedes the load so views can highlight immediately.
    assert_eq!(drain(&event_rx), vec![Event::TrackChanged(1)]);
}

#[test]
fn empty_playlist_and_bad_start_index_are_ignored() {
    let (mut engine, log, _event_rx) = engine();

    engine.load_playlist(playlist(0), 0);
    assert_eq!(engine.state().status, PlaybackStatus::Idle);

    engine.load_playlist(playlist(2), 2);
    assert_eq!(engine.state().status, PlaybackStatus::Idle);
    assert!(log.loads().is_empty());
}

#[test]
fn skip_forward_walks_to_last_then_noops() {
    let (mut engine, log, _event_rx) = engine();
    let n = 4;
    engine.load_playlist(playlist(n), 0);

    for expected in 1..n {
        engine.skip_forward();
        assert_eq!(engine.state().index, expected);
    }

    engine.skip_forward();
    assert_eq!(engine.state().index, n - 1);
    assert_eq!(log.loads(), vec!["1.mp3", "2.mp3", "3.mp3", "4.mp3"]);
}

#[test]
fn skip_back_at_zero_rewinds_in_place() {
    let (mut engine, log, _event_rx) = engine();
    engine.load_playlist(playlist(3), 0);
    engine.handle_media_event(ready(log.last_load_generation(), 10));
    engine.handle_media_event(position(log.last_load_generation(), 6));
    assert_eq!(engine.state().position, Duration::from_secs(6));

    engine.skip_back();

    let state = engine.state();
    assert_eq!(state.index, 0);
    assert_eq!(state.position, Duration::ZERO);
    assert!(log.calls().contains(&BackendCall::Seek(Duration::ZERO)));
    // Still only the initial load; rewinding is not a track change.
    assert_eq!(log.loads().len(), 1);
}

#[test]
fn skip_back_above_zero_moves_one_back() {
    let (mut engine, _log, _event_rx) = engine();
    engine.load_playlist(playlist(3), 2);

    engine.skip_back();
    assert_eq!(engine.state().index, 1);
    assert_eq!(engine.state().status, PlaybackStatus::Loading);
}

#[test]
fn auto_advance_reaches_terminal_ended() {
    let (mut engine, log, event_rx) = engine();
    let n = 3;
    engine.load_playlist(playlist(n), 0);

    for expected in 1..n {
        engine.handle_media_event(ended(log.last_load_generation()));
        assert_eq!(engine.state().index, expected);
        assert_eq!(engine.state().status, PlaybackStatus::Loading);
    }

    engine.handle_media_event(ended(log.last_load_generation()));
    assert_eq!(engine.state().index, n - 1);
    assert_eq!(engine.state().status, PlaybackStatus::Ended);

    let events = drain(&event_rx);
    assert!(events.contains(&Event::PlaybackEnded));

    // A further end event keeps the terminal state and stays quiet.
    engine.handle_media_event(ended(log.last_load_generation()));
    assert_eq!(engine.state().status, PlaybackStatus::Ended);
    assert!(drain(&event_rx).is_empty());
}

#[test]
fn ready_autoplays_into_playing() {
    let (mut engine, log, _event_rx) = engine();
    engine.load_playlist(playlist(2), 0);

    engine.handle_media_event(ready(log.last_load_generation(), 90));

    let state = engine.state();
    assert_eq!(state.status, PlaybackStatus::Playing);
    assert_eq!(state.duration, Duration::from_secs(90));
    assert_eq!(log.play_count(), 1);
}

#[test]
fn blocked_autoplay_pauses_without_error() {
    let (mut engine, log, event_rx) = engine();
    engine.load_playlist(playlist(1), 0);
    drain(&event_rx);

    log.fail_next_play(AudioError::AutoplayBlocked);
    engine.handle_media_event(ready(log.last_load_generation(), 30));

    assert_eq!(engine.state().status, PlaybackStatus::Paused);
    assert!(drain(&event_rx).is_empty());
}

#[test]
fn genuine_play_failure_pauses_and_reports() {
    let (mut engine, log, event_rx) = engine();
    engine.load_playlist(playlist(1), 0);
    drain(&event_rx);

    log.fail_next_play(AudioError::Device("no sink".into()));
    engine.handle_media_event(ready(log.last_load_generation(), 30));

    assert_eq!(engine.state().status, PlaybackStatus::Paused);
    let events = drain(&event_rx);
    assert!(matches!(events.as_slice(), [Event::PlaybackFailed(_)]));
}

#[test]
fn media_failure_pauses_and_reports() {
    let (mut engine, log, event_rx) = engine();
    engine.load_playlist(playlist(2), 0);
    drain(&event_rx);

    engine.handle_media_event(failed(
        log.last_load_generation(),
        AudioError::Network("timeout".into()),
    ));

    assert_eq!(engine.state().status, PlaybackStatus::Paused);
    assert!(matches!(
        drain(&event_rx).as_slice(),
        [Event::PlaybackFailed(_)]
    ));
}

#[test]
fn interrupted_load_is_swallowed() {
    let (mut engine, log, event_rx) = engine();
    engine.load_playlist(playlist(2), 0);
    drain(&event_rx);

    engine.handle_media_event(failed(log.last_load_generation(), AudioError::Interrupted));

    assert_eq!(engine.state().status, PlaybackStatus::Loading);
    assert!(drain(&event_rx).is_empty());
}

#[test]
fn toggle_is_noop_when_idle_and_flips_playing_paused() {
    let (mut engine, log, _event_rx) = engine();

    engine.toggle_play_pause();
    assert_eq!(engine.state().status, PlaybackStatus::Idle);

    engine.load_playlist(playlist(1), 0);
    engine.handle_media_event(ready(log.last_load_generation(), 10));
    assert_eq!(engine.state().status, PlaybackStatus::Playing);

    engine.toggle_play_pause();
    assert_eq!(engine.state().status, PlaybackStatus::Paused);
    assert!(log.calls().contains(&BackendCall::Pause));

    engine.toggle_play_pause();
    assert_eq!(engine.state().status, PlaybackStatus::Playing);
}

#[test]
fn seek_clamps_to_duration_and_keeps_status() {
    let (mut engine, log, _event_rx) = engine();
    engine.load_playlist(playlist(1), 0);

    // Not playable yet: seeking is ignored.
    engine.seek(Duration::from_secs(5));
    assert!(!log.calls().iter().any(|c| matches!(c, BackendCall::Seek(_))));

    engine.handle_media_event(ready(log.last_load_generation(), 10));
    engine.toggle_play_pause();
    assert_eq!(engine.state().status, PlaybackStatus::Paused);

    engine.seek(Duration::from_secs(30));
    assert_eq!(engine.state().position, Duration::from_secs(10));
    assert_eq!(engine.state().status, PlaybackStatus::Paused);
    assert!(log.calls().contains(&BackendCall::Seek(Duration::from_secs(10))));
}

#[test]
fn prefetch_follows_every_entry_into_loading() {
    let (mut engine, log, _event_rx) = engine();
    engine.load_playlist(playlist(3), 0);
    assert_eq!(log.prefetches(), vec!["2.mp3"]);

    engine.skip_forward();
    assert_eq!(log.prefetches(), vec!["2.mp3", "3.mp3"]);

    // Last track: nothing left to prepare.
    engine.skip_forward();
    assert_eq!(log.prefetches(), vec!["2.mp3", "3.mp3"]);
}

#[test]
fn replacing_playlist_discards_stale_media_events() {
    let (mut engine, log, _event_rx) = engine();

    engine.load_playlist(playlist(1), 0);
    let stale = log.last_load_generation();

    let replacement =
        nurquran::audio::playlist::Playlist::new(vec![track(11), track(12)]);
    engine.load_playlist(replacement, 0);
    let current = log.last_load_generation();
    assert_ne!(stale, current);

    // The first playlist's media becoming ready must not start anything.
    engine.handle_media_event(ready(stale, 10));
    assert_eq!(engine.state().status, PlaybackStatus::Loading);
    assert_eq!(log.play_count(), 0);

    engine.handle_media_event(ready(current, 10));
    assert_eq!(engine.state().status, PlaybackStatus::Playing);
    assert_eq!(engine.state().index, 0);
    assert_eq!(
        engine.playlist().unwrap().track(0).unwrap().url,
        "11.mp3"
    );
    assert_eq!(engine.playlist().unwrap().len(), 2);
}

#[test]
fn close_returns_to_idle_and_invalidates_in_flight_loads() {
    let (mut engine, log, _event_rx) = engine();
    engine.load_playlist(playlist(2), 0);
    let generation = log.last_load_generation();

    engine.close();

    assert_eq!(engine.state().status, PlaybackStatus::Idle);
    assert!(engine.playlist().is_none());
    assert!(log.calls().contains(&BackendCall::Stop));

    engine.handle_media_event(ready(generation, 10));
    assert_eq!(engine.state().status, PlaybackStatus::Idle);
}

#[test]
fn observer_sees_every_index_transition_before_the_load() {
    let (mut engine, log, _event_rx) = engine();

    let seen: Arc<Mutex<Vec<(usize, usize)>>> = Arc::new(Mutex::new(Vec::new()));
    engine.set_track_observer(Box::new({
        let seen = seen.clone();
        let log = log.clone();
        move |index| {
            seen.lock().unwrap().push((index, log.loads().len()));
        }
    }));

    engine.load_playlist(playlist(3), 0);
    engine.skip_forward();
    engine.handle_media_event(ended(log.last_load_generation()));

    // Each notification fired while the matching load was not yet issued.
    assert_eq!(*seen.lock().unwrap(), vec![(0, 0), (1, 1), (2, 2)]);

    engine.clear_track_observer();
    engine.skip_back();
    assert_eq!(seen.lock().unwrap().len(), 3);
}
