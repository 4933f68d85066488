#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use flume::Receiver;

use nurquran::audio::engine::PlayerEngine;
use nurquran::audio::error::AudioError;
use nurquran::audio::playlist::{Playlist, Track};
use nurquran::audio::traits::{MediaBackend, MediaEvent, MediaEventKind};
use nurquran::event::events::Event;

#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    Load { generation: u64, url: String },
    Play,
    Pause,
    Seek(Duration),
    Prefetch(String),
    Stop,
}

/// Shared journal of everything the engine asked the backend to do.
#[derive(Default)]
pub struct BackendLog {
    pub calls: Mutex<Vec<BackendCall>>,
    pub next_play_error: Mutex<Option<AudioError>>,
}

impl BackendLog {
    pub fn calls(&self) -> Vec<BackendCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn loads(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                BackendCall::Load { url, .. } => Some(url),
                _ => None,
            })
            .collect()
    }

    pub fn prefetches(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                BackendCall::Prefetch(url) => Some(url),
                _ => None,
            })
            .collect()
    }

    pub fn last_load_generation(&self) -> u64 {
        self.calls()
            .into_iter()
            .rev()
            .find_map(|call| match call {
                BackendCall::Load { generation, .. } => Some(generation),
                _ => None,
            })
            .expect("no load issued")
    }

    pub fn play_count(&self) -> usize {
        self.calls()
            .into_iter()
            .filter(|call| *call == BackendCall::Play)
            .count()
    }

    pub fn fail_next_play(&self, err: AudioError) {
        *self.next_play_error.lock().unwrap() = Some(err);
    }
}

/// Records calls and returns canned results; media milestones are fed to
/// the engine by the test itself.
pub struct MockBackend {
    log: Arc<BackendLog>,
}

impl MockBackend {
    pub fn new() -> (Self, Arc<BackendLog>) {
        let log = Arc::new(BackendLog::default());
        (Self { log: log.clone() }, log)
    }
}

impl MediaBackend for MockBackend {
    fn load(&mut self, generation: u64, url: &str) {
        self.log.calls.lock().unwrap().push(BackendCall::Load {
            generation,
            url: url.to_string(),
        });
    }

    fn play(&mut self) -> Result<(), AudioError> {
        self.log.calls.lock().unwrap().push(BackendCall::Play);
        match self.log.next_play_error.lock().unwrap().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn pause(&mut self) {
        self.log.calls.lock().unwrap().push(BackendCall::Pause);
    }

    fn seek(&mut self, position: Duration) -> Result<(), AudioError> {
        self.log
            .calls
            .lock()
            .unwrap()
            .push(BackendCall::Seek(position));
        Ok(())
    }

    fn prefetch(&mut self, url: &str) {
        self.log
            .calls
            .lock()
            .unwrap()
            .push(BackendCall::Prefetch(url.to_string()));
    }

    fn stop(&mut self) {
        self.log.calls.lock().unwrap().push(BackendCall::Stop);
    }
}

pub fn engine() -> (PlayerEngine, Arc<BackendLog>, Receiver<Event>) {
    let (event_tx, event_rx) = flume::unbounded();
    let (backend, log) = MockBackend::new();
    (PlayerEngine::new(Box::new(backend), event_tx), log, event_rx)
}

pub fn track(n: usize) -> Track {
    Track {
        url: format!("{n}.mp3"),
        title: format!("Track {n}"),
        subtitle: format!("Subtitle {n}"),
        id: Some(format!("ayah-1-{n}")),
    }
}

pub fn playlist(len: usize) -> Playlist {
    Playlist::new((1..=len).map(track).collect())
}

pub fn ready(generation: u64, secs: u64) -> MediaEvent {
    MediaEvent {
        generation,
        kind: MediaEventKind::Ready {
            duration: Duration::from_secs(secs),
        },
    }
}

pub fn ended(generation: u64) -> MediaEvent {
    MediaEvent {
        generation,
        kind: MediaEventKind::Ended,
    }
}

pub fn failed(generation: u64, err: AudioError) -> MediaEvent {
    MediaEvent {
        generation,
        kind: MediaEventKind::Failed(err),
    }
}

pub fn position(generation: u64, secs: u64) -> MediaEvent {
    MediaEvent {
        generation,
        kind: MediaEventKind::Position(Duration::from_secs(secs)),
    }
}

pub fn drain(event_rx: &Receiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    while let Ok(event) = event_rx.try_recv() {
        events.push(event);
    }
    events
}
