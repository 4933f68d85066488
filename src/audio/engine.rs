use std::time::Duration;

use flume::Sender;
use tracing::{debug, warn};

use crate::event::events::Event;

use super::{
    error::AudioError,
    playlist::{Playlist, Track},
    state::{PlaybackState, PlaybackStatus},
    traits::{MediaBackend, MediaEvent, MediaEventKind},
};

/// Observer for index transitions. The engine only deals in indices; the
/// caller resolves them to whatever stable per-track identifier it cares
/// about (verse highlighting, scrolling).
pub type TrackObserver = Box<dyn FnMut(usize) + Send>;

/// Sequential, gapless playlist player. Owns the single active playlist
/// and drives one playback position through it with prefetch-of-next,
/// seek, skip and auto-advance. All transitions run synchronously on the
/// caller's event loop; the backend reports media milestones as
/// generation-tagged `MediaEvent`s fed back through `handle_media_event`.
pub struct PlayerEngine {
    backend: Box<dyn MediaBackend>,
    event_tx: Sender<Event>,
    playlist: Option<Playlist>,
    state: PlaybackState,
    generation: u64,
    observer: Option<TrackObserver>,
}

impl PlayerEngine {
    pub fn new(backend: Box<dyn MediaBackend>, event_tx: Sender<Event>) -> Self {
        Self {
            backend,
            event_tx,
            playlist: None,
            state: PlaybackState::default(),
            generation: 0,
            observer: None,
        }
    }

    pub fn set_track_observer(&mut self, observer: TrackObserver) {
        self.observer = Some(observer);
    }

    pub fn clear_track_observer(&mut self) {
        self.observer = None;
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn playlist(&self) -> Option<&Playlist> {
        self.playlist.as_ref()
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.playlist.as_ref()?.track(self.state.index)
    }

    /// Replaces any active playlist wholesale and starts loading the track
    /// at `start_index`. The track-changed notification fires before the
    /// load is issued so views can highlight the right item immediately.
    pub fn load_playlist(&mut self, playlist: Playlist, start_index: usize) {
        if playlist.is_empty() {
            warn!("ignoring empty playlist");
            return;
        }
        if start_index >= playlist.len() {
            warn!(
                start_index,
                len = playlist.len(),
                "ignoring out-of-range start index"
            );
            return;
        }

        self.playlist = Some(playlist);
        self.begin_track(start_index);
    }

    pub fn toggle_play_pause(&mut self) {
        match self.state.status {
            PlaybackStatus::Playing => {
                self.backend.pause();
                self.state.status = PlaybackStatus::Paused;
            }
            PlaybackStatus::Paused => match self.backend.play() {
                Ok(()) => self.state.status = PlaybackStatus::Playing,
                Err(err) => self.report_failure(err),
            },
            _ => {}
        }
    }

    /// Clamped to the track bounds; does not change status.
    pub fn seek(&mut self, position: Duration) {
        if !matches!(
            self.state.status,
            PlaybackStatus::Playing | PlaybackStatus::Paused
        ) {
            return;
        }

        let position = self.clamp_to_duration(position);
        if let Err(err) = self.backend.seek(position) {
            debug!(%err, "seek ignored");
            return;
        }
        self.state.position = position;
    }

    /// No-op when already at the last track.
    pub fn skip_forward(&mut self) {
        let Some(playlist) = &self.playlist else {
            return;
        };
        if self.state.index + 1 < playlist.len() {
            self.begin_track(self.state.index + 1);
        }
    }

    /// Moves one track back, or restarts the first track when already at it.
    pub fn skip_back(&mut self) {
        if self.playlist.is_none() {
            return;
        }
        if self.state.index > 0 {
            self.begin_track(self.state.index - 1);
        } else {
            if let Err(err) = self.backend.seek(Duration::ZERO) {
                debug!(%err, "rewind ignored");
            }
            self.state.position = Duration::ZERO;
        }
    }

    /// Tears the engine down to `Idle`, releasing the media resource.
    /// Media events still in flight for the old playlist are dropped.
    pub fn close(&mut self) {
        self.generation += 1;
        self.backend.stop();
        self.playlist = None;
        self.state = PlaybackState::default();
    }

    /// Entry point for backend callbacks. Events from superseded loads are
    /// an expected artifact of rapid track switching and are dropped
    /// without comment.
    pub fn handle_media_event(&mut self, event: MediaEvent) {
        if event.generation != self.generation {
            debug!(
                generation = event.generation,
                current = self.generation,
                "stale media event dropped"
            );
            return;
        }

        match event.kind {
            MediaEventKind::Ready { duration } => self.on_ready(duration),
            MediaEventKind::Position(position) => {
                if self.state.status == PlaybackStatus::Playing {
                    self.state.position = self.clamp_to_duration(position);
                }
            }
            MediaEventKind::Ended => self.on_ended(),
            MediaEventKind::Failed(AudioError::Interrupted) => {
                debug!("superseded load cancelled");
            }
            MediaEventKind::Failed(err) => self.report_failure(err),
        }
    }

    fn on_ready(&mut self, duration: Duration) {
        if self.state.status != PlaybackStatus::Loading {
            return;
        }

        self.state.duration = duration;
        self.state.position = Duration::ZERO;

        match self.backend.play() {
            Ok(()) => self.state.status = PlaybackStatus::Playing,
            // Host policy, not a fault: stay loaded and wait for the user.
            Err(AudioError::AutoplayBlocked) => self.state.status = PlaybackStatus::Paused,
            Err(err) => self.report_failure(err),
        }
    }

    fn on_ended(&mut self) {
        let Some(playlist) = &self.playlist else {
            return;
        };
        if self.state.status == PlaybackStatus::Ended {
            return;
        }

        if self.state.index + 1 < playlist.len() {
            self.begin_track(self.state.index + 1);
        } else {
            self.state.position = self.state.duration;
            self.state.status = PlaybackStatus::Ended;
            let _ = self.event_tx.send(Event::PlaybackEnded);
        }
    }

    fn begin_track(&mut self, index: usize) {
        let Some(playlist) = &self.playlist else {
            return;
        };
        let Some(track) = playlist.track(index) else {
            return;
        };
        let url = track.url.clone();
        let next_url = playlist.track(index + 1).map(|next| next.url.clone());

        self.generation += 1;
        self.state = PlaybackState {
            index,
            status: PlaybackStatus::Loading,
            position: Duration::ZERO,
            duration: Duration::ZERO,
        };
        self.notify_track_changed(index);
        self.backend.load(self.generation, &url);
        if let Some(next_url) = next_url {
            self.backend.prefetch(&next_url);
        }
    }

    fn notify_track_changed(&mut self, index: usize) {
        if let Some(observer) = &mut self.observer {
            observer(index);
        }
        let _ = self.event_tx.send(Event::TrackChanged(index));
    }

    fn report_failure(&mut self, err: AudioError) {
        warn!(%err, "playback failed");
        self.state.status = PlaybackStatus::Paused;
        let _ = self.event_tx.send(Event::PlaybackFailed(err.to_string()));
    }

    fn clamp_to_duration(&self, position: Duration) -> Duration {
        if self.state.duration > Duration::ZERO {
            position.min(self.state.duration)
        } else {
            position
        }
    }
}
