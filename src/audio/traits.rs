use std::time::Duration;

use super::error::AudioError;

/// Backend-reported milestone for the load issued under `generation`.
/// Events tagged with an older generation describe a load that has since
/// been superseded and must be dropped.
#[derive(Debug, Clone)]
pub struct MediaEvent {
    pub generation: u64,
    pub kind: MediaEventKind,
}

#[derive(Debug, Clone)]
pub enum MediaEventKind {
    /// The media became playable.
    Ready { duration: Duration },
    /// Playback position advanced.
    Position(Duration),
    /// The track reached its natural end.
    Ended,
    Failed(AudioError),
}

/// Seam between the playlist state machine and the platform media layer.
pub trait MediaBackend: Send {
    /// Begin loading `url`, superseding any in-flight load. Completion is
    /// reported as a `MediaEvent` tagged with `generation`.
    fn load(&mut self, generation: u64, url: &str);

    /// Start or resume playback of the loaded media. A host environment
    /// that refuses unsolicited playback reports `AutoplayBlocked`.
    fn play(&mut self) -> Result<(), AudioError>;

    fn pause(&mut self);

    fn seek(&mut self, position: Duration) -> Result<(), AudioError>;

    /// Best-effort preparation of a resource expected to play next.
    /// Failures must not affect the current track.
    fn prefetch(&mut self, url: &str);

    /// Release the held media resource.
    fn stop(&mut self);
}
