use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackStatus {
    /// No active playlist.
    #[default]
    Idle,
    /// A track is selected but its media is not playable yet.
    Loading,
    Playing,
    Paused,
    /// The last track finished; terminal for this playlist.
    Ended,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaybackState {
    pub index: usize,
    pub status: PlaybackStatus,
    pub position: Duration,
    pub duration: Duration,
}
