#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The playback engine moved to a new playlist index.
    TrackChanged(usize),
    /// The last track of the playlist finished.
    PlaybackEnded,
    /// Genuine media failure; the player stays usable.
    PlaybackFailed(String),
    /// A press-and-hold matured into a preview request.
    PreviewRequested(String),
}
