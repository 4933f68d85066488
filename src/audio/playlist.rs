use crate::config::ApiConfig;
use crate::model::SurahDetail;

/// One playable media resource plus its display metadata. Immutable once
/// created; owned exclusively by the playlist that contains it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub url: String,
    pub title: String,
    pub subtitle: String,
    pub id: Option<String>,
}

/// Ordered track list. Exactly one playlist is active at a time; loading a
/// new one into the engine replaces the previous one wholesale.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Playlist {
    tracks: Vec<Track>,
}

impl Playlist {
    pub fn new(tracks: Vec<Track>) -> Self {
        Self { tracks }
    }

    pub fn single(track: Track) -> Self {
        Self {
            tracks: vec![track],
        }
    }

    /// Every verse of a chapter under the configured reciter, in
    /// recitation order.
    pub fn full_surah(surah: &SurahDetail, config: &ApiConfig) -> Self {
        let tracks = (1..=surah.total_ayah)
            .map(|ayah_no| Track {
                url: config.verse_audio_url(surah.surah_no, ayah_no),
                title: surah.surah_name.clone(),
                subtitle: format!("Verse {ayah_no} of {}", surah.total_ayah),
                id: Some(verse_element_id(surah.surah_no, ayah_no)),
            })
            .collect();
        Self { tracks }
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn track(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// More than five tracks all carrying the same title reads as one
    /// continuous chapter recitation rather than a curated queue. Display
    /// semantics only; playback never branches on this.
    pub fn is_continuous_recitation(&self) -> bool {
        self.tracks.len() > 5
            && self
                .tracks
                .windows(2)
                .all(|pair| pair[0].title == pair[1].title)
    }

    pub fn display_title(&self, index: usize) -> &str {
        let track = if self.is_continuous_recitation() {
            self.tracks.first()
        } else {
            self.track(index)
        };
        track.map(|t| t.title.as_str()).unwrap_or("")
    }

    pub fn display_subtitle(&self, index: usize) -> String {
        if self.is_continuous_recitation() {
            format!("{}/{}", index + 1, self.tracks.len())
        } else {
            self.track(index)
                .map(|t| t.subtitle.clone())
                .unwrap_or_default()
        }
    }
}

/// Stable id for the verse a track belongs to, matching the ids the
/// reading views attach to their verse elements.
pub fn verse_element_id(surah_no: u16, ayah_no: u16) -> String {
    format!("ayah-{surah_no}-{ayah_no}")
}
