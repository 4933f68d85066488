use std::collections::HashMap;

use tracing::debug;

use crate::model::{Language, LastRead};

use super::SettingsStore;

pub const THEME: &str = "theme";
pub const LANGUAGE: &str = "language";
pub const ARABIC_FONT_SIZE: &str = "arabicFontSize";
pub const READING_MODE: &str = "readingMode";
pub const LAST_READ: &str = "last_read";
pub const BOOKMARKS: &str = "nur_quran_bookmarks";

pub const MIN_ARABIC_FONT_SIZE: f32 = 1.5;
pub const MAX_ARABIC_FONT_SIZE: f32 = 4.0;
pub const DEFAULT_ARABIC_FONT_SIZE: f32 = 2.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn key(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

/// Typed accessors over the flat settings keys. Each is an independent
/// scalar; no atomicity across keys. Absent or corrupt values degrade to
/// the documented default, never to an error.
impl SettingsStore {
    pub fn theme(&self) -> Theme {
        match self.get(THEME) {
            Some("dark") => Theme::Dark,
            _ => Theme::Light,
        }
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.set(THEME, theme.key());
    }

    pub fn language(&self) -> Language {
        self.get(LANGUAGE)
            .and_then(Language::from_key)
            .unwrap_or_default()
    }

    pub fn set_language(&mut self, language: Language) {
        self.set(LANGUAGE, language.key());
    }

    /// Bounded to the renderable range on both read and write.
    pub fn arabic_font_size(&self) -> f32 {
        self.get(ARABIC_FONT_SIZE)
            .and_then(|raw| raw.parse::<f32>().ok())
            .map(clamp_font_size)
            .unwrap_or(DEFAULT_ARABIC_FONT_SIZE)
    }

    pub fn set_arabic_font_size(&mut self, size: f32) {
        self.set(ARABIC_FONT_SIZE, clamp_font_size(size).to_string());
    }

    pub fn reading_mode(&self) -> bool {
        self.get(READING_MODE) == Some("true")
    }

    pub fn set_reading_mode(&mut self, enabled: bool) {
        self.set(READING_MODE, if enabled { "true" } else { "false" });
    }

    pub fn last_read(&self) -> Option<LastRead> {
        let raw = self.get(LAST_READ)?;
        match serde_json::from_str(raw) {
            Ok(last) => Some(last),
            Err(err) => {
                debug!(%err, "stored reading position unreadable, ignoring");
                None
            }
        }
    }

    pub fn set_last_read(&mut self, last: &LastRead) {
        if let Ok(raw) = serde_json::to_string(last) {
            self.set(LAST_READ, raw);
        }
    }

    pub fn bookmarks(&self) -> BookmarkSet {
        self.get(BOOKMARKS)
            .map(BookmarkSet::from_json)
            .unwrap_or_default()
    }

    pub fn is_bookmarked(&self, surah_no: u16, ayah_no: u16) -> bool {
        self.bookmarks().contains(surah_no, ayah_no)
    }

    pub fn set_bookmark(&mut self, surah_no: u16, ayah_no: u16, bookmarked: bool) {
        let mut set = self.bookmarks();
        set.set(surah_no, ayah_no, bookmarked);
        self.set(BOOKMARKS, set.to_json());
    }

    /// Returns the new bookmark state of the verse.
    pub fn toggle_bookmark(&mut self, surah_no: u16, ayah_no: u16) -> bool {
        let mut set = self.bookmarks();
        let bookmarked = !set.contains(surah_no, ayah_no);
        set.set(surah_no, ayah_no, bookmarked);
        self.set(BOOKMARKS, set.to_json());
        bookmarked
    }
}

fn clamp_font_size(size: f32) -> f32 {
    size.clamp(MIN_ARABIC_FONT_SIZE, MAX_ARABIC_FONT_SIZE)
}

/// Flat `"chapter:verse" -> bool` map persisted as one JSON object. An
/// absent key and a `false` value both mean "not bookmarked"; stale `false`
/// entries from earlier sessions are tolerated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookmarkSet {
    entries: HashMap<String, bool>,
}

impl BookmarkSet {
    pub fn from_json(raw: &str) -> Self {
        match serde_json::from_str(raw) {
            Ok(entries) => Self { entries },
            Err(err) => {
                debug!(%err, "stored bookmarks unreadable, starting empty");
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.entries).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn contains(&self, surah_no: u16, ayah_no: u16) -> bool {
        self.entries
            .get(&key(surah_no, ayah_no))
            .copied()
            .unwrap_or(false)
    }

    pub fn set(&mut self, surah_no: u16, ayah_no: u16, bookmarked: bool) {
        self.entries.insert(key(surah_no, ayah_no), bookmarked);
    }

    /// Bookmarked verses in chapter order, skipping `false` and malformed
    /// entries.
    pub fn verses(&self) -> Vec<(u16, u16)> {
        let mut verses: Vec<(u16, u16)> = self
            .entries
            .iter()
            .filter(|&(_, &bookmarked)| bookmarked)
            .filter_map(|(raw, _)| {
                let (surah, ayah) = raw.split_once(':')?;
                Some((surah.parse().ok()?, ayah.parse().ok()?))
            })
            .collect();
        verses.sort_unstable();
        verses
    }

    pub fn is_empty(&self) -> bool {
        !self.entries.values().any(|&bookmarked| bookmarked)
    }
}

fn key(surah_no: u16, ayah_no: u16) -> String {
    format!("{surah_no}:{ayah_no}")
}
