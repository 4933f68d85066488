use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Translation languages the content API ships alongside the Arabic text.
/// English is always present; the others vary per chapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    English,
    Bengali,
    Urdu,
    Turkish,
    Uzbek,
}

impl Language {
    pub const ALL: [Language; 5] = [
        Language::English,
        Language::Bengali,
        Language::Urdu,
        Language::Turkish,
        Language::Uzbek,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Language::English => "english",
            Language::Bengali => "bengali",
            Language::Urdu => "urdu",
            Language::Turkish => "turkish",
            Language::Uzbek => "uzbek",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Bengali => "Bengali",
            Language::Urdu => "Urdu",
            Language::Turkish => "Turkish",
            Language::Uzbek => "Uzbek",
        }
    }

    pub fn from_key(key: &str) -> Option<Language> {
        Language::ALL.into_iter().find(|lang| lang.key() == key)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurahSummary {
    pub surah_name: String,
    pub surah_name_arabic: String,
    #[serde(default)]
    pub surah_name_arabic_long: String,
    pub surah_name_translation: String,
    pub revelation_place: String,
    pub total_ayah: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioReciter {
    pub reciter: String,
    pub url: String,
    #[serde(default)]
    pub original_url: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurahDetail {
    pub surah_name: String,
    pub surah_name_arabic: String,
    #[serde(default)]
    pub surah_name_arabic_long: String,
    pub surah_name_translation: String,
    pub revelation_place: String,
    pub total_ayah: u16,
    pub surah_no: u16,
    #[serde(default)]
    pub audio: HashMap<String, AudioReciter>,
    pub english: Vec<String>,
    pub arabic1: Vec<String>,
    #[serde(default)]
    pub arabic2: Vec<String>,
    #[serde(default)]
    pub bengali: Option<Vec<String>>,
    #[serde(default)]
    pub urdu: Option<Vec<String>>,
    #[serde(default)]
    pub turkish: Option<Vec<String>>,
    #[serde(default)]
    pub uzbek: Option<Vec<String>>,
}

impl SurahDetail {
    /// Verse translations in the requested language, falling back to English
    /// when the chapter does not carry that language.
    pub fn translation(&self, language: Language) -> &[String] {
        let preferred = match language {
            Language::English => Some(&self.english),
            Language::Bengali => self.bengali.as_ref(),
            Language::Urdu => self.urdu.as_ref(),
            Language::Turkish => self.turkish.as_ref(),
            Language::Uzbek => self.uzbek.as_ref(),
        };
        preferred.unwrap_or(&self.english)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AyahDetail {
    pub surah_name: String,
    pub surah_no: u16,
    pub ayah_no: u16,
    #[serde(default)]
    pub audio: HashMap<String, AudioReciter>,
    pub english: String,
    pub arabic1: String,
    #[serde(default)]
    pub arabic2: String,
    #[serde(default)]
    pub bengali: Option<String>,
    #[serde(default)]
    pub urdu: Option<String>,
    #[serde(default)]
    pub turkish: Option<String>,
    #[serde(default)]
    pub uzbek: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tafsir {
    pub author: String,
    #[serde(default)]
    pub group_verse: Option<String>,
    /// Loosely structured rich text, rendered read-only.
    pub content: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TafsirResponse {
    pub surah_name: String,
    pub surah_no: u16,
    pub ayah_no: u16,
    pub tafsirs: Vec<Tafsir>,
}

/// Reading position persisted across sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastRead {
    pub surah_no: u16,
    pub surah_name: String,
}
