use std::env;

pub const API_BASE: &str = "https://quranapi.pages.dev/api";
pub const AUDIO_BASE: &str = "https://the-quran-project.github.io/Quran-Audio/Data";
/// Mishary Rashid Al Afasy.
pub const DEFAULT_RECITER: &str = "1";

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub audio_base_url: String,
    pub reciter: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: API_BASE.to_string(),
            audio_base_url: AUDIO_BASE.to_string(),
            reciter: DEFAULT_RECITER.to_string(),
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Self {
        Self {
            base_url: env::var("NURQURAN_API_BASE").unwrap_or_else(|_| API_BASE.to_string()),
            audio_base_url: env::var("NURQURAN_AUDIO_BASE")
                .unwrap_or_else(|_| AUDIO_BASE.to_string()),
            reciter: env::var("NURQURAN_RECITER").unwrap_or_else(|_| DEFAULT_RECITER.to_string()),
        }
    }

    /// Per-verse audio is addressed purely by (reciter, chapter, verse);
    /// no discovery call is involved.
    pub fn verse_audio_url(&self, surah_no: u16, ayah_no: u16) -> String {
        format!(
            "{}/{}/{}_{}.mp3",
            self.audio_base_url, self.reciter, surah_no, ayah_no
        )
    }
}
