pub mod prefs;

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use tracing::{debug, warn};

/// Durable string-keyed settings, one JSON object per profile. Reads at
/// startup tolerate a missing or malformed file by starting empty; every
/// mutation synchronously rewrites the whole file. A failed write keeps the
/// in-memory value and is never surfaced to the caller.
pub struct SettingsStore {
    path: PathBuf,
    values: HashMap<String, String>,
}

impl SettingsStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<HashMap<String, String>>(&raw) {
                Ok(values) => values,
                Err(err) => {
                    warn!(path = %path.display(), %err, "settings file malformed, starting empty");
                    HashMap::new()
                }
            },
            Err(err) => {
                debug!(path = %path.display(), %err, "no readable settings file, starting empty");
                HashMap::new()
            }
        };

        Self { path, values }
    }

    pub fn open_default() -> Self {
        Self::open(default_settings_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(key.to_string(), value.into());
        self.persist();
    }

    fn persist(&self) {
        if let Some(parent) = self.path.parent()
            && let Err(err) = fs::create_dir_all(parent)
        {
            warn!(path = %self.path.display(), %err, "settings not persisted");
            return;
        }

        match serde_json::to_string_pretty(&self.values) {
            Ok(raw) => {
                if let Err(err) = fs::write(&self.path, raw) {
                    warn!(path = %self.path.display(), %err, "settings not persisted");
                }
            }
            Err(err) => warn!(%err, "settings not serializable"),
        }
    }
}

fn default_settings_path() -> PathBuf {
    ProjectDirs::from("", "", "nurquran")
        .map(|dirs| dirs.config_dir().join("settings.json"))
        .unwrap_or_else(|| PathBuf::from("nurquran-settings.json"))
}
