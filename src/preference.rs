/// Small persisted preferences, global or keyed by player id
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};
use tracing::{debug, warn};

use crate::config;

/// Lobbies the player last selected
pub const MODE_PREFERENCE_KEY: &str = "modePreference";
/// UI language chosen at runtime
pub const LANGUAGE_KEY: &str = "language";

const PREFERENCE_FILE: &str = "preferences.json";

#[derive(Debug, Default, Serialize, Deserialize)]
struct PreferenceFile {
    #[serde(default)]
    global: BTreeMap<String, Value>,
    #[serde(default)]
    players: BTreeMap<u32, BTreeMap<String, Value>>,
}

#[derive(Debug)]
pub struct PreferenceStore {
    /// `None` keeps everything in memory
    path: Option<PathBuf>,
    data: Mutex<PreferenceFile>,
}

impl PreferenceStore {
    pub fn in_memory() -> Self {
        Self {
            path: None,
            data: Mutex::new(PreferenceFile::default()),
        }
    }

    /// Open the store at `path`; a missing or unreadable file starts empty
    pub fn open(path: PathBuf) -> Self {
        let data = match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                warn!("Ignoring invalid preference file {}: {}", path.display(), e);
                PreferenceFile::default()
            }),
            Err(_) => PreferenceFile::default(),
        };
        Self {
            path: Some(path),
            data: Mutex::new(data),
        }
    }

    /// Store in the XDG data directory, or in memory when there is none
    pub fn open_default() -> Self {
        match config::get_data_dir() {
            Some(dir) => Self::open(dir.join(PREFERENCE_FILE)),
            None => Self::in_memory(),
        }
    }

    pub fn load_player<T: DeserializeOwned>(&self, key: &str, player_id: u32, default: T) -> T {
        let data = self.data.lock().unwrap_or_else(PoisonError::into_inner);
        data.players
            .get(&player_id)
            .and_then(|prefs| prefs.get(key))
            .and_then(|value| serde_json::from_value(value.clone()).ok())
            .unwrap_or(default)
    }

    pub fn save_player<T: Serialize>(&self, key: &str, player_id: u32, value: &T) -> Result<()> {
        let value = serde_json::to_value(value)?;
        let mut data = self.data.lock().unwrap_or_else(PoisonError::into_inner);
        data.players
            .entry(player_id)
            .or_default()
            .insert(key.to_string(), value);
        debug!("PREFS: saved {} for player {}", key, player_id);
        self.persist(&data)
    }

    pub fn load_global<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let data = self.data.lock().unwrap_or_else(PoisonError::into_inner);
        data.global
            .get(key)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    pub fn save_global<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let value = serde_json::to_value(value)?;
        let mut data = self.data.lock().unwrap_or_else(PoisonError::into_inner);
        data.global.insert(key.to_string(), value);
        self.persist(&data)
    }

    fn persist(&self, data: &PreferenceFile) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let content = serde_json::to_string_pretty(data)?;
        fs::write(path, content).with_context(|| format!("writing {}", path.display()))
    }
}
