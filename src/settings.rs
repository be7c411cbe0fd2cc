//! Settings and environment lookup.
//!
//! Reads `$HOME/.setversion/settings.json` and uses its `env` map as a
//! fallback for environment variables, so a build agent (or a developer
//! reproducing a build) can point the tool at a properties file without
//! exporting the TeamCity environment.

use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Settings loaded from `$HOME/.setversion/settings.json`.
#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    /// Environment variable overrides.
    #[serde(default)]
    pub env: HashMap<String, String>,
}

impl Settings {
    /// Loads settings from the default location.
    pub fn load() -> Result<Self> {
        Self::load_from_path(Self::settings_path()?)
    }

    /// Loads settings from a specific path; a missing file yields defaults.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;

        serde_json::from_str::<Self>(&content)
            .with_context(|| format!("Failed to parse settings file: {}", path.display()))
    }

    /// Returns the default settings path.
    pub fn settings_path() -> Result<PathBuf> {
        let home_dir = dirs::home_dir().context("Failed to determine home directory")?;

        Ok(home_dir.join(".setversion").join("settings.json"))
    }

    /// Returns an environment variable, falling back to the settings map.
    pub fn get_env_var(&self, key: &str) -> Option<String> {
        match env::var(key) {
            Ok(value) => Some(value),
            Err(_) => self.env.get(key).cloned(),
        }
    }
}

/// Returns an environment variable, consulting the settings file when the
/// process environment does not define it.
pub fn get_env_var(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(value) => Some(value),
        Err(_) => Settings::load()
            .ok()
            .and_then(|settings| settings.env.get(key).cloned()),
    }
}
