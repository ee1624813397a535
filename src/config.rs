use chrono::{DateTime, Utc};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::PathBuf;

use crate::types::{DismissBehavior, HIDE_FADE};

#[derive(Parser)]
#[command(name = "smartstatus-demo", version, about = "Demo app for the smartstatus widget library")]
pub struct Cli {
    /// Fade-out duration in milliseconds used by hide and dismissal
    #[arg(long)]
    pub fade_ms: Option<u64>,
    /// The dismiss control destroys widgets instead of only hiding them
    #[arg(long)]
    pub destroy_on_dismiss: bool,
    /// Reset the saved configuration and exit
    #[arg(long)]
    pub reset: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedConfig {
    pub dismiss: DismissBehavior,
    pub fade_ms: u64,
    pub saved_at: DateTime<Utc>,
}

impl Default for SavedConfig {
    fn default() -> Self {
        SavedConfig {
            dismiss: DismissBehavior::default(),
            fade_ms: HIDE_FADE.as_millis() as u64,
            saved_at: Utc::now(),
        }
    }
}

fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("smartstatus").join("config.json"))
}

/// Saved configuration, if a readable one exists.
pub fn load_config() -> Option<SavedConfig> {
    let path = config_path()?;
    let raw = fs::read_to_string(path).ok()?;
    serde_json::from_str(&raw).ok()
}

pub fn save_config(config: &SavedConfig) -> io::Result<()> {
    let Some(path) = config_path() else {
        return Ok(());
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let raw = serde_json::to_string_pretty(config).map_err(io::Error::other)?;
    fs::write(path, raw)
}

/// Removes the saved configuration. Returns whether a file existed.
pub fn reset_config() -> io::Result<bool> {
    let Some(path) = config_path() else {
        return Ok(false);
    };
    if path.exists() {
        fs::remove_file(path)?;
        Ok(true)
    } else {
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saved_config_round_trips_through_json() {
        let config = SavedConfig {
            dismiss: DismissBehavior::Destroy,
            fade_ms: 800,
            saved_at: Utc::now(),
        };
        let raw = serde_json::to_string(&config).unwrap();
        let back: SavedConfig = serde_json::from_str(&raw).unwrap();
        assert_eq!(back.dismiss, DismissBehavior::Destroy);
        assert_eq!(back.fade_ms, 800);
    }
}
