use std::path::{Path, PathBuf};

use loopcast::{ScheduleConfig, Track};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
pub struct Config {
    /// Identifies the channel in the anchor store
    pub name: String,
    /// Language of the primary track
    #[serde(default)]
    pub language: Option<String>,
    /// Where reference times are persisted. Kept in memory when unset.
    #[serde(default)]
    pub anchor_file: Option<PathBuf>,
    /// ffprobe executable, looked up in PATH when unset
    #[serde(default)]
    pub ffprobe: Option<PathBuf>,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    pub clips: Vec<ClipConfig>,
    /// Additional tracks, one path per clip
    #[serde(default)]
    pub tracks: Vec<Track>,
}

#[derive(Serialize, Deserialize)]
pub struct ClipConfig {
    pub path: String,
    /// Duration in milliseconds, probed when unset
    #[serde(default)]
    pub duration: Option<i64>,
}

impl Config {
    pub fn load(file: &Path) -> anyhow::Result<Self> {
        let data = std::fs::read_to_string(file)?;
        let config = toml::from_str(&data)?;
        Ok(config)
    }

    pub fn paths(&self) -> Vec<&str> {
        self.clips.iter().map(|c| c.path.as_str()).collect()
    }

    /// Durations of all clips, if every one of them is configured.
    pub fn known_durations(&self) -> Option<Vec<(String, i64)>> {
        self.clips
            .iter()
            .map(|c| c.duration.map(|d| (c.path.clone(), d)))
            .collect()
    }
}
