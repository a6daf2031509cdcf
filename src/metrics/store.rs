//! JSON persistence for the high score and play count.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// The two counters kept between sessions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stats {
    pub high_score: u32,
    pub play_count: u32,
}

/// Stats file on disk
#[derive(Debug, Clone)]
pub struct StatsStore {
    path: PathBuf,
}

impl StatsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read stored stats; a missing file means nothing was recorded yet
    pub fn load(&self) -> Result<Stats> {
        if !self.path.exists() {
            debug!(path = ?self.path, "no stats file, starting from zero");
            return Ok(Stats::default());
        }
        let json = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read stats from {:?}", self.path))?;
        let stats = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse stats in {:?}", self.path))?;
        Ok(stats)
    }

    pub fn save(&self, stats: &Stats) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {:?}", parent))?;
            }
        }
        let json = serde_json::to_string_pretty(stats).context("Failed to serialize stats")?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Failed to write stats to {:?}", self.path))?;
        info!(
            high_score = stats.high_score,
            play_count = stats.play_count,
            "stats saved"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_loads_zeros() {
        let dir = tempdir().unwrap();
        let store = StatsStore::new(dir.path().join("stats.json"));
        assert_eq!(store.load().unwrap(), Stats::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let store = StatsStore::new(dir.path().join("nested").join("stats.json"));
        let stats = Stats {
            high_score: 340,
            play_count: 12,
        };

        store.save(&stats).unwrap();

        assert_eq!(store.load().unwrap(), stats);
        let raw = std::fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["high_score"], 340);
        assert_eq!(value["play_count"], 12);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stats.json");
        std::fs::write(&path, r#"{"high_score": 90}"#).unwrap();

        let stats = StatsStore::new(&path).load().unwrap();
        assert_eq!(stats.high_score, 90);
        assert_eq!(stats.play_count, 0);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stats.json");
        std::fs::write(&path, "not json").unwrap();

        let err = StatsStore::new(&path).load().unwrap_err();
        assert!(err.to_string().contains("Failed to parse stats"));
    }
}
