use super::types::{SeasonData, SEASON_VERSION};
use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

/// Get the default season file path (~/.config/podium/season.json)
pub fn get_season_path() -> PathBuf {
    crate::config::get_config_dir().join("season.json")
}

/// Handle to the JSON document that stores one season.
///
/// Every operation that reads or writes season data receives this handle
/// (or the `SeasonData` it loaded) explicitly.
#[derive(Debug, Clone)]
pub struct SeasonStore {
    path: PathBuf,
}

impl SeasonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load season data from disk.
    ///
    /// Unlike config, a missing season file is an error: there is nothing to score.
    pub fn load(&self) -> Result<SeasonData> {
        if !self.path.exists() {
            anyhow::bail!("Season file not found at {}", self.path.display());
        }

        let file = File::open(&self.path)
            .with_context(|| format!("Failed to open season file at {}", self.path.display()))?;

        let season: SeasonData = serde_json::from_reader(file)
            .with_context(|| format!("Failed to parse season file at {}", self.path.display()))?;

        if season.version != SEASON_VERSION {
            anyhow::bail!("Unsupported season file version: {}", season.version);
        }

        tracing::debug!(
            races = season.races.len(),
            bets = season.bets.len(),
            results = season.results.len(),
            "Loaded season from {}",
            self.path.display()
        );

        Ok(season)
    }

    /// Save season data atomically
    ///
    /// The file is never left half-written. Parent directories are created if needed.
    pub fn save(&self, season: &SeasonData) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory {}", parent.display()))?;
            }
        }

        let mut file = AtomicWriteFile::open(&self.path)
            .with_context(|| format!("Failed to open atomic write file at {}", self.path.display()))?;

        serde_json::to_writer_pretty(&mut file, season).context("Failed to serialize season")?;

        file.commit().context("Failed to save season")?;

        tracing::info!("Saved season to {}", self.path.display());
        Ok(())
    }
}
