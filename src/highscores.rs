//! Best score persistence
//!
//! The session reads the best score once at startup and writes it back when
//! a run ends above it. Store failures never reach the simulation: the
//! session logs them and keeps playing.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Why a store could not be read or written
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("high score storage unavailable: {0}")]
    Io(#[from] io::Error),
    #[error("high score record is corrupt: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Where the best score lives between sessions
pub trait HighScoreStore {
    fn high_score(&self) -> Result<u64, StoreError>;
    fn set_high_score(&mut self, score: u64) -> Result<(), StoreError>;
}

/// In-process store, for tests and sessions that should not touch disk
#[derive(Debug, Clone, Default)]
pub struct MemoryHighScores {
    best: u64,
}

impl MemoryHighScores {
    pub fn new(best: u64) -> Self {
        Self { best }
    }
}

impl HighScoreStore for MemoryHighScores {
    fn high_score(&self) -> Result<u64, StoreError> {
        Ok(self.best)
    }

    fn set_high_score(&mut self, score: u64) -> Result<(), StoreError> {
        self.best = score;
        Ok(())
    }
}

/// On-disk record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HighScoreRecord {
    pub best: u64,
}

/// JSON file store. A missing file reads as a best of zero.
#[derive(Debug, Clone)]
pub struct FileHighScores {
    path: PathBuf,
}

impl FileHighScores {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HighScoreStore for FileHighScores {
    fn high_score(&self) -> Result<u64, StoreError> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log::info!("No high score at {}, starting fresh", self.path.display());
                return Ok(0);
            }
            Err(err) => return Err(err.into()),
        };
        let record: HighScoreRecord = serde_json::from_str(&json)?;
        log::info!("Loaded best score {}", record.best);
        Ok(record.best)
    }

    fn set_high_score(&mut self, score: u64) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&HighScoreRecord { best: score })?;
        fs::write(&self.path, json)?;
        log::info!("Best score {} saved to {}", score, self.path.display());
        Ok(())
    }
}
