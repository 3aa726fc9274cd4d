//! Best Score Storage
//!
//! The local best survives level resets and restarts. Storage sits behind
//! [`BestScoreStore`] so the simulation never touches the filesystem.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use thiserror::Error;

/// Key the best score is stored under.
pub const BEST_SCORE_KEY: &str = "bestScore";

/// Best score storage errors.
#[derive(Debug, Error)]
pub enum BestStoreError {
    /// Filesystem failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File is not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File is JSON but not a key-value object, or the value is unusable.
    #[error("Malformed best score file: {0}")]
    Malformed(String),
}

/// Persistent slot for the local best score.
pub trait BestScoreStore: Send {
    /// Read the stored best. An empty store reads as 0.
    fn load(&self) -> Result<u32, BestStoreError>;

    /// Overwrite the stored best.
    fn save(&mut self, best: u32) -> Result<(), BestStoreError>;
}

/// In-process store. Lost on exit.
#[derive(Debug, Default, Clone)]
pub struct MemoryBestStore {
    best: u32,
}

impl MemoryBestStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl BestScoreStore for MemoryBestStore {
    fn load(&self) -> Result<u32, BestStoreError> {
        Ok(self.best)
    }

    fn save(&mut self, best: u32) -> Result<(), BestStoreError> {
        self.best = best;
        Ok(())
    }
}

/// JSON key-value file, e.g. `{"bestScore": 30}`.
///
/// Other keys in the file are preserved on save.
#[derive(Debug, Clone)]
pub struct FileBestStore {
    path: PathBuf,
}

impl FileBestStore {
    /// Store backed by `path`. The file is created on first save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<Map<String, Value>, BestStoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str::<Value>(&text)? {
            Value::Object(map) => Ok(map),
            other => Err(BestStoreError::Malformed(format!(
                "expected object, found {}",
                other
            ))),
        }
    }
}

impl BestScoreStore for FileBestStore {
    fn load(&self) -> Result<u32, BestStoreError> {
        let map = self.read_map()?;

        // Numbers and numeric strings are both accepted
        match map.get(BEST_SCORE_KEY) {
            None | Some(Value::Null) => Ok(0),
            Some(Value::Number(n)) => n
                .as_u64()
                .and_then(|v| u32::try_from(v).ok())
                .ok_or_else(|| BestStoreError::Malformed(format!("bad best score {}", n))),
            Some(Value::String(s)) => s
                .trim()
                .parse::<u32>()
                .map_err(|_| BestStoreError::Malformed(format!("bad best score {:?}", s))),
            Some(other) => Err(BestStoreError::Malformed(format!(
                "bad best score {}",
                other
            ))),
        }
    }

    fn save(&mut self, best: u32) -> Result<(), BestStoreError> {
        let mut map = self.read_map()?;
        map.insert(BEST_SCORE_KEY.to_string(), Value::from(best));

        // Write beside the target, then swap in
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(&Value::Object(map))?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
