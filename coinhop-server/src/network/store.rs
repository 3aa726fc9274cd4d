//! Score Storage
//!
//! Append-only record storage behind the [`ScoreStore`] trait so the
//! backend can change without touching request handling.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use crate::network::protocol::ScoreRecord;

/// Score store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backing file failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Record could not be encoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Append-only collection of score records.
pub trait ScoreStore: Send + Sync {
    /// Add a record. Records are never updated or removed.
    fn append(&mut self, record: ScoreRecord) -> Result<(), StoreError>;

    /// Up to `n` records, highest score first.
    ///
    /// Equal scores keep insertion order.
    fn top_n(&self, n: usize) -> Vec<ScoreRecord>;

    /// Number of stored records.
    fn len(&self) -> usize;

    /// Is the store empty?
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Rank records by descending score. Stable, so ties keep input order.
pub fn rank_top_n<'a>(
    records: impl IntoIterator<Item = &'a ScoreRecord>,
    n: usize,
) -> Vec<ScoreRecord> {
    let mut ranked: Vec<ScoreRecord> = records.into_iter().cloned().collect();
    ranked.sort_by(|a, b| b.score.value().total_cmp(&a.score.value()));
    ranked.truncate(n);
    ranked
}

// =============================================================================
// IN-MEMORY
// =============================================================================

/// Unbounded in-memory list. Lost on restart.
#[derive(Debug, Default, Clone)]
pub struct MemoryScoreStore {
    records: Vec<ScoreRecord>,
}

impl MemoryScoreStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `records` in the given order.
    pub fn from_records(records: Vec<ScoreRecord>) -> Self {
        Self { records }
    }
}

impl ScoreStore for MemoryScoreStore {
    fn append(&mut self, record: ScoreRecord) -> Result<(), StoreError> {
        self.records.push(record);
        Ok(())
    }

    fn top_n(&self, n: usize) -> Vec<ScoreRecord> {
        rank_top_n(&self.records, n)
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}

// =============================================================================
// JSON LINES FILE
// =============================================================================

/// In-memory list mirrored to a JSON-lines file, one record per line.
///
/// Existing lines are loaded on open; unreadable lines are skipped with a
/// warning.
#[derive(Debug)]
pub struct JsonLinesScoreStore {
    path: PathBuf,
    file: File,
    memory: MemoryScoreStore,
}

impl JsonLinesScoreStore {
    /// Open (or create) the file at `path` and load its records.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let mut records = Vec::new();

        match File::open(&path) {
            Ok(existing) => {
                for (line_no, line) in BufReader::new(existing).lines().enumerate() {
                    let line = line?;
                    if line.trim().is_empty() {
                        continue;
                    }
                    match serde_json::from_str::<ScoreRecord>(&line) {
                        Ok(record) => records.push(record),
                        Err(e) => warn!(
                            "Skipping bad record at {}:{}: {}",
                            path.display(),
                            line_no + 1,
                            e
                        ),
                    }
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        info!("Loaded {} score records from {}", records.len(), path.display());

        Ok(Self {
            path,
            file,
            memory: MemoryScoreStore::from_records(records),
        })
    }

    /// Backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScoreStore for JsonLinesScoreStore {
    fn append(&mut self, record: ScoreRecord) -> Result<(), StoreError> {
        let mut line = serde_json::to_vec(&record)?;
        line.push(b'\n');
        self.file.write_all(&line)?;
        self.file.flush()?;

        // Only keep what reached the file
        self.memory.append(record)
    }

    fn top_n(&self, n: usize) -> Vec<ScoreRecord> {
        self.memory.top_n(n)
    }

    fn len(&self) -> usize {
        self.memory.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crate::network::protocol::Score;

    fn record(fid: u64, score: f64) -> ScoreRecord {
        ScoreRecord {
            fid: Some(fid),
            username: None,
            score: Score(score),
            created_at: Utc::now(),
        }
    }

    fn temp_path(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "coinhop-scores-{}-{}.jsonl",
            std::process::id(),
            name
        ));
        let _ = std::fs::remove_file(&path);
        path
    }

    #[test]
    fn test_memory_top_n_descending() {
        let mut store = MemoryScoreStore::new();
        store.append(record(1, 30.0)).unwrap();
        store.append(record(2, 50.0)).unwrap();
        store.append(record(3, 10.0)).unwrap();

        let top: Vec<f64> = store.top_n(25).iter().map(|r| r.score.value()).collect();
        assert_eq!(top, vec![50.0, 30.0, 10.0]);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let mut store = MemoryScoreStore::new();
        for fid in 0..5 {
            store.append(record(fid, 20.0)).unwrap();
        }
        store.append(record(9, 40.0)).unwrap();

        let fids: Vec<u64> = store.top_n(25).iter().filter_map(|r| r.fid).collect();
        assert_eq!(fids, vec![9, 0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_top_n_truncates() {
        let mut store = MemoryScoreStore::new();
        for i in 0..40 {
            store.append(record(i, i as f64)).unwrap();
        }
        let top = store.top_n(25);
        assert_eq!(top.len(), 25);
        assert_eq!(top[0].score, Score(39.0));
        assert_eq!(top[24].score, Score(15.0));
        assert_eq!(store.len(), 40);
    }

    #[test]
    fn test_empty_store() {
        let store = MemoryScoreStore::new();
        assert!(store.is_empty());
        assert!(store.top_n(25).is_empty());
    }

    #[test]
    fn test_json_lines_persists_across_reopen() {
        let path = temp_path("reopen");
        {
            let mut store = JsonLinesScoreStore::open(&path).unwrap();
            assert!(store.is_empty());
            store.append(record(1, 30.0)).unwrap();
            store.append(record(2, 50.0)).unwrap();
        }

        let reopened = JsonLinesScoreStore::open(&path).unwrap();
        assert_eq!(reopened.len(), 2);
        let fids: Vec<u64> = reopened.top_n(25).iter().filter_map(|r| r.fid).collect();
        assert_eq!(fids, vec![2, 1]);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_json_lines_skips_bad_lines() {
        let path = temp_path("bad-lines");
        let good = serde_json::to_string(&record(7, 5.0)).unwrap();
        std::fs::write(&path, format!("{}\nnot a record\n\n", good)).unwrap();

        let store = JsonLinesScoreStore::open(&path).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.path(), path.as_path());

        let _ = std::fs::remove_file(&path);
    }
}
