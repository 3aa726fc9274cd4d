//! Score Service
//!
//! Validates submissions and serves the ranked leaderboard. Anyone may
//! submit any score under any claimed identity: there is no auth, rate
//! limiting or deduplication.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{info, instrument};

use crate::network::protocol::{SavedScore, Score, ScoreRecord, SubmitScoreRequest};
use crate::network::store::{ScoreStore, StoreError};

/// Default number of entries returned by the leaderboard.
pub const DEFAULT_LEADERBOARD_SIZE: usize = 25;

/// Score service errors.
#[derive(Debug, Error)]
pub enum ScoreError {
    /// Score missing, not a number, not finite, or negative.
    #[error("invalid score")]
    InvalidScore,

    /// Backend failed to store the record.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// The blocking append task panicked or was cancelled.
    #[error("Store task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Ranked view of the store.
#[derive(Debug, Clone)]
pub struct Leaderboard {
    /// Highest scores first
    pub top: Vec<ScoreRecord>,
    /// Number of stored records
    pub total: usize,
}

/// Leaderboard service over a shared store.
pub struct ScoreService {
    store: Arc<RwLock<Box<dyn ScoreStore>>>,
    leaderboard_size: usize,
}

impl ScoreService {
    /// Create a service over `store`.
    pub fn new(store: Box<dyn ScoreStore>) -> Self {
        Self::with_leaderboard_size(store, DEFAULT_LEADERBOARD_SIZE)
    }

    /// Create a service returning up to `leaderboard_size` entries.
    pub fn with_leaderboard_size(store: Box<dyn ScoreStore>, leaderboard_size: usize) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            leaderboard_size,
        }
    }

    /// Validate and append a submission, echoing what was saved.
    ///
    /// Rejected submissions leave the store untouched. The append runs on
    /// the blocking pool since file-backed stores write synchronously.
    #[instrument(skip(self))]
    pub async fn submit(&self, request: SubmitScoreRequest) -> Result<SavedScore, ScoreError> {
        let score = validate_score(request.score)?;

        let record = ScoreRecord {
            fid: request.fid,
            username: request.username,
            score,
            created_at: Utc::now(),
        };
        let saved = SavedScore {
            fid: record.fid,
            username: record.username.clone(),
            score,
        };

        let mut store = self.store.clone().write_owned().await;
        let total = tokio::task::spawn_blocking(move || {
            store.append(record)?;
            Ok::<_, StoreError>(store.len())
        })
        .await??;
        info!("Score {} saved ({} total)", score.value(), total);

        Ok(saved)
    }

    /// Top records by descending score plus the total count.
    pub async fn leaderboard(&self) -> Leaderboard {
        let store = self.store.read().await;
        Leaderboard {
            top: store.top_n(self.leaderboard_size),
            total: store.len(),
        }
    }

    /// Number of stored records.
    pub async fn total(&self) -> usize {
        self.store.read().await.len()
    }
}

/// Accept finite, non-negative scores only.
pub fn validate_score(score: Option<f64>) -> Result<Score, ScoreError> {
    match score {
        Some(v) if v.is_finite() && v >= 0.0 => Ok(Score(v)),
        _ => Err(ScoreError::InvalidScore),
    }
}
