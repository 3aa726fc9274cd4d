//! Network Layer
//!
//! HTTP leaderboard service. Independent of the simulation in `game/`.

pub mod http;
pub mod protocol;
pub mod server;
pub mod service;
pub mod store;

pub use http::{HttpError, Request, Response};
pub use protocol::{
    ErrorResponse, LeaderboardResponse, SavedScore, Score, ScoreRecord, SubmitScoreRequest,
    SubmitScoreResponse,
};
pub use server::{ScoreServer, ServerError};
pub use service::{Leaderboard, ScoreError, ScoreService, DEFAULT_LEADERBOARD_SIZE};
pub use store::{JsonLinesScoreStore, MemoryScoreStore, ScoreStore, StoreError};
