//! # Coinhop
//!
//! Single-screen coin-collecting platformer simulation plus the
//! leaderboard service its players submit scores to.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        COINHOP                               │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Geometry and tuning constants             │
//! │  ├── vec2.rs     - 2D float vector                           │
//! │  ├── shapes.rs   - Rectangles and circles                    │
//! │  └── constants.rs- Physics and layout constants              │
//! │                                                              │
//! │  game/           - Simulation (deterministic)                │
//! │  ├── input.rs    - Held keys and input snapshots             │
//! │  ├── state.rs    - Player, coins, score                      │
//! │  ├── level.rs    - Level layout                              │
//! │  ├── tick.rs     - Per-frame step                            │
//! │  ├── collision.rs- Overlap tests, landing rule               │
//! │  ├── render.rs   - Draw list                                 │
//! │  ├── best.rs     - Best score persistence                    │
//! │  └── session.rs  - Frame driver                              │
//! │                                                              │
//! │  network/        - Leaderboard service                       │
//! │  ├── server.rs   - TCP accept loop and routing               │
//! │  ├── http.rs     - Minimal HTTP/1.1                          │
//! │  ├── protocol.rs - JSON bodies                               │
//! │  ├── service.rs  - Validation and ranking                    │
//! │  └── store.rs    - Score record storage                      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism
//!
//! `game::tick` depends only on the state, the input snapshot and `dt`.
//! Replaying the same snapshots from the same state gives the same result.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod config;
pub mod core;
pub mod game;
pub mod network;

// Re-export commonly used types
pub use config::ServerConfig;
pub use crate::core::{Circle, Rect, Vec2};
pub use game::{GameSession, GameState, InputSnapshot, Level};
pub use network::{ScoreServer, ScoreService};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Nominal display refresh rate (Hz)
pub const FRAME_RATE: u32 = 60;
