//! Game Logic Module
//!
//! Platformer simulation. Deterministic and free of I/O except for
//! `session`, which persists the best score and logs.
//!
//! ## Module Structure
//!
//! - `input`: Held keys and per-tick input snapshots
//! - `state`: Player, platforms, coins, game state
//! - `level`: Static level layout
//! - `tick`: Simulation step
//! - `collision`: Overlap tests and the landing rule
//! - `events`: Per-tick game events
//! - `render`: Draw list for a frame
//! - `best`: Best score storage
//! - `session`: Frame driver tying the above together

pub mod best;
pub mod collision;
pub mod events;
pub mod input;
pub mod level;
pub mod render;
pub mod session;
pub mod state;
pub mod tick;

// Re-export key types
pub use best::{BestScoreStore, FileBestStore, MemoryBestStore};
pub use events::{GameEvent, GameEventData};
pub use input::{Action, HeldKeys, InputSnapshot};
pub use level::Level;
pub use session::GameSession;
pub use state::{CoinState, GameState, Platform, PlayerState};
pub use tick::{advance, replay, tick, TickResult, FRAME_DT};
