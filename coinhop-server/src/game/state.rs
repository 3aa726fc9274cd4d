//! Game State Definitions
//!
//! Everything the simulation mutates lives in one [`GameState`] value.
//! The static layout it was built from is kept alongside as a [`Level`].

use serde::{Deserialize, Serialize};

use crate::core::constants::COIN_VALUE;
use crate::core::shapes::{Circle, Rect};
use crate::core::vec2::Vec2;
use crate::game::level::Level;

// =============================================================================
// PLAYER
// =============================================================================

/// The single player-controlled body.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Top-left corner
    pub position: Vec2,
    /// Width and height
    pub size: Vec2,
    /// Velocity in pixels per frame
    pub velocity: Vec2,
    /// Resting on a platform top this frame
    pub grounded: bool,
}

impl PlayerState {
    /// Create a player at rest.
    pub fn new(position: Vec2, size: Vec2) -> Self {
        Self {
            position,
            size,
            velocity: Vec2::ZERO,
            grounded: false,
        }
    }

    /// Bounding rectangle.
    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.position, self.size)
    }

    /// Bottom edge y.
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.position.y + self.size.y
    }
}

// =============================================================================
// PLATFORMS & COINS
// =============================================================================

/// Static axis-aligned platform.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    /// Platform bounds
    pub rect: Rect,
}

impl Platform {
    /// Create a platform from its top-left corner and size.
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { rect: Rect::new(x, y, w, h) }
    }

    /// Top surface y (where a landed player's bottom rests).
    #[inline]
    pub fn top(&self) -> f64 {
        self.rect.top()
    }
}

/// A collectible coin.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CoinState {
    /// Centre point
    pub position: Vec2,
    /// Pickup radius
    pub radius: f64,
    /// Collected this level (stays true until the level resets)
    pub collected: bool,
}

impl CoinState {
    /// Create an uncollected coin from its layout circle.
    pub fn new(circle: Circle) -> Self {
        Self {
            position: circle.center,
            radius: circle.radius,
            collected: false,
        }
    }

    /// Pickup circle.
    #[inline]
    pub fn circle(&self) -> Circle {
        Circle::new(self.position, self.radius)
    }
}

// =============================================================================
// GAME STATE
// =============================================================================

/// Complete simulation state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Frames simulated since creation
    pub tick: u64,

    /// Static layout (canvas, platforms, coin spots, spawn)
    pub level: Level,

    /// The player
    pub player: PlayerState,

    /// Coins, parallel to `level.coins`
    pub coins: Vec<CoinState>,

    /// Score in the current attempt
    pub score: u32,

    /// Best score ever reached locally. Survives level resets.
    pub best: u32,

    /// Informational message for the host UI (e.g. level cleared)
    pub status: Option<String>,
}

impl GameState {
    /// Create a fresh state for `level` with no best score.
    pub fn new(level: Level) -> Self {
        Self::with_best(level, 0)
    }

    /// Create a fresh state, seeding `best` from storage.
    pub fn with_best(level: Level, best: u32) -> Self {
        let player = PlayerState::new(level.player_start, level.player_size);
        let coins = level.coins.iter().copied().map(CoinState::new).collect();

        Self {
            tick: 0,
            level,
            player,
            coins,
            score: 0,
            best,
            status: None,
        }
    }

    /// Put the player back at the spawn, restore all coins and zero the score.
    ///
    /// `best` and `status` are left untouched.
    pub fn reset_level(&mut self) {
        self.player = PlayerState::new(self.level.player_start, self.level.player_size);
        for coin in &mut self.coins {
            coin.collected = false;
        }
        self.score = 0;
    }

    /// Number of coins collected this level.
    pub fn collected_count(&self) -> usize {
        self.coins.iter().filter(|c| c.collected).count()
    }

    /// Are all coins collected?
    pub fn all_coins_collected(&self) -> bool {
        self.coins.iter().all(|c| c.collected)
    }

    /// Score implied by the collected coins.
    pub fn expected_score(&self) -> u32 {
        self.collected_count() as u32 * COIN_VALUE
    }

    /// Has the player fallen far enough below the canvas to reset?
    pub fn fell_out(&self) -> bool {
        self.player.position.y > self.level.canvas.y + self.level.fall_margin
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(Level::default())
    }
}

/// Status line shown once every coin has been picked up.
pub fn level_cleared_message(score: u32) -> String {
    format!("Level cleared! You can submit your score ({}) or share it.", score)
}
