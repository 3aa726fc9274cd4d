//! Level Layout
//!
//! Static geometry loaded once: canvas size, spawn point, platforms and
//! coin spots. Nothing here changes while the game runs.

use serde::{Deserialize, Serialize};

use crate::core::constants::{
    CANVAS_HEIGHT, CANVAS_WIDTH, COIN_RADIUS, FALL_MARGIN,
    PLAYER_HEIGHT, PLAYER_START, PLAYER_WIDTH,
};
use crate::core::shapes::Circle;
use crate::core::vec2::Vec2;
use crate::game::state::Platform;

/// Immutable level description.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Level {
    /// Canvas width (x) and height (y)
    pub canvas: Vec2,
    /// Distance below the canvas that triggers a level reset
    pub fall_margin: f64,
    /// Player spawn (top-left corner)
    pub player_start: Vec2,
    /// Player width and height
    pub player_size: Vec2,
    /// Platforms, in collision order
    pub platforms: Vec<Platform>,
    /// Coin spots
    pub coins: Vec<Circle>,
}

impl Level {
    /// The single built-in level: a ground slab and three stepping platforms,
    /// each with a coin floating above it.
    pub fn starter() -> Self {
        let coin = |x: f64, y: f64| Circle::new(Vec2::new(x, y), COIN_RADIUS);

        Self {
            canvas: Vec2::new(CANVAS_WIDTH, CANVAS_HEIGHT),
            fall_margin: FALL_MARGIN,
            player_start: Vec2::new(PLAYER_START.0, PLAYER_START.1),
            player_size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            platforms: vec![
                Platform::new(0.0, 400.0, 800.0, 50.0),
                Platform::new(150.0, 320.0, 120.0, 20.0),
                Platform::new(350.0, 260.0, 120.0, 20.0),
                Platform::new(550.0, 200.0, 120.0, 20.0),
            ],
            coins: vec![
                coin(190.0, 280.0),
                coin(390.0, 220.0),
                coin(590.0, 160.0),
            ],
        }
    }

    /// Rightmost x the player's left edge may reach.
    #[inline]
    pub fn max_player_x(&self) -> f64 {
        self.canvas.x - self.player_size.x
    }
}

impl Default for Level {
    fn default() -> Self {
        Self::starter()
    }
}
