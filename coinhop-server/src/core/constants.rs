//! Game Constants
//!
//! Tuning values for the platformer. All speeds are per frame
//! (one display refresh), distances in canvas pixels.

/// Downward acceleration added to `vy` every frame.
pub const GRAVITY: f64 = 0.6;

/// Horizontal speed while a direction is held.
pub const MOVE_SPEED: f64 = 3.0;

/// Vertical velocity applied on jump (negative = up).
pub const JUMP_VELOCITY: f64 = -12.0;

/// Points awarded per coin.
pub const COIN_VALUE: u32 = 10;

/// How far below the canvas the player may fall before the level resets.
pub const FALL_MARGIN: f64 = 50.0;

/// Canvas width.
pub const CANVAS_WIDTH: f64 = 800.0;

/// Canvas height.
pub const CANVAS_HEIGHT: f64 = 450.0;

/// Player width.
pub const PLAYER_WIDTH: f64 = 32.0;

/// Player height.
pub const PLAYER_HEIGHT: f64 = 48.0;

/// Player spawn position (top-left corner).
pub const PLAYER_START: (f64, f64) = (50.0, 0.0);

/// Coin radius.
pub const COIN_RADIUS: f64 = 8.0;
