//! Frame Display List
//!
//! Turns a [`GameState`] into backend-agnostic draw commands. A browser
//! host maps these onto canvas 2D calls; tests can inspect them directly.

use serde::Serialize;

use crate::core::shapes::{Circle, Rect};
use crate::game::state::GameState;

/// Background fill.
pub const BACKGROUND_COLOR: &str = "#151520";
/// Platform fill.
pub const PLATFORM_COLOR: &str = "#54546a";
/// Player fill.
pub const PLAYER_COLOR: &str = "#ffd000";
/// Coin fill.
pub const COIN_COLOR: &str = "#f2c94c";

/// One drawing primitive.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DrawCommand {
    /// Filled rectangle
    FillRect {
        /// Bounds
        rect: Rect,
        /// CSS color
        color: &'static str,
    },
    /// Filled circle
    FillCircle {
        /// Shape
        circle: Circle,
        /// CSS color
        color: &'static str,
    },
}

/// Build the draw list for one frame, back to front.
///
/// Background, platforms, player, then every uncollected coin.
pub fn render_frame(state: &GameState) -> Vec<DrawCommand> {
    let level = &state.level;
    let mut commands = Vec::with_capacity(2 + level.platforms.len() + state.coins.len());

    commands.push(DrawCommand::FillRect {
        rect: Rect::new(0.0, 0.0, level.canvas.x, level.canvas.y),
        color: BACKGROUND_COLOR,
    });

    commands.extend(level.platforms.iter().map(|p| DrawCommand::FillRect {
        rect: p.rect,
        color: PLATFORM_COLOR,
    }));

    commands.push(DrawCommand::FillRect {
        rect: state.player.rect(),
        color: PLAYER_COLOR,
    });

    commands.extend(
        state
            .coins
            .iter()
            .filter(|c| !c.collected)
            .map(|c| DrawCommand::FillCircle {
                circle: c.circle(),
                color: COIN_COLOR,
            }),
    );

    commands
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_frame() {
        let state = GameState::default();
        let commands = render_frame(&state);

        // background + 4 platforms + player + 3 coins
        assert_eq!(commands.len(), 9);
        assert_eq!(
            commands[0],
            DrawCommand::FillRect {
                rect: Rect::new(0.0, 0.0, 800.0, 450.0),
                color: BACKGROUND_COLOR,
            }
        );
        assert_eq!(
            commands[5],
            DrawCommand::FillRect {
                rect: Rect::new(50.0, 0.0, 32.0, 48.0),
                color: PLAYER_COLOR,
            }
        );
    }

    #[test]
    fn test_collected_coins_hidden() {
        let mut state = GameState::default();
        state.coins[1].collected = true;

        let circles: Vec<_> = render_frame(&state)
            .into_iter()
            .filter_map(|c| match c {
                DrawCommand::FillCircle { circle, .. } => Some(circle.center.x),
                _ => None,
            })
            .collect();

        assert_eq!(circles, vec![190.0, 590.0]);
    }
}
