//! Collision Detection
//!
//! Rectangle overlap, circle-vs-rectangle pickup tests and the
//! one-way landing rule for platforms.

use crate::core::shapes::{Circle, Rect};
use crate::game::state::{CoinState, GameState, Platform, PlayerState};

/// Check if two rectangles overlap. Touching edges do not count.
#[inline]
pub fn rects_overlap(a: &Rect, b: &Rect) -> bool {
    a.left() < b.right()
        && a.right() > b.left()
        && a.top() < b.bottom()
        && a.bottom() > b.top()
}

/// Check if a circle overlaps a rectangle.
///
/// Clamps the centre to the rectangle and compares the squared distance
/// to the squared radius. A circle exactly touching the edge does not count.
#[inline]
pub fn circle_overlaps_rect(circle: &Circle, rect: &Rect) -> bool {
    let closest = rect.closest_point(circle.center);
    circle.center.distance_squared(closest) < circle.radius * circle.radius
}

/// Check if the player lands on `platform` after moving for `dt` frames.
///
/// A landing needs overlap, downward velocity, and the bottom edge minus
/// this frame's fall (`bottom - vy * dt`) at or above the platform top.
/// Side and head hits never land.
pub fn lands_on(player: &PlayerState, platform: &Platform, dt: f64) -> bool {
    if !rects_overlap(&player.rect(), &platform.rect) {
        return false;
    }

    player.velocity.y > 0.0 && player.bottom() - player.velocity.y * dt <= platform.top()
}

/// Check if the player picks up a coin.
pub fn check_coin_collision(player: &PlayerState, coin: &CoinState) -> bool {
    if coin.collected {
        return false;
    }

    circle_overlaps_rect(&coin.circle(), &player.rect())
}

/// Indices of every uncollected coin the player touches, in level order.
pub fn check_all_coin_collisions(state: &GameState) -> Vec<usize> {
    state
        .coins
        .iter()
        .enumerate()
        .filter(|(_, coin)| check_coin_collision(&state.player, coin))
        .map(|(i, _)| i)
        .collect()
}
