//! Simulation Tick
//!
//! One call per display refresh. Pure with respect to the outside world:
//! the same state and input always produce the same next state, so the
//! loop can be driven headless in tests and replays.

use crate::core::constants::{COIN_VALUE, GRAVITY, JUMP_VELOCITY, MOVE_SPEED};
use crate::game::collision::{check_all_coin_collisions, lands_on};
use crate::game::events::GameEvent;
use crate::game::input::InputSnapshot;
use crate::game::state::{level_cleared_message, GameState};

/// Frame step for a display running at the reference rate.
pub const FRAME_DT: f64 = 1.0;

/// Result of a tick.
#[derive(Debug, Default)]
pub struct TickResult {
    /// Events generated this tick
    pub events: Vec<GameEvent>,
    /// `state.best` went up and should be persisted
    pub best_changed: bool,
    /// Player fell out and the level restarted
    pub level_reset: bool,
}

/// Run one simulation tick.
///
/// # Arguments
///
/// * `state` - The game state (will be mutated)
/// * `input` - Keys held at the start of this tick
/// * `dt` - Elapsed time in frames (`1.0` = one refresh at the reference rate)
///
/// Steps, in order: input, jump, gravity and integration, horizontal clamp,
/// platform landing, coin pickup, level-clear check, fall-through reset.
/// There is no failure path.
pub fn tick(state: &mut GameState, input: &InputSnapshot, dt: f64) -> TickResult {
    let mut result = TickResult::default();

    // 0. Advance tick counter
    state.tick += 1;

    // 1-2. Horizontal velocity and jump
    apply_input(state, input, &mut result);

    // 3. Gravity and integration
    integrate(state, dt);

    // 4. Keep inside the canvas horizontally
    clamp_to_canvas(state);

    // 5. Land on platforms
    resolve_platforms(state, dt, &mut result);

    // 6. Pick up coins
    process_coin_pickups(state, &mut result);

    // 7. Level clear
    check_level_clear(state);

    // 8. Fall-through reset
    check_fall_out(state, &mut result);

    result
}

/// Value-in, value-out variant of [`tick`].
pub fn advance(mut state: GameState, input: &InputSnapshot, dt: f64) -> (GameState, TickResult) {
    let result = tick(&mut state, input, dt);
    (state, result)
}

/// Set horizontal velocity from input and start a jump if grounded.
fn apply_input(state: &mut GameState, input: &InputSnapshot, result: &mut TickResult) {
    let player = &mut state.player;

    player.velocity.x = input.horizontal() * MOVE_SPEED;

    // No double jump: only from the ground
    if input.jump && player.grounded {
        player.velocity.y = JUMP_VELOCITY;
        player.grounded = false;
        result.events.push(GameEvent::jumped(state.tick));
    }
}

/// Apply gravity and move.
///
/// Gravity is applied even while grounded; the landing pass snaps the
/// player back onto the platform.
fn integrate(state: &mut GameState, dt: f64) {
    let player = &mut state.player;

    player.velocity.y += GRAVITY * dt;
    player.position += player.velocity * dt;
}

/// Clamp x to `[0, canvas_width - width]`. No vertical clamp.
fn clamp_to_canvas(state: &mut GameState) {
    let canvas_width = state.level.canvas.x;
    let max_x = state.level.max_player_x();
    let player = &mut state.player;

    if player.position.x < 0.0 {
        player.position.x = 0.0;
    }
    if player.position.x + player.size.x > canvas_width {
        player.position.x = max_x;
    }
}

/// Snap onto any platform the player fell onto from above.
fn resolve_platforms(state: &mut GameState, dt: f64, result: &mut TickResult) {
    let was_grounded = state.player.grounded;
    state.player.grounded = false;

    let mut landed_on = None;
    for (index, platform) in state.level.platforms.iter().enumerate() {
        if lands_on(&state.player, platform, dt) {
            state.player.position.y = platform.top() - state.player.size.y;
            state.player.velocity.y = 0.0;
            state.player.grounded = true;
            landed_on = Some(index);
        }
    }

    if let Some(index) = landed_on {
        if !was_grounded {
            result.events.push(GameEvent::landed(state.tick, index));
        }
    }
}

/// Collect touched coins, update score and best.
fn process_coin_pickups(state: &mut GameState, result: &mut TickResult) {
    let collected = check_all_coin_collisions(state);
    if collected.is_empty() {
        return;
    }

    for index in collected {
        state.coins[index].collected = true;
        state.score += COIN_VALUE;
        result
            .events
            .push(GameEvent::coin_collected(state.tick, index, state.score));

        if state.score > state.best {
            state.best = state.score;
            result.best_changed = true;
            result.events.push(GameEvent::best_raised(state.tick, state.best));
        }
    }

    if state.all_coins_collected() {
        result
            .events
            .push(GameEvent::level_cleared(state.tick, state.score));
    }

    debug_assert_eq!(state.score, state.expected_score());
}

/// Surface the clear message while every coin is collected.
///
/// Purely informational: coins stay collected and play continues.
fn check_level_clear(state: &mut GameState) {
    if state.all_coins_collected() {
        state.status = Some(level_cleared_message(state.score));
    }
}

/// Restart the level if the player dropped below the canvas.
fn check_fall_out(state: &mut GameState, result: &mut TickResult) {
    if !state.fell_out() {
        return;
    }

    result
        .events
        .push(GameEvent::level_reset(state.tick, state.score));
    state.reset_level();
    result.level_reset = true;
}

/// Replay a recorded input sequence at the reference frame step.
///
/// Returns the final state and every event produced.
pub fn replay(initial: GameState, inputs: &[InputSnapshot]) -> (GameState, Vec<GameEvent>) {
    let mut state = initial;
    let mut all_events = Vec::new();

    for input in inputs {
        let result = tick(&mut state, input, FRAME_DT);
        all_events.extend(result.events);
    }

    (state, all_events)
}
