//! Game Session
//!
//! Drives the simulation the way a display loop would: input callbacks
//! mutate held keys, each frame snapshots them, ticks, persists a new best
//! and hands back a draw list.

use tracing::{debug, info, warn};

use crate::game::best::BestScoreStore;
use crate::game::events::GameEventData;
use crate::game::input::{Action, HeldKeys};
use crate::game::level::Level;
use crate::game::render::{render_frame, DrawCommand};
use crate::game::state::GameState;
use crate::game::tick::{tick, TickResult};

/// A running single-player session.
pub struct GameSession {
    state: GameState,
    keys: HeldKeys,
    best_store: Box<dyn BestScoreStore>,
}

impl GameSession {
    /// Start a session on `level`, seeding the best score from `best_store`.
    ///
    /// A store that cannot be read starts from 0.
    pub fn new(level: Level, best_store: Box<dyn BestScoreStore>) -> Self {
        let best = match best_store.load() {
            Ok(best) => best,
            Err(e) => {
                warn!("Failed to load best score, starting from 0: {}", e);
                0
            }
        };
        info!("Session started (best: {})", best);

        Self {
            state: GameState::with_best(level, best),
            keys: HeldKeys::new(),
            best_store,
        }
    }

    /// Current state.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Keyboard key pressed.
    pub fn key_down(&mut self, key: &str) {
        self.keys.key_down(key);
    }

    /// Keyboard key released.
    pub fn key_up(&mut self, key: &str) {
        self.keys.key_up(key);
    }

    /// On-screen button pressed.
    pub fn press(&mut self, action: Action) {
        self.keys.press(action);
    }

    /// On-screen button released.
    pub fn release(&mut self, action: Action) {
        self.keys.release(action);
    }

    /// Advance one frame of `dt` frames and return what happened.
    pub fn frame(&mut self, dt: f64) -> TickResult {
        let input = self.keys.snapshot();
        let result = tick(&mut self.state, &input, dt);

        if result.best_changed {
            if let Err(e) = self.best_store.save(self.state.best) {
                warn!("Failed to persist best score {}: {}", self.state.best, e);
            }
        }

        for event in &result.events {
            match &event.data {
                GameEventData::LevelCleared { score } => {
                    info!("Level cleared at tick {} with score {}", event.tick, score);
                }
                GameEventData::LevelReset { score_lost } => {
                    info!("Fell out at tick {}, lost {} points", event.tick, score_lost);
                }
                other => debug!("Tick {}: {:?}", event.tick, other),
            }
        }

        result
    }

    /// Draw list for the current state.
    pub fn render(&self) -> Vec<DrawCommand> {
        render_frame(&self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::vec2::Vec2;
    use crate::game::best::{BestStoreError, MemoryBestStore};
    use crate::game::tick::FRAME_DT;
    use std::sync::{Arc, Mutex};

    /// Store that shares its slot with the test.
    #[derive(Clone, Default)]
    struct SharedStore(Arc<Mutex<u32>>);

    impl BestScoreStore for SharedStore {
        fn load(&self) -> Result<u32, BestStoreError> {
            Ok(*self.0.lock().unwrap())
        }

        fn save(&mut self, best: u32) -> Result<(), BestStoreError> {
            *self.0.lock().unwrap() = best;
            Ok(())
        }
    }

    struct BrokenStore;

    impl BestScoreStore for BrokenStore {
        fn load(&self) -> Result<u32, BestStoreError> {
            Err(BestStoreError::Malformed("broken".into()))
        }

        fn save(&mut self, _best: u32) -> Result<(), BestStoreError> {
            Err(BestStoreError::Malformed("broken".into()))
        }
    }

    #[test]
    fn test_loads_best_from_store() {
        let mut store = MemoryBestStore::new();
        store.save(70).unwrap();
        let session = GameSession::new(Level::starter(), Box::new(store));
        assert_eq!(session.state().best, 70);
    }

    #[test]
    fn test_persists_new_best() {
        let store = SharedStore::default();
        let mut session = GameSession::new(Level::starter(), Box::new(store.clone()));

        session.state.player.position = Vec2::new(175.0, 250.0);
        let result = session.frame(FRAME_DT);

        assert!(result.best_changed);
        assert_eq!(*store.0.lock().unwrap(), 10);
    }

    #[test]
    fn test_broken_store_does_not_stop_play() {
        let mut session = GameSession::new(Level::starter(), Box::new(BrokenStore));
        assert_eq!(session.state().best, 0);

        session.state.player.position = Vec2::new(175.0, 250.0);
        session.frame(FRAME_DT);
        assert_eq!(session.state().score, 10);
        assert_eq!(session.state().best, 10);
    }

    #[test]
    fn test_keys_drive_frames() {
        let mut session = GameSession::new(Level::starter(), Box::new(MemoryBestStore::new()));
        for _ in 0..100 {
            session.frame(FRAME_DT);
        }
        assert!(session.state().player.grounded);

        session.key_down("ArrowRight");
        session.frame(FRAME_DT);
        assert_eq!(session.state().player.position.x, 53.0);

        session.key_up("ArrowRight");
        session.press(Action::Left);
        session.frame(FRAME_DT);
        assert_eq!(session.state().player.position.x, 50.0);

        session.release(Action::Left);
        session.frame(FRAME_DT);
        assert_eq!(session.state().player.position.x, 50.0);

        assert_eq!(session.render().len(), 9);
    }
}
