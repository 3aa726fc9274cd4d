//! Game Events
//!
//! Events generated during a tick, for the host UI, logging and replay checks.

use serde::{Deserialize, Serialize};

/// Game event data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEventData {
    /// Player left the ground with a jump
    Jumped,

    /// Player came to rest on a platform after being airborne
    Landed {
        /// Index into the level's platforms
        platform: usize,
    },

    /// Player picked up a coin
    CoinCollected {
        /// Index into the level's coins
        coin: usize,
        /// Score after the pickup
        new_score: u32,
    },

    /// Local best score went up
    BestRaised {
        /// New best
        best: u32,
    },

    /// Last coin of the level collected
    LevelCleared {
        /// Score at the time of clearing
        score: u32,
    },

    /// Player fell out and the level restarted
    LevelReset {
        /// Score discarded by the reset
        score_lost: u32,
    },
}

/// A game event stamped with the tick that produced it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameEvent {
    /// Tick when event occurred
    pub tick: u64,

    /// Event data
    pub data: GameEventData,
}

impl GameEvent {
    /// Create a new event.
    pub fn new(tick: u64, data: GameEventData) -> Self {
        Self { tick, data }
    }

    /// Create jumped event.
    pub fn jumped(tick: u64) -> Self {
        Self::new(tick, GameEventData::Jumped)
    }

    /// Create landed event.
    pub fn landed(tick: u64, platform: usize) -> Self {
        Self::new(tick, GameEventData::Landed { platform })
    }

    /// Create coin collected event.
    pub fn coin_collected(tick: u64, coin: usize, new_score: u32) -> Self {
        Self::new(tick, GameEventData::CoinCollected { coin, new_score })
    }

    /// Create best raised event.
    pub fn best_raised(tick: u64, best: u32) -> Self {
        Self::new(tick, GameEventData::BestRaised { best })
    }

    /// Create level cleared event.
    pub fn level_cleared(tick: u64, score: u32) -> Self {
        Self::new(tick, GameEventData::LevelCleared { score })
    }

    /// Create level reset event.
    pub fn level_reset(tick: u64, score_lost: u32) -> Self {
        Self::new(tick, GameEventData::LevelReset { score_lost })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_json_shape() {
        let event = GameEvent::coin_collected(12, 1, 20);
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(
            json,
            r#"{"tick":12,"data":{"type":"coin_collected","coin":1,"new_score":20}}"#
        );
    }

    #[test]
    fn test_unit_variant_json() {
        let json = serde_json::to_string(&GameEvent::jumped(3)).unwrap();
        assert_eq!(json, r#"{"tick":3,"data":{"type":"jumped"}}"#);
    }
}
