//! High score tracking
//!
//! A single best score, persisted through the key-value store whenever it
//! changes. Never decreases.

use crate::persistence::{self, HIGH_SCORE_KEY, KeyValueStore};

/// Best score seen so far
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HighScore {
    best: u32,
}

impl HighScore {
    pub fn new(best: u32) -> Self {
        Self { best }
    }

    /// Load from the store (missing or malformed reads as 0)
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let best = persistence::load_u32(store, HIGH_SCORE_KEY);
        log::info!("Loaded high score {best}");
        Self { best }
    }

    pub fn get(&self) -> u32 {
        self.best
    }

    /// Raise to `score` if higher; returns true if the value changed
    pub fn record(&mut self, score: u32) -> bool {
        if score > self.best {
            self.best = score;
            true
        } else {
            false
        }
    }

    /// Record and persist on change. Write failures are logged; the value
    /// is still kept in memory.
    pub fn update(&mut self, score: u32, store: &mut dyn KeyValueStore) -> bool {
        if !self.record(score) {
            return false;
        }
        match persistence::save_u32(store, HIGH_SCORE_KEY, self.best) {
            Ok(()) => log::info!("High score saved ({})", self.best),
            Err(e) => log::warn!("Failed to save high score: {e}"),
        }
        true
    }
}
