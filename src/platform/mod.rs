//! Platform abstraction layer
//!
//! Handles host differences for:
//! - Wall-clock time (death timer, touch debounce)
//! - The externally visible state token (URL-fragment style)

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Instant;

use crate::sim::GamePhase;

/// Monotonic wall-clock milliseconds
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Real time since construction
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Hand-driven clock; clones share the same time
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self {
            now: Rc::new(Cell::new(start_ms)),
        }
    }

    pub fn set(&self, ms: f64) {
        self.now.set(ms);
    }

    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

/// Externally observable and settable game phase
pub trait StateChannel {
    fn publish(&mut self, phase: GamePhase);
    /// Phase named by the channel at startup, if it names a valid one
    fn read_initial(&self) -> Option<GamePhase>;
}

/// Fragment-style channel: a `#name` string; clones share the fragment
#[derive(Debug, Clone, Default)]
pub struct FragmentChannel {
    fragment: Rc<RefCell<String>>,
}

impl FragmentChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Channel whose fragment is already set (e.g. by navigation)
    pub fn with_fragment(fragment: &str) -> Self {
        Self {
            fragment: Rc::new(RefCell::new(fragment.to_string())),
        }
    }

    pub fn fragment(&self) -> String {
        self.fragment.borrow().clone()
    }

    /// External navigation
    pub fn set_fragment(&self, fragment: &str) {
        *self.fragment.borrow_mut() = fragment.to_string();
    }
}

impl StateChannel for FragmentChannel {
    fn publish(&mut self, phase: GamePhase) {
        *self.fragment.borrow_mut() = format!("#{phase}");
    }

    fn read_initial(&self) -> Option<GamePhase> {
        let fragment = self.fragment.borrow();
        if fragment.trim().is_empty() {
            return None;
        }
        match fragment.parse() {
            Ok(phase) => Some(phase),
            Err(e) => {
                log::warn!("Ignoring initial state: {e}");
                None
            }
        }
    }
}

/// Channel that goes nowhere
#[derive(Debug, Clone, Copy, Default)]
pub struct NullChannel;

impl StateChannel for NullChannel {
    fn publish(&mut self, _phase: GamePhase) {}

    fn read_initial(&self) -> Option<GamePhase> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_shared() {
        let clock = ManualClock::new(10.0);
        let other = clock.clone();
        clock.advance(5.5);
        assert_eq!(other.now_ms(), 15.5);
        other.set(100.0);
        assert_eq!(clock.now_ms(), 100.0);
    }

    #[test]
    fn test_system_clock_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now_ms();
        let b = clock.now_ms();
        assert!(b >= a && a >= 0.0);
    }

    #[test]
    fn test_fragment_publish_and_read() {
        let mut channel = FragmentChannel::new();
        assert_eq!(channel.read_initial(), None);
        channel.publish(GamePhase::GameOver);
        assert_eq!(channel.fragment(), "#gameover");
        assert_eq!(channel.read_initial(), Some(GamePhase::GameOver));
    }

    #[test]
    fn test_fragment_invalid_initial() {
        let channel = FragmentChannel::with_fragment("#paused");
        assert_eq!(channel.read_initial(), None);
        channel.set_fragment("#PLAYING");
        assert_eq!(channel.read_initial(), Some(GamePhase::Playing));
    }
}
