//! Input gate
//!
//! Device events are sent into a single-consumer queue and drained by the
//! game once per tick, one event at a time. Each event resolves to at most
//! one `Action`, chosen by the handler registered for the current phase.

use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

use crate::sim::GamePhase;

/// Keys the gate distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Space,
    Tab,
    Enter,
    Escape,
    ArrowUp,
    Other,
}

impl KeyCode {
    /// Only these keys trigger actions
    pub fn is_action_key(&self) -> bool {
        matches!(self, KeyCode::Space | KeyCode::Tab)
    }
}

/// Raw device event with its wall-clock timestamp (ms)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeviceEvent {
    PointerDown { at_ms: f64 },
    KeyDown { key: KeyCode, at_ms: f64 },
    TouchStart { at_ms: f64 },
}

/// What a handler does when the gate fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Title -> Ready
    ShowReady,
    /// Ready -> Playing
    StartRun,
    /// Flap while playing
    Flap,
    /// Game over -> Ready with a fresh session
    Restart,
}

/// Producer side of the event queue
#[derive(Debug, Clone)]
pub struct InputSender {
    tx: Sender<DeviceEvent>,
}

impl InputSender {
    /// Queue an event; false once the gate has been cleaned up
    pub fn send(&self, event: DeviceEvent) -> bool {
        self.tx.send(event).is_ok()
    }

    pub fn pointer(&self, at_ms: f64) -> bool {
        self.send(DeviceEvent::PointerDown { at_ms })
    }

    pub fn key(&self, key: KeyCode, at_ms: f64) -> bool {
        self.send(DeviceEvent::KeyDown { key, at_ms })
    }

    pub fn touch(&self, at_ms: f64) -> bool {
        self.send(DeviceEvent::TouchStart { at_ms })
    }
}

/// Phase-keyed action mapping with enable gating and touch debounce
#[derive(Debug)]
pub struct InputGate {
    queue: Option<Receiver<DeviceEvent>>,
    tx: Option<Sender<DeviceEvent>>,
    handlers: HashMap<String, Action>,
    enabled: bool,
    debounce_ms: f64,
    last_touch_ms: Option<f64>,
}

fn normalize(state: &str) -> String {
    state.trim().trim_start_matches('#').to_lowercase()
}

impl InputGate {
    pub fn new(debounce_ms: f64) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            queue: Some(rx),
            tx: Some(tx),
            handlers: HashMap::new(),
            enabled: true,
            debounce_ms,
            last_touch_ms: None,
        }
    }

    /// A new producer handle. After `cleanup` the handle is already closed.
    pub fn sender(&self) -> InputSender {
        match &self.tx {
            Some(tx) => InputSender { tx: tx.clone() },
            None => {
                let (tx, _) = mpsc::channel();
                InputSender { tx }
            }
        }
    }

    /// Register (or replace) the action for a state name, any case
    pub fn add_handler(&mut self, state: &str, action: Action) {
        self.handlers.insert(normalize(state), action);
    }

    pub fn remove_handler(&mut self, state: &str) {
        self.handlers.remove(&normalize(state));
    }

    pub fn handler(&self, state: &str) -> Option<Action> {
        self.handlers.get(&normalize(state)).copied()
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled != enabled {
            log::debug!("Input {}", if enabled { "enabled" } else { "disabled" });
        }
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Next queued event, if any
    pub fn next_event(&mut self) -> Option<DeviceEvent> {
        let queue = self.queue.as_ref()?;
        match queue.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Decide what one event does in `phase`. Swallowed events leave the
    /// touch debounce window untouched.
    pub fn resolve(&mut self, event: &DeviceEvent, phase: GamePhase) -> Option<Action> {
        if matches!(*event, DeviceEvent::KeyDown { key, .. } if !key.is_action_key()) {
            return None;
        }

        if !self.enabled && phase != GamePhase::GameOver {
            log::debug!("Input swallowed in {phase}");
            return None;
        }

        match *event {
            DeviceEvent::KeyDown { .. } => {}
            DeviceEvent::TouchStart { at_ms } => {
                if self.within_touch_window(at_ms) {
                    log::debug!("Dropping touch inside debounce window");
                    return None;
                }
                self.last_touch_ms = Some(at_ms);
            }
            DeviceEvent::PointerDown { at_ms } => {
                // Pointer events right after a touch are synthesized copies
                if self.within_touch_window(at_ms) {
                    log::debug!("Dropping synthesized pointer event");
                    return None;
                }
            }
        }

        self.handlers.get(phase.as_str()).copied()
    }

    fn within_touch_window(&self, at_ms: f64) -> bool {
        self.last_touch_ms
            .is_some_and(|last| at_ms - last < self.debounce_ms)
    }

    /// Detach the queue; safe to call more than once
    pub fn cleanup(&mut self) {
        if self.queue.take().is_some() {
            log::info!("Input gate detached");
        }
        self.tx = None;
    }

    pub fn is_attached(&self) -> bool {
        self.queue.is_some()
    }
}
