//! Audio service
//!
//! Procedurally described sound cues - no external files needed. The
//! service owns the cue registry and the mute flag; an `AudioBackend`
//! turns tone descriptors into sound.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Cue names used by the game flow
pub mod cues {
    pub const FLAP: &str = "flap";
    pub const SCORE: &str = "score";
    pub const SWOOSH: &str = "swoosh";
    pub const HIT: &str = "hit";

    /// Every cue the game flow plays
    pub const ALL: [&str; 4] = [FLAP, SCORE, SWOOSH, HIT];
}

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Triangle,
    Sawtooth,
}

/// One oscillator with an exponential gain decay
#[derive(Debug, Clone, PartialEq)]
pub struct Voice {
    pub waveform: Waveform,
    pub start_hz: f32,
    /// Exponential sweep target, if the pitch moves
    pub end_hz: Option<f32>,
    /// Peak gain before master volume
    pub gain: f32,
    /// Start offset (s)
    pub delay: f64,
    /// Decay length (s)
    pub duration: f64,
}

impl Voice {
    const fn new(waveform: Waveform, start_hz: f32, gain: f32, duration: f64) -> Self {
        Self {
            waveform,
            start_hz,
            end_hz: None,
            gain,
            delay: 0.0,
            duration,
        }
    }

    fn sweep(mut self, end_hz: f32) -> Self {
        self.end_hz = Some(end_hz);
        self
    }

    fn delayed(mut self, delay: f64) -> Self {
        self.delay = delay;
        self
    }
}

/// A short layered sound
#[derive(Debug, Clone, PartialEq)]
pub struct Tone {
    pub voices: Vec<Voice>,
}

impl Tone {
    /// Flap - quick upward chirp
    pub fn chirp() -> Self {
        Self {
            voices: vec![Voice::new(Waveform::Triangle, 200.0, 0.3, 0.2).sweep(600.0)],
        }
    }

    /// Score - rising three-note ding
    pub fn ding() -> Self {
        Self {
            voices: [600.0, 800.0, 1000.0]
                .iter()
                .enumerate()
                .map(|(i, hz)| Voice::new(Waveform::Sine, *hz, 0.25, 0.15).delayed(i as f64 * 0.08))
                .collect(),
        }
    }

    /// Swoosh - falling whoosh
    pub fn whoosh() -> Self {
        Self {
            voices: vec![Voice::new(Waveform::Sine, 600.0, 0.3, 0.4).sweep(200.0)],
        }
    }

    /// Hit - solid thump
    pub fn thump() -> Self {
        Self {
            voices: vec![Voice::new(Waveform::Sine, 150.0, 0.6, 0.1).sweep(60.0)],
        }
    }

    /// Hit for themes with an explosion - boom plus a high crack
    pub fn boom() -> Self {
        Self {
            voices: vec![
                Voice::new(Waveform::Sawtooth, 100.0, 0.5, 0.4).sweep(30.0),
                Voice::new(Waveform::Square, 1500.0, 0.2, 0.1),
            ],
        }
    }

    /// Total length including delays (s)
    pub fn length(&self) -> f64 {
        self.voices
            .iter()
            .map(|v| v.delay + v.duration)
            .fold(0.0, f64::max)
    }
}

/// Something that can make a tone audible
pub trait AudioBackend {
    fn play_tone(&mut self, cue: &str, tone: &Tone, volume: f32);
}

/// Backend that discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullBackend;

impl AudioBackend for NullBackend {
    fn play_tone(&mut self, cue: &str, tone: &Tone, volume: f32) {
        log::trace!(
            "(silent) {cue}: {} voices, {:.2}s at {volume:.2}",
            tone.voices.len(),
            tone.length()
        );
    }
}

/// Backend that records cue names and volumes; clones share the same log
#[derive(Debug, Default, Clone)]
pub struct RecordingBackend {
    played: Rc<RefCell<Vec<(String, f32)>>>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cue names played so far, oldest first
    pub fn played(&self) -> Vec<String> {
        self.played.borrow().iter().map(|(cue, _)| cue.clone()).collect()
    }

    /// Volume of the most recent cue
    pub fn last_volume(&self) -> Option<f32> {
        self.played.borrow().last().map(|(_, volume)| *volume)
    }

    pub fn clear(&self) {
        self.played.borrow_mut().clear();
    }
}

impl AudioBackend for RecordingBackend {
    fn play_tone(&mut self, cue: &str, _tone: &Tone, volume: f32) {
        self.played.borrow_mut().push((cue.to_string(), volume));
    }
}

/// Named cues, mute flag and master volume
pub struct AudioService {
    backend: Box<dyn AudioBackend>,
    cues: HashMap<String, Tone>,
    master_volume: f32,
    muted: bool,
}

impl AudioService {
    /// Service with the standard cue set
    pub fn new(backend: Box<dyn AudioBackend>) -> Self {
        let mut service = Self::empty(backend);
        service.register(cues::FLAP, Tone::chirp());
        service.register(cues::SCORE, Tone::ding());
        service.register(cues::SWOOSH, Tone::whoosh());
        service.register(cues::HIT, Tone::thump());
        service
    }

    /// Standard cues, with the hit swapped for an explosion when the
    /// theme has one
    pub fn for_theme(backend: Box<dyn AudioBackend>, has_death_animation: bool) -> Self {
        let mut service = Self::new(backend);
        if has_death_animation {
            service.register(cues::HIT, Tone::boom());
        }
        service
    }

    /// Service with no cues registered
    pub fn empty(backend: Box<dyn AudioBackend>) -> Self {
        Self {
            backend,
            cues: HashMap::new(),
            master_volume: crate::consts::MASTER_VOLUME,
            muted: false,
        }
    }

    pub fn register(&mut self, name: &str, tone: Tone) {
        self.cues.insert(name.to_string(), tone);
    }

    pub fn has_cue(&self, name: &str) -> bool {
        self.cues.contains_key(name)
    }

    /// Cues in `names` with no registered tone
    pub fn missing_cues<'a>(&self, names: &[&'a str]) -> Vec<&'a str> {
        names.iter().copied().filter(|name| !self.has_cue(name)).collect()
    }

    /// Play a cue unless muted; unknown cues are skipped with a warning
    pub fn play(&mut self, name: &str) {
        if self.muted {
            return;
        }
        let Some(tone) = self.cues.get(name) else {
            log::warn!("No sound registered for cue '{name}'");
            return;
        };
        log::debug!("Playing cue '{name}'");
        self.backend.play_tone(name, tone, self.master_volume);
    }

    /// Flip the mute flag; returns the new value
    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        log::info!("Audio {}", if self.muted { "muted" } else { "unmuted" });
        self.muted
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    pub fn master_volume(&self) -> f32 {
        self.master_volume
    }
}

impl std::fmt::Debug for AudioService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioService")
            .field("cues", &self.cues.len())
            .field("master_volume", &self.master_volume)
            .field("muted", &self.muted)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recording() -> (AudioService, RecordingBackend) {
        let backend = RecordingBackend::new();
        (AudioService::new(Box::new(backend.clone())), backend)
    }

    #[test]
    fn test_play_registered_cue() {
        let (mut audio, backend) = recording();
        audio.play(cues::FLAP);
        audio.play(cues::SCORE);
        assert_eq!(backend.played(), vec!["flap", "score"]);
    }

    #[test]
    fn test_missing_cue_is_skipped() {
        let (mut audio, backend) = recording();
        audio.play("fanfare");
        audio.play(cues::HIT);
        assert_eq!(backend.played(), vec!["hit"]);
    }

    #[test]
    fn test_muted_plays_nothing() {
        let (mut audio, backend) = recording();
        assert!(audio.toggle_mute());
        audio.play(cues::SWOOSH);
        assert!(backend.played().is_empty());
        assert!(!audio.toggle_mute());
        audio.play(cues::SWOOSH);
        assert_eq!(backend.played(), vec!["swoosh"]);
    }

    #[test]
    fn test_theme_hit_tone() {
        let classic = AudioService::for_theme(Box::new(NullBackend), false);
        let night = AudioService::for_theme(Box::new(NullBackend), true);
        assert_eq!(classic.cues.get(cues::HIT), Some(&Tone::thump()));
        assert_eq!(night.cues.get(cues::HIT), Some(&Tone::boom()));
    }

    #[test]
    fn test_tone_length_includes_delay() {
        assert!((Tone::ding().length() - 0.31).abs() < 1e-9);
    }

    #[test]
    fn test_volume_clamped_and_applied() {
        let (mut audio, backend) = recording();
        audio.set_master_volume(3.0);
        assert_eq!(audio.master_volume(), 1.0);
        audio.set_master_volume(0.25);
        audio.play(cues::FLAP);
        assert_eq!(backend.last_volume(), Some(0.25));
    }

    #[test]
    fn test_missing_cues_listed() {
        let mut audio = AudioService::empty(Box::new(NullBackend));
        audio.register(cues::FLAP, Tone::chirp());
        assert_eq!(audio.missing_cues(&cues::ALL), vec!["score", "swoosh", "hit"]);
        assert!(AudioService::new(Box::new(NullBackend)).missing_cues(&cues::ALL).is_empty());
    }
}
