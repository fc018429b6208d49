//! Fire-and-forget sound notifications
//!
//! The simulation never waits on audio. The session maps tick events to
//! sound effects and hands them to whatever sink the host provides.

use serde::{Deserialize, Serialize};

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundEffect {
    /// Player volley
    Shoot,
    /// Drone or boss shot
    EnemyShoot,
    MissileLaunch,
    /// Enemy destroyed or player hit
    Explosion,
    PowerUpCollected,
}

impl SoundEffect {
    /// Effect for a tick event, if it makes a sound
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Shoot => Some(SoundEffect::Shoot),
            GameEvent::EnemyShoot => Some(SoundEffect::EnemyShoot),
            GameEvent::MissileLaunch => Some(SoundEffect::MissileLaunch),
            GameEvent::Explosion => Some(SoundEffect::Explosion),
            GameEvent::PowerUpCollected(_) => Some(SoundEffect::PowerUpCollected),
            _ => None,
        }
    }

    /// Mix level relative to the other effects
    pub fn base_gain(&self) -> f32 {
        match self {
            SoundEffect::Shoot => 0.18,
            SoundEffect::EnemyShoot => 0.12,
            SoundEffect::MissileLaunch => 0.14,
            SoundEffect::Explosion => 0.25,
            SoundEffect::PowerUpCollected => 0.15,
        }
    }
}

/// Host audio backend
pub trait AudioSink {
    /// Start an effect at `gain`. Must not block.
    fn play(&mut self, effect: SoundEffect, gain: f32);
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl AudioSink for NullSink {
    fn play(&mut self, _effect: SoundEffect, _gain: f32) {}
}

/// Writes each effect to the log at trace level
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl AudioSink for LogSink {
    fn play(&mut self, effect: SoundEffect, gain: f32) {
        log::trace!("sound {:?} at gain {:.2}", effect, gain);
    }
}

/// Audio manager for the game
#[derive(Debug, Clone)]
pub struct AudioManager<S: AudioSink> {
    sink: S,
    volume: f32,
    muted: bool,
}

impl<S: AudioSink> AudioManager<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            volume: 0.8,
            muted: false,
        }
    }

    /// Set volume (0.0 - 1.0)
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Flip mute; returns the new state
    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.volume }
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let volume = self.effective_volume();
        if volume <= 0.0 {
            return;
        }
        self.sink.play(effect, effect.base_gain() * volume);
    }

    /// Play whatever the event sounds like
    pub fn notify(&mut self, event: &GameEvent) {
        if let Some(effect) = SoundEffect::for_event(event) {
            self.play(effect);
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}
