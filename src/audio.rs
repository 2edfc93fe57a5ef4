//! Sound cues
//!
//! The game only decides *which* cue plays; the host owns the audio device
//! and is handed to the game as a [`SoundPlayer`].

use serde::{Deserialize, Serialize};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundEffect {
    /// Player found the ball
    Success,
    /// Player picked an empty cup
    Fail,
}

impl SoundEffect {
    /// Asset the host is expected to load for this cue
    pub fn asset_name(&self) -> &'static str {
        match self {
            SoundEffect::Success => "sounds/success.wav",
            SoundEffect::Fail => "sounds/fail.mp3",
        }
    }
}

/// Host-side audio collaborator
pub trait SoundPlayer {
    fn play(&mut self, effect: SoundEffect);
}

/// Player that only logs, for headless runs
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSound;

impl SoundPlayer for NullSound {
    fn play(&mut self, effect: SoundEffect) {
        log::debug!("Sound: {effect:?} ({})", effect.asset_name());
    }
}

/// Records every cue, for tests and replays
impl SoundPlayer for Vec<SoundEffect> {
    fn play(&mut self, effect: SoundEffect) {
        self.push(effect);
    }
}
