//! Shell Game - A cups-and-ball tracking game
//!
//! Core modules:
//! - `sim`: Deterministic shuffle engine (permutations, levels, choreography, game flow)
//! - `audio`: Sound cues and the injected sound player
//! - `records`: Best-score storage
//! - `settings`: Data-driven game configuration

pub mod audio;
pub mod records;
pub mod settings;
pub mod sim;

pub use audio::{NullSound, SoundEffect, SoundPlayer};
pub use records::{JsonFileRecordStore, MemoryRecordStore, RecordError, RecordStore};
pub use settings::{ConfigError, GameConfig};

/// Game configuration constants
pub mod consts {
    /// Cups on the table in the classic game
    pub const CUP_COUNT: usize = 3;
    /// Distance between neighbouring cup slots (metres in scene space)
    pub const CUP_SPACING: f32 = 0.11;

    /// How high a cup is raised to show the ball
    pub const CUP_LIFT_HEIGHT: f32 = 0.075;
    /// Duration of a single lift or lower (seconds)
    pub const CUP_LIFT_DURATION: f32 = 0.5;

    /// Every level shuffles this many steps more than its number
    pub const BASE_STEPS_PER_LEVEL: usize = 5;
    /// Speed of the first shuffle before difficulty scaling
    pub const BASE_SHUFFLE_SPEED: f32 = 0.5;
    /// Divisor flattening the logarithmic speed curve
    pub const SPEED_CURVE_DIVISOR: f32 = 5.0;

    /// Points for each level cleared
    pub const POINTS_PER_LEVEL: u64 = 10;
    /// Points lost for a wrong guess
    pub const WRONG_GUESS_PENALTY: u64 = 5;
}

/// Sign of an integer with zero counted as positive
#[inline]
pub fn sign(value: isize) -> f32 {
    if value < 0 { -1.0 } else { 1.0 }
}
