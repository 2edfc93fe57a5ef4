//! Deterministic shuffle engine
//!
//! All gameplay logic lives here. This module must stay pure and deterministic:
//! - Seeded RNG only
//! - Animation is requested, never performed
//! - No rendering or platform dependencies

pub mod arc;
pub mod choreo;
pub mod game;
pub mod guess;
pub mod level;
pub mod permutation;
pub mod player;
pub mod sequencer;

pub use arc::{ArcDescriptor, ArcPhase, RotationParity};
pub use choreo::{ChoreographyError, SlotMotion, choreograph, choreograph_step};
pub use game::{GameError, GameEvent, GamePhase, ShellGame};
pub use guess::evaluate_guess;
pub use level::{CLASSIC_SWAPS, Level, LevelStep, generate_level, generate_level_for, level_speed};
pub use permutation::{Permutation, PermutationError};
pub use player::{AnimationPlayer, HeadlessPlayer, PendingMotion, SwapTicket};
pub use sequencer::{
    SequencerError, SequencerEvent, SequencerPhase, ShuffleSequencer, StepProgress,
};
