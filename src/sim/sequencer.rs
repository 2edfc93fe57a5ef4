//! Shuffle sequencer
//!
//! Drives a level step by step. All swaps of a step run concurrently; the
//! step is over only once every slot has reported completion, in whatever
//! order the renderer delivers them. Only then is the arrangement updated
//! and the next step started.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::choreo::{ChoreographyError, choreograph, choreograph_step};
use super::level::Level;
use super::permutation::{Permutation, PermutationError};
use super::player::{AnimationPlayer, SwapTicket};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SequencerError {
    #[error("a level is already running (step {step})")]
    Busy { step: usize },
    #[error("ticket {ticket:?} does not belong to the running step")]
    StaleTicket { ticket: SwapTicket },
    #[error("slot {slot} already reported completion")]
    DuplicateCompletion { slot: usize },
    #[error("step {step} moves {len} cups but the table has {cups}")]
    CupCountMismatch { step: usize, len: usize, cups: usize },
    #[error(transparent)]
    Choreography(#[from] ChoreographyError),
    #[error(transparent)]
    Permutation(#[from] PermutationError),
}

/// Sequencer state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SequencerPhase {
    #[default]
    Idle,
    /// Waiting on the swaps of step `k`
    RunningStep(usize),
    Done,
}

/// Emitted at step and level boundaries
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequencerEvent {
    StepCompleted { step: usize, cups: Permutation },
    LevelCompleted,
}

/// Completion bookkeeping for one running step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepProgress {
    pub step: usize,
    received: Vec<bool>,
    count: usize,
}

impl StepProgress {
    fn new(step: usize, target: usize) -> Self {
        Self {
            step,
            received: vec![false; target],
            count: 0,
        }
    }

    pub fn target(&self) -> usize {
        self.received.len()
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_complete(&self) -> bool {
        self.count == self.target()
    }

    fn record(&mut self, ticket: SwapTicket) -> Result<(), SequencerError> {
        let slot = ticket.slot;
        match self.received.get_mut(slot) {
            Some(seen) if *seen => Err(SequencerError::DuplicateCompletion { slot }),
            Some(seen) => {
                *seen = true;
                self.count += 1;
                Ok(())
            }
            None => Err(SequencerError::StaleTicket { ticket }),
        }
    }
}

/// Owns the accumulated cup arrangement and runs levels against it
#[derive(Debug, Clone)]
pub struct ShuffleSequencer {
    cups: Permutation,
    distance: f32,
    phase: SequencerPhase,
    level: Level,
    progress: Option<StepProgress>,
    run: u32,
}

impl ShuffleSequencer {
    /// `distance` is the spacing between neighbouring slots
    pub fn new(cups: usize, distance: f32) -> Self {
        Self {
            cups: Permutation::identity(cups),
            distance,
            phase: SequencerPhase::Idle,
            level: Level::default(),
            progress: None,
            run: 0,
        }
    }

    /// Current arrangement relative to the original slots
    pub fn cups(&self) -> &Permutation {
        &self.cups
    }

    pub fn cup_count(&self) -> usize {
        self.cups.len()
    }

    pub fn phase(&self) -> SequencerPhase {
        self.phase
    }

    pub fn progress(&self) -> Option<&StepProgress> {
        self.progress.as_ref()
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, SequencerPhase::RunningStep(_))
    }

    /// Start `level` from its first step
    ///
    /// Every step is checked up front, so a malformed level is rejected
    /// before any cup moves.
    pub fn run_level<P: AnimationPlayer + ?Sized>(
        &mut self,
        level: Level,
        player: &mut P,
    ) -> Result<Vec<SequencerEvent>, SequencerError> {
        if let SequencerPhase::RunningStep(step) = self.phase {
            return Err(SequencerError::Busy { step });
        }
        for (index, step) in level.steps().iter().enumerate() {
            if step.cup_count() != self.cup_count() {
                return Err(SequencerError::CupCountMismatch {
                    step: index,
                    len: step.cup_count(),
                    cups: self.cup_count(),
                });
            }
            choreograph_step(step, self.distance)?;
        }

        log::info!("Running level of {} steps", level.len());
        self.level = level;
        self.run = self.run.wrapping_add(1);

        let mut events = Vec::new();
        self.begin_step(0, player, &mut events)?;
        Ok(events)
    }

    /// Report one finished motion
    pub fn complete<P: AnimationPlayer + ?Sized>(
        &mut self,
        ticket: SwapTicket,
        player: &mut P,
    ) -> Result<Vec<SequencerEvent>, SequencerError> {
        let progress = match self.progress.as_mut() {
            Some(p) if ticket.run == self.run && ticket.step == p.step => p,
            _ => {
                log::warn!("Rejected stale ticket {ticket:?}");
                return Err(SequencerError::StaleTicket { ticket });
            }
        };
        if let Err(err) = progress.record(ticket) {
            log::warn!("Rejected completion {ticket:?}: {err}");
            return Err(err);
        }
        log::debug!(
            "Step {}: {}/{} motions finished",
            progress.step,
            progress.count(),
            progress.target()
        );

        let mut events = Vec::new();
        if progress.is_complete() {
            let step = progress.step;
            self.finish_step(step, &mut events)?;
            self.begin_step(step + 1, player, &mut events)?;
        }
        Ok(events)
    }

    /// Issue the motions of step `index`, or finish the level
    fn begin_step<P: AnimationPlayer + ?Sized>(
        &mut self,
        mut index: usize,
        player: &mut P,
        events: &mut Vec<SequencerEvent>,
    ) -> Result<(), SequencerError> {
        loop {
            let Some(step) = self.level.step(index) else {
                self.progress = None;
                self.phase = SequencerPhase::Done;
                log::info!("Level complete, cups at {}", self.cups);
                events.push(SequencerEvent::LevelCompleted);
                return Ok(());
            };

            self.phase = SequencerPhase::RunningStep(index);
            self.progress = Some(StepProgress::new(index, self.cups.len()));

            // Cup currently standing in each slot
            let placed = self.cups.invert();
            for slot in 0..self.cups.len() {
                let cup = placed.apply(slot)?;
                let motion = choreograph(step, slot, self.distance, player.rotation_parity(cup))?;
                let ticket = SwapTicket {
                    run: self.run,
                    step: index,
                    slot,
                };
                player.play(cup, motion, ticket);
            }
            log::debug!("Step {index}: {} issued", step.permutation);

            // Zero cups: nothing will ever report back
            if !self.cups.is_empty() {
                return Ok(());
            }
            self.finish_step(index, events)?;
            index += 1;
        }
    }

    fn finish_step(
        &mut self,
        index: usize,
        events: &mut Vec<SequencerEvent>,
    ) -> Result<(), SequencerError> {
        if let Some(step) = self.level.step(index) {
            self.cups = self.cups.then(&step.permutation)?;
        }
        events.push(SequencerEvent::StepCompleted {
            step: index,
            cups: self.cups.clone(),
        });
        Ok(())
    }
}
