//! Animation player contract and a headless implementation

use serde::{Deserialize, Serialize};

use super::arc::RotationParity;
use super::choreo::SlotMotion;

/// Ties an animation completion back to the step and slot that started it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SwapTicket {
    /// Level run the ticket belongs to
    pub run: u32,
    pub step: usize,
    pub slot: usize,
}

/// Renderer-side collaborator that animates cups
///
/// `play` must not block; the host reports each ticket back to the
/// sequencer exactly once when the motion has finished.
pub trait AnimationPlayer {
    /// Current facing of `cup`
    fn rotation_parity(&self, cup: usize) -> RotationParity;

    /// Start animating `cup` with `motion`
    fn play(&mut self, cup: usize, motion: SlotMotion, ticket: SwapTicket);

    /// Number of cups the player can animate, when it knows
    fn cup_count(&self) -> Option<usize> {
        None
    }
}

/// A started animation waiting to be finished
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingMotion {
    pub cup: usize,
    pub motion: SlotMotion,
    pub ticket: SwapTicket,
}

/// Player with no renderer: queues motions and tracks cup facing
#[derive(Debug, Clone, Default)]
pub struct HeadlessPlayer {
    parities: Vec<RotationParity>,
    pending: Vec<PendingMotion>,
    /// Sum of the longest motion of every finished batch (seconds)
    pub elapsed: f32,
}

impl HeadlessPlayer {
    pub fn new(cups: usize) -> Self {
        Self {
            parities: vec![RotationParity::Forward; cups],
            pending: Vec::new(),
            elapsed: 0.0,
        }
    }

    pub fn pending(&self) -> &[PendingMotion] {
        &self.pending
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }

    /// Finish every queued motion, returning their tickets in start order
    pub fn finish_all(&mut self) -> Vec<SwapTicket> {
        let batch: Vec<PendingMotion> = self.pending.drain(..).collect();
        self.elapsed += batch
            .iter()
            .map(|p| p.motion.duration())
            .fold(0.0, f32::max);
        batch.into_iter().map(|p| self.settle(p)).collect()
    }

    /// Finish the queued motion at `index` (any order)
    pub fn finish(&mut self, index: usize) -> Option<SwapTicket> {
        if index >= self.pending.len() {
            return None;
        }
        let pending = self.pending.remove(index);
        Some(self.settle(pending))
    }

    fn settle(&mut self, pending: PendingMotion) -> SwapTicket {
        if let (SlotMotion::Swap(arc), Some(parity)) =
            (pending.motion, self.parities.get_mut(pending.cup))
        {
            *parity = arc.final_parity(*parity);
        }
        pending.ticket
    }
}

impl AnimationPlayer for HeadlessPlayer {
    fn rotation_parity(&self, cup: usize) -> RotationParity {
        self.parities.get(cup).copied().unwrap_or_default()
    }

    fn play(&mut self, cup: usize, motion: SlotMotion, ticket: SwapTicket) {
        self.pending.push(PendingMotion { cup, motion, ticket });
    }

    fn cup_count(&self) -> Option<usize> {
        Some(self.parities.len())
    }
}
