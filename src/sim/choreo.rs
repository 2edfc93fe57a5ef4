//! Step choreography: turns a shuffle step into per-slot motions
//!
//! Only fixed points and 2-cycles can be animated. Longer cycles would need
//! a different path shape and are rejected.

use std::f32::consts::PI;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::arc::{ArcDescriptor, RotationParity};
use super::level::LevelStep;
use super::permutation::PermutationError;
use crate::sign;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChoreographyError {
    #[error("slot {slot} sits on a {length}-cycle; only swaps can be animated")]
    UnsupportedCycle { slot: usize, length: usize },
    #[error(transparent)]
    Permutation(#[from] PermutationError),
}

/// What one cup does during a step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SlotMotion {
    /// Stays put; completes immediately
    Hold,
    /// Half of a pairwise swap
    Swap(ArcDescriptor),
}

impl SlotMotion {
    pub fn duration(&self) -> f32 {
        match self {
            SlotMotion::Hold => 0.0,
            SlotMotion::Swap(arc) => arc.duration,
        }
    }

    pub fn arc(&self) -> Option<&ArcDescriptor> {
        match self {
            SlotMotion::Hold => None,
            SlotMotion::Swap(arc) => Some(arc),
        }
    }
}

/// Motion for the cup standing in `slot` during `step`
///
/// `distance` is the spacing between neighbouring slots and `parity` the
/// current facing of the cup in that slot.
pub fn choreograph(
    step: &LevelStep,
    slot: usize,
    distance: f32,
    parity: RotationParity,
) -> Result<SlotMotion, ChoreographyError> {
    let perm = &step.permutation;
    let to = perm.apply(slot)?;
    if to == slot {
        return Ok(SlotMotion::Hold);
    }
    if perm.apply(to)? != slot {
        return Err(ChoreographyError::UnsupportedCycle {
            slot,
            length: perm.cycle_len(slot)?,
        });
    }

    let half_distance = distance * 0.5;
    let span = to.abs_diff(slot) as f32;
    let direction = sign(to as isize - slot as isize) * parity.sign();
    let path_length = PI * half_distance * span;

    Ok(SlotMotion::Swap(ArcDescriptor {
        from: slot,
        to,
        pivot_offset: direction * half_distance * span,
        path_length,
        duration: path_length / step.speed,
        rotation_direction: if step.is_clockwise(slot) { -1.0 } else { 1.0 },
    }))
}

/// Motions for every slot of a step, all cups facing `Forward`
pub fn choreograph_step(
    step: &LevelStep,
    distance: f32,
) -> Result<Vec<SlotMotion>, ChoreographyError> {
    (0..step.cup_count())
        .map(|slot| choreograph(step, slot, distance, RotationParity::Forward))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::CUP_SPACING;
    use crate::sim::Permutation;

    fn step(values: &[usize]) -> LevelStep {
        LevelStep::new(Permutation::new(values.to_vec()).unwrap())
    }

    #[test]
    fn test_fixed_point_holds() {
        let motion =
            choreograph(&step(&[1, 0, 2]), 2, CUP_SPACING, RotationParity::Forward).unwrap();
        assert_eq!(motion, SlotMotion::Hold);
        assert_eq!(motion.duration(), 0.0);
    }

    #[test]
    fn test_swap_pair_shares_duration() {
        let s = step(&[2, 1, 0]).with_speed(0.8);
        let motions = choreograph_step(&s, CUP_SPACING).unwrap();
        let a = motions[0].arc().unwrap();
        let c = motions[2].arc().unwrap();
        assert_eq!(motions[1], SlotMotion::Hold);
        assert_eq!(a.duration, c.duration);

        let expected_path = PI * CUP_SPACING * 0.5 * 2.0;
        assert!((a.path_length - expected_path).abs() < 1e-6);
        assert!((a.duration - expected_path / 0.8).abs() < 1e-6);
        // Pivots meet at the shared midpoint from opposite sides
        assert!((a.pivot_offset - CUP_SPACING).abs() < 1e-6);
        assert!((c.pivot_offset + CUP_SPACING).abs() < 1e-6);
        assert_eq!(a.rotation_direction, 1.0);
        assert_eq!(c.rotation_direction, 1.0);
    }

    #[test]
    fn test_clockwise_tag_reverses_rotation() {
        let s = step(&[1, 0, 2]).with_clockwise([0, 1]);
        let motions = choreograph_step(&s, CUP_SPACING).unwrap();
        assert!(motions[0].arc().unwrap().is_clockwise());
        assert!(motions[1].arc().unwrap().is_clockwise());
    }

    #[test]
    fn test_parity_flips_offset_only() {
        let s = step(&[0, 2, 1]);
        let fwd = choreograph(&s, 1, CUP_SPACING, RotationParity::Forward).unwrap();
        let rev = choreograph(&s, 1, CUP_SPACING, RotationParity::Reversed).unwrap();
        let (fwd, rev) = (fwd.arc().unwrap(), rev.arc().unwrap());
        assert_eq!(fwd.pivot_offset, -rev.pivot_offset);
        assert_eq!(fwd.duration, rev.duration);
        assert_eq!(fwd.rotation_direction, rev.rotation_direction);
    }

    #[test]
    fn test_swap_lands_on_partner_slot() {
        let s = step(&[2, 1, 0]);
        let arc = *choreograph(&s, 0, CUP_SPACING, RotationParity::Forward)
            .unwrap()
            .arc()
            .unwrap();
        assert!((arc.sample(1.0).x - 2.0 * CUP_SPACING).abs() < 1e-5);
    }

    #[test]
    fn test_three_cycle_is_rejected() {
        let s = step(&[1, 2, 0]);
        assert_eq!(
            choreograph(&s, 0, CUP_SPACING, RotationParity::Forward),
            Err(ChoreographyError::UnsupportedCycle { slot: 0, length: 3 })
        );
        assert!(choreograph_step(&s, CUP_SPACING).is_err());
    }

    #[test]
    fn test_slot_out_of_range() {
        let s = step(&[1, 0]);
        assert!(matches!(
            choreograph(&s, 5, CUP_SPACING, RotationParity::Forward),
            Err(ChoreographyError::Permutation(PermutationError::IndexOutOfRange { .. }))
        ));
    }
}
