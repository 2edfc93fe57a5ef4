//! Levels and procedural level generation
//!
//! A level is an ordered list of shuffle steps. Difficulty scales the step
//! count linearly and the animation speed logarithmically.

use std::collections::BTreeSet;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::permutation::Permutation;
use crate::consts::*;

/// Slot pairs exchanged by the three swaps of the classic three-cup game
pub const CLASSIC_SWAPS: [(usize, usize); 3] = [(0, 1), (1, 2), (0, 2)];

/// One shuffle operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelStep {
    pub permutation: Permutation,
    /// Arc speed in scene units per second
    pub speed: f32,
    /// Slots whose half-turn runs clockwise; everything else runs counter-clockwise
    #[serde(default)]
    pub clockwise: BTreeSet<usize>,
}

impl LevelStep {
    pub fn new(permutation: Permutation) -> Self {
        Self {
            permutation,
            speed: 1.0,
            clockwise: BTreeSet::new(),
        }
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_clockwise(mut self, clockwise: impl IntoIterator<Item = usize>) -> Self {
        self.clockwise = clockwise.into_iter().collect();
        self
    }

    #[inline]
    pub fn is_clockwise(&self, slot: usize) -> bool {
        self.clockwise.contains(&slot)
    }

    pub fn cup_count(&self) -> usize {
        self.permutation.len()
    }
}

/// Ordered, immutable sequence of steps
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Level {
    steps: Vec<LevelStep>,
}

impl Level {
    pub fn new(steps: Vec<LevelStep>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[LevelStep] {
        &self.steps
    }

    pub fn step(&self, index: usize) -> Option<&LevelStep> {
        self.steps.get(index)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Net rearrangement of the whole level, starting from the identity
    pub fn net_permutation(&self, cups: usize) -> Result<Permutation, super::PermutationError> {
        self.steps
            .iter()
            .try_fold(Permutation::identity(cups), |acc, step| acc.then(&step.permutation))
    }
}

/// Shuffle speed for a level: `0.5 + ln(1 + n²/2) / 5`
pub fn level_speed(level_number: u32) -> f32 {
    let n = level_number as f32;
    BASE_SHUFFLE_SPEED + (1.0 + n * n / 2.0).ln() / SPEED_CURVE_DIVISOR
}

/// Number of steps a level shuffles
pub fn level_step_count(level_number: u32) -> usize {
    level_number as usize + BASE_STEPS_PER_LEVEL
}

/// Generate a classic three-cup level
pub fn generate_level<R: Rng + ?Sized>(level_number: u32, rng: &mut R) -> Level {
    generate_level_for(CUP_COUNT, level_number, rng)
}

/// Generate a level for any number of cups
///
/// Three cups draw from [`CLASSIC_SWAPS`]; other counts draw a uniform single
/// transposition (identity below two cups). Every step is therefore
/// choreographable.
pub fn generate_level_for<R: Rng + ?Sized>(
    cups: usize,
    level_number: u32,
    rng: &mut R,
) -> Level {
    let speed = level_speed(level_number);
    let count = level_step_count(level_number);

    let steps = (0..count)
        .map(|_| {
            let permutation = random_swap(cups, rng);
            let clockwise = pick_clockwise(&permutation, rng);
            LevelStep {
                permutation,
                speed,
                clockwise,
            }
        })
        .collect();

    log::info!("Level {level_number}: {count} steps across {cups} cups at speed {speed:.3}");
    Level { steps }
}

fn random_swap<R: Rng + ?Sized>(cups: usize, rng: &mut R) -> Permutation {
    match random_pair(cups, rng) {
        Some((a, b)) => Permutation::identity(cups).swapped(a, b),
        None => Permutation::identity(cups),
    }
}

/// Two distinct slots below `cups`, `None` when fewer than two exist
fn random_pair<R: Rng + ?Sized>(cups: usize, rng: &mut R) -> Option<(usize, usize)> {
    if cups == CUP_COUNT {
        return Some(CLASSIC_SWAPS[rng.random_range(0..CLASSIC_SWAPS.len())]);
    }
    if cups < 2 {
        return None;
    }
    let a = rng.random_range(0..cups);
    let mut b = rng.random_range(0..cups - 1);
    if b >= a {
        b += 1;
    }
    Some((a, b))
}

/// A fair coin per 2-cycle; both participants share the result
fn pick_clockwise<R: Rng + ?Sized>(permutation: &Permutation, rng: &mut R) -> BTreeSet<usize> {
    let mut clockwise = BTreeSet::new();
    let map = permutation.as_slice();
    for (from, &to) in map.iter().enumerate() {
        if from < to && map[to] == from && rng.random_bool(0.5) {
            clockwise.insert(from);
            clockwise.insert(to);
        }
    }
    clockwise
}
