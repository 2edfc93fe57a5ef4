//! Permutation algebra over cup slots
//!
//! A permutation maps a source slot (index) to a destination slot (value).

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from building or combining permutations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PermutationError {
    #[error("cannot compose permutations of size {left} and {right}")]
    SizeMismatch { left: usize, right: usize },
    #[error("index {index} is out of range for a permutation of size {len}")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("{values:?} is not a permutation of its indices")]
    NotBijective { values: Vec<usize> },
}

/// Immutable bijection on `{0..n-1}`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct Permutation {
    map: Vec<usize>,
}

impl Permutation {
    /// Build a permutation, checking every value in `0..n` appears exactly once
    pub fn new(values: Vec<usize>) -> Result<Self, PermutationError> {
        let mut seen = vec![false; values.len()];
        let bijective = values.iter().all(|&value| match seen.get_mut(value) {
            Some(slot) if !*slot => {
                *slot = true;
                true
            }
            _ => false,
        });
        if !bijective {
            return Err(PermutationError::NotBijective { values });
        }
        Ok(Self { map: values })
    }

    pub fn identity(len: usize) -> Self {
        Self {
            map: (0..len).collect(),
        }
    }

    /// Swap of slots `a` and `b`, fixing everything else
    pub fn transposition(len: usize, a: usize, b: usize) -> Result<Self, PermutationError> {
        for index in [a, b] {
            if index >= len {
                return Err(PermutationError::IndexOutOfRange { index, len });
            }
        }
        let mut map: Vec<usize> = (0..len).collect();
        map.swap(a, b);
        Ok(Self { map })
    }

    /// Copy with the destinations of slots `a` and `b` exchanged
    ///
    /// Panics if either slot is out of range, like slice indexing.
    pub fn swapped(&self, a: usize, b: usize) -> Self {
        let mut map = self.map.clone();
        map.swap(a, b);
        Self { map }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn is_identity(&self) -> bool {
        self.map.iter().enumerate().all(|(i, &v)| i == v)
    }

    /// Destination of slot `index`
    pub fn apply(&self, index: usize) -> Result<usize, PermutationError> {
        self.map
            .get(index)
            .copied()
            .ok_or(PermutationError::IndexOutOfRange {
                index,
                len: self.map.len(),
            })
    }

    /// `a` then `b`: the result maps `i` to `b[a[i]]`.
    ///
    /// Not commutative:
    /// - `compose([1, 0, 2], [2, 1, 0]) = [1, 2, 0]`
    /// - `compose([2, 1, 0], [1, 0, 2]) = [2, 0, 1]`
    pub fn compose(a: &Permutation, b: &Permutation) -> Result<Permutation, PermutationError> {
        if a.len() != b.len() {
            return Err(PermutationError::SizeMismatch {
                left: a.len(),
                right: b.len(),
            });
        }
        Ok(Permutation {
            map: a.map.iter().map(|&v| b.map[v]).collect(),
        })
    }

    pub fn then(&self, next: &Permutation) -> Result<Permutation, PermutationError> {
        Self::compose(self, next)
    }

    /// Inverse permutation, `r[a[i]] = i`
    pub fn invert(&self) -> Permutation {
        let mut map = vec![0; self.map.len()];
        for (index, &value) in self.map.iter().enumerate() {
            map[value] = index;
        }
        Permutation { map }
    }

    /// Cycle decomposition in order of smallest element, fixed points omitted
    pub fn cycles(&self) -> Vec<Vec<usize>> {
        let mut seen = vec![false; self.map.len()];
        let mut cycles = Vec::new();
        for start in 0..self.map.len() {
            let mut cycle = Vec::new();
            let mut cur = start;
            while !seen[cur] {
                seen[cur] = true;
                cycle.push(cur);
                cur = self.map[cur];
            }
            if cycle.len() > 1 {
                cycles.push(cycle);
            }
        }
        cycles
    }

    /// Length of the cycle through `index` (1 for a fixed point)
    pub fn cycle_len(&self, index: usize) -> Result<usize, PermutationError> {
        let mut cur = self.apply(index)?;
        let mut len = 1;
        while cur != index {
            cur = self.map[cur];
            len += 1;
        }
        Ok(len)
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.map
    }
}

impl TryFrom<Vec<usize>> for Permutation {
    type Error = PermutationError;

    fn try_from(values: Vec<usize>) -> Result<Self, Self::Error> {
        Self::new(values)
    }
}

impl From<Permutation> for Vec<usize> {
    fn from(p: Permutation) -> Self {
        p.map
    }
}

impl fmt::Display for Permutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Permutation(")?;
        for (index, value) in self.map.iter().enumerate() {
            if index > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{index} > {value}")?;
        }
        write!(f, ")")
    }
}
