//! Per-trial environment state: the two arms' reward probabilities.

use serde::Serialize;

use crate::{Arm, Probability};

/// Reward probabilities of both arms at one trial.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WalkState {
    left: Probability,
    right: Probability,
}

impl WalkState {
    #[must_use]
    pub const fn new(left: Probability, right: Probability) -> Self {
        Self { left, right }
    }

    #[must_use]
    pub const fn left(self) -> Probability {
        self.left
    }

    #[must_use]
    pub const fn right(self) -> Probability {
        self.right
    }

    #[must_use]
    pub const fn get(self, arm: Arm) -> Probability {
        match arm {
            Arm::Left => self.left,
            Arm::Right => self.right,
        }
    }
}

/// Precomputed, immutable sequence of [`WalkState`]s indexed by 0-based trial.
///
/// Stored column-wise so each arm's trajectory is a contiguous slice.
///
/// # Invariants
///
/// - `left.len() == right.len()`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Schedule {
    left: Vec<Probability>,
    right: Vec<Probability>,
}

impl Schedule {
    #[must_use]
    pub fn len(&self) -> usize {
        self.left.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }

    #[must_use]
    pub fn left(&self) -> &[Probability] {
        &self.left
    }

    #[must_use]
    pub fn right(&self) -> &[Probability] {
        &self.right
    }

    #[must_use]
    pub fn get(&self, trial: usize) -> Option<WalkState> {
        Some(WalkState::new(
            *self.left.get(trial)?,
            *self.right.get(trial)?,
        ))
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = WalkState> + '_ {
        self.left
            .iter()
            .zip(&self.right)
            .map(|(&left, &right)| WalkState::new(left, right))
    }
}

impl FromIterator<WalkState> for Schedule {
    fn from_iter<I: IntoIterator<Item = WalkState>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        let mut left = Vec::with_capacity(lower);
        let mut right = Vec::with_capacity(lower);
        for state in iter {
            left.push(state.left);
            right.push(state.right);
        }
        Self { left, right }
    }
}
