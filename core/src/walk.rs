//! Reflecting random walk over a bounded probability interval.
//!
//! Each step moves the probability by a fixed magnitude in a direction decided
//! by one draw. Overshoot past either edge is mirrored back into range so the
//! step keeps its size instead of being absorbed at the boundary.

use bandit_types::{Bounds, DEFAULT_STEP, Probability, WalkState};

use crate::rng::{AmbientSource, UnitSource};

/// Chance of a downward step in the symmetric walk.
pub const SYMMETRIC: f64 = 0.5;

/// Parameters of the per-trial drift shared by both arms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Drift {
    step: f64,
    bounds: Bounds,
    down_probability: f64,
}

impl Drift {
    /// Symmetric walk. The step is used by magnitude; a non-finite step freezes the walk.
    #[must_use]
    pub fn symmetric(step: f64, bounds: Bounds) -> Self {
        let step = if step.is_finite() { step.abs() } else { 0.0 };
        Self {
            step,
            bounds,
            down_probability: SYMMETRIC,
        }
    }

    /// Bias the walk: a draw below `probability` steps down.
    #[must_use]
    pub fn with_down_probability(mut self, probability: f64) -> Self {
        self.down_probability = if probability.is_nan() {
            SYMMETRIC
        } else {
            probability.clamp(0.0, 1.0)
        };
        self
    }

    #[must_use]
    pub const fn step_size(self) -> f64 {
        self.step
    }

    #[must_use]
    pub const fn bounds(self) -> Bounds {
        self.bounds
    }

    #[must_use]
    pub const fn down_probability(self) -> f64 {
        self.down_probability
    }

    /// Starting state with both probabilities clamped into bounds.
    #[must_use]
    pub fn start(self, left: f64, right: f64) -> WalkState {
        WalkState::new(self.bounds.clamp(left), self.bounds.clamp(right))
    }

    /// Advance one probability by one step, consuming exactly one draw.
    pub fn step<S: UnitSource + ?Sized>(self, p: Probability, source: &mut S) -> Probability {
        let moved = if source.next_unit() < self.down_probability {
            p.value() - self.step
        } else {
            p.value() + self.step
        };
        reflect(moved, self.bounds)
    }

    /// Advance both arms, left first, consuming two draws.
    pub fn advance<S: UnitSource + ?Sized>(self, state: WalkState, source: &mut S) -> WalkState {
        let left = self.step(state.left(), source);
        let right = self.step(state.right(), source);
        WalkState::new(left, right)
    }
}

impl Default for Drift {
    fn default() -> Self {
        Self::symmetric(DEFAULT_STEP, Bounds::default())
    }
}

/// One symmetric reflecting step drawing from `source`.
pub fn rw_step<S: UnitSource + ?Sized>(
    p: Probability,
    step: f64,
    bounds: Bounds,
    source: &mut S,
) -> Probability {
    Drift::symmetric(step, bounds).step(p, source)
}

/// [`rw_step`] drawing from ambient, non-reproducible randomness.
#[must_use]
pub fn rw_step_unseeded(p: Probability, step: f64, bounds: Bounds) -> Probability {
    rw_step(p, step, bounds, &mut AmbientSource)
}

fn reflect(value: f64, bounds: Bounds) -> Probability {
    let (lo, hi) = (bounds.lo(), bounds.hi());
    let mut v = value;
    if v < lo {
        v = lo + (lo - v);
    }
    if v > hi {
        v = hi - (v - hi);
    }
    // A step wider than the interval can overshoot twice.
    bounds.clamp(v)
}
