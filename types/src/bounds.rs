//! Probability bounds and the bounded probability value.
//!
//! A [`Probability`] can only be obtained by clamping through a validated
//! [`Bounds`], so holding one is proof that it lies in `[lo, hi]` of the
//! bounds that produced it.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lower reward-probability bound used by the task unless configured otherwise.
pub const DEFAULT_LO: f64 = 0.25;
/// Upper reward-probability bound used by the task unless configured otherwise.
pub const DEFAULT_HI: f64 = 0.75;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum BoundsError {
    #[error("bounds must be finite (lo = {lo}, hi = {hi})")]
    NotFinite { lo: f64, hi: f64 },
    #[error("lower bound {lo} must be strictly below upper bound {hi}")]
    Degenerate { lo: f64, hi: f64 },
}

#[derive(Deserialize)]
struct RawBounds {
    lo: f64,
    hi: f64,
}

/// Closed interval `[lo, hi]` a drifting probability is confined to.
///
/// # Invariants
///
/// - `lo` and `hi` are finite
/// - `lo < hi`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBounds")]
pub struct Bounds {
    lo: f64,
    hi: f64,
}

impl Bounds {
    pub fn new(lo: f64, hi: f64) -> Result<Self, BoundsError> {
        if !lo.is_finite() || !hi.is_finite() {
            return Err(BoundsError::NotFinite { lo, hi });
        }
        if lo >= hi {
            return Err(BoundsError::Degenerate { lo, hi });
        }
        Ok(Self { lo, hi })
    }

    #[must_use]
    pub const fn lo(self) -> f64 {
        self.lo
    }

    #[must_use]
    pub const fn hi(self) -> f64 {
        self.hi
    }

    #[must_use]
    pub fn width(self) -> f64 {
        self.hi - self.lo
    }

    #[must_use]
    pub fn midpoint(self) -> f64 {
        self.lo + self.width() / 2.0
    }

    #[must_use]
    pub fn contains(self, value: f64) -> bool {
        value >= self.lo && value <= self.hi
    }

    /// Clamp an arbitrary value into the interval.
    ///
    /// NaN lands on the midpoint.
    #[must_use]
    pub fn clamp(self, value: f64) -> Probability {
        if value.is_nan() {
            return Probability(self.midpoint());
        }
        Probability(value.clamp(self.lo, self.hi))
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            lo: DEFAULT_LO,
            hi: DEFAULT_HI,
        }
    }
}

impl TryFrom<RawBounds> for Bounds {
    type Error = BoundsError;

    fn try_from(raw: RawBounds) -> Result<Self, Self::Error> {
        Self::new(raw.lo, raw.hi)
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.lo, self.hi)
    }
}

/// A reward probability confined to the [`Bounds`] it was clamped through.
///
/// Serializes as a plain number. Constructed only through [`Bounds::clamp`].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Probability(f64);

impl Probability {
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }
}

impl From<Probability> for f64 {
    fn from(value: Probability) -> Self {
        value.0
    }
}

impl fmt::Display for Probability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match f.precision() {
            Some(precision) => write!(f, "{:.*}", precision, self.0),
            None => write!(f, "{}", self.0),
        }
    }
}
