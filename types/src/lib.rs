//! Core domain types for the drifting two-armed bandit.
//!
//! This crate contains pure domain types with no IO and minimal dependencies.
//! Everything here can be used from any layer of the workspace.

mod arm;
mod bounds;
mod participant;
mod schedule;
mod seed;
mod trial;

pub use arm::{Arm, ArmParseError};
pub use bounds::{Bounds, BoundsError, DEFAULT_HI, DEFAULT_LO, Probability};
pub use participant::{DEFAULT_SESSION, ParticipantId, ParticipantIdError, SessionLabel};
pub use schedule::{Schedule, WalkState};
pub use seed::{SeedKey, SeedRole};
pub use trial::{LOG_PRECISION, SessionSummary, TrialRecord};

/// Number of trials in a full session.
pub const DEFAULT_TRIALS: usize = 400;

/// Largest trial count accepted from flags or config.
pub const MAX_TRIALS: usize = 100_000;

/// Random-walk step size per trial.
pub const DEFAULT_STEP: f64 = 0.03;

/// Starting probability of both arms.
pub const DEFAULT_INITIAL: f64 = 0.5;
