//! Drifting-probability environment for the two-armed bandit task.
//!
//! This crate contains the random sources, the reflecting random walk, the
//! schedule builder, and the session driver that consumes them trial by
//! trial, plus CSV/JSON export of what a session produced.
//!
//! ```text
//! seed string -> RandomSource -> Drift::step -> build_schedule  (shared, by index)
//!                                            \-> Session walk   (private, per trial)
//! ```

pub mod export;
pub mod rng;
pub mod schedule;
pub mod session;
pub mod walk;

pub use export::{
    CsvRecord, ExportError, ScheduleRow, schedule_rows, to_csv, to_json, trial_log_filename,
    write_csv, write_json,
};
pub use bandit_utils::Overwrite;
pub use rng::{AmbientSource, RandomSource, UnitSource, seed_state};
pub use schedule::{build_demo, build_schedule, build_with_drift};
pub use session::{
    DEFAULT_COHORT, Environment, EnvironmentMode, Randomness, Session, SessionError, SessionPlan,
    random_participant_id,
};
pub use walk::{Drift, SYMMETRIC, rw_step, rw_step_unseeded};
