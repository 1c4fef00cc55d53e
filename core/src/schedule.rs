//! Precomputed environment schedules.
//!
//! A schedule is the whole two-arm trajectory generated up front from one
//! source, so a cohort seeded identically sees the identical environment.

use std::iter;

use bandit_types::{
    Bounds, DEFAULT_INITIAL, ParticipantId, Schedule, SeedKey, SeedRole, SessionLabel,
};
use tracing::debug;

use crate::rng::{RandomSource, UnitSource};
use crate::walk::Drift;

/// Build `n_trials` states starting from the clamped initial probabilities.
///
/// Each later state is the previous one advanced by [`Drift::advance`], so an
/// on-demand walk fed from an identically seeded source replays the same
/// values. `n_trials == 0` yields an empty schedule.
pub fn build_schedule<S: UnitSource + ?Sized>(
    n_trials: usize,
    p0_left: f64,
    p0_right: f64,
    step: f64,
    bounds: Bounds,
    source: &mut S,
) -> Schedule {
    build_with_drift(n_trials, p0_left, p0_right, Drift::symmetric(step, bounds), source)
}

/// [`build_schedule`] with explicit drift parameters.
pub fn build_with_drift<S: UnitSource + ?Sized>(
    n_trials: usize,
    p0_left: f64,
    p0_right: f64,
    drift: Drift,
    source: &mut S,
) -> Schedule {
    if n_trials == 0 {
        return Schedule::default();
    }

    let first = drift.start(p0_left, p0_right);
    let mut state = first;
    let schedule: Schedule = iter::once(first)
        .chain((1..n_trials).map(|_| {
            state = drift.advance(state, source);
            state
        }))
        .collect();

    debug!(
        trials = schedule.len(),
        step = drift.step_size(),
        bounds = %drift.bounds(),
        "Built environment schedule"
    );
    schedule
}

/// Illustrative walk from the participant's `demo` stream, both arms starting level.
///
/// Drawn from its own seed so showing it never disturbs the environment or
/// reward streams of the real session.
#[must_use]
pub fn build_demo(
    pid: &ParticipantId,
    session: &SessionLabel,
    n_trials: usize,
    drift: Drift,
) -> Schedule {
    let key = SeedKey::participant(SeedRole::Demo, pid, session);
    build_with_drift(
        n_trials,
        DEFAULT_INITIAL,
        DEFAULT_INITIAL,
        drift,
        &mut RandomSource::from_key(&key),
    )
}
