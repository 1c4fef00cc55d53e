//! Session driver across environment modes

use std::time::Duration;

use bandit_core::{SessionError, SessionPlan};
use bandit_types::Arm;

use crate::common::{play_alternating, seeded_plan, shared_plan, start};

#[test]
fn shared_cohort_sees_one_environment() {
    let plan = shared_plan("spring", 100);
    let a = play_alternating(&mut start(&plan, "P001"));
    let b = play_alternating(&mut start(&plan, "P002"));

    for (x, y) in a.iter().zip(&b) {
        assert_eq!(x.p_left, y.p_left);
        assert_eq!(x.p_right, y.p_right);
    }
    let rewards = |records: &[bandit_types::TrialRecord]| -> Vec<u8> {
        records.iter().map(|r| r.reward).collect()
    };
    assert_ne!(rewards(&a), rewards(&b));
}

#[test]
fn different_cohorts_differ() {
    let a = play_alternating(&mut start(&shared_plan("spring", 50), "P001"));
    let b = play_alternating(&mut start(&shared_plan("autumn", 50), "P001"));
    assert!(a.iter().zip(&b).any(|(x, y)| x.p_left != y.p_left));
}

#[test]
fn seeded_independent_sessions_replay_exactly() {
    let plan = seeded_plan(80);
    let first = play_alternating(&mut start(&plan, "P010"));
    let again = play_alternating(&mut start(&plan, "P010"));
    assert_eq!(first, again);

    let other = play_alternating(&mut start(&plan, "P011"));
    assert_ne!(first, other);
}

#[test]
fn trials_are_numbered_from_one() {
    let mut session = start(&seeded_plan(3), "P1");
    let records = play_alternating(&mut session);
    let numbers: Vec<u32> = records.iter().map(|r| r.trial).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
    assert_eq!(records[0].choice, Arm::Left);
    assert_eq!(records[1].choice, Arm::Right);
    assert_eq!(records[0].rt, 420);
}

#[test]
fn summary_reports_totals() {
    let mut session = start(&seeded_plan(20), "P1");
    let records = play_alternating(&mut session);
    let summary = session.summary();
    assert_eq!(summary.n, 20);
    assert_eq!(
        summary.total,
        records.iter().map(|r| u32::from(r.reward)).sum::<u32>()
    );
    assert_eq!(summary.trials.len(), 20);
}

#[test]
fn finished_session_rejects_responses() {
    let mut session = start(&seeded_plan(2), "P1");
    play_alternating(&mut session);
    assert_eq!(
        session.respond(Arm::Left, Duration::ZERO),
        Err(SessionError::Finished(2))
    );
}

#[test]
fn ambient_session_stays_in_bounds() {
    let plan = SessionPlan {
        n_trials: 200,
        ..SessionPlan::default()
    };
    let bounds = plan.drift.bounds();
    let records = play_alternating(&mut start(&plan, "P1"));
    assert_eq!(records.len(), 200);
    for r in &records {
        assert!(bounds.contains(r.p_left.value()));
        assert!(bounds.contains(r.p_right.value()));
        assert!(r.reward <= 1);
    }
}
