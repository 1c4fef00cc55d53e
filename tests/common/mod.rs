//! Shared test utilities and fixtures

#![allow(dead_code)]

use std::time::Duration;

use bandit_core::{EnvironmentMode, Randomness, Session, SessionPlan};
use bandit_types::{Arm, ParticipantId, SessionLabel, TrialRecord};

pub fn pid(id: &str) -> ParticipantId {
    ParticipantId::new(id).expect("non-empty participant id")
}

/// Plan whose environment and rewards both replay from participant seeds.
pub fn seeded_plan(n_trials: usize) -> SessionPlan {
    SessionPlan {
        n_trials,
        environment: EnvironmentMode::Independent {
            randomness: Randomness::Seeded,
        },
        reward: Randomness::Seeded,
        ..SessionPlan::default()
    }
}

pub fn shared_plan(cohort: &str, n_trials: usize) -> SessionPlan {
    SessionPlan {
        n_trials,
        environment: EnvironmentMode::Shared {
            cohort: cohort.to_string(),
        },
        reward: Randomness::Seeded,
        ..SessionPlan::default()
    }
}

/// Alternate left and right until the session finishes.
pub fn play_alternating(session: &mut Session) -> Vec<TrialRecord> {
    let mut arms = Arm::ALL.iter().copied().cycle();
    let mut records = Vec::new();
    while !session.is_finished() {
        let arm = arms.next().expect("cycle is infinite");
        records.push(
            session
                .respond(arm, Duration::from_millis(420))
                .expect("session not finished"),
        );
    }
    records
}

pub fn start(plan: &SessionPlan, id: &str) -> Session {
    Session::start(plan, pid(id), SessionLabel::default())
}
