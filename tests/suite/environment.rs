//! Schedule and on-demand walk built from the same step primitive

use bandit_core::{Drift, Environment, RandomSource, Session, build_with_drift};
use bandit_types::{Bounds, SessionLabel};
use proptest::prelude::*;

use crate::common::{pid, play_alternating};

#[test]
fn on_demand_walk_replays_schedule() {
    let drift = Drift::default();
    let schedule = build_with_drift(60, 0.55, 0.45, drift, &mut RandomSource::new("replay"));

    let mut session = Session::new(
        pid("P1"),
        SessionLabel::default(),
        60,
        Environment::on_demand(drift, 0.55, 0.45, Box::new(RandomSource::new("replay"))),
        Box::new(RandomSource::new("reward")),
    );
    let records = play_alternating(&mut session);

    assert_eq!(records.len(), schedule.len());
    for (record, state) in records.iter().zip(schedule.iter()) {
        assert_eq!(record.p_left, state.left());
        assert_eq!(record.p_right, state.right());
    }
}

#[test]
fn scheduled_environment_serves_by_index() {
    let drift = Drift::default();
    let schedule = build_with_drift(10, 0.5, 0.5, drift, &mut RandomSource::new("index"));
    let mut session = Session::new(
        pid("P1"),
        SessionLabel::default(),
        10,
        Environment::Scheduled(schedule.clone()),
        Box::new(|| 0.5),
    );
    let records = play_alternating(&mut session);
    let served: Vec<_> = records.iter().map(|r| r.p_left).collect();
    assert_eq!(served, schedule.left());
}

proptest! {
    #[test]
    fn prop_schedules_stay_within_bounds(
        seed in ".{0,24}",
        n in 0usize..200,
        p0_left in -1.0f64..2.0,
        p0_right in -1.0f64..2.0,
        lo in 0.0f64..0.5,
        width in 0.05f64..0.5,
        step in 0.0f64..0.2,
    ) {
        let bounds = Bounds::new(lo, lo + width).unwrap();
        let drift = Drift::symmetric(step, bounds);
        let schedule = build_with_drift(n, p0_left, p0_right, drift, &mut RandomSource::new(&seed));
        prop_assert_eq!(schedule.len(), n);
        prop_assert_eq!(schedule.left().len(), schedule.right().len());
        for state in schedule.iter() {
            prop_assert!(bounds.contains(state.left().value()));
            prop_assert!(bounds.contains(state.right().value()));
        }
    }
}
