//! Trial log and schedule exports on disk

use std::fs;

use bandit_core::{
    Overwrite, RandomSource, build_schedule, schedule_rows, to_csv, trial_log_filename, write_csv,
    write_json,
};
use bandit_types::{Bounds, SessionLabel};
use bandit_utils::{AtomicWriteOptions, atomic_write_with_options};

use crate::common::{pid, play_alternating, seeded_plan, start};

#[test]
fn session_log_round_trips_through_disk() {
    let mut session = start(&seeded_plan(12), "P042");
    play_alternating(&mut session);

    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir
        .path()
        .join("out")
        .join(trial_log_filename(session.pid(), session.label()));
    write_csv(&path, session.records(), Overwrite::Refuse).expect("write log");

    assert!(path.ends_with("bandit_P042_morning.csv"));
    let text = fs::read_to_string(&path).expect("read");
    assert_eq!(text, to_csv(session.records()));
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 13);
    assert_eq!(
        lines[0],
        r#""pid","session","trial","choice","reward","rt","p_left","p_right""#
    );
    assert!(lines[1].starts_with(r#""P042","morning","1","L","#));
    assert!(lines[12].starts_with(r#""P042","morning","12","R","#));
}

#[test]
fn summary_json_has_expected_shape() {
    let mut session = start(&seeded_plan(4), "P042");
    play_alternating(&mut session);

    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("summary.json");
    write_json(&path, &session.summary(), Overwrite::Refuse).expect("write json");

    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).expect("read")).expect("valid json");
    assert_eq!(value["pid"], "P042");
    assert_eq!(value["session"], "morning");
    assert_eq!(value["n"], 4);
    assert_eq!(value["total"], u64::from(session.total_reward()));
    assert_eq!(value["trials"].as_array().map(Vec::len), Some(4));
    assert_eq!(value["trials"][1]["choice"], "R");
    assert_eq!(value["trials"][0]["trial"], 1);
    assert_eq!(value["trials"][0]["p_left"], "0.500");
}

#[test]
fn schedule_exports_as_rows_and_json() {
    let schedule = build_schedule(
        5,
        0.6,
        0.4,
        0.03,
        Bounds::default(),
        &mut RandomSource::new("env:P007:morning"),
    );
    let csv = to_csv(&schedule_rows(&schedule));
    assert_eq!(csv.lines().count(), 6);
    assert!(csv.lines().nth(1).unwrap().starts_with(r#""0","0.6","0.4""#));

    let json = serde_json::to_value(&schedule).expect("serialize");
    assert_eq!(json["left"][1], 0.63);
    assert_eq!(json["right"].as_array().map(Vec::len), Some(5));
}

#[test]
fn refusing_overwrite_protects_existing_log() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir
        .path()
        .join(trial_log_filename(&pid("P1"), &SessionLabel::default()));
    fs::write(&path, "existing").expect("seed file");

    let opts = AtomicWriteOptions::default().refuse_existing();
    assert!(atomic_write_with_options(&path, b"new", opts).is_err());
    assert_eq!(fs::read_to_string(&path).expect("read"), "existing");
}
