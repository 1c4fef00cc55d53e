//! The `bandit` binary end to end

use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

fn bandit(home: &Path, args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_bandit"))
        .args(args)
        .env("HOME", home)
        .env("BANDIT_CONFIG", home.join("absent.toml"))
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn bandit");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(stdin.as_bytes())
        .expect("write stdin");
    child.wait_with_output().expect("wait bandit")
}

#[test]
fn second_play_refuses_existing_log() {
    let home = tempfile::tempdir().expect("tempdir");
    let out_dir = home.path().join("data");
    let out = out_dir.to_str().expect("utf-8 path");
    let args = [
        "play", "--pid", "P1", "--trials", "3", "--seeded", "--out-dir", out,
    ];
    let log = out_dir.join("bandit_P1_morning.csv");

    let first = bandit(home.path(), &args, "f\nf\nf\n");
    assert!(first.status.success(), "{first:?}");
    assert_eq!(fs::read_to_string(&log).expect("log").lines().count(), 4);

    let second = bandit(home.path(), &args, "j\nq\n");
    assert!(!second.status.success());
    let stderr = String::from_utf8_lossy(&second.stderr);
    assert!(stderr.contains("already exists"), "{stderr}");
    let text = fs::read_to_string(&log).expect("log");
    assert_eq!(text.lines().count(), 4);
    assert!(text.lines().skip(1).all(|line| line.contains(r#""L""#)));
}

#[test]
fn oversized_trial_count_is_a_usage_error() {
    let home = tempfile::tempdir().expect("tempdir");
    let output = bandit(home.path(), &["schedule", "--trials", "100000000000"], "");
    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
}

#[test]
fn schedule_prints_csv_to_stdout() {
    let home = tempfile::tempdir().expect("tempdir");
    let output = bandit(
        home.path(),
        &["schedule", "--cohort", "lab", "--trials", "5"],
        "",
    );
    assert!(output.status.success(), "{output:?}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().count(), 6);
}
