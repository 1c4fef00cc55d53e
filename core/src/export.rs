//! CSV and JSON exports of trial logs and schedules.
//!
//! CSV is the task's trial-log format: a header row of field names,
//! every cell double-quoted with embedded quotes doubled, rows joined by `\n`
//! without a trailing newline, and an empty string when there are no rows.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use bandit_types::{
    LOG_PRECISION, ParticipantId, Probability, Schedule, SessionLabel, TrialRecord,
};
use bandit_utils::{AtomicWriteOptions, Overwrite, atomic_write_with_options};
use serde::Serialize;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("{} already exists", path.display())]
    Exists { path: PathBuf },
    #[error("failed to write export: {0}")]
    Io(#[from] io::Error),
    #[error("failed to serialize export: {0}")]
    Json(#[from] serde_json::Error),
}

/// A row type with a fixed column layout.
pub trait CsvRecord {
    const HEADER: &'static [&'static str];

    /// Cell values in [`Self::HEADER`] order.
    fn fields(&self) -> Vec<String>;
}

impl CsvRecord for TrialRecord {
    const HEADER: &'static [&'static str] = &[
        "pid", "session", "trial", "choice", "reward", "rt", "p_left", "p_right",
    ];

    fn fields(&self) -> Vec<String> {
        vec![
            self.pid.to_string(),
            self.session.to_string(),
            self.trial.to_string(),
            self.choice.to_string(),
            self.reward.to_string(),
            self.rt.to_string(),
            format!("{:.*}", LOG_PRECISION, self.p_left),
            format!("{:.*}", LOG_PRECISION, self.p_right),
        ]
    }
}

/// One schedule entry flattened for tabular export.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScheduleRow {
    /// 0-based trial index.
    pub index: usize,
    pub p_left: Probability,
    pub p_right: Probability,
}

impl CsvRecord for ScheduleRow {
    const HEADER: &'static [&'static str] = &["index", "p_left", "p_right"];

    fn fields(&self) -> Vec<String> {
        vec![
            self.index.to_string(),
            self.p_left.to_string(),
            self.p_right.to_string(),
        ]
    }
}

#[must_use]
pub fn schedule_rows(schedule: &Schedule) -> Vec<ScheduleRow> {
    schedule
        .iter()
        .enumerate()
        .map(|(index, state)| ScheduleRow {
            index,
            p_left: state.left(),
            p_right: state.right(),
        })
        .collect()
}

fn quote(cell: &str) -> String {
    format!("\"{}\"", cell.replace('"', "\"\""))
}

fn csv_line<'a>(cells: impl IntoIterator<Item = &'a str>) -> String {
    cells.into_iter().map(quote).collect::<Vec<_>>().join(",")
}

#[must_use]
pub fn to_csv<R: CsvRecord>(rows: &[R]) -> String {
    if rows.is_empty() {
        return String::new();
    }
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(csv_line(R::HEADER.iter().copied()));
    for row in rows {
        let fields = row.fields();
        lines.push(csv_line(fields.iter().map(String::as_str)));
    }
    lines.join("\n")
}

/// Default trial-log file name for a participant's session.
#[must_use]
pub fn trial_log_filename(pid: &ParticipantId, session: &SessionLabel) -> String {
    format!("bandit_{pid}_{session}.csv")
}

/// Write `rows` as CSV. With [`Overwrite::Refuse`] an existing file is left intact
/// and [`ExportError::Exists`] is returned.
pub fn write_csv<R: CsvRecord>(
    path: &Path,
    rows: &[R],
    overwrite: Overwrite,
) -> Result<(), ExportError> {
    write_bytes(path, to_csv(rows).as_bytes(), overwrite)?;
    info!(path = %path.display(), rows = rows.len(), "Wrote CSV export");
    Ok(())
}

/// Pretty-printed JSON text of any serializable export.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(value)?)
}

pub fn write_json<T: Serialize + ?Sized>(
    path: &Path,
    value: &T,
    overwrite: Overwrite,
) -> Result<(), ExportError> {
    let json = to_json(value)?;
    write_bytes(path, json.as_bytes(), overwrite)?;
    info!(path = %path.display(), "Wrote JSON export");
    Ok(())
}

fn write_bytes(path: &Path, bytes: &[u8], overwrite: Overwrite) -> Result<(), ExportError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let options = AtomicWriteOptions {
        overwrite,
        ..AtomicWriteOptions::default()
    };
    atomic_write_with_options(path, bytes, options).map_err(|err| {
        if err.kind() == io::ErrorKind::AlreadyExists {
            ExportError::Exists {
                path: path.to_path_buf(),
            }
        } else {
            ExportError::Io(err)
        }
    })
}
