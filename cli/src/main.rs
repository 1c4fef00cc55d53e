//! Bandit CLI - entry point for the drifting two-armed bandit task.
//!
//! ```text
//! main() -> load_settings() -> Command::{Schedule, Play, Demo}
//!                                   |          |        |
//!                          build_schedule  Session  build_demo
//! ```
//!
//! Logs go to a `logs/` directory beside the config file so stdout carries
//! only schedule output and the interactive task.

mod play;
mod render;

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::{env, iter};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result, bail};
use bandit_config::{Settings, config_path, load_settings};
use bandit_core::{
    DEFAULT_COHORT, Drift, EnvironmentMode, Overwrite, RandomSource, Randomness, Session,
    build_demo, build_with_drift, random_participant_id, schedule_rows, to_csv, to_json,
    trial_log_filename, write_csv, write_json,
};
use bandit_types::{Bounds, MAX_TRIALS, ParticipantId, SeedKey, SeedRole, SessionLabel};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "bandit")]
#[command(about = "Two-armed bandit task with drifting reward probabilities")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build a reproducible schedule and print or save it
    Schedule {
        /// Raw seed string, used verbatim
        #[arg(long, conflicts_with = "cohort")]
        seed: Option<String>,
        /// Cohort whose shared schedule to build
        #[arg(long)]
        cohort: Option<String>,
        #[arg(long)]
        session: Option<String>,
        #[command(flatten)]
        walk: WalkArgs,
        #[arg(long, value_enum, default_value_t = Format::Csv)]
        format: Format,
        /// Write to this file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Run the task interactively on the terminal
    Play {
        /// Participant id; a random one is generated when omitted
        #[arg(long)]
        pid: Option<String>,
        #[arg(long)]
        session: Option<String>,
        #[command(flatten)]
        walk: WalkArgs,
        /// Replay the cohort's shared schedule instead of a private walk
        #[arg(long)]
        shared: bool,
        /// Seed the private walk and reward draws from the participant id
        #[arg(long)]
        seeded: bool,
        /// Show both arms' probabilities before each choice
        #[arg(long)]
        show_probabilities: bool,
        /// Also write the session summary as JSON
        #[arg(long)]
        json: bool,
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
    /// Print an illustrative drifting walk
    Demo {
        #[arg(long)]
        pid: Option<String>,
        #[arg(long)]
        session: Option<String>,
        #[arg(long, default_value_t = 40, value_parser = parse_trials)]
        trials: usize,
    },
}

/// Walk parameters that override the config file.
#[derive(clap::Args, Debug, Default)]
struct WalkArgs {
    #[arg(long, value_parser = parse_trials)]
    trials: Option<usize>,
    /// Initial left-arm probability
    #[arg(long)]
    left: Option<f64>,
    /// Initial right-arm probability
    #[arg(long)]
    right: Option<f64>,
    #[arg(long)]
    step: Option<f64>,
    #[arg(long)]
    lo: Option<f64>,
    #[arg(long)]
    hi: Option<f64>,
}

fn parse_trials(s: &str) -> Result<usize, String> {
    let trials: usize = s.parse().map_err(|e| format!("{e}"))?;
    if trials > MAX_TRIALS {
        return Err(format!("at most {MAX_TRIALS} trials are supported"));
    }
    Ok(trials)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Csv,
    Json,
}

impl WalkArgs {
    fn apply(&self, settings: &mut Settings) -> Result<()> {
        let plan = &mut settings.plan;
        if let Some(trials) = self.trials {
            plan.n_trials = trials;
        }
        if let Some(left) = self.left {
            plan.initial_left = left;
        }
        if let Some(right) = self.right {
            plan.initial_right = right;
        }
        if self.step.is_some() || self.lo.is_some() || self.hi.is_some() {
            let current = plan.drift.bounds();
            let bounds = Bounds::new(
                self.lo.unwrap_or(current.lo()),
                self.hi.unwrap_or(current.hi()),
            )
            .context("invalid --lo/--hi")?;
            plan.drift = Drift::symmetric(self.step.unwrap_or(plan.drift.step_size()), bounds)
                .with_down_probability(plan.drift.down_probability());
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let mut settings = load_settings().context("failed to load config")?;

    match cli.command {
        Command::Schedule {
            seed,
            cohort,
            session,
            walk,
            format,
            out,
        } => {
            walk.apply(&mut settings)?;
            let label = session.map(SessionLabel::new).unwrap_or_default();
            let seed = seed.unwrap_or_else(|| {
                let cohort = cohort.unwrap_or_else(|| configured_cohort(&settings));
                SeedKey::cohort(SeedRole::Environment, &cohort, &label).to_string()
            });
            run_schedule(&settings, &seed, format, out.as_deref())
        }
        Command::Play {
            pid,
            session,
            walk,
            shared,
            seeded,
            show_probabilities,
            json,
            out_dir,
        } => {
            walk.apply(&mut settings)?;
            if shared {
                settings.plan.environment = EnvironmentMode::Shared {
                    cohort: configured_cohort(&settings),
                };
            }
            if seeded {
                if !shared {
                    settings.plan.environment = EnvironmentMode::Independent {
                        randomness: Randomness::Seeded,
                    };
                }
                settings.plan.reward = Randomness::Seeded;
            }
            if let Some(dir) = out_dir {
                settings.output_dir = dir;
            }
            let pid = participant(pid)?;
            let label = session.map(SessionLabel::new).unwrap_or_default();
            run_play(&settings, pid, label, show_probabilities, json)
        }
        Command::Demo {
            pid,
            session,
            trials,
        } => {
            let pid = participant(pid)?;
            let label = session.map(SessionLabel::new).unwrap_or_default();
            let demo = build_demo(&pid, &label, trials, settings.plan.drift);
            let mut out = io::stdout().lock();
            render::demo(&mut out, &demo)?;
            out.flush()?;
            Ok(())
        }
    }
}

fn configured_cohort(settings: &Settings) -> String {
    match &settings.plan.environment {
        EnvironmentMode::Shared { cohort } => cohort.clone(),
        EnvironmentMode::Independent { .. } => DEFAULT_COHORT.to_string(),
    }
}

fn participant(pid: Option<String>) -> Result<ParticipantId> {
    match pid {
        Some(pid) => ParticipantId::new(pid).context("invalid --pid"),
        None => Ok(random_participant_id()),
    }
}

fn run_schedule(settings: &Settings, seed: &str, format: Format, out: Option<&Path>) -> Result<()> {
    let plan = &settings.plan;
    let schedule = build_with_drift(
        plan.n_trials,
        plan.initial_left,
        plan.initial_right,
        plan.drift,
        &mut RandomSource::new(seed),
    );
    tracing::info!(seed, trials = schedule.len(), "Schedule built");

    match (out, format) {
        (Some(path), Format::Csv) => {
            write_csv(path, &schedule_rows(&schedule), Overwrite::Replace)
                .with_context(|| format!("failed to write {}", path.display()))
        }
        (Some(path), Format::Json) => write_json(path, &schedule, Overwrite::Replace)
            .with_context(|| format!("failed to write {}", path.display())),
        (None, format) => {
            let text = match format {
                Format::Csv => to_csv(&schedule_rows(&schedule)),
                Format::Json => to_json(&schedule)?,
            };
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{text}")?;
            stdout.flush()?;
            Ok(())
        }
    }
}

fn run_play(
    settings: &Settings,
    pid: ParticipantId,
    label: SessionLabel,
    show_probabilities: bool,
    json: bool,
) -> Result<()> {
    let csv_path = settings.output_dir.join(trial_log_filename(&pid, &label));
    let json_path = json.then(|| csv_path.with_extension("json"));
    for path in iter::once(&csv_path).chain(&json_path) {
        if path.exists() {
            bail!(
                "{} already exists; choose another --pid, --session or --out-dir",
                path.display()
            );
        }
    }

    let mut session = Session::start(&settings.plan, pid, label);
    let stdin = io::stdin().lock();
    let mut stdout = BufWriter::new(io::stdout().lock());

    play::run(&mut session, stdin, &mut stdout, show_probabilities)
        .context("interactive session failed")?;

    if session.records().is_empty() {
        writeln!(stdout, "No trials recorded; nothing saved.")?;
        stdout.flush()?;
        return Ok(());
    }

    write_csv(&csv_path, session.records(), Overwrite::Refuse)
        .with_context(|| format!("failed to write {}", csv_path.display()))?;
    writeln!(stdout, "Saved trial log to {}", csv_path.display())?;

    if let Some(json_path) = json_path {
        write_json(&json_path, &session.summary(), Overwrite::Refuse)
            .with_context(|| format!("failed to write {}", json_path.display()))?;
        writeln!(stdout, "Saved summary to {}", json_path.display())?;
    }
    stdout.flush()?;
    Ok(())
}

/// Filter directives come from `BANDIT_LOG`, defaulting to `info`.
const LOG_ENV: &str = "BANDIT_LOG";

fn init_tracing() {
    let env_filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    let (log_file, init_warnings) = open_log_file(&log_file_candidates(config_path().as_deref()));

    match log_file {
        Some((log_path, file)) => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .with(env_filter)
                .init();
            tracing::debug!(path = %log_path.display(), "Logging initialized");
        }
        // Never stdout: it carries schedules and the task prompts.
        None => tracing_subscriber::registry()
            .with(fmt::layer().with_writer(io::stderr))
            .with(env_filter)
            .init(),
    }
    for warning in init_warnings {
        tracing::warn!("{warning}");
    }
}

fn open_log_file(candidates: &[PathBuf]) -> (Option<(PathBuf, File)>, Vec<String>) {
    let mut warnings = Vec::new();

    for candidate in candidates {
        if let Some(parent) = candidate.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            warnings.push(format!("Failed to create log dir {}: {e}", parent.display()));
            continue;
        }

        match OpenOptions::new().create(true).append(true).open(candidate) {
            Ok(file) => return (Some((candidate.clone(), file)), warnings),
            Err(e) => warnings.push(format!("Failed to open log file {}: {e}", candidate.display())),
        }
    }

    (None, warnings)
}

/// Beside the config file first, then the system temp dir.
fn log_file_candidates(config: Option<&Path>) -> Vec<PathBuf> {
    let primary = config
        .and_then(Path::parent)
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(|dir| dir.join("logs").join("bandit.log"));
    primary
        .into_iter()
        .chain(iter::once(env::temp_dir().join("bandit").join("bandit.log")))
        .collect()
}
