//! Trial-by-trial session driver.
//!
//! A [`Session`] owns everything random about one participant's run: the
//! environment (a shared precomputed schedule or a private on-demand walk)
//! and the reward source. Nothing is global; two sessions never share state.

use std::fmt;
use std::time::Duration;

use bandit_types::{
    Arm, DEFAULT_INITIAL, DEFAULT_TRIALS, ParticipantId, Schedule, SeedKey, SeedRole,
    SessionLabel, SessionSummary, TrialRecord, WalkState,
};
use thiserror::Error;
use tracing::{debug, info};

use crate::rng::{AmbientSource, RandomSource, UnitSource};
use crate::schedule::build_with_drift;
use crate::walk::Drift;

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Cohort name used for shared schedules when none is configured.
pub const DEFAULT_COHORT: &str = "cohort";

/// Entropy provenance for one random role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Randomness {
    /// Derived from the role's seed key; replays identically.
    Seeded,
    /// Fresh OS-seeded randomness on every run.
    #[default]
    Ambient,
}

/// How the arms' probabilities are produced for a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvironmentMode {
    /// Every participant of the cohort replays one precomputed schedule.
    Shared { cohort: String },
    /// The session walks its own environment, one step after every trial.
    Independent { randomness: Randomness },
}

impl Default for EnvironmentMode {
    fn default() -> Self {
        Self::Independent {
            randomness: Randomness::Ambient,
        }
    }
}

impl fmt::Display for EnvironmentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shared { cohort } => write!(f, "shared({cohort})"),
            Self::Independent {
                randomness: Randomness::Seeded,
            } => f.write_str("independent(seeded)"),
            Self::Independent {
                randomness: Randomness::Ambient,
            } => f.write_str("independent(ambient)"),
        }
    }
}

/// Resolved parameters for starting sessions.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionPlan {
    pub n_trials: usize,
    pub initial_left: f64,
    pub initial_right: f64,
    pub drift: Drift,
    pub environment: EnvironmentMode,
    pub reward: Randomness,
}

impl Default for SessionPlan {
    fn default() -> Self {
        Self {
            n_trials: DEFAULT_TRIALS,
            initial_left: DEFAULT_INITIAL,
            initial_right: DEFAULT_INITIAL,
            drift: Drift::default(),
            environment: EnvironmentMode::default(),
            reward: Randomness::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("session already completed all {0} trials")]
    Finished(usize),
}

/// Source of the arms' probabilities for each trial.
pub enum Environment {
    Scheduled(Schedule),
    OnDemand {
        drift: Drift,
        state: WalkState,
        source: Box<dyn UnitSource + Send>,
    },
}

impl Environment {
    /// On-demand walk starting from the clamped initial probabilities.
    pub fn on_demand(
        drift: Drift,
        initial_left: f64,
        initial_right: f64,
        source: Box<dyn UnitSource + Send>,
    ) -> Self {
        Self::OnDemand {
            drift,
            state: drift.start(initial_left, initial_right),
            source,
        }
    }

    fn state_at(&self, trial: usize) -> Option<WalkState> {
        match self {
            Self::Scheduled(schedule) => schedule.get(trial),
            Self::OnDemand { state, .. } => Some(*state),
        }
    }

    fn advance(&mut self) {
        if let Self::OnDemand {
            drift,
            state,
            source,
        } = self
        {
            *state = drift.advance(*state, source.as_mut());
        }
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scheduled(schedule) => f
                .debug_struct("Scheduled")
                .field("trials", &schedule.len())
                .finish(),
            Self::OnDemand { drift, state, .. } => f
                .debug_struct("OnDemand")
                .field("drift", drift)
                .field("state", state)
                .finish_non_exhaustive(),
        }
    }
}

/// One participant's run through the task.
pub struct Session {
    pid: ParticipantId,
    label: SessionLabel,
    n_trials: usize,
    environment: Environment,
    reward_source: Box<dyn UnitSource + Send>,
    records: Vec<TrialRecord>,
}

impl Session {
    /// Resolve seeds for `pid`/`label` and build the environment described by `plan`.
    pub fn start(plan: &SessionPlan, pid: ParticipantId, label: SessionLabel) -> Self {
        let environment = match &plan.environment {
            EnvironmentMode::Shared { cohort } => {
                let key = SeedKey::cohort(SeedRole::Environment, cohort, &label);
                debug!(seed = %key, "Building shared schedule");
                Environment::Scheduled(build_with_drift(
                    plan.n_trials,
                    plan.initial_left,
                    plan.initial_right,
                    plan.drift,
                    &mut RandomSource::from_key(&key),
                ))
            }
            EnvironmentMode::Independent { randomness } => {
                let key = SeedKey::participant(SeedRole::Environment, &pid, &label);
                Environment::on_demand(
                    plan.drift,
                    plan.initial_left,
                    plan.initial_right,
                    source_for(*randomness, &key),
                )
            }
        };
        let reward_key = SeedKey::participant(SeedRole::Reward, &pid, &label);
        let reward_source = source_for(plan.reward, &reward_key);

        info!(
            pid = %pid,
            session = %label,
            trials = plan.n_trials,
            environment = %plan.environment,
            "Session started"
        );
        Self::new(pid, label, plan.n_trials, environment, reward_source)
    }

    /// Assemble a session from an explicit environment and reward source.
    pub fn new(
        pid: ParticipantId,
        label: SessionLabel,
        n_trials: usize,
        environment: Environment,
        reward_source: Box<dyn UnitSource + Send>,
    ) -> Self {
        Self {
            pid,
            label,
            n_trials,
            environment,
            reward_source,
            records: Vec::new(),
        }
    }

    #[must_use]
    pub fn pid(&self) -> &ParticipantId {
        &self.pid
    }

    #[must_use]
    pub fn label(&self) -> &SessionLabel {
        &self.label
    }

    #[must_use]
    pub fn n_trials(&self) -> usize {
        self.n_trials
    }

    /// 0-based index of the upcoming trial.
    #[must_use]
    pub fn trial_index(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.records.len() >= self.n_trials
    }

    /// Probabilities in force for the upcoming trial, `None` once finished.
    #[must_use]
    pub fn current(&self) -> Option<WalkState> {
        if self.is_finished() {
            return None;
        }
        self.environment.state_at(self.trial_index())
    }

    /// Record a choice: sample its reward, log it, then advance the environment.
    pub fn respond(&mut self, choice: Arm, rt: Duration) -> Result<TrialRecord, SessionError> {
        let Some(state) = self.current() else {
            return Err(SessionError::Finished(self.n_trials));
        };

        let p_chosen = state.get(choice).value();
        let reward = u8::from(self.reward_source.next_unit() < p_chosen);
        let record = TrialRecord {
            pid: self.pid.clone(),
            session: self.label.clone(),
            trial: u32::try_from(self.trial_index() + 1).unwrap_or(u32::MAX),
            choice,
            reward,
            rt: u64::try_from(rt.as_millis()).unwrap_or(u64::MAX),
            p_left: state.left(),
            p_right: state.right(),
        };

        self.records.push(record.clone());
        self.environment.advance();

        if self.is_finished() {
            info!(
                pid = %self.pid,
                session = %self.label,
                total = self.total_reward(),
                "Session finished"
            );
        }
        Ok(record)
    }

    #[must_use]
    pub fn records(&self) -> &[TrialRecord] {
        &self.records
    }

    #[must_use]
    pub fn total_reward(&self) -> u32 {
        self.records.iter().map(|r| u32::from(r.reward)).sum()
    }

    #[must_use]
    pub fn summary(&self) -> SessionSummary<'_> {
        SessionSummary {
            pid: &self.pid,
            session: &self.label,
            total: self.total_reward(),
            n: self.n_trials,
            trials: &self.records,
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("pid", &self.pid)
            .field("label", &self.label)
            .field("n_trials", &self.n_trials)
            .field("environment", &self.environment)
            .field("completed", &self.records.len())
            .finish_non_exhaustive()
    }
}

fn source_for(randomness: Randomness, key: &SeedKey) -> Box<dyn UnitSource + Send> {
    match randomness {
        Randomness::Seeded => {
            debug!(seed = %key, "Seeded source");
            Box::new(RandomSource::from_key(key))
        }
        Randomness::Ambient => Box::new(AmbientSource),
    }
}

/// Fresh participant id: `P` followed by six lowercase base36 characters.
#[must_use]
pub fn random_participant_id() -> ParticipantId {
    let mut n = rand::random::<u64>();
    let mut id = String::with_capacity(7);
    id.push('P');
    for _ in 0..6 {
        id.push(char::from(BASE36[(n % 36) as usize]));
        n /= 36;
    }
    ParticipantId::new(id).expect("generated id starts with 'P'")
}
