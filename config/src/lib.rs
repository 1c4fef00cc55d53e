//! Task configuration from `~/.bandit/config.toml`.
//!
//! The file is optional and every key in it is optional. Raw TOML structs are
//! resolved into a validated [`Settings`] so the rest of the workspace never
//! sees an unchecked bound or step.
//!
//! ```toml
//! [task]
//! trials = 400
//!
//! [walk]
//! step = 0.03
//! lo = 0.25
//! hi = 0.75
//! initial_left = 0.5
//! initial_right = 0.5
//!
//! [environment]
//! mode = "shared"     # or "independent"
//! cohort = "spring"
//!
//! [reward]
//! seeded = true
//!
//! [output]
//! dir = "logs"
//! ```

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::{env, fs, io};

use bandit_core::{DEFAULT_COHORT, Drift, EnvironmentMode, Randomness, SessionPlan};
use bandit_types::{
    Bounds, BoundsError, DEFAULT_HI, DEFAULT_INITIAL, DEFAULT_LO, DEFAULT_STEP, DEFAULT_TRIALS,
    MAX_TRIALS,
};
use serde::Deserialize;
use thiserror::Error;
use toml::de;
use tracing::{debug, warn};

/// Environment variable that overrides the config file location.
pub const CONFIG_ENV: &str = "BANDIT_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: de::Error,
    },
    #[error("invalid config at {}: {source}", path.display())]
    Invalid {
        path: PathBuf,
        source: SettingsError,
    },
}

/// A config value that parsed but is out of range.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum SettingsError {
    #[error("invalid walk bounds: {0}")]
    Bounds(#[from] BoundsError),
    #[error("task.trials = {trials} exceeds the maximum of {max}")]
    TooManyTrials { trials: usize, max: usize },
}

impl ConfigError {
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Read { path, .. } | Self::Parse { path, .. } | Self::Invalid { path, .. } => {
                path
            }
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct BanditConfig {
    pub task: Option<TaskConfig>,
    pub walk: Option<WalkConfig>,
    pub environment: Option<EnvironmentConfig>,
    pub reward: Option<RewardConfig>,
    pub output: Option<OutputConfig>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TaskConfig {
    pub trials: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WalkConfig {
    pub step: Option<f64>,
    pub lo: Option<f64>,
    pub hi: Option<f64>,
    pub initial_left: Option<f64>,
    pub initial_right: Option<f64>,
    /// Chance of a downward step; omit for the symmetric walk.
    pub down_probability: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ModeConfig {
    #[default]
    Independent,
    Shared,
}

#[derive(Debug, Default, Deserialize)]
pub struct EnvironmentConfig {
    #[serde(default)]
    pub mode: ModeConfig,
    /// Seed the private walk from `env:<pid>:<session>`. Independent mode only.
    #[serde(default)]
    pub seeded: bool,
    pub cohort: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RewardConfig {
    #[serde(default)]
    pub seeded: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct OutputConfig {
    pub dir: Option<PathBuf>,
}

/// Validated configuration, ready to start sessions from.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub plan: SessionPlan,
    pub output_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            plan: SessionPlan::default(),
            output_dir: PathBuf::from("."),
        }
    }
}

impl BanditConfig {
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| {
            warn!(path = %path.display(), "Failed to read config: {source}");
            ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }
        })?;
        toml::from_str(&content).map_err(|source| {
            warn!(path = %path.display(), "Failed to parse config: {source}");
            ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            }
        })
    }

    /// Fill in defaults and validate.
    pub fn resolve(&self) -> Result<Settings, SettingsError> {
        let walk = self.walk.as_ref();
        let pick = |get: fn(&WalkConfig) -> Option<f64>, default: f64| {
            walk.and_then(get).unwrap_or(default)
        };

        let bounds = Bounds::new(pick(|w| w.lo, DEFAULT_LO), pick(|w| w.hi, DEFAULT_HI))?;
        let mut drift = Drift::symmetric(pick(|w| w.step, DEFAULT_STEP), bounds);
        if let Some(down) = walk.and_then(|w| w.down_probability) {
            drift = drift.with_down_probability(down);
        }

        let environment = match &self.environment {
            None => EnvironmentMode::default(),
            Some(env) => match env.mode {
                ModeConfig::Shared => {
                    if env.seeded {
                        warn!("`environment.seeded` has no effect in shared mode");
                    }
                    EnvironmentMode::Shared {
                        cohort: env
                            .cohort
                            .clone()
                            .unwrap_or_else(|| DEFAULT_COHORT.to_string()),
                    }
                }
                ModeConfig::Independent => EnvironmentMode::Independent {
                    randomness: randomness(env.seeded),
                },
            },
        };

        let n_trials = self
            .task
            .as_ref()
            .and_then(|t| t.trials)
            .unwrap_or(DEFAULT_TRIALS);
        if n_trials > MAX_TRIALS {
            return Err(SettingsError::TooManyTrials {
                trials: n_trials,
                max: MAX_TRIALS,
            });
        }

        let plan = SessionPlan {
            n_trials,
            initial_left: pick(|w| w.initial_left, DEFAULT_INITIAL),
            initial_right: pick(|w| w.initial_right, DEFAULT_INITIAL),
            drift,
            environment,
            reward: randomness(self.reward.as_ref().is_some_and(|r| r.seeded)),
        };

        Ok(Settings {
            plan,
            output_dir: self
                .output
                .as_ref()
                .and_then(|o| o.dir.clone())
                .unwrap_or_else(|| PathBuf::from(".")),
        })
    }
}

/// Load and resolve the config file, falling back to defaults when it is absent.
pub fn load_settings() -> Result<Settings, ConfigError> {
    let Some(path) = config_path().filter(|p| p.exists()) else {
        debug!("No config file, using defaults");
        return Ok(Settings::default());
    };
    let settings = BanditConfig::load_from(&path)?
        .resolve()
        .map_err(|source| ConfigError::Invalid {
            path: path.clone(),
            source,
        })?;
    debug!(path = %path.display(), "Loaded config");
    Ok(settings)
}

/// `$BANDIT_CONFIG`, else `~/.bandit/config.toml`.
#[must_use]
pub fn config_path() -> Option<PathBuf> {
    path_from(env::var_os(CONFIG_ENV), dirs::home_dir())
}

fn path_from(override_path: Option<OsString>, home: Option<PathBuf>) -> Option<PathBuf> {
    match override_path {
        Some(path) if !path.is_empty() => Some(PathBuf::from(path)),
        _ => home.map(|home| home.join(".bandit").join("config.toml")),
    }
}

fn randomness(seeded: bool) -> Randomness {
    if seeded {
        Randomness::Seeded
    } else {
        Randomness::Ambient
    }
}
