//! Seed keys that separate the random streams of one session.
//!
//! Every role that consumes randomness gets its own key, composed as
//! `role:scope:session`. The scope is a participant id for per-participant
//! streams or a cohort name for streams shared by a whole cohort.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{ParticipantId, SessionLabel};

/// Purpose a random stream is drawn for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeedRole {
    /// Drift of the arms' reward probabilities.
    #[serde(rename = "env")]
    Environment,
    /// Bernoulli draws deciding whether a choice is rewarded.
    Reward,
    /// Illustrative walks shown before the task starts.
    Demo,
}

impl SeedRole {
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Environment => "env",
            Self::Reward => "reward",
            Self::Demo => "demo",
        }
    }
}

impl fmt::Display for SeedRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SeedKey {
    role: SeedRole,
    scope: String,
    session: String,
}

impl SeedKey {
    pub fn new(role: SeedRole, scope: impl Into<String>, session: impl Into<String>) -> Self {
        Self {
            role,
            scope: scope.into(),
            session: session.into(),
        }
    }

    /// Key for a stream private to one participant's session.
    #[must_use]
    pub fn participant(role: SeedRole, pid: &ParticipantId, session: &SessionLabel) -> Self {
        Self::new(role, pid.as_str(), session.as_str())
    }

    /// Key for a stream every participant of `cohort` shares for this session type.
    #[must_use]
    pub fn cohort(role: SeedRole, cohort: &str, session: &SessionLabel) -> Self {
        Self::new(role, cohort, session.as_str())
    }

}

impl fmt::Display for SeedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.role, self.scope, self.session)
    }
}
