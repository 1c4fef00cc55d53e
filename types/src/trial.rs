use serde::{Serialize, Serializer};

use crate::{Arm, ParticipantId, Probability, SessionLabel};

/// Decimal places probabilities are logged with, in CSV and JSON alike.
pub const LOG_PRECISION: usize = 3;

/// One logged response.
///
/// `p_left`/`p_right` are the probabilities in force when the choice was
/// made, before the environment advanced for the next trial.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrialRecord {
    pub pid: ParticipantId,
    pub session: SessionLabel,
    /// 1-based trial number.
    pub trial: u32,
    pub choice: Arm,
    /// 1 when rewarded, 0 otherwise.
    pub reward: u8,
    /// Response time in milliseconds.
    pub rt: u64,
    #[serde(serialize_with = "fixed_precision")]
    pub p_left: Probability,
    #[serde(serialize_with = "fixed_precision")]
    pub p_right: Probability,
}

fn fixed_precision<S: Serializer>(p: &Probability, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format!("{:.*}", LOG_PRECISION, p))
}

impl TrialRecord {
    #[must_use]
    pub const fn rewarded(&self) -> bool {
        self.reward == 1
    }
}

/// End-of-session payload: identity, score, and the full trial log.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary<'a> {
    pub pid: &'a ParticipantId,
    pub session: &'a SessionLabel,
    pub total: u32,
    /// Planned number of trials.
    pub n: usize,
    pub trials: &'a [TrialRecord],
}
