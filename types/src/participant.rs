use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Session type used when none is given.
pub const DEFAULT_SESSION: &str = "morning";

/// Characters that would escape an output directory or split a seed key.
const RESERVED: [char; 3] = ['/', '\\', ':'];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParticipantIdError {
    #[error("participant id must not be empty")]
    Empty,
    #[error("participant id must not contain {0:?}")]
    Reserved(char),
}

/// Participant identifier: trimmed, non-empty, free of path and seed-key separators.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ParticipantId(String);

impl ParticipantId {
    pub fn new(value: impl Into<String>) -> Result<Self, ParticipantIdError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ParticipantIdError::Empty);
        }
        if let Some(c) = trimmed.chars().find(|c| RESERVED.contains(c)) {
            return Err(ParticipantIdError::Reserved(c));
        }
        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ParticipantId {
    type Error = ParticipantIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ParticipantId> for String {
    fn from(value: ParticipantId) -> Self {
        value.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Session type (e.g. `morning`, `evening`), normalized to trimmed lowercase.
///
/// Separator characters become `_`; a blank label falls back to `morning`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct SessionLabel(String);

impl SessionLabel {
    pub fn new(value: impl AsRef<str>) -> Self {
        let label: String = value
            .as_ref()
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| if RESERVED.contains(&c) { '_' } else { c })
            .collect();
        if label.is_empty() {
            Self::default()
        } else {
            Self(label)
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionLabel {
    fn default() -> Self {
        Self(DEFAULT_SESSION.to_string())
    }
}

impl From<String> for SessionLabel {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<SessionLabel> for String {
    fn from(value: SessionLabel) -> Self {
        value.0
    }
}

impl fmt::Display for SessionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
