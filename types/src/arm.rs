use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One of the two selectable options of the task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Arm {
    #[serde(rename = "L")]
    Left,
    #[serde(rename = "R")]
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized choice {0:?} (expected F/L for left or J/R for right)")]
pub struct ArmParseError(pub String);

impl Arm {
    pub const ALL: [Self; 2] = [Self::Left, Self::Right];

    /// Single-letter code used in trial logs.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Left => "L",
            Self::Right => "R",
        }
    }

    /// Response key bound to this arm (`F` left, `J` right).
    #[must_use]
    pub const fn key(self) -> char {
        match self {
            Self::Left => 'F',
            Self::Right => 'J',
        }
    }

}

impl FromStr for Arm {
    type Err = ArmParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "l" | "left" | "f" => Ok(Self::Left),
            "r" | "right" | "j" => Ok(Self::Right),
            _ => Err(ArmParseError(trimmed.to_string())),
        }
    }
}

impl fmt::Display for Arm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
