//! Alarm domain model.
//!
//! Only the stored shape lives here. Scheduling and notification delivery
//! happen on the client.
//!
//! # Invariants
//! - `time` is a wall-clock `HH:mm` value with hour <= 23 and minute <= 59.
//! - `sound` is never empty; it falls back to [`DEFAULT_ALARM_SOUND`].

use crate::model::profile::ProfileId;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable alarm identifier.
pub type AlarmId = Uuid;

/// Sound used when none is chosen.
pub const DEFAULT_ALARM_SOUND: &str = "Default";

static ALARM_TIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{2}):(\d{2})$").expect("valid alarm time regex"));

/// Alarm time input rejected by [`AlarmTime::parse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlarmTimeError {
    /// Input is not `HH:mm`.
    Format(String),
    /// Hour or minute is out of range.
    OutOfRange { hour: u8, minute: u8 },
}

impl Display for AlarmTimeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Format(value) => write!(f, "time must be in HH:mm format, got `{value}`"),
            Self::OutOfRange { hour, minute } => {
                write!(f, "invalid time {hour:02}:{minute:02}")
            }
        }
    }
}

impl Error for AlarmTimeError {}

/// Wall-clock alarm time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AlarmTime {
    hour: u8,
    minute: u8,
}

impl AlarmTime {
    /// Parses a strict `HH:mm` string.
    pub fn parse(value: &str) -> Result<Self, AlarmTimeError> {
        let captures = ALARM_TIME_RE
            .captures(value)
            .ok_or_else(|| AlarmTimeError::Format(value.to_string()))?;
        let hour = captures[1]
            .parse::<u8>()
            .map_err(|_| AlarmTimeError::Format(value.to_string()))?;
        let minute = captures[2]
            .parse::<u8>()
            .map_err(|_| AlarmTimeError::Format(value.to_string()))?;
        if hour > 23 || minute > 59 {
            return Err(AlarmTimeError::OutOfRange { hour, minute });
        }
        Ok(Self { hour, minute })
    }

    pub fn hour(self) -> u8 {
        self.hour
    }

    pub fn minute(self) -> u8 {
        self.minute
    }
}

impl Display for AlarmTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl TryFrom<String> for AlarmTime {
    type Error = AlarmTimeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<AlarmTime> for String {
    fn from(value: AlarmTime) -> Self {
        value.to_string()
    }
}

/// Persisted alarm row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alarm {
    pub id: AlarmId,
    pub profile_id: ProfileId,
    pub name: String,
    pub time: AlarmTime,
    pub sound: String,
    /// Free-form repeat rule as entered by the client, empty for one-shot.
    pub repeat: String,
    pub is_active: bool,
}

/// Create/edit input for one alarm.
///
/// Optional fields keep their previous value on edit and fall back to the
/// defaults on create.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlarmDraft {
    pub name: String,
    pub time: String,
    pub sound: Option<String>,
    pub repeat: String,
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::{AlarmTime, AlarmTimeError};

    #[test]
    fn parse_accepts_valid_wall_clock_times() {
        let time = AlarmTime::parse("07:05").unwrap();
        assert_eq!((time.hour(), time.minute()), (7, 5));
        assert_eq!(time.to_string(), "07:05");
        assert!(AlarmTime::parse("23:59").is_ok());
    }

    #[test]
    fn parse_rejects_bad_format_and_range() {
        assert!(matches!(
            AlarmTime::parse("7:05"),
            Err(AlarmTimeError::Format(_))
        ));
        assert!(matches!(
            AlarmTime::parse("07:05:00"),
            Err(AlarmTimeError::Format(_))
        ));
        assert_eq!(
            AlarmTime::parse("24:00").unwrap_err(),
            AlarmTimeError::OutOfRange {
                hour: 24,
                minute: 0
            }
        );
    }
}
