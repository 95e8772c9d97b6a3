use std::time::Duration;
use thiserror::Error;

/// Smallest interval the edit dialog accepts, in minutes.
pub const MIN_MINUTES: i64 = 1;

/// Largest interval the edit dialog accepts (24 hours), in minutes.
pub const MAX_MINUTES: i64 = 1440;

/// Interval used when the config file does not override it.
pub const DEFAULT_MINUTES: u32 = 45;

const MILLIS_PER_MINUTE: u64 = 60_000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntervalError {
    #[error("'{0}' is not a whole number of minutes")]
    NotANumber(String),

    #[error("{0} minutes is outside 1..=1440")]
    OutOfRange(i64),
}

/// Time between two rest prompts. Always greater than zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestInterval {
    millis: u64,
}

impl RestInterval {
    /// Builds an interval from raw milliseconds. Returns `None` for zero.
    #[cfg(test)]
    pub fn from_millis(millis: u64) -> Option<Self> {
        (millis > 0).then_some(Self { millis })
    }

    pub fn from_minutes(minutes: i64) -> Result<Self, IntervalError> {
        if !(MIN_MINUTES..=MAX_MINUTES).contains(&minutes) {
            return Err(IntervalError::OutOfRange(minutes));
        }
        Ok(Self {
            millis: minutes as u64 * MILLIS_PER_MINUTE,
        })
    }

    /// Parses user input from the edit dialog.
    pub fn parse_minutes(text: &str) -> Result<Self, IntervalError> {
        let trimmed = text.trim();
        let minutes: i64 = trimmed
            .parse()
            .map_err(|_| IntervalError::NotANumber(trimmed.to_string()))?;
        Self::from_minutes(minutes)
    }

    pub fn millis(&self) -> u64 {
        self.millis
    }

    pub fn as_duration(&self) -> Duration {
        Duration::from_millis(self.millis)
    }

    /// Whole minutes for display, rounded half-up.
    pub fn display_minutes(&self) -> u64 {
        (self.millis + MILLIS_PER_MINUTE / 2) / MILLIS_PER_MINUTE
    }
}

impl Default for RestInterval {
    fn default() -> Self {
        Self {
            millis: DEFAULT_MINUTES as u64 * MILLIS_PER_MINUTE,
        }
    }
}
