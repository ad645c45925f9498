//! Wall-clock time of day with minute resolution.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Errors from parsing a clock string such as `"8:00 PM"` or `"20:00"`.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeParseError {
    #[error("invalid clock time '{0}' (expected e.g. \"8:00 PM\" or \"20:00\")")]
    Malformed(String),
    #[error("hour {hour} out of range in '{input}'")]
    HourOutOfRange { hour: u32, input: String },
    #[error("minute {minute} out of range in '{input}'")]
    MinuteOutOfRange { minute: u32, input: String },
}

/// Minutes since midnight, always in `0..1440`.
///
/// Displays in 12-hour form (`"8:00 PM"`); parses both 12- and 24-hour forms.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay {
    minutes: u16,
}

impl TimeOfDay {
    pub const MIDNIGHT: Self = Self { minutes: 0 };
    pub const NOON: Self = Self { minutes: 720 };

    /// `hour` in 0..24, `minute` in 0..60.
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        (hour < 24 && minute < 60).then(|| Self {
            minutes: (hour * 60 + minute) as u16,
        })
    }

    /// Wraps any minute count onto the 24-hour cycle.
    pub fn from_minutes(minutes: i64) -> Self {
        Self {
            minutes: minutes.rem_euclid(MINUTES_PER_DAY as i64) as u16,
        }
    }

    #[inline]
    pub fn minutes(self) -> u32 {
        self.minutes as u32
    }

    #[inline]
    pub fn hour(self) -> u32 {
        self.minutes() / 60
    }

    #[inline]
    pub fn minute(self) -> u32 {
        self.minutes() % 60
    }

    /// Shortest distance in minutes going either way around the clock.
    pub fn circular_distance(self, other: Self) -> u32 {
        let d = self.minutes().abs_diff(other.minutes());
        d.min(MINUTES_PER_DAY - d)
    }

    /// Minutes from `self` forward to `later`, wrapping past midnight.
    pub fn minutes_until(self, later: Self) -> u32 {
        (later.minutes() + MINUTES_PER_DAY - self.minutes()) % MINUTES_PER_DAY
    }

    /// `"HH:MM"` in 24-hour form.
    pub fn to_24h_string(self) -> String {
        format!("{:02}:{:02}", self.hour(), self.minute())
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (h12, suffix) = match self.hour() {
            0 => (12, "AM"),
            h @ 1..=11 => (h, "AM"),
            12 => (12, "PM"),
            h => (h - 12, "PM"),
        };
        write!(f, "{}:{:02} {}", h12, self.minute(), suffix)
    }
}

impl FromStr for TimeOfDay {
    type Err = TimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        let malformed = || TimeParseError::Malformed(s.to_string());

        let upper = input.to_ascii_uppercase();
        let (clock, meridiem) = if let Some(rest) = upper.strip_suffix("AM") {
            (rest.trim_end(), Some(false))
        } else if let Some(rest) = upper.strip_suffix("PM") {
            (rest.trim_end(), Some(true))
        } else {
            (upper.as_str(), None)
        };

        let (h, m) = clock.split_once(':').ok_or_else(malformed)?;
        if h.is_empty() || h.len() > 2 || m.len() != 2 {
            return Err(malformed());
        }
        let hour: u32 = h.parse().map_err(|_| malformed())?;
        let minute: u32 = m.parse().map_err(|_| malformed())?;
        if minute >= 60 {
            return Err(TimeParseError::MinuteOutOfRange {
                minute,
                input: s.to_string(),
            });
        }

        let hour24 = match meridiem {
            Some(pm) => {
                if !(1..=12).contains(&hour) {
                    return Err(TimeParseError::HourOutOfRange {
                        hour,
                        input: s.to_string(),
                    });
                }
                match (hour, pm) {
                    (12, false) => 0,
                    (12, true) => 12,
                    (h, false) => h,
                    (h, true) => h + 12,
                }
            }
            None if hour < 24 => hour,
            None => {
                return Err(TimeParseError::HourOutOfRange {
                    hour,
                    input: s.to_string(),
                })
            }
        };

        Self::from_hm(hour24, minute).ok_or_else(malformed)
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = TimeParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(t: TimeOfDay) -> Self {
        t.to_string()
    }
}
