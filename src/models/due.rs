//! Due date value that remembers whether a time-of-day was given.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Accepted local date-time layouts, tried in order after RFC 3339.
const DATE_TIME_INPUTS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// A task due date on the user's calendar.
///
/// Date-only values serialize as `YYYY-MM-DD`, timed values as
/// `YYYY-MM-DDTHH:MM:SS`. Parsing a `DueDate` directly keeps the wall-clock
/// reading of RFC 3339 input; use [`DueInput`] to move it onto a calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DueDate {
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl DueDate {
    /// Calendar date of the due value.
    pub fn date(&self) -> NaiveDate {
        match self {
            DueDate::Date(d) => *d,
            DueDate::DateTime(dt) => dt.date(),
        }
    }

    pub fn has_time(&self) -> bool {
        matches!(self, DueDate::DateTime(_))
    }

    /// Instant used for ordering; date-only values sit at the start of their day.
    pub fn as_datetime(&self) -> NaiveDateTime {
        match self {
            DueDate::Date(d) => d.and_time(chrono::NaiveTime::MIN),
            DueDate::DateTime(dt) => *dt,
        }
    }
}

impl Ord for DueDate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_datetime()
            .cmp(&other.as_datetime())
            .then(self.has_time().cmp(&other.has_time()))
    }
}

impl PartialOrd for DueDate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for DueDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DueDate::Date(d) => write!(f, "{}", d.format(DATE_FORMAT)),
            DueDate::DateTime(dt) => write!(f, "{}", dt.format(DATE_TIME_FORMAT)),
        }
    }
}

/// Error returned when a due date string matches none of the accepted layouts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DueDateParseError(pub String);

impl fmt::Display for DueDateParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid due date: {:?}", self.0)
    }
}

impl std::error::Error for DueDateParseError {}

impl FromStr for DueDate {
    type Err = DueDateParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.parse::<DueInput>()? {
            DueInput::Local(due) => due,
            DueInput::Instant(instant) => DueDate::DateTime(instant.naive_local()),
        })
    }
}

/// A due date as received from a client.
///
/// Input carrying an offset names an instant and is only placed on a
/// calendar once the calendar's offset is known. Everything else already is
/// a calendar reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueInput {
    Local(DueDate),
    Instant(DateTime<FixedOffset>),
}

impl DueInput {
    /// The reading on the calendar at `offset`.
    pub fn on_calendar(self, offset: &FixedOffset) -> DueDate {
        match self {
            DueInput::Local(due) => due,
            DueInput::Instant(instant) => {
                DueDate::DateTime(instant.with_timezone(offset).naive_local())
            }
        }
    }
}

impl FromStr for DueInput {
    type Err = DueDateParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if let Ok(date) = NaiveDate::parse_from_str(s, DATE_FORMAT) {
            return Ok(DueInput::Local(DueDate::Date(date)));
        }
        if let Ok(instant) = DateTime::parse_from_rfc3339(s) {
            return Ok(DueInput::Instant(instant));
        }
        DATE_TIME_INPUTS
            .iter()
            .find_map(|layout| NaiveDateTime::parse_from_str(s, layout).ok())
            .map(|dt| DueInput::Local(DueDate::DateTime(dt)))
            .ok_or_else(|| DueDateParseError(s.to_string()))
    }
}

impl<'de> Deserialize<'de> for DueInput {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

impl Serialize for DueDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DueDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}
