use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::elapsed::{self, TimestampError};

/// Literal prefix the platform puts in front of reshared posts.
pub const REPOST_MARKER: &str = "RT";

/// One post as handed over by the upstream source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Post {
    pub text: String,
    /// Raw platform timestamp, e.g. `Wed Jul 09 14:32:10 +0000 2025`.
    pub created_at: String,
}

impl Post {
    pub fn new(text: impl Into<String>, created_at: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            created_at: created_at.into(),
        }
    }

    pub fn is_repost(&self) -> bool {
        self.text.starts_with(REPOST_MARKER)
    }

    pub fn created_at(&self) -> Result<DateTime<FixedOffset>, TimestampError> {
        elapsed::parse_created_at(&self.created_at)
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Unknown,
    Completed,
    Scheduled,
    DownNow,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Unknown => "unknown",
            Status::Completed => "completed",
            Status::Scheduled => "scheduled",
            Status::DownNow => "down_now",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An "about N hours" figure lifted from post text.
///
/// The digits are kept verbatim so arbitrarily long numbers survive intact.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApproxDuration {
    pub hours: String,
}

impl ApproxDuration {
    pub fn new(hours: impl Into<String>) -> Self {
        Self {
            hours: hours.into(),
        }
    }
}

impl fmt::Display for ApproxDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "~{} hours", self.hours)
    }
}

/// Classifier output for a single post.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Analysis {
    pub status: Status,
    pub duration: Option<ApproxDuration>,
}

/// Whole days/hours/minutes between two instants. Seconds are dropped.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ElapsedDuration {
    pub days: i64,
    pub hours: u32,
    pub minutes: u32,
}

impl ElapsedDuration {
    pub fn from_seconds(total: i64) -> Self {
        let total = total.max(0);
        let days = total / 86_400;
        let rem = total % 86_400;
        Self {
            days,
            hours: (rem / 3_600) as u32,
            minutes: ((rem % 3_600) / 60) as u32,
        }
    }
}

impl fmt::Display for ElapsedDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d {}h {}m ago", self.days, self.hours, self.minutes)
    }
}
