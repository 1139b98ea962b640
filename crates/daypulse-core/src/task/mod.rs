//! Task snapshot consumed by the load classifier and conflict detector.
//!
//! A snapshot is whatever the storage layer handed us for one task. Temporal
//! fields stay as raw strings so that one malformed value never rejects a
//! whole export; the accessor methods below do the parsing and return `None`
//! for anything they cannot read.

pub mod parse;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use parse::{parse_clock, parse_date, parse_datetime};

/// Kind of task, used only to pick a default duration for conflict blocks.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    /// Calendar-style item that occupies time.
    #[default]
    Event,
    /// Short nudge at a point in time.
    Reminder,
}

impl TaskKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::Event => "event",
            TaskKind::Reminder => "reminder",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "event" => Ok(TaskKind::Event),
            "reminder" => Ok(TaskKind::Reminder),
            other => Err(format!("unknown task kind: {other}")),
        }
    }
}

// Unknown or null kinds fall back to `Event` instead of failing the export.
impl<'de> Deserialize<'de> for TaskKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
        Ok(raw
            .as_ref()
            .and_then(serde_json::Value::as_str)
            .and_then(|s| s.parse::<TaskKind>().ok())
            .unwrap_or_default())
    }
}

/// Read-only task record.
///
/// `time` is also accepted as `scheduled_time` on the wire, and `task_kind`
/// as `type`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Task {
    /// Stable reference reported in conflict pairs.
    #[serde(default)]
    pub id: String,
    /// Display title.
    #[serde(default)]
    pub title: String,
    /// Day the task belongs to (`YYYY-MM-DD`).
    #[serde(default)]
    pub date: Option<String>,
    /// Wall-clock start (`HH:MM`); absent for anytime tasks.
    #[serde(default, alias = "scheduled_time")]
    pub time: Option<String>,
    /// Full start datetime; wins over `date` + `time`.
    #[serde(default)]
    pub datetime: Option<String>,
    /// Planned length in minutes. Only positive values count.
    #[serde(default, deserialize_with = "lenient_minutes")]
    pub duration_minutes: Option<i64>,
    /// Bare end clock time.
    #[serde(default)]
    pub end_time: Option<String>,
    /// Full end datetime; wins over `end_time` since it can cross midnight.
    #[serde(default)]
    pub end_datetime: Option<String>,
    #[serde(default, alias = "type")]
    pub task_kind: TaskKind,
    #[serde(default)]
    pub completed: bool,
}

/// Accepts integers, integral floats and numeric strings; anything else is
/// read as "no duration".
fn lenient_minutes<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.round() as i64)),
        Some(serde_json::Value::String(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    })
}

impl Task {
    /// Create a new anytime task.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn with_time(mut self, time: impl Into<String>) -> Self {
        self.time = Some(time.into());
        self
    }

    pub fn with_datetime(mut self, datetime: impl Into<String>) -> Self {
        self.datetime = Some(datetime.into());
        self
    }

    pub fn with_duration(mut self, minutes: i64) -> Self {
        self.duration_minutes = Some(minutes);
        self
    }

    pub fn with_end_time(mut self, end_time: impl Into<String>) -> Self {
        self.end_time = Some(end_time.into());
        self
    }

    pub fn with_end_datetime(mut self, end_datetime: impl Into<String>) -> Self {
        self.end_datetime = Some(end_datetime.into());
        self
    }

    pub fn with_kind(mut self, kind: TaskKind) -> Self {
        self.task_kind = kind;
        self
    }

    pub fn completed(mut self) -> Self {
        self.completed = true;
        self
    }

    /// Wall-clock start time.
    ///
    /// Falls back to the time-of-day of `datetime` when `time` is absent or
    /// unreadable. `None` means the task is an anytime task.
    pub fn scheduled_time(&self) -> Option<NaiveTime> {
        self.time
            .as_deref()
            .and_then(parse_clock)
            .or_else(|| self.explicit_start().map(|dt| dt.time()))
    }

    /// The day this task is planned for.
    ///
    /// Follows the same precedence as [`Task::start_datetime`]: the date of
    /// `datetime` when it parses, else `date`.
    pub fn day(&self) -> Option<NaiveDate> {
        self.explicit_start()
            .map(|dt| dt.date())
            .or_else(|| self.date.as_deref().and_then(parse_date))
    }

    /// Resolved start: `datetime`, else `date` + `time`.
    pub fn start_datetime(&self) -> Option<NaiveDateTime> {
        if let Some(dt) = self.explicit_start() {
            return Some(dt);
        }
        let date = self.date.as_deref().and_then(parse_date)?;
        let time = self.time.as_deref().and_then(parse_clock)?;
        Some(date.and_time(time))
    }

    /// Parsed `end_datetime`.
    pub fn end_datetime(&self) -> Option<NaiveDateTime> {
        self.end_datetime.as_deref().and_then(parse_datetime)
    }

    /// End clock time: `end_time`, else the time-of-day of `end_datetime`.
    pub fn end_clock_time(&self) -> Option<NaiveTime> {
        self.end_time
            .as_deref()
            .and_then(parse_clock)
            .or_else(|| self.end_datetime().map(|dt| dt.time()))
    }

    /// `duration_minutes` when it is strictly positive.
    pub fn positive_duration(&self) -> Option<i64> {
        self.duration_minutes.filter(|m| *m > 0)
    }

    fn explicit_start(&self) -> Option<NaiveDateTime> {
        self.datetime.as_deref().and_then(parse_datetime)
    }
}

/// Lightweight reference to a task, carried in results.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskRef {
    pub id: String,
    pub title: String,
}

impl From<&Task> for TaskRef {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id.clone(),
            title: task.title.clone(),
        }
    }
}
