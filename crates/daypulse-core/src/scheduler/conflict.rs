//! Same-day overlap detection between scheduled tasks.

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::task::{Task, TaskKind, TaskRef};

/// How candidate pairs are chosen after sorting.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConflictMode {
    /// Compare each block only with its immediate successor.
    ///
    /// Misses a block that overlaps an earlier, non-neighbouring block
    /// (A overlaps C while B sits between them).
    #[default]
    Adjacent,
    /// Report every overlapping pair within a day.
    #[serde(alias = "sweep")]
    SameDaySweep,
}

impl std::str::FromStr for ConflictMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "adjacent" => Ok(ConflictMode::Adjacent),
            "sweep" | "same_day_sweep" => Ok(ConflictMode::SameDaySweep),
            other => Err(format!("unknown conflict mode: {other} (use adjacent or sweep)")),
        }
    }
}

/// Detector configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictConfig {
    #[serde(default)]
    pub mode: ConflictMode,
    /// Block length for events without an end or duration.
    #[serde(default = "default_event_minutes")]
    pub event_default_minutes: i64,
    /// Block length for reminders without an end or duration.
    #[serde(default = "default_reminder_minutes")]
    pub reminder_default_minutes: i64,
}

fn default_event_minutes() -> i64 {
    60
}
fn default_reminder_minutes() -> i64 {
    15
}

impl Default for ConflictConfig {
    fn default() -> Self {
        Self {
            mode: ConflictMode::default(),
            event_default_minutes: default_event_minutes(),
            reminder_default_minutes: default_reminder_minutes(),
        }
    }
}

impl ConflictConfig {
    pub fn default_minutes(&self, kind: TaskKind) -> i64 {
        match kind {
            TaskKind::Event => self.event_default_minutes,
            TaskKind::Reminder => self.reminder_default_minutes,
        }
    }
}

/// A resolved `[start, end)` interval for one task.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduledBlock {
    pub task: TaskRef,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl ScheduledBlock {
    /// Calendar date the block starts on.
    pub fn day(&self) -> NaiveDate {
        self.start.date()
    }

    /// Overlap with a block that starts at or after this one, same day only.
    fn overlap_with_later(&self, later: &ScheduledBlock) -> Option<ConflictPair> {
        if self.day() != later.day() || later.start >= self.end {
            return None;
        }
        Some(ConflictPair {
            task_a: self.task.clone(),
            task_b: later.task.clone(),
            overlap_start: self.start.max(later.start),
            overlap_end: self.end.min(later.end),
        })
    }
}

/// Two tasks whose blocks overlap.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictPair {
    pub task_a: TaskRef,
    pub task_b: TaskRef,
    pub overlap_start: NaiveDateTime,
    pub overlap_end: NaiveDateTime,
}

impl ConflictPair {
    pub fn overlap_minutes(&self) -> i64 {
        (self.overlap_end - self.overlap_start).num_minutes()
    }
}

/// Conflict detector over task snapshots.
#[derive(Debug, Clone, Default)]
pub struct ConflictDetector {
    config: ConflictConfig,
}

impl ConflictDetector {
    /// Create a detector with default config (adjacent mode)
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom config
    pub fn with_config(config: ConflictConfig) -> Self {
        Self { config }
    }

    /// Override just the mode.
    pub fn with_mode(mut self, mode: ConflictMode) -> Self {
        self.config.mode = mode;
        self
    }

    pub fn config(&self) -> &ConflictConfig {
        &self.config
    }

    /// Build blocks for every task with a resolvable start inside the
    /// inclusive date range, sorted by start. Ties keep input order.
    pub fn build_blocks(
        &self,
        tasks: &[Task],
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Vec<ScheduledBlock> {
        let mut blocks: Vec<ScheduledBlock> = tasks
            .iter()
            .filter_map(|task| {
                let start = match task.start_datetime() {
                    Some(start) => start,
                    None => {
                        if task.datetime.is_some() || (task.date.is_some() && task.time.is_some()) {
                            tracing::debug!(task = %task.id, "unreadable start, skipping block");
                        }
                        return None;
                    }
                };
                let day = start.date();
                if start_date.is_some_and(|d| day < d) || end_date.is_some_and(|d| day > d) {
                    return None;
                }
                Some(ScheduledBlock {
                    task: TaskRef::from(task),
                    start,
                    end: self.resolve_end(task, start),
                })
            })
            .collect();

        blocks.sort_by_key(|b| b.start);
        blocks
    }

    /// End by priority: `end_datetime` after start, start plus positive
    /// duration, then the kind default.
    ///
    /// A duration that runs past the last representable datetime ends at
    /// [`NaiveDateTime::MAX`].
    pub fn resolve_end(&self, task: &Task, start: NaiveDateTime) -> NaiveDateTime {
        if let Some(end) = task.end_datetime().filter(|end| *end > start) {
            return end;
        }
        let minutes = task
            .positive_duration()
            .unwrap_or_else(|| self.config.default_minutes(task.task_kind));
        TimeDelta::try_minutes(minutes)
            .and_then(|delta| start.checked_add_signed(delta))
            .unwrap_or_else(|| {
                tracing::debug!(task = %task.id, minutes, "duration out of range, clamping end");
                NaiveDateTime::MAX
            })
    }

    /// Find overlapping pairs among `tasks`.
    pub fn find_conflicts(
        &self,
        tasks: &[Task],
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Vec<ConflictPair> {
        let blocks = self.build_blocks(tasks, start_date, end_date);
        let conflicts = match self.config.mode {
            ConflictMode::Adjacent => adjacent_conflicts(&blocks),
            ConflictMode::SameDaySweep => sweep_conflicts(&blocks),
        };
        tracing::debug!(
            blocks = blocks.len(),
            conflicts = conflicts.len(),
            mode = ?self.config.mode,
            "conflict scan finished"
        );
        conflicts
    }
}

fn adjacent_conflicts(blocks: &[ScheduledBlock]) -> Vec<ConflictPair> {
    blocks
        .windows(2)
        .filter_map(|pair| pair[0].overlap_with_later(&pair[1]))
        .collect()
}

// Blocks are sorted by start, so each day is a contiguous run.
fn sweep_conflicts(blocks: &[ScheduledBlock]) -> Vec<ConflictPair> {
    let mut conflicts = Vec::new();
    let mut active: Vec<&ScheduledBlock> = Vec::new();

    for block in blocks {
        active.retain(|open| open.day() == block.day() && open.end > block.start);
        for open in &active {
            if let Some(pair) = open.overlap_with_later(block) {
                tracing::trace!(a = %pair.task_a.id, b = %pair.task_b.id, "overlap");
                conflicts.push(pair);
            }
        }
        active.push(block);
    }

    conflicts
}

/// Find conflicts with the default (adjacent) detector.
pub fn find_conflicts(
    tasks: &[Task],
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
) -> Vec<ConflictPair> {
    ConflictDetector::new().find_conflicts(tasks, start_date, end_date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn at(id: &str, date: &str, time: &str, minutes: i64) -> Task {
        Task::new(id, format!("Task {id}"))
            .with_date(date)
            .with_time(time)
            .with_duration(minutes)
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn overlapping_pair_reports_window() {
        let tasks = vec![
            at("1", "2025-03-10", "09:00", 60),
            at("2", "2025-03-10", "09:30", 60),
        ];
        let conflicts = find_conflicts(&tasks, None, None);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].task_a.id, "1");
        assert_eq!(conflicts[0].task_b.id, "2");
        assert_eq!(conflicts[0].overlap_start.to_string(), "2025-03-10 09:30:00");
        assert_eq!(conflicts[0].overlap_end.to_string(), "2025-03-10 10:00:00");
        assert_eq!(conflicts[0].overlap_minutes(), 30);
    }

    #[test]
    fn touching_blocks_do_not_conflict() {
        let tasks = vec![
            at("1", "2025-03-10", "09:00", 60),
            at("2", "2025-03-10", "10:00", 30),
        ];
        assert!(find_conflicts(&tasks, None, None).is_empty());
    }

    #[test]
    fn input_order_does_not_matter() {
        let tasks = vec![
            at("late", "2025-03-10", "09:30", 60),
            at("early", "2025-03-10", "09:00", 60),
        ];
        let conflicts = find_conflicts(&tasks, None, None);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].task_a.id, "early");
    }

    #[test]
    fn cross_day_span_does_not_conflict_next_day() {
        let tasks = vec![
            Task::new("night", "Night shift")
                .with_datetime("2025-03-10T22:00")
                .with_end_datetime("2025-03-11T06:00"),
            at("morning", "2025-03-11", "05:00", 30),
        ];
        assert!(find_conflicts(&tasks, None, None).is_empty());
    }

    #[test]
    fn kind_defaults_fill_missing_end() {
        let detector = ConflictDetector::new();
        let start = date("2025-03-10").and_hms_opt(9, 0, 0).unwrap();

        let event = Task::new("e", "Event");
        assert_eq!(detector.resolve_end(&event, start), start + Duration::minutes(60));

        let reminder = Task::new("r", "Reminder").with_kind(TaskKind::Reminder);
        assert_eq!(detector.resolve_end(&reminder, start), start + Duration::minutes(15));
    }

    #[test]
    fn end_datetime_beats_duration() {
        let detector = ConflictDetector::new();
        let task = Task::new("1", "x")
            .with_datetime("2025-03-10T09:00")
            .with_end_datetime("2025-03-10T09:10")
            .with_duration(120);
        let start = task.start_datetime().unwrap();
        assert_eq!(detector.resolve_end(&task, start).to_string(), "2025-03-10 09:10:00");
    }

    #[test]
    fn backwards_end_datetime_is_ignored() {
        let detector = ConflictDetector::new();
        let task = Task::new("1", "x")
            .with_datetime("2025-03-10T09:00")
            .with_end_datetime("2025-03-10T08:00")
            .with_duration(20);
        let start = task.start_datetime().unwrap();
        assert_eq!(detector.resolve_end(&task, start).to_string(), "2025-03-10 09:20:00");
    }

    #[test]
    fn extreme_duration_clamps_end() {
        let detector = ConflictDetector::new();
        let start = date("2025-03-10").and_hms_opt(9, 0, 0).unwrap();

        let task = at("huge", "2025-03-10", "09:00", 1_000_000_000_000);
        assert_eq!(detector.resolve_end(&task, start), NaiveDateTime::MAX);

        let task = at("max", "2025-03-10", "09:00", i64::MAX);
        assert_eq!(detector.resolve_end(&task, start), NaiveDateTime::MAX);
    }

    #[test]
    fn extreme_duration_still_reports_overlap() {
        let tasks = vec![
            at("huge", "2025-03-10", "09:00", 1_000_000_000_000),
            at("next", "2025-03-10", "11:00", 30),
            at("max", "2025-03-10", "12:00", i64::MAX),
        ];
        for mode in [ConflictMode::Adjacent, ConflictMode::SameDaySweep] {
            let conflicts = ConflictDetector::new()
                .with_mode(mode)
                .find_conflicts(&tasks, None, None);
            assert_eq!(conflicts[0].task_a.id, "huge");
            assert_eq!(conflicts[0].overlap_end.to_string(), "2025-03-10 11:30:00");
        }
    }

    #[test]
    fn reminder_default_is_short() {
        let tasks = vec![
            Task::new("r", "Take pills")
                .with_date("2025-03-10")
                .with_time("09:00")
                .with_kind(TaskKind::Reminder),
            at("m", "2025-03-10", "09:20", 30),
        ];
        assert!(find_conflicts(&tasks, None, None).is_empty());
    }

    #[test]
    fn tasks_without_start_are_skipped() {
        let tasks = vec![
            Task::new("anytime", "Anytime"),
            Task::new("bad", "Bad").with_datetime("someday"),
            Task::new("no-date", "No date").with_time("09:00"),
            at("ok", "2025-03-10", "09:00", 30),
        ];
        let blocks = ConflictDetector::new().build_blocks(&tasks, None, None);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].task.id, "ok");
    }

    #[test]
    fn date_filter_is_inclusive() {
        let tasks = vec![
            at("1", "2025-03-09", "09:00", 60),
            at("2", "2025-03-10", "09:00", 60),
            at("3", "2025-03-11", "09:00", 60),
            at("4", "2025-03-12", "09:00", 60),
        ];
        let blocks = ConflictDetector::new().build_blocks(
            &tasks,
            Some(date("2025-03-10")),
            Some(date("2025-03-11")),
        );
        let ids: Vec<_> = blocks.iter().map(|b| b.task.id.as_str()).collect();
        assert_eq!(ids, ["2", "3"]);
    }

    #[test]
    fn adjacent_mode_misses_non_neighbour_overlap() {
        // A spans the morning, B sits inside it, C overlaps A after B ends
        let tasks = vec![
            at("a", "2025-03-10", "09:00", 180),
            at("b", "2025-03-10", "09:30", 30),
            at("c", "2025-03-10", "10:30", 30),
        ];
        let adjacent = find_conflicts(&tasks, None, None);
        let ids: Vec<_> = adjacent
            .iter()
            .map(|c| (c.task_a.id.as_str(), c.task_b.id.as_str()))
            .collect();
        assert_eq!(ids, [("a", "b")]);

        let sweep = ConflictDetector::new()
            .with_mode(ConflictMode::SameDaySweep)
            .find_conflicts(&tasks, None, None);
        let ids: Vec<_> = sweep
            .iter()
            .map(|c| (c.task_a.id.as_str(), c.task_b.id.as_str()))
            .collect();
        assert_eq!(ids, [("a", "b"), ("a", "c")]);
    }

    #[test]
    fn sweep_respects_same_day_rule() {
        let tasks = vec![
            Task::new("late", "Late")
                .with_datetime("2025-03-10T23:30")
                .with_duration(120),
            at("early", "2025-03-11", "00:30", 30),
        ];
        let detector = ConflictDetector::new().with_mode(ConflictMode::SameDaySweep);
        assert!(detector.find_conflicts(&tasks, None, None).is_empty());
    }

    #[test]
    fn identical_starts_keep_input_order() {
        let tasks = vec![
            at("first", "2025-03-10", "09:00", 30),
            at("second", "2025-03-10", "09:00", 45),
        ];
        let conflicts = find_conflicts(&tasks, None, None);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].task_a.id, "first");
        assert_eq!(conflicts[0].overlap_end.to_string(), "2025-03-10 09:30:00");
    }

    #[test]
    fn mode_parsing() {
        assert_eq!("sweep".parse::<ConflictMode>(), Ok(ConflictMode::SameDaySweep));
        assert_eq!("Adjacent".parse::<ConflictMode>(), Ok(ConflictMode::Adjacent));
        assert!("all".parse::<ConflictMode>().is_err());
    }

    #[test]
    fn pair_serializes_camel_case() {
        let tasks = vec![
            at("1", "2025-03-10", "09:00", 60),
            at("2", "2025-03-10", "09:30", 60),
        ];
        let json = serde_json::to_value(find_conflicts(&tasks, None, None)).unwrap();
        assert_eq!(json[0]["overlapStart"], "2025-03-10T09:30:00");
        assert_eq!(json[0]["taskA"]["id"], "1");
    }
}
