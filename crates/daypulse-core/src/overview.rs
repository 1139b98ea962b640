//! Day and week views built on the classifier and the conflict detector.
//!
//! These only group tasks by date and delegate; all policy lives in
//! [`crate::energy`] and [`crate::scheduler`].

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::energy::{EnergyResult, LoadClassifier};
use crate::scheduler::{ConflictDetector, ConflictPair};
use crate::storage::Config;
use crate::task::Task;

/// Everything the "today" screen needs for one date.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayReport {
    pub date: NaiveDate,
    pub energy: EnergyResult,
    pub conflicts: Vec<ConflictPair>,
    pub anytime_count: usize,
    pub completed_count: usize,
}

/// One row of the week view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayLoad {
    pub date: NaiveDate,
    pub energy: EnergyResult,
    pub conflict_count: usize,
}

/// Tasks planned for `date`.
pub fn tasks_on(tasks: &[Task], date: NaiveDate) -> Vec<Task> {
    tasks
        .iter()
        .filter(|t| t.day() == Some(date))
        .cloned()
        .collect()
}

/// Planner bundling a classifier and a detector with shared configuration.
#[derive(Debug, Clone, Default)]
pub struct Planner {
    classifier: LoadClassifier,
    detector: ConflictDetector,
}

impl Planner {
    pub fn new(classifier: LoadClassifier, detector: ConflictDetector) -> Self {
        Self {
            classifier,
            detector,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            classifier: LoadClassifier::with_config(config.energy.clone()),
            detector: ConflictDetector::with_config(config.conflicts.clone()),
        }
    }

    pub fn classifier(&self) -> &LoadClassifier {
        &self.classifier
    }

    pub fn detector(&self) -> &ConflictDetector {
        &self.detector
    }

    /// Energy and conflicts for one date. `tasks` may span several days.
    pub fn day_report(&self, tasks: &[Task], date: NaiveDate) -> DayReport {
        let day_tasks = tasks_on(tasks, date);
        let energy = self.classifier.classify(&day_tasks);
        let conflicts = self
            .detector
            .find_conflicts(&day_tasks, Some(date), Some(date));

        DayReport {
            date,
            energy,
            conflicts,
            anytime_count: day_tasks
                .iter()
                .filter(|t| t.scheduled_time().is_none())
                .count(),
            completed_count: day_tasks.iter().filter(|t| t.completed).count(),
        }
    }

    /// Energy per day for `days` consecutive days starting at `start`.
    pub fn week_overview(&self, tasks: &[Task], start: NaiveDate, days: u32) -> Vec<DayLoad> {
        (0..days)
            .filter_map(|offset| start.checked_add_signed(Duration::days(offset as i64)))
            .map(|date| {
                let day_tasks = tasks_on(tasks, date);
                DayLoad {
                    date,
                    energy: self.classifier.classify(&day_tasks),
                    conflict_count: self
                        .detector
                        .find_conflicts(&day_tasks, Some(date), Some(date))
                        .len(),
                }
            })
            .collect()
    }
}

/// Day report with default settings.
pub fn day_report(tasks: &[Task], date: NaiveDate) -> DayReport {
    Planner::default().day_report(tasks, date)
}

/// Week overview with default settings.
pub fn week_overview(tasks: &[Task], start: NaiveDate, days: u32) -> Vec<DayLoad> {
    Planner::default().week_overview(tasks, start, days)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::energy::EnergyStatus;
    use crate::scheduler::ConflictMode;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn sample() -> Vec<Task> {
        vec![
            Task::new("1", "Standup")
                .with_date("2025-03-10")
                .with_time("09:00")
                .with_duration(60),
            Task::new("2", "Review")
                .with_date("2025-03-10")
                .with_time("09:30")
                .with_duration(60)
                .completed(),
            Task::new("3", "Groceries").with_date("2025-03-10"),
            Task::new("4", "Offsite")
                .with_date("2025-03-12")
                .with_time("08:00")
                .with_duration(720),
        ]
    }

    #[test]
    fn day_report_bundles_energy_and_conflicts() {
        let report = day_report(&sample(), date("2025-03-10"));
        assert_eq!(report.energy.effective_load, 3.5);
        assert_eq!(report.energy.status, EnergyStatus::BalancedPacing);
        assert_eq!(report.conflicts.len(), 1);
        assert_eq!(report.anytime_count, 1);
        assert_eq!(report.completed_count, 1);
    }

    #[test]
    fn empty_day_report() {
        let report = day_report(&sample(), date("2025-03-11"));
        assert_eq!(report.energy.status, EnergyStatus::SpaceAvailable);
        assert_eq!(report.energy.task_count, 0);
        assert!(report.conflicts.is_empty());
    }

    #[test]
    fn week_overview_covers_each_day() {
        let week = week_overview(&sample(), date("2025-03-10"), 7);
        assert_eq!(week.len(), 7);
        assert_eq!(week[0].date, date("2025-03-10"));
        assert_eq!(week[0].conflict_count, 1);
        assert_eq!(week[1].energy.status, EnergyStatus::SpaceAvailable);
        assert_eq!(week[2].energy.status, EnergyStatus::PrioritizeRest);
        assert_eq!(week[6].date, date("2025-03-16"));
    }

    #[test]
    fn datetime_decides_the_day_for_energy_and_conflicts() {
        let tasks = vec![
            Task::new("moved", "Moved meeting")
                .with_date("2025-03-10")
                .with_datetime("2025-03-11T09:00")
                .with_duration(60),
            Task::new("other", "Review")
                .with_date("2025-03-11")
                .with_time("09:30")
                .with_duration(60),
        ];

        let monday = day_report(&tasks, date("2025-03-10"));
        assert_eq!(monday.energy.task_count, 0);
        assert!(monday.conflicts.is_empty());

        let tuesday = day_report(&tasks, date("2025-03-11"));
        assert_eq!(tuesday.energy.task_count, 2);
        assert_eq!(tuesday.conflicts.len(), 1);
        assert_eq!(tuesday.conflicts[0].task_a.id, "moved");
    }

    #[test]
    fn zero_days_is_empty() {
        assert!(week_overview(&sample(), date("2025-03-10"), 0).is_empty());
    }

    #[test]
    fn planner_uses_config() {
        let mut config = Config::default();
        config.conflicts.mode = ConflictMode::SameDaySweep;
        config.energy.balanced_pacing_max = 3.0;
        let planner = Planner::from_config(&config);
        assert_eq!(planner.detector().config().mode, ConflictMode::SameDaySweep);

        let report = planner.day_report(&sample(), date("2025-03-10"));
        assert_eq!(report.energy.status, EnergyStatus::PrioritizeRest);
    }
}
