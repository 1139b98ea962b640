//! Daily load classification.
//!
//! Every task gets a weight from its (resolved) duration; the weights add up
//! to the day's effective load, which maps onto a qualitative status. A
//! capacity guardrail on the raw scheduled minutes runs first so that a
//! single huge task cannot hide behind the weight cap.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::task::Task;

/// Qualitative energy status for a day.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EnergyStatus {
    SpaceAvailable,
    BalancedPacing,
    PrioritizeRest,
}

impl EnergyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnergyStatus::SpaceAvailable => "space_available",
            EnergyStatus::BalancedPacing => "balanced_pacing",
            EnergyStatus::PrioritizeRest => "prioritize_rest",
        }
    }

    /// Short human label.
    pub fn label(&self) -> &'static str {
        match self {
            EnergyStatus::SpaceAvailable => "Space available",
            EnergyStatus::BalancedPacing => "Balanced pacing",
            EnergyStatus::PrioritizeRest => "Prioritize rest",
        }
    }

    /// One-line guidance shown next to the label.
    pub fn guidance(&self) -> &'static str {
        match self {
            EnergyStatus::SpaceAvailable => "Light day. There is room to take something on.",
            EnergyStatus::BalancedPacing => "A full but manageable day. Keep a steady pace.",
            EnergyStatus::PrioritizeRest => {
                "The day is overloaded. Move or drop something and protect your breaks."
            }
        }
    }
}

impl fmt::Display for EnergyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tunables for the classifier.
///
/// The defaults are the empirically chosen production values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyConfig {
    /// Minutes of scheduled work considered sustainable in a day.
    #[serde(default = "default_sustainable_minutes")]
    pub sustainable_minutes: u32,
    /// Scheduled/sustainable ratio at or above which the day is overloaded.
    #[serde(default = "default_overload_ratio")]
    pub overload_ratio: f64,
    /// Highest effective load still reported as `space_available`.
    #[serde(default = "default_space_available_max")]
    pub space_available_max: f64,
    /// Highest effective load still reported as `balanced_pacing`.
    #[serde(default = "default_balanced_pacing_max")]
    pub balanced_pacing_max: f64,
    /// Weight of a task with no clock time.
    #[serde(default = "default_anytime_weight")]
    pub anytime_weight: f64,
    /// Duration assumed when nothing else resolves.
    #[serde(default = "default_duration_minutes")]
    pub default_duration_minutes: i64,
    /// Tasks up to this many minutes weigh `short_weight`.
    #[serde(default = "default_short_task_max")]
    pub short_task_max_minutes: i64,
    /// Tasks up to this many minutes weigh `medium_weight`; longer ones `long_weight`.
    #[serde(default = "default_medium_task_max")]
    pub medium_task_max_minutes: i64,
    #[serde(default = "default_short_weight")]
    pub short_weight: f64,
    #[serde(default = "default_medium_weight")]
    pub medium_weight: f64,
    #[serde(default = "default_long_weight")]
    pub long_weight: f64,
}

fn default_sustainable_minutes() -> u32 {
    480
}
fn default_overload_ratio() -> f64 {
    1.3
}
fn default_space_available_max() -> f64 {
    3.0
}
fn default_balanced_pacing_max() -> f64 {
    6.0
}
fn default_anytime_weight() -> f64 {
    0.5
}
fn default_duration_minutes() -> i64 {
    60
}
fn default_short_task_max() -> i64 {
    30
}
fn default_medium_task_max() -> i64 {
    90
}
fn default_short_weight() -> f64 {
    1.0
}
fn default_medium_weight() -> f64 {
    1.5
}
fn default_long_weight() -> f64 {
    2.0
}

impl Default for EnergyConfig {
    fn default() -> Self {
        Self {
            sustainable_minutes: default_sustainable_minutes(),
            overload_ratio: default_overload_ratio(),
            space_available_max: default_space_available_max(),
            balanced_pacing_max: default_balanced_pacing_max(),
            anytime_weight: default_anytime_weight(),
            default_duration_minutes: default_duration_minutes(),
            short_task_max_minutes: default_short_task_max(),
            medium_task_max_minutes: default_medium_task_max(),
            short_weight: default_short_weight(),
            medium_weight: default_medium_weight(),
            long_weight: default_long_weight(),
        }
    }
}

/// Where a task's duration came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DurationSource {
    /// No clock time; weighted as an anytime task.
    Anytime,
    /// Explicit positive `duration_minutes`.
    Explicit,
    /// Start datetime to `end_datetime`.
    EndDatetime,
    /// Start clock to end clock, wrapping past midnight.
    EndClock,
    /// Nothing resolved.
    Default,
}

/// Per-task contribution to the day's load.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskLoad {
    pub weight: f64,
    /// Resolved minutes for time-bound tasks, `None` for anytime tasks.
    pub minutes: Option<i64>,
    pub source: DurationSource,
}

/// Result of classifying one day.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnergyResult {
    pub status: EnergyStatus,
    pub effective_load: f64,
    /// Share of the load already completed. Display only.
    pub completed_load_ratio: f64,
    pub total_scheduled_minutes: i64,
    /// `total_scheduled_minutes` over the sustainable daily minutes.
    pub load_ratio: f64,
    pub task_count: usize,
}

/// Classifier for a single day's task list.
#[derive(Debug, Clone, Default)]
pub struct LoadClassifier {
    config: EnergyConfig,
}

impl LoadClassifier {
    /// Create a classifier with the default constants.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom config
    pub fn with_config(config: EnergyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EnergyConfig {
        &self.config
    }

    /// Classify tasks already filtered to one day.
    pub fn classify(&self, tasks: &[Task]) -> EnergyResult {
        let mut effective_load = 0.0;
        let mut completed_load = 0.0;
        let mut total_scheduled_minutes = 0i64;

        for task in tasks {
            let load = self.task_load(task);
            effective_load += load.weight;
            if task.completed {
                completed_load += load.weight;
            }
            if let Some(minutes) = load.minutes {
                total_scheduled_minutes = total_scheduled_minutes.saturating_add(minutes);
            }
        }

        let completed_load_ratio = if effective_load > 0.0 {
            completed_load / effective_load
        } else {
            0.0
        };
        let load_ratio = total_scheduled_minutes as f64 / self.config.sustainable_minutes.max(1) as f64;
        let status = self.status_for(effective_load, load_ratio);

        tracing::debug!(
            tasks = tasks.len(),
            effective_load,
            total_scheduled_minutes,
            load_ratio,
            status = %status,
            "classified day"
        );

        EnergyResult {
            status,
            effective_load,
            completed_load_ratio,
            total_scheduled_minutes,
            load_ratio,
            task_count: tasks.len(),
        }
    }

    /// Map the two load measures onto a status. The guardrail wins.
    pub fn status_for(&self, effective_load: f64, load_ratio: f64) -> EnergyStatus {
        if load_ratio >= self.config.overload_ratio {
            EnergyStatus::PrioritizeRest
        } else if effective_load <= self.config.space_available_max {
            EnergyStatus::SpaceAvailable
        } else if effective_load <= self.config.balanced_pacing_max {
            EnergyStatus::BalancedPacing
        } else {
            EnergyStatus::PrioritizeRest
        }
    }

    /// Weight and resolved minutes for one task.
    pub fn task_load(&self, task: &Task) -> TaskLoad {
        if task.scheduled_time().is_none() {
            if task.time.is_some() {
                tracing::debug!(task = %task.id, time = ?task.time, "unreadable time, counting as anytime");
            }
            return TaskLoad {
                weight: self.config.anytime_weight,
                minutes: None,
                source: DurationSource::Anytime,
            };
        }

        let (minutes, source) = self.resolve_duration(task);
        TaskLoad {
            weight: self.weight_for_minutes(minutes),
            minutes: Some(minutes),
            source,
        }
    }

    /// Resolve the duration of a time-bound task.
    ///
    /// Order: explicit minutes, start-to-`end_datetime`, clock-to-clock with
    /// midnight wrap, then the configured default.
    pub fn resolve_duration(&self, task: &Task) -> (i64, DurationSource) {
        if let Some(minutes) = task.positive_duration() {
            return (minutes, DurationSource::Explicit);
        }

        if let (Some(start), Some(end)) = (task.start_datetime(), task.end_datetime()) {
            let minutes = (end - start).num_minutes();
            if minutes > 0 {
                return (minutes, DurationSource::EndDatetime);
            }
        }

        if let (Some(start), Some(end)) = (task.scheduled_time(), task.end_clock_time()) {
            let mut minutes = (end - start).num_minutes();
            if minutes < 0 {
                minutes += 24 * 60;
            }
            if minutes > 0 {
                return (minutes, DurationSource::EndClock);
            }
        }

        tracing::debug!(task = %task.id, "no duration resolved, using default");
        (self.config.default_duration_minutes, DurationSource::Default)
    }

    /// Weight bucket for a duration.
    pub fn weight_for_minutes(&self, minutes: i64) -> f64 {
        if minutes <= self.config.short_task_max_minutes {
            self.config.short_weight
        } else if minutes <= self.config.medium_task_max_minutes {
            self.config.medium_weight
        } else {
            self.config.long_weight
        }
    }
}

/// Classify a day's tasks with the default constants.
pub fn calculate_energy(tasks: &[Task]) -> EnergyResult {
    LoadClassifier::new().classify(tasks)
}
