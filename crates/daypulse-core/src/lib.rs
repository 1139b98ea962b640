//! # daypulse Core Library
//!
//! This library provides the daily load and scheduling-conflict engine
//! behind the today/week views of a personal task planner. Everything here
//! is a pure computation over task snapshots handed in by the caller; the
//! task store, the clock and presentation stay outside.
//!
//! ## Architecture
//!
//! - **Energy**: weighted load classification with a capacity guardrail
//! - **Scheduler**: block resolution and same-day conflict detection
//! - **Overview**: day and week views composed from the two
//! - **Storage**: TOML configuration and a JSON task-export source
//!
//! ## Key Components
//!
//! - [`LoadClassifier`] / [`calculate_energy`]
//! - [`ConflictDetector`] / [`find_conflicts`]
//! - [`Planner`]
//! - [`Config`]

pub mod energy;
pub mod error;
pub mod overview;
pub mod scheduler;
pub mod storage;
pub mod task;

pub use energy::{calculate_energy, EnergyConfig, EnergyResult, EnergyStatus, LoadClassifier};
pub use error::{ConfigError, CoreError, ValidationError};
pub use overview::{day_report, week_overview, DayLoad, DayReport, Planner};
pub use scheduler::{
    find_conflicts, ConflictConfig, ConflictDetector, ConflictMode, ConflictPair, ScheduledBlock,
};
pub use storage::{Config, TaskExport, TaskSource};
pub use task::{Task, TaskKind, TaskRef};
