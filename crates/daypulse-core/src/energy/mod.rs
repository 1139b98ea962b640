//! Daily energy (load) classification.
//!
//! This module turns one day's task list into a qualitative status that the
//! today/week views show next to the schedule.

mod load;

pub use load::{
    calculate_energy, DurationSource, EnergyConfig, EnergyResult, EnergyStatus, LoadClassifier,
    TaskLoad,
};
