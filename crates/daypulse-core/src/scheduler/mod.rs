//! Scheduling checks over task snapshots.
//!
//! - Resolves each scheduled task into a `[start, end)` block
//! - Detects overlapping blocks on the same calendar day

mod conflict;

pub use conflict::{
    find_conflicts, ConflictConfig, ConflictDetector, ConflictMode, ConflictPair, ScheduledBlock,
};
