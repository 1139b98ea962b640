//! Conflicts command for listing overlapping scheduled tasks.

use clap::Args;
use std::path::{Path, PathBuf};

use daypulse_core::storage::check_range;
use daypulse_core::{ConflictDetector, ConflictMode};

use super::{load_config, load_tasks, parse_date_arg, print_json, CmdResult};

#[derive(Args)]
pub struct ConflictsArgs {
    /// JSON task export
    #[arg(long)]
    pub file: PathBuf,
    /// First day to check (YYYY-MM-DD, inclusive)
    #[arg(long)]
    pub start: Option<String>,
    /// Last day to check (YYYY-MM-DD, inclusive)
    #[arg(long)]
    pub end: Option<String>,
    /// Pair selection: adjacent or sweep (overrides config)
    #[arg(long)]
    pub mode: Option<ConflictMode>,
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: ConflictsArgs, config_path: Option<&Path>) -> CmdResult {
    let config = load_config(config_path)?;
    let start = args.start.as_deref().map(parse_date_arg).transpose()?;
    let end = args.end.as_deref().map(parse_date_arg).transpose()?;
    if let (Some(start), Some(end)) = (start, end) {
        check_range(start, end)?;
    }

    let mut detector = ConflictDetector::with_config(config.conflicts);
    if let Some(mode) = args.mode {
        detector = detector.with_mode(mode);
    }

    let tasks = load_tasks(&args.file)?;
    let conflicts = detector.find_conflicts(&tasks, start, end);

    if args.json {
        return print_json(&conflicts);
    }

    if conflicts.is_empty() {
        println!("No conflicts.");
        return Ok(());
    }

    println!("{} conflict(s):", conflicts.len());
    for c in &conflicts {
        println!(
            "  {} {}-{}  {} <> {}",
            c.overlap_start.format("%Y-%m-%d"),
            c.overlap_start.format("%H:%M"),
            c.overlap_end.format("%H:%M"),
            c.task_a.title,
            c.task_b.title
        );
    }
    Ok(())
}
