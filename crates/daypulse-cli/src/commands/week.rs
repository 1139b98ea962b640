//! Week command: one status line per day.

use clap::Args;
use std::path::{Path, PathBuf};

use daypulse_core::Planner;

use super::{date_or_today, load_config, load_tasks, print_json, CmdResult};

#[derive(Args)]
pub struct WeekArgs {
    /// JSON task export
    #[arg(long)]
    pub file: PathBuf,
    /// First day (YYYY-MM-DD, defaults to today)
    #[arg(long)]
    pub start: Option<String>,
    /// Number of days to show (1-366)
    #[arg(long, default_value_t = 7, value_parser = clap::value_parser!(u32).range(1..=366))]
    pub days: u32,
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: WeekArgs, config_path: Option<&Path>) -> CmdResult {
    let config = load_config(config_path)?;
    let start = date_or_today(args.start.as_deref())?;
    let tasks = load_tasks(&args.file)?;

    let week = Planner::from_config(&config).week_overview(&tasks, start, args.days);

    if args.json {
        return print_json(&week);
    }

    for day in &week {
        let conflicts = if day.conflict_count > 0 {
            format!("  ({} conflict(s))", day.conflict_count)
        } else {
            String::new()
        };
        println!(
            "{}  {:<16} load {:>4.1}  {:>4} min{}",
            day.date.format("%a %m-%d"),
            day.energy.status.label(),
            day.energy.effective_load,
            day.energy.total_scheduled_minutes,
            conflicts
        );
    }
    Ok(())
}
