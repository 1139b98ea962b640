//! Today command: the day's status plus its conflicts.

use clap::Args;
use std::path::{Path, PathBuf};

use daypulse_core::Planner;

use super::{date_or_today, load_config, load_tasks, print_json, CmdResult};

#[derive(Args)]
pub struct TodayArgs {
    /// JSON task export
    #[arg(long)]
    pub file: PathBuf,
    /// Day to show (YYYY-MM-DD, defaults to today)
    #[arg(long)]
    pub date: Option<String>,
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: TodayArgs, config_path: Option<&Path>) -> CmdResult {
    let config = load_config(config_path)?;
    let date = date_or_today(args.date.as_deref())?;
    let tasks = load_tasks(&args.file)?;

    let report = Planner::from_config(&config).day_report(&tasks, date);

    if args.json {
        return print_json(&report);
    }

    println!("{}  {}", report.date.format("%A %Y-%m-%d"), report.energy.status.label());
    println!("{}", "-".repeat(40));
    println!(
        "  {} task(s), {} anytime, {} done",
        report.energy.task_count, report.anytime_count, report.completed_count
    );
    println!(
        "  Load {:.1}, {} min scheduled",
        report.energy.effective_load, report.energy.total_scheduled_minutes
    );
    println!("  {}", report.energy.status.guidance());

    if !report.conflicts.is_empty() {
        println!("\n  Conflicts:");
        for c in &report.conflicts {
            println!(
                "    {}-{}  {} <> {}",
                c.overlap_start.format("%H:%M"),
                c.overlap_end.format("%H:%M"),
                c.task_a.title,
                c.task_b.title
            );
        }
    }
    Ok(())
}
