//! Energy command for classifying a day's load.

use clap::Args;
use serde::Serialize;
use std::path::{Path, PathBuf};

use daypulse_core::energy::{EnergyResult, TaskLoad};
use daypulse_core::overview::tasks_on;
use daypulse_core::LoadClassifier;

use super::{date_or_today, load_config, load_tasks, print_json, CmdResult};

#[derive(Args)]
pub struct EnergyArgs {
    /// JSON task export
    #[arg(long)]
    pub file: PathBuf,
    /// Day to classify (YYYY-MM-DD, defaults to today)
    #[arg(long)]
    pub date: Option<String>,
    /// List each task's weight and resolved duration
    #[arg(long)]
    pub explain: bool,
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExplainedTask<'a> {
    id: &'a str,
    title: &'a str,
    #[serde(flatten)]
    load: TaskLoad,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EnergyOutput<'a> {
    date: chrono::NaiveDate,
    #[serde(flatten)]
    result: &'a EnergyResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    tasks: Option<Vec<ExplainedTask<'a>>>,
}

pub fn run(args: EnergyArgs, config_path: Option<&Path>) -> CmdResult {
    let config = load_config(config_path)?;
    let date = date_or_today(args.date.as_deref())?;
    let tasks = tasks_on(&load_tasks(&args.file)?, date);

    let classifier = LoadClassifier::with_config(config.energy);
    let result = classifier.classify(&tasks);
    let explained: Option<Vec<ExplainedTask>> = args.explain.then(|| {
        tasks
            .iter()
            .map(|t| ExplainedTask {
                id: &t.id,
                title: &t.title,
                load: classifier.task_load(t),
            })
            .collect()
    });

    if args.json {
        return print_json(&EnergyOutput {
            date,
            result: &result,
            tasks: explained,
        });
    }

    println!("{}  {}", date, result.status.label());
    println!("  Effective load:   {:.1}", result.effective_load);
    println!(
        "  Scheduled:        {} min ({:.0}% of {} min)",
        result.total_scheduled_minutes,
        result.load_ratio * 100.0,
        classifier.config().sustainable_minutes
    );
    println!("  Completed:        {:.0}%", result.completed_load_ratio * 100.0);
    println!("  {}", result.status.guidance());

    if let Some(explained) = explained {
        println!();
        for task in explained {
            let minutes = task
                .load
                .minutes
                .map(|m| format!("{m} min"))
                .unwrap_or_else(|| "anytime".to_string());
            println!(
                "  {:>4.1}  {:<10} {}",
                task.load.weight, minutes, task.title
            );
        }
    }

    Ok(())
}
