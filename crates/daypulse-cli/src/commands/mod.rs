//! Subcommands and the helpers they share.

pub mod config;
pub mod conflicts;
pub mod energy;
pub mod today;
pub mod week;

use chrono::{Local, NaiveDate};
use serde::Serialize;
use std::path::Path;

use daypulse_core::task::parse::parse_date;
use daypulse_core::{Config, Task, TaskExport};

pub type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Config from `--config` if given, else the default location.
///
/// A `--config` path that does not exist yet reads as the defaults.
pub fn load_config(path: Option<&Path>) -> Result<Config, Box<dyn std::error::Error>> {
    match path {
        Some(path) if !path.exists() => Ok(Config::default()),
        Some(path) => Ok(Config::load_from(path)?),
        None => Ok(Config::load_or_default()),
    }
}

pub fn load_tasks(path: &Path) -> Result<Vec<Task>, Box<dyn std::error::Error>> {
    let export = TaskExport::from_path(path)?;
    tracing::debug!(path = %path.display(), tasks = export.len(), "loaded task export");
    Ok(export.into_tasks())
}

/// Parse a `YYYY-MM-DD` argument.
pub fn parse_date_arg(raw: &str) -> Result<NaiveDate, Box<dyn std::error::Error>> {
    parse_date(raw).ok_or_else(|| format!("invalid date '{raw}', expected YYYY-MM-DD").into())
}

/// Parse an optional date argument, defaulting to the local date.
pub fn date_or_today(raw: Option<&str>) -> Result<NaiveDate, Box<dyn std::error::Error>> {
    match raw {
        Some(raw) => parse_date_arg(raw),
        None => Ok(Local::now().date_naive()),
    }
}

pub fn print_json<T: Serialize>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
