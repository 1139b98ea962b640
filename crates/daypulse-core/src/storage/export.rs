//! Task retrieval seam and a JSON-export backed implementation.
//!
//! The real task store lives outside this crate. [`TaskSource`] is the
//! shape the engine expects from it; [`TaskExport`] serves the same queries
//! from a JSON dump so the CLI and tests can run without a database.

use chrono::NaiveDate;
use std::path::Path;

use crate::error::{Result, ValidationError};
use crate::task::Task;

/// Read-side of the task store.
pub trait TaskSource {
    /// Tasks planned for `date`.
    fn tasks_for_day(&self, date: NaiveDate) -> Result<Vec<Task>>;

    /// Tasks planned between `start` and `end`, inclusive.
    fn tasks_in_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Task>>;
}

/// Reject ranges whose start is after their end.
pub fn check_range(start: NaiveDate, end: NaiveDate) -> Result<(), ValidationError> {
    if start > end {
        return Err(ValidationError::InvalidDateRange { start, end });
    }
    Ok(())
}

/// In-memory task list loaded from a JSON export.
///
/// Accepts either a bare array of tasks or an object with a `tasks` array.
#[derive(Debug, Clone, Default)]
pub struct TaskExport {
    tasks: Vec<Task>,
}

impl TaskExport {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    /// Parse an export.
    ///
    /// # Errors
    ///
    /// Fails when the text is not JSON, or when the task list itself is
    /// missing, `null`, or not an array. Individual entries that cannot be
    /// read as tasks are skipped with a warning.
    pub fn from_json(text: &str) -> Result<Self> {
        let root: serde_json::Value = serde_json::from_str(text)?;
        let entries = match root {
            serde_json::Value::Array(items) => items,
            serde_json::Value::Object(mut obj) => match obj.remove("tasks") {
                Some(serde_json::Value::Array(items)) => items,
                None | Some(serde_json::Value::Null) => {
                    return Err(ValidationError::MissingTaskList(
                        "export has no `tasks` list".into(),
                    )
                    .into())
                }
                Some(other) => {
                    return Err(ValidationError::InvalidValue {
                        field: "tasks".into(),
                        message: format!("expected a list, got {}", json_type(&other)),
                    }
                    .into())
                }
            },
            serde_json::Value::Null => {
                return Err(ValidationError::MissingTaskList("export is null".into()).into())
            }
            other => {
                return Err(ValidationError::InvalidValue {
                    field: "tasks".into(),
                    message: format!("expected a list or object, got {}", json_type(&other)),
                }
                .into())
            }
        };

        let mut tasks = Vec::with_capacity(entries.len());
        for (index, entry) in entries.into_iter().enumerate() {
            match serde_json::from_value::<Task>(entry) {
                Ok(task) => tasks.push(task),
                Err(e) => tracing::warn!(index, error = %e, "skipping unreadable task entry"),
            }
        }
        Ok(Self { tasks })
    }

    /// Read and parse an export file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn into_tasks(self) -> Vec<Task> {
        self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl TaskSource for TaskExport {
    fn tasks_for_day(&self, date: NaiveDate) -> Result<Vec<Task>> {
        Ok(self
            .tasks
            .iter()
            .filter(|t| t.day() == Some(date))
            .cloned()
            .collect())
    }

    fn tasks_in_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Task>> {
        check_range(start, end)?;
        Ok(self
            .tasks
            .iter()
            .filter(|t| t.day().is_some_and(|d| d >= start && d <= end))
            .cloned()
            .collect())
    }
}

fn json_type(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "a list",
        serde_json::Value::Object(_) => "an object",
    }
}
