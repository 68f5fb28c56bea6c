use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local, NaiveDate, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Opaque task identifier, unique within a collection.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct TaskId(pub u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TaskId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(TaskId)
    }
}

/// How urgent a task is.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Severity rank used when sorting: high(3) > medium(2) > low(1).
    pub fn rank(self) -> u8 {
        match self {
            Priority::Low => 1,
            Priority::Medium => 2,
            Priority::High => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    /// Next priority in the low -> medium -> high -> low cycle.
    pub fn cycle(self) -> Priority {
        match self {
            Priority::Low => Priority::Medium,
            Priority::Medium => Priority::High,
            Priority::High => Priority::Low,
        }
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(format!("unknown priority '{}' (expected low, medium or high)", other)),
        }
    }
}

/// Workflow status. Completion is derived from this field alone.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Status {
    #[default]
    #[serde(rename = "todo")]
    Todo,
    #[serde(rename = "in-progress")]
    InProgress,
    #[serde(rename = "completed")]
    Completed,
}

impl Status {
    /// Wire label. Sorting by status compares these labels lexically.
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Todo => "todo",
            Status::InProgress => "in-progress",
            Status::Completed => "completed",
        }
    }

    pub fn cycle(self) -> Status {
        match self {
            Status::Todo => Status::InProgress,
            Status::InProgress => Status::Completed,
            Status::Completed => Status::Todo,
        }
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "todo" => Ok(Status::Todo),
            "in-progress" | "in_progress" | "inprogress" => Ok(Status::InProgress),
            "completed" | "done" => Ok(Status::Completed),
            other => Err(format!(
                "unknown status '{}' (expected todo, in-progress or completed)",
                other
            )),
        }
    }
}

/// Represents a single task on the dashboard.
///
/// Serialized through [`TaskRecord`], which also carries the derived
/// `completed` flag.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(try_from = "TaskRecord", into = "TaskRecord")]
pub struct Task {
    /// Unique identifier, never changed after creation.
    pub id: TaskId,
    /// Short title shown in listings.
    pub title: String,
    /// Optional longer description, also searched.
    pub description: Option<String>,
    pub priority: Priority,
    /// Due instant. Stored in UTC; calendar dates are taken in the viewer's zone.
    pub due_date: Option<DateTime<Utc>>,
    pub status: Status,
    /// Collaborator email addresses, in the order they were added.
    pub shared_with: Vec<String>,
}

impl Task {
    pub fn is_completed(&self) -> bool {
        self.status == Status::Completed
    }

    /// Builds a task from a draft, keeping the given identifier.
    pub fn from_draft(id: TaskId, draft: TaskDraft) -> Task {
        Task {
            id,
            title: draft.title,
            description: draft.description,
            priority: draft.priority,
            due_date: draft.due_date,
            status: draft.status,
            shared_with: draft.shared_with,
        }
    }

    /// The editable fields of this task, for pre-filling an edit.
    pub fn to_draft(&self) -> TaskDraft {
        TaskDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            priority: self.priority,
            status: self.status,
            due_date: self.due_date,
            shared_with: self.shared_with.clone(),
        }
    }
}

/// Every task field except the identifier.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskDraft {
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub status: Status,
    pub due_date: Option<DateTime<Utc>>,
    pub shared_with: Vec<String>,
}

/// Draft rejected before it reaches the board.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DraftError {
    #[error("task title must not be empty")]
    EmptyTitle,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>) -> Self {
        TaskDraft {
            title: title.into(),
            ..TaskDraft::default()
        }
    }

    /// Trims the title, drops a blank description and checks the title is present.
    pub fn validate(mut self) -> Result<TaskDraft, DraftError> {
        self.title = self.title.trim().to_string();
        if self.title.is_empty() {
            return Err(DraftError::EmptyTitle);
        }
        self.description = self
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        Ok(self)
    }
}

/// Splits a comma-separated collaborator field into trimmed, non-blank entries.
pub fn split_share_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Parses a due date from its exchange form.
///
/// Accepts RFC 3339 timestamps and bare `YYYY-MM-DD` dates, which mean
/// midnight local time. Anything else yields `None`.
pub fn parse_due_date(raw: &str) -> Option<DateTime<Utc>> {
    parse_due_date_in(raw, &Local)
}

/// Like [`parse_due_date`], with bare dates taken as midnight in `tz`.
pub fn parse_due_date_in<Tz: TimeZone>(raw: &str, tz: &Tz) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    let midnight = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?.and_hms_opt(0, 0, 0)?;
    // earliest() picks the first of a repeated midnight
    tz.from_local_datetime(&midnight)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

pub fn format_due_date(due: &DateTime<Utc>) -> String {
    due.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// On-disk shape of a task.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    pub id: TaskId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub completed: bool,
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    pub status: Status,
    #[serde(default)]
    pub shared_with: Vec<String>,
}

/// A stored record that cannot become a [`Task`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("task {id}: completed={completed} disagrees with status '{status}'")]
    CompletionMismatch {
        id: TaskId,
        completed: bool,
        status: &'static str,
    },
}

impl TryFrom<TaskRecord> for Task {
    type Error = RecordError;

    fn try_from(record: TaskRecord) -> Result<Self, Self::Error> {
        if record.completed != (record.status == Status::Completed) {
            return Err(RecordError::CompletionMismatch {
                id: record.id,
                completed: record.completed,
                status: record.status.as_str(),
            });
        }
        let due_date = record.due_date.as_deref().and_then(|raw| {
            let parsed = parse_due_date(raw);
            if parsed.is_none() {
                warn!(task = %record.id, due = raw, "ignoring unparseable due date");
            }
            parsed
        });
        Ok(Task {
            id: record.id,
            title: record.title,
            description: record.description,
            priority: record.priority,
            due_date,
            status: record.status,
            shared_with: record.shared_with,
        })
    }
}

impl From<Task> for TaskRecord {
    fn from(task: Task) -> Self {
        TaskRecord {
            id: task.id,
            completed: task.is_completed(),
            title: task.title,
            description: task.description,
            priority: task.priority,
            due_date: task.due_date.as_ref().map(format_due_date),
            status: task.status,
            shared_with: task.shared_with,
        }
    }
}
