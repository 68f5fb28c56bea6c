#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use taskdash::models::{Priority, Status, Task, TaskId};

/// Fixed "now" used across tests: 2024-06-15 12:00 UTC.
pub fn noon() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
}

pub fn task(id: u64, title: &str) -> Task {
    Task {
        id: TaskId(id),
        title: title.into(),
        description: None,
        priority: Priority::Medium,
        due_date: None,
        status: Status::Todo,
        shared_with: Vec::new(),
    }
}

pub fn due_in(mut t: Task, offset: Duration) -> Task {
    t.due_date = Some(noon() + offset);
    t
}

pub fn with_status(mut t: Task, status: Status) -> Task {
    t.status = status;
    t
}

pub fn with_priority(mut t: Task, priority: Priority) -> Task {
    t.priority = priority;
    t
}

pub fn ids(tasks: &[&Task]) -> Vec<u64> {
    tasks.iter().map(|t| t.id.0).collect()
}
