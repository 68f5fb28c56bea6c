use std::cell::RefCell;
use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, TimeZone, Utc};
use feruca::Collator;

use crate::models::{Status, Task};

/// Named predicate selected by the filter buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Filter {
    #[default]
    All,
    DueToday,
    Overdue,
    Completed,
    InProgress,
}

impl Filter {
    /// Filters in the order the dashboard shows them.
    pub const ALL: [Filter; 5] = [
        Filter::All,
        Filter::DueToday,
        Filter::Overdue,
        Filter::InProgress,
        Filter::Completed,
    ];

    /// Resolves a filter key. Unknown keys show everything.
    pub fn parse(key: &str) -> Filter {
        match key.trim() {
            "due-today" => Filter::DueToday,
            "overdue" => Filter::Overdue,
            "completed" => Filter::Completed,
            "in-progress" => Filter::InProgress,
            _ => Filter::All,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Filter::All => "all",
            Filter::DueToday => "due-today",
            Filter::Overdue => "overdue",
            Filter::Completed => "completed",
            Filter::InProgress => "in-progress",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Filter::All => "All Tasks",
            Filter::DueToday => "Due Today",
            Filter::Overdue => "Overdue",
            Filter::Completed => "Completed",
            Filter::InProgress => "In Progress",
        }
    }

    /// Next filter in dashboard order, wrapping around.
    pub fn cycle(self) -> Filter {
        let pos = Filter::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Filter::ALL[(pos + 1) % Filter::ALL.len()]
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Ordering applied to the filtered tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortKey {
    #[default]
    DueDate,
    Priority,
    Title,
    Status,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [SortKey::DueDate, SortKey::Priority, SortKey::Title, SortKey::Status];

    /// Resolves a sort key. Unknown keys (including `created`) sort by due date.
    pub fn parse(key: &str) -> SortKey {
        match key.trim() {
            "priority" => SortKey::Priority,
            "title" => SortKey::Title,
            "status" => SortKey::Status,
            _ => SortKey::DueDate,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            SortKey::DueDate => "dueDate",
            SortKey::Priority => "priority",
            SortKey::Title => "title",
            SortKey::Status => "status",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortKey::DueDate => "Due Date",
            SortKey::Priority => "Priority",
            SortKey::Title => "Title",
            SortKey::Status => "Status",
        }
    }

    pub fn cycle(self) -> SortKey {
        let pos = SortKey::ALL.iter().position(|s| *s == self).unwrap_or(0);
        SortKey::ALL[(pos + 1) % SortKey::ALL.len()]
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Search text, active filter and sort key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewParams {
    pub query: String,
    pub filter: Filter,
    pub sort: SortKey,
}

impl ViewParams {
    pub fn new(query: impl Into<String>, filter: Filter, sort: SortKey) -> Self {
        ViewParams {
            query: query.into(),
            filter,
            sort,
        }
    }
}

/// Badge counts over the whole collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskCounts {
    pub all: usize,
    pub due_today: usize,
    pub overdue: usize,
    pub completed: usize,
    pub in_progress: usize,
}

impl TaskCounts {
    /// The badge shown next to a filter button.
    pub fn for_filter(&self, filter: Filter) -> usize {
        match filter {
            Filter::All => self.all,
            Filter::DueToday => self.due_today,
            Filter::Overdue => self.overdue,
            Filter::Completed => self.completed,
            Filter::InProgress => self.in_progress,
        }
    }
}

/// True when the task's due date falls on `now`'s calendar date, in `now`'s zone.
pub fn is_due_today<Tz: TimeZone>(task: &Task, now: &DateTime<Tz>) -> bool {
    task.due_date
        .is_some_and(|due| due.with_timezone(&now.timezone()).date_naive() == now.date_naive())
}

/// True when the task is past due and still open.
///
/// A completed task is never overdue.
pub fn is_overdue<Tz: TimeZone>(task: &Task, now: &DateTime<Tz>) -> bool {
    !task.is_completed() && task.due_date.is_some_and(|due| due < now.with_timezone(&Utc))
}

fn matches_search(task: &Task, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    task.title.to_lowercase().contains(needle)
        || task
            .description
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains(needle))
}

/// Decides whether a task belongs in the view.
///
/// The search query is a case-insensitive substring test on the title and the
/// description; it is ANDed with the filter predicate.
pub fn matches<Tz: TimeZone>(task: &Task, now: &DateTime<Tz>, query: &str, filter: Filter) -> bool {
    if !matches_search(task, &query.to_lowercase()) {
        return false;
    }
    match filter {
        Filter::All => true,
        Filter::DueToday => is_due_today(task, now),
        Filter::Overdue => is_overdue(task, now),
        Filter::Completed => task.is_completed(),
        Filter::InProgress => task.status == Status::InProgress,
    }
}

thread_local! {
    static COLLATOR: RefCell<Collator> = RefCell::new(Collator::default());
}

/// Unicode collation (CLDR root): accents and case only break ties,
/// lowercase sorts before uppercase.
fn compare_titles(a: &str, b: &str) -> Ordering {
    COLLATOR.with(|c| c.borrow_mut().collate(a, b))
}

/// Orders two tasks by the given key. Equal tasks compare as `Equal`, so the
/// caller must use a stable sort to keep input order for ties.
pub fn compare(a: &Task, b: &Task, sort: SortKey) -> Ordering {
    match sort {
        SortKey::Priority => b.priority.rank().cmp(&a.priority.rank()),
        SortKey::Title => compare_titles(&a.title, &b.title),
        SortKey::Status => a.status.as_str().cmp(b.status.as_str()),
        SortKey::DueDate => match (&a.due_date, &b.due_date) {
            (Some(x), Some(y)) => x.cmp(y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
    }
}

/// Filters and sorts the collection for display.
///
/// `now` is used as-is for every task. The input is never modified.
pub fn compose_view<'a, Tz: TimeZone>(
    tasks: &'a [Task],
    now: &DateTime<Tz>,
    params: &ViewParams,
) -> Vec<&'a Task> {
    let mut view: Vec<&Task> = tasks
        .iter()
        .filter(|t| matches(t, now, &params.query, params.filter))
        .collect();
    // sort_by is stable
    view.sort_by(|a, b| compare(a, b, params.sort));
    view
}

/// Counts every category over the full collection, ignoring view parameters.
pub fn aggregate_counts<Tz: TimeZone>(tasks: &[Task], now: &DateTime<Tz>) -> TaskCounts {
    tasks.iter().fold(
        TaskCounts {
            all: tasks.len(),
            ..TaskCounts::default()
        },
        |mut counts, t| {
            if is_due_today(t, now) {
                counts.due_today += 1;
            }
            if is_overdue(t, now) {
                counts.overdue += 1;
            }
            if t.is_completed() {
                counts.completed += 1;
            }
            if t.status == Status::InProgress {
                counts.in_progress += 1;
            }
            counts
        },
    )
}
