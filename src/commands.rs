use std::io::{self, Write};

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Local, TimeZone};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use crate::models::{parse_due_date, split_share_list, Priority, Status, Task, TaskDraft, TaskId};
use crate::sharing::{add_share, remove_share};
use crate::storage::TaskStore;
use crate::view::{aggregate_counts, compose_view, is_overdue, TaskCounts, ViewParams};

/// Field overrides collected from the command line.
#[derive(Debug, Default, Clone)]
pub struct TaskEdits {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub status: Option<Status>,
    pub due: Option<String>,
    pub clear_due: bool,
    pub shares: Option<String>,
}

fn parse_due_arg(raw: &str) -> Result<chrono::DateTime<chrono::Utc>> {
    parse_due_date(raw)
        .ok_or_else(|| anyhow!("Invalid due date '{}'. Use YYYY-MM-DD or an RFC 3339 timestamp.", raw))
}

/// Validates every address through the share rules before a wholesale replace.
fn validated_shares(emails: &[String]) -> Result<Vec<String>> {
    emails
        .iter()
        .try_fold(Vec::new(), |acc, e| add_share(&acc, e))
        .map_err(Into::into)
}

fn apply_edits(mut draft: TaskDraft, edits: TaskEdits) -> Result<TaskDraft> {
    if let Some(t) = edits.title { draft.title = t; }
    if let Some(d) = edits.description { draft.description = Some(d); }
    if let Some(p) = edits.priority { draft.priority = p; }
    if let Some(s) = edits.status { draft.status = s; }
    if edits.clear_due {
        draft.due_date = None;
    } else if let Some(d) = edits.due {
        draft.due_date = Some(parse_due_arg(&d)?);
    }
    if let Some(raw) = edits.shares {
        draft.shared_with = validated_shares(&split_share_list(&raw))?;
    }
    Ok(draft.validate()?)
}

/// Adds a new task at the top of the board.
pub fn cmd_add(store: &TaskStore, title: String, edits: TaskEdits) -> Result<TaskId> {
    let draft = apply_edits(TaskDraft::new(title), edits)?;
    let mut board = store.load()?;
    let id = board.create(draft).id;
    store.save(&board)?;
    println!("Task added (id = {})", id);
    Ok(id)
}

/// Replaces the task's fields with the stored values plus the given overrides.
pub fn cmd_edit(store: &TaskStore, id: TaskId, edits: TaskEdits) -> Result<()> {
    let mut board = store.load()?;
    let Some(current) = board.get(id) else {
        eprintln!("Task {} not found.", id);
        return Ok(());
    };
    let draft = apply_edits(current.to_draft(), edits)?;
    board.edit(id, draft);
    store.save(&board)?;
    println!("Task {} updated.", id);
    Ok(())
}

/// Flips a task between completed and todo.
pub fn cmd_toggle(store: &TaskStore, id: TaskId) -> Result<()> {
    let mut board = store.load()?;
    match board.toggle_complete(id) {
        Some(t) if t.is_completed() => println!("Task {} completed. Great job!", id),
        Some(_) => println!("Task {} moved back to todo.", id),
        None => {
            eprintln!("Task {} not found.", id);
            return Ok(());
        }
    }
    store.save(&board)?;
    Ok(())
}

/// Removes a task from the board by ID.
pub fn cmd_remove(store: &TaskStore, id: TaskId) -> Result<()> {
    let mut board = store.load()?;
    match board.delete(id) {
        Some(t) => {
            store.save(&board)?;
            println!("Task {} \"{}\" removed.", id, t.title);
        }
        None => eprintln!("Task {} not found.", id),
    }
    Ok(())
}

/// Adds one collaborator to a task.
pub fn cmd_share_add(store: &TaskStore, id: TaskId, email: &str) -> Result<()> {
    let mut board = store.load()?;
    let Some(task) = board.get(id) else {
        eprintln!("Task {} not found.", id);
        return Ok(());
    };
    let shares = add_share(&task.shared_with, email)?;
    board.update_shares(id, shares);
    store.save(&board)?;
    println!("Task {} shared with {}.", id, email.trim());
    Ok(())
}

/// Removes one collaborator from a task.
pub fn cmd_share_remove(store: &TaskStore, id: TaskId, email: &str) -> Result<()> {
    let mut board = store.load()?;
    let Some(task) = board.get(id) else {
        eprintln!("Task {} not found.", id);
        return Ok(());
    };
    let shares = remove_share(&task.shared_with, email);
    if shares.len() == task.shared_with.len() {
        println!("Task {} is not shared with {}.", id, email);
        return Ok(());
    }
    board.update_shares(id, shares);
    store.save(&board)?;
    println!("{} removed from task {}.", email, id);
    Ok(())
}

/// Replaces the whole collaborator list of a task.
pub fn cmd_share_set(store: &TaskStore, id: TaskId, emails: &[String]) -> Result<()> {
    let shares = validated_shares(emails)?;
    let mut board = store.load()?;
    let count = shares.len();
    if board.update_shares(id, shares).is_none() {
        eprintln!("Task {} not found.", id);
        return Ok(());
    }
    store.save(&board)?;
    println!(
        "Task {} shared with {} {}.",
        id,
        count,
        if count == 1 { "person" } else { "people" }
    );
    Ok(())
}

/// Human-readable distance to the due date, relative to `now`'s calendar day.
pub fn relative_due<Tz: TimeZone>(task: &Task, now: &DateTime<Tz>) -> String {
    let Some(due) = task.due_date else {
        return "-".to_string();
    };
    let days_left = (due.with_timezone(&now.timezone()).date_naive() - now.date_naive()).num_days();
    if days_left < 0 {
        format!("{}d overdue", days_left.abs())
    } else if days_left == 0 {
        "Today".to_string()
    } else {
        format!("{}d", days_left)
    }
}

fn counts_line(counts: &TaskCounts) -> String {
    format!(
        "Total {} | Completed {} | In Progress {} | Overdue {} | Due Today {}",
        counts.all, counts.completed, counts.in_progress, counts.overdue, counts.due_today
    )
}

/// Lists the composed view in a formatted table.
pub fn cmd_list(store: &TaskStore, params: &ViewParams) -> Result<()> {
    let board = store.load()?;
    let now = Local::now();
    let view = compose_view(board.tasks(), &now, params);
    let counts = aggregate_counts(board.tasks(), &now);

    println!("{}", counts_line(&counts));
    if view.is_empty() {
        println!("No tasks found.");
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").add_attribute(Attribute::Bold),
            Cell::new("Title").add_attribute(Attribute::Bold),
            Cell::new("Priority").add_attribute(Attribute::Bold),
            Cell::new("Status").add_attribute(Attribute::Bold),
            Cell::new("Due").add_attribute(Attribute::Bold),
            Cell::new("Time Left").add_attribute(Attribute::Bold),
            Cell::new("Shared").add_attribute(Attribute::Bold),
        ]);

    for t in view {
        let priority_color = match t.priority {
            Priority::High => Color::Red,
            Priority::Medium => Color::Yellow,
            Priority::Low => Color::Green,
        };
        let status_color = match t.status {
            Status::Completed => Color::Green,
            Status::InProgress => Color::Blue,
            Status::Todo => Color::Reset,
        };
        let due = t
            .due_date
            .map(|d| d.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();

        table.add_row(vec![
            Cell::new(t.id),
            Cell::new(&t.title),
            Cell::new(t.priority.as_str()).fg(priority_color),
            Cell::new(t.status.as_str()).fg(status_color),
            Cell::new(due),
            Cell::new(relative_due(t, &now)).fg(if is_overdue(t, &now) { Color::Red } else { Color::Reset }),
            Cell::new(t.shared_with.join(", ")),
        ]);
    }

    println!("{table}");
    Ok(())
}

/// Prints the summary cards.
pub fn cmd_stats(store: &TaskStore) -> Result<()> {
    let board = store.load()?;
    let counts = aggregate_counts(board.tasks(), &Local::now());
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec!["Total", "Completed", "In Progress", "Overdue", "Due Today"]);
    table.add_row(vec![
        Cell::new(counts.all),
        Cell::new(counts.completed).fg(Color::Green),
        Cell::new(counts.in_progress).fg(Color::Blue),
        Cell::new(counts.overdue).fg(Color::Red),
        Cell::new(counts.due_today),
    ]);
    println!("{table}");
    Ok(())
}

/// Resets the board by deleting the task store.
pub fn cmd_reset(store: &TaskStore, force: bool) -> Result<()> {
    if !force {
        print!("Are you sure you want to delete all tasks? This cannot be undone. [y/N] ");
        io::stdout().flush().context("failed to flush prompt")?;
        let mut input = String::new();
        io::stdin().read_line(&mut input).context("failed to read answer")?;
        if input.trim().to_lowercase() != "y" {
            println!("Aborted.");
            return Ok(());
        }
    }
    store.delete()?;
    println!("Database reset successfully.");
    Ok(())
}
