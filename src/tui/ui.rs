use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table},
    Frame,
};
use chrono::Local;
use crate::commands::relative_due;
use crate::models::{Priority, Status};
use crate::view::{is_due_today, is_overdue, Filter, TaskCounts};
use super::app::{App, InputMode, InputField};

fn summary_line(counts: &TaskCounts) -> Line<'static> {
    Line::from(vec![
        Span::raw(format!("Total {}   ", counts.all)),
        Span::styled(format!("Due Today {}   ", counts.due_today), Style::default().fg(Color::Yellow)),
        Span::styled(format!("Completed {}   ", counts.completed), Style::default().fg(Color::Green)),
        Span::styled(format!("In Progress {}   ", counts.in_progress), Style::default().fg(Color::Blue)),
        Span::styled(format!("Overdue {}", counts.overdue), Style::default().fg(Color::Red)),
    ])
}

pub fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Summary
            Constraint::Length(3), // Filters
            Constraint::Length(3), // Search + sort
            Constraint::Min(0),    // Table
            Constraint::Length(3), // Help
        ].as_ref())
        .split(f.area());

    let summary = Paragraph::new(summary_line(&app.counts))
        .block(Block::default().borders(Borders::ALL).title("TaskDash"));
    f.render_widget(summary, chunks[0]);

    let mut filter_spans = Vec::new();
    for (n, filter) in Filter::ALL.iter().enumerate() {
        let text = format!(" {}:{} ({}) ", n + 1, filter.label(), app.counts.for_filter(*filter));
        let style = if *filter == app.params.filter {
            Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        filter_spans.push(Span::styled(text, style));
        filter_spans.push(Span::raw(" "));
    }
    let filters = Paragraph::new(Line::from(filter_spans))
        .block(Block::default().borders(Borders::ALL).title("Filters"));
    f.render_widget(filters, chunks[1]);

    let search_style = if app.input_mode == InputMode::Searching {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let search = Paragraph::new(Line::from(vec![
        Span::styled(format!("Search: {}", app.params.query), search_style),
        Span::raw("    "),
        Span::styled(format!("Sort by: {}", app.sort().label()), Style::default().fg(Color::Gray)),
    ]))
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(search, chunks[2]);

    let now = app.now;
    let rows: Vec<Row> = app
        .visible_tasks()
        .map(|t| {
            let style = if t.is_completed() {
                Style::default().fg(Color::DarkGray)
            } else if is_overdue(t, &now) {
                Style::default().fg(Color::Red)
            } else if is_due_today(t, &now) {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            };
            let priority_style = match t.priority {
                Priority::High => Style::default().fg(Color::Red),
                Priority::Medium => Style::default().fg(Color::Yellow),
                Priority::Low => Style::default().fg(Color::Green),
            };
            let status_label = match t.status {
                Status::Todo => "todo",
                Status::InProgress => "in progress",
                Status::Completed => "completed",
            };
            let due = t
                .due_date
                .map(|d| d.with_timezone(&Local).format("%Y-%m-%d").to_string())
                .unwrap_or_default();

            Row::new(vec![
                Cell::from(t.id.to_string()),
                Cell::from(if t.is_completed() { "[x]" } else { "[ ]" }),
                Cell::from(t.title.clone()),
                Cell::from(t.priority.as_str()).style(priority_style),
                Cell::from(status_label),
                Cell::from(due),
                Cell::from(relative_due(t, &now)),
                Cell::from(t.shared_with.len().to_string()),
            ]).style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(4),
        Constraint::Length(3),
        Constraint::Min(20),
        Constraint::Length(8),
        Constraint::Length(12),
        Constraint::Length(10),
        Constraint::Length(12),
        Constraint::Length(6),
    ];

    let title = format!("Tasks - {} of {}", app.view.len(), app.counts.all);
    let table = Table::new(rows, widths)
        .header(Row::new(vec!["ID", "", "Title", "Priority", "Status", "Due", "Time Left", "Shared"])
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .bottom_margin(1))
        .block(Block::default().borders(Borders::ALL).title(title))
        .row_highlight_style(Style::default().add_modifier(Modifier::BOLD).bg(Color::DarkGray))
        .highlight_symbol(">> ");

    f.render_stateful_widget(table, chunks[3], &mut app.state);

    let help_text = match app.input_mode {
        InputMode::Normal => "q: Quit | a: Add | n: Title | e: Desc | t: Due | p: Priority | s: Status | Space: Done | d: Del | h: Share | x: Unshare | /: Search | f/1-5: Filter | o: Sort",
        InputMode::Searching => "Type to search | Enter: Keep | Esc: Clear",
        InputMode::Editing | InputMode::Sharing => "Enter: Save | Esc: Cancel",
        InputMode::Adding => "Enter: Next Step | Esc: Cancel",
    };
    let help_block = match &app.message {
        Some(msg) => Block::default().borders(Borders::ALL).title(msg.as_str()),
        None => Block::default().borders(Borders::ALL),
    };
    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::Gray))
        .block(help_block);
    f.render_widget(help, chunks[4]);

    // Render Input Box if needed
    let title = match app.input_mode {
        InputMode::Adding => match app.add_state.step {
            0 => "Add Task: Enter Title",
            1 => "Add Task: Enter Description (Optional)",
            2 => "Add Task: Enter Priority (low/medium/high)",
            3 => "Add Task: Enter Due Date (YYYY-MM-DD, Optional)",
            _ => "Add Task",
        },
        InputMode::Editing => match app.input_field {
            InputField::Title => "Edit Title",
            InputField::Description => "Edit Description",
            InputField::Due => "Edit Due Date (empty clears)",
            InputField::None => "Edit",
        },
        InputMode::Sharing => "Share with (email)",
        InputMode::Normal | InputMode::Searching => return,
    };

    let area = centered_rect(60, 3, f.area()); // Fixed height of 3 (border + 1 line)
    f.render_widget(Clear, area);
    let input = Paragraph::new(app.input_buffer.as_str())
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(input, area);
}

fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let margin = r.height.saturating_sub(height) / 2;
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(margin),
            Constraint::Length(height),
            Constraint::Length(margin),
        ].as_ref())
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ].as_ref())
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_shows_all_five_counts() {
        let counts = TaskCounts {
            all: 9,
            due_today: 2,
            overdue: 3,
            completed: 4,
            in_progress: 1,
        };
        let text: String = summary_line(&counts).spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, "Total 9   Due Today 2   Completed 4   In Progress 1   Overdue 3");
    }
}
