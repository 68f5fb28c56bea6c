mod common;

use chrono::{Duration, FixedOffset, TimeZone, Utc};
use common::*;
use taskdash::models::{Priority, Status};
use taskdash::view::*;

fn params(query: &str, filter: Filter, sort: SortKey) -> ViewParams {
    ViewParams::new(query, filter, sort)
}

#[test]
fn test_search_is_case_insensitive_substring() {
    let t = task(1, "Review code changes");
    let now = noon();
    assert!(matches(&t, &now, "review", Filter::All));
    assert!(matches(&t, &now, "CODE", Filter::All));
    assert!(matches(&t, &now, "", Filter::All));
    assert!(!matches(&t, &now, "xyz", Filter::All));
}

#[test]
fn test_search_checks_description() {
    let mut t = task(1, "Standup");
    t.description = Some("Sync with the Platform team".into());
    assert!(matches(&t, &noon(), "platform", Filter::All));
    assert!(!matches(&task(2, "Standup"), &noon(), "platform", Filter::All));
}

#[test]
fn test_search_and_filter_are_anded() {
    let t = with_status(task(1, "Ship release"), Status::Completed);
    assert!(matches(&t, &noon(), "ship", Filter::Completed));
    assert!(!matches(&t, &noon(), "other", Filter::Completed));
    assert!(!matches(&t, &noon(), "ship", Filter::InProgress));
}

#[test]
fn test_completed_task_is_never_overdue() {
    let open = due_in(task(1, "Open"), Duration::days(-3));
    let done = with_status(due_in(task(2, "Done"), Duration::days(-3)), Status::Completed);
    assert!(matches(&open, &noon(), "", Filter::Overdue));
    assert!(!matches(&done, &noon(), "", Filter::Overdue));
}

#[test]
fn test_overdue_is_strictly_before_now() {
    let exactly_now = due_in(task(1, "Now"), Duration::zero());
    let undated = task(2, "Undated");
    assert!(!matches(&exactly_now, &noon(), "", Filter::Overdue));
    assert!(!matches(&undated, &noon(), "", Filter::Overdue));
}

#[test]
fn test_due_today_uses_calendar_date_of_now() {
    let early = due_in(task(1, "Early"), Duration::hours(-11));
    let late = due_in(task(2, "Late"), Duration::hours(11));
    let tomorrow = due_in(task(3, "Tomorrow"), Duration::hours(13));
    assert!(matches(&early, &noon(), "", Filter::DueToday));
    assert!(matches(&late, &noon(), "", Filter::DueToday));
    assert!(!matches(&tomorrow, &noon(), "", Filter::DueToday));
}

#[test]
fn test_due_today_follows_time_zone_of_now() {
    let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
    // 2024-06-15 08:00 in Tokyo, still 2024-06-14 in UTC
    let now = tokyo.with_ymd_and_hms(2024, 6, 15, 8, 0, 0).unwrap();
    let mut t = task(1, "Breakfast meeting");
    t.due_date = Some(Utc.with_ymd_and_hms(2024, 6, 15, 0, 30, 0).unwrap());

    assert!(is_due_today(&t, &now));
    assert!(!is_due_today(&t, &now.with_timezone(&Utc)));
}

#[test]
fn test_unknown_filter_shows_everything() {
    assert_eq!(Filter::parse("someday"), Filter::All);
    assert_eq!(Filter::parse(""), Filter::All);
    assert_eq!(Filter::parse("due-today"), Filter::DueToday);
    assert_eq!(Filter::parse("in-progress"), Filter::InProgress);

    let tasks = vec![task(1, "A"), with_status(task(2, "B"), Status::Completed)];
    let view = compose_view(&tasks, &noon(), &params("", Filter::parse("bogus"), SortKey::DueDate));
    assert_eq!(view.len(), 2);
}

#[test]
fn test_unknown_sort_key_sorts_by_due_date() {
    assert_eq!(SortKey::parse("created"), SortKey::DueDate);
    assert_eq!(SortKey::parse("whatever"), SortKey::DueDate);
    assert_eq!(SortKey::parse("priority"), SortKey::Priority);
}

#[test]
fn test_filter_completed_is_exact_subset() {
    let tasks = vec![
        task(1, "A"),
        with_status(task(2, "B"), Status::Completed),
        with_status(task(3, "C"), Status::InProgress),
        with_status(task(4, "D"), Status::Completed),
    ];
    let view = compose_view(&tasks, &noon(), &params("", Filter::Completed, SortKey::DueDate));
    assert_eq!(ids(&view), vec![2, 4]);
    assert!(view.iter().all(|t| t.is_completed()));
}

#[test]
fn test_priority_sort_is_descending_and_stable() {
    let tasks = vec![
        with_priority(task(1, "low"), Priority::Low),
        with_priority(task(2, "med a"), Priority::Medium),
        with_priority(task(3, "high"), Priority::High),
        with_priority(task(4, "med b"), Priority::Medium),
    ];
    let view = compose_view(&tasks, &noon(), &params("", Filter::All, SortKey::Priority));
    assert_eq!(ids(&view), vec![3, 2, 4, 1]);
}

#[test]
fn test_title_sort_ignores_case_first() {
    let tasks = vec![task(1, "banana"), task(2, "Apple"), task(3, "cherry"), task(4, "apple")];
    let view = compose_view(&tasks, &noon(), &params("", Filter::All, SortKey::Title));
    assert_eq!(ids(&view), vec![4, 2, 1, 3]);
}

#[test]
fn test_title_sort_places_accented_letters_with_their_base() {
    let tasks = vec![task(1, "fig"), task(2, "éclair"), task(3, "Zucchini"), task(4, "eggs")];
    let view = compose_view(&tasks, &noon(), &params("", Filter::All, SortKey::Title));
    assert_eq!(ids(&view), vec![2, 4, 1, 3]);
}

#[test]
fn test_status_sort_is_lexical() {
    let tasks = vec![
        with_status(task(1, "a"), Status::Todo),
        with_status(task(2, "b"), Status::InProgress),
        with_status(task(3, "c"), Status::Completed),
    ];
    let view = compose_view(&tasks, &noon(), &params("", Filter::All, SortKey::Status));
    // completed < in-progress < todo
    assert_eq!(ids(&view), vec![3, 2, 1]);
}

#[test]
fn test_missing_due_dates_sort_last_in_input_order() {
    let tasks = vec![
        task(1, "undated a"),
        due_in(task(2, "later"), Duration::days(2)),
        task(3, "undated b"),
        due_in(task(4, "sooner"), Duration::days(-1)),
    ];
    let view = compose_view(&tasks, &noon(), &params("", Filter::All, SortKey::DueDate));
    assert_eq!(ids(&view), vec![4, 2, 1, 3]);
}

#[test]
fn test_compose_view_is_idempotent_and_leaves_input_alone() {
    let tasks = vec![
        due_in(task(1, "b"), Duration::days(1)),
        task(2, "a"),
        due_in(task(3, "c"), Duration::days(-1)),
    ];
    let before = tasks.clone();
    let p = params("", Filter::All, SortKey::Title);
    let first = ids(&compose_view(&tasks, &noon(), &p));
    let second = ids(&compose_view(&tasks, &noon(), &p));
    assert_eq!(first, second);
    assert_eq!(tasks, before);
}

#[test]
fn test_end_to_end_scenario() {
    let tasks = vec![
        due_in(task(1, "Yesterday"), Duration::days(-1)),
        due_in(task(2, "Today"), Duration::hours(1)),
        with_status(due_in(task(3, "Tomorrow"), Duration::days(1)), Status::Completed),
    ];
    let counts = aggregate_counts(&tasks, &noon());
    assert_eq!(
        counts,
        TaskCounts {
            all: 3,
            due_today: 1,
            overdue: 1,
            completed: 1,
            in_progress: 0,
        }
    );

    let view = compose_view(&tasks, &noon(), &params("", Filter::parse("overdue"), SortKey::DueDate));
    assert_eq!(ids(&view), vec![1]);
}

#[test]
fn test_due_today_count_ignores_completion() {
    let tasks = vec![
        with_status(due_in(task(1, "done today"), Duration::hours(2)), Status::Completed),
        due_in(task(2, "open today"), Duration::hours(3)),
        with_status(task(3, "busy"), Status::InProgress),
    ];
    let counts = aggregate_counts(&tasks, &noon());
    assert_eq!(counts.due_today, 2);
    assert_eq!(counts.in_progress, 1);
    assert_eq!(counts.for_filter(Filter::DueToday), 2);
    assert_eq!(counts.for_filter(Filter::All), 3);
}

#[test]
fn test_counts_do_not_depend_on_view() {
    let tasks = vec![
        due_in(task(1, "Review"), Duration::days(-1)),
        with_status(task(2, "Write"), Status::InProgress),
    ];
    let counts = aggregate_counts(&tasks, &noon());
    // composing narrow views in between has no bearing on the totals
    let _ = compose_view(&tasks, &noon(), &params("review", Filter::Overdue, SortKey::Title));
    assert_eq!(aggregate_counts(&tasks, &noon()), counts);
    assert_eq!(counts.all, 2);
}

#[test]
fn test_filter_and_sort_cycle_through_every_value() {
    let mut f = Filter::All;
    for _ in 0..Filter::ALL.len() {
        f = f.cycle();
    }
    assert_eq!(f, Filter::All);
    assert_eq!(SortKey::Status.cycle(), SortKey::DueDate);
}
