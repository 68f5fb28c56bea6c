mod common;

use common::*;
use taskdash::board::{BoardError, TaskBoard};
use taskdash::models::{Priority, Status, TaskDraft, TaskId};
use taskdash::sharing::{add_share, is_valid_email, remove_share, ShareError};

fn shares(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_create_prepends_with_fresh_id() {
    let mut board = TaskBoard::new();
    let first = board.create(TaskDraft::new("First")).id;
    let second = board.create(TaskDraft::new("Second")).id;

    assert_ne!(first, second);
    assert_eq!(board.len(), 2);
    assert_eq!(board.tasks()[0].title, "Second");
    assert_eq!(board.tasks()[1].title, "First");
}

#[test]
fn test_create_mints_past_largest_id() {
    let mut board = TaskBoard::from_tasks(vec![task(7, "old"), task(3, "older")]).unwrap();
    let id = board.create(TaskDraft::new("new")).id;
    assert_eq!(id, TaskId(8));
}

#[test]
fn test_create_reuses_free_id_after_largest_possible() {
    let mut board = TaskBoard::from_tasks(vec![task(u64::MAX, "edge"), task(1, "first")]).unwrap();
    let id = board.create(TaskDraft::new("new")).id;
    assert_eq!(id, TaskId(2));
    assert!(TaskBoard::from_tasks(board.tasks().to_vec()).is_ok());
}

#[test]
fn test_from_tasks_rejects_duplicate_ids() {
    let err = TaskBoard::from_tasks(vec![task(1, "a"), task(1, "b")]).unwrap_err();
    assert_eq!(err, BoardError::DuplicateId(TaskId(1)));
}

#[test]
fn test_edit_replaces_everything_but_id() {
    let mut board = TaskBoard::from_tasks(vec![task(1, "Draft")]).unwrap();
    let draft = TaskDraft {
        title: "Final".into(),
        description: Some("Polished".into()),
        priority: Priority::High,
        status: Status::InProgress,
        due_date: Some(noon()),
        shared_with: shares(&["a@b.com"]),
    };
    let edited = board.edit(TaskId(1), draft.clone()).unwrap().clone();

    assert_eq!(edited.id, TaskId(1));
    assert_eq!(edited.to_draft(), draft);
}

#[test]
fn test_edit_unknown_id_is_a_no_op() {
    let mut board = TaskBoard::from_tasks(vec![task(1, "Keep")]).unwrap();
    let before = board.clone();
    assert!(board.edit(TaskId(42), TaskDraft::new("Nope")).is_none());
    assert_eq!(board, before);
}

#[test]
fn test_toggle_complete_syncs_status() {
    let mut board = TaskBoard::from_tasks(vec![with_status(task(1, "Work"), Status::InProgress)]).unwrap();

    let t = board.toggle_complete(TaskId(1)).unwrap();
    assert!(t.is_completed());
    assert_eq!(t.status, Status::Completed);

    let t = board.toggle_complete(TaskId(1)).unwrap();
    assert!(!t.is_completed());
    assert_eq!(t.status, Status::Todo);

    assert!(board.toggle_complete(TaskId(9)).is_none());
}

#[test]
fn test_delete_removes_only_the_target() {
    let mut board = TaskBoard::from_tasks(vec![task(1, "a"), task(2, "b"), task(3, "c")]).unwrap();
    let removed = board.delete(TaskId(2)).unwrap();
    assert_eq!(removed.title, "b");
    assert_eq!(board.tasks().iter().map(|t| t.id.0).collect::<Vec<_>>(), vec![1, 3]);

    assert!(board.delete(TaskId(2)).is_none());
    assert_eq!(board.len(), 2);
}

#[test]
fn test_update_shares_replaces_list() {
    let mut board = TaskBoard::from_tasks(vec![task(1, "Plan")]).unwrap();
    board.update_shares(TaskId(1), shares(&["x@y.io", "z@y.io"]));
    assert_eq!(board.get(TaskId(1)).unwrap().shared_with, shares(&["x@y.io", "z@y.io"]));

    board.update_shares(TaskId(1), Vec::new());
    assert!(board.get(TaskId(1)).unwrap().shared_with.is_empty());
    assert!(board.update_shares(TaskId(5), Vec::new()).is_none());
}

#[test]
fn test_add_share_validation() {
    assert_eq!(
        add_share(&[], "not-an-email"),
        Err(ShareError::InvalidEmail("not-an-email".into()))
    );
    assert_eq!(
        add_share(&shares(&["a@b.com"]), "a@b.com"),
        Err(ShareError::DuplicateEmail("a@b.com".into()))
    );
    assert_eq!(
        add_share(&shares(&["a@b.com"]), "c@d.com"),
        Ok(shares(&["a@b.com", "c@d.com"]))
    );
}

#[test]
fn test_add_share_trims_and_is_case_sensitive() {
    assert_eq!(add_share(&[], "  ann@example.com "), Ok(shares(&["ann@example.com"])));
    assert_eq!(
        add_share(&shares(&["a@b.com"]), "A@b.com"),
        Ok(shares(&["a@b.com", "A@b.com"]))
    );
}

#[test]
fn test_email_shape() {
    assert!(is_valid_email("john@example.com"));
    assert!(is_valid_email("first.last@sub.example.co"));
    assert!(!is_valid_email(""));
    assert!(!is_valid_email("john@example"));
    assert!(!is_valid_email("john example@x.com"));
    assert!(!is_valid_email("a@b@c.com"));
    assert!(!is_valid_email("@example.com"));
    assert!(!is_valid_email("john@.com"));
    assert!(!is_valid_email("john@example."));
}

#[test]
fn test_remove_share_drops_first_match() {
    let list = shares(&["a@b.com", "c@d.com", "a@b.com"]);
    assert_eq!(remove_share(&list, "a@b.com"), shares(&["c@d.com", "a@b.com"]));
    assert_eq!(remove_share(&list, "x@y.com"), list);
}
