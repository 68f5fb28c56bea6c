use chrono::{DateTime, Local};
use ratatui::widgets::TableState;
use tracing::warn;

use crate::board::TaskBoard;
use crate::models::{parse_due_date, Priority, Task, TaskDraft, TaskId};
use crate::sharing::{add_share, remove_share};
use crate::storage::{StoreError, TaskStore};
use crate::view::{aggregate_counts, compose_view, Filter, SortKey, TaskCounts, ViewParams};

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum InputMode {
    Normal,
    Searching,
    Editing,
    Adding,
    Sharing,
}

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum InputField {
    None,
    Title,
    Description,
    Due,
}

/// State for the multi-step "Add Task" wizard.
#[derive(Default)]
pub struct AddState {
    pub draft: TaskDraft,
    pub step: usize, // 0: Title, 1: Description, 2: Priority, 3: Due
}

pub struct App {
    pub store: TaskStore,
    pub board: TaskBoard,
    pub params: ViewParams,
    /// Ids of the composed view, in display order.
    pub view: Vec<TaskId>,
    pub counts: TaskCounts,
    /// Clock snapshot taken by the last refresh.
    pub now: DateTime<Local>,
    pub state: TableState,
    pub input_mode: InputMode,
    pub input_field: InputField,
    pub input_buffer: String,
    pub target_id: Option<TaskId>,
    pub add_state: AddState,
    /// Last rejection or failure, shown in the status line.
    pub message: Option<String>,
}

impl App {
    /// Creates a new App instance and loads the board.
    pub fn new(store: TaskStore, params: ViewParams) -> Result<App, StoreError> {
        let board = store.load()?;
        let mut app = App {
            store,
            board,
            params,
            view: Vec::new(),
            counts: TaskCounts::default(),
            now: Local::now(),
            state: TableState::default(),
            input_mode: InputMode::Normal,
            input_field: InputField::None,
            input_buffer: String::new(),
            target_id: None,
            add_state: AddState::default(),
            message: None,
        };
        app.refresh();
        Ok(app)
    }

    /// Recomputes the view and counts from the board and clamps the selection.
    pub fn refresh(&mut self) {
        self.now = Local::now();
        self.view = compose_view(self.board.tasks(), &self.now, &self.params)
            .into_iter()
            .map(|t| t.id)
            .collect();
        self.counts = aggregate_counts(self.board.tasks(), &self.now);

        if self.view.is_empty() {
            self.state.select(None);
        } else if let Some(i) = self.state.selected() {
            if i >= self.view.len() {
                self.state.select(Some(self.view.len() - 1));
            }
        } else {
            self.state.select(Some(0));
        }
    }

    /// Tasks of the current view, in display order.
    pub fn visible_tasks(&self) -> impl Iterator<Item = &Task> {
        self.view.iter().filter_map(|id| self.board.get(*id))
    }

    pub fn selected_task(&self) -> Option<&Task> {
        let i = self.state.selected()?;
        self.view.get(i).and_then(|id| self.board.get(*id))
    }

    fn selected_id(&self) -> Option<TaskId> {
        self.selected_task().map(|t| t.id)
    }

    /// Saves the board and refreshes the view.
    fn commit(&mut self) {
        if let Err(e) = self.store.save(&self.board) {
            warn!(error = %e, "failed to save tasks");
            self.message = Some(e.to_string());
        }
        self.refresh();
    }

    /// Selects the next row.
    pub fn next(&mut self) {
        if self.view.is_empty() { return; }
        let i = match self.state.selected() {
            Some(i) if i + 1 < self.view.len() => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    /// Selects the previous row.
    pub fn previous(&mut self) {
        if self.view.is_empty() { return; }
        let i = match self.state.selected() {
            Some(0) | None => self.view.len() - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.params.filter = filter;
        self.state.select(None);
        self.refresh();
    }

    pub fn cycle_filter(&mut self) {
        self.set_filter(self.params.filter.cycle());
    }

    pub fn cycle_sort(&mut self) {
        self.params.sort = self.params.sort.cycle();
        self.refresh();
    }

    pub fn sort(&self) -> SortKey {
        self.params.sort
    }

    /// Flips completion of the selected task.
    pub fn toggle_selected(&mut self) {
        if let Some(id) = self.selected_id() {
            if let Some(t) = self.board.toggle_complete(id) {
                self.message = Some(if t.is_completed() {
                    format!("Great job completing \"{}\"!", t.title)
                } else {
                    format!("\"{}\" moved back to todo.", t.title)
                });
            }
            self.commit();
        }
    }

    /// Deletes the selected task.
    pub fn delete_selected(&mut self) {
        if let Some(id) = self.selected_id() {
            if let Some(t) = self.board.delete(id) {
                self.message = Some(format!("\"{}\" has been removed.", t.title));
            }
            self.commit();
        }
    }

    /// Moves the selected task to the next priority.
    pub fn cycle_priority(&mut self) {
        self.edit_selected(|draft| draft.priority = draft.priority.cycle());
    }

    /// Moves the selected task to the next status.
    pub fn cycle_status(&mut self) {
        self.edit_selected(|draft| draft.status = draft.status.cycle());
    }

    fn edit_selected(&mut self, change: impl FnOnce(&mut TaskDraft)) {
        if let Some(task) = self.selected_task() {
            let id = task.id;
            let mut draft = task.to_draft();
            change(&mut draft);
            self.board.edit(id, draft);
            self.commit();
        }
    }

    /// Drops the most recently added collaborator of the selected task.
    pub fn remove_last_share(&mut self) {
        if let Some(task) = self.selected_task() {
            let id = task.id;
            if let Some(last) = task.shared_with.last() {
                let shares = remove_share(&task.shared_with, last);
                self.board.update_shares(id, shares);
                self.commit();
            }
        }
    }

    pub fn start_search(&mut self) {
        self.input_mode = InputMode::Searching;
        self.input_buffer = self.params.query.clone();
    }

    /// Initiates the "Add Task" wizard.
    pub fn start_add(&mut self) {
        self.input_mode = InputMode::Adding;
        self.add_state = AddState::default();
        self.input_buffer.clear();
    }

    /// Initiates editing of a field of the selected task.
    pub fn start_edit(&mut self, field: InputField) {
        if let Some(t) = self.selected_task() {
            let id = t.id;
            // Pre-fill buffer for editing
            let prefill = match field {
                InputField::Title => t.title.clone(),
                InputField::Description => t.description.clone().unwrap_or_default(),
                InputField::Due => t
                    .due_date
                    .map(|d| d.with_timezone(&Local).to_rfc3339())
                    .unwrap_or_default(),
                InputField::None => String::new(),
            };
            self.input_buffer = prefill;
            self.target_id = Some(id);
            self.input_mode = InputMode::Editing;
            self.input_field = field;
        }
    }

    /// Opens the collaborator prompt for the selected task.
    pub fn start_share(&mut self) {
        if let Some(id) = self.selected_id() {
            self.target_id = Some(id);
            self.input_mode = InputMode::Sharing;
            self.input_buffer.clear();
        }
    }

    pub fn push_char(&mut self, c: char) {
        self.input_buffer.push(c);
        if self.input_mode == InputMode::Searching {
            self.params.query = self.input_buffer.clone();
            self.refresh();
        }
    }

    pub fn pop_char(&mut self) {
        self.input_buffer.pop();
        if self.input_mode == InputMode::Searching {
            self.params.query = self.input_buffer.clone();
            self.refresh();
        }
    }

    /// Leaves the current prompt. Cancelling a search clears it.
    pub fn cancel_input(&mut self) {
        if self.input_mode == InputMode::Searching {
            self.params.query.clear();
            self.refresh();
        }
        self.input_mode = InputMode::Normal;
        self.input_field = InputField::None;
        self.input_buffer.clear();
    }

    /// Handles Enter based on the current mode.
    pub fn handle_input(&mut self) {
        match self.input_mode {
            InputMode::Searching => self.input_mode = InputMode::Normal,
            InputMode::Adding => self.handle_adding_input(),
            InputMode::Editing => self.handle_editing_input(),
            InputMode::Sharing => self.handle_sharing_input(),
            InputMode::Normal => {}
        }
    }

    fn finish_input(&mut self) {
        self.input_mode = InputMode::Normal;
        self.input_field = InputField::None;
        self.input_buffer.clear();
        self.target_id = None;
    }

    /// Handles input for the "Add Task" wizard.
    fn handle_adding_input(&mut self) {
        let input = self.input_buffer.trim().to_string();
        match self.add_state.step {
            0 => { // Title
                if !input.is_empty() {
                    self.add_state.draft.title = input;
                    self.add_state.step += 1;
                    self.input_buffer.clear();
                }
            }
            1 => { // Description
                if !input.is_empty() {
                    self.add_state.draft.description = Some(input);
                }
                self.add_state.step += 1;
                self.input_buffer.clear();
            }
            2 => { // Priority
                if input.is_empty() {
                    self.add_state.draft.priority = Priority::Medium;
                } else {
                    match input.parse::<Priority>() {
                        Ok(p) => self.add_state.draft.priority = p,
                        Err(e) => {
                            self.message = Some(e);
                            return;
                        }
                    }
                }
                self.add_state.step += 1;
                self.input_buffer.clear();
            }
            3 => { // Due
                if !input.is_empty() {
                    match parse_due_date(&input) {
                        Some(d) => self.add_state.draft.due_date = Some(d),
                        None => {
                            self.message = Some(format!("Invalid due date '{}'. Use YYYY-MM-DD.", input));
                            return;
                        }
                    }
                }
                let draft = std::mem::take(&mut self.add_state.draft);
                match draft.validate() {
                    Ok(draft) => {
                        let title = draft.title.clone();
                        self.board.create(draft);
                        self.message = Some(format!("\"{}\" has been added to your task list.", title));
                        self.finish_input();
                        self.commit();
                    }
                    Err(e) => {
                        self.message = Some(e.to_string());
                        self.finish_input();
                    }
                }
            }
            _ => {}
        }
    }

    /// Handles input for the edit prompt.
    fn handle_editing_input(&mut self) {
        let Some(id) = self.target_id else {
            self.finish_input();
            return;
        };
        let Some(task) = self.board.get(id) else {
            self.finish_input();
            return;
        };
        let mut draft = task.to_draft();
        let input = self.input_buffer.trim().to_string();
        match self.input_field {
            InputField::Title => draft.title = input,
            InputField::Description => draft.description = Some(input),
            InputField::Due => {
                if input.is_empty() {
                    draft.due_date = None;
                } else if let Some(d) = parse_due_date(&input) {
                    draft.due_date = Some(d);
                } else {
                    self.message = Some(format!("Invalid due date '{}'. Use YYYY-MM-DD.", input));
                    return;
                }
            }
            InputField::None => {}
        }
        match draft.validate() {
            Ok(draft) => {
                self.board.edit(id, draft);
                self.finish_input();
                self.commit();
            }
            Err(e) => self.message = Some(e.to_string()),
        }
    }

    /// Handles input for the share prompt.
    fn handle_sharing_input(&mut self) {
        let Some(task) = self.target_id.and_then(|id| self.board.get(id)) else {
            self.finish_input();
            return;
        };
        let id = task.id;
        match add_share(&task.shared_with, &self.input_buffer) {
            Ok(shares) => {
                let count = shares.len();
                self.board.update_shares(id, shares);
                self.message = Some(format!(
                    "Shared with {} {}.",
                    count,
                    if count == 1 { "person" } else { "people" }
                ));
                self.finish_input();
                self.commit();
            }
            // keep the prompt open so the address can be corrected
            Err(e) => self.message = Some(e.to_string()),
        }
    }
}
