pub mod app;
pub mod ui;

use std::io;
use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use crate::storage::TaskStore;
use crate::view::{Filter, ViewParams};
use app::{App, InputMode, InputField};
use ui::ui;

pub fn run_tui(store: TaskStore, params: ViewParams) -> Result<()> {
    // Load before touching the terminal so store errors print normally
    let mut app = App::new(store, params)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run loop
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res.map_err(Into::into)
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match app.input_mode {
                InputMode::Normal => {
                    app.message = None;
                    match key.code {
                        KeyCode::Char('q') => return Ok(()),
                        KeyCode::Down | KeyCode::Char('j') => app.next(),
                        KeyCode::Up | KeyCode::Char('k') => app.previous(),
                        KeyCode::Char(' ') => app.toggle_selected(),
                        KeyCode::Char('d') | KeyCode::Delete => app.delete_selected(),
                        KeyCode::Char('a') => app.start_add(),
                        KeyCode::Char('n') => app.start_edit(InputField::Title),
                        KeyCode::Char('e') => app.start_edit(InputField::Description),
                        KeyCode::Char('t') => app.start_edit(InputField::Due),
                        KeyCode::Char('p') => app.cycle_priority(),
                        KeyCode::Char('s') => app.cycle_status(),
                        KeyCode::Char('h') => app.start_share(),
                        KeyCode::Char('x') => app.remove_last_share(),
                        KeyCode::Char('/') => app.start_search(),
                        KeyCode::Char('f') => app.cycle_filter(),
                        KeyCode::Char('o') => app.cycle_sort(),
                        KeyCode::Char(c @ '1'..='5') => {
                            let idx = c as usize - '1' as usize;
                            app.set_filter(Filter::ALL[idx]);
                        }
                        _ => {}
                    }
                }
                _ => match key.code {
                    KeyCode::Enter => app.handle_input(),
                    KeyCode::Esc => app.cancel_input(),
                    KeyCode::Char(c) => app.push_char(c),
                    KeyCode::Backspace => app.pop_char(),
                    _ => {}
                },
            }
        }
    }
}
