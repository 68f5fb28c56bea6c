//! # TaskDash
//!
//! A personal task dashboard for the terminal. Create, edit, complete, delete and
//! share tasks, then slice them with search, filters and sorting.
//!
//! ## Features
//!
//! *   **Filters with live counts**: All, Due Today, Overdue, In Progress, Completed.
//! *   **Search**: case-insensitive match on title and description.
//! *   **Sorting**: by due date (undated tasks last), priority, title or status.
//! *   **Sharing**: keep a validated list of collaborator emails per task.
//! *   **Dual Interface**:
//!     *   **CLI**: Scriptable and quick for single commands.
//!     *   **TUI**: Interactive dashboard with filter badges and summary counts.
//!
//! ## Usage
//!
//! ```bash
//! # Interactive dashboard
//! taskdash
//!
//! # Add a task
//! taskdash add "Write report" --priority high --due 2025-12-01 --share ann@example.com
//!
//! # Overdue tasks by priority
//! taskdash list --filter overdue --sort priority
//!
//! # Search
//! taskdash list --query review
//!
//! # Complete / reopen
//! taskdash toggle <ID>
//!
//! # Collaborators
//! taskdash share add <ID> bob@example.com
//! ```
//!
//! #### TUI Key Bindings
//!
//! *   `q`: Quit, `j`/`k`: Move
//! *   `a`: Add task, `n`/`e`/`t`: Edit title/description/due date
//! *   `p`/`s`: Cycle priority/status, `Space`: Toggle done, `d`: Delete
//! *   `h`: Share with an email, `x`: Remove last collaborator
//! *   `/`: Search, `f` or `1`-`5`: Filter, `o`: Cycle sort
//!
//! ## Data Storage
//!
//! Tasks are saved as JSON in your local data directory
//! (`~/.local/share/taskdash/tasks.json` on Linux). Override with `--db` or the
//! `TASKS_DB` environment variable, or set `[storage] path` in
//! `~/.config/taskdash/config.toml`. The same file accepts `[view] filter` and
//! `sort` defaults.
//!
//! Logging goes to stderr and is controlled with `RUST_LOG`.

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use tracing_subscriber::EnvFilter;

use taskdash::commands::*;
use taskdash::config::Config;
use taskdash::models::{Priority, Status, TaskId};
use taskdash::storage::TaskStore;
use taskdash::tui::run_tui;
use taskdash::view::{Filter, SortKey, ViewParams};

#[derive(Parser)]
#[command(name = "taskdash")]
#[command(about = "Personal task dashboard", long_about = None)]
struct Cli {
    /// Path to the tasks database
    #[arg(long, global = true, env = "TASKS_DB")]
    db: Option<PathBuf>,
    /// Path to the config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Task fields shared by `add` and `edit`.
#[derive(clap::Args)]
struct FieldArgs {
    /// Longer description
    #[arg(short, long)]
    description: Option<String>,
    /// low, medium or high
    #[arg(short, long)]
    priority: Option<Priority>,
    /// todo, in-progress or completed
    #[arg(short, long)]
    status: Option<Status>,
    /// Due date, YYYY-MM-DD or RFC 3339 timestamp
    #[arg(long)]
    due: Option<String>,
    /// Comma-separated collaborator emails
    #[arg(long)]
    share: Option<String>,
}

impl FieldArgs {
    fn into_edits(self, title: Option<String>, clear_due: bool) -> TaskEdits {
        TaskEdits {
            title,
            description: self.description,
            priority: self.priority,
            status: self.status,
            due: self.due,
            clear_due,
            shares: self.share,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new task
    Add {
        /// Task title (quoted if it has spaces)
        title: String,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// List tasks through search, filter and sort
    List {
        /// Case-insensitive text to look for in title and description
        #[arg(short, long, default_value = "")]
        query: String,
        /// all, due-today, overdue, completed or in-progress
        #[arg(short, long)]
        filter: Option<String>,
        /// dueDate, priority, title or status
        #[arg(short, long)]
        sort: Option<String>,
    },
    /// Show task counts
    Stats,
    /// Edit a task
    Edit {
        id: TaskId,
        /// New title
        #[arg(short, long)]
        title: Option<String>,
        /// Remove the due date
        #[arg(long, conflicts_with = "due")]
        no_due: bool,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Mark a task complete, or reopen it
    Toggle {
        id: TaskId,
    },
    /// Remove a task
    Remove {
        id: TaskId,
    },
    /// Manage collaborators
    Share {
        #[command(subcommand)]
        command: ShareCommands,
    },
    /// Reset the database (delete all tasks)
    Reset {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
        shell: String,
    },
    /// Open interactive TUI
    Ui,
}

#[derive(Subcommand)]
enum ShareCommands {
    /// Add a collaborator
    Add {
        id: TaskId,
        email: String,
    },
    /// Remove a collaborator
    Remove {
        id: TaskId,
        email: String,
    },
    /// Replace all collaborators
    Set {
        id: TaskId,
        emails: Vec<String>,
    },
}

fn install_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .try_init();
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    // The dashboard owns the terminal, so it runs without a subscriber
    if !matches!(cli.command, Some(Commands::Ui) | None) {
        install_tracing();
    }

    let config = Config::load(cli.config.as_deref(), cli.db)?;
    let store = TaskStore::new(config.db_path.clone());
    let default_params = ViewParams::new("", config.default_filter, config.default_sort);

    match cli.command {
        Some(Commands::Add { title, fields }) => {
            cmd_add(&store, title, fields.into_edits(None, false))?;
        }
        Some(Commands::List { query, filter, sort }) => {
            let params = ViewParams::new(
                query,
                filter.as_deref().map_or(config.default_filter, Filter::parse),
                sort.as_deref().map_or(config.default_sort, SortKey::parse),
            );
            cmd_list(&store, &params)?;
        }
        Some(Commands::Stats) => cmd_stats(&store)?,
        Some(Commands::Edit { id, title, no_due, fields }) => {
            cmd_edit(&store, id, fields.into_edits(title, no_due))?;
        }
        Some(Commands::Toggle { id }) => cmd_toggle(&store, id)?,
        Some(Commands::Remove { id }) => cmd_remove(&store, id)?,
        Some(Commands::Share { command }) => match command {
            ShareCommands::Add { id, email } => cmd_share_add(&store, id, &email)?,
            ShareCommands::Remove { id, email } => cmd_share_remove(&store, id, &email)?,
            ShareCommands::Set { id, emails } => cmd_share_set(&store, id, &emails)?,
        },
        Some(Commands::Reset { force }) => cmd_reset(&store, force)?,
        Some(Commands::Completions { shell }) => {
            let shell_enum = match shell.as_str() {
                "bash" => Shell::Bash,
                "zsh" => Shell::Zsh,
                "fish" => Shell::Fish,
                "powershell" => Shell::PowerShell,
                "elvish" => Shell::Elvish,
                _ => anyhow::bail!("Unsupported shell: {}", shell),
            };
            let mut cmd = Cli::command();
            generate(shell_enum, &mut cmd, "taskdash", &mut io::stdout());
        }
        Some(Commands::Ui) | None => run_tui(store, default_params)?,
    }
    Ok(())
}
