//! # gtdust
//!
//! A Getting Things Done task manager for the terminal. A fast CLI for quick
//! capture and a TUI for working through the lists.
//!
//! ## Usage
//!
//! ```bash
//! # Capture into the inbox
//! gtdust add "Call the plumber"
//!
//! # Straight into today, inside a project, tagged and scheduled
//! gtdust add "Draft outline" --status today --project Book --tag writing --when tomorrow
//!
//! # Show a list (inbox, today, upcoming, anytime, someday, logbook, trash)
//! gtdust list today
//! gtdust list project --scope Book
//!
//! # Work on tasks by id prefix
//! gtdust complete 3f2a
//! gtdust trash 3f2a
//! gtdust restore 3f2a
//! ```
//!
//! Running without arguments opens the interactive UI.
//!
//! ## Data Storage
//!
//! The whole state lives in one JSON slot, `gtd-storage.json`, in the local
//! data directory (`~/.local/share/gtdust/` on Linux). Override it with the
//! `GTD_STORE` environment variable. Set `GTD_LOG=debug` for diagnostics.

use std::io;

use anyhow::{bail, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use gtdust::commands::*;
use gtdust::storage::JsonFileStorage;
use gtdust::store::Store;
use gtdust::{logging, tui};

#[derive(Parser)]
#[command(name = "gtdust", version)]
#[command(about = "Getting Things Done in the terminal", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new task
    Add {
        /// Task title (quoted if it has spaces)
        title: String,
        #[command(flatten)]
        input: TaskInput,
    },
    /// List the tasks of a view
    List {
        /// inbox, today, upcoming, anytime, someday, logbook, trash, project, area or tag
        view: Option<String>,
        /// Project, area or tag for scoped views
        #[arg(short, long)]
        scope: Option<String>,
        /// Case-insensitive text filter on title and notes
        #[arg(short = 'q', long)]
        search: Option<String>,
    },
    /// Show every field of a task
    Show { id: String },
    /// Edit a task
    Edit {
        id: String,
        #[command(flatten)]
        edit: TaskEdit,
    },
    /// Mark a task as complete
    Complete { id: String },
    /// Reopen a task in the inbox
    Uncomplete { id: String },
    /// Move a task to the trash
    Trash { id: String },
    /// Restore a task from the trash into the inbox
    Restore { id: String },
    /// Delete a task permanently
    Delete { id: String },
    /// Set the manual order of tasks, first to last
    Reorder {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Manage a task's checklist
    Checklist {
        #[command(subcommand)]
        command: ChecklistCommands,
    },
    /// Manage projects
    Project {
        #[command(subcommand)]
        command: ProjectCommands,
    },
    /// Manage areas
    Area {
        #[command(subcommand)]
        command: AreaCommands,
    },
    /// Manage tags
    Tag {
        #[command(subcommand)]
        command: TagCommands,
    },
    /// Switch the remembered current view
    View {
        view: String,
        /// Project, area or tag for scoped views
        scope: Option<String>,
    },
    /// Set the remembered search query (empty clears it)
    Search { query: Option<String> },
    /// Permanently delete all completed tasks
    ClearCompleted,
    /// Permanently delete all trashed tasks
    EmptyTrash,
    /// Reset the database (delete everything)
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
enum ChecklistCommands {
    /// Append an item
    Add { task: String, title: String },
    /// Check or uncheck an item
    Toggle { task: String, item: String },
    /// Rename an item
    Edit { task: String, item: String, title: String },
    /// Remove an item
    Remove { task: String, item: String },
}

#[derive(Subcommand)]
enum ProjectCommands {
    /// Add a new project
    Add {
        title: String,
        #[arg(short, long)]
        notes: Option<String>,
        /// Area id prefix or title
        #[arg(short, long)]
        area: Option<String>,
        /// Deadline in YYYY-MM-DD
        #[arg(short, long)]
        deadline: Option<String>,
    },
    /// List projects
    List {
        /// Include completed projects
        #[arg(short, long)]
        all: bool,
    },
    /// Edit a project
    Edit {
        project: String,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long)]
        notes: Option<String>,
        #[arg(short, long)]
        area: Option<String>,
        #[arg(short, long)]
        deadline: Option<String>,
    },
    /// Mark a project as complete
    Complete { project: String },
    /// Remove a project (its tasks are kept)
    Remove { project: String },
}

#[derive(Subcommand)]
enum AreaCommands {
    /// Add a new area
    Add { title: String },
    /// List areas
    List,
    /// Rename an area
    Rename { area: String, title: String },
    /// Remove an area (its tasks and projects are kept)
    Remove { area: String },
}

#[derive(Subcommand)]
enum TagCommands {
    /// Add a new tag
    Add {
        name: String,
        /// Color as #RRGGBB; picked from the palette if omitted
        #[arg(short, long)]
        color: Option<String>,
    },
    /// List tags
    List,
    /// Edit a tag
    Edit {
        tag: String,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        color: Option<String>,
    },
    /// Remove a tag from everything and delete it
    Remove { tag: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let storage = JsonFileStorage::at_default_location();

    match cli.command {
        Some(Commands::Ui) | None => {
            logging::init_file(&storage.path().with_file_name("gtdust.log"));
            let store = Store::open(storage);
            return tui::run_tui(store);
        }
        Some(Commands::Reset { force }) => {
            logging::init_stderr();
            return cmd_reset(&storage, force);
        }
        Some(Commands::Completions { shell }) => {
            let shell_enum = match shell.as_str() {
                "bash" => Shell::Bash,
                "zsh" => Shell::Zsh,
                "fish" => Shell::Fish,
                "powershell" => Shell::PowerShell,
                "elvish" => Shell::Elvish,
                _ => bail!("Unsupported shell: {}", shell),
            };
            let mut cmd = Cli::command();
            generate(shell_enum, &mut cmd, "gtdust", &mut io::stdout());
            return Ok(());
        }
        Some(command) => {
            logging::init_stderr();
            let mut store = Store::open(storage);
            run(command, &mut store)
        }
    }
}

fn run(command: Commands, store: &mut Store) -> Result<()> {
    match command {
        Commands::Add { title, input } => cmd_add(store, title, input, false).map(|_| ()),
        Commands::List { view, scope, search } => cmd_list(store, view.as_deref(), scope.as_deref(), search.as_deref()),
        Commands::Show { id } => cmd_show(store, &id),
        Commands::Edit { id, edit } => cmd_edit(store, &id, edit, false),
        Commands::Complete { id } => cmd_complete(store, &id, false),
        Commands::Uncomplete { id } => cmd_uncomplete(store, &id, false),
        Commands::Trash { id } => cmd_trash(store, &id, false),
        Commands::Restore { id } => cmd_restore(store, &id, false),
        Commands::Delete { id } => cmd_delete(store, &id, false),
        Commands::Reorder { ids } => cmd_reorder(store, &ids, false),
        Commands::Checklist { command } => match command {
            ChecklistCommands::Add { task, title } => cmd_checklist_add(store, &task, &title, false).map(|_| ()),
            ChecklistCommands::Toggle { task, item } => cmd_checklist_toggle(store, &task, &item, false),
            ChecklistCommands::Edit { task, item, title } => cmd_checklist_edit(store, &task, &item, title, false),
            ChecklistCommands::Remove { task, item } => cmd_checklist_remove(store, &task, &item, false),
        },
        Commands::Project { command } => match command {
            ProjectCommands::Add { title, notes, area, deadline } => {
                cmd_project_add(store, title, notes, area.as_deref(), deadline.as_deref(), false).map(|_| ())
            }
            ProjectCommands::List { all } => {
                cmd_project_list(store, all);
                Ok(())
            }
            ProjectCommands::Edit { project, title, notes, area, deadline } => {
                cmd_project_edit(store, &project, title, notes, area.as_deref(), deadline.as_deref(), false)
            }
            ProjectCommands::Complete { project } => cmd_project_complete(store, &project, false),
            ProjectCommands::Remove { project } => cmd_project_remove(store, &project, false),
        },
        Commands::Area { command } => match command {
            AreaCommands::Add { title } => {
                cmd_area_add(store, &title, false);
                Ok(())
            }
            AreaCommands::List => {
                cmd_area_list(store);
                Ok(())
            }
            AreaCommands::Rename { area, title } => cmd_area_rename(store, &area, title, false),
            AreaCommands::Remove { area } => cmd_area_remove(store, &area, false),
        },
        Commands::Tag { command } => match command {
            TagCommands::Add { name, color } => cmd_tag_add(store, &name, color, false).map(|_| ()),
            TagCommands::List => {
                cmd_tag_list(store);
                Ok(())
            }
            TagCommands::Edit { tag, name, color } => cmd_tag_edit(store, &tag, name, color, false),
            TagCommands::Remove { tag } => cmd_tag_remove(store, &tag, false),
        },
        Commands::View { view, scope } => cmd_view(store, &view, scope.as_deref(), false),
        Commands::Search { query } => {
            cmd_search(store, query.as_deref().unwrap_or(""), false);
            Ok(())
        }
        Commands::ClearCompleted => {
            cmd_clear_completed(store, false);
            Ok(())
        }
        Commands::EmptyTrash => {
            cmd_empty_trash(store, false);
            Ok(())
        }
        Commands::Reset { .. } | Commands::Completions { .. } | Commands::Ui => Ok(()),
    }
}
