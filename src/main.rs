//! # TB - Team Board
//!
//! A terminal team board: employees, the projects they are assigned to, and
//! the tasks of those projects laid out on a five-column kanban board.
//!
//! ## Key Features
//!
//! - **Employees**: name, position, unique email and an embedded profile image
//! - **Projects**: date range, logo and the team assigned to it
//! - **Tasks**: belong to a project, carry an ETA inside the project's range and
//!   are assigned to members of that project's team
//! - **Kanban Dashboard**: Need to Do, In Progress, Need for Test, Completed and
//!   Re-open columns; moving a card between columns changes the task's status
//! - **Two Interfaces**: a CLI for scripting and a TUI for day-to-day use
//!
//! ## Quick Start
//!
//! ```bash
//! # Launch the TUI on the dashboard
//! tb ui
//!
//! # Or straight onto the project list
//! tb ui --route /dashboard/projects
//!
//! # Add an employee from the command line
//! tb employee add --name "Asha" --position "Engineer" --email asha@example.com --image asha.png
//!
//! # Print the board and move a card
//! tb board
//! tb move 1718000000000 --to inprogress
//! ```
//!
//! Data is stored in `~/.teamboard/` as `employees.json`, `projects.json` and
//! `tasks.json`, next to an optional `config.yaml`. Use `--data-dir` to work on
//! another board.

use clap::Parser;

pub mod board;
pub mod cli;
pub mod cmd;
pub mod config;
pub mod employee;
pub mod fields;
pub mod forms;
pub mod logging;
pub mod media;
pub mod project;
pub mod routes;
pub mod storage;
pub mod store;
pub mod task;
pub mod validation;
pub mod workspace;
pub mod tui {
    pub mod app;
    pub mod colors;
    pub mod dashboard;
    pub mod enums;
    pub mod form;
    pub mod input;
    pub mod run;
    pub mod utils;
}

use cli::Cli;
use cmd::*;
use config::Config;
use logging::LogTarget;
use storage::FileStorage;
use workspace::Workspace;

fn main() {
    let cli = Cli::parse();

    // Completions need neither data nor logging.
    if let Commands::Completions { shell } = cli.command {
        cmd_completions(shell);
        return;
    }

    let data_dir = cli.data_dir.clone().unwrap_or_else(config::default_data_dir);
    let config = Config::load_from_dir(&data_dir).unwrap_or_else(|e| {
        eprintln!("Warning: {e}; using default settings");
        Config::default()
    });

    // The TUI owns the terminal, so its diagnostics go to a file.
    let target = match cli.command {
        Commands::Ui { .. } => LogTarget::File(config.log_path(&data_dir)),
        _ => LogTarget::Stderr,
    };
    if let Err(e) = logging::init(&target, cli.log_level.unwrap_or(config.log_level)) {
        eprintln!("Warning: logging disabled: {e}");
    }

    let mut ws = Workspace::load(FileStorage::new(&data_dir));

    match cli.command {
        Commands::Ui { route } => cmd_ui(&mut ws, route.unwrap_or(config.start_route)),
        Commands::Employee { action } => cmd_employee(&mut ws, action),
        Commands::Project { action } => cmd_project(&mut ws, action),
        Commands::Task { action } => cmd_task(&mut ws, action),
        Commands::Board { project } => cmd_board(&ws, project),
        Commands::Move { task_id, to, index, project } => cmd_move(&mut ws, task_id, to, index, project),
        Commands::Completions { shell } => cmd_completions(shell),
    }
}
