use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;
use crate::config::LogLevel;

/// Employees, projects and tasks on a kanban board.
/// Data lives in ~/.teamboard unless --data-dir says otherwise.
#[derive(Parser)]
#[command(name = "tb", version, about = "Team task board: employees, projects and a kanban of tasks")]
pub struct Cli {
    /// Directory holding employees.json, projects.json, tasks.json and config.yaml.
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Log level. Overrides config.yaml; RUST_LOG overrides both.
    #[arg(long, global = true, value_enum)]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Commands,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::{EmployeeAction, TaskAction};
    use crate::fields::Status;
    use crate::routes::Route;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_ui_route() {
        let cli = Cli::parse_from(["tb", "ui", "--route", "/dashboard/projects"]);
        assert!(matches!(cli.command, Commands::Ui { route: Some(Route::Projects) }));
        assert!(Cli::try_parse_from(["tb", "ui", "--route", "/nope"]).is_err());
    }

    #[test]
    fn test_parse_move() {
        let cli = Cli::parse_from(["tb", "--data-dir", "/tmp/x", "move", "17", "--to", "needtest"]);
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/x")));
        match cli.command {
            Commands::Move { task_id, to, index, project } => {
                assert_eq!(task_id, "17");
                assert_eq!(to, Status::NeedTest);
                assert_eq!(index, None);
                assert_eq!(project, None);
            }
            _ => panic!("expected move"),
        }
    }

    #[test]
    fn test_parse_nested_actions() {
        let cli = Cli::parse_from([
            "tb", "employee", "add", "--name", "Asha", "--position", "Dev", "--email", "a@x.io", "--image", "a.png",
        ]);
        assert!(matches!(cli.command, Commands::Employee { action: EmployeeAction::Add { .. } }));

        let cli = Cli::parse_from(["tb", "task", "list", "--project", "p1", "--log-level", "debug"]);
        assert_eq!(cli.log_level, Some(LogLevel::Debug));
        assert!(matches!(cli.command, Commands::Task { action: TaskAction::List { project: Some(_) } }));
    }
}
