//! Command implementations for the CLI interface.
//!
//! Each subcommand loads what it needs from the workspace, submits through
//! the same form layer as the terminal UI, and prints a short result. Errors
//! go to stderr with exit status 1.

use std::path::PathBuf;

use clap::Subcommand;
use clap_complete::{generate, Shell};

use crate::board::{BoardView, DragEnd, Location};
use crate::fields::Status;
use crate::forms::{
    employee_values, project_values, submit_employee, submit_project, submit_task, task_values, FormError,
    FormMode,
};
use crate::media::FileInput;
use crate::routes::Route;
use crate::task::Task;
use crate::tui::run::run_tui;
use crate::validation::{self, FormValues, DATE_FORMAT};
use crate::workspace::Workspace;

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the terminal user interface.
    Ui {
        /// Screen to open on: /dashboard, /dashboard/employees, /dashboard/projects, /dashboard/tasks.
        #[arg(long)]
        route: Option<Route>,
    },

    /// Manage employees.
    Employee {
        #[command(subcommand)]
        action: EmployeeAction,
    },

    /// Manage projects.
    Project {
        #[command(subcommand)]
        action: ProjectAction,
    },

    /// Manage tasks.
    Task {
        #[command(subcommand)]
        action: TaskAction,
    },

    /// Print the kanban board.
    Board {
        /// Only show tasks of this project.
        #[arg(long)]
        project: Option<String>,
    },

    /// Move a task to another status column.
    Move {
        /// Task ID.
        task_id: String,
        /// Destination column: todo | inprogress | needtest | completed | reopen.
        #[arg(long, value_enum)]
        to: Status,
        /// Position in the destination column. Defaults to the end.
        #[arg(long)]
        index: Option<usize>,
        /// Board filter the index refers to.
        #[arg(long)]
        project: Option<String>,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum EmployeeAction {
    /// List employees.
    List,
    /// Add an employee.
    Add {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        position: Option<String>,
        #[arg(long)]
        email: Option<String>,
        /// Profile image (png, jpg, gif).
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Edit an employee. Unspecified text fields keep their value; the image must be given again.
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        position: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Delete an employee.
    Delete { id: String },
}

#[derive(Subcommand)]
pub enum ProjectAction {
    /// List projects.
    List,
    /// Add a project.
    Add {
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Logo image (png, jpg, gif).
        #[arg(long)]
        logo: Option<PathBuf>,
        /// Start date, YYYY-MM-DD.
        #[arg(long)]
        start: Option<String>,
        /// End date, YYYY-MM-DD.
        #[arg(long)]
        end: Option<String>,
        /// Assigned employee IDs. May be repeated or comma-separated.
        #[arg(long = "employee", value_delimiter = ',')]
        employees: Vec<String>,
    },
    /// Edit a project. Unspecified text fields keep their value; the logo must be given again.
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        logo: Option<PathBuf>,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
        /// Replaces the assigned employees when given.
        #[arg(long = "employee", value_delimiter = ',')]
        employees: Vec<String>,
    },
    /// Delete a project. Tasks keep their copy of it.
    Delete { id: String },
}

#[derive(Subcommand)]
pub enum TaskAction {
    /// List tasks.
    List {
        /// Only tasks of this project.
        #[arg(long)]
        project: Option<String>,
    },
    /// Add a task. It starts in the todo column.
    Add {
        /// Project ID.
        #[arg(long)]
        project: Option<String>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Employee IDs, must be assigned to the project. May be repeated or comma-separated.
        #[arg(long = "employee", value_delimiter = ',')]
        employees: Vec<String>,
        /// ETA, YYYY-MM-DD, within the project's dates.
        #[arg(long)]
        eta: Option<String>,
        /// Reference image (png, jpg, gif).
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Edit a task. Status is kept; the image must be given again.
    Update {
        id: String,
        #[arg(long)]
        project: Option<String>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long = "employee", value_delimiter = ',')]
        employees: Vec<String>,
        #[arg(long)]
        eta: Option<String>,
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Delete a task.
    Delete { id: String },
}

/// Launch the terminal user interface.
pub fn cmd_ui(ws: &mut Workspace, route: Route) {
    if let Err(e) = run_tui(ws, route) {
        eprintln!("UI error: {e}");
        std::process::exit(1);
    }
}

/// Print a form error, one line per failing field, and exit.
fn exit_with_form_error(e: FormError) -> ! {
    match e {
        FormError::Invalid(errors) => {
            eprintln!("Invalid input:");
            for err in &errors.0 {
                eprintln!("  {:<18} {}", err.field, err.message);
            }
        }
        other => eprintln!("Error: {other}"),
    }
    std::process::exit(1);
}

/// Overlay `Some` text values on a form.
fn with_text(mut values: FormValues, fields: &[(&'static str, Option<String>)]) -> FormValues {
    for (field, value) in fields {
        if let Some(v) = value {
            values = values.text(*field, v.clone());
        }
    }
    values
}

fn with_selection(values: FormValues, field: &'static str, ids: Vec<String>) -> FormValues {
    if ids.is_empty() {
        values
    } else {
        values.selection(field, ids)
    }
}

pub fn cmd_employee(ws: &mut Workspace, action: EmployeeAction) {
    use validation::employee::*;

    match action {
        EmployeeAction::List => {
            println!("{:<14} {:<20} {:<16} {:<26} {}", "ID", "Name", "Position", "Email", "Image");
            for e in ws.employees.list() {
                println!(
                    "{:<14} {:<20} {:<16} {:<26} {}",
                    e.id,
                    truncate(&e.name, 20),
                    truncate(&e.position, 16),
                    truncate(&e.email, 26),
                    if e.image_url.is_empty() { "-" } else { "yes" }
                );
            }
        }
        EmployeeAction::Add { name, position, email, image } => {
            let values = with_text(FormValues::new(), &[(NAME, name), (POSITION, position), (EMAIL, email)])
                .file(IMAGE_FILE, image.map(FileInput::from_path));
            match submit_employee(ws, &FormMode::Create, &values) {
                Ok(id) => println!("Added employee {id}"),
                Err(e) => exit_with_form_error(e),
            }
        }
        EmployeeAction::Update { id, name, position, email, image } => {
            let Some(existing) = ws.employees.get(&id) else {
                eprintln!("Employee {id} not found.");
                std::process::exit(1);
            };
            let values = with_text(employee_values(existing), &[(NAME, name), (POSITION, position), (EMAIL, email)])
                .file(IMAGE_FILE, image.map(FileInput::from_path));
            match submit_employee(ws, &FormMode::Edit(id), &values) {
                Ok(id) => println!("Updated employee {id}"),
                Err(e) => exit_with_form_error(e),
            }
        }
        EmployeeAction::Delete { id } => {
            if !ws.employees.delete(&id) {
                eprintln!("Employee {id} not found.");
                std::process::exit(1);
            }
            println!("Deleted.");
        }
    }
}

pub fn cmd_project(ws: &mut Workspace, action: ProjectAction) {
    use validation::project::*;

    match action {
        ProjectAction::List => {
            println!("{:<14} {:<24} {:<10} {:<10} {:<12} {}", "ID", "Title", "Start", "End", "Logo", "Team");
            for p in ws.projects.list() {
                let logo = match &p.logo_url {
                    None => "-",
                    Some(url) if ws.object_urls.resolve(url).is_some() => "yes",
                    Some(_) => "unavailable",
                };
                let team: Vec<&str> = p.assigned_employees.iter().map(|e| e.name.as_str()).collect();
                println!(
                    "{:<14} {:<24} {:<10} {:<10} {:<12} {}",
                    p.id,
                    truncate(&p.title, 24),
                    p.start_date.format(DATE_FORMAT),
                    p.end_date.format(DATE_FORMAT),
                    logo,
                    team.join(", ")
                );
            }
        }
        ProjectAction::Add { title, description, logo, start, end, employees } => {
            let values = with_text(
                FormValues::new(),
                &[(TITLE, title), (DESCRIPTION, description), (START_DATE, start), (END_DATE, end)],
            )
            .selection(ASSIGNED_EMPLOYEES, employees)
            .file(LOGO_FILE, logo.map(FileInput::from_path));
            match submit_project(ws, &FormMode::Create, &values) {
                Ok(id) => println!("Added project {id}"),
                Err(e) => exit_with_form_error(e),
            }
        }
        ProjectAction::Update { id, title, description, logo, start, end, employees } => {
            let Some(existing) = ws.projects.get(&id) else {
                eprintln!("Project {id} not found.");
                std::process::exit(1);
            };
            let values = with_text(
                project_values(existing, ws.employees.list()),
                &[(TITLE, title), (DESCRIPTION, description), (START_DATE, start), (END_DATE, end)],
            );
            let values = with_selection(values, ASSIGNED_EMPLOYEES, employees)
                .file(LOGO_FILE, logo.map(FileInput::from_path));
            match submit_project(ws, &FormMode::Edit(id), &values) {
                Ok(id) => println!("Updated project {id}"),
                Err(e) => exit_with_form_error(e),
            }
        }
        ProjectAction::Delete { id } => {
            if !ws.delete_project(&id) {
                eprintln!("Project {id} not found.");
                std::process::exit(1);
            }
            println!("Deleted.");
        }
    }
}

pub fn cmd_task(ws: &mut Workspace, action: TaskAction) {
    use validation::task::*;

    match action {
        TaskAction::List { project } => {
            let tasks: Vec<&Task> = ws
                .tasks
                .list()
                .iter()
                .filter(|t| project.as_deref().map_or(true, |p| t.project.id == p))
                .collect();
            print_tasks(&tasks);
        }
        TaskAction::Add { project, title, description, employees, eta, image } => {
            let values = with_text(
                FormValues::new(),
                &[(PROJECT_ID, project), (TITLE, title), (DESCRIPTION, description), (ETA, eta)],
            )
            .selection(EMPLOYEE_IDS, employees)
            .file(IMAGE_FILE, image.map(FileInput::from_path));
            match submit_task(ws, &FormMode::Create, &values) {
                Ok(id) => println!("Added task {id}"),
                Err(e) => exit_with_form_error(e),
            }
        }
        TaskAction::Update { id, project, title, description, employees, eta, image } => {
            let Some(existing) = ws.tasks.get(&id) else {
                eprintln!("Task {id} not found.");
                std::process::exit(1);
            };
            let values = with_text(
                task_values(existing),
                &[(PROJECT_ID, project), (TITLE, title), (DESCRIPTION, description), (ETA, eta)],
            );
            let values = with_selection(values, EMPLOYEE_IDS, employees)
                .file(IMAGE_FILE, image.map(FileInput::from_path));
            match submit_task(ws, &FormMode::Edit(id), &values) {
                Ok(id) => println!("Updated task {id}"),
                Err(e) => exit_with_form_error(e),
            }
        }
        TaskAction::Delete { id } => {
            if !ws.tasks.delete(&id) {
                eprintln!("Task {id} not found.");
                std::process::exit(1);
            }
            println!("Deleted.");
        }
    }
}

/// Print the board, one block per status column.
pub fn cmd_board(ws: &Workspace, project: Option<String>) {
    if let Some(pid) = project.as_deref() {
        if ws.projects.get(pid).is_none() {
            eprintln!("Project {pid} not found.");
            std::process::exit(1);
        }
    }
    let view = BoardView::new(&ws.tasks, project);
    for column in view.board().columns() {
        println!("{} ({})", column.status.label(), column.items.len());
        for (i, t) in column.items.iter().enumerate() {
            println!(
                "  {:>2}. {:<14} {:<28} {:<10} {}",
                i,
                t.id,
                truncate(&t.title, 28),
                t.eta.format(DATE_FORMAT),
                t.assignee_names()
            );
        }
    }
}

/// Move a task between columns, the way a drop on the dashboard does.
pub fn cmd_move(ws: &mut Workspace, task_id: String, to: Status, index: Option<usize>, project: Option<String>) {
    let mut view = BoardView::new(&ws.tasks, project);
    let Some(source) = view.board().locate(&task_id) else {
        eprintln!("Task {task_id} not found on the board.");
        std::process::exit(1);
    };
    let Some(destination) = move_destination(&view, source, to, index) else {
        println!("Task {task_id} is already in {}.", to.label());
        return;
    };
    let drag = DragEnd { source, destination: Some(destination) };
    if !view.drag_end(&drag, &mut ws.tasks) {
        println!("Nothing to move.");
    } else if source.column == to {
        println!("Reordered {task_id} within {}. Column order is not saved.", to.label());
    } else {
        println!("Moved {task_id} to {}.", to.label());
    }
}

/// Drop target for `move`. Without an index the card goes to the end of the
/// destination column; a card already in that column has nowhere to go.
fn move_destination(view: &BoardView, source: Location, to: Status, index: Option<usize>) -> Option<Location> {
    match index {
        Some(index) => Some(Location::new(to, index)),
        None if source.column == to => None,
        None => Some(Location::new(to, view.board().column(to).items.len())),
    }
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) {
    use crate::cli::Cli;
    use clap::CommandFactory;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}

fn print_tasks(tasks: &[&Task]) {
    println!("{:<14} {:<14} {:<10} {:<18} {:<28} {}", "ID", "Status", "ETA", "Project", "Title", "Assignees");
    for t in tasks {
        println!(
            "{:<14} {:<14} {:<10} {:<18} {:<28} {}",
            t.id,
            t.status.label(),
            t.eta.format(DATE_FORMAT),
            truncate(&t.project.title, 18),
            truncate(&t.title, 28),
            t.assignee_names()
        );
    }
}

/// Truncate to `width` characters, ending with an ellipsis when cut.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}
