//! Form submission for employees, projects and tasks.
//!
//! Both the CLI and the terminal UI collect field values into `FormValues`
//! and hand them to the `submit_*` functions here. A submission validates
//! against the form's schema, runs the checks that live outside the schema,
//! converts file inputs, then adds or updates the record.

use thiserror::Error;
use tracing::{debug, info};

use crate::employee::{email_taken, Employee};
use crate::fields::Status;
use crate::media::{to_data_url, MediaError};
use crate::project::Project;
use crate::task::{Task, TaskPatch};
use crate::validation::{self, FieldError, FormValues, ValidationErrors, DATE_FORMAT};
use crate::workspace::Workspace;

#[derive(Debug, Error)]
pub enum FormError {
    #[error("{0}")]
    Invalid(#[from] ValidationErrors),
    #[error("Email ID already exists. Please use a different email.")]
    DuplicateEmail,
    #[error("No valid employees selected for this project")]
    NoValidEmployees,
    #[error("ETA must fall between {start} and {end}")]
    EtaOutOfRange { start: String, end: String },
    #[error("Project '{0}' not found")]
    UnknownProject(String),
    #[error("Employee '{0}' not found")]
    UnknownEmployee(String),
    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },
    #[error(transparent)]
    Media(#[from] MediaError),
}

/// Whether a form creates a record or edits an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(String),
}

impl FormMode {
    fn edit_id(&self) -> Option<&str> {
        match self {
            FormMode::Create => None,
            FormMode::Edit(id) => Some(id),
        }
    }
}

/// Submit the employee form. Returns the employee's identifier.
pub fn submit_employee(ws: &mut Workspace, mode: &FormMode, values: &FormValues) -> Result<String, FormError> {
    use validation::employee::*;

    validation::employee::schema().validate(values)?;

    let email = values.text_of(EMAIL);
    if email_taken(ws.employees.list(), email, mode.edit_id()) {
        debug!(%email, "rejected duplicate employee email");
        return Err(FormError::DuplicateEmail);
    }

    let image_url = match values.file_of(IMAGE_FILE) {
        Some(file) => to_data_url(file)?,
        None => String::new(),
    };

    let employee = Employee {
        id: mode.edit_id().unwrap_or_default().to_string(),
        name: values.text_of(NAME).to_string(),
        position: values.text_of(POSITION).to_string(),
        email: email.to_string(),
        image_url,
    };

    match mode {
        FormMode::Create => Ok(ws.employees.add(employee)),
        FormMode::Edit(id) => {
            if !ws.employees.update(employee) {
                return Err(FormError::NotFound { kind: "Employee", id: id.clone() });
            }
            Ok(id.clone())
        }
    }
}

/// Submit the project form. Assigned employees are copied from the employee store.
pub fn submit_project(ws: &mut Workspace, mode: &FormMode, values: &FormValues) -> Result<String, FormError> {
    use validation::project::*;

    validation::project::schema().validate(values)?;

    let selected = values.selection_of(ASSIGNED_EMPLOYEES);
    if let Some(unknown) = selected.iter().find(|id| ws.employees.get(id).is_none()) {
        return Err(FormError::UnknownEmployee(unknown.clone()));
    }
    // Store order, not selection order.
    let assigned: Vec<Employee> = ws
        .employees
        .list()
        .iter()
        .filter(|e| selected.contains(&e.id))
        .cloned()
        .collect();

    let previous_logo = match mode {
        FormMode::Create => None,
        FormMode::Edit(id) => match ws.projects.get(id) {
            Some(existing) => existing.logo_url.clone(),
            None => return Err(FormError::NotFound { kind: "Project", id: id.clone() }),
        },
    };
    let logo_url = values.file_of(LOGO_FILE).map(|file| ws.object_urls.create(file));

    let start_date = values.date_of(START_DATE).ok_or_else(|| invalid(START_DATE, "Start date is required"))?;
    let end_date = values.date_of(END_DATE).ok_or_else(|| invalid(END_DATE, "End date is required"))?;

    let project = Project {
        id: mode.edit_id().unwrap_or_default().to_string(),
        title: values.text_of(TITLE).to_string(),
        description: values.text_of(DESCRIPTION).to_string(),
        start_date,
        end_date,
        logo_url,
        assigned_employees: assigned,
    };

    match mode {
        FormMode::Create => Ok(ws.projects.add(project)),
        FormMode::Edit(id) => {
            if !ws.projects.update(project) {
                return Err(FormError::NotFound { kind: "Project", id: id.clone() });
            }
            // The replaced logo is no longer referenced by this project.
            if let Some(url) = previous_logo {
                ws.object_urls.revoke(&url);
            }
            Ok(id.clone())
        }
    }
}

/// Submit the task form. New tasks start in `todo`; edits keep the current status.
pub fn submit_task(ws: &mut Workspace, mode: &FormMode, values: &FormValues) -> Result<String, FormError> {
    use validation::task::*;

    validation::task::schema().validate(values)?;

    let project_id = values.text_of(PROJECT_ID);
    let project = ws
        .projects
        .get(project_id)
        .cloned()
        .ok_or_else(|| FormError::UnknownProject(project_id.to_string()))?;

    let selected = values.selection_of(EMPLOYEE_IDS);
    let employees: Vec<Employee> = project
        .assigned_employees
        .iter()
        .filter(|e| selected.contains(&e.id))
        .cloned()
        .collect();
    if employees.is_empty() {
        return Err(FormError::NoValidEmployees);
    }

    let eta = values.date_of(ETA).ok_or_else(|| invalid(ETA, "ETA is required"))?;
    if !project.covers(eta) {
        return Err(FormError::EtaOutOfRange {
            start: project.start_date.format(DATE_FORMAT).to_string(),
            end: project.end_date.format(DATE_FORMAT).to_string(),
        });
    }

    let image_url = match values.file_of(IMAGE_FILE) {
        Some(file) => to_data_url(file)?,
        None => String::new(),
    };

    match mode {
        FormMode::Create => {
            let task = Task {
                id: String::new(),
                project,
                title: values.text_of(TITLE).to_string(),
                description: values.text_of(DESCRIPTION).to_string(),
                employees,
                eta,
                image_url,
                status: Status::Todo,
            };
            Ok(ws.tasks.add(task))
        }
        FormMode::Edit(id) => {
            let patch = TaskPatch {
                project: Some(project),
                title: Some(values.text_of(TITLE).to_string()),
                description: Some(values.text_of(DESCRIPTION).to_string()),
                employees: Some(employees),
                eta: Some(eta),
                image_url: Some(image_url),
                status: None,
            };
            if !ws.tasks.merge(id, patch) {
                return Err(FormError::NotFound { kind: "Task", id: id.clone() });
            }
            info!(%id, "task edited");
            Ok(id.clone())
        }
    }
}

fn invalid(field: &'static str, message: &'static str) -> FormError {
    FormError::Invalid(ValidationErrors(vec![FieldError { field, message }]))
}

/// Form values pre-filled from an employee. File fields are left empty.
pub fn employee_values(employee: &Employee) -> FormValues {
    use validation::employee::*;
    FormValues::new()
        .text(NAME, employee.name.clone())
        .text(POSITION, employee.position.clone())
        .text(EMAIL, employee.email.clone())
}

/// Form values pre-filled from a project. File fields are left empty.
/// Assigned employees no longer in `employees` are left out of the selection.
pub fn project_values(project: &Project, employees: &[Employee]) -> FormValues {
    use validation::project::*;
    FormValues::new()
        .text(TITLE, project.title.clone())
        .text(DESCRIPTION, project.description.clone())
        .text(START_DATE, project.start_date.format(DATE_FORMAT).to_string())
        .text(END_DATE, project.end_date.format(DATE_FORMAT).to_string())
        .selection(
            ASSIGNED_EMPLOYEES,
            project
                .assigned_employees
                .iter()
                .filter(|assigned| employees.iter().any(|e| e.id == assigned.id))
                .map(|e| e.id.clone())
                .collect(),
        )
}

/// Form values pre-filled from a task. File fields are left empty.
pub fn task_values(task: &Task) -> FormValues {
    use validation::task::*;
    FormValues::new()
        .text(PROJECT_ID, task.project.id.clone())
        .text(TITLE, task.title.clone())
        .text(DESCRIPTION, task.description.clone())
        .selection(EMPLOYEE_IDS, task.employees.iter().map(|e| e.id.clone()).collect())
        .text(ETA, task.eta.format(DATE_FORMAT).to_string())
}

#[cfg(test)]
pub(crate) mod tests {
    use std::path::{Path, PathBuf};

    use super::*;
    use crate::media::FileInput;
    use crate::storage::MemoryStorage;

    pub(crate) fn image(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, b"\x89PNG").unwrap();
        path
    }

    pub(crate) fn employee_form(dir: &Path, name: &str, email: &str) -> FormValues {
        use validation::employee::*;
        FormValues::new()
            .text(NAME, name)
            .text(POSITION, "Engineer")
            .text(EMAIL, email)
            .file(IMAGE_FILE, Some(FileInput::from_path(image(dir, "face.png"))))
    }

    pub(crate) fn project_form(dir: &Path, employee_ids: Vec<String>) -> FormValues {
        use validation::project::*;
        FormValues::new()
            .text(TITLE, "Atlas")
            .text(DESCRIPTION, "Mapping service")
            .file(LOGO_FILE, Some(FileInput::from_path(image(dir, "logo.png"))))
            .text(START_DATE, "2025-01-01")
            .text(END_DATE, "2025-03-01")
            .selection(ASSIGNED_EMPLOYEES, employee_ids)
    }

    pub(crate) fn task_form(dir: &Path, project_id: &str, employee_ids: Vec<String>, eta: &str) -> FormValues {
        use validation::task::*;
        FormValues::new()
            .text(PROJECT_ID, project_id)
            .text(TITLE, "Draw map")
            .text(DESCRIPTION, "First draft")
            .selection(EMPLOYEE_IDS, employee_ids)
            .text(ETA, eta)
            .file(IMAGE_FILE, Some(FileInput::from_path(image(dir, "ref.png"))))
    }

    #[test]
    fn test_add_employee_embeds_image() {
        let dir = tempfile::tempdir().unwrap();
        let mut ws = Workspace::load(MemoryStorage::new());
        let id = submit_employee(&mut ws, &FormMode::Create, &employee_form(dir.path(), "Asha", "a@x.io")).unwrap();
        let emp = ws.employees.get(&id).unwrap();
        assert_eq!(emp.name, "Asha");
        assert!(emp.image_url.starts_with("data:image/png;base64,"));
    }

    #[test]
    fn test_duplicate_email_is_rejected_and_store_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let mut ws = Workspace::load(MemoryStorage::new());
        submit_employee(&mut ws, &FormMode::Create, &employee_form(dir.path(), "Asha", "a@x.io")).unwrap();
        let before = ws.employees.list().to_vec();

        let err = submit_employee(&mut ws, &FormMode::Create, &employee_form(dir.path(), "Bo", "a@x.io")).unwrap_err();
        assert!(matches!(err, FormError::DuplicateEmail));
        assert_eq!(ws.employees.list(), before.as_slice());
    }

    #[test]
    fn test_editing_employee_may_keep_own_email() {
        let dir = tempfile::tempdir().unwrap();
        let mut ws = Workspace::load(MemoryStorage::new());
        let id = submit_employee(&mut ws, &FormMode::Create, &employee_form(dir.path(), "Asha", "a@x.io")).unwrap();
        let edited = employee_form(dir.path(), "Asha K", "a@x.io");
        submit_employee(&mut ws, &FormMode::Edit(id.clone()), &edited).unwrap();
        assert_eq!(ws.employees.len(), 1);
        assert_eq!(ws.employees.get(&id).unwrap().name, "Asha K");
    }

    #[test]
    fn test_invalid_employee_form_blocks_submission() {
        let mut ws = Workspace::load(MemoryStorage::new());
        let err = submit_employee(&mut ws, &FormMode::Create, &FormValues::new()).unwrap_err();
        let FormError::Invalid(errors) = err else { panic!("expected validation failure") };
        assert_eq!(errors.0.len(), 4);
        assert!(ws.employees.is_empty());
    }

    #[test]
    fn test_project_snapshots_assigned_employees() {
        let dir = tempfile::tempdir().unwrap();
        let mut ws = Workspace::load(MemoryStorage::new());
        let a = submit_employee(&mut ws, &FormMode::Create, &employee_form(dir.path(), "Asha", "a@x.io")).unwrap();
        let b = submit_employee(&mut ws, &FormMode::Create, &employee_form(dir.path(), "Bo", "b@x.io")).unwrap();

        let pid = submit_project(&mut ws, &FormMode::Create, &project_form(dir.path(), vec![b.clone(), a.clone()])).unwrap();
        let project = ws.projects.get(&pid).unwrap().clone();
        let names: Vec<&str> = project.assigned_employees.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Asha", "Bo"]);
        let logo = project.logo_url.as_deref().unwrap();
        assert!(ws.object_urls.resolve(logo).is_some());

        // Renaming the employee does not reach the project's copy.
        submit_employee(&mut ws, &FormMode::Edit(a.clone()), &employee_form(dir.path(), "Asha K", "a@x.io")).unwrap();
        assert_eq!(ws.projects.get(&pid).unwrap().assigned(&a).unwrap().name, "Asha");
    }

    #[test]
    fn test_project_with_unknown_employee_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut ws = Workspace::load(MemoryStorage::new());
        let err = submit_project(&mut ws, &FormMode::Create, &project_form(dir.path(), vec!["42".into()])).unwrap_err();
        assert!(matches!(err, FormError::UnknownEmployee(id) if id == "42"));
        assert!(ws.projects.is_empty());
    }

    fn staffed_project(ws: &mut Workspace, dir: &Path) -> (String, String) {
        let emp = submit_employee(ws, &FormMode::Create, &employee_form(dir, "Asha", "a@x.io")).unwrap();
        let pid = submit_project(ws, &FormMode::Create, &project_form(dir, vec![emp.clone()])).unwrap();
        (pid, emp)
    }

    #[test]
    fn test_task_created_in_todo_with_project_copy() {
        let dir = tempfile::tempdir().unwrap();
        let mut ws = Workspace::load(MemoryStorage::new());
        let (pid, emp) = staffed_project(&mut ws, dir.path());

        let tid = submit_task(&mut ws, &FormMode::Create, &task_form(dir.path(), &pid, vec![emp], "2025-02-01")).unwrap();
        let task = ws.tasks.get(&tid).unwrap();
        assert_eq!(task.status, Status::Todo);
        assert_eq!(task.project.id, pid);
        assert_eq!(task.assignee_names(), "Asha");
        assert!(task.image_url.starts_with("data:image/png;base64,"));
    }

    #[test]
    fn test_task_employees_must_belong_to_project() {
        let dir = tempfile::tempdir().unwrap();
        let mut ws = Workspace::load(MemoryStorage::new());
        let (pid, _) = staffed_project(&mut ws, dir.path());
        let outsider = submit_employee(&mut ws, &FormMode::Create, &employee_form(dir.path(), "Bo", "b@x.io")).unwrap();

        let err = submit_task(&mut ws, &FormMode::Create, &task_form(dir.path(), &pid, vec![outsider], "2025-02-01")).unwrap_err();
        assert!(matches!(err, FormError::NoValidEmployees));
        assert!(ws.tasks.is_empty());
    }

    #[test]
    fn test_task_eta_outside_project_dates() {
        let dir = tempfile::tempdir().unwrap();
        let mut ws = Workspace::load(MemoryStorage::new());
        let (pid, emp) = staffed_project(&mut ws, dir.path());
        let err = submit_task(&mut ws, &FormMode::Create, &task_form(dir.path(), &pid, vec![emp], "2026-01-01")).unwrap_err();
        assert!(matches!(err, FormError::EtaOutOfRange { .. }));
    }

    #[test]
    fn test_task_unknown_project() {
        let dir = tempfile::tempdir().unwrap();
        let mut ws = Workspace::load(MemoryStorage::new());
        let err = submit_task(&mut ws, &FormMode::Create, &task_form(dir.path(), "nope", vec!["1".into()], "2025-02-01")).unwrap_err();
        assert!(matches!(err, FormError::UnknownProject(_)));
    }

    #[test]
    fn test_task_edit_keeps_status() {
        let dir = tempfile::tempdir().unwrap();
        let mut ws = Workspace::load(MemoryStorage::new());
        let (pid, emp) = staffed_project(&mut ws, dir.path());
        let tid = submit_task(&mut ws, &FormMode::Create, &task_form(dir.path(), &pid, vec![emp.clone()], "2025-02-01")).unwrap();
        ws.tasks.merge(&tid, TaskPatch::status(Status::NeedTest));

        let edited = task_form(dir.path(), &pid, vec![emp], "2025-02-15").text(validation::task::TITLE, "Redraw map");
        submit_task(&mut ws, &FormMode::Edit(tid.clone()), &edited).unwrap();
        let task = ws.tasks.get(&tid).unwrap();
        assert_eq!(task.title, "Redraw map");
        assert_eq!(task.status, Status::NeedTest);
    }

    #[test]
    fn test_prefilled_values_round_trip_through_edit() {
        let dir = tempfile::tempdir().unwrap();
        let mut ws = Workspace::load(MemoryStorage::new());
        let (pid, _) = staffed_project(&mut ws, dir.path());
        let project = ws.projects.get(&pid).unwrap().clone();

        let values = project_values(&project, ws.employees.list())
            .file(validation::project::LOGO_FILE, Some(FileInput::from_path(image(dir.path(), "new.png"))));
        submit_project(&mut ws, &FormMode::Edit(pid.clone()), &values).unwrap();
        let updated = ws.projects.get(&pid).unwrap();
        assert_eq!(updated.title, project.title);
        assert_eq!(updated.assigned_employees, project.assigned_employees);
        assert_ne!(updated.logo_url, project.logo_url);
        assert!(ws.object_urls.resolve(updated.logo_url.as_deref().unwrap()).is_some());
        assert!(ws.object_urls.resolve(project.logo_url.as_deref().unwrap()).is_none());
    }

    #[test]
    fn test_project_edit_after_team_member_deleted() {
        let dir = tempfile::tempdir().unwrap();
        let mut ws = Workspace::load(MemoryStorage::new());
        let a = submit_employee(&mut ws, &FormMode::Create, &employee_form(dir.path(), "Asha", "a@x.io")).unwrap();
        let b = submit_employee(&mut ws, &FormMode::Create, &employee_form(dir.path(), "Bo", "b@x.io")).unwrap();
        let pid = submit_project(&mut ws, &FormMode::Create, &project_form(dir.path(), vec![a.clone(), b.clone()])).unwrap();
        assert!(ws.employees.delete(&b));

        let project = ws.projects.get(&pid).unwrap().clone();
        let values = project_values(&project, ws.employees.list())
            .text(validation::project::TITLE, "Atlas 2")
            .file(validation::project::LOGO_FILE, Some(FileInput::from_path(image(dir.path(), "new.png"))));
        assert_eq!(values.selection_of(validation::project::ASSIGNED_EMPLOYEES), [a.clone()]);

        submit_project(&mut ws, &FormMode::Edit(pid.clone()), &values).unwrap();
        let updated = ws.projects.get(&pid).unwrap();
        assert_eq!(updated.title, "Atlas 2");
        assert_eq!(updated.assigned_employees.len(), 1);
        assert_eq!(updated.assigned_employees[0].id, a);
    }
}
