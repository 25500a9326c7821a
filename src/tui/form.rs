//! Entity form handling for the terminal user interface.
//!
//! One `EntityForm` type backs the employee, project and task popups. Each
//! form is an ordered list of fields; text and file fields are edited in
//! place, choices cycle with Left/Right and multi-selects toggle with Space.
//! `values()` turns the form into `FormValues` for the submit functions, and
//! `set_error` spreads a submit error back over the fields.

use std::collections::{BTreeSet, HashMap};

use crate::employee::Employee;
use crate::forms::{FormError, FormMode};
use crate::media::FileInput;
use crate::project::Project;
use crate::task::Task;
use crate::tui::enums::EntityKind;
use crate::tui::input::InputField;
use crate::validation::{self, FormValues, DATE_FORMAT};

/// Editor for one field.
#[derive(Clone, Debug)]
pub enum FieldEditor {
    Text(InputField),
    /// Path typed by the user.
    File(InputField),
    /// One of `options` (id, label); `None` until something is picked.
    Choice { options: Vec<(String, String)>, selected: Option<usize> },
    /// Any subset of `options`.
    Multi { options: Vec<(String, String)>, cursor: usize, chosen: BTreeSet<String> },
}

#[derive(Clone, Debug)]
pub struct FormField {
    pub name: &'static str,
    pub label: &'static str,
    pub editor: FieldEditor,
}

impl FormField {
    fn text(name: &'static str, label: &'static str, value: &str) -> Self {
        FormField { name, label, editor: FieldEditor::Text(InputField::with_value(value)) }
    }

    fn file(name: &'static str, label: &'static str) -> Self {
        FormField { name, label, editor: FieldEditor::File(InputField::new()) }
    }

    fn multi(name: &'static str, label: &'static str, options: Vec<(String, String)>, chosen: BTreeSet<String>) -> Self {
        FormField { name, label, editor: FieldEditor::Multi { options, cursor: 0, chosen } }
    }

    /// Text shown in the field box.
    pub fn display(&self) -> String {
        match &self.editor {
            FieldEditor::Text(input) | FieldEditor::File(input) => input.value.clone(),
            FieldEditor::Choice { options, selected } => match selected.and_then(|i| options.get(i)) {
                Some((_, label)) => format!("< {label} >"),
                None if options.is_empty() => "(none available)".to_string(),
                None => "< select >".to_string(),
            },
            FieldEditor::Multi { options, cursor, chosen } => {
                if options.is_empty() {
                    return "(none available)".to_string();
                }
                options
                    .iter()
                    .enumerate()
                    .map(|(i, (id, label))| {
                        let mark = if chosen.contains(id) { "[x]" } else { "[ ]" };
                        let pointer = if i == *cursor { ">" } else { " " };
                        format!("{pointer}{mark} {label}")
                    })
                    .collect::<Vec<_>>()
                    .join("  ")
            }
        }
    }
}

/// Popup form for creating or editing one record.
pub struct EntityForm {
    pub kind: EntityKind,
    pub mode: FormMode,
    pub fields: Vec<FormField>,
    pub current_field: usize,
    /// Message per field name. Errors that belong to no field go under "".
    pub errors: HashMap<&'static str, String>,
    /// Projects offered by a task form, used to refill the employee choices.
    projects: Vec<Project>,
}

fn employee_options(employees: &[Employee]) -> Vec<(String, String)> {
    employees.iter().map(|e| (e.id.clone(), e.name.clone())).collect()
}

impl EntityForm {
    fn with_fields(kind: EntityKind, mode: FormMode, fields: Vec<FormField>) -> Self {
        EntityForm { kind, mode, fields, current_field: 0, errors: HashMap::new(), projects: Vec::new() }
    }

    /// Employee form, pre-filled when editing.
    pub fn employee(existing: Option<&Employee>) -> Self {
        use validation::employee::*;
        let (mode, name, position, email) = match existing {
            Some(e) => (FormMode::Edit(e.id.clone()), e.name.as_str(), e.position.as_str(), e.email.as_str()),
            None => (FormMode::Create, "", "", ""),
        };
        Self::with_fields(
            EntityKind::Employee,
            mode,
            vec![
                FormField::text(NAME, "Name", name),
                FormField::text(POSITION, "Position", position),
                FormField::text(EMAIL, "Email", email),
                FormField::file(IMAGE_FILE, "Profile image (path)"),
            ],
        )
    }

    /// Project form. `employees` are the choices for assignment.
    pub fn project(employees: &[Employee], existing: Option<&Project>) -> Self {
        use validation::project::*;
        let start = existing.map(|p| p.start_date.format(DATE_FORMAT).to_string()).unwrap_or_default();
        let end = existing.map(|p| p.end_date.format(DATE_FORMAT).to_string()).unwrap_or_default();
        let chosen = existing
            .map(|p| p.assigned_employees.iter().map(|e| e.id.clone()).collect())
            .unwrap_or_default();
        let mode = existing.map_or(FormMode::Create, |p| FormMode::Edit(p.id.clone()));
        Self::with_fields(
            EntityKind::Project,
            mode,
            vec![
                FormField::text(TITLE, "Title", existing.map_or("", |p| p.title.as_str())),
                FormField::text(DESCRIPTION, "Description", existing.map_or("", |p| p.description.as_str())),
                FormField::file(LOGO_FILE, "Logo (path)"),
                FormField::text(START_DATE, "Start date (YYYY-MM-DD)", &start),
                FormField::text(END_DATE, "End date (YYYY-MM-DD)", &end),
                FormField::multi(ASSIGNED_EMPLOYEES, "Assigned employees", employee_options(employees), chosen),
            ],
        )
    }

    /// Task form. Employee choices follow the selected project's team.
    pub fn task(projects: &[Project], existing: Option<&Task>) -> Self {
        use validation::task::*;
        let options = projects.iter().map(|p| (p.id.clone(), p.title.clone())).collect();
        let selected = existing.and_then(|t| projects.iter().position(|p| p.id == t.project.id));
        let chosen = existing
            .map(|t| t.employees.iter().map(|e| e.id.clone()).collect())
            .unwrap_or_default();
        let eta = existing.map(|t| t.eta.format(DATE_FORMAT).to_string()).unwrap_or_default();
        let mode = existing.map_or(FormMode::Create, |t| FormMode::Edit(t.id.clone()));
        let mut form = Self::with_fields(
            EntityKind::Task,
            mode,
            vec![
                FormField { name: PROJECT_ID, label: "Project", editor: FieldEditor::Choice { options, selected } },
                FormField::text(TITLE, "Title", existing.map_or("", |t| t.title.as_str())),
                FormField::text(DESCRIPTION, "Description", existing.map_or("", |t| t.description.as_str())),
                FormField::multi(EMPLOYEE_IDS, "Employees", Vec::new(), chosen),
                FormField::text(ETA, "ETA (YYYY-MM-DD)", &eta),
                FormField::file(IMAGE_FILE, "Reference image (path)"),
            ],
        );
        form.projects = projects.to_vec();
        form.refresh_task_employees();
        form
    }

    pub fn title(&self) -> String {
        let verb = match self.mode {
            FormMode::Create => "Add",
            FormMode::Edit(_) => "Edit",
        };
        format!("{verb} {}", self.kind.label())
    }

    pub fn next_field(&mut self) {
        self.current_field = (self.current_field + 1) % self.fields.len();
    }

    pub fn prev_field(&mut self) {
        self.current_field = self.current_field.checked_sub(1).unwrap_or(self.fields.len() - 1);
    }

    fn current(&mut self) -> &mut FieldEditor {
        &mut self.fields[self.current_field].editor
    }

    pub fn handle_char(&mut self, c: char) {
        match self.current() {
            FieldEditor::Text(input) | FieldEditor::File(input) => input.handle_char(c),
            FieldEditor::Multi { options, cursor, chosen } if c == ' ' => {
                if let Some((id, _)) = options.get(*cursor) {
                    if !chosen.remove(id) {
                        chosen.insert(id.clone());
                    }
                }
            }
            _ => {}
        }
    }

    pub fn handle_backspace(&mut self) {
        if let FieldEditor::Text(input) | FieldEditor::File(input) = self.current() {
            input.handle_backspace();
        }
    }

    pub fn handle_delete(&mut self) {
        if let FieldEditor::Text(input) | FieldEditor::File(input) = self.current() {
            input.handle_delete();
        }
    }

    /// Cursor movement in text, cycling in choices.
    pub fn handle_left_right(&mut self, right: bool) {
        let mut project_changed = false;
        match self.current() {
            FieldEditor::Text(input) | FieldEditor::File(input) => {
                if right { input.move_cursor_right() } else { input.move_cursor_left() }
            }
            FieldEditor::Choice { options, selected } => {
                if options.is_empty() {
                    return;
                }
                let len = options.len();
                *selected = Some(match (*selected, right) {
                    (None, true) => 0,
                    (None, false) => len - 1,
                    (Some(i), true) => (i + 1) % len,
                    (Some(i), false) => (i + len - 1) % len,
                });
                project_changed = true;
            }
            FieldEditor::Multi { options, cursor, .. } => {
                if options.is_empty() {
                    return;
                }
                let len = options.len();
                *cursor = if right { (*cursor + 1) % len } else { (*cursor + len - 1) % len };
            }
        }
        if project_changed && self.kind == EntityKind::Task {
            self.refresh_task_employees();
        }
    }

    /// Offer the selected project's assigned employees, keeping any still-valid picks.
    fn refresh_task_employees(&mut self) {
        let project_id = self.choice_id(validation::task::PROJECT_ID);
        let team: Vec<(String, String)> = project_id
            .and_then(|id| self.projects.iter().find(|p| p.id == id))
            .map(|p| employee_options(&p.assigned_employees))
            .unwrap_or_default();
        if let Some(FormField { editor: FieldEditor::Multi { options, cursor, chosen }, .. }) =
            self.fields.iter_mut().find(|f| f.name == validation::task::EMPLOYEE_IDS)
        {
            chosen.retain(|id| team.iter().any(|(tid, _)| tid == id));
            *options = team;
            *cursor = 0;
        }
    }

    fn choice_id(&self, name: &str) -> Option<String> {
        self.fields.iter().find(|f| f.name == name).and_then(|f| match &f.editor {
            FieldEditor::Choice { options, selected } => selected.and_then(|i| options.get(i)).map(|(id, _)| id.clone()),
            _ => None,
        })
    }

    /// Collect the form into submit values.
    pub fn values(&self) -> FormValues {
        self.fields.iter().fold(FormValues::new(), |values, field| match &field.editor {
            FieldEditor::Text(input) => values.text(field.name, input.value.clone()),
            FieldEditor::File(input) => {
                let path = input.value.trim();
                values.file(field.name, (!path.is_empty()).then(|| FileInput::from_path(path)))
            }
            FieldEditor::Choice { options, selected } => {
                let id = selected.and_then(|i| options.get(i)).map(|(id, _)| id.clone()).unwrap_or_default();
                values.text(field.name, id)
            }
            // Option order, so the selection is stable.
            FieldEditor::Multi { options, chosen, .. } => values.selection(
                field.name,
                options.iter().filter(|(id, _)| chosen.contains(id)).map(|(id, _)| id.clone()).collect(),
            ),
        })
    }

    /// Record a submit error against the fields it concerns.
    pub fn set_error(&mut self, error: &FormError) {
        self.errors.clear();
        match error {
            FormError::Invalid(errors) => {
                for e in &errors.0 {
                    self.errors.insert(e.field, e.message.to_string());
                }
            }
            FormError::DuplicateEmail => {
                self.errors.insert(validation::employee::EMAIL, error.to_string());
            }
            FormError::NoValidEmployees => {
                self.errors.insert(validation::task::EMPLOYEE_IDS, error.to_string());
            }
            FormError::EtaOutOfRange { .. } => {
                self.errors.insert(validation::task::ETA, error.to_string());
            }
            FormError::UnknownProject(_) => {
                self.errors.insert(validation::task::PROJECT_ID, error.to_string());
            }
            FormError::UnknownEmployee(_) => {
                self.errors.insert(validation::project::ASSIGNED_EMPLOYEES, error.to_string());
            }
            FormError::Media(_) => {
                let file_field = self.fields.iter().find(|f| matches!(f.editor, FieldEditor::File(_)));
                let name = file_field.map_or("", |f| f.name);
                self.errors.insert(name, error.to_string());
            }
            FormError::NotFound { .. } => {
                self.errors.insert("", error.to_string());
            }
        }
    }

    pub fn error_for(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::Status;
    use crate::task::tests::{sample_project, sample_task};
    use crate::validation::{FieldError, ValidationErrors};

    fn employee(id: &str, name: &str) -> Employee {
        Employee {
            id: id.into(),
            name: name.into(),
            position: "Dev".into(),
            email: format!("{id}@x.io"),
            image_url: String::new(),
        }
    }

    fn typed(form: &mut EntityForm, text: &str) {
        for c in text.chars() {
            form.handle_char(c);
        }
    }

    #[test]
    fn test_employee_form_collects_values() {
        use validation::employee::*;
        let mut form = EntityForm::employee(None);
        typed(&mut form, "Asha");
        form.next_field();
        typed(&mut form, "Dev");
        form.next_field();
        typed(&mut form, "asha@x.io");
        form.next_field();
        typed(&mut form, "me.png");

        let values = form.values();
        assert_eq!(values.text_of(NAME), "Asha");
        assert_eq!(values.text_of(EMAIL), "asha@x.io");
        assert_eq!(values.file_of(IMAGE_FILE).unwrap().mime, Some("image/png"));
        assert_eq!(form.mode, FormMode::Create);
    }

    #[test]
    fn test_empty_file_path_is_no_file() {
        let form = EntityForm::employee(None);
        assert!(form.values().file_of(validation::employee::IMAGE_FILE).is_none());
    }

    #[test]
    fn test_project_multi_select_toggles() {
        use validation::project::*;
        let employees = vec![employee("1", "Asha"), employee("2", "Ravi")];
        let mut form = EntityForm::project(&employees, None);
        form.current_field = 5;
        form.handle_char(' ');
        form.handle_left_right(true);
        form.handle_char(' ');
        form.handle_char(' ');
        assert_eq!(form.values().selection_of(ASSIGNED_EMPLOYEES), ["1".to_string()]);
    }

    #[test]
    fn test_task_form_offers_project_team_only() {
        use validation::task::*;
        let mut p1 = sample_project("p1");
        p1.assigned_employees = vec![employee("1", "Asha")];
        let mut p2 = sample_project("p2");
        p2.assigned_employees = vec![employee("2", "Ravi"), employee("3", "Mei")];
        let mut form = EntityForm::task(&[p1, p2], None);

        // No project yet, no employees offered.
        assert!(matches!(&form.fields[3].editor, FieldEditor::Multi { options, .. } if options.is_empty()));

        form.handle_left_right(true);
        form.handle_left_right(true);
        assert_eq!(form.values().text_of(PROJECT_ID), "p2");
        let FieldEditor::Multi { options, .. } = &form.fields[3].editor else { panic!("expected multi") };
        assert_eq!(options.len(), 2);
    }

    #[test]
    fn test_task_form_drops_picks_outside_new_project() {
        use validation::task::*;
        let mut p1 = sample_project("p1");
        p1.assigned_employees = vec![employee("1", "Asha")];
        let p2 = sample_project("p2");
        let mut task = sample_task("t1", "p1", Status::InProgress);
        task.project = p1.clone();
        task.employees = vec![employee("1", "Asha")];

        let mut form = EntityForm::task(&[p1, p2], Some(&task));
        assert_eq!(form.mode, FormMode::Edit("t1".into()));
        assert_eq!(form.values().selection_of(EMPLOYEE_IDS), ["1".to_string()]);

        form.handle_left_right(true);
        assert_eq!(form.values().text_of(PROJECT_ID), "p2");
        assert!(form.values().selection_of(EMPLOYEE_IDS).is_empty());
    }

    #[test]
    fn test_errors_map_to_fields() {
        let mut form = EntityForm::employee(None);
        form.set_error(&FormError::Invalid(ValidationErrors(vec![FieldError {
            field: validation::employee::NAME,
            message: "Name is required",
        }])));
        assert_eq!(form.error_for("name"), Some("Name is required"));

        form.set_error(&FormError::DuplicateEmail);
        assert!(form.error_for("name").is_none());
        assert!(form.error_for("email").unwrap().starts_with("Email ID already exists"));
    }

    #[test]
    fn test_field_navigation_wraps() {
        let mut form = EntityForm::employee(None);
        form.prev_field();
        assert_eq!(form.current_field, 3);
        form.next_field();
        assert_eq!(form.current_field, 0);
    }
}
