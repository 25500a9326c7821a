//! Declarative form validation.
//!
//! Each form is described by a `Schema`: an ordered list of fields, each with
//! the rules its value must satisfy. Validation reports the first failing
//! rule of every invalid field.

use std::collections::HashMap;
use std::fmt;

use chrono::NaiveDate;
use validator::ValidateEmail;

use crate::fields::ImageKind;
use crate::media::FileInput;

/// Date format used by every date field.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A submitted form value.
#[derive(Debug, Clone)]
pub enum FieldValue {
    Text(String),
    Selection(Vec<String>),
    File(Option<FileInput>),
}

/// Values of a submitted form, keyed by field name.
#[derive(Debug, Clone, Default)]
pub struct FormValues {
    values: HashMap<&'static str, FieldValue>,
}

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, field: &'static str, value: impl Into<String>) -> Self {
        self.values.insert(field, FieldValue::Text(value.into()));
        self
    }

    pub fn selection(mut self, field: &'static str, ids: Vec<String>) -> Self {
        self.values.insert(field, FieldValue::Selection(ids));
        self
    }

    pub fn file(mut self, field: &'static str, file: Option<FileInput>) -> Self {
        self.values.insert(field, FieldValue::File(file));
        self
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.values.get(field)
    }

    /// Trimmed text of a field, empty when absent or not text.
    pub fn text_of(&self, field: &str) -> &str {
        match self.values.get(field) {
            Some(FieldValue::Text(s)) => s.trim(),
            _ => "",
        }
    }

    /// Selected identifiers of a field, empty when absent or not a selection.
    pub fn selection_of(&self, field: &str) -> &[String] {
        match self.values.get(field) {
            Some(FieldValue::Selection(ids)) => ids,
            _ => &[],
        }
    }

    pub fn file_of(&self, field: &str) -> Option<&FileInput> {
        match self.values.get(field) {
            Some(FieldValue::File(f)) => f.as_ref(),
            _ => None,
        }
    }

    /// Parsed date of a field.
    pub fn date_of(&self, field: &str) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.text_of(field), DATE_FORMAT).ok()
    }
}

/// One check applied to a field value.
#[derive(Debug, Clone)]
pub enum Rule {
    Required(&'static str),
    Email(&'static str),
    Date(&'static str),
    FileType { allowed: &'static [ImageKind], message: &'static str },
    /// The field's date must be strictly after the date in `other`.
    After { other: &'static str, message: &'static str },
    MinSelected { min: usize, message: &'static str },
}

impl Rule {
    fn message(&self) -> &'static str {
        match self {
            Rule::Required(m) | Rule::Email(m) | Rule::Date(m) => *m,
            Rule::FileType { message, .. }
            | Rule::After { message, .. }
            | Rule::MinSelected { message, .. } => *message,
        }
    }

    fn check(&self, field: &str, values: &FormValues) -> bool {
        match self {
            Rule::Required(_) => match values.get(field) {
                Some(FieldValue::Text(s)) => !s.trim().is_empty(),
                Some(FieldValue::Selection(ids)) => !ids.is_empty(),
                Some(FieldValue::File(f)) => f.is_some(),
                None => false,
            },
            Rule::Email(_) => {
                let s = values.text_of(field);
                s.is_empty() || s.validate_email()
            }
            Rule::Date(_) => {
                let s = values.text_of(field);
                s.is_empty() || values.date_of(field).is_some()
            }
            Rule::FileType { allowed, .. } => values
                .file_of(field)
                .and_then(FileInput::image_kind)
                .is_some_and(|k| allowed.contains(&k)),
            Rule::After { other, .. } => match (values.date_of(field), values.date_of(other)) {
                (Some(this), Some(that)) => this > that,
                _ => false,
            },
            Rule::MinSelected { min, .. } => values.selection_of(field).len() >= *min,
        }
    }
}

/// Rules for one field.
#[derive(Debug, Clone)]
pub struct FieldRules {
    pub field: &'static str,
    pub rules: Vec<Rule>,
}

/// Ordered rule set for a form.
#[derive(Debug, Clone)]
pub struct Schema {
    fields: Vec<FieldRules>,
}

impl Schema {
    pub fn new() -> Self {
        Schema { fields: Vec::new() }
    }

    pub fn field(mut self, field: &'static str, rules: Vec<Rule>) -> Self {
        self.fields.push(FieldRules { field, rules });
        self
    }

    /// Validate all fields, collecting the first failure of each.
    pub fn validate(&self, values: &FormValues) -> Result<(), ValidationErrors> {
        let errors: Vec<FieldError> = self
            .fields
            .iter()
            .filter_map(|fr| {
                fr.rules
                    .iter()
                    .find(|rule| !rule.check(fr.field, values))
                    .map(|rule| FieldError { field: fr.field, message: rule.message() })
            })
            .collect();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(errors))
        }
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

/// Per-field validation failures, in schema order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    /// Message for `field`, if it failed.
    pub fn message_for(&self, field: &str) -> Option<&'static str> {
        self.0.iter().find(|e| e.field == field).map(|e| e.message)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|e| format!("{}: {}", e.field, e.message)).collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

pub mod employee {
    use super::*;

    pub const NAME: &str = "name";
    pub const POSITION: &str = "position";
    pub const EMAIL: &str = "email";
    pub const IMAGE_FILE: &str = "imageFile";

    pub fn schema() -> Schema {
        Schema::new()
            .field(NAME, vec![Rule::Required("Name is required")])
            .field(POSITION, vec![Rule::Required("Position is required")])
            .field(EMAIL, vec![Rule::Required("Email is required"), Rule::Email("Invalid email")])
            .field(
                IMAGE_FILE,
                vec![
                    Rule::Required("Profile image is required"),
                    Rule::FileType { allowed: &ImageKind::ALL, message: "Only PNG, JPEG or GIF allowed" },
                ],
            )
    }
}

pub mod project {
    use super::*;

    pub const TITLE: &str = "title";
    pub const DESCRIPTION: &str = "description";
    pub const LOGO_FILE: &str = "logoFile";
    pub const START_DATE: &str = "startDate";
    pub const END_DATE: &str = "endDate";
    pub const ASSIGNED_EMPLOYEES: &str = "assignedEmployees";

    pub fn schema() -> Schema {
        Schema::new()
            .field(TITLE, vec![Rule::Required("Title is required")])
            .field(DESCRIPTION, vec![Rule::Required("Description is required")])
            .field(
                LOGO_FILE,
                vec![
                    Rule::Required("Project logo is required"),
                    Rule::FileType {
                        allowed: &ImageKind::ALL,
                        message: "Only image files (jpg, png, gif) are allowed",
                    },
                ],
            )
            .field(
                START_DATE,
                vec![Rule::Required("Start date is required"), Rule::Date("Start date must be YYYY-MM-DD")],
            )
            .field(
                END_DATE,
                vec![
                    Rule::Required("End date is required"),
                    Rule::Date("End date must be YYYY-MM-DD"),
                    Rule::After { other: START_DATE, message: "End date must be after start date" },
                ],
            )
            .field(
                ASSIGNED_EMPLOYEES,
                vec![Rule::MinSelected { min: 1, message: "Assign at least one employee" }],
            )
    }
}

pub mod task {
    use super::*;

    pub const PROJECT_ID: &str = "projectId";
    pub const TITLE: &str = "title";
    pub const DESCRIPTION: &str = "description";
    pub const EMPLOYEE_IDS: &str = "employeeIds";
    pub const ETA: &str = "eta";
    pub const IMAGE_FILE: &str = "imageFile";

    pub fn schema() -> Schema {
        Schema::new()
            .field(PROJECT_ID, vec![Rule::Required("Select a project")])
            .field(TITLE, vec![Rule::Required("Task title is required")])
            .field(DESCRIPTION, vec![Rule::Required("Description is required")])
            .field(
                EMPLOYEE_IDS,
                vec![Rule::MinSelected { min: 1, message: "Select at least one employee" }],
            )
            .field(ETA, vec![Rule::Required("ETA is required"), Rule::Date("ETA must be YYYY-MM-DD")])
            .field(
                IMAGE_FILE,
                vec![
                    Rule::Required("Reference image is required"),
                    Rule::FileType { allowed: &ImageKind::ALL, message: "Only image files are allowed" },
                ],
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_employee() -> FormValues {
        FormValues::new()
            .text(employee::NAME, "Asha")
            .text(employee::POSITION, "Engineer")
            .text(employee::EMAIL, "asha@example.com")
            .file(employee::IMAGE_FILE, Some(FileInput::from_path("asha.png")))
    }

    fn email_ok(email: &str) -> bool {
        employee::schema().validate(&valid_employee().text(employee::EMAIL, email)).is_ok()
    }

    #[test]
    fn test_email_rule() {
        assert!(email_ok("a@b.co"));
        assert!(email_ok("first.last@sub.example.org"));
        assert!(!email_ok("plainaddress"));
        assert!(!email_ok("@example.com"));
        assert!(!email_ok("a@b..com"));
        assert!(!email_ok("a b@c.com"));
        assert!(!email_ok("a@b@c.com"));
        assert!(!email_ok("a@-b-.com"));
        assert!(!email_ok("a@b.c_m"));
        assert!(!email_ok("a\"b@c.com"));

        let errors = employee::schema().validate(&valid_employee().text(employee::EMAIL, "a@-b-.com")).unwrap_err();
        assert_eq!(errors.message_for(employee::EMAIL), Some("Invalid email"));
    }

    #[test]
    fn test_valid_employee_passes() {
        assert!(employee::schema().validate(&valid_employee()).is_ok());
    }

    #[test]
    fn test_reports_first_failure_per_field() {
        let values = FormValues::new()
            .text(employee::NAME, "  ")
            .text(employee::POSITION, "Engineer")
            .text(employee::EMAIL, "not-an-email")
            .file(employee::IMAGE_FILE, Some(FileInput::from_path("cv.pdf")));
        let errors = employee::schema().validate(&values).unwrap_err();
        assert_eq!(errors.0.len(), 3);
        assert_eq!(errors.message_for(employee::NAME), Some("Name is required"));
        assert_eq!(errors.message_for(employee::EMAIL), Some("Invalid email"));
        assert_eq!(errors.message_for(employee::IMAGE_FILE), Some("Only PNG, JPEG or GIF allowed"));
        assert_eq!(errors.message_for(employee::POSITION), None);
    }

    #[test]
    fn test_missing_file_reports_required() {
        let values = valid_employee().file(employee::IMAGE_FILE, None);
        let errors = employee::schema().validate(&values).unwrap_err();
        assert_eq!(errors.message_for(employee::IMAGE_FILE), Some("Profile image is required"));
    }

    fn project_values(start: &str, end: &str, assigned: Vec<String>) -> FormValues {
        FormValues::new()
            .text(project::TITLE, "Atlas")
            .text(project::DESCRIPTION, "Mapping")
            .file(project::LOGO_FILE, Some(FileInput::from_path("logo.gif")))
            .text(project::START_DATE, start)
            .text(project::END_DATE, end)
            .selection(project::ASSIGNED_EMPLOYEES, assigned)
    }

    #[test]
    fn test_project_end_must_follow_start() {
        let ok = project_values("2025-01-01", "2025-01-02", vec!["1".into()]);
        assert!(project::schema().validate(&ok).is_ok());

        let same_day = project_values("2025-01-01", "2025-01-01", vec!["1".into()]);
        let errors = project::schema().validate(&same_day).unwrap_err();
        assert_eq!(errors.message_for(project::END_DATE), Some("End date must be after start date"));

        let garbage = project_values("2025-01-01", "soon", vec!["1".into()]);
        let errors = project::schema().validate(&garbage).unwrap_err();
        assert_eq!(errors.message_for(project::END_DATE), Some("End date must be YYYY-MM-DD"));
    }

    #[test]
    fn test_project_requires_an_assignee() {
        let values = project_values("2025-01-01", "2025-02-01", Vec::new());
        let errors = project::schema().validate(&values).unwrap_err();
        assert_eq!(errors.0, vec![FieldError {
            field: project::ASSIGNED_EMPLOYEES,
            message: "Assign at least one employee",
        }]);
    }

    #[test]
    fn test_empty_task_form_reports_every_field() {
        let errors = task::schema().validate(&FormValues::new()).unwrap_err();
        let fields: Vec<&str> = errors.0.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec![
            task::PROJECT_ID,
            task::TITLE,
            task::DESCRIPTION,
            task::EMPLOYEE_IDS,
            task::ETA,
            task::IMAGE_FILE,
        ]);
        assert_eq!(errors.message_for(task::PROJECT_ID), Some("Select a project"));
    }
}
