//! Enumerations for TUI state management.

/// What the list screens are doing.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AppState {
    Browse,
    Form,
    Confirm,
    Help,
}

/// Entity a list screen or form works on.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum EntityKind {
    Employee,
    Project,
    Task,
}

impl EntityKind {
    pub fn label(self) -> &'static str {
        match self {
            EntityKind::Employee => "Employee",
            EntityKind::Project => "Project",
            EntityKind::Task => "Task",
        }
    }
}
