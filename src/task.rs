//! Task record and its partial-update patch.
//!
//! A task embeds a copy of its project and of each assigned employee as they
//! were at submit time. Status is the only field a board move changes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::employee::Employee;
use crate::fields::Status;
use crate::project::Project;
use crate::store::{Record, Store};

/// A unit of work on a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub project: Project,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub employees: Vec<Employee>,
    pub eta: NaiveDate,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub status: Status,
}

impl Task {
    /// Comma-separated names of the assigned employees.
    pub fn assignee_names(&self) -> String {
        self.employees.iter().map(|e| e.name.as_str()).collect::<Vec<_>>().join(", ")
    }
}

impl Record for Task {
    const STORAGE_KEY: &'static str = "tasks";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn on_create(&mut self) {
        self.status = Status::Todo;
    }
}

/// Fields to overwrite on an existing task; `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub project: Option<Project>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub employees: Option<Vec<Employee>>,
    pub eta: Option<NaiveDate>,
    pub image_url: Option<String>,
    pub status: Option<Status>,
}

impl TaskPatch {
    /// Patch that only changes the status.
    pub fn status(status: Status) -> Self {
        TaskPatch { status: Some(status), ..Default::default() }
    }

    /// Shallow-merge the patch over `task`.
    pub fn apply(self, task: &mut Task) {
        if let Some(p) = self.project {
            task.project = p;
        }
        if let Some(t) = self.title {
            task.title = t;
        }
        if let Some(d) = self.description {
            task.description = d;
        }
        if let Some(e) = self.employees {
            task.employees = e;
        }
        if let Some(eta) = self.eta {
            task.eta = eta;
        }
        if let Some(img) = self.image_url {
            task.image_url = img;
        }
        if let Some(s) = self.status {
            task.status = s;
        }
    }
}

impl Store<Task> {
    /// Merge `patch` into the task with identifier `id`. Returns false when no task matched.
    pub fn merge(&mut self, id: &str, patch: TaskPatch) -> bool {
        self.update_with(id, |task| patch.apply(task))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    pub(crate) fn sample_project(id: &str) -> Project {
        Project {
            id: id.into(),
            title: format!("Project {id}"),
            description: "desc".into(),
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
            logo_url: None,
            assigned_employees: Vec::new(),
        }
    }

    pub(crate) fn sample_task(id: &str, project_id: &str, status: Status) -> Task {
        Task {
            id: id.into(),
            project: sample_project(project_id),
            title: format!("Task {id}"),
            description: "desc".into(),
            employees: Vec::new(),
            eta: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            image_url: String::new(),
            status,
        }
    }

    #[test]
    fn test_add_forces_todo_status() {
        let mut store: Store<Task> = Store::load(MemoryStorage::new());
        let id = store.add(sample_task("", "p1", Status::Completed));
        assert_eq!(store.get(&id).unwrap().status, Status::Todo);
    }

    #[test]
    fn test_merge_keeps_unpatched_fields() {
        let mut store: Store<Task> = Store::load(MemoryStorage::new());
        let id = store.add(sample_task("", "p1", Status::Todo));
        let patch = TaskPatch { title: Some("Renamed".into()), ..Default::default() };
        assert!(store.merge(&id, patch));

        let task = store.get(&id).unwrap();
        assert_eq!(task.title, "Renamed");
        assert_eq!(task.description, "desc");
        assert_eq!(task.status, Status::Todo);
    }

    #[test]
    fn test_merge_status_only() {
        let mut store: Store<Task> = Store::load(MemoryStorage::new());
        let id = store.add(sample_task("", "p1", Status::Todo));
        assert!(store.merge(&id, TaskPatch::status(Status::NeedTest)));
        assert_eq!(store.get(&id).unwrap().status, Status::NeedTest);
        assert!(!store.merge("missing", TaskPatch::status(Status::Reopen)));
    }

    #[test]
    fn test_missing_status_defaults_to_todo() {
        let task = sample_task("1", "p1", Status::InProgress);
        let mut json = serde_json::to_value(&task).unwrap();
        json.as_object_mut().unwrap().remove("status");
        let parsed: Task = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.status, Status::Todo);
    }
}
