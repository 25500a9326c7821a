//! Employee record.

use serde::{Deserialize, Serialize};

use crate::store::Record;

/// A team member. `image_url` holds the profile picture as an embedded data URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: String,
    pub name: String,
    pub position: String,
    pub email: String,
    #[serde(default)]
    pub image_url: String,
}

impl Record for Employee {
    const STORAGE_KEY: &'static str = "employees";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

/// True when another employee (not `exclude_id`) already uses `email`.
pub fn email_taken(employees: &[Employee], email: &str, exclude_id: Option<&str>) -> bool {
    employees
        .iter()
        .any(|e| e.email == email && Some(e.id.as_str()) != exclude_id)
}
