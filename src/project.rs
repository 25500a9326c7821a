//! Project record.
//!
//! Projects carry full copies of their assigned employees, taken when the
//! project form was submitted. Those copies are not refreshed when the
//! employee record changes later.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::employee::Employee;
use crate::store::Record;

/// A project with its assigned team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub title: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Session object URL of the logo; resolves only in the process that created it.
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub assigned_employees: Vec<Employee>,
}

impl Project {
    /// Assigned employee with identifier `id`.
    pub fn assigned(&self, id: &str) -> Option<&Employee> {
        self.assigned_employees.iter().find(|e| e.id == id)
    }

    /// Whether `date` falls inside the project's start..=end range.
    pub fn covers(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }
}

impl Record for Project {
    const STORAGE_KEY: &'static str = "projects";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
    Null(()),
}

/// Accept either a list or a single value (or null) for a list field.
fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::Many(items) => items,
        OneOrMany::One(item) => vec![item],
        OneOrMany::Null(()) => Vec::new(),
    })
}
