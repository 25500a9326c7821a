//! Navigation routes for the terminal UI.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown route '{0}' (expected /dashboard, /dashboard/employees, /dashboard/projects or /dashboard/tasks)")]
pub struct RouteError(pub String);

/// A screen reachable from the navigation bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Route {
    #[default]
    Dashboard,
    Employees,
    Projects,
    Tasks,
}

impl Route {
    /// Navigation bar order.
    pub const ALL: [Route; 4] = [Route::Dashboard, Route::Employees, Route::Projects, Route::Tasks];

    pub fn path(self) -> &'static str {
        match self {
            Route::Dashboard => "/dashboard",
            Route::Employees => "/dashboard/employees",
            Route::Projects => "/dashboard/projects",
            Route::Tasks => "/dashboard/tasks",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Route::Dashboard => "Dashboard",
            Route::Employees => "Employees",
            Route::Projects => "Projects",
            Route::Tasks => "Tasks",
        }
    }

    /// Parse a path. The root path redirects to the dashboard; a trailing
    /// slash is ignored.
    pub fn parse(path: &str) -> Result<Route, RouteError> {
        let trimmed = path.trim();
        let normalized = match trimmed.trim_end_matches('/') {
            "" if trimmed.starts_with('/') => return Ok(Route::Dashboard),
            p => p,
        };
        Route::ALL
            .into_iter()
            .find(|r| r.path() == normalized)
            .ok_or_else(|| RouteError(path.to_string()))
    }

    /// Route for a 1-based navigation key.
    pub fn from_digit(c: char) -> Option<Route> {
        let n = c.to_digit(10)? as usize;
        n.checked_sub(1).and_then(|i| Route::ALL.get(i).copied())
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for Route {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Route::parse(s)
    }
}

impl TryFrom<String> for Route {
    type Error = RouteError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Route::parse(&s)
    }
}

impl From<Route> for String {
    fn from(r: Route) -> String {
        r.path().to_string()
    }
}
