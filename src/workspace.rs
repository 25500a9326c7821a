//! The three entity stores, loaded together from one storage backend.

use crate::employee::Employee;
use crate::media::ObjectUrls;
use crate::project::Project;
use crate::storage::Storage;
use crate::store::Store;
use crate::task::Task;

/// Owned state handed to the screens and commands that read or write it.
pub struct Workspace {
    pub employees: Store<Employee>,
    pub projects: Store<Project>,
    pub tasks: Store<Task>,
    /// Object URLs created during this session (project logos).
    pub object_urls: ObjectUrls,
}

impl Workspace {
    /// Load every store from `storage`. Missing or corrupt collections start empty.
    pub fn load<S: Storage + Clone + 'static>(storage: S) -> Self {
        Workspace {
            employees: Store::load(storage.clone()),
            projects: Store::load(storage.clone()),
            tasks: Store::load(storage),
            object_urls: ObjectUrls::new(),
        }
    }

    /// Delete a project and release its logo URL. Returns false when no project matched.
    pub fn delete_project(&mut self, id: &str) -> bool {
        let logo = self.projects.get(id).and_then(|p| p.logo_url.clone());
        let removed = self.projects.delete(id);
        if let Some(url) = logo {
            self.object_urls.revoke(&url);
        }
        removed
    }
}
