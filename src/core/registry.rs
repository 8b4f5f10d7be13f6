//! In-memory project registry.
//!
//! The registry is the only place project ids are minted. Ids start at 1,
//! only ever increase, and are not reused after a delete.

use std::collections::BTreeMap;

use tracing::debug;

use super::project::{NewProject, Project, ProjectId};
use crate::error::{Error, Result};

/// Registry of tracked projects
#[derive(Debug, Clone)]
pub struct ProjectRegistry {
    /// Projects indexed by id (ascending id == insertion order)
    projects: BTreeMap<ProjectId, Project>,
    /// Next id to assign
    next_id: u64,
}

impl Default for ProjectRegistry {
    fn default() -> Self {
        Self {
            projects: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl ProjectRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and store a new project, assigning its id
    pub fn create(&mut self, new: NewProject) -> Result<Project> {
        new.validate()?;

        let id = ProjectId::new(self.next_id);
        self.next_id = self
            .next_id
            .checked_add(1)
            .ok_or_else(|| Error::Internal("project id space exhausted".into()))?;

        let project = Project::from_new(id, new);
        self.projects.insert(id, project.clone());
        debug!(%id, name = %project.name, "project registered");

        Ok(project)
    }

    /// All projects in id order
    pub fn list(&self) -> Vec<Project> {
        self.projects.values().cloned().collect()
    }

    /// Get a project by id
    pub fn get(&self, id: ProjectId) -> Option<&Project> {
        self.projects.get(&id)
    }

    /// Remove a project, returning it
    pub fn delete(&mut self, id: ProjectId) -> Result<Project> {
        self.projects.remove(&id).ok_or(Error::ProjectNotFound(id))
    }

    /// Number of projects
    pub fn len(&self) -> usize {
        self.projects.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample(name: &str) -> NewProject {
        NewProject::new(name, format!("https://github.com/acme/{}", name))
    }

    #[test]
    fn test_create_assigns_sequential_ids() {
        let mut registry = ProjectRegistry::new();
        let a = registry.create(sample("pos")).unwrap();
        let b = registry.create(sample("ai")).unwrap();

        assert_eq!(a.id, ProjectId::new(1));
        assert_eq!(b.id, ProjectId::new(2));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_create_rejects_missing_fields() {
        let mut registry = ProjectRegistry::new();
        let err = registry.create(NewProject::new("", "https://git/x")).unwrap_err();

        assert_eq!(err, Error::MissingField("name"));
        assert!(registry.is_empty());

        // A rejected create does not burn an id
        let ok = registry.create(sample("pos")).unwrap();
        assert_eq!(ok.id, ProjectId::new(1));
    }

    #[test]
    fn test_delete_and_not_found() {
        let mut registry = ProjectRegistry::new();
        let project = registry.create(sample("chain")).unwrap();

        let removed = registry.delete(project.id).unwrap();
        assert_eq!(removed.name, "chain");
        assert!(registry.get(project.id).is_none());

        assert_eq!(
            registry.delete(project.id),
            Err(Error::ProjectNotFound(project.id))
        );
    }

    #[test]
    fn test_ids_not_reused_after_delete() {
        let mut registry = ProjectRegistry::new();
        let first = registry.create(sample("a")).unwrap();
        registry.delete(first.id).unwrap();

        let second = registry.create(sample("b")).unwrap();
        assert_eq!(second.id, ProjectId::new(2));
    }

    #[test]
    fn test_list_in_insertion_order() {
        let mut registry = ProjectRegistry::new();
        for name in ["zeta", "alpha", "mid"] {
            registry.create(sample(name)).unwrap();
        }

        let names: Vec<_> = registry.list().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    proptest! {
        #[test]
        fn prop_ids_strictly_increase(ops in proptest::collection::vec(any::<bool>(), 1..64)) {
            let mut registry = ProjectRegistry::new();
            let mut last_id = 0u64;

            for create in ops {
                if create || registry.is_empty() {
                    let project = registry.create(sample("p")).unwrap();
                    prop_assert!(project.id.get() > last_id);
                    last_id = project.id.get();
                } else {
                    let first = registry.list()[0].id;
                    registry.delete(first).unwrap();
                }
            }

            let ids: Vec<u64> = registry.list().iter().map(|p| p.id.get()).collect();
            let mut sorted = ids.clone();
            sorted.sort_unstable();
            sorted.dedup();
            prop_assert_eq!(ids, sorted);
        }
    }
}
