//! Local project list state.
//!
//! The board mirrors what the server last reported. It is replaced
//! wholesale on refresh and patched after each successful add or delete.

use console::Style;

use super::render::Palette;
use crate::core::project::{Project, ProjectId};

/// Client-side list of projects
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectBoard {
    projects: Vec<Project>,
}

impl ProjectBoard {
    /// Empty board
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole list with a fresh fetch
    pub fn replace(&mut self, projects: Vec<Project>) {
        self.projects = projects;
    }

    /// Append a project returned by the server
    pub fn apply_added(&mut self, project: Project) {
        self.projects.push(project);
    }

    /// Drop a project by id; returns whether anything was removed
    pub fn apply_deleted(&mut self, id: ProjectId) -> bool {
        let before = self.projects.len();
        self.projects.retain(|p| p.id != id);
        self.projects.len() != before
    }

    /// Current projects
    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    /// Number of projects
    pub fn len(&self) -> usize {
        self.projects.len()
    }

    /// Whether the board is empty
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    /// Render the list for a terminal
    pub fn render(&self, color: bool) -> String {
        let p = Palette::new(color);
        let mut out = format!("{}\n", p.heading("Projects"));

        if self.projects.is_empty() {
            out.push_str(&format!("  {}\n", p.dim("No projects yet")));
            return out;
        }

        for project in &self.projects {
            out.push_str(&format!(
                "\n  {} {}\n",
                p.paint(&project.name, Style::new().bold().yellow()),
                p.dim(&format!("#{}", project.id)),
            ));
            out.push_str(&format!("  Repository: {}\n", project.repository));
            if project.has_description() {
                out.push_str(&format!("  {}\n", project.description));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::project::NewProject;
    use crate::core::registry::ProjectRegistry;

    fn projects() -> Vec<Project> {
        let mut registry = ProjectRegistry::new();
        registry
            .create(NewProject::new("pos", "https://git/pos").with_description("tills"))
            .unwrap();
        registry.create(NewProject::new("ai", "https://git/ai")).unwrap();
        registry.list()
    }

    #[test]
    fn test_replace_then_patch() {
        let mut board = ProjectBoard::new();
        board.replace(projects());
        assert_eq!(board.len(), 2);

        let extra = Project {
            id: ProjectId::new(9),
            name: "chain".into(),
            repository: "https://git/chain".into(),
            description: String::new(),
        };
        board.apply_added(extra);
        assert_eq!(board.projects().last().unwrap().name, "chain");

        assert!(board.apply_deleted(ProjectId::new(1)));
        assert!(!board.apply_deleted(ProjectId::new(1)));
        let names: Vec<_> = board.projects().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["ai", "chain"]);
    }

    #[test]
    fn test_replace_discards_local_state() {
        let mut board = ProjectBoard::new();
        board.replace(projects());
        board.replace(Vec::new());
        assert!(board.is_empty());
    }

    #[test]
    fn test_render_plain() {
        let mut board = ProjectBoard::new();
        board.replace(projects());
        let out = board.render(false);

        assert!(out.contains("=== Projects ==="));
        assert!(out.contains("pos #1"));
        assert!(out.contains("Repository: https://git/pos"));
        assert!(out.contains("tills"));
        assert!(out.contains("ai #2"));
    }

    #[test]
    fn test_render_empty() {
        assert!(ProjectBoard::new().render(false).contains("No projects yet"));
    }
}
