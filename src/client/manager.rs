//! Project manager session.
//!
//! Couples the REST client with the local board. The board only changes
//! after the server has accepted the request.

use tracing::info;

use super::http::ApiClient;
use crate::core::project::{Project, ProjectId};
use crate::error::Result;
use crate::view::board::ProjectBoard;
use crate::view::form::ProjectForm;

/// Project manager: form → action → REST call → board update
#[derive(Debug, Clone)]
pub struct ProjectManager {
    client: ApiClient,
    board: ProjectBoard,
}

impl ProjectManager {
    /// Create a manager with an empty board
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            board: ProjectBoard::new(),
        }
    }

    /// Local board
    pub fn board(&self) -> &ProjectBoard {
        &self.board
    }

    /// REST client
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Replace the board with the server's list
    pub async fn refresh(&mut self) -> Result<&ProjectBoard> {
        let projects = self.client.list_projects().await?;
        info!(count = projects.len(), "projects refreshed");
        self.board.replace(projects);
        Ok(&self.board)
    }

    /// Submit the form and append the created project.
    ///
    /// The form is only cleared when the server accepted the project.
    pub async fn add(&mut self, form: &mut ProjectForm) -> Result<Project> {
        let mut draft = form.clone();
        let payload = draft.submit()?;

        let project = self.client.add_project(&payload).await?;
        info!(id = %project.id, name = %project.name, "project added");

        *form = draft;
        self.board.apply_added(project.clone());
        Ok(project)
    }

    /// Delete a project and drop it from the board
    pub async fn delete(&mut self, id: ProjectId) -> Result<()> {
        self.client.delete_project(id).await?;
        info!(%id, "project deleted");
        self.board.apply_deleted(id);
        Ok(())
    }
}
