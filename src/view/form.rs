//! Project entry form.

use crate::core::project::NewProject;
use crate::error::Result;

/// Field values for a new project
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectForm {
    /// Project name (required)
    pub name: String,
    /// Repository URL (required)
    pub repository: String,
    /// Description (optional)
    pub description: String,
}

impl ProjectForm {
    /// Empty form
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the name field
    pub fn set_name(&mut self, value: impl Into<String>) -> &mut Self {
        self.name = value.into();
        self
    }

    /// Set the repository field
    pub fn set_repository(&mut self, value: impl Into<String>) -> &mut Self {
        self.repository = value.into();
        self
    }

    /// Set the description field
    pub fn set_description(&mut self, value: impl Into<String>) -> &mut Self {
        self.description = value.into();
        self
    }

    /// Build the payload and clear the form.
    ///
    /// A form missing a required field is left as it was.
    pub fn submit(&mut self) -> Result<NewProject> {
        let payload = NewProject {
            name: self.name.trim().to_string(),
            repository: self.repository.trim().to_string(),
            description: self.description.trim().to_string(),
        };
        payload.validate()?;

        self.clear();
        Ok(payload)
    }

    /// Reset every field
    pub fn clear(&mut self) {
        self.name.clear();
        self.repository.clear();
        self.description.clear();
    }

    /// Whether all fields are empty
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.repository.is_empty() && self.description.is_empty()
    }
}
