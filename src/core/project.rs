//! Project entities.
//!
//! A project is a tracked repository entry. Ids are assigned by the
//! registry on the server; clients only ever echo them back.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

// ═══════════════════════════════════════════════════════════════════════════════
// PROJECT ID
// ═══════════════════════════════════════════════════════════════════════════════

/// Backend-assigned project identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(u64);

impl ProjectId {
    /// Wrap a raw id
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw id
    pub const fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ProjectId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        s.trim()
            .parse::<u64>()
            .map(ProjectId)
            .map_err(|e| Error::InvalidParameter {
                name: "id".into(),
                reason: format!("{}: {}", s, e),
            })
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// NEW PROJECT
// ═══════════════════════════════════════════════════════════════════════════════

/// Payload for creating a project
///
/// Fields default to empty so that a request missing `name` or
/// `repository` reaches [`NewProject::validate`] instead of failing
/// deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProject {
    /// Project name
    #[serde(default)]
    pub name: String,
    /// Repository URL
    #[serde(default)]
    pub repository: String,
    /// Free-form description
    #[serde(default)]
    pub description: String,
}

impl NewProject {
    /// Create a payload with an empty description
    pub fn new(name: impl Into<String>, repository: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            repository: repository.into(),
            description: String::new(),
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Check the required fields
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::MissingField("name"));
        }
        if self.repository.trim().is_empty() {
            return Err(Error::MissingField("repository"));
        }
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// PROJECT
// ═══════════════════════════════════════════════════════════════════════════════

/// A tracked repository entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Backend-assigned identifier
    pub id: ProjectId,
    /// Project name
    pub name: String,
    /// Repository URL
    pub repository: String,
    /// Free-form description (may be empty)
    #[serde(default)]
    pub description: String,
}

impl Project {
    /// Build a project from a validated payload
    pub(crate) fn from_new(id: ProjectId, new: NewProject) -> Self {
        Self {
            id,
            name: new.name,
            repository: new.repository,
            description: new.description,
        }
    }

    /// Whether the project has a non-empty description
    pub fn has_description(&self) -> bool {
        !self.description.trim().is_empty()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_id_parse() {
        assert_eq!("42".parse::<ProjectId>().unwrap(), ProjectId::new(42));
        assert_eq!(" 7 ".parse::<ProjectId>().unwrap().get(), 7);
        assert!("abc".parse::<ProjectId>().is_err());
        assert!("-1".parse::<ProjectId>().is_err());
    }

    #[test]
    fn test_validate_required_fields() {
        assert!(NewProject::new("pos", "https://github.com/acme/pos").validate().is_ok());
        assert_eq!(
            NewProject::new("  ", "https://github.com/acme/pos").validate(),
            Err(Error::MissingField("name"))
        );
        assert_eq!(
            NewProject::new("pos", "").validate(),
            Err(Error::MissingField("repository"))
        );
    }

    #[test]
    fn test_description_is_optional() {
        let new: NewProject =
            serde_json::from_str(r#"{"name":"ai","repository":"https://git/ai"}"#).unwrap();
        assert_eq!(new.description, "");
        assert!(new.validate().is_ok());
    }

    #[test]
    fn test_missing_name_deserializes_then_fails_validation() {
        let new: NewProject = serde_json::from_str(r#"{"repository":"https://git/ai"}"#).unwrap();
        assert_eq!(new.validate(), Err(Error::MissingField("name")));
    }

    #[test]
    fn test_project_wire_format() {
        let project = Project::from_new(
            ProjectId::new(3),
            NewProject::new("chain", "https://git/chain").with_description("ledger"),
        );
        let json = serde_json::to_value(&project).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 3,
                "name": "chain",
                "repository": "https://git/chain",
                "description": "ledger"
            })
        );
        assert!(project.has_description());
    }
}
