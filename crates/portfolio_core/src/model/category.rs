//! Category document model.

use super::{patch_field, require_name, EntityKind, ValidationError};
use serde::Serialize;

/// A category document with its linked project names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    /// Unique identifier.
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Linked project names in link order.
    pub projects: Vec<String>,
}

impl Category {
    pub fn has_project(&self, project_name: &str) -> bool {
        self.projects.iter().any(|name| name == project_name)
    }
}

/// Fields accepted when creating a category, directly or while linking it
/// to a project.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewCategory {
    pub name: String,
    pub description: Option<String>,
}

impl NewCategory {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_name(EntityKind::Category, &self.name)
    }
}

/// Partial update for a category. The `projects` list is never touched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl CategoryPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.name.as_deref() {
            Some(name) => require_name(EntityKind::Category, name),
            None => Ok(()),
        }
    }

    pub fn apply_to(&self, category: &mut Category) -> bool {
        let mut changed = false;
        if let Some(name) = self.name.as_ref() {
            changed |= patch_field(&mut category.name, Some(name));
        }
        if let Some(description) = self.description.as_ref() {
            let incoming = Some(description.clone());
            changed |= patch_field(&mut category.description, Some(&incoming));
        }
        changed
    }
}
