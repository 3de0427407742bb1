//! Project document model.
//!
//! # Invariants
//! - `categories` never holds the same name twice.
//! - `date` is kept at millisecond precision once persisted.

use super::{patch_field, require_name, EntityKind, ValidationError};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A project document with its linked category names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Project {
    /// Unique identifier.
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    /// Linked category names in link order.
    pub categories: Vec<String>,
}

impl Project {
    /// Returns whether `category_name` is linked, by exact name equality.
    pub fn has_category(&self, category_name: &str) -> bool {
        self.categories.iter().any(|name| name == category_name)
    }
}

/// Fields accepted when creating a project.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewProject {
    pub name: String,
    pub description: Option<String>,
    pub date: Option<DateTime<Utc>>,
}

impl NewProject {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_name(EntityKind::Project, &self.name)
    }
}

/// Partial update for a project.
///
/// `None` leaves the stored value untouched, so a patch can never clear an
/// optional field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub date: Option<DateTime<Utc>>,
}

impl ProjectPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.date.is_none()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.name.as_deref() {
            Some(name) => require_name(EntityKind::Project, name),
            None => Ok(()),
        }
    }

    /// Applies present-and-different fields to `project`.
    ///
    /// Returns whether anything changed. The `categories` list is never
    /// touched.
    pub fn apply_to(&self, project: &mut Project) -> bool {
        let mut changed = false;
        if let Some(name) = self.name.as_ref() {
            changed |= patch_field(&mut project.name, Some(name));
        }
        if let Some(description) = self.description.as_ref() {
            let incoming = Some(description.clone());
            changed |= patch_field(&mut project.description, Some(&incoming));
        }
        if let Some(date) = self.date {
            changed |= patch_field(&mut project.date, Some(&Some(date)));
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::{NewProject, Project, ProjectPatch};
    use chrono::{TimeZone, Utc};

    fn sample() -> Project {
        Project {
            name: "Alpha".to_string(),
            description: Some("first".to_string()),
            date: Some(Utc.with_ymd_and_hms(2020, 1, 2, 0, 0, 0).unwrap()),
            categories: vec!["Beta".to_string()],
        }
    }

    #[test]
    fn empty_patch_changes_nothing() {
        let mut project = sample();
        let patch = ProjectPatch::default();
        assert!(patch.is_empty());
        assert!(!patch.apply_to(&mut project));
        assert_eq!(project, sample());
    }

    #[test]
    fn description_patch_leaves_other_fields_alone() {
        let mut project = sample();
        let patch = ProjectPatch {
            description: Some("second".to_string()),
            ..ProjectPatch::default()
        };
        assert!(patch.apply_to(&mut project));
        assert_eq!(project.description.as_deref(), Some("second"));
        assert_eq!(project.name, "Alpha");
        assert_eq!(project.date, sample().date);
        assert_eq!(project.categories, vec!["Beta".to_string()]);
    }

    #[test]
    fn patch_with_equal_values_reports_no_change() {
        let mut project = sample();
        let patch = ProjectPatch {
            name: Some("Alpha".to_string()),
            description: Some("first".to_string()),
            date: sample().date,
        };
        assert!(!patch.apply_to(&mut project));
    }

    #[test]
    fn blank_names_fail_validation() {
        assert!(NewProject::new("  ").validate().is_err());
        let patch = ProjectPatch {
            name: Some(String::new()),
            ..ProjectPatch::default()
        };
        assert!(patch.validate().is_err());
    }

    #[test]
    fn has_category_uses_exact_equality() {
        let project = sample();
        assert!(project.has_category("Beta"));
        assert!(!project.has_category("beta"));
    }
}
