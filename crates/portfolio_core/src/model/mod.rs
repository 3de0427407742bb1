//! Domain model for the project/category collections.
//!
//! # Responsibility
//! - Define the document shapes returned by repositories and services.
//! - Define creation inputs and patch values with presence validation.
//!
//! # Invariants
//! - Every document is identified by its unique, non-blank `name`.
//! - `Project::categories` and `Category::projects` carry set semantics
//!   with insertion order.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod category;
pub mod project;

/// Which collection a name refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Project,
    Category,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Category => "category",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Presence-check failure for creation inputs and patches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// `name` is missing, empty or whitespace only.
    EmptyName(EntityKind),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName(kind) => write!(f, "{kind} name must not be empty"),
        }
    }
}

impl Error for ValidationError {}

pub(crate) fn require_name(kind: EntityKind, name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        Err(ValidationError::EmptyName(kind))
    } else {
        Ok(())
    }
}

/// Overwrites `current` with `incoming` when it is present and differs.
///
/// Returns whether `current` changed.
pub(crate) fn patch_field<T: PartialEq + Clone>(current: &mut T, incoming: Option<&T>) -> bool {
    match incoming {
        Some(value) if value != current => {
            *current = value.clone();
            true
        }
        _ => false,
    }
}
