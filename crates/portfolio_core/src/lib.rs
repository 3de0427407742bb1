//! Core domain logic for the portfolio catalog.
//! This crate is the single source of truth for project/category invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::category::{Category, CategoryPatch, NewCategory};
pub use model::project::{NewProject, Project, ProjectPatch};
pub use model::{EntityKind, ValidationError};
pub use repo::association_repo::{AssociationRepository, SqliteAssociationRepository};
pub use repo::category_repo::{CategoryRepository, SqliteCategoryRepository};
pub use repo::project_repo::{ProjectRepository, SqliteProjectRepository};
pub use repo::{RepoError, RepoResult};
pub use service::association_service::AssociationService;
pub use service::category_service::CategoryService;
pub use service::project_service::ProjectService;

/// Minimal health-check API.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
