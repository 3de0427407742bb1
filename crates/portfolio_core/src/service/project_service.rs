//! Project use-case service.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Service layer remains storage-agnostic.

use crate::model::project::{NewProject, Project, ProjectPatch};
use crate::repo::project_repo::ProjectRepository;
use crate::repo::{RepoError, RepoResult};
use crate::service::log_outcome;

/// Use-case service wrapper for project CRUD operations.
pub struct ProjectService<R: ProjectRepository> {
    repo: R,
}

impl<R: ProjectRepository> ProjectService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a project with an empty category list.
    pub fn create_project(&self, input: &NewProject) -> RepoResult<Project> {
        let result = input
            .validate()
            .map_err(RepoError::from)
            .and_then(|()| self.repo.create_project(input));
        log_outcome("project_create", &result);
        result
    }

    pub fn list_projects(&self) -> RepoResult<Vec<Project>> {
        self.repo.list_projects()
    }

    pub fn get_project(&self, name: &str) -> RepoResult<Project> {
        self.repo.get_project(name)
    }

    /// Overwrites only the patch fields that are present and differ.
    pub fn update_project(&self, name: &str, patch: &ProjectPatch) -> RepoResult<Project> {
        let result = self.repo.update_project(name, patch);
        log_outcome("project_update", &result);
        result
    }

    /// Deletes a project; its category links go with it.
    pub fn delete_project(&self, name: &str) -> RepoResult<Project> {
        let result = self.repo.delete_project(name);
        log_outcome("project_delete", &result);
        result
    }
}
