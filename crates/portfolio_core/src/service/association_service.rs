//! Association use-case service.
//!
//! # Responsibility
//! - Add/remove one category on one project, keeping the category's
//!   project list in step.
//!
//! # Invariants
//! - `category.name ∈ project.categories ⇔ project.name ∈ category.projects`
//!   after every call, successful or not.
//! - Adding an already linked category is a no-op.

use crate::model::category::NewCategory;
use crate::model::project::Project;
use crate::repo::association_repo::AssociationRepository;
use crate::repo::RepoResult;
use crate::service::log_outcome;

pub struct AssociationService<R: AssociationRepository> {
    repo: R,
}

impl<R: AssociationRepository> AssociationService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Links a category to a project, creating the category from
    /// `category` when no category has that name yet.
    pub fn add_category_to_project(
        &mut self,
        project_name: &str,
        category: &NewCategory,
    ) -> RepoResult<Project> {
        let result = self.repo.add_category_to_project(project_name, category);
        log_outcome("link_add", &result);
        result
    }

    /// Unlinks a category from a project. The category document stays.
    pub fn remove_category_from_project(
        &mut self,
        project_name: &str,
        category_name: &str,
    ) -> RepoResult<Project> {
        let result = self
            .repo
            .remove_category_from_project(project_name, category_name);
        log_outcome("link_remove", &result);
        result
    }

    pub fn list_project_categories(&self, project_name: &str) -> RepoResult<Vec<String>> {
        self.repo.list_project_categories(project_name)
    }
}
