//! Category use-case service.

use crate::model::category::{Category, CategoryPatch, NewCategory};
use crate::repo::category_repo::CategoryRepository;
use crate::repo::{RepoError, RepoResult};
use crate::service::log_outcome;

pub struct CategoryService<R: CategoryRepository> {
    repo: R,
}

impl<R: CategoryRepository> CategoryService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn create_category(&self, input: &NewCategory) -> RepoResult<Category> {
        let result = input
            .validate()
            .map_err(RepoError::from)
            .and_then(|()| self.repo.create_category(input));
        log_outcome("category_create", &result);
        result
    }

    pub fn list_categories(&self) -> RepoResult<Vec<Category>> {
        self.repo.list_categories()
    }

    pub fn get_category(&self, name: &str) -> RepoResult<Category> {
        self.repo.get_category(name)
    }

    pub fn update_category(&self, name: &str, patch: &CategoryPatch) -> RepoResult<Category> {
        let result = self.repo.update_category(name, patch);
        log_outcome("category_update", &result);
        result
    }

    pub fn delete_category(&self, name: &str) -> RepoResult<Category> {
        let result = self.repo.delete_category(name);
        log_outcome("category_delete", &result);
        result
    }
}
