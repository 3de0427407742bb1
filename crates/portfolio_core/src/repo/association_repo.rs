//! Project/category association repository.
//!
//! # Responsibility
//! - Add and remove links between one project and one category.
//! - Create a missing category on the fly when linking it by fields.
//!
//! # Invariants
//! - Each operation runs in one `IMMEDIATE` transaction; both lists change
//!   together or not at all.
//! - A project/category pair is linked at most once (`UNIQUE` pair), so
//!   repeated adds are no-ops.
//! - Membership is exact name equality.

use crate::model::category::NewCategory;
use crate::model::project::Project;
use crate::model::EntityKind;
use crate::repo::category_repo::{find_category_id, insert_category};
use crate::repo::project_repo::{find_project_with_id, load_project_by_id};
use crate::repo::{ensure_tables, RepoError, RepoResult};
use log::debug;
use rusqlite::{params, Connection, TransactionBehavior};

/// Repository interface for association maintenance.
pub trait AssociationRepository {
    /// Links the category named by `category.name` to the project, creating
    /// the category from `category` when it does not exist yet.
    fn add_category_to_project(
        &mut self,
        project_name: &str,
        category: &NewCategory,
    ) -> RepoResult<Project>;
    /// Unlinks the category. Fails with `AssociationNotFound` when the
    /// project does not list it.
    fn remove_category_from_project(
        &mut self,
        project_name: &str,
        category_name: &str,
    ) -> RepoResult<Project>;
    /// Returns the project's category names in link order.
    fn list_project_categories(&self, project_name: &str) -> RepoResult<Vec<String>>;
}

/// SQLite-backed association repository.
pub struct SqliteAssociationRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteAssociationRepository<'conn> {
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["projects", "categories", "project_categories"])?;
        Ok(Self { conn })
    }
}

impl AssociationRepository for SqliteAssociationRepository<'_> {
    fn add_category_to_project(
        &mut self,
        project_name: &str,
        category: &NewCategory,
    ) -> RepoResult<Project> {
        category.validate()?;
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let project = add_link(&tx, project_name, category)?;
        tx.commit()?;
        Ok(project)
    }

    fn remove_category_from_project(
        &mut self,
        project_name: &str,
        category_name: &str,
    ) -> RepoResult<Project> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let project = remove_link(&tx, project_name, category_name)?;
        tx.commit()?;
        Ok(project)
    }

    fn list_project_categories(&self, project_name: &str) -> RepoResult<Vec<String>> {
        let (_, project) = find_project_with_id(self.conn, project_name)?
            .ok_or_else(|| RepoError::not_found(EntityKind::Project, project_name))?;
        Ok(project.categories)
    }
}

fn add_link(conn: &Connection, project_name: &str, category: &NewCategory) -> RepoResult<Project> {
    let (project_id, _) = find_project_with_id(conn, project_name)?
        .ok_or_else(|| RepoError::not_found(EntityKind::Project, project_name))?;

    let category_id = match find_category_id(conn, &category.name)? {
        Some(id) => id,
        None => {
            debug!("event=category_autocreate module=repo status=ok");
            insert_category(conn, category)?
        }
    };

    let inserted = conn.execute(
        "INSERT OR IGNORE INTO project_categories (project_id, category_id)
         VALUES (?1, ?2);",
        params![project_id, category_id],
    )?;
    if inserted == 0 {
        debug!("event=link_add module=repo status=noop reason=already_linked");
    }

    load_project_by_id(conn, project_id)
}

fn remove_link(conn: &Connection, project_name: &str, category_name: &str) -> RepoResult<Project> {
    let (project_id, project) = find_project_with_id(conn, project_name)?
        .ok_or_else(|| RepoError::not_found(EntityKind::Project, project_name))?;

    if !project.has_category(category_name) {
        return Err(RepoError::AssociationNotFound {
            project: project_name.to_string(),
            category: category_name.to_string(),
        });
    }

    let removed = conn.execute(
        "DELETE FROM project_categories
         WHERE project_id = ?1
           AND category_id = (SELECT id FROM categories WHERE name = ?2);",
        params![project_id, category_name],
    )?;
    if removed != 1 {
        return Err(RepoError::InvalidData(format!(
            "expected one link row for `{project_name}`/`{category_name}`, removed {removed}"
        )));
    }

    load_project_by_id(conn, project_id)
}
