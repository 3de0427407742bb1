//! Category repository contracts and SQLite implementation.
//!
//! # Invariants
//! - `projects` is read in link insertion order.
//! - Deleting a category removes its link rows through the FK cascade.

use crate::model::category::{Category, CategoryPatch, NewCategory};
use crate::model::EntityKind;
use crate::repo::{ensure_tables, map_name_conflict, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

const CATEGORY_SELECT_SQL: &str = "SELECT
    id,
    name,
    description
FROM categories";

/// Repository interface for category CRUD operations.
pub trait CategoryRepository {
    fn create_category(&self, input: &NewCategory) -> RepoResult<Category>;
    fn list_categories(&self) -> RepoResult<Vec<Category>>;
    fn find_category(&self, name: &str) -> RepoResult<Option<Category>>;
    fn update_category(&self, name: &str, patch: &CategoryPatch) -> RepoResult<Category>;
    fn delete_category(&self, name: &str) -> RepoResult<Category>;

    fn get_category(&self, name: &str) -> RepoResult<Category> {
        self.find_category(name)?
            .ok_or_else(|| RepoError::not_found(EntityKind::Category, name))
    }
}

/// SQLite-backed category repository.
pub struct SqliteCategoryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCategoryRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["projects", "categories", "project_categories"])?;
        Ok(Self { conn })
    }
}

impl CategoryRepository for SqliteCategoryRepository<'_> {
    fn create_category(&self, input: &NewCategory) -> RepoResult<Category> {
        let id = insert_category(self.conn, input)?;
        load_category_by_id(self.conn, id)
    }

    fn list_categories(&self) -> RepoResult<Vec<Category>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CATEGORY_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut categories = Vec::new();
        while let Some(row) = rows.next()? {
            let (id, mut category) = parse_category_row(row)?;
            category.projects = load_project_names(self.conn, id)?;
            categories.push(category);
        }
        Ok(categories)
    }

    fn find_category(&self, name: &str) -> RepoResult<Option<Category>> {
        Ok(find_category_with_id(self.conn, name)?.map(|(_, category)| category))
    }

    fn update_category(&self, name: &str, patch: &CategoryPatch) -> RepoResult<Category> {
        patch.validate()?;
        let (id, mut category) = find_category_with_id(self.conn, name)?
            .ok_or_else(|| RepoError::not_found(EntityKind::Category, name))?;

        if !patch.apply_to(&mut category) {
            return Ok(category);
        }

        self.conn
            .execute(
                "UPDATE categories
                 SET
                    name = ?1,
                    description = ?2,
                    updated_at = (strftime('%s', 'now') * 1000)
                 WHERE id = ?3;",
                params![category.name.as_str(), category.description.as_deref(), id],
            )
            .map_err(|err| map_name_conflict(err, EntityKind::Category, &category.name))?;

        load_category_by_id(self.conn, id)
    }

    fn delete_category(&self, name: &str) -> RepoResult<Category> {
        let (id, category) = find_category_with_id(self.conn, name)?
            .ok_or_else(|| RepoError::not_found(EntityKind::Category, name))?;
        self.conn
            .execute("DELETE FROM categories WHERE id = ?1;", [id])?;
        Ok(category)
    }
}

pub(crate) fn insert_category(conn: &Connection, input: &NewCategory) -> RepoResult<i64> {
    input.validate()?;
    conn.execute(
        "INSERT INTO categories (name, description) VALUES (?1, ?2);",
        params![input.name.as_str(), input.description.as_deref()],
    )
    .map_err(|err| map_name_conflict(err, EntityKind::Category, &input.name))?;
    Ok(conn.last_insert_rowid())
}

pub(crate) fn find_category_id(conn: &Connection, name: &str) -> RepoResult<Option<i64>> {
    let id = conn
        .query_row("SELECT id FROM categories WHERE name = ?1;", [name], |row| {
            row.get(0)
        })
        .optional()?;
    Ok(id)
}

fn find_category_with_id(conn: &Connection, name: &str) -> RepoResult<Option<(i64, Category)>> {
    let found = conn
        .query_row(
            &format!("{CATEGORY_SELECT_SQL} WHERE name = ?1;"),
            [name],
            |row| Ok(parse_category_row(row)),
        )
        .optional()?;

    match found {
        Some(parsed) => {
            let (id, mut category) = parsed?;
            category.projects = load_project_names(conn, id)?;
            Ok(Some((id, category)))
        }
        None => Ok(None),
    }
}

fn load_category_by_id(conn: &Connection, id: i64) -> RepoResult<Category> {
    let parsed = conn
        .query_row(
            &format!("{CATEGORY_SELECT_SQL} WHERE id = ?1;"),
            [id],
            |row| Ok(parse_category_row(row)),
        )
        .optional()?
        .ok_or_else(|| RepoError::InvalidData(format!("category row {id} vanished")))?;
    let (id, mut category) = parsed?;
    category.projects = load_project_names(conn, id)?;
    Ok(category)
}

fn load_project_names(conn: &Connection, category_id: i64) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT p.name
         FROM project_categories pc
         INNER JOIN projects p ON p.id = pc.project_id
         WHERE pc.category_id = ?1
         ORDER BY pc.id ASC;",
    )?;
    let mut rows = stmt.query([category_id])?;
    let mut names = Vec::new();
    while let Some(row) = rows.next()? {
        names.push(row.get(0)?);
    }
    Ok(names)
}

fn parse_category_row(row: &Row<'_>) -> RepoResult<(i64, Category)> {
    Ok((
        row.get("id")?,
        Category {
            name: row.get("name")?,
            description: row.get("description")?,
            projects: Vec::new(),
        },
    ))
}
