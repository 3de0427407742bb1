//! Project repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide name-keyed CRUD over the `projects` collection.
//! - Project the linked category names into `Project::categories`.
//!
//! # Invariants
//! - `list_projects` returns storage-native (insertion) order.
//! - `categories` is read in link insertion order.
//! - Deleting a project removes its link rows through the FK cascade.

use crate::model::project::{NewProject, Project, ProjectPatch};
use crate::model::EntityKind;
use crate::repo::{ensure_tables, map_name_conflict, RepoError, RepoResult};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

const PROJECT_SELECT_SQL: &str = "SELECT
    id,
    name,
    description,
    date_ms
FROM projects";

/// Repository interface for project CRUD operations.
pub trait ProjectRepository {
    /// Persists a new project. Fails with `DuplicateName` for a taken name.
    fn create_project(&self, input: &NewProject) -> RepoResult<Project>;
    fn list_projects(&self) -> RepoResult<Vec<Project>>;
    fn find_project(&self, name: &str) -> RepoResult<Option<Project>>;
    /// Applies present-and-different patch fields and returns the result.
    fn update_project(&self, name: &str, patch: &ProjectPatch) -> RepoResult<Project>;
    /// Removes the project and returns it as it was before removal.
    fn delete_project(&self, name: &str) -> RepoResult<Project>;

    fn get_project(&self, name: &str) -> RepoResult<Project> {
        self.find_project(name)?
            .ok_or_else(|| RepoError::not_found(EntityKind::Project, name))
    }
}

/// SQLite-backed project repository.
pub struct SqliteProjectRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProjectRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["projects", "categories", "project_categories"])?;
        Ok(Self { conn })
    }
}

impl ProjectRepository for SqliteProjectRepository<'_> {
    fn create_project(&self, input: &NewProject) -> RepoResult<Project> {
        let id = insert_project(self.conn, input)?;
        load_project_by_id(self.conn, id)
    }

    fn list_projects(&self) -> RepoResult<Vec<Project>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PROJECT_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut projects = Vec::new();
        while let Some(row) = rows.next()? {
            let (id, mut project) = parse_project_row(row)?;
            project.categories = load_category_names(self.conn, id)?;
            projects.push(project);
        }
        Ok(projects)
    }

    fn find_project(&self, name: &str) -> RepoResult<Option<Project>> {
        Ok(find_project_with_id(self.conn, name)?.map(|(_, project)| project))
    }

    fn update_project(&self, name: &str, patch: &ProjectPatch) -> RepoResult<Project> {
        patch.validate()?;
        let (id, mut project) = find_project_with_id(self.conn, name)?
            .ok_or_else(|| RepoError::not_found(EntityKind::Project, name))?;

        if !patch.apply_to(&mut project) {
            return Ok(project);
        }

        self.conn
            .execute(
                "UPDATE projects
                 SET
                    name = ?1,
                    description = ?2,
                    date_ms = ?3,
                    updated_at = (strftime('%s', 'now') * 1000)
                 WHERE id = ?4;",
                params![
                    project.name.as_str(),
                    project.description.as_deref(),
                    project.date.map(|date| date.timestamp_millis()),
                    id,
                ],
            )
            .map_err(|err| map_name_conflict(err, EntityKind::Project, &project.name))?;

        load_project_by_id(self.conn, id)
    }

    fn delete_project(&self, name: &str) -> RepoResult<Project> {
        let (id, project) = find_project_with_id(self.conn, name)?
            .ok_or_else(|| RepoError::not_found(EntityKind::Project, name))?;
        self.conn
            .execute("DELETE FROM projects WHERE id = ?1;", [id])?;
        Ok(project)
    }
}

fn insert_project(conn: &Connection, input: &NewProject) -> RepoResult<i64> {
    input.validate()?;
    conn.execute(
        "INSERT INTO projects (name, description, date_ms) VALUES (?1, ?2, ?3);",
        params![
            input.name.as_str(),
            input.description.as_deref(),
            input.date.map(|date| date.timestamp_millis()),
        ],
    )
    .map_err(|err| map_name_conflict(err, EntityKind::Project, &input.name))?;
    Ok(conn.last_insert_rowid())
}

/// Loads a project and its internal row id by exact name.
pub(crate) fn find_project_with_id(
    conn: &Connection,
    name: &str,
) -> RepoResult<Option<(i64, Project)>> {
    let found = conn
        .query_row(
            &format!("{PROJECT_SELECT_SQL} WHERE name = ?1;"),
            [name],
            |row| Ok(parse_project_row(row)),
        )
        .optional()?;

    match found {
        Some(parsed) => {
            let (id, mut project) = parsed?;
            project.categories = load_category_names(conn, id)?;
            Ok(Some((id, project)))
        }
        None => Ok(None),
    }
}

pub(crate) fn load_project_by_id(conn: &Connection, id: i64) -> RepoResult<Project> {
    let parsed = conn
        .query_row(
            &format!("{PROJECT_SELECT_SQL} WHERE id = ?1;"),
            [id],
            |row| Ok(parse_project_row(row)),
        )
        .optional()?
        .ok_or_else(|| RepoError::InvalidData(format!("project row {id} vanished")))?;
    let (id, mut project) = parsed?;
    project.categories = load_category_names(conn, id)?;
    Ok(project)
}

fn load_category_names(conn: &Connection, project_id: i64) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT c.name
         FROM project_categories pc
         INNER JOIN categories c ON c.id = pc.category_id
         WHERE pc.project_id = ?1
         ORDER BY pc.id ASC;",
    )?;
    let mut rows = stmt.query([project_id])?;
    let mut names = Vec::new();
    while let Some(row) = rows.next()? {
        names.push(row.get(0)?);
    }
    Ok(names)
}

fn parse_project_row(row: &Row<'_>) -> RepoResult<(i64, Project)> {
    let id: i64 = row.get("id")?;
    let date = match row.get::<_, Option<i64>>("date_ms")? {
        Some(ms) => Some(DateTime::<Utc>::from_timestamp_millis(ms).ok_or_else(|| {
            RepoError::InvalidData(format!("invalid date_ms value `{ms}` in projects.date_ms"))
        })?),
        None => None,
    };

    Ok((
        id,
        Project {
            name: row.get("name")?,
            description: row.get("description")?,
            date,
            categories: Vec::new(),
        },
    ))
}
