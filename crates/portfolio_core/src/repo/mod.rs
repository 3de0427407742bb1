//! Repository layer contracts and SQLite implementations.
//!
//! # Responsibility
//! - Provide name-keyed CRUD over the `projects` and `categories`
//!   collections.
//! - Own the link-table writes that keep both association lists consistent.
//!
//! # Invariants
//! - Repository writes validate inputs before any SQL mutation.
//! - Repository APIs return semantic errors (`NotFound`, `DuplicateName`,
//!   `AssociationNotFound`) in addition to DB transport errors.
//! - A link row is visible from both sides, so the association lists can
//!   never disagree.

use crate::db::DbError;
use crate::model::{EntityKind, ValidationError};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod association_repo;
pub mod category_repo;
pub mod project_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error shared by entity and association operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    Db(DbError),
    NotFound {
        kind: EntityKind,
        name: String,
    },
    DuplicateName {
        kind: EntityKind,
        name: String,
    },
    AssociationNotFound {
        project: String,
        category: String,
    },
    InvalidData(String),
    MissingRequiredTable(&'static str),
}

impl RepoError {
    pub(crate) fn not_found(kind: EntityKind, name: &str) -> Self {
        Self::NotFound {
            kind,
            name: name.to_string(),
        }
    }

    /// Stable machine-readable code for logs and API error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_failed",
            Self::Db(_) => "db_error",
            Self::NotFound { .. } => "not_found",
            Self::DuplicateName { .. } => "duplicate_name",
            Self::AssociationNotFound { .. } => "association_not_found",
            Self::InvalidData(_) => "invalid_data",
            Self::MissingRequiredTable(_) => "schema_not_ready",
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { kind, name } => write!(f, "{kind} not found: `{name}`"),
            Self::DuplicateName { kind, name } => {
                write!(f, "{kind} with name `{name}` already exists")
            }
            Self::AssociationNotFound { project, category } => write!(
                f,
                "category `{category}` is not linked to project `{project}`"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Maps a `UNIQUE(name)` violation to `DuplicateName`, passing other
/// errors through.
pub(crate) fn map_name_conflict(err: rusqlite::Error, kind: EntityKind, name: &str) -> RepoError {
    match &err {
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            RepoError::DuplicateName {
                kind,
                name: name.to_string(),
            }
        }
        _ => err.into(),
    }
}

pub(crate) fn ensure_tables(conn: &Connection, tables: &[&'static str]) -> RepoResult<()> {
    for &table in tables {
        let exists: i64 = conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table],
            |row| row.get(0),
        )?;
        if exists != 1 {
            return Err(RepoError::MissingRequiredTable(table));
        }
    }
    Ok(())
}
