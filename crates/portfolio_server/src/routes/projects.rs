//! `/projects` handlers, including the project-side association routes.

use axum::extract::{Path, State};
use axum::Json;
use portfolio_core::{
    AssociationService, EntityKind, NewCategory, NewProject, Project, ProjectPatch, ProjectService,
    RepoResult, SqliteAssociationRepository, SqliteProjectRepository,
};
use rusqlite::Connection;

use super::{decode_name, ensure_addressable, parse_optional_date, CategoryBody, ProjectBody};
use crate::error::AppError;
use crate::extract::Payload;
use crate::state::AppState;

fn projects(conn: &Connection) -> RepoResult<ProjectService<SqliteProjectRepository<'_>>> {
    Ok(ProjectService::new(SqliteProjectRepository::try_new(conn)?))
}

fn associations(
    conn: &mut Connection,
) -> RepoResult<AssociationService<SqliteAssociationRepository<'_>>> {
    Ok(AssociationService::new(SqliteAssociationRepository::try_new(conn)?))
}

/// GET /projects
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Project>>, AppError> {
    let items = state
        .store
        .run(|conn| projects(conn)?.list_projects())
        .await?;
    Ok(Json(items))
}

/// GET /projects/{name}
pub async fn get(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Project>, AppError> {
    let name = decode_name(&name);
    let project = state
        .store
        .run(move |conn| projects(conn)?.get_project(&name))
        .await?;
    Ok(Json(project))
}

/// POST /projects
pub async fn create(
    State(state): State<AppState>,
    Payload(body): Payload<ProjectBody>,
) -> Result<Json<Project>, AppError> {
    ensure_addressable(EntityKind::Project, body.name.as_deref())?;
    let input = NewProject {
        name: body.name.unwrap_or_default(),
        description: body.description,
        date: parse_optional_date(body.date.as_deref())?,
    };
    let project = state
        .store
        .run(move |conn| projects(conn)?.create_project(&input))
        .await?;
    Ok(Json(project))
}

/// PUT /projects/{name}
pub async fn update(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Payload(body): Payload<ProjectBody>,
) -> Result<Json<Project>, AppError> {
    let name = decode_name(&name);
    ensure_addressable(EntityKind::Project, body.name.as_deref())?;
    let patch = ProjectPatch {
        name: body.name,
        description: body.description,
        date: parse_optional_date(body.date.as_deref())?,
    };
    let project = state
        .store
        .run(move |conn| projects(conn)?.update_project(&name, &patch))
        .await?;
    Ok(Json(project))
}

/// DELETE /projects/{name}
pub async fn delete(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Project>, AppError> {
    let name = decode_name(&name);
    let project = state
        .store
        .run(move |conn| projects(conn)?.delete_project(&name))
        .await?;
    Ok(Json(project))
}

/// GET /projects/{name}/categories
pub async fn list_categories(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Vec<String>>, AppError> {
    let name = decode_name(&name);
    let names = state
        .store
        .run(move |conn| associations(conn)?.list_project_categories(&name))
        .await?;
    Ok(Json(names))
}

/// POST /projects/{name}/categories
pub async fn add_category(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Payload(body): Payload<CategoryBody>,
) -> Result<Json<Project>, AppError> {
    let name = decode_name(&name);
    ensure_addressable(EntityKind::Category, body.name.as_deref())?;
    let category = NewCategory {
        name: body.name.unwrap_or_default(),
        description: body.description,
    };
    let project = state
        .store
        .run(move |conn| associations(conn)?.add_category_to_project(&name, &category))
        .await?;
    Ok(Json(project))
}

/// DELETE /projects/{name}/categories/{category_name}
pub async fn remove_category(
    State(state): State<AppState>,
    Path((name, category_name)): Path<(String, String)>,
) -> Result<Json<Project>, AppError> {
    let name = decode_name(&name);
    let category_name = decode_name(&category_name);
    let project = state
        .store
        .run(move |conn| {
            associations(conn)?.remove_category_from_project(&name, &category_name)
        })
        .await?;
    Ok(Json(project))
}
