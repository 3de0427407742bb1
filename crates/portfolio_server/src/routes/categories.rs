//! `/categories` handlers.

use axum::extract::{Path, State};
use axum::Json;
use portfolio_core::{
    Category, CategoryPatch, CategoryService, EntityKind, NewCategory, RepoResult,
    SqliteCategoryRepository,
};
use rusqlite::Connection;

use super::{decode_name, ensure_addressable, CategoryBody};
use crate::error::AppError;
use crate::extract::Payload;
use crate::state::AppState;

fn categories(conn: &Connection) -> RepoResult<CategoryService<SqliteCategoryRepository<'_>>> {
    Ok(CategoryService::new(SqliteCategoryRepository::try_new(conn)?))
}

/// GET /categories
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Category>>, AppError> {
    let items = state
        .store
        .run(|conn| categories(conn)?.list_categories())
        .await?;
    Ok(Json(items))
}

/// GET /categories/{name}
pub async fn get(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Category>, AppError> {
    let name = decode_name(&name);
    let category = state
        .store
        .run(move |conn| categories(conn)?.get_category(&name))
        .await?;
    Ok(Json(category))
}

/// POST /categories
pub async fn create(
    State(state): State<AppState>,
    Payload(body): Payload<CategoryBody>,
) -> Result<Json<Category>, AppError> {
    ensure_addressable(EntityKind::Category, body.name.as_deref())?;
    let input = NewCategory {
        name: body.name.unwrap_or_default(),
        description: body.description,
    };
    let category = state
        .store
        .run(move |conn| categories(conn)?.create_category(&input))
        .await?;
    Ok(Json(category))
}

/// PUT /categories/{name}
pub async fn update(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Payload(body): Payload<CategoryBody>,
) -> Result<Json<Category>, AppError> {
    let name = decode_name(&name);
    ensure_addressable(EntityKind::Category, body.name.as_deref())?;
    let patch = CategoryPatch {
        name: body.name,
        description: body.description,
    };
    let category = state
        .store
        .run(move |conn| categories(conn)?.update_category(&name, &patch))
        .await?;
    Ok(Json(category))
}

/// DELETE /categories/{name}
pub async fn delete(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Category>, AppError> {
    let name = decode_name(&name);
    let category = state
        .store
        .run(move |conn| categories(conn)?.delete_category(&name))
        .await?;
    Ok(Json(category))
}
