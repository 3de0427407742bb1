//! HTTP-facing error type.
//!
//! Every failure renders as `{"Error": <message>, "Cause": <code>}` with a
//! status derived from the error kind.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::error;
use portfolio_core::db::DbError;
use portfolio_core::{EntityKind, RepoError};
use serde_json::json;
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Repo(#[from] RepoError),

    #[error("store error: {0}")]
    Store(#[from] DbError),

    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    #[error("invalid date `{0}`; expected RFC 3339, YYYY-MM-DDTHH:MM:SS or YYYY-MM-DD")]
    InvalidDate(String),

    #[error("{kind} name `{name}` must not contain `_`; paths use it in place of a space")]
    UnaddressableName { kind: EntityKind, name: String },

    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("store lock poisoned")]
    StorePoisoned,

    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Repo(err) => match err {
                RepoError::NotFound { .. } | RepoError::AssociationNotFound { .. } => {
                    StatusCode::NOT_FOUND
                }
                RepoError::DuplicateName { .. } => StatusCode::CONFLICT,
                RepoError::Validation(_) => StatusCode::BAD_REQUEST,
                RepoError::Db(_)
                | RepoError::InvalidData(_)
                | RepoError::MissingRequiredTable(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::MalformedPayload(_) | Self::InvalidDate(_) | Self::UnaddressableName { .. } => {
                StatusCode::BAD_REQUEST
            }
            Self::Store(_) | Self::Config(_) | Self::StorePoisoned | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Stable machine-readable code rendered as `Cause`.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Repo(err) => err.code(),
            Self::Store(_) => "db_error",
            Self::MalformedPayload(_) => "malformed_payload",
            Self::InvalidDate(_) => "invalid_date",
            Self::UnaddressableName { .. } => "validation_failed",
            Self::Config(_) => "config_error",
            Self::StorePoisoned => "store_unavailable",
            Self::Internal(_) => "internal_error",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(
                "event=request_failed module=http status=error error_code={} error={}",
                self.code(),
                self
            );
        }

        let body = json!({
            "Error": self.to_string(),
            "Cause": self.code(),
        });
        (status, Json(body)).into_response()
    }
}
