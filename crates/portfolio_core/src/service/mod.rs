//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Emit one metadata-only log event per mutation.
//! - Keep the HTTP layer decoupled from storage details.

use crate::repo::RepoResult;
use log::{info, warn};

pub mod association_service;
pub mod category_service;
pub mod project_service;

/// Logs the outcome of a mutating use-case without echoing user input.
pub(crate) fn log_outcome<T>(event: &'static str, result: &RepoResult<T>) {
    match result {
        Ok(_) => info!("event={event} module=service status=ok"),
        Err(err) => warn!(
            "event={event} module=service status=error error_code={}",
            err.code()
        ),
    }
}
