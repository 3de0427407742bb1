//! HTTP handlers and the request shapes they accept.
//!
//! Path segments use `_` in place of spaces; handlers decode names before
//! they reach the core.

use axum::Json;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use portfolio_core::{core_version, ping, EntityKind};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::AppError;

pub mod categories;
pub mod projects;

/// Body for project create/update. Every field is optional so one shape
/// serves both; create rejects a missing name through validation.
#[derive(Debug, Default, Deserialize)]
pub struct ProjectBody {
    pub name: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
}

/// Body for category create/update and for linking a category.
#[derive(Debug, Default, Deserialize)]
pub struct CategoryBody {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// GET /
pub async fn index() -> Json<Value> {
    Json(json!({
        "service": "portfolio",
        "status": ping(),
        "version": core_version(),
    }))
}

const SPACE_PLACEHOLDER: char = '_';

/// Turns the `_` placeholder back into spaces.
pub fn decode_name(segment: &str) -> String {
    segment.replace(SPACE_PLACEHOLDER, " ")
}

/// Rejects incoming names that path lookups could never reach again.
pub fn ensure_addressable(kind: EntityKind, name: Option<&str>) -> Result<(), AppError> {
    match name {
        Some(name) if name.contains(SPACE_PLACEHOLDER) => Err(AppError::UnaddressableName {
            kind,
            name: name.to_string(),
        }),
        _ => Ok(()),
    }
}

/// Parses an RFC 3339 timestamp, an offset-less `YYYY-MM-DDTHH:MM:SS`
/// (read as UTC) or a bare `YYYY-MM-DD` date (midnight UTC).
pub fn parse_date(raw: &str) -> Result<DateTime<Utc>, AppError> {
    let trimmed = raw.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(timestamp.with_timezone(&Utc));
    }
    if let Ok(local) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(local.and_utc());
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
        .ok_or_else(|| AppError::InvalidDate(trimmed.to_string()))
}

/// Parses an optional date field; blank form values count as absent.
pub fn parse_optional_date(raw: Option<&str>) -> Result<Option<DateTime<Utc>>, AppError> {
    match raw.map(str::trim) {
        Some("") | None => Ok(None),
        Some(value) => parse_date(value).map(Some),
    }
}

#[cfg(test)]
mod tests {
    use super::{decode_name, ensure_addressable, parse_date, parse_optional_date};
    use chrono::{TimeZone, Utc};
    use portfolio_core::EntityKind;

    #[test]
    fn decode_name_replaces_every_underscore() {
        assert_eq!(decode_name("my_big_project"), "my big project");
        assert_eq!(decode_name("plain"), "plain");
    }

    #[test]
    fn parse_date_accepts_rfc3339_and_plain_dates() {
        assert_eq!(
            parse_date("2020-05-17T10:00:00+02:00").unwrap(),
            Utc.with_ymd_and_hms(2020, 5, 17, 8, 0, 0).unwrap()
        );
        assert_eq!(
            parse_date("2020-05-17").unwrap(),
            Utc.with_ymd_and_hms(2020, 5, 17, 0, 0, 0).unwrap()
        );
        assert!(parse_date("next tuesday").is_err());
    }

    #[test]
    fn parse_date_reads_offsetless_timestamps_as_utc() {
        assert_eq!(
            parse_date("2020-05-17T10:00:00").unwrap(),
            Utc.with_ymd_and_hms(2020, 5, 17, 10, 0, 0).unwrap()
        );
        assert_eq!(
            parse_date("2020-05-17T10:00:00.250").unwrap(),
            Utc.timestamp_millis_opt(1_589_709_600_250).unwrap()
        );
    }

    #[test]
    fn names_with_the_space_placeholder_are_rejected() {
        let err = ensure_addressable(EntityKind::Project, Some("snake_case")).unwrap_err();
        assert_eq!(err.code(), "validation_failed");
        assert!(ensure_addressable(EntityKind::Category, Some("two words")).is_ok());
        assert!(ensure_addressable(EntityKind::Category, None).is_ok());
    }

    #[test]
    fn blank_optional_date_is_absent() {
        assert_eq!(parse_optional_date(Some("  ")).unwrap(), None);
        assert_eq!(parse_optional_date(None).unwrap(), None);
    }
}
