//! Request body extractor accepting JSON or URL-encoded forms.

use axum::{
    body::{self, Body},
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
    Form, Json,
};
use serde::de::DeserializeOwned;

use crate::error::AppError;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const BODY_LIMIT_BYTES: usize = 2 * 1024 * 1024;

/// Deserializes the body as a form when the request says so, as JSON
/// otherwise. An empty body yields `T::default()`.
pub struct Payload<T>(pub T);

impl<S, T> FromRequest<S> for Payload<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Default,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with(FORM_CONTENT_TYPE));

        let (parts, body) = req.into_parts();
        let bytes = body::to_bytes(body, BODY_LIMIT_BYTES)
            .await
            .map_err(|err| AppError::MalformedPayload(format!("unreadable body: {err}")))?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self(T::default()));
        }

        let req = Request::from_parts(parts, Body::from(bytes));
        if is_form {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(|rejection| AppError::MalformedPayload(rejection.body_text()))?;
            Ok(Self(value))
        } else {
            let Json(value) = Json::<T>::from_request(req, state)
                .await
                .map_err(|rejection| AppError::MalformedPayload(rejection.body_text()))?;
            Ok(Self(value))
        }
    }
}
