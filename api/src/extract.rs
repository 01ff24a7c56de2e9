//! Extractors that turn axum rejections into structured `AppError` responses.

use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
    http::StatusCode,
};

use crate::error::AppError;

/// Drop-in replacement for `axum::Json<T>` whose deserialization failures
/// produce a JSON `AppError` instead of axum's plain-text rejection.
pub struct AppJson<T>(pub T);

impl<S, T> FromRequest<S> for AppJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(AppJson(value)),
            Err(rejection) => Err(map_json_rejection(rejection)),
        }
    }
}

pub fn map_json_rejection(rejection: JsonRejection) -> AppError {
    let body_text = rejection.body_text();
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::PayloadTooLarge(body_text);
    }

    AppError::Validation {
        message: format!("Invalid request body: {body_text}"),
        field: Some(field_from_serde_message(&body_text).unwrap_or_else(|| "body".to_string())),
        docs_hint: Some(
            "Send a JSON object like {\"message\": \"привет\"} with Content-Type: application/json."
                .to_string(),
        ),
    }
}

/// Pull the offending field name out of a serde error message.
fn field_from_serde_message(msg: &str) -> Option<String> {
    for pattern in ["missing field `", "unknown field `"] {
        if let Some(start) = msg.find(pattern) {
            let after = &msg[start + pattern.len()..];
            if let Some(end) = after.find('`') {
                return Some(after[..end].to_string());
            }
        }
    }
    // "message: invalid type: integer `5`, expected a string"
    let (path, _) = msg.rsplit_once(": invalid type")?;
    let field = path.rsplit(' ').next()?.trim();
    (!field.is_empty() && field.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '.'))
        .then(|| field.to_string())
}
