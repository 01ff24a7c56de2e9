use axum::extract::multipart::{Multipart, MultipartError, MultipartRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, Redirect};
use axum::routing::get;
use axum::Router;
use perra_core::stats::CounterField;
use serde::Deserialize;

use crate::error::AppError;
use crate::page::{IndexView, Notice, render_index};
use crate::state::AppState;
use crate::uploads::{GALLERY_LIMIT, UploadError, allowed_file};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(index).post(upload))
}

#[derive(Debug, Deserialize)]
pub struct IndexQuery {
    #[serde(default)]
    pub notice: Option<String>,
}

/// Landing page with counters, gallery and chat box. Every view counts as a visit.
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<IndexQuery>,
) -> Result<Html<String>, AppError> {
    let counters = state.counters.increment(CounterField::Visits).await?;
    let images = state.uploads.recent(GALLERY_LIMIT).await?;

    Ok(Html(render_index(&IndexView {
        counters,
        images: &images,
        notice: query.notice.as_deref().and_then(Notice::parse),
        year: state.responder.lexicon().current_year,
        max_upload_bytes: state.max_upload_bytes,
    })))
}

/// Image upload form target. Always redirects back to the page with a notice.
pub async fn upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Redirect, AppError> {
    state.counters.increment(CounterField::Visits).await?;

    let notice = match multipart {
        Ok(multipart) => receive_upload(&state, multipart).await?,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "upload without multipart body");
            Notice::Missing
        }
    };

    Ok(Redirect::to(&format!("/?notice={}", notice.as_str())))
}

async fn receive_upload(state: &AppState, mut multipart: Multipart) -> Result<Notice, AppError> {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => return Ok(Notice::Missing),
            Err(err) => return Ok(notice_for_read_error(&err)),
        };
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        if filename.is_empty() {
            return Ok(Notice::Empty);
        }
        if !allowed_file(&filename) {
            return Ok(Notice::Unsupported);
        }

        let bytes = match field.bytes().await {
            Ok(bytes) => bytes,
            Err(err) => return Ok(notice_for_read_error(&err)),
        };
        if bytes.len() > state.max_upload_bytes {
            return Ok(Notice::TooLarge);
        }

        return match state.uploads.store(&filename, &bytes, state.clock.now()).await {
            Ok(_) => {
                state.counters.increment(CounterField::Uploads).await?;
                Ok(Notice::Uploaded)
            }
            Err(UploadError::UnsupportedExtension(ext)) => {
                tracing::debug!(ext = %ext, file = %filename, "upload rejected");
                Ok(Notice::Unsupported)
            }
            Err(e) => Err(e.into()),
        };
    }
}

fn notice_for_read_error(err: &MultipartError) -> Notice {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        Notice::TooLarge
    } else {
        tracing::debug!(error = %err, "malformed multipart body");
        Notice::Missing
    }
}
