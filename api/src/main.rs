use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::Uri;
use perra_core::Responder;
use perra_core::clock::ZonedClock;
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod counters;
mod error;
mod extract;
mod middleware;
mod page;
mod routes;
mod state;
mod uploads;

use crate::config::ServerConfig;
use crate::counters::CounterStore;
use crate::error::AppError;
use crate::state::AppState;
use crate::uploads::UploadStore;

// Room for multipart boundaries and headers on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Perra API",
        version = "0.1.0",
        description = "A chat bot that refuses to do anything useful, with character."
    ),
    paths(
        routes::health::health_check,
        routes::chat::chat,
        routes::stats::get_stats,
        routes::stats::record_refusal,
    ),
    components(schemas(
        HealthResponse,
        routes::chat::ChatRequest,
        routes::chat::ChatResponse,
        routes::stats::RefusalResponse,
        perra_core::stats::Counters,
        perra_core::error::ApiError,
    ))
)]
struct ApiDoc;

#[derive(Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

pub fn build_router(state: AppState, require_https: bool) -> Router {
    let uploads_dir = state.uploads.dir().to_path_buf();
    let body_limit = state.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .merge(routes::health::router())
        .merge(routes::index::router())
        .merge(routes::chat::router())
        .merge(routes::stats::router())
        .nest_service("/uploads", ServeDir::new(uploads_dir))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .option_layer(require_https.then(|| {
                    axum::middleware::from_fn(middleware::https::require_https)
                }))
                .layer(axum::middleware::from_fn(
                    middleware::security_headers::apply,
                ))
                .layer(middleware::cors::build_cors_layer()),
        )
        .with_state(state)
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound {
        resource: uri.path().to_string(),
    }
}

#[tokio::main]
async fn main() {
    // Load .env if present (dev only)
    let _ = dotenvy::dotenv();

    // Structured JSON logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "perra_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let config = ServerConfig::from_env().expect("Invalid configuration");

    let counters = CounterStore::new(&config.stats_path);
    counters
        .ensure_initialized()
        .await
        .expect("Failed to initialise counter file");

    let uploads = UploadStore::new(&config.upload_dir);
    uploads
        .ensure_dir()
        .await
        .expect("Failed to create upload directory");

    let responder = Responder::new(config.lexicon.clone()).expect("Invalid lexicon");

    let app_state = AppState {
        responder: Arc::new(responder),
        counters: Arc::new(counters),
        uploads,
        clock: Arc::new(ZonedClock::new(config.timezone)),
        max_upload_bytes: config.max_upload_bytes,
    };

    let app = build_router(app_state, config.require_https);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!(
        timezone = %config.timezone,
        stats = %config.stats_path.display(),
        uploads = %config.upload_dir.display(),
        "Perra API listening on {}",
        addr
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app)
        .await
        .expect("Server error");
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::http::{Method, Request, StatusCode, header};
    use chrono::NaiveDate;
    use perra_core::Responder;
    use perra_core::clock::FixedClock;
    use perra_core::stats::Counters;
    use tempfile::TempDir;
    use tower::ServiceExt;

    use super::build_router;
    use crate::counters::CounterStore;
    use crate::state::AppState;
    use crate::uploads::UploadStore;

    const BOUNDARY: &str = "perra-test-boundary";

    struct Harness {
        _dir: TempDir,
        state: AppState,
        app: Router,
    }

    fn harness() -> Harness {
        let dir = tempfile::tempdir().expect("tempdir");
        let now = NaiveDate::from_ymd_opt(2026, 2, 23)
            .and_then(|d| d.and_hms_opt(14, 30, 0))
            .expect("valid datetime");
        let state = AppState {
            responder: Arc::new(Responder::default()),
            counters: Arc::new(CounterStore::new(dir.path().join("stats.json"))),
            uploads: UploadStore::new(dir.path().join("uploads")),
            clock: Arc::new(FixedClock(now)),
            max_upload_bytes: 1024,
        };
        let app = build_router(state.clone(), false);
        Harness {
            _dir: dir,
            state,
            app,
        }
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
        let response = app
            .clone()
            .oneshot(request)
            .await
            .expect("request should succeed");
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should read")
            .to_vec();
        (status, headers, body)
    }

    fn chat_request(body: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/v1/chat")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request should build")
    }

    fn upload_request(filename: &str, content: &[u8]) -> Request<Body> {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method(Method::POST)
            .uri("/")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .expect("request should build")
    }

    async fn counters(h: &Harness) -> Counters {
        h.state.counters.snapshot().await.expect("snapshot")
    }

    #[tokio::test]
    async fn command_message_counts_as_refusal() {
        let h = harness();
        let (status, _, body) = send(&h.app, chat_request(r#"{"message": "Реши задачку"}"#)).await;
        assert_eq!(status, StatusCode::OK);

        let json: serde_json::Value = serde_json::from_slice(&body).expect("json");
        let reply = json["response"].as_str().expect("response string").to_string();
        assert!(h.state.responder.pool(Some(perra_core::Category::Command)).contains(&reply));

        let counters = counters(&h).await;
        assert_eq!(counters.chat_messages, 1);
        assert_eq!(counters.refusals, 1);
    }

    #[tokio::test]
    async fn greeting_uses_name_and_is_not_a_refusal() {
        let h = harness();
        let (status, _, body) = send(
            &h.app,
            chat_request(r#"{"message": "привет", "name": "Super Totch"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json");
        assert!(json["response"].as_str().unwrap_or_default().contains("Super Totch"));

        let counters = counters(&h).await;
        assert_eq!(counters.chat_messages, 1);
        assert_eq!(counters.refusals, 0);
    }

    #[tokio::test]
    async fn time_question_uses_injected_clock() {
        let h = harness();
        let (_, _, body) = send(&h.app, chat_request(r#"{"message": "который час?"}"#)).await;
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json");
        assert!(json["response"].as_str().unwrap_or_default().contains("14:30"));
    }

    #[tokio::test]
    async fn missing_message_is_treated_as_empty() {
        let h = harness();
        let (status, _, body) = send(&h.app, chat_request("{}")).await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json");
        assert!(!json["response"].as_str().unwrap_or_default().is_empty());
        assert_eq!(counters(&h).await.refusals, 0);
    }

    #[tokio::test]
    async fn non_string_message_is_rejected() {
        let h = harness();
        let (status, _, body) = send(&h.app, chat_request(r#"{"message": 5}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(json["error"], "validation_failed");
        assert_eq!(counters(&h).await.chat_messages, 0);
    }

    #[tokio::test]
    async fn index_counts_visits_and_renders_counters() {
        let h = harness();
        send(&h.app, Request::get("/").body(Body::empty()).expect("request")).await;
        let (status, headers, body) =
            send(&h.app, Request::get("/").body(Body::empty()).expect("request")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(
            headers
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .starts_with("text/html")
        );
        let html = String::from_utf8(body).expect("utf8");
        assert!(html.contains(r#"<div class="stat-number">2</div>"#));
        assert_eq!(counters(&h).await.visits, 2);
        assert!(headers.contains_key("x-frame-options"));
    }

    #[tokio::test]
    async fn upload_stores_file_and_redirects() {
        let h = harness();
        let (status, headers, _) = send(&h.app, upload_request("cat.png", b"\x89PNG")).await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(
            headers.get(header::LOCATION).expect("location"),
            "/?notice=uploaded"
        );

        let counters = counters(&h).await;
        assert_eq!(counters.uploads, 1);
        assert_eq!(counters.visits, 1);

        let stored = h.state.uploads.recent(12).await.expect("recent");
        assert_eq!(stored, vec!["20260223_143000_cat.png".to_string()]);

        let (status, _, body) = send(
            &h.app,
            Request::get("/uploads/20260223_143000_cat.png")
                .body(Body::empty())
                .expect("request"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"\x89PNG");

        let (_, _, page) = send(
            &h.app,
            Request::get("/?notice=uploaded").body(Body::empty()).expect("request"),
        )
        .await;
        let html = String::from_utf8(page).expect("utf8");
        assert!(html.contains("flash flash-success"));
        assert!(html.contains("/uploads/20260223_143000_cat.png"));
    }

    #[tokio::test]
    async fn upload_with_cyrillic_name_is_stored() {
        let h = harness();
        let (status, headers, _) = send(&h.app, upload_request("фото.png", b"\x89PNG")).await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(
            headers.get(header::LOCATION).expect("location"),
            "/?notice=uploaded"
        );
        assert_eq!(counters(&h).await.uploads, 1);
        let stored = h.state.uploads.recent(12).await.expect("recent");
        assert_eq!(stored, vec!["20260223_143000_.png".to_string()]);
    }

    #[tokio::test]
    async fn upload_with_unsupported_extension_is_refused() {
        let h = harness();
        let (status, headers, _) = send(&h.app, upload_request("notes.txt", b"hi")).await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(
            headers.get(header::LOCATION).expect("location"),
            "/?notice=unsupported"
        );
        assert_eq!(counters(&h).await.uploads, 0);
    }

    #[tokio::test]
    async fn upload_without_filename_is_empty() {
        let h = harness();
        let (_, headers, _) = send(&h.app, upload_request("", b"")).await;
        assert_eq!(
            headers.get(header::LOCATION).expect("location"),
            "/?notice=empty"
        );
    }

    #[tokio::test]
    async fn upload_without_multipart_is_missing() {
        let h = harness();
        let (status, headers, _) = send(
            &h.app,
            Request::builder()
                .method(Method::POST)
                .uri("/")
                .body(Body::empty())
                .expect("request"),
        )
        .await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(
            headers.get(header::LOCATION).expect("location"),
            "/?notice=missing"
        );
    }

    #[tokio::test]
    async fn refusal_endpoint_increments_counter() {
        let h = harness();
        send(&h.app, Request::get("/refusal").body(Body::empty()).expect("request")).await;
        let (status, _, body) =
            send(&h.app, Request::get("/refusal").body(Body::empty()).expect("request")).await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(json["status"], "ok");
        assert_eq!(json["refusals"], 2);
    }

    #[tokio::test]
    async fn stats_endpoint_reports_counters() {
        let h = harness();
        send(&h.app, chat_request(r#"{"message": "напиши код"}"#)).await;
        let (status, _, body) =
            send(&h.app, Request::get("/v1/stats").body(Body::empty()).expect("request")).await;
        assert_eq!(status, StatusCode::OK);
        let counters: Counters = serde_json::from_slice(&body).expect("counters json");
        assert_eq!(counters.chat_messages, 1);
        assert_eq!(counters.refusals, 1);
        assert_eq!(counters.visits, 0);
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let h = harness();
        let (status, _, body) =
            send(&h.app, Request::get("/health").body(Body::empty()).expect("request")).await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn unknown_route_is_structured_404() {
        let h = harness();
        let (status, _, body) =
            send(&h.app, Request::get("/nope").body(Body::empty()).expect("request")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(json["error"], "not_found");
    }

    #[tokio::test]
    async fn openapi_document_lists_chat() {
        let h = harness();
        let (status, _, body) = send(
            &h.app,
            Request::get("/api-doc/openapi.json").body(Body::empty()).expect("request"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json");
        assert!(json["paths"]["/v1/chat"].is_object());
    }
}
