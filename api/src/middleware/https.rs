use axum::extract::Request;
use axum::http::{HeaderValue, StatusCode, Uri};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

/// Redirect plain-HTTP requests to HTTPS, judging by `X-Forwarded-Proto`.
///
/// TLS is terminated by the reverse proxy in front of the service. `/health`
/// is never redirected so proxy probes keep working over plain HTTP. Every
/// response carries an HSTS header.
pub async fn require_https(req: Request, next: Next) -> Response {
    let proto = req
        .headers()
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("https");

    if proto.eq_ignore_ascii_case("http") && req.uri().path() != "/health" {
        if let Some(mut response) = https_redirect(&req) {
            add_hsts_header(&mut response);
            return response;
        }
    }

    let mut response = next.run(req).await;
    add_hsts_header(&mut response);
    response
}

fn https_redirect(req: &Request) -> Option<Response> {
    let host = req
        .headers()
        .get("host")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost");
    let path_and_query = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");

    let uri = format!("https://{host}{path_and_query}").parse::<Uri>().ok()?;
    Some((StatusCode::MOVED_PERMANENTLY, [("location", uri.to_string())]).into_response())
}

fn add_hsts_header(response: &mut Response) {
    response.headers_mut().insert(
        "strict-transport-security",
        HeaderValue::from_static("max-age=63072000; includeSubDomains"),
    );
}
