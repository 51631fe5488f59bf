use axum::{extract::Request, http::uri::Uri, middleware::Next, response::Response};
use tracing::info;

/// Collapse repeated slashes in the request path (`/api//movies` -> `/api/movies`).
pub async fn normalize_path(mut req: Request, next: Next) -> Response {
    let uri = req.uri();
    let path = uri.path();

    if path.contains("//") {
        let mut normalized = path.to_string();
        while normalized.contains("//") {
            normalized = normalized.replace("//", "/");
        }

        let new_path_and_query = match uri.query() {
            Some(query) => format!("{}?{}", normalized, query),
            None => normalized,
        };

        let mut parts = uri.clone().into_parts();
        if let Ok(new_uri) = new_path_and_query.parse::<Uri>() {
            parts.path_and_query = new_uri.into_parts().path_and_query;
            if let Ok(new_uri) = Uri::from_parts(parts) {
                *req.uri_mut() = new_uri;
            }
        }
    }

    next.run(req).await
}

pub async fn log_request(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();

    let response = next.run(req).await;

    let status = response.status().as_u16();
    let content_length = response
        .headers()
        .get(axum::http::header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(0);

    info!(
        method = %method,
        url = %uri,
        status = status,
        length = content_length,
        "HTTP request"
    );

    response
}
