use axum::{extract::Request, http::StatusCode, response::IntoResponse, routing::get, Router};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::db::MovieRepo;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn MovieRepo>,
}

impl AppState {
    pub fn new(db: Arc<dyn MovieRepo>) -> Self {
        Self { db }
    }
}

pub fn build_router(state: AppState) -> Router {
    let movie_routes = Router::new()
        .route("/api/movies", get(crate::api::list_movies))
        .route("/api/movies/genres", get(crate::api::list_genres))
        .route("/api/movies/:id", get(crate::api::get_movie));

    // Middleware added with `layer` runs after routing, too late to rewrite
    // the path. Wrap the whole router as the fallback of an outer one.
    let router = Router::new()
        .route("/robots.txt", get(robots_txt_handler))
        .merge(movie_routes)
        .fallback(fallback_handler)
        .layer(axum::middleware::from_fn(crate::middleware::log_request))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Router::new()
        .fallback_service(router)
        .layer(axum::middleware::from_fn(crate::middleware::normalize_path))
}

async fn robots_txt_handler() -> &'static str {
    "User-agent: *\nDisallow: /\n"
}

async fn fallback_handler(req: Request<axum::body::Body>) -> impl IntoResponse {
    if req.method() == axum::http::Method::OPTIONS {
        return StatusCode::OK.into_response();
    }
    StatusCode::NOT_FOUND.into_response()
}
