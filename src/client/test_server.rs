use std::sync::Arc;

use tempfile::TempDir;

use crate::db::fixtures::seeded_repo;
use crate::server::{build_router, AppState};

/// Serve the sample catalog on an ephemeral local port.
/// Returns the API base url and the movie ids in catalog order.
pub async fn spawn_app() -> (TempDir, String, Vec<String>) {
    let (dir, repo, ids) = seeded_repo().await;
    let app = build_router(AppState::new(Arc::new(repo)));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

    (dir, format!("http://{}/api", addr), ids)
}
