pub mod api;
pub mod catalog;
pub mod client;
pub mod config;
pub mod db;
pub mod middleware;
pub mod server;
pub mod util;

use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Database error: {0}")]
    Database(#[from] db::DbError),
    #[error("Client error: {0}")]
    Client(#[from] client::ClientError),
    #[error("Server error: {0}")]
    Server(String),
}

/// Run the listing service until it fails.
pub async fn run(config_path: &str, debug_logs: bool) -> Result<(), ServerError> {
    let config = config::Config::from_file(config_path)?;

    info!("Using config file: {}", config_path);
    if debug_logs {
        info!("Debug logging enabled");
    }

    let db_path = config
        .get_database_path()
        .ok_or_else(|| ServerError::Server("No database path configured".to_string()))?;

    info!("Opening database at {}", db_path);
    let db = db::SqliteRepository::new(&db_path, config.database.max_connections).await?;

    if let Some(ref seed_file) = config.catalog.seed_file {
        db.seed_from_file(seed_file).await?;
    }

    let address = config.listen.address.as_deref().unwrap_or("[::]");
    let port = &config.listen.port;
    let addr: SocketAddr = format!("{}:{}", address, port)
        .parse()
        .map_err(|e| ServerError::Server(format!("Invalid address: {}", e)))?;

    let tls = match (&config.listen.tlscert, &config.listen.tlskey) {
        (Some(cert), Some(key)) => Some((cert.clone(), key.clone())),
        _ => None,
    };

    let state = server::AppState::new(Arc::new(db));
    let app = server::build_router(state);

    if let Some((cert_path, key_path)) = tls {
        info!("Loading TLS certificate from {}", cert_path);
        info!("Loading TLS key from {}", key_path);

        let tls_config = axum_server::tls_rustls::RustlsConfig::from_pem_file(&cert_path, &key_path)
            .await
            .map_err(|e| ServerError::Server(format!("Failed to load TLS config: {}", e)))?;

        info!("Serving HTTPS on {}", addr);

        axum_server::bind_rustls(addr, tls_config)
            .serve(app.into_make_service())
            .await
            .map_err(|e| ServerError::Server(format!("Server error: {}", e)))?;
    } else {
        info!("Serving HTTP on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Server(format!("Failed to bind: {}", e)))?;

        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Server(format!("Server error: {}", e)))?;
    }

    Ok(())
}

/// Run the interactive terminal browser against a listing service.
/// `initial_query` seeds the browse state (`page=2&genre=Drama`).
pub async fn browse(config_path: &str, base_url: Option<&str>, initial_query: &str) -> Result<(), ServerError> {
    let mut config = config::Config::from_file_or_default(config_path)?;
    if let Some(url) = base_url {
        config.client.base_url = url.to_string();
    }

    let client = client::CatalogClient::from_config(&config.client)?;
    info!("Browsing {}", client.base_url());

    let state = client::BrowseState::from_query(initial_query);
    let input = tokio::io::BufReader::new(tokio::io::stdin());
    let mut out = std::io::stdout();

    let state = client::browse::run(&client, state, input, &mut out)
        .await
        .map_err(|e| ServerError::Server(format!("Terminal error: {}", e)))?;
    info!("Left browser at ?{}", state.to_query());

    Ok(())
}
