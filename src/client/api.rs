use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::state::BrowseState;
use crate::api::ErrorBody;
use crate::catalog::MoviePage;
use crate::config::ClientConfig;
use crate::db::MovieDetail;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Server returned {status}: {message}")]
    Status { status: StatusCode, message: String },
}

/// HTTP client for the listing service.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl CatalogClient {
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("marquee/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        let token = config.token_file.as_deref().and_then(load_token);
        Self::new(&config.base_url, token)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get(&self, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {}", url);
        let request = self.http.get(url);
        match self.token {
            Some(ref token) => request.bearer_auth(token),
            None => request,
        }
    }

    pub async fn list_movies(&self, state: &BrowseState) -> Result<MoviePage, ClientError> {
        let response = self.get("/movies").query(&state.list_params()).send().await?;
        decode(response).await
    }

    pub async fn genres(&self) -> Result<Vec<String>, ClientError> {
        let response = self.get("/movies/genres").send().await?;
        decode(response).await
    }

    /// `Ok(None)` when the service has no movie with this id.
    pub async fn get_movie(&self, id: &str) -> Result<Option<MovieDetail>, ClientError> {
        let path = format!("/movies/{}", urlencoding::encode(id));
        let response = self.get(&path).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        decode(response).await.map(Some)
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.message,
        Err(_) => status.canonical_reason().unwrap_or("unknown error").to_string(),
    };
    Err(ClientError::Status { status, message })
}

/// Read a bearer token from `path`. A missing or empty file means no token.
pub fn load_token(path: &str) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            let token = content.trim();
            if token.is_empty() {
                None
            } else {
                Some(token.to_string())
            }
        }
        Err(e) => {
            warn!("Cannot read token file {}: {}", path, e);
            None
        }
    }
}
