use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::db::DbError;

/// Body of every error response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(&'static str),
    /// `message` is what the client sees; `source` is only logged.
    #[error("{message}: {source}")]
    Internal {
        message: &'static str,
        #[source]
        source: DbError,
    },
}

impl ApiError {
    pub fn internal(message: &'static str) -> impl FnOnce(DbError) -> ApiError {
        move |source| ApiError::Internal { message, source }
    }
}

impl From<DbError> for ApiError {
    fn from(source: DbError) -> Self {
        ApiError::Internal {
            message: "Server error",
            source,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            ApiError::Internal { message, ref source } => {
                error!("{}: {}", message, source);
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        };

        let body = ErrorBody {
            message: message.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_error_maps_to_server_error() {
        let err: ApiError = DbError::Sqlx(sqlx::Error::PoolTimedOut).into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_not_found_status() {
        let response = ApiError::NotFound("Movie not found").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_internal_keeps_public_message() {
        let err = ApiError::internal("Failed to fetch genres")(DbError::NotFound("x".into()));
        assert!(err.to_string().starts_with("Failed to fetch genres: "));
    }
}
