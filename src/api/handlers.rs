use axum::{
    extract::{rejection::PathRejection, Path, Query, State},
    Json,
};
use tracing::debug;

use super::error::{ApiError, ApiResult};
use crate::catalog::{self, ListQuery, MoviePage};
use crate::db::MovieDetail;
use crate::server::AppState;
use crate::util::QueryParams;

/// `GET /api/movies?page&limit&search&genre`
pub async fn list_movies(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> ApiResult<Json<MoviePage>> {
    let query = ListQuery::from_params(&params);
    let page = catalog::list_movies(state.db.as_ref(), &query).await?;
    Ok(Json(page))
}

/// `GET /api/movies/genres`
pub async fn list_genres(State(state): State<AppState>) -> ApiResult<Json<Vec<String>>> {
    let genres = catalog::list_genres(state.db.as_ref())
        .await
        .map_err(ApiError::internal("Failed to fetch genres"))?;
    Ok(Json(genres))
}

/// `GET /api/movies/:id`
pub async fn get_movie(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<MovieDetail>> {
    // An id that does not even decode can never name a stored movie.
    let Path(id) = path.map_err(|e| {
        debug!("rejecting undecodable movie id: {}", e);
        ApiError::NotFound("Movie not found")
    })?;

    catalog::find_movie(state.db.as_ref(), &id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("Movie not found"))
}
