//! Listing, genre and lookup operations over a [`MovieRepo`].

pub mod genres;
pub mod page;
pub mod query;

pub use genres::normalize_genres;
pub use page::{total_pages, MoviePage};
pub use query::{ListQuery, DEFAULT_LIMIT, DEFAULT_PAGE};

use tracing::debug;

use crate::db::{DbResult, MovieDetail, MovieRepo};
use crate::util::is_valid_id;

/// Run the page query and the match count concurrently and package the
/// result. A page past the end is simply empty.
pub async fn list_movies(repo: &dyn MovieRepo, query: &ListQuery) -> DbResult<MoviePage> {
    let filter = query.filter();
    debug!(?filter, page = query.page, limit = query.limit, "listing movies");

    let (movies, total) = tokio::try_join!(
        repo.find_movies(&filter, query.offset(), query.limit),
        repo.count_movies(&filter),
    )?;

    Ok(MoviePage::new(query.page, query.limit, total, movies))
}

/// The catalog's genre tags in display form.
pub async fn list_genres(repo: &dyn MovieRepo) -> DbResult<Vec<String>> {
    let raw = repo.distinct_genres().await?;
    Ok(normalize_genres(raw))
}

/// Look up one movie. Malformed identifiers never reach the store and
/// yield `None`, same as an identifier nobody has.
pub async fn find_movie(repo: &dyn MovieRepo, id: &str) -> DbResult<Option<MovieDetail>> {
    if !is_valid_id(id) {
        debug!("rejecting malformed movie id {:?}", id);
        return Ok(None);
    }

    match repo.get_movie(id).await {
        Ok(movie) => Ok(Some(movie)),
        Err(crate::db::DbError::NotFound(_)) => Ok(None),
        Err(e) => Err(e),
    }
}
