use async_trait::async_trait;

use super::model::*;

/// Read access to the movie catalog.
#[async_trait]
pub trait MovieRepo: Send + Sync {
    /// One page of movies matching `filter`, in catalog order.
    async fn find_movies(&self, filter: &MovieFilter, offset: i64, limit: i64) -> DbResult<Vec<Movie>>;
    /// Number of movies matching `filter`, ignoring pagination.
    async fn count_movies(&self, filter: &MovieFilter) -> DbResult<i64>;
    async fn get_movie(&self, id: &str) -> DbResult<MovieDetail>;
    /// Every genre tag in the catalog, as stored, without duplicates.
    async fn distinct_genres(&self) -> DbResult<Vec<String>>;
}
