use serde::{Deserialize, Serialize};

use crate::db::Movie;

/// One page of listing results plus the pagination metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoviePage {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
    pub movies: Vec<Movie>,
}

impl MoviePage {
    pub fn new(page: i64, limit: i64, total: i64, movies: Vec<Movie>) -> Self {
        Self {
            page,
            limit,
            total,
            total_pages: total_pages(total, limit),
            movies,
        }
    }
}

/// `ceil(total / limit)`. An empty result has zero pages.
pub fn total_pages(total: i64, limit: i64) -> i64 {
    if total <= 0 || limit <= 0 {
        return 0;
    }
    total / limit + i64::from(total % limit != 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 12), 0);
        assert_eq!(total_pages(1, 12), 1);
        assert_eq!(total_pages(12, 12), 1);
        assert_eq!(total_pages(13, 12), 2);
        assert_eq!(total_pages(7, 1), 7);
        assert_eq!(total_pages(i64::MAX, 2), i64::MAX / 2 + 1);
    }

    #[test]
    fn test_serializes_camel_case() {
        let page = MoviePage::new(2, 10, 25, Vec::new());
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "page": 2,
                "limit": 10,
                "total": 25,
                "totalPages": 3,
                "movies": [],
            })
        );
    }
}
