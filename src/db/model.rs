use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovieType {
    #[default]
    Movie,
    Series,
}

impl MovieType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovieType::Movie => "movie",
            MovieType::Series => "series",
        }
    }

    pub fn parse(s: &str) -> Self {
        if s.eq_ignore_ascii_case("series") {
            MovieType::Series
        } else {
            MovieType::Movie
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Imdb {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub votes: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
}

impl Imdb {
    pub fn is_empty(&self) -> bool {
        self.rating.is_none() && self.votes.is_none() && self.id.is_none()
    }
}

/// A catalog entry as returned by the listing endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    #[serde(rename = "_id", default)]
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<i32>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub directors: Vec<String>,
    #[serde(default)]
    pub cast: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plot: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rated: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imdb: Option<Imdb>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub awards: Option<String>,
    #[serde(rename = "type", default)]
    pub movie_type: MovieType,
}

/// The full stored record, returned by single-record lookup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovieDetail {
    #[serde(flatten)]
    pub movie: Movie,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fullplot: Option<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub countries: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub released: Option<DateTime<Utc>>,
}

/// Store filter for the listing query. `None` fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovieFilter {
    /// Case-insensitive substring of the title.
    pub title_contains: Option<String>,
    /// Genre tag, compared by its lower-cased key.
    pub genre: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Failed to read {0}: {1}")]
    Io(String, std::io::Error),
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type DbResult<T> = Result<T, DbError>;
