//! Sample catalog shared by store, listing and HTTP tests.

use chrono::{TimeZone, Utc};
use tempfile::TempDir;

use super::model::*;
use super::sqlite::SqliteRepository;

pub async fn open_repo() -> (TempDir, SqliteRepository) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("movies.db");
    let repo = SqliteRepository::new(&path.to_string_lossy(), 2).await.unwrap();
    (dir, repo)
}

/// An opened repository holding [`sample_movies`]; returns the assigned ids.
pub async fn seeded_repo() -> (TempDir, SqliteRepository, Vec<String>) {
    let (dir, repo) = open_repo().await;
    let ids = repo.import_movies(sample_movies()).await.unwrap();
    (dir, repo, ids)
}

fn movie(title: &str, year: i32, genres: &[&str]) -> MovieDetail {
    MovieDetail {
        movie: Movie {
            id: String::new(),
            title: title.to_string(),
            year: Some(year),
            runtime: Some(100 + year % 40),
            genres: genres.iter().map(|g| g.to_string()).collect(),
            directors: vec![format!("Director of {}", title)],
            cast: vec!["First Actor".to_string(), "Second Actor".to_string()],
            plot: Some(format!("The plot of {}.", title)),
            poster: Some(format!("https://img.example.com/{}.jpg", year)),
            rated: Some("PG-13".to_string()),
            imdb: Some(Imdb {
                rating: Some(7.5),
                votes: Some(1000 + year as i64),
                id: Some(year as i64),
            }),
            awards: Some("1 win.".to_string()),
            movie_type: MovieType::Movie,
        },
        fullplot: Some(format!("The full plot of {}.", title)),
        languages: vec!["English".to_string()],
        countries: vec!["USA".to_string()],
        released: Some(Utc.with_ymd_and_hms(year, 3, 31, 0, 0, 0).unwrap()),
    }
}

/// Seven movies: three tagged `Sci-Fi`, two `Drama` (one stored as `drama`),
/// one series, one with no genres at all.
pub fn sample_movies() -> Vec<MovieDetail> {
    let mut series = movie("Band of Brothers", 2001, &["Drama", "War"]);
    series.movie.movie_type = MovieType::Series;
    series.movie.imdb = None;
    series.released = None;

    let mut bare = movie("Untitled Short", 1920, &[]);
    bare.movie.plot = None;
    bare.fullplot = None;

    vec![
        movie("The Matrix", 1999, &["Action", "Sci-Fi"]),
        movie("Heat", 1995, &["Action", "Crime", "Thriller"]),
        movie("The Matrix Reloaded", 2003, &["Action", "Sci-Fi"]),
        movie("Blade Runner", 1982, &["Sci-Fi", "Thriller"]),
        movie("Amélie", 2001, &["Comedy", "Romance", "drama"]),
        series,
        bare,
    ]
}
