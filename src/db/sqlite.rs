use std::collections::HashSet;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqlitePool, SqlitePoolOptions};
use sqlx::{QueryBuilder, Sqlite};
use tracing::{debug, info, warn};

use super::model::*;
use super::repo::*;
use crate::util::{generate_id, is_valid_id};

/// Columns of the listing projection, in `MovieRow` order.
const MOVIE_COLUMNS: &str = "id, title, year, runtime, genres, directors, castlist, plot, poster, rated, \
     imdb_rating, imdb_votes, imdb_id, awards, type";

pub struct SqliteRepository {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct MovieRow {
    id: String,
    title: String,
    year: Option<i32>,
    runtime: Option<i32>,
    genres: String,
    directors: String,
    castlist: String,
    plot: Option<String>,
    poster: Option<String>,
    rated: Option<String>,
    imdb_rating: Option<f64>,
    imdb_votes: Option<i64>,
    imdb_id: Option<i64>,
    awards: Option<String>,
    #[sqlx(rename = "type")]
    movie_type: String,
}

impl MovieRow {
    fn into_movie(self) -> DbResult<Movie> {
        let imdb = Imdb {
            rating: self.imdb_rating,
            votes: self.imdb_votes,
            id: self.imdb_id,
        };
        Ok(Movie {
            id: self.id,
            title: self.title,
            year: self.year,
            runtime: self.runtime,
            genres: serde_json::from_str(&self.genres)?,
            directors: serde_json::from_str(&self.directors)?,
            cast: serde_json::from_str(&self.castlist)?,
            plot: self.plot,
            poster: self.poster,
            rated: self.rated,
            imdb: if imdb.is_empty() { None } else { Some(imdb) },
            awards: self.awards,
            movie_type: MovieType::parse(&self.movie_type),
        })
    }
}

#[derive(sqlx::FromRow)]
struct MovieDetailRow {
    #[sqlx(flatten)]
    movie: MovieRow,
    fullplot: Option<String>,
    languages: String,
    countries: String,
    released: Option<String>,
}

impl MovieDetailRow {
    fn into_detail(self) -> DbResult<MovieDetail> {
        let released = match self.released {
            Some(s) => match DateTime::parse_from_rfc3339(&s) {
                Ok(dt) => Some(dt.with_timezone(&Utc)),
                Err(e) => {
                    warn!(
                        "movie {}: ignoring unparseable released date {:?}: {}",
                        self.movie.id, s, e
                    );
                    None
                }
            },
            None => None,
        };
        Ok(MovieDetail {
            movie: self.movie.into_movie()?,
            fullplot: self.fullplot,
            languages: serde_json::from_str(&self.languages)?,
            countries: serde_json::from_str(&self.countries)?,
            released,
        })
    }
}

impl SqliteRepository {
    pub async fn new(db_path: &str, max_connections: u32) -> DbResult<Self> {
        let options = SqliteConnectOptions::from_str(db_path)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(options)
            .await?;

        let repo = Self { pool };
        repo.init_schema().await?;

        info!("Database initialized at {}", db_path);

        Ok(repo)
    }

    async fn init_schema(&self) -> DbResult<()> {
        let schema = include_str!("schema.sql");
        sqlx::raw_sql(schema).execute(&self.pool).await?;
        Ok(())
    }

    /// Load a JSON array of movie records into an empty catalog.
    /// Returns the number of records loaded; a non-empty catalog is left alone.
    pub async fn seed_from_file(&self, path: &str) -> DbResult<usize> {
        let existing = self.count_movies(&MovieFilter::default()).await?;
        if existing > 0 {
            info!("Catalog already holds {} movies, skipping seed file {}", existing, path);
            return Ok(0);
        }

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| DbError::Io(path.to_string(), e))?;
        let movies: Vec<MovieDetail> = serde_json::from_str(&content)?;

        let ids = self.import_movies(movies).await?;
        info!("Seeded {} movies from {}", ids.len(), path);
        Ok(ids.len())
    }

    /// Insert `movies` in one transaction, assigning identifiers to records
    /// that lack a valid one. Returns the identifiers in input order.
    pub async fn import_movies(&self, movies: Vec<MovieDetail>) -> DbResult<Vec<String>> {
        let mut tx = self.pool.begin().await?;
        let mut seen = HashSet::new();
        let mut ids = Vec::with_capacity(movies.len());

        for mut detail in movies {
            if !is_valid_id(&detail.movie.id) || seen.contains(&detail.movie.id) {
                detail.movie.id = unique_id(&detail.movie, &seen);
            }
            seen.insert(detail.movie.id.clone());
            insert_movie(&mut *tx, &detail).await?;
            debug!("Imported {} as {}", detail.movie.title, detail.movie.id);
            ids.push(detail.movie.id);
        }

        tx.commit().await?;
        Ok(ids)
    }
}

fn unique_id(movie: &Movie, seen: &HashSet<String>) -> String {
    let base = match movie.year {
        Some(year) => format!("{} ({})", movie.title, year),
        None => movie.title.clone(),
    };
    let mut id = generate_id(&base);
    let mut n = 1;
    while seen.contains(&id) {
        n += 1;
        id = generate_id(&format!("{}#{}", base, n));
    }
    id
}

async fn insert_movie(conn: &mut SqliteConnection, detail: &MovieDetail) -> DbResult<()> {
    let movie = &detail.movie;
    let imdb = movie.imdb.clone().unwrap_or_default();

    sqlx::query(
        "INSERT INTO movies
        (id, title, title_key, year, runtime, genres, directors, castlist, plot, fullplot,
         poster, rated, imdb_rating, imdb_votes, imdb_id, awards, type, languages, countries, released)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&movie.id)
    .bind(&movie.title)
    .bind(movie.title.to_lowercase())
    .bind(movie.year)
    .bind(movie.runtime)
    .bind(serde_json::to_string(&movie.genres)?)
    .bind(serde_json::to_string(&movie.directors)?)
    .bind(serde_json::to_string(&movie.cast)?)
    .bind(&movie.plot)
    .bind(&detail.fullplot)
    .bind(&movie.poster)
    .bind(&movie.rated)
    .bind(imdb.rating)
    .bind(imdb.votes)
    .bind(imdb.id)
    .bind(&movie.awards)
    .bind(movie.movie_type.as_str())
    .bind(serde_json::to_string(&detail.languages)?)
    .bind(serde_json::to_string(&detail.countries)?)
    .bind(detail.released.as_ref().map(|dt| dt.to_rfc3339()))
    .execute(&mut *conn)
    .await?;

    for genre in &movie.genres {
        sqlx::query("INSERT OR IGNORE INTO movie_genres (movieid, genre, genre_key) VALUES (?, ?, ?)")
            .bind(&movie.id)
            .bind(genre)
            .bind(genre.to_lowercase())
            .execute(&mut *conn)
            .await?;
    }

    Ok(())
}

fn push_filter(query: &mut QueryBuilder<'_, Sqlite>, filter: &MovieFilter) {
    query.push(" WHERE 1 = 1");

    if let Some(ref text) = filter.title_contains {
        // instr() instead of LIKE: the search text is matched literally.
        query
            .push(" AND instr(movies.title_key, ")
            .push_bind(text.to_lowercase())
            .push(") > 0");
    }

    if let Some(ref genre) = filter.genre {
        query
            .push(" AND EXISTS (SELECT 1 FROM movie_genres g WHERE g.movieid = movies.id AND g.genre_key = ")
            .push_bind(genre.to_lowercase())
            .push(")");
    }
}

#[async_trait]
impl MovieRepo for SqliteRepository {
    async fn find_movies(&self, filter: &MovieFilter, offset: i64, limit: i64) -> DbResult<Vec<Movie>> {
        let mut query = QueryBuilder::<Sqlite>::new(format!("SELECT {} FROM movies", MOVIE_COLUMNS));
        push_filter(&mut query, filter);
        query
            .push(" ORDER BY movies.rowid LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        let rows = query.build_query_as::<MovieRow>().fetch_all(&self.pool).await?;
        rows.into_iter().map(MovieRow::into_movie).collect()
    }

    async fn count_movies(&self, filter: &MovieFilter) -> DbResult<i64> {
        let mut query = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM movies");
        push_filter(&mut query, filter);

        let count: i64 = query.build_query_scalar().fetch_one(&self.pool).await?;
        Ok(count)
    }

    async fn get_movie(&self, id: &str) -> DbResult<MovieDetail> {
        let sql = format!(
            "SELECT {}, fullplot, languages, countries, released FROM movies WHERE id = ?",
            MOVIE_COLUMNS
        );
        let row = sqlx::query_as::<_, MovieDetailRow>(&sql)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::RowNotFound => DbError::NotFound(format!("Movie not found: {}", id)),
                _ => DbError::Sqlx(e),
            })?;

        row.into_detail()
    }

    async fn distinct_genres(&self) -> DbResult<Vec<String>> {
        let genres = sqlx::query_scalar::<_, String>("SELECT DISTINCT genre FROM movie_genres ORDER BY genre")
            .fetch_all(&self.pool)
            .await?;
        Ok(genres)
    }
}
