use std::fmt::Write;

use super::api::ClientError;
use super::state::BrowseState;
use crate::catalog::MoviePage;
use crate::db::{Movie, MovieDetail};

pub const FAILED_MESSAGE: &str = "Failed to load movies. Make sure the backend server is running.";
pub const EMPTY_MESSAGE: &str = "No movies found";
pub const LOADING_MESSAGE: &str = "Loading movies...";

/// What the movie grid shows. A failed fetch and a fetch that found
/// nothing are separate states with separate messages.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    Loading,
    Failed(String),
    Empty(MoviePage),
    Loaded(MoviePage),
}

impl ViewState {
    pub fn from_result(result: Result<MoviePage, ClientError>) -> Self {
        match result {
            Ok(page) if page.movies.is_empty() => ViewState::Empty(page),
            Ok(page) => ViewState::Loaded(page),
            Err(e) => ViewState::Failed(e.to_string()),
        }
    }

    pub fn page(&self) -> Option<&MoviePage> {
        match self {
            ViewState::Empty(page) | ViewState::Loaded(page) => Some(page),
            _ => None,
        }
    }

    /// Total page count; 1 until a page has been loaded.
    pub fn total_pages(&self) -> i64 {
        self.page().map(|p| p.total_pages).unwrap_or(1)
    }

    pub fn total(&self) -> i64 {
        self.page().map(|p| p.total).unwrap_or(0)
    }

    pub fn movies(&self) -> &[Movie] {
        self.page().map(|p| p.movies.as_slice()).unwrap_or(&[])
    }
}

/// Render the browse screen: header, genre chips, active filters, the
/// grid (or its loading, error or empty state) and the pager.
pub fn render(state: &BrowseState, genres: &[String], view: &ViewState) -> String {
    let mut out = String::new();

    let _ = write!(out, "Movies");
    if !state.search.is_empty() {
        let _ = write!(out, "  search: {}", state.search);
    }
    if view.total() > 0 {
        let _ = write!(out, "  ({} movies)", group_thousands(view.total()));
    }
    out.push('\n');

    out.push_str(&chip("All", state.genre.is_empty()));
    for genre in genres {
        out.push(' ');
        out.push_str(&chip(genre, state.genre == *genre));
    }
    out.push('\n');

    if state.has_filters() {
        out.push_str("Showing results for:");
        if !state.search.is_empty() {
            let _ = write!(out, " \"{}\"", state.search);
        }
        if !state.genre.is_empty() {
            let _ = write!(out, " {}", state.genre);
        }
        out.push_str("  (c: clear all)\n");
    }
    out.push('\n');

    match view {
        ViewState::Loading => {
            let _ = writeln!(out, "{}", LOADING_MESSAGE);
        }
        ViewState::Failed(reason) => {
            let _ = writeln!(out, "{}", FAILED_MESSAGE);
            let _ = writeln!(out, "  ({})", reason);
            out.push_str("r: Try Again\n");
        }
        ViewState::Empty(_) => {
            let _ = writeln!(out, "{}", EMPTY_MESSAGE);
            out.push_str("Try a different search or genre filter.\n");
        }
        ViewState::Loaded(page) => {
            for (i, movie) in page.movies.iter().enumerate() {
                let _ = writeln!(out, "{:>3}. {}", i + 1, movie_line(movie));
            }
        }
    }

    let total_pages = view.total_pages();
    if !matches!(view, ViewState::Loading) && total_pages > 1 {
        let prev = if state.page <= 1 { "  " } else { "p:" };
        let next = if state.page >= total_pages { "  " } else { "n:" };
        let _ = writeln!(
            out,
            "\n{} Previous   Page {} of {}   {} Next",
            prev, state.page, total_pages, next
        );
    }

    out
}

/// Render a single record with its detail fields.
pub fn render_movie(detail: &MovieDetail) -> String {
    let movie = &detail.movie;
    let mut out = String::new();

    let _ = writeln!(out, "{}", title_with_year(movie));
    let mut facts = Vec::new();
    if let Some(ref rated) = movie.rated {
        facts.push(rated.clone());
    }
    if let Some(runtime) = movie.runtime {
        facts.push(format!("{} min", runtime));
    }
    if !movie.genres.is_empty() {
        facts.push(movie.genres.join(", "));
    }
    facts.push(movie.movie_type.as_str().to_string());
    let _ = writeln!(out, "{}", facts.join(" · "));

    if let Some(ref imdb) = movie.imdb {
        if let Some(rating) = imdb.rating {
            let _ = write!(out, "IMDb {:.1}", rating);
            if let Some(votes) = imdb.votes {
                let _ = write!(out, " ({} votes)", group_thousands(votes));
            }
            out.push('\n');
        }
    }
    if !movie.directors.is_empty() {
        let _ = writeln!(out, "Directed by {}", movie.directors.join(", "));
    }
    if !movie.cast.is_empty() {
        let _ = writeln!(out, "Cast: {}", movie.cast.join(", "));
    }
    if let Some(plot) = detail.fullplot.as_ref().or(movie.plot.as_ref()) {
        let _ = writeln!(out, "\n{}", plot);
    }
    if let Some(ref awards) = movie.awards {
        let _ = writeln!(out, "\nAwards: {}", awards);
    }
    if let Some(released) = detail.released {
        let _ = writeln!(out, "Released: {}", released.format("%Y-%m-%d"));
    }
    if !detail.languages.is_empty() {
        let _ = writeln!(out, "Languages: {}", detail.languages.join(", "));
    }
    if !detail.countries.is_empty() {
        let _ = writeln!(out, "Countries: {}", detail.countries.join(", "));
    }
    if let Some(ref poster) = movie.poster {
        let _ = writeln!(out, "Poster: {}", poster);
    }

    out
}

fn chip(label: &str, active: bool) -> String {
    if active {
        format!("[{}]", label)
    } else {
        label.to_string()
    }
}

fn title_with_year(movie: &Movie) -> String {
    match movie.year {
        Some(year) => format!("{} ({})", movie.title, year),
        None => movie.title.clone(),
    }
}

fn movie_line(movie: &Movie) -> String {
    let mut line = title_with_year(movie);
    if !movie.genres.is_empty() {
        let _ = write!(line, " · {}", movie.genres.join(", "));
    }
    if let Some(rating) = movie.imdb.as_ref().and_then(|i| i.rating) {
        let _ = write!(line, " · ★ {:.1}", rating);
    }
    let _ = write!(line, "  [{}]", movie.id);
    line
}

/// `1234567` -> `1,234,567`.
fn group_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
