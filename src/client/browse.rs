use std::io::{self, Write};

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::warn;

use super::api::CatalogClient;
use super::state::BrowseState;
use super::view::{render, render_movie, ViewState};

const HELP: &str = "\
Commands:
  n            next page
  p            previous page
  /TEXT        search titles (empty text clears the search)
  g GENRE      toggle a genre filter
  a            all genres
  c            clear search and genre
  r            reload
  o ID|ROW     show one movie
  h            this help
  q            quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Next,
    Previous,
    Search(String),
    Genre(String),
    AllGenres,
    Clear,
    Reload,
    Open(String),
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Option<Command> {
        let line = line.trim();
        if let Some(text) = line.strip_prefix('/') {
            return Some(Command::Search(text.trim().to_string()));
        }

        let (word, arg) = match line.split_once(char::is_whitespace) {
            Some((word, arg)) => (word, arg.trim()),
            None => (line, ""),
        };

        let command = match (word, arg.is_empty()) {
            ("n" | "next", true) => Command::Next,
            ("p" | "prev" | "previous", true) => Command::Previous,
            ("g" | "genre", false) => Command::Genre(arg.to_string()),
            ("a" | "all", true) => Command::AllGenres,
            ("c" | "clear", true) => Command::Clear,
            ("r" | "reload" | "retry", true) => Command::Reload,
            ("o" | "open", false) => Command::Open(arg.to_string()),
            ("h" | "help" | "?", true) => Command::Help,
            ("q" | "quit", true) => Command::Quit,
            _ => return None,
        };
        Some(command)
    }
}

/// Apply a navigation command to `state`. Returns true when the listing
/// has to be fetched again.
pub fn apply(state: &mut BrowseState, command: &Command, genres: &[String], total_pages: i64) -> bool {
    match command {
        Command::Next => state.next_page(total_pages),
        Command::Previous => state.prev_page(),
        Command::Search(text) => {
            state.submit_search(text);
            true
        }
        Command::Genre(name) => {
            // Accept any casing for a genre the service advertised.
            let name = genres
                .iter()
                .find(|g| g.eq_ignore_ascii_case(name))
                .map(String::as_str)
                .unwrap_or(name);
            state.toggle_genre(name);
            true
        }
        Command::AllGenres => {
            state.all_genres();
            true
        }
        Command::Clear => {
            state.clear();
            true
        }
        Command::Reload => true,
        Command::Open(_) | Command::Help | Command::Quit => false,
    }
}

/// Resolve an `o` argument: a row number on the current page or a movie id.
fn resolve_movie_id(arg: &str, view: &ViewState) -> String {
    let movies = view.movies();
    match arg.parse::<usize>() {
        Ok(row) if row >= 1 && row <= movies.len() => movies[row - 1].id.clone(),
        _ => arg.to_string(),
    }
}

/// Interactive browse loop: render, read a command, repeat. Returns the
/// state the user left the browser in.
pub async fn run<R, W>(
    client: &CatalogClient,
    mut state: BrowseState,
    input: R,
    out: &mut W,
) -> io::Result<BrowseState>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let genres = match client.genres().await {
        Ok(genres) => genres,
        Err(e) => {
            warn!("Failed to fetch genres: {}", e);
            Vec::new()
        }
    };

    let mut lines = input.lines();
    let mut view = ViewState::Loading;
    let mut fetch = true;

    loop {
        if fetch {
            view = ViewState::Loading;
            writeln!(out, "{}", render(&state, &genres, &view))?;
            view = ViewState::from_result(client.list_movies(&state).await);
            writeln!(out, "{}", render(&state, &genres, &view))?;
            writeln!(out, "?{}", state.to_query())?;
        }

        write!(out, "> ")?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            fetch = false;
            continue;
        }

        let Some(command) = Command::parse(&line) else {
            writeln!(out, "Unknown command {:?}, h for help", line.trim())?;
            fetch = false;
            continue;
        };

        fetch = match command {
            Command::Quit => break,
            Command::Help => {
                writeln!(out, "{}", HELP)?;
                false
            }
            Command::Open(ref arg) => {
                let id = resolve_movie_id(arg, &view);
                match client.get_movie(&id).await {
                    Ok(Some(movie)) => writeln!(out, "{}", render_movie(&movie))?,
                    Ok(None) => writeln!(out, "Movie not found")?,
                    Err(e) => writeln!(out, "Failed to load movie: {}", e)?,
                }
                false
            }
            ref other => apply(&mut state, other, &genres, view.total_pages()),
        };
    }

    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::test_server::spawn_app;
    use crate::client::view::{EMPTY_MESSAGE, FAILED_MESSAGE, LOADING_MESSAGE};

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("n"), Some(Command::Next));
        assert_eq!(Command::parse(" prev "), Some(Command::Previous));
        assert_eq!(Command::parse("/the matrix "), Some(Command::Search("the matrix".into())));
        assert_eq!(Command::parse("/"), Some(Command::Search(String::new())));
        assert_eq!(Command::parse("g Sci-fi"), Some(Command::Genre("Sci-fi".into())));
        assert_eq!(Command::parse("o 3"), Some(Command::Open("3".into())));
        assert_eq!(Command::parse("q"), Some(Command::Quit));
        assert_eq!(Command::parse("g"), None);
        assert_eq!(Command::parse("n 2"), None);
        assert_eq!(Command::parse("dance"), None);
    }

    #[test]
    fn test_apply() {
        let genres = vec!["Drama".to_string(), "Sci-fi".to_string()];
        let mut state = BrowseState::default();

        assert!(!apply(&mut state, &Command::Next, &genres, 1));
        assert!(apply(&mut state, &Command::Next, &genres, 3));
        assert_eq!(state.page, 2);

        assert!(apply(&mut state, &Command::Genre("sci-FI".into()), &genres, 3));
        assert_eq!((state.page, state.genre.as_str()), (1, "Sci-fi"));

        assert!(apply(&mut state, &Command::Genre("Western".into()), &genres, 3));
        assert_eq!(state.genre, "Western");

        assert!(apply(&mut state, &Command::Search("heat".into()), &genres, 3));
        assert_eq!((state.search.as_str(), state.genre.as_str()), ("heat", ""));

        assert!(apply(&mut state, &Command::Reload, &genres, 3));
        assert!(!apply(&mut state, &Command::Help, &genres, 3));
    }

    #[tokio::test]
    async fn test_browse_session() {
        let (_dir, base_url, _ids) = spawn_app().await;
        let client = CatalogClient::new(&base_url, None).unwrap();

        let input = "g thriller\no 2\n/zzz\nc\nq\n".as_bytes();
        let mut out = Vec::new();
        let state = run(&client, BrowseState::default(), input, &mut out).await.unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(state, BrowseState::default());
        assert!(text.contains("[Thriller]"));
        assert!(text.contains("?page=1&genre=Thriller"));
        assert!(text.contains("Blade Runner (1982)\n"));
        assert!(text.contains("Directed by Director of Blade Runner"));
        assert!(text.contains(EMPTY_MESSAGE));
        assert!(!text.contains(FAILED_MESSAGE));
        // one loading screen per fetch: initial, genre, search, clear
        assert_eq!(text.matches(LOADING_MESSAGE).count(), 4);
        let first_loading = text.find(LOADING_MESSAGE).unwrap();
        assert!(first_loading < text.find("?page=1").unwrap());
    }

    #[tokio::test]
    async fn test_browse_against_dead_server_offers_retry() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = CatalogClient::new(&format!("http://{}/api", addr), None).unwrap();
        let mut out = Vec::new();
        run(&client, BrowseState::default(), "r\n".as_bytes(), &mut out)
            .await
            .unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(text.matches(FAILED_MESSAGE).count(), 2);
        assert!(text.contains("r: Try Again"));
        assert!(!text.contains(EMPTY_MESSAGE));
    }
}
