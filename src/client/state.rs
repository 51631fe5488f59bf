use std::borrow::Cow;

use crate::catalog::query::parse_leading_int;
use crate::util::QueryParams;

/// Number of movies the browser asks for per page.
pub const PAGE_SIZE: i64 = 20;

/// What the browser is looking at. This is passed explicitly into every
/// fetch; the query string form (`to_query`/`from_query`) is only a way
/// to persist or share it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowseState {
    pub page: i64,
    pub search: String,
    pub genre: String,
}

impl Default for BrowseState {
    fn default() -> Self {
        Self {
            page: 1,
            search: String::new(),
            genre: String::new(),
        }
    }
}

impl BrowseState {
    /// Parse a query string such as `page=2&search=heat&genre=Crime`.
    /// A leading `?` is allowed. Unknown keys are ignored.
    pub fn from_query(query: &str) -> Self {
        let params: QueryParams = query
            .trim_start_matches('?')
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                (decode(key), decode(value))
            })
            .collect();

        Self {
            page: params
                .get("page")
                .and_then(parse_leading_int)
                .unwrap_or(1)
                .max(1),
            search: params.get("search").unwrap_or_default().to_string(),
            genre: params.get("genre").unwrap_or_default().to_string(),
        }
    }

    /// Inverse of [`BrowseState::from_query`]; empty fields are left out.
    pub fn to_query(&self) -> String {
        let mut pairs = vec![format!("page={}", self.page)];
        if !self.search.is_empty() {
            pairs.push(format!("search={}", urlencoding::encode(&self.search)));
        }
        if !self.genre.is_empty() {
            pairs.push(format!("genre={}", urlencoding::encode(&self.genre)));
        }
        pairs.join("&")
    }

    /// Parameters for the listing endpoint.
    pub fn list_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("page", self.page.to_string()), ("limit", PAGE_SIZE.to_string())];
        if !self.search.is_empty() {
            params.push(("search", self.search.clone()));
        }
        if !self.genre.is_empty() {
            params.push(("genre", self.genre.clone()));
        }
        params
    }

    pub fn has_filters(&self) -> bool {
        !self.search.is_empty() || !self.genre.is_empty()
    }

    /// A new search starts over on page 1 and drops the genre filter.
    pub fn submit_search(&mut self, text: &str) {
        self.search = text.to_string();
        self.genre.clear();
        self.page = 1;
    }

    /// Select `genre`, or deselect it when it is already the active one.
    pub fn toggle_genre(&mut self, genre: &str) {
        if self.genre == genre {
            self.genre.clear();
        } else {
            self.genre = genre.to_string();
        }
        self.page = 1;
    }

    pub fn all_genres(&mut self) {
        self.genre.clear();
        self.page = 1;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Move forward unless already on the last page. Returns whether the page changed.
    pub fn next_page(&mut self, total_pages: i64) -> bool {
        if self.page >= total_pages {
            return false;
        }
        self.page += 1;
        true
    }

    pub fn prev_page(&mut self) -> bool {
        if self.page <= 1 {
            return false;
        }
        self.page -= 1;
        true
    }
}

fn decode(s: &str) -> String {
    let s = s.replace('+', " ");
    urlencoding::decode(&s)
        .map(Cow::into_owned)
        .unwrap_or_else(|_| s.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_round_trip() {
        let state = BrowseState {
            page: 3,
            search: "blade runner & co".to_string(),
            genre: "Sci-fi".to_string(),
        };
        let query = state.to_query();
        assert_eq!(query, "page=3&search=blade%20runner%20%26%20co&genre=Sci-fi");
        assert_eq!(BrowseState::from_query(&query), state);
    }

    #[test]
    fn test_from_query_defaults() {
        assert_eq!(BrowseState::from_query(""), BrowseState::default());
        assert_eq!(BrowseState::from_query("?page=zero").page, 1);
        assert_eq!(BrowseState::from_query("page=-2").page, 1);
        assert_eq!(BrowseState::from_query("search=the+matrix").search, "the matrix");
        assert_eq!(BrowseState::from_query("genre").genre, "");
    }

    #[test]
    fn test_list_params() {
        let state = BrowseState::default();
        assert_eq!(
            state.list_params(),
            vec![("page", "1".to_string()), ("limit", "20".to_string())]
        );

        let state = BrowseState {
            page: 2,
            search: "heat".to_string(),
            genre: "Crime".to_string(),
        };
        assert_eq!(state.list_params().len(), 4);
    }

    #[test]
    fn test_search_resets_page_and_genre() {
        let mut state = BrowseState {
            page: 4,
            search: String::new(),
            genre: "Drama".to_string(),
        };
        state.submit_search("amélie");
        assert_eq!(state.page, 1);
        assert_eq!(state.search, "amélie");
        assert_eq!(state.genre, "");
    }

    #[test]
    fn test_toggle_genre_keeps_search() {
        let mut state = BrowseState {
            page: 3,
            search: "the".to_string(),
            genre: String::new(),
        };
        state.toggle_genre("Drama");
        assert_eq!((state.page, state.genre.as_str(), state.search.as_str()), (1, "Drama", "the"));

        state.toggle_genre("Crime");
        assert_eq!(state.genre, "Crime");

        state.page = 2;
        state.toggle_genre("Crime");
        assert_eq!((state.page, state.genre.as_str()), (1, ""));
    }

    #[test]
    fn test_all_and_clear() {
        let mut state = BrowseState {
            page: 5,
            search: "x".to_string(),
            genre: "War".to_string(),
        };
        state.all_genres();
        assert_eq!((state.page, state.genre.as_str(), state.search.as_str()), (1, "", "x"));
        assert!(state.has_filters());

        state.clear();
        assert_eq!(state, BrowseState::default());
        assert!(!state.has_filters());
    }

    #[test]
    fn test_paging_bounds() {
        let mut state = BrowseState::default();
        assert!(!state.prev_page());
        assert!(state.next_page(2));
        assert_eq!(state.page, 2);
        assert!(!state.next_page(2));
        assert!(state.prev_page());
        assert_eq!(state.page, 1);
        assert!(!state.next_page(0));
    }
}
