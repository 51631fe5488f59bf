use crate::db::MovieFilter;
use crate::util::QueryParams;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 12;

/// A listing request after coercion: page and limit are always >= 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page: i64,
    pub limit: i64,
    pub search: Option<String>,
    pub genre: Option<String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            search: None,
            genre: None,
        }
    }
}

impl ListQuery {
    /// Build from raw query parameters. Nothing here fails: missing or
    /// non-numeric page/limit fall back to the defaults, values below 1
    /// are raised to 1, and empty search/genre values are ignored.
    pub fn from_params(params: &QueryParams) -> Self {
        let page = params
            .get("page")
            .and_then(parse_leading_int)
            .filter(|&n| n != 0)
            .unwrap_or(DEFAULT_PAGE)
            .max(1);
        let limit = params
            .get("limit")
            .and_then(parse_leading_int)
            .filter(|&n| n != 0)
            .unwrap_or(DEFAULT_LIMIT)
            .max(1);

        Self {
            page,
            limit,
            search: params.get_non_empty("search").map(str::to_string),
            genre: params.get_non_empty("genre").map(str::to_string),
        }
    }

    /// Number of matching records to skip before this page.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    pub fn filter(&self) -> MovieFilter {
        MovieFilter {
            title_contains: self.search.clone(),
            genre: self.genre.clone(),
        }
    }
}

/// Parse the integer at the start of `s`: optional leading whitespace, an
/// optional sign, then decimal digits. Anything after the digits is
/// ignored, so `"3abc"` and `"3.9"` both give 3. Out-of-range values
/// saturate.
pub fn parse_leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }

    let mut value: i64 = 0;
    for b in rest[..digits].bytes() {
        value = value.saturating_mul(10).saturating_add(i64::from(b - b'0'));
    }
    Some(if negative { -value } else { value })
}
