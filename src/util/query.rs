use std::collections::HashMap;

use serde::{Deserialize, Deserializer};

/// Raw query string parameters.
///
/// Values stay strings so that a malformed number never rejects the whole
/// request; callers decide how to coerce them. Lookups fall back to the
/// key with its first letter upper-cased (`page` also finds `Page`).
#[derive(Debug, Default, Clone)]
pub struct QueryParams {
    map: HashMap<String, String>,
}

impl<'de> Deserialize<'de> for QueryParams {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let map = HashMap::<String, String>::deserialize(deserializer)?;
        Ok(QueryParams { map })
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        QueryParams {
            map: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl QueryParams {
    pub fn get(&self, key: &str) -> Option<&str> {
        if let Some(val) = self.map.get(key) {
            return Some(val);
        }

        let mut chars = key.chars();
        match chars.next() {
            Some(first) if first.is_ascii_lowercase() => {
                let key2 = format!("{}{}", first.to_ascii_uppercase(), chars.as_str());
                self.map.get(&key2).map(|x| x.as_str())
            }
            _ => None,
        }
    }

    /// Like [`QueryParams::get`], but treats an empty value as absent.
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_with_capitalized_fallback() {
        let params: QueryParams = [("Page", "3"), ("limit", "5")].into_iter().collect();
        assert_eq!(params.get("page"), Some("3"));
        assert_eq!(params.get("limit"), Some("5"));
        assert_eq!(params.get("Limit"), None);
        assert_eq!(params.get("search"), None);
    }

    #[test]
    fn test_get_non_empty() {
        let params: QueryParams = [("search", ""), ("genre", "Drama")].into_iter().collect();
        assert_eq!(params.get("search"), Some(""));
        assert_eq!(params.get_non_empty("search"), None);
        assert_eq!(params.get_non_empty("genre"), Some("Drama"));
    }
}
