use std::collections::BTreeSet;

/// Collapse genre tags that differ only by case and put them in display
/// form: first character upper-cased, the rest lower-cased. The result is
/// sorted and free of duplicates.
pub fn normalize_genres<I, S>(genres: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let keys: BTreeSet<String> = genres
        .into_iter()
        .map(|g| g.as_ref().to_lowercase())
        .filter(|g| !g.is_empty())
        .collect();

    let display: BTreeSet<String> = keys.iter().map(|g| capitalize(g)).collect();
    display.into_iter().collect()
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
