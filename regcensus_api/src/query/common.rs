//! Shared query infrastructure: the [`Query`] trait and list serialization.

use std::fmt::Display;

use url::Url;

/// Trait implemented by all query builders.
pub trait Query {
    /// Appends this query's parameters to the given URL, returning the modified URL.
    fn add_to_url(&self, url: &Url) -> Url;
}

/// Serializes a list the way the API expects it: `1,2,3`.
pub(crate) fn join<T: Display>(items: &[T]) -> String {
    items
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Appends `key=value`, keeping list commas literal and encoding spaces as
/// `%20`. Only the characters that would split the pair are escaped here; the
/// rest is percent-encoded by [`Url::set_query`].
pub(crate) fn append_pair(url: &mut Url, key: &str, value: &str) {
    let pair = format!("{}={}", escape(key), escape(value));
    let query = match url.query() {
        Some(existing) if !existing.is_empty() => format!("{}&{}", existing, pair),
        _ => pair,
    };
    url.set_query(Some(&query));
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '%' => out.push_str("%25"),
            '&' => out.push_str("%26"),
            '=' => out.push_str("%3D"),
            '+' => out.push_str("%2B"),
            '#' => out.push_str("%23"),
            _ => out.push(c),
        }
    }
    out
}

/// Appends `key=join(items)` unless `items` is empty.
pub(crate) fn append_list<T: Display>(url: &mut Url, key: &str, items: &[T]) {
    if !items.is_empty() {
        append_pair(url, key, &join(items));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_single_and_many() {
        assert_eq!(join(&[7]), "7");
        assert_eq!(join(&[1, 2, 3]), "1,2,3");
        assert_eq!(join::<i64>(&[]), "");
    }

    #[test]
    fn empty_list_leaves_url_untouched() {
        let mut url = Url::parse("https://example.com/dataseries").unwrap();
        append_list::<i64>(&mut url, "series", &[]);
        assert_eq!(url.as_str(), "https://example.com/dataseries");
    }

    #[test]
    fn lists_keep_commas_and_spaces_become_percent_20() {
        let mut url = Url::parse("https://example.com/values").unwrap();
        append_list(&mut url, "year", &[2019, 2020]);
        append_pair(&mut url, "keyword", "Fish & Wildlife");
        assert_eq!(
            url.as_str(),
            "https://example.com/values?year=2019,2020&keyword=Fish%20%26%20Wildlife"
        );
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs[1], ("keyword".to_string(), "Fish & Wildlife".to_string()));
    }
}
