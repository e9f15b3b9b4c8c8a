//! Name → identifier maps built from the metadata endpoints.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Serializer};

/// Minimum Jaro-Winkler score for a "did you mean" suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.85;

/// Display names mapped to identifiers, sorted by name, with a reversed
/// view sorted by identifier.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LookupMap {
    forward: BTreeMap<String, i64>,
    reverse: BTreeMap<i64, String>,
}

impl LookupMap {
    /// Builds both views from `(name, id)` pairs. Later duplicates win.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, i64)>,
    {
        let mut map = LookupMap::default();
        for (name, id) in pairs {
            map.reverse.insert(id, name.clone());
            map.forward.insert(name, id);
        }
        map
    }

    pub fn get(&self, name: &str) -> Option<i64> {
        self.forward.get(name).copied()
    }

    pub fn name_of(&self, id: i64) -> Option<&str> {
        self.reverse.get(&id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.forward.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn as_map(&self) -> &BTreeMap<String, i64> {
        &self.forward
    }

    /// Identifier → name, sorted by identifier.
    pub fn reversed(&self) -> &BTreeMap<i64, String> {
        &self.reverse
    }

    /// The known name closest to `name`, if any is close enough to suggest.
    pub fn closest(&self, name: &str) -> Option<&str> {
        let wanted = name.to_lowercase();
        self.forward
            .keys()
            .map(|k| (strsim::jaro_winkler(&wanted, &k.to_lowercase()), k))
            .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
            .max_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, k)| k.as_str())
    }
}

impl fmt::Display for LookupMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, id) in &self.forward {
            writeln!(f, "'{}': {}", name, id)?;
        }
        Ok(())
    }
}

impl Serialize for LookupMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.forward.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn states() -> LookupMap {
        LookupMap::from_pairs(vec![
            ("Alabama".to_string(), 59),
            ("Alaska".to_string(), 58),
            ("United States".to_string(), 38),
        ])
    }

    #[test]
    fn forward_is_sorted_by_name() {
        let map = states();
        let names: Vec<&str> = map.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["Alabama", "Alaska", "United States"]);
    }

    #[test]
    fn reversed_is_sorted_by_id() {
        let map = states();
        let ids: Vec<i64> = map.reversed().keys().copied().collect();
        assert_eq!(ids, vec![38, 58, 59]);
        assert_eq!(map.name_of(58), Some("Alaska"));
    }

    #[test]
    fn closest_suggests_near_misses_only() {
        let map = states();
        assert_eq!(map.closest("alabma"), Some("Alabama"));
        assert_eq!(map.closest("Wyoming"), None);
    }

    #[test]
    fn display_lists_every_entry() {
        let text = states().to_string();
        assert_eq!(text, "'Alabama': 59\n'Alaska': 58\n'United States': 38\n");
    }
}
