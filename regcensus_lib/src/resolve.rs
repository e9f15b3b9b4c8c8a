//! Name → id resolution for values requests.

use crate::client::RegCensus;
use crate::error::{LookupKind, RegCensusError};
use crate::lookup::LookupMap;
use crate::params::{LabelLookup, LabelSelector, LabelSource, Selector};

impl RegCensus {
    pub async fn resolve_series(&self, selector: &Selector) -> Result<Vec<i64>, RegCensusError> {
        match selector.names() {
            None => Ok(selector.ids().unwrap_or_default()),
            Some(names) => resolve_names(&self.list_series().await?, &names, LookupKind::Series),
        }
    }

    pub async fn resolve_jurisdictions(
        &self,
        selector: &Selector,
    ) -> Result<Vec<i64>, RegCensusError> {
        match selector.names() {
            None => Ok(selector.ids().unwrap_or_default()),
            Some(names) => resolve_names(
                &self.list_jurisdictions().await?,
                &names,
                LookupKind::Jurisdiction,
            ),
        }
    }

    /// Agency names are looked up among the agencies of every requested
    /// jurisdiction.
    pub async fn resolve_agencies(
        &self,
        selector: &Selector,
        jurisdictions: &[i64],
    ) -> Result<Vec<i64>, RegCensusError> {
        let Some(names) = selector.names() else {
            return Ok(selector.ids().unwrap_or_default());
        };
        let mut pairs = Vec::new();
        for jurisdiction in jurisdictions {
            let map = self.list_agencies(Some(*jurisdiction), None).await?;
            pairs.extend(map.iter().map(|(name, id)| (name.to_string(), id)));
        }
        resolve_names(&LookupMap::from_pairs(pairs), &names, LookupKind::Agency)
    }

    pub async fn resolve_clusters(&self, selector: &Selector) -> Result<Vec<i64>, RegCensusError> {
        match selector.names() {
            None => Ok(selector.ids().unwrap_or_default()),
            Some(names) => resolve_names(&self.list_clusters().await?, &names, LookupKind::Cluster),
        }
    }

    /// Resolves an industry filter to the values sent as `label`.
    ///
    /// NAICS codes map to label ids; codes of other standards are sent as-is.
    /// Names match either the full `"Name (code)"` key or the bare name.
    pub async fn resolve_labels(
        &self,
        selector: &LabelSelector,
        level: Option<u8>,
        source: &LabelSource,
    ) -> Result<Vec<String>, RegCensusError> {
        let lookup = LabelLookup::default()
            .with_level(level.unwrap_or(3))
            .with_source(Some(source.clone()));

        match selector {
            LabelSelector::Ids(ids) => Ok(ids.iter().map(i64::to_string).collect()),
            LabelSelector::Codes(codes) if !source.is_naics() => Ok(codes.clone()),
            LabelSelector::Codes(codes) => {
                let map = self.list_industries(&lookup.with_only_id(true)).await?;
                let codes: Vec<&str> = codes.iter().map(String::as_str).collect();
                Ok(resolve_names(&map, &codes, LookupKind::Industry)?
                    .into_iter()
                    .map(|id| id.to_string())
                    .collect())
            }
            LabelSelector::Names(names) => {
                let map = self.list_industries(&lookup).await?;
                names
                    .iter()
                    .map(|name| {
                        industry_by_name(&map, name)
                            .map(|id| id.to_string())
                            .ok_or_else(|| lookup_error(&map, name, LookupKind::Industry))
                    })
                    .collect()
            }
        }
    }
}

fn resolve_names(
    map: &LookupMap,
    names: &[&str],
    kind: LookupKind,
) -> Result<Vec<i64>, RegCensusError> {
    names
        .iter()
        .map(|name| map.get(name).ok_or_else(|| lookup_error(map, name, kind)))
        .collect()
}

fn industry_by_name(map: &LookupMap, name: &str) -> Option<i64> {
    map.get(name).or_else(|| {
        let prefix = format!("{} (", name);
        map.iter()
            .find(|(key, _)| key.starts_with(&prefix))
            .map(|(_, id)| id)
    })
}

fn lookup_error(map: &LookupMap, name: &str, kind: LookupKind) -> RegCensusError {
    tracing::debug!("no {} named '{}' among {} entries", kind, name, map.len());
    RegCensusError::Lookup {
        kind,
        name: name.to_string(),
        suggestion: map.closest(name).map(String::from),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;

    fn industries() -> LookupMap {
        LookupMap::from_pairs(vec![
            ("Crop Production (111)".to_string(), 200),
            ("Animal Production and Aquaculture (112)".to_string(), 201),
            ("Fishing, Hunting and Trapping (114)".to_string(), 203),
        ])
    }

    #[test]
    fn resolves_every_name() {
        let map = LookupMap::from_pairs(vec![("Alaska".to_string(), 58), ("Alabama".to_string(), 59)]);
        assert_eq!(
            resolve_names(&map, &["Alabama", "Alaska"], LookupKind::Jurisdiction).unwrap(),
            vec![59, 58]
        );
    }

    #[test]
    fn unknown_name_suggests_the_closest() {
        let map = LookupMap::from_pairs(vec![("Alaska".to_string(), 58), ("Alabama".to_string(), 59)]);
        let err = resolve_names(&map, &["Alabma"], LookupKind::Jurisdiction).unwrap_err();
        assert_eq!(err.kind(), FailureKind::Lookup);
        match err {
            RegCensusError::Lookup { suggestion, .. } => {
                assert_eq!(suggestion.as_deref(), Some("Alabama"))
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn industry_names_match_with_or_without_code() {
        let map = industries();
        assert_eq!(industry_by_name(&map, "Crop Production (111)"), Some(200));
        assert_eq!(industry_by_name(&map, "Fishing, Hunting and Trapping"), Some(203));
        assert_eq!(industry_by_name(&map, "Mining"), None);
    }
}
