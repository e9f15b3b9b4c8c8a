//! Cached client for the metadata endpoints.
//!
//! Every metadata payload is memoized under a typed [`CacheKey`] built from
//! resolved ids, so repeated lookups during one session cost one request.

use regcensus_api::types::{
    decode_records, AgencyRecord, ClusterRecord, DataFinderRecord, DocumentTypeRecord,
    JurisdictionRecord, LabelRecord, SeriesRecord,
};
use regcensus_api::{
    AgencyQuery, Client, DataFinderQuery, DocumentTypeQuery, LabelQuery, VersionQuery,
};
use serde_json::Value;

use crate::cache::{CachePolicy, MemoryCache};
use crate::error::RegCensusError;
use crate::lookup::LookupMap;
use crate::params::LabelLookup;
use crate::table::ResultTable;

/// Identity of a cached metadata payload.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Series,
    Jurisdictions,
    Clusters,
    Documentation,
    Agencies(AgencyQuery),
    Labels(LabelQuery),
    DocumentTypes(DocumentTypeQuery),
    DataFinder(DataFinderQuery),
    Versions(VersionQuery),
}

/// RegData client: metadata lookups, name resolution, and the values pipeline.
///
/// Values responses are never cached; everything else goes through the cache.
pub struct RegCensus {
    pub(crate) inner: Client,
    cache: MemoryCache<CacheKey, Value>,
}

impl RegCensus {
    /// Creates a client against the production API.
    pub fn new(cache: CachePolicy) -> Self {
        Self {
            inner: Client::new(),
            cache: MemoryCache::new(cache),
        }
    }

    /// Creates a client against another host. Used for testing.
    pub fn with_base_url(base_url: &str, cache: CachePolicy) -> Self {
        Self {
            inner: Client::with_base_url(base_url),
            cache: MemoryCache::new(cache),
        }
    }

    pub fn api(&self) -> &Client {
        &self.inner
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    pub(crate) async fn cached(&self, key: CacheKey) -> Result<Value, RegCensusError> {
        if let Some(value) = self.cache.get(&key) {
            tracing::debug!("cache hit: {:?}", key);
            return Ok(value);
        }

        let value = match &key {
            CacheKey::Series => self.inner.get_series().await?,
            CacheKey::Jurisdictions => self.inner.get_jurisdictions().await?,
            CacheKey::Clusters => self.inner.get_clusters().await?,
            CacheKey::Documentation => self.inner.get_documentation().await?,
            CacheKey::Agencies(query) => self.inner.get_agencies(query).await?,
            CacheKey::Labels(query) => self.inner.get_labels(query).await?,
            CacheKey::DocumentTypes(query) => self.inner.get_document_types(query).await?,
            CacheKey::DataFinder(query) => self.inner.get_datafinder(query).await?,
            CacheKey::Versions(query) => self.inner.get_versions(query).await?,
        };

        self.cache.set(key, value.clone());
        Ok(value)
    }

    async fn table(&self, key: CacheKey) -> Result<ResultTable, RegCensusError> {
        let value = self.cached(key).await?;
        Ok(ResultTable::from_payload(&value)?.clean_columns())
    }

    /// Series metadata (`/dataseries`).
    pub async fn get_series(&self) -> Result<ResultTable, RegCensusError> {
        self.table(CacheKey::Series).await
    }

    /// Agencies of a jurisdiction, or agencies across jurisdictions matching
    /// `keyword`. The keyword wins when both are given.
    pub async fn get_agencies(
        &self,
        jurisdiction: Option<i64>,
        keyword: Option<&str>,
    ) -> Result<ResultTable, RegCensusError> {
        let query = agency_query(jurisdiction, keyword)?;
        self.table(CacheKey::Agencies(query)).await
    }

    pub async fn get_jurisdictions(&self) -> Result<ResultTable, RegCensusError> {
        self.table(CacheKey::Jurisdictions).await
    }

    /// Industry (label) metadata.
    pub async fn get_industries(&self, lookup: &LabelLookup) -> Result<ResultTable, RegCensusError> {
        self.table(CacheKey::Labels(lookup.to_query())).await
    }

    pub async fn get_versions(
        &self,
        jurisdiction: i64,
        document_type: i64,
    ) -> Result<ResultTable, RegCensusError> {
        self.table(CacheKey::Versions(VersionQuery {
            jurisdiction,
            document_type,
        }))
        .await
    }

    /// Project documentation and citations.
    pub async fn get_documentation(&self) -> Result<ResultTable, RegCensusError> {
        self.table(CacheKey::Documentation).await
    }

    /// The series and years available for a jurisdiction, with the endpoint
    /// paths serving them.
    pub async fn get_datafinder(
        &self,
        jurisdiction: i64,
        document_type: Option<i64>,
    ) -> Result<ResultTable, RegCensusError> {
        self.datafinder_table(&datafinder_query(&[jurisdiction], document_type))
            .await
    }

    pub(crate) async fn datafinder_table(
        &self,
        query: &DataFinderQuery,
    ) -> Result<ResultTable, RegCensusError> {
        Ok(self
            .table(CacheKey::DataFinder(query.clone()))
            .await?
            .rename_columns(&[
                ("jurisdiction_id", "jurisdiction"),
                ("document_type_id", "documentType"),
                ("series_id", "series"),
            ]))
    }

    pub(crate) async fn datafinder_records(
        &self,
        query: &DataFinderQuery,
    ) -> Result<Vec<DataFinderRecord>, RegCensusError> {
        let value = self.cached(CacheKey::DataFinder(query.clone())).await?;
        Ok(decode_records(value)?)
    }

    pub async fn list_series(&self) -> Result<LookupMap, RegCensusError> {
        let records: Vec<SeriesRecord> = decode_records(self.cached(CacheKey::Series).await?)?;
        Ok(LookupMap::from_pairs(
            records.into_iter().map(|s| (s.series_name, s.series_id)),
        ))
    }

    pub async fn list_jurisdictions(&self) -> Result<LookupMap, RegCensusError> {
        let records: Vec<JurisdictionRecord> =
            decode_records(self.cached(CacheKey::Jurisdictions).await?)?;
        Ok(LookupMap::from_pairs(
            records
                .into_iter()
                .map(|j| (j.jurisdiction_name, j.jurisdiction_id)),
        ))
    }

    /// Agency names to ids. Keyword results span jurisdictions, so their keys
    /// carry the jurisdiction name: `"Agency Name (Jurisdiction Name)"`.
    pub async fn list_agencies(
        &self,
        jurisdiction: Option<i64>,
        keyword: Option<&str>,
    ) -> Result<LookupMap, RegCensusError> {
        let query = agency_query(jurisdiction, keyword)?;
        let by_keyword = matches!(query, AgencyQuery::Keyword(_));
        let records: Vec<AgencyRecord> =
            decode_records(self.cached(CacheKey::Agencies(query)).await?)?;

        let jurisdictions = if by_keyword {
            Some(self.list_jurisdictions().await?)
        } else {
            None
        };

        let pairs = records.into_iter().filter_map(|a| {
            let name = a.agency_name.filter(|n| !n.is_empty())?;
            let owner = jurisdictions
                .as_ref()
                .zip(a.a_jurisdiction_id)
                .and_then(|(map, id)| map.name_of(id));
            let key = match owner {
                Some(owner) => format!("{} ({})", name, owner),
                None => name,
            };
            Some((key, a.agency_id))
        });
        Ok(LookupMap::from_pairs(pairs))
    }

    pub async fn list_clusters(&self) -> Result<LookupMap, RegCensusError> {
        let records: Vec<ClusterRecord> = decode_records(self.cached(CacheKey::Clusters).await?)?;
        Ok(LookupMap::from_pairs(records.into_iter().filter_map(|c| {
            c.cluster_name
                .filter(|n| !n.is_empty())
                .map(|n| (n, c.agency_cluster))
        })))
    }

    /// Industry keys are `"Name (code)"`, or the bare code with `only_id`.
    /// Standards without codes fall back to bare names.
    pub async fn list_industries(&self, lookup: &LabelLookup) -> Result<LookupMap, RegCensusError> {
        let records: Vec<LabelRecord> =
            decode_records(self.cached(CacheKey::Labels(lookup.to_query())).await?)?;

        if records.iter().any(|l| l.label_code.is_none()) {
            return Ok(LookupMap::from_pairs(
                records.into_iter().map(|l| (l.label_name, l.label_id)),
            ));
        }

        Ok(LookupMap::from_pairs(records.into_iter().map(|l| {
            let code = l.label_code.unwrap_or_default();
            let key = if lookup.only_id {
                code
            } else {
                format!("{} ({})", l.label_name, code)
            };
            (key, l.label_id)
        })))
    }

    pub async fn list_document_types(
        &self,
        jurisdiction: Option<i64>,
    ) -> Result<LookupMap, RegCensusError> {
        let records: Vec<DocumentTypeRecord> = decode_records(
            self.cached(CacheKey::DocumentTypes(DocumentTypeQuery { jurisdiction }))
                .await?,
        )?;
        Ok(LookupMap::from_pairs(records.into_iter().filter_map(|d| {
            d.document_type
                .filter(|n| !n.is_empty())
                .map(|n| (n, d.document_type_id))
        })))
    }

    /// Years with data for a jurisdiction, ascending and unique.
    pub async fn list_dates(
        &self,
        jurisdiction: i64,
        document_type: Option<i64>,
    ) -> Result<Vec<i64>, RegCensusError> {
        self.dates_for(&[jurisdiction], document_type).await
    }

    pub(crate) async fn dates_for(
        &self,
        jurisdictions: &[i64],
        document_type: Option<i64>,
    ) -> Result<Vec<i64>, RegCensusError> {
        let records = self
            .datafinder_records(&datafinder_query(jurisdictions, document_type))
            .await?;
        let mut years: Vec<i64> = records.into_iter().map(|r| r.year).collect();
        years.sort_unstable();
        years.dedup();
        Ok(years)
    }
}

fn agency_query(jurisdiction: Option<i64>, keyword: Option<&str>) -> Result<AgencyQuery, RegCensusError> {
    match (keyword.filter(|k| !k.is_empty()), jurisdiction) {
        (Some(keyword), _) => Ok(AgencyQuery::Keyword(keyword.to_string())),
        (None, Some(jurisdiction)) => Ok(AgencyQuery::Jurisdiction(jurisdiction)),
        (None, None) => Err(RegCensusError::MissingArgument(
            "Must include either a jurisdiction or a keyword.".to_string(),
        )),
    }
}

pub(crate) fn datafinder_query(jurisdictions: &[i64], document_type: Option<i64>) -> DataFinderQuery {
    DataFinderQuery {
        jurisdictions: jurisdictions.to_vec(),
        document_type,
    }
}
