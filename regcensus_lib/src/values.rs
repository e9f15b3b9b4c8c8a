//! The values pipeline: validate, resolve, select an endpoint, fetch every
//! page, normalize, and emit.

use std::path::Path;

use regcensus_api::ValuesQuery;
use serde_json::Value;
use url::Url;

use crate::client::RegCensus;
use crate::endpoint::document_path;
use crate::error::RegCensusError;
use crate::params::{OutputMode, QueryParameters, Selector, TimeSelector, ValuesOutput};
use crate::reading_time::{reading_time, FOOTNOTE};
use crate::table::ResultTable;

/// Rows per page of a values response. A full page means more may follow.
pub const PAGE_SIZE: usize = 5000;

/// Series id of word counts.
const WORD_COUNT_SERIES: i64 = 2;

/// A values request ready to send.
#[derive(Debug)]
struct PreparedRequest {
    endpoint: String,
    query: ValuesQuery,
    url: Url,
}

impl RegCensus {
    /// Runs the full pipeline and returns or writes the resulting table.
    pub async fn get_values(&self, params: &QueryParameters) -> Result<ValuesOutput, RegCensusError> {
        let table = self.fetch_values(params).await?;
        emit(table, &params.output)
    }

    /// [`RegCensus::get_values`] at the document level.
    pub async fn get_document_values(
        &self,
        params: &QueryParameters,
    ) -> Result<ValuesOutput, RegCensusError> {
        self.get_values(&params.clone().with_summary(false)).await
    }

    /// Word counts expressed as reading time. The series is always word count.
    pub async fn get_reading_time(
        &self,
        params: &QueryParameters,
    ) -> Result<ValuesOutput, RegCensusError> {
        let params = params.clone().with_series(WORD_COUNT_SERIES);
        let mut table = self.fetch_values(&params).await?;

        for column in ["series_value", "seriesValue"] {
            table.map_column(column, |cell| match cell_number(cell) {
                Some(words) => Value::String(reading_time(words)),
                None => cell.clone(),
            });
        }
        table.set_column("series_name", Value::String("Reading Time".to_string()));
        table.set_column("footNote", Value::String(FOOTNOTE.to_string()));

        emit(table, &params.output)
    }

    /// Document-level word counts (series 1) of a jurisdiction.
    pub async fn get_documents(
        &self,
        jurisdiction: impl Into<Selector>,
        time: impl Into<TimeSelector>,
        document_type: Option<i64>,
    ) -> Result<ResultTable, RegCensusError> {
        let params = QueryParameters::new(1, jurisdiction, time)
            .with_document_type(document_type)
            .with_summary(false);
        self.fetch_values(&params).await
    }

    /// The URL the pipeline would request first, without requesting it.
    pub async fn values_url(&self, params: &QueryParameters) -> Result<Url, RegCensusError> {
        Ok(self.prepare(params).await?.url)
    }

    async fn fetch_values(&self, params: &QueryParameters) -> Result<ResultTable, RegCensusError> {
        let request = self.prepare(params).await?;
        let first = self.inner.fetch(request.url.clone()).await?;
        let mut table = ResultTable::from_payload(&first)?;

        if params.page.is_none() && table.len() == PAGE_SIZE {
            let mut page = 1;
            loop {
                page += 1;
                tracing::info!("Output truncated, fetching page {}", page);
                let query = request.query.clone().with_page(page);
                let url = self.inner.values_url(&request.endpoint, &query)?;
                let payload = self.inner.fetch(url).await?;
                let next = ResultTable::from_payload(&payload)?;
                let full = next.len() == PAGE_SIZE;
                table.append(next);
                if !full {
                    break;
                }
            }
        }

        Ok(table.clean_columns())
    }

    async fn prepare(&self, params: &QueryParameters) -> Result<PreparedRequest, RegCensusError> {
        let Some(series) = params.series.as_ref().filter(|s| !s.is_empty()) else {
            return Err(RegCensusError::InvalidSeries {
                choices: self.series_choices().await,
            });
        };
        let Some(jurisdiction) = params.jurisdiction.as_ref().filter(|j| !j.is_empty()) else {
            return Err(RegCensusError::InvalidJurisdiction {
                choices: self.jurisdiction_choices().await,
            });
        };

        let series = self.resolve_series(series).await?;
        let jurisdictions = self.resolve_jurisdictions(jurisdiction).await?;

        let Some(time) = params.time.as_ref().filter(|t| !t.is_empty()) else {
            return Err(RegCensusError::InvalidDate {
                choices: self.date_choices(&jurisdictions, params.document_type).await,
            });
        };

        let mut query = ValuesQuery::default()
            .with_series(&series)
            .with_jurisdictions(&jurisdictions)
            .with_years(&time.to_strings())
            .with_year_range(params.date_is_range)
            .with_country(params.country);
        if let Some(agency) = &params.agency {
            query = query.with_agencies(&self.resolve_agencies(agency, &jurisdictions).await?);
        }
        if let Some(cluster) = &params.cluster {
            query = query.with_clusters(&self.resolve_clusters(cluster).await?);
        }
        if let Some(label) = &params.label {
            let labels = self
                .resolve_labels(label, params.label_level, &params.label_source)
                .await?;
            query = query
                .with_labels(&labels)
                .with_unfiltered(!params.filtered);
        }
        if let Some(level) = params.label_level {
            query = query.with_label_level(level);
        }
        if let Some(document_type) = params.document_type {
            query = query.with_document_type(document_type);
        }
        if let Some(version) = params.version {
            query = query.with_version(version);
        }
        if let Some(page) = params.page {
            query = query.with_page(page);
        }

        let mut endpoint = self
            .endpoint_for(
                &jurisdictions,
                params.document_type,
                &series,
                &query.expanded_years(),
                params.summary,
            )
            .await?;

        let has_label = !query.labels.is_empty();
        if !params.summary {
            if has_label {
                tracing::warn!(
                    "Returning document-level industry results. This query may take several minutes."
                );
            }
            endpoint = document_path(&endpoint);
        }
        if has_label && !params.filtered {
            tracing::warn!("Returning unfiltered industry results. Use of these results is NOT recommended.");
        }

        let url = self.inner.values_url(&endpoint, &query)?;
        if params.verbose {
            tracing::info!("API call: {}", url);
        } else {
            tracing::debug!("API call: {}", url);
        }

        Ok(PreparedRequest {
            endpoint,
            query,
            url,
        })
    }

    pub(crate) async fn series_choices(&self) -> String {
        match self.list_series().await {
            Ok(map) => map.to_string(),
            Err(e) => unavailable(&e),
        }
    }

    pub(crate) async fn jurisdiction_choices(&self) -> String {
        match self.list_jurisdictions().await {
            Ok(map) => map.to_string(),
            Err(e) => unavailable(&e),
        }
    }

    async fn date_choices(&self, jurisdictions: &[i64], document_type: Option<i64>) -> String {
        match self.dates_for(jurisdictions, document_type).await {
            Ok(years) => years
                .iter()
                .map(i64::to_string)
                .collect::<Vec<_>>()
                .join("\n"),
            Err(e) => unavailable(&e),
        }
    }
}

fn unavailable(err: &RegCensusError) -> String {
    format!("(unavailable: {})", err)
}

fn cell_number(cell: &Value) -> Option<f64> {
    match cell {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Hands the table back, or writes it as CSV when a file was requested.
fn emit(table: ResultTable, output: &OutputMode) -> Result<ValuesOutput, RegCensusError> {
    match output {
        OutputMode::Memory => Ok(ValuesOutput::Table(table)),
        OutputMode::File(path) => {
            if !is_writable_target(path) {
                return Err(RegCensusError::InvalidOutputPath { path: path.clone() });
            }
            table.write_csv_file(path)?;
            tracing::info!("Wrote {} rows to {}", table.len(), path.display());
            Ok(ValuesOutput::Written {
                path: path.clone(),
                rows: table.len(),
            })
        }
    }
}

fn is_writable_target(path: &Path) -> bool {
    !path.as_os_str().is_empty() && !path.is_dir()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;
    use serde_json::json;

    fn sample() -> ResultTable {
        ResultTable::from_payload(&json!([
            {"series_value": 10, "year": 2019},
            {"series_value": 20, "year": 2020}
        ]))
        .unwrap()
    }

    #[test]
    fn memory_output_returns_the_table() {
        let out = emit(sample(), &OutputMode::Memory).unwrap();
        assert_eq!(out.into_table().unwrap().len(), 2);
    }

    #[test]
    fn file_output_writes_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("values.csv");
        let out = emit(sample(), &OutputMode::File(path.clone())).unwrap();
        match out {
            ValuesOutput::Written { rows, .. } => assert_eq!(rows, 2),
            other => panic!("unexpected output: {other:?}"),
        }
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "series_value,year\n10,2019\n20,2020\n");
    }

    #[test]
    fn directory_and_empty_paths_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = emit(sample(), &OutputMode::File(dir.path().to_path_buf())).unwrap_err();
        assert_eq!(err.kind(), FailureKind::InvalidOutputPath);
        let err = emit(sample(), &OutputMode::File("".into())).unwrap_err();
        assert_eq!(err.kind(), FailureKind::InvalidOutputPath);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn cell_numbers() {
        assert_eq!(cell_number(&json!(12)), Some(12.0));
        assert_eq!(cell_number(&json!("3.5")), Some(3.5));
        assert_eq!(cell_number(&json!(null)), None);
    }
}
