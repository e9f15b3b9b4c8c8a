//! Choosing the values endpoint from the datafinder table.

use regcensus_api::types::DataFinderRecord;

use crate::client::{datafinder_query, RegCensus};
use crate::error::RegCensusError;

/// Path of the first datafinder row whose series and year are both
/// requested. `None` when no row matches.
pub fn select_endpoint<'a>(
    records: &'a [DataFinderRecord],
    series: &[i64],
    years: &[i64],
    summary: bool,
) -> Option<Option<&'a str>> {
    records
        .iter()
        .find(|r| series.contains(&r.series_id) && years.contains(&r.year))
        .map(|r| r.endpoint(summary))
}

/// Document-level variant of a summary path.
pub fn document_path(endpoint: &str) -> String {
    endpoint.replace("/summary", "/documents")
}

/// Year of a wire period: `"2019"` or `"2019-06-02"`.
pub(crate) fn period_year(period: &str) -> Option<i64> {
    period.get(..4)?.parse().ok()
}

impl RegCensus {
    /// Resolves the endpoint serving `series` over `years` for the given
    /// jurisdictions.
    pub(crate) async fn endpoint_for(
        &self,
        jurisdictions: &[i64],
        document_type: Option<i64>,
        series: &[i64],
        years: &[String],
        summary: bool,
    ) -> Result<String, RegCensusError> {
        let query = datafinder_query(jurisdictions, document_type);
        let records = self.datafinder_records(&query).await.map_err(|e| match e {
            RegCensusError::Api(regcensus_api::Error::Malformed(reason)) => {
                RegCensusError::NoEndpoint { reason }
            }
            other => other,
        })?;

        if records.is_empty() {
            return Err(RegCensusError::InvalidJurisdiction {
                choices: self.jurisdiction_choices().await,
            });
        }

        let years: Vec<i64> = years.iter().filter_map(|y| period_year(y)).collect();
        match select_endpoint(&records, series, &years, summary) {
            Some(Some(path)) => {
                tracing::debug!("datafinder selected {}", path);
                Ok(path.to_string())
            }
            Some(None) => Err(RegCensusError::NoEndpoint {
                reason: "the matching datafinder row has no endpoint path".to_string(),
            }),
            None => {
                let available = self.datafinder_table(&query).await?;
                Err(RegCensusError::NoData {
                    available: available.to_string(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(series: i64, year: i64, summary: &str, document: &str, label: &str) -> DataFinderRecord {
        DataFinderRecord {
            jurisdiction_id: 38,
            document_type_id: Some(1),
            series_id: series,
            year,
            summary_endpoints: Some(summary.to_string()),
            document_endpoints: Some(document.to_string()),
            label_endpoints: Some(label.to_string()),
        }
    }

    fn rows() -> Vec<DataFinderRecord> {
        vec![
            row(1, 2019, "/country-summary", "/country-documents", ""),
            row(1, 2020, "/country-summary-2020", "/country-documents", ""),
            row(28, 2019, "/label-summary", "", "/label-documents"),
        ]
    }

    #[test]
    fn first_matching_row_wins() {
        let rows = rows();
        assert_eq!(
            select_endpoint(&rows, &[1], &[2019, 2020], true),
            Some(Some("/country-summary"))
        );
        assert_eq!(
            select_endpoint(&rows, &[1], &[2020], true),
            Some(Some("/country-summary-2020"))
        );
    }

    #[test]
    fn document_level_falls_back_to_label_path() {
        let rows = rows();
        assert_eq!(
            select_endpoint(&rows, &[28], &[2019], false),
            Some(Some("/label-documents"))
        );
        assert_eq!(
            select_endpoint(&rows, &[1], &[2019], false),
            Some(Some("/country-documents"))
        );
    }

    #[test]
    fn no_match() {
        assert_eq!(select_endpoint(&rows(), &[2], &[2019], true), None);
        assert_eq!(select_endpoint(&rows(), &[1], &[1999], true), None);
    }

    #[test]
    fn document_paths() {
        assert_eq!(document_path("/summary/state"), "/documents/state");
        assert_eq!(document_path("/state-summary"), "/state-summary");
        assert_eq!(document_path("/label-documents"), "/label-documents");
    }

    #[test]
    fn period_years() {
        assert_eq!(period_year("2019"), Some(2019));
        assert_eq!(period_year("2020-06-02"), Some(2020));
        assert_eq!(period_year("20"), None);
    }
}
