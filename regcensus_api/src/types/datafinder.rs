use serde::{Deserialize, Serialize};

use super::id;

/// One row of `/datafinder`: a (jurisdiction, document type, series, year)
/// combination for which data exists, with the paths that serve it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DataFinderRecord {
    #[serde(deserialize_with = "id::required")]
    pub jurisdiction_id: i64,
    #[serde(default, deserialize_with = "id::optional")]
    pub document_type_id: Option<i64>,
    #[serde(deserialize_with = "id::required")]
    pub series_id: i64,
    #[serde(deserialize_with = "id::required")]
    pub year: i64,
    #[serde(default)]
    pub summary_endpoints: Option<String>,
    #[serde(default)]
    pub document_endpoints: Option<String>,
    #[serde(default)]
    pub label_endpoints: Option<String>,
}

impl DataFinderRecord {
    /// Path for summary or document-level data. An empty document path
    /// falls back to the label path, which serves document-level industry data.
    pub fn endpoint(&self, summary: bool) -> Option<&str> {
        let primary = if summary {
            self.summary_endpoints.as_deref()
        } else {
            self.document_endpoints.as_deref()
        };
        non_empty(primary).or_else(|| non_empty(self.label_endpoints.as_deref()))
    }
}

fn non_empty(path: Option<&str>) -> Option<&str> {
    path.map(str::trim).filter(|p| !p.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(summary: Option<&str>, document: Option<&str>, label: Option<&str>) -> DataFinderRecord {
        DataFinderRecord {
            jurisdiction_id: 38,
            document_type_id: Some(1),
            series_id: 1,
            year: 2019,
            summary_endpoints: summary.map(String::from),
            document_endpoints: document.map(String::from),
            label_endpoints: label.map(String::from),
        }
    }

    #[test]
    fn summary_path_is_preferred() {
        let r = record(Some("/state-summary"), Some("/state-documents"), None);
        assert_eq!(r.endpoint(true), Some("/state-summary"));
        assert_eq!(r.endpoint(false), Some("/state-documents"));
    }

    #[test]
    fn empty_document_path_falls_back_to_label_path() {
        let r = record(Some("/state-summary"), Some(""), Some("/label-documents"));
        assert_eq!(r.endpoint(false), Some("/label-documents"));
    }

    #[test]
    fn ids_accept_numeric_strings() {
        let r: DataFinderRecord = serde_json::from_value(serde_json::json!({
            "jurisdiction_id": "38",
            "document_type_id": 1,
            "series_id": 2.0,
            "year": "2019",
            "summary_endpoints": "/state-summary"
        }))
        .unwrap();
        assert_eq!(r.jurisdiction_id, 38);
        assert_eq!(r.series_id, 2);
        assert_eq!(r.year, 2019);
        assert_eq!(r.document_endpoints, None);
    }
}
