//! Records returned by the metadata endpoints used for name lookups.

use serde::{Deserialize, Serialize};

use super::id;

/// One entry of `/dataseries`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SeriesRecord {
    #[serde(deserialize_with = "id::required")]
    pub series_id: i64,
    pub series_name: String,
    #[serde(default)]
    pub series_description: Option<String>,
}

/// One entry of `/jurisdictions/`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct JurisdictionRecord {
    #[serde(deserialize_with = "id::required")]
    pub jurisdiction_id: i64,
    pub jurisdiction_name: String,
}

/// One entry of `/agencies` or `/agencies-keyword`.
///
/// `a_jurisdiction_id` is the owning jurisdiction; it is only needed to
/// disambiguate keyword results that span jurisdictions.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AgencyRecord {
    #[serde(deserialize_with = "id::required")]
    pub agency_id: i64,
    #[serde(default)]
    pub agency_name: Option<String>,
    #[serde(default, deserialize_with = "id::optional")]
    pub a_jurisdiction_id: Option<i64>,
}

/// One entry of `/clusters`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ClusterRecord {
    #[serde(deserialize_with = "id::required")]
    pub agency_cluster: i64,
    #[serde(default)]
    pub cluster_name: Option<String>,
}

/// One entry of `/labels`. Classification standards without codes omit `label_code`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LabelRecord {
    #[serde(deserialize_with = "id::required")]
    pub label_id: i64,
    pub label_name: String,
    #[serde(default)]
    pub label_code: Option<String>,
}

/// One entry of `/documenttypes`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DocumentTypeRecord {
    #[serde(deserialize_with = "id::required")]
    pub document_type_id: i64,
    #[serde(default)]
    pub document_type: Option<String>,
}
