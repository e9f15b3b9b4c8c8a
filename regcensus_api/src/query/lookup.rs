//! Query builders for the metadata endpoints.

use url::Url;

use super::common::{append_list, append_pair, Query};

/// Agency lookup: either every agency of a jurisdiction or a keyword search
/// across jurisdictions. The two are served by different paths.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum AgencyQuery {
    Jurisdiction(i64),
    Keyword(String),
}

impl AgencyQuery {
    pub fn path(&self) -> &'static str {
        match self {
            AgencyQuery::Jurisdiction(_) => "/agencies",
            AgencyQuery::Keyword(_) => "/agencies-keyword",
        }
    }
}

impl Query for AgencyQuery {
    fn add_to_url(&self, url: &Url) -> Url {
        let mut url = url.clone();
        match self {
            AgencyQuery::Jurisdiction(id) => {
                append_pair(&mut url, "jurisdiction", &id.to_string());
            }
            AgencyQuery::Keyword(keyword) => {
                append_pair(&mut url, "keyword", keyword);
            }
        }
        url
    }
}

/// Label (industry) lookup. `label_level` is the code depth, e.g. 3 for
/// 3-digit NAICS; `label_source` names the classification standard.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LabelQuery {
    pub label_level: u8,
    pub keyword: Option<String>,
    pub label_source: Option<String>,
}

impl Default for LabelQuery {
    fn default() -> Self {
        Self {
            label_level: 3,
            keyword: None,
            label_source: None,
        }
    }
}

impl LabelQuery {
    pub fn with_label_level(mut self, level: u8) -> Self {
        self.label_level = level;
        self
    }

    pub fn with_keyword(mut self, keyword: &str) -> Self {
        self.keyword = Some(keyword.to_string());
        self
    }

    pub fn with_label_source(mut self, source: &str) -> Self {
        self.label_source = Some(source.to_string());
        self
    }
}

impl Query for LabelQuery {
    fn add_to_url(&self, url: &Url) -> Url {
        let mut url = url.clone();
        append_pair(&mut url, "labellevel", &self.label_level.to_string());
        if let Some(keyword) = &self.keyword {
            append_pair(&mut url, "keyword", keyword);
        }
        if let Some(source) = &self.label_source {
            append_pair(&mut url, "labelsource", source);
        }
        url
    }
}

/// Discovery query listing the (series, year) combinations and endpoint
/// paths available for a jurisdiction.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct DataFinderQuery {
    pub jurisdictions: Vec<i64>,
    pub document_type: Option<i64>,
}

impl Query for DataFinderQuery {
    fn add_to_url(&self, url: &Url) -> Url {
        let mut url = url.clone();
        append_list(&mut url, "jurisdiction", &self.jurisdictions);
        if let Some(document_type) = self.document_type {
            append_pair(&mut url, "documenttype", &document_type.to_string());
        }
        url
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct DocumentTypeQuery {
    pub jurisdiction: Option<i64>,
}

impl Query for DocumentTypeQuery {
    fn add_to_url(&self, url: &Url) -> Url {
        let mut url = url.clone();
        if let Some(jurisdiction) = self.jurisdiction {
            append_pair(&mut url, "jurisdiction", &jurisdiction.to_string());
        }
        url
    }
}

/// Dataset versions published for a jurisdiction and document type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct VersionQuery {
    pub jurisdiction: i64,
    pub document_type: i64,
}

impl Query for VersionQuery {
    fn add_to_url(&self, url: &Url) -> Url {
        let mut url = url.clone();
        append_pair(&mut url, "jurisdiction", &self.jurisdiction.to_string());
        append_pair(&mut url, "documentType", &self.document_type.to_string());
        url
    }
}
