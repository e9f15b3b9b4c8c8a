use url::Url;

use super::common::{append_list, append_pair, Query};

/// Parameters of a values request, serialized in the order the API documents them:
/// series, jurisdiction, agency, cluster, label, labelLevel, year, filteredOnly,
/// documenttype, country, version, page.
///
/// All identifiers are already resolved; name lookups happen before a
/// `ValuesQuery` is built.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ValuesQuery {
    pub series: Vec<i64>,
    pub jurisdictions: Vec<i64>,
    pub agencies: Vec<i64>,
    pub clusters: Vec<i64>,
    /// Label ids, or raw codes for classification standards without ids.
    pub labels: Vec<String>,
    pub label_level: Option<u8>,
    /// Years (`2019`) or dates (`2020-06-02`).
    pub years: Vec<String>,
    /// Treat a two-element `years` list as an inclusive span.
    pub year_is_range: bool,
    /// Include industry results that fail the quality filter.
    pub unfiltered: bool,
    pub document_type: Option<i64>,
    pub country: bool,
    pub version: Option<i64>,
    pub page: Option<u32>,
}

impl Query for ValuesQuery {
    fn add_to_url(&self, url: &Url) -> Url {
        let mut url = url.clone();
        append_list(&mut url, "series", &self.series);
        append_list(&mut url, "jurisdiction", &self.jurisdictions);
        append_list(&mut url, "agency", &self.agencies);
        append_list(&mut url, "cluster", &self.clusters);
        append_list(&mut url, "label", &self.labels);
        if let Some(level) = self.label_level {
            append_pair(&mut url, "labelLevel", &level.to_string());
        }
        append_list(&mut url, "year", &self.expanded_years());
        if self.unfiltered && !self.labels.is_empty() {
            append_pair(&mut url, "filteredOnly", "false");
        }
        if let Some(document_type) = self.document_type {
            append_pair(&mut url, "documenttype", &document_type.to_string());
        }
        if self.country {
            append_pair(&mut url, "country", "true");
        }
        if let Some(version) = self.version {
            append_pair(&mut url, "version", &version.to_string());
        }
        if let Some(page) = self.page {
            append_pair(&mut url, "page", &page.to_string());
        }
        url
    }
}

impl ValuesQuery {
    /// The years that will be sent. A two-element list of plain years with
    /// `year_is_range` set becomes every year of the inclusive span.
    pub fn expanded_years(&self) -> Vec<String> {
        if self.year_is_range && self.years.len() == 2 {
            if let (Some(start), Some(end)) = (plain_year(&self.years[0]), plain_year(&self.years[1]))
            {
                let (start, end) = if start <= end { (start, end) } else { (end, start) };
                return (start..=end).map(|y| y.to_string()).collect();
            }
        }
        self.years.clone()
    }

    pub fn with_series(mut self, series: &[i64]) -> Self {
        self.series.extend_from_slice(series);
        self
    }

    pub fn with_jurisdictions(mut self, jurisdictions: &[i64]) -> Self {
        self.jurisdictions.extend_from_slice(jurisdictions);
        self
    }

    pub fn with_agencies(mut self, agencies: &[i64]) -> Self {
        self.agencies.extend_from_slice(agencies);
        self
    }

    pub fn with_clusters(mut self, clusters: &[i64]) -> Self {
        self.clusters.extend_from_slice(clusters);
        self
    }

    pub fn with_labels(mut self, labels: &[String]) -> Self {
        self.labels.extend_from_slice(labels);
        self
    }

    pub fn with_label_level(mut self, level: u8) -> Self {
        self.label_level = Some(level);
        self
    }

    pub fn with_year(mut self, year: &str) -> Self {
        self.years.push(year.to_string());
        self
    }

    pub fn with_years(mut self, years: &[String]) -> Self {
        self.years.extend_from_slice(years);
        self
    }

    pub fn with_year_range(mut self, is_range: bool) -> Self {
        self.year_is_range = is_range;
        self
    }

    pub fn with_unfiltered(mut self, unfiltered: bool) -> Self {
        self.unfiltered = unfiltered;
        self
    }

    pub fn with_document_type(mut self, document_type: i64) -> Self {
        self.document_type = Some(document_type);
        self
    }

    pub fn with_country(mut self, country: bool) -> Self {
        self.country = country;
        self
    }

    pub fn with_version(mut self, version: i64) -> Self {
        self.version = Some(version);
        self
    }

    /// Sets the page number (1-indexed).
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }
}

fn plain_year(value: &str) -> Option<i32> {
    if value.len() == 4 && value.bytes().all(|b| b.is_ascii_digit()) {
        value.parse().ok()
    } else {
        None
    }
}
