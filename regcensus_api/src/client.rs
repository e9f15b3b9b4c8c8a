//! HTTP client for the RegData API.

use serde_json::Value;
use url::Url;

use crate::{
    query::{
        AgencyQuery, DataFinderQuery, DocumentTypeQuery, LabelQuery, Query, ValuesQuery,
        VersionQuery,
    },
    types::{decode_payload, error_message},
    Error,
};

/// Production host of the RegData API.
pub const DEFAULT_BASE_URL: &str = "https://api.quantgov.org";

/// HTTP client for the RegData API.
///
/// Every method issues a single GET and returns the decoded JSON payload;
/// string-wrapped payloads are unwrapped and error envelopes become
/// [`Error::Upstream`]. No timeout or retry is configured beyond reqwest's defaults.
pub struct Client {
    /// Base URL for the API. Defaults to [`DEFAULT_BASE_URL`].
    base_api_url: String,
    http: reqwest::Client,
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl Client {
    /// Creates a new client pointing at the production API.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL. Used for testing with wiremock.
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_api_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_api_url
    }

    /// Joins `path` onto the base URL and appends the query parameters.
    pub fn url_for<Q: Query>(&self, path: &str, query: Option<&Q>) -> Result<Url, Error> {
        let url = Url::parse(format!("{}{}", &self.base_api_url, path).as_str()).map_err(|e| {
            tracing::error!("Invalid URL constructed: {}", e);
            Error::InvalidUrl(format!("{}{}: {}", self.base_api_url, path, e))
        })?;
        Ok(match query {
            Some(query) => query.add_to_url(&url),
            None => url,
        })
    }

    async fn get<Q: Query>(&self, path: &str, query: Option<&Q>) -> Result<Value, Error> {
        let url = self.url_for(path, query)?;
        self.fetch(url).await
    }

    /// GETs an already assembled URL and decodes the payload.
    pub async fn fetch(&self, url: Url) -> Result<Value, Error> {
        tracing::debug!("GET {}", url);
        let resp = self
            .http
            .get(url)
            .header("accept", "application/json")
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to get resource: {}", e);
                Error::RequestFailed
            })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| {
            tracing::error!("Failed to read response body: {}", e);
            Error::RequestFailed
        })?;

        if !status.is_success() {
            // The API reports most failures as an envelope, whatever the status.
            if let Some(message) = serde_json::from_str::<Value>(&body)
                .ok()
                .as_ref()
                .and_then(error_message)
            {
                tracing::error!("API error ({}): {}", status, message);
                return Err(Error::Upstream { message });
            }
            let snippet = truncate_body(&body);
            tracing::error!("Request failed with status {}: {}", status, snippet);
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body: snippet,
            });
        }

        decode_payload(&body).map_err(|e| {
            if let Error::Malformed(reason) = &e {
                tracing::error!("Failed to parse resource: {} | body: {}", reason, truncate_body(&body));
            }
            e
        })
    }

    /// Fetches `/dataseries`.
    pub async fn get_series(&self) -> Result<Value, Error> {
        self.get::<DataFinderQuery>("/dataseries", None).await
    }

    /// Fetches `/jurisdictions/`.
    pub async fn get_jurisdictions(&self) -> Result<Value, Error> {
        self.get::<DataFinderQuery>("/jurisdictions/", None).await
    }

    /// Fetches agencies for a jurisdiction or matching a keyword.
    pub async fn get_agencies(&self, query: &AgencyQuery) -> Result<Value, Error> {
        self.get(query.path(), Some(query)).await
    }

    /// Fetches `/clusters`.
    pub async fn get_clusters(&self) -> Result<Value, Error> {
        self.get::<DataFinderQuery>("/clusters", None).await
    }

    /// Fetches `/labels` (industries and other classification labels).
    pub async fn get_labels(&self, query: &LabelQuery) -> Result<Value, Error> {
        self.get("/labels", Some(query)).await
    }

    /// Fetches `/documenttypes`.
    pub async fn get_document_types(&self, query: &DocumentTypeQuery) -> Result<Value, Error> {
        self.get("/documenttypes", Some(query)).await
    }

    /// Fetches `/datafinder`, the discovery table of available data and endpoint paths.
    pub async fn get_datafinder(&self, query: &DataFinderQuery) -> Result<Value, Error> {
        self.get("/datafinder", Some(query)).await
    }

    /// Fetches `/version`.
    pub async fn get_versions(&self, query: &VersionQuery) -> Result<Value, Error> {
        self.get("/version", Some(query)).await
    }

    /// Fetches `/documentation` (project descriptions and citations).
    pub async fn get_documentation(&self) -> Result<Value, Error> {
        self.get::<DataFinderQuery>("/documentation", None).await
    }

    /// Builds the URL of a values request against `endpoint` (e.g. `/state-summary`).
    pub fn values_url(&self, endpoint: &str, query: &ValuesQuery) -> Result<Url, Error> {
        self.url_for(endpoint, Some(query))
    }

    /// Fetches one page of values from `endpoint`.
    pub async fn get_values(&self, endpoint: &str, query: &ValuesQuery) -> Result<Value, Error> {
        self.get(endpoint, Some(query)).await
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        body.to_string()
    } else {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...[truncated]", &body[..end])
    }
}
