//! Error types for the library layer.
//!
//! Every anticipated failure of the pipeline is a variant here; the `Display`
//! text is the human-readable diagnostic (including the list of valid choices
//! where one applies) and [`RegCensusError::kind`] gives callers something to
//! branch on.

use std::fmt;
use std::path::PathBuf;

/// Which kind of name failed to resolve.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LookupKind {
    Series,
    Jurisdiction,
    Agency,
    Cluster,
    Industry,
}

impl fmt::Display for LookupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LookupKind::Series => "series",
            LookupKind::Jurisdiction => "jurisdiction",
            LookupKind::Agency => "agency",
            LookupKind::Cluster => "cluster",
            LookupKind::Industry => "industry",
        })
    }
}

/// Coarse failure reason, one per error family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FailureKind {
    InvalidSeries,
    InvalidJurisdiction,
    InvalidDate,
    NoData,
    NoEndpoint,
    Upstream,
    InvalidOutputPath,
    Lookup,
    MissingArgument,
    Transport,
    Output,
}

/// Errors produced by the library layer, wrapping upstream API errors
/// and adding parameter validation, resolution, and output failures.
#[derive(thiserror::Error, Debug)]
pub enum RegCensusError {
    /// An error from the underlying API client.
    #[error(transparent)]
    Api(#[from] regcensus_api::Error),
    #[error("Valid series ID required. Select from the following list:\n{choices}")]
    InvalidSeries { choices: String },
    #[error("Valid jurisdiction ID required. Consider the following:\n{choices}")]
    InvalidJurisdiction { choices: String },
    #[error("Valid date is required. Select from the following list:\n{choices}")]
    InvalidDate { choices: String },
    /// No datafinder row matches the requested series and years.
    #[error(
        "No data was found for these parameters. For this jurisdiction, consider the following:\n\n{available}"
    )]
    NoData { available: String },
    /// The datafinder answered but its rows could not be read.
    #[error("No endpoint could be resolved: {reason}")]
    NoEndpoint { reason: String },
    #[error("Valid outpath required to download.")]
    InvalidOutputPath { path: PathBuf },
    /// A name was not present in the lookup table for its kind.
    #[error("No {kind} named '{name}'{}", did_you_mean(.suggestion))]
    Lookup {
        kind: LookupKind,
        name: String,
        suggestion: Option<String>,
    },
    #[error("{0}")]
    MissingArgument(String),
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

fn did_you_mean(suggestion: &Option<String>) -> String {
    suggestion
        .as_ref()
        .map(|s| format!(". Did you mean '{}'?", s))
        .unwrap_or_default()
}

impl RegCensusError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Api(regcensus_api::Error::Upstream { .. }) => FailureKind::Upstream,
            Self::Api(_) => FailureKind::Transport,
            Self::InvalidSeries { .. } => FailureKind::InvalidSeries,
            Self::InvalidJurisdiction { .. } => FailureKind::InvalidJurisdiction,
            Self::InvalidDate { .. } => FailureKind::InvalidDate,
            Self::NoData { .. } => FailureKind::NoData,
            Self::NoEndpoint { .. } => FailureKind::NoEndpoint,
            Self::InvalidOutputPath { .. } => FailureKind::InvalidOutputPath,
            Self::Lookup { .. } => FailureKind::Lookup,
            Self::MissingArgument(_) => FailureKind::MissingArgument,
            Self::Io { .. } | Self::Csv(_) | Self::Serialization(_) => FailureKind::Output,
        }
    }
}
