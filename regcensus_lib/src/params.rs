//! Typed inputs of the values pipeline.
//!
//! Every selector is built once at the boundary (CLI flag, caller code) so the
//! pipeline never has to guess whether it was handed an id, a list of ids, or
//! a name.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use regex::Regex;

use crate::table::ResultTable;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("empty selector")]
    Empty,
    #[error("invalid id '{0}'")]
    InvalidId(String),
    #[error("invalid date '{0}', expected YYYY or YYYY-MM-DD")]
    InvalidPeriod(String),
    #[error("regex compile error: {0}")]
    Pattern(String),
}

fn has_letter(s: &str) -> bool {
    s.chars().any(|c| c.is_ascii_alphabetic())
}

fn parse_id(s: &str) -> Result<i64, ParseError> {
    let s = s.trim();
    s.parse::<i64>()
        .map_err(|_| ParseError::InvalidId(s.to_string()))
}

/// A series, jurisdiction, agency or cluster given by id or by name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Selector {
    Id(i64),
    Ids(Vec<i64>),
    Name(String),
    Names(Vec<String>),
}

impl Selector {
    /// Builds a selector from list-shaped input: if the first element contains
    /// a letter every element is a name, otherwise every element is an id.
    pub fn from_parts<S: AsRef<str>>(parts: &[S]) -> Result<Self, ParseError> {
        let first = parts.first().ok_or(ParseError::Empty)?;
        if has_letter(first.as_ref()) {
            let mut names: Vec<String> = parts.iter().map(|p| p.as_ref().trim().to_string()).collect();
            if names.len() == 1 {
                return Ok(Selector::Name(names.remove(0)));
            }
            return Ok(Selector::Names(names));
        }
        let mut ids = parts
            .iter()
            .map(|p| parse_id(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        if ids.len() == 1 {
            return Ok(Selector::Id(ids.remove(0)));
        }
        Ok(Selector::Ids(ids))
    }

    /// Ids when the selector needs no lookup.
    pub fn ids(&self) -> Option<Vec<i64>> {
        match self {
            Selector::Id(id) => Some(vec![*id]),
            Selector::Ids(ids) => Some(ids.clone()),
            Selector::Name(_) | Selector::Names(_) => None,
        }
    }

    /// Names when the selector needs a lookup.
    pub fn names(&self) -> Option<Vec<&str>> {
        match self {
            Selector::Name(name) => Some(vec![name.as_str()]),
            Selector::Names(names) => Some(names.iter().map(String::as_str).collect()),
            Selector::Id(_) | Selector::Ids(_) => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Selector::Ids(ids) => ids.is_empty(),
            Selector::Names(names) => names.is_empty(),
            Selector::Name(name) => name.is_empty(),
            Selector::Id(_) => false,
        }
    }
}

/// Comma-separated input; the first element decides: `"38,59"` are ids,
/// `"Alaska,Alabama"` are names.
impl FromStr for Selector {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParseError::Empty);
        }
        let parts: Vec<&str> = s.split(',').filter(|p| !p.trim().is_empty()).collect();
        Selector::from_parts(&parts)
    }
}

impl From<i64> for Selector {
    fn from(id: i64) -> Self {
        Selector::Id(id)
    }
}

impl From<Vec<i64>> for Selector {
    fn from(ids: Vec<i64>) -> Self {
        Selector::Ids(ids)
    }
}

impl From<i32> for Selector {
    fn from(id: i32) -> Self {
        Selector::Id(i64::from(id))
    }
}

impl From<Vec<i32>> for Selector {
    fn from(ids: Vec<i32>) -> Self {
        Selector::Ids(ids.into_iter().map(i64::from).collect())
    }
}

/// Same detection as [`FromStr`]; input that fails to parse as ids is kept
/// as a single name so the lookup reports it.
impl From<&str> for Selector {
    fn from(s: &str) -> Self {
        s.parse()
            .unwrap_or_else(|_| Selector::Name(s.trim().to_string()))
    }
}

impl From<Vec<&str>> for Selector {
    fn from(names: Vec<&str>) -> Self {
        Selector::Names(names.into_iter().map(String::from).collect())
    }
}

/// A 4-digit year or an ISO date.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Period {
    Year(i32),
    Date(NaiveDate),
}

impl Period {
    pub fn year(&self) -> i32 {
        match self {
            Period::Year(year) => *year,
            Period::Date(date) => date.year(),
        }
    }

    pub fn is_year(&self) -> bool {
        matches!(self, Period::Year(_))
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Year(year) => write!(f, "{}", year),
            Period::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
        }
    }
}

impl FromStr for Period {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let format = Regex::new(r"^\d{4}(?:-\d{2}-\d{2})?$")
            .map_err(|e| ParseError::Pattern(e.to_string()))?;
        if !format.is_match(s) {
            return Err(ParseError::InvalidPeriod(s.to_string()));
        }
        if s.len() == 4 {
            return s
                .parse::<i32>()
                .map(Period::Year)
                .map_err(|_| ParseError::InvalidPeriod(s.to_string()));
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Period::Date)
            .map_err(|_| ParseError::InvalidPeriod(s.to_string()))
    }
}

impl From<i32> for Period {
    fn from(year: i32) -> Self {
        Period::Year(year)
    }
}

/// One period or a list of periods. A two-year list is read as an inclusive
/// span when the date-is-range flag is set.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TimeSelector {
    Single(Period),
    List(Vec<Period>),
}

impl TimeSelector {
    pub fn periods(&self) -> Vec<Period> {
        match self {
            TimeSelector::Single(period) => vec![*period],
            TimeSelector::List(periods) => periods.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, TimeSelector::List(periods) if periods.is_empty())
    }

    /// The periods as they are sent on the wire.
    pub fn to_strings(&self) -> Vec<String> {
        self.periods().iter().map(Period::to_string).collect()
    }
}

impl FromStr for TimeSelector {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut periods = s
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(Period::from_str)
            .collect::<Result<Vec<_>, _>>()?;
        match periods.len() {
            0 => Err(ParseError::Empty),
            1 => Ok(TimeSelector::Single(periods.remove(0))),
            _ => Ok(TimeSelector::List(periods)),
        }
    }
}

impl From<i32> for TimeSelector {
    fn from(year: i32) -> Self {
        TimeSelector::Single(Period::Year(year))
    }
}

impl From<Vec<i32>> for TimeSelector {
    fn from(years: Vec<i32>) -> Self {
        TimeSelector::List(years.into_iter().map(Period::Year).collect())
    }
}

/// Industry (label) filter.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum LabelSelector {
    /// Classification codes, e.g. NAICS `111`.
    Codes(Vec<String>),
    /// Display names, either `"Crop Production (111)"` or `"Crop Production"`.
    Names(Vec<String>),
    /// Label ids, sent as-is.
    Ids(Vec<i64>),
}

impl LabelSelector {
    pub fn is_empty(&self) -> bool {
        match self {
            LabelSelector::Codes(codes) => codes.is_empty(),
            LabelSelector::Names(names) => names.is_empty(),
            LabelSelector::Ids(ids) => ids.is_empty(),
        }
    }
}

impl FromStr for LabelSelector {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParseError::Empty);
        }
        if has_letter(s) {
            return Ok(LabelSelector::Names(vec![s.to_string()]));
        }
        Ok(LabelSelector::Codes(
            s.split(',')
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(String::from)
                .collect(),
        ))
    }
}

/// Classification standard of the labels.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum LabelSource {
    #[default]
    Naics,
    Bea,
    Soc,
    Other(String),
}

impl LabelSource {
    pub fn is_naics(&self) -> bool {
        matches!(self, LabelSource::Naics)
    }
}

impl fmt::Display for LabelSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelSource::Naics => f.write_str("NAICS"),
            LabelSource::Bea => f.write_str("BEA"),
            LabelSource::Soc => f.write_str("SOC"),
            LabelSource::Other(name) => f.write_str(&name.to_uppercase()),
        }
    }
}

impl FromStr for LabelSource {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParseError::Empty);
        }
        Ok(match s.to_ascii_uppercase().as_str() {
            "NAICS" => LabelSource::Naics,
            "BEA" => LabelSource::Bea,
            "SOC" => LabelSource::Soc,
            other => LabelSource::Other(other.to_string()),
        })
    }
}

/// Where a values result goes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum OutputMode {
    #[default]
    Memory,
    /// Write CSV to this path instead of returning the table.
    File(PathBuf),
}

/// Result of the values pipeline.
#[derive(Debug)]
pub enum ValuesOutput {
    Table(ResultTable),
    Written { path: PathBuf, rows: usize },
}

impl ValuesOutput {
    pub fn into_table(self) -> Option<ResultTable> {
        match self {
            ValuesOutput::Table(table) => Some(table),
            ValuesOutput::Written { .. } => None,
        }
    }
}

/// Parameters of a values request before any name is resolved.
#[derive(Clone, Debug, PartialEq)]
pub struct QueryParameters {
    pub series: Option<Selector>,
    pub jurisdiction: Option<Selector>,
    pub time: Option<TimeSelector>,
    pub document_type: Option<i64>,
    /// Summary-level data; `false` asks for document-level data.
    pub summary: bool,
    pub date_is_range: bool,
    pub country: bool,
    pub agency: Option<Selector>,
    pub cluster: Option<Selector>,
    pub label: Option<LabelSelector>,
    pub label_level: Option<u8>,
    pub label_source: LabelSource,
    /// Exclude poorly-performing industry results.
    pub filtered: bool,
    pub version: Option<i64>,
    pub output: OutputMode,
    /// Explicit page; disables automatic pagination.
    pub page: Option<u32>,
    pub verbose: bool,
}

impl Default for QueryParameters {
    fn default() -> Self {
        Self {
            series: None,
            jurisdiction: None,
            time: None,
            document_type: Some(1),
            summary: true,
            date_is_range: true,
            country: false,
            agency: None,
            cluster: None,
            label: None,
            label_level: Some(3),
            label_source: LabelSource::Naics,
            filtered: true,
            version: None,
            output: OutputMode::Memory,
            page: None,
            verbose: false,
        }
    }
}

impl QueryParameters {
    pub fn new(
        series: impl Into<Selector>,
        jurisdiction: impl Into<Selector>,
        time: impl Into<TimeSelector>,
    ) -> Self {
        Self {
            series: Some(series.into()),
            jurisdiction: Some(jurisdiction.into()),
            time: Some(time.into()),
            ..Self::default()
        }
    }

    pub fn with_series(mut self, series: impl Into<Selector>) -> Self {
        self.series = Some(series.into());
        self
    }

    pub fn with_jurisdiction(mut self, jurisdiction: impl Into<Selector>) -> Self {
        self.jurisdiction = Some(jurisdiction.into());
        self
    }

    pub fn with_time(mut self, time: impl Into<TimeSelector>) -> Self {
        self.time = Some(time.into());
        self
    }

    pub fn with_document_type(mut self, document_type: Option<i64>) -> Self {
        self.document_type = document_type;
        self
    }

    pub fn with_summary(mut self, summary: bool) -> Self {
        self.summary = summary;
        self
    }

    pub fn with_date_is_range(mut self, is_range: bool) -> Self {
        self.date_is_range = is_range;
        self
    }

    pub fn with_country(mut self, country: bool) -> Self {
        self.country = country;
        self
    }

    pub fn with_agency(mut self, agency: impl Into<Selector>) -> Self {
        self.agency = Some(agency.into());
        self
    }

    pub fn with_cluster(mut self, cluster: impl Into<Selector>) -> Self {
        self.cluster = Some(cluster.into());
        self
    }

    pub fn with_label(mut self, label: LabelSelector) -> Self {
        self.label = Some(label);
        self
    }

    pub fn with_label_level(mut self, level: Option<u8>) -> Self {
        self.label_level = level;
        self
    }

    pub fn with_label_source(mut self, source: LabelSource) -> Self {
        self.label_source = source;
        self
    }

    pub fn with_filtered(mut self, filtered: bool) -> Self {
        self.filtered = filtered;
        self
    }

    pub fn with_version(mut self, version: i64) -> Self {
        self.version = Some(version);
        self
    }

    pub fn with_output(mut self, output: OutputMode) -> Self {
        self.output = output;
        self
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

/// Parameters of an industry (label) lookup.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LabelLookup {
    pub keyword: Option<String>,
    pub level: u8,
    pub source: Option<LabelSource>,
    /// Key the lookup by code instead of `"Name (code)"`.
    pub only_id: bool,
}

impl Default for LabelLookup {
    fn default() -> Self {
        Self {
            keyword: None,
            level: 3,
            source: Some(LabelSource::Naics),
            only_id: false,
        }
    }
}

impl LabelLookup {
    pub fn with_keyword(mut self, keyword: &str) -> Self {
        self.keyword = Some(keyword.to_string());
        self
    }

    pub fn with_level(mut self, level: u8) -> Self {
        self.level = level;
        self
    }

    pub fn with_source(mut self, source: Option<LabelSource>) -> Self {
        self.source = source;
        self
    }

    pub fn with_only_id(mut self, only_id: bool) -> Self {
        self.only_id = only_id;
        self
    }

    pub(crate) fn to_query(&self) -> regcensus_api::LabelQuery {
        regcensus_api::LabelQuery {
            label_level: self.level,
            keyword: self.keyword.clone(),
            label_source: self.source.as_ref().map(ToString::to_string),
        }
    }
}
