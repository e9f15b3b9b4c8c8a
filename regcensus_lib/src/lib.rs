//! Library layer for RegCensus: cached metadata lookups, name resolution,
//! endpoint selection, and the values pipeline.
//!
//! Wraps the `regcensus_api` crate with an injectable in-memory cache and
//! turns its JSON payloads into flat [`ResultTable`]s and [`LookupMap`]s.

pub mod cache;
pub mod client;
pub mod endpoint;
pub mod error;
pub mod lookup;
pub mod params;
pub mod reading_time;
mod resolve;
pub mod table;
pub mod values;

pub use regcensus_api;
pub use regcensus_api::types;

pub use cache::{CachePolicy, MemoryCache};
pub use client::{CacheKey, RegCensus};
pub use error::{FailureKind, LookupKind, RegCensusError};
pub use lookup::LookupMap;
pub use params::{
    LabelLookup, LabelSelector, LabelSource, OutputMode, ParseError, Period, QueryParameters,
    Selector, TimeSelector, ValuesOutput,
};
pub use reading_time::reading_time;
pub use table::ResultTable;
pub use values::PAGE_SIZE;
