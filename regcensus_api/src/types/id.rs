//! Identifiers arrive as integers, floats, or numeric strings depending on the endpoint.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Int(i64),
    Float(f64),
    Text(String),
}

impl RawId {
    fn into_id<E: serde::de::Error>(self) -> Result<i64, E> {
        match self {
            RawId::Int(i) => Ok(i),
            RawId::Float(f) => Ok(f as i64),
            RawId::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| E::custom(format!("invalid identifier '{}'", s))),
        }
    }
}

pub(crate) fn required<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    RawId::deserialize(deserializer)?.into_id()
}

pub(crate) fn optional<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<RawId>::deserialize(deserializer)? {
        Some(RawId::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(raw) => raw.into_id().map(Some),
        None => Ok(None),
    }
}

