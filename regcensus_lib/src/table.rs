//! Flat tabular results.
//!
//! Payloads are arrays of (possibly nested) JSON objects. They are flattened
//! into a [`ResultTable`]: nested keys are joined with `.`, the column set is
//! the union of keys in first-appearance order, and missing cells are null.

use std::fmt;
use std::io::Write;
use std::path::Path;

use serde::ser::{SerializeSeq, Serializer};
use serde::Serialize;
use serde_json::{Map, Value};
use tabled::builder::Builder;
use tabled::settings::Style;

use crate::error::RegCensusError;

/// Namespacing token stripped from column names; only the text after its
/// last occurrence is kept.
pub const COLUMN_PREFIX: &str = "v_";

/// Ordered columns and rows of scalar JSON values.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResultTable {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl ResultTable {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Value::Null);
                row
            })
            .collect();
        Self { columns, rows }
    }

    /// Flattens a decoded payload. An array yields one row per element, a
    /// single object yields one row.
    pub fn from_payload(payload: &Value) -> Result<Self, RegCensusError> {
        let records: Vec<&Map<String, Value>> = match payload {
            Value::Array(items) => items
                .iter()
                .map(|item| {
                    item.as_object().ok_or_else(|| {
                        malformed(format!("expected an object per row, found {}", kind_of(item)))
                    })
                })
                .collect::<Result<_, _>>()?,
            Value::Object(object) => vec![object],
            other => {
                return Err(malformed(format!(
                    "expected rows, found {}",
                    kind_of(other)
                )))
            }
        };

        let mut table = ResultTable::default();
        for record in records {
            let mut flat = Vec::new();
            flatten_into(None, record, &mut flat);
            table.push_record(flat);
        }
        Ok(table)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Values of one column, top to bottom.
    pub fn column(&self, name: &str) -> Option<Vec<&Value>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|row| &row[idx]).collect())
    }

    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.column_index(column)?;
        self.rows.get(row).map(|r| &r[idx])
    }

    /// Strips [`COLUMN_PREFIX`] from every column name.
    pub fn clean_columns(mut self) -> Self {
        for column in self.columns.iter_mut() {
            if let Some((_, rest)) = column.rsplit_once(COLUMN_PREFIX) {
                *column = rest.to_string();
            }
        }
        self
    }

    pub fn rename_columns(mut self, renames: &[(&str, &str)]) -> Self {
        for column in self.columns.iter_mut() {
            if let Some((_, to)) = renames.iter().find(|(from, _)| column == from) {
                *column = to.to_string();
            }
        }
        self
    }

    /// Appends the rows of `other`, widening the column set when `other`
    /// carries columns this table has not seen.
    pub fn append(&mut self, other: ResultTable) {
        let mapping: Vec<usize> = other
            .columns
            .iter()
            .map(|c| self.ensure_column(c))
            .collect();
        let width = self.columns.len();
        for row in other.rows {
            let mut out = vec![Value::Null; width];
            for (value, idx) in row.into_iter().zip(mapping.iter()) {
                out[*idx] = value;
            }
            self.rows.push(out);
        }
    }

    /// Rewrites every cell of `name` with `f`. Returns false when the column is absent.
    pub fn map_column<F>(&mut self, name: &str, f: F) -> bool
    where
        F: Fn(&Value) -> Value,
    {
        let Some(idx) = self.column_index(name) else {
            return false;
        };
        for row in self.rows.iter_mut() {
            row[idx] = f(&row[idx]);
        }
        true
    }

    /// Sets every cell of `name` to `value`, adding the column if needed.
    pub fn set_column(&mut self, name: &str, value: Value) {
        let idx = self.ensure_column(name);
        for row in self.rows.iter_mut() {
            row[idx] = value.clone();
        }
    }

    /// Rows as JSON objects keyed by column name.
    pub fn records(&self) -> Vec<Map<String, Value>> {
        self.rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .cloned()
                    .zip(row.iter().cloned())
                    .collect()
            })
            .collect()
    }

    /// Writes the table as CSV: one header row, no index column.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), RegCensusError> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(&self.columns)?;
        for row in &self.rows {
            wtr.write_record(row.iter().map(cell_text))?;
        }
        wtr.flush().map_err(csv::Error::from)?;
        Ok(())
    }

    pub fn write_csv_file(&self, path: &Path) -> Result<(), RegCensusError> {
        let file = std::fs::File::create(path).map_err(|source| RegCensusError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.write_csv(file)
    }

    pub fn to_markdown(&self) -> String {
        let mut table = self.builder().build();
        table.with(Style::markdown());
        table.to_string()
    }

    fn builder(&self) -> Builder {
        let mut builder = Builder::default();
        builder.push_record(self.columns.iter().cloned());
        for row in &self.rows {
            builder.push_record(row.iter().map(cell_text));
        }
        builder
    }

    fn push_record(&mut self, flat: Vec<(String, Value)>) {
        let mut row = vec![Value::Null; self.columns.len()];
        for (key, value) in flat {
            let idx = self.ensure_column(&key);
            if idx >= row.len() {
                row.resize(idx + 1, Value::Null);
            }
            row[idx] = value;
        }
        self.rows.push(row);
    }

    fn ensure_column(&mut self, name: &str) -> usize {
        if let Some(idx) = self.column_index(name) {
            return idx;
        }
        self.columns.push(name.to_string());
        for row in self.rows.iter_mut() {
            row.push(Value::Null);
        }
        self.columns.len() - 1
    }
}

impl fmt::Display for ResultTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.builder().build())
    }
}

impl Serialize for ResultTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for record in self.records() {
            seq.serialize_element(&record)?;
        }
        seq.end()
    }
}

/// Text form of a cell for CSV and table output. Nulls are empty.
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn flatten_into(prefix: Option<&str>, object: &Map<String, Value>, out: &mut Vec<(String, Value)>) {
    for (key, value) in object {
        let name = match prefix {
            Some(p) => format!("{}.{}", p, key),
            None => key.clone(),
        };
        match value {
            Value::Object(inner) if !inner.is_empty() => flatten_into(Some(&name), inner, out),
            Value::Object(_) => out.push((name, Value::Null)),
            other => out.push((name, other.clone())),
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn malformed(reason: String) -> RegCensusError {
    RegCensusError::Api(regcensus_api::Error::Malformed(reason))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn flattens_nested_objects() {
        let payload = json!([
            {"series": {"id": 1, "name": "Restrictions"}, "year": 2019},
            {"series": {"id": 2, "name": "Words"}, "year": 2019}
        ]);
        let table = ResultTable::from_payload(&payload).unwrap();
        assert_eq!(table.columns(), ["series.id", "series.name", "year"]);
        assert_eq!(table.get(1, "series.name"), Some(&json!("Words")));
    }

    #[test]
    fn missing_keys_become_null() {
        let payload = json!([{"a": 1}, {"b": 2}]);
        let table = ResultTable::from_payload(&payload).unwrap();
        assert_eq!(table.columns(), ["a", "b"]);
        assert_eq!(table.rows()[0], vec![json!(1), Value::Null]);
        assert_eq!(table.rows()[1], vec![Value::Null, json!(2)]);
    }

    #[test]
    fn single_object_is_one_row() {
        let table = ResultTable::from_payload(&json!({"a": 1})).unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn scalars_are_rejected() {
        assert!(ResultTable::from_payload(&json!(5)).is_err());
        assert!(ResultTable::from_payload(&json!([1, 2])).is_err());
    }

    #[test]
    fn clean_columns_keeps_text_after_last_prefix() {
        let table = ResultTable::new(
            vec![
                "v_series_value".to_string(),
                "jurisdiction_name".to_string(),
                "mv_v_year".to_string(),
            ],
            vec![],
        )
        .clean_columns();
        assert_eq!(table.columns(), ["series_value", "jurisdiction_name", "year"]);
    }

    #[test]
    fn append_widens_columns() {
        let mut first = ResultTable::from_payload(&json!([{"a": 1}])).unwrap();
        let second = ResultTable::from_payload(&json!([{"b": 2, "a": 3}])).unwrap();
        first.append(second);
        assert_eq!(first.columns(), ["a", "b"]);
        assert_eq!(first.rows()[0], vec![json!(1), Value::Null]);
        assert_eq!(first.rows()[1], vec![json!(3), json!(2)]);
    }

    #[test]
    fn csv_has_header_and_no_index() {
        let table = ResultTable::from_payload(&json!([
            {"series_value": 52569.0, "jurisdiction_name": "Alaska", "note": null}
        ]))
        .unwrap();
        let mut out = Vec::new();
        table.write_csv(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "series_value,jurisdiction_name,note\n52569.0,Alaska,\n");
    }

    #[test]
    fn set_and_map_columns() {
        let mut table = ResultTable::from_payload(&json!([{"n": 1}, {"n": 2}])).unwrap();
        assert!(table.map_column("n", |v| json!(v.as_i64().unwrap() * 10)));
        assert!(!table.map_column("missing", |v| v.clone()));
        table.set_column("tag", json!("x"));
        assert_eq!(table.column("n").unwrap(), vec![&json!(10), &json!(20)]);
        assert_eq!(table.column("tag").unwrap(), vec![&json!("x"), &json!("x")]);
    }

    #[test]
    fn serializes_as_records() {
        let table = ResultTable::from_payload(&json!([{"a": 1, "b": "x"}])).unwrap();
        assert_eq!(serde_json::to_value(&table).unwrap(), json!([{"a": 1, "b": "x"}]));
    }

    #[test]
    fn markdown_rendering() {
        let table = ResultTable::from_payload(&json!([{"year": 2019}])).unwrap();
        let md = table.to_markdown();
        assert!(md.contains('|'));
        assert!(md.contains("---"));
        assert!(md.contains("year"));
        assert!(md.contains("2019"));
    }
}
