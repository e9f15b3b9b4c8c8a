use anyhow::Result;
use regcensus_lib::{LookupMap, ResultTable};
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
    Markdown,
}

impl OutputFormat {
    pub fn parse(name: &str) -> Self {
        match name {
            "json" => OutputFormat::Json,
            "csv" => OutputFormat::Csv,
            "markdown" | "md" => OutputFormat::Markdown,
            _ => OutputFormat::Table,
        }
    }
}

#[derive(Tabled, Serialize)]
struct LookupRow {
    #[tabled(rename = "Name")]
    #[serde(rename = "name")]
    name: String,
    #[tabled(rename = "ID")]
    #[serde(rename = "id")]
    id: i64,
}

#[derive(Tabled, Serialize)]
struct ReversedRow {
    #[tabled(rename = "ID")]
    #[serde(rename = "id")]
    id: i64,
    #[tabled(rename = "Name")]
    #[serde(rename = "name")]
    name: String,
}

#[derive(Tabled, Serialize)]
struct YearRow {
    #[tabled(rename = "Year")]
    #[serde(rename = "year")]
    year: i64,
}

// -- Row builders --

fn build_lookup_rows(map: &LookupMap) -> Vec<LookupRow> {
    map.iter()
        .map(|(name, id)| LookupRow {
            name: name.to_string(),
            id,
        })
        .collect()
}

fn build_reversed_rows(map: &LookupMap) -> Vec<ReversedRow> {
    map.reversed()
        .iter()
        .map(|(id, name)| ReversedRow {
            id: *id,
            name: name.clone(),
        })
        .collect()
}

fn build_year_rows(years: &[i64]) -> Vec<YearRow> {
    years.iter().map(|y| YearRow { year: *y }).collect()
}

// -- Rendering --

pub fn render_result_table(table: &ResultTable, format: &OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Table => table.to_string(),
        OutputFormat::Markdown => table.to_markdown(),
        OutputFormat::Json => serde_json::to_string_pretty(table)?,
        OutputFormat::Csv => {
            let mut out = Vec::new();
            table.write_csv(&mut out)?;
            String::from_utf8(out)?
        }
    })
}

pub fn render_lookup(map: &LookupMap, reverse: bool, format: &OutputFormat) -> Result<String> {
    if reverse {
        match format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(map.reversed())?),
            _ => render_rows(build_reversed_rows(map), format),
        }
    } else {
        match format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(map)?),
            _ => render_rows(build_lookup_rows(map), format),
        }
    }
}

pub fn render_years(years: &[i64], format: &OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(years)?),
        _ => render_rows(build_year_rows(years), format),
    }
}

fn render_rows<T: Tabled + Serialize>(rows: Vec<T>, format: &OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Table => Table::new(rows).to_string(),
        OutputFormat::Markdown => {
            let mut table = Table::new(rows);
            table.with(Style::markdown());
            table.to_string()
        }
        OutputFormat::Json => serde_json::to_string_pretty(&rows)?,
        OutputFormat::Csv => {
            let mut out = Vec::new();
            {
                let mut wtr = csv::Writer::from_writer(&mut out);
                for row in rows {
                    wtr.serialize(row)?;
                }
                wtr.flush()?;
            }
            String::from_utf8(out)?
        }
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn states() -> LookupMap {
        LookupMap::from_pairs(vec![
            ("United States".to_string(), 38),
            ("Alaska".to_string(), 58),
            ("Alabama".to_string(), 59),
        ])
    }

    #[test]
    fn test_parse_output_format() {
        assert_eq!(OutputFormat::parse("json"), OutputFormat::Json);
        assert_eq!(OutputFormat::parse("csv"), OutputFormat::Csv);
        assert_eq!(OutputFormat::parse("md"), OutputFormat::Markdown);
        assert_eq!(OutputFormat::parse("anything"), OutputFormat::Table);
    }

    #[test]
    fn test_lookup_rows_sorted_by_name() {
        let rows = build_lookup_rows(&states());
        let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Alabama", "Alaska", "United States"]);
    }

    #[test]
    fn test_reversed_rows_sorted_by_id() {
        let rows = build_reversed_rows(&states());
        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, [38, 58, 59]);
    }

    #[test]
    fn test_csv_lookup() {
        let csv = render_lookup(&states(), false, &OutputFormat::Csv).unwrap();
        assert_eq!(csv, "name,id\nAlabama,59\nAlaska,58\nUnited States,38\n");
    }

    #[test]
    fn test_json_lookup_is_a_map() {
        let text = render_lookup(&states(), false, &OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value, json!({"Alabama": 59, "Alaska": 58, "United States": 38}));

        let text = render_lookup(&states(), true, &OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["58"], "Alaska");
    }

    #[test]
    fn test_markdown_lookup_headers() {
        let md = render_lookup(&states(), true, &OutputFormat::Markdown).unwrap();
        let header = md.lines().next().unwrap();
        assert!(header.contains("ID"));
        assert!(header.contains("Name"));
    }

    #[test]
    fn test_years() {
        let csv = render_years(&[2019, 2020], &OutputFormat::Csv).unwrap();
        assert_eq!(csv, "year\n2019\n2020\n");
    }

    #[test]
    fn test_result_table_csv_and_json() {
        let table = ResultTable::from_payload(&json!([
            {"jurisdiction_name": "Alaska", "series_value": 52569}
        ]))
        .unwrap();
        let csv = render_result_table(&table, &OutputFormat::Csv).unwrap();
        assert_eq!(csv, "jurisdiction_name,series_value\nAlaska,52569\n");

        let text = render_result_table(&table, &OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value, json!([{"jurisdiction_name": "Alaska", "series_value": 52569}]));
    }
}
