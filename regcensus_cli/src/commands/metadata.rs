use std::str::FromStr;

use anyhow::Result;
use clap::Args;
use regcensus_lib::{LabelLookup, LabelSource, RegCensus, Selector, TimeSelector};

use crate::output::{render_result_table, OutputFormat};

#[derive(Args)]
pub struct AgenciesArgs {
    /// Jurisdiction id
    #[arg(long)]
    pub jurisdiction: Option<i64>,

    /// Search agency names across jurisdictions
    #[arg(long)]
    pub keyword: Option<String>,
}

#[derive(Args)]
pub struct IndustriesArgs {
    /// Search industry names
    #[arg(long)]
    pub keyword: Option<String>,

    /// Industry code level (2 to 6 digits for NAICS)
    #[arg(long, default_value_t = 3)]
    pub label_level: u8,

    /// Classification standard: NAICS, BEA, SOC
    #[arg(long, default_value = "NAICS")]
    pub label_source: LabelSource,
}

impl IndustriesArgs {
    pub fn to_lookup(&self, only_id: bool) -> LabelLookup {
        let mut lookup = LabelLookup::default()
            .with_level(self.label_level)
            .with_source(Some(self.label_source.clone()))
            .with_only_id(only_id);
        if let Some(keyword) = &self.keyword {
            lookup = lookup.with_keyword(keyword);
        }
        lookup
    }
}

#[derive(Args)]
pub struct DocumentsArgs {
    /// Jurisdiction id or name
    #[arg(long, value_parser = Selector::from_str)]
    pub jurisdiction: Selector,

    /// Year of the documents
    #[arg(long)]
    pub year: TimeSelector,

    #[arg(long, default_value_t = 1)]
    pub document_type: i64,
}

#[derive(Args)]
pub struct VersionsArgs {
    #[arg(long)]
    pub jurisdiction: i64,

    #[arg(long, default_value_t = 1)]
    pub document_type: i64,
}

#[derive(Args)]
pub struct DatafinderArgs {
    #[arg(long)]
    pub jurisdiction: i64,

    #[arg(long)]
    pub document_type: Option<i64>,
}

pub async fn series(client: &RegCensus, format: &OutputFormat) -> Result<()> {
    let table = client.get_series().await?;
    println!("{}", render_result_table(&table, format)?);
    Ok(())
}

pub async fn jurisdictions(client: &RegCensus, format: &OutputFormat) -> Result<()> {
    let table = client.get_jurisdictions().await?;
    println!("{}", render_result_table(&table, format)?);
    Ok(())
}

pub async fn agencies(args: &AgenciesArgs, client: &RegCensus, format: &OutputFormat) -> Result<()> {
    let table = client
        .get_agencies(args.jurisdiction, args.keyword.as_deref())
        .await?;
    println!("{}", render_result_table(&table, format)?);
    Ok(())
}

pub async fn industries(
    args: &IndustriesArgs,
    client: &RegCensus,
    format: &OutputFormat,
) -> Result<()> {
    let table = client.get_industries(&args.to_lookup(false)).await?;
    println!("{}", render_result_table(&table, format)?);
    Ok(())
}

pub async fn documents(
    args: &DocumentsArgs,
    client: &RegCensus,
    format: &OutputFormat,
) -> Result<()> {
    let table = client
        .get_documents(
            args.jurisdiction.clone(),
            args.year.clone(),
            Some(args.document_type),
        )
        .await?;
    eprintln!("{} documents", table.len());
    println!("{}", render_result_table(&table, format)?);
    Ok(())
}

pub async fn versions(args: &VersionsArgs, client: &RegCensus, format: &OutputFormat) -> Result<()> {
    let table = client
        .get_versions(args.jurisdiction, args.document_type)
        .await?;
    println!("{}", render_result_table(&table, format)?);
    Ok(())
}

pub async fn documentation(client: &RegCensus, format: &OutputFormat) -> Result<()> {
    let table = client.get_documentation().await?;
    println!("{}", render_result_table(&table, format)?);
    Ok(())
}

pub async fn datafinder(
    args: &DatafinderArgs,
    client: &RegCensus,
    format: &OutputFormat,
) -> Result<()> {
    let table = client
        .get_datafinder(args.jurisdiction, args.document_type)
        .await?;
    println!("{}", render_result_table(&table, format)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: DocumentsArgs,
    }

    #[test]
    fn test_documents_jurisdiction_id() {
        let cli = TestCli::parse_from(["test", "--jurisdiction", "38", "--year", "2019"]);
        assert_eq!(cli.args.jurisdiction, Selector::Id(38));
        assert_eq!(cli.args.document_type, 1);

        let cli = TestCli::parse_from(["test", "--jurisdiction", "Alaska", "--year", "2019"]);
        assert_eq!(cli.args.jurisdiction, Selector::Name("Alaska".to_string()));
    }
}
