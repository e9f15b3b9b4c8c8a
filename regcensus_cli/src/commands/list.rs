use anyhow::{bail, Result};
use clap::{Args, ValueEnum};
use regcensus_lib::RegCensus;

use super::metadata::IndustriesArgs;
use crate::output::{render_lookup, render_years, OutputFormat};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ListKind {
    Series,
    Jurisdictions,
    Agencies,
    Clusters,
    Industries,
    DocumentTypes,
    Dates,
}

#[derive(Args)]
pub struct ListArgs {
    /// What to list
    #[arg(value_enum)]
    pub kind: ListKind,

    /// Jurisdiction id (agencies, document types, dates)
    #[arg(long)]
    pub jurisdiction: Option<i64>,

    /// Document type id (dates)
    #[arg(long)]
    pub document_type: Option<i64>,

    /// Key industries by code instead of "Name (code)"
    #[arg(long)]
    pub only_id: bool,

    /// Map ids to names instead of names to ids
    #[arg(long)]
    pub reverse: bool,

    #[command(flatten)]
    pub industries: IndustriesArgs,
}

pub async fn run(args: &ListArgs, client: &RegCensus, format: &OutputFormat) -> Result<()> {
    let map = match args.kind {
        ListKind::Series => client.list_series().await?,
        ListKind::Jurisdictions => client.list_jurisdictions().await?,
        ListKind::Clusters => client.list_clusters().await?,
        ListKind::Agencies => {
            client
                .list_agencies(args.jurisdiction, args.industries.keyword.as_deref())
                .await?
        }
        ListKind::Industries => {
            client
                .list_industries(&args.industries.to_lookup(args.only_id))
                .await?
        }
        ListKind::DocumentTypes => client.list_document_types(args.jurisdiction).await?,
        ListKind::Dates => {
            let Some(jurisdiction) = args.jurisdiction else {
                bail!("--jurisdiction is required to list dates");
            };
            let years = client.list_dates(jurisdiction, args.document_type).await?;
            println!("{}", render_years(&years, format)?);
            return Ok(());
        }
    };

    println!("{}", render_lookup(&map, args.reverse, format)?);
    Ok(())
}
