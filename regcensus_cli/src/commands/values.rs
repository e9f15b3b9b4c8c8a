use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Result;
use clap::Args;
use regcensus_lib::{
    LabelSelector, LabelSource, OutputMode, QueryParameters, RegCensus, Selector, TimeSelector,
    ValuesOutput,
};

use crate::output::{render_result_table, OutputFormat};

#[derive(Args)]
pub struct ValuesArgs {
    /// Series id(s) or name, e.g. 1, "1,2" or Restrictions
    #[arg(long, value_parser = Selector::from_str)]
    pub series: Option<Selector>,

    /// Jurisdiction id(s) or name, e.g. 38 or "United States"
    #[arg(long, value_parser = Selector::from_str)]
    pub jurisdiction: Option<Selector>,

    /// Year(s) or date, e.g. 2019, "2015,2019" or 2020-06-02
    #[arg(long)]
    pub year: Option<TimeSelector>,

    /// Document type id (1 is regulations)
    #[arg(long, default_value_t = 1)]
    pub document_type: i64,

    /// Treat two years as a list instead of an inclusive span
    #[arg(long)]
    pub no_range: bool,

    /// Include all subjurisdictions
    #[arg(long)]
    pub country: bool,

    /// Agency id(s) or name
    #[arg(long, value_parser = Selector::from_str)]
    pub agency: Option<Selector>,

    /// Agency cluster id(s) or name
    #[arg(long, value_parser = Selector::from_str)]
    pub cluster: Option<Selector>,

    /// Industry code(s), e.g. "111,112", or an industry name
    #[arg(long)]
    pub label: Option<LabelSelector>,

    /// Industry code level (2 to 6 digits for NAICS)
    #[arg(long, default_value_t = 3)]
    pub label_level: u8,

    /// Classification standard: NAICS, BEA, SOC
    #[arg(long, default_value = "NAICS")]
    pub label_source: LabelSource,

    /// Include poorly-performing industry results (NOT recommended)
    #[arg(long)]
    pub unfiltered: bool,

    /// Dataset version (latest when omitted)
    #[arg(long)]
    pub version: Option<i64>,

    /// Fetch a single page instead of every page
    #[arg(long)]
    pub page: Option<u32>,

    /// Write the results as CSV to this path
    #[arg(long)]
    pub download: Option<PathBuf>,

    /// Print the request URL without fetching values
    #[arg(long)]
    pub dry_run: bool,
}

/// Which flavor of the values pipeline to run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Summary,
    Document,
    ReadingTime,
}

impl ValuesArgs {
    pub fn to_params(&self, verbose: bool) -> QueryParameters {
        let mut params = QueryParameters {
            series: self.series.clone(),
            jurisdiction: self.jurisdiction.clone(),
            time: self.year.clone(),
            ..QueryParameters::default()
        }
        .with_document_type(Some(self.document_type))
        .with_date_is_range(!self.no_range)
        .with_country(self.country)
        .with_label_level(Some(self.label_level))
        .with_label_source(self.label_source.clone())
        .with_filtered(!self.unfiltered)
        .with_verbose(verbose);

        if let Some(agency) = &self.agency {
            params = params.with_agency(agency.clone());
        }
        if let Some(cluster) = &self.cluster {
            params = params.with_cluster(cluster.clone());
        }
        if let Some(label) = &self.label {
            params = params.with_label(label.clone());
        }
        if let Some(version) = self.version {
            params = params.with_version(version);
        }
        if let Some(page) = self.page {
            params = params.with_page(page);
        }
        if let Some(path) = &self.download {
            params = params.with_output(OutputMode::File(path.clone()));
        }
        params
    }
}

pub async fn run(
    args: &ValuesArgs,
    level: Level,
    client: &RegCensus,
    format: &OutputFormat,
    verbose: bool,
) -> Result<()> {
    let params = args.to_params(verbose);

    if args.dry_run {
        let params = match level {
            Level::Summary => params,
            Level::Document => params.with_summary(false),
            Level::ReadingTime => params.with_series(2),
        };
        println!("{}", client.values_url(&params).await?);
        return Ok(());
    }

    let output = match level {
        Level::Summary => client.get_values(&params).await?,
        Level::Document => client.get_document_values(&params).await?,
        Level::ReadingTime => client.get_reading_time(&params).await?,
    };

    match output {
        ValuesOutput::Table(table) => {
            eprintln!("{} rows", table.len());
            println!("{}", render_result_table(&table, format)?);
        }
        ValuesOutput::Written { path, rows } => {
            eprintln!("Wrote {} rows to {}", rows, path.display());
        }
    }

    Ok(())
}
