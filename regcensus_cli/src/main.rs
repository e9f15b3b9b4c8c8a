mod commands;
mod output;

use std::time::Duration;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use regcensus_lib::{CachePolicy, RegCensus};

use crate::commands::values::Level;
use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "regcensus")]
#[command(about = "Query regulatory data from the RegData API")]
struct Cli {
    /// Output format: table, json, csv or markdown
    #[arg(long, default_value = "table", global = true)]
    output: String,

    /// API host (defaults to the public RegData API)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Expire cached lookups after this many seconds
    #[arg(long, global = true)]
    cache_ttl: Option<u64>,

    /// Do not cache lookups
    #[arg(long, global = true)]
    no_cache: bool,

    /// Log request URLs and debug output
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summary-level values for series, jurisdictions and years
    Values(Box<commands::values::ValuesArgs>),
    /// Document-level values
    DocumentValues(Box<commands::values::ValuesArgs>),
    /// Word counts converted to reading time
    ReadingTime(Box<commands::values::ValuesArgs>),
    /// Series metadata
    Series,
    /// Jurisdiction metadata
    Jurisdictions,
    /// Agencies of a jurisdiction or matching a keyword
    Agencies(commands::metadata::AgenciesArgs),
    /// Industry (label) metadata
    Industries(commands::metadata::IndustriesArgs),
    /// Documents of a jurisdiction for a year
    Documents(commands::metadata::DocumentsArgs),
    /// Dataset versions of a jurisdiction
    Versions(commands::metadata::VersionsArgs),
    /// Project documentation and citations
    Documentation,
    /// Series and years available for a jurisdiction
    Datafinder(commands::metadata::DatafinderArgs),
    /// Name to id lookups
    List(commands::list::ListArgs),
}

fn cache_policy(cli: &Cli) -> CachePolicy {
    if cli.no_cache {
        return CachePolicy::disabled();
    }
    match cli.cache_ttl {
        Some(secs) => CachePolicy::unbounded().with_ttl(Duration::from_secs(secs)),
        None => CachePolicy::unbounded(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose > 0 { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(format!("regcensus={}", level).parse()?),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let format = OutputFormat::parse(&cli.output);
    let cache = cache_policy(&cli);
    let client = match &cli.base_url {
        Some(url) => RegCensus::with_base_url(url, cache),
        None => RegCensus::new(cache),
    };
    let verbose = cli.verbose > 0;

    match &cli.command {
        Commands::Values(args) => {
            commands::values::run(args, Level::Summary, &client, &format, verbose).await?
        }
        Commands::DocumentValues(args) => {
            commands::values::run(args, Level::Document, &client, &format, verbose).await?
        }
        Commands::ReadingTime(args) => {
            commands::values::run(args, Level::ReadingTime, &client, &format, verbose).await?
        }
        Commands::Series => commands::metadata::series(&client, &format).await?,
        Commands::Jurisdictions => commands::metadata::jurisdictions(&client, &format).await?,
        Commands::Agencies(args) => commands::metadata::agencies(args, &client, &format).await?,
        Commands::Industries(args) => {
            commands::metadata::industries(args, &client, &format).await?
        }
        Commands::Documents(args) => commands::metadata::documents(args, &client, &format).await?,
        Commands::Versions(args) => commands::metadata::versions(args, &client, &format).await?,
        Commands::Documentation => commands::metadata::documentation(&client, &format).await?,
        Commands::Datafinder(args) => {
            commands::metadata::datafinder(args, &client, &format).await?
        }
        Commands::List(args) => commands::list::run(args, &client, &format).await?,
    }

    Ok(())
}
