use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use veille::{config::AppConfig, console, html, server};
use veille_core::{
    filters::{apply_filters, FilterSpec, YearRange},
    outputs::{mentions_frame, write_parquet, ReportFrames},
    pipelines::ReportSession,
    temporal::{GapPolicy, Granularity},
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Media monitoring reports from mention exports", long_about = None)]
struct Cli {
    /// TOML configuration file (defaults to $VEILLE_CONFIG when set)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a report from a mention export
    Report(ReportArgs),
    /// Start the HTTP report service
    Serve(ServeArgs),
}

#[derive(ValueEnum, Debug, Clone, Copy, Default)]
enum OutputFormat {
    #[default]
    Table,
    Json,
    Html,
}

#[derive(Args, Debug)]
struct ReportArgs {
    /// Mention export (CSV with articleCreatedDate, authorName, sentimentHumanReadable, articleTitle)
    file: PathBuf,

    /// Time bucket of the mentions series: day, week, month or year
    #[arg(long)]
    granularity: Option<Granularity>,

    /// First year included (defaults to the earliest observed year)
    #[arg(long)]
    from_year: Option<i32>,

    /// Last year included (defaults to the latest observed year)
    #[arg(long)]
    to_year: Option<i32>,

    /// Restrict to these authors; repeat the flag for several
    #[arg(long = "author")]
    authors: Vec<String>,

    /// Keep rows whose date could not be parsed
    #[arg(long)]
    keep_undated: bool,

    /// Emit empty periods in the mentions series with a zero count
    #[arg(long)]
    zero_fill: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Write the report tables as Parquet files into this directory
    #[arg(long)]
    export_dir: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Listen address, overriding configuration
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let cli = Cli::parse();
    let mut config = AppConfig::load(cli.config.as_deref())?;

    match cli.command {
        Command::Report(args) => run_report(&config, args),
        Command::Serve(args) => {
            if let Some(bind) = args.bind {
                config.server.bind_addr = bind;
            }
            server::serve(config).await
        }
    }
}

fn run_report(config: &AppConfig, args: ReportArgs) -> Result<()> {
    let raw = fs::read(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let session = ReportSession::from_bytes(&raw)
        .with_context(|| format!("failed to normalize {}", args.file.display()))?;
    let quality = session.dataset().quality;
    if !quality.is_clean() {
        warn!(quality = ?quality, "dataset has incomplete rows");
    }

    let filter = filter_from_args(&session, &args);

    let mut options = config.report;
    if let Some(granularity) = args.granularity {
        options.granularity = granularity;
    }
    if args.zero_fill {
        options.gap_policy = GapPolicy::ZeroFill;
    }

    let report = session.report(&filter, &options);
    info!(
        records = session.dataset().len(),
        total = report.kpis.total_mentions,
        "report built"
    );

    match args.format {
        OutputFormat::Table => print!("{}", console::render_report(&report)),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&report).context("failed to serialize report")?
        ),
        OutputFormat::Html => println!("{}", html::render_report_html(&report)),
    }

    if let Some(dir) = args.export_dir {
        let frames = ReportFrames::from_report(&report)?;
        let written = frames
            .write_parquet_dir(&dir)
            .with_context(|| format!("failed to export tables to {}", dir.display()))?;

        let filtered = apply_filters(&session.dataset().mentions, &filter);
        let mentions_path = dir.join("mentions.parquet");
        write_parquet(&mentions_path, &mentions_frame(&filtered)?)
            .with_context(|| format!("failed to write {}", mentions_path.display()))?;
        info!(
            files = written.len() + 1,
            dir = %dir.display(),
            "exported report tables"
        );
    }

    Ok(())
}

/// Starts from every observed year and author, then narrows by the flags given.
fn filter_from_args(session: &ReportSession, args: &ReportArgs) -> FilterSpec {
    let mut filter = session.default_filter();
    let observed = session.filter_options().years;

    if args.from_year.is_some() || args.to_year.is_some() {
        let min = args
            .from_year
            .or(observed.map(|r| r.min))
            .or(args.to_year);
        let max = args.to_year.or(observed.map(|r| r.max)).or(args.from_year);
        if let (Some(min), Some(max)) = (min, max) {
            filter.year_range = Some(YearRange::new(min, max));
        }
    }
    if !args.authors.is_empty() {
        filter.authors = args.authors.iter().cloned().collect();
    }
    filter.keep_undated = args.keep_undated;
    filter
}
