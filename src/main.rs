use std::path::PathBuf;

use anyhow::{bail, Context};
use chrono::Utc;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use acscent_archive::audit::audit;
use acscent_archive::catalog::Catalog;
use acscent_archive::config::ArchiveConfig;
use acscent_archive::dashboard::DashboardSummary;
use acscent_archive::generator::Synthesizer;
use acscent_archive::persistence::{
    append_responses, default_file_name, load_or_generate, parse_columns, regenerate, save_responses,
    write_csv, CsvColumn,
};
use acscent_archive::session::KioskSession;
use acscent_archive::survey::AgeGroup;

#[derive(Parser, Debug)]
#[command(name = "acscent_archive")]
#[command(about = "Generate and inspect the AC'SCENT exhibition survey archive")]
struct Args {
    /// JSON config file (seed, operating window, time zone, opening hours)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Random seed (overrides the config file; default 12345)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Directory holding a fragrances.json that replaces the built-in catalog
    #[arg(long)]
    catalog_dir: Option<PathBuf>,

    /// Response store: loaded if it has responses, otherwise generated and saved
    #[arg(long)]
    store: Option<PathBuf>,

    /// Wipe the store and fill it with a freshly generated archive
    #[arg(long, requires = "store")]
    regenerate: bool,

    /// Append a kiosk session (JSON file) to the store as new records
    #[arg(long, requires = "store", conflicts_with = "regenerate")]
    submit: Option<PathBuf>,

    /// Write the responses as a JSON array
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Export the responses to CSV (a directory gets the dated default name)
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Comma-separated CSV columns (default: all)
    #[arg(long)]
    columns: Option<String>,

    /// Restrict the summary to one age group (10대, 20대, 30대, 40대, 50대 이상)
    #[arg(long)]
    age_group: Option<AgeGroup>,

    /// Print the dashboard summary
    #[arg(long)]
    summary: bool,

    /// Check the archive's integrity and fail on violations
    #[arg(long)]
    audit: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut config = match &args.config {
        Some(path) => ArchiveConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ArchiveConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    let catalog = match &args.catalog_dir {
        Some(dir) => Catalog::load_from(dir)
            .with_context(|| format!("loading catalog from {}", dir.display()))?,
        None => Catalog::defaults(),
    };

    if let (Some(session_path), Some(store)) = (&args.submit, &args.store) {
        let session = KioskSession::load(session_path)
            .with_context(|| format!("reading kiosk session {}", session_path.display()))?;
        let records = session.to_responses(&catalog, Utc::now().timestamp_millis())?;
        let stored = append_responses(&records, store)?;
        info!(added = records.len(), stored, "submitted kiosk session");
    }

    let mut synthesizer = Synthesizer::new(config, catalog)?;
    let responses = match &args.store {
        Some(path) if args.regenerate => regenerate(path, &mut synthesizer)?,
        Some(path) => load_or_generate(path, &mut synthesizer)?,
        None => synthesizer.generate()?,
    };
    info!(count = responses.len(), "archive ready");

    let config = synthesizer.config();
    let catalog = synthesizer.catalog();
    let offset = config.offset()?;

    if let Some(path) = &args.output {
        save_responses(&responses, path)?;
    }

    if let Some(path) = &args.csv {
        let columns = match &args.columns {
            Some(list) => parse_columns(list)?,
            None => CsvColumn::ALL.to_vec(),
        };
        let path = if path.is_dir() {
            path.join(default_file_name(Utc::now().with_timezone(&offset).date_naive()))
        } else {
            path.clone()
        };
        write_csv(&responses, catalog, &columns, &offset, &path)?;
        info!(path = %path.display(), columns = columns.len(), "exported CSV");
    }

    if args.regenerate {
        println!("{}", DashboardSummary::compute(&responses, catalog, None).overview());
    }

    if args.summary {
        let summary = DashboardSummary::compute(&responses, catalog, args.age_group);
        println!("{}", summary.report());
    }

    if args.audit {
        let report = audit(&responses, catalog, config)?;
        println!("{}", report.report());
        if !report.is_clean() {
            bail!("archive failed audit with {} violations", report.violations.len());
        }
    }

    Ok(())
}
