//! pagodo: passive Google dork reconnaissance
//!
//! This is the main entry point for the command line tool.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use pagodo_rs::{
    config::{self, Overrides, Settings},
    engines::ConnectorLoader,
    ghdb::{self, GhdbScraper, SaveOptions},
    logging,
    network::{ClientSettings, HttpClient},
    results::FileSink,
    search::{DorkList, DorkSearch, RunOptions},
    SearchError,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Timeout for the GHDB listing request
const GHDB_TIMEOUT: Duration = Duration::from_secs(10);

/// pagodo - Passive Google Dork
#[derive(Parser)]
#[command(name = "pagodo")]
#[command(version)]
#[command(about = "Passive Google dork reconnaissance through search APIs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Configuration file (default ~/.config/pagodo.yml)
    #[arg(long, global = true, env = config::CONFIG_PATH_ENV)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Perform Google dork searches
    Scan(ScanArgs),
    /// Retrieve Google Hacking Database dorks
    Scrape(ScrapeArgs),
    /// List available dork categories
    ListCategories,
    /// Initialize the configuration file
    Init,
}

#[derive(Args)]
struct ScanArgs {
    /// File containing Google dorks, 1 per line
    #[arg(short = 'g', long)]
    google_dorks_file: Option<PathBuf>,

    /// Domain to scope the Google dork searches
    #[arg(short, long)]
    domain: Option<String>,

    /// Minimum delay (in seconds) between Google dork searches
    #[arg(short = 'i', long)]
    minimum_delay: Option<f64>,

    /// Maximum delay (in seconds) between Google dork searches
    #[arg(short = 'x', long)]
    maximum_delay: Option<f64>,

    /// Disable SSL/TLS validation
    #[arg(short = 'l', long)]
    disable_ssl_verification: bool,

    /// Maximum results to return per dork
    #[arg(short, long = "max-urls")]
    max_urls: Option<usize>,

    /// Save URL dork data to this JSON file
    #[arg(short = 'o', long = "json-file")]
    json_file: Option<PathBuf>,

    /// Save URL dork data to this text file
    #[arg(short = 's', long = "text-file")]
    text_file: Option<PathBuf>,

    /// Verbosity level (0=off, 1-2=error, 3=warning, 4=info, 5=debug)
    #[arg(short, long)]
    verbosity: Option<u8>,

    /// Save log data to a specific log file
    #[arg(short = 'z', long = "log")]
    log: Option<PathBuf>,

    /// Country code to use for the Google search results
    #[arg(short, long)]
    country_code: Option<String>,

    /// Maximum results to return per search request (max 100)
    #[arg(short = 'n', long)]
    max_results_per_search: Option<usize>,

    /// API key for the selected engine
    #[arg(long)]
    api_key: Option<String>,

    /// Search engine connector to use: serper or serpapi
    #[arg(long)]
    engine: Option<String>,

    /// Number of workers
    #[arg(short = 'w', long = "workers")]
    workers: Option<usize>,
}

impl ScanArgs {
    fn into_overrides(self) -> Overrides {
        Overrides {
            google_dorks_file: self.google_dorks_file,
            domain: self.domain,
            minimum_delay: self.minimum_delay,
            maximum_delay: self.maximum_delay,
            disable_ssl_verification: self.disable_ssl_verification.then_some(true),
            max_urls: self.max_urls,
            verbosity: self.verbosity,
            specific_log_file_name: self.log,
            country_code: self.country_code,
            max_results_per_search: self.max_results_per_search,
            engine: self.engine,
            api_key: self.api_key,
            max_workers: self.workers,
            json_results_file: self.json_file,
            text_results_file: self.text_file,
        }
    }
}

#[derive(Args)]
struct ScrapeArgs {
    /// Save GHDB json response to all_google_dorks.json
    #[arg(short = 'j', long = "json")]
    json: bool,

    /// Save all the Google dorks to all_google_dorks.txt
    #[arg(short = 's', long = "txt")]
    txt: bool,

    /// Write the individual dork categories to separate files
    #[arg(short = 'i', long)]
    individual: bool,

    /// Directory to save dork files in
    #[arg(long)]
    dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Creates the config file on first run
    let loaded = config::load(cli.config)?;
    if loaded.created {
        println!(
            "Created default configuration file at {}",
            loaded.path.display()
        );
    }

    match cli.command {
        Command::Scan(args) => scan(loaded.settings, args).await,
        Command::Scrape(args) => scrape(loaded.settings, args).await,
        Command::ListCategories => {
            println!("{}", ghdb::categories_json()?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Init => {
            if !loaded.created {
                println!(
                    "Configuration file already exists at {}",
                    loaded.path.display()
                );
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn scan(mut settings: Settings, args: ScanArgs) -> Result<ExitCode> {
    settings.merge(args.into_overrides());
    let options = RunOptions::from_settings(&settings)?;

    let log = logging::init(
        settings.verbosity,
        settings.specific_log_file_name.as_deref(),
    )?;
    info!("Starting pagodo v{}", pagodo_rs::VERSION);
    if let Some(path) = log.path() {
        info!("Logging to file: {}", path.display());
    }
    if !options.verify_ssl {
        warn!("SSL/TLS certificate verification is disabled");
    }

    let client = HttpClient::with_settings(&ClientSettings {
        timeout: Duration::from_secs_f64(settings.request_timeout),
        verify_ssl: options.verify_ssl,
    })?;
    let connector = ConnectorLoader::load(&settings, Arc::new(client))?;

    let dorks = DorkList::from_file(&settings.google_dorks_file)?;
    info!(
        "Loaded {} dorks from {}",
        dorks.len(),
        settings.google_dorks_file.display()
    );

    let sink = FileSink::with_defaults(
        settings.text_results_file.clone(),
        settings.json_results_file.clone(),
    );
    info!("Saving URL results to text file: {}", sink.text_path().display());
    info!("Saving dork results to JSON file: {}", sink.json_path().display());

    let mut search = DorkSearch::new(connector, Box::new(sink), options)?;

    match search.run_until(&dorks, shutdown_signal()).await {
        Ok(_) => Ok(ExitCode::SUCCESS),
        Err(SearchError::Cancelled) => Ok(ExitCode::from(130)),
        Err(e) => Err(e.into()),
    }
}

async fn scrape(settings: Settings, args: ScrapeArgs) -> Result<ExitCode> {
    let _log = logging::init(
        settings.verbosity,
        settings.specific_log_file_name.as_deref(),
    )?;

    let dorks_dir = args.dir.unwrap_or(settings.dorks_dir);
    let scraper = GhdbScraper::new(GHDB_TIMEOUT)?;
    let database = scraper.fetch_dork_database().await?;

    database.save(
        &dorks_dir,
        SaveOptions {
            json: args.json,
            text: args.txt,
            categories: args.individual,
        },
    )?;

    Ok(ExitCode::SUCCESS)
}

/// Resolves on Ctrl-C; never resolves if the handler can't be installed
async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}
