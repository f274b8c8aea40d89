use clap::Parser;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use wa_analysis::Analyzer;
use wa_core::{ArticleStorage, Error, Result};
use wa_harvest::fetcher::DEFAULT_FETCH_TIMEOUT;
use wa_harvest::logging::init_logging;
use wa_harvest::queue::DEFAULT_WORKERS;
use wa_harvest::scheduler::IntervalTicker;
use wa_harvest::{
    handle_command, ContentFetcher, HarvestArgs, HarvestPipeline, HarvestScheduler, Harvester,
    HttpContentFetcher, SyntheticSource, TaskQueue,
};
use wa_web::{create_app, AppState};

/// A duration such as `90`, `30m`, `1d` or `1h15m30s`. Bare numbers are seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
struct HumanDuration(Duration);

impl FromStr for HumanDuration {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut total_seconds = 0u64;
        let mut digits = String::new();
        let mut seen_number = false;

        for c in s.trim().chars() {
            if c.is_ascii_digit() {
                digits.push(c);
                continue;
            }
            let num: u64 = digits
                .parse()
                .map_err(|_| format!("Expected a number before '{}'", c))?;
            let unit = match c {
                's' => 1,
                'm' => 60,
                'h' => 3600,
                'd' => 86400,
                _ => return Err(format!("Invalid duration unit: {}", c)),
            };
            total_seconds = num
                .checked_mul(unit)
                .and_then(|secs| total_seconds.checked_add(secs))
                .ok_or_else(|| "Duration is too large".to_string())?;
            digits.clear();
            seen_number = true;
        }

        if !digits.is_empty() {
            let secs = digits
                .parse::<u64>()
                .map_err(|_| "Invalid number in duration".to_string())?;
            total_seconds = total_seconds
                .checked_add(secs)
                .ok_or_else(|| "Duration is too large".to_string())?;
            seen_number = true;
        }

        if !seen_number {
            return Err("Duration must include a number".to_string());
        }
        if total_seconds == 0 {
            return Err("Duration must be greater than zero".to_string());
        }

        Ok(HumanDuration(Duration::from_secs(total_seconds)))
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    config: Config,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args, Debug)]
struct Config {
    /// Storage backend: memory or sqlite
    #[arg(long, env = "WA_STORAGE", default_value = "memory")]
    storage: String,
    /// SQLite database path
    #[arg(long, env = "WA_DATABASE_URL")]
    database_url: Option<String>,
    /// Harvest worker tasks
    #[arg(long, env = "WA_WORKERS", default_value_t = DEFAULT_WORKERS)]
    workers: usize,
    /// Timeout for full-text fetches (e.g. 10s)
    #[arg(long, env = "WA_FETCH_TIMEOUT")]
    fetch_timeout: Option<HumanDuration>,
    /// Fetch and store the full text of every harvested article
    #[arg(long, env = "WA_ENRICH")]
    enrich: bool,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Serve the HTTP API and run the periodic harvest
    Serve {
        #[arg(long, env = "WA_BIND", default_value = "0.0.0.0:5000")]
        bind: String,
        /// Interval between scheduled harvests (e.g. 1h, 30m, 1h15m30s)
        #[arg(long, env = "WA_HARVEST_INTERVAL", default_value = "1h")]
        interval: HumanDuration,
    },
    /// Run one harvest and print how many articles were stored
    Harvest(HarvestArgs),
    /// Score a title and body and print the result as JSON
    Analyze {
        #[arg(long, default_value = "")]
        title: String,
        #[arg(long, default_value = "")]
        content: String,
    },
}

/// Confirms the backend answers within `timeout`, retrying a few times.
async fn check_storage_with_retry(
    storage: &Arc<dyn ArticleStorage>,
    kind: &str,
    max_retries: u32,
    timeout: Duration,
) -> Result<()> {
    let mut last_error = None;

    for attempt in 1..=max_retries {
        match tokio::time::timeout(timeout, storage.count_articles()).await {
            Ok(Ok(count)) => {
                info!(backend = kind, articles = count, "Storage backend initialized");
                return Ok(());
            }
            Ok(Err(e)) => last_error = Some(e),
            Err(_) => last_error = Some(Error::Storage("Storage health check timed out".to_string())),
        }
        if attempt < max_retries {
            warn!(attempt, max_retries, "Storage health check failed, retrying");
            tokio::time::sleep(Duration::from_secs(2)).await;
        }
    }

    Err(last_error.unwrap_or_else(|| Error::Storage("Storage health check failed".to_string())))
}

/// Storage, fetcher and queue shared by the harvesting subcommands.
struct Services {
    storage: Arc<dyn ArticleStorage>,
    fetcher: Arc<dyn ContentFetcher>,
    queue: TaskQueue,
}

impl Services {
    async fn build(config: &Config) -> Result<Self> {
        let storage = wa_storage::create_storage(&config.storage, config.database_url.as_deref()).await?;
        check_storage_with_retry(&storage, &config.storage, 3, Duration::from_secs(10)).await?;

        let timeout = config.fetch_timeout.map(|t| t.0).unwrap_or(DEFAULT_FETCH_TIMEOUT);
        let fetcher: Arc<dyn ContentFetcher> = Arc::new(HttpContentFetcher::new(timeout)?);

        let mut harvester = Harvester::new(Arc::new(SyntheticSource::default()));
        if config.enrich {
            info!("Harvest enrichment enabled");
            harvester = harvester.with_enrichment(fetcher.clone());
        }
        let pipeline = HarvestPipeline::new(harvester, storage.clone());
        let queue = TaskQueue::start(Arc::new(pipeline), config.workers);

        Ok(Self {
            storage,
            fetcher,
            queue,
        })
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging("info");
    let Cli { config, command } = Cli::parse();

    match command {
        Commands::Analyze { title, content } => {
            if title.is_empty() && content.is_empty() {
                return Err(Error::Validation("Title or content is required".to_string()));
            }
            let analysis = Analyzer::new().analyze(&title, &content);
            println!("{}", serde_json::to_string_pretty(&analysis)?);
        }
        Commands::Harvest(args) => {
            let services = Services::build(&config).await?;
            let job = handle_command(args, &services.queue).await?;
            match job.error {
                Some(e) => return Err(Error::Harvest(e)),
                None => println!("Stored {} articles", job.count.unwrap_or(0)),
            }
        }
        Commands::Serve { bind, interval } => {
            let Services {
                storage,
                fetcher,
                queue,
            } = Services::build(&config).await?;

            let scheduler = HarvestScheduler::new(queue.clone(), IntervalTicker::new(interval.0)).spawn();
            info!(every_secs = interval.0.as_secs(), "Periodic harvest scheduled");

            let app = create_app(AppState::new(storage, fetcher, queue));
            let listener = tokio::net::TcpListener::bind(&bind).await?;
            info!(%bind, "HTTP server listening");
            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            scheduler.stop().await;
        }
    }

    Ok(())
}
