use persistence::create_local_store;
use tracing::{error, info, Level};
use vole_fetcher::{FetcherConfig, LeagueSync, VoleFetcher};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = FetcherConfig::from_env()?;

    // Initialize logging; stdout is reserved for status lines
    let level = if config.debug { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt().with_max_level(level).with_writer(std::io::stderr).init();

    info!("Starting VOLE fixtures sync");
    info!("Loaded configuration: {:?}", config);

    let fetcher = VoleFetcher::new(config.clone())?;
    let store = create_local_store(&config.data_file)?;
    let sync = LeagueSync::new(config, fetcher, store);

    let report = match sync.run().await {
        Ok(report) => report,
        Err(e) => {
            error!("Sync failed: {:#}", e);
            return Err(e);
        }
    };

    println!("{}", report.status_line());
    if let Some(warning) = report.warning() {
        println!("{warning}");
    }

    Ok(())
}
