use anyhow::Context;
use tracing::{error, info};
use vole_fetcher::{FetcherConfig, GameParser, VoleFetcher};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let round: u32 = std::env::args()
        .nth(1)
        .context("usage: probe-round <round>")?
        .parse()
        .context("round must be a non-negative integer")?;

    // Load configuration
    let config = FetcherConfig::from_env()?;
    info!("Probing round {} of league {}", round, config.league_id);

    let fetcher = VoleFetcher::new(config.clone())?;
    let payload = match fetcher.try_fetch_round(round).await {
        Ok(payload) => payload,
        Err(e) => {
            error!("❌ Failed to fetch round {}: {:#}", round, e);
            return Err(e);
        }
    };

    let matches = GameParser::default().parse(&payload, config.timezone);
    info!("✅ Parsed {} matches", matches.len());

    for m in &matches {
        let score = match m.score() {
            Some((home, away)) => format!("{home}:{away}"),
            None => "-".to_string(),
        };
        println!("{} {}  {} - {}  {}  [{}]", m.date, m.time, m.home, m.away, score, m.id);
    }

    Ok(())
}
