use crate::config::FetcherConfig;
use crate::fetcher::RoundSource;
use crate::models::{SyncOutcome, SyncReport};
use crate::parser::GameParser;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use match_registry::{merge_matches, MatchRecord};
use persistence::DatasetStore;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, info};

/// Recorded as `standingsSource` when a run rewrites a dataset without one
pub const DEFAULT_STANDINGS_SOURCE: &str = "vole-api (rounds endpoint)";

/// `last_update` layout, in the configured timezone
pub const LAST_UPDATE_FORMAT: &str = "%Y-%m-%d %H:%M";

lazy_static! {
    static ref SYNTHETIC_ID: Regex = Regex::new(r"^M\d+$").expect("valid synthetic id pattern");
}

/// Matches gathered from the rounds endpoint
#[derive(Debug, Default)]
pub struct RoundHarvest {
    pub matches: Vec<MatchRecord>,
    pub rounds_probed: u32,
}

/// One-shot league sync: fetch every round, merge into the dataset, save on change
pub struct LeagueSync<S, D> {
    config: FetcherConfig,
    source: S,
    store: D,
    parser: GameParser,
}

impl<S: RoundSource, D: DatasetStore> LeagueSync<S, D> {
    /// Create a new sync
    pub fn new(config: FetcherConfig, source: S, store: D) -> Self {
        Self { config, source, store, parser: GameParser::default() }
    }

    /// Replace the game parser
    pub fn with_parser(mut self, parser: GameParser) -> Self {
        self.parser = parser;
        self
    }

    /// Probe rounds in order until the source runs dry.
    ///
    /// An unavailable round counts as empty. Probing stops after
    /// `empty_round_limit` consecutive empty rounds once any round had games,
    /// and never goes past `max_rounds`.
    pub async fn collect_rounds(&self) -> RoundHarvest {
        let mut harvest = RoundHarvest::default();
        let mut consecutive_empty = 0;
        let mut seen_any = false;

        for round in 1..=self.config.max_rounds {
            let mut matches = self.fetch_parsed(round, &mut harvest).await;

            // Some deployments number the first round 0
            if round == 1 && matches.is_empty() {
                let first = self.fetch_parsed(0, &mut harvest).await;
                if !first.is_empty() {
                    debug!("Round 1 empty, using {} matches from round 0", first.len());
                    matches = first;
                }
            }

            if matches.is_empty() {
                consecutive_empty += 1;
                if seen_any && consecutive_empty >= self.config.empty_round_limit {
                    debug!("Stopping after {} consecutive empty rounds at round {}", consecutive_empty, round);
                    break;
                }
                continue;
            }

            debug!("Round {}: {} matches", round, matches.len());
            seen_any = true;
            consecutive_empty = 0;
            harvest.matches.extend(matches);
        }

        harvest
    }

    async fn fetch_parsed(&self, round: u32, harvest: &mut RoundHarvest) -> Vec<MatchRecord> {
        harvest.rounds_probed += 1;
        match self.source.fetch_round(round).await {
            Some(payload) => self.parser.parse(&payload, self.config.timezone),
            None => Vec::new(),
        }
    }

    /// Run a complete fetch, merge and save cycle
    pub async fn run(&self) -> Result<SyncReport> {
        self.run_at(Utc::now()).await
    }

    /// [`LeagueSync::run`] with an explicit clock
    pub async fn run_at(&self, now: DateTime<Utc>) -> Result<SyncReport> {
        info!("Starting sync for league {}", self.config.league_id);

        let harvest = self.collect_rounds().await;
        info!("Fetched {} matches from {} rounds", harvest.matches.len(), harvest.rounds_probed);

        let mut dataset = self
            .store
            .load()
            .await
            .with_context(|| format!("Failed to load dataset from {}", self.store.location()))?;
        if dataset.team.is_empty() {
            dataset.team = self.config.team_name.clone();
        }

        let stored: Vec<Value> = dataset.matches.iter().filter(|m| !is_legacy_entry(m)).cloned().collect();
        let legacy_dropped = dataset.matches.len() - stored.len();
        if legacy_dropped > 0 {
            debug!("Dropped {} legacy entries before merging", legacy_dropped);
        }

        let existing: Vec<MatchRecord> = stored.iter().filter_map(MatchRecord::from_value).collect();
        let merged = merge_matches(&existing, &harvest.matches);
        let merged: Vec<Value> = merged.iter().map(MatchRecord::to_value).collect();

        let outcome = if merged == stored {
            SyncOutcome::Unchanged
        } else {
            let count = merged.len();
            dataset.matches = merged;
            dataset.last_update =
                now.with_timezone(&self.config.timezone).format(LAST_UPDATE_FORMAT).to_string();
            if dataset.standings_source.as_deref().map_or(true, str::is_empty) {
                dataset.standings_source = Some(DEFAULT_STANDINGS_SOURCE.to_string());
            }

            self.store
                .save(&dataset)
                .await
                .with_context(|| format!("Failed to save dataset to {}", self.store.location()))?;
            SyncOutcome::Updated { matches: count }
        };

        Ok(SyncReport {
            league_id: self.config.league_id,
            location: self.store.location(),
            rounds_probed: harvest.rounds_probed,
            fetched: harvest.matches.len(),
            legacy_dropped,
            outcome,
            timestamp: now,
        })
    }
}

/// Entries written by the old placeholder format: a numeric `round`, or a
/// synthetic `M<n>` id. Non-object entries are dropped as well.
pub fn is_legacy_entry(entry: &Value) -> bool {
    let Some(object) = entry.as_object() else {
        return true;
    };
    if object.get("round").map_or(false, Value::is_number) {
        return true;
    }
    let id = match object.get("id") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    };
    SYNTHETIC_ID.is_match(&id)
}
