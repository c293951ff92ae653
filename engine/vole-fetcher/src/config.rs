use anyhow::{bail, Context, Result};
use chrono_tz::Tz;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;

/// Configuration for the fixtures sync
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// VOLE league identifier
    pub league_id: u32,

    /// Dataset file read and rewritten by the sync
    pub data_file: PathBuf,

    /// Zone fixture times are displayed in
    pub timezone: Tz,

    /// Highest round number probed
    pub max_rounds: u32,

    /// Consecutive empty rounds that end probing once any round had games
    pub empty_round_limit: u32,

    /// Raise log verbosity to DEBUG
    pub debug: bool,

    /// Team display name used when the dataset has none
    pub team_name: String,

    /// Site root, e.g. `https://vole.one.co.il`
    pub base_url: String,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

/// Raw environment values, named after their variables
#[derive(Debug, Deserialize)]
struct EnvSettings {
    vole_league_id: u32,
    data_file: String,
    tz: String,
    max_rounds: u32,
    empty_round_limit: u32,
    debug: bool,
    team_name: String,
    vole_base_url: String,
    request_timeout_secs: u64,
}

const DEFAULTS: &[(&str, &str)] = &[
    ("vole_league_id", "1276"),
    ("data_file", "data.json"),
    ("tz", "Asia/Jerusalem"),
    ("max_rounds", "60"),
    ("empty_round_limit", "6"),
    ("debug", "false"),
    ("team_name", "הפ׳ גליל עליון"),
    ("vole_base_url", "https://vole.one.co.il"),
    ("request_timeout_secs", "25"),
];

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            league_id: 1276,
            data_file: PathBuf::from("data.json"),
            timezone: chrono_tz::Asia::Jerusalem,
            max_rounds: 60,
            empty_round_limit: 6,
            debug: false,
            team_name: "הפ׳ גליל עליון".to_string(),
            base_url: "https://vole.one.co.il".to_string(),
            request_timeout_secs: 25,
        }
    }
}

impl FetcherConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::load(None)
    }

    /// Load configuration from an explicit variable map instead of the process environment
    pub fn from_env_map(vars: HashMap<String, String>) -> Result<Self> {
        Self::load(Some(vars))
    }

    fn load(vars: Option<HashMap<String, String>>) -> Result<Self> {
        let mut builder = config::Config::builder();
        for (key, value) in DEFAULTS {
            builder = builder.set_default(*key, *value).context("Failed to set config default")?;
        }

        let settings: EnvSettings = builder
            .add_source(config::Environment::default().try_parsing(true).source(vars))
            .build()
            .context("Failed to read configuration from environment")?
            .try_deserialize()
            .context("Invalid configuration value")?;

        let timezone: Tz = settings
            .tz
            .parse()
            .map_err(|e| anyhow::anyhow!("Unknown timezone {:?}: {}", settings.tz, e))?;

        let config = Self {
            league_id: settings.vole_league_id,
            data_file: PathBuf::from(settings.data_file),
            timezone,
            max_rounds: settings.max_rounds,
            empty_round_limit: settings.empty_round_limit,
            debug: settings.debug,
            team_name: settings.team_name,
            base_url: settings.vole_base_url,
            request_timeout_secs: settings.request_timeout_secs,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.data_file.as_os_str().is_empty() {
            bail!("DATA_FILE must not be empty");
        }

        if self.max_rounds == 0 {
            bail!("MAX_ROUNDS must be greater than 0");
        }

        if self.empty_round_limit == 0 {
            bail!("EMPTY_ROUND_LIMIT must be greater than 0");
        }

        if self.request_timeout_secs == 0 {
            bail!("REQUEST_TIMEOUT_SECS must be greater than 0");
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            bail!("VOLE_BASE_URL must be an http(s) URL, got {:?}", self.base_url);
        }

        Ok(())
    }

    /// Rounds endpoint URL for one round of the configured league
    pub fn rounds_url(&self, round: u32) -> String {
        format!(
            "{}/api/leagues/rounds?league_id={}&round={}",
            self.base_url.trim_end_matches('/'),
            self.league_id,
            round
        )
    }

    /// Site origin sent as `Origin`
    pub fn origin(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}
