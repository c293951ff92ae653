use crate::config::FetcherConfig;
use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ORIGIN, REFERER, USER_AGENT};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration as StdDuration;
use tracing::debug;

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Source of per-round fixture payloads
#[async_trait::async_trait]
pub trait RoundSource: Send + Sync {
    /// Payload for one round, or `None` when the round is unavailable
    async fn fetch_round(&self, round: u32) -> Option<Value>;
}

/// HTTP client for the VOLE rounds endpoint
pub struct VoleFetcher {
    config: FetcherConfig,
    client: Client,
}

impl VoleFetcher {
    /// Create a new fetcher instance
    pub fn new(config: FetcherConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json, text/plain, */*"));

        let origin = config.origin().to_string();
        headers.insert(
            REFERER,
            HeaderValue::from_str(&format!("{origin}/")).context("Invalid VOLE_BASE_URL for Referer")?,
        );
        headers.insert(ORIGIN, HeaderValue::from_str(&origin).context("Invalid VOLE_BASE_URL for Origin")?);

        let client = Client::builder()
            .timeout(StdDuration::from_secs(config.request_timeout_secs))
            .default_headers(headers)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { config, client })
    }

    /// Fetch one round, reporting why it failed
    pub async fn try_fetch_round(&self, round: u32) -> Result<Value> {
        let url = self.config.rounds_url(round);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("GET failed {url}"))?;

        if response.status() != reqwest::StatusCode::OK {
            anyhow::bail!("GET {} status={}", url, response.status());
        }

        response.json::<Value>().await.with_context(|| format!("JSON parse failed {url}"))
    }

    pub fn config(&self) -> &FetcherConfig {
        &self.config
    }
}

#[async_trait::async_trait]
impl RoundSource for VoleFetcher {
    async fn fetch_round(&self, round: u32) -> Option<Value> {
        match self.try_fetch_round(round).await {
            Ok(payload) => Some(payload),
            Err(e) => {
                debug!("Round {} unavailable: {:#}", round, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetcher_builds_with_default_config() {
        let fetcher = VoleFetcher::new(FetcherConfig::default()).unwrap();
        assert_eq!(fetcher.config().league_id, 1276);
    }

    #[tokio::test]
    async fn test_unreachable_host_is_an_empty_round() {
        let config = FetcherConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            request_timeout_secs: 2,
            ..FetcherConfig::default()
        };
        let fetcher = VoleFetcher::new(config).unwrap();

        assert!(fetcher.fetch_round(1).await.is_none());
    }
}
