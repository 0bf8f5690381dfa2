//! Client for the upstream fantasy API.
//!
//! `FplApi` is the read-only data source the rest of the crate depends on;
//! `FplService` is the reqwest implementation with TTL caches and
//! exponential backoff on retryable failures.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, error, info, warn};

use crate::config::FplConfig;
use crate::error::FetchError;
use crate::models::fpl::{
    BootstrapStatic, ElementSummary, Fixture, LeagueStandings, LiveEvent, ManagerHistory,
    ManagerPicks, TransferEvent,
};

#[async_trait]
pub trait FplApi: Send + Sync {
    async fn bootstrap_static(&self) -> Result<Arc<BootstrapStatic>, FetchError>;
    async fn league_standings(&self, league_id: i32) -> Result<Arc<LeagueStandings>, FetchError>;
    async fn manager_history(&self, entry: i32) -> Result<ManagerHistory, FetchError>;
    async fn picks(&self, entry: i32, gameweek: i32) -> Result<ManagerPicks, FetchError>;
    async fn transfers(&self, entry: i32) -> Result<Vec<TransferEvent>, FetchError>;
    async fn live_event(&self, gameweek: i32) -> Result<Arc<LiveEvent>, FetchError>;
    async fn fixtures(&self, gameweek: i32) -> Result<Arc<Vec<Fixture>>, FetchError>;
    async fn element_summary(&self, element: i32) -> Result<ElementSummary, FetchError>;
}

/// Backoff settings for upstream calls
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

// Upper bound on a single backoff sleep
const MAX_RETRY_DELAY: Duration = Duration::from_secs(60);

impl RetryPolicy {
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.base_delay
            .checked_mul(factor)
            .unwrap_or(MAX_RETRY_DELAY)
            .min(MAX_RETRY_DELAY)
    }
}

/// Run `f` until it succeeds, fails permanently, or the attempt budget runs out.
///
/// Only errors classified retryable by [`FetchError::is_retryable`] are retried;
/// the delay doubles after each failed attempt.
pub async fn retry_with_backoff<T, F, Fut>(
    policy: RetryPolicy,
    url: &str,
    mut f: F,
) -> Result<T, FetchError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;
        match f().await {
            Ok(value) => return Ok(value),
            Err(e) if !e.is_retryable() => return Err(e),
            Err(e) if attempt >= max_attempts => {
                error!(
                    url = %url,
                    attempts = attempt,
                    error = %e,
                    "Upstream retry budget exhausted"
                );
                return Err(FetchError::RetriesExhausted {
                    url: url.to_string(),
                    attempts: attempt,
                    last: Box::new(e),
                });
            }
            Err(e) => {
                let delay = policy.delay_for(attempt);
                warn!(
                    url = %url,
                    attempt = attempt,
                    max_attempts = max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "Upstream call failed, retrying..."
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}

#[derive(Clone)]
pub struct FplService {
    client: Client,
    base_url: String,
    retry: RetryPolicy,
    bootstrap_cache: Arc<Cache<String, Arc<BootstrapStatic>>>,
    league_cache: Arc<Cache<i32, Arc<LeagueStandings>>>,
    live_cache: Arc<Cache<i32, Arc<LiveEvent>>>,
    fixtures_cache: Arc<Cache<i32, Arc<Vec<Fixture>>>>,
}

const BOOTSTRAP_CACHE_KEY: &str = "bootstrap-static";

fn build_cache<K, V>(capacity: u64, ttl: Duration) -> Cache<K, V>
where
    K: std::hash::Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    Cache::builder()
        .max_capacity(capacity)
        .time_to_live(ttl)
        .build()
}

impl FplService {
    pub fn new(config: &FplConfig) -> Result<Self, FetchError> {
        let client = Client::builder().timeout(config.request_timeout).build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            retry: RetryPolicy {
                max_attempts: config.max_retries,
                base_delay: config.retry_base_delay,
            },
            bootstrap_cache: Arc::new(build_cache(1, config.static_cache_ttl)),
            league_cache: Arc::new(build_cache(100, config.static_cache_ttl)),
            live_cache: Arc::new(build_cache(4, config.live_cache_ttl)),
            fixtures_cache: Arc::new(build_cache(4, config.live_cache_ttl)),
        })
    }

    /// GET `{base_url}/{path}` and decode the body, retrying per policy
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        debug!(url = %url, "Fetching from fantasy API");

        let client = &self.client;
        let target = &url;
        retry_with_backoff(self.retry, &url, || async move {
            let response = client
                .get(target)
                .header("accept", "application/json")
                .send()
                .await?;

            let status = response.status();
            let body = response.text().await?;

            if !status.is_success() {
                return Err(FetchError::Status {
                    url: target.clone(),
                    status: status.as_u16(),
                    body,
                });
            }

            serde_json::from_str(&body).map_err(|source| FetchError::Decode {
                url: target.clone(),
                source,
            })
        })
        .await
    }
}

#[async_trait]
impl FplApi for FplService {
    async fn bootstrap_static(&self) -> Result<Arc<BootstrapStatic>, FetchError> {
        if let Some(cached) = self.bootstrap_cache.get(BOOTSTRAP_CACHE_KEY).await {
            debug!("Cache hit for bootstrap-static");
            return Ok(cached);
        }

        let data: Arc<BootstrapStatic> = Arc::new(self.get_json("bootstrap-static/").await?);
        info!(
            players = data.elements.len(),
            teams = data.teams.len(),
            current_gameweek = data.current_gameweek(),
            "Fetched bootstrap-static"
        );
        self.bootstrap_cache
            .insert(BOOTSTRAP_CACHE_KEY.to_string(), data.clone())
            .await;
        Ok(data)
    }

    async fn league_standings(&self, league_id: i32) -> Result<Arc<LeagueStandings>, FetchError> {
        if let Some(cached) = self.league_cache.get(&league_id).await {
            return Ok(cached);
        }

        let data: Arc<LeagueStandings> = Arc::new(
            self.get_json(&format!("leagues-classic/{}/standings/", league_id))
                .await?,
        );
        info!(
            league_id = league_id,
            managers = data.standings.results.len(),
            "Fetched league standings"
        );
        self.league_cache.insert(league_id, data.clone()).await;
        Ok(data)
    }

    async fn manager_history(&self, entry: i32) -> Result<ManagerHistory, FetchError> {
        self.get_json(&format!("entry/{}/history/", entry)).await
    }

    async fn picks(&self, entry: i32, gameweek: i32) -> Result<ManagerPicks, FetchError> {
        self.get_json(&format!("entry/{}/event/{}/picks/", entry, gameweek))
            .await
    }

    async fn transfers(&self, entry: i32) -> Result<Vec<TransferEvent>, FetchError> {
        self.get_json(&format!("entry/{}/transfers/", entry)).await
    }

    async fn live_event(&self, gameweek: i32) -> Result<Arc<LiveEvent>, FetchError> {
        if let Some(cached) = self.live_cache.get(&gameweek).await {
            return Ok(cached);
        }

        let data: Arc<LiveEvent> =
            Arc::new(self.get_json(&format!("event/{}/live/", gameweek)).await?);
        debug!(
            gameweek = gameweek,
            players = data.elements.len(),
            "Fetched live event data"
        );
        self.live_cache.insert(gameweek, data.clone()).await;
        Ok(data)
    }

    async fn fixtures(&self, gameweek: i32) -> Result<Arc<Vec<Fixture>>, FetchError> {
        if let Some(cached) = self.fixtures_cache.get(&gameweek).await {
            return Ok(cached);
        }

        let data: Arc<Vec<Fixture>> =
            Arc::new(self.get_json(&format!("fixtures/?event={}", gameweek)).await?);
        debug!(gameweek = gameweek, fixtures = data.len(), "Fetched fixtures");
        self.fixtures_cache.insert(gameweek, data.clone()).await;
        Ok(data)
    }

    async fn element_summary(&self, element: i32) -> Result<ElementSummary, FetchError> {
        self.get_json(&format!("element-summary/{}/", element)).await
    }
}
