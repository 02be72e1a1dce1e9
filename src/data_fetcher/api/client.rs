//! ESPN scoreboard client

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::instrument;

use super::fetch_utils::fetch;
use super::http_client::create_http_client_with_timeout;
use super::rate_limit::RequestThrottle;
use super::urls::{build_game_url, build_scoreboard_url, build_teams_url};
use crate::config::Config;
use crate::constants::TEAMS_REQUEST_LIMIT;
use crate::data_fetcher::cache::clear_http_response_cache;
use crate::data_fetcher::models::{EspnEvent, ScoreboardResponse, TeamsResponse};
use crate::data_fetcher::source::ScoreboardSource;
use crate::error::AppError;

/// `ScoreboardSource` backed by the public ESPN site API
#[derive(Debug)]
pub struct EspnClient {
    client: Client,
    api_domain: String,
    throttle: RequestThrottle,
}

impl EspnClient {
    pub fn new(
        api_domain: impl Into<String>,
        timeout_seconds: u64,
        min_request_interval: Duration,
    ) -> Result<Self, AppError> {
        Ok(Self {
            client: create_http_client_with_timeout(timeout_seconds)?,
            api_domain: api_domain.into(),
            throttle: RequestThrottle::new(min_request_interval),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        Self::new(
            config.api_domain.clone(),
            config.http_timeout_seconds,
            Duration::from_millis(config.min_request_interval_ms),
        )
    }

    pub fn api_domain(&self) -> &str {
        &self.api_domain
    }

    /// One event by id, shaped like an entry of the scoreboard `events` list.
    /// Cached and throttled like scoreboard requests.
    #[instrument(skip(self))]
    pub async fn fetch_game_summary(
        &self,
        sport: &str,
        league: &str,
        game_id: &str,
    ) -> Result<EspnEvent, AppError> {
        let url = build_game_url(&self.api_domain, sport, league, game_id);
        fetch(&self.client, &self.throttle, &url).await
    }

    /// All teams of a league
    #[instrument(skip(self))]
    pub async fn fetch_teams(&self, sport: &str, league: &str) -> Result<TeamsResponse, AppError> {
        let url = build_teams_url(&self.api_domain, sport, league, TEAMS_REQUEST_LIMIT);
        fetch(&self.client, &self.throttle, &url).await
    }
}

#[async_trait]
impl ScoreboardSource for EspnClient {
    #[instrument(skip(self))]
    async fn fetch_scoreboard(
        &self,
        sport: &str,
        league: &str,
        date: &str,
    ) -> Result<ScoreboardResponse, AppError> {
        let url = build_scoreboard_url(&self.api_domain, sport, league, date);
        fetch(&self.client, &self.throttle, &url).await
    }

    async fn clear_cache(&self) {
        clear_http_response_cache().await;
    }
}
