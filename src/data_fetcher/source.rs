use crate::data_fetcher::models::ScoreboardResponse;
use crate::error::AppError;
use async_trait::async_trait;

/// Anything that can deliver a raw scoreboard for one league and day.
///
/// Implementations own their caching and throttling. Errors are per call; the
/// refresh loop skips the league and carries on.
#[async_trait]
pub trait ScoreboardSource: Send + Sync {
    /// Fetches the scoreboard for `sport/league` on `date` (`YYYYMMDD`)
    async fn fetch_scoreboard(
        &self,
        sport: &str,
        league: &str,
        date: &str,
    ) -> Result<ScoreboardResponse, AppError>;

    /// Drops cached responses. Called before each daily full discovery.
    async fn clear_cache(&self) {}
}
