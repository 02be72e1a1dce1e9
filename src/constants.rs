//! Application-wide constants and configuration values
//!
//! This module centralizes the scheduler's magic numbers so the refresh
//! policy can be read in one place.

/// Default ESPN site API root; sport and league are appended per request
pub const DEFAULT_API_DOMAIN: &str = "https://site.api.espn.com/apis/site/v2/sports";

/// Default timeout for HTTP requests in seconds
pub const DEFAULT_HTTP_TIMEOUT_SECONDS: u64 = 30;

/// Maximum number of connections per host in the HTTP client pool
pub const HTTP_POOL_MAX_IDLE_PER_HOST: usize = 16;

/// Minimum spacing between two outgoing scoreboard requests (milliseconds)
pub const DEFAULT_MIN_REQUEST_INTERVAL_MS: u64 = 2000;

/// `limit` query value for team list requests, large enough for every league
pub const TEAMS_REQUEST_LIMIT: u32 = 1000;

/// Capacity of the in-memory HTTP response cache
pub const HTTP_RESPONSE_CACHE_CAPACITY: usize = 100;

/// Default log file name inside the log directory
pub const LOG_FILE_NAME: &str = "nexus_scoreboard.log";

/// Refresh interval defaults and scheduling bounds, in seconds
pub mod refresh {
    /// Default refresh while a favorite team is playing
    pub const IN_PROGRESS_FAVORITE_TEAM_SECONDS: u64 = 30;

    /// Default refresh while any other game is live
    pub const IN_PROGRESS_OTHER_GAMES_SECONDS: u64 = 60;

    /// Default refresh before and after games
    pub const PRE_GAME_POST_GAME_SECONDS: u64 = 300;

    /// Default refresh when nothing is scheduled
    pub const NO_GAMES_SECONDS: u64 = 900;

    /// Default time of day (UTC) for the daily schedule re-discovery
    pub const DAILY_SCHEDULE_CHECK_TIME: &str = "05:00";

    /// Floor for every computed sleep, prevents busy looping
    pub const MIN_SLEEP_SECONDS: u64 = 30;

    /// Upcoming games closer than this poll at the pre/post game interval
    pub const PREGAME_NEAR_WINDOW_SECONDS: i64 = 300;

    /// Wake this long before a far-off game's start time
    pub const PREGAME_WAKE_LEAD_SECONDS: i64 = 60;

    /// Upper bound on sleep when a scheduled game should already have started
    pub const OVERDUE_PREGAME_MAX_SECONDS: u64 = 60;

    /// Fixed cooldown after a refresh cycle fails
    pub const ERROR_COOLDOWN_SECONDS: u64 = 30;
}

/// Cache TTL (Time To Live) values in seconds
pub mod cache_ttl {
    /// Scoreboards with at least one live game
    pub const LIVE_GAMES_SECONDS: u64 = 15;

    /// Scoreboards with games starting within the next few minutes
    pub const STARTING_GAMES_SECONDS: u64 = 30;

    /// Scoreboards with only scheduled or finished games
    pub const SCOREBOARD_SECONDS: u64 = 120;

    /// Team lists and any other ESPN endpoint
    pub const HTTP_RESPONSE_SECONDS: u64 = 300;
}

/// Environment variable names
pub mod env_vars {
    /// Environment variable for the config file location
    pub const CONFIG_PATH: &str = "NEXUS_SCOREBOARD_CONFIG";

    /// Environment variable for API domain override
    pub const API_DOMAIN: &str = "NEXUS_SCOREBOARD_API_DOMAIN";

    /// Environment variable for log file path override
    pub const LOG_FILE: &str = "NEXUS_SCOREBOARD_LOG_FILE";

    /// Environment variable for HTTP timeout override in seconds
    pub const HTTP_TIMEOUT: &str = "NEXUS_SCOREBOARD_HTTP_TIMEOUT";
}

/// Retry configuration
pub mod retry {
    /// Maximum number of retry attempts for API calls
    pub const MAX_ATTEMPTS: u32 = 3;

    /// Base delay for exponential backoff (milliseconds)
    pub const BASE_DELAY_MS: u64 = 250;

    /// Maximum delay between retries (seconds)
    pub const MAX_DELAY_SECONDS: u64 = 30;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ttl_constants_are_reasonable() {
        let live = cache_ttl::LIVE_GAMES_SECONDS;
        let starting = cache_ttl::STARTING_GAMES_SECONDS;
        let scoreboard = cache_ttl::SCOREBOARD_SECONDS;

        assert!(live <= starting);
        assert!(starting < scoreboard);
        // A cached live scoreboard must expire before the next live refresh
        assert!(live < refresh::IN_PROGRESS_FAVORITE_TEAM_SECONDS);
        assert!(cache_ttl::HTTP_RESPONSE_SECONDS > 0);
    }

    #[test]
    fn test_refresh_defaults_respect_floor() {
        assert!(refresh::IN_PROGRESS_FAVORITE_TEAM_SECONDS >= refresh::MIN_SLEEP_SECONDS);
        assert!(refresh::IN_PROGRESS_OTHER_GAMES_SECONDS >= refresh::MIN_SLEEP_SECONDS);
        assert!(refresh::PRE_GAME_POST_GAME_SECONDS >= refresh::MIN_SLEEP_SECONDS);
        assert!(refresh::NO_GAMES_SECONDS >= refresh::MIN_SLEEP_SECONDS);
        assert!(refresh::PREGAME_WAKE_LEAD_SECONDS < refresh::PREGAME_NEAR_WINDOW_SECONDS);
    }

    #[test]
    fn test_retry_constants_are_reasonable() {
        assert!(retry::MAX_ATTEMPTS > 0);
        assert!(retry::BASE_DELAY_MS > 0);
        assert!(retry::BASE_DELAY_MS < retry::MAX_DELAY_SECONDS * 1000);
    }

    #[test]
    fn test_env_var_names_share_prefix() {
        for name in [
            env_vars::CONFIG_PATH,
            env_vars::API_DOMAIN,
            env_vars::LOG_FILE,
            env_vars::HTTP_TIMEOUT,
        ] {
            assert!(name.starts_with("NEXUS_SCOREBOARD_"), "{name}");
        }
    }
}
