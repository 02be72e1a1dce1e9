use crate::constants::{self, env_vars};
use crate::data_fetcher::models::{FavoriteTeams, LeagueTarget};
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;

pub mod paths;
pub mod sections;
pub mod validation;

use paths::{get_config_path, get_log_dir_path};
pub use sections::{
    DisplayModeConfig, DisplaySettings, LeagueConfig, LoggingConfig, RefreshIntervals,
    SportConfig,
};
use validation::validate_config;

/// Configuration structure for the application.
/// Loaded once at startup and treated as read-only afterwards.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Scoreboard API root; `/{sport}/{league}/scoreboard` is appended.
    #[serde(default = "default_api_domain")]
    pub api_domain: String,
    /// Path to the log file. If not specified, logs will be written to a default location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file_path: Option<String>,
    /// HTTP timeout in seconds for API requests.
    #[serde(default = "default_http_timeout")]
    pub http_timeout_seconds: u64,
    /// Minimum spacing between two uncached requests.
    #[serde(default = "default_min_request_interval")]
    pub min_request_interval_ms: u64,
    /// Keep a failed league's previous games for the pass instead of dropping them.
    #[serde(default)]
    pub retain_last_known_good: bool,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub refresh_intervals: RefreshIntervals,
    #[serde(default)]
    pub display_settings: DisplaySettings,
    #[serde(default)]
    pub sports: BTreeMap<String, SportConfig>,
    #[serde(default)]
    pub display_modes: BTreeMap<String, DisplayModeConfig>,
}

fn default_api_domain() -> String {
    constants::DEFAULT_API_DOMAIN.to_string()
}

fn default_http_timeout() -> u64 {
    constants::DEFAULT_HTTP_TIMEOUT_SECONDS
}

fn default_min_request_interval() -> u64 {
    constants::DEFAULT_MIN_REQUEST_INTERVAL_MS
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_domain: default_api_domain(),
            log_file_path: None,
            http_timeout_seconds: default_http_timeout(),
            min_request_interval_ms: default_min_request_interval(),
            retain_last_known_good: false,
            logging: LoggingConfig::default(),
            refresh_intervals: RefreshIntervals::default(),
            display_settings: DisplaySettings::default(),
            sports: BTreeMap::new(),
            display_modes: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Loads configuration from `NEXUS_SCOREBOARD_CONFIG` or the default config
    /// file location, applies environment overrides and validates the result.
    ///
    /// # Environment Variables
    /// - `NEXUS_SCOREBOARD_CONFIG` - Config file location
    /// - `NEXUS_SCOREBOARD_API_DOMAIN` - Override API domain
    /// - `NEXUS_SCOREBOARD_LOG_FILE` - Override log file path
    /// - `NEXUS_SCOREBOARD_HTTP_TIMEOUT` - Override HTTP timeout in seconds
    ///
    /// # Errors
    /// * `AppError::Config` - The file does not exist or validation failed
    /// * `AppError::TomlDeserialize` - The file is not valid TOML for this schema
    pub async fn load() -> Result<Self, AppError> {
        let config_path = Self::resolve_config_path();

        if !Path::new(&config_path).exists() {
            return Err(AppError::config_error(format!(
                "Configuration file not found at {config_path}. Create it or point {} at one.",
                env_vars::CONFIG_PATH
            )));
        }

        let mut config = Self::load_from_path(&config_path).await?;
        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Config file location, honoring `NEXUS_SCOREBOARD_CONFIG`
    pub fn resolve_config_path() -> String {
        std::env::var(env_vars::CONFIG_PATH)
            .ok()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(get_config_path)
    }

    /// Environment variables take precedence over file values
    pub fn apply_env_overrides(&mut self) {
        if let Ok(api_domain) = std::env::var(env_vars::API_DOMAIN) {
            self.api_domain = api_domain;
        }

        if let Ok(log_file_path) = std::env::var(env_vars::LOG_FILE) {
            self.log_file_path = Some(log_file_path);
        }

        if let Some(timeout) = std::env::var(env_vars::HTTP_TIMEOUT)
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            self.http_timeout_seconds = timeout;
        }
    }

    /// Validates the configuration settings
    pub fn validate(&self) -> Result<(), AppError> {
        validate_config(self)
    }

    /// Returns the platform-specific path for the config file.
    pub fn get_config_path() -> String {
        get_config_path()
    }

    /// Returns the platform-specific path for the log directory.
    pub fn get_log_dir_path() -> String {
        get_log_dir_path()
    }

    /// Every league of every enabled sport, sports in name order and leagues in
    /// file order
    pub fn league_targets(&self) -> Vec<LeagueTarget> {
        self.sports
            .iter()
            .filter(|(_, sport)| sport.enabled)
            .flat_map(|(sport_name, sport)| {
                sport
                    .leagues
                    .iter()
                    .map(move |league| LeagueTarget::new(sport_name.clone(), league.id.clone()))
            })
            .collect()
    }

    /// Favorite team ids per league id, including leagues with no favorites
    pub fn favorite_teams(&self) -> FavoriteTeams {
        let mut favorites = FavoriteTeams::new();
        for sport in self.sports.values().filter(|s| s.enabled) {
            for league in &sport.leagues {
                favorites
                    .entry(league.id.clone())
                    .or_default()
                    .extend(league.favorite_team_ids.iter().cloned());
            }
        }
        favorites
    }

    /// Ordered board ids for a display mode; empty when the mode is not configured
    pub fn boards_for_mode(&self, mode: &str) -> &[String] {
        self.display_modes
            .get(mode)
            .map(|m| m.boards.as_slice())
            .unwrap_or_default()
    }

    /// Saves configuration to a file path.
    ///
    /// Creates the parent directory if it doesn't exist and adds an `https://`
    /// prefix to an API domain that has no scheme.
    ///
    /// # Errors
    /// * `AppError::Config` - If the provided path has no parent directory
    /// * `AppError::Io` - If there's an I/O error creating directories or writing the file
    /// * `AppError::TomlSerialize` - If there's an error serializing the configuration
    pub async fn save_to_path(&self, path: &str) -> Result<(), AppError> {
        let config_dir = Path::new(path).parent().ok_or_else(|| {
            AppError::config_error(format!("Path '{path}' has no parent directory"))
        })?;

        if !config_dir.as_os_str().is_empty() && !config_dir.exists() {
            fs::create_dir_all(config_dir).await?;
        }

        let mut to_save = self.clone();
        if !to_save.api_domain.starts_with("https://") && !to_save.api_domain.starts_with("http://")
        {
            to_save.api_domain = format!("https://{}", to_save.api_domain);
        }

        let content = toml::to_string_pretty(&to_save)?;
        let mut file = fs::File::create(path).await?;
        file.write_all(content.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    /// Loads configuration from a file path without env overrides or validation.
    pub async fn load_from_path(path: &str) -> Result<Self, AppError> {
        let content = fs::read_to_string(path).await?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}
