//! Nested configuration tables

use serde::{Deserialize, Deserializer, Serialize};

fn default_console_level() -> String {
    "info".to_string()
}

fn default_file_level() -> String {
    "debug".to_string()
}

fn default_true() -> bool {
    true
}

/// `[logging]` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Level for stdout output (`trace`, `debug`, `info`, `warn`, `error`)
    #[serde(default = "default_console_level")]
    pub console_level: String,
    /// Level for the rolling log file
    #[serde(default = "default_file_level")]
    pub file_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            console_level: default_console_level(),
            file_level: default_file_level(),
        }
    }
}

/// `[sports.<sport>]` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SportConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub leagues: Vec<LeagueConfig>,
}

impl Default for SportConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            leagues: Vec::new(),
        }
    }
}

/// One `[[sports.<sport>.leagues]]` entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeagueConfig {
    pub id: String,
    /// ESPN team ids; integers are accepted and stored as strings
    #[serde(default, deserialize_with = "deserialize_team_ids")]
    pub favorite_team_ids: Vec<String>,
}

impl LeagueConfig {
    pub fn new(id: impl Into<String>, favorite_team_ids: &[&str]) -> Self {
        Self {
            id: id.into(),
            favorite_team_ids: favorite_team_ids.iter().map(|s| s.to_string()).collect(),
        }
    }
}

fn deserialize_team_ids<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TeamId {
        Text(String),
        Number(i64),
    }

    let ids = Vec::<TeamId>::deserialize(deserializer)?;
    Ok(ids
        .into_iter()
        .map(|id| match id {
            TeamId::Text(text) => text.trim().to_string(),
            TeamId::Number(n) => n.to_string(),
        })
        .collect())
}

/// `[refresh_intervals]` table. Missing keys resolve to their defaults with a
/// warning when the scheduler starts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RefreshIntervals {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_progress_favorite_team: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_progress_other_games: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_game_post_game: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_games: Option<u64>,
    /// `HH:MM`, UTC
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_schedule_check_time: Option<String>,
}

/// `[display_settings]` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplaySettings {
    /// When false, live favorite games are shown as ordinary live games
    #[serde(default = "default_true")]
    pub live_mode_enabled: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            live_mode_enabled: true,
        }
    }
}

/// `[display_modes.<mode>]` table. Keys other than `boards` and
/// `display_duration_sec` are kept verbatim for board renderers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayModeConfig {
    #[serde(default)]
    pub boards: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_duration_sec: Option<u64>,
    #[serde(flatten)]
    pub extra: toml::Table,
}

impl DisplayModeConfig {
    pub fn with_boards(boards: &[&str]) -> Self {
        Self {
            boards: boards.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }
}
