use super::Config;
use crate::error::AppError;
use crate::scheduler::DisplayMode;
use std::path::Path;
use tracing::warn;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validates the configuration settings
///
/// # Validation Rules
/// - API domain cannot be empty and must look like a URL or domain name
/// - If a log file path is provided it cannot be empty, and its parent
///   directory must exist or be creatable
/// - HTTP timeout must be > 0
/// - Log levels must be one of trace, debug, info, warn, error
/// - League ids cannot be empty
/// - Display mode tables must name a known mode
///
/// Refresh interval anomalies are only warned about: a zero interval and a
/// malformed `daily_schedule_check_time` fall back to their defaults when the
/// scheduler resolves its settings.
pub fn validate_config(config: &Config) -> Result<(), AppError> {
    validate_api_domain(&config.api_domain)?;
    validate_log_file_path(&config.log_file_path)?;

    if config.http_timeout_seconds == 0 {
        return Err(AppError::config_error("HTTP timeout must be greater than 0"));
    }

    let intervals = &config.refresh_intervals;
    for (name, value) in [
        ("in_progress_favorite_team", intervals.in_progress_favorite_team),
        ("in_progress_other_games", intervals.in_progress_other_games),
        ("pre_game_post_game", intervals.pre_game_post_game),
        ("no_games", intervals.no_games),
    ] {
        if value == Some(0) {
            warn!("Refresh interval '{name}' is 0, the default will be used");
        }
    }

    for (name, level) in [
        ("console_level", &config.logging.console_level),
        ("file_level", &config.logging.file_level),
    ] {
        if !LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str()) {
            return Err(AppError::config_error(format!(
                "Invalid log level '{level}' for {name}, expected one of {}",
                LOG_LEVELS.join(", ")
            )));
        }
    }

    for (sport, sport_config) in &config.sports {
        if sport.trim().is_empty() {
            return Err(AppError::config_error("Sport name cannot be empty"));
        }
        if sport_config.leagues.iter().any(|l| l.id.trim().is_empty()) {
            return Err(AppError::config_error(format!(
                "League id cannot be empty (sport '{sport}')"
            )));
        }
    }

    for mode in config.display_modes.keys() {
        if mode.parse::<DisplayMode>().is_err() {
            let known: Vec<&str> = DisplayMode::ALL.iter().map(|m| m.as_str()).collect();
            return Err(AppError::config_error(format!(
                "Unknown display mode '{mode}', expected one of {}",
                known.join(", ")
            )));
        }
    }

    Ok(())
}

fn validate_api_domain(api_domain: &str) -> Result<(), AppError> {
    if api_domain.is_empty() {
        return Err(AppError::config_error("API domain cannot be empty"));
    }

    if !api_domain.starts_with("http://")
        && !api_domain.starts_with("https://")
        && !api_domain.contains('.')
        && !api_domain.starts_with("localhost")
    {
        return Err(AppError::config_error(
            "API domain must be a valid URL or domain name",
        ));
    }

    Ok(())
}

fn validate_log_file_path(log_file_path: &Option<String>) -> Result<(), AppError> {
    let Some(log_path) = log_file_path else {
        return Ok(());
    };

    if log_path.is_empty() {
        return Err(AppError::config_error("Log file path cannot be empty"));
    }

    if let Some(parent) = Path::new(log_path).parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent).map_err(|e| {
            AppError::config_error(format!(
                "Cannot create log directory '{}': {}",
                parent.display(),
                e
            ))
        })?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DisplayModeConfig, LeagueConfig, SportConfig};

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_api_domain_rules() {
        assert!(validate_api_domain("").is_err());
        assert!(validate_api_domain("not_a_domain").is_err());
        assert!(validate_api_domain("localhost:8080").is_ok());
        assert!(validate_api_domain("site.api.espn.com").is_ok());
        assert!(validate_api_domain("http://127.0.0.1:9000").is_ok());
    }

    #[test]
    fn test_zero_interval_is_not_fatal() {
        let mut config = Config::default();
        config.refresh_intervals.no_games = Some(0);
        config.refresh_intervals.pre_game_post_game = Some(0);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = Config {
            http_timeout_seconds: 0,
            ..Config::default()
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_log_levels() {
        let mut config = Config::default();
        config.logging.console_level = "DEBUG".to_string();
        assert!(validate_config(&config).is_ok());

        config.logging.file_level = "verbose".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_empty_league_id_rejected() {
        let mut config = Config::default();
        config.sports.insert(
            "football".to_string(),
            SportConfig {
                enabled: true,
                leagues: vec![LeagueConfig::new(" ", &[])],
            },
        );
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_unknown_display_mode_rejected() {
        let mut config = Config::default();
        config
            .display_modes
            .insert("live_favorite".to_string(), DisplayModeConfig::default());
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("live_favorites"));

        let mut config = Config::default();
        config
            .display_modes
            .insert("live_favorites".to_string(), DisplayModeConfig::default());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_malformed_check_time_is_not_fatal() {
        let mut config = Config::default();
        config.refresh_intervals.daily_schedule_check_time = Some("25:99".to_string());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_log_file_path_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("app.log");
        let config = Config {
            log_file_path: Some(path.to_string_lossy().to_string()),
            ..Config::default()
        };
        assert!(validate_config(&config).is_ok());
        assert!(dir.path().join("nested").exists());

        let config = Config {
            log_file_path: Some(String::new()),
            ..Config::default()
        };
        assert!(validate_config(&config).is_err());
    }
}
