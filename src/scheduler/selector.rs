//! Display mode selection.
//!
//! `select_mode` is a pure function of the game list, the current instant and
//! the resolved settings. It never fails and never sleeps for less than
//! `refresh::MIN_SLEEP_SECONDS`.

use crate::config::Config;
use crate::constants::refresh;
use crate::data_fetcher::models::Game;
use chrono::{DateTime, Days, NaiveTime, TimeDelta, Utc};
use std::time::Duration;
use tracing::warn;

use super::mode::{DisplayMode, GameClass};

/// Refresh settings with every default already applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorSettings {
    pub in_progress_favorite_team: u64,
    pub in_progress_other_games: u64,
    pub pre_game_post_game: u64,
    pub no_games: u64,
    /// Time of day (UTC) for the daily full discovery
    pub daily_check_time: NaiveTime,
    pub live_mode_enabled: bool,
}

impl Default for SelectorSettings {
    fn default() -> Self {
        Self {
            in_progress_favorite_team: refresh::IN_PROGRESS_FAVORITE_TEAM_SECONDS,
            in_progress_other_games: refresh::IN_PROGRESS_OTHER_GAMES_SECONDS,
            pre_game_post_game: refresh::PRE_GAME_POST_GAME_SECONDS,
            no_games: refresh::NO_GAMES_SECONDS,
            daily_check_time: default_check_time(),
            live_mode_enabled: true,
        }
    }
}

impl SelectorSettings {
    /// Resolves the `[refresh_intervals]` and `[display_settings]` tables.
    /// Missing or malformed values fall back to their defaults with a warning.
    pub fn from_config(config: &Config) -> Self {
        let intervals = &config.refresh_intervals;
        let daily_check_time = match intervals.daily_schedule_check_time.as_deref() {
            Some(raw) => parse_check_time(raw),
            None => {
                warn!(
                    "refresh_intervals.daily_schedule_check_time not configured, using {}",
                    refresh::DAILY_SCHEDULE_CHECK_TIME
                );
                default_check_time()
            }
        };

        Self {
            in_progress_favorite_team: interval_or_default(
                intervals.in_progress_favorite_team,
                "in_progress_favorite_team",
                refresh::IN_PROGRESS_FAVORITE_TEAM_SECONDS,
            ),
            in_progress_other_games: interval_or_default(
                intervals.in_progress_other_games,
                "in_progress_other_games",
                refresh::IN_PROGRESS_OTHER_GAMES_SECONDS,
            ),
            pre_game_post_game: interval_or_default(
                intervals.pre_game_post_game,
                "pre_game_post_game",
                refresh::PRE_GAME_POST_GAME_SECONDS,
            ),
            no_games: interval_or_default(
                intervals.no_games,
                "no_games",
                refresh::NO_GAMES_SECONDS,
            ),
            daily_check_time,
            live_mode_enabled: config.display_settings.live_mode_enabled,
        }
    }
}

fn interval_or_default(value: Option<u64>, key: &str, default: u64) -> u64 {
    match value {
        Some(0) => {
            warn!("refresh_intervals.{key} is 0, using default of {default}s");
            default
        }
        Some(seconds) => seconds,
        None => {
            warn!("refresh_intervals.{key} not configured, using default of {default}s");
            default
        }
    }
}

fn default_check_time() -> NaiveTime {
    NaiveTime::from_hms_opt(5, 0, 0).unwrap_or(NaiveTime::MIN)
}

/// Parses an `HH:MM` check time, falling back to 05:00 with a warning
pub fn parse_check_time(raw: &str) -> NaiveTime {
    let trimmed = raw.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .unwrap_or_else(|e| {
            warn!(
                "Invalid daily_schedule_check_time '{}' ({}), using {}",
                raw,
                e,
                refresh::DAILY_SCHEDULE_CHECK_TIME
            );
            default_check_time()
        })
}

/// Outcome of one selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeDecision {
    pub mode: DisplayMode,
    pub sleep_seconds: u64,
}

impl ModeDecision {
    pub fn sleep_duration(&self) -> Duration {
        Duration::from_secs(self.sleep_seconds)
    }
}

/// Games split by `GameClass`. Pregame games are ordered by start time.
#[derive(Debug, Default)]
pub struct GamePartition<'a> {
    pub live_favorite: Vec<&'a Game>,
    pub live_other: Vec<&'a Game>,
    pub pregame: Vec<&'a Game>,
    pub postgame_favorite: Vec<&'a Game>,
    pub postgame_other: Vec<&'a Game>,
}

impl<'a> GamePartition<'a> {
    pub fn new(games: &'a [Game]) -> Self {
        let mut partition = GamePartition::default();
        for game in games {
            match GameClass::of(game) {
                GameClass::LiveFavorite => partition.live_favorite.push(game),
                GameClass::LiveOther => partition.live_other.push(game),
                GameClass::PregameUpcoming => partition.pregame.push(game),
                GameClass::PostgameFavorite => partition.postgame_favorite.push(game),
                GameClass::PostgameOther => partition.postgame_other.push(game),
            }
        }
        // Stable, so equal start times keep input order
        partition.pregame.sort_by_key(|game| game.start_time);
        partition
    }

    /// Highest-priority non-empty class. With live mode disabled, live
    /// favorite games count as ordinary live games.
    pub fn leading_class(&self, live_mode_enabled: bool) -> Option<GameClass> {
        if live_mode_enabled && !self.live_favorite.is_empty() {
            Some(GameClass::LiveFavorite)
        } else if !self.live_favorite.is_empty() || !self.live_other.is_empty() {
            Some(GameClass::LiveOther)
        } else if !self.pregame.is_empty() {
            Some(GameClass::PregameUpcoming)
        } else if !self.postgame_favorite.is_empty() {
            Some(GameClass::PostgameFavorite)
        } else if !self.postgame_other.is_empty() {
            Some(GameClass::PostgameOther)
        } else {
            None
        }
    }

    /// Earliest scheduled game
    pub fn next_pregame(&self) -> Option<&'a Game> {
        self.pregame.first().copied()
    }
}

/// Picks the display mode and the seconds to sleep before the next refresh
pub fn select_mode(games: &[Game], now: DateTime<Utc>, settings: &SelectorSettings) -> ModeDecision {
    let partition = GamePartition::new(games);

    let (mode, sleep_seconds) = match partition.leading_class(settings.live_mode_enabled) {
        Some(GameClass::LiveFavorite) => (
            DisplayMode::LiveFavorites,
            settings.in_progress_favorite_team,
        ),
        Some(GameClass::LiveOther) => (
            DisplayMode::InProgressGames,
            settings.in_progress_other_games,
        ),
        Some(GameClass::PregameUpcoming) => {
            let delta = partition
                .next_pregame()
                .map_or(TimeDelta::zero(), |game| game.start_time - now);
            (
                DisplayMode::PreGameScheduled,
                pregame_sleep_seconds(delta, settings.pre_game_post_game),
            )
        }
        Some(GameClass::PostgameFavorite) => (
            DisplayMode::PostGameFinishedFavorite,
            settings.pre_game_post_game,
        ),
        Some(GameClass::PostgameOther) => (
            DisplayMode::PostGameFinishedAll,
            settings.pre_game_post_game,
        ),
        None => {
            let next_check = next_daily_check(now, settings.daily_check_time);
            let until_check = u64::try_from((next_check - now).num_seconds()).unwrap_or(0);
            (DisplayMode::NoGamesToday, until_check.min(settings.no_games))
        }
    };

    ModeDecision {
        mode,
        sleep_seconds: sleep_seconds.max(refresh::MIN_SLEEP_SECONDS),
    }
}

/// Sleep before the next refresh when the earliest game starts in `delta`
/// (negative when its start time has passed). Only the result is truncated
/// to whole seconds, so a game half a second out still counts as upcoming.
pub fn pregame_sleep_seconds(delta: TimeDelta, interval: u64) -> u64 {
    if delta <= TimeDelta::zero() {
        interval.min(refresh::OVERDUE_PREGAME_MAX_SECONDS)
    } else if delta < TimeDelta::seconds(refresh::PREGAME_NEAR_WINDOW_SECONDS) {
        interval
    } else {
        let until_wake = delta - TimeDelta::seconds(refresh::PREGAME_WAKE_LEAD_SECONDS);
        let until_wake = u64::try_from(until_wake.num_seconds()).unwrap_or(0);
        until_wake.min(interval).max(refresh::MIN_SLEEP_SECONDS)
    }
}

/// Today's check instant if it is strictly in the future, else tomorrow's
pub fn next_daily_check(now: DateTime<Utc>, check_time: NaiveTime) -> DateTime<Utc> {
    let today = now.date_naive().and_time(check_time).and_utc();
    if today > now {
        today
    } else {
        now.date_naive()
            .checked_add_days(Days::new(1))
            .map(|tomorrow| tomorrow.and_time(check_time).and_utc())
            .unwrap_or(today)
    }
}
