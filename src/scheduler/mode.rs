use crate::data_fetcher::models::{Game, StatusState};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What the scoreboard shows. Names match the `[display_modes.*]` config keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    LiveFavorites,
    InProgressGames,
    PreGameScheduled,
    PostGameFinishedFavorite,
    PostGameFinishedAll,
    #[default]
    NoGamesToday,
}

impl DisplayMode {
    pub const ALL: [DisplayMode; 6] = [
        DisplayMode::LiveFavorites,
        DisplayMode::InProgressGames,
        DisplayMode::PreGameScheduled,
        DisplayMode::PostGameFinishedFavorite,
        DisplayMode::PostGameFinishedAll,
        DisplayMode::NoGamesToday,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayMode::LiveFavorites => "live_favorites",
            DisplayMode::InProgressGames => "in_progress_games",
            DisplayMode::PreGameScheduled => "pre_game_scheduled",
            DisplayMode::PostGameFinishedFavorite => "post_game_finished_favorite",
            DisplayMode::PostGameFinishedAll => "post_game_finished_all",
            DisplayMode::NoGamesToday => "no_games_today",
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DisplayMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DisplayMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| format!("unknown display mode '{s}'"))
    }
}

/// Bucket a game falls into when picking the display mode.
/// Variants are declared in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GameClass {
    LiveFavorite,
    LiveOther,
    PregameUpcoming,
    PostgameFavorite,
    PostgameOther,
}

impl GameClass {
    /// Maps a game to exactly one class
    pub fn of(game: &Game) -> Self {
        match (game.status_state, game.is_favorite) {
            (StatusState::InProgress, true) => GameClass::LiveFavorite,
            (StatusState::InProgress, false) => GameClass::LiveOther,
            (StatusState::Pre, _) => GameClass::PregameUpcoming,
            (StatusState::Post, true) => GameClass::PostgameFavorite,
            (StatusState::Post, false) => GameClass::PostgameOther,
        }
    }
}
