use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Favorite team ids keyed by league id
pub type FavoriteTeams = HashMap<String, HashSet<String>>;

/// Lifecycle of a single event. Exactly one state holds at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusState {
    Pre,
    InProgress,
    Post,
}

impl StatusState {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusState::Pre => "pre",
            StatusState::InProgress => "in_progress",
            StatusState::Post => "post",
        }
    }
}

impl fmt::Display for StatusState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One (sport, league) pair the scheduler polls, e.g. `football/nfl`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LeagueTarget {
    pub sport: String,
    pub league: String,
}

impl LeagueTarget {
    pub fn new(sport: impl Into<String>, league: impl Into<String>) -> Self {
        Self {
            sport: sport.into(),
            league: league.into(),
        }
    }
}

impl fmt::Display for LeagueTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.sport, self.league)
    }
}

/// Normalized game record built fresh from every fetch pass.
///
/// Team fields are flattened owned copies of the provider payload and
/// `is_favorite` is fixed at parse time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Game {
    pub id: String,
    pub sport: String,
    pub league: String,
    pub start_time: DateTime<Utc>,
    pub status_state: StatusState,
    pub status_detail: String,
    pub home_team_id: String,
    pub home_team_name: String,
    pub home_team_abbrev: String,
    pub away_team_id: String,
    pub away_team_name: String,
    pub away_team_abbrev: String,
    pub home_score: Option<u32>,
    pub away_score: Option<u32>,
    pub is_favorite: bool,
}

impl Game {
    pub fn is_live(&self) -> bool {
        self.status_state == StatusState::InProgress
    }

    pub fn is_scheduled(&self) -> bool {
        self.status_state == StatusState::Pre
    }

    pub fn is_final(&self) -> bool {
        self.status_state == StatusState::Post
    }

    /// Short label such as `ARI @ BUF`
    pub fn matchup(&self) -> String {
        format!("{} @ {}", self.away_team_abbrev, self.home_team_abbrev)
    }

    /// `away-home` score line, `None` before the game has a score
    pub fn score_line(&self) -> Option<String> {
        match (self.away_score, self.home_score) {
            (Some(away), Some(home)) => Some(format!("{away}-{home}")),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing_utils::TestDataBuilder;

    #[test]
    fn test_status_state_serde_names() {
        assert_eq!(
            serde_json::to_string(&StatusState::InProgress).unwrap(),
            "\"in_progress\""
        );
        let parsed: StatusState = serde_json::from_str("\"post\"").unwrap();
        assert_eq!(parsed, StatusState::Post);
        assert_eq!(StatusState::Pre.to_string(), "pre");
    }

    #[test]
    fn test_league_target_display() {
        let target = LeagueTarget::new("hockey", "nhl");
        assert_eq!(target.to_string(), "hockey/nhl");
    }

    #[test]
    fn test_game_helpers() {
        let live = TestDataBuilder::live_game("401", true);
        assert!(live.is_live());
        assert!(!live.is_scheduled());
        assert_eq!(live.matchup(), "AWY @ HOM");
        assert_eq!(live.score_line().as_deref(), Some("1-2"));

        let scheduled = TestDataBuilder::scheduled_game("402", live.start_time);
        assert!(scheduled.is_scheduled());
        assert_eq!(scheduled.score_line(), None);

        let finished = TestDataBuilder::final_game("403", false);
        assert!(finished.is_final());
    }
}
