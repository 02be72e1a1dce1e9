use crate::data_fetcher::models::{
    EspnCompetitor, EspnEvent, FavoriteTeams, Game, LeagueTarget, ScoreboardResponse, StatusState,
};
use thiserror::Error;
use tracing::{debug, warn};

use super::game_status::{determine_status_state, status_detail};
use super::time_formatting::parse_event_start;

/// Why a single event was left out of the parsed scoreboard
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EventSkip {
    #[error("missing field '{0}'")]
    MissingField(&'static str),

    #[error("unknown status (state={state:?}, id={id:?})")]
    UnknownStatus {
        state: Option<String>,
        id: Option<String>,
    },

    #[error("invalid start time '{0}'")]
    InvalidStartTime(String),

    #[error("missing {0} competitor")]
    MissingCompetitor(&'static str),
}

/// Converts a raw scoreboard payload into normalized games.
///
/// Never fails: events that cannot be interpreted are skipped with a warning
/// and the rest of the payload is still returned. `is_favorite` is resolved
/// here against the favorite ids configured for `target.league`.
pub fn parse_scoreboard(
    raw: &ScoreboardResponse,
    target: &LeagueTarget,
    favorites: &FavoriteTeams,
) -> Vec<Game> {
    let mut games = Vec::with_capacity(raw.events.len());

    for (index, event) in raw.events.iter().enumerate() {
        match parse_event(event, target, favorites) {
            Ok(game) => games.push(game),
            Err(reason) => {
                warn!(
                    "Skipping event {} ({}) in {}: {}",
                    event.id.as_deref().unwrap_or("?"),
                    index,
                    target,
                    reason
                );
            }
        }
    }

    debug!(
        "Parsed {}/{} events for {}",
        games.len(),
        raw.events.len(),
        target
    );
    games
}

/// Parses one event. The first competition carries the competitors.
pub fn parse_event(
    event: &EspnEvent,
    target: &LeagueTarget,
    favorites: &FavoriteTeams,
) -> Result<Game, EventSkip> {
    let id = event
        .id
        .as_deref()
        .filter(|id| !id.trim().is_empty())
        .ok_or(EventSkip::MissingField("id"))?;

    let status = event
        .effective_status()
        .ok_or(EventSkip::MissingField("status"))?;
    let status_state = determine_status_state(status).ok_or_else(|| {
        let status_type = status.status_type.as_ref();
        EventSkip::UnknownStatus {
            state: status_type.and_then(|t| t.state.clone()),
            id: status_type.and_then(|t| t.id.clone()),
        }
    })?;

    let competition = event
        .competitions
        .first()
        .ok_or(EventSkip::MissingField("competitions"))?;

    let raw_date = event
        .date
        .as_deref()
        .or(competition.date.as_deref())
        .ok_or(EventSkip::MissingField("date"))?;
    let start_time =
        parse_event_start(raw_date).map_err(|_| EventSkip::InvalidStartTime(raw_date.to_string()))?;

    let home = TeamSide::from_competitor(
        competition
            .competitor("home")
            .ok_or(EventSkip::MissingCompetitor("home"))?,
        status_state,
    );
    let away = TeamSide::from_competitor(
        competition
            .competitor("away")
            .ok_or(EventSkip::MissingCompetitor("away"))?,
        status_state,
    );

    let is_favorite = favorites.get(&target.league).is_some_and(|ids| {
        (!home.id.is_empty() && ids.contains(&home.id))
            || (!away.id.is_empty() && ids.contains(&away.id))
    });

    Ok(Game {
        id: id.to_string(),
        sport: target.sport.clone(),
        league: target.league.clone(),
        start_time,
        status_state,
        status_detail: status_detail(status),
        home_team_id: home.id,
        home_team_name: home.name,
        home_team_abbrev: home.abbrev,
        away_team_id: away.id,
        away_team_name: away.name,
        away_team_abbrev: away.abbrev,
        home_score: home.score,
        away_score: away.score,
        is_favorite,
    })
}

struct TeamSide {
    id: String,
    name: String,
    abbrev: String,
    score: Option<u32>,
}

impl TeamSide {
    fn from_competitor(competitor: &EspnCompetitor, state: StatusState) -> Self {
        let team = competitor.team.as_ref();
        let id = team
            .and_then(|t| t.id.clone())
            .or_else(|| competitor.id.clone())
            .unwrap_or_default();
        let name = team
            .and_then(|t| t.display_name.clone().or_else(|| t.name.clone()))
            .unwrap_or_default();
        let abbrev = team
            .and_then(|t| t.abbreviation.clone())
            .unwrap_or_else(|| name.chars().take(3).collect::<String>().to_uppercase());
        // Pre games carry placeholder "0" scores
        let score = match state {
            StatusState::Pre => None,
            StatusState::InProgress | StatusState::Post => {
                competitor.score.as_ref().and_then(|s| s.as_u32())
            }
        };

        Self {
            id,
            name,
            abbrev,
            score,
        }
    }
}
