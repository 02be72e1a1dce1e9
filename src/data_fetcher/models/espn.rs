//! Wire types for the ESPN site API scoreboard endpoint.
//!
//! Every field is optional so that one malformed event never rejects the whole
//! payload; the event parser decides what is required.

use serde::{Deserialize, Serialize};

/// Raw scoreboard payload as returned by `/{sport}/{league}/scoreboard`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ScoreboardResponse {
    #[serde(default)]
    pub events: Vec<EspnEvent>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EspnEvent {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "shortName", default)]
    pub short_name: Option<String>,
    #[serde(default)]
    pub status: Option<EspnStatus>,
    #[serde(default)]
    pub competitions: Vec<EspnCompetition>,
}

impl EspnEvent {
    /// Event-level status, falling back to the first competition's status
    pub fn effective_status(&self) -> Option<&EspnStatus> {
        self.status
            .as_ref()
            .or_else(|| self.competitions.first().and_then(|c| c.status.as_ref()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EspnStatus {
    #[serde(rename = "type", default)]
    pub status_type: Option<EspnStatusType>,
    #[serde(default)]
    pub period: Option<u32>,
    #[serde(rename = "displayClock", default)]
    pub display_clock: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EspnStatusType {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub completed: Option<bool>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(rename = "shortDetail", default)]
    pub short_detail: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EspnCompetition {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub status: Option<EspnStatus>,
    #[serde(default)]
    pub competitors: Vec<EspnCompetitor>,
}

impl EspnCompetition {
    pub fn competitor(&self, side: &str) -> Option<&EspnCompetitor> {
        self.competitors
            .iter()
            .find(|c| c.home_away.as_deref() == Some(side))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EspnCompetitor {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "homeAway", default)]
    pub home_away: Option<String>,
    #[serde(default)]
    pub team: Option<EspnTeam>,
    #[serde(default)]
    pub score: Option<EspnScore>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EspnTeam {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "displayName", default)]
    pub display_name: Option<String>,
    #[serde(rename = "shortDisplayName", default)]
    pub short_display_name: Option<String>,
    #[serde(default)]
    pub abbreviation: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

/// Payload of `/{sport}/{league}/teams`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TeamsResponse {
    #[serde(default)]
    pub sports: Vec<EspnSportEntry>,
}

impl TeamsResponse {
    /// Every team across all nested sport and league entries
    pub fn teams(&self) -> impl Iterator<Item = &EspnTeam> {
        self.sports
            .iter()
            .flat_map(|sport| &sport.leagues)
            .flat_map(|league| &league.teams)
            .filter_map(|entry| entry.team.as_ref())
    }

    pub fn find_team(&self, team_id: &str) -> Option<&EspnTeam> {
        self.teams().find(|team| team.id.as_deref() == Some(team_id))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EspnSportEntry {
    #[serde(default)]
    pub leagues: Vec<EspnLeagueEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EspnLeagueEntry {
    #[serde(default)]
    pub abbreviation: Option<String>,
    #[serde(default)]
    pub teams: Vec<EspnTeamEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EspnTeamEntry {
    #[serde(default)]
    pub team: Option<EspnTeam>,
}

/// Scoreboard scores arrive as strings; other ESPN endpoints use numbers or
/// `{ value, displayValue }` objects.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum EspnScore {
    Text(String),
    Number(f64),
    Detailed {
        #[serde(default)]
        value: Option<f64>,
        #[serde(rename = "displayValue", default)]
        display_value: Option<String>,
    },
}

impl EspnScore {
    /// Numeric score, `None` when the value is blank or not a non-negative integer
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            EspnScore::Text(text) => parse_score_text(text),
            EspnScore::Number(n) => score_from_f64(*n),
            EspnScore::Detailed {
                value,
                display_value,
            } => value
                .and_then(score_from_f64)
                .or_else(|| display_value.as_deref().and_then(parse_score_text)),
        }
    }
}

fn parse_score_text(text: &str) -> Option<u32> {
    text.trim().parse().ok()
}

fn score_from_f64(n: f64) -> Option<u32> {
    if n.is_finite() && n >= 0.0 && n.fract() == 0.0 && n <= u32::MAX as f64 {
        Some(n as u32)
    } else {
        None
    }
}
