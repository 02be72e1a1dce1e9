use crate::data_fetcher::ScoreboardSource;
use crate::data_fetcher::models::{
    EspnCompetition, EspnCompetitor, EspnEvent, EspnScore, EspnStatus, EspnStatusType, EspnTeam,
    Game, ScoreboardResponse, StatusState,
};
use crate::error::AppError;
use crate::scheduler::Clock;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// Test utilities for creating mock data and testing scenarios
pub struct TestDataBuilder;

impl TestDataBuilder {
    /// 2024-01-15T18:30:00Z, the reference instant used across tests
    pub fn base_time() -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(1_705_343_400, 0).unwrap_or_default()
    }

    /// Creates a basic game in the given state
    pub fn game(
        id: &str,
        status_state: StatusState,
        start_time: DateTime<Utc>,
        is_favorite: bool,
    ) -> Game {
        let (home_score, away_score) = match status_state {
            StatusState::Pre => (None, None),
            StatusState::InProgress | StatusState::Post => (Some(2), Some(1)),
        };
        Game {
            id: id.to_string(),
            sport: "football".to_string(),
            league: "nfl".to_string(),
            start_time,
            status_state,
            status_detail: status_state.as_str().to_string(),
            home_team_id: "1".to_string(),
            home_team_name: "Home Team".to_string(),
            home_team_abbrev: "HOM".to_string(),
            away_team_id: "2".to_string(),
            away_team_name: "Away Team".to_string(),
            away_team_abbrev: "AWY".to_string(),
            home_score,
            away_score,
            is_favorite,
        }
    }

    /// Creates a game that is currently being played
    pub fn live_game(id: &str, is_favorite: bool) -> Game {
        Self::game(id, StatusState::InProgress, Self::base_time(), is_favorite)
    }

    /// Creates a game scheduled to start at `start_time`
    pub fn scheduled_game(id: &str, start_time: DateTime<Utc>) -> Game {
        Self::game(id, StatusState::Pre, start_time, false)
    }

    /// Creates a finished game
    pub fn final_game(id: &str, is_favorite: bool) -> Game {
        Self::game(id, StatusState::Post, Self::base_time(), is_favorite)
    }

    /// Builds a raw ESPN event the way the scoreboard endpoint shapes it.
    ///
    /// `state` is the raw `status.type.state` value, teams are `(id, abbreviation)`
    /// pairs and `scores` is `(home, away)`.
    pub fn espn_event(
        id: &str,
        state: &str,
        date: &str,
        home: (&str, &str),
        away: (&str, &str),
        scores: Option<(u32, u32)>,
    ) -> EspnEvent {
        let competitor = |side: &str, (team_id, abbrev): (&str, &str), score: Option<u32>| {
            EspnCompetitor {
                id: Some(team_id.to_string()),
                home_away: Some(side.to_string()),
                team: Some(EspnTeam {
                    id: Some(team_id.to_string()),
                    name: Some(format!("{abbrev} Name")),
                    display_name: Some(format!("{abbrev} Display")),
                    abbreviation: Some(abbrev.to_string()),
                    ..Default::default()
                }),
                score: score.map(|s| EspnScore::Text(s.to_string())),
            }
        };

        EspnEvent {
            id: Some(id.to_string()),
            date: Some(date.to_string()),
            name: Some(format!("{} at {}", away.1, home.1)),
            short_name: Some(format!("{} @ {}", away.1, home.1)),
            status: Some(EspnStatus {
                status_type: Some(EspnStatusType {
                    state: Some(state.to_string()),
                    short_detail: Some(format!("{state} detail")),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            competitions: vec![EspnCompetition {
                id: Some(id.to_string()),
                competitors: vec![
                    competitor("home", home, scores.map(|(h, _)| h)),
                    competitor("away", away, scores.map(|(_, a)| a)),
                ],
                ..Default::default()
            }],
        }
    }

    pub fn scoreboard(events: Vec<EspnEvent>) -> ScoreboardResponse {
        ScoreboardResponse { events }
    }
}

/// Clock whose time only moves when the code under test sleeps or the test
/// advances it. Clones share the same timeline.
#[derive(Debug, Clone)]
pub struct ManualClock {
    inner: Arc<Mutex<ManualClockState>>,
}

#[derive(Debug)]
struct ManualClockState {
    now: DateTime<Utc>,
    sleeps: Vec<Duration>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ManualClockState {
                now: start,
                sleeps: Vec::new(),
            })),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        self.lock().now = now;
    }

    pub fn advance(&self, by: Duration) {
        let mut state = self.lock();
        state.now += chrono::Duration::from_std(by).unwrap_or(chrono::Duration::zero());
    }

    /// Every sleep requested so far, oldest first
    pub fn sleeps(&self) -> Vec<Duration> {
        self.lock().sleeps.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ManualClockState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.lock().now
    }

    async fn sleep(&self, duration: Duration) {
        let mut state = self.lock();
        state.sleeps.push(duration);
        state.now += chrono::Duration::from_std(duration).unwrap_or(chrono::Duration::zero());
    }
}

/// Canned behavior for one scoreboard request
#[derive(Debug, Clone)]
pub enum ScriptedReply {
    Payload(ScoreboardResponse),
    /// Fails with the error the HTTP layer would map this status to
    Status(u16),
    Panic(String),
}

/// In-memory `ScoreboardSource` driven by per-league reply queues.
///
/// The last reply in a queue repeats forever; leagues without a script return
/// an empty scoreboard.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    inner: Arc<Mutex<ScriptedSourceState>>,
}

#[derive(Debug, Default)]
struct ScriptedSourceState {
    replies: HashMap<String, VecDeque<ScriptedReply>>,
    calls: Vec<(String, String, String)>,
    cache_clears: usize,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a reply for `sport/league`
    pub fn push(&self, sport: &str, league: &str, reply: ScriptedReply) {
        self.lock()
            .replies
            .entry(format!("{sport}/{league}"))
            .or_default()
            .push_back(reply);
    }

    /// Recorded `(sport, league, date)` requests, oldest first
    pub fn calls(&self) -> Vec<(String, String, String)> {
        self.lock().calls.clone()
    }

    pub fn cache_clears(&self) -> usize {
        self.lock().cache_clears
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ScriptedSourceState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn next_reply(&self, sport: &str, league: &str, date: &str) -> Option<ScriptedReply> {
        let mut state = self.lock();
        state
            .calls
            .push((sport.to_string(), league.to_string(), date.to_string()));
        let queue = state.replies.get_mut(&format!("{sport}/{league}"))?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

#[async_trait]
impl ScoreboardSource for ScriptedSource {
    async fn fetch_scoreboard(
        &self,
        sport: &str,
        league: &str,
        date: &str,
    ) -> Result<ScoreboardResponse, AppError> {
        let url = format!("scripted://{sport}/{league}/scoreboard?dates={date}");
        // The lock is released before any scripted panic
        match self.next_reply(sport, league, date) {
            None => Ok(ScoreboardResponse::default()),
            Some(ScriptedReply::Payload(payload)) => Ok(payload),
            Some(ScriptedReply::Status(404)) => Err(AppError::api_not_found(url)),
            Some(ScriptedReply::Status(429)) => Err(AppError::api_rate_limit("scripted", url)),
            Some(ScriptedReply::Status(status)) if status >= 500 => {
                Err(AppError::api_server_error(status, "scripted", url))
            }
            Some(ScriptedReply::Status(status)) => {
                Err(AppError::api_client_error(status, "scripted", url))
            }
            Some(ScriptedReply::Panic(message)) => panic!("{message}"),
        }
    }

    async fn clear_cache(&self) {
        self.lock().cache_clears += 1;
    }
}
