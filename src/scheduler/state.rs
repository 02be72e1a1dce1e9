use crate::data_fetcher::models::{Game, LeagueTarget};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

use super::mode::DisplayMode;

/// Kind of fetch pass the orchestrator runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PassKind {
    /// Daily re-discovery: caches dropped, every league fetched for today
    FullDiscovery,
    /// Same leagues and date, results replace the previous list
    Incremental,
}

/// Games from a league's most recent successful fetch
#[derive(Debug, Clone, PartialEq)]
pub struct LeagueSnapshot {
    pub games: Vec<Game>,
    pub fetched_at: DateTime<Utc>,
}

/// Everything the refresh loop carries from one iteration to the next
#[derive(Debug, Clone, Default)]
pub struct SchedulerState {
    pub current_display_mode: DisplayMode,
    pub last_data_fetch_time: Option<DateTime<Utc>>,
    /// Exactly one fetch pass worth of games, replaced wholesale
    pub all_games_data: Vec<Game>,
    pub last_daily_schedule_check_date: Option<NaiveDate>,
    /// Only maintained when last-known-good retention is enabled
    pub last_good_by_league: HashMap<LeagueTarget, LeagueSnapshot>,
}

impl SchedulerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decides between a daily full discovery and an incremental refresh.
    ///
    /// Full discovery runs when there is no previous check date, the previous
    /// check was on an earlier day, there is no game data at all, or the
    /// check already ran today but found nothing and `now` has reached the
    /// daily check time.
    pub fn plan_pass(&self, now: DateTime<Utc>, check_time: NaiveTime) -> PassKind {
        let today = now.date_naive();

        let needs_full = match self.last_daily_schedule_check_date {
            None => true,
            Some(last) if last < today => true,
            Some(last) if last == today => {
                now.time() >= check_time && self.all_games_data.is_empty()
            }
            Some(_) => false,
        };

        if needs_full || self.all_games_data.is_empty() {
            PassKind::FullDiscovery
        } else {
            PassKind::Incremental
        }
    }

    /// Stores the outcome of a finished pass
    pub fn record_pass(&mut self, kind: PassKind, fetched_at: DateTime<Utc>, games: Vec<Game>) {
        if kind == PassKind::FullDiscovery {
            self.last_daily_schedule_check_date = Some(fetched_at.date_naive());
        }
        self.last_data_fetch_time = Some(fetched_at);
        self.all_games_data = games;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing_utils::TestDataBuilder;
    use chrono::TimeZone;

    fn at(day: u32, h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, h, m, 0).unwrap()
    }

    fn five_am() -> NaiveTime {
        NaiveTime::from_hms_opt(5, 0, 0).unwrap()
    }

    fn state_with(last_check: Option<NaiveDate>, games: Vec<Game>) -> SchedulerState {
        SchedulerState {
            last_daily_schedule_check_date: last_check,
            all_games_data: games,
            ..SchedulerState::default()
        }
    }

    #[test]
    fn test_initial_state() {
        let state = SchedulerState::new();
        assert_eq!(state.current_display_mode, DisplayMode::NoGamesToday);
        assert!(state.all_games_data.is_empty());
        assert_eq!(state.plan_pass(at(15, 12, 0), five_am()), PassKind::FullDiscovery);
    }

    #[test]
    fn test_new_day_triggers_full_discovery() {
        let games = vec![TestDataBuilder::final_game("1", false)];
        let state = state_with(Some(at(14, 0, 0).date_naive()), games);
        assert_eq!(state.plan_pass(at(15, 0, 30), five_am()), PassKind::FullDiscovery);
    }

    #[test]
    fn test_same_day_with_games_is_incremental() {
        let games = vec![TestDataBuilder::live_game("1", false)];
        let state = state_with(Some(at(15, 0, 0).date_naive()), games);
        assert_eq!(state.plan_pass(at(15, 18, 0), five_am()), PassKind::Incremental);
        assert_eq!(state.plan_pass(at(15, 4, 0), five_am()), PassKind::Incremental);
    }

    #[test]
    fn test_empty_data_always_triggers_full_discovery() {
        let state = state_with(Some(at(15, 0, 0).date_naive()), Vec::new());
        assert_eq!(state.plan_pass(at(15, 3, 0), five_am()), PassKind::FullDiscovery);
        assert_eq!(state.plan_pass(at(15, 6, 0), five_am()), PassKind::FullDiscovery);
    }

    #[test]
    fn test_record_pass() {
        let mut state = SchedulerState::new();
        let games = vec![TestDataBuilder::live_game("1", false)];

        state.record_pass(PassKind::FullDiscovery, at(15, 6, 0), games.clone());
        assert_eq!(state.last_daily_schedule_check_date, Some(at(15, 0, 0).date_naive()));
        assert_eq!(state.last_data_fetch_time, Some(at(15, 6, 0)));
        assert_eq!(state.all_games_data, games);

        state.record_pass(PassKind::Incremental, at(16, 1, 0), Vec::new());
        assert_eq!(state.last_daily_schedule_check_date, Some(at(15, 0, 0).date_naive()));
        assert!(state.all_games_data.is_empty());
    }
}
