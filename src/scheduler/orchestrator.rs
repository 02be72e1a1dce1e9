//! Refresh loop
//!
//! Each iteration runs one fetch pass over every configured league, selects
//! the display mode, publishes a `BoardFrame` and sleeps. A failing league
//! only drops that league; a panicking iteration is logged and followed by a
//! fixed cooldown. The loop itself never exits.

use crate::config::Config;
use crate::constants::refresh;
use crate::data_fetcher::ScoreboardSource;
use crate::data_fetcher::models::{FavoriteTeams, Game, LeagueTarget};
use crate::data_fetcher::processors::{format_api_date, parse_scoreboard};
use crate::error::AppError;
use chrono::{DateTime, Utc};
use futures::FutureExt;
use serde::Serialize;
use std::any::Any;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use super::clock::Clock;
use super::mode::DisplayMode;
use super::selector::{SelectorSettings, select_mode};
use super::state::{LeagueSnapshot, PassKind, SchedulerState};

/// A league whose fetch failed during a pass
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailedLeague {
    pub league: LeagueTarget,
    pub error: String,
}

/// A failed league whose last-known-good games were carried into a pass
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StaleLeague {
    pub league: LeagueTarget,
    /// When the carried games were originally fetched
    pub fetched_at: DateTime<Utc>,
    pub game_count: usize,
}

/// What happened during one fetch pass
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PassReport {
    pub kind: PassKind,
    pub started_at: DateTime<Utc>,
    /// `YYYYMMDD` date that was requested
    pub fetch_date: String,
    pub succeeded: Vec<LeagueTarget>,
    pub failed: Vec<FailedLeague>,
    pub stale: Vec<StaleLeague>,
}

impl PassReport {
    fn new(kind: PassKind, started_at: DateTime<Utc>, fetch_date: String) -> Self {
        Self {
            kind,
            started_at,
            fetch_date,
            succeeded: Vec::new(),
            failed: Vec::new(),
            stale: Vec::new(),
        }
    }
}

/// Everything a board renderer needs for one iteration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardFrame {
    pub mode: DisplayMode,
    pub boards: Vec<String>,
    pub games: Vec<Game>,
    pub sleep_seconds: u64,
    pub pass: PassReport,
}

/// Owns the scheduler state and drives the fetch, select, publish, sleep loop
pub struct RefreshOrchestrator<S, C> {
    source: S,
    clock: C,
    targets: Vec<LeagueTarget>,
    favorites: FavoriteTeams,
    boards: HashMap<DisplayMode, Vec<String>>,
    settings: SelectorSettings,
    retain_last_known_good: bool,
    state: SchedulerState,
    frames: watch::Sender<Option<BoardFrame>>,
}

impl<S, C> RefreshOrchestrator<S, C>
where
    S: ScoreboardSource,
    C: Clock,
{
    pub fn new(source: S, clock: C, config: &Config) -> Self {
        let targets = config.league_targets();
        if targets.is_empty() {
            warn!("No enabled leagues configured; the scoreboard will stay in no_games_today");
        } else {
            let names: Vec<String> = targets.iter().map(ToString::to_string).collect();
            info!("Tracking {} leagues: {}", targets.len(), names.join(", "));
        }

        let boards = DisplayMode::ALL
            .into_iter()
            .map(|mode| (mode, config.boards_for_mode(mode.as_str()).to_vec()))
            .collect();

        let (frames, _) = watch::channel(None);

        Self {
            source,
            clock,
            targets,
            favorites: config.favorite_teams(),
            boards,
            settings: SelectorSettings::from_config(config),
            retain_last_known_good: config.retain_last_known_good,
            state: SchedulerState::new(),
            frames,
        }
    }

    /// Receiver for the latest published frame; `None` until the first pass ends
    pub fn subscribe(&self) -> watch::Receiver<Option<BoardFrame>> {
        self.frames.subscribe()
    }

    pub fn state(&self) -> &SchedulerState {
        &self.state
    }

    pub fn settings(&self) -> &SelectorSettings {
        &self.settings
    }

    /// Runs forever
    pub async fn run(&mut self) {
        info!("Starting refresh loop");
        loop {
            self.tick().await;
        }
    }

    /// One contained iteration: run a cycle, then sleep for the selected
    /// interval or, if the cycle panicked, for the error cooldown.
    /// Returns the slept duration.
    pub async fn tick(&mut self) -> Duration {
        let sleep = match AssertUnwindSafe(self.run_cycle()).catch_unwind().await {
            Ok(frame) => Duration::from_secs(frame.sleep_seconds),
            Err(payload) => {
                let err = AppError::cycle_panicked(panic_message(&*payload));
                error!("Refresh cycle failed: {}", err);
                info!(
                    "Restarting refresh loop in {} seconds",
                    refresh::ERROR_COOLDOWN_SECONDS
                );
                Duration::from_secs(refresh::ERROR_COOLDOWN_SECONDS)
            }
        };

        self.clock.sleep(sleep).await;
        sleep
    }

    /// One fetch pass plus mode selection. Publishes and returns the frame.
    pub async fn run_cycle(&mut self) -> BoardFrame {
        let started_at = self.clock.now();
        let kind = self
            .state
            .plan_pass(started_at, self.settings.daily_check_time);

        match kind {
            PassKind::FullDiscovery => {
                info!(
                    "Performing daily schedule discovery for {}",
                    started_at.date_naive()
                );
                self.source.clear_cache().await;
            }
            PassKind::Incremental => debug!("Performing incremental refresh"),
        }

        let (games, pass) = self.fetch_pass(kind, started_at).await;
        self.state.record_pass(kind, started_at, games);

        let decision = select_mode(&self.state.all_games_data, self.clock.now(), &self.settings);
        if decision.mode != self.state.current_display_mode {
            info!(
                "Display mode changed: {} -> {}",
                self.state.current_display_mode, decision.mode
            );
        }
        self.state.current_display_mode = decision.mode;

        let boards = self.boards.get(&decision.mode).cloned().unwrap_or_default();
        if boards.is_empty() {
            info!("No boards configured for mode {}", decision.mode);
        }

        info!(
            "Mode {} with {} games ({} leagues ok, {} failed), next refresh in {}s",
            decision.mode,
            self.state.all_games_data.len(),
            pass.succeeded.len(),
            pass.failed.len(),
            decision.sleep_seconds
        );

        let frame = BoardFrame {
            mode: decision.mode,
            boards,
            games: self.state.all_games_data.clone(),
            sleep_seconds: decision.sleep_seconds,
            pass,
        };
        self.frames.send_replace(Some(frame.clone()));
        frame
    }

    async fn fetch_pass(&mut self, kind: PassKind, now: DateTime<Utc>) -> (Vec<Game>, PassReport) {
        let fetch_date = format_api_date(now.date_naive());
        let mut report = PassReport::new(kind, now, fetch_date.clone());
        let mut games = Vec::new();

        for target in &self.targets {
            match self
                .source
                .fetch_scoreboard(&target.sport, &target.league, &fetch_date)
                .await
            {
                Ok(raw) => {
                    let parsed = parse_scoreboard(&raw, target, &self.favorites);
                    debug!("{}: {} games", target, parsed.len());
                    if self.retain_last_known_good {
                        self.state.last_good_by_league.insert(
                            target.clone(),
                            LeagueSnapshot {
                                games: parsed.clone(),
                                fetched_at: now,
                            },
                        );
                    }
                    games.extend(parsed);
                    report.succeeded.push(target.clone());
                }
                Err(e) => {
                    warn!("Failed to fetch {} for {}: {}", target, fetch_date, e);
                    report.failed.push(FailedLeague {
                        league: target.clone(),
                        error: e.to_string(),
                    });

                    // Only same-day snapshots describe today's schedule
                    if self.retain_last_known_good
                        && let Some(snapshot) = self.state.last_good_by_league.get(target)
                        && snapshot.fetched_at.date_naive() == now.date_naive()
                    {
                        warn!(
                            "Using last known good data for {} fetched at {} ({} games)",
                            target,
                            snapshot.fetched_at,
                            snapshot.games.len()
                        );
                        games.extend(snapshot.games.iter().cloned());
                        report.stale.push(StaleLeague {
                            league: target.clone(),
                            fetched_at: snapshot.fetched_at,
                            game_count: snapshot.games.len(),
                        });
                    }
                }
            }
        }

        (games, report)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic payload".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DisplayModeConfig, LeagueConfig, SportConfig};
    use crate::testing_utils::{ManualClock, ScriptedReply, ScriptedSource, TestDataBuilder};

    fn config() -> Config {
        let mut config = Config::default();
        config.sports.insert(
            "football".to_string(),
            SportConfig {
                enabled: true,
                leagues: vec![LeagueConfig::new("nfl", &["2"])],
            },
        );
        config.display_modes.insert(
            "live_favorites".to_string(),
            DisplayModeConfig::with_boards(&["live_game_board"]),
        );
        config
    }

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(&*payload), "boom");
        let payload: Box<dyn Any + Send> = Box::new(String::from("owned boom"));
        assert_eq!(panic_message(&*payload), "owned boom");
        let payload: Box<dyn Any + Send> = Box::new(42u8);
        assert_eq!(panic_message(&*payload), "unknown panic payload");
    }

    #[tokio::test]
    async fn test_run_cycle_publishes_frame() {
        let source = ScriptedSource::new();
        source.push(
            "football",
            "nfl",
            ScriptedReply::Payload(TestDataBuilder::scoreboard(vec![
                TestDataBuilder::espn_event("1", "in", "2024-01-15T18:00Z", ("2", "BUF"), ("22", "ARI"), Some((7, 3))),
            ])),
        );
        let clock = ManualClock::new(TestDataBuilder::base_time());
        let mut orchestrator = RefreshOrchestrator::new(source.clone(), clock, &config());
        let mut frames = orchestrator.subscribe();
        assert!(frames.borrow().is_none());

        let frame = orchestrator.run_cycle().await;
        assert_eq!(frame.mode, DisplayMode::LiveFavorites);
        assert_eq!(frame.boards, vec!["live_game_board"]);
        assert_eq!(frame.sleep_seconds, 30);
        assert_eq!(frame.pass.kind, PassKind::FullDiscovery);
        assert_eq!(frame.pass.fetch_date, "20240115");
        assert_eq!(frame.games.len(), 1);

        assert!(frames.has_changed().unwrap());
        assert_eq!(frames.borrow_and_update().as_ref(), Some(&frame));
        assert_eq!(orchestrator.state().current_display_mode, DisplayMode::LiveFavorites);
        assert_eq!(source.cache_clears(), 1);
    }

    #[tokio::test]
    async fn test_tick_sleeps_for_selected_interval() {
        let clock = ManualClock::new(TestDataBuilder::base_time());
        let mut orchestrator =
            RefreshOrchestrator::new(ScriptedSource::new(), clock.clone(), &config());

        // No games at 18:30 with a 05:00 check: capped by no_games (900s)
        let slept = orchestrator.tick().await;
        assert_eq!(slept, Duration::from_secs(900));
        assert_eq!(clock.sleeps(), vec![Duration::from_secs(900)]);
        assert!(orchestrator.state().last_data_fetch_time.is_some());
    }
}
