//! Refresh scheduling and display mode state machine

pub mod clock;
pub mod mode;
pub mod orchestrator;
pub mod selector;
pub mod state;

pub use clock::{Clock, SystemClock};
pub use mode::{DisplayMode, GameClass};
pub use orchestrator::{BoardFrame, FailedLeague, PassReport, RefreshOrchestrator, StaleLeague};
pub use selector::{
    GamePartition, ModeDecision, SelectorSettings, next_daily_check, parse_check_time,
    pregame_sleep_seconds, select_mode,
};
pub use state::{LeagueSnapshot, PassKind, SchedulerState};
