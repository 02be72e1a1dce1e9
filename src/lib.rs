//! Scoreboard refresh scheduler library
//!
//! Polls ESPN scoreboards for the configured leagues, classifies the state of
//! every tracked game and decides which display mode an LED scoreboard should
//! show and how long to wait before the next refresh.
//!
//! # Examples
//!
//! ```rust,no_run
//! use nexus_scoreboard::config::Config;
//! use nexus_scoreboard::data_fetcher::EspnClient;
//! use nexus_scoreboard::error::AppError;
//! use nexus_scoreboard::scheduler::{RefreshOrchestrator, SystemClock};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), AppError> {
//!     let config = Config::load().await?;
//!     let source = EspnClient::from_config(&config)?;
//!     let mut orchestrator = RefreshOrchestrator::new(source, SystemClock, &config);
//!
//!     // Run a single pass and inspect the selected mode
//!     let frame = orchestrator.run_cycle().await;
//!     println!("{} -> {:?}, next refresh in {}s", frame.mode, frame.boards, frame.sleep_seconds);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod constants;
pub mod data_fetcher;
pub mod error;
pub mod logging;
pub mod scheduler;
pub mod testing_utils;

// Re-export commonly used types for convenience
pub use config::Config;
pub use data_fetcher::{EspnClient, Game, ScoreboardSource, StatusState};
pub use error::AppError;
pub use scheduler::{
    BoardFrame, DisplayMode, ModeDecision, RefreshOrchestrator, SelectorSettings, select_mode,
};

/// Current version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
