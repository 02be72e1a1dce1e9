pub mod game_status;
pub mod scoreboard;
pub mod time_formatting;

pub use game_status::{
    determine_status_state, event_state, scoreboard_has_live_games,
    scoreboard_has_starting_games, status_detail,
};
pub use scoreboard::{EventSkip, parse_event, parse_scoreboard};
pub use time_formatting::{format_api_date, parse_event_start};
