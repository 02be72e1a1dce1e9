pub mod api;
pub mod cache;
pub mod models;
pub mod processors;
pub mod source;

pub use api::EspnClient;
pub use models::{FavoriteTeams, Game, LeagueTarget, ScoreboardResponse, StatusState};
pub use processors::parse_scoreboard;
pub use source::ScoreboardSource;
