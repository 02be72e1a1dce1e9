pub mod client;
mod fetch_utils;
pub mod http_client;
pub mod rate_limit;
pub mod urls;

pub use client::EspnClient;
pub use http_client::create_http_client_with_timeout;
pub use rate_limit::RequestThrottle;
pub use urls::{
    build_game_url, build_scoreboard_url, build_teams_url, is_game_url, is_scoreboard_url,
};
