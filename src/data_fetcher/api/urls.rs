//! URL building utilities for API endpoints

/// Builds the scoreboard URL for one league and day.
///
/// # Arguments
/// * `api_domain` - The base API domain, e.g. `https://site.api.espn.com/apis/site/v2/sports`
/// * `sport` - Sport path segment (`football`, `hockey`, ...)
/// * `league` - League path segment (`nfl`, `nhl`, ...)
/// * `date` - The date in YYYYMMDD format
///
/// # Example
/// ```
/// use nexus_scoreboard::data_fetcher::api::build_scoreboard_url;
///
/// let url = build_scoreboard_url("https://api.example.com/sports/", "hockey", "nhl", "20240115");
/// assert_eq!(url, "https://api.example.com/sports/hockey/nhl/scoreboard?dates=20240115");
/// ```
pub fn build_scoreboard_url(api_domain: &str, sport: &str, league: &str, date: &str) -> String {
    let base = api_domain.trim_end_matches('/');
    format!("{base}/{sport}/{league}/scoreboard?dates={date}")
}

/// Single event from the scoreboard endpoint, e.g. `.../nfl/scoreboard/401547665`
pub fn build_game_url(api_domain: &str, sport: &str, league: &str, game_id: &str) -> String {
    let base = api_domain.trim_end_matches('/');
    format!("{base}/{sport}/{league}/scoreboard/{game_id}")
}

/// Team list for one league
pub fn build_teams_url(api_domain: &str, sport: &str, league: &str, limit: u32) -> String {
    let base = api_domain.trim_end_matches('/');
    format!("{base}/{sport}/{league}/teams?limit={limit}")
}

fn url_path(url: &str) -> &str {
    url.split('?').next().unwrap_or(url)
}

/// Whether a URL points at a league scoreboard (all events for a day)
pub fn is_scoreboard_url(url: &str) -> bool {
    url_path(url).ends_with("/scoreboard")
}

/// Whether a URL points at a single event of the scoreboard endpoint
pub fn is_game_url(url: &str) -> bool {
    url_path(url)
        .rsplit_once("/scoreboard/")
        .is_some_and(|(_, game_id)| !game_id.is_empty() && !game_id.contains('/'))
}
