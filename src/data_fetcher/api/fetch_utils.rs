//! Generic HTTP fetching utilities with caching, retry logic, and error handling

use chrono::Utc;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

use super::rate_limit::RequestThrottle;
use super::urls::{is_game_url, is_scoreboard_url};
use crate::constants::{cache_ttl, refresh, retry};
use crate::data_fetcher::cache::{cache_http_response, get_cached_http_response};
use crate::data_fetcher::models::{EspnEvent, ScoreboardResponse, StatusState};
use crate::data_fetcher::processors::{
    event_state, scoreboard_has_live_games, scoreboard_has_starting_games,
};
use crate::error::AppError;

/// Generic fetch function with HTTP caching, throttling, retry logic and typed errors.
///
/// This function:
/// - Checks the HTTP response cache first
/// - Waits on the throttle before going to the network
/// - Retries timeouts, connection failures, 429 and 5xx with exponential backoff
/// - Respects Retry-After headers, capped at `retry::MAX_DELAY_SECONDS`
/// - Caches successful responses with an adaptive TTL
///
/// # Arguments
/// * `client` - HTTP client for making requests
/// * `throttle` - Minimum-interval gate shared by all requests of one source
/// * `url` - URL to fetch data from
#[instrument(skip(client, throttle))]
pub(super) async fn fetch<T: DeserializeOwned>(
    client: &Client,
    throttle: &RequestThrottle,
    url: &str,
) -> Result<T, AppError> {
    if let Some(cached_response) = get_cached_http_response(url).await {
        debug!("Using cached HTTP response for URL: {url}");
        match serde_json::from_str::<T>(&cached_response) {
            Ok(parsed) => return Ok(parsed),
            Err(e) => {
                warn!("Failed to parse cached response for URL {}: {}", url, e);
            }
        }
    }

    throttle.acquire().await;
    info!("Fetching data from URL: {url}");

    let max_retries = retry::MAX_ATTEMPTS;
    let max_delay = Duration::from_secs(retry::MAX_DELAY_SECONDS);
    let mut attempt = 0u32;
    let mut backoff = Duration::from_millis(retry::BASE_DELAY_MS);
    let response = loop {
        match client.get(url).send().await {
            Ok(resp) => {
                let status = resp.status();
                let transient = (status.is_client_error() || status.is_server_error())
                    && map_status_error(
                        status.as_u16(),
                        status.canonical_reason().unwrap_or("Unknown error"),
                        url,
                    )
                    .is_retryable();
                if transient && attempt < max_retries {
                    let retry_after = resp
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|h| h.to_str().ok())
                        .and_then(|s| s.trim().parse::<u64>().ok())
                        .map(Duration::from_secs);
                    let wait = retry_after.unwrap_or(backoff).min(max_delay);
                    warn!(
                        "Transient {} from {}. Retrying in {:?} (attempt {}/{})",
                        status,
                        url,
                        wait,
                        attempt + 1,
                        max_retries
                    );
                    tokio::time::sleep(wait).await;
                    attempt += 1;
                    backoff = backoff.saturating_mul(2).min(max_delay);
                    continue;
                }
                break resp;
            }
            Err(e) => {
                let err = if e.is_timeout() {
                    AppError::network_timeout(url)
                } else if e.is_connect() {
                    AppError::network_connection(url, e.to_string())
                } else {
                    AppError::ApiFetch(e)
                };
                if err.is_retryable() && attempt < max_retries {
                    warn!(
                        "Request error {} for {}. Retrying in {:?} (attempt {}/{})",
                        err,
                        url,
                        backoff,
                        attempt + 1,
                        max_retries
                    );
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                    backoff = backoff.saturating_mul(2).min(max_delay);
                    continue;
                }
                error!("Request failed for URL {}: {}", url, err);
                return Err(err);
            }
        }
    };

    let status = response.status();
    debug!("Response status: {status}");

    if !status.is_success() {
        let status_code = status.as_u16();
        let reason = status.canonical_reason().unwrap_or("Unknown error");
        error!("HTTP {} - {} (URL: {})", status_code, reason, url);
        return Err(map_status_error(status_code, reason, url));
    }

    let response_text = response.text().await.map_err(|e| {
        error!("Failed to read response text from URL {}: {}", url, e);
        AppError::ApiFetch(e)
    })?;
    debug!("Response length: {} bytes", response_text.len());

    match serde_json::from_str::<T>(&response_text) {
        Ok(parsed) => {
            let ttl = response_ttl_seconds(url, &response_text);
            cache_http_response(url.to_string(), response_text, ttl).await;
            Ok(parsed)
        }
        Err(e) => {
            error!("Failed to parse API response: {} (URL: {})", e, url);
            debug!(
                "Response text (first 200 chars): {}",
                response_text.chars().take(200).collect::<String>()
            );
            Err(classify_parse_failure(&response_text, e, url))
        }
    }
}

/// Maps a non-success HTTP status to its typed error
pub(super) fn map_status_error(status_code: u16, reason: &str, url: &str) -> AppError {
    match status_code {
        404 => AppError::api_not_found(url),
        429 => AppError::api_rate_limit(reason, url),
        502 | 503 => AppError::api_service_unavailable(status_code, reason, url),
        400..=499 => AppError::api_client_error(status_code, reason, url),
        _ => AppError::api_server_error(status_code, reason, url),
    }
}

fn classify_parse_failure(body: &str, err: serde_json::Error, url: &str) -> AppError {
    let trimmed = body.trim_start();
    if trimmed.is_empty() {
        AppError::api_no_data("Response body is empty", url)
    } else if !trimmed.starts_with('{') && !trimmed.starts_with('[') {
        AppError::api_malformed_json("Response is not valid JSON", url)
    } else if err.is_syntax() || err.is_eof() {
        AppError::api_malformed_json(err.to_string(), url)
    } else {
        AppError::api_unexpected_structure(err.to_string(), url)
    }
}

/// Cache TTL for a successful body: short while a scoreboard or single event
/// has live or imminent games, longer otherwise
fn response_ttl_seconds(url: &str, body: &str) -> u64 {
    if is_game_url(url) {
        return match serde_json::from_str::<EspnEvent>(body) {
            Ok(event) if event_state(&event) == Some(StatusState::InProgress) => {
                cache_ttl::LIVE_GAMES_SECONDS
            }
            _ => cache_ttl::SCOREBOARD_SECONDS,
        };
    }
    if !is_scoreboard_url(url) {
        return cache_ttl::HTTP_RESPONSE_SECONDS;
    }

    match serde_json::from_str::<ScoreboardResponse>(body) {
        Ok(scoreboard) if scoreboard_has_live_games(&scoreboard) => {
            debug!("Live games detected in response from {}, using short cache TTL", url);
            cache_ttl::LIVE_GAMES_SECONDS
        }
        Ok(scoreboard)
            if scoreboard_has_starting_games(
                &scoreboard,
                Utc::now(),
                refresh::PREGAME_NEAR_WINDOW_SECONDS,
            ) =>
        {
            cache_ttl::STARTING_GAMES_SECONDS
        }
        _ => cache_ttl::SCOREBOARD_SECONDS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_fetcher::api::http_client::create_test_http_client;
    use crate::data_fetcher::cache::clear_http_response_cache;
    use serial_test::serial;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_map_status_error() {
        assert!(matches!(
            map_status_error(404, "Not Found", "u"),
            AppError::ApiNotFound { .. }
        ));
        assert!(matches!(
            map_status_error(429, "Too Many Requests", "u"),
            AppError::ApiRateLimit { .. }
        ));
        assert!(matches!(
            map_status_error(403, "Forbidden", "u"),
            AppError::ApiClientError { status: 403, .. }
        ));
        assert!(matches!(
            map_status_error(503, "Service Unavailable", "u"),
            AppError::ApiServiceUnavailable { status: 503, .. }
        ));
        assert!(matches!(
            map_status_error(500, "Internal Server Error", "u"),
            AppError::ApiServerError { status: 500, .. }
        ));
    }

    #[test]
    fn test_response_ttl_seconds() {
        let live = r#"{"events":[{"id":"1","status":{"type":{"state":"in"}}}]}"#;
        let done = r#"{"events":[{"id":"1","status":{"type":{"state":"post"}}}]}"#;
        let url = "https://x/football/nfl/scoreboard?dates=20240115";

        assert_eq!(response_ttl_seconds(url, live), cache_ttl::LIVE_GAMES_SECONDS);
        assert_eq!(response_ttl_seconds(url, done), cache_ttl::SCOREBOARD_SECONDS);
        assert_eq!(
            response_ttl_seconds("https://x/football/nfl/teams?limit=1000", live),
            cache_ttl::HTTP_RESPONSE_SECONDS
        );

        let live_event = r#"{"id":"1","status":{"type":{"state":"in"}}}"#;
        let final_event = r#"{"id":"1","status":{"type":{"state":"post"}}}"#;
        let game_url = "https://x/football/nfl/scoreboard/1";
        assert_eq!(response_ttl_seconds(game_url, live_event), cache_ttl::LIVE_GAMES_SECONDS);
        assert_eq!(response_ttl_seconds(game_url, final_event), cache_ttl::SCOREBOARD_SECONDS);
    }

    #[test]
    fn test_classify_parse_failure() {
        let err = serde_json::from_str::<ScoreboardResponse>("").unwrap_err();
        assert!(matches!(
            classify_parse_failure("", err, "u"),
            AppError::ApiNoData { .. }
        ));

        let err = serde_json::from_str::<ScoreboardResponse>("<html>").unwrap_err();
        assert!(matches!(
            classify_parse_failure("<html>", err, "u"),
            AppError::ApiMalformedJson { .. }
        ));

        let body = r#"{"events": 5}"#;
        let err = serde_json::from_str::<ScoreboardResponse>(body).unwrap_err();
        assert!(matches!(
            classify_parse_failure(body, err, "u"),
            AppError::ApiUnexpectedStructure { .. }
        ));
    }

    #[tokio::test]
    #[serial]
    async fn test_fetch_caches_successful_response() {
        clear_http_response_cache().await;
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/football/nfl/scoreboard"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"events":[]}"#))
            .expect(1)
            .mount(&server)
            .await;

        let client = create_test_http_client();
        let throttle = RequestThrottle::new(Duration::ZERO);
        let url = format!("{}/football/nfl/scoreboard?dates=20240115", server.uri());

        let first: ScoreboardResponse = fetch(&client, &throttle, &url).await.unwrap();
        let second: ScoreboardResponse = fetch(&client, &throttle, &url).await.unwrap();
        assert!(first.events.is_empty());
        assert!(second.events.is_empty());

        clear_http_response_cache().await;
    }

    #[tokio::test]
    #[serial]
    async fn test_fetch_does_not_retry_client_errors() {
        clear_http_response_cache().await;
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let client = create_test_http_client();
        let throttle = RequestThrottle::new(Duration::ZERO);
        let url = format!("{}/football/xfl/scoreboard?dates=20240115", server.uri());

        let result = fetch::<ScoreboardResponse>(&client, &throttle, &url).await;
        assert!(matches!(result, Err(AppError::ApiNotFound { .. })));
    }

    #[tokio::test]
    #[serial]
    async fn test_fetch_retries_rate_limit_but_not_forbidden() {
        clear_http_response_cache().await;
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/hockey/nhl/scoreboard"))
            .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "0"))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/hockey/nhl/scoreboard"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"events":[]}"#))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/hockey/khl/scoreboard"))
            .respond_with(ResponseTemplate::new(403))
            .expect(1)
            .mount(&server)
            .await;

        let client = create_test_http_client();
        let throttle = RequestThrottle::new(Duration::ZERO);

        let url = format!("{}/hockey/nhl/scoreboard?dates=20240115", server.uri());
        let recovered = fetch::<ScoreboardResponse>(&client, &throttle, &url).await;
        assert!(recovered.is_ok());

        let url = format!("{}/hockey/khl/scoreboard?dates=20240115", server.uri());
        let forbidden = fetch::<ScoreboardResponse>(&client, &throttle, &url).await;
        assert!(matches!(
            forbidden,
            Err(AppError::ApiClientError { status: 403, .. })
        ));

        clear_http_response_cache().await;
    }
}
