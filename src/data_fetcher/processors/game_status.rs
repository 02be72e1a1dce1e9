use crate::data_fetcher::models::{EspnEvent, EspnStatus, ScoreboardResponse, StatusState};
use chrono::{DateTime, Utc};

use super::time_formatting::parse_event_start;

/// Determines the lifecycle state of an ESPN event status.
///
/// `status.type.state` is authoritative (`pre`, `in`, `post`; `in_progress` is
/// accepted as an alias). When it is missing or unknown the numeric
/// `status.type.id` is used instead (`1` scheduled, `2` in progress, `3` final).
///
/// # Returns
///
/// `None` when neither field identifies a known state.
///
/// # Examples
///
/// ```rust
/// use nexus_scoreboard::data_fetcher::models::{EspnStatus, EspnStatusType, StatusState};
/// use nexus_scoreboard::data_fetcher::processors::determine_status_state;
///
/// let status = EspnStatus {
///     status_type: Some(EspnStatusType {
///         state: Some("in".to_string()),
///         ..Default::default()
///     }),
///     ..Default::default()
/// };
/// assert_eq!(determine_status_state(&status), Some(StatusState::InProgress));
/// ```
pub fn determine_status_state(status: &EspnStatus) -> Option<StatusState> {
    let status_type = status.status_type.as_ref()?;

    let from_state = status_type
        .state
        .as_deref()
        .map(|s| s.trim().to_ascii_lowercase())
        .and_then(|state| match state.as_str() {
            "pre" => Some(StatusState::Pre),
            "in" | "in_progress" => Some(StatusState::InProgress),
            "post" => Some(StatusState::Post),
            _ => None,
        });

    from_state.or_else(|| match status_type.id.as_deref().map(str::trim) {
        Some("1") => Some(StatusState::Pre),
        Some("2") => Some(StatusState::InProgress),
        Some("3") => Some(StatusState::Post),
        _ => None,
    })
}

/// Human readable status line, e.g. `Q3 - 4:12` or `Final/OT`
pub fn status_detail(status: &EspnStatus) -> String {
    status
        .status_type
        .as_ref()
        .and_then(|t| {
            t.short_detail
                .clone()
                .or_else(|| t.detail.clone())
                .or_else(|| t.description.clone())
        })
        .unwrap_or_default()
}

/// Lifecycle state of a single event, `None` when it cannot be classified
pub fn event_state(event: &EspnEvent) -> Option<StatusState> {
    event.effective_status().and_then(determine_status_state)
}

/// Whether any event in the payload is currently being played
pub fn scoreboard_has_live_games(response: &ScoreboardResponse) -> bool {
    response
        .events
        .iter()
        .any(|event| event_state(event) == Some(StatusState::InProgress))
}

/// Whether a scheduled event starts within `window_seconds` of `now`, or should
/// already have started
pub fn scoreboard_has_starting_games(
    response: &ScoreboardResponse,
    now: DateTime<Utc>,
    window_seconds: i64,
) -> bool {
    response.events.iter().any(|event| {
        if event_state(event) != Some(StatusState::Pre) {
            return false;
        }
        event
            .date
            .as_deref()
            .and_then(|date| parse_event_start(date).ok())
            .is_some_and(|start| (start - now).num_seconds() <= window_seconds)
    })
}
