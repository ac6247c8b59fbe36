//! Handler for the recent-event feed.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

const DEFAULT_EVENT_LIMIT: usize = 50;
const MAX_EVENT_LIMIT: usize = 200;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventParams {
    pub limit: Option<usize>,
    pub event_type: Option<String>,
}

// ---------------------------------------------------------------------------
// GET /events
// ---------------------------------------------------------------------------

/// Most recent events, oldest first.
pub async fn list_events(
    State(state): State<AppState>,
    Query(params): Query<EventParams>,
) -> AppResult<impl IntoResponse> {
    let limit = params
        .limit
        .unwrap_or(DEFAULT_EVENT_LIMIT)
        .clamp(1, MAX_EVENT_LIMIT);
    let events = state
        .event_log
        .recent(limit, params.event_type.as_deref())
        .await;
    Ok(Json(DataResponse { data: events }))
}
