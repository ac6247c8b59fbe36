//! Handlers for story timelines and transport controls.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use storyline_core::timeline::{schedule_scenes, PlaybackSnapshot, ScheduledScene};

use crate::error::{AppError, AppResult};
use crate::handlers::load_story;
use crate::playback::PlaybackCommand;
use crate::response::DataResponse;
use crate::state::AppState;

type StoryPath = Path<(String, String)>;

/// A story's scenes placed on the timeline plus the playhead.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineResponse {
    pub project_id: String,
    pub story_id: String,
    pub scenes: Vec<ScheduledScene>,
    pub playback: PlaybackSnapshot,
}

#[derive(Debug, Deserialize)]
pub struct SeekRequest {
    /// Target playhead position in seconds.
    pub time: f64,
}

// ---------------------------------------------------------------------------
// GET /projects/{project_id}/stories/{story_id}/timeline
// ---------------------------------------------------------------------------

pub async fn get_timeline(
    State(state): State<AppState>,
    Path((project_id, story_id)): StoryPath,
) -> AppResult<impl IntoResponse> {
    let story = load_story(&state, &project_id, &story_id).await?;
    let playback = state.playback.snapshot(&project_id, &story).await;

    Ok(Json(DataResponse {
        data: TimelineResponse {
            project_id,
            story_id,
            scenes: schedule_scenes(&story.scenes),
            playback,
        },
    }))
}

// ---------------------------------------------------------------------------
// POST /projects/{project_id}/stories/{story_id}/playback/*
// ---------------------------------------------------------------------------

pub async fn play(state: State<AppState>, path: StoryPath) -> AppResult<impl IntoResponse> {
    run_command(state, path, PlaybackCommand::Play).await
}

pub async fn pause(state: State<AppState>, path: StoryPath) -> AppResult<impl IntoResponse> {
    run_command(state, path, PlaybackCommand::Pause).await
}

pub async fn stop(state: State<AppState>, path: StoryPath) -> AppResult<impl IntoResponse> {
    run_command(state, path, PlaybackCommand::Stop).await
}

pub async fn seek(
    state: State<AppState>,
    path: StoryPath,
    Json(input): Json<SeekRequest>,
) -> AppResult<impl IntoResponse> {
    if !input.time.is_finite() {
        return Err(AppError::BadRequest("time must be a finite number".into()));
    }
    run_command(state, path, PlaybackCommand::Seek(input.time)).await
}

async fn run_command(
    State(state): State<AppState>,
    Path((project_id, story_id)): StoryPath,
    command: PlaybackCommand,
) -> AppResult<Json<DataResponse<PlaybackSnapshot>>> {
    let story = load_story(&state, &project_id, &story_id).await?;
    let snapshot = state.playback.command(&project_id, &story, command).await;
    tracing::debug!(
        project_id = %project_id,
        story_id = %story_id,
        ?command,
        current_time = snapshot.current_time,
        "Playback command"
    );
    Ok(Json(DataResponse { data: snapshot }))
}
