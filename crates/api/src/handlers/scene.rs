//! Handlers for per-scene media generation.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use storyline_pipeline::{generate_scene_image, generate_scene_video, MediaKind, SceneRef};

use crate::error::AppResult;
use crate::handlers::persist;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for media generation. An empty object uses the configured
/// service.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateMediaRequest {
    #[serde(default)]
    pub service_id: Option<String>,
}

type ScenePath = Path<(String, String, String)>;

// ---------------------------------------------------------------------------
// POST /projects/{project_id}/stories/{story_id}/scenes/{scene_id}/image
// ---------------------------------------------------------------------------

pub async fn generate_image(
    State(state): State<AppState>,
    Path((project_id, story_id, scene_id)): ScenePath,
    Json(input): Json<GenerateMediaRequest>,
) -> AppResult<impl IntoResponse> {
    let service_id = resolve_service(&state, input);
    let target = SceneRef {
        project_id: &project_id,
        story_id: &story_id,
        scene_id: &scene_id,
    };
    let scene = generate_scene_image(
        &state.store,
        state.generator.as_ref(),
        Some(&state.event_bus),
        target,
        &service_id,
    )
    .await?;

    persist(&state).await?;
    tracing::debug!(scene_id = %scene_id, kind = MediaKind::Image.as_str(), "Stored scene media");
    Ok(Json(DataResponse { data: scene }))
}

// ---------------------------------------------------------------------------
// POST /projects/{project_id}/stories/{story_id}/scenes/{scene_id}/video
// ---------------------------------------------------------------------------

pub async fn generate_video(
    State(state): State<AppState>,
    Path((project_id, story_id, scene_id)): ScenePath,
    Json(input): Json<GenerateMediaRequest>,
) -> AppResult<impl IntoResponse> {
    let service_id = resolve_service(&state, input);
    let target = SceneRef {
        project_id: &project_id,
        story_id: &story_id,
        scene_id: &scene_id,
    };
    let scene = generate_scene_video(
        &state.store,
        state.generator.as_ref(),
        Some(&state.event_bus),
        target,
        &service_id,
    )
    .await?;

    persist(&state).await?;
    tracing::debug!(scene_id = %scene_id, kind = MediaKind::Video.as_str(), "Stored scene media");
    Ok(Json(DataResponse { data: scene }))
}

fn resolve_service(state: &AppState, input: GenerateMediaRequest) -> String {
    input
        .service_id
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| state.config.generation_service_id.clone())
}
