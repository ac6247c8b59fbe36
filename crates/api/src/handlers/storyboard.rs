//! Handlers for text-to-storyboard planning and batch population.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use storyline_core::actions::{DeleteStory, ProjectAction};
use storyline_core::decomposition::{plan_story, DecompositionConfig};
use storyline_pipeline::StoryboardRequest;

use crate::error::AppResult;
use crate::handlers::persist;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for a dry-run plan.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRequest {
    pub description: String,
    pub total_minutes: f64,
    #[serde(default)]
    pub config: DecompositionConfig,
}

// ---------------------------------------------------------------------------
// POST /storyboard/plan
// ---------------------------------------------------------------------------

/// Decompose a description without touching the project tree.
pub async fn plan_storyboard(Json(input): Json<PlanRequest>) -> AppResult<impl IntoResponse> {
    let plan = plan_story(&input.description, input.total_minutes, &input.config)?;
    Ok(Json(DataResponse { data: plan }))
}

// ---------------------------------------------------------------------------
// POST /projects/{project_id}/storyboard
// ---------------------------------------------------------------------------

/// Create a story from a description and fill it in the background.
///
/// Returns 202 with the story id and the full plan as soon as the (empty)
/// story exists; scenes then appear one by one and the tree is saved when
/// the run ends.
pub async fn create_storyboard(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
    Json(input): Json<StoryboardRequest>,
) -> AppResult<impl IntoResponse> {
    let prepared = state.storyboard.prepare(&project_id, input).await?;
    if let Err(e) = persist(&state).await {
        // Drop the empty story so memory matches the file.
        state.store.lock().await.dispatch(ProjectAction::DeleteStory(DeleteStory {
            project_id: prepared.project_id.clone(),
            story_id: prepared.story_id.clone(),
        }));
        return Err(e);
    }

    let pipeline = state.storyboard.clone();
    let run = prepared.clone();
    let background = state.clone();
    tokio::spawn(async move {
        match pipeline.fill(run).await {
            Ok(outcome) => tracing::info!(
                story_id = %outcome.story_id,
                scenes = outcome.scene_ids.len(),
                planned_seconds = outcome.planned_seconds,
                "Storyboard run finished"
            ),
            Err(e) => tracing::warn!(error = %e, "Storyboard run stopped early"),
        }
        if let Err(e) = persist(&background).await {
            tracing::error!(error = %e, "Failed to save storyboard results");
        }
    });

    Ok((StatusCode::ACCEPTED, Json(DataResponse { data: prepared })))
}
