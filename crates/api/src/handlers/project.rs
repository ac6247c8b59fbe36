//! Handlers for the project tree: listing, action dispatch and
//! import/export.

use axum::extract::State;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use storyline_core::actions::{ImportProjects, ProjectAction};
use storyline_core::project::Project;

use crate::error::AppResult;
use crate::handlers::commit_action;
use crate::response::DataResponse;
use crate::state::AppState;

/// Result of dispatching one action.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchResponse {
    /// `false` when the action targeted missing ids and was absorbed.
    pub changed: bool,
    pub projects: Vec<Project>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResponse {
    pub project_count: usize,
}

// ---------------------------------------------------------------------------
// GET /projects
// ---------------------------------------------------------------------------

pub async fn list_projects(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let projects = state.store.lock().await.projects().to_vec();
    Ok(Json(DataResponse { data: projects }))
}

// ---------------------------------------------------------------------------
// POST /projects/actions
// ---------------------------------------------------------------------------

/// Validate and dispatch a tagged action, persisting the tree if it changed.
pub async fn dispatch_action(
    State(state): State<AppState>,
    Json(action): Json<ProjectAction>,
) -> AppResult<impl IntoResponse> {
    let name = action.name();
    let (changed, projects) = commit_action(&state, action).await?;

    if changed {
        state.playback.retain_existing(&projects).await;
    }
    tracing::info!(action = name, changed, "Handled project action");

    Ok(Json(DataResponse {
        data: DispatchResponse { changed, projects },
    }))
}

// ---------------------------------------------------------------------------
// GET /projects/export
// ---------------------------------------------------------------------------

/// Download the persisted tree as a JSON file.
pub async fn export_projects(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let json = state.archive.export_projects().await?;
    Ok((
        [
            (CONTENT_TYPE, "application/json"),
            (CONTENT_DISPOSITION, "attachment; filename=\"projects.json\""),
        ],
        json,
    ))
}

// ---------------------------------------------------------------------------
// POST /projects/import
// ---------------------------------------------------------------------------

/// Replace the whole tree with an exported document.
pub async fn import_projects(
    State(state): State<AppState>,
    body: String,
) -> AppResult<impl IntoResponse> {
    let projects = state.archive.import_projects(&body)?;
    let project_count = projects.len();

    let (_, current) = commit_action(
        &state,
        ProjectAction::ImportProjects(ImportProjects { projects }),
    )
    .await?;
    state.playback.retain_existing(&current).await;

    tracing::info!(project_count, "Imported projects");
    Ok(Json(DataResponse {
        data: ImportResponse { project_count },
    }))
}
