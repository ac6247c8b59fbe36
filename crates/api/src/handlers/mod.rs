pub mod events;
pub mod playback;
pub mod project;
pub mod scene;
pub mod storyboard;

use storyline_core::actions::ProjectAction;
use storyline_core::error::CoreError;
use storyline_core::project::{Project, Story};

use crate::error::AppResult;
use crate::state::AppState;

/// Write the current tree through the archive.
///
/// The store lock is held for the duration of the write so saves land in
/// dispatch order.
pub(crate) async fn persist(state: &AppState) -> AppResult<()> {
    let store = state.store.lock().await;
    state.archive.save_projects(store.projects()).await?;
    Ok(())
}

/// Validate, dispatch and save `action` as one step.
///
/// The store lock is held across the save. If the write fails the store is
/// put back as it was, so memory never holds edits the file does not.
/// Returns whether the tree changed and the resulting tree.
pub(crate) async fn commit_action(
    state: &AppState,
    action: ProjectAction,
) -> AppResult<(bool, Vec<Project>)> {
    let mut store = state.store.lock().await;
    let previous = store.clone();
    if !store.dispatch_validated(action)? {
        return Ok((false, store.projects().to_vec()));
    }

    if let Err(e) = state.archive.save_projects(store.projects()).await {
        tracing::warn!(error = %e, "Save failed, reverting project tree");
        *store = previous;
        return Err(e.into());
    }
    Ok((true, store.projects().to_vec()))
}

/// Clone a story out of the store, or fail with 404.
pub(crate) async fn load_story(
    state: &AppState,
    project_id: &str,
    story_id: &str,
) -> AppResult<Story> {
    let store = state.store.lock().await;
    if store.project(project_id).is_none() {
        return Err(CoreError::NotFound {
            entity: "project",
            id: project_id.to_string(),
        }
        .into());
    }
    store.story(project_id, story_id).cloned().ok_or_else(|| {
        CoreError::NotFound {
            entity: "story",
            id: story_id.to_string(),
        }
        .into()
    })
}
