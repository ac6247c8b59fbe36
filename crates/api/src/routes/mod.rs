pub mod events;
pub mod health;
pub mod playback;
pub mod project;
pub mod scene;
pub mod storyboard;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /projects                                                    list (GET)
/// /projects/actions                                            dispatch action (POST)
/// /projects/export                                             download tree (GET)
/// /projects/import                                             replace tree (POST)
/// /projects/{project_id}/storyboard                            batch storyboard (POST)
///
/// /projects/{project_id}/stories/{story_id}/scenes/{scene_id}/image   generate image (POST)
/// /projects/{project_id}/stories/{story_id}/scenes/{scene_id}/video   generate video (POST)
///
/// /projects/{project_id}/stories/{story_id}/timeline           offsets + playhead (GET)
/// /projects/{project_id}/stories/{story_id}/playback/play      start (POST)
/// /projects/{project_id}/stories/{story_id}/playback/pause     pause (POST)
/// /projects/{project_id}/stories/{story_id}/playback/stop      stop and rewind (POST)
/// /projects/{project_id}/stories/{story_id}/playback/seek      seek (POST)
///
/// /storyboard/plan                                             dry-run plan (POST)
///
/// /events                                                      recent events (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest(
            "/projects",
            project::router()
                .merge(storyboard::project_router())
                .merge(scene::router())
                .merge(playback::router()),
        )
        .nest("/storyboard", storyboard::router())
        .nest("/events", events::router())
}
