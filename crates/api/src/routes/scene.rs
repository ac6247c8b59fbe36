//! Route definitions for scene media generation, merged into `/projects`.

use axum::routing::post;
use axum::Router;

use crate::handlers::scene;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{project_id}/stories/{story_id}/scenes/{scene_id}/image",
            post(scene::generate_image),
        )
        .route(
            "/{project_id}/stories/{story_id}/scenes/{scene_id}/video",
            post(scene::generate_video),
        )
}
