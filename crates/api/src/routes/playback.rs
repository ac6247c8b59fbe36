//! Route definitions for timelines and playback, merged into `/projects`.
//!
//! ```text
//! GET    /{project_id}/stories/{story_id}/timeline
//! POST   /{project_id}/stories/{story_id}/playback/{play,pause,stop,seek}
//! ```

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::playback;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    let prefix = "/{project_id}/stories/{story_id}";
    Router::new()
        .route(&format!("{prefix}/timeline"), get(playback::get_timeline))
        .route(&format!("{prefix}/playback/play"), post(playback::play))
        .route(&format!("{prefix}/playback/pause"), post(playback::pause))
        .route(&format!("{prefix}/playback/stop"), post(playback::stop))
        .route(&format!("{prefix}/playback/seek"), post(playback::seek))
}
