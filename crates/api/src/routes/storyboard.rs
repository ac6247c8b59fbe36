//! Route definitions for storyboard planning and population.
//!
//! ```text
//! POST   /storyboard/plan                  plan_storyboard
//! POST   /projects/{project_id}/storyboard create_storyboard
//! ```

use axum::routing::post;
use axum::Router;

use crate::handlers::storyboard;
use crate::state::AppState;

/// Planning routes -- mounted at `/storyboard`.
pub fn router() -> Router<AppState> {
    Router::new().route("/plan", post(storyboard::plan_storyboard))
}

/// Batch population -- merged into `/projects`.
pub fn project_router() -> Router<AppState> {
    Router::new().route(
        "/{project_id}/storyboard",
        post(storyboard::create_storyboard),
    )
}
