//! Route definitions for the project tree.
//!
//! ```text
//! GET    /            list_projects
//! POST   /actions     dispatch_action
//! GET    /export      export_projects
//! POST   /import      import_projects
//! ```

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::project;
use crate::state::AppState;

/// Project routes -- mounted at `/projects`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(project::list_projects))
        .route("/actions", post(project::dispatch_action))
        .route("/export", get(project::export_projects))
        .route("/import", post(project::import_projects))
}
