//! Single-writer project store.
//!
//! [`ProjectStore`] owns the current project tree and is the only place that
//! replaces it. Every mutation goes through [`ProjectStore::dispatch`],
//! which runs the pure reducer and swaps in the result.

use crate::actions::ProjectAction;
use crate::error::CoreError;
use crate::project::{find_project, find_scene, find_story, Project, Scene, Story};
use crate::reducer::reduce;
use crate::validation::validate_action;

/// Holds the project tree and applies actions to it.
#[derive(Debug, Clone, Default)]
pub struct ProjectStore {
    projects: Vec<Project>,
}

impl ProjectStore {
    pub fn new(projects: Vec<Project>) -> Self {
        Self { projects }
    }

    /// Current tree, in display order.
    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn project(&self, project_id: &str) -> Option<&Project> {
        find_project(&self.projects, project_id)
    }

    pub fn story(&self, project_id: &str, story_id: &str) -> Option<&Story> {
        find_story(&self.projects, project_id, story_id)
    }

    pub fn scene(&self, project_id: &str, story_id: &str, scene_id: &str) -> Option<&Scene> {
        find_scene(&self.projects, project_id, story_id, scene_id)
    }

    /// Apply an action. Returns `true` if the tree changed.
    pub fn dispatch(&mut self, action: ProjectAction) -> bool {
        let name = action.name();
        let next = reduce(&self.projects, action);
        let changed = next != self.projects;

        if changed {
            tracing::debug!(action = name, "Dispatched project action");
            self.projects = next;
        } else {
            tracing::debug!(action = name, "Project action left the tree unchanged");
        }
        changed
    }

    /// Validate user-supplied fields, then dispatch.
    pub fn dispatch_validated(&mut self, action: ProjectAction) -> Result<bool, CoreError> {
        validate_action(&action)?;
        Ok(self.dispatch(action))
    }

    pub fn into_projects(self) -> Vec<Project> {
        self.projects
    }
}
