//! Input validation applied before an action reaches the store.
//!
//! The reducer itself never fails; user-facing checks (blank names, zero
//! durations, oversized text) happen here so the caller can report them.

use std::collections::HashSet;

use crate::actions::ProjectAction;
use crate::error::CoreError;
use crate::project::{Project, MIN_SCENE_DURATION_SECS};

/// Maximum length of a project name or story title in characters.
pub const MAX_NAME_LENGTH: usize = 200;

/// Maximum length of a description or prompt in characters.
pub const MAX_TEXT_LENGTH: usize = 10_000;

/// Maximum duration of a single scene in seconds.
pub const MAX_SCENE_DURATION_SECS: u32 = 3_600;

/// Validate a required, length-limited name field.
pub fn validate_name(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} must not be empty")));
    }
    if value.chars().count() > MAX_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "{field} exceeds maximum length of {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate an optional free-text field (may be empty).
pub fn validate_text(field: &str, value: &str) -> Result<(), CoreError> {
    if value.chars().count() > MAX_TEXT_LENGTH {
        return Err(CoreError::Validation(format!(
            "{field} exceeds maximum length of {MAX_TEXT_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate a required free-text field.
pub fn validate_required_text(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} must not be empty")));
    }
    validate_text(field, value)
}

/// Validate a scene duration in seconds.
pub fn validate_duration(duration: u32) -> Result<(), CoreError> {
    if !(MIN_SCENE_DURATION_SECS..=MAX_SCENE_DURATION_SECS).contains(&duration) {
        return Err(CoreError::Validation(format!(
            "duration must be between {MIN_SCENE_DURATION_SECS} and {MAX_SCENE_DURATION_SECS} seconds, got {duration}"
        )));
    }
    Ok(())
}

/// Validate a whole project tree entering from outside (file load, import).
///
/// Ids must be unique among projects, among the stories of a project and
/// among the scenes of a story. Names and titles must be present and every
/// scene must last at least [`MIN_SCENE_DURATION_SECS`].
pub fn validate_projects(projects: &[Project]) -> Result<(), CoreError> {
    let mut project_ids = HashSet::new();
    for project in projects {
        if !project_ids.insert(project.id.as_str()) {
            return Err(CoreError::Conflict(format!(
                "duplicate project id '{}'",
                project.id
            )));
        }
        validate_name("project name", &project.name)?;

        let mut story_ids = HashSet::new();
        for story in &project.stories {
            if !story_ids.insert(story.id.as_str()) {
                return Err(CoreError::Conflict(format!(
                    "duplicate story id '{}' in project '{}'",
                    story.id, project.id
                )));
            }
            validate_name("story title", &story.title)?;

            let mut scene_ids = HashSet::new();
            for scene in &story.scenes {
                if !scene_ids.insert(scene.id.as_str()) {
                    return Err(CoreError::Conflict(format!(
                        "duplicate scene id '{}' in story '{}'",
                        scene.id, story.id
                    )));
                }
                // Only the lower bound: rebalancing may legitimately push a
                // scene past the per-edit maximum.
                if scene.duration_in_seconds < MIN_SCENE_DURATION_SECS {
                    return Err(CoreError::Validation(format!(
                        "scene '{}' must last at least {MIN_SCENE_DURATION_SECS} second(s), got {}",
                        scene.id, scene.duration_in_seconds
                    )));
                }
            }
        }
    }
    Ok(())
}

/// Validate the user-supplied fields of an action.
///
/// Id references are not checked here: unknown ids are absorbed by the
/// reducer as no-ops.
pub fn validate_action(action: &ProjectAction) -> Result<(), CoreError> {
    match action {
        ProjectAction::AddProject(a) => validate_name("project name", &a.name),
        ProjectAction::UpdateProject(a) => match &a.name {
            Some(name) => validate_name("project name", name),
            None => Ok(()),
        },
        ProjectAction::AddStory(a) => {
            validate_name("story title", &a.title)?;
            validate_text("story description", &a.description)?;
            if let Some(total) = a.total_duration {
                validate_duration(total)?;
            }
            Ok(())
        }
        ProjectAction::UpdateStory(a) => {
            if let Some(title) = &a.title {
                validate_name("story title", title)?;
            }
            if let Some(description) = &a.description {
                validate_text("story description", description)?;
            }
            if let Some(total) = a.total_duration {
                validate_duration(total)?;
            }
            Ok(())
        }
        ProjectAction::AddScene(a) => {
            if a.description.trim().is_empty() && a.prompt.trim().is_empty() {
                return Err(CoreError::Validation(
                    "scene needs a description or a prompt".to_string(),
                ));
            }
            validate_text("scene description", &a.description)?;
            validate_text("scene prompt", &a.prompt)?;
            if let Some(duration) = a.duration_in_seconds {
                validate_duration(duration)?;
            }
            Ok(())
        }
        ProjectAction::UpdateScene(a) => {
            if let Some(description) = &a.description {
                validate_text("scene description", description)?;
            }
            if let Some(prompt) = &a.prompt {
                validate_text("scene prompt", prompt)?;
            }
            if let Some(duration) = a.duration_in_seconds {
                validate_duration(duration)?;
            }
            Ok(())
        }
        ProjectAction::AdjustSceneDurations(a) => validate_duration(a.new_duration),
        ProjectAction::ImportProjects(a) => validate_projects(&a.projects),
        ProjectAction::DeleteProject(_)
        | ProjectAction::DeleteStory(_)
        | ProjectAction::DeleteScene(_)
        | ProjectAction::ReorderScenes(_)
        | ProjectAction::ReorderStories(_) => Ok(()),
    }
}
