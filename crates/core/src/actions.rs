//! The closed set of mutations accepted by the project store.
//!
//! Actions serialize as `{"type": "ADD_SCENE", "payload": {...}}` with
//! camelCase payload fields. Creation payloads accept an optional caller
//! supplied `id` so the caller can address the new node immediately after
//! dispatch.

use serde::{Deserialize, Serialize};

use crate::project::{AudioTrack, Project};
use crate::types::EntityId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectAction {
    AddProject(AddProject),
    UpdateProject(UpdateProject),
    DeleteProject(DeleteProject),
    AddStory(AddStory),
    UpdateStory(UpdateStory),
    DeleteStory(DeleteStory),
    AddScene(AddScene),
    UpdateScene(UpdateScene),
    DeleteScene(DeleteScene),
    AdjustSceneDurations(AdjustSceneDurations),
    ReorderScenes(ReorderScenes),
    ReorderStories(ReorderStories),
    ImportProjects(ImportProjects),
}

impl ProjectAction {
    /// Wire name of the action, e.g. `"ADD_SCENE"`.
    pub fn name(&self) -> &'static str {
        match self {
            Self::AddProject(_) => "ADD_PROJECT",
            Self::UpdateProject(_) => "UPDATE_PROJECT",
            Self::DeleteProject(_) => "DELETE_PROJECT",
            Self::AddStory(_) => "ADD_STORY",
            Self::UpdateStory(_) => "UPDATE_STORY",
            Self::DeleteStory(_) => "DELETE_STORY",
            Self::AddScene(_) => "ADD_SCENE",
            Self::UpdateScene(_) => "UPDATE_SCENE",
            Self::DeleteScene(_) => "DELETE_SCENE",
            Self::AdjustSceneDurations(_) => "ADJUST_SCENE_DURATIONS",
            Self::ReorderScenes(_) => "REORDER_SCENES",
            Self::ReorderStories(_) => "REORDER_STORIES",
            Self::ImportProjects(_) => "IMPORT_PROJECTS",
        }
    }

    /// Project the action targets, if it targets a single one.
    pub fn project_id(&self) -> Option<&str> {
        match self {
            Self::AddProject(_) | Self::ImportProjects(_) => None,
            Self::UpdateProject(a) => Some(&a.project_id),
            Self::DeleteProject(a) => Some(&a.project_id),
            Self::AddStory(a) => Some(&a.project_id),
            Self::UpdateStory(a) => Some(&a.project_id),
            Self::DeleteStory(a) => Some(&a.project_id),
            Self::AddScene(a) => Some(&a.project_id),
            Self::UpdateScene(a) => Some(&a.project_id),
            Self::DeleteScene(a) => Some(&a.project_id),
            Self::AdjustSceneDurations(a) => Some(&a.project_id),
            Self::ReorderScenes(a) => Some(&a.project_id),
            Self::ReorderStories(a) => Some(&a.project_id),
        }
    }
}

// ---------------------------------------------------------------------------
// Project payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddProject {
    #[serde(default)]
    pub id: Option<EntityId>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProject {
    pub project_id: EntityId,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteProject {
    pub project_id: EntityId,
}

// ---------------------------------------------------------------------------
// Story payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddStory {
    pub project_id: EntityId,
    #[serde(default)]
    pub id: Option<EntityId>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub total_duration: Option<u32>,
    #[serde(default)]
    pub audio_track: Option<AudioTrack>,
}

/// Partial story update. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStory {
    pub project_id: EntityId,
    pub story_id: EntityId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub total_duration: Option<u32>,
    /// Drop the total duration override.
    #[serde(default)]
    pub clear_total_duration: bool,
    #[serde(default)]
    pub audio_track: Option<AudioTrack>,
    /// Detach the audio track.
    #[serde(default)]
    pub remove_audio_track: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteStory {
    pub project_id: EntityId,
    pub story_id: EntityId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderStories {
    pub project_id: EntityId,
    pub story_ids: Vec<EntityId>,
}

// ---------------------------------------------------------------------------
// Scene payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddScene {
    pub project_id: EntityId,
    pub story_id: EntityId,
    #[serde(default)]
    pub id: Option<EntityId>,
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub description: String,
    /// Defaults to [`DEFAULT_SCENE_DURATION_SECS`](crate::project::DEFAULT_SCENE_DURATION_SECS).
    #[serde(default)]
    pub duration_in_seconds: Option<u32>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub audio_url: Option<String>,
}

/// Partial scene update. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateScene {
    pub project_id: EntityId,
    pub story_id: EntityId,
    pub scene_id: EntityId,
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub duration_in_seconds: Option<u32>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub audio_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteScene {
    pub project_id: EntityId,
    pub story_id: EntityId,
    pub scene_id: EntityId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustSceneDurations {
    pub project_id: EntityId,
    pub story_id: EntityId,
    pub scene_id: EntityId,
    pub new_duration: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderScenes {
    pub project_id: EntityId,
    pub story_id: EntityId,
    pub scene_ids: Vec<EntityId>,
}

// ---------------------------------------------------------------------------
// Bulk payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportProjects {
    pub projects: Vec<Project>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_tagged_action() {
        let json = serde_json::json!({
            "type": "REORDER_SCENES",
            "payload": {
                "projectId": "p1",
                "storyId": "s1",
                "sceneIds": ["c", "a", "b"]
            }
        });
        let action: ProjectAction = serde_json::from_value(json).unwrap();
        assert_eq!(action.name(), "REORDER_SCENES");
        assert_eq!(action.project_id(), Some("p1"));
        match action {
            ProjectAction::ReorderScenes(payload) => {
                assert_eq!(payload.scene_ids, vec!["c", "a", "b"]);
            }
            other => panic!("unexpected action {other:?}"),
        }
    }

    #[test]
    fn optional_fields_default() {
        let json = serde_json::json!({
            "type": "ADD_SCENE",
            "payload": {"projectId": "p1", "storyId": "s1", "description": "A door opens"}
        });
        let action: ProjectAction = serde_json::from_value(json).unwrap();
        let ProjectAction::AddScene(payload) = action else {
            panic!("expected ADD_SCENE");
        };
        assert!(payload.id.is_none());
        assert!(payload.duration_in_seconds.is_none());
        assert!(payload.prompt.is_empty());
    }

    #[test]
    fn serialized_name_matches_wire_tag() {
        let action = ProjectAction::DeleteProject(DeleteProject {
            project_id: "p1".to_string(),
        });
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json["type"], action.name());
        assert_eq!(json["payload"]["projectId"], "p1");
    }

    #[test]
    fn unknown_action_type_is_rejected() {
        let json = serde_json::json!({"type": "RENAME_EVERYTHING", "payload": {}});
        assert!(serde_json::from_value::<ProjectAction>(json).is_err());
    }
}
