//! Project tree data model.
//!
//! A [`Project`] holds an ordered list of [`Story`] containers, each of which
//! holds an ordered list of timed [`Scene`] shots. List order is display and
//! timeline order. All fields serialize in camelCase with ISO-8601
//! timestamps, which is also the import/export wire format.

use serde::{Deserialize, Serialize};

use crate::types::{EntityId, Timestamp};

/// Smallest duration a scene may have, in seconds.
pub const MIN_SCENE_DURATION_SECS: u32 = 1;

/// Default duration for a manually added scene.
pub const DEFAULT_SCENE_DURATION_SECS: u32 = 5;

/// Top-level container for one piece of user work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub stories: Vec<Story>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Audio reference played against a story's timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioTrack {
    pub url: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_in_seconds: Option<f64>,
}

/// A scene container: an ordered group of shots forming one narrative beat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    pub id: EntityId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub scenes: Vec<Scene>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    /// Nominal length overriding the sum of scene durations when rebalancing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_track: Option<AudioTrack>,
}

/// One timed visual unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub id: EntityId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub description: String,
    pub duration_in_seconds: u32,
}

impl Project {
    pub fn story(&self, story_id: &str) -> Option<&Story> {
        self.stories.iter().find(|s| s.id == story_id)
    }

    pub fn scene_count(&self) -> usize {
        self.stories.iter().map(|s| s.scenes.len()).sum()
    }
}

impl Story {
    pub fn scene(&self, scene_id: &str) -> Option<&Scene> {
        self.scenes.iter().find(|s| s.id == scene_id)
    }

    /// Sum of the scene durations in seconds.
    pub fn scenes_duration(&self) -> u32 {
        self.scenes.iter().map(|s| s.duration_in_seconds).sum()
    }

    /// The override total when set, otherwise the sum of scene durations.
    pub fn nominal_duration(&self) -> u32 {
        self.total_duration.unwrap_or_else(|| self.scenes_duration())
    }
}

/// Find a project by id in a project list.
pub fn find_project<'a>(projects: &'a [Project], project_id: &str) -> Option<&'a Project> {
    projects.iter().find(|p| p.id == project_id)
}

/// Find a story by project and story id.
pub fn find_story<'a>(
    projects: &'a [Project],
    project_id: &str,
    story_id: &str,
) -> Option<&'a Story> {
    find_project(projects, project_id).and_then(|p| p.story(story_id))
}

/// Find a scene by project, story and scene id.
pub fn find_scene<'a>(
    projects: &'a [Project],
    project_id: &str,
    story_id: &str,
    scene_id: &str,
) -> Option<&'a Scene> {
    find_story(projects, project_id, story_id).and_then(|s| s.scene(scene_id))
}
