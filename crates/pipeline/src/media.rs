//! Per-scene media generation.
//!
//! Reads the scene's prompt from the store, calls the generator without
//! holding the store lock, and records the returned URL with an
//! `UPDATE_SCENE` dispatch. A failed call leaves the tree untouched.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use storyline_core::actions::{ProjectAction, UpdateScene};
use storyline_core::error::CoreError;
use storyline_core::project::Scene;
use storyline_events::{event_types, EventBus, StoryEvent};

use crate::error::PipelineError;
use crate::generation::MediaGenerator;
use crate::SharedStore;

/// Which asset to generate for a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
        }
    }
}

/// Identifies a scene in the tree.
#[derive(Debug, Clone, Copy)]
pub struct SceneRef<'a> {
    pub project_id: &'a str,
    pub story_id: &'a str,
    pub scene_id: &'a str,
}

/// Generate an image from the scene prompt and store its URL.
pub async fn generate_scene_image(
    store: &SharedStore,
    generator: &dyn MediaGenerator,
    bus: Option<&Arc<EventBus>>,
    target: SceneRef<'_>,
    service_id: &str,
) -> Result<Scene, PipelineError> {
    let scene = lookup(store, target).await?;
    let prompt = effective_prompt(&scene);

    let result = generator.generate_image(prompt, service_id).await;
    record(store, bus, target, MediaKind::Image, result).await
}

/// Animate the scene's existing image and store the video URL.
///
/// The scene must already have an image.
pub async fn generate_scene_video(
    store: &SharedStore,
    generator: &dyn MediaGenerator,
    bus: Option<&Arc<EventBus>>,
    target: SceneRef<'_>,
    service_id: &str,
) -> Result<Scene, PipelineError> {
    let scene = lookup(store, target).await?;
    let image_url = scene.image_url.as_deref().ok_or_else(|| {
        CoreError::Validation("scene has no image to animate; generate an image first".to_string())
    })?;
    let prompt = effective_prompt(&scene);

    let result = generator.generate_video(image_url, prompt, service_id).await;
    record(store, bus, target, MediaKind::Video, result).await
}

/// The prompt, falling back to the description for scenes without one.
fn effective_prompt(scene: &Scene) -> &str {
    if scene.prompt.trim().is_empty() {
        &scene.description
    } else {
        &scene.prompt
    }
}

async fn lookup(store: &SharedStore, target: SceneRef<'_>) -> Result<Scene, PipelineError> {
    let store = store.lock().await;
    store
        .scene(target.project_id, target.story_id, target.scene_id)
        .cloned()
        .ok_or_else(|| {
            CoreError::NotFound {
                entity: "scene",
                id: target.scene_id.to_string(),
            }
            .into()
        })
}

async fn record(
    store: &SharedStore,
    bus: Option<&Arc<EventBus>>,
    target: SceneRef<'_>,
    kind: MediaKind,
    result: Result<String, crate::generation::GenerationError>,
) -> Result<Scene, PipelineError> {
    let url = match result {
        Ok(url) => url,
        Err(e) => {
            tracing::error!(
                error = %e,
                scene_id = target.scene_id,
                kind = kind.as_str(),
                "Media generation failed"
            );
            if let Some(bus) = bus {
                bus.publish(
                    StoryEvent::new(event_types::SCENE_MEDIA_FAILED)
                        .with_project(target.project_id)
                        .with_story(target.story_id)
                        .with_payload(serde_json::json!({
                            "sceneId": target.scene_id,
                            "kind": kind,
                            "error": e.to_string(),
                        })),
                );
            }
            return Err(e.into());
        }
    };

    let mut update = UpdateScene {
        project_id: target.project_id.to_string(),
        story_id: target.story_id.to_string(),
        scene_id: target.scene_id.to_string(),
        ..Default::default()
    };
    match kind {
        MediaKind::Image => update.image_url = Some(url.clone()),
        MediaKind::Video => update.video_url = Some(url.clone()),
    }

    let scene = {
        let mut store = store.lock().await;
        store.dispatch(ProjectAction::UpdateScene(update));
        store
            .scene(target.project_id, target.story_id, target.scene_id)
            .cloned()
    };
    // The scene may have been deleted while the generator was running.
    let scene = scene.ok_or_else(|| CoreError::NotFound {
        entity: "scene",
        id: target.scene_id.to_string(),
    })?;

    tracing::info!(scene_id = target.scene_id, kind = kind.as_str(), url = %url, "Media generated");
    if let Some(bus) = bus {
        bus.publish(
            StoryEvent::new(event_types::SCENE_MEDIA_GENERATED)
                .with_project(target.project_id)
                .with_story(target.story_id)
                .with_payload(serde_json::json!({
                    "sceneId": target.scene_id,
                    "kind": kind,
                    "url": url,
                })),
        );
    }
    Ok(scene)
}
