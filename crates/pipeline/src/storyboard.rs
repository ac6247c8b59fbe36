//! Batch storyboard population.
//!
//! Plans a story from prose, then creates the story and appends its scenes
//! one dispatch at a time with a fixed pause between scenes, so observers of
//! the store (and the event bus) see the storyboard fill in incrementally.
//! The store lock is never held across a pause.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use storyline_core::actions::{AddScene, AddStory, ProjectAction};
use storyline_core::decomposition::{plan_story, DecompositionConfig, SceneKind, StoryPlan};
use storyline_core::error::CoreError;
use storyline_core::project::AudioTrack;
use storyline_core::types::{id_or_new, new_entity_id, EntityId};
use storyline_core::validation::validate_name;
use storyline_events::{event_types, EventBus, StoryEvent};

use crate::error::PipelineError;
use crate::SharedStore;

/// Default pause between successive scene dispatches.
pub const DEFAULT_STEP_DELAY: Duration = Duration::from_millis(300);

/// Input for one storyboard run.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryboardRequest {
    pub title: String,
    /// Free-form story prose to decompose.
    pub description: String,
    pub total_minutes: f64,
    #[serde(default)]
    pub audio_track: Option<AudioTrack>,
    /// Caller-chosen id for the new story.
    #[serde(default)]
    pub story_id: Option<EntityId>,
    /// Overrides for the decomposition heuristics.
    #[serde(default)]
    pub config: DecompositionConfig,
}

/// A planned story whose container exists but whose scenes are not yet
/// added.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreparedStoryboard {
    pub project_id: EntityId,
    pub story_id: EntityId,
    pub plan: StoryPlan,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryboardOutcome {
    pub project_id: EntityId,
    pub story_id: EntityId,
    pub scene_ids: Vec<EntityId>,
    /// Requested budget in seconds.
    pub total_seconds: u32,
    /// Sum of the created scene durations.
    pub planned_seconds: u32,
}

/// Populates stories in the shared project store.
#[derive(Clone)]
pub struct StoryboardPipeline {
    store: SharedStore,
    event_bus: Option<Arc<EventBus>>,
    step_delay: Duration,
}

impl StoryboardPipeline {
    pub fn new(store: SharedStore) -> Self {
        Self {
            store,
            event_bus: None,
            step_delay: DEFAULT_STEP_DELAY,
        }
    }

    pub fn with_event_bus(mut self, bus: Arc<EventBus>) -> Self {
        self.event_bus = Some(bus);
        self
    }

    pub fn with_step_delay(mut self, delay: Duration) -> Self {
        self.step_delay = delay;
        self
    }

    /// Plan `request` and append the result as a new story of `project_id`.
    ///
    /// Equivalent to [`prepare`](Self::prepare) followed by
    /// [`fill`](Self::fill).
    pub async fn populate(
        &self,
        project_id: &str,
        request: StoryboardRequest,
    ) -> Result<StoryboardOutcome, PipelineError> {
        let prepared = self.prepare(project_id, request).await?;
        self.fill(prepared).await
    }

    /// Validate and plan the request, then create the (empty) story.
    ///
    /// Ids are generated up front so the story can be addressed right away.
    pub async fn prepare(
        &self,
        project_id: &str,
        request: StoryboardRequest,
    ) -> Result<PreparedStoryboard, PipelineError> {
        validate_name("story title", &request.title)?;
        let plan = plan_story(&request.description, request.total_minutes, &request.config)?;
        let story_id = id_or_new(request.story_id);

        let mut store = self.store.lock().await;
        if store.project(project_id).is_none() {
            return Err(CoreError::NotFound {
                entity: "project",
                id: project_id.to_string(),
            }
            .into());
        }
        if store.story(project_id, &story_id).is_some() {
            return Err(CoreError::Conflict(format!("story '{story_id}' already exists")).into());
        }
        store.dispatch(ProjectAction::AddStory(AddStory {
            project_id: project_id.to_string(),
            id: Some(story_id.clone()),
            title: request.title.trim().to_string(),
            description: request.description.trim().to_string(),
            total_duration: Some(plan.total_seconds),
            audio_track: request.audio_track,
        }));

        tracing::info!(
            project_id,
            story_id = %story_id,
            scenes = plan.scenes.len(),
            total_seconds = plan.total_seconds,
            "Prepared storyboard"
        );

        Ok(PreparedStoryboard {
            project_id: project_id.to_string(),
            story_id,
            plan,
        })
    }

    /// Append the planned scenes one dispatch at a time, pausing between
    /// scenes. If the story disappears mid-run the remaining scenes are
    /// skipped and [`PipelineError::Interrupted`] is returned.
    pub async fn fill(
        &self,
        prepared: PreparedStoryboard,
    ) -> Result<StoryboardOutcome, PipelineError> {
        let PreparedStoryboard {
            project_id,
            story_id,
            plan,
        } = prepared;

        let mut scene_ids = Vec::with_capacity(plan.scenes.len());
        for (index, planned) in plan.scenes.iter().enumerate() {
            if index > 0 && !self.step_delay.is_zero() {
                tokio::time::sleep(self.step_delay).await;
            }

            let scene_id = new_entity_id();
            let added = self.store.lock().await.dispatch(ProjectAction::AddScene(AddScene {
                project_id: project_id.clone(),
                story_id: story_id.clone(),
                id: Some(scene_id.clone()),
                prompt: planned.description.clone(),
                description: planned.description.clone(),
                duration_in_seconds: Some(planned.duration_in_seconds),
                ..Default::default()
            }));

            if !added {
                tracing::warn!(
                    project_id = %project_id,
                    story_id = %story_id,
                    added = scene_ids.len(),
                    "Story removed during storyboard run"
                );
                return Err(PipelineError::Interrupted {
                    added: scene_ids.len(),
                    reason: "the story was removed".to_string(),
                });
            }

            self.publish(
                StoryEvent::new(event_types::STORYBOARD_SCENE_ADDED)
                    .with_project(project_id.clone())
                    .with_story(story_id.clone())
                    .with_payload(serde_json::json!({
                        "sceneId": scene_id,
                        "index": index,
                        "durationInSeconds": planned.duration_in_seconds,
                        "filler": planned.kind != SceneKind::Story,
                    })),
            );
            scene_ids.push(scene_id);
        }

        let outcome = StoryboardOutcome {
            project_id: project_id.clone(),
            story_id: story_id.clone(),
            scene_ids,
            total_seconds: plan.total_seconds,
            planned_seconds: plan.planned_seconds(),
        };

        self.publish(
            StoryEvent::new(event_types::STORYBOARD_COMPLETED)
                .with_project(project_id)
                .with_story(story_id)
                .with_payload(serde_json::json!({
                    "sceneCount": outcome.scene_ids.len(),
                    "plannedSeconds": outcome.planned_seconds,
                })),
        );

        Ok(outcome)
    }

    fn publish(&self, event: StoryEvent) {
        if let Some(bus) = &self.event_bus {
            bus.publish(event);
        }
    }
}
