//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the publish/subscribe hub for [`StoryEvent`]s. It is
//! shared via `Arc<EventBus>` between the persistence layer, the storyboard
//! pipeline and the HTTP server.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use storyline_core::types::{EntityId, Timestamp};
use tokio::sync::broadcast;

/// Event type names published on the bus.
pub mod event_types {
    /// The project tree was written by the persistence layer.
    pub const PROJECT_SAVED: &str = "project.saved";
    /// A batch storyboard run appended one scene.
    pub const STORYBOARD_SCENE_ADDED: &str = "storyboard.scene_added";
    /// A batch storyboard run finished.
    pub const STORYBOARD_COMPLETED: &str = "storyboard.completed";
    pub const SCENE_MEDIA_GENERATED: &str = "scene.media_generated";
    pub const SCENE_MEDIA_FAILED: &str = "scene.media_failed";
}

// ---------------------------------------------------------------------------
// StoryEvent
// ---------------------------------------------------------------------------

/// A domain event.
///
/// Constructed via [`StoryEvent::new`] and enriched with
/// [`with_project`](StoryEvent::with_project),
/// [`with_story`](StoryEvent::with_story) and
/// [`with_payload`](StoryEvent::with_payload).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryEvent {
    /// Dot-separated event name, e.g. `"storyboard.completed"`.
    pub event_type: String,
    pub project_id: Option<EntityId>,
    pub story_id: Option<EntityId>,
    /// Free-form JSON payload carrying event-specific data.
    pub payload: serde_json::Value,
    pub timestamp: Timestamp,
}

impl StoryEvent {
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            project_id: None,
            story_id: None,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    pub fn with_project(mut self, project_id: impl Into<EntityId>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    pub fn with_story(mut self, story_id: impl Into<EntityId>) -> Self {
        self.story_id = Some(story_id.into());
        self
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 256;

/// In-process fan-out event bus.
///
/// ```rust
/// use storyline_events::bus::{event_types, EventBus, StoryEvent};
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(StoryEvent::new(event_types::PROJECT_SAVED));
/// ```
pub struct EventBus {
    sender: broadcast::Sender<StoryEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// Slow receivers observe `RecvError::Lagged` once the buffer wraps.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    pub fn publish(&self, event: StoryEvent) {
        tracing::trace!(event_type = %event.event_type, "Publishing event");
        // A send error only means there are no receivers.
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoryEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
