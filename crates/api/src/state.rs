use std::sync::Arc;

use storyline_db::ProjectArchive;
use storyline_events::{EventBus, EventLog};
use storyline_pipeline::{MediaGenerator, SharedStore, StoryboardPipeline};

use crate::config::ServerConfig;
use crate::playback::PlaybackRegistry;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// Cheaply cloneable: everything is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// The project tree. Every mutation is a dispatch under this lock.
    pub store: SharedStore,
    /// Persistence with save notifications.
    pub archive: Arc<ProjectArchive>,
    /// External image/video generation.
    pub generator: Arc<dyn MediaGenerator>,
    /// Batch storyboard runner sharing `store`.
    pub storyboard: StoryboardPipeline,
    /// One playback session per open story timeline.
    pub playback: Arc<PlaybackRegistry>,
    pub event_bus: Arc<EventBus>,
    /// Recent events, fed by a background subscriber.
    pub event_log: EventLog,
    pub config: Arc<ServerConfig>,
}
