//! Persistence facade with save notifications.
//!
//! [`ProjectArchive`] wraps a [`ProjectRepository`] and notifies interested
//! parties after each successful save: registered callbacks are invoked
//! synchronously, and a `project.saved` event goes out on the bus when one
//! is attached.

use std::sync::{Arc, RwLock};

use storyline_core::interchange;
use storyline_core::project::Project;
use storyline_events::{event_types, EventBus, StoryEvent};

use crate::error::DbError;
use crate::repositories::ProjectRepository;

/// Callback invoked with the saved tree.
pub type SaveCallback = Arc<dyn Fn(&[Project]) + Send + Sync>;

/// Handle returned by [`ProjectArchive::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Default)]
struct Subscribers {
    next_id: u64,
    callbacks: Vec<(SubscriptionId, SaveCallback)>,
}

/// Loads, saves, imports and exports the project tree.
pub struct ProjectArchive {
    repo: Arc<dyn ProjectRepository>,
    subscribers: RwLock<Subscribers>,
    event_bus: Option<Arc<EventBus>>,
}

impl ProjectArchive {
    pub fn new(repo: Arc<dyn ProjectRepository>) -> Self {
        Self {
            repo,
            subscribers: RwLock::new(Subscribers::default()),
            event_bus: None,
        }
    }

    pub fn with_event_bus(mut self, bus: Arc<EventBus>) -> Self {
        self.event_bus = Some(bus);
        self
    }

    pub async fn load_projects(&self) -> Result<Vec<Project>, DbError> {
        self.repo.load().await
    }

    /// Persist the tree, then notify subscribers. Nothing is notified when
    /// the write fails.
    pub async fn save_projects(&self, projects: &[Project]) -> Result<(), DbError> {
        self.repo.save(projects).await?;

        // Clone out of the lock so callbacks may subscribe or unsubscribe.
        let callbacks: Vec<SaveCallback> = self
            .subscribers
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .callbacks
            .iter()
            .map(|(_, cb)| Arc::clone(cb))
            .collect();
        for callback in &callbacks {
            callback(projects);
        }

        if let Some(bus) = &self.event_bus {
            bus.publish(
                StoryEvent::new(event_types::PROJECT_SAVED)
                    .with_payload(serde_json::json!({ "projectCount": projects.len() })),
            );
        }

        tracing::info!(
            projects = projects.len(),
            subscribers = callbacks.len(),
            "Project tree saved"
        );
        Ok(())
    }

    /// Serialize the stored tree in the interchange format.
    pub async fn export_projects(&self) -> Result<String, DbError> {
        let projects = self.repo.load().await?;
        Ok(interchange::export_projects(&projects)?)
    }

    /// Parse an interchange document. The result is not persisted; callers
    /// dispatch it through the store and save.
    pub fn import_projects(&self, json: &str) -> Result<Vec<Project>, DbError> {
        Ok(interchange::import_projects(json)?)
    }

    /// Register a callback run after every successful save.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&[Project]) + Send + Sync + 'static,
    {
        let mut subs = self
            .subscribers
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let id = SubscriptionId(subs.next_id);
        subs.next_id += 1;
        subs.callbacks.push((id, Arc::new(callback)));
        id
    }

    /// Remove a callback. Returns `false` if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subs = self
            .subscribers
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let before = subs.callbacks.len();
        subs.callbacks.retain(|(sid, _)| *sid != id);
        subs.callbacks.len() != before
    }
}
