//! Recent-event log.
//!
//! [`EventLog`] subscribes to the [`EventBus`](crate::bus::EventBus) and
//! keeps the last N events in memory. It runs as a background task and
//! exits when the bus is dropped.

use std::collections::VecDeque;
use std::sync::Arc;

use tokio::sync::{broadcast, RwLock};

use crate::bus::StoryEvent;

/// Default number of events retained.
pub const DEFAULT_LOG_CAPACITY: usize = 200;

/// Bounded in-memory log of recent events, newest last.
#[derive(Clone)]
pub struct EventLog {
    events: Arc<RwLock<VecDeque<StoryEvent>>>,
    capacity: usize,
}

impl EventLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            events: Arc::new(RwLock::new(VecDeque::with_capacity(capacity))),
            capacity: capacity.max(1),
        }
    }

    /// Run the collection loop until the channel closes.
    pub async fn run(self, mut receiver: broadcast::Receiver<StoryEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => self.push(event).await,
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Event log lagged, some events were dropped");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, event log shutting down");
                    break;
                }
            }
        }
    }

    pub async fn push(&self, event: StoryEvent) {
        let mut events = self.events.write().await;
        if events.len() == self.capacity {
            events.pop_front();
        }
        events.push_back(event);
    }

    /// Up to `limit` most recent events, oldest first. `event_type` filters
    /// by exact name.
    pub async fn recent(&self, limit: usize, event_type: Option<&str>) -> Vec<StoryEvent> {
        let events = self.events.read().await;
        let mut matching: Vec<StoryEvent> = events
            .iter()
            .rev()
            .filter(|e| event_type.map_or(true, |t| e.event_type == t))
            .take(limit)
            .cloned()
            .collect();
        matching.reverse();
        matching
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::{event_types, EventBus};

    #[tokio::test]
    async fn oldest_events_are_evicted() {
        let log = EventLog::new(2);
        for name in ["a", "b", "c"] {
            log.push(StoryEvent::new(name)).await;
        }
        let names: Vec<String> = log
            .recent(10, None)
            .await
            .into_iter()
            .map(|e| e.event_type)
            .collect();
        assert_eq!(names, vec!["b", "c"]);
    }

    #[tokio::test]
    async fn recent_filters_by_type() {
        let log = EventLog::default();
        log.push(StoryEvent::new(event_types::PROJECT_SAVED)).await;
        log.push(StoryEvent::new(event_types::STORYBOARD_COMPLETED)).await;
        log.push(StoryEvent::new(event_types::PROJECT_SAVED)).await;

        let saved = log.recent(10, Some(event_types::PROJECT_SAVED)).await;
        assert_eq!(saved.len(), 2);
        assert_eq!(log.recent(1, None).await[0].event_type, "project.saved");
    }

    #[tokio::test]
    async fn run_collects_until_bus_is_dropped() {
        let bus = EventBus::default();
        let log = EventLog::default();
        let handle = tokio::spawn(log.clone().run(bus.subscribe()));

        bus.publish(StoryEvent::new(event_types::STORYBOARD_SCENE_ADDED));
        drop(bus);
        handle.await.unwrap();

        assert_eq!(log.recent(10, None).await.len(), 1);
    }
}
