//! Server-side playback sessions.
//!
//! Each opened story timeline gets one [`PlaybackDriver`], keyed by
//! `(project_id, story_id)`. Scene lists are refreshed from the store before
//! every command so duration edits and reorders show up on the playhead.
//! Dropping a session aborts its ticker.

use std::collections::HashMap;

use storyline_core::project::{Project, Story};
use storyline_core::timeline::{
    PlaybackDriver, PlaybackSnapshot, SimulatedAudioClock, TimelineSynchronizer,
};
use storyline_core::types::EntityId;
use tokio::sync::Mutex;

type TimelineKey = (EntityId, EntityId);

/// A transport command for one timeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlaybackCommand {
    Play,
    Pause,
    Stop,
    Seek(f64),
}

/// Open playback sessions.
#[derive(Default)]
pub struct PlaybackRegistry {
    sessions: Mutex<HashMap<TimelineKey, PlaybackDriver>>,
}

impl PlaybackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `command` to the timeline of `story`, opening a session on
    /// first use.
    pub async fn command(
        &self,
        project_id: &str,
        story: &Story,
        command: PlaybackCommand,
    ) -> PlaybackSnapshot {
        let mut sessions = self.sessions.lock().await;
        let driver = sessions
            .entry((project_id.to_string(), story.id.clone()))
            .or_insert_with(|| {
                tracing::debug!(project_id, story_id = %story.id, "Opening playback session");
                PlaybackDriver::new(new_synchronizer(story))
            });
        driver.synchronizer().lock().await.set_scenes(&story.scenes);

        match command {
            PlaybackCommand::Play => driver.play().await,
            PlaybackCommand::Pause => driver.pause().await,
            PlaybackCommand::Stop => driver.stop().await,
            PlaybackCommand::Seek(time) => driver.seek(time).await,
        }
    }

    /// Current playback state, or a stopped state if no session is open.
    pub async fn snapshot(&self, project_id: &str, story: &Story) -> PlaybackSnapshot {
        let sessions = self.sessions.lock().await;
        match sessions.get(&(project_id.to_string(), story.id.clone())) {
            Some(driver) => {
                let sync = driver.synchronizer();
                let mut sync = sync.lock().await;
                sync.set_scenes(&story.scenes);
                sync.snapshot()
            }
            None => TimelineSynchronizer::new(&story.scenes).snapshot(),
        }
    }

    /// Close one session. Returns `false` if none was open.
    pub async fn close(&self, project_id: &str, story_id: &str) -> bool {
        self.sessions
            .lock()
            .await
            .remove(&(project_id.to_string(), story_id.to_string()))
            .is_some()
    }

    /// Close sessions whose story no longer exists in `projects`.
    pub async fn retain_existing(&self, projects: &[Project]) {
        let mut sessions = self.sessions.lock().await;
        let before = sessions.len();
        sessions.retain(|(project_id, story_id), _| {
            projects
                .iter()
                .find(|p| &p.id == project_id)
                .is_some_and(|p| p.stories.iter().any(|s| &s.id == story_id))
        });
        let closed = before - sessions.len();
        if closed > 0 {
            tracing::debug!(closed, "Closed playback sessions for removed stories");
        }
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.lock().await.len()
    }

    /// Stop and drop every session.
    pub async fn close_all(&self) {
        self.sessions.lock().await.clear();
    }
}

fn new_synchronizer(story: &Story) -> TimelineSynchronizer {
    let sync = TimelineSynchronizer::new(&story.scenes);
    match &story.audio_track {
        Some(track) => sync.with_audio(Box::new(SimulatedAudioClock::new(
            track.duration_in_seconds,
        ))),
        None => sync,
    }
}
