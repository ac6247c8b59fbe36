//! Storyboard and media generation pipeline.
//!
//! - [`storyboard`]: plans a story from prose and populates it scene by
//!   scene through the project store.
//! - [`media`]: requests an image or video for one scene and records the
//!   resulting URL.
//! - [`generation`]: the external generation service client.

pub mod error;
pub mod generation;
pub mod media;
pub mod storyboard;

use std::sync::Arc;

use storyline_core::store::ProjectStore;
use tokio::sync::Mutex;

pub use error::PipelineError;
pub use generation::{GenerationError, HttpMediaGenerator, MediaGenerator, UnconfiguredGenerator};
pub use media::{generate_scene_image, generate_scene_video, MediaKind, SceneRef};
pub use storyboard::{
    PreparedStoryboard, StoryboardOutcome, StoryboardPipeline, StoryboardRequest,
};

/// The project store shared between the server and the pipeline. All
/// dispatches go through this one lock.
pub type SharedStore = Arc<Mutex<ProjectStore>>;
