//! Storyline domain core.
//!
//! Pure domain logic with no I/O beyond tokio timers:
//!
//! - [`decomposition`]: narrative text to a duration-budgeted scene plan.
//! - [`project`], [`actions`], [`reducer`], [`store`]: the project tree and
//!   the single-writer reducer that mutates it.
//! - [`timeline`]: scene offsets, playhead synchronization and playback.
//! - [`interchange`]: JSON import/export of the project tree.

pub mod actions;
pub mod decomposition;
pub mod error;
pub mod interchange;
pub mod project;
pub mod reducer;
pub mod store;
pub mod timeline;
pub mod types;
pub mod validation;

pub use actions::ProjectAction;
pub use decomposition::{plan_story, DecompositionConfig, PlannedScene, SceneKind, StoryPlan};
pub use error::CoreError;
pub use project::{AudioTrack, Project, Scene, Story};
pub use reducer::reduce;
pub use store::ProjectStore;
pub use timeline::{PlaybackDriver, PlaybackSnapshot, TimelineSynchronizer};
