//! Project persistence.
//!
//! Repositories load and save the whole project tree; [`ProjectArchive`]
//! wraps one and adds save notifications plus import/export.

pub mod archive;
pub mod error;
pub mod repositories;

pub use archive::{ProjectArchive, SubscriptionId};
pub use error::DbError;
pub use repositories::{JsonFileRepository, MemoryRepository, ProjectRepository};
