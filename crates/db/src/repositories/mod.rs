//! Storage backends for the project tree.

mod file_repo;
mod memory_repo;

pub use file_repo::JsonFileRepository;
pub use memory_repo::MemoryRepository;

use async_trait::async_trait;
use storyline_core::project::Project;

use crate::error::DbError;

/// Whole-tree storage. Saves replace the stored list atomically.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Load the stored projects. An empty store yields an empty list.
    async fn load(&self) -> Result<Vec<Project>, DbError>;

    async fn save(&self, projects: &[Project]) -> Result<(), DbError>;
}
