use async_trait::async_trait;
use storyline_core::project::Project;
use tokio::sync::RwLock;

use super::ProjectRepository;
use crate::error::DbError;

/// Volatile storage for tests and ephemeral servers.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    projects: RwLock<Vec<Project>>,
}

impl MemoryRepository {
    pub fn new(projects: Vec<Project>) -> Self {
        Self {
            projects: RwLock::new(projects),
        }
    }
}

#[async_trait]
impl ProjectRepository for MemoryRepository {
    async fn load(&self) -> Result<Vec<Project>, DbError> {
        Ok(self.projects.read().await.clone())
    }

    async fn save(&self, projects: &[Project]) -> Result<(), DbError> {
        *self.projects.write().await = projects.to_vec();
        Ok(())
    }
}
