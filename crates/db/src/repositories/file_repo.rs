//! JSON file storage in the interchange format.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use storyline_core::interchange::{export_projects, import_projects};
use storyline_core::project::Project;

use super::ProjectRepository;
use crate::error::DbError;

/// Stores the project tree as a pretty-printed JSON array in one file.
///
/// Writes go to a sibling temp file that is then renamed over the target.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "projects.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl ProjectRepository for JsonFileRepository {
    async fn load(&self) -> Result<Vec<Project>, DbError> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "No project file yet");
                return Ok(Vec::new());
            }
            Err(e) => return Err(DbError::io(&self.path, e)),
        };

        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }

        let projects = import_projects(&contents)?;
        tracing::debug!(
            path = %self.path.display(),
            count = projects.len(),
            "Loaded projects"
        );
        Ok(projects)
    }

    async fn save(&self, projects: &[Project]) -> Result<(), DbError> {
        let json = export_projects(projects)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| DbError::io(parent, e))?;
        }

        let temp = self.temp_path();
        tokio::fs::write(&temp, json)
            .await
            .map_err(|e| DbError::io(&temp, e))?;
        tokio::fs::rename(&temp, &self.path)
            .await
            .map_err(|e| DbError::io(&self.path, e))?;

        tracing::debug!(
            path = %self.path.display(),
            count = projects.len(),
            "Saved projects"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::Utc;

    use super::*;

    fn project(id: &str) -> Project {
        let now = Utc::now();
        Project {
            id: id.to_string(),
            name: format!("Project {id}"),
            stories: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::new(dir.path().join("projects.json"));
        assert!(repo.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::new(dir.path().join("nested/projects.json"));
        let projects = vec![project("p1"), project("p2")];

        repo.save(&projects).await.unwrap();
        assert_eq!(repo.load().await.unwrap(), projects);
        assert!(!repo.temp_path().exists());
    }

    #[tokio::test]
    async fn corrupt_file_is_a_format_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("projects.json");
        std::fs::write(&path, "[{ broken").unwrap();

        let repo = JsonFileRepository::new(path);
        assert_matches!(repo.load().await, Err(DbError::Format(_)));
    }
}
