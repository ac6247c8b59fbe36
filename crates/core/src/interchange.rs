//! Project import/export format.
//!
//! The exchange file is a JSON array of projects using the same camelCase
//! layout as the in-memory model, with `createdAt`/`updatedAt` as ISO-8601
//! strings. Parsing rehydrates those strings into [`Timestamp`] values.
//!
//! [`Timestamp`]: crate::types::Timestamp

use crate::error::CoreError;
use crate::project::Project;
use crate::validation::validate_projects;

/// Serialize projects to the exchange format.
pub fn export_projects(projects: &[Project]) -> Result<String, CoreError> {
    Ok(serde_json::to_string_pretty(projects)?)
}

/// Parse projects from the exchange format.
///
/// Rejects trees that fail [`validate_projects`]: repeated ids, blank
/// names or zero-length scenes.
pub fn import_projects(json: &str) -> Result<Vec<Project>, CoreError> {
    let projects: Vec<Project> = serde_json::from_str(json)?;
    validate_projects(&projects)?;
    Ok(projects)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::project::{AudioTrack, Scene, Story};
    use crate::types::Timestamp;

    fn sample() -> Vec<Project> {
        let created: Timestamp = "2024-03-01T10:00:00Z".parse().unwrap();
        let updated: Timestamp = "2024-03-02T12:30:15.250Z".parse().unwrap();
        let scene = |id: &str, d: u32| Scene {
            id: id.to_string(),
            image_url: Some(format!("https://cdn/{id}.png")),
            video_url: None,
            audio_url: None,
            prompt: format!("prompt {id}"),
            description: format!("description {id}"),
            duration_in_seconds: d,
        };
        vec![Project {
            id: "p1".to_string(),
            name: "Demo".to_string(),
            stories: vec![Story {
                id: "s1".to_string(),
                title: "Opening".to_string(),
                description: "The start".to_string(),
                scenes: vec![scene("b", 10), scene("a", 5)],
                created_at: created,
                updated_at: updated,
                total_duration: Some(15),
                audio_track: Some(AudioTrack {
                    url: "https://cdn/theme.mp3".to_string(),
                    name: "Theme".to_string(),
                    duration_in_seconds: Some(14.5),
                }),
            }],
            created_at: created,
            updated_at: updated,
        }]
    }

    #[test]
    fn round_trip_preserves_tree() {
        let projects = sample();
        let json = export_projects(&projects).unwrap();
        let restored = import_projects(&json).unwrap();
        assert_eq!(restored, projects);
    }

    #[test]
    fn dates_are_iso_strings_on_the_wire() {
        let json = export_projects(&sample()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let created = value[0]["createdAt"].as_str().unwrap();
        assert!(created.starts_with("2024-03-01T10:00:00"));
        assert_eq!(value[0]["stories"][0]["scenes"][0]["id"], "b");
    }

    #[test]
    fn import_accepts_minimal_projects() {
        let json = r#"[{"id":"p1","name":"Bare","createdAt":"2024-01-01T00:00:00.000Z","updatedAt":"2024-01-01T00:00:00.000Z"}]"#;
        let projects = import_projects(json).unwrap();
        assert_eq!(projects[0].name, "Bare");
        assert!(projects[0].stories.is_empty());
    }

    #[test]
    fn import_rejects_malformed_json() {
        assert_matches!(import_projects("{not json"), Err(CoreError::Serialization(_)));
    }

    #[test]
    fn import_rejects_duplicate_ids() {
        let mut projects = sample();
        projects.push(projects[0].clone());
        let json = export_projects(&projects).unwrap();
        assert_matches!(import_projects(&json), Err(CoreError::Conflict(_)));
    }

    #[test]
    fn import_rejects_zero_duration_scene() {
        let mut projects = sample();
        projects[0].stories[0].scenes[1].duration_in_seconds = 0;
        let json = export_projects(&projects).unwrap();
        assert_matches!(import_projects(&json), Err(CoreError::Validation(_)));
    }
}
