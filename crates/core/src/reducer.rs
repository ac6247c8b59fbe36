//! Pure reducer over the project tree.
//!
//! [`reduce`] never mutates its input: it returns a new project list with the
//! action applied. Actions that reference a missing project, story or scene
//! leave the tree unchanged. Every story touched by an action gets a fresh
//! `updated_at`, and so does its project.

use std::collections::HashSet;

use chrono::Utc;

use crate::actions::{
    AddProject, AddScene, AddStory, AdjustSceneDurations, ProjectAction, ReorderScenes,
    ReorderStories, UpdateScene, UpdateStory,
};
use crate::project::{
    Project, Scene, Story, DEFAULT_SCENE_DURATION_SECS, MIN_SCENE_DURATION_SECS,
};
use crate::types::{id_or_new, Timestamp};

/// Apply `action` to `projects`, stamping modifications with the current time.
pub fn reduce(projects: &[Project], action: ProjectAction) -> Vec<Project> {
    reduce_at(projects, action, Utc::now())
}

/// Apply `action` to `projects`, stamping modifications with `now`.
pub fn reduce_at(projects: &[Project], action: ProjectAction, now: Timestamp) -> Vec<Project> {
    match action {
        ProjectAction::AddProject(payload) => add_project(projects, payload, now),
        ProjectAction::UpdateProject(payload) => {
            edit_project(projects, &payload.project_id, now, |project| match payload.name {
                Some(name) => {
                    project.name = name;
                    true
                }
                None => false,
            })
        }
        ProjectAction::DeleteProject(payload) => projects
            .iter()
            .filter(|p| p.id != payload.project_id)
            .cloned()
            .collect(),
        ProjectAction::AddStory(payload) => add_story(projects, payload, now),
        ProjectAction::UpdateStory(payload) => update_story(projects, payload, now),
        ProjectAction::DeleteStory(payload) => {
            edit_project(projects, &payload.project_id, now, |project| {
                let before = project.stories.len();
                project.stories.retain(|s| s.id != payload.story_id);
                project.stories.len() != before
            })
        }
        ProjectAction::AddScene(payload) => add_scene(projects, payload, now),
        ProjectAction::UpdateScene(payload) => update_scene(projects, payload, now),
        ProjectAction::DeleteScene(payload) => edit_story(
            projects,
            &payload.project_id,
            &payload.story_id,
            now,
            |story| {
                let before = story.scenes.len();
                story.scenes.retain(|s| s.id != payload.scene_id);
                story.scenes.len() != before
            },
        ),
        ProjectAction::AdjustSceneDurations(payload) => {
            adjust_scene_durations(projects, payload, now)
        }
        ProjectAction::ReorderScenes(payload) => reorder_scenes(projects, payload, now),
        ProjectAction::ReorderStories(payload) => reorder_stories(projects, payload, now),
        ProjectAction::ImportProjects(payload) => payload.projects,
    }
}

// ---------------------------------------------------------------------------
// Tree helpers
// ---------------------------------------------------------------------------

/// Copy the tree and run `edit` on the matching project. `edit` returns
/// whether it changed anything, which decides if `updated_at` moves.
fn edit_project(
    projects: &[Project],
    project_id: &str,
    now: Timestamp,
    edit: impl FnOnce(&mut Project) -> bool,
) -> Vec<Project> {
    let mut next = projects.to_vec();
    match next.iter_mut().find(|p| p.id == project_id) {
        Some(project) => {
            if edit(project) {
                project.updated_at = now;
            }
        }
        None => tracing::debug!(project_id, "Project not found, action ignored"),
    }
    next
}

/// Like [`edit_project`], scoped to one story of the project.
fn edit_story(
    projects: &[Project],
    project_id: &str,
    story_id: &str,
    now: Timestamp,
    edit: impl FnOnce(&mut Story) -> bool,
) -> Vec<Project> {
    edit_project(projects, project_id, now, |project| {
        match project.stories.iter_mut().find(|s| s.id == story_id) {
            Some(story) => {
                let changed = edit(story);
                if changed {
                    story.updated_at = now;
                }
                changed
            }
            None => {
                tracing::debug!(project_id, story_id, "Story not found, action ignored");
                false
            }
        }
    })
}

/// Resolve `ids` against `items` in the given order. Unknown and repeated
/// ids are skipped; items not listed are dropped.
fn resolve_order<T: Clone>(items: &[T], ids: &[String], id_of: impl Fn(&T) -> &str) -> Vec<T> {
    let mut seen: HashSet<&String> = HashSet::new();
    ids.iter()
        .filter(|id| seen.insert(*id))
        .filter_map(|id| items.iter().find(|item| id_of(item) == id.as_str()))
        .cloned()
        .collect()
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

fn add_project(projects: &[Project], payload: AddProject, now: Timestamp) -> Vec<Project> {
    let id = id_or_new(payload.id);
    let mut next = projects.to_vec();
    if next.iter().any(|p| p.id == id) {
        tracing::warn!(project_id = %id, "Project id already exists, ADD_PROJECT ignored");
        return next;
    }
    next.push(Project {
        id,
        name: payload.name,
        stories: Vec::new(),
        created_at: now,
        updated_at: now,
    });
    next
}

fn add_story(projects: &[Project], payload: AddStory, now: Timestamp) -> Vec<Project> {
    let id = id_or_new(payload.id);
    edit_project(projects, &payload.project_id, now, |project| {
        if project.stories.iter().any(|s| s.id == id) {
            tracing::warn!(story_id = %id, "Story id already exists, ADD_STORY ignored");
            return false;
        }
        project.stories.push(Story {
            id,
            title: payload.title,
            description: payload.description,
            scenes: Vec::new(),
            created_at: now,
            updated_at: now,
            total_duration: payload.total_duration,
            audio_track: payload.audio_track,
        });
        true
    })
}

fn update_story(projects: &[Project], payload: UpdateStory, now: Timestamp) -> Vec<Project> {
    let UpdateStory {
        project_id,
        story_id,
        title,
        description,
        total_duration,
        clear_total_duration,
        audio_track,
        remove_audio_track,
    } = payload;

    edit_story(projects, &project_id, &story_id, now, |story| {
        let mut changed = false;
        if let Some(title) = title {
            story.title = title;
            changed = true;
        }
        if let Some(description) = description {
            story.description = description;
            changed = true;
        }
        if clear_total_duration {
            story.total_duration = None;
            changed = true;
        } else if let Some(total) = total_duration {
            story.total_duration = Some(total);
            changed = true;
        }
        if remove_audio_track {
            story.audio_track = None;
            changed = true;
        } else if let Some(track) = audio_track {
            story.audio_track = Some(track);
            changed = true;
        }
        changed
    })
}

fn add_scene(projects: &[Project], payload: AddScene, now: Timestamp) -> Vec<Project> {
    let id = id_or_new(payload.id);
    let AddScene {
        project_id,
        story_id,
        prompt,
        description,
        duration_in_seconds,
        image_url,
        video_url,
        audio_url,
        ..
    } = payload;

    edit_story(projects, &project_id, &story_id, now, |story| {
        if story.scenes.iter().any(|s| s.id == id) {
            tracing::warn!(scene_id = %id, "Scene id already exists, ADD_SCENE ignored");
            return false;
        }
        story.scenes.push(Scene {
            id,
            image_url,
            video_url,
            audio_url,
            prompt,
            description,
            duration_in_seconds: duration_in_seconds
                .unwrap_or(DEFAULT_SCENE_DURATION_SECS)
                .max(MIN_SCENE_DURATION_SECS),
        });
        true
    })
}

fn update_scene(projects: &[Project], payload: UpdateScene, now: Timestamp) -> Vec<Project> {
    let UpdateScene {
        project_id,
        story_id,
        scene_id,
        prompt,
        description,
        duration_in_seconds,
        image_url,
        video_url,
        audio_url,
    } = payload;

    edit_story(projects, &project_id, &story_id, now, |story| {
        let Some(scene) = story.scenes.iter_mut().find(|s| s.id == scene_id) else {
            return false;
        };
        let mut changed = false;
        if let Some(prompt) = prompt {
            scene.prompt = prompt;
            changed = true;
        }
        if let Some(description) = description {
            scene.description = description;
            changed = true;
        }
        if let Some(duration) = duration_in_seconds {
            scene.duration_in_seconds = duration.max(MIN_SCENE_DURATION_SECS);
            changed = true;
        }
        if image_url.is_some() {
            scene.image_url = image_url;
            changed = true;
        }
        if video_url.is_some() {
            scene.video_url = video_url;
            changed = true;
        }
        if audio_url.is_some() {
            scene.audio_url = audio_url;
            changed = true;
        }
        changed
    })
}

/// Set one scene's duration and spread the rest of the story's nominal
/// length uniformly over its siblings.
///
/// The nominal length is the story's `total_duration` override, or the sum
/// of the durations before the change. Each sibling gets
/// `max(1, floor(remaining / siblings))`, so the new sum matches the nominal
/// length up to the division remainder.
fn adjust_scene_durations(
    projects: &[Project],
    payload: AdjustSceneDurations,
    now: Timestamp,
) -> Vec<Project> {
    edit_story(
        projects,
        &payload.project_id,
        &payload.story_id,
        now,
        |story| {
            let Some(position) = story.scenes.iter().position(|s| s.id == payload.scene_id)
            else {
                return false;
            };

            let nominal = story.nominal_duration();
            let new_duration = payload.new_duration.max(MIN_SCENE_DURATION_SECS);
            story.scenes[position].duration_in_seconds = new_duration;

            let siblings = story.scenes.len() - 1;
            if siblings > 0 {
                let remaining = nominal.saturating_sub(new_duration);
                let each = (remaining / siblings as u32).max(MIN_SCENE_DURATION_SECS);
                for (i, scene) in story.scenes.iter_mut().enumerate() {
                    if i != position {
                        scene.duration_in_seconds = each;
                    }
                }
            }
            true
        },
    )
}

fn reorder_scenes(projects: &[Project], payload: ReorderScenes, now: Timestamp) -> Vec<Project> {
    edit_story(
        projects,
        &payload.project_id,
        &payload.story_id,
        now,
        |story| {
            let reordered = resolve_order(&story.scenes, &payload.scene_ids, |s| s.id.as_str());
            if reordered.len() != story.scenes.len() {
                tracing::warn!(
                    story_id = %story.id,
                    kept = reordered.len(),
                    before = story.scenes.len(),
                    "REORDER_SCENES dropped scenes missing from the id list"
                );
            }
            story.scenes = reordered;
            true
        },
    )
}

fn reorder_stories(
    projects: &[Project],
    payload: ReorderStories,
    now: Timestamp,
) -> Vec<Project> {
    edit_project(projects, &payload.project_id, now, |project| {
        let reordered = resolve_order(&project.stories, &payload.story_ids, |s| s.id.as_str());
        if reordered.len() != project.stories.len() {
            tracing::warn!(
                project_id = %project.id,
                kept = reordered.len(),
                before = project.stories.len(),
                "REORDER_STORIES dropped stories missing from the id list"
            );
        }
        project.stories = reordered;
        true
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::actions::{
        DeleteProject, DeleteScene, DeleteStory, ImportProjects, UpdateProject,
    };
    use crate::project::find_story;

    fn t0() -> Timestamp {
        "2024-01-01T00:00:00Z".parse().unwrap()
    }

    fn t1() -> Timestamp {
        t0() + Duration::minutes(5)
    }

    fn scene(id: &str, duration: u32) -> Scene {
        Scene {
            id: id.to_string(),
            image_url: None,
            video_url: None,
            audio_url: None,
            prompt: format!("prompt {id}"),
            description: format!("description {id}"),
            duration_in_seconds: duration,
        }
    }

    fn tree(durations: &[u32]) -> Vec<Project> {
        let ids = ["a", "b", "c", "d", "e"];
        let scenes = durations
            .iter()
            .enumerate()
            .map(|(i, &d)| scene(ids[i], d))
            .collect();
        vec![Project {
            id: "p1".to_string(),
            name: "Demo".to_string(),
            stories: vec![Story {
                id: "s1".to_string(),
                title: "Opening".to_string(),
                description: String::new(),
                scenes,
                created_at: t0(),
                updated_at: t0(),
                total_duration: None,
                audio_track: None,
            }],
            created_at: t0(),
            updated_at: t0(),
        }]
    }

    fn story_of(projects: &[Project]) -> &Story {
        find_story(projects, "p1", "s1").unwrap()
    }

    fn durations(projects: &[Project]) -> Vec<u32> {
        story_of(projects)
            .scenes
            .iter()
            .map(|s| s.duration_in_seconds)
            .collect()
    }

    fn scene_ids(projects: &[Project]) -> Vec<String> {
        story_of(projects).scenes.iter().map(|s| s.id.clone()).collect()
    }

    // -- projects -------------------------------------------------------------

    #[test]
    fn add_project_uses_supplied_id() {
        let next = reduce_at(
            &[],
            ProjectAction::AddProject(AddProject {
                id: Some("p9".to_string()),
                name: "New".to_string(),
            }),
            t1(),
        );
        assert_eq!(next.len(), 1);
        assert_eq!(next[0].id, "p9");
        assert_eq!(next[0].created_at, t1());
    }

    #[test]
    fn add_project_generates_id() {
        let next = reduce(
            &[],
            ProjectAction::AddProject(AddProject {
                id: None,
                name: "New".to_string(),
            }),
        );
        assert_eq!(next[0].id.len(), 36);
    }

    #[test]
    fn add_project_with_duplicate_id_is_ignored() {
        let projects = tree(&[5]);
        let next = reduce_at(
            &projects,
            ProjectAction::AddProject(AddProject {
                id: Some("p1".to_string()),
                name: "Clone".to_string(),
            }),
            t1(),
        );
        assert_eq!(next, projects);
    }

    #[test]
    fn update_project_renames() {
        let next = reduce_at(
            &tree(&[5]),
            ProjectAction::UpdateProject(UpdateProject {
                project_id: "p1".to_string(),
                name: Some("Renamed".to_string()),
            }),
            t1(),
        );
        assert_eq!(next[0].name, "Renamed");
        assert_eq!(next[0].updated_at, t1());
    }

    #[test]
    fn delete_project_removes_it() {
        let next = reduce(
            &tree(&[5]),
            ProjectAction::DeleteProject(DeleteProject {
                project_id: "p1".to_string(),
            }),
        );
        assert!(next.is_empty());
    }

    #[test]
    fn missing_project_is_a_no_op() {
        let projects = tree(&[5, 5]);
        let next = reduce_at(
            &projects,
            ProjectAction::DeleteStory(DeleteStory {
                project_id: "nope".to_string(),
                story_id: "s1".to_string(),
            }),
            t1(),
        );
        assert_eq!(next, projects);
    }

    // -- stories --------------------------------------------------------------

    #[test]
    fn add_story_appends_and_touches_project() {
        let next = reduce_at(
            &tree(&[5]),
            ProjectAction::AddStory(AddStory {
                project_id: "p1".to_string(),
                id: Some("s2".to_string()),
                title: "Second".to_string(),
                description: "More".to_string(),
                total_duration: Some(30),
                audio_track: None,
            }),
            t1(),
        );
        let ids: Vec<&str> = next[0].stories.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["s1", "s2"]);
        assert_eq!(next[0].stories[1].total_duration, Some(30));
        assert_eq!(next[0].updated_at, t1());
    }

    #[test]
    fn update_story_patches_fields() {
        let next = reduce_at(
            &tree(&[5]),
            ProjectAction::UpdateStory(UpdateStory {
                project_id: "p1".to_string(),
                story_id: "s1".to_string(),
                title: Some("Cold open".to_string()),
                total_duration: Some(42),
                ..Default::default()
            }),
            t1(),
        );
        let story = story_of(&next);
        assert_eq!(story.title, "Cold open");
        assert_eq!(story.total_duration, Some(42));
        assert_eq!(story.updated_at, t1());
    }

    #[test]
    fn empty_update_story_keeps_timestamp() {
        let next = reduce_at(
            &tree(&[5]),
            ProjectAction::UpdateStory(UpdateStory {
                project_id: "p1".to_string(),
                story_id: "s1".to_string(),
                ..Default::default()
            }),
            t1(),
        );
        assert_eq!(story_of(&next).updated_at, t0());
    }

    #[test]
    fn delete_only_story_leaves_empty_list() {
        let next = reduce_at(
            &tree(&[5, 10]),
            ProjectAction::DeleteStory(DeleteStory {
                project_id: "p1".to_string(),
                story_id: "s1".to_string(),
            }),
            t1(),
        );
        assert!(next[0].stories.is_empty());
        assert_eq!(next[0].scene_count(), 0);
    }

    #[test]
    fn reorder_stories_follows_id_list() {
        let mut projects = tree(&[5]);
        let mut second = projects[0].stories[0].clone();
        second.id = "s2".to_string();
        projects[0].stories.push(second);

        let next = reduce_at(
            &projects,
            ProjectAction::ReorderStories(ReorderStories {
                project_id: "p1".to_string(),
                story_ids: vec!["s2".to_string(), "s1".to_string()],
            }),
            t1(),
        );
        let ids: Vec<&str> = next[0].stories.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["s2", "s1"]);
    }

    // -- scenes ---------------------------------------------------------------

    #[test]
    fn add_scene_appends_with_default_duration() {
        let next = reduce_at(
            &tree(&[5]),
            ProjectAction::AddScene(AddScene {
                project_id: "p1".to_string(),
                story_id: "s1".to_string(),
                id: Some("z".to_string()),
                description: "Close-up".to_string(),
                ..Default::default()
            }),
            t1(),
        );
        let story = story_of(&next);
        assert_eq!(scene_ids(&next), vec!["a", "z"]);
        assert_eq!(
            story.scene("z").unwrap().duration_in_seconds,
            DEFAULT_SCENE_DURATION_SECS
        );
        assert_eq!(story.updated_at, t1());
        assert_eq!(next[0].updated_at, t1());
    }

    #[test]
    fn add_scene_to_missing_story_is_a_no_op() {
        let projects = tree(&[5]);
        let next = reduce_at(
            &projects,
            ProjectAction::AddScene(AddScene {
                project_id: "p1".to_string(),
                story_id: "ghost".to_string(),
                description: "Nothing".to_string(),
                ..Default::default()
            }),
            t1(),
        );
        assert_eq!(next, projects);
    }

    #[test]
    fn update_scene_sets_media_and_clamps_duration() {
        let next = reduce_at(
            &tree(&[5, 5]),
            ProjectAction::UpdateScene(UpdateScene {
                project_id: "p1".to_string(),
                story_id: "s1".to_string(),
                scene_id: "b".to_string(),
                image_url: Some("https://cdn/img.png".to_string()),
                duration_in_seconds: Some(0),
                ..Default::default()
            }),
            t1(),
        );
        let scene = story_of(&next).scene("b").unwrap();
        assert_eq!(scene.image_url.as_deref(), Some("https://cdn/img.png"));
        assert_eq!(scene.duration_in_seconds, MIN_SCENE_DURATION_SECS);
    }

    #[test]
    fn delete_scene_removes_only_target() {
        let next = reduce_at(
            &tree(&[5, 5, 5]),
            ProjectAction::DeleteScene(DeleteScene {
                project_id: "p1".to_string(),
                story_id: "s1".to_string(),
                scene_id: "b".to_string(),
            }),
            t1(),
        );
        assert_eq!(scene_ids(&next), vec!["a", "c"]);
    }

    #[test]
    fn reorder_scenes_matches_permutation() {
        let next = reduce_at(
            &tree(&[5, 5, 5]),
            ProjectAction::ReorderScenes(ReorderScenes {
                project_id: "p1".to_string(),
                story_id: "s1".to_string(),
                scene_ids: vec!["c".to_string(), "a".to_string(), "b".to_string()],
            }),
            t1(),
        );
        assert_eq!(scene_ids(&next), vec!["c", "a", "b"]);
    }

    #[test]
    fn reorder_scenes_drops_unlisted_and_unknown() {
        let next = reduce_at(
            &tree(&[5, 5, 5]),
            ProjectAction::ReorderScenes(ReorderScenes {
                project_id: "p1".to_string(),
                story_id: "s1".to_string(),
                scene_ids: vec!["b".to_string(), "x".to_string(), "b".to_string()],
            }),
            t1(),
        );
        assert_eq!(scene_ids(&next), vec!["b"]);
    }

    // -- duration rebalancing -------------------------------------------------

    #[test]
    fn adjust_spreads_remaining_uniformly() {
        // Nominal 30s; b becomes 12s; 18s left over 2 siblings.
        let next = reduce_at(
            &tree(&[5, 10, 15]),
            ProjectAction::AdjustSceneDurations(AdjustSceneDurations {
                project_id: "p1".to_string(),
                story_id: "s1".to_string(),
                scene_id: "b".to_string(),
                new_duration: 12,
            }),
            t1(),
        );
        assert_eq!(durations(&next), vec![9, 12, 9]);
    }

    #[test]
    fn adjust_uses_total_duration_override() {
        let mut projects = tree(&[5, 5, 5]);
        projects[0].stories[0].total_duration = Some(60);
        let next = reduce_at(
            &projects,
            ProjectAction::AdjustSceneDurations(AdjustSceneDurations {
                project_id: "p1".to_string(),
                story_id: "s1".to_string(),
                scene_id: "a".to_string(),
                new_duration: 20,
            }),
            t1(),
        );
        assert_eq!(durations(&next), vec![20, 20, 20]);
    }

    #[test]
    fn adjust_floors_and_stays_close_to_total() {
        let next = reduce_at(
            &tree(&[10, 10, 10, 10]),
            ProjectAction::AdjustSceneDurations(AdjustSceneDurations {
                project_id: "p1".to_string(),
                story_id: "s1".to_string(),
                scene_id: "a".to_string(),
                new_duration: 15,
            }),
            t1(),
        );
        // 25 over 3 siblings floors to 8.
        assert_eq!(durations(&next), vec![15, 8, 8, 8]);
        let sum: u32 = durations(&next).iter().sum();
        assert!(40 - sum < 3);
    }

    #[test]
    fn adjust_never_goes_below_one_second() {
        let next = reduce_at(
            &tree(&[5, 5, 5]),
            ProjectAction::AdjustSceneDurations(AdjustSceneDurations {
                project_id: "p1".to_string(),
                story_id: "s1".to_string(),
                scene_id: "c".to_string(),
                new_duration: 50,
            }),
            t1(),
        );
        assert_eq!(durations(&next), vec![1, 1, 50]);
    }

    #[test]
    fn adjust_single_scene_has_no_siblings_to_divide() {
        let next = reduce_at(
            &tree(&[5]),
            ProjectAction::AdjustSceneDurations(AdjustSceneDurations {
                project_id: "p1".to_string(),
                story_id: "s1".to_string(),
                scene_id: "a".to_string(),
                new_duration: 8,
            }),
            t1(),
        );
        assert_eq!(durations(&next), vec![8]);
    }

    // -- bulk -----------------------------------------------------------------

    #[test]
    fn import_replaces_all_projects() {
        let imported = tree(&[7]);
        let next = reduce(
            &tree(&[5, 5]),
            ProjectAction::ImportProjects(ImportProjects {
                projects: imported.clone(),
            }),
        );
        assert_eq!(next, imported);
    }

    #[test]
    fn input_tree_is_never_mutated() {
        let projects = tree(&[5, 5]);
        let snapshot = projects.clone();
        let _ = reduce(
            &projects,
            ProjectAction::DeleteScene(DeleteScene {
                project_id: "p1".to_string(),
                story_id: "s1".to_string(),
                scene_id: "a".to_string(),
            }),
        );
        assert_eq!(projects, snapshot);
    }
}
