//! Timeline offsets, playhead synchronization and playback.
//!
//! - [`schedule_scenes`] derives start offsets from ordered durations.
//! - [`TimelineSynchronizer`] owns the playhead, maps it to the active scene
//!   and keeps an [`AudioClock`] in step.
//! - [`PlaybackDriver`] runs the single repeating tick that advances an
//!   internally clocked synchronizer.

pub mod driver;
pub mod sync;

use serde::Serialize;

use crate::project::Scene;

pub use driver::PlaybackDriver;
pub use sync::{
    AudioClock, ClockSource, PlaybackSnapshot, SimulatedAudioClock, TickOutcome,
    TimelineSynchronizer,
};

/// A scene placed on the timeline.
///
/// Offsets are derived from the scene order every time and are never stored
/// back into the project tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledScene {
    #[serde(flatten)]
    pub scene: Scene,
    pub start_time_offset: f64,
}

impl ScheduledScene {
    pub fn duration(&self) -> f64 {
        f64::from(self.scene.duration_in_seconds)
    }

    pub fn end_time(&self) -> f64 {
        self.start_time_offset + self.duration()
    }

    /// `true` if `time` falls in `[start, start + duration)`.
    pub fn contains(&self, time: f64) -> bool {
        time >= self.start_time_offset && time < self.end_time()
    }
}

/// Place scenes back to back: each offset is the sum of all prior durations.
pub fn schedule_scenes(scenes: &[Scene]) -> Vec<ScheduledScene> {
    let mut offset = 0.0;
    scenes
        .iter()
        .map(|scene| {
            let scheduled = ScheduledScene {
                scene: scene.clone(),
                start_time_offset: offset,
            };
            offset += f64::from(scene.duration_in_seconds);
            scheduled
        })
        .collect()
}

/// Total length of a scheduled timeline in seconds.
pub fn timeline_duration(scenes: &[ScheduledScene]) -> f64 {
    scenes.last().map(ScheduledScene::end_time).unwrap_or(0.0)
}

/// Index of the first scene whose span contains `time`.
pub fn active_scene_index(scenes: &[ScheduledScene], time: f64) -> Option<usize> {
    scenes.iter().position(|s| s.contains(time))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene(id: &str, duration: u32) -> Scene {
        Scene {
            id: id.to_string(),
            image_url: None,
            video_url: None,
            audio_url: None,
            prompt: String::new(),
            description: String::new(),
            duration_in_seconds: duration,
        }
    }

    fn timeline() -> Vec<ScheduledScene> {
        schedule_scenes(&[scene("a", 5), scene("b", 10), scene("c", 3)])
    }

    #[test]
    fn offsets_are_prefix_sums() {
        let offsets: Vec<f64> = timeline().iter().map(|s| s.start_time_offset).collect();
        assert_eq!(offsets, vec![0.0, 5.0, 15.0]);
    }

    #[test]
    fn offsets_strictly_increase() {
        let scheduled = timeline();
        assert!(scheduled
            .windows(2)
            .all(|w| w[1].start_time_offset > w[0].start_time_offset));
    }

    #[test]
    fn total_duration_is_last_end() {
        assert_eq!(timeline_duration(&timeline()), 18.0);
        assert_eq!(timeline_duration(&[]), 0.0);
    }

    #[test]
    fn active_scene_at_zero_is_first() {
        assert_eq!(active_scene_index(&timeline(), 0.0), Some(0));
    }

    #[test]
    fn active_scene_boundaries_are_half_open() {
        let scheduled = timeline();
        assert_eq!(active_scene_index(&scheduled, 4.99), Some(0));
        assert_eq!(active_scene_index(&scheduled, 5.0), Some(1));
        assert_eq!(active_scene_index(&scheduled, 17.9), Some(2));
        assert_eq!(active_scene_index(&scheduled, 18.0), None);
    }

    #[test]
    fn empty_timeline_has_no_active_scene() {
        assert_eq!(active_scene_index(&[], 0.0), None);
    }

    #[test]
    fn scheduled_scene_serializes_flat() {
        let json = serde_json::to_value(&timeline()[1]).unwrap();
        assert_eq!(json["id"], "b");
        assert_eq!(json["startTimeOffset"], 5.0);
    }
}
