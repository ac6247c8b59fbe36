//! Text-to-timed-scene decomposition.
//!
//! Turns free-form story prose into an ordered list of scene descriptions
//! whose durations approach a target total:
//!
//! 1. [`grouping`] splits sentences and merges them into scene groups.
//! 2. [`scoring`] ranks each group by keyword, length and position cues.
//! 3. [`allocation`] fits the ranked groups into the time budget.
//!
//! All thresholds are hand-tuned and live in [`DecompositionConfig`].

pub mod allocation;
pub mod grouping;
pub mod scoring;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub use allocation::{allocate_durations, PlannedScene, SceneKind};
pub use grouping::{group_into_scenes, split_sentences};
pub use scoring::{score_scenes, ScoredScene};

/// Upper bound on the requested story length.
pub const MAX_TOTAL_MINUTES: f64 = 180.0;

/// Tunable constants for the decomposition heuristics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DecompositionConfig {
    /// A group longer than this closes before the next sentence.
    pub max_group_chars: usize,
    /// Threshold used when the first pass produced too few groups.
    pub strict_group_chars: usize,
    /// Regroup when the first pass yields fewer groups than this...
    pub min_groups_before_retry: usize,
    /// ...and the input is longer than this many characters.
    pub retry_min_text_chars: usize,
    /// Minimum scene unit and short-tier duration.
    pub min_scene_seconds: u32,
    /// Long-tier duration and per-scene extension cap.
    pub long_scene_seconds: u32,
    /// Scores at or above this land in the long tier.
    pub long_tier_score: f64,
    /// Extend short scenes while the plan is below this share of the budget.
    pub extend_ratio: f64,
    /// Add filler scenes while the plan is below this share of the budget.
    pub filler_ratio: f64,
    /// Words borrowed from each neighbour when stitching a transition.
    pub transition_words: usize,
}

impl Default for DecompositionConfig {
    fn default() -> Self {
        Self {
            max_group_chars: 80,
            strict_group_chars: 60,
            min_groups_before_retry: 3,
            retry_min_text_chars: 200,
            min_scene_seconds: 5,
            long_scene_seconds: 10,
            long_tier_score: 4.0,
            extend_ratio: 0.8,
            filler_ratio: 0.7,
            transition_words: 3,
        }
    }
}

/// Result of decomposing a story description.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryPlan {
    pub total_seconds: u32,
    pub scenes: Vec<PlannedScene>,
}

impl StoryPlan {
    /// Sum of all planned durations.
    pub fn planned_seconds(&self) -> u32 {
        self.scenes.iter().map(|s| s.duration_in_seconds).sum()
    }
}

/// Validate the requested story length in minutes.
pub fn validate_total_minutes(minutes: f64) -> Result<(), CoreError> {
    if !minutes.is_finite() {
        return Err(CoreError::Validation(
            "total duration must be a finite number of minutes".to_string(),
        ));
    }
    if minutes <= 0.0 {
        return Err(CoreError::Validation(format!(
            "total duration must be > 0 minutes, got {minutes}"
        )));
    }
    if minutes > MAX_TOTAL_MINUTES {
        return Err(CoreError::Validation(format!(
            "total duration must be <= {MAX_TOTAL_MINUTES} minutes, got {minutes}"
        )));
    }
    Ok(())
}

/// Convert a length in minutes to whole seconds.
pub fn minutes_to_seconds(minutes: f64) -> u32 {
    (minutes * 60.0).round().max(0.0) as u32
}

/// Decompose `text` into timed scenes targeting `total_minutes`.
pub fn plan_story(
    text: &str,
    total_minutes: f64,
    config: &DecompositionConfig,
) -> Result<StoryPlan, CoreError> {
    if text.trim().is_empty() {
        return Err(CoreError::Validation(
            "story description must not be empty".to_string(),
        ));
    }
    validate_total_minutes(total_minutes)?;

    let total_seconds = minutes_to_seconds(total_minutes);
    let groups = group_into_scenes(text, config);
    let scored = score_scenes(&groups);
    let scenes = allocate_durations(&scored, total_seconds, config);

    tracing::info!(
        groups = groups.len(),
        scenes = scenes.len(),
        total_seconds,
        "Planned story scenes"
    );

    Ok(StoryPlan {
        total_seconds,
        scenes,
    })
}
