//! Importance scoring for scene descriptions.
//!
//! Scores are a relative ranking signal only. They decide which scenes
//! survive a tight budget and which land in the long duration tier.

use serde::Serialize;

// ---------------------------------------------------------------------------
// Keyword lists
// ---------------------------------------------------------------------------

pub const ACTION_KEYWORDS: &[&str] = &[
    "fight", "run", "chase", "attack", "escape", "jump", "fall", "roar", "explode", "crash",
    "battle", "flee", "grab", "throw", "strike", "shoot", "race", "climb", "rescue", "enter",
    "burst", "collapse", "charge", "dive",
];

pub const EMOTION_KEYWORDS: &[&str] = &[
    "love", "hate", "fear", "joy", "anger", "sad", "happy", "cry", "tears", "laugh", "smile",
    "scream", "brave", "terrified", "anxious", "hope", "despair", "grief", "rage", "relief",
    "lonely", "proud", "shock", "panic",
];

pub const IMPORTANT_KEYWORDS: &[&str] = &[
    "climax", "turning point", "reveal", "secret", "discover", "betray", "death", "dies",
    "victory", "defeat", "confront", "truth", "destiny", "sacrifice", "twist", "final battle",
    "showdown", "transform", "awaken", "realize", "decision", "crisis", "danger", "mystery",
    "prophecy", "treasure", "reunion", "farewell",
];

pub const SETTING_KEYWORDS: &[&str] = &[
    "forest", "castle", "city", "village", "mountain", "ocean", "sea", "river", "desert", "cave",
    "house", "room", "street", "sky", "space", "island", "palace", "temple", "school", "office",
    "garden", "beach", "bridge", "tower", "ship", "station",
];

// ---------------------------------------------------------------------------
// Weights
// ---------------------------------------------------------------------------

/// Bonus for the opening and closing scene.
pub const BOOKEND_BONUS: f64 = 3.0;
pub const ACTION_WEIGHT: f64 = 1.5;
pub const EMOTION_WEIGHT: f64 = 1.5;
pub const IMPORTANT_WEIGHT: f64 = 2.0;
pub const SETTING_WEIGHT: f64 = 1.0;
/// Characters per point of length bonus.
pub const LENGTH_DIVISOR: f64 = 40.0;
pub const MAX_LENGTH_BONUS: f64 = 2.5;
/// Bonus for scenes containing dialogue.
pub const DIALOGUE_BONUS: f64 = 2.0;

/// A scene description paired with its importance score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredScene {
    /// Position of the scene in the source text.
    pub index: usize,
    pub description: String,
    pub score: f64,
}

/// Count distinct keywords from `keywords` that appear in `lowered`.
fn count_matches(lowered: &str, keywords: &[&str]) -> usize {
    keywords.iter().filter(|k| lowered.contains(*k)).count()
}

fn has_dialogue(text: &str) -> bool {
    text.contains(['"', '\u{201C}', '\u{201D}'])
}

/// Score a single scene description at `index` of `total` scenes.
pub fn score_scene(description: &str, index: usize, total: usize) -> f64 {
    let lowered = description.to_lowercase();
    let mut score = 0.0;

    if index == 0 || index + 1 == total {
        score += BOOKEND_BONUS;
    }

    score += count_matches(&lowered, ACTION_KEYWORDS) as f64 * ACTION_WEIGHT;
    score += count_matches(&lowered, EMOTION_KEYWORDS) as f64 * EMOTION_WEIGHT;
    score += count_matches(&lowered, IMPORTANT_KEYWORDS) as f64 * IMPORTANT_WEIGHT;
    score += count_matches(&lowered, SETTING_KEYWORDS) as f64 * SETTING_WEIGHT;

    score += (description.chars().count() as f64 / LENGTH_DIVISOR).min(MAX_LENGTH_BONUS);

    if has_dialogue(description) {
        score += DIALOGUE_BONUS;
    }

    score
}

/// Score every scene description, keeping source order.
pub fn score_scenes(descriptions: &[String]) -> Vec<ScoredScene> {
    let total = descriptions.len();
    descriptions
        .iter()
        .enumerate()
        .map(|(index, description)| ScoredScene {
            index,
            description: description.clone(),
            score: score_scene(description, index, total),
        })
        .collect()
}
