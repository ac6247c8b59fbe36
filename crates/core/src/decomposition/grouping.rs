//! Sentence splitting and scene grouping.
//!
//! Raw prose is cut into sentences on terminal punctuation, then consecutive
//! sentences are merged into scene descriptions. A new scene starts whenever
//! the running group grows past a character threshold or a sentence carries
//! a cue that the story has moved on (transition word, new setting, new
//! action, emotional beat, passage of time).

use std::sync::LazyLock;

use regex::Regex;

use super::DecompositionConfig;

// ---------------------------------------------------------------------------
// Heuristic cue patterns
// ---------------------------------------------------------------------------

static TRANSITION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(then|next|suddenly|meanwhile|later|afterwards|after that|finally|eventually|soon after|moments later|all of a sudden)\b",
    )
    .expect("valid regex")
});

static SETTING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(inside|outside|at the|arrives at|arrived at|back at|back in|elsewhere|across town|in another|on the other side)\b",
    )
    .expect("valid regex")
});

static ACTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(begins|began|arrives|arrived|discovers|discovered|decides|decided|realizes|realized|sets out|sets off|leaves|left for|finds|found)\b",
    )
    .expect("valid regex")
});

static EMOTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(happy|happily|sad|sadly|angry|angrily|shocked|surprised|terrified|furious|overjoyed|heartbroken|devastated|elated)\b",
    )
    .expect("valid regex")
});

static TIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(day|days|night|nights|morning|evening|hour|hours|week|weeks|month|months|year|years|dawn|dusk|midnight)\b",
    )
    .expect("valid regex")
});

/// Returns `true` if the sentence carries any cue that opens a new scene.
pub fn starts_new_scene(sentence: &str) -> bool {
    [
        &*TRANSITION_RE,
        &*SETTING_RE,
        &*ACTION_RE,
        &*EMOTION_RE,
        &*TIME_RE,
    ]
    .iter()
    .any(|re| re.is_match(sentence))
}

// ---------------------------------------------------------------------------
// Splitting
// ---------------------------------------------------------------------------

/// Split text into trimmed, non-empty sentences on `.`, `!` and `?`.
pub fn split_sentences(text: &str) -> Vec<String> {
    text.split(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

// ---------------------------------------------------------------------------
// Grouping
// ---------------------------------------------------------------------------

/// Merge sentences into scene descriptions using `max_group_chars` as the
/// length threshold.
fn group_with_threshold(sentences: &[String], max_group_chars: usize) -> Vec<String> {
    let mut groups: Vec<String> = Vec::new();
    let mut current = String::new();

    for sentence in sentences {
        let open_new =
            current.is_empty() || current.len() > max_group_chars || starts_new_scene(sentence);

        if open_new {
            if !current.is_empty() {
                groups.push(finish_group(&current));
            }
            current = sentence.clone();
        } else {
            current.push_str(". ");
            current.push_str(sentence);
        }
    }

    if !current.is_empty() {
        groups.push(finish_group(&current));
    }

    groups
}

fn finish_group(group: &str) -> String {
    format!("{group}.")
}

/// Split `text` into sentences and merge them into scene descriptions.
///
/// When the first pass yields fewer than `min_groups_before_retry` groups on
/// a long input, the text is regrouped with the stricter threshold. The
/// output is never empty for non-blank input: the whole trimmed text is
/// returned as a single group when no sentence survives splitting.
pub fn group_into_scenes(text: &str, config: &DecompositionConfig) -> Vec<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    let sentences = split_sentences(trimmed);
    let mut groups = group_with_threshold(&sentences, config.max_group_chars);

    if groups.len() < config.min_groups_before_retry
        && trimmed.len() > config.retry_min_text_chars
    {
        groups = group_with_threshold(&sentences, config.strict_group_chars);
    }

    if groups.is_empty() {
        groups.push(trimmed.to_string());
    }

    groups
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
