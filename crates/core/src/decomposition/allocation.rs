//! Duration allocation under a total-time budget.
//!
//! Selects the most important scenes that fit the budget, assigns each a
//! short or long duration, stretches short scenes when the result falls
//! well below budget, and finally pads with transition and establishing
//! shots when it is still too short.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::scoring::ScoredScene;
use super::DecompositionConfig;

/// Establishing shots cycled through once transition fillers run out.
pub const ESTABLISHING_SHOTS: &[&str] = &[
    "Wide establishing shot of the surroundings, setting the scene.",
    "Slow panning shot across the landscape, building atmosphere.",
    "Close-up of small environmental details that set the mood.",
    "Aerial view revealing the wider world of the story.",
    "Quiet moment lingering on the scenery as time passes.",
    "Silhouetted figures against the horizon, framing the journey.",
];

/// Whether a planned scene came from the story text or was synthesized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneKind {
    Story,
    Transition,
    Establishing,
}

/// One entry of the allocator output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedScene {
    pub description: String,
    pub duration_in_seconds: u32,
    pub kind: SceneKind,
}

/// A selected story scene while durations are being assigned.
#[derive(Debug, Clone)]
struct Slot {
    index: usize,
    description: String,
    score: f64,
    duration: u32,
}

/// Sort indices by score descending; ties keep source order.
fn by_score_desc(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

fn total_of(slots: &[Slot]) -> u32 {
    slots.iter().map(|s| s.duration).sum()
}

/// Allocate durations for `scenes` so the total approaches `total_seconds`.
///
/// Empty input (or a budget smaller than one scene unit) yields an empty
/// plan rather than an error.
pub fn allocate_durations(
    scenes: &[ScoredScene],
    total_seconds: u32,
    config: &DecompositionConfig,
) -> Vec<PlannedScene> {
    let unit = config.min_scene_seconds.max(1);
    let max_possible = (total_seconds / unit) as usize;
    let target_count = scenes.len().min(max_possible);

    if target_count == 0 {
        return Vec::new();
    }

    // Pick the top-scoring scenes, then restore textual order.
    let mut ranked: Vec<&ScoredScene> = scenes.iter().collect();
    ranked.sort_by(|a, b| by_score_desc(a.score, b.score));
    let mut slots: Vec<Slot> = ranked
        .into_iter()
        .take(target_count)
        .map(|s| Slot {
            index: s.index,
            description: s.description.clone(),
            score: s.score,
            duration: if s.score >= config.long_tier_score {
                config.long_scene_seconds
            } else {
                unit
            },
        })
        .collect();
    slots.sort_by_key(|s| s.index);

    fit_within_budget(&mut slots, total_seconds, unit);
    extend_short_scenes(&mut slots, total_seconds, config);

    let generated_total = total_of(&slots);
    let fillers = if (generated_total as f64) < total_seconds as f64 * config.filler_ratio
        && scenes.len() >= 2
    {
        let count = ((total_seconds - generated_total) / unit) as usize;
        build_fillers(&slots, count, unit, config)
    } else {
        Vec::new()
    };

    tracing::debug!(
        selected = slots.len(),
        fillers = fillers.len(),
        generated_total,
        total_seconds,
        "Allocated scene durations"
    );

    interleave(slots, fillers)
}

/// Demote the lowest-scoring long scenes to the short tier until the plan
/// fits the budget. The scene count never exceeds `total / unit`, so an
/// all-short plan always fits.
fn fit_within_budget(slots: &mut [Slot], total_seconds: u32, unit: u32) {
    if total_of(slots) <= total_seconds {
        return;
    }

    let mut order: Vec<usize> = (0..slots.len()).collect();
    order.sort_by(|&a, &b| by_score_desc(slots[b].score, slots[a].score));

    for i in order {
        if total_of(slots) <= total_seconds {
            break;
        }
        if slots[i].duration > unit {
            slots[i].duration = unit;
        }
    }
}

/// Stretch the highest-scoring scenes towards the long tier when the plan
/// is below the extension ratio of the budget.
fn extend_short_scenes(slots: &mut [Slot], total_seconds: u32, config: &DecompositionConfig) {
    let generated_total = total_of(slots);
    if slots.is_empty() || generated_total as f64 >= total_seconds as f64 * config.extend_ratio {
        return;
    }

    let unit = config.min_scene_seconds.max(1);
    let capacity = slots.len() as u32 * unit;
    // Whole units only, so extended scenes land exactly on the long tier.
    let mut shortfall = total_seconds.saturating_sub(generated_total).min(capacity) / unit * unit;

    let mut order: Vec<usize> = (0..slots.len()).collect();
    order.sort_by(|&a, &b| by_score_desc(slots[a].score, slots[b].score));

    for i in order {
        if shortfall == 0 {
            break;
        }
        let room = config.long_scene_seconds.saturating_sub(slots[i].duration);
        let extra = room.min(shortfall);
        slots[i].duration += extra;
        shortfall -= extra;
    }
}

/// Last `n` words of `text`, without trailing punctuation.
fn tail_words(text: &str, n: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    let start = words.len().saturating_sub(n);
    words[start..]
        .join(" ")
        .trim_end_matches(['.', '!', '?', ','])
        .to_string()
}

/// First `n` words of `text`, without trailing punctuation.
fn head_words(text: &str, n: usize) -> String {
    text.split_whitespace()
        .take(n)
        .collect::<Vec<_>>()
        .join(" ")
        .trim_end_matches(['.', '!', '?', ','])
        .to_string()
}

/// Build `count` filler scenes: transitions between adjacent selected scenes
/// first, then cycled establishing shots.
fn build_fillers(
    slots: &[Slot],
    count: usize,
    unit: u32,
    config: &DecompositionConfig,
) -> Vec<PlannedScene> {
    let mut fillers = Vec::with_capacity(count);

    for pair in slots.windows(2) {
        if fillers.len() == count {
            break;
        }
        let from = tail_words(&pair[0].description, config.transition_words);
        let to = head_words(&pair[1].description, config.transition_words);
        fillers.push(PlannedScene {
            description: format!("Transition from \"{from}\" leading into \"{to}\"."),
            duration_in_seconds: unit,
            kind: SceneKind::Transition,
        });
    }

    let mut pool = ESTABLISHING_SHOTS.iter().cycle();
    while fillers.len() < count {
        if let Some(shot) = pool.next() {
            fillers.push(PlannedScene {
                description: (*shot).to_string(),
                duration_in_seconds: unit,
                kind: SceneKind::Establishing,
            });
        }
    }

    fillers
}

/// Place one filler after each story scene, appending any remainder, so
/// filler never clusters at the end of a short plan.
fn interleave(slots: Vec<Slot>, fillers: Vec<PlannedScene>) -> Vec<PlannedScene> {
    let mut out = Vec::with_capacity(slots.len() + fillers.len());
    let mut fillers = fillers.into_iter();

    for slot in slots {
        out.push(PlannedScene {
            description: slot.description,
            duration_in_seconds: slot.duration,
            kind: SceneKind::Story,
        });
        if let Some(filler) = fillers.next() {
            out.push(filler);
        }
    }
    out.extend(fillers);
    out
}
