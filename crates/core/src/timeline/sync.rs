//! Playhead state and audio drift correction.

use serde::Serialize;
use tokio::time::Instant;

use super::{active_scene_index, schedule_scenes, timeline_duration, ScheduledScene};
use crate::project::Scene;

/// Seconds added to the playhead per internal tick.
pub const TICK_SECONDS: f64 = 0.1;

/// Maximum allowed gap between the audio clock and the playhead before the
/// audio is re-seeked.
pub const DRIFT_TOLERANCE_SECS: f64 = 0.5;

/// Slack for floating-point accumulation when detecting the end of the
/// timeline.
const END_EPSILON: f64 = 1e-6;

// ---------------------------------------------------------------------------
// Audio clock
// ---------------------------------------------------------------------------

/// A secondary media clock (usually an audio player) kept in step with the
/// playhead. Only the synchronizer drives it.
pub trait AudioClock: Send {
    /// Current playback position in seconds.
    fn position(&self) -> f64;
    fn seek(&mut self, seconds: f64);
    fn play(&mut self);
    fn pause(&mut self);
}

/// Audio clock that advances in real (tokio) time while playing.
///
/// Stands in for an external player when only the numeric position matters.
#[derive(Debug, Clone)]
pub struct SimulatedAudioClock {
    base: f64,
    started: Option<Instant>,
    length: Option<f64>,
}

impl SimulatedAudioClock {
    pub fn new(length: Option<f64>) -> Self {
        Self {
            base: 0.0,
            started: None,
            length,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.started.is_some()
    }
}

impl AudioClock for SimulatedAudioClock {
    fn position(&self) -> f64 {
        let elapsed = self
            .started
            .map(|s| s.elapsed().as_secs_f64())
            .unwrap_or(0.0);
        let position = self.base + elapsed;
        match self.length {
            Some(length) => position.min(length),
            None => position,
        }
    }

    fn seek(&mut self, seconds: f64) {
        self.base = seconds.max(0.0);
        if self.started.is_some() {
            self.started = Some(Instant::now());
        }
    }

    fn play(&mut self) {
        if self.started.is_none() {
            self.started = Some(Instant::now());
        }
    }

    fn pause(&mut self) {
        self.base = self.position();
        self.started = None;
    }
}

// ---------------------------------------------------------------------------
// Synchronizer
// ---------------------------------------------------------------------------

/// Who advances the playhead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClockSource {
    /// The synchronizer's own tick (see [`PlaybackDriver`](super::PlaybackDriver)).
    Internal,
    /// An owner pushes `current_time`/`is_playing` via
    /// [`TimelineSynchronizer::apply_external`]; ticks are ignored.
    External,
}

/// Result of a single internal tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing moved (paused, or externally clocked).
    Idle,
    Advanced,
    /// The playhead reached the end; playback stopped and rewound.
    Ended,
}

/// Read-only projection of the playback state for views.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackSnapshot {
    pub current_time: f64,
    pub is_playing: bool,
    pub total_duration: f64,
    pub active_scene_index: Option<usize>,
    pub active_scene_id: Option<String>,
    pub source: ClockSource,
}

/// Owns the playhead for one timeline.
pub struct TimelineSynchronizer {
    scenes: Vec<ScheduledScene>,
    total_duration: f64,
    current_time: f64,
    is_playing: bool,
    source: ClockSource,
    audio: Option<Box<dyn AudioClock>>,
    drift_tolerance: f64,
}

impl std::fmt::Debug for TimelineSynchronizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimelineSynchronizer")
            .field("scenes", &self.scenes.len())
            .field("total_duration", &self.total_duration)
            .field("current_time", &self.current_time)
            .field("is_playing", &self.is_playing)
            .field("source", &self.source)
            .field("has_audio", &self.audio.is_some())
            .finish()
    }
}

impl TimelineSynchronizer {
    /// Internally clocked synchronizer over `scenes`, stopped at zero.
    pub fn new(scenes: &[Scene]) -> Self {
        let scenes = schedule_scenes(scenes);
        let total_duration = timeline_duration(&scenes);
        Self {
            scenes,
            total_duration,
            current_time: 0.0,
            is_playing: false,
            source: ClockSource::Internal,
            audio: None,
            drift_tolerance: DRIFT_TOLERANCE_SECS,
        }
    }

    pub fn with_source(mut self, source: ClockSource) -> Self {
        self.source = source;
        self
    }

    pub fn with_audio(mut self, audio: Box<dyn AudioClock>) -> Self {
        self.attach_audio(audio);
        self
    }

    pub fn with_drift_tolerance(mut self, seconds: f64) -> Self {
        self.drift_tolerance = seconds.max(0.0);
        self
    }

    /// Attach an audio clock, aligning it with the current playhead.
    pub fn attach_audio(&mut self, mut audio: Box<dyn AudioClock>) {
        audio.seek(self.current_time);
        if self.is_playing {
            audio.play();
        } else {
            audio.pause();
        }
        self.audio = Some(audio);
    }

    pub fn detach_audio(&mut self) -> Option<Box<dyn AudioClock>> {
        self.audio.take()
    }

    /// Replace the scene list (after durations or order changed). The
    /// playhead is kept, clamped to the new length.
    pub fn set_scenes(&mut self, scenes: &[Scene]) {
        self.scenes = schedule_scenes(scenes);
        self.total_duration = timeline_duration(&self.scenes);
        if self.current_time > self.total_duration {
            self.current_time = self.total_duration;
            self.force_audio_sync();
        }
    }

    pub fn scenes(&self) -> &[ScheduledScene] {
        &self.scenes
    }

    pub fn total_duration(&self) -> f64 {
        self.total_duration
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn source(&self) -> ClockSource {
        self.source
    }

    pub fn active_scene_index(&self) -> Option<usize> {
        active_scene_index(&self.scenes, self.current_time)
    }

    pub fn active_scene(&self) -> Option<&ScheduledScene> {
        self.active_scene_index().map(|i| &self.scenes[i])
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        let active = self.active_scene_index();
        PlaybackSnapshot {
            current_time: self.current_time,
            is_playing: self.is_playing,
            total_duration: self.total_duration,
            active_scene_index: active,
            active_scene_id: active.map(|i| self.scenes[i].scene.id.clone()),
            source: self.source,
        }
    }

    // -- commands -------------------------------------------------------------

    /// Start playing. An empty timeline stays stopped.
    pub fn play(&mut self) {
        if self.total_duration <= 0.0 {
            return;
        }
        if self.current_time >= self.total_duration - END_EPSILON {
            self.current_time = 0.0;
        }
        self.is_playing = true;
        if let Some(audio) = self.audio.as_mut() {
            audio.seek(self.current_time);
            audio.play();
        }
    }

    pub fn pause(&mut self) {
        self.is_playing = false;
        if let Some(audio) = self.audio.as_mut() {
            audio.pause();
        }
    }

    /// Stop and rewind; the audio clock is forced back to zero.
    pub fn stop(&mut self) {
        self.is_playing = false;
        self.current_time = 0.0;
        if let Some(audio) = self.audio.as_mut() {
            audio.pause();
            audio.seek(0.0);
        }
    }

    /// Jump to `time`, clamped into `[0, total]`. The audio clock is seeked
    /// unconditionally.
    pub fn seek(&mut self, time: f64) -> PlaybackSnapshot {
        let time = if time.is_finite() { time } else { 0.0 };
        self.current_time = time.clamp(0.0, self.total_duration);
        self.force_audio_sync();
        self.snapshot()
    }

    /// Advance an internally clocked, playing timeline by `seconds`.
    pub fn tick(&mut self, seconds: f64) -> TickOutcome {
        if self.source != ClockSource::Internal || !self.is_playing {
            return TickOutcome::Idle;
        }

        self.current_time += seconds;
        if self.current_time >= self.total_duration - END_EPSILON {
            tracing::debug!(total = self.total_duration, "Playback reached end of timeline");
            self.stop();
            return TickOutcome::Ended;
        }

        self.correct_audio_drift();
        TickOutcome::Advanced
    }

    /// Take the playhead from an external owner. Only the drift-tolerant
    /// audio correction runs; the owner's clock is authoritative.
    pub fn apply_external(&mut self, current_time: f64, is_playing: bool) -> PlaybackSnapshot {
        let current_time = if current_time.is_finite() {
            current_time
        } else {
            0.0
        };
        self.current_time = current_time.clamp(0.0, self.total_duration);

        if is_playing != self.is_playing {
            self.is_playing = is_playing;
            if let Some(audio) = self.audio.as_mut() {
                if is_playing {
                    audio.play();
                } else {
                    audio.pause();
                }
            }
        }

        self.correct_audio_drift();
        self.snapshot()
    }

    fn correct_audio_drift(&mut self) {
        let current = self.current_time;
        let tolerance = self.drift_tolerance;
        if let Some(audio) = self.audio.as_mut() {
            let drift = (audio.position() - current).abs();
            if drift > tolerance {
                tracing::trace!(drift, current, "Re-seeking audio clock");
                audio.seek(current);
            }
        }
    }

    fn force_audio_sync(&mut self) {
        let current = self.current_time;
        if let Some(audio) = self.audio.as_mut() {
            audio.seek(current);
        }
    }
}
