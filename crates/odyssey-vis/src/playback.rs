//! Playback engine: a bounded cursor over one trace plus auto-advance timing.
//!
//! The engine does no I/O and owns no timer. Arming a tick hands the caller a
//! [`ScheduledTick`]; the caller sleeps for `delay` and feeds the token back
//! through [`PlaybackEngine::tick`]. Only the most recently armed token is
//! honored, so a tick that races a pause, seek or load is discarded instead of
//! moving the cursor.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use odyssey_trace::{Snapshot, Trace};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::PlaybackConfig;

/// Slowest accepted speed multiplier.
pub const MIN_SPEED: f64 = 0.1;
/// Fastest accepted speed multiplier.
pub const MAX_SPEED: f64 = 16.0;

/// Playback speed multiplier: the tick interval is `base / multiplier`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct PlaybackSpeed(f64);

impl PlaybackSpeed {
    /// 0.5x speed
    pub const HALF: Self = Self(0.5);
    /// Normal speed (1x)
    pub const NORMAL: Self = Self(1.0);
    /// 2x speed
    pub const DOUBLE: Self = Self(2.0);
    /// 4x speed
    pub const QUADRUPLE: Self = Self(4.0);

    /// A speed, if `multiplier` is finite and within `MIN_SPEED..=MAX_SPEED`.
    pub fn new(multiplier: f64) -> Option<Self> {
        (multiplier.is_finite() && (MIN_SPEED..=MAX_SPEED).contains(&multiplier))
            .then_some(Self(multiplier))
    }

    /// Get the speed multiplier.
    pub fn multiplier(&self) -> f64 {
        self.0
    }

    /// Interval between ticks at this speed.
    pub fn interval(&self, base: Duration) -> Duration {
        base.div_f64(self.0)
    }
}

impl Default for PlaybackSpeed {
    fn default() -> Self {
        Self::NORMAL
    }
}

impl TryFrom<f64> for PlaybackSpeed {
    type Error = String;

    fn try_from(multiplier: f64) -> Result<Self, Self::Error> {
        Self::new(multiplier).ok_or_else(|| {
            format!("speed must be between {MIN_SPEED} and {MAX_SPEED}, got {multiplier}")
        })
    }
}

impl From<PlaybackSpeed> for f64 {
    fn from(speed: PlaybackSpeed) -> Self {
        speed.0
    }
}

impl FromStr for PlaybackSpeed {
    type Err = String;

    /// Accepts `2`, `2x` and `0.5x`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim().trim_end_matches(['x', 'X']);
        let multiplier: f64 = digits
            .parse()
            .map_err(|_| format!("not a speed: {s:?}"))?;
        Self::try_from(multiplier)
    }
}

impl fmt::Display for PlaybackSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x", self.0)
    }
}

/// Current state of playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackState {
    /// No trace loaded
    Idle,
    /// Cursor is still
    Paused,
    /// A tick is armed and the cursor will advance
    Playing,
}

/// Identity of one armed tick. Stale once the engine arms another or cancels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickToken {
    trace: u64,
    slot: u64,
}

/// A tick the caller must deliver back after `delay`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledTick {
    pub token: TickToken,
    pub delay: Duration,
}

/// What a delivered tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The token was cancelled or superseded; nothing changed
    Stale,
    /// The cursor advanced and the next tick is armed
    Advanced(ScheduledTick),
    /// The cursor reached the last step and playback paused
    Finished,
}

/// Cursor and timing state over one trace.
#[derive(Debug)]
pub struct PlaybackEngine {
    trace: Option<Arc<Trace>>,
    generation: u64,
    index: usize,
    playing: bool,
    speed: PlaybackSpeed,
    base_interval: Duration,
    armed: Option<TickToken>,
    next_slot: u64,
}

impl PlaybackEngine {
    /// Create an idle engine.
    pub fn new(config: &PlaybackConfig) -> Self {
        Self {
            trace: None,
            generation: 0,
            index: 0,
            playing: false,
            speed: config.speed,
            base_interval: config.base_interval,
            armed: None,
            next_slot: 0,
        }
    }

    /// Replace the trace, rewind to step 0 and pause. Any armed tick goes stale.
    pub fn load(&mut self, trace: Arc<Trace>) {
        debug!(algorithm = trace.algorithm(), steps = trace.len(), "loading trace");
        self.generation += 1;
        self.trace = Some(trace);
        self.index = 0;
        self.cancel();
    }

    /// Get the current playback state.
    pub fn state(&self) -> PlaybackState {
        match (&self.trace, self.playing) {
            (None, _) => PlaybackState::Idle,
            (Some(_), true) => PlaybackState::Playing,
            (Some(_), false) => PlaybackState::Paused,
        }
    }

    /// Whether auto-advance is on.
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Cursor position, 0 when idle.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of steps in the loaded trace, 0 when idle.
    pub fn len(&self) -> usize {
        self.trace.as_ref().map_or(0, |t| t.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current speed multiplier.
    pub fn speed(&self) -> PlaybackSpeed {
        self.speed
    }

    /// The loaded trace, if any.
    pub fn trace(&self) -> Option<&Arc<Trace>> {
        self.trace.as_ref()
    }

    /// Snapshot under the cursor.
    pub fn current(&self) -> Option<&Snapshot> {
        self.trace.as_ref().and_then(|t| t.get(self.index))
    }

    /// The tick the engine is waiting for, if any.
    pub fn pending(&self) -> Option<TickToken> {
        self.armed
    }

    fn last_index(&self) -> Option<usize> {
        self.trace.as_ref().map(|t| t.last_index())
    }

    fn at_last(&self) -> bool {
        self.last_index() == Some(self.index)
    }

    fn cancel(&mut self) {
        self.playing = false;
        self.armed = None;
    }

    fn arm(&mut self) -> ScheduledTick {
        self.next_slot += 1;
        let token = TickToken {
            trace: self.generation,
            slot: self.next_slot,
        };
        self.armed = Some(token);
        ScheduledTick {
            token,
            delay: self.speed.interval(self.base_interval),
        }
    }

    /// Move the cursor, clamped to the trace. While playing, the pending tick
    /// is replaced so the full interval elapses at the new position; landing
    /// on the last step pauses instead.
    pub fn goto(&mut self, step: usize) -> Option<ScheduledTick> {
        let last = self.last_index()?;
        self.index = step.min(last);
        if !self.playing {
            return None;
        }
        if self.at_last() {
            self.cancel();
            return None;
        }
        Some(self.arm())
    }

    /// Step forward one step; a no-op at the last step.
    pub fn next(&mut self) -> Option<ScheduledTick> {
        self.goto(self.index.saturating_add(1))
    }

    /// Step back one step; a no-op at step 0.
    pub fn prev(&mut self) -> Option<ScheduledTick> {
        self.goto(self.index.saturating_sub(1))
    }

    /// Start auto-advance. Does nothing when idle, at the last step, or
    /// already playing.
    pub fn play(&mut self) -> Option<ScheduledTick> {
        if self.trace.is_none() || self.playing || self.at_last() {
            return None;
        }
        self.playing = true;
        debug!(index = self.index, speed = %self.speed, "play");
        Some(self.arm())
    }

    /// Stop auto-advance. Idempotent.
    pub fn pause(&mut self) {
        if self.playing {
            debug!(index = self.index, "pause");
        }
        self.cancel();
    }

    /// Change speed. A pending tick keeps its delay; the next one uses the new interval.
    pub fn set_speed(&mut self, speed: PlaybackSpeed) {
        self.speed = speed;
    }

    /// Pause and rewind to step 0.
    pub fn reset(&mut self) {
        self.cancel();
        if self.trace.is_some() {
            self.index = 0;
        }
    }

    /// Deliver an armed tick.
    pub fn tick(&mut self, token: TickToken) -> TickOutcome {
        if self.armed != Some(token) || !self.playing {
            trace!(?token, "discarding stale tick");
            return TickOutcome::Stale;
        }
        self.armed = None;
        self.index += 1;
        if self.at_last() {
            self.playing = false;
            debug!(index = self.index, "playback finished");
            return TickOutcome::Finished;
        }
        TickOutcome::Advanced(self.arm())
    }

    /// Fraction of the trace shown so far: `(index + 1) / len`, 0 when idle.
    pub fn progress(&self) -> f64 {
        match self.len() {
            0 => 0.0,
            len => (self.index + 1) as f64 / len as f64,
        }
    }

    /// Summary of the engine for clients.
    pub fn status(&self) -> PlaybackStatus {
        PlaybackStatus::from(self)
    }
}

/// Playback status for sending to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackStatus {
    pub current_step: usize,
    pub total_steps: usize,
    pub state: PlaybackState,
    pub speed: PlaybackSpeed,
    pub progress: f64,
    pub algorithm: Option<String>,
}

impl PlaybackStatus {
    /// Status of an engine with nothing loaded.
    pub fn idle(speed: PlaybackSpeed) -> Self {
        Self {
            current_step: 0,
            total_steps: 0,
            state: PlaybackState::Idle,
            speed,
            progress: 0.0,
            algorithm: None,
        }
    }
}

impl From<&PlaybackEngine> for PlaybackStatus {
    fn from(engine: &PlaybackEngine) -> Self {
        Self {
            current_step: engine.index,
            total_steps: engine.len(),
            state: engine.state(),
            speed: engine.speed,
            progress: engine.progress(),
            algorithm: engine.trace.as_ref().map(|t| t.algorithm().to_string()),
        }
    }
}
