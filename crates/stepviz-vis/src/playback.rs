//! Playback controls for a step trace.
//!
//! [`Playback`] is a plain state machine with no timers of its own. The
//! async driver in [`crate::driver`] calls [`Playback::tick`] on a schedule
//! and uses [`Playback::epoch`] to discard ticks that belong to a superseded
//! session.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use stepviz_flow::NodeId;
use stepviz_trace::{ExecutionStep, Trace};

use crate::error::Error;

/// One of the three fixed playback intervals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum SpeedTier {
    /// One step every 2 s
    Slow,
    /// One step every second
    #[default]
    Medium,
    /// One step every 500 ms
    Fast,
}

impl SpeedTier {
    /// Milliseconds between ticks at this tier.
    pub fn interval(self) -> Duration {
        match self {
            SpeedTier::Slow => Duration::from_millis(2000),
            SpeedTier::Medium => Duration::from_millis(1000),
            SpeedTier::Fast => Duration::from_millis(500),
        }
    }
}

impl From<SpeedTier> for u8 {
    fn from(tier: SpeedTier) -> Self {
        match tier {
            SpeedTier::Slow => 1,
            SpeedTier::Medium => 2,
            SpeedTier::Fast => 3,
        }
    }
}

impl TryFrom<u8> for SpeedTier {
    type Error = Error;

    fn try_from(tier: u8) -> Result<Self, Self::Error> {
        match tier {
            1 => Ok(SpeedTier::Slow),
            2 => Ok(SpeedTier::Medium),
            3 => Ok(SpeedTier::Fast),
            other => Err(Error::InvalidSpeed(other)),
        }
    }
}

/// Current state of playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    /// Nothing selected yet
    Idle,
    /// A trace is selected and the cursor is parked
    Loaded,
    /// Advancing on the timer
    Playing,
    /// Timer stopped mid-trace
    Paused,
    /// Playback reached the last step
    Finished,
}

/// Direction for a manual step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Forward,
    Backward,
}

/// Every operation the controller accepts.
#[derive(Debug, Clone)]
pub enum PlaybackCommand {
    Select(Arc<Trace>),
    Play,
    Pause,
    Reset,
    Step(Direction),
    Seek(usize),
    SetSpeed(SpeedTier),
}

/// Playback controller for one step trace.
#[derive(Debug, Clone)]
pub struct Playback {
    trace: Option<Arc<Trace>>,
    cursor: usize,
    state: PlaybackState,
    speed: SpeedTier,
    epoch: u64,
}

impl Default for Playback {
    fn default() -> Self {
        Self::new(SpeedTier::default())
    }
}

impl Playback {
    /// Create an idle controller.
    pub fn new(speed: SpeedTier) -> Self {
        Self {
            trace: None,
            cursor: 0,
            state: PlaybackState::Idle,
            speed,
            epoch: 0,
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn speed(&self) -> SpeedTier {
        self.speed
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    /// Session counter, bumped on every state transition.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn trace(&self) -> Option<&Arc<Trace>> {
        self.trace.as_ref()
    }

    pub fn step_count(&self) -> usize {
        self.trace.as_ref().map_or(0, |t| t.step_count())
    }

    pub fn current_step(&self) -> Option<&ExecutionStep> {
        self.trace.as_ref()?.steps().get(self.cursor)
    }

    /// Delay until the next tick, or `None` when not playing.
    pub fn interval(&self) -> Option<Duration> {
        self.is_playing().then(|| self.speed.interval())
    }

    /// Progress through the trace (0.0 - 1.0).
    pub fn progress(&self) -> f64 {
        match self.step_count() {
            0 => 0.0,
            1 => 1.0,
            n => self.cursor as f64 / (n - 1) as f64,
        }
    }

    fn last_index(&self) -> usize {
        self.step_count().saturating_sub(1)
    }

    fn at_last(&self) -> bool {
        self.cursor >= self.last_index()
    }

    fn transition(&mut self, state: PlaybackState) {
        self.state = state;
        self.epoch += 1;
    }

    /// Apply one command.
    pub fn apply(&mut self, command: PlaybackCommand) {
        match command {
            PlaybackCommand::Select(trace) => self.select(trace),
            PlaybackCommand::Play => self.play(),
            PlaybackCommand::Pause => self.pause(),
            PlaybackCommand::Reset => self.reset(),
            PlaybackCommand::Step(Direction::Forward) => self.step_forward(),
            PlaybackCommand::Step(Direction::Backward) => self.step_backward(),
            PlaybackCommand::Seek(index) => self.seek(index),
            PlaybackCommand::SetSpeed(tier) => self.set_speed(tier),
        }
    }

    /// Replace the active trace and park the cursor on its first step.
    pub fn select(&mut self, trace: impl Into<Arc<Trace>>) {
        self.trace = Some(trace.into());
        self.cursor = 0;
        self.transition(PlaybackState::Loaded);
    }

    /// Start advancing. Restarts from the first step when parked on the last.
    pub fn play(&mut self) {
        if self.step_count() == 0 || self.is_playing() {
            return;
        }
        if self.at_last() {
            self.cursor = 0;
        }
        if self.at_last() {
            // Single-step trace: nothing left to animate.
            self.transition(PlaybackState::Finished);
        } else {
            self.transition(PlaybackState::Playing);
        }
    }

    pub fn pause(&mut self) {
        if self.is_playing() {
            self.transition(PlaybackState::Paused);
        }
    }

    /// Rewind to the first step and stop.
    pub fn reset(&mut self) {
        self.cursor = 0;
        let state = match self.trace {
            Some(_) => PlaybackState::Loaded,
            None => PlaybackState::Idle,
        };
        self.transition(state);
    }

    pub fn step_forward(&mut self) {
        if self.state == PlaybackState::Idle || self.at_last() {
            return;
        }
        self.cursor += 1;
        self.settle();
    }

    pub fn step_backward(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        self.settle();
    }

    /// Move the cursor, clamped into the trace.
    pub fn seek(&mut self, index: usize) {
        if self.state == PlaybackState::Idle {
            return;
        }
        self.cursor = index.min(self.last_index());
        self.settle();
    }

    /// Takes effect from the next scheduled tick.
    pub fn set_speed(&mut self, tier: SpeedTier) {
        self.speed = tier;
    }

    /// Advance one step if `epoch` is still the current session.
    ///
    /// Returns whether the cursor moved. Reaching the last step finishes
    /// playback.
    pub fn tick(&mut self, epoch: u64) -> bool {
        if epoch != self.epoch || !self.is_playing() || self.at_last() {
            return false;
        }
        self.cursor += 1;
        self.settle();
        true
    }

    // Playing never rests on the last step, Finished never rests before it.
    fn settle(&mut self) {
        match self.state {
            PlaybackState::Playing if self.at_last() => self.transition(PlaybackState::Finished),
            PlaybackState::Finished if !self.at_last() => self.transition(PlaybackState::Paused),
            _ => {}
        }
    }

    /// Data for the diagram, code and trace-log views at the cursor.
    pub fn view(&self) -> PlaybackView {
        let Some(trace) = &self.trace else {
            return PlaybackView::default();
        };
        let steps = trace.steps();
        let current = steps.get(self.cursor);
        let log = steps
            .iter()
            .take(self.cursor + 1)
            .map(|step| TraceLogLine {
                index: step.index,
                label: format!("Step {}", step.index + 1),
                action: step.action.clone(),
                message: step.message.clone(),
                active: step.index == self.cursor,
            })
            .collect();
        let final_answer = match steps.last() {
            Some(last) if self.at_last() => Some(format!("Final Answer: {}", last.message)),
            _ => None,
        };

        PlaybackView {
            algorithm: Some(trace.algorithm().to_owned()),
            cursor: self.cursor,
            step_count: steps.len(),
            current_step: current.cloned(),
            highlighted_line: current.and_then(|s| s.source_line),
            highlighted_node: current.and_then(|s| s.flow_node.clone()),
            log,
            final_answer,
        }
    }
}

/// Playback status for sending to frontend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackStatus {
    pub state: PlaybackState,
    pub cursor: usize,
    pub step_count: usize,
    pub is_playing: bool,
    pub speed_tier: SpeedTier,
    pub progress: f64,
}

impl From<&Playback> for PlaybackStatus {
    fn from(playback: &Playback) -> Self {
        Self {
            state: playback.state,
            cursor: playback.cursor,
            step_count: playback.step_count(),
            is_playing: playback.is_playing(),
            speed_tier: playback.speed,
            progress: playback.progress(),
        }
    }
}

/// One line of the rendered trace log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceLogLine {
    pub index: usize,
    pub label: String,
    pub action: String,
    pub message: String,
    pub active: bool,
}

/// Everything the synchronized views need at the current cursor.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackView {
    pub algorithm: Option<String>,
    pub cursor: usize,
    pub step_count: usize,
    pub current_step: Option<ExecutionStep>,
    /// Cleared when the current step names no source line
    pub highlighted_line: Option<u32>,
    pub highlighted_node: Option<NodeId>,
    pub log: Vec<TraceLogLine>,
    pub final_answer: Option<String>,
}
