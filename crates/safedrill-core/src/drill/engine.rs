//! Drill engine implementation.
//!
//! The drill engine is a tick-driven state machine. It does not use internal
//! threads or timers - the caller delivers elapsed time through `tick()`.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running <-> Settling -> Running ... -> Completed
//!           |  ^         |  ^
//!           v  |         v  |
//!          Paused       Paused
//! ```
//!
//! `Settling` is the short pause between a step reaching 100% and the next
//! step starting. It is reported to callers as `Running` with `settling` set.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = DrillEngine::new(drill);
//! let t = engine.play();          // t.commands: [AlarmCommand::Start]
//! // In a loop:
//! let t = engine.tick(100);       // t.status carries progress for rendering
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::alarm::{AlarmCommand, AlarmUnavailable};
use super::step::{Drill, Step};
use super::summary::{Award, ScoringPolicy, SessionSummary, SummaryError};
use crate::events::Event;

pub const DEFAULT_SETTLE_DELAY_MS: u64 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayState {
    Idle,
    Running,
    Paused,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlarmState {
    Off,
    On,
}

/// Tunables injected at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrillOptions {
    /// Pause between a step reaching 100% and the next step starting.
    pub settle_delay_ms: u64,
    /// Initial value of the caller-controlled alarm toggle.
    pub alarm_enabled: bool,
}

impl Default for DrillOptions {
    fn default() -> Self {
        Self {
            settle_delay_ms: DEFAULT_SETTLE_DELAY_MS,
            alarm_enabled: true,
        }
    }
}

/// What a caller needs to render the drill after any command.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrillStatus {
    pub current_index: usize,
    /// 0.0 ..= 100.0 within the current step.
    pub step_progress: f64,
    pub play_state: PlayState,
    pub alarm_state: AlarmState,
    pub alarm_enabled: bool,
    pub settling: bool,
}

impl DrillStatus {
    /// True for the `(0, 0, Idle, Off)` tuple every drill starts from.
    pub fn is_initial(&self) -> bool {
        self.current_index == 0
            && self.step_progress == 0.0
            && self.play_state == PlayState::Idle
            && self.alarm_state == AlarmState::Off
    }
}

/// Result of one engine command.
///
/// `commands` must be executed against the alarm in order.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub status: DrillStatus,
    pub commands: Vec<AlarmCommand>,
    pub events: Vec<Event>,
}

impl Transition {
    /// Nothing happened besides (possibly) progress moving.
    pub fn is_quiet(&self) -> bool {
        self.commands.is_empty() && self.events.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Running,
    Settling { remaining_ms: u64 },
    Paused { settle_remaining_ms: Option<u64> },
    Completed { at: DateTime<Utc> },
}

#[derive(Default)]
struct Effects {
    commands: Vec<AlarmCommand>,
    events: Vec<Event>,
}

/// Core drill engine. Owns the session state of one drill attempt.
#[derive(Debug, Clone)]
pub struct DrillEngine {
    drill: Drill,
    options: DrillOptions,
    phase: Phase,
    current_index: usize,
    /// Time spent on the current step, capped at its duration.
    step_elapsed_ms: u64,
    alarm_enabled: bool,
    alarm_on: bool,
    /// Latched after a failed start until the next reset.
    alarm_unavailable: bool,
    awarded: bool,
}

impl DrillEngine {
    pub fn new(drill: Drill) -> Self {
        Self::with_options(drill, DrillOptions::default())
    }

    pub fn with_options(drill: Drill, options: DrillOptions) -> Self {
        Self {
            drill,
            options,
            phase: Phase::Idle,
            current_index: 0,
            step_elapsed_ms: 0,
            alarm_enabled: options.alarm_enabled,
            alarm_on: false,
            alarm_unavailable: false,
            awarded: false,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn drill(&self) -> &Drill {
        &self.drill
    }

    pub fn play_state(&self) -> PlayState {
        match self.phase {
            Phase::Idle => PlayState::Idle,
            Phase::Running | Phase::Settling { .. } => PlayState::Running,
            Phase::Paused { .. } => PlayState::Paused,
            Phase::Completed { .. } => PlayState::Completed,
        }
    }

    pub fn is_running(&self) -> bool {
        self.play_state() == PlayState::Running
    }

    pub fn is_settling(&self) -> bool {
        matches!(self.phase, Phase::Settling { .. })
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_step(&self) -> Option<&Step> {
        self.drill.step(self.current_index)
    }

    pub fn alarm_enabled(&self) -> bool {
        self.alarm_enabled
    }

    pub fn alarm_state(&self) -> AlarmState {
        if self.alarm_on {
            AlarmState::On
        } else {
            AlarmState::Off
        }
    }

    /// 0.0 .. 100.0 progress within the current step.
    pub fn step_progress(&self) -> f64 {
        let Some(step) = self.current_step() else {
            return 100.0;
        };
        if self.step_done() {
            return 100.0;
        }
        if step.duration_ms == 0 {
            return 0.0;
        }
        (self.step_elapsed_ms as f64 / step.duration_ms as f64 * 100.0).min(100.0)
    }

    /// Milliseconds left in the settle window, if one is open.
    pub fn settle_remaining_ms(&self) -> Option<u64> {
        match self.phase {
            Phase::Settling { remaining_ms } => Some(remaining_ms),
            Phase::Paused {
                settle_remaining_ms,
            } => settle_remaining_ms,
            _ => None,
        }
    }

    /// 0.0 .. 100.0 progress across the entire drill.
    pub fn drill_progress_pct(&self) -> f64 {
        let len = self.drill.len() as f64;
        let done = self.current_index.min(self.drill.len()) as f64;
        let partial = if self.current_index < self.drill.len() {
            self.step_progress() / len
        } else {
            0.0
        };
        (done / len * 100.0 + partial).min(100.0)
    }

    pub fn status(&self) -> DrillStatus {
        DrillStatus {
            current_index: self.current_index,
            step_progress: self.step_progress(),
            play_state: self.play_state(),
            alarm_state: self.alarm_state(),
            alarm_enabled: self.alarm_enabled,
            settling: self.is_settling(),
        }
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            drill_id: self.drill.id.clone(),
            state: self.play_state(),
            step_index: self.current_index,
            step_title: self
                .current_step()
                .map(|s| s.title.clone())
                .unwrap_or_default(),
            step_progress: self.step_progress(),
            drill_progress_pct: self.drill_progress_pct(),
            alarm_state: self.alarm_state(),
            alarm_enabled: self.alarm_enabled,
            settling: self.is_settling(),
            at: Utc::now(),
        }
    }

    /// Summary of the finished drill. Only available once Completed.
    pub fn summary(&self) -> Result<SessionSummary, SummaryError> {
        match self.phase {
            Phase::Completed { at } => Ok(SessionSummary {
                drill_id: self.drill.id.clone(),
                steps_completed: self.drill.len(),
                total_duration_ms: self.drill.total_duration_ms(),
                completed_at: at,
            }),
            _ => Err(SummaryError::NotAvailable {
                state: self.play_state(),
            }),
        }
    }

    /// Claim the points for this completion. Succeeds once per reset cycle.
    pub fn award(&mut self, policy: &dyn ScoringPolicy) -> Result<Award, SummaryError> {
        let summary = self.summary()?;
        if self.awarded {
            return Err(SummaryError::AlreadyAwarded);
        }
        self.awarded = true;
        let points = policy.points(&summary);
        info!(drill = %summary.drill_id, points, "completion awarded");
        Ok(Award { summary, points })
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn play(&mut self) -> Transition {
        let mut fx = Effects::default();
        match self.phase {
            Phase::Idle => {
                self.phase = Phase::Running;
                info!(drill = %self.drill.id, "drill started");
                fx.events.push(Event::DrillStarted {
                    drill_id: self.drill.id.clone(),
                    step_index: self.current_index,
                    at: Utc::now(),
                });
                self.request_start(&mut fx);
            }
            Phase::Paused {
                settle_remaining_ms,
            } => {
                self.phase = match settle_remaining_ms {
                    Some(remaining_ms) => Phase::Settling { remaining_ms },
                    None => Phase::Running,
                };
                info!(drill = %self.drill.id, step = self.current_index, "drill resumed");
                fx.events.push(Event::DrillResumed {
                    step_index: self.current_index,
                    step_progress: self.step_progress(),
                    at: Utc::now(),
                });
                self.request_start(&mut fx);
            }
            Phase::Running | Phase::Settling { .. } | Phase::Completed { .. } => {
                debug!(state = ?self.play_state(), "play ignored");
            }
        }
        self.finish(fx)
    }

    pub fn pause(&mut self) -> Transition {
        let mut fx = Effects::default();
        let settle_remaining_ms = match self.phase {
            Phase::Running => Some(None),
            Phase::Settling { remaining_ms } => Some(Some(remaining_ms)),
            _ => None,
        };
        match settle_remaining_ms {
            Some(settle_remaining_ms) => {
                self.phase = Phase::Paused {
                    settle_remaining_ms,
                };
                info!(drill = %self.drill.id, step = self.current_index, "drill paused");
                fx.events.push(Event::DrillPaused {
                    step_index: self.current_index,
                    step_progress: self.step_progress(),
                    at: Utc::now(),
                });
                self.request_stop(&mut fx);
            }
            None => debug!(state = ?self.play_state(), "pause ignored"),
        }
        self.finish(fx)
    }

    /// Return to the initial state from anywhere, silencing the alarm.
    ///
    /// The alarm toggle survives a reset; the unavailable latch and the
    /// award latch do not.
    pub fn reset(&mut self) -> Transition {
        let mut fx = Effects::default();
        self.phase = Phase::Idle;
        self.current_index = 0;
        self.step_elapsed_ms = 0;
        self.alarm_unavailable = false;
        self.awarded = false;
        self.request_stop(&mut fx);
        info!(drill = %self.drill.id, "drill reset");
        fx.events.push(Event::DrillReset { at: Utc::now() });
        self.finish(fx)
    }

    pub fn toggle_alarm(&mut self) -> Transition {
        let mut fx = Effects::default();
        self.alarm_enabled = !self.alarm_enabled;
        debug!(enabled = self.alarm_enabled, "alarm toggled");
        fx.events.push(Event::AlarmToggled {
            enabled: self.alarm_enabled,
            at: Utc::now(),
        });
        if self.alarm_enabled {
            if self.is_running() {
                self.request_start(&mut fx);
            }
        } else {
            self.request_stop(&mut fx);
        }
        self.finish(fx)
    }

    /// Advance time. Discarded unless Running, and for zero elapsed time.
    pub fn tick(&mut self, elapsed_ms: u64) -> Transition {
        let mut fx = Effects::default();
        if elapsed_ms == 0 {
            return self.finish(fx);
        }
        match self.phase {
            Phase::Running => self.consume_step_time(elapsed_ms, &mut fx),
            Phase::Settling { remaining_ms } => {
                let remaining_ms = remaining_ms.saturating_sub(elapsed_ms);
                if remaining_ms == 0 {
                    self.end_settle(&mut fx);
                } else {
                    self.phase = Phase::Settling { remaining_ms };
                }
            }
            Phase::Idle | Phase::Paused { .. } | Phase::Completed { .. } => {
                debug!(elapsed_ms, state = ?self.play_state(), "tick discarded");
            }
        }
        self.finish(fx)
    }

    /// Feedback from the alarm layer that `start` failed.
    ///
    /// The alarm stays off until the next reset; the drill carries on.
    pub fn alarm_unavailable(&mut self, err: &AlarmUnavailable) -> Transition {
        let mut fx = Effects::default();
        warn!(reason = %err.reason, "alarm unavailable, continuing without sound");
        self.alarm_unavailable = true;
        self.alarm_on = false;
        fx.events.push(Event::AlarmUnavailable {
            reason: err.reason.clone(),
            at: Utc::now(),
        });
        self.finish(fx)
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn step_done(&self) -> bool {
        match self.phase {
            Phase::Settling { .. } => true,
            Phase::Paused {
                settle_remaining_ms,
            } => settle_remaining_ms.is_some(),
            _ => false,
        }
    }

    fn consume_step_time(&mut self, elapsed_ms: u64, fx: &mut Effects) {
        let Some(step) = self.drill.step(self.current_index) else {
            return;
        };
        let duration_ms = step.duration_ms;
        self.step_elapsed_ms = self
            .step_elapsed_ms
            .saturating_add(elapsed_ms)
            .min(duration_ms);
        if self.step_elapsed_ms < duration_ms {
            return;
        }

        debug!(step = self.current_index, id = %step.id, "step completed");
        fx.events.push(Event::StepCompleted {
            step_index: self.current_index,
            step_id: step.id.clone(),
            at: Utc::now(),
        });
        if self.options.settle_delay_ms == 0 {
            self.end_settle(fx);
        } else {
            self.phase = Phase::Settling {
                remaining_ms: self.options.settle_delay_ms,
            };
        }
    }

    fn end_settle(&mut self, fx: &mut Effects) {
        if self.current_index + 1 < self.drill.len() {
            self.current_index += 1;
            self.step_elapsed_ms = 0;
            self.phase = Phase::Running;
            let step = &self.drill.steps[self.current_index];
            debug!(step = self.current_index, id = %step.id, "step advanced");
            fx.events.push(Event::StepAdvanced {
                step_index: self.current_index,
                step_id: step.id.clone(),
                duration_ms: step.duration_ms,
                at: Utc::now(),
            });
        } else {
            self.complete(fx);
        }
    }

    fn complete(&mut self, fx: &mut Effects) {
        let at = Utc::now();
        self.current_index = self.drill.len();
        self.step_elapsed_ms = 0;
        self.phase = Phase::Completed { at };
        self.request_stop(fx);
        info!(drill = %self.drill.id, steps = self.drill.len(), "drill completed");
        fx.events.push(Event::DrillCompleted {
            drill_id: self.drill.id.clone(),
            steps_completed: self.drill.len(),
            at,
        });
    }

    fn request_start(&mut self, fx: &mut Effects) {
        if self.alarm_enabled && !self.alarm_unavailable && !self.alarm_on {
            self.alarm_on = true;
            fx.commands.push(AlarmCommand::Start);
        }
    }

    fn request_stop(&mut self, fx: &mut Effects) {
        self.alarm_on = false;
        fx.commands.push(AlarmCommand::Stop);
    }

    fn finish(&self, fx: Effects) -> Transition {
        Transition {
            status: self.status(),
            commands: fx.commands,
            events: fx.events,
        }
    }
}
