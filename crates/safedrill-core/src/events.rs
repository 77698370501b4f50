use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::drill::{AlarmState, PlayState};

/// Every state change of a drill produces an Event.
/// Front ends render them; the CLI prints them as JSON lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    DrillStarted {
        drill_id: String,
        step_index: usize,
        at: DateTime<Utc>,
    },
    DrillPaused {
        step_index: usize,
        step_progress: f64,
        at: DateTime<Utc>,
    },
    DrillResumed {
        step_index: usize,
        step_progress: f64,
        at: DateTime<Utc>,
    },
    /// A step reached 100% and the settle window began.
    StepCompleted {
        step_index: usize,
        step_id: String,
        at: DateTime<Utc>,
    },
    /// The settle window ended and the next step became current.
    StepAdvanced {
        step_index: usize,
        step_id: String,
        duration_ms: u64,
        at: DateTime<Utc>,
    },
    /// Emitted exactly once per reset cycle.
    DrillCompleted {
        drill_id: String,
        steps_completed: usize,
        at: DateTime<Utc>,
    },
    DrillReset {
        at: DateTime<Utc>,
    },
    AlarmToggled {
        enabled: bool,
        at: DateTime<Utc>,
    },
    /// Non-fatal: the drill continues without sound.
    AlarmUnavailable {
        reason: String,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        drill_id: String,
        state: PlayState,
        step_index: usize,
        step_title: String,
        step_progress: f64,
        drill_progress_pct: f64,
        alarm_state: AlarmState,
        alarm_enabled: bool,
        settling: bool,
        at: DateTime<Utc>,
    },
}
