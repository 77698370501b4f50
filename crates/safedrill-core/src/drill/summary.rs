use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::engine::PlayState;

/// Read-only projection of a completed drill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub drill_id: String,
    pub steps_completed: usize,
    pub total_duration_ms: u64,
    pub completed_at: DateTime<Utc>,
}

/// Points granted for a completed drill. Supplied by the caller.
pub trait ScoringPolicy {
    fn points(&self, summary: &SessionSummary) -> u32;
}

/// The same award for every completed drill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedPoints(pub u32);

impl Default for FixedPoints {
    fn default() -> Self {
        Self(250)
    }
}

impl ScoringPolicy for FixedPoints {
    fn points(&self, _summary: &SessionSummary) -> u32 {
        self.0
    }
}

/// Points claimed for one completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Award {
    pub summary: SessionSummary,
    pub points: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SummaryError {
    #[error("summary not yet available (drill is {state:?})")]
    NotAvailable { state: PlayState },

    #[error("points for this completion were already awarded")]
    AlreadyAwarded,
}
