mod alarm;
mod catalog;
mod controller;
mod engine;
mod step;
mod summary;

pub use alarm::{AlarmCommand, AlarmSignal, AlarmUnavailable, MockAlarm, SilentAlarm};
pub use catalog::{DrillCatalog, FALLBACK_KIND};
pub use controller::DrillController;
pub use engine::{
    AlarmState, DrillEngine, DrillOptions, DrillStatus, PlayState, Transition,
    DEFAULT_SETTLE_DELAY_MS,
};
pub use step::{Drill, DrillDef, Step, StepDef};
pub use summary::{Award, FixedPoints, ScoringPolicy, SessionSummary, SummaryError};
