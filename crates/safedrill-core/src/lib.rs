//! # SafeDrill Core Library
//!
//! This library provides the core logic for SafeDrill, a disaster
//! preparedness drill runner. Front ends (the `safedrill` CLI, or any GUI)
//! are thin layers over the same engine.
//!
//! ## Architecture
//!
//! - **Drill Engine**: A tick-driven state machine that walks an ordered list
//!   of timed steps. The caller delivers elapsed time through `tick()`.
//! - **Alarm**: The engine emits start/stop commands; a controller executes
//!   them against an injected [`AlarmSignal`] and absorbs failures.
//! - **Ticker**: Turns a clock into elapsed-time samples for the engine.
//! - **Storage**: TOML-based configuration
//!
//! ## Key Components
//!
//! - [`DrillEngine`]: Core drill state machine
//! - [`DrillController`]: Engine plus alarm side effects
//! - [`DrillCatalog`]: Built-in and custom drills
//! - [`Config`]: Application configuration management

pub mod drill;
pub mod error;
pub mod events;
pub mod storage;
pub mod ticker;

pub use drill::{
    AlarmCommand, AlarmSignal, AlarmState, AlarmUnavailable, Award, Drill, DrillCatalog,
    DrillController, DrillDef, DrillEngine, DrillOptions, DrillStatus, FixedPoints, MockAlarm,
    PlayState, ScoringPolicy, SessionSummary, SilentAlarm, Step, StepDef, SummaryError,
    Transition,
};
pub use error::{ConfigError, CoreError, ValidationError};
pub use events::Event;
pub use storage::Config;
pub use ticker::{ManualClock, SystemClock, Ticker, TimeSource};
