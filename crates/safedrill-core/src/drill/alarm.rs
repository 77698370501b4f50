//! Alarm (siren) signal abstraction.
//!
//! The engine never touches an audio backend directly. It emits
//! [`AlarmCommand`] values; a [`DrillController`](super::DrillController)
//! executes them against an injected [`AlarmSignal`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Command emitted by the engine for the alarm layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlarmCommand {
    Start,
    Stop,
}

/// The alarm could not be started (no audio device, platform refusal, ...).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("alarm unavailable: {reason}")]
pub struct AlarmUnavailable {
    pub reason: String,
}

impl AlarmUnavailable {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// A best-effort continuous audio cue.
///
/// Both commands must be idempotent: `start` while on and `stop` while off
/// are no-ops. `stop` cannot fail.
pub trait AlarmSignal {
    fn start(&mut self) -> Result<(), AlarmUnavailable>;

    fn stop(&mut self);

    fn is_on(&self) -> bool;
}

impl<A: AlarmSignal + ?Sized> AlarmSignal for Box<A> {
    fn start(&mut self) -> Result<(), AlarmUnavailable> {
        (**self).start()
    }

    fn stop(&mut self) {
        (**self).stop();
    }

    fn is_on(&self) -> bool {
        (**self).is_on()
    }
}

/// Alarm that makes no sound. Used when no audio layer is present.
#[derive(Debug, Default, Clone)]
pub struct SilentAlarm {
    on: bool,
}

impl AlarmSignal for SilentAlarm {
    fn start(&mut self) -> Result<(), AlarmUnavailable> {
        self.on = true;
        Ok(())
    }

    fn stop(&mut self) {
        self.on = false;
    }

    fn is_on(&self) -> bool {
        self.on
    }
}

/// Recording alarm for tests.
///
/// Every call is appended to `calls`. Set `fail_start` to simulate a missing
/// audio device.
#[derive(Debug, Default, Clone)]
pub struct MockAlarm {
    pub calls: Vec<AlarmCommand>,
    pub fail_start: bool,
    on: bool,
}

impl MockAlarm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail_start: true,
            ..Self::default()
        }
    }

    pub fn start_calls(&self) -> usize {
        self.calls.iter().filter(|c| **c == AlarmCommand::Start).count()
    }

    pub fn stop_calls(&self) -> usize {
        self.calls.iter().filter(|c| **c == AlarmCommand::Stop).count()
    }
}

impl AlarmSignal for MockAlarm {
    fn start(&mut self) -> Result<(), AlarmUnavailable> {
        self.calls.push(AlarmCommand::Start);
        if self.fail_start {
            return Err(AlarmUnavailable::new("mock audio device missing"));
        }
        self.on = true;
        Ok(())
    }

    fn stop(&mut self) {
        self.calls.push(AlarmCommand::Stop);
        self.on = false;
    }

    fn is_on(&self) -> bool {
        self.on
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silent_alarm_is_idempotent() {
        let mut alarm = SilentAlarm::default();
        alarm.start().unwrap();
        alarm.start().unwrap();
        assert!(alarm.is_on());
        alarm.stop();
        alarm.stop();
        assert!(!alarm.is_on());
    }

    #[test]
    fn failing_mock_stays_off() {
        let mut alarm = MockAlarm::failing();
        assert!(alarm.start().is_err());
        assert!(!alarm.is_on());
        alarm.stop();
        assert_eq!(alarm.calls, vec![AlarmCommand::Start, AlarmCommand::Stop]);
    }

    #[test]
    fn boxed_alarm_delegates() {
        let mut alarm: Box<dyn AlarmSignal> = Box::new(SilentAlarm::default());
        alarm.start().unwrap();
        assert!(alarm.is_on());
    }
}
