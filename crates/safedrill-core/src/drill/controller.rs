use super::alarm::{AlarmCommand, AlarmSignal};
use super::engine::{DrillEngine, DrillStatus, Transition};
use super::summary::{Award, ScoringPolicy, SessionSummary, SummaryError};

/// Pairs a [`DrillEngine`] with the alarm it has authority over.
///
/// Every command is forwarded to the engine and the alarm commands it emits
/// are executed immediately, in order. A failed start is fed back to the
/// engine so the drill degrades to silence instead of failing.
#[derive(Debug)]
pub struct DrillController<A: AlarmSignal> {
    engine: DrillEngine,
    alarm: A,
}

impl<A: AlarmSignal> DrillController<A> {
    pub fn new(engine: DrillEngine, alarm: A) -> Self {
        Self { engine, alarm }
    }

    pub fn engine(&self) -> &DrillEngine {
        &self.engine
    }

    pub fn alarm(&self) -> &A {
        &self.alarm
    }

    /// Direct access for backend housekeeping. Start/stop must still go
    /// through the drill commands.
    pub fn alarm_mut(&mut self) -> &mut A {
        &mut self.alarm
    }

    pub fn status(&self) -> DrillStatus {
        self.engine.status()
    }

    pub fn summary(&self) -> Result<SessionSummary, SummaryError> {
        self.engine.summary()
    }

    pub fn award(&mut self, policy: &dyn ScoringPolicy) -> Result<Award, SummaryError> {
        self.engine.award(policy)
    }

    pub fn into_parts(self) -> (DrillEngine, A) {
        (self.engine, self.alarm)
    }

    pub fn play(&mut self) -> Transition {
        let t = self.engine.play();
        self.dispatch(t)
    }

    pub fn pause(&mut self) -> Transition {
        let t = self.engine.pause();
        self.dispatch(t)
    }

    pub fn reset(&mut self) -> Transition {
        let t = self.engine.reset();
        self.dispatch(t)
    }

    pub fn toggle_alarm(&mut self) -> Transition {
        let t = self.engine.toggle_alarm();
        self.dispatch(t)
    }

    pub fn tick(&mut self, elapsed_ms: u64) -> Transition {
        let t = self.engine.tick(elapsed_ms);
        self.dispatch(t)
    }

    fn dispatch(&mut self, mut t: Transition) -> Transition {
        for command in t.commands.clone() {
            match command {
                AlarmCommand::Start => {
                    if let Err(err) = self.alarm.start() {
                        let feedback = self.engine.alarm_unavailable(&err);
                        t.events.extend(feedback.events);
                        t.status = feedback.status;
                    }
                }
                AlarmCommand::Stop => self.alarm.stop(),
            }
        }
        t
    }
}
