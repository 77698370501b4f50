//! Terminal siren: rings the terminal bell while the drill alarm is on.

use std::io::{IsTerminal, Write};

use safedrill_core::{AlarmSignal, AlarmUnavailable};

const PULSE_INTERVAL_MS: u64 = 1000;

#[derive(Debug, Default)]
pub struct TerminalSiren {
    on: bool,
    last_pulse_ms: Option<u64>,
}

impl TerminalSiren {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ring again if the siren is on and a pulse interval has passed.
    pub fn pulse(&mut self, now_ms: u64) {
        if !self.on {
            return;
        }
        let due = self
            .last_pulse_ms
            .is_none_or(|last| now_ms.saturating_sub(last) >= PULSE_INTERVAL_MS);
        if due {
            self.last_pulse_ms = Some(now_ms);
            ring();
        }
    }
}

fn ring() {
    let mut err = std::io::stderr();
    let _ = err.write_all(b"\x07");
    let _ = err.flush();
}

impl AlarmSignal for TerminalSiren {
    fn start(&mut self) -> Result<(), AlarmUnavailable> {
        if self.on {
            return Ok(());
        }
        if !std::io::stderr().is_terminal() {
            return Err(AlarmUnavailable::new("stderr is not a terminal"));
        }
        tracing::info!("siren on");
        self.on = true;
        self.last_pulse_ms = None;
        Ok(())
    }

    fn stop(&mut self) {
        if self.on {
            tracing::info!("siren off");
        }
        self.on = false;
        self.last_pulse_ms = None;
    }

    fn is_on(&self) -> bool {
        self.on
    }
}
