//! The external driver: owns one simulation session and paces it.

use std::thread;
use std::time::Duration;

use tracing::debug;
use tur_password::trace::render_window;
use tur_password::{Halt, Snapshot, TuringMachine};

/// Cells shown left of the head in the live tape view.
const VIEW_LEFT: usize = 10;
/// Cells shown right of the head in the live tape view.
const VIEW_RIGHT: usize = 20;

/// Steps a machine at a fixed interval until it halts.
///
/// The machine never calls back into the driver; the driver polls `is_halted` after every step
/// and stops on its own.
pub struct Driver {
    interval: Duration,
}

impl Driver {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    /// Initializes `machine` with `input` and drives it to a halt, calling `on_step` with the
    /// initial configuration and after every step.
    pub fn drive<F>(&self, machine: &mut TuringMachine, input: &str, mut on_step: F) -> Halt
    where
        F: FnMut(&TuringMachine),
    {
        machine.initialize(input);
        on_step(machine);

        loop {
            if let Some(halt) = machine.halt() {
                debug!(steps = machine.step_count(), "driver stopped");
                return halt;
            }

            if !self.interval.is_zero() {
                thread::sleep(self.interval);
            }

            machine.step();
            on_step(machine);
        }
    }
}

/// Renders the neighbourhood of the head for the live view.
pub fn render_tape(snapshot: &Snapshot) -> String {
    render_window(&snapshot.tape, snapshot.head, VIEW_LEFT, VIEW_RIGHT)
}

/// The final accept/reject line.
pub fn banner(halt: &Halt) -> String {
    match halt {
        Halt::Accept => "ACCEPTED".to_string(),
        Halt::Reject(reason) => format!("REJECTED ({})", reason),
    }
}
