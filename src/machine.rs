//! This module defines the `TuringMachine` struct, which executes a single-tape rule set step by
//! step. It owns the live configuration (tape, head, current state, step counter and trace) and
//! treats every anomaly, whether a gap in the table or an exhausted step budget, as an ordinary
//! transition into the reject state.

use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::analyzer::analyze;
use crate::trace::{format_trace, render_window, TraceRecord};
use crate::types::{
    Direction, Halt, Rejection, RuleSet, RunResult, Snapshot, Step, TuringMachineError,
    MAX_EXECUTION_STEPS, TAPE_PADDING, TRACE_WINDOW_LEFT, TRACE_WINDOW_RIGHT,
};

/// A deterministic single-tape Turing machine.
///
/// The rule set is shared and never mutated. Each call to [`TuringMachine::initialize`] starts
/// a fresh configuration; nothing from a previous run survives it.
#[derive(Debug, Clone)]
pub struct TuringMachine {
    rules: Arc<RuleSet>,
    state: String,
    tape: Vec<char>,
    head: usize,
    step_count: usize,
    rejection: Option<Rejection>,
    trace: Vec<TraceRecord>,
}

impl TuringMachine {
    /// Creates a machine for `rules` after validating them.
    ///
    /// The machine starts with an empty configuration; call [`initialize`](Self::initialize)
    /// (or [`run`](Self::run)) before stepping.
    ///
    /// # Returns
    ///
    /// * `Err(TuringMachineError::ConfigurationError)` if the rule set is inconsistent.
    pub fn new(rules: impl Into<Arc<RuleSet>>) -> Result<Self, TuringMachineError> {
        let rules = rules.into();
        analyze(&rules)?;

        Ok(Self {
            state: rules.start_state.clone(),
            rules,
            tape: Vec::new(),
            head: 0,
            step_count: 0,
            rejection: None,
            trace: Vec::new(),
        })
    }

    /// Resets the configuration for `input`.
    ///
    /// The tape becomes one blank sentinel, the input symbols (a single blank when the input is
    /// empty) and `TAPE_PADDING` blanks. The head starts on the first input cell.
    ///
    /// An input that itself contains the blank symbol is rejected immediately.
    pub fn initialize(&mut self, input: &str) {
        let blank = self.rules.blank;

        let mut tape = Vec::with_capacity(input.len() + TAPE_PADDING + 2);
        tape.push(blank);
        if input.is_empty() {
            tape.push(blank);
        } else {
            tape.extend(input.chars());
        }
        tape.resize(tape.len() + TAPE_PADDING, blank);

        self.tape = tape;
        self.head = 1;
        self.state = self.rules.start_state.clone();
        self.step_count = 0;
        self.rejection = None;
        self.trace.clear();

        debug!(
            input_len = input.chars().count(),
            tape_len = self.tape.len(),
            "machine initialized"
        );
        self.log_trace("Initialized");

        if let Some(position) = input.chars().position(|c| c == blank) {
            self.reject(
                Rejection::BlankInInput(position),
                format!(
                    "Input contains the blank symbol {} at position {}, moving to REJECT",
                    blank, position
                ),
            );
        }
    }

    /// Executes a single step of the computation.
    ///
    /// Does nothing once the machine is halted. Otherwise the step counter is advanced, the
    /// fuse is checked, and the rule for the current state and symbol is applied. A missing
    /// rule moves the machine to the reject state.
    pub fn step(&mut self) -> Step {
        if let Some(halt) = self.halt() {
            return Step::Halt(halt);
        }

        self.step_count += 1;
        if self.step_count > MAX_EXECUTION_STEPS {
            warn!(limit = MAX_EXECUTION_STEPS, state = %self.state, "step limit exceeded");
            return self.reject(
                Rejection::StepLimit(MAX_EXECUTION_STEPS),
                format!(
                    "Step limit of {} exceeded, rejecting",
                    MAX_EXECUTION_STEPS
                ),
            );
        }

        // Only reachable when stepping before `initialize`.
        if self.head >= self.tape.len() {
            self.tape.resize(self.head + 1, self.rules.blank);
        }

        let symbol = self.tape[self.head];
        let Some(transition) = self.rules.transition(&self.state, symbol).cloned() else {
            let note = format!(
                "No transition for ({}, {}), moving to REJECT",
                self.state, symbol
            );
            return self.reject(
                Rejection::MissingTransition {
                    state: self.state.clone(),
                    symbol,
                },
                note,
            );
        };

        trace!(
            step = self.step_count,
            state = %self.state,
            %symbol,
            next = %transition.next_state,
            "transition"
        );

        // Recorded before the configuration changes.
        self.log_trace(format!(
            "δ({}, {}) → ({}, {}, {})",
            self.state, symbol, transition.next_state, transition.write, transition.direction
        ));

        self.tape[self.head] = transition.write;

        match transition.direction {
            Direction::Left => self.head = self.head.saturating_sub(1),
            Direction::Right => {
                self.head += 1;
                if self.head >= self.tape.len() {
                    self.tape.push(self.rules.blank);
                }
            }
            Direction::Stay => {}
        }

        self.state = transition.next_state;

        if self.state == self.rules.reject_state {
            self.rejection = Some(Rejection::Transition);
        }

        match self.halt() {
            Some(halt) => {
                debug!(state = %self.state, steps = self.step_count, "machine halted");
                Step::Halt(halt)
            }
            None => Step::Continue,
        }
    }

    /// Initializes the machine with `input` and steps it until it halts.
    ///
    /// The step fuse guarantees termination for any table.
    pub fn run(&mut self, input: &str) -> RunResult {
        self.initialize(input);

        let halt = loop {
            if let Step::Halt(halt) = self.step() {
                break halt;
            }
        };

        let accepted = halt.is_accept();
        self.trace
            .push(TraceRecord::Line(format!("\nFinal state: {}", self.state)));
        self.trace.push(TraceRecord::Line(format!(
            "Result: {}",
            if accepted { "ACCEPTED" } else { "REJECTED" }
        )));

        RunResult {
            accepted,
            halt,
            steps: self.step_count.min(MAX_EXECUTION_STEPS),
            trace: self.trace(),
        }
    }

    /// Checks if the machine is in the accept or the reject state.
    pub fn is_halted(&self) -> bool {
        self.rules.is_terminal(&self.state)
    }

    /// Returns `true` if the machine halted in the accept state.
    pub fn is_accepted(&self) -> bool {
        self.state == self.rules.accept_state
    }

    /// The halting outcome, or `None` while the machine can still move.
    pub fn halt(&self) -> Option<Halt> {
        if self.is_accepted() {
            Some(Halt::Accept)
        } else if self.state == self.rules.reject_state {
            Some(Halt::Reject(
                self.rejection.clone().unwrap_or(Rejection::Transition),
            ))
        } else {
            None
        }
    }

    /// Returns an owned copy of the tape and head position.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tape: self.tape.clone(),
            head: self.head,
        }
    }

    /// Returns the accumulated trace as one newline-joined text block.
    pub fn trace(&self) -> String {
        format_trace(&self.trace)
    }

    /// Returns the individual trace records.
    pub fn trace_records(&self) -> &[TraceRecord] {
        &self.trace
    }

    /// Returns the current state of the machine.
    pub fn state(&self) -> &str {
        &self.state
    }

    /// Returns the number of steps taken since the last initialization.
    pub fn step_count(&self) -> usize {
        self.step_count
    }

    /// Returns the current head position.
    pub fn head(&self) -> usize {
        self.head
    }

    /// Returns a read-only view of the live tape.
    pub fn tape(&self) -> &[char] {
        &self.tape
    }

    /// Returns the rule set the machine executes.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    fn reject(&mut self, rejection: Rejection, note: String) -> Step {
        self.state = self.rules.reject_state.clone();
        self.rejection = Some(rejection.clone());
        debug!(reason = %rejection, steps = self.step_count, "machine rejected");
        self.log_trace(note);
        Step::Halt(Halt::Reject(rejection))
    }

    fn log_trace(&mut self, note: impl Into<String>) {
        let tape = render_window(&self.tape, self.head, TRACE_WINDOW_LEFT, TRACE_WINDOW_RIGHT);
        self.trace.push(TraceRecord::step(&self.state, note, tape));
    }
}
