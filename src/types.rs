//! This module defines the core data structures shared by the engine and the table builder:
//! the rule set (the 7-tuple), transitions, step outcomes, snapshots and error types.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use thiserror::Error;

/// Number of blank cells appended to the right of the input on initialization.
pub const TAPE_PADDING: usize = 100;
/// The maximum number of steps to execute before the machine is forced to reject.
pub const MAX_EXECUTION_STEPS: usize = 1000;
/// Cells shown to the left of the head in a trace record.
pub const TRACE_WINDOW_LEFT: usize = 5;
/// Cells shown to the right of the head in a trace record.
pub const TRACE_WINDOW_RIGHT: usize = 20;

/// Transition function keyed by state, then by the symbol under the head.
pub type Transitions = BTreeMap<String, BTreeMap<char, Transition>>;

/// A complete single-tape machine definition.
///
/// The transition mapping is allowed to be partial: a missing entry for a
/// `(state, symbol)` pair means the machine has no acceptable continuation
/// and is moved to the reject state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RuleSet {
    /// Human readable name, used by front-ends only.
    #[serde(default)]
    pub name: String,
    /// Q: every state the machine may be in.
    pub states: BTreeSet<String>,
    /// Σ: symbols that may appear in the original input.
    pub input_alphabet: BTreeSet<char>,
    /// Γ: input symbols, working markers and the blank.
    pub tape_alphabet: BTreeSet<char>,
    /// δ: partial transition function.
    pub transitions: Transitions,
    pub start_state: String,
    pub accept_state: String,
    pub reject_state: String,
    /// The default fill symbol of the tape.
    pub blank: char,
}

impl RuleSet {
    /// Looks up δ(state, symbol). `None` means the table has no rule for the pair.
    pub fn transition(&self, state: &str, symbol: char) -> Option<&Transition> {
        self.transitions.get(state)?.get(&symbol)
    }

    /// Returns `true` if `state` is the accept or the reject state.
    pub fn is_terminal(&self, state: &str) -> bool {
        state == self.accept_state || state == self.reject_state
    }

    /// Total number of `(state, symbol)` rules in the table.
    pub fn transition_count(&self) -> usize {
        self.transitions.values().map(BTreeMap::len).sum()
    }
}

/// A single entry of the transition function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transition {
    /// The state the machine moves to.
    pub next_state: String,
    /// The symbol written under the head before moving.
    pub write: char,
    /// Where the head goes after writing.
    pub direction: Direction,
}

impl Transition {
    pub fn new(next_state: impl Into<String>, write: char, direction: Direction) -> Self {
        Self {
            next_state: next_state.into(),
            write,
            direction,
        }
    }
}

/// Represents the possible directions a Turing Machine head can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Move the head one position to the left.
    Left,
    /// Move the head one position to the right.
    Right,
    /// Keep the head in the same position.
    Stay,
}

impl Direction {
    /// The short form used in trace notes.
    pub fn as_char(self) -> char {
        match self {
            Direction::Left => 'L',
            Direction::Right => 'R',
            Direction::Stay => 'S',
        }
    }

    /// Parses the short form (`L`, `R` or `S`).
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'L' => Some(Direction::Left),
            'R' => Some(Direction::Right),
            'S' => Some(Direction::Stay),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Represents the outcome of a single `step()` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// A transition fired and the machine is not in a terminal state yet.
    Continue,
    /// The machine is in the accept or the reject state.
    Halt(Halt),
}

/// How a machine halted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Halt {
    Accept,
    Reject(Rejection),
}

impl Halt {
    pub fn is_accept(&self) -> bool {
        matches!(self, Halt::Accept)
    }
}

/// Why a machine ended in the reject state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rejection {
    /// The table itself moved the machine into the reject state.
    Transition,
    /// No rule exists for the current state and the symbol under the head.
    MissingTransition { state: String, symbol: char },
    /// The step fuse tripped after the given number of steps.
    StepLimit(usize),
    /// The input carried the blank symbol at the given position (counted from 0). The machine
    /// could not tell it apart from the end of the input, so it is refused before the first step.
    BlankInInput(usize),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::Transition => write!(f, "rejected by transition"),
            Rejection::MissingTransition { state, symbol } => {
                write!(f, "no transition for ({}, {})", state, symbol)
            }
            Rejection::StepLimit(limit) => write!(f, "step limit of {} exceeded", limit),
            Rejection::BlankInInput(position) => {
                write!(f, "blank symbol in input at position {}", position)
            }
        }
    }
}

/// An owned copy of the tape and head position, safe to hand to renderers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub tape: Vec<char>,
    pub head: usize,
}

impl Snapshot {
    /// The symbol currently under the head.
    pub fn symbol(&self) -> Option<char> {
        self.tape.get(self.head).copied()
    }
}

/// Result of a blocking `run()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunResult {
    pub accepted: bool,
    pub halt: Halt,
    /// Number of `step()` calls that advanced the machine.
    pub steps: usize,
    /// The full formatted trace, including the final result lines.
    pub trace: String,
}

/// Represents the errors that can occur while building, loading or validating rule sets.
///
/// Execution itself never fails: rejection is a terminal state, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TuringMachineError {
    /// The rule set is incomplete or inconsistent.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
    /// A table generator tried to claim a `(state, symbol)` pair twice.
    #[error("Duplicate transition for state {state} and symbol {symbol:?}")]
    DuplicateTransition { state: String, symbol: char },
    /// Indicates an error related to reading rule set files.
    #[error("File error: {0}")]
    FileError(String),
}
