//! This crate provides a deterministic single-tape Turing machine engine that exposes its full
//! configuration at every step, together with a builder for transition tables and a concrete
//! rule set that decides whether a password is strong.

pub mod analyzer;
pub mod builder;
pub mod loader;
pub mod machine;
pub mod password;
pub mod trace;
pub mod types;

/// Re-exports the `analyze` function and `AnalysisError` enum from the analyzer module.
pub use analyzer::{analyze, AnalysisError};
/// Re-exports the table construction helpers.
pub use builder::{RuleSetBuilder, TransitionTable};
/// Re-exports the `RuleSetLoader` struct from the loader module.
pub use loader::RuleSetLoader;
/// Re-exports the `TuringMachine` struct from the machine module.
pub use machine::TuringMachine;
/// Re-exports the strong-password rule set constructor.
pub use password::{is_strong_password, password_rules};
pub use trace::TraceRecord;
/// Re-exports the rule set, execution and error types.
pub use types::{
    Direction, Halt, Rejection, RuleSet, RunResult, Snapshot, Step, Transition,
    TuringMachineError, MAX_EXECUTION_STEPS, TAPE_PADDING,
};
