//! This module validates rule sets before an engine is built from them. Any finding here is a
//! programming mistake in the table, so it is reported as a configuration error up front
//! instead of surfacing halfway through a run.

use crate::types::{RuleSet, TuringMachineError};
use std::collections::{BTreeSet, VecDeque};

/// Represents the problems that can be found in a rule set.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum AnalysisError {
    /// The state set is empty.
    NoStates,
    /// A distinguished state (start, accept or reject) is not a member of the state set.
    UndeclaredState(String),
    /// The accept and reject states are the same state.
    AmbiguousTerminal(String),
    /// The blank symbol is missing from the tape alphabet.
    BlankNotInTapeAlphabet(char),
    /// The blank symbol is also an input symbol.
    BlankInInputAlphabet(char),
    /// Input symbols missing from the tape alphabet.
    InputNotInTapeAlphabet(Vec<char>),
    /// Transitions are defined for states that are not declared.
    UndefinedSourceStates(Vec<String>),
    /// Transitions lead to states that are not declared.
    UndefinedNextStates(Vec<String>),
    /// Transitions read or write symbols outside the tape alphabet.
    UnknownSymbols(Vec<char>),
    /// The accept or reject state has outgoing rules.
    TerminalTransitions(String),
    /// Declared states that cannot be reached from the start state.
    UnreachableStates(Vec<String>),
}

impl From<AnalysisError> for TuringMachineError {
    fn from(error: AnalysisError) -> Self {
        let message = match error {
            AnalysisError::NoStates => "No states defined".to_string(),
            AnalysisError::UndeclaredState(state) => {
                format!("State '{}' is not declared in the state set", state)
            }
            AnalysisError::AmbiguousTerminal(state) => {
                format!("Accept and reject states are both '{}'", state)
            }
            AnalysisError::BlankNotInTapeAlphabet(blank) => {
                format!("Blank symbol {:?} is not in the tape alphabet", blank)
            }
            AnalysisError::BlankInInputAlphabet(blank) => {
                format!("Blank symbol {:?} must not be an input symbol", blank)
            }
            AnalysisError::InputNotInTapeAlphabet(symbols) => {
                format!("Input symbols missing from the tape alphabet: {:?}", symbols)
            }
            AnalysisError::UndefinedSourceStates(states) => {
                format!("Transitions defined for undeclared states: {:?}", states)
            }
            AnalysisError::UndefinedNextStates(states) => {
                format!("Transitions reference undeclared states: {:?}", states)
            }
            AnalysisError::UnknownSymbols(symbols) => {
                format!("Transitions use symbols outside the tape alphabet: {:?}", symbols)
            }
            AnalysisError::TerminalTransitions(state) => {
                format!("Terminal state '{}' has outgoing transitions", state)
            }
            AnalysisError::UnreachableStates(states) => {
                format!("Unreachable states detected: {:?}", states)
            }
        };

        TuringMachineError::ConfigurationError(message)
    }
}

/// Analyzes a rule set for structural and logical errors.
///
/// Checks run in a fixed order and the first finding is returned.
///
/// # Returns
///
/// * `Ok(())` if no errors are found.
/// * `Err(TuringMachineError::ConfigurationError)` describing the first problem.
pub fn analyze(rules: &RuleSet) -> Result<(), TuringMachineError> {
    let checks: [fn(&RuleSet) -> Result<(), AnalysisError>; 4] = [
        check_structure,
        check_alphabets,
        check_transitions,
        check_unreachable_states,
    ];

    checks
        .iter()
        .try_for_each(|check| check(rules))
        .map_err(TuringMachineError::from)
}

/// Checks that the state set exists and holds the distinguished states.
fn check_structure(rules: &RuleSet) -> Result<(), AnalysisError> {
    if rules.states.is_empty() {
        return Err(AnalysisError::NoStates);
    }

    for state in [&rules.start_state, &rules.accept_state, &rules.reject_state] {
        if !rules.states.contains(state) {
            return Err(AnalysisError::UndeclaredState(state.clone()));
        }
    }

    if rules.accept_state == rules.reject_state {
        return Err(AnalysisError::AmbiguousTerminal(rules.accept_state.clone()));
    }

    Ok(())
}

/// Checks Σ ⊆ Γ, blank ∈ Γ and blank ∉ Σ.
fn check_alphabets(rules: &RuleSet) -> Result<(), AnalysisError> {
    if !rules.tape_alphabet.contains(&rules.blank) {
        return Err(AnalysisError::BlankNotInTapeAlphabet(rules.blank));
    }

    if rules.input_alphabet.contains(&rules.blank) {
        return Err(AnalysisError::BlankInInputAlphabet(rules.blank));
    }

    let missing: Vec<char> = rules
        .input_alphabet
        .difference(&rules.tape_alphabet)
        .copied()
        .collect();

    if !missing.is_empty() {
        return Err(AnalysisError::InputNotInTapeAlphabet(missing));
    }

    Ok(())
}

/// Checks that every rule connects declared states through tape symbols,
/// and that terminal states have no rules of their own.
fn check_transitions(rules: &RuleSet) -> Result<(), AnalysisError> {
    let undefined_sources: Vec<String> = rules
        .transitions
        .keys()
        .filter(|state| !rules.states.contains(*state))
        .cloned()
        .collect();

    if !undefined_sources.is_empty() {
        return Err(AnalysisError::UndefinedSourceStates(undefined_sources));
    }

    for terminal in [&rules.accept_state, &rules.reject_state] {
        if rules
            .transitions
            .get(terminal)
            .is_some_and(|row| !row.is_empty())
        {
            return Err(AnalysisError::TerminalTransitions(terminal.clone()));
        }
    }

    let mut undefined_next = BTreeSet::new();
    let mut unknown_symbols = BTreeSet::new();

    for row in rules.transitions.values() {
        for (read, transition) in row {
            if !rules.states.contains(&transition.next_state) {
                undefined_next.insert(transition.next_state.clone());
            }
            for symbol in [*read, transition.write] {
                if !rules.tape_alphabet.contains(&symbol) {
                    unknown_symbols.insert(symbol);
                }
            }
        }
    }

    if !undefined_next.is_empty() {
        return Err(AnalysisError::UndefinedNextStates(
            undefined_next.into_iter().collect(),
        ));
    }

    if !unknown_symbols.is_empty() {
        return Err(AnalysisError::UnknownSymbols(
            unknown_symbols.into_iter().collect(),
        ));
    }

    Ok(())
}

/// Checks that every declared non-terminal state can be reached from the start state.
///
/// Terminal states are exempt: the reject state is usually reached through gaps
/// in the table rather than explicit rules, and a table may never accept.
fn check_unreachable_states(rules: &RuleSet) -> Result<(), AnalysisError> {
    let mut reachable = BTreeSet::new();
    let mut queue = VecDeque::from([rules.start_state.as_str()]);

    while let Some(state) = queue.pop_front() {
        if !reachable.insert(state) {
            continue;
        }

        if let Some(row) = rules.transitions.get(state) {
            queue.extend(row.values().map(|t| t.next_state.as_str()));
        }
    }

    let unreachable: Vec<String> = rules
        .states
        .iter()
        .filter(|state| !rules.is_terminal(state) && !reachable.contains(state.as_str()))
        .cloned()
        .collect();

    if !unreachable.is_empty() {
        return Err(AnalysisError::UnreachableStates(unreachable));
    }

    Ok(())
}
