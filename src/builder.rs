//! Programmatic construction of transition tables.
//!
//! Tables for scanning machines are mostly made of a handful of repeated shapes: scan right
//! past uninteresting symbols, stop on a symbol of some class and mark it, walk back to the
//! left edge. `TransitionTable` offers one generator per shape. Every generator inserts through
//! [`TransitionTable::insert`], which refuses to overwrite a pair another group already claimed,
//! so overlapping symbol sets are caught while the table is built instead of silently changing
//! the machine.

use crate::analyzer::analyze;
use crate::types::{Direction, RuleSet, Transition, Transitions, TuringMachineError};
use std::collections::BTreeSet;

/// A transition function under construction.
#[derive(Debug, Default, Clone)]
pub struct TransitionTable {
    transitions: Transitions,
}

impl TransitionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds δ(state, symbol) = transition.
    ///
    /// # Returns
    ///
    /// * `Err(TuringMachineError::DuplicateTransition)` if the pair already has a rule.
    pub fn insert(
        &mut self,
        state: &str,
        symbol: char,
        transition: Transition,
    ) -> Result<(), TuringMachineError> {
        let row = self.transitions.entry(state.to_string()).or_default();

        if row.contains_key(&symbol) {
            return Err(TuringMachineError::DuplicateTransition {
                state: state.to_string(),
                symbol,
            });
        }

        row.insert(symbol, transition);
        Ok(())
    }

    /// Find group: on any of `triggers`, write `marker`, move right and go to `target`.
    pub fn find<'a>(
        &mut self,
        state: &str,
        triggers: impl IntoIterator<Item = &'a char>,
        target: &str,
        marker: char,
    ) -> Result<&mut Self, TuringMachineError> {
        for &symbol in triggers {
            self.insert(state, symbol, Transition::new(target, marker, Direction::Right))?;
        }
        Ok(self)
    }

    /// Skip group: on any symbol in any of `sets`, leave it unchanged and keep moving right.
    pub fn skip<'a, S>(
        &mut self,
        state: &str,
        sets: impl IntoIterator<Item = S>,
    ) -> Result<&mut Self, TuringMachineError>
    where
        S: IntoIterator<Item = &'a char>,
    {
        for set in sets {
            for &symbol in set {
                self.insert(state, symbol, Transition::new(state, symbol, Direction::Right))?;
            }
        }
        Ok(self)
    }

    /// Rewind group: move left over `symbols` unchanged; on `blank`, step right onto the first
    /// cell and go to `target`.
    pub fn rewind<'a>(
        &mut self,
        state: &str,
        symbols: impl IntoIterator<Item = &'a char>,
        blank: char,
        target: &str,
    ) -> Result<&mut Self, TuringMachineError> {
        for &symbol in symbols {
            self.insert(state, symbol, Transition::new(state, symbol, Direction::Left))?;
        }
        self.insert(state, blank, Transition::new(target, blank, Direction::Right))?;
        Ok(self)
    }

    /// Step-back group: on any of `symbols` (blank included by the caller), leave the cell
    /// unchanged, move left once and go to `target`.
    ///
    /// A find moves right past the cell it marked, possibly onto a trailing blank. Routing it
    /// through a step-back state puts the head back on the marker before a rewind starts, so
    /// the rewind only ever meets the left sentinel.
    pub fn step_back<'a>(
        &mut self,
        state: &str,
        symbols: impl IntoIterator<Item = &'a char>,
        target: &str,
    ) -> Result<&mut Self, TuringMachineError> {
        for &symbol in symbols {
            self.insert(state, symbol, Transition::new(target, symbol, Direction::Left))?;
        }
        Ok(self)
    }

    /// Returns the rule for a pair, if any.
    pub fn get(&self, state: &str, symbol: char) -> Option<&Transition> {
        self.transitions.get(state)?.get(&symbol)
    }

    pub fn len(&self) -> usize {
        self.transitions.values().map(|row| row.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_transitions(self) -> Transitions {
        self.transitions
    }
}

/// Assembles the 7-tuple and validates it.
#[derive(Debug, Clone)]
pub struct RuleSetBuilder {
    name: String,
    states: BTreeSet<String>,
    input_alphabet: BTreeSet<char>,
    tape_alphabet: BTreeSet<char>,
    start_state: String,
    accept_state: String,
    reject_state: String,
    blank: char,
}

impl RuleSetBuilder {
    /// Starts a rule set with its distinguished states and blank symbol.
    ///
    /// The three states and the blank are registered automatically.
    pub fn new(
        name: impl Into<String>,
        start_state: impl Into<String>,
        accept_state: impl Into<String>,
        reject_state: impl Into<String>,
        blank: char,
    ) -> Self {
        let start_state = start_state.into();
        let accept_state = accept_state.into();
        let reject_state = reject_state.into();

        let states = [&start_state, &accept_state, &reject_state]
            .into_iter()
            .cloned()
            .collect();

        Self {
            name: name.into(),
            states,
            input_alphabet: BTreeSet::new(),
            tape_alphabet: BTreeSet::from([blank]),
            start_state,
            accept_state,
            reject_state,
            blank,
        }
    }

    pub fn states<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.states.extend(states.into_iter().map(Into::into));
        self
    }

    /// Adds input symbols; they become tape symbols as well.
    pub fn input_symbols<'a>(mut self, symbols: impl IntoIterator<Item = &'a char>) -> Self {
        for &symbol in symbols {
            self.input_alphabet.insert(symbol);
            self.tape_alphabet.insert(symbol);
        }
        self
    }

    /// Adds working symbols that only the machine writes.
    pub fn tape_symbols<'a>(mut self, symbols: impl IntoIterator<Item = &'a char>) -> Self {
        self.tape_alphabet.extend(symbols.into_iter().copied());
        self
    }

    /// Combines the declarations with `table` and runs the analyzer over the result.
    pub fn build(self, table: TransitionTable) -> Result<RuleSet, TuringMachineError> {
        let rules = RuleSet {
            name: self.name,
            states: self.states,
            input_alphabet: self.input_alphabet,
            tape_alphabet: self.tape_alphabet,
            transitions: table.into_transitions(),
            start_state: self.start_state,
            accept_state: self.accept_state,
            reject_state: self.reject_state,
            blank: self.blank,
        };

        analyze(&rules)?;
        Ok(rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_rejects_duplicates() {
        let mut table = TransitionTable::new();
        table
            .insert("q0", 'a', Transition::new("q1", 'a', Direction::Right))
            .unwrap();

        let result = table.insert("q0", 'a', Transition::new("q1", 'a', Direction::Right));

        assert_eq!(
            result,
            Err(TuringMachineError::DuplicateTransition {
                state: "q0".to_string(),
                symbol: 'a'
            })
        );
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_same_symbol_in_different_states() {
        let mut table = TransitionTable::new();
        table
            .insert("q0", 'a', Transition::new("q1", 'a', Direction::Right))
            .unwrap();
        table
            .insert("q1", 'a', Transition::new("q0", 'a', Direction::Left))
            .unwrap();

        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_find_group() {
        let mut table = TransitionTable::new();
        table.find("scan", &['a', 'b'], "found", '*').unwrap();

        let rule = table.get("scan", 'b').unwrap();
        assert_eq!(rule.next_state, "found");
        assert_eq!(rule.write, '*');
        assert_eq!(rule.direction, Direction::Right);
        assert!(table.get("scan", 'c').is_none());
    }

    #[test]
    fn test_skip_group() {
        let mut table = TransitionTable::new();
        table.skip("scan", [&['1', '2'][..], &['x'][..]]).unwrap();

        let rule = table.get("scan", 'x').unwrap();
        assert_eq!(rule, &Transition::new("scan", 'x', Direction::Right));
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_find_and_skip_overlap_is_detected() {
        let mut table = TransitionTable::new();
        table.find("scan", &['a', 'b'], "found", '*').unwrap();

        let result = table.skip("scan", [&['c', 'b'][..]]);

        assert_eq!(
            result.map(|_| ()),
            Err(TuringMachineError::DuplicateTransition {
                state: "scan".to_string(),
                symbol: 'b'
            })
        );
    }

    #[test]
    fn test_rewind_group() {
        let mut table = TransitionTable::new();
        table.rewind("back", &['a', '*'], '_', "scan").unwrap();

        assert_eq!(
            table.get("back", '*'),
            Some(&Transition::new("back", '*', Direction::Left))
        );
        assert_eq!(
            table.get("back", '_'),
            Some(&Transition::new("scan", '_', Direction::Right))
        );
    }

    #[test]
    fn test_rewind_refuses_blank_among_symbols() {
        let mut table = TransitionTable::new();
        let result = table.rewind("back", &['a', '_'], '_', "scan");

        assert!(matches!(
            result,
            Err(TuringMachineError::DuplicateTransition { symbol: '_', .. })
        ));
    }

    #[test]
    fn test_step_back_group() {
        let mut table = TransitionTable::new();
        table.step_back("turn", &['a', '_'], "back").unwrap();

        assert_eq!(
            table.get("turn", '_'),
            Some(&Transition::new("back", '_', Direction::Left))
        );
    }

    #[test]
    fn test_builder_registers_distinguished_states() {
        let mut table = TransitionTable::new();
        table
            .insert("q0", 'a', Transition::new("yes", 'a', Direction::Right))
            .unwrap();

        let rules = RuleSetBuilder::new("tiny", "q0", "yes", "no", '_')
            .input_symbols(&['a'])
            .tape_symbols(&['*'])
            .build(table)
            .unwrap();

        assert!(rules.states.contains("q0"));
        assert!(rules.states.contains("no"));
        assert!(rules.tape_alphabet.contains(&'_'));
        assert!(rules.tape_alphabet.contains(&'a'));
        assert!(!rules.input_alphabet.contains(&'*'));
    }

    #[test]
    fn test_builder_runs_analyzer() {
        let mut table = TransitionTable::new();
        table
            .insert("q0", 'a', Transition::new("elsewhere", 'a', Direction::Right))
            .unwrap();

        let result = RuleSetBuilder::new("broken", "q0", "yes", "no", '_')
            .input_symbols(&['a'])
            .build(table);

        assert!(matches!(
            result,
            Err(TuringMachineError::ConfigurationError(_))
        ));
    }
}
