//! The strong-password rule set.
//!
//! A password is accepted when it is at least eight symbols long and contains at least one
//! lowercase letter, one uppercase letter, one digit and one of `!@#$%^&*`. The machine checks
//! this in five phases:
//!
//! 1. `q0`..`q7` count eight input symbols, then `q_len_ok` runs to the end of the input.
//!    A blank before the eighth symbol rejects.
//! 2. For each class in turn (lowercase, uppercase, digit, special) the machine rewinds to the
//!    left sentinel, scans right skipping every other symbol, and overwrites the first member of
//!    the class with that class's marker so later scans never match it again. Reaching the blank
//!    at the end of the input rejects.
//! 3. The special-symbol find goes straight to `q_accept`.
//!
//! Any symbol outside the input alphabet has no rule in the length phase and rejects there.

use crate::builder::{RuleSetBuilder, TransitionTable};
use crate::types::{Direction, RuleSet, Transition, TuringMachineError};

pub const BLANK: char = '_';

pub const LOWERCASE: [char; 26] = [
    'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's',
    't', 'u', 'v', 'w', 'x', 'y', 'z',
];
pub const UPPERCASE: [char; 26] = [
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R', 'S',
    'T', 'U', 'V', 'W', 'X', 'Y', 'Z',
];
pub const DIGITS: [char; 10] = ['0', '1', '2', '3', '4', '5', '6', '7', '8', '9'];
pub const SPECIALS: [char; 8] = ['!', '@', '#', '$', '%', '^', '&', '*'];

/// Written over the first lowercase letter found.
pub const LOWER_MARK: char = 'ł';
/// Written over the first uppercase letter found.
pub const UPPER_MARK: char = 'Ł';
/// Written over the first digit found.
pub const DIGIT_MARK: char = '№';
/// Written over the first special symbol found.
pub const SPECIAL_MARK: char = '§';

pub const MARKERS: [char; 4] = [LOWER_MARK, UPPER_MARK, DIGIT_MARK, SPECIAL_MARK];

pub const MIN_LENGTH: usize = 8;

pub const START_STATE: &str = "q0";
pub const LENGTH_OK_STATE: &str = "q_len_ok";
pub const ACCEPT_STATE: &str = "q_accept";
pub const REJECT_STATE: &str = "q_reject";

/// Character classes the machine searches for, in search order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    Lower,
    Upper,
    Digit,
    Special,
}

impl CharClass {
    pub const ALL: [CharClass; 4] = [
        CharClass::Lower,
        CharClass::Upper,
        CharClass::Digit,
        CharClass::Special,
    ];

    pub fn symbols(self) -> &'static [char] {
        match self {
            CharClass::Lower => &LOWERCASE,
            CharClass::Upper => &UPPERCASE,
            CharClass::Digit => &DIGITS,
            CharClass::Special => &SPECIALS,
        }
    }

    pub fn marker(self) -> char {
        match self {
            CharClass::Lower => LOWER_MARK,
            CharClass::Upper => UPPER_MARK,
            CharClass::Digit => DIGIT_MARK,
            CharClass::Special => SPECIAL_MARK,
        }
    }

    fn suffix(self) -> &'static str {
        match self {
            CharClass::Lower => "lower",
            CharClass::Upper => "upper",
            CharClass::Digit => "num",
            CharClass::Special => "spec",
        }
    }

    /// Moves the head back onto the cell the previous phase just marked.
    pub fn back_state(self) -> String {
        format!("q_back_{}", self.suffix())
    }

    /// Walks left to the sentinel.
    pub fn rewind_state(self) -> String {
        format!("q_rewind_{}", self.suffix())
    }

    /// Scans right for a member of the class.
    pub fn find_state(self) -> String {
        format!("q_find_{}", self.suffix())
    }
}

/// Every symbol a password may contain.
pub fn input_alphabet() -> Vec<char> {
    CharClass::ALL
        .iter()
        .flat_map(|class| class.symbols().iter().copied())
        .collect()
}

/// The length-counting states `q0` to `q7`.
fn length_states() -> Vec<String> {
    (0..MIN_LENGTH).map(|i| format!("q{}", i)).collect()
}

/// Builds the strong-password rule set.
///
/// Every scan phase walks the whole input, so the step count grows with the input length and
/// with how far right each class first appears. Under the 1000-step fuse a strong password with
/// all four classes at the end is rejected with `Rejection::StepLimit` from 143 symbols on.
pub fn password_rules() -> Result<RuleSet, TuringMachineError> {
    let alphabet = input_alphabet();
    let non_blank: Vec<char> = alphabet.iter().chain(MARKERS.iter()).copied().collect();
    let all_symbols: Vec<char> = non_blank.iter().copied().chain([BLANK]).collect();

    let mut table = TransitionTable::new();
    let mut states = Vec::new();

    // Length phase.
    let counters = length_states();
    for (i, state) in counters.iter().enumerate() {
        let next = counters.get(i + 1).map_or(LENGTH_OK_STATE, String::as_str);

        table.insert(state, BLANK, Transition::new(REJECT_STATE, BLANK, Direction::Stay))?;
        for &symbol in &alphabet {
            table.insert(state, symbol, Transition::new(next, symbol, Direction::Right))?;
        }
    }
    states.extend(counters);

    table.skip(LENGTH_OK_STATE, [&alphabet])?;
    table.insert(
        LENGTH_OK_STATE,
        BLANK,
        Transition::new(CharClass::Lower.rewind_state(), BLANK, Direction::Left),
    )?;
    states.push(LENGTH_OK_STATE.to_string());

    // One search phase per class.
    for (i, class) in CharClass::ALL.iter().enumerate() {
        let rewind = class.rewind_state();
        let find = class.find_state();
        let others: Vec<char> = non_blank
            .iter()
            .copied()
            .filter(|symbol| !class.symbols().contains(symbol))
            .collect();

        // The length phase leaves the head on the last input symbol, so the first rewind
        // needs no step back.
        if i > 0 {
            let back = class.back_state();
            table.step_back(&back, &all_symbols, &rewind)?;
            states.push(back);
        }

        table.rewind(&rewind, &non_blank, BLANK, &find)?;

        let target = match CharClass::ALL.get(i + 1) {
            Some(next) => next.back_state(),
            None => ACCEPT_STATE.to_string(),
        };
        table.find(&find, class.symbols(), &target, class.marker())?;
        table.skip(&find, [&others])?;
        table.insert(&find, BLANK, Transition::new(REJECT_STATE, BLANK, Direction::Stay))?;

        states.push(rewind);
        states.push(find);
    }

    RuleSetBuilder::new("Strong password", START_STATE, ACCEPT_STATE, REJECT_STATE, BLANK)
        .states(states)
        .input_symbols(&alphabet)
        .tape_symbols(&MARKERS)
        .build(table)
}

/// Plain check of the same policy, without a machine.
pub fn is_strong_password(password: &str) -> bool {
    let alphabet = input_alphabet();

    password.chars().count() >= MIN_LENGTH
        && password.chars().all(|c| alphabet.contains(&c))
        && CharClass::ALL
            .iter()
            .all(|class| password.chars().any(|c| class.symbols().contains(&c)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::TuringMachine;
    use crate::types::{Halt, Rejection};

    fn machine() -> TuringMachine {
        TuringMachine::new(password_rules().unwrap()).unwrap()
    }

    #[test]
    fn test_rules_build_without_conflicts() {
        let rules = password_rules().unwrap();

        assert_eq!(rules.start_state, START_STATE);
        assert_eq!(rules.states.len(), 8 + 1 + 4 * 2 + 3 + 2);
        assert_eq!(rules.input_alphabet.len(), 70);
        assert_eq!(rules.tape_alphabet.len(), 70 + 4 + 1);
        assert!(rules.transition(ACCEPT_STATE, 'a').is_none());
    }

    #[test]
    fn test_markers_are_not_input() {
        let rules = password_rules().unwrap();

        for marker in MARKERS {
            assert!(!rules.input_alphabet.contains(&marker));
            assert!(rules.tape_alphabet.contains(&marker));
        }
    }

    #[test]
    fn test_find_phases_are_total_over_tape_alphabet() {
        let rules = password_rules().unwrap();

        for class in CharClass::ALL {
            for symbol in &rules.tape_alphabet {
                assert!(
                    rules.transition(&class.find_state(), *symbol).is_some(),
                    "{} has no rule for {:?}",
                    class.find_state(),
                    symbol
                );
            }
        }
    }

    #[test]
    fn test_find_marks_and_moves_right() {
        let rules = password_rules().unwrap();

        let rule = rules.transition("q_find_upper", 'Q').unwrap();
        assert_eq!(rule.write, UPPER_MARK);
        assert_eq!(rule.direction, Direction::Right);
        assert_eq!(rule.next_state, "q_back_num");

        let last = rules.transition("q_find_spec", '#').unwrap();
        assert_eq!(last.next_state, ACCEPT_STATE);
    }

    #[test]
    fn test_short_password() {
        let result = machine().run("short1!");

        assert!(!result.accepted);
        assert_eq!(result.halt, Halt::Reject(Rejection::Transition));
        assert!(result.trace.contains("δ(q7, _) → (q_reject, _, S)"));
    }

    #[test]
    fn test_missing_uppercase() {
        let result = machine().run("alllowercase1!");

        assert!(!result.accepted);
        assert!(result.trace.contains("δ(q_find_upper, _) → (q_reject, _, S)"));
    }

    #[test]
    fn test_strong_password() {
        let result = machine().run("Str0ngPass!");

        assert!(result.accepted);
        assert!(result.trace.ends_with("Result: ACCEPTED"));
    }

    #[test]
    fn test_empty_password() {
        let result = machine().run("");

        assert!(!result.accepted);
        assert_eq!(result.steps, 1);
        assert!(result.trace.contains("δ(q0, _) → (q_reject, _, S)"));
    }

    #[test]
    fn test_missing_special() {
        let result = machine().run("NoSpecial123");

        assert!(!result.accepted);
        for found in [
            "δ(q7, a) → (q_len_ok, a, R)",
            "δ(q_find_lower, o) → (q_back_upper, ł, R)",
            "δ(q_find_upper, N) → (q_back_num, Ł, R)",
            "δ(q_find_num, 1) → (q_back_spec, №, R)",
            "δ(q_find_spec, _) → (q_reject, _, S)",
        ] {
            assert!(result.trace.contains(found), "missing {}", found);
        }
    }

    #[test]
    fn test_class_found_at_last_position() {
        // The only digit is the final symbol; the following rewind must still reach the
        // left sentinel and find the special symbol at the front.
        let result = machine().run("!abcdefG1");
        assert!(result.accepted);
    }

    #[test]
    fn test_marker_cannot_be_typed() {
        let result = machine().run("Str0ngPass!ł");

        assert!(!result.accepted);
        assert_eq!(
            result.halt,
            Halt::Reject(Rejection::MissingTransition {
                state: LENGTH_OK_STATE.to_string(),
                symbol: 'ł'
            })
        );
    }

    #[test]
    fn test_unknown_symbol_in_length_phase() {
        let result = machine().run("Str 0ngPass!");

        assert_eq!(
            result.halt,
            Halt::Reject(Rejection::MissingTransition {
                state: "q3".to_string(),
                symbol: ' '
            })
        );
    }

    #[test]
    fn test_predicate() {
        assert!(is_strong_password("Str0ngPass!"));
        assert!(is_strong_password("aB3$aB3$"));
        assert!(!is_strong_password("aB3$aB3"));
        assert!(!is_strong_password("NoSpecial123"));
        assert!(!is_strong_password("Str0ng Pass!"));
    }
}
