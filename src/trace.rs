//! Human-readable step records.
//!
//! The engine appends one record per configuration it wants to explain. Records are never read
//! back by the engine; they exist for whoever is watching the simulation.

use std::fmt;

/// Width the state column is padded to.
const STATE_COLUMN: usize = 10;

/// One entry of the execution trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceRecord {
    /// A configuration: the state, what happened, and a window of the tape around the head.
    Step {
        state: String,
        note: String,
        tape: String,
    },
    /// A free-form line, used for the final result of a run.
    Line(String),
}

impl TraceRecord {
    pub fn step(state: &str, note: impl Into<String>, tape: String) -> Self {
        TraceRecord::Step {
            state: state.to_string(),
            note: note.into(),
            tape,
        }
    }
}

impl fmt::Display for TraceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceRecord::Step { state, note, tape } => {
                writeln!(f, "State: {:<width$} | {}", state, note, width = STATE_COLUMN)?;
                writeln!(f, "Tape : {}", tape)
            }
            TraceRecord::Line(line) => write!(f, "{}", line),
        }
    }
}

/// Joins records with newlines into a single text block.
pub fn format_trace(records: &[TraceRecord]) -> String {
    records
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders `left` cells before and `right` cells from the head, inclusive of the head cell.
///
/// The head cell is bracketed, other cells are padded with spaces, and an ellipsis marks each
/// side where the window does not reach the end of the tape.
///
/// ```
/// use tur_password::trace::render_window;
///
/// let tape: Vec<char> = "_abc_".chars().collect();
/// assert_eq!(render_window(&tape, 1, 5, 20), " _ [a] b  c  _ ");
/// ```
pub fn render_window(tape: &[char], head: usize, left: usize, right: usize) -> String {
    let start = head.saturating_sub(left);
    let end = tape.len().min(head.saturating_add(right));

    let mut rendered = String::new();

    if start > 0 {
        rendered.push_str("... ");
    }

    for (i, symbol) in tape.iter().enumerate().take(end).skip(start) {
        if i == head {
            rendered.push_str(&format!("[{}]", symbol));
        } else {
            rendered.push_str(&format!(" {} ", symbol));
        }
    }

    if end < tape.len() {
        rendered.push_str(" ...");
    }

    rendered
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tape(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_window_covers_whole_tape() {
        assert_eq!(render_window(&tape("ab"), 0, 5, 20), "[a] b ");
    }

    #[test]
    fn test_window_truncates_left() {
        let tape = tape("0123456789");
        assert_eq!(
            render_window(&tape, 7, 2, 20),
            "...  5  6 [7] 8  9 "
        );
    }

    #[test]
    fn test_window_truncates_right() {
        let tape = tape("0123456789");
        assert_eq!(render_window(&tape, 0, 5, 3), "[0] 1  2  ...");
    }

    #[test]
    fn test_window_on_empty_tape() {
        assert_eq!(render_window(&[], 0, 5, 20), "");
    }

    #[test]
    fn test_step_record_layout() {
        let record = TraceRecord::step("q0", "Initialized", "[a]".to_string());
        assert_eq!(record.to_string(), "State: q0         | Initialized\nTape : [a]\n");
    }

    #[test]
    fn test_format_trace_joins_records() {
        let records = vec![
            TraceRecord::step("q0", "Initialized", "[a]".to_string()),
            TraceRecord::Line("Result: REJECTED".to_string()),
        ];

        assert_eq!(
            format_trace(&records),
            "State: q0         | Initialized\nTape : [a]\n\nResult: REJECTED"
        );
    }
}
