//! Caller-visible error kinds.
//!
//! `BUDGET_EXCEEDED` is deliberately absent here: running out of deadline or
//! output budget is not an error, it's a suspension, and is reported through
//! [`crate::cursor::Cursor::is_done`] instead.

use thiserror::Error;

/// What kind of budget a [`Error::Capacity`] failure ran into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CapacityKind {
    /// The compiled program would need more states than `S <= 2^14` allows.
    States,
    /// The requested fuzz budget `k` exceeds the program's compile-time `k_max`.
    FuzzBudget,
    /// The requested combo tuple length `N` exceeds the hard cap of 10.
    TupleLength,
}

impl std::fmt::Display for CapacityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CapacityKind::States => write!(f, "state budget"),
            CapacityKind::FuzzBudget => write!(f, "fuzz budget"),
            CapacityKind::TupleLength => write!(f, "tuple length"),
        }
    }
}

/// Errors the engine can surface to a caller.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// The pattern expression was syntactically ill-formed.
    ///
    /// `offset` is the byte offset into the expression string at which the
    /// problem was detected.
    #[error("compile error at byte {offset}: {message}")]
    Compile {
        /// Byte offset into the source expression where parsing failed.
        offset: usize,
        /// Human-readable description of the syntactic problem.
        message: String,
    },

    /// Compiling the pattern would exceed an implementation budget (state
    /// count or fuzz cap).
    #[error("capacity error: {kind} exceeded")]
    Capacity {
        /// Which budget was exceeded.
        kind: CapacityKind,
    },

    /// A non-canonical string was passed to [`crate::nx::run_match`]. This is
    /// a programmer error rather than malformed user input, but it is
    /// reported as an ordinary `Result` in every build profile rather than
    /// asserting only in debug builds — a library shouldn't behave
    /// differently in release than in the tests that exercise it.
    #[error("invalid input: not a canonical string")]
    InvalidInput,
}

impl Error {
    pub(crate) fn compile(offset: usize, message: impl Into<String>) -> Error {
        Error::Compile { offset, message: message.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_error_reports_offset() {
        let err = Error::compile(3, "unbalanced brackets");
        match err {
            Error::Compile { offset, .. } => assert_eq!(offset, 3),
            _ => panic!("expected compile error"),
        }
    }

    #[test]
    fn capacity_kind_displays() {
        assert_eq!(CapacityKind::States.to_string(), "state budget");
        assert_eq!(CapacityKind::FuzzBudget.to_string(), "fuzz budget");
        assert_eq!(CapacityKind::TupleLength.to_string(), "tuple length");
    }
}
