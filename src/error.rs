use std::fmt;

/// Errors that can occur while parsing or executing a program.
///
/// All three kinds are terminal: a run that hits one produces no further
/// effects, and only the first error is ever reported.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InterpreterError {
    /// Loops were not balanced; a matching `[` or `]` was not found.
    #[error("unmatched bracket {kind}")]
    UnmatchedBracket { kind: BracketKind },

    /// An increment or decrement would leave the representable cell range
    /// [0, 255]. Cells never wrap.
    #[error("cell value out of range at cell {ptr} (op='{op}')")]
    ValueOutOfRange { ptr: usize, op: char },

    /// The data pointer attempted to move left of cell 0 or past the
    /// configured tape capacity.
    #[error("pointer out of bounds (ptr={ptr}, op='{op}')")]
    PointerOutOfBounds { ptr: usize, op: char },
}

/// Which side of a loop was unmatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BracketKind {
    Open,
    Close,
}

impl fmt::Display for BracketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BracketKind::Open => write!(f, "'['"),
            BracketKind::Close => write!(f, "']'"),
        }
    }
}
