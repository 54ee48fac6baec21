use std::io::{self, IsTerminal, Write};

use nu_ansi_term::Color;

use crate::InterpreterError;

/// Print an [`InterpreterError`] to stderr, classified the way the CLI
/// talks about it. If `program` is `Some("bft")`, messages are prefixed
/// with "bft: ..." for CLI run mode; the REPL passes `None`.
pub fn print_error(program: Option<&str>, err: &InterpreterError) {
    let kind = match err {
        InterpreterError::UnmatchedBracket { .. } => "Parse error",
        InterpreterError::ValueOutOfRange { .. } => "Value error",
        InterpreterError::PointerOutOfBounds { .. } => "Runtime error",
    };

    // Styled header for TTY stderr; keep pipelines clean otherwise
    let header = if io::stderr().is_terminal() {
        Color::Red.bold().paint(kind).to_string()
    } else {
        kind.to_string()
    };

    match program {
        Some(p) => eprintln!("{p}: {header}: {err}"),
        None => eprintln!("{header}: {err}"),
    }
    let _ = io::stderr().flush();
}
