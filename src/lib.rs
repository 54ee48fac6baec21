//! A strict, tree-walking Brainfuck interpreter.
//!
//! Programs are parsed into a nested instruction tree (each matched
//! `[...]` pair becomes a loop group), then executed by a direct recursive
//! walk over that tree against a bounded memory tape.
//!
//! Features and behaviors:
//! - Non-instruction characters are comments and are stripped before
//!   parsing; a program with no instructions at all runs successfully and
//!   produces empty output.
//! - Memory tape of byte cells, starting as a single zeroed cell and
//!   growing lazily up to a configurable capacity (default 100 cells).
//! - Strict pointer bounds: moving left from cell 0 or right past the
//!   capacity edge returns an error.
//! - Strict cell range: incrementing 255 or decrementing 0 returns an
//!   error instead of wrapping.
//! - Loop bodies always execute once before the guard cell is first read
//!   (do-then-test). This diverges from conventional Brainfuck, where a
//!   loop on a zero cell is skipped, and is kept deliberately: `[-]` on a
//!   zero cell is a value error here.
//! - Input `,` pops from a queue of pre-supplied byte values; when the
//!   queue is exhausted the cell is set to 0.
//! - Output `.` accumulates characters into a `String` returned on
//!   success, so callers can tell an empty-output success from a failure.
//! - Unmatched brackets are reported as errors and nothing executes.
//!
//! Quick start:
//!
//! ```
//! use bft::Interpreter;
//!
//! // Classic "Hello World!" in Brainfuck
//! let code = "++++++++++[>+++++++>++++++++++>+++>+<<<<-]>++.>+.+++++++..+++.>++.<<+++++++++++++++.>.+++.------.--------.>+.>.";
//! let output = Interpreter::new(code.to_string()).run().expect("program should run");
//! assert_eq!(output, "Hello World!\n");
//! ```

pub mod cli_util;
pub mod commands;
pub mod config;
pub mod error;
pub mod machine;
pub mod parser;
pub mod repl;

pub use error::{BracketKind, InterpreterError};
pub use machine::{DEFAULT_TAPE_CAPACITY, Machine};
pub use parser::{Instr, parse};

/// A ready-to-run program: source text, tape capacity and input queue.
///
/// Each call to [`Interpreter::run`] parses the source and executes it on
/// a fresh [`Machine`], so one `Interpreter` can run the same program many
/// times with no state carried between runs.
pub struct Interpreter {
    code: String,
    capacity: usize,
    input: Vec<u8>,
}

impl Interpreter {
    /// Create an interpreter with the default tape capacity.
    pub fn new(code: String) -> Self {
        Self::with_capacity(code, DEFAULT_TAPE_CAPACITY)
    }

    /// Create an interpreter with `capacity` addressable tape cells.
    pub fn with_capacity(code: String, capacity: usize) -> Self {
        Self {
            code,
            capacity,
            input: Vec::new(),
        }
    }

    /// Supply the values `,` will consume, in order.
    pub fn set_input<I>(&mut self, input: I)
    where
        I: IntoIterator<Item = u8>,
    {
        self.input = input.into_iter().collect();
    }

    /// Parse and execute, returning the program's output or the first
    /// error encountered.
    pub fn run(&self) -> Result<String, InterpreterError> {
        let program = parser::parse(&self.code)?;
        Machine::new(self.capacity, self.input.clone()).run(&program)
    }

    /// Parse and execute while printing a step-by-step table of operations
    /// to stdout. See [`Machine::run_traced`].
    pub fn run_traced(&self) -> Result<String, InterpreterError> {
        let program = parser::parse(&self.code)?;
        Machine::new(self.capacity, self.input.clone()).run_traced(&program)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_returns_accumulated_output() {
        let bf = Interpreter::new("+++.".to_string());
        assert_eq!(bf.run().unwrap(), "\u{3}");
    }

    #[test]
    fn run_with_input_queue() {
        let mut bf = Interpreter::new(",.".to_string());
        bf.set_input([65]);
        assert_eq!(bf.run().unwrap(), "A");
    }

    #[test]
    fn default_capacity_allows_index_99_but_not_100() {
        let bf = Interpreter::new(">".repeat(99));
        assert!(bf.run().is_ok());

        let bf = Interpreter::new(">".repeat(100));
        assert_eq!(
            bf.run(),
            Err(InterpreterError::PointerOutOfBounds { ptr: 99, op: '>' })
        );
    }

    #[test]
    fn syntax_error_surfaces_before_any_execution() {
        // The '.' never runs; the result is the parse error alone.
        let bf = Interpreter::new(".[".to_string());
        assert_eq!(
            bf.run(),
            Err(InterpreterError::UnmatchedBracket {
                kind: BracketKind::Open,
            })
        );
    }

    #[test]
    fn runs_are_independent() {
        let mut bf = Interpreter::new(",.".to_string());
        bf.set_input([66]);
        assert_eq!(bf.run().unwrap(), "B");
        // A second run re-seeds the queue from the same configured input.
        assert_eq!(bf.run().unwrap(), "B");
    }
}
