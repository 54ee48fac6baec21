//! Turns program text into an executable instruction tree.
//!
//! Parsing is two small passes: strip everything that is not one of the
//! eight instruction characters, then fold matched `[...]` pairs into
//! nested [`Instr::Loop`] groups so the executor can walk the program
//! without a program counter or jump table.

use crate::error::{BracketKind, InterpreterError};

/// A single executable instruction.
///
/// Loop bodies are held directly as nested sequences; a parsed program is
/// a `Vec<Instr>` built once and never mutated during execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instr {
    /// `+` — increment the cell under the pointer.
    Inc,
    /// `-` — decrement the cell under the pointer.
    Dec,
    /// `.` — append the cell's character to the output.
    Output,
    /// `,` — pop the next input value into the cell.
    Input,
    /// `>` — move the pointer right.
    Right,
    /// `<` — move the pointer left.
    Left,
    /// `[...]` — run the body, then repeat while the guard cell is nonzero.
    Loop(Vec<Instr>),
}

/// Whether `c` is one of the eight instruction characters.
pub fn is_instruction(c: char) -> bool {
    matches!(c, '>' | '<' | '+' | '-' | '.' | ',' | '[' | ']')
}

/// Keep only instruction characters; everything else is a comment.
pub fn filter(source: &str) -> String {
    source.chars().filter(|c| is_instruction(*c)).collect()
}

/// Parse program text into an instruction tree.
///
/// Source with no instruction characters at all parses to an empty
/// program. Unbalanced brackets are an [`InterpreterError::UnmatchedBracket`].
pub fn parse(source: &str) -> Result<Vec<Instr>, InterpreterError> {
    let filtered = filter(source);
    build(&filtered)
}

/// Fold a filtered token sequence into a tree.
///
/// One left-to-right scan with a bracket-depth counter: the outermost `[`
/// opens a group, inner brackets are buffered as literal tokens of that
/// group, and the buffered body is resolved by recursing once the matching
/// `]` brings the depth back to zero.
fn build(tokens: &str) -> Result<Vec<Instr>, InterpreterError> {
    let mut program = Vec::new();
    let mut body = String::new();
    let mut depth = 0usize;

    for tok in tokens.chars() {
        match tok {
            '[' => {
                if depth > 0 {
                    body.push(tok);
                }
                depth += 1;
            }
            ']' => {
                if depth == 0 {
                    return Err(InterpreterError::UnmatchedBracket {
                        kind: BracketKind::Close,
                    });
                }
                depth -= 1;
                if depth == 0 {
                    program.push(Instr::Loop(build(&body)?));
                    body.clear();
                } else {
                    body.push(tok);
                }
            }
            _ => {
                if depth > 0 {
                    body.push(tok);
                } else {
                    program.push(primitive(tok));
                }
            }
        }
    }

    if depth != 0 {
        return Err(InterpreterError::UnmatchedBracket {
            kind: BracketKind::Open,
        });
    }

    Ok(program)
}

fn primitive(tok: char) -> Instr {
    match tok {
        '+' => Instr::Inc,
        '-' => Instr::Dec,
        '.' => Instr::Output,
        ',' => Instr::Input,
        '>' => Instr::Right,
        '<' => Instr::Left,
        _ => unreachable!("non-instruction token survived filtering"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_drops_comments_and_whitespace() {
        let got = filter("add two, then [ loop body ] and print.\n+>");
        assert_eq!(got, ",[].+>");
    }

    #[test]
    fn filter_is_idempotent() {
        let once = filter("comment +[->.<], comment");
        assert_eq!(filter(&once), once);
    }

    #[test]
    fn empty_or_comment_only_source_parses_to_empty_program() {
        assert_eq!(parse("").unwrap(), vec![]);
        assert_eq!(parse("no instructions here!").unwrap(), vec![]);
    }

    #[test]
    fn flat_program_maps_tokens_in_order() {
        let got = parse("+-.,><").unwrap();
        assert_eq!(
            got,
            vec![
                Instr::Inc,
                Instr::Dec,
                Instr::Output,
                Instr::Input,
                Instr::Right,
                Instr::Left,
            ]
        );
    }

    #[test]
    fn matched_brackets_become_nested_groups() {
        let got = parse("+[>[-]<]").unwrap();
        assert_eq!(
            got,
            vec![
                Instr::Inc,
                Instr::Loop(vec![
                    Instr::Right,
                    Instr::Loop(vec![Instr::Dec]),
                    Instr::Left,
                ]),
            ]
        );
    }

    #[test]
    fn sibling_loops_stay_siblings() {
        let got = parse("[+][-]").unwrap();
        assert_eq!(
            got,
            vec![
                Instr::Loop(vec![Instr::Inc]),
                Instr::Loop(vec![Instr::Dec]),
            ]
        );
    }

    #[test]
    fn parsing_is_deterministic() {
        let source = "++[>+<-]>.";
        assert_eq!(parse(source).unwrap(), parse(source).unwrap());
    }

    #[test]
    fn unmatched_open_bracket_is_a_syntax_error() {
        let result = parse("[");
        assert_eq!(
            result,
            Err(InterpreterError::UnmatchedBracket {
                kind: BracketKind::Open,
            })
        );
    }

    #[test]
    fn unmatched_open_bracket_inside_a_loop_is_a_syntax_error() {
        let result = parse("+[[-]");
        assert_eq!(
            result,
            Err(InterpreterError::UnmatchedBracket {
                kind: BracketKind::Open,
            })
        );
    }

    #[test]
    fn stray_close_bracket_is_a_syntax_error() {
        let result = parse("]");
        assert_eq!(
            result,
            Err(InterpreterError::UnmatchedBracket {
                kind: BracketKind::Close,
            })
        );

        // A later '[' must not rebalance an earlier stray ']'.
        assert!(parse("][").is_err());
    }

    #[test]
    fn top_level_content_between_matched_loops_is_valid() {
        let got = parse("+[-]+[-]+").unwrap();
        assert_eq!(got.len(), 5);
    }
}
