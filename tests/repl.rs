use assert_cmd::Command;
use predicates::prelude::*;
use std::time::Duration;

fn cargo_bin() -> Command {
    Command::cargo_bin("bft").unwrap()
}

fn small_valid_program() -> &'static str {
    "+++."
}

#[test]
fn test_auto_bare_on_piped_stdin_executes_once() {
    cargo_bin()
        .timeout(Duration::from_secs(2))
        .arg("repl")
        .write_stdin(small_valid_program())
        .assert()
        .success()
        .stdout(predicate::str::starts_with("\u{3}"));
}

#[test]
fn test_repl_respects_once_env() {
    cargo_bin()
        .timeout(Duration::from_secs(2))
        .arg("repl")
        .env("BFT_REPL_ONCE", "1")
        .write_stdin(small_valid_program())
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_repl_empty_stdin_exits_clean_and_quiet() {
    cargo_bin()
        .timeout(Duration::from_secs(2))
        .arg("repl")
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::is_empty());
}

#[test]
fn test_repl_comment_only_submission_is_ignored() {
    cargo_bin()
        .timeout(Duration::from_secs(2))
        .arg("repl")
        .write_stdin("just some prose with no instructions in it")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_repl_invalid_program_reports_error_and_exits_clean() {
    cargo_bin()
        .timeout(Duration::from_secs(2))
        .arg("repl")
        .write_stdin("[")
        .assert()
        .success()
        .stderr(predicate::str::contains("unmatched bracket"))
        // A trailing newline is still printed after each execution.
        .stdout(predicate::str::contains("\n"));
}

#[test]
fn test_repl_comma_reads_zero_without_input_queue() {
    // ',' then '+' 65 times then '.' prints 'A' iff ',' wrote 0.
    let program = format!(",{}.", "+".repeat(65));
    cargo_bin()
        .timeout(Duration::from_secs(2))
        .arg("repl")
        .write_stdin(program)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("A"));
}

#[test]
fn test_forced_editor_on_non_tty_errors() {
    // Piped stdin (non-tty) + --editor should error out with non-zero and helpful message.
    cargo_bin()
        .timeout(Duration::from_secs(2))
        .arg("repl")
        .arg("--editor")
        .write_stdin(small_valid_program())
        .assert()
        .failure()
        .stderr(predicate::str::contains("stdin is not a TTY"));
}

#[test]
fn test_mode_env_bare_is_honored() {
    cargo_bin()
        .timeout(Duration::from_secs(2))
        .arg("repl")
        .env("BFT_REPL_MODE", "bare")
        .write_stdin(small_valid_program())
        .assert()
        .success()
        .stdout(predicate::str::starts_with("\u{3}"));
}

#[test]
fn test_mode_env_invalid_value_errors() {
    cargo_bin()
        .timeout(Duration::from_secs(2))
        .arg("repl")
        .env("BFT_REPL_MODE", "sideways")
        .write_stdin(small_valid_program())
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid BFT_REPL_MODE value"));
}
