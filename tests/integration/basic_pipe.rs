//! Integration tests for stdin->stdout piping.

use assert_cmd::Command;
use predicates::prelude::*;

#[allow(deprecated)]
fn logshift() -> Command {
    let mut cmd = Command::cargo_bin("logshift").unwrap();
    cmd.env("XDG_CONFIG_HOME", "/tmp/logshift-test-no-config");
    cmd.arg("--quiet");
    cmd
}

#[test]
fn empty_stdin_exits_zero() {
    logshift().write_stdin("").assert().success().stdout("");
}

#[test]
fn single_stamp_becomes_zero_offset() {
    logshift()
        .write_stdin("11/12/2020 2:34:00 PM Test line\n")
        .assert()
        .success()
        .stdout("(DURATION)00:00:00 Test line\n");
}

#[test]
fn second_line_shows_delta() {
    let input = "11/12/2020 2:34:00 PM Test line\n11/12/2020 2:34:34.78 PM Test line2\n";
    logshift()
        .write_stdin(input)
        .assert()
        .success()
        .stdout(predicate::str::contains("(DURATION)00:00:00 Test line\n"))
        .stdout(predicate::str::contains("(DURATION)00:00:34.780 Test line2\n"));
}

#[test]
fn plain_text_passes_through() {
    let input = "Starting application...\nno stamp 12:00:00 here\nShutting down.";
    logshift()
        .write_stdin(input)
        .assert()
        .success()
        .stdout(input);
}

#[test]
fn crlf_and_missing_final_newline_preserved() {
    logshift()
        .write_stdin("2020-01-01 00:00:00 a\r\n2020-01-01 00:01:00 b")
        .assert()
        .success()
        .stdout("(DURATION)00:00:00 a\r\n(DURATION)00:01:00 b");
}

#[test]
fn custom_tag_flag() {
    logshift()
        .arg("--tag=+")
        .write_stdin("2020-01-01 00:00:00 a\n2020-01-01 00:00:01.25 b\n")
        .assert()
        .success()
        .stdout("+00:00:00 a\n+00:00:01.250 b\n");
}

#[test]
fn dash_reads_stdin() {
    logshift()
        .arg("-")
        .write_stdin("2020-01-01 00:00:00\n")
        .assert()
        .success()
        .stdout("(DURATION)00:00:00\n");
}

#[test]
fn quiet_keeps_stderr_clean() {
    logshift()
        .write_stdin("2020-01-01 00:00:00\n")
        .assert()
        .success()
        .stderr("");
}

#[test]
fn completions_are_printed() {
    logshift()
        .arg("--completions=bash")
        .assert()
        .success()
        .stdout(predicate::str::contains("logshift"));
}

#[test]
fn latin1_line_is_still_shifted() {
    let input: &[u8] = b"2020-01-01 00:00:00 caf\xe9 start\n2020-01-01 00:00:05 next\n";
    logshift()
        .write_stdin(input)
        .assert()
        .success()
        .stdout(&b"(DURATION)00:00:00 caf\xe9 start\n(DURATION)00:00:05 next\n"[..]);
}
