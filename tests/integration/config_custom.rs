//! Integration tests for config file loading and CLI precedence.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

#[allow(deprecated)]
fn logshift() -> Command {
    let mut cmd = Command::cargo_bin("logshift").unwrap();
    cmd.arg("--quiet");
    cmd
}

fn config_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn config_file_sets_tag() {
    let file = config_file("tag = \"T+\"\n");
    logshift()
        .arg(format!("--config={}", file.path().display()))
        .write_stdin("2020-01-01 00:00:00 a\n")
        .assert()
        .success()
        .stdout("T+00:00:00 a\n");
}

#[test]
fn config_file_sets_day_first() {
    let file = config_file("month_first = false\n");
    logshift()
        .arg(format!("--config={}", file.path().display()))
        .write_stdin("01/02/2020 00:00:00\n02/01/2020 00:00:00\n")
        .assert()
        .success()
        .stdout("(DURATION)00:00:00\n02/01/2020 00:00:00\n");
}

#[test]
fn cli_overrides_config_file() {
    let file = config_file("tag = \"file\"\n");
    logshift()
        .arg(format!("--config={}", file.path().display()))
        .arg("--tag=cli")
        .write_stdin("2020-01-01 00:00:00\n")
        .assert()
        .success()
        .stdout("cli00:00:00\n");
}

#[test]
fn xdg_config_is_picked_up() {
    let dir = tempfile::tempdir().unwrap();
    let cfg_dir = dir.path().join("logshift");
    std::fs::create_dir_all(&cfg_dir).unwrap();
    std::fs::write(cfg_dir.join("config.toml"), "tag = \"xdg\"\n").unwrap();

    logshift()
        .env("XDG_CONFIG_HOME", dir.path())
        .write_stdin("2020-01-01 00:00:00\n")
        .assert()
        .success()
        .stdout("xdg00:00:00\n");
}

#[test]
fn invalid_config_file_exits_one() {
    let file = config_file("tag = [\n");
    logshift()
        .arg(format!("--config={}", file.path().display()))
        .write_stdin("")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("config file error"));
}

#[test]
fn missing_explicit_config_exits_one() {
    logshift()
        .arg("--config=/nonexistent/logshift.toml")
        .write_stdin("")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn month_first_flag_overrides_config_file() {
    let file = config_file("month_first = false\nyear_first = false\n");
    logshift()
        .arg(format!("--config={}", file.path().display()))
        .arg("--month-first")
        .write_stdin("01/02/2020 00:00:00\n02/01/2020 00:00:00\n")
        .assert()
        .success()
        .stdout("(DURATION)00:00:00\n(DURATION)720:00:00\n");
}
