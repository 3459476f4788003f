//! Integration tests for date ordering flags and out-of-order stamps.

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
fn earlier_stamp_left_as_data() {
    let input = "11/12/2020 2:34:00 PM Test line, another stamp: 11/12/2020 2:34:04.432 PM  data is 11/12/2019 2:34:00 PM More stuff\n";
    logshift()
        .write_stdin(input)
        .assert()
        .success()
        .stdout(predicate::str::contains("(DURATION)00:00:00 Test line"))
        .stdout(predicate::str::contains("(DURATION)00:00:04.432  data is"))
        .stdout(predicate::str::contains("11/12/2019 2:34:00 PM More stuff"));
}

#[test]
fn backwards_line_does_not_move_reference() {
    let input = "2020-01-01 00:00:10 a\n2020-01-01 00:00:00 b\n2020-01-01 00:00:15 c\n";
    logshift()
        .write_stdin(input)
        .assert()
        .success()
        .stdout("(DURATION)00:00:00 a\n2020-01-01 00:00:00 b\n(DURATION)00:00:05 c\n");
}

#[test]
fn default_reads_month_first() {
    // 2 January to 1 February is 30 days when month comes first
    let input = "01/02/2020 00:00:00\n02/01/2020 00:00:00\n";
    logshift()
        .write_stdin(input)
        .assert()
        .success()
        .stdout(predicate::str::contains("(DURATION)720:00:00"));
}

#[test]
fn day_first_flag() {
    // Same text read day-first: 1 Feb then 2 Jan goes backwards
    let input = "01/02/2020 00:00:00\n02/01/2020 00:00:00\n";
    logshift()
        .arg("--day-first")
        .write_stdin(input)
        .assert()
        .success()
        .stdout("(DURATION)00:00:00\n02/01/2020 00:00:00\n");
}

#[test]
fn year_last_flag() {
    // 11-12-20: year first reads 2011-12-20, year last reads 2020-11-12
    let input = "11-12-20 10:00:00\n2020-11-12 10:00:01\n";
    logshift()
        .arg("--year-last")
        .write_stdin(input)
        .assert()
        .success()
        .stdout("(DURATION)00:00:00\n(DURATION)00:00:01\n");
}

#[test]
fn malformed_date_left_untouched() {
    logshift()
        .write_stdin("13/45/2020 10:00:00 bogus\n")
        .assert()
        .success()
        .stdout("13/45/2020 10:00:00 bogus\n");
}

#[test]
fn words_starting_with_am_pm_are_kept() {
    let input = "2020-01-01 10:00:00 start\n2020-01-01 10:00:05 pmap loaded\n2020-01-01 10:00:06 amount=3\n";
    logshift()
        .write_stdin(input)
        .assert()
        .success()
        .stdout(
            "(DURATION)00:00:00 start\n(DURATION)00:00:05 pmap loaded\n(DURATION)00:00:01 amount=3\n",
        );
}
