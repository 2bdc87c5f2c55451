// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Tests for the rendered terminal report

#![cfg(test)]


use std::time::Duration;

use pretty_assertions::assert_eq;
use test_helpers::*;
use unitrun::{AssertOp, Location, RaiseKind, Reporter, Session, args};

const MAIN_PASS: Location = Location::new("report.rs", "main", 10);
const MAIN_FAIL: Location = Location::new("report.rs", "main", 11);
const MAIN_EMPTY: Location = Location::new("report.rs", "main", 12);

fn rule(ch: char) -> String {
    std::iter::repeat_n(ch, 100).collect()
}

fn render(session: &Session, color: bool) -> String {
    let mut out = Vec::new();
    Reporter::new(color)
        .render(session, Duration::ZERO, &mut out)
        .unwrap();
    String::from_utf8(out).unwrap()
}

fn mixed_session() -> Session {
    let mut session = quiet_session();
    session.run_test(
        |s| s.verify_condition(true, Location::new("report.rs", "passing", 20), "", &[]),
        MAIN_PASS,
    );
    session.run_test(
        |s| {
            let at = Location::new("report.rs", "failing", 21);
            s.verify_condition(false, at, "%d Does not equal %d.", &args![5, 7]);
            let at = Location::new("report.rs", "failing", 22);
            s.verify_strings("ab", "abc", at, AssertOp::Equal);
            let at = Location::new("report.rs", "failing", 23);
            s.raise(RaiseKind::Warn, at, "Warning raised.", &[]);
        },
        MAIN_FAIL,
    );
    session.run_test(|_| {}, MAIN_EMPTY);
    session
}

// ========== Layout Tests ==========

#[test]
fn test_failed_report_layout() {
    let mut session = mixed_session();
    let report = render(&session, false);

    let banner = format!("{0}[ Failed in 0.000s. ]{0}", "=".repeat(40));
    let expected = [
        String::new(),
        rule('-'),
        ".F?".into(),
        rule('='),
        "[WARNING] Function called in line 12: report.rs|main() had no assertions.".into(),
        "[WARNING] Line 23: report.rs|failing(): \"Warning raised.\"".into(),
        rule('='),
        "[FAIL] Line 21: report.rs|failing(): \"5 Does not equal 7.\"".into(),
        "[FAIL] Line 22: report.rs|failing(): \"Different string lengths: 2 Does not equal 3.\""
            .into(),
        rule('='),
        "Tests: 1 passed, 1 failed, 1 without assertions (3 total).".into(),
        "Assertions: 1 passed, 2 failed (3 total).".into(),
        String::new(),
        "Failed with 2/3 test results in 0.000 seconds.".into(),
        String::new(),
        banner,
    ]
    .join("\n")
        + "\n";

    assert_eq!(report, expected);
    end_to_string(&mut session);
}

#[test]
fn test_successful_report_layout() {
    let mut session = quiet_session();
    session.run_test(
        |s| s.verify_condition(true, Location::new("report.rs", "passing", 20), "", &[]),
        MAIN_PASS,
    );
    let report = render(&session, false);

    let banner = format!("{0}[ Succeeded in 0.000s. ]{0}", "=".repeat(38));
    let expected = [
        String::new(),
        rule('-'),
        ".".into(),
        rule('='),
        "Tests: 1 passed, 0 failed, 0 without assertions (1 total).".into(),
        "Assertions: 1 passed, 0 failed (1 total).".into(),
        String::new(),
        "[SUCCESS] Successfully ran 1 tests in 0.000 seconds.".into(),
        "OK.".into(),
        String::new(),
        banner,
    ]
    .join("\n")
        + "\n";

    assert_eq!(report, expected);
    end_to_string(&mut session);
}

#[test]
fn test_empty_session_report() {
    let mut session = quiet_session();
    let report = end_to_string(&mut session);

    assert!(report.contains("Tests: 0 passed, 0 failed, 0 without assertions (0 total)."));
    assert!(report.contains("Successfully ran 0 tests"));
}

// ========== Color Tests ==========

#[test]
fn test_colored_tags() {
    let mut session = mixed_session();
    let report = render(&session, true);

    assert!(report.contains("[\u{1B}[1;33mWARNING\u{1B}[0m] Function called in line 12"));
    assert!(report.contains("[\u{1B}[1;31mFAIL\u{1B}[0m] Line 21"));
    assert!(report.contains("[ \u{1B}[1;31mFailed in 0.000s.\u{1B}[0m ]"));
    end_to_string(&mut session);
}

#[test]
fn test_plain_report_has_no_escapes() {
    let mut session = mixed_session();
    let report = end_to_string(&mut session);
    assert!(!report.contains('\u{1B}'));
}

// ========== Summary Tests ==========

#[test]
fn test_summary_matches_report() {
    let mut session = mixed_session();
    let summary = session.end_to(&mut std::io::sink()).unwrap();

    assert_eq!(summary.tests, 3);
    assert_eq!((summary.passed, summary.failed, summary.unknown), (1, 1, 1));
    assert_eq!(summary.asserts, 3);
    assert_eq!(summary.failed_asserts, 2);
    assert_eq!(summary.passed_asserts(), 1);
    assert_eq!(summary.warnings, 2);
    assert!(!summary.success);
}
