// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Terminal report of a finished session.
//!
//! Layout, always in this order:
//!
//! 1. one progress character per test: `.` success, `F` failure, `?` no assertions
//! 2. the warnings block (assertion-less tests, then raised warnings)
//! 3. the failure block, one line per recorded failure
//! 4. the summary counts and a colored banner

use std::{fmt, io, time::Duration};

use crate::{
    record::{TestRecord, TestStatus},
    runner::Session,
};

const LINE_WIDTH: usize = 100;

const RESET: &str = "\u{1B}[0m";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Fail,
    Success,
    Warning,
}

impl Role {
    const fn code(self) -> &'static str {
        match self {
            Role::Fail => "\u{1B}[1;31m",
            Role::Success => "\u{1B}[1;32m",
            Role::Warning => "\u{1B}[1;33m",
        }
    }
}

struct Painted<'a> {
    role: Role,
    text: &'a str,
    color: bool,
}

impl fmt::Display for Painted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.color {
            write!(f, "{}{}{RESET}", self.role.code(), self.text)
        } else {
            f.write_str(self.text)
        }
    }
}

/// Totals of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub tests: usize,
    pub passed: usize,
    pub failed: usize,
    /// Tests that ran without a single assertion.
    pub unknown: usize,
    pub asserts: usize,
    pub failed_asserts: usize,
    /// Assertion-less tests plus raised warnings.
    pub warnings: usize,
    pub elapsed: Duration,
    pub success: bool,
}

impl Summary {
    pub(crate) fn collect(session: &Session, elapsed: Duration) -> Self {
        let mut summary = Summary {
            tests: session.tests().len(),
            passed: 0,
            failed: 0,
            unknown: 0,
            asserts: session.assert_count(),
            failed_asserts: session.failed_assert_count(),
            warnings: session.warnings().len(),
            elapsed,
            success: !session.has_failed(),
        };
        for test in session.tests() {
            match test.status() {
                TestStatus::Success => summary.passed += 1,
                TestStatus::Failure => summary.failed += 1,
                TestStatus::Unknown => summary.unknown += 1,
            }
        }
        summary.warnings += summary.unknown;
        summary
    }

    pub fn passed_asserts(&self) -> usize {
        self.asserts - self.failed_asserts
    }
}

/// The progress characters of a session, e.g. `".F?"`.
pub fn progress_line(session: &Session) -> String {
    session
        .tests()
        .iter()
        .map(|test| test.status().marker())
        .collect()
}

/// Renders a session into the terminal report.
#[derive(Debug, Clone, Copy)]
pub struct Reporter {
    color: bool,
}

impl Reporter {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn paint<'a>(&self, role: Role, text: &'a str) -> Painted<'a> {
        Painted {
            role,
            text,
            color: self.color,
        }
    }

    /// Writes the full report for `session` and returns its totals.
    pub fn render<W: io::Write>(
        &self,
        session: &Session,
        elapsed: Duration,
        out: &mut W,
    ) -> io::Result<Summary> {
        let summary = Summary::collect(session, elapsed);

        writeln!(out)?;
        rule(out, '-')?;
        writeln!(out, "{}", progress_line(session))?;
        rule(out, '=')?;

        self.warnings(session, out)?;
        self.failures(session.tests(), out)?;
        self.totals(&summary, out)?;
        out.flush()?;
        Ok(summary)
    }

    fn warnings<W: io::Write>(&self, session: &Session, out: &mut W) -> io::Result<()> {
        let tag = self.paint(Role::Warning, "WARNING");
        let mut any = false;

        for test in session.tests() {
            if test.status() != TestStatus::Unknown {
                continue;
            }
            any = true;
            let caller = test.caller();
            writeln!(
                out,
                "[{tag}] Function called in line {}: {}|{}() had no assertions.",
                caller.line, caller.file, caller.function
            )?;
        }
        for warning in session.warnings() {
            any = true;
            let at = &warning.location;
            writeln!(
                out,
                "[{tag}] Line {}: {}|{}(): \"{}\"",
                at.line, at.file, at.function, warning.message
            )?;
        }

        if any {
            rule(out, '=')?;
        }
        Ok(())
    }

    fn failures<W: io::Write>(&self, tests: &[TestRecord], out: &mut W) -> io::Result<()> {
        let tag = self.paint(Role::Fail, "FAIL");
        let mut any = false;

        for test in tests.iter().filter(|t| t.status() == TestStatus::Failure) {
            let Some(info) = test.info() else {
                continue;
            };
            for failure in test.failures() {
                any = true;
                writeln!(
                    out,
                    "[{tag}] Line {}: {info}: \"{}\"",
                    failure.line, failure.message
                )?;
            }
        }

        if any {
            rule(out, '=')?;
        }
        Ok(())
    }

    fn totals<W: io::Write>(&self, summary: &Summary, out: &mut W) -> io::Result<()> {
        let seconds = summary.elapsed.as_secs_f64();

        writeln!(
            out,
            "Tests: {} passed, {} failed, {} without assertions ({} total).",
            summary.passed, summary.failed, summary.unknown, summary.tests
        )?;
        writeln!(
            out,
            "Assertions: {} passed, {} failed ({} total).",
            summary.passed_asserts(),
            summary.failed_asserts,
            summary.asserts
        )?;
        writeln!(out)?;

        let (role, banner) = if summary.success {
            writeln!(
                out,
                "[{}] Successfully ran {} tests in {seconds:.3} seconds.",
                self.paint(Role::Success, "SUCCESS"),
                summary.tests
            )?;
            writeln!(out, "OK.")?;
            writeln!(out)?;
            (Role::Success, format!("Succeeded in {seconds:.3}s."))
        } else {
            writeln!(
                out,
                "Failed with {}/{} test results in {seconds:.3} seconds.",
                summary.tests - summary.failed,
                summary.tests
            )?;
            writeln!(out)?;
            (Role::Fail, format!("Failed in {seconds:.3}s."))
        };
        self.banner(out, role, &banner)
    }

    /// A rule with `message` centered in it, e.g. `====[ Failed in 0.001s. ]====`.
    fn banner<W: io::Write>(&self, out: &mut W, role: Role, message: &str) -> io::Result<()> {
        let half = (LINE_WIDTH / 2).saturating_sub(2 + message.len() / 2);
        let side = "=".repeat(half);
        writeln!(out, "{side}[ {} ]{side}", self.paint(role, message))
    }
}

fn rule<W: io::Write>(out: &mut W, ch: char) -> io::Result<()> {
    let line: String = core::iter::repeat_n(ch, LINE_WIDTH).collect();
    writeln!(out, "{line}")
}
