// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Per-invocation bookkeeping: test records, failures and warnings.

use core::fmt;

use strum::{Display, IntoStaticStr};

use crate::location::Location;

/// Display status of a test record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
pub enum TestStatus {
    /// No assertion ran yet.
    Unknown,
    Success,
    Failure,
}

impl TestStatus {
    /// The character of this status in the report's progress line.
    pub const fn marker(self) -> char {
        match self {
            TestStatus::Unknown => '?',
            TestStatus::Success => '.',
            TestStatus::Failure => 'F',
        }
    }
}

/// File and function of the first assertion evaluated in a test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FuncInfo {
    pub file: &'static str,
    pub function: &'static str,
}

impl From<&Location> for FuncInfo {
    fn from(at: &Location) -> Self {
        Self {
            file: at.file,
            function: at.function,
        }
    }
}

impl fmt::Display for FuncInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}()", self.file, self.function)
    }
}

/// State machine of one test record.
///
/// The [`FuncInfo`] is attached on the first transition out of `Unknown`
/// and carried along afterwards, so later assertions cannot overwrite it.
/// `Failure` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TestOutcome {
    #[default]
    Unknown,
    Success(FuncInfo),
    Failure(FuncInfo),
}

impl TestOutcome {
    /// Outcome after a passing assertion at `at`.
    #[must_use]
    pub fn pass(self, at: &Location) -> Self {
        match self {
            TestOutcome::Unknown => TestOutcome::Success(at.into()),
            settled => settled,
        }
    }

    /// Outcome after a failing assertion at `at`.
    #[must_use]
    pub fn fail(self, at: &Location) -> Self {
        match self {
            TestOutcome::Unknown => TestOutcome::Failure(at.into()),
            TestOutcome::Success(info) | TestOutcome::Failure(info) => TestOutcome::Failure(info),
        }
    }

    pub fn status(&self) -> TestStatus {
        match self {
            TestOutcome::Unknown => TestStatus::Unknown,
            TestOutcome::Success(_) => TestStatus::Success,
            TestOutcome::Failure(_) => TestStatus::Failure,
        }
    }

    pub fn info(&self) -> Option<&FuncInfo> {
        match self {
            TestOutcome::Unknown => None,
            TestOutcome::Success(info) | TestOutcome::Failure(info) => Some(info),
        }
    }
}

/// A failed assertion: where it was and what it said.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub line: u32,
    pub message: String,
}

/// A non-fatal note attached to the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub location: Location,
    pub message: String,
}

/// Bookkeeping for one `run_test` invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct TestRecord {
    caller: Location,
    outcome: TestOutcome,
    failures: Vec<Failure>,
}

impl TestRecord {
    pub(crate) fn new(caller: Location) -> Self {
        Self {
            caller,
            outcome: TestOutcome::Unknown,
            failures: Vec::new(),
        }
    }

    /// Where `run_test` was invoked.
    pub fn caller(&self) -> &Location {
        &self.caller
    }

    pub fn outcome(&self) -> TestOutcome {
        self.outcome
    }

    pub fn status(&self) -> TestStatus {
        self.outcome.status()
    }

    /// File and function of the first assertion, if any ran.
    pub fn info(&self) -> Option<&FuncInfo> {
        self.outcome.info()
    }

    pub fn failures(&self) -> &[Failure] {
        &self.failures
    }

    pub(crate) fn record_success(&mut self, at: &Location) {
        self.outcome = self.outcome.pass(at);
    }

    pub(crate) fn record_failure(&mut self, at: &Location, message: String) {
        self.outcome = self.outcome.fail(at);
        self.failures.push(Failure {
            line: at.line,
            message,
        });
    }
}
