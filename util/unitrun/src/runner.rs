// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! The run controller.
//!
//! A [`Session`] owns every test record and warning of one run, the
//! optional setup/teardown hooks, and the aggregate counters. It is passed
//! by `&mut` into each test function, which is where the verification
//! operations in [`crate::assert`] find the record they report into.

use std::{
    fmt, io,
    process::ExitCode,
    time::{Duration, Instant},
};

use crate::{
    config::{Config, ReportTarget},
    error::{Error, RunResult},
    location::Location,
    record::{TestRecord, Warning},
    report::{Reporter, Summary},
};

/// A callable run before or after every test.
pub type Hook = Box<dyn FnMut()>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Running,
    Ended,
}

/// State of one test run, from [`Session::init`] to [`Session::end`].
pub struct Session {
    config: Config,
    tests: Vec<TestRecord>,
    warnings: Vec<Warning>,
    setup: Option<Hook>,
    teardown: Option<Hook>,
    start: Instant,
    assert_count: usize,
    failed_assert_count: usize,
    has_failed: bool,
    current: Option<usize>,
    phase: Phase,
}

impl Session {
    /// Starts a session with the default configuration.
    pub fn init() -> Self {
        Self::with_config(Config::default())
    }

    /// Starts a session; the elapsed-time clock starts here.
    pub fn with_config(config: Config) -> Self {
        debug!("session started: {config:?}");
        Self {
            config,
            tests: Vec::new(),
            warnings: Vec::new(),
            setup: None,
            teardown: None,
            start: Instant::now(),
            assert_count: 0,
            failed_assert_count: 0,
            has_failed: false,
            current: None,
            phase: Phase::Running,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Replaces the hook called before every test.
    pub fn set_setup(&mut self, setup: impl FnMut() + 'static) {
        self.setup = Some(Box::new(setup));
    }

    /// Replaces the hook called after every test.
    pub fn set_teardown(&mut self, teardown: impl FnMut() + 'static) {
        self.teardown = Some(Box::new(teardown));
    }

    /// Replaces both hooks at once.
    pub fn set_fixture(
        &mut self,
        setup: impl FnMut() + 'static,
        teardown: impl FnMut() + 'static,
    ) {
        self.set_setup(setup);
        self.set_teardown(teardown);
    }

    pub fn clear_setup(&mut self) {
        self.setup = None;
    }

    pub fn clear_teardown(&mut self) {
        self.teardown = None;
    }

    pub fn clear_fixture(&mut self) {
        self.clear_setup();
        self.clear_teardown();
    }

    pub fn has_setup(&self) -> bool {
        self.setup.is_some()
    }

    pub fn has_teardown(&self) -> bool {
        self.teardown.is_some()
    }

    /// Runs `test` once, bracketed by the current hooks.
    ///
    /// Each call creates a new [`TestRecord`], so running the same function
    /// twice yields two independent records. Assertions made by `test` are
    /// reported into that record, including after a nested `run_test`
    /// returns. Ignored once the session has ended.
    pub fn run_test<F>(&mut self, test: F, caller: Location)
    where
        F: FnOnce(&mut Session),
    {
        if self.phase == Phase::Ended {
            warn!("test called from {caller} ignored: session has ended");
            return;
        }

        if let Some(setup) = self.setup.as_mut() {
            setup();
        }

        let index = self.tests.len();
        self.tests.push(TestRecord::new(caller));
        let outer = self.current.replace(index);
        debug!("test #{index} called from {caller}");

        test(self);

        self.current = outer;
        if let Some(record) = self.tests.get(index) {
            debug!("test #{index} finished: {}", record.status());
        }

        if let Some(teardown) = self.teardown.as_mut() {
            teardown();
        }
    }

    /// `1` once any assertion has failed, `0` before that.
    pub fn status_code(&self) -> i32 {
        if self.has_failed { 1 } else { 0 }
    }

    /// [`Session::status_code`] as a process exit status.
    pub fn exit_code(&self) -> ExitCode {
        if self.has_failed {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        }
    }

    pub fn tests(&self) -> &[TestRecord] {
        &self.tests
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// The record assertions currently report into.
    pub fn current_test(&self) -> Option<&TestRecord> {
        self.current.and_then(|index| self.tests.get(index))
    }

    pub fn assert_count(&self) -> usize {
        self.assert_count
    }

    pub fn failed_assert_count(&self) -> usize {
        self.failed_assert_count
    }

    pub fn has_failed(&self) -> bool {
        self.has_failed
    }

    pub fn is_ended(&self) -> bool {
        self.phase == Phase::Ended
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Totals of the run so far.
    pub fn summary(&self) -> Summary {
        Summary::collect(self, self.elapsed())
    }

    /// Prints the report to the configured target and releases every record.
    pub fn end(&mut self) -> RunResult<Summary> {
        match self.config.report_target {
            ReportTarget::Stdout => self.end_to(&mut io::stdout().lock()),
            ReportTarget::Stderr => self.end_to(&mut io::stderr().lock()),
        }
    }

    /// Like [`Session::end`], writing the report into `out`.
    ///
    /// Records are released even when writing fails. A second call returns
    /// [`Error::AlreadyEnded`]; a call from inside a running test returns
    /// [`Error::TestRunning`] and leaves the session untouched.
    pub fn end_to<W: io::Write>(&mut self, out: &mut W) -> RunResult<Summary> {
        if self.phase == Phase::Ended {
            return Err(Error::AlreadyEnded);
        }
        if self.current.is_some() {
            return Err(Error::TestRunning);
        }

        let elapsed = self.elapsed();
        let reporter = Reporter::new(self.config.use_color());
        let written = reporter.render(self, elapsed, out);

        self.phase = Phase::Ended;
        self.current = None;
        self.tests = Vec::new();
        self.warnings = Vec::new();
        self.clear_fixture();

        let summary = written?;
        info!(
            "session ended: {} tests, {} assertions ({} failed) in {:.3}s",
            summary.tests,
            summary.asserts,
            summary.failed_asserts,
            elapsed.as_secs_f64()
        );
        Ok(summary)
    }

    pub(crate) fn assert_success(&mut self, at: &Location) {
        self.assert_count += 1;
        trace!("assertion passed at {at}");

        if let Some(record) = self.current.and_then(|index| self.tests.get_mut(index)) {
            record.record_success(at);
        }
    }

    pub(crate) fn assert_failure(&mut self, at: &Location, message: String) {
        self.assert_count += 1;
        self.failed_assert_count += 1;
        self.has_failed = true;
        trace!("assertion failed at {at}: {message}");

        match self.current.and_then(|index| self.tests.get_mut(index)) {
            Some(record) => record.record_failure(at, message),
            None => {
                warn!("assertion at {at} failed outside of a running test");
                self.warnings.push(Warning {
                    location: *at,
                    message: format!("Assertion outside of a running test: {message}"),
                });
            }
        }
    }

    pub(crate) fn push_warning(&mut self, at: &Location, message: String) {
        warn!("warning raised at {at}: {message}");
        self.warnings.push(Warning {
            location: *at,
            message,
        });
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::init()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .field("tests", &self.tests)
            .field("warnings", &self.warnings)
            .field("has_setup", &self.setup.is_some())
            .field("has_teardown", &self.teardown.is_some())
            .field("assert_count", &self.assert_count)
            .field("failed_assert_count", &self.failed_assert_count)
            .field("has_failed", &self.has_failed)
            .field("phase", &self.phase)
            .finish()
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if self.phase == Phase::Running && !self.tests.is_empty() {
            warn!(
                "session dropped without end(): {} test records discarded",
                self.tests.len()
            );
        }
    }
}
