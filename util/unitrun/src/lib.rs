// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! A minimal unit-test runner for plain functions.
//!
//! A [`Session`] runs test functions, brackets each one with optional
//! setup/teardown hooks, collects the outcome of every assertion, and
//! prints a colored report when it ends.
//!
//! ```no_run
//! use unitrun::{Session, check_gt, run_test};
//!
//! fn ordering(s: &mut Session) {
//!     check_gt!(s, 3, 2);
//! }
//!
//! fn main() -> std::process::ExitCode {
//!     let mut session = Session::init();
//!     run_test!(session, ordering);
//!     let _ = session.end();
//!     session.exit_code()
//! }
//! ```

#[macro_use]
extern crate log;

pub mod location;
pub mod message;
pub mod format;
pub mod record;
pub mod config;
pub mod error;
pub mod runner;
pub mod assert;
pub mod report;
pub mod macros;

pub use assert::{AssertOp, RaiseKind, precision_tolerance};
pub use config::{ColorChoice, Config, ReportTarget};
pub use error::{Error, RunResult};
pub use format::{Arg, ArgKind, Dialect, FormatError};
pub use location::Location;
pub use message::MessageBuffer;
pub use record::{Failure, FuncInfo, TestOutcome, TestRecord, TestStatus, Warning};
pub use report::{Reporter, Summary, progress_line};
pub use runner::{Hook, Session};
