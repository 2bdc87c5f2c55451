// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Error types of the engine.
//!
//! Verification never produces these: a failed check is recorded in the
//! session, not returned. Errors only come out of the session lifecycle,
//! report output and configuration.

use thiserror::Error;

/// Errors returned by session and configuration operations.
#[derive(Debug, Error)]
pub enum Error {
    /// `end()` was already called on this session.
    #[error("session has already ended")]
    AlreadyEnded,
    /// Writing the report failed.
    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),
    /// `end()` was called from inside a running test.
    #[error("cannot end the session while a test is running")]
    TestRunning,
    /// A configuration value could not be parsed.
    #[error("invalid value {value:?} for {key}")]
    InvalidConfig { key: &'static str, value: String },
}

pub type RunResult<T> = Result<T, Error>;
