// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Session configuration.
//!
//! | Variable | Values | Default |
//! |----------|--------|---------|
//! | `UNITRUN_COLOR` | `auto`, `always`, `never` | `auto` |
//! | `UNITRUN_LOG` | `off`, `error`, `warn`, `info`, `debug`, `trace` | `warn` |
//! | `UNITRUN_REPORT` | `stdout`, `stderr` | `stdout` |
//!
//! A non-empty `NO_COLOR` forces `never` unless `UNITRUN_COLOR` is set.

use std::{
    env,
    io::{self, IsTerminal},
    str::FromStr,
};

use log::LevelFilter;
use strum::{Display, EnumString};

use crate::error::{Error, RunResult};

pub const COLOR_VAR: &str = "UNITRUN_COLOR";
pub const LOG_VAR: &str = "UNITRUN_LOG";
pub const REPORT_VAR: &str = "UNITRUN_REPORT";
pub const NO_COLOR_VAR: &str = "NO_COLOR";

/// Whether the report uses ANSI colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ColorChoice {
    /// Color when the report target is a terminal.
    #[default]
    Auto,
    Always,
    Never,
}

/// Stream the report is written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ReportTarget {
    #[default]
    Stdout,
    Stderr,
}

impl ReportTarget {
    pub fn is_terminal(self) -> bool {
        match self {
            ReportTarget::Stdout => io::stdout().is_terminal(),
            ReportTarget::Stderr => io::stderr().is_terminal(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub color: ColorChoice,
    pub log_level: LevelFilter,
    pub report_target: ReportTarget,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            color: ColorChoice::Auto,
            log_level: LevelFilter::Warn,
            report_target: ReportTarget::Stdout,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_color(mut self, color: ColorChoice) -> Self {
        self.color = color;
        self
    }

    pub fn with_log_level(mut self, log_level: LevelFilter) -> Self {
        self.log_level = log_level;
        self
    }

    pub fn with_report_target(mut self, report_target: ReportTarget) -> Self {
        self.report_target = report_target;
        self
    }

    /// Reads the configuration from the process environment.
    pub fn from_env() -> RunResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a configuration from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> RunResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        match lookup(COLOR_VAR) {
            Some(value) => config.color = parse(COLOR_VAR, &value)?,
            None => {
                if lookup(NO_COLOR_VAR).is_some_and(|v| !v.is_empty()) {
                    config.color = ColorChoice::Never;
                }
            }
        }
        if let Some(value) = lookup(LOG_VAR) {
            config.log_level = parse(LOG_VAR, &value)?;
        }
        if let Some(value) = lookup(REPORT_VAR) {
            config.report_target = parse(REPORT_VAR, &value)?;
        }
        Ok(config)
    }

    /// Resolves [`ColorChoice::Auto`] against the report target.
    pub fn use_color(&self) -> bool {
        match self.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => self.report_target.is_terminal(),
        }
    }
}

fn parse<T: FromStr>(key: &'static str, value: &str) -> RunResult<T> {
    value.trim().parse().map_err(|_| Error::InvalidConfig {
        key,
        value: value.to_owned(),
    })
}
