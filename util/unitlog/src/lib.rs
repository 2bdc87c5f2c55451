// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Colored logger for test binaries driving a `unitrun` session.
//!
//! Log lines go to stderr so they never interleave with the report, which
//! is written to stdout by default.

use std::{
    fmt::{self, Write},
    io::{self, Write as _},
    str::FromStr,
};

use log::{Level, LevelFilter, Log, Metadata, Record};
pub use log::{debug, error, info, trace, warn};

#[macro_export]
macro_rules! uprint {
    ($($arg:tt)*) => {
        let _ = $crate::print_fmt(format_args!($($arg)*));
    }
}

#[macro_export]
macro_rules! uprintln {
    () => { $crate::uprint!("\n") };
    ($($arg:tt)*) => {
        let _ = $crate::print_fmt(format_args!("{}\n", format_args!($($arg)*)));
    }
}

macro_rules! color_fmt {
    ($color_code:expr, $($arg:tt)*) => {
        format_args!("\u{1B}[{}m{}\u{1B}[m", $color_code as u8, format_args!($($arg)*))
    };
}

#[repr(u8)]
enum AnsiColor {
    Red         = 31,
    Green       = 32,
    Yellow      = 33,
    Cyan        = 36,
    White       = 37,
    BrightBlack = 90,
}

struct SessionLogger;

impl Write for SessionLogger {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        io::stderr().write_all(s.as_bytes()).map_err(|_| fmt::Error)
    }
}

impl Log for SessionLogger {
    #[inline]
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let level = record.level();
        let line = record.line().unwrap_or(0);
        let path = record.target();
        let color = match level {
            Level::Error => AnsiColor::Red,
            Level::Warn => AnsiColor::Yellow,
            Level::Info => AnsiColor::Green,
            Level::Debug => AnsiColor::Cyan,
            Level::Trace => AnsiColor::BrightBlack,
        };

        cfg_if::cfg_if! {
            if #[cfg(feature = "timestamp")] {
                let _ = print_fmt(color_fmt!(
                    AnsiColor::White,
                    "[{time} {path}:{line}] {args}\n",
                    time = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.6f"),
                    path = path,
                    line = line,
                    args = color_fmt!(color, "{}", record.args()),
                ));
            } else {
                let _ = print_fmt(color_fmt!(
                    AnsiColor::White,
                    "[{path}:{line}] {args}\n",
                    path = path,
                    line = line,
                    args = color_fmt!(color, "{}", record.args()),
                ));
            }
        }
    }

    fn flush(&self) {
        let _ = io::stderr().flush();
    }
}

/// Writes preformatted text to stderr while holding the print lock.
pub fn print_fmt(args: fmt::Arguments) -> fmt::Result {
    static LOCK: spin::Mutex<()> = spin::Mutex::new(());

    let _guard = LOCK.lock();
    SessionLogger.write_fmt(args)
}

/// Installs the logger with the `warn` level.
///
/// Returns `false` when another logger was installed first; the level is
/// left untouched in that case.
pub fn init_logger() -> bool {
    if log::set_logger(&SessionLogger).is_err() {
        return false;
    }
    log::set_max_level(LevelFilter::Warn);
    true
}

/// Sets the level from a name such as `"debug"`; unknown names turn logging off.
pub fn set_log_level(level: &str) {
    let lf = LevelFilter::from_str(level)
        .ok()
        .unwrap_or(LevelFilter::Off);
    log::set_max_level(lf);
}

/// Sets the level from an already parsed filter.
pub fn set_level_filter(level: LevelFilter) {
    log::set_max_level(level);
}
