// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Verification operations.
//!
//! These are the only place where a check is decided and where the current
//! test record is updated. They never return an error: a failed check is
//! recorded in the [`Session`] and the test keeps running.

use strum::Display;

use crate::{
    format::{Arg, FormatError, render_bounded, render_with_binary},
    location::Location,
    runner::Session,
};

/// Comparison requested from a two-operand verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum AssertOp {
    Equal,
    NotEqual,
}

/// What [`Session::raise`] records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum RaiseKind {
    /// A warning; the test status is left alone.
    Warn,
    /// A failure, exactly like a failed [`Session::verify_condition`].
    Fail,
}

type Renderer = fn(&str, &[Arg<'_>]) -> Result<String, FormatError>;

/// Renders a failure message, falling back to the raw format on error.
fn failure_message(render: Renderer, format: &str, args: &[Arg<'_>]) -> String {
    render(format, args).unwrap_or_else(|err| {
        error!("cannot render message {format:?}: {err}");
        format!("<format error: {err}> {format}")
    })
}

/// Tolerance for `digits` decimal places: 0.1 multiplied by 0.1 `digits - 1` times.
pub fn precision_tolerance(digits: u32) -> f64 {
    let mut tolerance = 0.1;
    for _ in 1..digits {
        tolerance *= 0.1;
    }
    tolerance
}

impl Session {
    /// Passes when `condition` holds; otherwise records `format` rendered
    /// with the standard dialect (bounded length).
    pub fn verify_condition(
        &mut self,
        condition: bool,
        at: Location,
        format: &str,
        args: &[Arg<'_>],
    ) {
        if condition {
            self.assert_success(&at);
            return;
        }
        let message = failure_message(render_bounded, format, args);
        self.assert_failure(&at, message);
    }

    /// Like [`Session::verify_condition`], but the message is rendered with
    /// the binary dialect (`%b`) into an unbounded buffer.
    pub fn verify_binary(&mut self, condition: bool, at: Location, format: &str, args: &[Arg<'_>]) {
        if condition {
            self.assert_success(&at);
            return;
        }
        let message = failure_message(render_with_binary, format, args);
        self.assert_failure(&at, message);
    }

    /// Compares two strings, lengths first.
    ///
    /// For [`AssertOp::Equal`] a length mismatch fails with its own message,
    /// distinct from a same-length content mismatch. For
    /// [`AssertOp::NotEqual`] different lengths pass right away and only a
    /// full match fails.
    pub fn verify_strings(&mut self, a: &str, b: &str, at: Location, op: AssertOp) {
        match op {
            AssertOp::Equal => {
                if a.len() != b.len() {
                    let message = failure_message(
                        render_bounded,
                        "Different string lengths: %zu Does not equal %zu.",
                        &crate::args![a.len(), b.len()],
                    );
                    self.assert_failure(&at, message);
                } else if a.as_bytes() != b.as_bytes() {
                    let message = failure_message(
                        render_bounded,
                        "\"%s\" Does not equal \"%s\".",
                        &crate::args![a, b],
                    );
                    self.assert_failure(&at, message);
                } else {
                    self.assert_success(&at);
                }
            }
            AssertOp::NotEqual => {
                if a.len() == b.len() && a.as_bytes() == b.as_bytes() {
                    let message = failure_message(
                        render_bounded,
                        "\"%s\" Is not different from \"%s\".",
                        &crate::args![a, b],
                    );
                    self.assert_failure(&at, message);
                } else {
                    self.assert_success(&at);
                }
            }
        }
    }

    /// Compares the first `length` bytes of two arrays.
    ///
    /// For [`AssertOp::Equal`] the first differing byte fails the check and
    /// names the index and both values. For [`AssertOp::NotEqual`] the first
    /// differing byte passes it, and identical arrays fail. A `length`
    /// beyond either array is a failure.
    pub fn verify_bytes(&mut self, a: &[u8], b: &[u8], length: usize, at: Location, op: AssertOp) {
        if length > a.len() || length > b.len() {
            let message = failure_message(
                render_bounded,
                "Cannot compare %zu bytes: arrays hold %zu and %zu bytes.",
                &crate::args![length, a.len(), b.len()],
            );
            self.assert_failure(&at, message);
            return;
        }

        let first_difference = a[..length]
            .iter()
            .zip(&b[..length])
            .position(|(x, y)| x != y);

        match (op, first_difference) {
            (AssertOp::Equal, None) | (AssertOp::NotEqual, Some(_)) => self.assert_success(&at),
            (AssertOp::Equal, Some(index)) => {
                let message = failure_message(
                    render_bounded,
                    "Index %zu of byte arrays: %u Does not equal %u.",
                    &crate::args![index, a[index], b[index]],
                );
                self.assert_failure(&at, message);
            }
            (AssertOp::NotEqual, None) => {
                let message = failure_message(
                    render_bounded,
                    "Failed because byte arrays are not different.",
                    &[],
                );
                self.assert_failure(&at, message);
            }
        }
    }

    /// Compares two floats within `digits` decimal places.
    pub fn verify_precision(&mut self, a: f64, b: f64, digits: u32, at: Location, op: AssertOp) {
        let within = (a - b).abs() <= precision_tolerance(digits);

        match op {
            AssertOp::Equal => self.verify_condition(
                within,
                at,
                "%f Does not equal %f within %u places.",
                &crate::args![a, b, digits],
            ),
            AssertOp::NotEqual => self.verify_condition(
                !within,
                at,
                "%f Is not different from %f within %u places.",
                &crate::args![a, b, digits],
            ),
        }
    }

    /// Records a failure or a warning without checking anything.
    pub fn raise(&mut self, kind: RaiseKind, at: Location, format: &str, args: &[Arg<'_>]) {
        let message = failure_message(render_bounded, format, args);
        match kind {
            RaiseKind::Fail => self.assert_failure(&at, message),
            RaiseKind::Warn => self.push_warning(&at, message),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;
    use crate::{
        config::{ColorChoice, Config},
        record::TestStatus,
    };

    const AT: Location = Location::new("assert.rs", "check", 5);
    const CALLER: Location = Location::new("assert.rs", "caller", 1);

    /// Runs `body` as one test and returns the session for inspection.
    fn run(body: impl FnOnce(&mut Session)) -> Session {
        let mut session = Session::with_config(Config::new().with_color(ColorChoice::Never));
        session.run_test(body, CALLER);
        session
    }

    fn messages(session: &Session) -> Vec<&str> {
        session.tests()[0]
            .failures()
            .iter()
            .map(|f| f.message.as_str())
            .collect()
    }

    fn finish(mut session: Session) {
        session.end_to(&mut io::sink()).unwrap();
    }

    #[test]
    fn test_condition() {
        let session = run(|s| {
            s.verify_condition(true, AT, "unused", &[]);
            s.verify_condition(false, AT, "%d Does not equal %d.", &crate::args![5, 7]);
        });
        assert_eq!(messages(&session), ["5 Does not equal 7."]);
        assert_eq!(session.assert_count(), 2);
        assert_eq!(session.failed_assert_count(), 1);
        finish(session);
    }

    #[test]
    fn test_condition_with_bad_format_still_records() {
        let session = run(|s| s.verify_condition(false, AT, "%q", &[]));
        assert_eq!(
            messages(&session),
            ["<format error: unsupported conversion `%q` at byte 1> %q"]
        );
        assert!(session.has_failed());
        finish(session);
    }

    #[test]
    fn test_binary() {
        let session = run(|s| {
            s.verify_binary(
                false,
                AT,
                "%b Does not equal %b. (%d Does not equal %d).",
                &crate::args![300, 5, 300, 5],
            )
        });
        assert_eq!(
            messages(&session),
            ["00000001 00101100 Does not equal 00000101. (300 Does not equal 5)."]
        );
        finish(session);
    }

    #[test]
    fn test_strings_equal() {
        let session = run(|s| {
            s.verify_strings("abc", "abcd", AT, AssertOp::Equal);
            s.verify_strings("abc", "abd", AT, AssertOp::Equal);
            s.verify_strings("abc", "abc", AT, AssertOp::Equal);
        });
        assert_eq!(
            messages(&session),
            [
                "Different string lengths: 3 Does not equal 4.",
                "\"abc\" Does not equal \"abd\".",
            ]
        );
        assert_eq!(session.assert_count(), 3);
        finish(session);
    }

    #[test]
    fn test_strings_not_equal() {
        let session = run(|s| {
            s.verify_strings("abc", "abcd", AT, AssertOp::NotEqual);
            s.verify_strings("abc", "abd", AT, AssertOp::NotEqual);
            s.verify_strings("abc", "abc", AT, AssertOp::NotEqual);
        });
        assert_eq!(
            messages(&session),
            ["\"abc\" Is not different from \"abc\"."]
        );
        finish(session);
    }

    #[test]
    fn test_bytes_equal() {
        let session = run(|s| {
            s.verify_bytes(&[1, 2, 3], &[1, 9, 3], 3, AT, AssertOp::Equal);
            s.verify_bytes(&[1, 2, 3], &[1, 2, 4], 2, AT, AssertOp::Equal);
        });
        assert_eq!(messages(&session), ["Index 1 of byte arrays: 2 Does not equal 9."]);
        assert_eq!(session.assert_count(), 2);
        finish(session);
    }

    #[test]
    fn test_bytes_not_equal() {
        let session = run(|s| {
            s.verify_bytes(&[1, 2, 3], &[1, 2, 3], 3, AT, AssertOp::NotEqual);
            s.verify_bytes(&[1, 2, 3], &[0, 2, 3], 3, AT, AssertOp::NotEqual);
        });
        assert_eq!(
            messages(&session),
            ["Failed because byte arrays are not different."]
        );
        finish(session);
    }

    #[test]
    fn test_bytes_length_out_of_range() {
        let session = run(|s| s.verify_bytes(&[1, 2], &[1, 2, 3], 3, AT, AssertOp::Equal));
        assert_eq!(
            messages(&session),
            ["Cannot compare 3 bytes: arrays hold 2 and 3 bytes."]
        );
        finish(session);
    }

    #[test]
    fn test_precision_tolerance() {
        assert_eq!(precision_tolerance(0), 0.1);
        assert_eq!(precision_tolerance(1), 0.1);
        assert!((precision_tolerance(3) - 0.001).abs() < 1e-12);
    }

    #[test]
    fn test_precision() {
        let session = run(|s| {
            s.verify_precision(2.352, 2.356, 3, AT, AssertOp::Equal);
            s.verify_precision(2.3521, 2.3522, 3, AT, AssertOp::Equal);
            s.verify_precision(2.352, 2.356, 3, AT, AssertOp::NotEqual);
            s.verify_precision(2.3521, 2.3522, 3, AT, AssertOp::NotEqual);
        });
        assert_eq!(
            messages(&session),
            [
                "2.352000 Does not equal 2.356000 within 3 places.",
                "2.352100 Is not different from 2.352200 within 3 places.",
            ]
        );
        assert_eq!(session.assert_count(), 4);
        finish(session);
    }

    #[test]
    fn test_raise() {
        let session = run(|s| {
            s.raise(RaiseKind::Warn, AT, "Warning raised.", &[]);
            s.raise(RaiseKind::Fail, AT, "Fail %s.", &crate::args!["raise test"]);
        });
        assert_eq!(session.warnings().len(), 1);
        assert_eq!(session.warnings()[0].message, "Warning raised.");
        assert_eq!(messages(&session), ["Fail raise test."]);
        assert_eq!(session.tests()[0].status(), TestStatus::Failure);
        finish(session);
    }

    #[test]
    fn test_warning_does_not_touch_status() {
        let session = run(|s| s.raise(RaiseKind::Warn, AT, "just a note", &[]));
        assert_eq!(session.tests()[0].status(), TestStatus::Unknown);
        assert_eq!(session.assert_count(), 0);
        assert!(!session.has_failed());
        finish(session);
    }
}
