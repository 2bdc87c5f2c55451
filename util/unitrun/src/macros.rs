// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Assertion macros.
//!
//! Each macro captures its call site with [`location!`](crate::location)
//! and forwards to one verification operation of [`Session`](crate::Session).
//! The first argument is always the session.
//!
//! ```
//! use unitrun::{Session, check_eq, check_str_eq, run_test};
//!
//! fn arithmetic(s: &mut Session) {
//!     check_eq!(s, 2 + 2, 4);
//!     check_str_eq!(s, "left", "left");
//! }
//!
//! let mut session = Session::init();
//! run_test!(session, arithmetic);
//! assert!(!session.has_failed());
//! # session.end_to(&mut std::io::sink()).unwrap();
//! ```

use crate::format::Arg;

/// Format of a relation message, e.g. `"%d Does not equal %d."`.
#[doc(hidden)]
pub fn __relation_format(relation: &str, args: &[Arg<'_>]) -> String {
    format!(
        "{} {relation} {}.",
        args[0].conversion(),
        args[1].conversion()
    )
}

/// Format of a relation shown in another radix, followed by the plain values,
/// e.g. `"0x%X Does not equal 0x%X. (%d Does not equal %d)."`.
#[doc(hidden)]
pub fn __radix_format(radix: &str, relation: &str, args: &[Arg<'_>]) -> String {
    format!(
        "{radix} {relation} {radix}. ({} {relation} {}).",
        args[0].conversion(),
        args[1].conversion()
    )
}

/// Runs a test function in the session, recording the call site.
#[macro_export]
macro_rules! run_test {
    ($session:expr, $test:expr $(,)?) => {
        $session.run_test($test, $crate::location!())
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __check_relation {
    ($session:expr, $left:expr, $right:expr, $op:tt, $relation:literal) => {{
        let (left, right) = ($left, $right);
        let condition = left $op right;
        let args = $crate::args![left, right];
        let format = $crate::macros::__relation_format($relation, &args);
        $session.verify_condition(condition, $crate::location!(), &format, &args)
    }};
}

/// Checks a condition with the generic `Condition failed.` message.
#[macro_export]
macro_rules! check {
    ($session:expr, $condition:expr $(,)?) => {
        $session.verify_condition($condition, $crate::location!(), "Condition failed.", &[])
    };
}

/// Checks a condition with a custom printf-style message.
#[macro_export]
macro_rules! check_custom {
    ($session:expr, $condition:expr, $format:expr $(, $arg:expr)* $(,)?) => {
        $session.verify_condition(
            $condition,
            $crate::location!(),
            $format,
            &$crate::args![$($arg),*],
        )
    };
}

#[macro_export]
macro_rules! check_true {
    ($session:expr, $value:expr $(,)?) => {
        $session.verify_condition(
            $value,
            $crate::location!(),
            "false Does not equal true.",
            &[],
        )
    };
}

#[macro_export]
macro_rules! check_false {
    ($session:expr, $value:expr $(,)?) => {
        $session.verify_condition(
            !$value,
            $crate::location!(),
            "true Does not equal false.",
            &[],
        )
    };
}

#[macro_export]
macro_rules! check_eq {
    ($session:expr, $left:expr, $right:expr $(,)?) => {
        $crate::__check_relation!($session, $left, $right, ==, "Does not equal")
    };
}

#[macro_export]
macro_rules! check_ne {
    ($session:expr, $left:expr, $right:expr $(,)?) => {
        $crate::__check_relation!($session, $left, $right, !=, "Is not different from")
    };
}

#[macro_export]
macro_rules! check_gt {
    ($session:expr, $left:expr, $right:expr $(,)?) => {
        $crate::__check_relation!($session, $left, $right, >, "Is not greater than")
    };
}

#[macro_export]
macro_rules! check_ge {
    ($session:expr, $left:expr, $right:expr $(,)?) => {
        $crate::__check_relation!($session, $left, $right, >=, "Is not greater or equal to")
    };
}

#[macro_export]
macro_rules! check_lt {
    ($session:expr, $left:expr, $right:expr $(,)?) => {
        $crate::__check_relation!($session, $left, $right, <, "Is not less than")
    };
}

#[macro_export]
macro_rules! check_le {
    ($session:expr, $left:expr, $right:expr $(,)?) => {
        $crate::__check_relation!($session, $left, $right, <=, "Is not less or equal to")
    };
}

/// Checks integer equality, reporting both values in hexadecimal.
#[macro_export]
macro_rules! check_hex_eq {
    ($session:expr, $left:expr, $right:expr $(,)?) => {{
        let (left, right) = ($left, $right);
        let args = $crate::args![left, right, left, right];
        let format = $crate::macros::__radix_format("0x%X", "Does not equal", &args);
        $session.verify_condition(left == right, $crate::location!(), &format, &args)
    }};
}

/// Checks integer equality, reporting both values as grouped binary.
#[macro_export]
macro_rules! check_binary_eq {
    ($session:expr, $left:expr, $right:expr $(,)?) => {{
        let (left, right) = ($left, $right);
        let args = $crate::args![left, right, left, right];
        let format = $crate::macros::__radix_format("%b", "Does not equal", &args);
        $session.verify_binary(left == right, $crate::location!(), &format, &args)
    }};
}

#[macro_export]
macro_rules! check_str_eq {
    ($session:expr, $left:expr, $right:expr $(,)?) => {
        $session.verify_strings(
            ::core::convert::AsRef::<str>::as_ref(&$left),
            ::core::convert::AsRef::<str>::as_ref(&$right),
            $crate::location!(),
            $crate::AssertOp::Equal,
        )
    };
}

#[macro_export]
macro_rules! check_str_ne {
    ($session:expr, $left:expr, $right:expr $(,)?) => {
        $session.verify_strings(
            ::core::convert::AsRef::<str>::as_ref(&$left),
            ::core::convert::AsRef::<str>::as_ref(&$right),
            $crate::location!(),
            $crate::AssertOp::NotEqual,
        )
    };
}

#[macro_export]
macro_rules! check_bytes_eq {
    ($session:expr, $left:expr, $right:expr, $length:expr $(,)?) => {
        $session.verify_bytes(
            ::core::convert::AsRef::<[u8]>::as_ref(&$left),
            ::core::convert::AsRef::<[u8]>::as_ref(&$right),
            $length,
            $crate::location!(),
            $crate::AssertOp::Equal,
        )
    };
}

#[macro_export]
macro_rules! check_bytes_ne {
    ($session:expr, $left:expr, $right:expr, $length:expr $(,)?) => {
        $session.verify_bytes(
            ::core::convert::AsRef::<[u8]>::as_ref(&$left),
            ::core::convert::AsRef::<[u8]>::as_ref(&$right),
            $length,
            $crate::location!(),
            $crate::AssertOp::NotEqual,
        )
    };
}

/// Checks that two floats agree within a number of decimal places.
#[macro_export]
macro_rules! check_within {
    ($session:expr, $left:expr, $right:expr, $digits:expr $(,)?) => {
        $session.verify_precision(
            ::core::convert::Into::<f64>::into($left),
            ::core::convert::Into::<f64>::into($right),
            $digits,
            $crate::location!(),
            $crate::AssertOp::Equal,
        )
    };
}

#[macro_export]
macro_rules! check_not_within {
    ($session:expr, $left:expr, $right:expr, $digits:expr $(,)?) => {
        $session.verify_precision(
            ::core::convert::Into::<f64>::into($left),
            ::core::convert::Into::<f64>::into($right),
            $digits,
            $crate::location!(),
            $crate::AssertOp::NotEqual,
        )
    };
}

/// Records a failure unconditionally.
#[macro_export]
macro_rules! raise_fail {
    ($session:expr $(,)?) => {
        $session.raise($crate::RaiseKind::Fail, $crate::location!(), "Failure raised.", &[])
    };
    ($session:expr, $format:expr $(, $arg:expr)* $(,)?) => {
        $session.raise(
            $crate::RaiseKind::Fail,
            $crate::location!(),
            $format,
            &$crate::args![$($arg),*],
        )
    };
}

/// Records a warning unconditionally.
#[macro_export]
macro_rules! raise_warn {
    ($session:expr $(,)?) => {
        $session.raise($crate::RaiseKind::Warn, $crate::location!(), "Warning raised.", &[])
    };
    ($session:expr, $format:expr $(, $arg:expr)* $(,)?) => {
        $session.raise(
            $crate::RaiseKind::Warn,
            $crate::location!(),
            $format,
            &$crate::args![$($arg),*],
        )
    };
}
