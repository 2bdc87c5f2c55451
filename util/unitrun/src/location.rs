// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Source locations of test invocations and assertions.

use core::fmt;

/// A `{file, function, line}` triple captured at a call site.
///
/// Use [`location!`](crate::location) to capture one; the macro layer does
/// this for every check it expands to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Location {
    pub file: &'static str,
    pub function: &'static str,
    pub line: u32,
}

impl Location {
    pub const fn new(file: &'static str, function: &'static str, line: u32) -> Self {
        Self {
            file,
            function,
            line,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}():{}", self.file, self.function, self.line)
    }
}

/// Reduces the type name of a marker item nested in a function to the
/// function's own name.
#[doc(hidden)]
pub fn __function_name(marker: &'static str) -> &'static str {
    let mut path = marker.strip_suffix("::__here").unwrap_or(marker);
    while let Some(outer) = path.strip_suffix("::{{closure}}") {
        path = outer;
    }
    path.rsplit("::").next().unwrap_or(path)
}

/// Captures the [`Location`] of the invocation site.
#[macro_export]
macro_rules! location {
    () => {{
        fn __here() {}
        fn __type_name_of<T>(_: T) -> &'static str {
            ::core::any::type_name::<T>()
        }
        $crate::Location::new(
            file!(),
            $crate::location::__function_name(__type_name_of(__here)),
            line!(),
        )
    }};
}
