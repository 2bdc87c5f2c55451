// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

use unitlog::uprintln;
use unitrun::{Session, check_str_eq};

/// Never asserts, so the report warns about it.
pub fn empty_test(_: &mut Session) {}

pub fn string_lengths(s: &mut Session, global: i32) {
    uprintln!("Global num is: {global}");
    check_str_eq!(s, "string!9", "string!");
}
