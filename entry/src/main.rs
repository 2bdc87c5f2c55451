// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Runs a fixed set of passing, failing and empty tests through one session
//! and exits with the session status. Several tests fail on purpose.

use std::{cell::Cell, process::ExitCode, rc::Rc};

use log::error;
use unitlog::uprintln;
use unitrun::{
    Config, Session, check_binary_eq, check_bytes_eq, check_custom, check_eq, check_hex_eq,
    check_not_within, check_str_eq, check_true, check_within, raise_fail, raise_warn, run_test,
};

mod cases;

fn main() -> ExitCode {
    unitlog::init_logger();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!("{err}");
            return ExitCode::FAILURE;
        }
    };
    unitlog::set_level_filter(config.log_level);

    let mut session = Session::with_config(config);

    let global = Rc::new(Cell::new(0));
    let (up, down) = (global.clone(), global.clone());
    session.set_fixture(move || up.set(up.get() + 2), move || down.set(down.get() - 1));

    uprintln!(
        "Status code: {} (expecting non-failure).",
        session.status_code()
    );

    let seen = global.clone();
    session.run_test(
        move |s| cases::string_lengths(s, seen.get()),
        unitrun::location!(),
    );
    run_test!(session, failed_test);
    run_test!(session, raise_test);
    run_test!(session, successful_test);
    run_test!(session, cases::empty_test);
    run_test!(session, bytes_array_test);

    session.clear_fixture();
    run_test!(session, string_test);
    run_test!(session, cases::empty_test);

    uprintln!(
        "Status code: {} (expecting failure).",
        session.status_code()
    );

    if let Err(err) = session.end() {
        error!("cannot print the report: {err}");
    }
    session.exit_code()
}

/// Collects one failure of each kind.
fn failed_test(s: &mut Session) {
    check_eq!(s, true, false);
    let five: i8 = 5;
    check_eq!(s, five, 7);

    let bin1: u64 = 112;
    let bin2: u64 = 1_546_744_073_709_551_615;
    check_binary_eq!(s, bin1, bin2);

    check_within!(s, 2.352, 2.356, 3);
    check_not_within!(s, 2.352, 2.356, 3);
    check_hex_eq!(s, 0xA0, 0x9);
    check_eq!(s, 5i16, 6i16);
    check_custom!(s, 1 == 2, "Failed custom: %d == %d.", 1, 2);
}

fn successful_test(s: &mut Session) {
    check_true!(s, true);
    let five: i8 = 5;
    check_eq!(s, five, 5);
    check_hex_eq!(s, 0x9, 0x009);
    check_eq!(s, 2, 2);
}

fn bytes_array_test(s: &mut Session) {
    let first: Vec<u8> = (0..13).map(|i| i * 20).collect();
    let mut second = first.clone();
    second[8] = 9;
    check_bytes_eq!(s, first, second, 12);
}

fn raise_test(s: &mut Session) {
    raise_fail!(s, "Fail raise test.");
    raise_fail!(s);
    raise_warn!(s, "Raise warn test.");
    raise_warn!(s);
}

fn string_test(s: &mut Session) {
    check_str_eq!(s, "string1", "string!");
}
