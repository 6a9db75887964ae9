// crates/vvtest-core/tests/exit_status.rs
// ============================================================================
// Module: Exit-Status Classifier Tests
// Description: Validate exit-code classification across platform conventions.
// Purpose: Ensure the classifier is total and platform gating is explicit.
// Dependencies: vvtest-core, proptest
// ============================================================================

//! Exit-status classification tests, including property-based totality.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use proptest::prelude::*;
use vvtest_core::PlatformContext;
use vvtest_core::VideoTestStatus;
use vvtest_core::classify_exit_status;

const BOTH: [PlatformContext; 2] = [PlatformContext::Posix, PlatformContext::StructuredException];

#[test]
fn zero_is_success_on_every_platform() {
    for platform in BOTH {
        assert_eq!(classify_exit_status(0, platform), VideoTestStatus::Success);
    }
}

#[test]
fn sysexit_69_is_not_supported_on_every_platform() {
    for platform in BOTH {
        assert_eq!(
            classify_exit_status(69, platform),
            VideoTestStatus::NotSupported
        );
    }
}

#[test]
fn abort_and_segfault_are_crashes_in_both_numeric_shapes() {
    for platform in BOTH {
        for code in [6, -6, 11, -11] {
            assert_eq!(
                classify_exit_status(code, platform),
                VideoTestStatus::Crash,
                "code {code} on {platform:?}"
            );
        }
    }
}

#[test]
fn seh_magic_codes_crash_only_on_the_seh_platform() {
    let seh = PlatformContext::StructuredException;
    let posix = PlatformContext::Posix;

    // Access violation, unsigned and sign-extended forms.
    assert_eq!(classify_exit_status(0xC000_0005, seh), VideoTestStatus::Crash);
    assert_eq!(
        classify_exit_status(-1_073_741_819, seh),
        VideoTestStatus::Crash
    );
    assert_eq!(
        classify_exit_status(0xC000_0005, posix),
        VideoTestStatus::Error
    );
    assert_eq!(
        classify_exit_status(-1_073_741_819, posix),
        VideoTestStatus::Error
    );

    // Conventional abnormal-exit codes are crashes only under SEH.
    for code in [-1, 1, 3, 22] {
        assert_eq!(classify_exit_status(code, seh), VideoTestStatus::Crash);
        assert_eq!(classify_exit_status(code, posix), VideoTestStatus::Error);
    }
}

#[test]
fn ordinary_failures_are_errors() {
    assert_eq!(
        classify_exit_status(1, PlatformContext::Posix),
        VideoTestStatus::Error
    );
    assert_eq!(
        classify_exit_status(2, PlatformContext::Posix),
        VideoTestStatus::Error
    );
    assert_eq!(
        classify_exit_status(127, PlatformContext::StructuredException),
        VideoTestStatus::Error
    );
}

proptest! {
    // Totality: every integer input maps to exactly one defined status.
    #[test]
    fn every_code_classifies(code in any::<i64>()) {
        for platform in BOTH {
            let status = classify_exit_status(code, platform);
            prop_assert!(matches!(
                status,
                VideoTestStatus::Success
                    | VideoTestStatus::NotSupported
                    | VideoTestStatus::Error
                    | VideoTestStatus::Crash
            ));
        }
    }

    // A nonzero code other than the not-supported sysexit never reports
    // success, on either platform.
    #[test]
    fn nonzero_codes_never_succeed(code in any::<i64>().prop_filter("nonzero", |c| *c != 0)) {
        for platform in BOTH {
            prop_assert_ne!(classify_exit_status(code, platform), VideoTestStatus::Success);
        }
    }

    // Platform context only ever widens ERROR into CRASH; it never
    // changes SUCCESS or NOT_SUPPORTED outcomes.
    #[test]
    fn seh_only_promotes_errors_to_crashes(code in any::<i64>()) {
        let posix = classify_exit_status(code, PlatformContext::Posix);
        let seh = classify_exit_status(code, PlatformContext::StructuredException);
        if posix == seh {
            return Ok(());
        }
        prop_assert_eq!(posix, VideoTestStatus::Error);
        prop_assert_eq!(seh, VideoTestStatus::Crash);
    }
}
