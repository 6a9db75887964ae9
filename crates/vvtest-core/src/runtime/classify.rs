// crates/vvtest-core/src/runtime/classify.rs
// ============================================================================
// Module: vvtest Exit-Status Classification
// Description: Maps raw process exit codes to semantic test statuses.
// Purpose: Provide a total, platform-aware classification function.
// Dependencies: crate::core::status
// ============================================================================

//! ## Overview
//! Process-invocation layers surface the same termination event in different
//! numeric shapes: POSIX kill-by-signal arrives negated, some wrappers
//! re-expose the bare signal number, and Windows reports structured-exception
//! codes that may appear unsigned or sign-extended. [`classify_exit_status`]
//! folds all of these into the four-valued [`VideoTestStatus`] space. It is a
//! total function of its arguments and reads no ambient state.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::status::VideoTestStatus;

// ============================================================================
// SECTION: Exit Code Vocabulary
// ============================================================================

/// Conventional "service unavailable" sysexit; the contract an executable
/// uses to signal the capability is not implemented on this device.
pub const EXIT_NOT_SUPPORTED: i64 = 69;

/// SIGABRT signal number.
const SIG_ABORT: u64 = 6;

/// SIGSEGV signal number.
const SIG_SEGV: u64 = 11;

/// Windows access violation (STATUS_ACCESS_VIOLATION), unsigned form.
const SEH_ACCESS_VIOLATION: u64 = 0xC000_0005;

/// Windows access violation, sign-extended 32-bit form.
const SEH_ACCESS_VIOLATION_SIGNED: i64 = -1_073_741_819;

/// Other return codes conventionally produced by aborted or faulted
/// processes on the structured-exception platform.
const SEH_COMMON_ABNORMAL: [i64; 4] = [-1, 1, 3, 22];

// ============================================================================
// SECTION: Platform Context
// ============================================================================

/// Exit-code convention of the platform the executable ran on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlatformContext {
    /// POSIX signal conventions (Linux, macOS, BSDs).
    Posix,
    /// Windows structured-exception-handling conventions.
    StructuredException,
}

impl PlatformContext {
    /// Context of the process currently running.
    #[must_use]
    pub const fn current() -> Self {
        if cfg!(windows) {
            Self::StructuredException
        } else {
            Self::Posix
        }
    }

    /// Returns true on the structured-exception platform.
    #[must_use]
    pub const fn is_structured_exception(self) -> bool {
        matches!(self, Self::StructuredException)
    }
}

// ============================================================================
// SECTION: Classification
// ============================================================================

/// Classifies a raw process exit code into a [`VideoTestStatus`].
///
/// Rules, in order: `0` is SUCCESS; [`EXIT_NOT_SUPPORTED`] is NOT_SUPPORTED;
/// an absolute value of SIGABRT or SIGSEGV is CRASH on every platform (both
/// the negated POSIX form and the bare signal number are accepted); on the
/// structured-exception platform the well-known access-violation and
/// abort-path codes are CRASH; every other non-zero code is ERROR.
#[must_use]
pub const fn classify_exit_status(raw_code: i64, platform: PlatformContext) -> VideoTestStatus {
    if raw_code == 0 {
        return VideoTestStatus::Success;
    }
    if raw_code == EXIT_NOT_SUPPORTED {
        return VideoTestStatus::NotSupported;
    }
    // unsigned_abs is total; a plain abs would fault on i64::MIN.
    let abs_code = raw_code.unsigned_abs();
    if abs_code == SIG_ABORT || abs_code == SIG_SEGV {
        return VideoTestStatus::Crash;
    }
    if platform.is_structured_exception() {
        if abs_code == SEH_ACCESS_VIOLATION || raw_code == SEH_ACCESS_VIOLATION_SIGNED {
            return VideoTestStatus::Crash;
        }
        let mut i = 0;
        while i < SEH_COMMON_ABNORMAL.len() {
            if raw_code == SEH_COMMON_ABNORMAL[i] {
                return VideoTestStatus::Crash;
            }
            i += 1;
        }
    }
    VideoTestStatus::Error
}
