// crates/vvtest-core/src/core/status.rs
// ============================================================================
// Module: vvtest Test Status
// Description: Terminal classification of one executed test case.
// Purpose: Provide the four-valued outcome space shared across the harness.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Every executed test case ends in exactly one [`VideoTestStatus`]. The
//! status is assigned once by the exit-status classifier and never re-derived.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Video Test Status
// ============================================================================

/// Terminal outcome of one executed test case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoTestStatus {
    /// The executable exited cleanly.
    Success,
    /// The executable signalled the capability is unavailable (sysexit 69).
    NotSupported,
    /// The executable failed with an ordinary non-zero exit.
    Error,
    /// The executable terminated abnormally (signal or fault).
    Crash,
}

impl VideoTestStatus {
    /// Wire string used in exchange with collaborators and JSON export.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::NotSupported => "not_supported",
            Self::Error => "error",
            Self::Crash => "crash",
        }
    }

    /// Short uppercase label for human-readable result lines.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Success => "PASS",
            Self::NotSupported => "NOT SUPPORTED",
            Self::Error => "FAIL",
            Self::Crash => "CRASH",
        }
    }

    /// Returns true for outcomes that should fail the overall run.
    #[must_use]
    pub const fn is_failure(self) -> bool {
        matches!(self, Self::Error | Self::Crash)
    }
}

impl fmt::Display for VideoTestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
