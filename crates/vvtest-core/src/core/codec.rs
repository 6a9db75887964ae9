// crates/vvtest-core/src/core/codec.rs
// ============================================================================
// Module: vvtest Codec Identifiers
// Description: Codec and test-type enumerations.
// Purpose: Provide canonical short names used for filtering and display.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Codecs are identified by fixed canonical short names (`h264`, `h265`,
//! `av1`, `vp9`). Test types carry the display-name prefix used for
//! user-facing pattern matching.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Codec Type
// ============================================================================

/// Supported video codecs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodecType {
    /// H.264 / AVC.
    H264,
    /// H.265 / HEVC.
    H265,
    /// AOMedia AV1.
    Av1,
    /// Google VP9.
    Vp9,
}

impl CodecType {
    /// Canonical lowercase short name for filtering and display.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::H264 => "h264",
            Self::H265 => "h265",
            Self::Av1 => "av1",
            Self::Vp9 => "vp9",
        }
    }

    /// All codecs, in suite-listing order.
    #[must_use]
    pub const fn all() -> [Self; 4] {
        [Self::H264, Self::H265, Self::Av1, Self::Vp9]
    }

    /// Returns true when `filter` equals this codec's short name,
    /// compared case-insensitively.
    #[must_use]
    pub fn matches_filter(self, filter: &str) -> bool {
        filter.eq_ignore_ascii_case(self.as_str())
    }
}

impl fmt::Display for CodecType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CodecType {
    type Err = UnknownCodecError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .into_iter()
            .find(|codec| codec.matches_filter(value))
            .ok_or_else(|| UnknownCodecError {
                value: value.to_string(),
            })
    }
}

/// Error returned when a codec short name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown codec: {value}")]
pub struct UnknownCodecError {
    /// The rejected codec name.
    pub value: String,
}

// ============================================================================
// SECTION: Test Type
// ============================================================================

/// The two orchestrated test types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestType {
    /// Bitstream decode conformance.
    Decode,
    /// Raw-frame encode conformance.
    Encode,
}

impl TestType {
    /// Lowercase tag used in documents and display names.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Decode => "decode",
            Self::Encode => "encode",
        }
    }

    /// Display-name prefix (`decode_` / `encode_`).
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Decode => "decode_",
            Self::Encode => "encode_",
        }
    }
}

impl fmt::Display for TestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
