// crates/vvtest-core/src/core/sample.rs
// ============================================================================
// Module: vvtest Sample Model
// Description: Test sample configuration and per-test result records.
// Purpose: Provide the selectable unit of work and its execution outcome.
// Dependencies: serde, crate::core::{codec, status}
// ============================================================================

//! ## Overview
//! A [`SampleConfig`] is one selectable test case: a stable base name, a
//! codec, and (optionally) the remote source asset it decodes or encodes.
//! Samples are constructed by suite loading and never mutated afterwards.
//! A [`TestResult`] pairs the sample with the classified outcome of one
//! execution.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::codec::CodecType;
use crate::core::codec::TestType;
use crate::core::status::VideoTestStatus;

// ============================================================================
// SECTION: Sample Source
// ============================================================================

/// Remote source asset backing a sample.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleSource {
    /// Download URL; empty when the asset is provisioned out of band.
    #[serde(default)]
    pub url: String,
    /// Path of the asset relative to the resources root.
    pub filepath: String,
    /// Expected checksum; an `md5:` prefix selects MD5, otherwise SHA-256.
    #[serde(default)]
    pub checksum: String,
}

// ============================================================================
// SECTION: Encode Parameters
// ============================================================================

/// Encoder-specific input parameters for a sample.
///
/// Y4M inputs carry their own geometry in the stream header; raw YUV inputs
/// need explicit dimensions on the encoder command line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodeParams {
    /// Codec profile to request, when the default is not wanted.
    #[serde(default)]
    pub profile: Option<String>,
    /// Input width in pixels; ignored for Y4M inputs.
    #[serde(default)]
    pub width: u32,
    /// Input height in pixels; ignored for Y4M inputs.
    #[serde(default)]
    pub height: u32,
    /// Whether the input is Y4M rather than raw YUV.
    #[serde(default)]
    pub y4m: bool,
}

// ============================================================================
// SECTION: Sample Config
// ============================================================================

/// One selectable test case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleConfig {
    /// Stable base identifier without the test-type prefix.
    pub name: String,
    /// Codec exercised by this sample.
    pub codec: CodecType,
    /// Human-readable description, advisory only.
    #[serde(default)]
    pub description: String,
    /// Whether the sample is enabled by default; disabled samples behave
    /// like rule-skipped ones in the selection filter.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Optional per-test timeout override in seconds.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// Extra arguments appended to the executable command line.
    #[serde(default)]
    pub extra_args: Vec<String>,
    /// Remote source asset, when the sample needs one on disk.
    #[serde(default)]
    pub source: Option<SampleSource>,
    /// Encoder input parameters; `None` for decode samples.
    #[serde(default)]
    pub encode: Option<EncodeParams>,
}

/// Serde default for [`SampleConfig::enabled`].
const fn default_enabled() -> bool {
    true
}

impl SampleConfig {
    /// Creates a minimal sample with only a name and codec.
    #[must_use]
    pub fn new(name: impl Into<String>, codec: CodecType) -> Self {
        Self {
            name: name.into(),
            codec,
            description: String::new(),
            enabled: true,
            timeout_secs: None,
            extra_args: Vec::new(),
            source: None,
            encode: None,
        }
    }

    /// User-facing identifier, prefixed by test type.
    #[must_use]
    pub fn display_name(&self, test_type: TestType) -> String {
        format!("{}{}", test_type.prefix(), self.name)
    }
}

// ============================================================================
// SECTION: Test Result
// ============================================================================

/// Result of one test execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestResult {
    /// The sample that was executed.
    pub sample: SampleConfig,
    /// Raw process return code as surfaced by the invocation layer.
    pub returncode: i64,
    /// Terminal classification; assigned exactly once.
    pub status: VideoTestStatus,
    /// Captured standard output.
    #[serde(default)]
    pub stdout: String,
    /// Captured standard error.
    #[serde(default)]
    pub stderr: String,
    /// Wall-clock execution time in milliseconds.
    #[serde(default)]
    pub execution_time_ms: u64,
    /// Optional error message describing a failure.
    #[serde(default)]
    pub error_message: String,
    /// The command line used to invoke the executable.
    #[serde(default)]
    pub command_line: String,
    /// True when diagnostic output contained warning-shaped text even
    /// though the run otherwise completed.
    #[serde(default)]
    pub warning_found: bool,
}

impl TestResult {
    /// Returns true when the test passed.
    #[must_use]
    pub fn success(&self) -> bool {
        self.status == VideoTestStatus::Success
    }

    /// Creates an ERROR result for a failure that happened before or outside
    /// executable invocation (spawn failure, timeout, missing binary).
    #[must_use]
    pub fn error(sample: SampleConfig, message: impl Into<String>, command_line: String) -> Self {
        Self {
            sample,
            returncode: -1,
            status: VideoTestStatus::Error,
            stdout: String::new(),
            stderr: String::new(),
            execution_time_ms: 0,
            error_message: message.into(),
            command_line,
            warning_found: false,
        }
    }
}
