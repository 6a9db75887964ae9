// crates/vvtest-runner/src/encode.rs
// ============================================================================
// Module: vvtest Encode Harness
// Description: Drives the encoder executable over raw-input samples.
// Purpose: Implement the harness contract for encode runs.
// Dependencies: vvtest-core, crate::command, crate::harness
// ============================================================================

//! ## Overview
//! An encode test feeds one raw YUV or Y4M file to the encoder and writes
//! the bitstream into the results directory. On top of exit-code
//! classification the captured stderr is scanned for warning-shaped text,
//! which is recorded on the result without failing it. The produced
//! artifact is removed after a passing test unless the run keeps files.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::io::Write;

use vvtest_core::FilterOptions;
use vvtest_core::SampleConfig;
use vvtest_core::SkipRule;
use vvtest_core::SuiteFilter;
use vvtest_core::SuiteFormat;
use vvtest_core::TestResult;
use vvtest_core::TestType;

use crate::command::build_encode_command;
use crate::command::encode_output_filename;
use crate::harness::DownloadPolicy;
use crate::harness::Harness;
use crate::harness::HarnessConfig;
use crate::harness::SuiteSelection;
use crate::harness::build_selection;
use crate::harness::check_sample_resources;
use crate::harness::execute_classified;

// ============================================================================
// SECTION: Warning Detection
// ============================================================================

/// Substrings whose bare presence in stderr counts as a warning.
const WARNING_SUBSTRINGS: [&str; 3] = ["deprecated", "disabling", "fallback"];

/// Keywords that count as warnings when followed by a colon, with any
/// amount of intervening blank space.
const WARNING_KEYWORDS: [&str; 3] = ["warning", "warn", "caution"];

/// True when the keyword occurs followed (after optional spaces or tabs)
/// by a colon. `text` must already be lowercased.
fn keyword_then_colon(text: &str, keyword: &str) -> bool {
    let mut rest = text;
    while let Some(at) = rest.find(keyword) {
        let tail = &rest[at + keyword.len()..];
        if tail.trim_start_matches([' ', '\t']).starts_with(':') {
            return true;
        }
        rest = &rest[at + keyword.len()..];
    }
    false
}

/// True when `first` occurs followed by whitespace and then `second`.
/// `text` must already be lowercased.
fn words_with_gap(text: &str, first: &str, second: &str) -> bool {
    let mut rest = text;
    while let Some(at) = rest.find(first) {
        let tail = &rest[at + first.len()..];
        let trimmed = tail.trim_start();
        if trimmed.len() < tail.len() && trimmed.starts_with(second) {
            return true;
        }
        rest = &rest[at + first.len()..];
    }
    false
}

/// Scans encoder stderr for warning-shaped diagnostics.
#[must_use]
pub fn scan_encoder_warnings(stderr: &str) -> bool {
    let text = stderr.to_ascii_lowercase();
    WARNING_KEYWORDS
        .iter()
        .any(|keyword| keyword_then_colon(&text, keyword))
        || WARNING_SUBSTRINGS
            .iter()
            .any(|needle| text.contains(needle))
        || words_with_gap(&text, "not", "supported")
}

// ============================================================================
// SECTION: Encode Harness
// ============================================================================

/// Harness implementation for the encoder executable.
#[derive(Debug)]
pub struct EncodeHarness {
    config: HarnessConfig,
    samples: Vec<SampleConfig>,
    filter: SuiteFilter,
}

impl EncodeHarness {
    /// Creates an encode harness over a loaded sample set and skip rules.
    #[must_use]
    pub fn new(
        config: HarnessConfig,
        samples: Vec<SampleConfig>,
        format: SuiteFormat,
        rules: Vec<SkipRule>,
    ) -> Self {
        Self {
            config,
            samples,
            filter: SuiteFilter::new(format, TestType::Encode, rules),
        }
    }

    /// All loaded samples, before any selection.
    #[must_use]
    pub fn samples(&self) -> &[SampleConfig] {
        &self.samples
    }
}

impl Harness for EncodeHarness {
    fn check_resources(
        &mut self,
        samples: &[SampleConfig],
        policy: DownloadPolicy,
        out: &mut dyn Write,
    ) -> bool {
        check_sample_resources(samples, &self.config, policy, out)
    }

    fn create_test_suite(&mut self, options: &FilterOptions) -> SuiteSelection {
        build_selection(&mut self.filter, &self.samples, options, TestType::Encode)
    }

    fn run_single_test(&mut self, sample: &SampleConfig, out: &mut dyn Write) -> TestResult {
        let Some(source) = sample.source.as_ref().filter(|s| !s.filepath.is_empty()) else {
            return TestResult::error(sample.clone(), "Input file not found", String::new());
        };
        if let Err(err) = fs::create_dir_all(&self.config.results_dir) {
            return TestResult::error(
                sample.clone(),
                format!("Cannot create results directory: {err}"),
                String::new(),
            );
        }

        let input = self.config.resources_dir.join(&source.filepath);
        let output = self.config.results_dir.join(encode_output_filename(sample));
        let command = build_encode_command(
            &self.config.executable,
            &input,
            sample,
            &output,
            self.config.device_id,
        );

        let mut result = execute_classified(&command, sample, &self.config, out);
        result.warning_found = scan_encoder_warnings(&result.stderr);

        if output.exists() && result.success() && !self.config.keep_files {
            let _ = fs::remove_file(&output);
        }
        result
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::scan_encoder_warnings;

    #[test]
    fn warning_keyword_with_colon() {
        assert!(scan_encoder_warnings("WARNING: rate control clamped"));
        assert!(scan_encoder_warnings("warn : legacy path"));
        assert!(scan_encoder_warnings("Caution\t: unusual GOP"));
    }

    #[test]
    fn keyword_without_colon_is_not_a_warning() {
        assert!(!scan_encoder_warnings("forewarned is forearmed"));
        assert!(!scan_encoder_warnings("warning lights are part of the scene"));
    }

    #[test]
    fn bare_substrings_flag() {
        assert!(scan_encoder_warnings("option --foo is DEPRECATED"));
        assert!(scan_encoder_warnings("disabling B-frames"));
        assert!(scan_encoder_warnings("software fallback engaged"));
    }

    #[test]
    fn gap_phrase_requires_whitespace() {
        assert!(scan_encoder_warnings("10-bit NOT  supported on this device"));
        assert!(scan_encoder_warnings("feature not\nsupported"));
        assert!(!scan_encoder_warnings("notsupported"));
    }

    #[test]
    fn clean_output_has_no_warnings() {
        assert!(!scan_encoder_warnings("encoded 300 frames in 1.2s"));
        assert!(!scan_encoder_warnings(""));
    }
}
