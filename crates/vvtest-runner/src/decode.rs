// crates/vvtest-runner/src/decode.rs
// ============================================================================
// Module: vvtest Decode Harness
// Description: Drives the decoder executable over bitstream samples.
// Purpose: Implement the harness contract for decode runs.
// Dependencies: vvtest-core, crate::command, crate::harness
// ============================================================================

//! ## Overview
//! A decode test feeds one bitstream file to the decoder with presentation
//! suppressed and classifies the exit code. Inputs live below the resources
//! root at the relative path their source declares.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;

use vvtest_core::FilterOptions;
use vvtest_core::SampleConfig;
use vvtest_core::SkipRule;
use vvtest_core::SuiteFilter;
use vvtest_core::SuiteFormat;
use vvtest_core::TestResult;
use vvtest_core::TestType;

use crate::command::build_decode_command;
use crate::harness::DownloadPolicy;
use crate::harness::Harness;
use crate::harness::HarnessConfig;
use crate::harness::SuiteSelection;
use crate::harness::build_selection;
use crate::harness::check_sample_resources;
use crate::harness::execute_classified;

// ============================================================================
// SECTION: Decode Harness
// ============================================================================

/// Harness implementation for the decoder executable.
#[derive(Debug)]
pub struct DecodeHarness {
    config: HarnessConfig,
    samples: Vec<SampleConfig>,
    filter: SuiteFilter,
}

impl DecodeHarness {
    /// Creates a decode harness over a loaded sample set and skip rules.
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
            filter: SuiteFilter::new(format, TestType::Decode, rules),
        }
    }

    /// All loaded samples, before any selection.
    #[must_use]
    pub fn samples(&self) -> &[SampleConfig] {
        &self.samples
    }
}

impl Harness for DecodeHarness {
    fn check_resources(
        &mut self,
        samples: &[SampleConfig],
        policy: DownloadPolicy,
        out: &mut dyn Write,
    ) -> bool {
        check_sample_resources(samples, &self.config, policy, out)
    }

    fn create_test_suite(&mut self, options: &FilterOptions) -> SuiteSelection {
        build_selection(&mut self.filter, &self.samples, options, TestType::Decode)
    }

    fn run_single_test(&mut self, sample: &SampleConfig, out: &mut dyn Write) -> TestResult {
        let Some(source) = sample.source.as_ref().filter(|s| !s.filepath.is_empty()) else {
            return TestResult::error(sample.clone(), "Input file not found", String::new());
        };
        let input = self.config.resources_dir.join(&source.filepath);
        let command = build_decode_command(
            &self.config.executable,
            &input,
            self.config.device_id,
            &sample.extra_args,
        );
        execute_classified(&command, sample, &self.config, out)
    }
}
