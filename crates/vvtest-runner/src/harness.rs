// crates/vvtest-runner/src/harness.rs
// ============================================================================
// Module: vvtest Harness Contract
// Description: Shared harness trait, settings, and execution plumbing.
// Purpose: Give decode and encode runs one orchestration surface.
// Dependencies: vvtest-core, vvtest-fetch, crate::exec
// ============================================================================

//! ## Overview
//! A harness owns one executable, one loaded sample set, and one skip
//! filter. The orchestration loop only sees the three-method [`Harness`]
//! contract: select the suite, make its inputs present, run one test.
//! Everything that is identical between decode and encode lives here as
//! free functions the two implementations call into.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use vvtest_core::FilterOptions;
use vvtest_core::PlatformContext;
use vvtest_core::SampleConfig;
use vvtest_core::SkipFilter;
use vvtest_core::SkipRule;
use vvtest_core::SuiteFilter;
use vvtest_core::TestResult;
use vvtest_core::TestType;
use vvtest_core::VideoTestStatus;
use vvtest_core::classify_exit_status;
use vvtest_fetch::FetchableResource;
use vvtest_fetch::SampleFetcher;

use crate::exec::DEFAULT_TEST_TIMEOUT;
use crate::exec::duration_millis;
use crate::exec::run_with_timeout;

// ============================================================================
// SECTION: Settings
// ============================================================================

/// Run-wide settings shared by every harness.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Executable under test.
    pub executable: PathBuf,
    /// Root directory holding sample input files.
    pub resources_dir: PathBuf,
    /// Directory for artifacts produced during a run.
    pub results_dir: PathBuf,
    /// Vulkan device index forwarded to the executable.
    pub device_id: Option<u32>,
    /// Run-wide timeout override; samples may still override per test.
    pub timeout: Option<Duration>,
    /// Keep produced artifacts even after a passing test.
    pub keep_files: bool,
    /// Echo command lines and captured output.
    pub verbose: bool,
}

/// Download behavior for the resource check.
#[derive(Debug, Clone, Copy)]
pub struct DownloadPolicy {
    /// Fetch missing or corrupt inputs instead of failing.
    pub auto_download: bool,
    /// Skip TLS certificate verification on fetches.
    pub insecure: bool,
}

/// Outcome of suite selection, including what was held back and why.
#[derive(Debug, Clone, Default)]
pub struct SuiteSelection {
    /// Samples that will run, in configuration order.
    pub samples: Vec<SampleConfig>,
    /// Skip-rule exclusions recorded during selection, by display name.
    pub skipped: BTreeMap<String, SkipRule>,
    /// Samples excluded because their configuration disables them.
    pub disabled: Vec<String>,
}

// ============================================================================
// SECTION: Harness Contract
// ============================================================================

/// One test-executable driver as the orchestration loop sees it.
pub trait Harness {
    /// Ensures every selected sample's input exists and verifies,
    /// downloading when the policy allows. Returns false when the run
    /// cannot proceed.
    fn check_resources(
        &mut self,
        samples: &[SampleConfig],
        policy: DownloadPolicy,
        out: &mut dyn Write,
    ) -> bool;

    /// Applies codec, name, and skip-list selection to the loaded
    /// sample set.
    fn create_test_suite(&mut self, options: &FilterOptions) -> SuiteSelection;

    /// Runs one sample to completion and classifies the outcome. Never
    /// fails: pre-invocation problems become ERROR results.
    fn run_single_test(&mut self, sample: &SampleConfig, out: &mut dyn Write) -> TestResult;
}

// ============================================================================
// SECTION: Shared Selection
// ============================================================================

/// Builds one harness's suite selection from its filter.
///
/// The filter keeps rule-matched samples in its output so the full
/// surviving set stays visible; exclusion from execution happens here,
/// making the selection's sample list exactly what will run. Only-skipped
/// selection runs its rule-matched samples, so nothing is excluded there.
pub(crate) fn build_selection(
    filter: &mut SuiteFilter,
    samples: &[SampleConfig],
    options: &FilterOptions,
    test_type: TestType,
) -> SuiteSelection {
    let mut selected = filter.filter(samples, options);
    let skipped = filter.skipped().clone();
    let disabled = filter.disabled().to_vec();
    if options.skip_filter == SkipFilter::Enabled {
        selected.retain(|sample| !skipped.contains_key(&sample.display_name(test_type)));
    }
    SuiteSelection {
        samples: selected,
        skipped,
        disabled,
    }
}

// ============================================================================
// SECTION: Shared Resource Check
// ============================================================================

/// Verifies sample inputs below `resources_dir`, fetching when permitted.
///
/// Samples whose source declares a URL are downloadable; sources without a
/// URL are provisioned out of band and only checked for presence. A sample
/// with no source at all cannot run and fails the check.
pub(crate) fn check_sample_resources(
    samples: &[SampleConfig],
    config: &HarnessConfig,
    policy: DownloadPolicy,
    out: &mut dyn Write,
) -> bool {
    let mut resources = Vec::new();
    let mut unsourced = Vec::new();
    for sample in samples {
        match &sample.source {
            Some(source) if !source.filepath.is_empty() => {
                resources.push(FetchableResource::new(
                    source.url.clone(),
                    source.filepath.clone(),
                    &source.checksum,
                    &config.resources_dir,
                ));
            }
            _ => unsourced.push(sample.name.clone()),
        }
    }

    let mut ok = true;
    for name in &unsourced {
        let _ = writeln!(out, "⚠️  Sample has no input source: {name}");
        ok = false;
    }

    let stale: Vec<&FetchableResource> = resources
        .iter()
        .filter(|resource| !resource.is_up_to_date())
        .collect();
    if stale.is_empty() {
        if ok {
            let _ = writeln!(out, "✓ All sample files found and verified");
        }
        return ok;
    }

    let _ = writeln!(out, "⚠️  Missing or corrupt sample files:");
    for resource in &stale {
        let _ = writeln!(out, "    {}", resource.full_path().display());
    }

    if !policy.auto_download {
        let _ = writeln!(out, "Missing test resources - automatic download is disabled");
        return false;
    }

    let _ = writeln!(out, "📥 Attempting to download sample files...");
    let mut fetcher = SampleFetcher::new(resources);
    fetcher.fetch_all(policy.insecure, out) && ok
}

// ============================================================================
// SECTION: Shared Execution
// ============================================================================

/// Timeout for one sample: per-sample override, then run-wide, then default.
pub(crate) fn resolve_timeout(sample: &SampleConfig, config: &HarnessConfig) -> Duration {
    sample
        .timeout_secs
        .map(Duration::from_secs)
        .or(config.timeout)
        .unwrap_or(DEFAULT_TEST_TIMEOUT)
}

/// Runs a built command for `sample` and folds the outcome into a
/// classified [`TestResult`]. Spawn failures and timeouts become ERROR
/// results rather than propagating.
pub(crate) fn execute_classified(
    command: &[String],
    sample: &SampleConfig,
    config: &HarnessConfig,
    out: &mut dyn Write,
) -> TestResult {
    let command_line = command.join(" ");
    if config.verbose {
        let _ = writeln!(out, "    Command: {command_line}");
    }

    let cwd = config.executable.parent().filter(|dir| dir.exists());
    let timeout = resolve_timeout(sample, config);
    match run_with_timeout(command, cwd, timeout) {
        Ok(output) => {
            let status = classify_exit_status(output.returncode, PlatformContext::current());
            let error_message = match status {
                VideoTestStatus::Error => {
                    format!("Expected success but got return code {}", output.returncode)
                }
                VideoTestStatus::Crash => {
                    format!("Application crashed with return code {}", output.returncode)
                }
                VideoTestStatus::Success | VideoTestStatus::NotSupported => String::new(),
            };
            TestResult {
                sample: sample.clone(),
                returncode: output.returncode,
                status,
                stdout: output.stdout,
                stderr: output.stderr,
                execution_time_ms: duration_millis(output.duration),
                error_message,
                command_line,
                warning_found: false,
            }
        }
        Err(err) => TestResult::error(sample.clone(), err.to_string(), command_line),
    }
}
