// crates/vvtest-runner/src/suite.rs
// ============================================================================
// Module: vvtest Suite Orchestration
// Description: Runs a selected suite end to end against one harness.
// Purpose: Own the select, prepare, execute, report flow.
// Dependencies: vvtest-core, crate::harness, crate::report
// ============================================================================

//! ## Overview
//! One call to [`run_suite`] is one complete run: select the suite through
//! the harness, make its inputs present, execute each test with progress
//! lines, then print the summary and optionally export JSON. The outcome
//! carries the aggregated results and the overall verdict; a run succeeds
//! exactly when no test finished as ERROR or CRASH. Nothing here exits the
//! process or touches a global sink.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::io::Write;
use std::path::PathBuf;

use vvtest_core::FilterOptions;
use vvtest_core::TestResult;
use vvtest_core::TestType;

use crate::harness::DownloadPolicy;
use crate::harness::Harness;
use crate::harness::SuiteSelection;
use crate::report::export_results_json;
use crate::report::write_progress;
use crate::report::write_single_result;
use crate::report::write_skipped_section;
use crate::report::write_suite_start;
use crate::report::write_summary;

// ============================================================================
// SECTION: Options and Outcome
// ============================================================================

/// Everything one run needs beyond the harness itself.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Suite selection parameters.
    pub filter: FilterOptions,
    /// Download behavior for the resource check.
    pub download: DownloadPolicy,
    /// List skip-rule exclusions with reasons before running.
    pub show_skipped: bool,
    /// Export results to this path after the run.
    pub export_json: Option<PathBuf>,
    /// Echo command lines and captured output per test.
    pub verbose: bool,
    /// Executable shown in the run banner.
    pub executable: PathBuf,
    /// Working directory shown in the run banner.
    pub work_dir: Option<PathBuf>,
}

/// Aggregated outcome of one run.
#[derive(Debug)]
pub struct SuiteOutcome {
    /// Results in execution order.
    pub results: Vec<TestResult>,
    /// What was selected, skipped, and disabled.
    pub selection: SuiteSelection,
    /// True when every executed test passed or was not supported.
    pub success: bool,
}

// ============================================================================
// SECTION: Orchestration
// ============================================================================

/// Runs the full suite flow against `harness` for one test type.
pub fn run_suite(
    harness: &mut dyn Harness,
    test_type: TestType,
    options: &RunOptions,
    out: &mut dyn Write,
) -> SuiteOutcome {
    let selection = harness.create_test_suite(&options.filter);

    write_suite_start(out, &options.executable, options.work_dir.as_deref());
    if options.show_skipped {
        write_skipped_section(out, selection.skipped.iter());
    }

    if !harness.check_resources(&selection.samples, options.download, out) {
        if options.download.auto_download {
            let _ = writeln!(
                out,
                "✗ FATAL: Missing or corrupt resource files could not be downloaded"
            );
        } else {
            let _ = writeln!(
                out,
                "✗ FATAL: Missing or corrupt resource files (auto-download disabled)"
            );
        }
        return SuiteOutcome {
            results: Vec::new(),
            selection,
            success: false,
        };
    }
    let _ = writeln!(out);

    let total = selection.samples.len();
    let mut results = Vec::with_capacity(total);
    for (index, sample) in selection.samples.iter().enumerate() {
        write_progress(out, index + 1, total, &sample.display_name(test_type));
        let result = harness.run_single_test(sample, out);
        write_single_result(out, &result, options.verbose);
        let _ = writeln!(out);
        results.push(result);
    }

    if results.is_empty() {
        let _ = writeln!(out, "No tests were run!");
        return SuiteOutcome {
            results,
            selection,
            success: false,
        };
    }

    // Under only-skipped selection, rule-matched cases run anyway; a case
    // counts as held back only when it did not execute.
    let executed: BTreeSet<String> = selection
        .samples
        .iter()
        .map(|sample| sample.display_name(test_type))
        .collect();
    let held_back = selection
        .skipped
        .keys()
        .filter(|name| !executed.contains(name.as_str()))
        .count();

    let success = write_summary(out, &results, test_type, held_back, selection.disabled.len());

    if let Some(path) = &options.export_json {
        if let Err(err) = export_results_json(path, &results, test_type) {
            let _ = writeln!(out, "✗ Failed to export {} results: {err}", test_type.as_str());
        } else {
            let _ = writeln!(out, "✓ Results exported to {}", path.display());
        }
    }

    SuiteOutcome {
        results,
        selection,
        success,
    }
}
