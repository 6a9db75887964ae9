// crates/vvtest-runner/src/report.rs
// ============================================================================
// Module: vvtest Result Reporting
// Description: Progress lines, summaries, and JSON export for a run.
// Purpose: Keep all human-readable and machine-readable output in one place.
// Dependencies: serde_json, thiserror, vvtest-core
// ============================================================================

//! ## Overview
//! Every reporting function takes an injected writer so the orchestration
//! loop and its tests choose the sink. The summary mirrors what operators
//! read in CI logs: a per-codec breakdown, one line per result, totals,
//! and a pass-rate verdict. JSON export writes the same results in a
//! stable `{summary, results}` shape for downstream tooling.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::io::Write;
use std::path::Path;

use serde_json::json;
use thiserror::Error;

use vvtest_core::SampleConfig;
use vvtest_core::SkipRule;
use vvtest_core::TestResult;
use vvtest_core::TestType;
use vvtest_core::VideoTestStatus;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Width of section dividers in run output.
pub const DIVIDER_WIDTH: usize = 70;

/// Lines of captured output shown per stream in diagnostics.
const OUTPUT_PREVIEW_LINES: usize = 20;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Failure while exporting results.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Filesystem failure creating or writing the export file.
    #[error("export failed: {0}")]
    Io(String),
    /// Results could not be serialized.
    #[error("export serialization failed: {0}")]
    Serialize(String),
}

// ============================================================================
// SECTION: Status Display
// ============================================================================

/// Short label and symbol used in per-result lines.
const fn status_display(status: VideoTestStatus) -> (&'static str, &'static str) {
    match status {
        VideoTestStatus::Success => ("PASS", "✓"),
        VideoTestStatus::NotSupported => ("N/S", "○"),
        VideoTestStatus::Crash => ("CRASH", "💥"),
        VideoTestStatus::Error => ("FAIL", "✗"),
    }
}

/// Seconds with two decimals from a millisecond count, without going
/// through floating point.
fn format_secs(millis: u64) -> String {
    format!("{}.{:02}", millis / 1000, (millis % 1000) / 10)
}

// ============================================================================
// SECTION: Run Progress
// ============================================================================

/// Banner printed before a run starts.
pub fn write_suite_start(out: &mut dyn Write, executable: &Path, work_dir: Option<&Path>) {
    let divider = "=".repeat(DIVIDER_WIDTH);
    let _ = writeln!(out, "{divider}");
    let _ = writeln!(out, "VULKAN VIDEO TEST SUITE");
    let _ = writeln!(out, "{divider}");
    let _ = writeln!(out, "Binary: {}", executable.display());
    if let Some(dir) = work_dir {
        let _ = writeln!(out, "Work Dir: {}", dir.display());
    }
    let _ = writeln!(out);
}

/// One-line header before each test.
pub fn write_progress(out: &mut dyn Write, index: usize, total: usize, display_name: &str) {
    let _ = writeln!(out, "[{index}/{total}] Running: {display_name}");
}

/// Concise verdict line for one result, with diagnostics on crash or
/// when verbose.
pub fn write_single_result(out: &mut dyn Write, result: &TestResult, verbose: bool) {
    let (label, symbol) = status_display(result.status);
    let _ = writeln!(out, "{symbol} {label} ({}s)", format_secs(result.execution_time_ms));

    if !result.error_message.is_empty() {
        let _ = writeln!(out, "   Error: {}", result.error_message);
    }

    if result.status == VideoTestStatus::Crash {
        let _ = writeln!(out, "   Command: {}", result.command_line);
        write_command_output(out, result);
    } else if verbose && (!result.stdout.is_empty() || !result.stderr.is_empty()) {
        write_command_output(out, result);
    }
}

/// Limited stdout/stderr preview to aid debugging.
fn write_command_output(out: &mut dyn Write, result: &TestResult) {
    let _ = writeln!(out, "   === Command Output ===");
    if !result.stdout.is_empty() {
        let _ = writeln!(out, "   STDOUT:");
        for line in result.stdout.lines().take(OUTPUT_PREVIEW_LINES) {
            let _ = writeln!(out, "     {line}");
        }
    }
    if !result.stderr.is_empty() {
        let _ = writeln!(out, "   STDERR:");
        for line in result.stderr.lines().take(OUTPUT_PREVIEW_LINES) {
            let _ = writeln!(out, "     {line}");
        }
    }
}

/// Section listing skip-rule exclusions with their recorded reasons.
pub fn write_skipped_section<'a, I>(out: &mut dyn Write, skipped: I)
where
    I: Iterator<Item = (&'a String, &'a SkipRule)>,
{
    let mut wrote_header = false;
    for (display_name, rule) in skipped {
        if !wrote_header {
            let _ = writeln!(out, "SKIPPED TESTS:");
            wrote_header = true;
        }
        let _ = writeln!(out, "  - {display_name}: {}", rule.reason);
        if !rule.bug_url.is_empty() {
            let _ = writeln!(out, "      {}", rule.bug_url);
        }
    }
    if wrote_header {
        let _ = writeln!(out);
    }
}

// ============================================================================
// SECTION: Summary
// ============================================================================

/// Per-status counts over a result set.
#[derive(Debug, Clone, Copy, Default)]
struct StatusCounts {
    passed: usize,
    not_supported: usize,
    crashed: usize,
    failed: usize,
}

impl StatusCounts {
    fn tally(results: &[TestResult]) -> Self {
        let mut counts = Self::default();
        for result in results {
            match result.status {
                VideoTestStatus::Success => counts.passed += 1,
                VideoTestStatus::NotSupported => counts.not_supported += 1,
                VideoTestStatus::Crash => counts.crashed += 1,
                VideoTestStatus::Error => counts.failed += 1,
            }
        }
        counts
    }
}

/// Per-codec breakdown preserving first-appearance order.
fn group_by_codec(results: &[TestResult]) -> Vec<(String, StatusCounts, usize)> {
    let mut groups: Vec<(String, StatusCounts, usize)> = Vec::new();
    for result in results {
        let codec = result.sample.codec.as_str().to_string();
        let at = match groups.iter().position(|(name, _, _)| *name == codec) {
            Some(at) => at,
            None => {
                groups.push((codec, StatusCounts::default(), 0));
                groups.len() - 1
            }
        };
        let entry = &mut groups[at];
        entry.2 += 1;
        match result.status {
            VideoTestStatus::Success => entry.1.passed += 1,
            VideoTestStatus::NotSupported => entry.1.not_supported += 1,
            VideoTestStatus::Crash => entry.1.crashed += 1,
            VideoTestStatus::Error => entry.1.failed += 1,
        }
    }
    groups
}

/// Prints the full results summary and returns the overall verdict:
/// true when no test failed or crashed.
pub fn write_summary(
    out: &mut dyn Write,
    results: &[TestResult],
    test_type: TestType,
    skipped_count: usize,
    disabled_count: usize,
) -> bool {
    let divider = "=".repeat(DIVIDER_WIDTH);
    let thin = "-".repeat(DIVIDER_WIDTH);
    let type_upper = test_type.as_str().to_uppercase();

    let _ = writeln!(out, "{divider}");
    let _ = writeln!(out, "VULKAN VIDEO {type_upper} TEST RESULTS SUMMARY");
    let _ = writeln!(out, "{divider}");

    for (codec, counts, total) in group_by_codec(results) {
        let _ = writeln!(
            out,
            "{:8} - {:2} pass, {:2} N/S, {:2} crash, {:2} fail ({total:2} total)",
            codec.to_uppercase(),
            counts.passed,
            counts.not_supported,
            counts.crashed,
            counts.failed,
        );
    }
    let _ = writeln!(out, "{thin}");

    for result in results {
        let (label, symbol) = status_display(result.status);
        let _ = writeln!(
            out,
            "{symbol} {:4} {:35} - {label:5} ({}s)",
            result.sample.codec.as_str(),
            result.sample.display_name(test_type),
            format_secs(result.execution_time_ms),
        );
    }
    let _ = writeln!(out, "{thin}");

    let counts = StatusCounts::tally(results);
    let total = results.len() + skipped_count + disabled_count;
    let _ = writeln!(out, "Total Tests:   {total:3}");
    if skipped_count > 0 {
        let _ = writeln!(
            out,
            "Skipped:       {skipped_count:3} (skip list; use --ignore-skip-list to run)"
        );
    }
    if disabled_count > 0 {
        let _ = writeln!(out, "Disabled:      {disabled_count:3}");
    }
    let _ = writeln!(out, "Passed:        {:3}", counts.passed);
    let _ = writeln!(out, "Not Supported: {:3}", counts.not_supported);
    let _ = writeln!(out, "Crashed:       {:3}", counts.crashed);
    let _ = writeln!(out, "Failed:        {:3}", counts.failed);
    if !results.is_empty() {
        let tenths = counts.passed * 1000 / results.len();
        let _ = writeln!(out, "Success Rate: {}.{}%", tenths / 10, tenths % 10);
    }

    write_verdict(out, counts, &type_upper)
}

/// Final verdict line; true when nothing failed or crashed.
fn write_verdict(out: &mut dyn Write, counts: StatusCounts, type_upper: &str) -> bool {
    if counts.failed + counts.crashed == 0 {
        if counts.not_supported > 0 {
            let _ = writeln!(
                out,
                "\n✓ ALL TESTS COMPLETED - {} passed, {} not supported by hardware/driver",
                counts.passed, counts.not_supported,
            );
        } else {
            let _ = writeln!(out, "\n🎉 ALL {type_upper} TESTS PASSED!");
        }
        return true;
    }

    if counts.crashed > 0 && counts.failed > 0 {
        let _ = writeln!(
            out,
            "\n💥 {} {type_upper} TEST(S) CRASHED, {} FAILED!",
            counts.crashed, counts.failed,
        );
    } else if counts.crashed > 0 {
        let _ = writeln!(out, "\n💥 {} {type_upper} TEST(S) CRASHED!", counts.crashed);
    } else {
        let _ = writeln!(out, "\n✗ {} {type_upper} TEST(S) FAILED!", counts.failed);
    }
    false
}

// ============================================================================
// SECTION: Sample Listing
// ============================================================================

/// Lists loaded samples with per-codec counts, for `--list-samples`.
pub fn write_sample_listing(out: &mut dyn Write, samples: &[SampleConfig], test_type: TestType) {
    let divider = "=".repeat(DIVIDER_WIDTH);
    let thin = "-".repeat(DIVIDER_WIDTH);
    let type_upper = test_type.as_str().to_uppercase();
    let _ = writeln!(out, "{divider}");
    let _ = writeln!(out, "AVAILABLE {type_upper} TEST SAMPLES");
    let _ = writeln!(out, "{divider}");

    if samples.is_empty() {
        let _ = writeln!(out, "No {} samples found", test_type.as_str());
        return;
    }

    let _ = writeln!(out, "\n{:<40} {:<8} {:<8} Description", "Name", "Codec", "Enabled");
    let _ = writeln!(out, "{thin}");
    for sample in samples {
        let enabled = if sample.enabled { "✓" } else { "✗" };
        let _ = writeln!(
            out,
            "{:<40} {:<8} {enabled:<8} {}",
            sample.display_name(test_type),
            sample.codec.as_str(),
            sample.description,
        );
    }

    let mut codec_counts: Vec<(String, usize)> = Vec::new();
    for sample in samples.iter().filter(|s| s.enabled) {
        let codec = sample.codec.as_str().to_string();
        match codec_counts.iter().position(|(name, _)| *name == codec) {
            Some(at) => codec_counts[at].1 += 1,
            None => codec_counts.push((codec, 1)),
        }
    }
    codec_counts.sort_by(|a, b| a.0.cmp(&b.0));

    let _ = writeln!(out, "{thin}");
    let _ = writeln!(out, "\nTotal: {} samples", samples.len());
    if !codec_counts.is_empty() {
        let summary: Vec<String> = codec_counts
            .iter()
            .map(|(codec, count)| format!("{codec}: {count}"))
            .collect();
        let _ = writeln!(out, "Enabled by codec: {}", summary.join(", "));
    }
    let _ = writeln!(
        out,
        "\nUse --test '<pattern>' to filter samples (e.g., --test '{}*')",
        test_type.prefix(),
    );
    let _ = writeln!(out, "Use --codec <codec> to run only specific codec tests");
}

// ============================================================================
// SECTION: JSON Export
// ============================================================================

/// One result in export form.
fn result_to_json(result: &TestResult, test_type: TestType) -> serde_json::Value {
    let mut value = json!({
        "name": result.sample.display_name(test_type),
        "codec": result.sample.codec.as_str(),
        "test_type": test_type.as_str(),
        "description": result.sample.description,
        "status": result.status.as_str(),
        "success": result.success(),
        "returncode": result.returncode,
        "execution_time_ms": result.execution_time_ms,
        "warning_found": result.warning_found,
        "error_message": result.error_message,
        "command_line": result.command_line,
    });
    if let Some(map) = value.as_object_mut() {
        if let Some(source) = &result.sample.source {
            map.insert("input_file".to_string(), json!(source.filepath));
        }
        if let Some(profile) = result.sample.encode.as_ref().and_then(|e| e.profile.as_ref()) {
            map.insert("profile".to_string(), json!(profile));
        }
    }
    value
}

/// Exports results as `{summary, results}` JSON, creating parent
/// directories as needed.
pub fn export_results_json(
    path: &Path,
    results: &[TestResult],
    test_type: TestType,
) -> Result<(), ReportError> {
    let counts = StatusCounts::tally(results);
    let document = json!({
        "summary": {
            "total_tests": results.len(),
            "passed": counts.passed,
            "not_supported": counts.not_supported,
            "crashed": counts.crashed,
            "failed": counts.failed,
        },
        "results": results
            .iter()
            .map(|result| result_to_json(result, test_type))
            .collect::<Vec<_>>(),
    });

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|err| ReportError::Io(err.to_string()))?;
    }
    let body = serde_json::to_string_pretty(&document)
        .map_err(|err| ReportError::Serialize(err.to_string()))?;
    fs::write(path, body).map_err(|err| ReportError::Io(err.to_string()))
}
