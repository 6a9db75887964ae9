// crates/vvtest-runner/tests/scripted_execution.rs
// ============================================================================
// Module: vvtest Scripted Execution Tests
// Description: Exercises process execution and classification end to end.
// Purpose: Prove exit codes, signals, and deadlines fold into results.
// Dependencies: tempfile, vvtest-core, vvtest-runner
// ============================================================================

//! Execution and classification tests against scripted executables.

#![cfg(unix)]
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

use std::fs;
use std::io::Write as _;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use tempfile::TempDir;

use vvtest_core::CodecType;
use vvtest_core::SampleConfig;
use vvtest_core::SampleSource;
use vvtest_core::SuiteFormat;
use vvtest_core::VideoTestStatus;
use vvtest_runner::DecodeHarness;
use vvtest_runner::ExecError;
use vvtest_runner::Harness;
use vvtest_runner::HarnessConfig;
use vvtest_runner::run_with_timeout;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Writes an executable shell script and returns its path.
fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    let mut file = fs::File::create(&path).unwrap();
    writeln!(file, "#!/bin/sh\n{body}").unwrap();
    drop(file);
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn harness_for(executable: PathBuf, root: &Path) -> DecodeHarness {
    let config = HarnessConfig {
        executable,
        resources_dir: root.join("resources"),
        results_dir: root.join("results"),
        device_id: None,
        timeout: None,
        keep_files: false,
        verbose: false,
    };
    DecodeHarness::new(config, Vec::new(), SuiteFormat::Vvs, Vec::new())
}

fn clip_sample(name: &str) -> SampleConfig {
    let mut sample = SampleConfig::new(name, CodecType::H264);
    sample.source = Some(SampleSource {
        url: String::new(),
        filepath: format!("{name}.264"),
        checksum: String::new(),
    });
    sample
}

// ============================================================================
// SECTION: Raw Execution
// ============================================================================

#[test]
fn captures_output_and_exit_code() {
    let dir = TempDir::new().unwrap();
    let script = write_script(dir.path(), "ok.sh", "echo out-line\necho err-line >&2\nexit 0");
    let output = run_with_timeout(
        &[script.display().to_string()],
        None,
        Duration::from_secs(10),
    )
    .unwrap();
    assert_eq!(output.returncode, 0);
    assert!(output.stdout.contains("out-line"));
    assert!(output.stderr.contains("err-line"));
}

#[test]
fn signal_death_surfaces_negated() {
    let dir = TempDir::new().unwrap();
    let script = write_script(dir.path(), "segv.sh", "kill -SEGV $$");
    let output = run_with_timeout(
        &[script.display().to_string()],
        None,
        Duration::from_secs(10),
    )
    .unwrap();
    assert_eq!(output.returncode, -11);
}

#[test]
fn deadline_kills_long_runner() {
    let dir = TempDir::new().unwrap();
    let script = write_script(dir.path(), "slow.sh", "sleep 30");
    let err = run_with_timeout(
        &[script.display().to_string()],
        None,
        Duration::from_millis(200),
    )
    .unwrap_err();
    assert!(matches!(err, ExecError::Timeout));
    assert_eq!(err.to_string(), "Test timed out");
}

#[test]
fn missing_program_is_a_spawn_error() {
    let err = run_with_timeout(
        &["/nonexistent/vk-video-dec-test".to_string()],
        None,
        Duration::from_secs(1),
    )
    .unwrap_err();
    assert!(matches!(err, ExecError::Spawn(_)));
}

// ============================================================================
// SECTION: Harness Classification
// ============================================================================

#[test]
fn exit_zero_classifies_as_pass() {
    let dir = TempDir::new().unwrap();
    let script = write_script(dir.path(), "dec.sh", "exit 0");
    let mut harness = harness_for(script, dir.path());
    let mut out = Vec::new();
    let result = harness.run_single_test(&clip_sample("basic"), &mut out);
    assert_eq!(result.status, VideoTestStatus::Success);
    assert_eq!(result.returncode, 0);
    assert!(result.error_message.is_empty());
}

#[test]
fn exit_sixty_nine_classifies_as_not_supported() {
    let dir = TempDir::new().unwrap();
    let script = write_script(dir.path(), "dec.sh", "exit 69");
    let mut harness = harness_for(script, dir.path());
    let mut out = Vec::new();
    let result = harness.run_single_test(&clip_sample("main10"), &mut out);
    assert_eq!(result.status, VideoTestStatus::NotSupported);
    assert!(result.error_message.is_empty());
}

#[test]
fn ordinary_failure_classifies_as_error() {
    let dir = TempDir::new().unwrap();
    let script = write_script(dir.path(), "dec.sh", "exit 2");
    let mut harness = harness_for(script, dir.path());
    let mut out = Vec::new();
    let result = harness.run_single_test(&clip_sample("broken"), &mut out);
    assert_eq!(result.status, VideoTestStatus::Error);
    assert_eq!(
        result.error_message,
        "Expected success but got return code 2"
    );
}

#[test]
fn abort_signal_classifies_as_crash() {
    let dir = TempDir::new().unwrap();
    let script = write_script(dir.path(), "dec.sh", "kill -ABRT $$");
    let mut harness = harness_for(script, dir.path());
    let mut out = Vec::new();
    let result = harness.run_single_test(&clip_sample("crasher"), &mut out);
    assert_eq!(result.status, VideoTestStatus::Crash);
    assert_eq!(result.returncode, -6);
    assert_eq!(
        result.error_message,
        "Application crashed with return code -6"
    );
}

#[test]
fn per_sample_timeout_becomes_error_result() {
    let dir = TempDir::new().unwrap();
    let script = write_script(dir.path(), "dec.sh", "sleep 30");
    let mut harness = harness_for(script, dir.path());
    let mut sample = clip_sample("slow");
    sample.timeout_secs = Some(1);
    let mut out = Vec::new();
    let result = harness.run_single_test(&sample, &mut out);
    assert_eq!(result.status, VideoTestStatus::Error);
    assert_eq!(result.returncode, -1);
    assert_eq!(result.error_message, "Test timed out");
}

#[test]
fn sample_without_source_becomes_error_result() {
    let dir = TempDir::new().unwrap();
    let script = write_script(dir.path(), "dec.sh", "exit 0");
    let mut harness = harness_for(script, dir.path());
    let sample = SampleConfig::new("orphan", CodecType::H264);
    let mut out = Vec::new();
    let result = harness.run_single_test(&sample, &mut out);
    assert_eq!(result.status, VideoTestStatus::Error);
    assert_eq!(result.error_message, "Input file not found");
}

#[test]
fn command_line_is_recorded_on_results() {
    let dir = TempDir::new().unwrap();
    let script = write_script(dir.path(), "dec.sh", "exit 0");
    let mut harness = harness_for(script.clone(), dir.path());
    let mut out = Vec::new();
    let result = harness.run_single_test(&clip_sample("basic"), &mut out);
    assert!(result.command_line.starts_with(&script.display().to_string()));
    assert!(result.command_line.contains("--noPresent"));
    assert!(result.command_line.contains("--enablePostProcessFilter 0"));
}
