// crates/vvtest-runner/src/exec.rs
// ============================================================================
// Module: vvtest Process Execution
// Description: Runs one executable invocation with a hard deadline.
// Purpose: Capture output and raw exit code without blocking past timeout.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! One invocation is one child process with piped stdout/stderr. Both pipes
//! are drained on dedicated threads while the parent polls for completion
//! against a deadline; a child that outlives its deadline is killed and
//! reaped. The raw exit code is surfaced as a signed 64-bit value so the
//! classification layer sees signal terminations (negated signal number on
//! POSIX) and sign-extended structured-exception codes unchanged.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Read;
use std::path::Path;
use std::process::Command;
use std::process::ExitStatus;
use std::process::Stdio;
use std::thread;
use std::time::Duration;
use std::time::Instant;

use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Deadline applied when neither the sample nor the run specifies one.
pub const DEFAULT_TEST_TIMEOUT: Duration = Duration::from_secs(300);

/// How often the child is polled for completion.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

// ============================================================================
// SECTION: Types
// ============================================================================

/// Captured outcome of a completed invocation.
#[derive(Debug, Clone)]
pub struct ExecOutput {
    /// Raw exit code; negated signal number for signal deaths on POSIX.
    pub returncode: i64,
    /// Full captured standard output.
    pub stdout: String,
    /// Full captured standard error.
    pub stderr: String,
    /// Wall-clock time the invocation took.
    pub duration: Duration,
}

/// Failure that prevented an invocation from completing.
#[derive(Debug, Error)]
pub enum ExecError {
    /// The child outlived its deadline and was killed.
    #[error("Test timed out")]
    Timeout,
    /// The child could not be spawned or monitored.
    #[error("{0}")]
    Spawn(String),
}

// ============================================================================
// SECTION: Execution
// ============================================================================

/// Runs `command` to completion or until `timeout` elapses.
///
/// The first element is the program, the rest its arguments. Standard input
/// is closed; both output streams are captured in full.
pub fn run_with_timeout(
    command: &[String],
    cwd: Option<&Path>,
    timeout: Duration,
) -> Result<ExecOutput, ExecError> {
    let Some((program, args)) = command.split_first() else {
        return Err(ExecError::Spawn("empty command line".to_string()));
    };

    let mut builder = Command::new(program);
    builder
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    if let Some(dir) = cwd {
        builder.current_dir(dir);
    }

    let start = Instant::now();
    let mut child = builder
        .spawn()
        .map_err(|err| ExecError::Spawn(err.to_string()))?;

    let stdout_reader = child.stdout.take().map(drain);
    let stderr_reader = child.stderr.take().map(drain);

    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {
                if start.elapsed() >= timeout {
                    let _ = child.kill();
                    let _ = child.wait();
                    collect(stdout_reader);
                    collect(stderr_reader);
                    return Err(ExecError::Timeout);
                }
                thread::sleep(POLL_INTERVAL);
            }
            Err(err) => {
                let _ = child.kill();
                let _ = child.wait();
                collect(stdout_reader);
                collect(stderr_reader);
                return Err(ExecError::Spawn(err.to_string()));
            }
        }
    };

    Ok(ExecOutput {
        returncode: raw_exit_code(&status),
        stdout: collect(stdout_reader),
        stderr: collect(stderr_reader),
        duration: start.elapsed(),
    })
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Drains a child pipe to completion on its own thread.
fn drain<R: Read + Send + 'static>(mut reader: R) -> thread::JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buffer = Vec::new();
        let _ = reader.read_to_end(&mut buffer);
        buffer
    })
}

/// Joins a drain thread and decodes its bytes, lossily.
fn collect(handle: Option<thread::JoinHandle<Vec<u8>>>) -> String {
    let bytes = handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default();
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Signed exit code as the classification layer expects it.
fn raw_exit_code(status: &ExitStatus) -> i64 {
    if let Some(code) = status.code() {
        return i64::from(code);
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return -i64::from(signal);
        }
    }
    -1
}

/// Milliseconds for result records, saturating on overflow.
#[must_use]
pub fn duration_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
