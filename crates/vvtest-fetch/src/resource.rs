// crates/vvtest-fetch/src/resource.rs
// ============================================================================
// Module: vvtest Fetchable Resource
// Description: One downloadable, checksum-verified sample asset.
// Purpose: Keep a single target path present with verified content.
// Dependencies: reqwest, crate::checksum
// ============================================================================

//! ## Overview
//! A resource is identified by its target path (`base_dir` joined with
//! `filename`), not by reference: at most one file exists per path. The
//! `update` operation is a no-op when the file already verifies; otherwise
//! the stale file is removed, the asset is downloaded fully into memory,
//! verified, and only then written out, so a failed fetch never leaves a
//! partial file behind. Failures are recorded on the resource and reported
//! through the return value; nothing propagates past the fetch boundary.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;
use std::time::Instant;

use reqwest::blocking::Client;
use thiserror::Error;

use crate::checksum::ChecksumAlgorithm;
use crate::checksum::compute_checksum;
use crate::checksum::compute_file_checksum;
use crate::checksum::split_declared_checksum;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Download read chunk size.
const DOWNLOAD_CHUNK_SIZE: usize = 8 * 1024;

/// Minimum interval between progress readout updates.
const PROGRESS_UPDATE_INTERVAL: Duration = Duration::from_millis(100);

/// Width of the progress bar in characters.
const PROGRESS_BAR_WIDTH: usize = 40;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Error recorded when a fetch attempt fails.
#[derive(Debug, Error)]
enum FetchError {
    /// Network or HTTP-level failure.
    #[error("download failed: {0}")]
    Transfer(String),
    /// Downloaded bytes did not hash to the declared checksum.
    #[error("checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch {
        /// Declared digest.
        expected: String,
        /// Digest of the downloaded bytes.
        actual: String,
    },
    /// Filesystem failure writing the verified bytes.
    #[error("write failed: {0}")]
    Write(String),
}

// ============================================================================
// SECTION: Fetchable Resource
// ============================================================================

/// One downloadable asset with a declared checksum.
#[derive(Debug, Clone)]
pub struct FetchableResource {
    /// Download URL.
    pub url: String,
    /// Filename under the target directory.
    pub filename: String,
    /// Declared hex digest, without any algorithm prefix.
    pub checksum: String,
    /// Directory the file lives in.
    pub base_dir: PathBuf,
    /// Algorithm of the declared digest.
    pub algorithm: ChecksumAlgorithm,
    /// Last failure message, populated only on a failed attempt.
    last_error: Option<String>,
    /// Digest of the rejected download, populated only on mismatch.
    actual_checksum: Option<String>,
}

impl FetchableResource {
    /// Creates a resource from a declared checksum string; an `md5:`
    /// prefix on the declaration selects MD5, otherwise SHA-256.
    #[must_use]
    pub fn new(
        url: impl Into<String>,
        filename: impl Into<String>,
        declared_checksum: &str,
        base_dir: impl Into<PathBuf>,
    ) -> Self {
        let (algorithm, digest) = split_declared_checksum(declared_checksum);
        Self {
            url: url.into(),
            filename: filename.into(),
            checksum: digest.to_string(),
            base_dir: base_dir.into(),
            algorithm,
            last_error: None,
            actual_checksum: None,
        }
    }

    /// Full path where this resource is stored.
    #[must_use]
    pub fn full_path(&self) -> PathBuf {
        self.base_dir.join(&self.filename)
    }

    /// Failure message of the last attempt, if it failed.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Digest of the last rejected download, if verification failed.
    #[must_use]
    pub fn actual_checksum(&self) -> Option<&str> {
        self.actual_checksum.as_deref()
    }

    /// Returns true when the target file exists and its streamed hash
    /// equals the declared checksum. A resource with no declared checksum
    /// is considered current whenever the file exists.
    #[must_use]
    pub fn is_up_to_date(&self) -> bool {
        let path = self.full_path();
        if !path.exists() {
            return false;
        }
        if self.checksum.is_empty() {
            return true;
        }
        compute_file_checksum(&path, self.algorithm)
            .is_ok_and(|actual| actual == self.checksum)
    }

    /// Removes the target file if present. Removal failures are ignored;
    /// a later write surfaces the real filesystem problem.
    pub fn clean(&self) {
        let path = self.full_path();
        if path.exists() {
            let _ = fs::remove_file(&path);
        }
    }

    /// Brings the resource up to date, downloading if missing or stale.
    ///
    /// Returns true when the file ends verified. Any failure is recorded
    /// on the resource and reported only through the return value.
    pub fn update(&mut self, client: &Client, out: &mut dyn Write) -> bool {
        if self.is_up_to_date() {
            return true;
        }
        self.clean();
        self.last_error = None;
        self.actual_checksum = None;

        match self.fetch_and_verify(client, out) {
            Ok(()) => true,
            Err(err) => {
                if let FetchError::ChecksumMismatch { actual, .. } = &err {
                    self.actual_checksum = Some(actual.clone());
                }
                self.last_error = Some(err.to_string());
                let _ = writeln!(out, "✗ Failed to download {}", self.filename);
                false
            }
        }
    }

    /// Downloads, verifies, and writes the asset.
    fn fetch_and_verify(&self, client: &Client, out: &mut dyn Write) -> Result<(), FetchError> {
        let _ = writeln!(out, "Fetching {}", self.url);
        let response = client
            .get(&self.url)
            .send()
            .and_then(reqwest::blocking::Response::error_for_status)
            .map_err(|err| FetchError::Transfer(err.to_string()))?;

        let total_size = response.content_length();
        let data = download_body(response, total_size, &self.filename, out)
            .map_err(FetchError::Transfer)?;

        if !self.checksum.is_empty() {
            let actual = compute_checksum(&data, self.algorithm);
            if actual != self.checksum {
                return Err(FetchError::ChecksumMismatch {
                    expected: self.checksum.clone(),
                    actual,
                });
            }
        }

        write_verified(&self.full_path(), &data)?;
        let _ = writeln!(out, "✓ Downloaded and verified: {}", self.full_path().display());
        Ok(())
    }
}

/// Writes verified bytes to the target path, creating parent directories.
fn write_verified(path: &Path, data: &[u8]) -> Result<(), FetchError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|err| FetchError::Write(err.to_string()))?;
    }
    fs::write(path, data).map_err(|err| FetchError::Write(err.to_string()))
}

// ============================================================================
// SECTION: Download
// ============================================================================

/// Reads the full response body, with a progress readout when the server
/// reported a content length. Absent a content length the body is still
/// downloaded completely, just silently.
fn download_body(
    mut response: reqwest::blocking::Response,
    total_size: Option<u64>,
    filename: &str,
    out: &mut dyn Write,
) -> Result<Vec<u8>, String> {
    let Some(total) = total_size.filter(|t| *t > 0) else {
        let mut data = Vec::new();
        response
            .read_to_end(&mut data)
            .map_err(|err| err.to_string())?;
        return Ok(data);
    };

    let mut data = Vec::with_capacity(usize::try_from(total).unwrap_or(0));
    let mut chunk = vec![0_u8; DOWNLOAD_CHUNK_SIZE];
    let start = Instant::now();
    let mut last_update = start;

    let total_mb = to_mb(total);
    let _ = writeln!(out, "Downloading {filename} ({total_mb:.1} MB)");

    loop {
        let read = response.read(&mut chunk).map_err(|err| err.to_string())?;
        if read == 0 {
            break;
        }
        data.extend_from_slice(&chunk[..read]);

        let downloaded = data.len() as u64;
        let now = Instant::now();
        if now.duration_since(last_update) >= PROGRESS_UPDATE_INTERVAL || downloaded == total {
            render_progress(out, downloaded, total, start.elapsed());
            last_update = now;
        }
    }
    let _ = writeln!(out);
    Ok(data)
}

/// Converts a byte count to mebibytes.
#[allow(clippy::cast_precision_loss, reason = "Display-only approximation.")]
fn to_mb(bytes: u64) -> f64 {
    bytes as f64 / (1024.0 * 1024.0)
}

/// Formats a remaining-time estimate.
fn format_eta(seconds: f64) -> String {
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "Display-only rounding of a non-negative estimate."
    )]
    let whole = seconds.max(0.0) as u64;
    if whole < 60 {
        format!("{whole}s")
    } else if whole < 3600 {
        format!("{}m {}s", whole / 60, whole % 60)
    } else {
        format!("{}h {}m", whole / 3600, (whole % 3600) / 60)
    }
}

/// Renders one progress-bar line.
#[allow(clippy::cast_precision_loss, reason = "Display-only approximation.")]
fn render_progress(out: &mut dyn Write, downloaded: u64, total: u64, elapsed: Duration) {
    let progress = downloaded as f64 / total as f64;
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "Bar fill is bounded by the bar width."
    )]
    let filled = ((PROGRESS_BAR_WIDTH as f64) * progress) as usize;
    let filled = filled.min(PROGRESS_BAR_WIDTH);

    let elapsed_secs = elapsed.as_secs_f64();
    let rate = if elapsed_secs > 0.0 {
        downloaded as f64 / elapsed_secs
    } else {
        0.0
    };
    let eta = if rate > 0.0 {
        format_eta(total.saturating_sub(downloaded) as f64 / rate)
    } else {
        "?".to_string()
    };

    let bar = format!(
        "[{}{}]",
        "=".repeat(filled),
        "-".repeat(PROGRESS_BAR_WIDTH - filled)
    );
    let _ = write!(
        out,
        "\r{bar} {:.1}% {:.1}/{:.1} MB | {:.2} MB/s | ETA: {eta}",
        progress * 100.0,
        to_mb(downloaded),
        to_mb(total),
        rate / (1024.0 * 1024.0),
    );
    let _ = out.flush();
}

// ============================================================================
// SECTION: Tests
// ============================================================================
