// crates/vvtest-fetch/src/fetcher.rs
// ============================================================================
// Module: vvtest Sample Fetcher
// Description: Batch fetching with aggregated failure reporting.
// Purpose: Attempt every resource and summarize failures exactly once.
// Dependencies: reqwest, crate::resource
// ============================================================================

//! ## Overview
//! `fetch_all` never short-circuits: every resource is attempted even when
//! earlier ones fail, and all failures are collected into one summary
//! written after the last attempt. Certificate validation is only ever
//! disabled by the caller's explicit `insecure` flag; repeated failures
//! never promote it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::time::Duration;

use reqwest::blocking::Client;

use crate::resource::FetchableResource;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Connect timeout for download requests.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Width of report divider lines.
const DIVIDER_WIDTH: usize = 70;

// ============================================================================
// SECTION: Sample Fetcher
// ============================================================================

/// Batch fetcher over a set of resources.
#[derive(Debug, Default)]
pub struct SampleFetcher {
    /// Resources in fetch order.
    resources: Vec<FetchableResource>,
}

impl SampleFetcher {
    /// Creates a fetcher over the given resources.
    #[must_use]
    pub fn new(resources: Vec<FetchableResource>) -> Self {
        Self { resources }
    }

    /// The managed resources.
    #[must_use]
    pub fn resources(&self) -> &[FetchableResource] {
        &self.resources
    }

    /// Brings every resource up to date, attempting all of them.
    ///
    /// Returns true iff every resource ends in a verified state. On any
    /// failure, a single aggregated report naming each failed resource
    /// (URL, expected path, checksum mismatch detail when available) is
    /// written to `out` after all attempts.
    pub fn fetch_all(&mut self, insecure: bool, out: &mut dyn Write) -> bool {
        if insecure {
            let _ = writeln!(
                out,
                "WARNING: TLS certificate verification disabled. Connection may be insecure."
            );
        }
        let Ok(client) = build_client(insecure) else {
            let _ = writeln!(out, "✗ Failed to construct HTTP client");
            return false;
        };

        let mut failed = Vec::new();
        for (index, resource) in self.resources.iter_mut().enumerate() {
            if !resource.update(&client, out) {
                failed.push(index);
            }
        }

        if failed.is_empty() {
            return true;
        }
        self.write_failure_report(&failed, out);
        false
    }

    /// Removes every managed resource file.
    pub fn clean_all(&self) {
        for resource in &self.resources {
            resource.clean();
        }
    }

    /// Writes the aggregated failure summary.
    fn write_failure_report(&self, failed: &[usize], out: &mut dyn Write) {
        let divider = "=".repeat(DIVIDER_WIDTH);
        let _ = writeln!(out, "\n{divider}");
        let _ = writeln!(out, "DOWNLOAD FAILURES SUMMARY:");
        let _ = writeln!(out, "{divider}");
        for &index in failed {
            let Some(resource) = self.resources.get(index) else {
                continue;
            };
            let _ = writeln!(out, "✗ {}", resource.filename);
            let _ = writeln!(out, "  URL: {}", resource.url);
            let _ = writeln!(out, "  Expected at: {}", resource.full_path().display());
            if let Some(actual) = resource.actual_checksum() {
                let label = resource.algorithm.label();
                let _ = writeln!(out, "  Expected {label}: {}", resource.checksum);
                let _ = writeln!(out, "  Actual {label}:   {actual}");
            }
            if let Some(error) = resource.last_error() {
                let _ = writeln!(out, "  Error: {error}");
            }
            let _ = writeln!(out);
        }
        let _ = writeln!(out, "{divider}");
    }
}

/// Builds the blocking HTTP client used for downloads.
fn build_client(insecure: bool) -> Result<Client, reqwest::Error> {
    Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .danger_accept_invalid_certs(insecure)
        .build()
}
