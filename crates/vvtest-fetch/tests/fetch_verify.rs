// crates/vvtest-fetch/tests/fetch_verify.rs
// ============================================================================
// Module: Fetch Verification Tests
// Description: Exercise download, verification, caching, and aggregation.
// Purpose: Ensure fetch failures are local, reported once, and non-partial.
// Dependencies: vvtest-fetch, tiny_http, tempfile
// ============================================================================

//! Resource fetching tests against a local HTTP server.

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

use std::collections::HashMap;
use std::fs;
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::thread;

use tempfile::TempDir;
use tiny_http::Response;
use tiny_http::Server;
use vvtest_fetch::ChecksumAlgorithm;
use vvtest_fetch::FetchableResource;
use vvtest_fetch::SampleFetcher;
use vvtest_fetch::compute_checksum;
use vvtest_fetch::compute_file_checksum;
use vvtest_fetch::split_declared_checksum;

/// Serves fixed payloads by path, counting requests per path.
struct TestServer {
    base_url: String,
    hits: Arc<AtomicUsize>,
}

fn spawn_server(payloads: HashMap<String, Vec<u8>>) -> TestServer {
    let server = Server::http("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}", server.server_addr().to_ip().unwrap());
    let hits = Arc::new(AtomicUsize::new(0));
    let hit_counter = Arc::clone(&hits);

    thread::spawn(move || {
        for request in server.incoming_requests() {
            hit_counter.fetch_add(1, Ordering::SeqCst);
            let path = request.url().to_string();
            match payloads.get(&path) {
                Some(body) => {
                    let _ = request.respond(Response::from_data(body.clone()));
                }
                None => {
                    let _ = request.respond(Response::empty(404));
                }
            }
        }
    });

    TestServer { base_url, hits }
}

fn sha256_of(data: &[u8]) -> String {
    compute_checksum(data, ChecksumAlgorithm::Sha256)
}

#[test]
fn checksum_prefix_selects_md5() {
    let (algorithm, digest) = split_declared_checksum("md5:abad1dea");
    assert_eq!(algorithm, ChecksumAlgorithm::Md5);
    assert_eq!(digest, "abad1dea");

    let (algorithm, digest) = split_declared_checksum("deadbeef");
    assert_eq!(algorithm, ChecksumAlgorithm::Sha256);
    assert_eq!(digest, "deadbeef");
}

#[test]
fn download_verifies_and_caches() {
    let body = b"sample bitstream bytes".to_vec();
    let server = spawn_server(HashMap::from([("/clip.264".to_string(), body.clone())]));
    let dir = TempDir::new().unwrap();

    let resource = FetchableResource::new(
        format!("{}/clip.264", server.base_url),
        "clip.264",
        &sha256_of(&body),
        dir.path(),
    );
    let mut fetcher = SampleFetcher::new(vec![resource]);

    let mut out = Vec::new();
    assert!(fetcher.fetch_all(false, &mut out));

    let path = dir.path().join("clip.264");
    assert_eq!(fs::read(&path).unwrap(), body);
    assert_eq!(
        compute_file_checksum(&path, ChecksumAlgorithm::Sha256).unwrap(),
        sha256_of(&body)
    );
    assert_eq!(server.hits.load(Ordering::SeqCst), 1);

    // Second pass: file is current, no network access.
    let mut out = Vec::new();
    assert!(fetcher.fetch_all(false, &mut out));
    assert_eq!(server.hits.load(Ordering::SeqCst), 1);
}

#[test]
fn stale_file_is_refetched() {
    let body = b"fresh content".to_vec();
    let server = spawn_server(HashMap::from([("/clip.264".to_string(), body.clone())]));
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("clip.264"), b"stale content").unwrap();

    let resource = FetchableResource::new(
        format!("{}/clip.264", server.base_url),
        "clip.264",
        &sha256_of(&body),
        dir.path(),
    );
    let mut fetcher = SampleFetcher::new(vec![resource]);

    let mut out = Vec::new();
    assert!(fetcher.fetch_all(false, &mut out));
    assert_eq!(fs::read(dir.path().join("clip.264")).unwrap(), body);
}

#[test]
fn checksum_mismatch_leaves_no_partial_file() {
    let body = b"unexpected payload".to_vec();
    let server = spawn_server(HashMap::from([("/clip.264".to_string(), body)]));
    let dir = TempDir::new().unwrap();

    let resource = FetchableResource::new(
        format!("{}/clip.264", server.base_url),
        "clip.264",
        &sha256_of(b"expected payload"),
        dir.path(),
    );
    let mut fetcher = SampleFetcher::new(vec![resource]);

    let mut out = Vec::new();
    assert!(!fetcher.fetch_all(false, &mut out));
    assert!(!dir.path().join("clip.264").exists());

    let resource = &fetcher.resources()[0];
    assert!(resource.last_error().is_some());
    assert_eq!(
        resource.actual_checksum(),
        Some(sha256_of(b"unexpected payload").as_str())
    );
}

#[test]
fn batch_attempts_all_and_reports_only_failures() {
    let good_one = b"first asset".to_vec();
    let bad = b"corrupted asset".to_vec();
    let good_two = b"third asset".to_vec();
    let server = spawn_server(HashMap::from([
        ("/one.264".to_string(), good_one.clone()),
        ("/two.264".to_string(), bad),
        ("/three.264".to_string(), good_two.clone()),
    ]));
    let dir = TempDir::new().unwrap();

    let resources = vec![
        FetchableResource::new(
            format!("{}/one.264", server.base_url),
            "one.264",
            &sha256_of(&good_one),
            dir.path(),
        ),
        FetchableResource::new(
            format!("{}/two.264", server.base_url),
            "two.264",
            &sha256_of(b"pristine asset"),
            dir.path(),
        ),
        FetchableResource::new(
            format!("{}/three.264", server.base_url),
            "three.264",
            &sha256_of(&good_two),
            dir.path(),
        ),
    ];
    let mut fetcher = SampleFetcher::new(resources);

    let mut out = Vec::new();
    assert!(!fetcher.fetch_all(false, &mut out));

    // The failure did not stop later resources.
    assert!(dir.path().join("one.264").exists());
    assert!(!dir.path().join("two.264").exists());
    assert!(dir.path().join("three.264").exists());

    // Exactly the failed resource appears in the summary, with both digests.
    let report = String::from_utf8(out).unwrap();
    assert!(report.contains("DOWNLOAD FAILURES SUMMARY:"));
    assert!(report.contains("✗ two.264"));
    assert!(!report.contains("✗ one.264"));
    assert!(!report.contains("✗ three.264"));
    assert!(report.contains(&sha256_of(b"pristine asset")));
    assert!(report.contains(&sha256_of(b"corrupted asset")));
}

#[test]
fn http_error_is_recorded_not_raised() {
    let server = spawn_server(HashMap::new());
    let dir = TempDir::new().unwrap();

    let resource = FetchableResource::new(
        format!("{}/missing.264", server.base_url),
        "missing.264",
        &sha256_of(b"anything"),
        dir.path(),
    );
    let mut fetcher = SampleFetcher::new(vec![resource]);

    let mut out = Vec::new();
    assert!(!fetcher.fetch_all(false, &mut out));
    let resource = &fetcher.resources()[0];
    assert!(resource.last_error().is_some());
    assert!(resource.actual_checksum().is_none());
}
