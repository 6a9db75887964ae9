// crates/vvtest-config/tests/suite_loading.rs
// ============================================================================
// Module: Suite Loading Tests
// Description: Validate native, Fluster, and Soothe suite conversion.
// Purpose: Ensure all three document shapes normalize into samples.
// Dependencies: vvtest-config, vvtest-core, serde_json, tempfile
// ============================================================================

//! Test-suite document loading tests.

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
use std::path::PathBuf;

use serde_json::json;
use tempfile::TempDir;
use vvtest_config::SuiteError;
use vvtest_config::load_test_suite;
use vvtest_core::CodecType;
use vvtest_core::SuiteFormat;
use vvtest_core::TestType;

fn write_document(dir: &TempDir, value: &serde_json::Value) -> PathBuf {
    let path = dir.path().join("suite.json");
    fs::write(&path, serde_json::to_vec_pretty(value).unwrap()).unwrap();
    path
}

#[test]
fn loads_native_decode_suite() {
    let dir = TempDir::new().unwrap();
    let path = write_document(
        &dir,
        &json!({
            "samples": [
                {
                    "name": "h264_basic",
                    "codec": "h264",
                    "description": "Basic H.264 clip",
                    "source_url": "https://samples.example/h264_basic.mp4",
                    "source_filepath": "h264/h264_basic.mp4",
                    "source_checksum": "0123abcd",
                    "timeout": 120
                },
                {"name": "av1_no_asset", "codec": "av1", "enabled": false}
            ]
        }),
    );

    let suite = load_test_suite(&path, TestType::Decode).unwrap();
    assert_eq!(suite.format, SuiteFormat::Vvs);
    assert_eq!(suite.samples.len(), 2);

    let first = &suite.samples[0];
    assert_eq!(first.codec, CodecType::H264);
    assert_eq!(first.timeout_secs, Some(120));
    let source = first.source.as_ref().unwrap();
    assert_eq!(source.filepath, "h264/h264_basic.mp4");
    assert!(first.encode.is_none());

    let second = &suite.samples[1];
    assert!(!second.enabled);
    assert!(second.source.is_none());
}

#[test]
fn native_encode_suite_carries_encode_params() {
    let dir = TempDir::new().unwrap();
    let path = write_document(
        &dir,
        &json!({
            "samples": [
                {
                    "name": "yuv_420",
                    "codec": "h265",
                    "width": 1920,
                    "height": 1080,
                    "profile": "main10",
                    "source_format": "yuv"
                },
                {"name": "y4m_clip", "codec": "h264", "source_format": "y4m"}
            ]
        }),
    );

    let suite = load_test_suite(&path, TestType::Encode).unwrap();
    let raw = suite.samples[0].encode.as_ref().unwrap();
    assert_eq!(raw.width, 1920);
    assert_eq!(raw.height, 1080);
    assert_eq!(raw.profile.as_deref(), Some("main10"));
    assert!(!raw.y4m);

    let y4m = suite.samples[1].encode.as_ref().unwrap();
    assert!(y4m.y4m);
}

#[test]
fn unknown_codec_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_document(
        &dir,
        &json!({"samples": [{"name": "bad", "codec": "mpeg2"}]}),
    );

    let err = load_test_suite(&path, TestType::Decode).unwrap_err();
    assert!(matches!(err, SuiteError::Invalid(msg) if msg.contains("unknown codec")));
}

#[test]
fn loads_fluster_suite_for_decode() {
    let dir = TempDir::new().unwrap();
    let path = write_document(
        &dir,
        &json!({
            "name": "JVT-AVC_V1",
            "codec": "H.264",
            "test_vectors": [
                {
                    "name": "AUD_MW_E",
                    "source": "https://vectors.example/AUD_MW_E.zip",
                    "source_checksum": "feedbeef",
                    "input_file": "AUD_MW_E.264"
                },
                {
                    "name": "BA1_FT_C",
                    "source": "https://vectors.example/BA1_FT_C.264",
                    "source_checksum": "cafef00d",
                    "input_file": "BA1_FT_C.264"
                }
            ]
        }),
    );

    let suite = load_test_suite(&path, TestType::Decode).unwrap();
    assert_eq!(suite.format, SuiteFormat::Fluster);
    assert_eq!(suite.samples.len(), 2);

    // Zip-packed vectors are provisioned out of band: no URL, no checksum.
    let zipped = &suite.samples[0];
    assert_eq!(zipped.name, "jvt-avc_v1_aud_mw_e");
    let zipped_source = zipped.source.as_ref().unwrap();
    assert!(zipped_source.url.is_empty());
    assert!(zipped_source.checksum.is_empty());
    assert_eq!(zipped_source.filepath, "fluster/h264/JVT-AVC_V1/AUD_MW_E.264");

    // Directly hosted vectors keep their URL and get the md5: prefix.
    let direct_source = suite.samples[1].source.as_ref().unwrap();
    assert_eq!(direct_source.url, "https://vectors.example/BA1_FT_C.264");
    assert_eq!(direct_source.checksum, "md5:cafef00d");
}

#[test]
fn fluster_suite_is_decode_only() {
    let dir = TempDir::new().unwrap();
    let path = write_document(
        &dir,
        &json!({"name": "S", "codec": "H.264", "test_vectors": []}),
    );

    let err = load_test_suite(&path, TestType::Encode).unwrap_err();
    assert!(matches!(err, SuiteError::Invalid(msg) if msg.contains("decode")));
}

#[test]
fn loads_soothe_catalog_for_encode() {
    let dir = TempDir::new().unwrap();
    let path = write_document(
        &dir,
        &json!({
            "name": "Soothe 1.0",
            "assets": [
                {
                    "name": "park_joy",
                    "source": "https://assets.example/park_joy.y4m",
                    "checksum": "abad1dea",
                    "filename": "park_joy.y4m"
                },
                {"name": "incomplete_entry"}
            ]
        }),
    );

    let suite = load_test_suite(&path, TestType::Encode).unwrap();
    assert_eq!(suite.format, SuiteFormat::Soothe);
    // One sample per codec; the incomplete entry is dropped.
    assert_eq!(suite.samples.len(), 3);
    let names: Vec<&str> = suite.samples.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["park_joy_h264", "park_joy_h265", "park_joy_av1"]);

    let first = &suite.samples[0];
    let source = first.source.as_ref().unwrap();
    assert_eq!(source.filepath, "soothe/soothe_1_0/park_joy.y4m");
    assert_eq!(source.checksum, "md5:abad1dea");
    assert!(first.encode.as_ref().unwrap().y4m);
}

#[test]
fn soothe_catalog_is_encode_only() {
    let dir = TempDir::new().unwrap();
    let path = write_document(&dir, &json!({"name": "S", "assets": []}));

    let err = load_test_suite(&path, TestType::Decode).unwrap_err();
    assert!(matches!(err, SuiteError::Invalid(msg) if msg.contains("encode")));
}

#[test]
fn unrecognized_shape_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_document(&dir, &json!({"version": "1.0"}));

    let err = load_test_suite(&path, TestType::Decode).unwrap_err();
    assert!(matches!(err, SuiteError::Invalid(msg) if msg.contains("unrecognized")));
}

#[test]
fn missing_file_is_an_io_error() {
    let err = load_test_suite(std::path::Path::new("/nonexistent/suite.json"), TestType::Decode)
        .unwrap_err();
    assert!(matches!(err, SuiteError::Io(_)));
}
