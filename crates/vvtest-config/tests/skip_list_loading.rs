// crates/vvtest-config/tests/skip_list_loading.rs
// ============================================================================
// Module: Skip-List Loading Tests
// Description: Validate document parsing, normalization, and validation.
// Purpose: Ensure both document shapes load and bad fields fail closed.
// Dependencies: vvtest-config, vvtest-core, serde_json, tempfile
// ============================================================================

//! Skip-list document loading and validation tests.

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
use std::path::Path;
use std::path::PathBuf;

use serde_json::json;
use tempfile::TempDir;
use vvtest_config::SkipListError;
use vvtest_config::load_skip_list;
use vvtest_core::Reproduction;
use vvtest_core::SuiteFormat;
use vvtest_core::TestType;

fn write_document(dir: &TempDir, value: &serde_json::Value) -> PathBuf {
    let path = dir.path().join("skip_list.json");
    fs::write(&path, serde_json::to_vec_pretty(value).unwrap()).unwrap();
    path
}

#[test]
fn loads_current_shape_decode_then_encode() {
    let dir = TempDir::new().unwrap();
    let path = write_document(
        &dir,
        &json!({
            "version": "1.0",
            "decode": [
                {"name": "decode_only", "format": "vvs", "reason": "broken", "date_added": "2025-01-27"}
            ],
            "encode": [
                {"name": "encode_only", "format": "vvs", "reason": "broken", "date_added": "2025-01-27"}
            ]
        }),
    );

    let loaded = load_skip_list(&path).unwrap();
    assert_eq!(loaded.rules.len(), 2);
    assert_eq!(loaded.rules[0].name, "decode_only");
    assert_eq!(loaded.rules[0].test_type, TestType::Decode);
    assert_eq!(loaded.rules[1].name, "encode_only");
    assert_eq!(loaded.rules[1].test_type, TestType::Encode);
    assert!(loaded.warnings.is_empty());
}

#[test]
fn loads_legacy_shape_with_inline_type() {
    let dir = TempDir::new().unwrap();
    let path = write_document(
        &dir,
        &json!({
            "version": "1.0",
            "skipped_tests": [
                {"name": "enc", "type": "encode", "format": "vvs"},
                {"name": "dec", "type": "decode", "format": "fluster"}
            ]
        }),
    );

    let loaded = load_skip_list(&path).unwrap();
    // Decode entries are normalized ahead of encode entries.
    assert_eq!(loaded.rules[0].name, "dec");
    assert_eq!(loaded.rules[0].format, SuiteFormat::Fluster);
    assert_eq!(loaded.rules[1].name, "enc");
    assert_eq!(loaded.rules[1].test_type, TestType::Encode);
}

#[test]
fn missing_file_loads_as_empty_rule_set() {
    let loaded = load_skip_list(Path::new("/nonexistent/skip_list.json")).unwrap();
    assert!(loaded.rules.is_empty());
    assert!(loaded.warnings.is_empty());
}

#[test]
fn missing_optional_fields_take_defaults() {
    let dir = TempDir::new().unwrap();
    let path = write_document(
        &dir,
        &json!({
            "decode": [],
            "encode": [{"name": "minimal", "format": "fluster"}]
        }),
    );

    let loaded = load_skip_list(&path).unwrap();
    let rule = &loaded.rules[0];
    assert_eq!(rule.drivers, vec!["all".to_string()]);
    assert_eq!(rule.platforms, vec!["all".to_string()]);
    assert_eq!(rule.reproduction, Reproduction::Always);
    assert!(rule.reason.is_empty());
}

#[test]
fn missing_advisory_fields_warn_without_failing() {
    let dir = TempDir::new().unwrap();
    let path = write_document(
        &dir,
        &json!({
            "decode": [{"name": "undocumented", "format": "vvs"}],
            "encode": []
        }),
    );

    let loaded = load_skip_list(&path).unwrap();
    assert_eq!(loaded.rules.len(), 1);
    assert!(loaded.warnings.iter().any(|w| w.contains("missing reason")));
    assert!(loaded.warnings.iter().any(|w| w.contains("missing date_added")));
}

#[test]
fn malformed_json_is_a_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("skip_list.json");
    fs::write(&path, b"{not json").unwrap();

    let err = load_skip_list(&path).unwrap_err();
    assert!(matches!(err, SkipListError::Parse(_)));
}

#[test]
fn entry_without_name_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_document(
        &dir,
        &json!({"decode": [{"format": "vvs"}], "encode": []}),
    );

    let err = load_skip_list(&path).unwrap_err();
    assert!(matches!(err, SkipListError::Invalid(msg) if msg.contains("missing name")));
}

#[test]
fn unknown_enumerated_values_are_rejected() {
    let dir = TempDir::new().unwrap();

    let bad_format = write_document(
        &dir,
        &json!({"decode": [{"name": "a", "format": "mystery"}], "encode": []}),
    );
    assert!(matches!(
        load_skip_list(&bad_format).unwrap_err(),
        SkipListError::Invalid(msg) if msg.contains("unknown format")
    ));

    let bad_driver = write_document(
        &dir,
        &json!({"decode": [{"name": "a", "format": "vvs", "drivers": ["warp"]}], "encode": []}),
    );
    assert!(matches!(
        load_skip_list(&bad_driver).unwrap_err(),
        SkipListError::Invalid(msg) if msg.contains("unknown driver")
    ));

    let bad_platform = write_document(
        &dir,
        &json!({"decode": [{"name": "a", "format": "vvs", "platforms": ["beos"]}], "encode": []}),
    );
    assert!(matches!(
        load_skip_list(&bad_platform).unwrap_err(),
        SkipListError::Invalid(msg) if msg.contains("unknown platform")
    ));

    let bad_repro = write_document(
        &dir,
        &json!({"decode": [{"name": "a", "format": "vvs", "reproduction": "sometimes"}], "encode": []}),
    );
    assert!(matches!(
        load_skip_list(&bad_repro).unwrap_err(),
        SkipListError::Invalid(msg) if msg.contains("unknown reproduction")
    ));
}

#[test]
fn legacy_entry_without_type_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_document(
        &dir,
        &json!({"skipped_tests": [{"name": "a", "format": "vvs"}]}),
    );

    let err = load_skip_list(&path).unwrap_err();
    assert!(matches!(err, SkipListError::Invalid(msg) if msg.contains("missing type")));
}
