// crates/vvtest-config/src/skip_file.rs
// ============================================================================
// Module: vvtest Skip-List Loading
// Description: Parses and validates skip-list JSON documents.
// Purpose: Produce the ordered rule sequence consumed by the rule engine.
// Dependencies: vvtest-core, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! The current document shape holds rules partitioned into `decode` and
//! `encode` arrays; a legacy shape holds a single `skipped_tests` array whose
//! entries carry their own `type` field. Both shapes normalize into one rule
//! sequence, decode entries before encode entries. A missing file loads as an
//! empty rule set; malformed JSON or invalid enumerated fields are fatal.
//! Missing advisory fields (`reason`, `date_added`) produce warnings, not
//! errors.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use vvtest_core::Reproduction;
use vvtest_core::SkipRule;
use vvtest_core::SuiteFormat;
use vvtest_core::TestType;

// ============================================================================
// SECTION: Vocabulary
// ============================================================================

/// Driver identifiers accepted in skip rules.
const VALID_DRIVERS: [&str; 13] = [
    "all",
    "nvidia",
    "nvk",
    "amd",
    "radv",
    "intel",
    "anv",
    "arm",
    "qualcomm",
    "broadcom",
    "mesa",
    "swiftshader",
    "llvmpipe",
];

/// Platform identifiers accepted in skip rules.
const VALID_PLATFORMS: [&str; 3] = ["all", "linux", "windows"];

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Error loading or validating a skip-list document.
#[derive(Debug, Error)]
pub enum SkipListError {
    /// Filesystem error reading the document.
    #[error("skip list io error: {0}")]
    Io(String),
    /// The document is not valid JSON or not a recognized shape.
    #[error("skip list parse error: {0}")]
    Parse(String),
    /// A rule entry carries an invalid field value.
    #[error("skip list invalid: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Document Shapes
// ============================================================================

/// Raw rule entry as it appears on disk; everything optional so validation
/// can report missing fields by name instead of a bare serde error.
#[derive(Debug, Clone, Deserialize)]
struct RawRule {
    /// Name pattern.
    name: Option<String>,
    /// Test type; present only in the legacy shape.
    #[serde(rename = "type")]
    test_type: Option<String>,
    /// Suite format tag.
    format: Option<String>,
    /// Driver identifiers.
    drivers: Option<Vec<String>>,
    /// Platform identifiers.
    platforms: Option<Vec<String>>,
    /// Reproduction characteristic.
    reproduction: Option<String>,
    /// Advisory reason text.
    reason: Option<String>,
    /// Advisory tracking bug URL.
    bug_url: Option<String>,
    /// Advisory addition date.
    date_added: Option<String>,
}

/// Top-level document; both the current and the legacy shape deserialize
/// into this, distinguished by which arrays are present.
#[derive(Debug, Deserialize)]
struct RawDocument {
    /// Informational document version.
    #[serde(default)]
    #[allow(dead_code, reason = "Parsed for shape validation, informational only.")]
    version: Option<String>,
    /// Decode rules in the current shape.
    #[serde(default)]
    decode: Vec<RawRule>,
    /// Encode rules in the current shape.
    #[serde(default)]
    encode: Vec<RawRule>,
    /// Legacy flat rule array with inline `type` fields.
    #[serde(default)]
    skipped_tests: Option<Vec<RawRule>>,
}

// ============================================================================
// SECTION: Loaded Result
// ============================================================================

/// A validated skip list plus non-fatal validation warnings.
#[derive(Debug, Default)]
pub struct LoadedSkipList {
    /// Rules in precedence order: decode entries, then encode entries.
    pub rules: Vec<SkipRule>,
    /// Advisory-field warnings, one per affected rule field.
    pub warnings: Vec<String>,
}

// ============================================================================
// SECTION: Validation
// ============================================================================

/// Parses an enumerated string field against its fixed vocabulary.
fn parse_format(value: &str, context: &str) -> Result<SuiteFormat, SkipListError> {
    match value {
        "vvs" => Ok(SuiteFormat::Vvs),
        "fluster" => Ok(SuiteFormat::Fluster),
        "soothe" => Ok(SuiteFormat::Soothe),
        other => Err(SkipListError::Invalid(format!(
            "{context}: unknown format {other:?} (expected vvs, fluster, or soothe)"
        ))),
    }
}

/// Parses a rule `type` field.
fn parse_test_type(value: &str, context: &str) -> Result<TestType, SkipListError> {
    match value {
        "decode" => Ok(TestType::Decode),
        "encode" => Ok(TestType::Encode),
        other => Err(SkipListError::Invalid(format!(
            "{context}: unknown type {other:?} (expected decode or encode)"
        ))),
    }
}

/// Parses a rule `reproduction` field.
fn parse_reproduction(value: &str, context: &str) -> Result<Reproduction, SkipListError> {
    match value {
        "always" => Ok(Reproduction::Always),
        "flaky" => Ok(Reproduction::Flaky),
        other => Err(SkipListError::Invalid(format!(
            "{context}: unknown reproduction {other:?} (expected always or flaky)"
        ))),
    }
}

/// Checks every entry of a driver or platform list against its vocabulary.
fn check_identifiers(
    values: &[String],
    vocabulary: &[&str],
    field: &str,
    context: &str,
) -> Result<(), SkipListError> {
    for value in values {
        if !vocabulary.contains(&value.as_str()) {
            return Err(SkipListError::Invalid(format!(
                "{context}: unknown {field} {value:?}"
            )));
        }
    }
    Ok(())
}

/// Validates one raw entry into a [`SkipRule`], appending advisory warnings.
fn validate_rule(
    raw: RawRule,
    test_type: TestType,
    context: &str,
    warnings: &mut Vec<String>,
) -> Result<SkipRule, SkipListError> {
    let Some(name) = raw.name.filter(|n| !n.is_empty()) else {
        return Err(SkipListError::Invalid(format!("{context}: missing name")));
    };
    let context = format!("{context} ({name})");

    let Some(format) = raw.format.as_deref() else {
        return Err(SkipListError::Invalid(format!("{context}: missing format")));
    };
    let format = parse_format(format, &context)?;

    let drivers = raw.drivers.unwrap_or_else(|| vec!["all".to_string()]);
    check_identifiers(&drivers, &VALID_DRIVERS, "driver", &context)?;
    let platforms = raw.platforms.unwrap_or_else(|| vec!["all".to_string()]);
    check_identifiers(&platforms, &VALID_PLATFORMS, "platform", &context)?;

    let reproduction = match raw.reproduction.as_deref() {
        Some(value) => parse_reproduction(value, &context)?,
        None => Reproduction::Always,
    };

    if raw.reason.as_deref().is_none_or(str::is_empty) {
        warnings.push(format!("{context}: missing reason"));
    }
    if raw.date_added.as_deref().is_none_or(str::is_empty) {
        warnings.push(format!("{context}: missing date_added"));
    }

    Ok(SkipRule {
        name,
        test_type,
        format,
        drivers,
        platforms,
        reproduction,
        reason: raw.reason.unwrap_or_default(),
        bug_url: raw.bug_url.unwrap_or_default(),
        date_added: raw.date_added.unwrap_or_default(),
    })
}

// ============================================================================
// SECTION: Loading
// ============================================================================

/// Loads and validates a skip-list document.
///
/// A missing file is not an error and yields an empty rule set. Rules are
/// normalized into one sequence regardless of document shape: decode entries
/// first, then encode entries, each partition in document order.
///
/// # Errors
///
/// Returns [`SkipListError`] when the file cannot be read, is not valid
/// JSON, or any rule entry fails field validation.
pub fn load_skip_list(path: &Path) -> Result<LoadedSkipList, SkipListError> {
    if !path.exists() {
        return Ok(LoadedSkipList::default());
    }
    let content = fs::read_to_string(path).map_err(|err| SkipListError::Io(err.to_string()))?;
    let document: RawDocument = serde_json::from_str(&content)
        .map_err(|err| SkipListError::Parse(format!("{}: {err}", path.display())))?;

    let mut loaded = LoadedSkipList::default();

    if let Some(legacy) = document.skipped_tests {
        // Legacy shape: each entry names its own type; decode entries are
        // normalized ahead of encode entries.
        let mut encode_rules = Vec::new();
        for (index, raw) in legacy.into_iter().enumerate() {
            let context = format!("skipped_tests[{index}]");
            let Some(type_value) = raw.test_type.as_deref() else {
                return Err(SkipListError::Invalid(format!("{context}: missing type")));
            };
            let test_type = parse_test_type(type_value, &context)?;
            let rule = validate_rule(raw, test_type, &context, &mut loaded.warnings)?;
            match test_type {
                TestType::Decode => loaded.rules.push(rule),
                TestType::Encode => encode_rules.push(rule),
            }
        }
        loaded.rules.append(&mut encode_rules);
        return Ok(loaded);
    }

    for (index, raw) in document.decode.into_iter().enumerate() {
        let context = format!("decode[{index}]");
        let rule = validate_rule(raw, TestType::Decode, &context, &mut loaded.warnings)?;
        loaded.rules.push(rule);
    }
    for (index, raw) in document.encode.into_iter().enumerate() {
        let context = format!("encode[{index}]");
        let rule = validate_rule(raw, TestType::Encode, &context, &mut loaded.warnings)?;
        loaded.rules.push(rule);
    }
    Ok(loaded)
}
