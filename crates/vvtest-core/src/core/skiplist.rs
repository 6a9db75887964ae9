// crates/vvtest-core/src/core/skiplist.rs
// ============================================================================
// Module: vvtest Skip-List Rules
// Description: Skip rule data model and first-match rule evaluation.
// Purpose: Decide whether a named test case is skipped for a driver/platform.
// Dependencies: serde, crate::core::codec
// ============================================================================

//! ## Overview
//! A skip rule is a named, conditioned directive that a matching test case
//! should not run by default. Rules are immutable once loaded and are
//! evaluated in load order; the first rule whose predicates all hold wins,
//! so rule order encodes precedence among overlapping patterns.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::core::codec::TestType;

// ============================================================================
// SECTION: Vocabulary
// ============================================================================

/// Sentinel driver/platform entry matching any context.
pub const MATCH_ALL: &str = "all";

/// Test-suite format tags accepted in skip rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuiteFormat {
    /// Native sample-list format.
    Vvs,
    /// Fluster conformance suite format.
    Fluster,
    /// Soothe encoder asset catalog format.
    Soothe,
}

impl SuiteFormat {
    /// Lowercase tag used in documents.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Vvs => "vvs",
            Self::Fluster => "fluster",
            Self::Soothe => "soothe",
        }
    }
}

impl fmt::Display for SuiteFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How reliably a skipped failure reproduces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reproduction {
    /// The failure reproduces on every run.
    #[default]
    Always,
    /// The failure is intermittent.
    Flaky,
}

impl Reproduction {
    /// Lowercase tag used in documents.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::Flaky => "flaky",
        }
    }
}

// ============================================================================
// SECTION: Skip Filter Mode
// ============================================================================

/// Policy governing how rule-matched cases participate in selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkipFilter {
    /// Run everything except rule-matched cases; record those as skipped.
    #[default]
    Enabled,
    /// Run only rule-matched cases.
    Skipped,
    /// Run every case and ignore the skip list entirely.
    All,
}

impl SkipFilter {
    /// Lowercase tag used in exchange with collaborators.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Enabled => "enabled",
            Self::Skipped => "skipped",
            Self::All => "all",
        }
    }
}

// ============================================================================
// SECTION: Skip Rule
// ============================================================================

/// One skip directive, immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkipRule {
    /// Name pattern; may contain `*` / `?` wildcards.
    pub name: String,
    /// Test type this rule applies to.
    pub test_type: TestType,
    /// Suite format this rule applies to.
    pub format: SuiteFormat,
    /// Driver identifiers the rule covers, or the sentinel `all`.
    #[serde(default = "default_match_all")]
    pub drivers: Vec<String>,
    /// Platform identifiers the rule covers, or the sentinel `all`.
    #[serde(default = "default_match_all")]
    pub platforms: Vec<String>,
    /// Failure reproduction characteristic.
    #[serde(default)]
    pub reproduction: Reproduction,
    /// Free-text reason, advisory.
    #[serde(default)]
    pub reason: String,
    /// Tracking bug URL, advisory.
    #[serde(default)]
    pub bug_url: String,
    /// Date the rule was added, advisory.
    #[serde(default)]
    pub date_added: String,
}

/// Serde default for driver/platform sets.
fn default_match_all() -> Vec<String> {
    vec![MATCH_ALL.to_string()]
}

impl SkipRule {
    /// Creates a rule with defaults for every optional field.
    #[must_use]
    pub fn new(name: impl Into<String>, test_type: TestType, format: SuiteFormat) -> Self {
        Self {
            name: name.into(),
            test_type,
            format,
            drivers: default_match_all(),
            platforms: default_match_all(),
            reproduction: Reproduction::Always,
            reason: String::new(),
            bug_url: String::new(),
            date_added: String::new(),
        }
    }

    /// Returns true when the rule covers `driver`.
    #[must_use]
    pub fn covers_driver(&self, driver: &str) -> bool {
        self.drivers.iter().any(|d| d == MATCH_ALL || d == driver)
    }

    /// Returns true when the rule covers `platform`.
    #[must_use]
    pub fn covers_platform(&self, platform: &str) -> bool {
        self.platforms.iter().any(|p| p == MATCH_ALL || p == platform)
    }
}

// ============================================================================
// SECTION: Wildcard Matching
// ============================================================================

/// Glob-style match: `*` matches any run of characters (including empty),
/// `?` matches exactly one. Case-sensitive, anchored at both ends.
#[must_use]
pub fn wildcard_match(pattern: &str, text: &str) -> bool {
    let pat = pattern.as_bytes();
    let txt = text.as_bytes();
    let (mut p, mut t) = (0_usize, 0_usize);
    // Backtrack point for the most recent `*`.
    let mut star: Option<(usize, usize)> = None;

    while t < txt.len() {
        if p < pat.len() && (pat[p] == b'?' || pat[p] == txt[t]) {
            p += 1;
            t += 1;
        } else if p < pat.len() && pat[p] == b'*' {
            star = Some((p, t));
            p += 1;
        } else if let Some((star_p, star_t)) = star {
            // Let the last `*` absorb one more character.
            p = star_p + 1;
            t = star_t + 1;
            star = Some((star_p, star_t + 1));
        } else {
            return false;
        }
    }
    while p < pat.len() && pat[p] == b'*' {
        p += 1;
    }
    p == pat.len()
}

/// Returns true when `pattern` contains no wildcard metacharacters, making
/// any match an exact one.
#[must_use]
pub fn is_literal_pattern(pattern: &str) -> bool {
    !pattern.contains(['*', '?'])
}

// ============================================================================
// SECTION: Rule Evaluation
// ============================================================================

/// Finds the first rule (in load order) matching the candidate test case.
///
/// A rule matches iff its test type and format equal the candidate's, its
/// name pattern matches `name`, and its driver set covers `current_driver`
/// (the driver check is skipped when no driver context is supplied).
/// Platform coverage is checked only when `current_platform` is supplied.
#[must_use]
pub fn find_skip_rule<'a>(
    name: &str,
    format: SuiteFormat,
    rules: &'a [SkipRule],
    current_driver: Option<&str>,
    current_platform: Option<&str>,
    test_type: TestType,
) -> Option<&'a SkipRule> {
    rules.iter().find(|rule| {
        rule.test_type == test_type
            && rule.format == format
            && (rule.name == name || wildcard_match(&rule.name, name))
            && current_driver.is_none_or(|driver| rule.covers_driver(driver))
            && current_platform.is_none_or(|platform| rule.covers_platform(platform))
    })
}
