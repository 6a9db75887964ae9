// crates/vvtest-core/src/runtime/filter.rs
// ============================================================================
// Module: vvtest Test Selection Filter
// Description: Composes codec, name-pattern, and skip-list filtering.
// Purpose: Produce the ordered list of samples the orchestration loop runs.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! Selection is stable: it never reorders samples, only removes them. Filters
//! apply in a fixed order (codec, then name pattern, then skip list), and an
//! exact name request always forces execution of a rule-skipped or disabled
//! sample. The skipped-names record is instance-scoped state rebuilt on every
//! [`SuiteFilter::filter`] call; a filter instance is not safe for concurrent
//! `filter` calls.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use crate::core::codec::TestType;
use crate::core::sample::SampleConfig;
use crate::core::skiplist::SkipFilter;
use crate::core::skiplist::SkipRule;
use crate::core::skiplist::SuiteFormat;
use crate::core::skiplist::find_skip_rule;
use crate::core::skiplist::is_literal_pattern;
use crate::core::skiplist::wildcard_match;

// ============================================================================
// SECTION: Filter Options
// ============================================================================

/// Per-call selection parameters.
#[derive(Debug, Clone, Default)]
pub struct FilterOptions {
    /// Retain only samples of this codec (canonical short name,
    /// case-insensitive). `None` retains all codecs.
    pub codec_filter: Option<String>,
    /// Retain only samples whose base or display name matches this
    /// exact-or-wildcard pattern. `None` retains all names.
    pub test_pattern: Option<String>,
    /// Skip-list participation policy.
    pub skip_filter: SkipFilter,
    /// Driver context handed to rule evaluation; `None` skips the
    /// driver predicate entirely.
    pub current_driver: Option<String>,
}

impl FilterOptions {
    /// Returns true when `test_pattern` is an exact request for the
    /// given base or display name. Only a pattern free of wildcard
    /// metacharacters counts; a wildcard that happens to spell the
    /// same string does not.
    fn is_exact_request(&self, base_name: &str, display_name: &str) -> bool {
        self.test_pattern.as_deref().is_some_and(|pattern| {
            is_literal_pattern(pattern) && (pattern == base_name || pattern == display_name)
        })
    }

    /// Returns true when `test_pattern` retains the given names.
    fn pattern_matches(&self, base_name: &str, display_name: &str) -> bool {
        self.test_pattern.as_deref().is_none_or(|pattern| {
            pattern == base_name
                || pattern == display_name
                || wildcard_match(pattern, base_name)
                || wildcard_match(pattern, display_name)
        })
    }
}

// ============================================================================
// SECTION: Suite Filter
// ============================================================================

/// Selection engine for one test suite.
///
/// Holds the loaded skip rules plus the mutable records populated as a side
/// effect of filtering: skipped display names mapped to the rule that matched
/// them, and display names excluded because the sample is disabled.
#[derive(Debug, Clone)]
pub struct SuiteFilter {
    /// Suite format evaluated against rule `format` fields.
    format: SuiteFormat,
    /// Test type evaluated against rule `test_type` fields.
    test_type: TestType,
    /// Skip rules in load order; order encodes precedence.
    rules: Vec<SkipRule>,
    /// Display name to matched rule, rebuilt per `filter` call.
    skipped: BTreeMap<String, SkipRule>,
    /// Display names excluded because the sample is disabled.
    disabled: Vec<String>,
}

impl SuiteFilter {
    /// Creates a filter for one suite format and test type.
    #[must_use]
    pub fn new(format: SuiteFormat, test_type: TestType, rules: Vec<SkipRule>) -> Self {
        Self {
            format,
            test_type,
            rules,
            skipped: BTreeMap::new(),
            disabled: Vec::new(),
        }
    }

    /// The loaded skip rules, in precedence order.
    #[must_use]
    pub fn rules(&self) -> &[SkipRule] {
        &self.rules
    }

    /// Display names recorded as skipped by the most recent `filter`
    /// call, mapped to the rule that matched them.
    #[must_use]
    pub fn skipped(&self) -> &BTreeMap<String, SkipRule> {
        &self.skipped
    }

    /// Display names excluded as disabled by the most recent `filter`
    /// call.
    #[must_use]
    pub fn disabled(&self) -> &[String] {
        &self.disabled
    }

    /// Evaluates one sample name against the skip rules.
    #[must_use]
    pub fn find_rule(&self, name: &str, current_driver: Option<&str>) -> Option<&SkipRule> {
        find_skip_rule(
            name,
            self.format,
            &self.rules,
            current_driver,
            None,
            self.test_type,
        )
    }

    /// Selects the surviving samples, in input order.
    ///
    /// Filters apply in a fixed sequence: codec, name pattern, then the
    /// skip policy of [`FilterOptions::skip_filter`]. Under
    /// [`SkipFilter::Enabled`], every surviving sample stays in the
    /// result; a rule-matched sample is additionally recorded as skipped
    /// unless the request pattern names it exactly, and callers exclude
    /// recorded names from execution. Disabled samples are excluded and
    /// recorded unless exactly requested. Under [`SkipFilter::Skipped`],
    /// only rule-matched samples are kept. Under [`SkipFilter::All`], the
    /// skip list is ignored and the records stay empty.
    ///
    /// Rules are evaluated against the display name first, then the base
    /// name, so a rule may be authored in either form.
    ///
    /// An empty result is a legitimate terminal state, not an error.
    pub fn filter(&mut self, samples: &[SampleConfig], options: &FilterOptions) -> Vec<SampleConfig> {
        self.skipped.clear();
        self.disabled.clear();

        let mut selected = Vec::new();
        for sample in samples {
            if let Some(codec) = options.codec_filter.as_deref()
                && !sample.codec.matches_filter(codec)
            {
                continue;
            }

            let display_name = sample.display_name(self.test_type);
            if !options.pattern_matches(&sample.name, &display_name) {
                continue;
            }
            let exact = options.is_exact_request(&sample.name, &display_name);

            let rule = self
                .find_rule(&display_name, options.current_driver.as_deref())
                .or_else(|| self.find_rule(&sample.name, options.current_driver.as_deref()));
            match options.skip_filter {
                SkipFilter::Enabled => {
                    if let Some(rule) = rule
                        && !exact
                    {
                        self.skipped.insert(display_name, rule.clone());
                        selected.push(sample.clone());
                        continue;
                    }
                    if !sample.enabled && !exact {
                        self.disabled.push(display_name);
                        continue;
                    }
                    selected.push(sample.clone());
                }
                SkipFilter::Skipped => {
                    if let Some(rule) = rule {
                        self.skipped.insert(display_name, rule.clone());
                        selected.push(sample.clone());
                    }
                }
                SkipFilter::All => {
                    selected.push(sample.clone());
                }
            }
        }
        selected
    }
}
