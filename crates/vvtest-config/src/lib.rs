// crates/vvtest-config/src/lib.rs
// ============================================================================
// Module: vvtest Config Library
// Description: Loading and validation of on-disk test input documents.
// Purpose: Turn skip-list and suite JSON files into validated models.
// Dependencies: vvtest-core, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Two document families are loaded here: skip lists (rule documents gating
//! which tests run) and test suites (sample catalogs in the native, Fluster,
//! or Soothe shapes). Parsing is fail-closed: malformed JSON or invalid
//! enumerated fields abort the operation with a field-level diagnostic. The
//! single deliberate exception is a missing skip-list file, which loads as an
//! empty rule set.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod skip_file;
pub mod suite;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use skip_file::LoadedSkipList;
pub use skip_file::SkipListError;
pub use skip_file::load_skip_list;
pub use suite::SuiteError;
pub use suite::SuiteLoad;
pub use suite::load_test_suite;
