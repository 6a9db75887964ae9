// crates/vvtest-core/src/core/mod.rs
// ============================================================================
// Module: vvtest Core Data Model
// Description: Shared types for samples, statuses, and skip rules.
// Purpose: Provide the immutable data model consumed by runtime and harnesses.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! The core data model is constructed once by suite loading and consumed
//! read-only by the selection filter and orchestration loop. Nothing in this
//! module performs I/O.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod codec;
pub mod sample;
pub mod skiplist;
pub mod status;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use codec::CodecType;
pub use codec::TestType;
pub use sample::EncodeParams;
pub use sample::SampleConfig;
pub use sample::SampleSource;
pub use sample::TestResult;
pub use skiplist::Reproduction;
pub use skiplist::SkipFilter;
pub use skiplist::SkipRule;
pub use skiplist::SuiteFormat;
pub use skiplist::find_skip_rule;
pub use skiplist::is_literal_pattern;
pub use skiplist::wildcard_match;
pub use status::VideoTestStatus;
