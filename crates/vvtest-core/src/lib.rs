// crates/vvtest-core/src/lib.rs
// ============================================================================
// Module: vvtest Core Library
// Description: Public API surface for the vvtest core.
// Purpose: Expose the test data model, skip-list engine, and runtime helpers.
// Dependencies: crate::{core, runtime}
// ============================================================================

//! ## Overview
//! vvtest core provides the shared data model for codec conformance test
//! orchestration: test samples, skip-list rules, selection filtering, and
//! exit-status classification. It is executable-agnostic and integrates with
//! concrete decode/encode harnesses through explicit interfaces.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::*;

pub use runtime::DriverMapping;
pub use runtime::DriverPlatform;
pub use runtime::FilterOptions;
pub use runtime::PlatformContext;
pub use runtime::SuiteFilter;
pub use runtime::classify_exit_status;
pub use runtime::parse_driver_from_output;
