// crates/vvtest-core/src/runtime/mod.rs
// ============================================================================
// Module: vvtest Runtime Helpers
// Description: Selection filtering, exit classification, driver detection.
// Purpose: Provide the pure decision logic consumed by the orchestration loop.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! Runtime helpers turn raw execution context into decisions: which samples
//! run, what a raw exit code means, and which driver the device layer
//! selected. All functions here are deterministic and take their context as
//! arguments; nothing reads process-global state.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod classify;
pub mod driver;
pub mod filter;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use classify::PlatformContext;
pub use classify::classify_exit_status;
pub use driver::DriverMapping;
pub use driver::DriverPlatform;
pub use driver::parse_driver_from_output;
pub use filter::FilterOptions;
pub use filter::SuiteFilter;
