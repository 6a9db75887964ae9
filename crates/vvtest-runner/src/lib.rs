// crates/vvtest-runner/src/lib.rs
// ============================================================================
// Module: vvtest Runner Library
// Description: Harness contract, execution, orchestration, and reporting.
// Purpose: Turn selected samples into classified results and summaries.
// Dependencies: serde_json, thiserror, vvtest-core, vvtest-fetch
// ============================================================================

//! ## Overview
//! The runner drives the decoder and encoder executables over selected
//! samples. Command construction is pure, execution enforces per-test
//! deadlines, and every pre-invocation failure folds into an ERROR result
//! so a suite always runs to completion. The orchestration loop sees only
//! the three-method [`Harness`] contract and reports through an injected
//! writer.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod command;
pub mod decode;
pub mod encode;
pub mod exec;
pub mod harness;
pub mod report;
pub mod suite;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use command::build_decode_command;
pub use command::build_encode_command;
pub use command::encode_output_filename;
pub use command::output_extension;
pub use decode::DecodeHarness;
pub use encode::EncodeHarness;
pub use encode::scan_encoder_warnings;
pub use exec::DEFAULT_TEST_TIMEOUT;
pub use exec::ExecError;
pub use exec::ExecOutput;
pub use exec::run_with_timeout;
pub use harness::DownloadPolicy;
pub use harness::Harness;
pub use harness::HarnessConfig;
pub use harness::SuiteSelection;
pub use report::ReportError;
pub use report::export_results_json;
pub use report::write_sample_listing;
pub use report::write_summary;
pub use suite::RunOptions;
pub use suite::SuiteOutcome;
pub use suite::run_suite;
