// crates/vvtest-fetch/src/lib.rs
// ============================================================================
// Module: vvtest Fetch Library
// Description: Checksum-verified fetching of remote sample assets.
// Purpose: Keep sample files present and verified under partial failure.
// Dependencies: reqwest, sha2, md-5, thiserror
// ============================================================================

//! ## Overview
//! Sample assets are downloaded over HTTPS, hash-verified against a declared
//! checksum, and written to a caller-supplied resources root. Verification
//! failures never leave a partial file behind, never abort a batch, and are
//! reported once, aggregated, after every resource has been attempted.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod checksum;
pub mod fetcher;
pub mod resource;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use checksum::ChecksumAlgorithm;
pub use checksum::compute_checksum;
pub use checksum::compute_file_checksum;
pub use checksum::split_declared_checksum;
pub use fetcher::SampleFetcher;
pub use resource::FetchableResource;
