// crates/vvtest-fetch/src/checksum.rs
// ============================================================================
// Module: vvtest Checksums
// Description: Hash computation for resource verification.
// Purpose: Provide streaming and in-memory digests over both algorithms.
// Dependencies: sha2, md-5
// ============================================================================

//! ## Overview
//! Declared checksums default to SHA-256; an `md5:` prefix selects MD5
//! (Fluster and Soothe catalogs publish MD5 digests). Digests are lowercase
//! hex. File hashing streams in fixed-size chunks so large bitstreams never
//! load fully into memory.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::fs::File;
use std::io;
use std::io::Read;
use std::path::Path;

use md5::Md5;
use sha2::Digest;
use sha2::Sha256;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Chunk size for streaming file reads.
const STREAMING_CHUNK_SIZE: usize = 64 * 1024;

/// Declared-checksum prefix selecting MD5.
const MD5_PREFIX: &str = "md5:";

// ============================================================================
// SECTION: Algorithm
// ============================================================================

/// Hash algorithm of a declared checksum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChecksumAlgorithm {
    /// SHA-256, the default.
    #[default]
    Sha256,
    /// MD5, selected by the `md5:` declaration prefix.
    Md5,
}

impl ChecksumAlgorithm {
    /// Uppercase label for failure reports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Sha256 => "SHA256",
            Self::Md5 => "MD5",
        }
    }
}

impl fmt::Display for ChecksumAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Splits a declared checksum into its algorithm and bare hex digest.
#[must_use]
pub fn split_declared_checksum(declared: &str) -> (ChecksumAlgorithm, &str) {
    declared.strip_prefix(MD5_PREFIX).map_or(
        (ChecksumAlgorithm::Sha256, declared),
        |digest| (ChecksumAlgorithm::Md5, digest),
    )
}

// ============================================================================
// SECTION: Digests
// ============================================================================

/// Renders a digest as lowercase hex.
fn to_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        out.push_str(&format!("{byte:02x}"));
    }
    out
}

/// Computes the checksum of in-memory data.
#[must_use]
pub fn compute_checksum(data: &[u8], algorithm: ChecksumAlgorithm) -> String {
    match algorithm {
        ChecksumAlgorithm::Sha256 => to_hex(Sha256::digest(data).as_slice()),
        ChecksumAlgorithm::Md5 => to_hex(Md5::digest(data).as_slice()),
    }
}

/// Streams a digest over `hasher` from `reader`.
fn stream_digest<D: Digest, R: Read>(mut hasher: D, mut reader: R) -> io::Result<String> {
    let mut chunk = vec![0_u8; STREAMING_CHUNK_SIZE];
    loop {
        let read = reader.read(&mut chunk)?;
        if read == 0 {
            break;
        }
        hasher.update(&chunk[..read]);
    }
    Ok(to_hex(hasher.finalize().as_slice()))
}

/// Computes the checksum of a file without loading it into memory.
///
/// # Errors
///
/// Returns an [`io::Error`] when the file cannot be opened or read.
pub fn compute_file_checksum(path: &Path, algorithm: ChecksumAlgorithm) -> io::Result<String> {
    let file = File::open(path)?;
    match algorithm {
        ChecksumAlgorithm::Sha256 => stream_digest(Sha256::new(), file),
        ChecksumAlgorithm::Md5 => stream_digest(Md5::new(), file),
    }
}
