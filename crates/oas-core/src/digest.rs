//! # Content Digest: SHA-256 Integrity Fingerprints
//!
//! Defines [`ContentDigest`], the 64-hex-char SHA-256 fingerprint that is
//! the integrity contract of the transfer pipeline.
//!
//! ## Integrity Invariant
//!
//! A digest is always computed over the *original* artifact bytes, before
//! any compression is applied. Pushing the same payload compressed and
//! uncompressed must yield the same digest; the digest is what a client
//! uses to verify round-trip correctness.

use std::io::Read;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Errors from parsing a hex digest string.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DigestError {
    /// The string is not 64 characters long.
    #[error("digest must be 64 hex chars, got {0} chars")]
    InvalidLength(usize),

    /// The string contains a non-hexadecimal character.
    #[error("digest contains non-hex characters")]
    InvalidHex,
}

/// A SHA-256 content digest.
///
/// Rendered as a 64-character lowercase hex string. Constructed either by
/// hashing bytes ([`sha256_digest`], [`ContentDigest::from_reader`]) or by
/// parsing a caller-supplied hex string ([`ContentDigest::from_hex`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentDigest([u8; 32]);

impl ContentDigest {
    /// Parse a digest from a hex string.
    ///
    /// Accepts uppercase input and normalizes to lowercase. Rejects strings
    /// that are not exactly 64 hex characters.
    pub fn from_hex(s: &str) -> Result<Self, DigestError> {
        let s = s.trim();
        if s.len() != 64 {
            return Err(DigestError::InvalidLength(s.len()));
        }
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s.to_lowercase(), &mut bytes).map_err(|_| DigestError::InvalidHex)?;
        Ok(Self(bytes))
    }

    /// Compute a digest by streaming a reader through SHA-256.
    ///
    /// Used for request-scoped temporary files so the payload is never held
    /// in memory a second time just for hashing.
    pub fn from_reader(mut reader: impl Read) -> std::io::Result<Self> {
        let mut hasher = Sha256::new();
        let mut buf = [0u8; 64 * 1024];
        loop {
            let n = reader.read(&mut buf)?;
            if n == 0 {
                break;
            }
            hasher.update(&buf[..n]);
        }
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&hasher.finalize());
        Ok(Self(bytes))
    }

    /// Render the digest as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Return the raw 32-byte digest value.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl std::fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Compute a SHA-256 content digest over a byte slice.
pub fn sha256_digest(data: &[u8]) -> ContentDigest {
    let hash = Sha256::digest(data);
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&hash);
    ContentDigest(bytes)
}
