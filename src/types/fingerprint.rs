//! 32-byte block fingerprint type and the pluggable hashing seam.

use sha3::{Digest, Sha3_256};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Fingerprint length in bytes (SHA3-256 output size).
pub const FINGERPRINT_LEN: usize = 32;

/// Fixed-size 32-byte fingerprint identifying a block's content.
///
/// This type is `Copy` - fingerprints are compared and passed around
/// constantly during consensus evaluation and should live on the stack.
/// Equality is exact byte equality, never numeric or prefix comparison.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Hash, Ord, PartialOrd)]
pub struct Fingerprint(pub [u8; FINGERPRINT_LEN]);

impl Fingerprint {
    /// Creates a zero-valued fingerprint (all bytes are 0x00).
    pub fn zero() -> Fingerprint {
        Fingerprint([0u8; FINGERPRINT_LEN])
    }

    /// Returns the fingerprint as a byte slice.
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

/// Errors from parsing a fingerprint out of its hex representation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseFingerprintError {
    #[error("expected {expected} hex characters, got {actual}")]
    BadLength { expected: usize, actual: usize },

    #[error("invalid hex digit at position {0}")]
    BadDigit(usize),
}

impl FromStr for Fingerprint {
    type Err = ParseFingerprintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != FINGERPRINT_LEN * 2 {
            return Err(ParseFingerprintError::BadLength {
                expected: FINGERPRINT_LEN * 2,
                actual: s.len(),
            });
        }

        let mut bytes = [0u8; FINGERPRINT_LEN];
        for (i, pair) in s.as_bytes().chunks_exact(2).enumerate() {
            let hi = hex_value(pair[0]).ok_or(ParseFingerprintError::BadDigit(i * 2))?;
            let lo = hex_value(pair[1]).ok_or(ParseFingerprintError::BadDigit(i * 2 + 1))?;
            bytes[i] = hi << 4 | lo;
        }
        Ok(Fingerprint(bytes))
    }
}

fn hex_value(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

/// Hash function seam for fingerprint computation.
///
/// Injected wherever fingerprints are produced so that tests can substitute
/// a deterministic or degenerate hash without touching chain logic.
pub trait Hasher {
    type Builder: FingerprintBuilder;

    /// Starts a fresh incremental fingerprint computation.
    fn builder(&self) -> Self::Builder;
}

/// Incremental fingerprint computation over byte chunks.
///
/// Allows canonical encodings to stream directly into the hash state
/// without intermediate buffers.
pub trait FingerprintBuilder {
    /// Feeds bytes into the computation.
    fn write(&mut self, bytes: &[u8]);

    /// Consumes the builder and returns the final fingerprint.
    fn finalize(self) -> Fingerprint;
}

/// Default SHA3-256 fingerprint hasher.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Sha3Hasher;

impl Hasher for Sha3Hasher {
    type Builder = Sha3Builder;

    fn builder(&self) -> Sha3Builder {
        Sha3Builder {
            hasher: Sha3_256::new(),
        }
    }
}

/// Incremental SHA3-256 state behind the [`FingerprintBuilder`] seam.
pub struct Sha3Builder {
    hasher: Sha3_256,
}

impl FingerprintBuilder for Sha3Builder {
    fn write(&mut self, bytes: &[u8]) {
        self.hasher.update(bytes);
    }

    fn finalize(self) -> Fingerprint {
        Fingerprint(self.hasher.finalize().into())
    }
}
