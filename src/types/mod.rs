//! Shared type definitions for the ledger core.
//!
//! - `Fingerprint`: fixed-size 32-byte content fingerprint with hex
//!   formatting and parsing
//! - `Hasher` / `FingerprintBuilder`: the pluggable hashing seam, with a
//!   SHA3-256 default

pub mod fingerprint;
