//! Core ledger data structures and the consensus evaluator.
//!
//! This module contains the building blocks of the multi-node ledger:
//! - `Transaction`: immutable transfer record with a generated unique id
//! - `Block`: ordered transaction batch sealed by a content fingerprint
//! - `Chain`: one node's genesis-initialized, append-only block sequence
//! - `consensus`: stateless majority check over the nodes' head fingerprints

pub mod block;
pub mod chain;
pub mod consensus;
pub mod transaction;
