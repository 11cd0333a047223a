//! Ledger blocks and content fingerprinting.

use crate::core::transaction::Transaction;
use crate::types::fingerprint::{Fingerprint, FingerprintBuilder, Hasher};

/// Sentinel bytes folded into every genesis fingerprint.
///
/// Frozen: changing this value changes every chain's genesis fingerprint
/// and therefore breaks cross-node agreement on empty chains.
const GENESIS_SENTINEL: &[u8] = b"genesis";

/// Block payload: either the fixed genesis sentinel or an ordered
/// transaction batch.
///
/// Batch order is significant - it feeds the fingerprint, so two nodes
/// agree on a block only if they appended the same transactions in the
/// same order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Payload {
    /// The fixed sentinel payload of every chain's first block.
    Genesis,
    /// An ordered batch of transactions.
    Transactions(Vec<Transaction>),
}

/// A unit of chain storage: an ordered transaction batch plus its position
/// and linkage metadata, sealed by a content fingerprint.
///
/// The fingerprint is computed exactly once, at construction, from the
/// final field values; blocks expose accessors only and are never mutated
/// afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Block {
    index: u64,
    previous_fingerprint: Option<Fingerprint>,
    payload: Payload,
    fingerprint: Fingerprint,
}

impl Block {
    /// Creates the genesis block: index 0, no predecessor, sentinel payload.
    pub(crate) fn genesis<H: Hasher>(hasher: &H) -> Self {
        Self::sealed(hasher, 0, None, Payload::Genesis)
    }

    /// Creates the block following `previous` with the given batch.
    pub(crate) fn next<H: Hasher>(
        hasher: &H,
        index: u64,
        previous: Fingerprint,
        transactions: Vec<Transaction>,
    ) -> Self {
        Self::sealed(
            hasher,
            index,
            Some(previous),
            Payload::Transactions(transactions),
        )
    }

    fn sealed<H: Hasher>(
        hasher: &H,
        index: u64,
        previous_fingerprint: Option<Fingerprint>,
        payload: Payload,
    ) -> Self {
        let fingerprint = compute_fingerprint(hasher, index, previous_fingerprint, &payload);
        Block {
            index,
            previous_fingerprint,
            payload,
            fingerprint,
        }
    }

    /// Returns the block's position in its chain (0 for genesis).
    pub fn index(&self) -> u64 {
        self.index
    }

    /// Returns the predecessor's fingerprint, or `None` for genesis.
    pub fn previous_fingerprint(&self) -> Option<Fingerprint> {
        self.previous_fingerprint
    }

    /// Returns the block payload.
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Returns the transaction batch, empty for the genesis block.
    pub fn transactions(&self) -> &[Transaction] {
        match &self.payload {
            Payload::Genesis => &[],
            Payload::Transactions(batch) => batch,
        }
    }

    /// Returns the content fingerprint sealed at construction.
    pub fn fingerprint(&self) -> Fingerprint {
        self.fingerprint
    }
}

/// Computes the fingerprint of `(index, previous_fingerprint, payload)`.
///
/// The serialization is canonical and injective: fixed-width integers,
/// presence and variant tags, and length prefixes on every variable-length
/// field. No two distinct inputs produce the same byte stream, so any
/// change to a field, a transaction, or the batch order changes the
/// fingerprint with the hash function's collision resistance.
pub fn compute_fingerprint<H: Hasher>(
    hasher: &H,
    index: u64,
    previous_fingerprint: Option<Fingerprint>,
    payload: &Payload,
) -> Fingerprint {
    let mut builder = hasher.builder();
    builder.write(b"BLOCK");
    builder.write(&index.to_be_bytes());

    match previous_fingerprint {
        None => builder.write(&[0u8]),
        Some(previous) => {
            builder.write(&[1u8]);
            builder.write(previous.as_slice());
        }
    }

    match payload {
        Payload::Genesis => {
            builder.write(&[0u8]);
            builder.write(GENESIS_SENTINEL);
        }
        Payload::Transactions(batch) => {
            builder.write(&[1u8]);
            builder.write(&(batch.len() as u64).to_be_bytes());
            for tx in batch {
                write_field(&mut builder, tx.id().as_bytes());
                write_field(&mut builder, tx.sender().as_bytes());
                write_field(&mut builder, tx.receiver().as_bytes());
                builder.write(&tx.amount().to_be_bytes());
            }
        }
    }

    builder.finalize()
}

fn write_field<B: FingerprintBuilder>(builder: &mut B, bytes: &[u8]) {
    builder.write(&(bytes.len() as u64).to_be_bytes());
    builder.write(bytes);
}

#[cfg(test)]
impl Block {
    /// Clones the block with its payload swapped while leaving the sealed
    /// fingerprint untouched, simulating post-hoc in-memory corruption.
    pub(crate) fn with_corrupted_payload(&self, payload: Payload) -> Block {
        Block {
            payload,
            ..self.clone()
        }
    }
}
