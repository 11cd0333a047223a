//! Per-node append-only chain of transaction batches.

use crate::core::block::{Block, Payload, compute_fingerprint};
use crate::core::consensus::NodeSnapshot;
use crate::core::transaction::Transaction;
use crate::info;
use crate::types::fingerprint::{Fingerprint, Hasher, Sha3Hasher};
use thiserror::Error;

/// Errors reported by the chain integrity audit.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChainError {
    #[error("chain is missing its genesis block")]
    MissingGenesis,

    #[error("block {index} is not correctly linked into the chain")]
    BrokenLink { index: u64 },

    #[error("block {index} fingerprint does not match its contents")]
    FingerprintMismatch { index: u64 },
}

/// One node's hash-linked chain of transaction batches.
///
/// Created with exactly one genesis block and grown only through
/// [`Chain::append`]; blocks are never removed or reordered. The head
/// fingerprint is cached and doubles as the node's identity summary for
/// consensus evaluation.
///
/// Generic over the hash function so tests can pin a deterministic hasher;
/// production chains use the SHA3-256 default.
pub struct Chain<H: Hasher = Sha3Hasher> {
    owner: String,
    blocks: Vec<Block>,
    head_fingerprint: Fingerprint,
    hasher: H,
}

impl Chain<Sha3Hasher> {
    /// Creates a genesis-initialized chain for the given node owner.
    pub fn new(owner: impl Into<String>) -> Self {
        Self::with_hasher(owner, Sha3Hasher)
    }
}

impl<H: Hasher> Chain<H> {
    /// Creates a genesis-initialized chain using the given hasher.
    pub fn with_hasher(owner: impl Into<String>, hasher: H) -> Self {
        let owner = owner.into();
        let genesis = Block::genesis(&hasher);
        let head_fingerprint = genesis.fingerprint();

        info!("initializing chain for {owner}: genesis fingerprint {head_fingerprint}");

        Chain {
            owner,
            blocks: vec![genesis],
            head_fingerprint,
            hasher,
        }
    }

    /// Appends a batch of transactions as a new block and returns it.
    ///
    /// The new block takes the next index, links to the current head
    /// fingerprint, and preserves batch order. No content validation or
    /// rejection happens here: divergent data is accepted at write time and
    /// detected later, out-of-band, by consensus evaluation.
    pub fn append(&mut self, transactions: Vec<Transaction>) -> &Block {
        let index = self.blocks.len();
        let block = Block::next(
            &self.hasher,
            index as u64,
            self.head_fingerprint,
            transactions,
        );
        self.head_fingerprint = block.fingerprint();

        info!(
            "appending block to {}'s chain: index={} transactions={} head={}",
            self.owner,
            index,
            block.transactions().len(),
            self.head_fingerprint
        );

        self.blocks.push(block);
        &self.blocks[index]
    }

    /// Returns the node owner's identity string.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Returns the blocks in chain order, genesis first.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Returns the most recently appended block.
    pub fn head(&self) -> &Block {
        &self.blocks[self.blocks.len() - 1]
    }

    /// Returns the cached fingerprint of the last appended block.
    pub fn head_fingerprint(&self) -> Fingerprint {
        self.head_fingerprint
    }

    /// Returns the `(owner, head fingerprint)` pair consensus operates on.
    pub fn snapshot(&self) -> NodeSnapshot {
        NodeSnapshot::new(self.owner.clone(), self.head_fingerprint)
    }

    /// Audits the chain's internal integrity.
    ///
    /// Checks that the chain starts at a well-formed genesis block, that
    /// every block links to its predecessor's fingerprint at the right
    /// index, and that every stored fingerprint matches a recomputation
    /// from the block's contents. A chain grown purely through `append`
    /// always passes; a failure means in-memory state was corrupted after
    /// the fact.
    ///
    /// Note this is a local check only: a tampering node that appends
    /// divergent data through the normal path has a perfectly consistent
    /// chain. Cross-node divergence is the consensus evaluator's job.
    pub fn verify(&self) -> Result<(), ChainError> {
        let genesis = self.blocks.first().ok_or(ChainError::MissingGenesis)?;
        if genesis.index() != 0
            || genesis.previous_fingerprint().is_some()
            || genesis.payload() != &Payload::Genesis
        {
            return Err(ChainError::MissingGenesis);
        }

        for (position, block) in self.blocks.iter().enumerate() {
            let index = position as u64;
            if block.index() != index {
                return Err(ChainError::BrokenLink { index });
            }
            if position > 0 {
                let expected = self.blocks[position - 1].fingerprint();
                if block.previous_fingerprint() != Some(expected) {
                    return Err(ChainError::BrokenLink { index });
                }
            }

            let recomputed = compute_fingerprint(
                &self.hasher,
                block.index(),
                block.previous_fingerprint(),
                block.payload(),
            );
            if recomputed != block.fingerprint() {
                return Err(ChainError::FingerprintMismatch { index });
            }
        }

        Ok(())
    }
}
