//! Test utilities for ledger and consensus testing.

#[cfg(test)]
pub mod utils {
    use crate::core::consensus::NodeSnapshot;
    use crate::core::transaction::{IdGenerator, Transaction};
    use crate::types::fingerprint::{FINGERPRINT_LEN, Fingerprint};

    /// Deterministic id generator so fingerprints are reproducible in tests.
    pub struct SequentialIds(u64);

    impl SequentialIds {
        pub fn new() -> Self {
            SequentialIds(0)
        }
    }

    impl IdGenerator for SequentialIds {
        fn next_id(&mut self) -> String {
            self.0 += 1;
            format!("tx-{:04}", self.0)
        }
    }

    /// Creates a fingerprint distinguishable only by its first byte.
    pub fn marked_fingerprint(marker: u8) -> Fingerprint {
        let mut bytes = [0u8; FINGERPRINT_LEN];
        bytes[0] = marker;
        Fingerprint(bytes)
    }

    /// Creates a node snapshot for consensus tests.
    pub fn snapshot(owner: &str, fingerprint: Fingerprint) -> NodeSnapshot {
        NodeSnapshot::new(owner, fingerprint)
    }

    /// Creates a transfer with a deterministic id drawn from `ids`.
    pub fn transfer(ids: &mut SequentialIds, sender: &str, receiver: &str, amount: u64) -> Transaction {
        Transaction::create(ids, sender, receiver, amount)
    }
}
