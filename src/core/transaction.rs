//! Immutable transfer records and unique id generation.

use uuid::Uuid;

/// Source of fresh transaction identifiers.
///
/// Injected into [`Transaction::create`] so tests can substitute a
/// deterministic generator while production code draws random ids.
pub trait IdGenerator {
    /// Returns an identifier never handed out before by this generator.
    fn next_id(&mut self) -> String;
}

/// Default id generator producing random UUID v4 identifiers.
#[derive(Clone, Copy, Debug, Default)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&mut self) -> String {
        Uuid::new_v4().simple().to_string()
    }
}

/// A single transfer of value between two parties.
///
/// Immutable after construction: the id, parties, and amount are fixed and
/// feed block fingerprints verbatim. Cloning preserves the id, which is how
/// a driver shares one batch across several nodes' chains.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    id: String,
    sender: String,
    receiver: String,
    amount: u64,
}

impl Transaction {
    /// Creates a transaction with a fresh id from the given generator.
    ///
    /// Fields are stored verbatim; no validation of party identities or
    /// amounts happens here or anywhere else in this crate.
    pub fn create<G: IdGenerator>(
        ids: &mut G,
        sender: impl Into<String>,
        receiver: impl Into<String>,
        amount: u64,
    ) -> Self {
        Transaction {
            id: ids.next_id(),
            sender: sender.into(),
            receiver: receiver.into(),
            amount,
        }
    }

    /// Returns the unique transaction identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the sending party's identity string.
    pub fn sender(&self) -> &str {
        &self.sender
    }

    /// Returns the receiving party's identity string.
    pub fn receiver(&self) -> &str {
        &self.receiver
    }

    /// Returns the transferred amount.
    pub fn amount(&self) -> u64 {
        self.amount
    }
}
