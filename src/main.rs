//! Demo: three ledger nodes, one of them dishonest.
//!
//! Two nodes append the same transaction batch; the third rewrites the
//! batch in its own favor before appending. Every node's local audit
//! passes - the divergence only shows up when the consensus check compares
//! head fingerprints across nodes.

use quorumchain::core::chain::Chain;
use quorumchain::core::consensus::{NodeSnapshot, run_consensus};
use quorumchain::core::transaction::{Transaction, UuidIds};
use quorumchain::{error, info};
use std::process;

fn main() {
    let mut ids = UuidIds;

    // One batch, shared verbatim (same transaction ids) by the honest nodes.
    let batch = vec![
        Transaction::create(&mut ids, "alice", "bob", 25),
        Transaction::create(&mut ids, "bob", "carol", 5),
        Transaction::create(&mut ids, "carol", "alice", 1),
    ];

    let mut alice = Chain::new("alice");
    alice.append(batch.clone());

    let mut bob = Chain::new("bob");
    bob.append(batch);

    // Eve rewrites her copy of the batch before appending it.
    let rewritten = vec![
        Transaction::create(&mut ids, "alice", "eve", 1_000_000),
        Transaction::create(&mut ids, "bob", "carol", 5),
        Transaction::create(&mut ids, "carol", "alice", 1),
    ];
    let mut eve = Chain::new("eve");
    eve.append(rewritten);

    let nodes = [&alice, &bob, &eve];

    // Local audits all pass: each chain is internally consistent, even
    // Eve's. Only the cross-node comparison can expose her.
    for chain in nodes {
        if let Err(e) = chain.verify() {
            error!("{}'s chain failed its local audit: {e}", chain.owner());
            process::exit(1);
        }
        info!("{}'s chain passed its local audit", chain.owner());
    }

    let snapshots: Vec<NodeSnapshot> = nodes.iter().map(|chain| chain.snapshot()).collect();
    let verdict = run_consensus(&snapshots);

    if verdict.has_majority {
        println!("majority of nodes agree on the ledger");
        println!("suspect nodes: {}", verdict.suspect_owners.join(", "));
    } else {
        println!("no majority: every node is suspect");
        println!("suspect nodes: {}", verdict.suspect_owners.join(", "));
    }
}
