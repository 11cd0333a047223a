//! Majority-based consensus evaluation over node chain fingerprints.
//!
//! Stateless: every operation is a pure function over a snapshot of
//! `(owner, head fingerprint)` pairs taken from the nodes under audit.
//! A fingerprint held by a strict majority of nodes wins; every other
//! fingerprint, and every node bearing one, is flagged as suspect.

use crate::types::fingerprint::Fingerprint;
use crate::{info, warn};
use std::collections::HashMap;
use std::collections::hash_map::Entry;

/// One node's contribution to a consensus round: who it is and what its
/// chain currently looks like, reduced to the head fingerprint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeSnapshot {
    /// Node owner's identity string. Plain and duplicate-prone on purpose:
    /// attribution is per node instance, not per identity string.
    pub owner: String,
    /// Fingerprint of the chain's most recently appended block.
    pub head_fingerprint: Fingerprint,
}

impl NodeSnapshot {
    /// Creates a snapshot from an owner and a head fingerprint.
    pub fn new(owner: impl Into<String>, head_fingerprint: Fingerprint) -> Self {
        NodeSnapshot {
            owner: owner.into(),
            head_fingerprint,
        }
    }
}

/// Occurrence counts of each distinct head fingerprint across a node set.
///
/// Keeps the explicit `Fingerprint -> count` map plus the order in which
/// fingerprints were first observed, so downstream suspect reporting is
/// deterministic regardless of map iteration order.
#[derive(Clone, Debug, Default)]
pub struct Tally {
    counts: HashMap<Fingerprint, usize>,
    order: Vec<Fingerprint>,
    total: usize,
}

impl Tally {
    /// Returns the number of nodes counted.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Returns the number of distinct fingerprints observed.
    pub fn distinct(&self) -> usize {
        self.order.len()
    }

    /// Returns how many nodes reported the given fingerprint.
    pub fn count(&self, fingerprint: &Fingerprint) -> usize {
        self.counts.get(fingerprint).copied().unwrap_or(0)
    }

    /// Iterates `(fingerprint, count)` pairs in first-observed order.
    pub fn iter(&self) -> impl Iterator<Item = (Fingerprint, usize)> + '_ {
        self.order
            .iter()
            .map(move |fingerprint| (*fingerprint, self.counts[fingerprint]))
    }
}

/// Counts how many nodes currently report each distinct head fingerprint.
pub fn tally(nodes: &[NodeSnapshot]) -> Tally {
    let mut counts = HashMap::new();
    let mut order = Vec::new();

    for node in nodes {
        match counts.entry(node.head_fingerprint) {
            Entry::Occupied(mut occupied) => *occupied.get_mut() += 1,
            Entry::Vacant(vacant) => {
                vacant.insert(1usize);
                order.push(node.head_fingerprint);
            }
        }
    }

    Tally {
        counts,
        order,
        total: nodes.len(),
    }
}

/// A fingerprint that failed to reach a strict majority.
#[derive(Clone, Debug, PartialEq)]
pub struct Suspect {
    pub fingerprint: Fingerprint,
    /// Fraction of nodes reporting this fingerprint, in [0, 1].
    pub prevalence: f64,
}

/// Outcome of the majority check over a tally.
#[derive(Clone, Debug, PartialEq)]
pub struct Evaluation {
    /// True iff a single fingerprint is held by strictly more than half the
    /// nodes. At most one fingerprint can qualify for any non-empty tally.
    pub has_majority: bool,
    /// Every fingerprint at or below the 0.5 threshold, in first-observed
    /// order. When no majority exists, every fingerprint appears here.
    pub suspects: Vec<Suspect>,
}

/// Checks whether any fingerprint holds a strict majority and flags the
/// rest as suspects.
///
/// The threshold comparison is `2 * count > total` so that strictness is
/// exact; ties (count == total/2) are never a majority. An empty tally
/// yields no majority and no suspects without ever dividing.
pub fn evaluate(tally: &Tally) -> Evaluation {
    let total = tally.total();
    if total == 0 {
        return Evaluation {
            has_majority: false,
            suspects: Vec::new(),
        };
    }

    let mut has_majority = false;
    let mut suspects = Vec::new();
    for (fingerprint, count) in tally.iter() {
        if 2 * count > total {
            has_majority = true;
        } else {
            suspects.push(Suspect {
                fingerprint,
                prevalence: count as f64 / total as f64,
            });
        }
    }

    Evaluation {
        has_majority,
        suspects,
    }
}

/// Names the owners of every node bearing a suspect fingerprint.
///
/// Owners are emitted grouped by suspect fingerprint, in the order the
/// suspects were produced, preserving node iteration order within each
/// group. No deduplication: two node instances sharing an owner string
/// are reported twice.
pub fn identify_suspect_nodes(nodes: &[NodeSnapshot], suspects: &[Suspect]) -> Vec<String> {
    let mut owners = Vec::new();
    for suspect in suspects {
        for node in nodes {
            if node.head_fingerprint == suspect.fingerprint {
                owners.push(node.owner.clone());
            }
        }
    }
    owners
}

/// Final result of a consensus round.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Verdict {
    pub has_majority: bool,
    pub suspect_owners: Vec<String>,
}

/// Runs a full consensus round: tally, majority check, and suspect
/// attribution over a snapshot of nodes.
pub fn run_consensus(nodes: &[NodeSnapshot]) -> Verdict {
    let tally = tally(nodes);
    let evaluation = evaluate(&tally);
    let suspect_owners = identify_suspect_nodes(nodes, &evaluation.suspects);

    if evaluation.has_majority {
        info!(
            "consensus across {} nodes: majority holds, {} suspect node(s)",
            tally.total(),
            suspect_owners.len()
        );
    } else if tally.total() > 0 {
        warn!(
            "no majority across {} nodes: {} distinct fingerprints, all suspect",
            tally.total(),
            tally.distinct()
        );
    }

    Verdict {
        has_majority: evaluation.has_majority,
        suspect_owners,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::chain::Chain;
    use crate::core::transaction::Transaction;
    use crate::utils::test_utils::utils::{SequentialIds, marked_fingerprint, snapshot};

    #[test]
    fn tally_counts_each_fingerprint() {
        let h1 = marked_fingerprint(1);
        let h2 = marked_fingerprint(2);
        let nodes = [
            snapshot("alice", h1),
            snapshot("bob", h1),
            snapshot("carol", h2),
        ];

        let tally = tally(&nodes);
        assert_eq!(tally.total(), 3);
        assert_eq!(tally.distinct(), 2);
        assert_eq!(tally.count(&h1), 2);
        assert_eq!(tally.count(&h2), 1);
        assert_eq!(tally.count(&marked_fingerprint(3)), 0);
    }

    #[test]
    fn tally_preserves_first_observed_order() {
        let nodes = [
            snapshot("alice", marked_fingerprint(7)),
            snapshot("bob", marked_fingerprint(3)),
            snapshot("carol", marked_fingerprint(7)),
        ];

        let order: Vec<Fingerprint> = tally(&nodes).iter().map(|(f, _)| f).collect();
        assert_eq!(order, vec![marked_fingerprint(7), marked_fingerprint(3)]);
    }

    #[test]
    fn majority_case_flags_only_the_minority() {
        let h1 = marked_fingerprint(1);
        let h2 = marked_fingerprint(2);
        let nodes = [
            snapshot("alice", h1),
            snapshot("bob", h1),
            snapshot("carol", h2),
        ];

        let evaluation = evaluate(&tally(&nodes));
        assert!(evaluation.has_majority);
        assert_eq!(evaluation.suspects.len(), 1);
        assert_eq!(evaluation.suspects[0].fingerprint, h2);
        assert!((evaluation.suspects[0].prevalence - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn full_disagreement_flags_everyone() {
        let nodes = [
            snapshot("alice", marked_fingerprint(1)),
            snapshot("bob", marked_fingerprint(2)),
            snapshot("carol", marked_fingerprint(3)),
        ];

        let evaluation = evaluate(&tally(&nodes));
        assert!(!evaluation.has_majority);
        assert_eq!(evaluation.suspects.len(), 3);
    }

    #[test]
    fn exact_tie_is_not_a_majority() {
        let nodes = [
            snapshot("alice", marked_fingerprint(1)),
            snapshot("bob", marked_fingerprint(2)),
        ];

        let evaluation = evaluate(&tally(&nodes));
        assert!(!evaluation.has_majority);
        assert_eq!(evaluation.suspects.len(), 2);
        for suspect in &evaluation.suspects {
            assert!((suspect.prevalence - 0.5).abs() < 1e-12);
        }
    }

    #[test]
    fn unanimous_nodes_have_no_suspects() {
        let h1 = marked_fingerprint(1);
        let nodes = [
            snapshot("alice", h1),
            snapshot("bob", h1),
            snapshot("carol", h1),
        ];

        let evaluation = evaluate(&tally(&nodes));
        assert!(evaluation.has_majority);
        assert!(evaluation.suspects.is_empty());
    }

    #[test]
    fn empty_node_set_is_well_defined() {
        let evaluation = evaluate(&tally(&[]));
        assert!(!evaluation.has_majority);
        assert!(evaluation.suspects.is_empty());
    }

    #[test]
    fn at_most_one_fingerprint_holds_a_majority() {
        // several distributions, including a lopsided five-node split
        let distributions: Vec<Vec<u8>> = vec![
            vec![1, 1, 2],
            vec![1, 2],
            vec![1, 1, 1],
            vec![1, 1, 1, 2, 3],
            vec![1, 1, 2, 2, 3],
        ];

        for markers in distributions {
            let nodes: Vec<NodeSnapshot> = markers
                .iter()
                .map(|&m| snapshot("node", marked_fingerprint(m)))
                .collect();
            let tally = tally(&nodes);
            let majorities = tally
                .iter()
                .filter(|&(_, count)| 2 * count > tally.total())
                .count();
            assert!(majorities <= 1);
        }
    }

    #[test]
    fn attribution_orders_by_suspect_then_node() {
        let h1 = marked_fingerprint(1);
        let h2 = marked_fingerprint(2);
        let h3 = marked_fingerprint(3);
        let nodes = [
            snapshot("alice", h1),
            snapshot("bob", h2),
            snapshot("carol", h3),
            snapshot("dave", h2),
        ];

        let evaluation = evaluate(&tally(&nodes));
        let owners = identify_suspect_nodes(&nodes, &evaluation.suspects);
        // suspects in first-observed order (h1, h2, h3); nodes in input order
        assert_eq!(owners, vec!["alice", "bob", "dave", "carol"]);
    }

    #[test]
    fn attribution_repeats_duplicate_owner_strings() {
        let nodes = [
            snapshot("alice", marked_fingerprint(1)),
            snapshot("alice", marked_fingerprint(2)),
        ];

        let evaluation = evaluate(&tally(&nodes));
        let owners = identify_suspect_nodes(&nodes, &evaluation.suspects);
        assert_eq!(owners, vec!["alice", "alice"]);
    }

    #[test]
    fn run_consensus_reports_minority_owner() {
        let h1 = marked_fingerprint(1);
        let h2 = marked_fingerprint(2);
        let nodes = [
            snapshot("alice", h1),
            snapshot("bob", h1),
            snapshot("carol", h2),
        ];

        let verdict = run_consensus(&nodes);
        assert!(verdict.has_majority);
        assert_eq!(verdict.suspect_owners, vec!["carol"]);
    }

    #[test]
    fn run_consensus_on_empty_input() {
        let verdict = run_consensus(&[]);
        assert!(!verdict.has_majority);
        assert!(verdict.suspect_owners.is_empty());
    }

    #[test]
    fn run_consensus_over_real_chains_spots_the_tamperer() {
        let mut ids = SequentialIds::new();
        let batch = vec![
            Transaction::create(&mut ids, "alice", "bob", 25),
            Transaction::create(&mut ids, "bob", "carol", 5),
        ];
        let rewritten = vec![
            Transaction::create(&mut ids, "alice", "eve", 1_000_000),
            Transaction::create(&mut ids, "bob", "carol", 5),
        ];

        let mut alice = Chain::new("alice");
        let mut bob = Chain::new("bob");
        let mut eve = Chain::new("eve");
        alice.append(batch.clone());
        bob.append(batch);
        eve.append(rewritten);

        let snapshots = [alice.snapshot(), bob.snapshot(), eve.snapshot()];
        let verdict = run_consensus(&snapshots);
        assert!(verdict.has_majority);
        assert_eq!(verdict.suspect_owners, vec!["eve"]);
    }
}
