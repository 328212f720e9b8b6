//! Find the corrupted shard by inspecting as few nodes as possible.
//!
//! The player holds a trusted tree and a received tree in which one shard
//! was altered. Inspecting a node compares its digest in both trees: a
//! mismatch means the corruption is somewhere below it.

use std::collections::BTreeSet;

use merklelab::{HashAlgorithm, MerkleTree, NodeId, TreeView};
use rand::Rng;
use tracing::{debug, info};

use crate::PlaygroundError;

/// Result of inspecting one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InspectOutcome {
    /// Digest matches the trusted tree.
    Clean,
    /// Internal node whose digest differs: the corruption is beneath it.
    Broken,
    /// The corrupted shard itself. The challenge is won.
    Found,
}

/// Progress of a challenge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeState {
    /// Still looking.
    Playing,
    /// The corrupted shard was found.
    Won,
}

/// One round of the shard corruption challenge.
#[derive(Debug, Clone)]
pub struct TamperChallenge {
    trusted: MerkleTree,
    received: MerkleTree,
    corrupted_index: usize,
    inspected: BTreeSet<NodeId>,
    broken: BTreeSet<NodeId>,
    clicks: u32,
    state: ChallengeState,
}

/// Payload of shard `index`.
pub fn shard_name(index: usize) -> String {
    format!("Shard_{index}")
}

impl TamperChallenge {
    /// `leaf_count` shards, one of them picked at random and corrupted.
    pub fn new<R: Rng + ?Sized>(
        hasher: HashAlgorithm,
        leaf_count: usize,
        rng: &mut R,
    ) -> Result<Self, PlaygroundError> {
        if leaf_count == 0 {
            return Err(PlaygroundError::InvalidConfig(
                "a challenge needs at least one shard".into(),
            ));
        }
        Self::with_corrupted(hasher, leaf_count, rng.gen_range(0..leaf_count))
    }

    /// `leaf_count` shards with shard `corrupted_index` corrupted.
    pub fn with_corrupted(
        hasher: HashAlgorithm,
        leaf_count: usize,
        corrupted_index: usize,
    ) -> Result<Self, PlaygroundError> {
        let shards: Vec<String> = (0..leaf_count).map(shard_name).collect();
        let trusted = MerkleTree::build_with(&hasher, shards.iter().cloned());
        // validates the index against the tree
        trusted.leaf(corrupted_index)?;

        let mut received_shards = shards;
        received_shards[corrupted_index].push_str("_corrupted");
        let received = MerkleTree::build_with(&hasher, received_shards);

        info!(leaf_count, "tamper challenge started");
        Ok(TamperChallenge {
            trusted,
            received,
            corrupted_index,
            inspected: BTreeSet::new(),
            broken: BTreeSet::new(),
            clicks: 0,
            state: ChallengeState::Playing,
        })
    }

    /// Inspect node `id` of the received tree.
    pub fn inspect(&mut self, id: NodeId) -> Result<InspectOutcome, PlaygroundError> {
        if self.state == ChallengeState::Won {
            return Err(PlaygroundError::ChallengeFinished);
        }
        let received = self
            .received
            .node(id)
            .ok_or(PlaygroundError::UnknownNode(id))?;
        let trusted = self
            .trusted
            .node(id)
            .ok_or(PlaygroundError::UnknownNode(id))?;
        self.clicks += 1;

        let outcome = if received.digest() == trusted.digest() {
            self.inspected.insert(id);
            InspectOutcome::Clean
        } else {
            self.broken.insert(id);
            if received.is_leaf() {
                self.state = ChallengeState::Won;
                InspectOutcome::Found
            } else {
                InspectOutcome::Broken
            }
        };
        debug!(%id, ?outcome, clicks = self.clicks, "node inspected");
        Ok(outcome)
    }

    /// The tree as received, corruption included.
    pub fn received(&self) -> &MerkleTree {
        &self.received
    }

    /// Root the received tree should have had.
    pub fn trusted_root(&self) -> &str {
        self.trusted.root_digest().unwrap_or_default()
    }

    /// Number of shards.
    pub fn leaf_count(&self) -> usize {
        self.received.leaf_count()
    }

    /// The corrupted shard. Meant for tests and for revealing the answer.
    pub fn corrupted_index(&self) -> usize {
        self.corrupted_index
    }

    /// Nodes found clean.
    pub fn inspected(&self) -> &BTreeSet<NodeId> {
        &self.inspected
    }

    /// Nodes found broken.
    pub fn broken(&self) -> &BTreeSet<NodeId> {
        &self.broken
    }

    /// Inspections so far.
    pub fn clicks(&self) -> u32 {
        self.clicks
    }

    /// Current state.
    pub fn state(&self) -> ChallengeState {
        self.state
    }

    /// Inspections a perfect player needs: one per level, root to shard.
    pub fn optimal_clicks(&self) -> usize {
        self.received.height()
    }

    /// The received tree with broken nodes marked.
    pub fn view(&self) -> TreeView<'_> {
        TreeView::new(&self.received, &self.broken)
    }
}
