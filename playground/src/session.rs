//! An editable list of items and the tree built from it.
//!
//! Edits never rebuild inline. Each edit bumps the session generation; a
//! [`BuildTicket`] snapshots the items at one generation and can be built on
//! any thread. [`Playground::complete`] installs the result only if no
//! newer edit happened in the meantime.

use std::collections::BTreeSet;

use merklelab::{
    diff::{avalanche_of, AvalancheReport},
    efficiency::EfficiencyReport,
    HashAlgorithm, MerkleProof, MerkleTree, NodeId, TreeView,
};
use merklelab_costs::OperationCost;
use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::{
    challenge::TamperChallenge,
    context::{seed_items, ContextMode},
    PlaygroundConfig, PlaygroundError,
};

/// Snapshot of the items at one generation, ready to be built.
#[derive(Debug, Clone)]
pub struct BuildTicket {
    generation: u64,
    hasher: HashAlgorithm,
    items: Vec<String>,
}

impl BuildTicket {
    /// Generation this ticket was taken at.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Build the tree. Pure; safe to run off the session's thread.
    pub fn build(self) -> BuiltTree {
        let built = MerkleTree::build_with_cost(&self.hasher, self.items);
        BuiltTree {
            generation: self.generation,
            cost: built.cost,
            tree: built.value,
        }
    }
}

/// A finished build waiting to be installed.
#[derive(Debug, Clone)]
pub struct BuiltTree {
    generation: u64,
    cost: OperationCost,
    tree: MerkleTree,
}

impl BuiltTree {
    /// Generation the build was started for.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Hashing work the build took.
    pub fn cost(&self) -> OperationCost {
        self.cost
    }

    /// The built tree.
    pub fn tree(&self) -> &MerkleTree {
        &self.tree
    }
}

/// What clicking a node selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeSelection {
    /// A leaf: its proof, with the proof path highlighted.
    Leaf {
        /// Index of the leaf.
        index: usize,
        /// Its inclusion proof.
        proof: MerkleProof,
    },
    /// An internal node: it and its ancestors are highlighted.
    Path(Vec<NodeId>),
}

/// One interactive session.
pub struct Playground<R = StdRng> {
    config: PlaygroundConfig,
    mode: ContextMode,
    items: Vec<String>,
    tree: MerkleTree,
    last_build_cost: OperationCost,
    generation: u64,
    applied_generation: u64,
    highlighted: BTreeSet<NodeId>,
    selected_leaf: Option<usize>,
    selected_proof: Option<MerkleProof>,
    tampered: Option<usize>,
    rng: R,
}

impl Playground<StdRng> {
    /// Start a session seeded with the default items.
    pub fn new(config: PlaygroundConfig) -> Result<Self, PlaygroundError> {
        Self::with_rng(config, StdRng::from_entropy())
    }
}

impl<R: Rng> Playground<R> {
    /// Start a session drawing generated items from `rng`.
    pub fn with_rng(config: PlaygroundConfig, rng: R) -> Result<Self, PlaygroundError> {
        config.validate()?;
        let items = seed_items(config.initial_items);
        let built = MerkleTree::build_with_cost(&config.hash_algorithm, items.iter().cloned());
        info!(
            items = items.len(),
            algorithm = config.hash_algorithm.name(),
            "playground session started"
        );
        Ok(Playground {
            config,
            mode: ContextMode::Default,
            items,
            tree: built.value,
            last_build_cost: built.cost,
            generation: 0,
            applied_generation: 0,
            highlighted: BTreeSet::new(),
            selected_leaf: None,
            selected_proof: None,
            tampered: None,
            rng,
        })
    }

    /// Session settings.
    pub fn config(&self) -> &PlaygroundConfig {
        &self.config
    }

    /// Current context mode.
    pub fn mode(&self) -> ContextMode {
        self.mode
    }

    /// Current items, which may be ahead of [`tree`](Self::tree).
    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// Most recently installed tree.
    pub fn tree(&self) -> &MerkleTree {
        &self.tree
    }

    /// Hashing work of the installed tree's build.
    pub fn last_build_cost(&self) -> OperationCost {
        self.last_build_cost
    }

    /// Root of the installed tree, `None` when it is empty.
    pub fn root_digest(&self) -> Option<&str> {
        self.tree.root_digest().ok()
    }

    /// Edit counter.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// `true` while the installed tree lags behind the items.
    pub fn is_rebuilding(&self) -> bool {
        self.applied_generation != self.generation
    }

    /// Node ids currently highlighted.
    pub fn highlighted(&self) -> &BTreeSet<NodeId> {
        &self.highlighted
    }

    /// Leaf whose proof is shown, if any.
    pub fn selected_leaf(&self) -> Option<usize> {
        self.selected_leaf
    }

    /// Proof of the selected leaf, if any.
    pub fn selected_proof(&self) -> Option<&MerkleProof> {
        self.selected_proof.as_ref()
    }

    /// Index of the last edited item.
    pub fn tampered_index(&self) -> Option<usize> {
        self.tampered
    }

    /// The installed tree with the current highlight, for drawing.
    pub fn view(&self) -> TreeView<'_> {
        TreeView::new(&self.tree, &self.highlighted)
    }

    /// Replace the items with freshly generated ones for `mode`.
    pub fn set_context(&mut self, mode: ContextMode) -> u64 {
        self.items = mode.generate_items(self.config.initial_items, &mut self.rng);
        self.mode = mode;
        self.tampered = None;
        self.clear_selection();
        info!(%mode, items = self.items.len(), "context changed");
        self.bump()
    }

    /// Append a generated item. Returns its index.
    pub fn add_item(&mut self) -> Result<usize, PlaygroundError> {
        if self.items.len() >= self.config.max_items {
            return Err(PlaygroundError::ItemLimitReached {
                max: self.config.max_items,
            });
        }
        let index = self.items.len();
        let item = self.mode.generate_item(index, &mut self.rng);
        debug!(index, %item, "item added");
        self.items.push(item);
        self.bump();
        Ok(index)
    }

    /// Remove the item at `index`, returning it.
    pub fn remove_item(&mut self, index: usize) -> Result<String, PlaygroundError> {
        self.check_index(index)?;
        let removed = self.items.remove(index);
        self.tampered = None;
        self.clear_selection();
        debug!(index, item = %removed, "item removed");
        self.bump();
        Ok(removed)
    }

    /// Overwrite the item at `index`. The index is remembered as tampered and
    /// its path is highlighted once the rebuild is installed.
    pub fn update_item(
        &mut self,
        index: usize,
        value: impl Into<String>,
    ) -> Result<(), PlaygroundError> {
        self.check_index(index)?;
        let value = value.into();
        debug!(index, from = %self.items[index], to = %value, "item updated");
        self.items[index] = value;
        self.tampered = Some(index);
        self.bump();
        Ok(())
    }

    /// Snapshot the items for a rebuild at the current generation.
    pub fn begin_rebuild(&self) -> BuildTicket {
        BuildTicket {
            generation: self.generation,
            hasher: self.config.hash_algorithm,
            items: self.items.clone(),
        }
    }

    /// Install a finished build. Returns `false`, leaving the session
    /// untouched, when edits happened after the build's ticket was taken.
    pub fn complete(&mut self, built: BuiltTree) -> bool {
        if built.generation != self.generation {
            warn!(
                build = built.generation,
                current = self.generation,
                "discarding stale tree build"
            );
            return false;
        }

        self.tree = built.tree;
        self.last_build_cost = built.cost;
        self.applied_generation = built.generation;
        self.clear_selection();
        if let Some(index) = self.tampered {
            if let Ok(path) = self.tree.leaf_path_ids(index) {
                self.highlighted = path.into_iter().collect();
            }
        }
        debug!(
            generation = built.generation,
            root = self.root_digest().unwrap_or("<empty>"),
            "tree installed"
        );
        true
    }

    /// Build and install synchronously.
    pub fn rebuild_now(&mut self) -> bool {
        let built = self.begin_rebuild().build();
        self.complete(built)
    }

    /// Select a leaf: compute its proof and highlight the proof path.
    pub fn select_leaf(&mut self, index: usize) -> Result<MerkleProof, PlaygroundError> {
        let proof = self.tree.proof(index)?;
        self.highlighted = self.tree.proof_path_ids(index)?;
        self.selected_leaf = Some(index);
        self.selected_proof = Some(proof.clone());
        debug!(index, steps = proof.len(), "leaf selected");
        Ok(proof)
    }

    /// Click a node of the installed tree. Leaves behave like
    /// [`select_leaf`](Self::select_leaf); internal nodes highlight
    /// themselves and their ancestors.
    pub fn click_node(&mut self, id: NodeId) -> Result<NodeSelection, PlaygroundError> {
        let node = self.tree.node(id).ok_or(PlaygroundError::UnknownNode(id))?;
        if let Some(index) = self.tree.leaf_index_of(node.id()) {
            let proof = self.select_leaf(index)?;
            return Ok(NodeSelection::Leaf { index, proof });
        }

        let mut path = vec![id];
        path.extend(self.tree.ancestor_ids(id));
        self.highlighted = path.iter().copied().collect();
        self.selected_leaf = None;
        self.selected_proof = None;
        Ok(NodeSelection::Path(path))
    }

    /// Check the current item at `index` against the installed root using
    /// the installed tree's proof. Fails to verify after an edit until the
    /// rebuild is installed.
    pub fn verify_item(&self, index: usize) -> Result<bool, PlaygroundError> {
        self.check_index(index)?;
        let proof = self.tree.proof(index)?;
        let root = self.tree.root_digest()?;
        Ok(proof.verify_with(&self.config.hash_algorithm, &self.items[index], root))
    }

    /// Bit flips between the digests of two inputs.
    pub fn avalanche(&self, before: &str, after: &str) -> AvalancheReport {
        avalanche_of(
            &self.config.hash_algorithm,
            before,
            after,
            self.config.avalanche_prefix_len,
        )
    }

    /// Proof size against naive download for the current item count.
    pub fn efficiency(&self) -> EfficiencyReport {
        EfficiencyReport::for_items(self.items.len() as u64)
    }

    /// Start a tamper challenge sized by the config.
    pub fn start_challenge(&mut self) -> Result<TamperChallenge, PlaygroundError> {
        TamperChallenge::new(
            self.config.hash_algorithm,
            self.config.challenge_leaf_count,
            &mut self.rng,
        )
    }

    fn check_index(&self, index: usize) -> Result<(), PlaygroundError> {
        if index < self.items.len() {
            Ok(())
        } else {
            Err(PlaygroundError::ItemIndexOutOfRange {
                index,
                len: self.items.len(),
            })
        }
    }

    fn clear_selection(&mut self) {
        self.highlighted.clear();
        self.selected_leaf = None;
        self.selected_proof = None;
    }

    fn bump(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn session() -> Playground<StdRng> {
        Playground::with_rng(PlaygroundConfig::default(), StdRng::seed_from_u64(3)).unwrap()
    }

    #[test]
    fn test_seeded_session() {
        let playground = session();
        assert_eq!(
            playground.items(),
            ["TX_ALPHA", "TX_BETA", "TX_GAMMA", "TX_DELTA"]
        );
        assert_eq!(playground.tree().leaf_count(), 4);
        assert!(!playground.is_rebuilding());
        assert_eq!(playground.last_build_cost().hash_node_calls, 3);
    }

    #[test]
    fn test_item_limit() {
        let mut playground = session();
        for expected in 4..8 {
            assert_eq!(playground.add_item().unwrap(), expected);
        }
        assert_eq!(playground.items()[7], "TX_H");
        assert_matches!(
            playground.add_item(),
            Err(PlaygroundError::ItemLimitReached { max: 8 })
        );
        assert!(playground.rebuild_now());
        assert_eq!(playground.tree().leaf_count(), 8);
    }

    #[test]
    fn test_remove_and_bad_index() {
        let mut playground = session();
        assert_eq!(playground.remove_item(1).unwrap(), "TX_BETA");
        assert_matches!(
            playground.remove_item(3),
            Err(PlaygroundError::ItemIndexOutOfRange { index: 3, len: 3 })
        );
        assert_matches!(
            playground.update_item(9, "x"),
            Err(PlaygroundError::ItemIndexOutOfRange { index: 9, len: 3 })
        );
    }

    #[test]
    fn test_stale_build_is_discarded() {
        let mut playground = session();
        playground.update_item(0, "TX_OMEGA").unwrap();
        let stale = playground.begin_rebuild();
        playground.update_item(1, "TX_SIGMA").unwrap();
        let fresh = playground.begin_rebuild();

        let before = playground.root_digest().map(str::to_owned);
        assert!(!playground.complete(stale.build()));
        assert_eq!(playground.root_digest().map(str::to_owned), before);
        assert!(playground.is_rebuilding());

        assert!(playground.complete(fresh.build()));
        assert!(!playground.is_rebuilding());
        assert_eq!(playground.tree().payloads()[..2], ["TX_OMEGA", "TX_SIGMA"]);
    }

    #[test]
    fn test_tampered_path_highlighted_after_rebuild() {
        let mut playground = session();
        playground.update_item(2, "TX_GAMMA!").unwrap();
        assert!(!playground.verify_item(2).unwrap());
        assert!(playground.highlighted().is_empty());

        assert!(playground.rebuild_now());
        let expected: BTreeSet<NodeId> =
            playground.tree().leaf_path_ids(2).unwrap().into_iter().collect();
        assert_eq!(playground.highlighted(), &expected);
        assert_eq!(playground.tampered_index(), Some(2));
        assert!(playground.verify_item(2).unwrap());
    }

    #[test]
    fn test_select_leaf_and_click_internal() {
        let mut playground = session();
        let proof = playground.select_leaf(2).unwrap();
        assert_eq!(proof.len(), 2);
        assert_eq!(playground.highlighted().len(), 5);
        assert_eq!(playground.selected_leaf(), Some(2));

        let internal = playground.tree().level(1).unwrap()[0].id();
        let selection = playground.click_node(internal).unwrap();
        let root = playground.tree().root_id().unwrap();
        assert_eq!(selection, NodeSelection::Path(vec![internal, root]));
        assert_eq!(playground.selected_leaf(), None);
        assert!(playground.selected_proof().is_none());

        let leaf = playground.tree().leaf(3).unwrap().id();
        assert_matches!(
            playground.click_node(leaf),
            Ok(NodeSelection::Leaf { index: 3, .. })
        );
        assert!(playground.selected_proof().is_some());
    }

    #[test]
    fn test_context_change_resets() {
        let mut playground = session();
        playground.update_item(0, "edited").unwrap();
        playground.select_leaf(0).unwrap();
        let generation = playground.set_context(ContextMode::Spotify);
        assert_eq!(generation, 2);
        assert_eq!(playground.tampered_index(), None);
        assert!(playground.highlighted().is_empty());
        assert!(playground.items().iter().all(|i| i.starts_with("Chunk: 0x")));

        playground.set_context(ContextMode::Default);
        assert_eq!(playground.items(), ["TX_A", "TX_B", "TX_C", "TX_D"]);
    }

    #[test]
    fn test_empty_session_errors() {
        let config = PlaygroundConfig {
            initial_items: 0,
            ..Default::default()
        };
        let mut playground = Playground::with_rng(config, StdRng::seed_from_u64(0)).unwrap();
        assert_eq!(playground.root_digest(), None);
        assert_matches!(
            playground.select_leaf(0),
            Err(PlaygroundError::Merkle(merklelab::MerkleError::EmptyTree))
        );
        let foreign = MerkleTree::build(["x"]).root_id().unwrap();
        assert_matches!(
            playground.click_node(foreign),
            Err(PlaygroundError::UnknownNode(_))
        );
    }

    #[test]
    fn test_avalanche_and_efficiency() {
        let playground = session();
        let report = playground.avalanche("TX_ALPHA", "TX_ALPHA");
        assert_eq!(report.bits_compared, 64);
        assert_eq!(report.bits_flipped, 0);
        assert_eq!(playground.efficiency().proof_hashes, 2);
    }
}
