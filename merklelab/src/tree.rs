use merklelab_costs::{CostContext, CostsExt, OperationCost};
use serde::Serialize;
use tracing::debug;

use crate::{
    hash::{hash_leaf, hash_pair, hash_single},
    DigestHasher, HashAlgorithm, MerkleError, Node, NodeId,
};

/// A binary Merkle tree built bottom-up from an ordered list of items.
///
/// Nodes are stored in a flat arena; `levels[0]` holds the leaves in input
/// order and the last level holds only the root. An empty tree has no levels
/// and no root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MerkleTree {
    nodes: Vec<Node>,
    levels: Vec<Vec<NodeId>>,
    root: Option<NodeId>,
}

impl MerkleTree {
    /// Build a tree hashing with the default algorithm (SHA-256).
    pub fn build<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::build_with(&HashAlgorithm::default(), items)
    }

    /// Build a tree with the given hasher.
    pub fn build_with<H, I, S>(hasher: &H, items: I) -> Self
    where
        H: DigestHasher + ?Sized,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::build_with_cost(hasher, items).unwrap()
    }

    /// Build a tree with the given hasher, reporting the hashing work done.
    ///
    /// `n` leaves cost `n` byte hashes plus one node hash per internal node.
    pub fn build_with_cost<H, I, S>(hasher: &H, items: I) -> CostContext<Self>
    where
        H: DigestHasher + ?Sized,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut cost = OperationCost::default();
        let mut nodes: Vec<Node> = Vec::new();

        let mut current: Vec<NodeId> = Vec::new();
        for (index, item) in items.into_iter().enumerate() {
            let payload: String = item.into();
            let digest = hash_leaf(hasher, &payload, &mut cost);
            let id = NodeId(nodes.len());
            nodes.push(Node::leaf(id, index, digest, payload));
            current.push(id);
        }

        if current.is_empty() {
            debug!("built empty merkle tree");
            return MerkleTree::default().wrap_with_cost(cost);
        }

        let mut levels = Vec::new();
        let mut level = 0u32;
        while current.len() > 1 {
            let mut next = Vec::with_capacity(current.len().div_ceil(2));
            for (index, pair) in current.chunks(2).enumerate() {
                let left = pair[0];
                let parent = NodeId(nodes.len());
                let (right, digest) = match pair.get(1) {
                    Some(&right) => {
                        let digest = hash_pair(
                            hasher,
                            nodes[left.0].digest(),
                            nodes[right.0].digest(),
                            &mut cost,
                        );
                        nodes[right.0].set_parent(parent);
                        (right, digest)
                    }
                    None => (left, hash_single(hasher, nodes[left.0].digest(), &mut cost)),
                };
                nodes[left.0].set_parent(parent);
                nodes.push(Node::internal(parent, level + 1, index, digest, left, right));
                next.push(parent);
            }
            levels.push(std::mem::replace(&mut current, next));
            level += 1;
        }
        let root = current[0];
        levels.push(current);

        debug!(
            leaves = levels[0].len(),
            levels = levels.len(),
            nodes = nodes.len(),
            hash_calls = cost.total_hash_calls(),
            "built merkle tree"
        );

        MerkleTree {
            nodes,
            levels,
            root: Some(root),
        }
        .wrap_with_cost(cost)
    }

    /// `true` if the tree was built from no items.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of leaves (input items).
    pub fn leaf_count(&self) -> usize {
        self.levels.first().map_or(0, Vec::len)
    }

    /// Total number of nodes across all levels.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of levels including the leaf level and the root level:
    /// `ceil(log2(n)) + 1` for `n >= 1` leaves, 0 for an empty tree.
    pub fn height(&self) -> usize {
        self.levels.len()
    }

    /// The root node.
    pub fn root(&self) -> Result<&Node, MerkleError> {
        self.root
            .map(|id| &self.nodes[id.0])
            .ok_or(MerkleError::EmptyTree)
    }

    /// The root digest.
    pub fn root_digest(&self) -> Result<&str, MerkleError> {
        self.root().map(Node::digest)
    }

    /// Id of the root node, if any.
    pub fn root_id(&self) -> Option<NodeId> {
        self.root
    }

    /// Look up a node by id.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// All nodes in arena (construction) order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Leaf at `index`.
    pub fn leaf(&self, index: usize) -> Result<&Node, MerkleError> {
        let leaves = self.levels.first().ok_or(MerkleError::EmptyTree)?;
        leaves
            .get(index)
            .map(|id| &self.nodes[id.0])
            .ok_or(MerkleError::InvalidIndex {
                index,
                leaf_count: leaves.len(),
            })
    }

    /// Index of the leaf with the given id, `None` for internal or unknown
    /// nodes.
    pub fn leaf_index_of(&self, id: NodeId) -> Option<usize> {
        self.node(id)
            .filter(|node| node.is_leaf())
            .map(Node::index_in_level)
    }

    /// The leaf payloads in input order.
    pub fn payloads(&self) -> Vec<&str> {
        self.level(0)
            .unwrap_or_default()
            .into_iter()
            .filter_map(Node::payload)
            .collect()
    }

    /// Nodes of one level, left to right.
    pub fn level(&self, level: usize) -> Option<Vec<&Node>> {
        self.levels
            .get(level)
            .map(|ids| ids.iter().map(|id| &self.nodes[id.0]).collect())
    }

    /// All levels, leaves first and root last. Freshly allocated on every
    /// call.
    pub fn levels(&self) -> Vec<Vec<&Node>> {
        self.levels
            .iter()
            .map(|ids| ids.iter().map(|id| &self.nodes[id.0]).collect())
            .collect()
    }

    /// Node ids per level, leaves first.
    pub fn level_ids(&self) -> &[Vec<NodeId>] {
        &self.levels
    }

    /// Number of nodes on each level, leaves first.
    pub fn level_sizes(&self) -> Vec<usize> {
        self.levels.iter().map(Vec::len).collect()
    }
}
