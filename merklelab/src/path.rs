//! Node sets used to highlight a leaf's path through the tree.

use std::collections::BTreeSet;

use crate::{MerkleError, MerkleTree, NodeId};

impl MerkleTree {
    /// Ids from the leaf at `leaf_index` up to and including the root.
    pub fn leaf_path_ids(&self, leaf_index: usize) -> Result<Vec<NodeId>, MerkleError> {
        let leaf = self.leaf(leaf_index)?;
        let mut path = vec![leaf.id()];
        path.extend(self.ancestor_ids(leaf.id()));
        Ok(path)
    }

    /// The leaf-to-root path plus every real sibling along it: exactly the
    /// nodes a verifier has to look at. Self-paired positions contribute no
    /// extra node.
    pub fn proof_path_ids(&self, leaf_index: usize) -> Result<BTreeSet<NodeId>, MerkleError> {
        let levels = self.level_ids();
        let mut ids: BTreeSet<NodeId> = self.leaf_path_ids(leaf_index)?.into_iter().collect();

        let mut index = leaf_index;
        for level in &levels[..levels.len() - 1] {
            let sibling = if index % 2 == 1 { index - 1 } else { index + 1 };
            if let Some(id) = level.get(sibling) {
                ids.insert(*id);
            }
            index /= 2;
        }
        Ok(ids)
    }

    /// Parent chain of `id`, nearest first, ending at the root. Empty for the
    /// root and for ids this tree does not know.
    pub fn ancestor_ids(&self, id: NodeId) -> Vec<NodeId> {
        let mut ancestors = Vec::new();
        let mut current = self.node(id).and_then(|node| node.parent());
        while let Some(parent) = current {
            ancestors.push(parent);
            current = self.node(parent).and_then(|node| node.parent());
        }
        ancestors
    }

    /// `true` if `id` lies on the path from leaf `leaf_index` to the root.
    pub fn is_on_leaf_path(&self, id: NodeId, leaf_index: usize) -> bool {
        self.leaf_path_ids(leaf_index)
            .map(|path| path.contains(&id))
            .unwrap_or(false)
    }
}
