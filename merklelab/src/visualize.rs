use std::{
    collections::BTreeSet,
    io::{Result, Write},
};

use merklelab_visualize::{shorten_digest, Drawer, Visualize};

use crate::{MerkleProof, MerkleTree, Node, NodeId};

static NOTHING_HIGHLIGHTED: BTreeSet<NodeId> = BTreeSet::new();

/// A tree paired with the set of node ids to mark while drawing.
pub struct TreeView<'a> {
    tree: &'a MerkleTree,
    highlighted: &'a BTreeSet<NodeId>,
}

impl<'a> TreeView<'a> {
    /// Draw `tree` marking every id in `highlighted` with `*`.
    pub fn new(tree: &'a MerkleTree, highlighted: &'a BTreeSet<NodeId>) -> Self {
        TreeView { tree, highlighted }
    }

    fn draw_node<W: Write>(&self, node: &Node, mut drawer: Drawer<W>) -> Result<Drawer<W>> {
        let marker = if self.highlighted.contains(&node.id()) {
            "* "
        } else {
            "  "
        };
        drawer.write(
            format!("{marker}{} {}", node.id(), shorten_digest(node.digest())).as_bytes(),
        )?;
        if let Some(payload) = node.payload() {
            drawer.write(b" ")?;
            drawer = payload.visualize(drawer)?;
        }
        if node.is_self_paired() {
            drawer.write(b" (self-paired)")?;
        }
        Ok(drawer)
    }
}

impl Visualize for TreeView<'_> {
    fn visualize<W: Write>(&self, mut drawer: Drawer<W>) -> Result<Drawer<W>> {
        if self.tree.is_empty() {
            drawer.write(b"merkle tree: empty")?;
            return Ok(drawer);
        }

        drawer.write(
            format!(
                "merkle tree: {} leaves, {} levels",
                self.tree.leaf_count(),
                self.tree.height()
            )
            .as_bytes(),
        )?;
        drawer.down();
        for (level, nodes) in self.tree.levels().iter().enumerate().rev() {
            drawer.newline()?;
            drawer.write(format!("level {level}:").as_bytes())?;
            drawer.down();
            for node in nodes {
                drawer.newline()?;
                drawer = self.draw_node(node, drawer)?;
            }
            drawer.up();
        }
        drawer.up();
        Ok(drawer)
    }
}

impl Visualize for MerkleTree {
    fn visualize<W: Write>(&self, drawer: Drawer<W>) -> Result<Drawer<W>> {
        TreeView::new(self, &NOTHING_HIGHLIGHTED).visualize(drawer)
    }
}

impl Visualize for MerkleProof {
    fn visualize<W: Write>(&self, mut drawer: Drawer<W>) -> Result<Drawer<W>> {
        drawer.write(
            format!(
                "proof for leaf {} ({} steps)",
                self.leaf_index,
                self.steps.len()
            )
            .as_bytes(),
        )?;
        drawer.down();
        for step in &self.steps {
            drawer.newline()?;
            let side = match (step.self_paired, step.sibling_on_left) {
                (true, _) => "self ",
                (false, true) => "left ",
                (false, false) => "right",
            };
            drawer.write(format!("{side} {}", shorten_digest(&step.sibling_digest)).as_bytes())?;
        }
        drawer.up();
        Ok(drawer)
    }
}

#[cfg(test)]
mod tests {
    use merklelab_visualize::visualize_to_string;

    use super::*;

    #[test]
    fn test_tree_view_marks_highlighted() {
        let tree = MerkleTree::build(["A", "B"]);
        let short = |i: usize| shorten_digest(tree.nodes()[i].digest());
        let highlighted: BTreeSet<NodeId> = tree.leaf_path_ids(0).unwrap().into_iter().collect();

        let drawn = visualize_to_string(&TreeView::new(&tree, &highlighted));
        let expected = format!(
            "merkle tree: 2 leaves, 2 levels\n   level 1:\n       * #2 {}\n   level 0:\n       * \
             #0 {} \"A\"\n         #1 {} \"B\"",
            short(2),
            short(0),
            short(1)
        );
        assert_eq!(drawn, expected);
    }

    #[test]
    fn test_self_paired_marker_and_empty_tree() {
        let tree = MerkleTree::build(["A", "B", "C"]);
        let drawn = visualize_to_string(&tree);
        assert_eq!(drawn.matches("(self-paired)").count(), 1);
        assert!(!drawn.contains('*'));

        let empty = MerkleTree::build(Vec::<String>::new());
        assert_eq!(visualize_to_string(&empty), "merkle tree: empty");
    }

    #[test]
    fn test_proof_drawing() {
        let tree = MerkleTree::build(["A", "B", "C"]);
        let proof = tree.proof(2).unwrap();
        let drawn = visualize_to_string(&proof);
        let lines: Vec<&str> = drawn.lines().map(str::trim).collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "proof for leaf 2 (2 steps)");
        assert!(lines[1].starts_with("self"));
        assert!(lines[2].starts_with("left"));
    }
}
