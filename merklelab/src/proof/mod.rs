//! Inclusion proof generation.
//!
//! A [`MerkleProof`] lists, lowest level first, the digest that has to be
//! combined with the running digest to climb one level toward the root.

use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{MerkleError, MerkleTree, NodeId};


/// One level of an authentication path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Encode, Decode, Serialize, Deserialize)]
pub struct ProofStep {
    /// Digest of the sibling at this level. For a self-paired step this is
    /// the digest of the node on the path itself.
    pub sibling_digest: String,
    /// `true` means the sibling digest goes on the LEFT of the
    /// concatenation: `H(sibling ++ current)`. `false` means
    /// `H(current ++ sibling)`.
    pub sibling_on_left: bool,
    /// The node on the path was an odd trailing node paired with itself;
    /// its parent is `H(current)`.
    pub self_paired: bool,
}

impl ProofStep {
    /// A step with a real sibling.
    pub fn pair(sibling_digest: impl Into<String>, sibling_on_left: bool) -> Self {
        ProofStep {
            sibling_digest: sibling_digest.into(),
            sibling_on_left,
            self_paired: false,
        }
    }

    /// A step where the node on the path is its own sibling.
    pub fn self_pair(own_digest: impl Into<String>, sibling_on_left: bool) -> Self {
        ProofStep {
            sibling_digest: own_digest.into(),
            sibling_on_left,
            self_paired: true,
        }
    }
}

/// An inclusion proof for one leaf.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Encode, Decode, Serialize, Deserialize)]
pub struct MerkleProof {
    /// Index of the proved leaf.
    pub leaf_index: usize,
    /// One step per level below the root, lowest level first.
    pub steps: Vec<ProofStep>,
}

impl MerkleProof {
    /// Derive the proof for the leaf at `leaf_index`.
    ///
    /// At each level the sibling sits at `index - 1` when `index` is odd and
    /// at `index + 1` otherwise. When that position is past the end of the
    /// level, the node was paired with itself and its own digest is
    /// recorded.
    pub fn generate(tree: &MerkleTree, leaf_index: usize) -> Result<Self, MerkleError> {
        let levels = tree.level_ids();
        let leaves = levels.first().ok_or(MerkleError::EmptyTree)?;
        if leaf_index >= leaves.len() {
            return Err(MerkleError::InvalidIndex {
                index: leaf_index,
                leaf_count: leaves.len(),
            });
        }

        let digest_of = |ids: &[NodeId], index: usize| -> Option<String> {
            ids.get(index)
                .and_then(|id| tree.node(*id))
                .map(|node| node.digest().to_owned())
        };

        let mut steps = Vec::with_capacity(levels.len() - 1);
        let mut index = leaf_index;
        for level in levels[..levels.len() - 1].iter().map(Vec::as_slice) {
            let is_right = index % 2 == 1;
            let sibling_index = if is_right { index - 1 } else { index + 1 };
            let step = match digest_of(level, sibling_index) {
                Some(sibling) => ProofStep::pair(sibling, is_right),
                None => {
                    let own = digest_of(level, index).ok_or(MerkleError::InvalidIndex {
                        index,
                        leaf_count: level.len(),
                    })?;
                    ProofStep::self_pair(own, is_right)
                }
            };
            steps.push(step);
            index /= 2;
        }

        debug!(leaf_index, steps = steps.len(), "generated merkle proof");
        Ok(MerkleProof { leaf_index, steps })
    }

    /// Number of steps (digests to download).
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// `true` for the proof of a single-leaf tree.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The steps, lowest level first.
    pub fn steps(&self) -> &[ProofStep] {
        &self.steps
    }

    /// Encode to bytes using bincode.
    pub fn encode_to_vec(&self) -> Result<Vec<u8>, MerkleError> {
        let config = bincode::config::standard()
            .with_big_endian()
            .with_no_limit();
        bincode::encode_to_vec(self, config)
            .map_err(|e| MerkleError::InvalidProofEncoding(format!("encode error: {}", e)))
    }

    /// Decode from bytes using bincode.
    pub fn decode_from_slice(bytes: &[u8]) -> Result<Self, MerkleError> {
        let config = bincode::config::standard()
            .with_big_endian()
            .with_limit::<{ 1024 * 1024 }>();
        let (proof, read): (Self, usize) = bincode::decode_from_slice(bytes, config)
            .map_err(|e| MerkleError::InvalidProofEncoding(format!("decode error: {}", e)))?;
        if read != bytes.len() {
            return Err(MerkleError::InvalidProofEncoding(format!(
                "{} trailing bytes after proof",
                bytes.len() - read
            )));
        }
        Ok(proof)
    }
}

impl AsRef<[ProofStep]> for MerkleProof {
    fn as_ref(&self) -> &[ProofStep] {
        &self.steps
    }
}

impl MerkleTree {
    /// Inclusion proof for the leaf at `leaf_index`.
    ///
    /// Fails with [`MerkleError::EmptyTree`] on an empty tree and with
    /// [`MerkleError::InvalidIndex`] when the index is out of range.
    pub fn proof(&self, leaf_index: usize) -> Result<MerkleProof, MerkleError> {
        MerkleProof::generate(self, leaf_index)
    }
}
