//! Binary Merkle tree engine.
//!
//! Builds a binary hash tree from an ordered list of text items, derives an
//! inclusion proof for any leaf and verifies proofs against a claimed root.
//! Digests are hex strings produced by a pluggable [`DigestHasher`]
//! (SHA-256 by default, Blake3 optionally).
//!
//! Construction rules:
//!
//! - leaf digest = `H(payload)`
//! - parent of a true pair = `H(left_digest ++ right_digest)`, plain string
//!   concatenation of the two hex digests
//! - parent of an odd trailing node = `H(node_digest)`, the node is paired
//!   with itself and hashed alone
//!
//! All nodes live in one arena owned by [`MerkleTree`]; relationships are
//! [`NodeId`] indices into it. A tree is immutable once built and is replaced
//! wholesale when the input changes.

#![warn(missing_docs)]

pub mod diff;
pub mod efficiency;
mod error;
mod hash;
mod node;
mod path;
pub(crate) mod proof;
pub(crate) mod tree;
mod verify;
#[cfg(feature = "visualize")]
mod visualize;


pub use error::MerkleError;
pub use hash::{DigestHasher, HashAlgorithm};
pub use merklelab_costs::{CostContext, CostResult, CostsExt, OperationCost};
pub use node::{Node, NodeId, NodeKind};
pub use proof::{MerkleProof, ProofStep};
pub use tree::MerkleTree;
pub use verify::{compute_root, verify_proof, verify_proof_with};
#[cfg(feature = "visualize")]
pub use visualize::TreeView;
