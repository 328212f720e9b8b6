use thiserror::Error;

/// Errors from Merkle tree operations.
///
/// A failed verification is not an error: verification reports `false`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MerkleError {
    /// A leaf index outside `[0, leaf_count)` was requested.
    #[error("leaf index {index} is out of range (leaf count {leaf_count})")]
    InvalidIndex {
        /// The requested leaf index.
        index: usize,
        /// Number of leaves in the tree.
        leaf_count: usize,
    },
    /// The tree was built from no items and has no root.
    #[error("tree is empty")]
    EmptyTree,
    /// A serialized proof could not be encoded or decoded.
    #[error("invalid proof encoding: {0}")]
    InvalidProofEncoding(String),
}
