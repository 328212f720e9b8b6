#![deny(missing_docs)]
//! Interface crate to unify how the hashing work of merklelab operations is
//! passed and retrieved.
//!
//! Every tree build, proof derivation and verification can report how many
//! times the hash primitive was invoked. The efficiency views use these
//! numbers to contrast "hash everything" against "download a proof".

use std::ops::AddAssign;

pub mod context;

pub use context::{CostContext, CostResult, CostsExt};

/// Piece of data representing the hashing work done by an operation.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub struct OperationCost {
    /// How many times raw payload bytes were hashed (leaf digests).
    pub hash_byte_calls: u32,
    /// How many times node digests were combined into a parent digest.
    pub hash_node_calls: u32,
    /// Total number of bytes fed into the hash primitive.
    pub hashed_bytes: u64,
}

impl OperationCost {
    /// Cost of hashing one raw payload of `len` bytes.
    pub fn leaf_hash(len: usize) -> Self {
        OperationCost {
            hash_byte_calls: 1,
            hash_node_calls: 0,
            hashed_bytes: len as u64,
        }
    }

    /// Cost of hashing `len` bytes of concatenated child digests.
    pub fn node_hash(len: usize) -> Self {
        OperationCost {
            hash_byte_calls: 0,
            hash_node_calls: 1,
            hashed_bytes: len as u64,
        }
    }

    /// Total number of hash invocations of either kind.
    pub fn total_hash_calls(&self) -> u32 {
        self.hash_byte_calls + self.hash_node_calls
    }

    /// `true` if no hashing was done at all.
    pub fn is_nothing(&self) -> bool {
        *self == Self::default()
    }
}

impl AddAssign for OperationCost {
    fn add_assign(&mut self, rhs: Self) {
        self.hash_byte_calls += rhs.hash_byte_calls;
        self.hash_node_calls += rhs.hash_node_calls;
        self.hashed_bytes += rhs.hashed_bytes;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_assign_sums_every_field() {
        let left = OperationCost {
            hash_byte_calls: 1,
            hash_node_calls: 2,
            hashed_bytes: 3,
        };
        let right = OperationCost {
            hash_byte_calls: 10,
            hash_node_calls: 20,
            hashed_bytes: 30,
        };
        let mut acc = left;
        acc += right;
        assert_eq!(
            acc,
            OperationCost {
                hash_byte_calls: 11,
                hash_node_calls: 22,
                hashed_bytes: 33,
            }
        );
        assert_eq!(acc.total_hash_calls(), 33);
    }

    #[test]
    fn test_helpers() {
        assert!(OperationCost::default().is_nothing());

        let leaf = OperationCost::leaf_hash(7);
        assert_eq!(leaf.hash_byte_calls, 1);
        assert_eq!(leaf.hashed_bytes, 7);
        assert!(!leaf.is_nothing());

        let node = OperationCost::node_hash(128);
        assert_eq!(node.hash_node_calls, 1);
        assert_eq!(node.hashed_bytes, 128);
    }
}
