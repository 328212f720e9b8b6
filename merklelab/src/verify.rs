//! Proof verification.
//!
//! Pure functions, no tree required: the root is recomputed from the leaf
//! payload and the proof steps and compared to the claimed root. A proof
//! that does not check out yields `false`, never an error.

use merklelab_costs::{CostContext, CostsExt, OperationCost};
use tracing::trace;

use crate::{
    hash::{hash_leaf, hash_pair, hash_single},
    proof::{MerkleProof, ProofStep},
    DigestHasher, HashAlgorithm,
};

/// No tree that fits in memory has more levels than a `usize` has bits.
const MAX_PROOF_STEPS: usize = usize::BITS as usize;

/// Recompute the root digest implied by `leaf_payload` and `steps`.
///
/// Starts from `H(leaf_payload)` and for every step:
///
/// - self-paired: the recorded digest must equal the running digest, then
///   `current = H(current)`
/// - sibling on the left: `current = H(sibling ++ current)`
/// - otherwise: `current = H(current ++ sibling)`
///
/// Returns `None` when the proof is structurally inconsistent.
pub fn compute_root<H: DigestHasher + ?Sized>(
    hasher: &H,
    leaf_payload: &str,
    steps: &[ProofStep],
) -> CostContext<Option<String>> {
    let mut cost = OperationCost::default();
    if steps.len() > MAX_PROOF_STEPS {
        return None.wrap_with_cost(cost);
    }

    let mut current = hash_leaf(hasher, leaf_payload, &mut cost);
    for (level, step) in steps.iter().enumerate() {
        current = if step.self_paired {
            if step.sibling_digest != current {
                trace!(level, "self-paired step does not match running digest");
                return None.wrap_with_cost(cost);
            }
            hash_single(hasher, &current, &mut cost)
        } else if step.sibling_on_left {
            hash_pair(hasher, &step.sibling_digest, &current, &mut cost)
        } else {
            hash_pair(hasher, &current, &step.sibling_digest, &mut cost)
        };
    }
    Some(current).wrap_with_cost(cost)
}

/// Check that `leaf_payload` is committed to by `claimed_root`, hashing with
/// the default algorithm (SHA-256).
///
/// An empty step list verifies only when `H(leaf_payload) == claimed_root`.
pub fn verify_proof(leaf_payload: &str, steps: &[ProofStep], claimed_root: &str) -> bool {
    verify_proof_with(&HashAlgorithm::default(), leaf_payload, steps, claimed_root)
}

/// Same as [`verify_proof`] with an explicit hasher.
pub fn verify_proof_with<H: DigestHasher + ?Sized>(
    hasher: &H,
    leaf_payload: &str,
    steps: &[ProofStep],
    claimed_root: &str,
) -> bool {
    let computed = compute_root(hasher, leaf_payload, steps).unwrap();
    let valid = computed.as_deref() == Some(claimed_root);
    trace!(steps = steps.len(), valid, "verified merkle proof");
    valid
}

impl MerkleProof {
    /// Verify this proof for `leaf_payload` against `claimed_root` with the
    /// default algorithm.
    pub fn verify(&self, leaf_payload: &str, claimed_root: &str) -> bool {
        verify_proof(leaf_payload, &self.steps, claimed_root)
    }

    /// Verify with an explicit hasher.
    pub fn verify_with<H: DigestHasher + ?Sized>(
        &self,
        hasher: &H,
        leaf_payload: &str,
        claimed_root: &str,
    ) -> bool {
        verify_proof_with(hasher, leaf_payload, &self.steps, claimed_root)
    }

    /// Root digest implied by this proof and `leaf_payload`, with the hashing
    /// work it took.
    pub fn compute_root<H: DigestHasher + ?Sized>(
        &self,
        hasher: &H,
        leaf_payload: &str,
    ) -> CostContext<Option<String>> {
        compute_root(hasher, leaf_payload, &self.steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sha(input: &str) -> String {
        HashAlgorithm::Sha256.digest_str(input)
    }

    #[test]
    fn test_sibling_on_left_order() {
        let left = ProofStep::pair(sha("A"), true);
        let right = ProofStep::pair(sha("A"), false);
        let on_left = compute_root(&HashAlgorithm::Sha256, "B", &[left]).unwrap();
        let on_right = compute_root(&HashAlgorithm::Sha256, "B", &[right]).unwrap();

        assert_eq!(on_left, Some(sha(&format!("{}{}", sha("A"), sha("B")))));
        assert_eq!(on_right, Some(sha(&format!("{}{}", sha("B"), sha("A")))));
    }

    #[test]
    fn test_empty_steps_compare_leaf_digest() {
        assert!(verify_proof("only", &[], &sha("only")));
        assert!(!verify_proof("other", &[], &sha("only")));
    }

    #[test]
    fn test_self_paired_step_must_match() {
        let good = ProofStep::self_pair(sha("C"), false);
        assert_eq!(
            compute_root(&HashAlgorithm::Sha256, "C", &[good]).unwrap(),
            Some(sha(&sha("C")))
        );

        let forged = ProofStep::self_pair(sha("X"), false);
        assert_eq!(
            compute_root(&HashAlgorithm::Sha256, "C", &[forged]).unwrap(),
            None
        );
    }

    #[test]
    fn test_compute_root_cost() {
        let tree = crate::MerkleTree::build(["A", "B", "C", "D"]);
        let proof = tree.proof(1).expect("leaf 1 exists");
        let ctx = proof.compute_root(&HashAlgorithm::Sha256, "B");
        assert_eq!(ctx.cost.hash_byte_calls, 1);
        assert_eq!(ctx.cost.hash_node_calls, 2);
        assert_eq!(ctx.value.as_deref(), tree.root_digest().ok());
    }

    #[test]
    fn test_oversized_proof_rejected() {
        let steps = vec![ProofStep::pair(sha("A"), false); MAX_PROOF_STEPS + 1];
        assert_eq!(
            compute_root(&HashAlgorithm::Sha256, "A", &steps).unwrap(),
            None
        );
    }
}
