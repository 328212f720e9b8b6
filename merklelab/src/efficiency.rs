//! How much work a Merkle proof saves.
//!
//! Closed-form helpers for the shape of a tree and the number of digests a
//! verifier downloads, plus [`measure`] which reports the hashing work
//! actually done for a concrete build and verification.

use merklelab_costs::{cost_return_on_error_no_add, CostResult, CostsExt, OperationCost};

use crate::{DigestHasher, MerkleError, MerkleTree};

/// Number of digests in a proof for a tree of `items` leaves:
/// `ceil(log2(items))`, 0 for one leaf or none.
pub fn proof_length(items: u64) -> u32 {
    if items <= 1 {
        0
    } else {
        u64::BITS - (items - 1).leading_zeros()
    }
}

/// Number of levels, leaves and root included, of a tree with `items`
/// leaves.
pub fn level_count(items: u64) -> u32 {
    if items == 0 { 0 } else { proof_length(items) + 1 }
}

/// Size of every level, leaves first, for a tree of `items` leaves.
pub fn expected_level_sizes(items: u64) -> Vec<u64> {
    let mut sizes = Vec::with_capacity(level_count(items) as usize);
    let mut current = items;
    while current > 0 {
        sizes.push(current);
        if current == 1 {
            break;
        }
        current = current.div_ceil(2);
    }
    sizes
}

/// Nodes in a perfect binary tree of `depth` levels: `2^depth - 1`.
/// Saturates at `u64::MAX`.
pub fn perfect_tree_node_count(depth: u32) -> u64 {
    match depth {
        0 => 0,
        d if d >= u64::BITS => u64::MAX,
        d => u64::MAX >> (u64::BITS - d),
    }
}

/// Leaves of a perfect binary tree of `depth` levels: `2^(depth - 1)`.
/// Saturates at `u64::MAX`.
pub fn perfect_tree_leaf_count(depth: u32) -> u64 {
    match depth {
        0 => 0,
        d => 1u64.checked_shl(d - 1).unwrap_or(u64::MAX),
    }
}

/// Map a 0..=100 slider position onto 1..=1_000_000 items on a log scale.
pub fn log_scale_items(slider: u32) -> u64 {
    let exponent = f64::from(slider.min(100)) / 100.0 * 6.0;
    (10f64.powf(exponent).round() as u64).max(1)
}

/// Naive download versus proof download for one item count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EfficiencyReport {
    /// Number of items in the data set.
    pub items: u64,
    /// Hashes needed without a tree: one per item.
    pub naive_hashes: u64,
    /// Digests in an inclusion proof.
    pub proof_hashes: u32,
}

impl EfficiencyReport {
    /// Report for a data set of `items` entries.
    pub fn for_items(items: u64) -> Self {
        EfficiencyReport {
            items,
            naive_hashes: items,
            proof_hashes: proof_length(items),
        }
    }

    /// Proof size as a fraction of the naive download, 0 for no items.
    pub fn proof_ratio(&self) -> f64 {
        if self.naive_hashes == 0 {
            0.0
        } else {
            f64::from(self.proof_hashes) / self.naive_hashes as f64
        }
    }

    /// Hashes a verifier does not have to fetch.
    pub fn hashes_saved(&self) -> u64 {
        self.naive_hashes.saturating_sub(u64::from(self.proof_hashes))
    }
}

/// Hashing work observed for one build and one verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeasuredCost {
    /// Work to build the whole tree.
    pub build: OperationCost,
    /// Work to recompute the root from one proof.
    pub verify: OperationCost,
    /// Whether the proof verified against the built root.
    pub verified: bool,
}

/// Build a tree over `items`, prove `leaf_index` and verify it, counting the
/// hash calls of each phase.
pub fn measure<H, S>(
    hasher: &H,
    items: &[S],
    leaf_index: usize,
) -> Result<MeasuredCost, MerkleError>
where
    H: DigestHasher + ?Sized,
    S: AsRef<str>,
{
    let built =
        MerkleTree::build_with_cost(hasher, items.iter().map(|s| s.as_ref().to_owned()));
    let build = built.cost;
    let tree = built.value;

    let proof = tree.proof(leaf_index)?;
    let payload = tree.leaf(leaf_index)?.payload().unwrap_or_default();
    let computed = proof.compute_root(hasher, payload);
    let verified = computed.value.as_deref() == Some(tree.root_digest()?);

    Ok(MeasuredCost {
        build,
        verify: computed.cost,
        verified,
    })
}

/// Build, prove and verify in one pass, with the hashing work of all three
/// accumulated. Errors carry the cost spent before they occurred.
pub fn prove_and_verify<H, S>(
    hasher: &H,
    items: &[S],
    leaf_index: usize,
) -> CostResult<bool, MerkleError>
where
    H: DigestHasher + ?Sized,
    S: AsRef<str>,
{
    let mut cost = OperationCost::default();
    let tree = MerkleTree::build_with_cost(hasher, items.iter().map(|s| s.as_ref().to_owned()))
        .unwrap_add_cost(&mut cost);
    let proof = cost_return_on_error_no_add!(&cost, tree.proof(leaf_index));
    let root = cost_return_on_error_no_add!(&cost, tree.root_digest());
    let payload = items[leaf_index].as_ref();
    let computed = proof
        .compute_root(hasher, payload)
        .unwrap_add_cost(&mut cost);
    Ok(computed.as_deref() == Some(root)).wrap_with_cost(cost)
}
