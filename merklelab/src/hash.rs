use merklelab_costs::OperationCost;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// The hashing contract the tree relies on: bytes in, fixed-length lowercase
/// hex digest out. Implementations must be pure and deterministic.
pub trait DigestHasher {
    /// Hash `input` and return the hex-encoded digest.
    fn digest(&self, input: &[u8]) -> String;

    /// Hash a UTF-8 string.
    fn digest_str(&self, input: &str) -> String {
        self.digest(input.as_bytes())
    }
}

impl<T: DigestHasher + ?Sized> DigestHasher for &T {
    fn digest(&self, input: &[u8]) -> String {
        (**self).digest(input)
    }
}

/// Built-in hash primitives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// SHA-256, 64 hex characters.
    #[default]
    Sha256,
    /// Blake3 with the default 32-byte output, 64 hex characters.
    Blake3,
}

impl HashAlgorithm {
    /// Short display name.
    pub fn name(&self) -> &'static str {
        match self {
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Blake3 => "blake3",
        }
    }

    /// Length of a digest in hex characters.
    pub fn digest_hex_len(&self) -> usize {
        64
    }
}

impl DigestHasher for HashAlgorithm {
    fn digest(&self, input: &[u8]) -> String {
        match self {
            HashAlgorithm::Sha256 => hex::encode(Sha256::digest(input)),
            HashAlgorithm::Blake3 => hex::encode(blake3::hash(input).as_bytes()),
        }
    }
}

/// Leaf digest: `H(payload)`.
pub(crate) fn hash_leaf<H: DigestHasher + ?Sized>(
    hasher: &H,
    payload: &str,
    cost: &mut OperationCost,
) -> String {
    *cost += OperationCost::leaf_hash(payload.len());
    hasher.digest_str(payload)
}

/// Parent of a true pair: `H(left ++ right)` over the hex strings, no
/// separator.
pub(crate) fn hash_pair<H: DigestHasher + ?Sized>(
    hasher: &H,
    left: &str,
    right: &str,
    cost: &mut OperationCost,
) -> String {
    let mut joined = String::with_capacity(left.len() + right.len());
    joined.push_str(left);
    joined.push_str(right);
    *cost += OperationCost::node_hash(joined.len());
    hasher.digest_str(&joined)
}

/// Parent of a self-paired trailing node: `H(digest)`, not `H(digest ++
/// digest)`.
pub(crate) fn hash_single<H: DigestHasher + ?Sized>(
    hasher: &H,
    digest: &str,
    cost: &mut OperationCost,
) -> String {
    *cost += OperationCost::node_hash(digest.len());
    hasher.digest_str(digest)
}
