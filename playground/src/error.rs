use std::path::PathBuf;

use merklelab::{MerkleError, NodeId};
use thiserror::Error;

/// Errors raised by playground sessions and challenges.
#[derive(Debug, Error)]
pub enum PlaygroundError {
    #[error("item limit of {max} reached")]
    ItemLimitReached { max: usize },
    #[error("item index {index} is out of range ({len} items)")]
    ItemIndexOutOfRange { index: usize, len: usize },
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("cannot read config {}: {source}", path.display())]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse config: {0}")]
    ConfigParse(#[from] serde_json::Error),
    #[error("cannot serialize config: {0}")]
    ConfigSerialize(#[source] serde_json::Error),
    #[error(transparent)]
    Merkle(#[from] MerkleError),
    #[error("challenge is already won")]
    ChallengeFinished,
    #[error("node {0} is not part of the current tree")]
    UnknownNode(NodeId),
}
