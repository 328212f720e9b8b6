//! Session settings, loaded from JSON.

use std::{fs, path::Path, time::Duration};

use merklelab::{diff::DEFAULT_AVALANCHE_PREFIX, HashAlgorithm};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::PlaygroundError;

/// Tunables for a [`Playground`](crate::Playground) session. Missing JSON
/// fields take their default value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlaygroundConfig {
    /// Digest used for every tree in the session.
    pub hash_algorithm: HashAlgorithm,
    /// Upper bound on the number of items.
    pub max_items: usize,
    /// Items generated when the session starts or the context changes.
    pub initial_items: usize,
    /// Number of shards in a tamper challenge.
    pub challenge_leaf_count: usize,
    /// Hex characters compared by the avalanche view.
    pub avalanche_prefix_len: usize,
    /// Pause before a rebuild is run after an edit.
    pub rebuild_debounce_ms: u64,
}

impl Default for PlaygroundConfig {
    fn default() -> Self {
        PlaygroundConfig {
            hash_algorithm: HashAlgorithm::Sha256,
            max_items: 8,
            initial_items: 4,
            challenge_leaf_count: 8,
            avalanche_prefix_len: DEFAULT_AVALANCHE_PREFIX,
            rebuild_debounce_ms: 400,
        }
    }
}

impl PlaygroundConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, PlaygroundError> {
        let config: PlaygroundConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PlaygroundError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| PlaygroundError::ConfigIo {
            path: path.to_owned(),
            source,
        })?;
        let config = Self::from_json_str(&json)?;
        debug!(path = %path.display(), ?config, "loaded playground config");
        Ok(config)
    }

    /// Serialize as pretty JSON.
    pub fn to_json_string(&self) -> Result<String, PlaygroundError> {
        serde_json::to_string_pretty(self).map_err(PlaygroundError::ConfigSerialize)
    }

    /// Reject settings no session can run with.
    pub fn validate(&self) -> Result<(), PlaygroundError> {
        if self.max_items == 0 {
            return Err(PlaygroundError::InvalidConfig(
                "max_items must be at least 1".into(),
            ));
        }
        if self.initial_items > self.max_items {
            return Err(PlaygroundError::InvalidConfig(format!(
                "initial_items {} exceeds max_items {}",
                self.initial_items, self.max_items
            )));
        }
        if self.challenge_leaf_count == 0 {
            return Err(PlaygroundError::InvalidConfig(
                "challenge_leaf_count must be at least 1".into(),
            ));
        }
        let digest_len = self.hash_algorithm.digest_hex_len();
        if !(1..=digest_len).contains(&self.avalanche_prefix_len) {
            return Err(PlaygroundError::InvalidConfig(format!(
                "avalanche_prefix_len must be within 1..={digest_len}"
            )));
        }
        Ok(())
    }

    /// [`rebuild_debounce_ms`](Self::rebuild_debounce_ms) as a `Duration`.
    pub fn rebuild_debounce(&self) -> Duration {
        Duration::from_millis(self.rebuild_debounce_ms)
    }
}
