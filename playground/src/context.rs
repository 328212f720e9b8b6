//! Item generators for the real-world settings a session can imitate.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Items the session starts with.
pub const SEED_ITEMS: [&str; 4] = ["TX_ALPHA", "TX_BETA", "TX_GAMMA", "TX_DELTA"];

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// What the leaves of the tree stand for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextMode {
    /// Labelled transactions: `TX_A`, `TX_B`, ...
    #[default]
    Default,
    /// Block transactions: `Tx: 1f0c9a3e`.
    Bitcoin,
    /// Repository blobs: `blob: k3x9qa.ts`.
    Git,
    /// Media chunks: `Chunk: 0x4be1`.
    Spotify,
}

impl ContextMode {
    /// Every mode, in display order.
    pub const ALL: [ContextMode; 4] = [
        ContextMode::Default,
        ContextMode::Bitcoin,
        ContextMode::Git,
        ContextMode::Spotify,
    ];

    /// Lowercase name.
    pub fn name(&self) -> &'static str {
        match self {
            ContextMode::Default => "default",
            ContextMode::Bitcoin => "bitcoin",
            ContextMode::Git => "git",
            ContextMode::Spotify => "spotify",
        }
    }

    /// Generate the item for position `index`. Only [`ContextMode::Default`]
    /// depends on the index; the other modes draw from `rng`.
    pub fn generate_item<R: Rng + ?Sized>(&self, index: usize, rng: &mut R) -> String {
        match self {
            ContextMode::Default => format!("TX_{}", letter_label(index)),
            ContextMode::Bitcoin => format!("Tx: {:08x}", rng.r#gen::<u32>()),
            ContextMode::Git => {
                let name: String = (0..6)
                    .map(|_| char::from(BASE36[rng.gen_range(0..BASE36.len())]))
                    .collect();
                format!("blob: {name}.ts")
            }
            ContextMode::Spotify => format!("Chunk: 0x{:04x}", rng.r#gen::<u16>()),
        }
    }

    /// Generate items for positions `0..count`.
    pub fn generate_items<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<String> {
        (0..count).map(|i| self.generate_item(i, rng)).collect()
    }
}

impl fmt::Display for ContextMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The named seeds first, then generated default labels.
pub fn seed_items(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| match SEED_ITEMS.get(i) {
            Some(seed) => (*seed).to_owned(),
            None => format!("TX_{}", letter_label(i)),
        })
        .collect()
}

/// Spreadsheet-style column label: 0 is `A`, 25 is `Z`, 26 is `AA`.
fn letter_label(index: usize) -> String {
    let mut label = Vec::new();
    let mut n = index + 1;
    while n > 0 {
        n -= 1;
        label.push(b'A' + (n % 26) as u8);
        n /= 26;
    }
    label.reverse();
    String::from_utf8_lossy(&label).into_owned()
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    #[test]
    fn test_default_labels() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(
            ContextMode::Default.generate_items(4, &mut rng),
            vec!["TX_A", "TX_B", "TX_C", "TX_D"]
        );
        assert_eq!(letter_label(25), "Z");
        assert_eq!(letter_label(26), "AA");
        assert_eq!(letter_label(27), "AB");
        assert_eq!(letter_label(701), "ZZ");
        assert_eq!(letter_label(702), "AAA");
    }

    #[test]
    fn test_generated_shapes() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..32 {
            let tx = ContextMode::Bitcoin.generate_item(0, &mut rng);
            let hex = tx.strip_prefix("Tx: ").unwrap();
            assert_eq!(hex.len(), 8);
            assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));

            let blob = ContextMode::Git.generate_item(0, &mut rng);
            let name = blob
                .strip_prefix("blob: ")
                .and_then(|s| s.strip_suffix(".ts"))
                .unwrap();
            assert_eq!(name.len(), 6);
            assert!(name.bytes().all(|b| BASE36.contains(&b)));

            let chunk = ContextMode::Spotify.generate_item(0, &mut rng);
            let hex = chunk.strip_prefix("Chunk: 0x").unwrap();
            assert_eq!(hex.len(), 4);
            assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));
        }
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let a = ContextMode::Git.generate_items(4, &mut StdRng::seed_from_u64(1));
        let b = ContextMode::Git.generate_items(4, &mut StdRng::seed_from_u64(1));
        assert_eq!(a, b);
    }

    #[test]
    fn test_seed_items() {
        assert_eq!(seed_items(2), vec!["TX_ALPHA", "TX_BETA"]);
        assert_eq!(seed_items(6)[4..], ["TX_E".to_owned(), "TX_F".to_owned()]);
        assert!(seed_items(0).is_empty());
    }

    #[test]
    fn test_names() {
        let names: Vec<String> = ContextMode::ALL.iter().map(ToString::to_string).collect();
        assert_eq!(names, vec!["default", "bitcoin", "git", "spotify"]);
    }
}
