//! Comparing digests and payloads.
//!
//! [`avalanche`] measures how many bits of a digest prefix flip between two
//! inputs; [`first_difference`] locates where a received payload departs
//! from the original.

use crate::DigestHasher;

/// Hex characters compared by default: 16 characters, 64 bits.
pub const DEFAULT_AVALANCHE_PREFIX: usize = 16;

/// The bits of the first `prefix_len` hex characters of `digest`, most
/// significant first. Characters that are not hex digits, or missing
/// because the digest is shorter, count as a zero nibble.
pub fn hex_prefix_bits(digest: &str, prefix_len: usize) -> Vec<bool> {
    let mut chars = digest.chars();
    let mut bits = Vec::with_capacity(prefix_len * 4);
    for _ in 0..prefix_len {
        let nibble = chars.next().and_then(|c| c.to_digit(16)).unwrap_or(0);
        bits.extend((0..4).rev().map(|shift| (nibble >> shift) & 1 == 1));
    }
    bits
}

/// Bitwise comparison of two digest prefixes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvalancheReport {
    /// Number of bits compared.
    pub bits_compared: usize,
    /// Number of bits that differ.
    pub bits_flipped: usize,
    /// Positions of the flipped bits, most significant first.
    pub flipped_positions: Vec<usize>,
}

impl AvalancheReport {
    /// Flipped fraction in `[0, 1]`, 0 when nothing was compared.
    pub fn ratio(&self) -> f64 {
        if self.bits_compared == 0 {
            0.0
        } else {
            self.bits_flipped as f64 / self.bits_compared as f64
        }
    }

    /// Flipped share as a rounded whole percentage.
    pub fn percent(&self) -> u32 {
        (self.ratio() * 100.0).round() as u32
    }
}

/// Compare the first `prefix_len` hex characters of two digests bit by bit.
/// The prefix never extends past the longer of the two digests.
pub fn avalanche(before: &str, after: &str, prefix_len: usize) -> AvalancheReport {
    let prefix_len = prefix_len.min(before.chars().count().max(after.chars().count()));
    let before = hex_prefix_bits(before, prefix_len);
    let after = hex_prefix_bits(after, prefix_len);
    let flipped_positions: Vec<usize> = before
        .iter()
        .zip(&after)
        .enumerate()
        .filter(|(_, (a, b))| a != b)
        .map(|(position, _)| position)
        .collect();

    AvalancheReport {
        bits_compared: before.len(),
        bits_flipped: flipped_positions.len(),
        flipped_positions,
    }
}

/// Hash both inputs and compare the digest prefixes.
pub fn avalanche_of<H: DigestHasher + ?Sized>(
    hasher: &H,
    before: &str,
    after: &str,
    prefix_len: usize,
) -> AvalancheReport {
    avalanche(
        &hasher.digest_str(before),
        &hasher.digest_str(after),
        prefix_len,
    )
}

/// Where two strings first diverge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FirstDifference {
    /// Same characters, same length.
    Identical,
    /// Character index of the first mismatch within the common length.
    At(usize),
    /// One string is a strict prefix of the other.
    LengthMismatch {
        /// Characters in the left string.
        left_len: usize,
        /// Characters in the right string.
        right_len: usize,
    },
}

/// Locate the first differing character of `left` and `right`. Indices
/// count characters, not bytes.
pub fn first_difference(left: &str, right: &str) -> FirstDifference {
    let mut left_chars = left.chars();
    let mut right_chars = right.chars();
    let mut index = 0;
    loop {
        match (left_chars.next(), right_chars.next()) {
            (None, None) => return FirstDifference::Identical,
            (Some(a), Some(b)) if a != b => return FirstDifference::At(index),
            (Some(_), Some(_)) => index += 1,
            (Some(_), None) | (None, Some(_)) => {
                return FirstDifference::LengthMismatch {
                    left_len: left.chars().count(),
                    right_len: right.chars().count(),
                };
            }
        }
    }
}

/// Outcome of hashing an original and a received payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TamperCheck {
    /// Digest of the original payload.
    pub original_digest: String,
    /// Digest of the received payload.
    pub received_digest: String,
    /// Where the payloads diverge.
    pub first_difference: FirstDifference,
}

impl TamperCheck {
    /// Hash both payloads and locate their first difference.
    pub fn new<H: DigestHasher + ?Sized>(hasher: &H, original: &str, received: &str) -> Self {
        TamperCheck {
            original_digest: hasher.digest_str(original),
            received_digest: hasher.digest_str(received),
            first_difference: first_difference(original, received),
        }
    }

    /// `true` when the digests match.
    pub fn is_intact(&self) -> bool {
        self.original_digest == self.received_digest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HashAlgorithm;

    #[test]
    fn test_hex_prefix_bits() {
        assert_eq!(
            hex_prefix_bits("a1", 2),
            vec![true, false, true, false, false, false, false, true]
        );
        // non-hex and missing characters are zero nibbles
        assert_eq!(hex_prefix_bits("z", 2), vec![false; 8]);
        assert_eq!(hex_prefix_bits("F", 0), Vec::<bool>::new());
    }

    #[test]
    fn test_avalanche_identical_and_opposite() {
        let same = avalanche("0123456789abcdef", "0123456789abcdef", DEFAULT_AVALANCHE_PREFIX);
        assert_eq!(same.bits_compared, 64);
        assert_eq!(same.bits_flipped, 0);
        assert_eq!(same.percent(), 0);

        let opposite = avalanche("0000", "ffff", 4);
        assert_eq!(opposite.bits_flipped, 16);
        assert_eq!(opposite.percent(), 100);
        assert_eq!(opposite.flipped_positions, (0..16).collect::<Vec<_>>());
    }

    #[test]
    fn test_avalanche_positions() {
        let report = avalanche("8", "9", 1);
        assert_eq!(report.flipped_positions, vec![3]);
        assert_eq!(report.ratio(), 0.25);
        assert_eq!(avalanche("", "", 0).ratio(), 0.0);
    }

    #[test]
    fn test_avalanche_prefix_clamped_to_digest() {
        let report = avalanche("ab", "a", usize::MAX);
        assert_eq!(report.bits_compared, 8);
        // the missing second nibble of "a" counts as zero against "b"
        assert_eq!(report.flipped_positions, vec![4, 6, 7]);

        let full = avalanche_of(&HashAlgorithm::Blake3, "A", "B", usize::MAX);
        assert_eq!(full.bits_compared, 256);
        assert_eq!(avalanche("", "", usize::MAX).bits_compared, 0);
    }

    #[test]
    fn test_single_character_change_flips_many_bits() {
        let report = avalanche_of(&HashAlgorithm::Sha256, "TX_ALPHA", "TX_ALPHB", 16);
        assert!(report.bits_flipped > 8, "{report:?}");
        assert!(report.bits_flipped < 56, "{report:?}");
    }

    #[test]
    fn test_first_difference() {
        assert_eq!(first_difference("abc", "abc"), FirstDifference::Identical);
        assert_eq!(first_difference("", ""), FirstDifference::Identical);
        assert_eq!(first_difference("abc", "abd"), FirstDifference::At(2));
        assert_eq!(first_difference("xbc", "abcdef"), FirstDifference::At(0));
        assert_eq!(
            first_difference("abc", "abcd"),
            FirstDifference::LengthMismatch {
                left_len: 3,
                right_len: 4
            }
        );
        assert_eq!(
            first_difference("", "a"),
            FirstDifference::LengthMismatch {
                left_len: 0,
                right_len: 1
            }
        );
    }

    #[test]
    fn test_first_difference_counts_chars() {
        assert_eq!(first_difference("héllo", "hélla"), FirstDifference::At(4));
    }

    #[test]
    fn test_tamper_check() {
        let h = HashAlgorithm::Sha256;
        let intact = TamperCheck::new(&h, "Send 10 BTC", "Send 10 BTC");
        assert!(intact.is_intact());
        assert_eq!(intact.first_difference, FirstDifference::Identical);

        let tampered = TamperCheck::new(&h, "Send 10 BTC", "Send 90 BTC");
        assert!(!tampered.is_intact());
        assert_eq!(tampered.first_difference, FirstDifference::At(5));
    }
}
