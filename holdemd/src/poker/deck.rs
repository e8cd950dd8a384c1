//! Deck construction and the seeded deterministic shuffle.
//!
//! Every hand records its shuffle seed in the `HandStart` event, so any
//! holder of the event log can reproduce the exact deal.

use rand::seq::SliceRandom;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use holdem_shared::{full_deck, Card};

/// Seed for a hand's shuffle. 32 bytes keying the ChaCha20 counter PRNG
/// that drives the Fisher-Yates permutation. Serializes as a hex string,
/// matching its representation in `HandStart` events.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeckSeed(pub [u8; 32]);

impl Serialize for DeckSeed {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for DeckSeed {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        DeckSeed::from_hex(&s).ok_or_else(|| serde::de::Error::custom("malformed deck seed"))
    }
}

impl DeckSeed {
    /// Fresh random seed from the OS entropy source.
    pub fn random() -> Self {
        let mut bytes = [0u8; 32];
        rand::rng().fill_bytes(&mut bytes);
        DeckSeed(bytes)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(s: &str) -> Option<Self> {
        let bytes = hex::decode(s).ok()?;
        let arr: [u8; 32] = bytes.try_into().ok()?;
        Some(DeckSeed(arr))
    }

    /// Convenience for tests: expand a small integer into a full seed.
    pub fn from_u64(n: u64) -> Self {
        let mut bytes = [0u8; 32];
        bytes[..8].copy_from_slice(&n.to_le_bytes());
        DeckSeed(bytes)
    }
}

/// The 52-card deck permuted deterministically by `seed`.
pub fn shuffled_deck(seed: &DeckSeed) -> Vec<Card> {
    let mut rng = ChaCha20Rng::from_seed(seed.0);
    let mut deck = full_deck();
    deck.shuffle(&mut rng);
    deck
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_permutation() {
        let seed = DeckSeed::from_u64(42);
        assert_eq!(shuffled_deck(&seed), shuffled_deck(&seed));
    }

    #[test]
    fn different_seeds_differ() {
        let a = shuffled_deck(&DeckSeed::from_u64(1));
        let b = shuffled_deck(&DeckSeed::from_u64(2));
        assert_ne!(a, b);
    }

    #[test]
    fn seed_hex_round_trip() {
        let seed = DeckSeed::random();
        let back = DeckSeed::from_hex(&seed.to_hex()).unwrap();
        assert_eq!(seed, back);
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let deck = shuffled_deck(&DeckSeed::from_u64(7));
        assert_eq!(deck.len(), 52);
        let mut sorted = deck.clone();
        sorted.sort_by_key(|c| (c.suit.as_usize(), c.value()));
        let mut reference = full_deck();
        reference.sort_by_key(|c| (c.suit.as_usize(), c.value()));
        assert_eq!(sorted, reference);
    }
}
