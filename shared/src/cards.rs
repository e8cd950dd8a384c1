//! Card and deck primitives shared between the engine and the wire.

use serde::{Deserialize, Serialize};

/// Card rank. `value()` follows the ace-high convention (2..14, A=14).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Rank {
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "3")]
    Three,
    #[serde(rename = "4")]
    Four,
    #[serde(rename = "5")]
    Five,
    #[serde(rename = "6")]
    Six,
    #[serde(rename = "7")]
    Seven,
    #[serde(rename = "8")]
    Eight,
    #[serde(rename = "9")]
    Nine,
    #[serde(rename = "10")]
    Ten,
    #[serde(rename = "J")]
    Jack,
    #[serde(rename = "Q")]
    Queen,
    #[serde(rename = "K")]
    King,
    #[serde(rename = "A")]
    Ace,
}

pub const ALL_RANKS: [Rank; 13] = [
    Rank::Two,
    Rank::Three,
    Rank::Four,
    Rank::Five,
    Rank::Six,
    Rank::Seven,
    Rank::Eight,
    Rank::Nine,
    Rank::Ten,
    Rank::Jack,
    Rank::Queen,
    Rank::King,
    Rank::Ace,
];

impl Rank {
    /// Ace-high numeric value: 2..14.
    pub fn value(self) -> u8 {
        match self {
            Rank::Two => 2,
            Rank::Three => 3,
            Rank::Four => 4,
            Rank::Five => 5,
            Rank::Six => 6,
            Rank::Seven => 7,
            Rank::Eight => 8,
            Rank::Nine => 9,
            Rank::Ten => 10,
            Rank::Jack => 11,
            Rank::Queen => 12,
            Rank::King => 13,
            Rank::Ace => 14,
        }
    }

    /// Short face string (A, 2, ..., T for ten).
    pub fn face(self) -> &'static str {
        match self {
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "T",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
            Rank::Ace => "A",
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Suit {
    Clubs,
    Diamonds,
    Hearts,
    Spades,
}

pub const ALL_SUITS: [Suit; 4] = [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades];

impl Suit {
    /// Index used for per-suit grouping in the evaluator.
    pub fn as_usize(self) -> usize {
        self as usize
    }

    pub fn icon(self) -> char {
        match self {
            Suit::Clubs => '♣',
            Suit::Diamonds => '♦',
            Suit::Hearts => '♥',
            Suit::Spades => '♠',
        }
    }
}

/// A playing card. Serializes as `{rank, suit, value}` where `value` is the
/// ace-high rank value; `value` is derived and ignored on input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "CardWire", into = "CardWire")]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

#[derive(Clone, Serialize, Deserialize)]
struct CardWire {
    rank: Rank,
    suit: Suit,
    #[serde(default)]
    value: u8,
}

impl From<CardWire> for Card {
    fn from(w: CardWire) -> Self {
        Card {
            rank: w.rank,
            suit: w.suit,
        }
    }
}

impl From<Card> for CardWire {
    fn from(c: Card) -> Self {
        CardWire {
            rank: c.rank,
            suit: c.suit,
            value: c.rank.value(),
        }
    }
}

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Self {
        Card { rank, suit }
    }

    /// Ace-high numeric value of the rank (2..14).
    pub fn value(self) -> u8 {
        self.rank.value()
    }

    pub fn is_red(self) -> bool {
        matches!(self.suit, Suit::Hearts | Suit::Diamonds)
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.rank.face(), self.suit.icon())
    }
}

/// The 52 distinct cards in a fixed suit-major order.
pub fn full_deck() -> Vec<Card> {
    let mut deck = Vec::with_capacity(52);
    for &suit in &ALL_SUITS {
        for &rank in &ALL_RANKS {
            deck.push(Card::new(rank, suit));
        }
    }
    deck
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_deck_is_52_distinct() {
        let deck = full_deck();
        assert_eq!(deck.len(), 52);
        for i in 0..deck.len() {
            for j in (i + 1)..deck.len() {
                assert_ne!(deck[i], deck[j]);
            }
        }
    }

    #[test]
    fn wire_format_carries_value() {
        let c = Card::new(Rank::Ace, Suit::Hearts);
        let v: serde_json::Value = serde_json::to_value(c).unwrap();
        assert_eq!(v["rank"], "A");
        assert_eq!(v["suit"], "hearts");
        assert_eq!(v["value"], 14);

        let back: Card = serde_json::from_value(v).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn wire_format_accepts_missing_value() {
        let c: Card = serde_json::from_str(r#"{"rank":"10","suit":"clubs"}"#).unwrap();
        assert_eq!(c, Card::new(Rank::Ten, Suit::Clubs));
        assert_eq!(c.value(), 10);
    }
}
