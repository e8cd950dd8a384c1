//! Hand ranking types. Ordering is rank category first, then the
//! lexicographic tiebreaker tuple; this derived `Ord` is the single
//! comparator used for every pot award.

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::seat::SeatId;

/// Categories of poker hands, weakest to strongest.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum HandRankCategory {
    HighCard,
    Pair,
    TwoPair,
    ThreeKind,
    Straight,
    Flush,
    FullHouse,
    FourKind,
    StraightFlush,
    RoyalFlush,
}

impl HandRankCategory {
    /// Numeric rank 1 (high card) .. 10 (royal flush).
    pub fn rank(self) -> u8 {
        self as u8 + 1
    }
}

/// Complete ranking of a best-5 hand: category plus descending kicker
/// values that discriminate hands of equal category.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct HandRank {
    pub category: HandRankCategory,
    pub tiebreakers: Vec<u8>,
}

/// A seat's evaluated hand at showdown.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct HandResult {
    pub seat: SeatId,
    pub rank: HandRank,
    pub best_five: [Card; 5],
}

/// One pot layer: the chips in it and the seats that may win it.
/// Eligibility shrinks from the main pot to the last side pot.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pot {
    pub amount: u32,
    pub eligible: Vec<SeatId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_dominates_tiebreakers() {
        let pair_of_aces = HandRank {
            category: HandRankCategory::Pair,
            tiebreakers: vec![14, 13, 12, 11],
        };
        let two_pair_low = HandRank {
            category: HandRankCategory::TwoPair,
            tiebreakers: vec![3, 2, 4],
        };
        assert!(two_pair_low > pair_of_aces);
    }

    #[test]
    fn numeric_ranks_span_one_to_ten() {
        assert_eq!(HandRankCategory::HighCard.rank(), 1);
        assert_eq!(HandRankCategory::RoyalFlush.rank(), 10);
    }
}
