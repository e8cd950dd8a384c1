//! Best-5-of-7 hand evaluation.
//!
//! Produces a [`HandRank`] (category + descending tiebreaker values); the
//! derived ordering on `HandRank` is the comparator used for every pot
//! award. Raw card values are never compared across categories.

use holdem_shared::{Card, HandRank, HandRankCategory};

const NUM_SUITS: usize = 4;
const VALUE_COUNT_SIZE: usize = 15; // index by value 2..=14, 1 reserved for the wheel ace

/// Evaluate the best 5-card hand from 2 hole + up to 5 community cards.
pub fn evaluate_best_hand(hole: [Card; 2], community: &[Card]) -> HandRank {
    let mut cards = Vec::with_capacity(7);
    cards.push(hole[0]);
    cards.push(hole[1]);
    cards.extend_from_slice(community);
    evaluate_cards(&cards)
}

/// Evaluate up to 7 cards.
pub fn evaluate_cards(cards: &[Card]) -> HandRank {
    let flush_suit = flush_suit(cards);

    if let Some(sflush) = check_straight_flush(cards, flush_suit) {
        return sflush;
    }

    let (counts, all_values) = count_values(cards);

    if let Some(quads) = check_four_of_a_kind(&counts, &all_values) {
        return quads;
    }
    if let Some(full_house) = check_full_house(&counts) {
        return full_house;
    }
    if let Some(flush) = check_flush(cards, flush_suit) {
        return flush;
    }
    if let Some(straight) = check_straight(cards) {
        return straight;
    }
    if let Some(trips) = check_three_of_a_kind(&counts, &all_values) {
        return trips;
    }
    if let Some(two_pair) = check_two_pair(&counts, &all_values) {
        return two_pair;
    }
    if let Some(pair) = check_one_pair(&counts, &all_values) {
        return pair;
    }
    check_high_card(&all_values)
}

/// The exact best 5-card combination, for presentation at showdown.
/// Enumerates all 5-card subsets and keeps the highest-ranked one.
pub fn pick_best_five(hole: [Card; 2], community: &[Card]) -> [Card; 5] {
    let mut all = Vec::with_capacity(7);
    all.push(hole[0]);
    all.push(hole[1]);
    all.extend_from_slice(community);

    // Early streets: fewer than 5 cards available, take the highest ones.
    if all.len() < 5 {
        all.sort_unstable_by(|a, b| b.value().cmp(&a.value()));
        let mut out = [all[0]; 5];
        let n = all.len();
        out[..n].copy_from_slice(&all[..n]);
        return out;
    }

    let n = all.len();
    let mut best_rank: Option<HandRank> = None;
    let mut best_combo = [all[0]; 5];

    for i in 0..(n - 4) {
        for j in (i + 1)..(n - 3) {
            for k in (j + 1)..(n - 2) {
                for l in (k + 1)..(n - 1) {
                    for m in (l + 1)..n {
                        let subset = [all[i], all[j], all[k], all[l], all[m]];
                        let rank = evaluate_cards(subset.as_ref());
                        if best_rank.as_ref().is_none_or(|r| rank > *r) {
                            best_rank = Some(rank);
                            best_combo = subset;
                        }
                    }
                }
            }
        }
    }

    best_combo
}

// ===== Internal helpers =====

fn flush_suit(cards: &[Card]) -> Option<usize> {
    let mut per_suit = [0usize; NUM_SUITS];
    for c in cards {
        per_suit[c.suit.as_usize()] += 1;
    }
    (0..NUM_SUITS).find(|&s| per_suit[s] >= 5)
}

fn count_values(cards: &[Card]) -> ([u8; VALUE_COUNT_SIZE], Vec<u8>) {
    let mut counts = [0u8; VALUE_COUNT_SIZE];
    let mut all_values = Vec::with_capacity(cards.len());
    for c in cards {
        let v = c.value();
        counts[v as usize] += 1;
        all_values.push(v);
    }
    (counts, all_values)
}

fn suited_cards(cards: &[Card], suit: usize) -> Vec<Card> {
    cards
        .iter()
        .copied()
        .filter(|c| c.suit.as_usize() == suit)
        .collect()
}

fn check_straight_flush(cards: &[Card], flush_suit: Option<usize>) -> Option<HandRank> {
    let fs = flush_suit?;
    let values = values_unique_sorted(&suited_cards(cards, fs));
    let high = straight_high(&values)?;
    let category = if high == 14 {
        HandRankCategory::RoyalFlush
    } else {
        HandRankCategory::StraightFlush
    };
    Some(HandRank {
        category,
        tiebreakers: vec![high],
    })
}

fn check_four_of_a_kind(counts: &[u8; VALUE_COUNT_SIZE], all_values: &[u8]) -> Option<HandRank> {
    find_n_kind_with_kickers(counts, all_values, 4, 1).map(|(quad, kickers)| {
        let mut t = vec![quad];
        t.extend(kickers);
        HandRank {
            category: HandRankCategory::FourKind,
            tiebreakers: t,
        }
    })
}

fn check_full_house(counts: &[u8; VALUE_COUNT_SIZE]) -> Option<HandRank> {
    let mut trips = Vec::new();
    let mut pairs = Vec::new();
    for v in (2..=14u8).rev() {
        if counts[v as usize] >= 3 {
            trips.push(v);
        } else if counts[v as usize] >= 2 {
            pairs.push(v);
        }
    }
    let trip = *trips.first()?;
    // A second set of trips supplies the pair when no plain pair exists.
    let pair = pairs.first().copied().or_else(|| trips.get(1).copied())?;
    Some(HandRank {
        category: HandRankCategory::FullHouse,
        tiebreakers: vec![trip, pair],
    })
}

fn check_flush(cards: &[Card], flush_suit: Option<usize>) -> Option<HandRank> {
    let fs = flush_suit?;
    let mut vs: Vec<u8> = suited_cards(cards, fs).iter().map(|c| c.value()).collect();
    vs.sort_unstable_by(|a, b| b.cmp(a));
    vs.truncate(5);
    Some(HandRank {
        category: HandRankCategory::Flush,
        tiebreakers: vs,
    })
}

fn check_straight(cards: &[Card]) -> Option<HandRank> {
    let values = values_unique_sorted(cards);
    straight_high(&values).map(|high| HandRank {
        category: HandRankCategory::Straight,
        tiebreakers: vec![high],
    })
}

fn check_three_of_a_kind(counts: &[u8; VALUE_COUNT_SIZE], all_values: &[u8]) -> Option<HandRank> {
    find_n_kind_with_kickers(counts, all_values, 3, 2).map(|(trip, kickers)| {
        let mut t = vec![trip];
        t.extend(kickers);
        HandRank {
            category: HandRankCategory::ThreeKind,
            tiebreakers: t,
        }
    })
}

fn check_two_pair(counts: &[u8; VALUE_COUNT_SIZE], all_values: &[u8]) -> Option<HandRank> {
    let mut pairs = Vec::new();
    for v in (2..=14u8).rev() {
        if counts[v as usize] >= 2 {
            pairs.push(v);
        }
    }
    if pairs.len() < 2 {
        return None;
    }
    let p_high = pairs[0];
    let p_low = pairs[1];
    let mut kickers: Vec<u8> = all_values
        .iter()
        .copied()
        .filter(|&v| v != p_high && v != p_low)
        .collect();
    kickers.sort_unstable_by(|a, b| b.cmp(a));
    kickers.dedup();
    let kicker = kickers.first().copied().unwrap_or(2);
    Some(HandRank {
        category: HandRankCategory::TwoPair,
        tiebreakers: vec![p_high, p_low, kicker],
    })
}

fn check_one_pair(counts: &[u8; VALUE_COUNT_SIZE], all_values: &[u8]) -> Option<HandRank> {
    find_n_kind_with_kickers(counts, all_values, 2, 3).map(|(pair, kickers)| {
        let mut t = vec![pair];
        t.extend(kickers);
        HandRank {
            category: HandRankCategory::Pair,
            tiebreakers: t,
        }
    })
}

fn check_high_card(all_values: &[u8]) -> HandRank {
    let mut highs = all_values.to_vec();
    highs.sort_unstable_by(|a, b| b.cmp(a));
    highs.dedup();
    highs.truncate(5);
    HandRank {
        category: HandRankCategory::HighCard,
        tiebreakers: highs,
    }
}

fn values_unique_sorted(cards: &[Card]) -> Vec<u8> {
    let mut v: Vec<u8> = cards.iter().map(|c| c.value()).collect();
    v.sort_unstable();
    v.dedup();
    v
}

/// Highest straight high-card among the given unique values, if any.
/// The wheel (A-2-3-4-5) counts with high card 5.
fn straight_high(values_unique_sorted_asc: &[u8]) -> Option<u8> {
    let mut present = [false; VALUE_COUNT_SIZE];
    for &v in values_unique_sorted_asc {
        if (2..=14).contains(&v) {
            present[v as usize] = true;
        }
    }
    // Wheel: the ace doubles as value 1.
    if present[14] {
        present[1] = true;
    }

    let mut best: Option<u8> = None;
    let mut run_len = 0usize;
    for v in 1..=14usize {
        if present[v] {
            run_len += 1;
            if run_len >= 5 && best.is_none_or(|b| v as u8 > b) {
                best = Some(v as u8);
            }
        } else {
            run_len = 0;
        }
    }
    best
}

fn find_n_kind_with_kickers(
    counts: &[u8; VALUE_COUNT_SIZE],
    all_values: &[u8],
    n: u8,
    kicker_count: usize,
) -> Option<(u8, Vec<u8>)> {
    let mut kind_value = None;
    for v in (2..=14u8).rev() {
        if counts[v as usize] == n {
            kind_value = Some(v);
            break;
        }
    }
    let kv = kind_value?;
    let mut kickers: Vec<u8> = all_values.iter().copied().filter(|&v| v != kv).collect();
    kickers.sort_unstable_by(|a, b| b.cmp(a));
    kickers.dedup();
    kickers.truncate(kicker_count);
    Some((kv, kickers))
}

#[cfg(test)]
mod tests {
    use super::*;
    use holdem_shared::{Rank, Suit};

    fn card(rank: Rank, suit: Suit) -> Card {
        Card::new(rank, suit)
    }

    #[test]
    fn wheel_straight_high_is_five() {
        let hole = [card(Rank::Ace, Suit::Clubs), card(Rank::Two, Suit::Hearts)];
        let community = vec![
            card(Rank::Three, Suit::Diamonds),
            card(Rank::Four, Suit::Spades),
            card(Rank::Five, Suit::Clubs),
            card(Rank::Nine, Suit::Hearts),
            card(Rank::King, Suit::Diamonds),
        ];
        let rank = evaluate_best_hand(hole, &community);
        assert_eq!(rank.category, HandRankCategory::Straight);
        assert_eq!(rank.tiebreakers, vec![5]);
    }

    #[test]
    fn royal_flush_outranks_straight_flush() {
        let royal = evaluate_best_hand(
            [card(Rank::Ace, Suit::Spades), card(Rank::King, Suit::Spades)],
            &[
                card(Rank::Queen, Suit::Spades),
                card(Rank::Jack, Suit::Spades),
                card(Rank::Ten, Suit::Spades),
                card(Rank::Two, Suit::Hearts),
                card(Rank::Three, Suit::Clubs),
            ],
        );
        let straight_flush = evaluate_best_hand(
            [
                card(Rank::Nine, Suit::Spades),
                card(Rank::King, Suit::Spades),
            ],
            &[
                card(Rank::Queen, Suit::Spades),
                card(Rank::Jack, Suit::Spades),
                card(Rank::Ten, Suit::Spades),
                card(Rank::Two, Suit::Hearts),
                card(Rank::Three, Suit::Clubs),
            ],
        );
        assert_eq!(royal.category, HandRankCategory::RoyalFlush);
        assert_eq!(straight_flush.category, HandRankCategory::StraightFlush);
        assert!(royal > straight_flush);
    }

    #[test]
    fn flush_takes_five_highest_of_suit() {
        let rank = evaluate_best_hand(
            [
                card(Rank::Two, Suit::Hearts),
                card(Rank::Nine, Suit::Hearts),
            ],
            &[
                card(Rank::King, Suit::Hearts),
                card(Rank::Four, Suit::Hearts),
                card(Rank::Jack, Suit::Hearts),
                card(Rank::Three, Suit::Hearts),
                card(Rank::Ace, Suit::Clubs),
            ],
        );
        assert_eq!(rank.category, HandRankCategory::Flush);
        assert_eq!(rank.tiebreakers, vec![13, 11, 9, 4, 3]);
    }

    #[test]
    fn full_house_prefers_highest_trip_then_pair() {
        // Two trips among seven cards: nines and fours.
        let rank = evaluate_best_hand(
            [
                card(Rank::Nine, Suit::Clubs),
                card(Rank::Nine, Suit::Hearts),
            ],
            &[
                card(Rank::Nine, Suit::Diamonds),
                card(Rank::Four, Suit::Clubs),
                card(Rank::Four, Suit::Hearts),
                card(Rank::Four, Suit::Spades),
                card(Rank::King, Suit::Diamonds),
            ],
        );
        assert_eq!(rank.category, HandRankCategory::FullHouse);
        assert_eq!(rank.tiebreakers, vec![9, 4]);
    }

    #[test]
    fn pair_beats_high_card_regardless_of_values() {
        // Guard against comparing raw card values across categories: a pair
        // of nines must beat an ace-high no-pair hand.
        let pair_of_nines = evaluate_best_hand(
            [
                card(Rank::Six, Suit::Diamonds),
                card(Rank::Nine, Suit::Clubs),
            ],
            &[
                card(Rank::Three, Suit::Spades),
                card(Rank::Jack, Suit::Spades),
                card(Rank::Ten, Suit::Clubs),
                card(Rank::Four, Suit::Hearts),
                card(Rank::Nine, Suit::Spades),
            ],
        );
        let high_card = evaluate_best_hand(
            [
                card(Rank::Five, Suit::Diamonds),
                card(Rank::Seven, Suit::Clubs),
            ],
            &[
                card(Rank::Three, Suit::Spades),
                card(Rank::Jack, Suit::Spades),
                card(Rank::Ten, Suit::Clubs),
                card(Rank::Four, Suit::Hearts),
                card(Rank::Nine, Suit::Spades),
            ],
        );
        assert_eq!(pair_of_nines.category, HandRankCategory::Pair);
        assert_eq!(high_card.category, HandRankCategory::HighCard);
        assert!(pair_of_nines > high_card);
    }

    #[test]
    fn best_five_contains_the_pair() {
        let hole = [
            card(Rank::Jack, Suit::Clubs),
            card(Rank::Seven, Suit::Hearts),
        ];
        let community = vec![
            card(Rank::King, Suit::Hearts),
            card(Rank::Ten, Suit::Spades),
            card(Rank::Nine, Suit::Hearts),
            card(Rank::Nine, Suit::Clubs),
            card(Rank::Four, Suit::Clubs),
        ];
        let best_five = pick_best_five(hole, &community);
        let nines = best_five.iter().filter(|c| c.rank == Rank::Nine).count();
        assert_eq!(nines, 2);
    }
}
