//! Side-pot construction.
//!
//! Pots are built level by level from the distinct `total_bet` amounts of
//! contending seats. Folded seats contribute chips up to each level but are
//! never eligible to win. A layer with a single eligible seat is that
//! seat's uncalled excess and is returned, not won.

use holdem_shared::{Pot, SeatId};

use crate::game::hand::HandSeat;

/// Build the ordered pot list (main pot first) from per-seat totals.
/// The amounts always sum to the seats' combined `total_bet`.
pub fn build_pots(seats: &[HandSeat]) -> Vec<Pot> {
    let mut levels: Vec<u32> = seats
        .iter()
        .filter(|s| s.status.contends())
        .map(|s| s.total_bet)
        .filter(|&b| b > 0)
        .collect();
    levels.sort_unstable();
    levels.dedup();

    let mut pots = Vec::with_capacity(levels.len());
    let mut prev = 0u32;
    for &level in &levels {
        let mut amount = 0u32;
        for seat in seats {
            amount += seat.total_bet.min(level) - seat.total_bet.min(prev);
        }
        let eligible: Vec<SeatId> = seats
            .iter()
            .enumerate()
            .filter(|(_, s)| s.status.contends() && s.total_bet >= level)
            .map(|(i, _)| SeatId(i))
            .collect();
        if amount > 0 {
            pots.push(Pot { amount, eligible });
        }
        prev = level;
    }
    pots
}

#[cfg(test)]
mod tests {
    use super::*;
    use holdem_shared::SeatStatus;

    fn seat(total_bet: u32, status: SeatStatus) -> HandSeat {
        HandSeat {
            chips: 0,
            hole_cards: None,
            status,
            current_bet: 0,
            total_bet,
            last_action: None,
        }
    }

    #[test]
    fn single_level_single_pot() {
        let seats = vec![
            seat(100, SeatStatus::Active),
            seat(100, SeatStatus::Active),
            seat(100, SeatStatus::Active),
        ];
        let pots = build_pots(&seats);
        assert_eq!(pots.len(), 1);
        assert_eq!(pots[0].amount, 300);
        assert_eq!(pots[0].eligible.len(), 3);
    }

    #[test]
    fn short_stack_creates_side_pot() {
        // Alice committed 500, Bob all-in for 200.
        let seats = vec![
            seat(500, SeatStatus::Active),
            seat(200, SeatStatus::AllIn),
        ];
        let pots = build_pots(&seats);
        assert_eq!(pots.len(), 2);
        assert_eq!(pots[0].amount, 400);
        assert_eq!(pots[0].eligible, vec![SeatId(0), SeatId(1)]);
        assert_eq!(pots[1].amount, 300);
        assert_eq!(pots[1].eligible, vec![SeatId(0)]);
    }

    #[test]
    fn folded_seats_contribute_but_are_never_eligible() {
        let seats = vec![
            seat(300, SeatStatus::Active),
            seat(300, SeatStatus::Active),
            seat(150, SeatStatus::Folded),
        ];
        let pots = build_pots(&seats);
        assert_eq!(pots.len(), 1);
        assert_eq!(pots[0].amount, 750);
        assert_eq!(pots[0].eligible, vec![SeatId(0), SeatId(1)]);
    }

    #[test]
    fn folded_money_splits_across_levels() {
        // Three-way: short all-in 100, folder 250, big stacks 400 each.
        let seats = vec![
            seat(400, SeatStatus::Active),
            seat(100, SeatStatus::AllIn),
            seat(250, SeatStatus::Folded),
            seat(400, SeatStatus::Active),
        ];
        let pots = build_pots(&seats);
        assert_eq!(pots.len(), 2);
        // Level 100: everyone contributes 100.
        assert_eq!(pots[0].amount, 400);
        assert_eq!(pots[0].eligible, vec![SeatId(0), SeatId(1), SeatId(3)]);
        // Level 400: folder adds its remaining 150, actives add 300 each.
        assert_eq!(pots[1].amount, 750);
        assert_eq!(pots[1].eligible, vec![SeatId(0), SeatId(3)]);

        let total: u32 = seats.iter().map(|s| s.total_bet).sum();
        let pot_sum: u32 = pots.iter().map(|p| p.amount).sum();
        assert_eq!(total, pot_sum);
    }

    #[test]
    fn eligibility_shrinks_monotonically() {
        let seats = vec![
            seat(50, SeatStatus::AllIn),
            seat(120, SeatStatus::AllIn),
            seat(400, SeatStatus::Active),
            seat(400, SeatStatus::Active),
        ];
        let pots = build_pots(&seats);
        for w in pots.windows(2) {
            for id in &w[1].eligible {
                assert!(w[0].eligible.contains(id));
            }
        }
    }
}
