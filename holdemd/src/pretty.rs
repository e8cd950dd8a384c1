//! Human-oriented console rendering of hand events, used for server-side
//! logs as hands progress.

use owo_colors::OwoColorize;

use holdem_shared::{ActionKind, BlindKind, Card, HandEvent, HandEventBody, SeatId};

use crate::store::SeatRecord;

pub fn format_card(c: Card, color: bool) -> String {
    let text = c.to_string();
    if color && c.is_red() {
        text.red().to_string()
    } else {
        text
    }
}

fn format_cards(cards: &[Card], color: bool) -> String {
    cards
        .iter()
        .map(|&c| format_card(c, color))
        .collect::<Vec<_>>()
        .join(" ")
}

fn seat_name(seats: &[SeatRecord], seat: SeatId) -> String {
    seats
        .get(seat.0)
        .map(|s| s.name.clone())
        .unwrap_or_else(|| format!("seat {}", seat.0))
}

fn format_action(kind: &ActionKind) -> String {
    match kind {
        ActionKind::Fold => "folds".to_string(),
        ActionKind::Check => "checks".to_string(),
        ActionKind::Call { amount } => format!("calls {amount}"),
        ActionKind::Bet { amount } => format!("bets {amount}"),
        ActionKind::Raise { to, by } => format!("raises by {by} to {to}"),
        ActionKind::AllIn { amount } => format!("goes all-in for {amount}"),
    }
}

/// One line per event, with the acting seat's display name resolved.
pub fn format_event_human(event: &HandEvent, seats: &[SeatRecord], color: bool) -> String {
    match &event.body {
        HandEventBody::HandStart {
            hand_no,
            dealer_pos,
            small_blind,
            big_blind,
            ..
        } => {
            let line = format!(
                "hand #{hand_no} begins, dealer {}, blinds {small_blind}/{big_blind}",
                seat_name(seats, SeatId(*dealer_pos))
            );
            if color {
                line.bold().to_string()
            } else {
                line
            }
        }
        HandEventBody::Deal { seat, .. } => {
            format!("{} receives hole cards", seat_name(seats, *seat))
        }
        HandEventBody::PostBlind { seat, kind, amount } => {
            let kind = match kind {
                BlindKind::SmallBlind => "small blind",
                BlindKind::BigBlind => "big blind",
            };
            format!("{} posts {kind} {amount}", seat_name(seats, *seat))
        }
        HandEventBody::Action { seat, action, .. } => {
            format!("{} {}", seat_name(seats, *seat), format_action(action))
        }
        HandEventBody::DealCommunity { street, cards } => {
            format!("{street}: {}", format_cards(cards, color))
        }
        HandEventBody::AdvanceStreet { to, .. } => format!("--- {to} ---"),
        HandEventBody::Showdown { pots, winners_by_pot } => {
            let mut parts = Vec::new();
            for (pot, winners) in pots.iter().zip(winners_by_pot) {
                if winners.is_empty() {
                    parts.push(format!("{} returned uncalled", pot.amount));
                } else {
                    let names: Vec<String> =
                        winners.iter().map(|&w| seat_name(seats, w)).collect();
                    parts.push(format!("{} to {}", pot.amount, names.join(", ")));
                }
            }
            let line = format!("showdown: {}", parts.join("; "));
            if color {
                line.green().to_string()
            } else {
                line
            }
        }
        HandEventBody::HandComplete { stacks_end } => {
            let stacks: Vec<String> = stacks_end
                .iter()
                .enumerate()
                .map(|(i, c)| format!("{}={c}", seat_name(seats, SeatId(i))))
                .collect();
            format!("hand complete, stacks: {}", stacks.join(" "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use holdem_shared::{Rank, Suit};

    #[test]
    fn red_cards_only_colored_when_enabled() {
        let card = Card::new(Rank::Ace, Suit::Hearts);
        assert_eq!(format_card(card, false), "A♥");
        assert!(format_card(card, true).contains("A♥"));
        assert_ne!(format_card(card, true), "A♥");
    }
}
