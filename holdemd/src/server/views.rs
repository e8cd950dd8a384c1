//! Snapshot projections.
//!
//! The engine never hides cards; these pure functions derive what each
//! audience may see. Hole cards reach the table view only when the seat
//! opted to show, at a contested showdown, or once an all-in run-out has
//! made every remaining decision moot.

use holdem_shared::{
    HandView, PlayerView, SeatId, SeatPublic, SeatStatus, TableView,
};

use crate::game::{build_pots, Hand};
use crate::store::TableSnapshot;

/// The public observer projection.
pub fn table_view(snapshot: &TableSnapshot) -> TableView {
    let hand = snapshot.hand.as_ref();
    let runout = hand.is_some_and(|h| h.is_runout());
    let contested_showdown =
        hand.is_some_and(|h| h.showdown_done && h.contenders().len() >= 2);

    let seats = snapshot
        .seats
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let hand_seat = hand.and_then(|h| h.seats.get(i));
            let contends = hand_seat.is_some_and(|s| s.status.contends());
            let reveal =
                record.show_cards || (contends && (contested_showdown || runout));
            SeatPublic {
                id: record.id,
                name: record.name.clone(),
                chips: hand_seat.map(|s| s.chips).unwrap_or(record.chips),
                status: hand_seat.map(|s| s.status).unwrap_or(if record.chips > 0 {
                    SeatStatus::Active
                } else {
                    SeatStatus::Out
                }),
                current_bet: hand_seat.map(|s| s.current_bet).unwrap_or(0),
                total_bet: hand_seat.map(|s| s.total_bet).unwrap_or(0),
                last_action: hand_seat.and_then(|s| s.last_action),
                hole_cards: hand_seat.and_then(|s| reveal.then_some(s.hole_cards).flatten()),
                show_cards: record.show_cards,
                connected: record.connected,
                is_dealer: hand.is_some_and(|h| h.dealer_pos == i),
                is_small_blind: hand.is_some_and(|h| h.sb_pos == i),
                is_big_blind: hand.is_some_and(|h| h.bb_pos == i),
            }
        })
        .collect();

    TableView {
        room_code: snapshot.room_code.clone(),
        revision: snapshot.revision,
        status: snapshot.status,
        small_blind: snapshot.small_blind,
        big_blind: snapshot.big_blind,
        starting_chips: snapshot.starting_chips,
        seats,
        hand: hand.map(hand_view),
    }
}

/// The per-player projection: the table view plus the viewer's own cards.
pub fn player_view(snapshot: &TableSnapshot, viewer: SeatId) -> PlayerView {
    let mut table = table_view(snapshot);
    if let Some(hand) = &snapshot.hand {
        if let (Some(public), Some(own)) =
            (table.seats.get_mut(viewer.0), hand.seats.get(viewer.0))
        {
            public.hole_cards = own.hole_cards;
        }
    }
    PlayerView { viewer, table }
}

fn hand_view(hand: &Hand) -> HandView {
    HandView {
        hand_no: hand.hand_no,
        street: hand.street,
        community: hand.community.clone(),
        pot: hand.pot,
        pots: if hand.showdown_done {
            hand.pots.clone()
        } else {
            build_pots(&hand.seats)
        },
        current_bet: hand.current_bet,
        min_raise: hand.last_raise,
        to_act: hand.to_act.map(SeatId),
        dealer_pos: hand.dealer_pos,
        winners: hand.winners.iter().map(|&i| SeatId(i)).collect(),
        results: if hand.showdown_done {
            hand.results.clone()
        } else {
            Vec::new()
        },
        complete: hand.complete,
    }
}
