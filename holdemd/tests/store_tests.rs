//! Filesystem store behavior: JSONL event logs, idempotent appends and
//! snapshot round-trips.

use std::fs;

use holdem_shared::{PlayerAction, TableStatus};
use holdemd::game::{replay_hand, Hand};
use holdemd::poker::DeckSeed;
use holdemd::store::{FsStore, HandRecord, SeatRecord, Store, TableSnapshot};

fn scratch_dir() -> std::path::PathBuf {
    std::env::temp_dir().join(format!("holdemd-store-test-{}", uuid::Uuid::new_v4()))
}

fn finished_hand() -> Hand {
    let mut hand = Hand::start(1, 0, &[1000, 1000], 5, 10, DeckSeed::from_u64(55)).unwrap();
    hand.apply_action(0, PlayerAction::AllIn).unwrap();
    hand.apply_action(1, PlayerAction::Fold).unwrap();
    hand
}

#[test]
fn event_log_round_trips_and_appends_idempotently() {
    let dir = scratch_dir();
    let store = FsStore::new(&dir);
    let hand = finished_hand();

    let split = hand.events.len() / 2;
    store.append_events("ROOM01", 1, &hand.events[..split]).unwrap();
    // A retried batch overlaps the already-appended prefix; the log must
    // not grow duplicates.
    store.append_events("ROOM01", 1, &hand.events).unwrap();
    store.append_events("ROOM01", 1, &hand.events).unwrap();

    let loaded = store.load_events("ROOM01", 1).unwrap();
    assert_eq!(loaded, hand.events);

    let replayed = replay_hand(&loaded).unwrap();
    assert_eq!(replayed, hand);

    assert!(store.load_events("ROOM01", 2).is_err());
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn snapshots_and_hand_records_round_trip() {
    let dir = scratch_dir();
    let store = FsStore::new(&dir);
    let hand = finished_hand();

    let snapshot = TableSnapshot {
        table_id: "store-test".into(),
        room_code: "ROOM02".into(),
        small_blind: 5,
        big_blind: 10,
        starting_chips: 1000,
        status: TableStatus::Playing,
        dealer_pos: 0,
        hand_counter: 1,
        revision: 9,
        seats: vec![
            SeatRecord {
                id: holdem_shared::SeatId(0),
                name: "Alice".into(),
                fingerprint: "fp-a".into(),
                chips: 1010,
                show_cards: false,
                connected: true,
            },
            SeatRecord {
                id: holdem_shared::SeatId(1),
                name: "Bob".into(),
                fingerprint: "fp-b".into(),
                chips: 990,
                show_cards: true,
                connected: false,
            },
        ],
        hand: Some(hand.clone()),
    };

    store.save_snapshot(&snapshot).unwrap();
    let loaded = store.load_snapshot("ROOM02").unwrap().unwrap();
    assert_eq!(loaded, snapshot);
    assert_eq!(store.load_snapshot("NOSUCH").unwrap(), None);

    let record = HandRecord::from_hand(&hand);
    store.save_hand("ROOM02", &record).unwrap();

    assert_eq!(store.list_rooms().unwrap(), vec!["ROOM02".to_string()]);
    fs::remove_dir_all(&dir).ok();
}
