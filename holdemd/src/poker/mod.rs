//! Card evaluation and deck plumbing.

pub mod deck;
pub mod evaluation;

pub use deck::{shuffled_deck, DeckSeed};
pub use evaluation::{evaluate_best_hand, evaluate_cards, pick_best_five};
