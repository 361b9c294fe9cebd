//! Elimination-based card inference over the canonical deck.

mod pool;
mod targets;

pub use pool::{CardPool, SlotEstimate, best_slot, probability};
pub use targets::{
    is_critical, is_playable, is_useless, playable_targets, useful_cards, useless_cards,
};
