//! Public-knowledge reconstruction from the action history.
//!
//! This module is composed of:
//! - `hint`: per-slot candidate sets (`CardHint`, `ColourSet`, `ValueSet`).
//! - `history`: chronological replay of actions into a `HintLedger`.
//! - `rounds`: final-round, remaining-turn and hand-size inference.

mod hint;
mod history;
mod rounds;

pub use hint::{CardHint, ColourSet, ValueSet};
pub use history::{
    HintLedger, chronological_actions, format_history, initial_hand_size, initial_state,
    last_action_of,
};
pub use rounds::{hand_size_of, has_turn_left, is_final_round};
