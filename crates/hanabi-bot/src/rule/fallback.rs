use super::Rule;
use hanabi_core::knowledge::HintLedger;
use hanabi_core::model::action::{Action, Hint};
use hanabi_core::model::state::GameState;

/// Terminal link of every chain: always has an answer.
#[derive(Debug, Clone, Copy)]
pub struct FallbackRule {
    player: usize,
}

impl FallbackRule {
    pub const fn new(player: usize) -> Self {
        Self { player }
    }

    pub const fn player(&self) -> usize {
        self.player
    }

    pub fn fallback_action(&self, state: &GameState) -> Action {
        fallback_action(state, self.player)
    }
}

impl Rule for FallbackRule {
    fn name(&self) -> &'static str {
        "fallback"
    }

    fn play(&self, state: &GameState) -> Option<Action> {
        Some(self.fallback_action(state))
    }
}

/// Discard the slot we know least about; with a full token bank give the
/// cheapest hint we can find; failing both, play the first slot.
pub fn fallback_action(state: &GameState, player: usize) -> Action {
    if state.can_discard() {
        let ledger = HintLedger::for_player(state, player);
        let slot = ledger
            .hints()
            .iter()
            .filter(|hint| hint.slot() < state.hand(player).len())
            .max_by(|a, b| {
                a.candidate_count()
                    .cmp(&b.candidate_count())
                    .then(b.slot().cmp(&a.slot()))
            })
            .map_or(0, |hint| hint.slot());
        return Action::discard(player, slot);
    }

    if state.can_hint() {
        if let Some(action) = first_value_hint(state, player) {
            return action;
        }
    }

    Action::play(player, 0)
}

fn first_value_hint(state: &GameState, player: usize) -> Option<Action> {
    let player_count = state.player_count();
    (1..player_count)
        .map(|offset| (player + offset) % player_count)
        .find_map(|receiver| {
            let hand = state.hand(receiver);
            let card = hand.iter().flatten().next()?;
            let hint = Hint::Value(card.value);
            let hinted = hand
                .iter()
                .map(|slot| slot.is_some_and(|other| hint.matches(other)))
                .collect();
            Some(Action::hint(player, receiver, hint, hinted))
        })
}
