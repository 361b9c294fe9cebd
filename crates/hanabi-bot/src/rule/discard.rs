use super::{OwnView, Rule, checked};
use hanabi_core::inference::{best_slot, useless_cards};
use hanabi_core::model::action::Action;
use hanabi_core::model::state::GameState;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Discards a slot that cannot be anything still needed.
#[derive(Debug, Clone, Copy)]
pub struct OsawaDiscardRule {
    player: usize,
}

impl OsawaDiscardRule {
    pub const fn new(player: usize) -> Self {
        Self { player }
    }
}

impl Rule for OsawaDiscardRule {
    fn name(&self) -> &'static str {
        "osawa_discard"
    }

    fn play(&self, state: &GameState) -> Option<Action> {
        if !state.can_discard() {
            return None;
        }
        let useless = useless_cards(state);
        let view = OwnView::of(state, self.player);
        let slot = view.ledger.hints().iter().find_map(|hint| {
            let candidates = view.pool.restrict(hint);
            let certain = !candidates.is_empty()
                && candidates.count_matching(&useless) == candidates.len();
            certain.then_some(hint.slot())
        })?;
        checked(self.name(), state, Action::discard(self.player, slot))
    }
}

/// Discards the slot most likely to be useless once that likelihood reaches
/// `threshold`.
#[derive(Debug, Clone, Copy)]
pub struct DiscardProbablyUselessRule {
    player: usize,
    threshold: f32,
}

impl DiscardProbablyUselessRule {
    pub fn new(player: usize, threshold: f32) -> Self {
        Self {
            player,
            threshold: threshold.clamp(0.0, 1.0),
        }
    }
}

impl Rule for DiscardProbablyUselessRule {
    fn name(&self) -> &'static str {
        "discard_probably_useless"
    }

    fn play(&self, state: &GameState) -> Option<Action> {
        if !state.can_discard() {
            return None;
        }
        let useless = useless_cards(state);
        let view = OwnView::of(state, self.player);
        let best = best_slot(&view.pool, &view.ledger, view.slots(), &useless)?;
        if best.probability < self.threshold {
            return None;
        }
        checked(self.name(), state, Action::discard(self.player, best.slot))
    }
}

/// Discards a random slot whose colour and value are both still unknown,
/// or any slot once every one has been pointed at.
///
/// The draw is seeded from `seed` and the history length, so the same state
/// always gets the same answer.
#[derive(Debug, Clone, Copy)]
pub struct RandomDiscardRule {
    player: usize,
    seed: u64,
}

impl RandomDiscardRule {
    pub const fn new(player: usize, seed: u64) -> Self {
        Self { player, seed }
    }
}

impl Rule for RandomDiscardRule {
    fn name(&self) -> &'static str {
        "random_discard"
    }

    fn play(&self, state: &GameState) -> Option<Action> {
        if !state.can_discard() {
            return None;
        }
        let view = OwnView::of(state, self.player);
        let untold: Vec<usize> = view
            .ledger
            .hints()
            .iter()
            .filter(|hint| hint.known_colour().is_none() && hint.known_value().is_none())
            .map(|hint| hint.slot())
            .collect();
        let choices = if untold.is_empty() {
            (0..view.slots()).collect()
        } else {
            untold
        };

        let mut rng = StdRng::seed_from_u64(self.seed ^ state.order() as u64);
        let slot = *choices.choose(&mut rng)?;
        checked(self.name(), state, Action::discard(self.player, slot))
    }
}
