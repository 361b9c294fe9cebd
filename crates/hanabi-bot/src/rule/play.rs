use super::{OwnView, Rule, checked};
use hanabi_core::inference::{best_slot, playable_targets};
use hanabi_core::model::action::Action;
use hanabi_core::model::state::{GameState, MAX_FUSE_TOKENS};
use tracing::{Level, event};

/// Plays a slot that is certainly playable.
#[derive(Debug, Clone, Copy)]
pub struct PlaySafeRule {
    inner: PlayProbablySafeRule,
}

impl PlaySafeRule {
    pub fn new(player: usize) -> Self {
        Self {
            inner: PlayProbablySafeRule::new(player, 1.0, 0),
        }
    }
}

impl Rule for PlaySafeRule {
    fn name(&self) -> &'static str {
        "play_safe"
    }

    fn play(&self, state: &GameState) -> Option<Action> {
        self.inner.choose(self.name(), state)
    }
}

/// Plays the slot most likely to extend a firework once that likelihood
/// reaches `confidence`.
#[derive(Debug, Clone, Copy)]
pub struct PlayProbablySafeRule {
    player: usize,
    confidence: f32,
    min_fuses: u8,
}

impl PlayProbablySafeRule {
    /// `confidence` is clamped to a probability and `min_fuses` to the fuse bank.
    pub fn new(player: usize, confidence: f32, min_fuses: u8) -> Self {
        Self {
            player,
            confidence: confidence.clamp(0.0, 1.0),
            min_fuses: min_fuses.min(MAX_FUSE_TOKENS),
        }
    }

    pub fn confidence(&self) -> f32 {
        self.confidence
    }

    pub fn min_fuses(&self) -> u8 {
        self.min_fuses
    }

    fn choose(&self, name: &'static str, state: &GameState) -> Option<Action> {
        if state.fuse_tokens() < self.min_fuses {
            return None;
        }

        let targets = playable_targets(state, self.player);
        let view = OwnView::of(state, self.player);
        let best = best_slot(&view.pool, &view.ledger, view.slots(), &targets)?;
        if best.probability < self.confidence {
            return None;
        }

        if tracing::enabled!(Level::DEBUG) {
            let targets = targets
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(",");
            event!(
                target: "hanabi_bot::play",
                Level::DEBUG,
                rule = name,
                player = self.player,
                pool = view.pool.len(),
                targets = %targets,
                slot = best.slot,
                probability = best.probability,
            );
        }

        checked(name, state, Action::play(self.player, best.slot))
    }
}

impl Rule for PlayProbablySafeRule {
    fn name(&self) -> &'static str {
        "play_probably_safe"
    }

    fn play(&self, state: &GameState) -> Option<Action> {
        self.choose(self.name(), state)
    }
}
