//! Abstaining decision rules and their composition.
//!
//! A rule either proposes an action for the current state or returns `None`
//! to let the next rule in the chain decide.

mod discard;
mod fallback;
mod play;
mod sequence;
mod tell;

pub use discard::{DiscardProbablyUselessRule, OsawaDiscardRule, RandomDiscardRule};
pub use fallback::{FallbackRule, fallback_action};
pub use play::{PlayProbablySafeRule, PlaySafeRule};
pub use sequence::RuleSequence;
pub use tell::{HINT_FEATURE_COUNT, HintFeatures, HintWeights, TellFocus, TellRule};

use hanabi_core::inference::CardPool;
use hanabi_core::knowledge::HintLedger;
use hanabi_core::model::action::Action;
use hanabi_core::model::state::GameState;

pub trait Rule: Send + Sync {
    fn name(&self) -> &'static str;

    fn play(&self, state: &GameState) -> Option<Action>;
}

impl<R: Rule + ?Sized> Rule for Box<R> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn play(&self, state: &GameState) -> Option<Action> {
        (**self).play(state)
    }
}

/// Passes `action` through only if the table would accept it.
///
/// An illegal proposal is logged and turned into an abstain so the chain
/// carries on with the next rule.
pub(crate) fn checked(rule: &'static str, state: &GameState, action: Action) -> Option<Action> {
    match state.check_legal(&action) {
        Ok(()) => Some(action),
        Err(err) => {
            tracing::warn!(
                target: "hanabi_bot::rule",
                rule,
                order = state.order(),
                action = %action,
                error = %err,
                "rule proposed an illegal action; abstaining"
            );
            None
        }
    }
}

/// What `player` can infer about their own hand at `state`.
pub(crate) struct OwnView {
    pub pool: CardPool,
    pub ledger: HintLedger,
}

impl OwnView {
    pub fn of(state: &GameState, player: usize) -> Self {
        Self {
            pool: CardPool::for_player(state, player),
            ledger: HintLedger::for_player(state, player),
        }
    }

    pub fn slots(&self) -> usize {
        self.ledger.len()
    }
}
