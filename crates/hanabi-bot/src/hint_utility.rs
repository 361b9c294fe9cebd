use hanabi_core::model::action::{Action, ActionKind, Hint};
use hanabi_core::model::colour::Colour;
use hanabi_core::model::state::GameState;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HintUtilityError {
    #[error("a hint carries either a colour or a value, not both")]
    BothPayloads,
    #[error("a hint needs a colour or a value")]
    MissingPayload,
    #[error("{0:?} is not a hint action")]
    NotAHint(ActionKind),
    #[error("{kind:?} does not match the supplied payload")]
    KindMismatch { kind: ActionKind },
    #[error("player {0} is not at the table")]
    UnknownReceiver(usize),
    #[error("slot {slot} is outside a hand of {hand_size}")]
    SlotOutOfRange { slot: usize, hand_size: usize },
}

/// One candidate hint together with how much a rule wants to give it.
#[derive(Debug, Clone, PartialEq)]
pub struct HintUtility {
    receiver: usize,
    utility: f32,
    hint: Hint,
    slots: Vec<usize>,
}

impl HintUtility {
    /// Exactly one of `colour` and `value` must be supplied, matching `kind`.
    pub fn new(
        receiver: usize,
        utility: f32,
        kind: ActionKind,
        colour: Option<Colour>,
        value: Option<u8>,
        slots: Vec<usize>,
    ) -> Result<Self, HintUtilityError> {
        let hint = match (colour, value) {
            (Some(_), Some(_)) => return Err(HintUtilityError::BothPayloads),
            (None, None) => return Err(HintUtilityError::MissingPayload),
            (Some(colour), None) => Hint::Colour(colour),
            (None, Some(value)) => Hint::Value(value),
        };
        if !kind.is_hint() {
            return Err(HintUtilityError::NotAHint(kind));
        }
        if hint.kind() != kind {
            return Err(HintUtilityError::KindMismatch { kind });
        }

        Ok(Self {
            receiver,
            utility,
            hint,
            slots,
        })
    }

    pub fn receiver(&self) -> usize {
        self.receiver
    }

    pub fn utility(&self) -> f32 {
        self.utility
    }

    pub fn kind(&self) -> ActionKind {
        self.hint.kind()
    }

    pub fn hint(&self) -> Hint {
        self.hint
    }

    pub fn slots(&self) -> &[usize] {
        &self.slots
    }

    /// Indicator over the receiver's hand with the recorded slots set.
    pub fn indicator(&self, state: &GameState) -> Result<Vec<bool>, HintUtilityError> {
        if self.receiver >= state.player_count() {
            return Err(HintUtilityError::UnknownReceiver(self.receiver));
        }
        let hand_size = state.hand(self.receiver).len();
        let mut hinted = vec![false; hand_size];
        for &slot in &self.slots {
            let flag = hinted
                .get_mut(slot)
                .ok_or(HintUtilityError::SlotOutOfRange { slot, hand_size })?;
            *flag = true;
        }
        Ok(hinted)
    }

    pub fn to_action(&self, state: &GameState, giver: usize) -> Result<Action, HintUtilityError> {
        let hinted = self.indicator(state)?;
        Ok(Action::hint(giver, self.receiver, self.hint, hinted))
    }
}
