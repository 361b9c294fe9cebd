use crate::model::card::Card;
use crate::model::colour::Colour;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Payload of a hint: exactly one of colour or value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hint {
    Colour(Colour),
    Value(u8),
}

impl Hint {
    pub const fn matches(self, card: Card) -> bool {
        match self {
            Hint::Colour(colour) => card.colour as u8 == colour as u8,
            Hint::Value(value) => card.value == value,
        }
    }

    pub const fn kind(self) -> ActionKind {
        match self {
            Hint::Colour(_) => ActionKind::HintColour,
            Hint::Value(_) => ActionKind::HintValue,
        }
    }
}

impl fmt::Display for Hint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Hint::Colour(colour) => write!(f, "colour {colour}"),
            Hint::Value(value) => write!(f, "value {value}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    Play,
    Discard,
    HintColour,
    HintValue,
}

impl ActionKind {
    pub const fn is_hint(self) -> bool {
        matches!(self, ActionKind::HintColour | ActionKind::HintValue)
    }

    pub const fn removes_card(self) -> bool {
        matches!(self, ActionKind::Play | ActionKind::Discard)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Play {
        player: usize,
        slot: usize,
    },
    Discard {
        player: usize,
        slot: usize,
    },
    Hint {
        player: usize,
        receiver: usize,
        hint: Hint,
        hinted: Vec<bool>,
    },
}

impl Action {
    pub const fn play(player: usize, slot: usize) -> Self {
        Action::Play { player, slot }
    }

    pub const fn discard(player: usize, slot: usize) -> Self {
        Action::Discard { player, slot }
    }

    pub fn hint(player: usize, receiver: usize, hint: Hint, hinted: Vec<bool>) -> Self {
        Action::Hint {
            player,
            receiver,
            hint,
            hinted,
        }
    }

    pub const fn player(&self) -> usize {
        match self {
            Action::Play { player, .. }
            | Action::Discard { player, .. }
            | Action::Hint { player, .. } => *player,
        }
    }

    pub const fn kind(&self) -> ActionKind {
        match self {
            Action::Play { .. } => ActionKind::Play,
            Action::Discard { .. } => ActionKind::Discard,
            Action::Hint { hint, .. } => hint.kind(),
        }
    }

    /// Hand slot touched by a play or discard; `None` for hints.
    pub const fn slot(&self) -> Option<usize> {
        match self {
            Action::Play { slot, .. } | Action::Discard { slot, .. } => Some(*slot),
            Action::Hint { .. } => None,
        }
    }

    /// Receiver of a hint; `None` when the action is not a hint.
    pub const fn hint_receiver(&self) -> Option<usize> {
        match self {
            Action::Hint { receiver, .. } => Some(*receiver),
            _ => None,
        }
    }

    /// Colour or value told by a hint; `None` for plays and discards.
    pub const fn hint_payload(&self) -> Option<Hint> {
        match self {
            Action::Hint { hint, .. } => Some(*hint),
            _ => None,
        }
    }

    pub fn hinted_slots(&self) -> Option<&[bool]> {
        match self {
            Action::Hint { hinted, .. } => Some(hinted),
            _ => None,
        }
    }

    pub fn is_hint_for(&self, player: usize) -> bool {
        self.hint_receiver() == Some(player)
    }

    pub fn removes_card_of(&self, player: usize) -> bool {
        self.kind().removes_card() && self.player() == player
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Play { player, slot } => write!(f, "P{player} plays slot {slot}"),
            Action::Discard { player, slot } => write!(f, "P{player} discards slot {slot}"),
            Action::Hint {
                player,
                receiver,
                hint,
                hinted,
            } => {
                let slots = hinted
                    .iter()
                    .enumerate()
                    .filter(|(_, flag)| **flag)
                    .map(|(idx, _)| idx.to_string())
                    .collect::<Vec<_>>()
                    .join(",");
                write!(f, "P{player} tells P{receiver} {hint} at [{slots}]")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Action, ActionKind, Hint};
    use crate::model::card::Card;
    use crate::model::colour::Colour;

    #[test]
    fn hint_accessors_are_not_applicable_for_plays() {
        let play = Action::play(1, 3);
        assert_eq!(play.kind(), ActionKind::Play);
        assert_eq!(play.slot(), Some(3));
        assert_eq!(play.hint_receiver(), None);
        assert_eq!(play.hint_payload(), None);
        assert!(play.hinted_slots().is_none());
        assert!(!play.is_hint_for(1));
        assert!(play.removes_card_of(1));
        assert!(!play.removes_card_of(0));
    }

    #[test]
    fn hint_kind_follows_payload() {
        let colour = Action::hint(0, 2, Hint::Colour(Colour::Red), vec![true, false]);
        let value = Action::hint(0, 2, Hint::Value(4), vec![false, true]);
        assert_eq!(colour.kind(), ActionKind::HintColour);
        assert_eq!(value.kind(), ActionKind::HintValue);
        assert!(value.kind().is_hint());
        assert_eq!(value.slot(), None);
        assert_eq!(value.hint_payload(), Some(Hint::Value(4)));
        assert!(colour.is_hint_for(2));
        assert!(!colour.removes_card_of(0));
    }

    #[test]
    fn hint_matches_only_the_informed_field() {
        let card = Card::new(Colour::Green, 2);
        assert!(Hint::Colour(Colour::Green).matches(card));
        assert!(!Hint::Colour(Colour::Red).matches(card));
        assert!(Hint::Value(2).matches(card));
        assert!(!Hint::Value(3).matches(card));
    }

    #[test]
    fn display_lists_indicated_slots() {
        let action = Action::hint(1, 0, Hint::Value(1), vec![true, false, true]);
        assert_eq!(action.to_string(), "P1 tells P0 value 1 at [0,2]");
    }
}
