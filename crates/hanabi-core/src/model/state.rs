use crate::model::action::{Action, Hint};
use crate::model::card::{Card, MAX_VALUE, MIN_VALUE};
use crate::model::fireworks::Fireworks;
use std::fmt;
use std::sync::Arc;

pub const MAX_HINT_TOKENS: u8 = 8;
pub const MAX_FUSE_TOKENS: u8 = 3;

/// Cards dealt per player at the start of a game.
pub const fn standard_hand_size(players: usize) -> usize {
    if players <= 3 { 5 } else { 4 }
}

/// Table contents handed in by the rules engine for one node of the history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// `None` marks a slot that is hidden from the observer or vacant.
    pub hands: Vec<Vec<Option<Card>>>,
    pub fireworks: Fireworks,
    pub discards: Vec<Card>,
    pub hint_tokens: u8,
    pub fuse_tokens: u8,
    pub next_player: usize,
}

impl Snapshot {
    pub fn opening(hands: Vec<Vec<Option<Card>>>, first_player: usize) -> Self {
        Self {
            hands,
            fireworks: Fireworks::empty(),
            discards: Vec::new(),
            hint_tokens: MAX_HINT_TOKENS,
            fuse_tokens: MAX_FUSE_TOKENS,
            next_player: first_player,
        }
    }
}

/// Immutable node of a game's history. Each node owns a shared link to its
/// predecessor, so a history is a persistent chain rooted at the initial deal.
#[derive(Debug)]
pub struct GameState {
    previous: Option<Arc<GameState>>,
    action: Option<Action>,
    order: usize,
    table: Snapshot,
}

impl GameState {
    pub fn root(table: Snapshot) -> Arc<Self> {
        Arc::new(Self {
            previous: None,
            action: None,
            order: 0,
            table,
        })
    }

    pub fn initial(hands: Vec<Vec<Option<Card>>>, first_player: usize) -> Arc<Self> {
        Self::root(Snapshot::opening(hands, first_player))
    }

    /// Appends a node produced by `action`; `previous` is never modified.
    pub fn successor(previous: &Arc<Self>, action: Action, table: Snapshot) -> Arc<Self> {
        Arc::new(Self {
            previous: Some(Arc::clone(previous)),
            action: Some(action),
            order: previous.order + 1,
            table,
        })
    }

    pub fn previous(&self) -> Option<&GameState> {
        self.previous.as_deref()
    }

    /// Action that produced this node; `None` at the root.
    pub fn action(&self) -> Option<&Action> {
        self.action.as_ref()
    }

    pub fn order(&self) -> usize {
        self.order
    }

    /// Walks from this node back to the root, newest first.
    pub fn ancestry(&self) -> Ancestry<'_> {
        Ancestry { next: Some(self) }
    }

    pub fn table(&self) -> &Snapshot {
        &self.table
    }

    pub fn player_count(&self) -> usize {
        self.table.hands.len()
    }

    pub fn hand(&self, player: usize) -> &[Option<Card>] {
        self.table
            .hands
            .get(player)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn hands(&self) -> &[Vec<Option<Card>>] {
        &self.table.hands
    }

    pub fn fireworks(&self) -> &Fireworks {
        &self.table.fireworks
    }

    pub fn discards(&self) -> &[Card] {
        &self.table.discards
    }

    pub fn hint_tokens(&self) -> u8 {
        self.table.hint_tokens
    }

    pub fn fuse_tokens(&self) -> u8 {
        self.table.fuse_tokens
    }

    pub fn next_player(&self) -> usize {
        self.table.next_player
    }

    pub fn players_other_than(&self, player: usize) -> impl Iterator<Item = usize> + use<> {
        (0..self.player_count()).filter(move |other| *other != player)
    }

    /// Every card `viewer` can see in the other players' hands.
    pub fn visible_cards(&self, viewer: usize) -> impl Iterator<Item = Card> + '_ {
        self.players_other_than(viewer)
            .flat_map(move |other| self.hand(other).iter().flatten().copied())
    }

    pub fn is_game_over(&self) -> bool {
        self.table.fuse_tokens == 0 || self.table.fireworks.all_complete()
    }

    pub fn can_discard(&self) -> bool {
        self.table.hint_tokens < MAX_HINT_TOKENS
    }

    pub fn can_hint(&self) -> bool {
        self.table.hint_tokens > 0
    }

    /// Checks `action` against the table rules without applying it.
    pub fn check_legal(&self, action: &Action) -> Result<(), ActionError> {
        if self.is_game_over() {
            return Err(ActionError::GameOver);
        }
        let actor = action.player();
        if actor >= self.player_count() {
            return Err(ActionError::UnknownPlayer(actor));
        }
        if actor != self.next_player() {
            return Err(ActionError::OutOfTurn {
                expected: self.next_player(),
                actual: actor,
            });
        }

        match action {
            Action::Play { slot, .. } => self.check_slot(actor, *slot),
            Action::Discard { slot, .. } => {
                if !self.can_discard() {
                    return Err(ActionError::HintTokensFull);
                }
                self.check_slot(actor, *slot)
            }
            Action::Hint {
                receiver,
                hint,
                hinted,
                ..
            } => self.check_hint(actor, *receiver, *hint, hinted),
        }
    }

    fn check_slot(&self, player: usize, slot: usize) -> Result<(), ActionError> {
        let hand_size = self.hand(player).len();
        if slot >= hand_size {
            return Err(ActionError::SlotOutOfRange { slot, hand_size });
        }
        Ok(())
    }

    fn check_hint(
        &self,
        giver: usize,
        receiver: usize,
        hint: Hint,
        hinted: &[bool],
    ) -> Result<(), ActionError> {
        if !self.can_hint() {
            return Err(ActionError::NoHintTokens);
        }
        if receiver >= self.player_count() {
            return Err(ActionError::UnknownPlayer(receiver));
        }
        if receiver == giver {
            return Err(ActionError::SelfHint);
        }
        if let Hint::Value(value) = hint {
            if !(MIN_VALUE..=MAX_VALUE).contains(&value) {
                return Err(ActionError::InvalidValue(value));
            }
        }
        let hand = self.hand(receiver);
        if hinted.len() != hand.len() {
            return Err(ActionError::IndicatorLength {
                expected: hand.len(),
                actual: hinted.len(),
            });
        }
        if !hinted.iter().any(|flag| *flag) {
            return Err(ActionError::EmptyHint);
        }
        for (slot, (card, flag)) in hand.iter().zip(hinted).enumerate() {
            let truth = card.is_some_and(|card| hint.matches(card));
            if truth != *flag {
                return Err(ActionError::IndicatorMismatch { slot });
            }
        }
        Ok(())
    }
}

pub struct Ancestry<'a> {
    next: Option<&'a GameState>,
}

impl<'a> Iterator for Ancestry<'a> {
    type Item = &'a GameState;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.previous();
        Some(current)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    GameOver,
    UnknownPlayer(usize),
    OutOfTurn { expected: usize, actual: usize },
    SlotOutOfRange { slot: usize, hand_size: usize },
    EmptySlot(usize),
    HintTokensFull,
    NoHintTokens,
    SelfHint,
    InvalidValue(u8),
    IndicatorLength { expected: usize, actual: usize },
    EmptyHint,
    IndicatorMismatch { slot: usize },
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionError::GameOver => write!(f, "game is already over"),
            ActionError::UnknownPlayer(player) => write!(f, "no player with index {player}"),
            ActionError::OutOfTurn { expected, actual } => {
                write!(f, "expected P{expected} to act but got P{actual}")
            }
            ActionError::SlotOutOfRange { slot, hand_size } => {
                write!(f, "slot {slot} is outside a hand of {hand_size}")
            }
            ActionError::EmptySlot(slot) => write!(f, "slot {slot} holds no card"),
            ActionError::HintTokensFull => write!(f, "cannot discard with all hint tokens"),
            ActionError::NoHintTokens => write!(f, "no hint tokens left"),
            ActionError::SelfHint => write!(f, "players cannot hint themselves"),
            ActionError::InvalidValue(value) => write!(f, "hinted value {value} is not 1-5"),
            ActionError::IndicatorLength { expected, actual } => {
                write!(f, "hint indicator has {actual} slots, hand has {expected}")
            }
            ActionError::EmptyHint => write!(f, "hint must indicate at least one card"),
            ActionError::IndicatorMismatch { slot } => {
                write!(f, "hint indicator disagrees with the card at slot {slot}")
            }
        }
    }
}

impl std::error::Error for ActionError {}
