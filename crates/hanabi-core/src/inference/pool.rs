use crate::knowledge::{CardHint, HintLedger};
use crate::model::card::Card;
use crate::model::deck::Deck;
use crate::model::state::GameState;

/// Cards an unseen slot could still be, as a multiset over the canonical deck.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardPool {
    cards: Vec<Card>,
}

impl CardPool {
    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    /// Canonical deck minus every card `viewer` can account for: firework
    /// stacks, the discard pile and the other players' hands.
    pub fn for_player(state: &GameState, viewer: usize) -> Self {
        let mut pool = Self::from_cards(Deck::standard().into_cards());
        for card in state.fireworks().all_cards() {
            pool.remove_one(card);
        }
        for card in state.discards() {
            pool.remove_one(*card);
        }
        for card in state.visible_cards(viewer) {
            pool.remove_one(card);
        }
        pool
    }

    fn remove_one(&mut self, card: Card) -> bool {
        if let Some(index) = self.cards.iter().position(|c| *c == card) {
            self.cards.swap_remove(index);
            true
        } else {
            false
        }
    }

    /// Only the cards consistent with what the slot has been told.
    pub fn restrict(&self, hint: &CardHint) -> CardPool {
        Self::from_cards(
            self.cards
                .iter()
                .copied()
                .filter(|card| hint.admits(*card))
                .collect(),
        )
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn count_matching(&self, targets: &[Card]) -> usize {
        self.cards.iter().filter(|card| targets.contains(card)).count()
    }

    /// Share of the pool made up of target cards; an empty pool gives 0.
    pub fn probability(&self, targets: &[Card]) -> f32 {
        probability(&self.cards, targets)
    }

    pub fn probability_of(&self, hint: &CardHint, targets: &[Card]) -> f32 {
        self.restrict(hint).probability(targets)
    }
}

pub fn probability(pool: &[Card], targets: &[Card]) -> f32 {
    if pool.is_empty() {
        return 0.0;
    }
    let hits = pool.iter().filter(|card| targets.contains(card)).count();
    hits as f32 / pool.len() as f32
}

/// Probability that one slot holds a target card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotEstimate {
    pub slot: usize,
    pub probability: f32,
}

/// The most likely target slot among the first `slots` entries of `ledger`.
///
/// Ties keep the lowest slot. Returns `None` when no slot has a non-zero chance.
pub fn best_slot(
    pool: &CardPool,
    ledger: &HintLedger,
    slots: usize,
    targets: &[Card],
) -> Option<SlotEstimate> {
    let mut best: Option<SlotEstimate> = None;
    for hint in ledger.hints().iter().take(slots) {
        let probability = pool.probability_of(hint, targets);
        let improves = best.is_none_or(|current| probability > current.probability);
        if probability > 0.0 && improves {
            best = Some(SlotEstimate {
                slot: hint.slot(),
                probability,
            });
        }
    }
    best
}
