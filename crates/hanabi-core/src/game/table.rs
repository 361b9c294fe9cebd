//! Minimal reference dealer that produces legal state histories.

use crate::model::action::Action;
use crate::model::card::Card;
use crate::model::deck::Deck;
use crate::model::state::{ActionError, GameState, MAX_HINT_TOKENS, standard_hand_size};
use std::fmt;
use std::sync::Arc;

pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 5;

#[derive(Debug, Clone)]
pub struct Table {
    state: Arc<GameState>,
    deck: Vec<Card>,
    next_draw: usize,
    turns_after_last_draw: Option<usize>,
}

impl Table {
    /// Deals `players` hands off the top of `deck`; the rest is the draw pile.
    pub fn deal(deck: &Deck, players: usize) -> Result<Self, DealError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&players) {
            return Err(DealError::PlayerCount(players));
        }
        let hand_size = standard_hand_size(players);
        let needed = hand_size * players;
        if deck.len() < needed {
            return Err(DealError::DeckTooSmall {
                needed,
                available: deck.len(),
            });
        }

        let cards = deck.cards().to_vec();
        let hands = cards[..needed]
            .chunks(hand_size)
            .map(|chunk| chunk.iter().copied().map(Some).collect())
            .collect();

        Ok(Self {
            state: GameState::initial(hands, 0),
            deck: cards,
            next_draw: needed,
            turns_after_last_draw: None,
        })
    }

    pub fn with_seed(players: usize, seed: u64) -> Result<Self, DealError> {
        Self::deal(&Deck::shuffled_with_seed(seed), players)
    }

    pub fn state(&self) -> &Arc<GameState> {
        &self.state
    }

    /// Deck order this table was dealt from, including already drawn cards.
    pub fn deck_order(&self) -> &[Card] {
        &self.deck
    }

    pub fn draw_pile_len(&self) -> usize {
        self.deck.len() - self.next_draw
    }

    pub fn score(&self) -> u32 {
        self.state.fireworks().score()
    }

    /// Fuses exhausted, every firework complete, or the last round played out.
    pub fn is_finished(&self) -> bool {
        self.state.is_game_over() || self.turns_after_last_draw == Some(0)
    }

    /// Validates `action`, then appends the resulting node to the history.
    pub fn apply(&mut self, action: Action) -> Result<&Arc<GameState>, ActionError> {
        if self.is_finished() {
            return Err(ActionError::GameOver);
        }
        self.state.check_legal(&action)?;

        let mut table = self.state.table().clone();
        let actor = action.player();
        let mut drew_last = false;

        match &action {
            Action::Play { slot, .. } | Action::Discard { slot, .. } => {
                let card = table.hands[actor][*slot].ok_or(ActionError::EmptySlot(*slot))?;
                if matches!(action, Action::Play { .. }) {
                    if table.fireworks.accepts(card) {
                        table.fireworks = table.fireworks.with_played(card);
                        if card.is_max_value() && table.hint_tokens < MAX_HINT_TOKENS {
                            table.hint_tokens += 1;
                        }
                    } else {
                        table.discards.push(card);
                        table.fuse_tokens = table.fuse_tokens.saturating_sub(1);
                    }
                } else {
                    table.discards.push(card);
                    table.hint_tokens += 1;
                }

                let drawn = self.deck.get(self.next_draw).copied();
                if drawn.is_some() {
                    self.next_draw += 1;
                    drew_last = self.next_draw == self.deck.len();
                }
                table.hands[actor][*slot] = drawn;
            }
            Action::Hint { .. } => {
                table.hint_tokens -= 1;
            }
        }

        table.next_player = (actor + 1) % table.hands.len();
        self.turns_after_last_draw = match self.turns_after_last_draw {
            Some(left) => Some(left.saturating_sub(1)),
            None if drew_last => Some(table.hands.len()),
            None => None,
        };
        self.state = GameState::successor(&self.state, action, table);
        Ok(&self.state)
    }
}

/// Rebuilds the history of `state` as `viewer` would receive it: every node
/// with the viewer's own cards hidden.
pub fn observed_by(state: &GameState, viewer: usize) -> Arc<GameState> {
    let mut nodes: Vec<&GameState> = state.ancestry().collect();
    nodes.reverse();

    let mask = |node: &GameState| {
        let mut table = node.table().clone();
        if let Some(hand) = table.hands.get_mut(viewer) {
            hand.iter_mut().for_each(|slot| *slot = None);
        }
        table
    };

    let mut iter = nodes.into_iter();
    let mut current = match iter.next() {
        Some(root) => GameState::root(mask(root)),
        None => return GameState::root(mask(state)),
    };
    for node in iter {
        if let Some(action) = node.action() {
            current = GameState::successor(&current, action.clone(), mask(node));
        }
    }
    current
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DealError {
    PlayerCount(usize),
    DeckTooSmall { needed: usize, available: usize },
}

impl fmt::Display for DealError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DealError::PlayerCount(players) => {
                write!(f, "{players} players is outside {MIN_PLAYERS}-{MAX_PLAYERS}")
            }
            DealError::DeckTooSmall { needed, available } => {
                write!(f, "dealing needs {needed} cards but the deck has {available}")
            }
        }
    }
}

impl std::error::Error for DealError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::action::Hint;
    use crate::model::colour::Colour;

    #[test]
    fn deal_uses_standard_hand_sizes() {
        let table = Table::with_seed(4, 1).unwrap();
        assert_eq!(table.state().player_count(), 4);
        assert_eq!(table.state().hand(0).len(), 4);
        assert_eq!(table.draw_pile_len(), 50 - 16);
        assert!(Table::with_seed(6, 1).is_err());
    }

    #[test]
    fn discard_refills_the_slot_and_returns_a_token() {
        let mut table = Table::with_seed(2, 3).unwrap();
        let first_value = table.state().hand(1)[0].map(|c| c.value).unwrap();
        let hinted: Vec<bool> = table
            .state()
            .hand(1)
            .iter()
            .map(|slot| slot.is_some_and(|c| c.value == first_value))
            .collect();
        table
            .apply(Action::hint(0, 1, Hint::Value(first_value), hinted))
            .unwrap();
        assert_eq!(table.state().hint_tokens(), 7);

        let drawn = table.deck_order()[10];
        table.apply(Action::discard(1, 2)).unwrap();
        assert_eq!(table.state().hint_tokens(), 8);
        assert_eq!(table.state().discards().len(), 1);
        assert_eq!(table.state().hand(1)[2], Some(drawn));
        assert_eq!(table.state().next_player(), 0);
        assert_eq!(table.state().order(), 2);
    }

    #[test]
    fn misplay_burns_a_fuse() {
        let deck: Vec<Card> = std::iter::repeat_n(Card::new(Colour::Red, 2), 10)
            .chain(std::iter::repeat_n(Card::new(Colour::Blue, 1), 10))
            .collect();
        let mut table = Table::deal(&Deck::from_cards(deck), 2).unwrap();
        table.apply(Action::play(0, 0)).unwrap();
        assert_eq!(table.state().fuse_tokens(), 2);
        assert_eq!(table.state().discards(), &[Card::new(Colour::Red, 2)]);
        assert_eq!(table.state().hand(0)[0], Some(Card::new(Colour::Blue, 1)));
        table.apply(Action::play(1, 0)).unwrap();
        assert_eq!(table.state().fuse_tokens(), 1);
    }

    #[test]
    fn illegal_actions_leave_history_untouched() {
        let mut table = Table::with_seed(3, 9).unwrap();
        assert!(table.apply(Action::discard(0, 0)).is_err());
        assert!(table.apply(Action::play(1, 0)).is_err());
        assert_eq!(table.state().order(), 0);
    }

    #[test]
    fn observed_history_hides_only_the_viewer() {
        let mut table = Table::with_seed(3, 11).unwrap();
        table.apply(Action::play(0, 1)).unwrap();
        table.apply(Action::play(1, 1)).unwrap();
        let view = observed_by(table.state(), 1);
        assert_eq!(view.order(), 2);
        for node in view.ancestry() {
            assert!(node.hand(1).iter().all(Option::is_none));
            assert!(node.hand(0).iter().all(Option::is_some));
        }
        assert_eq!(view.action(), table.state().action());
    }
}
