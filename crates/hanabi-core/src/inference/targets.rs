use crate::model::card::{Card, MAX_VALUE, MIN_VALUE};
use crate::model::colour::Colour;
use crate::model::state::GameState;

/// Cards that would extend a firework right now, as seen by `viewer`.
///
/// Colours with a complete firework contribute nothing, and a card already
/// visible in another player's hand cannot be one of `viewer`'s.
pub fn playable_targets(state: &GameState, viewer: usize) -> Vec<Card> {
    let visible: Vec<Card> = state.visible_cards(viewer).collect();
    Colour::ALL
        .iter()
        .filter_map(|colour| state.fireworks().next_playable(*colour))
        .filter(|card| !visible.contains(card))
        .collect()
}

pub fn is_playable(state: &GameState, card: Card) -> bool {
    state.fireworks().accepts(card)
}

fn discarded_copies(state: &GameState, card: Card) -> usize {
    state.discards().iter().filter(|c| **c == card).count()
}

/// Whether `card` can never reach its firework any more.
pub fn is_useless(state: &GameState, card: Card) -> bool {
    let height = state.fireworks().height(card.colour);
    if card.value <= height {
        return true;
    }
    // A gap below the card that can no longer be filled blocks it for good.
    (height + 1..card.value).any(|value| {
        let blocker = Card::new(card.colour, value);
        discarded_copies(state, blocker) >= blocker.copies_in_deck()
    })
}

/// Whether `card` is the last live copy of something still needed.
pub fn is_critical(state: &GameState, card: Card) -> bool {
    !is_useless(state, card) && discarded_copies(state, card) + 1 >= card.copies_in_deck()
}

/// Every card identity that can no longer score.
pub fn useless_cards(state: &GameState) -> Vec<Card> {
    all_identities()
        .filter(|card| is_useless(state, *card))
        .collect()
}

/// Every card identity that is still needed for a perfect score.
pub fn useful_cards(state: &GameState) -> Vec<Card> {
    all_identities()
        .filter(|card| !is_useless(state, *card))
        .collect()
}

fn all_identities() -> impl Iterator<Item = Card> {
    Colour::ALL
        .into_iter()
        .flat_map(|colour| (MIN_VALUE..=MAX_VALUE).map(move |value| Card::new(colour, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fireworks::Fireworks;
    use crate::model::state::Snapshot;

    fn state_with(
        fireworks: [u8; 5],
        discards: Vec<Card>,
        other_hand: Vec<Option<Card>>,
    ) -> std::sync::Arc<GameState> {
        let mut table = Snapshot::opening(vec![vec![None; 4], other_hand], 0);
        table.fireworks = Fireworks::from_heights(fireworks);
        table.discards = discards;
        GameState::root(table)
    }

    #[test]
    fn empty_fireworks_target_every_one() {
        let state = state_with([0; 5], Vec::new(), vec![None; 4]);
        let targets = playable_targets(&state, 0);
        assert_eq!(targets.len(), 5);
        assert!(targets.iter().all(|card| card.value == 1));
    }

    #[test]
    fn complete_colours_are_omitted_and_visible_cards_excluded() {
        let state = state_with(
            [5, 2, 0, 0, 0],
            Vec::new(),
            vec![Some(Card::new(Colour::Green, 3)), None, None, None],
        );
        let targets = playable_targets(&state, 0);
        assert!(!targets.iter().any(|card| card.colour == Colour::Blue));
        assert!(!targets.contains(&Card::new(Colour::Green, 3)));
        assert!(targets.contains(&Card::new(Colour::Red, 1)));
        assert_eq!(targets.len(), 3);
        // From P1's seat the green three is their own unseen card again.
        assert!(playable_targets(&state, 1).contains(&Card::new(Colour::Green, 3)));
    }

    #[test]
    fn useless_covers_stacked_and_blocked_cards() {
        let state = state_with(
            [2, 0, 0, 0, 0],
            vec![Card::new(Colour::Red, 2), Card::new(Colour::Red, 2)],
            vec![None; 4],
        );
        assert!(is_useless(&state, Card::new(Colour::Blue, 1)));
        assert!(is_useless(&state, Card::new(Colour::Blue, 2)));
        assert!(!is_useless(&state, Card::new(Colour::Blue, 3)));
        assert!(is_useless(&state, Card::new(Colour::Red, 4)));
        assert!(!is_useless(&state, Card::new(Colour::Red, 1)));
        assert!(is_playable(&state, Card::new(Colour::Blue, 3)));

        let useless = useless_cards(&state);
        // Blue 1-2 are stacked, red 3-5 sit behind two discarded red twos.
        assert_eq!(useless.len(), 2 + 3);
        assert_eq!(useful_cards(&state).len(), 25 - useless.len());
    }

    #[test]
    fn fives_and_last_copies_are_critical() {
        let state = state_with([0; 5], vec![Card::new(Colour::White, 3)], vec![None; 4]);
        assert!(is_critical(&state, Card::new(Colour::Yellow, 5)));
        assert!(is_critical(&state, Card::new(Colour::White, 3)));
        assert!(!is_critical(&state, Card::new(Colour::White, 2)));
    }
}
