//! Turn and round facts derived from the history instead of stored flags.

use super::history::{initial_hand_size, last_turn_of};
use crate::model::deck::DECK_SIZE;
use crate::model::state::GameState;

/// Whether the draw pile has run out and the game is in its last round.
///
/// Outside the final round every player holds a full hand. If full hands plus
/// the fireworks and discards would need more cards than the deck holds, that
/// assumption is impossible, so the final round has begun.
pub fn is_final_round(state: &GameState) -> bool {
    if state.is_game_over() {
        return false;
    }

    accounted_cards(state) > DECK_SIZE
}

/// Cards in full hands, fireworks and discards. Reaching the deck size means
/// the draw pile is empty.
fn accounted_cards(state: &GameState) -> usize {
    let in_hands = initial_hand_size(state) * state.player_count();
    in_hands + state.fireworks().total_cards() + state.discards().len()
}

/// Whether `player` may still act before the game ends.
pub fn has_turn_left(state: &GameState, player: usize) -> bool {
    if !is_final_round(state) {
        return true;
    }
    if state.next_player() == player {
        // Acting now uses up their last turn.
        return false;
    }

    let already_acted = state
        .ancestry()
        .skip(1)
        .take_while(|past| is_final_round(past))
        .any(|past| past.next_player() == player);
    !already_acted
}

/// Cards `player` currently holds.
///
/// The hand is full while the player has a turn left. Otherwise it is one
/// short only when their last action played or discarded a card with the
/// draw pile already empty, so no replacement was drawn.
pub fn hand_size_of(state: &GameState, player: usize) -> usize {
    let initial = initial_hand_size(state);
    if has_turn_left(state, player) {
        return initial;
    }
    let Some(after) = last_turn_of(state, player) else {
        return initial;
    };
    let removed = after
        .action()
        .is_some_and(|action| action.removes_card_of(player));
    let pile_was_empty = after
        .previous()
        .is_some_and(|before| accounted_cards(before) >= DECK_SIZE);
    if removed && pile_was_empty {
        initial.saturating_sub(1)
    } else {
        initial
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::action::{Action, Hint};
    use crate::model::card::Card;
    use crate::model::colour::Colour;
    use crate::model::deck::Deck;
    use crate::model::fireworks::Fireworks;
    use std::sync::Arc;

    fn four_player_root() -> Arc<GameState> {
        let deck = Deck::standard().into_cards();
        let hands = deck
            .chunks(5)
            .take(4)
            .map(|chunk| chunk.iter().copied().map(Some).collect())
            .collect();
        GameState::initial(hands, 0)
    }

    fn with_discards(prev: &Arc<GameState>, action: Action, discards: usize, next: usize) -> Arc<GameState> {
        let mut table = prev.table().clone();
        table.discards = vec![Card::new(Colour::White, 1); discards];
        table.next_player = next;
        GameState::successor(prev, action, table)
    }

    #[test]
    fn fresh_four_player_game_is_not_in_final_round() {
        let state = four_player_root();
        assert!(!is_final_round(&state));
        for player in 0..4 {
            assert!(has_turn_left(&state, player));
            assert_eq!(hand_size_of(&state, player), 5);
        }
    }

    #[test]
    fn exceeding_the_deck_implies_final_round() {
        let root = four_player_root();
        // 20 in hands + 30 discarded = 50 exactly: no contradiction yet.
        let full = with_discards(&root, Action::discard(0, 0), 30, 1);
        assert!(!is_final_round(&full));
        let over = with_discards(&full, Action::discard(1, 0), 31, 2);
        assert!(is_final_round(&over));
    }

    #[test]
    fn game_over_is_never_the_final_round() {
        let mut table = four_player_root().table().clone();
        table.discards = vec![Card::new(Colour::White, 1); 40];
        table.fuse_tokens = 0;
        let state = GameState::root(table);
        assert!(!is_final_round(&state));
    }

    #[test]
    fn players_who_acted_in_final_round_have_no_turn_left() {
        let root = four_player_root();
        let edge = with_discards(&root, Action::discard(3, 0), 30, 0);
        // P0 discards without drawing: final round begins at the next node.
        let s1 = with_discards(&edge, Action::discard(0, 2), 31, 1);
        // P1 hints: still final round, P1 has now acted in it.
        let s2 = with_discards(
            &s1,
            Action::hint(1, 2, Hint::Value(1), vec![true, false, false, false, false]),
            31,
            2,
        );
        assert!(is_final_round(&s1));
        assert!(is_final_round(&s2));

        // P2 is to move: no further turn after this one.
        assert!(!has_turn_left(&s2, 2));
        // P1 acted from s1, which is a final-round state.
        assert!(!has_turn_left(&s2, 1));
        // P0 acted from `edge`, before the final round began.
        assert!(has_turn_left(&s2, 0));
        assert!(has_turn_left(&s2, 3));

        // Hand sizes: hinting keeps the hand full, removing a card shrinks it.
        assert_eq!(hand_size_of(&s2, 1), 5);
        assert_eq!(hand_size_of(&s2, 0), 5);

        let s3 = with_discards(&s2, Action::play(2, 4), 32, 3);
        assert!(!has_turn_left(&s3, 2));
        assert_eq!(hand_size_of(&s3, 2), 4);
    }

    #[test]
    fn player_to_move_in_final_round_kept_the_card_drawn_earlier() {
        let root = four_player_root();
        // P0 discards while cards remain and draws a replacement.
        let drew = with_discards(&root, Action::discard(0, 1), 29, 1);
        let s1 = with_discards(&drew, Action::discard(1, 0), 30, 2);
        let s2 = with_discards(&s1, Action::discard(2, 0), 31, 3);
        let s3 = with_discards(&s2, Action::discard(3, 0), 32, 0);
        assert!(is_final_round(&s3));
        assert!(!has_turn_left(&s3, 0));
        assert_eq!(hand_size_of(&s3, 0), 5);
        // P3 discarded from an empty pile during the final round.
        assert!(!has_turn_left(&s3, 3));
        assert_eq!(hand_size_of(&s3, 3), 4);
    }

    #[test]
    fn fireworks_count_towards_accounted_cards() {
        let mut table = four_player_root().table().clone();
        table.fuse_tokens = 1;
        // Five complete stacks would end the game outright.
        table.fireworks = Fireworks::from_heights([5, 5, 5, 5, 4]);
        table.discards = vec![Card::new(Colour::Red, 1); 7];
        let state = GameState::root(table);
        // 20 + 24 + 7 = 51 > 50
        assert!(is_final_round(&state));
    }
}
