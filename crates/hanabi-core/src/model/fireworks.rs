use crate::model::card::{Card, MAX_VALUE};
use crate::model::colour::Colour;
use serde::{Deserialize, Serialize};

/// Per-colour firework stacks, stored as stack heights (0 = empty).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fireworks {
    heights: [u8; Colour::COUNT],
}

impl Fireworks {
    pub const fn empty() -> Self {
        Self {
            heights: [0; Colour::COUNT],
        }
    }

    pub const fn from_heights(heights: [u8; Colour::COUNT]) -> Self {
        Self { heights }
    }

    pub const fn height(&self, colour: Colour) -> u8 {
        self.heights[colour.index()]
    }

    pub fn top(&self, colour: Colour) -> Option<Card> {
        match self.height(colour) {
            0 => None,
            height => Some(Card::new(colour, height)),
        }
    }

    /// Cards stacked in `colour`, bottom first.
    pub fn cards(&self, colour: Colour) -> impl Iterator<Item = Card> + use<> {
        (1..=self.height(colour)).map(move |value| Card::new(colour, value))
    }

    pub fn all_cards(&self) -> impl Iterator<Item = Card> + '_ {
        Colour::ALL.into_iter().flat_map(|colour| self.cards(colour))
    }

    /// Next card this colour accepts, or `None` once the stack is complete.
    pub fn next_playable(&self, colour: Colour) -> Option<Card> {
        let height = self.height(colour);
        if height >= MAX_VALUE {
            None
        } else {
            Some(Card::new(colour, height + 1))
        }
    }

    pub const fn is_complete(&self, colour: Colour) -> bool {
        self.height(colour) >= MAX_VALUE
    }

    pub fn all_complete(&self) -> bool {
        Colour::ALL.iter().all(|colour| self.is_complete(*colour))
    }

    pub fn accepts(&self, card: Card) -> bool {
        self.next_playable(card.colour) == Some(card)
    }

    pub fn total_cards(&self) -> usize {
        self.heights.iter().map(|h| *h as usize).sum()
    }

    pub fn score(&self) -> u32 {
        self.total_cards() as u32
    }

    /// Returns a copy with `card` stacked on its colour.
    pub fn with_played(mut self, card: Card) -> Self {
        let slot = &mut self.heights[card.colour.index()];
        *slot = (*slot).max(card.value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::Fireworks;
    use crate::model::card::Card;
    use crate::model::colour::Colour;

    #[test]
    fn empty_fireworks_accept_ones() {
        let fireworks = Fireworks::empty();
        assert_eq!(fireworks.top(Colour::Red), None);
        assert_eq!(
            fireworks.next_playable(Colour::Red),
            Some(Card::new(Colour::Red, 1))
        );
        assert!(fireworks.accepts(Card::new(Colour::Blue, 1)));
        assert!(!fireworks.accepts(Card::new(Colour::Blue, 2)));
    }

    #[test]
    fn complete_colour_has_no_next_card() {
        let fireworks = Fireworks::from_heights([5, 0, 2, 0, 0]);
        assert!(fireworks.is_complete(Colour::Blue));
        assert_eq!(fireworks.next_playable(Colour::Blue), None);
        assert_eq!(fireworks.top(Colour::Red), Some(Card::new(Colour::Red, 2)));
        assert_eq!(fireworks.total_cards(), 7);
        assert_eq!(fireworks.all_cards().count(), 7);
    }

    #[test]
    fn with_played_raises_the_stack() {
        let fireworks = Fireworks::empty().with_played(Card::new(Colour::White, 1));
        assert_eq!(fireworks.height(Colour::White), 1);
        assert_eq!(fireworks.cards(Colour::White).collect::<Vec<_>>(), vec![
            Card::new(Colour::White, 1)
        ]);
    }
}
