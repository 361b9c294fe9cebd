use crate::model::colour::Colour;
use core::fmt;
use serde::{Deserialize, Serialize};

pub const MIN_VALUE: u8 = 1;
pub const MAX_VALUE: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Card {
    pub colour: Colour,
    pub value: u8,
}

impl Card {
    pub const fn new(colour: Colour, value: u8) -> Self {
        Self { colour, value }
    }

    /// Builds a card, rejecting values outside `1..=5`.
    pub const fn try_new(colour: Colour, value: u8) -> Option<Self> {
        if value >= MIN_VALUE && value <= MAX_VALUE {
            Some(Self::new(colour, value))
        } else {
            None
        }
    }

    pub const fn is_max_value(self) -> bool {
        self.value == MAX_VALUE
    }

    /// The card that would be stacked on top of this one in its firework.
    pub const fn next_in_sequence(self) -> Option<Card> {
        if self.is_max_value() {
            None
        } else {
            Some(Card::new(self.colour, self.value + 1))
        }
    }

    /// How many copies of this card the canonical deck holds.
    pub const fn copies_in_deck(self) -> usize {
        copies_of_value(self.value)
    }
}

pub const fn copies_of_value(value: u8) -> usize {
    match value {
        1 => 3,
        2..=4 => 2,
        5 => 1,
        _ => 0,
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.colour, self.value)
    }
}
