//! Per-slot record of what a player has been told about one of their cards.

use crate::model::action::Hint;
use crate::model::card::{Card, MAX_VALUE, MIN_VALUE};
use crate::model::colour::Colour;
use core::fmt;

/// Bit set over the five colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColourSet(u8);

impl ColourSet {
    pub const EMPTY: Self = Self(0);
    pub const ALL: Self = Self(0b1_1111);

    pub const fn single(colour: Colour) -> Self {
        Self(1 << colour as u8)
    }

    pub fn contains(self, colour: Colour) -> bool {
        self.0 & (1 << colour as u8) != 0
    }

    pub fn without(self, colour: Colour) -> Self {
        Self(self.0 & !(1 << colour as u8))
    }

    pub fn intersect(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = Colour> {
        Colour::ALL.into_iter().filter(move |c| self.contains(*c))
    }
}

/// Bit set over the card values 1-5 (bit `v` stands for value `v`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ValueSet(u8);

impl ValueSet {
    pub const EMPTY: Self = Self(0);
    pub const ALL: Self = Self(0b11_1110);

    pub const fn single(value: u8) -> Self {
        if value >= MIN_VALUE && value <= MAX_VALUE {
            Self(1 << value)
        } else {
            Self::EMPTY
        }
    }

    pub fn contains(self, value: u8) -> bool {
        (MIN_VALUE..=MAX_VALUE).contains(&value) && self.0 & (1 << value) != 0
    }

    pub fn without(self, value: u8) -> Self {
        Self(self.0 & !Self::single(value).0)
    }

    pub fn intersect(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = u8> {
        (MIN_VALUE..=MAX_VALUE).filter(move |v| self.contains(*v))
    }
}

/// Candidate colours and values for one hand slot.
///
/// Both sets start unconstrained and only shrink as hints arrive, until the card
/// leaves the slot and [`CardHint::reset`] restores full uncertainty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CardHint {
    slot: usize,
    colours: ColourSet,
    values: ValueSet,
}

impl CardHint {
    pub const fn new(slot: usize) -> Self {
        Self {
            slot,
            colours: ColourSet::ALL,
            values: ValueSet::ALL,
        }
    }

    pub const fn slot(&self) -> usize {
        self.slot
    }

    pub const fn colours(&self) -> ColourSet {
        self.colours
    }

    pub const fn values(&self) -> ValueSet {
        self.values
    }

    /// Applies a hint that pointed at this slot.
    pub fn is(&mut self, hint: Hint) {
        match hint {
            Hint::Colour(colour) => {
                self.colours = self.colours.intersect(ColourSet::single(colour));
            }
            Hint::Value(value) => {
                self.values = self.values.intersect(ValueSet::single(value));
            }
        }
    }

    /// Applies a hint that skipped this slot.
    pub fn is_not(&mut self, hint: Hint) {
        match hint {
            Hint::Colour(colour) => self.colours = self.colours.without(colour),
            Hint::Value(value) => self.values = self.values.without(value),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.slot);
    }

    pub fn admits(&self, card: Card) -> bool {
        self.colours.contains(card.colour) && self.values.contains(card.value)
    }

    pub fn has_information(&self) -> bool {
        self.colours != ColourSet::ALL || self.values != ValueSet::ALL
    }

    pub fn known_colour(&self) -> Option<Colour> {
        let mut iter = self.colours.iter();
        match (iter.next(), iter.next()) {
            (Some(colour), None) => Some(colour),
            _ => None,
        }
    }

    pub fn known_value(&self) -> Option<u8> {
        let mut iter = self.values.iter();
        match (iter.next(), iter.next()) {
            (Some(value), None) => Some(value),
            _ => None,
        }
    }

    pub fn known_card(&self) -> Option<Card> {
        Some(Card::new(self.known_colour()?, self.known_value()?))
    }

    /// Number of (colour, value) combinations still possible.
    pub fn candidate_count(&self) -> usize {
        self.colours.len() * self.values.len()
    }
}

impl fmt::Display for CardHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for colour in self.colours.iter() {
            write!(f, "{colour}")?;
        }
        f.write_str("|")?;
        for value in self.values.iter() {
            write!(f, "{value}")?;
        }
        f.write_str("]")
    }
}
