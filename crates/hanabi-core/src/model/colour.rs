use core::fmt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Colour {
    Blue = 0,
    Green = 1,
    Red = 2,
    White = 3,
    Yellow = 4,
}

impl Colour {
    pub const COUNT: usize = 5;

    pub const ALL: [Colour; 5] = [
        Colour::Blue,
        Colour::Green,
        Colour::Red,
        Colour::White,
        Colour::Yellow,
    ];

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Colour::Blue),
            1 => Some(Colour::Green),
            2 => Some(Colour::Red),
            3 => Some(Colour::White),
            4 => Some(Colour::Yellow),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Colour::Blue => "B",
            Colour::Green => "G",
            Colour::Red => "R",
            Colour::White => "W",
            Colour::Yellow => "Y",
        };
        f.write_str(symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::Colour;

    #[test]
    fn display_returns_ascii_symbols() {
        assert_eq!(Colour::Blue.to_string(), "B");
        assert_eq!(Colour::Yellow.to_string(), "Y");
    }

    #[test]
    fn from_index_maps_valid_values() {
        assert_eq!(Colour::from_index(2), Some(Colour::Red));
        assert_eq!(Colour::from_index(5), None);
        for colour in Colour::ALL {
            assert_eq!(Colour::from_index(colour.index()), Some(colour));
        }
    }
}
