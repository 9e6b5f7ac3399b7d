//! Files, ranks, and squares.
//!
//! The lookup from command characters to board indices is explicit:
//! [`File::from_char`] and [`Rank::from_char`] return `None` for anything
//! outside `a`-`h` and `1`-`8`. What happens to such characters is decided
//! by the caller (see [`SquarePolicy`](crate::SquarePolicy)).

use serde::{Deserialize, Serialize};

/// Board column, `a` through `h`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum File {
    /// File `a`, index 0.
    A,
    /// File `b`, index 1.
    B,
    /// File `c`, index 2.
    C,
    /// File `d`, index 3.
    D,
    /// File `e`, index 4.
    E,
    /// File `f`, index 5.
    F,
    /// File `g`, index 6.
    G,
    /// File `h`, index 7.
    H,
}

impl File {
    /// All files, `a` first.
    pub const ALL: [Self; 8] = [
        Self::A,
        Self::B,
        Self::C,
        Self::D,
        Self::E,
        Self::F,
        Self::G,
        Self::H,
    ];

    /// Map a lowercase letter to its file.
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'a' => Some(Self::A),
            'b' => Some(Self::B),
            'c' => Some(Self::C),
            'd' => Some(Self::D),
            'e' => Some(Self::E),
            'f' => Some(Self::F),
            'g' => Some(Self::G),
            'h' => Some(Self::H),
            _ => None,
        }
    }

    /// Zero-based column index.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The letter naming this file.
    pub const fn to_char(self) -> char {
        match self {
            Self::A => 'a',
            Self::B => 'b',
            Self::C => 'c',
            Self::D => 'd',
            Self::E => 'e',
            Self::F => 'f',
            Self::G => 'g',
            Self::H => 'h',
        }
    }
}

/// Board row, `1` through `8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rank {
    /// Rank `1`, index 0. White's back rank.
    One,
    /// Rank `2`, index 1.
    Two,
    /// Rank `3`, index 2.
    Three,
    /// Rank `4`, index 3.
    Four,
    /// Rank `5`, index 4.
    Five,
    /// Rank `6`, index 5.
    Six,
    /// Rank `7`, index 6.
    Seven,
    /// Rank `8`, index 7. Black's back rank.
    Eight,
}

impl Rank {
    /// All ranks, `1` first.
    pub const ALL: [Self; 8] = [
        Self::One,
        Self::Two,
        Self::Three,
        Self::Four,
        Self::Five,
        Self::Six,
        Self::Seven,
        Self::Eight,
    ];

    /// Map a digit to its rank.
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            '1' => Some(Self::One),
            '2' => Some(Self::Two),
            '3' => Some(Self::Three),
            '4' => Some(Self::Four),
            '5' => Some(Self::Five),
            '6' => Some(Self::Six),
            '7' => Some(Self::Seven),
            '8' => Some(Self::Eight),
            _ => None,
        }
    }

    /// Zero-based row index.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The digit naming this rank.
    pub const fn to_char(self) -> char {
        match self {
            Self::One => '1',
            Self::Two => '2',
            Self::Three => '3',
            Self::Four => '4',
            Self::Five => '5',
            Self::Six => '6',
            Self::Seven => '7',
            Self::Eight => '8',
        }
    }
}

/// A single square, addressed by file and rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Square {
    /// Column.
    pub file: File,
    /// Row.
    pub rank: Rank,
}

impl Square {
    /// Create a square.
    pub const fn new(file: File, rank: Rank) -> Self {
        Self { file, rank }
    }
}

impl core::fmt::Display for Square {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}{}", self.file.to_char(), self.rank.to_char())
    }
}
