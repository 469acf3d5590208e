use std::{fmt, str::FromStr};

use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

use super::shape::Shape;

/// Enum representing the type of piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 0,
    /// O-piece.
    O = 1,
    /// S-piece.
    S = 2,
    /// Z-piece.
    Z = 3,
    /// J-piece.
    J = 4,
    /// L-piece.
    L = 5,
    /// T-piece.
    T = 6,
}

/// Independent uniform draw over the 7 kinds; repeats are possible.
impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        PieceKind::ALL[rng.random_range(0..PieceKind::LEN)]
    }
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    /// All kinds, in catalog order.
    pub const ALL: [PieceKind; PieceKind::LEN] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
        PieceKind::T,
    ];

    /// Returns the spawn-orientation shape of this kind.
    ///
    /// ```
    /// use tetron_engine::PieceKind;
    ///
    /// let shape = PieceKind::I.base_shape();
    /// assert_eq!((shape.width(), shape.height()), (4, 1));
    /// ```
    #[must_use]
    pub const fn base_shape(self) -> Shape {
        BASE_SHAPES[self as usize]
    }

    /// Returns the fixed display color of this kind.
    #[must_use]
    pub const fn color(self) -> Color {
        COLORS[self as usize]
    }

    /// Returns the single character representation of this piece kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use tetron_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.as_char(), 'I');
    /// assert_eq!(PieceKind::T.as_char(), 'T');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::O => 'O',
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
            PieceKind::T => 'T',
        }
    }

    /// Parses a piece kind from a single character.
    ///
    /// # Examples
    ///
    /// ```
    /// use tetron_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_char('L'), Some(PieceKind::L));
    /// assert_eq!(PieceKind::from_char('X'), None);
    /// ```
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(PieceKind::I),
            'O' => Some(PieceKind::O),
            'S' => Some(PieceKind::S),
            'Z' => Some(PieceKind::Z),
            'J' => Some(PieceKind::J),
            'L' => Some(PieceKind::L),
            'T' => Some(PieceKind::T),
            _ => None,
        }
    }
}

const BASE_SHAPES: [Shape; PieceKind::LEN] = [
    // I-piece
    Shape::from_rows([[1, 1, 1, 1]]),
    // O-piece
    Shape::from_rows([[1, 1], [1, 1]]),
    // S-piece
    Shape::from_rows([[0, 1, 1], [1, 1, 0]]),
    // Z-piece
    Shape::from_rows([[1, 1, 0], [0, 1, 1]]),
    // J-piece
    Shape::from_rows([[1, 0, 0], [1, 1, 1]]),
    // L-piece
    Shape::from_rows([[0, 0, 1], [1, 1, 1]]),
    // T-piece
    Shape::from_rows([[0, 1, 0], [1, 1, 1]]),
];

const COLORS: [Color; PieceKind::LEN] = [
    Color::rgb(0x00, 0xf0, 0xf0), // cyan
    Color::rgb(0xf0, 0xf0, 0x00), // yellow
    Color::rgb(0x00, 0xf0, 0x00), // green
    Color::rgb(0xf0, 0x00, 0x00), // red
    Color::rgb(0x00, 0x00, 0xf0), // blue
    Color::rgb(0xf0, 0xa0, 0x00), // orange
    Color::rgb(0xa0, 0x00, 0xf0), // purple
];

/// Display color tag written into the grid when a piece locks.
///
/// Serialized as a `#rrggbb` hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    r: u8,
    g: u8,
    b: u8,
}

impl Color {
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    #[must_use]
    pub const fn r(self) -> u8 {
        self.r
    }

    #[must_use]
    pub const fn g(self) -> u8 {
        self.g
    }

    #[must_use]
    pub const fn b(self) -> u8 {
        self.b
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid color {input:?}: expected '#rrggbb'")]
pub struct ParseColorError {
    input: String,
}

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseColorError {
            input: s.to_owned(),
        };
        let hex = s.strip_prefix('#').ok_or_else(err)?;
        if hex.len() != 6 {
            return Err(err());
        }
        let num = u32::from_str_radix(hex, 16).map_err(|_| err())?;
        let [_, r, g, b] = num.to_be_bytes();
        Ok(Self { r, g, b })
    }
}

impl Serialize for Color {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
