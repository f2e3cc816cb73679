//! Side colors.

use std::fmt;
use std::ops::Not;

/// The side owning a piece or having the move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Color {
    White = 0,
    Black = 1,
}

impl Color {
    pub const COUNT: usize = 2;
    pub const ALL: [Color; 2] = [Color::White, Color::Black];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub const fn flip(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Square-index step of a single pawn push.
    #[inline]
    pub const fn forward(self) -> i8 {
        match self {
            Color::White => 8,
            Color::Black => -8,
        }
    }

    /// Parse the FEN side-to-move field.
    pub fn from_fen(s: &str) -> Option<Color> {
        match s {
            "w" => Some(Color::White),
            "b" => Some(Color::Black),
            _ => None,
        }
    }
}

impl Not for Color {
    type Output = Color;

    #[inline]
    fn not(self) -> Color {
        self.flip()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Color::White => "w",
            Color::Black => "b",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::Color;

    #[test]
    fn flip_and_not_agree() {
        for c in Color::ALL {
            assert_eq!(!c, c.flip());
            assert_eq!(c.flip().flip(), c);
        }
    }

    #[test]
    fn fen_field() {
        assert_eq!(Color::from_fen("w"), Some(Color::White));
        assert_eq!(Color::from_fen("b"), Some(Color::Black));
        assert_eq!(Color::from_fen("W"), None);
        assert_eq!(Color::Black.to_string(), "b");
    }

    #[test]
    fn forward_steps() {
        assert_eq!(Color::White.forward(), 8);
        assert_eq!(Color::Black.forward(), -8);
    }
}
