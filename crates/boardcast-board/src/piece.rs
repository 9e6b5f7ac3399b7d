//! Sides, piece kinds, and their display glyphs.

use serde::{Deserialize, Serialize};

/// The side a piece belongs to, and the side whose turn it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// Moves first.
    White,
    /// Moves second.
    Black,
}

impl Side {
    /// The opposite side.
    #[must_use]
    pub const fn toggle(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    /// Lowercase name, as shown on the rendered board.
    pub const fn name(self) -> &'static str {
        match self {
            Self::White => "white",
            Self::Black => "black",
        }
    }
}

impl core::fmt::Display for Side {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// The six chess piece kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PieceKind {
    /// Pawn.
    Pawn,
    /// Knight.
    Knight,
    /// Bishop.
    Bishop,
    /// Rook.
    Rook,
    /// Queen.
    Queen,
    /// King.
    King,
}

/// A piece standing on a square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    /// Owning side.
    pub side: Side,
    /// What kind of piece it is.
    pub kind: PieceKind,
}

impl Piece {
    /// Create a piece.
    pub const fn new(side: Side, kind: PieceKind) -> Self {
        Self { side, kind }
    }

    /// The display glyph for this piece.
    ///
    /// White is drawn with the filled glyphs and black with the outlined
    /// ones, which reads correctly on the dark page background.
    pub const fn symbol(self) -> char {
        match (self.side, self.kind) {
            (Side::White, PieceKind::Pawn) => '♟',
            (Side::White, PieceKind::Knight) => '♞',
            (Side::White, PieceKind::Bishop) => '♝',
            (Side::White, PieceKind::Rook) => '♜',
            (Side::White, PieceKind::Queen) => '♛',
            (Side::White, PieceKind::King) => '♚',
            (Side::Black, PieceKind::Pawn) => '♙',
            (Side::Black, PieceKind::Knight) => '♘',
            (Side::Black, PieceKind::Bishop) => '♗',
            (Side::Black, PieceKind::Rook) => '♖',
            (Side::Black, PieceKind::Queen) => '♕',
            (Side::Black, PieceKind::King) => '♔',
        }
    }
}

impl core::fmt::Display for Piece {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_is_an_involution() {
        assert_eq!(Side::White.toggle(), Side::Black);
        assert_eq!(Side::Black.toggle(), Side::White);
        assert_eq!(Side::White.toggle().toggle(), Side::White);
    }

    #[test]
    fn glyph_colour_encodes_side() {
        assert_eq!(Piece::new(Side::White, PieceKind::King).symbol(), '♚');
        assert_eq!(Piece::new(Side::Black, PieceKind::King).symbol(), '♔');
        assert_eq!(Piece::new(Side::White, PieceKind::Rook).to_string(), "♜");
    }

    #[test]
    fn side_serializes_snake_case() {
        let json = serde_json::to_string(&Side::Black).unwrap_or_default();
        assert_eq!(json, "\"black\"");
    }
}
