//! Board state for the Boardcast live chess board.
//!
//! This crate is the leaf of the workspace. It owns the 8x8 grid of
//! [`Cell`]s, the side-to-move flag, and the single mutating operation
//! that applies a [`MoveCommand`].
//!
//! # Contract
//!
//! [`Board::apply_move`] parses a 4-character command such as `e2e4`,
//! exchanges the two addressed cells, and flips the turn. It does not
//! check that a piece stands on the source square, who owns it, or
//! whether the move is legal chess. The only failures are a command of
//! the wrong length and, under [`SquarePolicy::Reject`], a character
//! outside the file/rank tables.

pub mod board;
pub mod command;
pub mod error;
pub mod grid;
pub mod piece;
pub mod square;

pub use board::Board;
pub use command::{MoveCommand, SquarePolicy};
pub use error::BoardError;
pub use grid::{Cell, Grid};
pub use piece::{Piece, PieceKind, Side};
pub use square::{File, Rank, Square};
