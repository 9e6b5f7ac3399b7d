//! The board: a grid plus the side to move.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::command::{MoveCommand, SquarePolicy};
use crate::error::BoardError;
use crate::grid::{Cell, Grid};
use crate::piece::Side;
use crate::square::{File, Square};

/// Mutable board state.
///
/// The standard arrangement only holds at construction. After that
/// [`Board::apply_move`] swaps whatever the two squares contain and flips
/// the turn, with no notion of ownership, legality, or captures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    grid: Grid,
    turn: Side,
}

impl Board {
    /// A board in the standard starting arrangement, white to move.
    pub fn standard() -> Self {
        Self {
            grid: Grid::standard(),
            turn: Side::White,
        }
    }

    /// Apply a raw move command, rejecting unmapped characters.
    pub fn apply_move(&mut self, raw: &str) -> Result<MoveCommand, BoardError> {
        self.apply_move_with(raw, SquarePolicy::Reject)
    }

    /// Apply a raw move command under `policy`.
    ///
    /// On success the two addressed cells are exchanged and the turn is
    /// flipped, whichever piece (if any) moved. On error the board is
    /// unchanged.
    pub fn apply_move_with(
        &mut self,
        raw: &str,
        policy: SquarePolicy,
    ) -> Result<MoveCommand, BoardError> {
        let command = MoveCommand::parse(raw, policy)?;
        self.apply(command);
        Ok(command)
    }

    /// Apply an already parsed command.
    pub fn apply(&mut self, command: MoveCommand) {
        debug!(
            from = %command.from,
            to = %command.to,
            from_file = command.from.file.index(),
            from_rank = command.from.rank.index(),
            to_file = command.to.file.index(),
            to_rank = command.to.rank.index(),
            "swapping cells"
        );
        self.grid.swap(command.from, command.to);
        self.turn = self.turn.toggle();
    }

    /// A copy of the current grid.
    pub const fn grid(&self) -> Grid {
        self.grid
    }

    /// Contents of one square.
    pub const fn cell(&self, square: Square) -> Cell {
        self.grid.get(square)
    }

    /// The side to move.
    pub const fn turn(&self) -> Side {
        self.turn
    }

    /// Whether white is to move.
    pub const fn turn_is_white(&self) -> bool {
        matches!(self.turn, Side::White)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

impl core::fmt::Display for Board {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for (rank, cells) in self.grid.ranks_top_down() {
            write!(f, "{} ", rank.to_char())?;
            for cell in cells {
                match cell {
                    Some(piece) => write!(f, "{piece}")?,
                    None => f.write_str(".")?,
                }
            }
            writeln!(f)?;
        }
        f.write_str("  ")?;
        for file in File::ALL {
            write!(f, "{}", file.to_char())?;
        }
        write!(f, "\n{} to move", self.turn)
    }
}
