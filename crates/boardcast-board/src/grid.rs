//! The 8x8 grid of cells.

use serde::{Deserialize, Serialize};

use crate::piece::{Piece, PieceKind, Side};
use crate::square::{File, Rank, Square};

/// Contents of one square: a piece, or `None` when empty.
pub type Cell = Option<Piece>;

/// Piece order along a back rank, file `a` to file `h`.
const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// Fixed 8x8 array of cells, stored rank-major.
///
/// `Grid` is `Copy`: handing one out is always a snapshot, never a view
/// into live board state. It serializes as eight ranks, rank `1` first,
/// each holding eight cells, file `a` first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grid {
    ranks: [[Cell; 8]; 8],
}

impl Grid {
    /// A grid with every square empty.
    pub const fn empty() -> Self {
        Self {
            ranks: [[None; 8]; 8],
        }
    }

    /// The standard starting arrangement.
    ///
    /// White occupies ranks `1` and `2`, black ranks `7` and `8`, and
    /// ranks `3` through `6` are empty.
    pub fn standard() -> Self {
        let mut grid = Self::empty();
        for (file, kind) in File::ALL.into_iter().zip(BACK_RANK) {
            grid.set(Square::new(file, Rank::One), Some(Piece::new(Side::White, kind)));
            grid.set(
                Square::new(file, Rank::Two),
                Some(Piece::new(Side::White, PieceKind::Pawn)),
            );
            grid.set(
                Square::new(file, Rank::Seven),
                Some(Piece::new(Side::Black, PieceKind::Pawn)),
            );
            grid.set(Square::new(file, Rank::Eight), Some(Piece::new(Side::Black, kind)));
        }
        grid
    }

    /// Contents of `square`.
    #[allow(clippy::indexing_slicing)]
    pub const fn get(&self, square: Square) -> Cell {
        // File and Rank only ever index 0..8.
        self.ranks[square.rank.index()][square.file.index()]
    }

    /// Replace the contents of `square`.
    #[allow(clippy::indexing_slicing)]
    pub const fn set(&mut self, square: Square, cell: Cell) {
        self.ranks[square.rank.index()][square.file.index()] = cell;
    }

    /// Exchange the contents of two squares. Swapping a square with
    /// itself leaves the grid unchanged.
    pub const fn swap(&mut self, a: Square, b: Square) {
        let first = self.get(a);
        let second = self.get(b);
        self.set(a, second);
        self.set(b, first);
    }

    /// The cells of one rank, file `a` first.
    #[allow(clippy::indexing_slicing)]
    pub const fn rank(&self, rank: Rank) -> [Cell; 8] {
        self.ranks[rank.index()]
    }

    /// Ranks from `8` down to `1`, the order a board is drawn in with
    /// white at the bottom.
    pub fn ranks_top_down(&self) -> impl Iterator<Item = (Rank, [Cell; 8])> + '_ {
        Rank::ALL
            .into_iter()
            .rev()
            .map(move |rank| (rank, self.rank(rank)))
    }

    /// Number of occupied squares.
    pub fn occupied(&self) -> usize {
        self.ranks.iter().flatten().filter(|cell| cell.is_some()).count()
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::standard()
    }
}
